//! The index page of a published vocabulary tree.
//!
//! Every directory below the tree's root that holds a `META.INF` file is a
//! vocabulary. Its row in the index takes the name, description and status
//! from `META.INF`; the last change date is the newest dated version
//! directory next to it and the URI is the root URI plus the directory's
//! path, unless `META.INF` gives `Last Change` or `URI` itself.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::VocabError;
use crate::publish::write_atomically;
use crate::render::index::{fill_template, parse_meta_inf, sort_entries, IndexEntry};
use crate::validation::validate_timestamp;

const META_INF: &str = "META.INF";

/// Collect the index rows for every vocabulary below `root`, stable
/// vocabularies first.
pub fn collect_entries(root: &Path, root_uri: &str) -> Result<Vec<IndexEntry>, VocabError> {
    let mut found = Vec::new();
    find_meta_inf(root, &mut found)?;

    let mut entries = found
        .iter()
        .map(|meta_inf| read_entry(root, meta_inf, root_uri))
        .collect::<Result<Vec<_>, _>>()?;
    sort_entries(&mut entries);
    Ok(entries)
}

/// Fill `template` with the vocabulary table and write `<root>/index.html`.
pub fn write_index(root: &Path, template: &str, root_uri: &str) -> Result<PathBuf, VocabError> {
    let entries = collect_entries(root, root_uri)?;
    let target = root.join("index.html");
    write_atomically(&target, &fill_template(template, &entries))?;
    tracing::info!(path = %target.display(), vocabularies = entries.len(), "wrote index");
    Ok(target)
}

/// Read an index template from disk.
pub fn read_template(path: &Path) -> Result<String, VocabError> {
    fs::read_to_string(path).map_err(|e| VocabError::UnreadableTemplate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn sorted_dir_entries(dir: &Path) -> Result<Vec<PathBuf>, VocabError> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| VocabError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| VocabError::io(dir, e))?;
    paths.sort();
    Ok(paths)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn find_meta_inf(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), VocabError> {
    for path in sorted_dir_entries(dir)? {
        if is_hidden(&path) {
            continue;
        }
        if path.is_dir() {
            find_meta_inf(&path, found)?;
        } else if path.file_name().is_some_and(|n| n == META_INF) {
            found.push(path);
        }
    }
    Ok(())
}

/// The lexically largest sibling directory named like an ISO date.
fn newest_version(vocab_dir: &Path) -> Result<Option<String>, VocabError> {
    Ok(sorted_dir_entries(vocab_dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
        .filter(|n| validate_timestamp(n, n).is_ok())
        .max())
}

fn read_entry(root: &Path, meta_inf: &Path, root_uri: &str) -> Result<IndexEntry, VocabError> {
    let text = fs::read_to_string(meta_inf).map_err(|e| VocabError::io(meta_inf, e))?;
    let source_name = meta_inf.display().to_string();
    let mut fields = parse_meta_inf(&source_name, &text)?;

    let missing: Vec<String> = ["name", "description"]
        .into_iter()
        .filter(|k| !fields.contains_key(*k))
        .map(String::from)
        .collect();
    if !missing.is_empty() {
        return Err(VocabError::MissingMetadata {
            name: source_name,
            missing,
        });
    }

    let vocab_dir = meta_inf.parent().unwrap_or(root);
    let last_change = match fields.remove("last change") {
        Some(date) => date,
        None => newest_version(vocab_dir)?.ok_or_else(|| VocabError::NoVersions {
            path: meta_inf.to_path_buf(),
        })?,
    };
    let uri = match fields.remove("uri") {
        Some(uri) => uri,
        None => vocabulary_uri(root_uri, vocab_dir.strip_prefix(root).unwrap_or(vocab_dir)),
    };

    let entry = IndexEntry {
        name: fields.remove("name").unwrap_or_default(),
        description: fields.remove("description").unwrap_or_default(),
        status: fields.remove("status"),
        last_change,
        uri,
    };
    tracing::debug!(name = %entry.name, uri = %entry.uri, last_change = %entry.last_change, "indexed");
    Ok(entry)
}

fn vocabulary_uri(root_uri: &str, rel: &Path) -> String {
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let root = root_uri.trim_end_matches('/');
    if segments.is_empty() {
        root.to_string()
    } else {
        format!("{root}/{}", segments.join("/"))
    }
}

// --- tests -------------------------------------------------------------------
