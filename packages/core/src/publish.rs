//! Writing the rendered documents of a vocabulary into a directory tree.
//!
//! ```text
//! <dest>/<path>/META.INF
//! <dest>/<path>/.htaccess
//! <dest>/<path>/<timestamp>/<name>.ttl
//! <dest>/<path>/<timestamp>/<name>.html
//! <dest>/<path>/<timestamp>/<name>.json
//! <dest>/<path>/<timestamp>/<name>.rdf
//! ```
//!
//! Everything is rendered in memory before the first byte is written, so a
//! failing renderer or converter leaves an existing version untouched. The
//! version directory is then assembled in a staging directory next to it and
//! renamed into place; the index files are each written to a temporary file
//! and renamed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::VocabError;
use crate::external::RdfXmlConverter;
use crate::render::html::render_html;
use crate::render::json::render_json;
use crate::render::meta::{render_htaccess, render_meta_inf};
use crate::render::turtle::render_turtle;
use crate::skos::SkosNormalizer;
use crate::vocabulary::Vocabulary;

/// One output file, with its path relative to the vocabulary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

/// Renders vocabularies and writes them below `dest_dir`.
pub struct Publisher {
    dest_dir: PathBuf,
    converter: Option<Box<dyn RdfXmlConverter>>,
}

/// Outcome of building several vocabularies.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub built: Vec<String>,
    pub failed: Vec<(String, VocabError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Publisher {
    /// A publisher that writes Turtle, HTML, JSON and the index files only.
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            converter: None,
        }
    }

    /// Also produce RDF/XML through `converter`.
    pub fn with_converter(mut self, converter: Box<dyn RdfXmlConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Every file of `vocab`, paths relative to `<dest>/<path>`.
    pub fn render(&self, vocab: &Vocabulary) -> Result<Vec<Artifact>, VocabError> {
        let meta = vocab.meta();
        let version = PathBuf::from(meta.timestamp());
        let in_version = |ext: &str| version.join(format!("{}.{ext}", meta.name()));

        let turtle = render_turtle(vocab);
        let mut artifacts = Vec::with_capacity(6);
        if let Some(converter) = &self.converter {
            artifacts.push(Artifact {
                path: in_version("rdf"),
                content: converter.convert(&turtle, meta.baseuri())?,
            });
        }
        artifacts.push(Artifact {
            path: in_version("html"),
            content: render_html(vocab),
        });
        artifacts.push(Artifact {
            path: in_version("json"),
            content: render_json(vocab)?,
        });
        artifacts.push(Artifact {
            path: in_version("ttl"),
            content: turtle,
        });
        artifacts.push(Artifact {
            path: PathBuf::from("META.INF"),
            content: render_meta_inf(meta),
        });
        artifacts.push(Artifact {
            path: PathBuf::from(".htaccess"),
            content: render_htaccess(meta),
        });
        Ok(artifacts)
    }

    /// Render `vocab` and replace its dated version directory. Returns the
    /// vocabulary directory.
    pub fn publish(&self, vocab: &Vocabulary) -> Result<PathBuf, VocabError> {
        let artifacts = self.render(vocab)?;
        let meta = vocab.meta();
        let vocab_dir = self.dest_dir.join(meta.path());
        let version_dir = vocab_dir.join(meta.timestamp());
        let staging = vocab_dir.join(format!(".{}.staging", meta.timestamp()));

        fs::create_dir_all(&vocab_dir).map_err(|e| VocabError::io(&vocab_dir, e))?;
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| VocabError::io(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| VocabError::io(&staging, e))?;

        let (versioned, top_level): (Vec<&Artifact>, Vec<&Artifact>) = artifacts
            .iter()
            .partition(|a| a.path.starts_with(meta.timestamp()));

        let staged = versioned
            .iter()
            .try_for_each(|artifact| {
                let name = artifact.path.strip_prefix(meta.timestamp()).unwrap_or(&artifact.path);
                write_file(&staging.join(name), &artifact.content)
            })
            .and_then(|()| replace_dir(&staging, &version_dir));
        if let Err(err) = staged {
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                tracing::warn!(path = %staging.display(), error = %cleanup, "cannot remove staging directory");
            }
            return Err(err);
        }

        for artifact in top_level {
            write_atomically(&vocab_dir.join(&artifact.path), &artifact.content)?;
        }
        tracing::info!(
            vocabulary = %meta.name(),
            dir = %version_dir.display(),
            files = artifacts.len(),
            "published vocabulary"
        );
        Ok(vocab_dir)
    }

    /// Resolve, load and publish the vocabulary `name`.
    pub fn build(
        &self,
        config: &Config,
        name: &str,
        normalizer: &dyn SkosNormalizer,
    ) -> Result<PathBuf, VocabError> {
        let vocab = config.resolve(name)?.load(normalizer)?;
        self.publish(&vocab)
    }

    /// Build every configured vocabulary in name order, carrying on past
    /// failures.
    pub fn build_all(&self, config: &Config, normalizer: &dyn SkosNormalizer) -> BatchReport {
        let mut report = BatchReport::default();
        for name in config.names() {
            match self.build(config, name, normalizer) {
                Ok(_) => report.built.push(name.to_string()),
                Err(err) => {
                    tracing::error!(vocabulary = name, error = %err, "vocabulary failed");
                    report.failed.push((name.to_string(), err));
                }
            }
        }
        tracing::info!(
            built = report.built.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        report
    }
}

fn write_file(target: &Path, content: &str) -> Result<(), VocabError> {
    fs::write(target, content).map_err(|e| VocabError::io(target, e))?;
    tracing::debug!(path = %target.display(), bytes = content.len(), "wrote");
    Ok(())
}

/// Write next to `target` and rename over it.
pub(crate) fn write_atomically(target: &Path, content: &str) -> Result<(), VocabError> {
    let mut tmp_name = target.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = target.with_file_name(tmp_name);
    write_file(&tmp, content)?;
    fs::rename(&tmp, target).map_err(|e| VocabError::io(target, e))
}

/// Swap the fully written `staging` directory in for `target`. An existing
/// `target` is moved aside first and restored if the swap fails.
fn replace_dir(staging: &Path, target: &Path) -> Result<(), VocabError> {
    if !target.exists() {
        return fs::rename(staging, target).map_err(|e| VocabError::io(target, e));
    }
    let mut old_name = target.file_name().unwrap_or_default().to_os_string();
    old_name.push(".previous");
    let previous = target.with_file_name(old_name);
    if previous.exists() {
        fs::remove_dir_all(&previous).map_err(|e| VocabError::io(&previous, e))?;
    }
    fs::rename(target, &previous).map_err(|e| VocabError::io(target, e))?;
    if let Err(e) = fs::rename(staging, target) {
        if let Err(restore) = fs::rename(&previous, target) {
            tracing::error!(path = %target.display(), error = %restore, "cannot restore previous version");
        }
        return Err(VocabError::io(target, e));
    }
    fs::remove_dir_all(&previous).map_err(|e| VocabError::io(&previous, e))
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Flavour;
    use crate::vocabulary::VocabularyMeta;

    struct Stub;

    impl RdfXmlConverter for Stub {
        fn convert(&self, turtle: &str, baseuri: &str) -> Result<String, VocabError> {
            Ok(format!("<!-- {baseuri} -->\n{}", turtle.len()))
        }
    }

    struct Failing;

    impl RdfXmlConverter for Failing {
        fn convert(&self, _: &str, _: &str) -> Result<String, VocabError> {
            Err(VocabError::Collaborator {
                tool: "rapper".into(),
                message: "exit status: 1".into(),
            })
        }
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("vocabweft-publish-{}", uuid::Uuid::now_v7()))
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn vocab() -> Vocabulary {
        let meta = VocabularyMeta::new("demo", "Demo", "Demo terms.", "Ann", "2024-05-01").unwrap();
        Vocabulary::from_records(meta, Flavour::Skos, "t.csv", "a;1;A;\n").unwrap()
    }

    #[test]
    fn artifact_layout() {
        let paths: Vec<PathBuf> = Publisher::new("out")
            .render(&vocab())
            .unwrap()
            .into_iter()
            .map(|a| a.path)
            .collect();
        assert_eq!(
            paths,
            ["2024-05-01/demo.html", "2024-05-01/demo.json", "2024-05-01/demo.ttl", "META.INF", ".htaccess"]
                .map(PathBuf::from)
        );
    }

    #[test]
    fn converter_output_included() {
        let artifacts = Publisher::new("out")
            .with_converter(Box::new(Stub))
            .render(&vocab())
            .unwrap();
        assert_eq!(artifacts[0].path, PathBuf::from("2024-05-01/demo.rdf"));
        assert!(artifacts[0].content.starts_with("<!-- http://www.ivoa.net/rdf/demo -->"));
    }

    #[test]
    fn converter_failure_is_unexpected() {
        let err = Publisher::new("out")
            .with_converter(Box::new(Failing))
            .render(&vocab())
            .unwrap_err();
        assert!(!err.is_reportable());
    }

    #[test]
    fn republish_swaps_version_without_leftovers() {
        let dest = scratch_dir();
        let publisher = Publisher::new(&dest);
        let dir = publisher.publish(&vocab()).unwrap();
        fs::write(dir.join("2024-05-01/stale.txt"), "old").unwrap();

        publisher.publish(&vocab()).unwrap();
        assert_eq!(entries(&dir), [".htaccess", "2024-05-01", "META.INF"]);
        assert_eq!(
            entries(&dir.join("2024-05-01")),
            ["demo.html", "demo.json", "demo.ttl"]
        );
        fs::remove_dir_all(&dest).unwrap();
    }

    #[test]
    fn failed_staging_keeps_published_version() {
        let dest = scratch_dir();
        let publisher = Publisher::new(&dest);
        let dir = publisher.publish(&vocab()).unwrap();
        let before = fs::read_to_string(dir.join("2024-05-01/demo.ttl")).unwrap();
        fs::write(dir.join(".2024-05-01.staging"), "in the way").unwrap();

        let err = publisher.publish(&vocab()).unwrap_err();
        assert!(matches!(err, VocabError::Io { .. }));
        assert_eq!(
            fs::read_to_string(dir.join("2024-05-01/demo.ttl")).unwrap(),
            before
        );
        assert_eq!(
            entries(&dir.join("2024-05-01")),
            ["demo.html", "demo.json", "demo.ttl"]
        );
        fs::remove_dir_all(&dest).unwrap();
    }
}
