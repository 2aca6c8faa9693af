//! The table of vocabularies on the index page of a published tree.
//!
//! Each vocabulary directory carries a `META.INF` file (see
//! [`render_meta_inf`](super::meta::render_meta_inf)):
//!
//! ```text
//! Name: Content levels for VO resources
//! Description: This vocabulary enumerates the intended audiences for
//!   resources in the Virtual Observatory.
//! Status: Draft
//! ```
//!
//! One `Key: value` pair per line; indented lines continue the previous
//! value. `Last Change` and `URI` may be given for vocabularies that are not
//! laid out in dated version directories.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::escape_html;
use crate::error::VocabError;

/// Replaced by the vocabulary table in the index template.
pub const VOCAB_LIST_PLACEHOLDER: &str = "VOCAB_LIST_HERE";

static META_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w ]+):(.*)$").expect("invalid META.INF key regex"));

const INDEX_STYLE: &str = "
table.vocab {
  border-spacing: 3pt;
  border-collapse: collapse;
  margin-top: 2ex;
  border-top: 2pt solid grey;
  border-bottom: 2pt solid grey;
}
table.vocab thead tr th {
  border-top: 1pt solid grey;
  font-weight: bold;
  padding: 3pt;
}
table.vocab tbody tr td {
  border-top: 1pt solid grey;
  border-bottom: 1pt solid grey;
  padding: 3pt;
}
table.vocab tbody tr td:nth-child(odd),
table.vocab thead tr th:nth-child(odd) {
  background-color: #EEE;
}
td.date-cell { white-space: nowrap; }
span.status { color: #E44; font-weight: bold; }
.status-draft { color: #666; }
";

/// One row of the vocabulary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub description: String,
    pub status: Option<String>,
    /// ISO date of the newest version.
    pub last_change: String,
    pub uri: String,
}

impl IndexEntry {
    pub fn is_draft(&self) -> bool {
        self.status.as_deref() == Some("Draft")
    }
}

/// Parse the key-value pairs of a `META.INF` file. Keys are lower-cased.
pub fn parse_meta_inf(
    source_name: &str,
    text: &str,
) -> Result<BTreeMap<String, String>, VocabError> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let syntax_error = |reason: &str| VocabError::MalformedMetaInf {
            source_name: source_name.to_string(),
            line: i + 1,
            reason: reason.to_string(),
        };

        if line.starts_with(char::is_whitespace) {
            let key = current
                .as_ref()
                .ok_or_else(|| syntax_error("continuation line not allowed here"))?;
            if let Some(value) = fields.get_mut(key) {
                value.push(' ');
                value.push_str(line.trim());
            }
        } else if let Some(caps) = META_KEY_RE.captures(line) {
            let key = caps[1].trim().to_lowercase();
            fields.insert(key.clone(), caps[2].trim().to_string());
            current = Some(key);
        } else {
            return Err(syntax_error("neither key-value pair nor continuation line"));
        }
    }
    Ok(fields)
}

/// Stable vocabularies first, then drafts; by name within each group.
pub fn sort_entries(entries: &mut [IndexEntry]) {
    entries.sort_by(|a, b| (a.is_draft(), &a.name).cmp(&(b.is_draft(), &b.name)));
}

/// The vocabulary table, with its style sheet, as an XHTML fragment.
pub fn render_index_table(entries: &[IndexEntry]) -> String {
    let mut out = format!("<div>\n<style type=\"text/css\">{INDEX_STYLE}</style>\n");
    out.push_str("<table class=\"vocab\">\n<thead>\n<tr>\n");
    for (title, heading) in [
        ("The informal vocabulary name", "Name"),
        ("The date this vocabulary was last changed (the version indicator)", "Last Change"),
        ("The vocabulary URI as used in RDF", "URI"),
        ("Use and function of this vocabulary", "Description"),
    ] {
        out.push_str(&format!("<th title=\"{title}\">{heading}</th>\n"));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for entry in entries {
        let status = entry.status.as_deref().unwrap_or("stable").to_lowercase();
        let marker = if entry.is_draft() {
            "<br/><span class=\"status\">DRAFT</span>"
        } else {
            ""
        };
        let uri = escape_html(&entry.uri);
        out.push_str(&format!(
            "<tr class=\"status-{status}\">\n\
             <td>{name}{marker}</td>\n\
             <td class=\"date-cell\">{date}</td>\n\
             <td class=\"url-cell\"><a href=\"{uri}\">{uri}</a></td>\n\
             <td>{description}</td>\n\
             </tr>\n",
            status = escape_html(&status),
            name = escape_html(&entry.name),
            date = escape_html(&entry.last_change),
            description = escape_html(&entry.description),
        ));
    }
    out.push_str("</tbody>\n</table>\n</div>");
    out
}

/// Put the vocabulary table into `template` at [`VOCAB_LIST_PLACEHOLDER`].
pub fn fill_template(template: &str, entries: &[IndexEntry]) -> String {
    template.replace(VOCAB_LIST_PLACEHOLDER, &render_index_table(entries))
}

// --- tests -------------------------------------------------------------------
