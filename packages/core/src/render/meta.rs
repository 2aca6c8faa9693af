//! Files placed next to the dated versions of a vocabulary.

use super::wrap;
use crate::vocabulary::VocabularyMeta;

const META_INF_WIDTH: usize = 70;

/// The index entry read by the vocabulary table-of-contents generator.
///
/// ```text
/// Name: Object Types
/// Description: Types of astronomical objects, for use in
///   classification.
/// Status: Draft
/// ```
pub fn render_meta_inf(meta: &VocabularyMeta) -> String {
    let mut out = format!("Name: {}\n", meta.title());
    out.push_str(&wrap(meta.description(), META_INF_WIDTH, "Description: ", "  "));
    out.push('\n');
    if meta.draft() {
        out.push_str("Status: Draft\n");
    }
    out
}

/// Content negotiation rules redirecting the vocabulary URI to the current
/// dated version in the requested format, HTML by default.
pub fn render_htaccess(meta: &VocabularyMeta) -> String {
    let base = install_base(meta.baseuri());
    let ts = meta.timestamp();
    let name = meta.name();
    format!(
        "# .htaccess for content negotiation

# This file is patterned after Recipe 3 in the W3C document 'Best
# Practice Recipes for Publishing RDF Vocabularies', at
# <http://www.w3.org/TR/swbp-vocab-pub/>

AddType application/rdf+xml .rdf
AddType text/turtle .ttl
AddType application/json .json
AddCharset UTF-8 .ttl
AddCharset UTF-8 .html
AddCharset UTF-8 .json

RewriteEngine On
RewriteBase {base}

RewriteCond %{{HTTP_ACCEPT}} application/rdf\\+xml
RewriteRule ^$ {ts}/{name}.rdf [R=303]

RewriteCond %{{HTTP_ACCEPT}} text/turtle
RewriteRule ^$ {ts}/{name}.ttl [R=303]

RewriteCond %{{HTTP_ACCEPT}} application/json
RewriteRule ^$ {ts}/{name}.json [R=303]

# No accept conditions: make the .html version the default
RewriteRule ^$ {ts}/{name}.html [R=303]
"
    )
}

/// The path component of `uri` with a trailing slash.
fn install_base(uri: &str) -> String {
    let after_scheme = uri.split_once("://").map_or(uri, |(_, rest)| rest);
    let path = after_scheme
        .find('/')
        .map_or("", |i| &after_scheme[i..]);
    let path = path.split(['?', '#']).next().unwrap_or_default();
    format!("{}/", path.trim_end_matches('/'))
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> VocabularyMeta {
        VocabularyMeta::new(
            "object_type",
            "Object Types",
            "Types of astronomical objects, for use in classification and in data discovery services.",
            "Ann",
            "2020-01-31",
        )
        .unwrap()
    }

    #[test]
    fn meta_inf_wraps_description() {
        let text = render_meta_inf(&meta());
        assert_eq!(
            text,
            "Name: Object Types\n\
             Description: Types of astronomical objects, for use in classification\n  \
             and in data discovery services.\n"
        );
        assert!(render_meta_inf(&meta().with_draft(true)).ends_with("Status: Draft\n"));
    }

    #[test]
    fn htaccess_rules() {
        let text = render_htaccess(&meta());
        assert!(text.contains("RewriteBase /rdf/object_type/\n"));
        assert!(text.contains("RewriteCond %{HTTP_ACCEPT} application/rdf\\+xml\n"));
        assert!(text.contains("RewriteRule ^$ 2020-01-31/object_type.ttl [R=303]"));
        assert!(text.ends_with("RewriteRule ^$ 2020-01-31/object_type.html [R=303]\n"));
    }

    #[test]
    fn install_base_of_odd_uris() {
        assert_eq!(install_base("http://host"), "/");
        assert_eq!(install_base("http://host/a/b/"), "/a/b/");
        assert_eq!(install_base("https://host/a#x"), "/a/");
    }
}
