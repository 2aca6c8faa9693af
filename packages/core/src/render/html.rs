//! XHTML rendering: one table row per term.

use super::escape_html;
use crate::types::{ObjectRef, Predicate, Relation, Term};
use crate::vocabulary::Vocabulary;

const SCRIPT: &str = r##"
var current_highlight = null;

function highlight_fragment(ev) {
  var parts = document.URL.split("#");
  if (parts.length == 2) {
    if (current_highlight) {
      var old = document.getElementById(current_highlight);
      if (old) { old.setAttribute("style", ""); }
    }
    current_highlight = parts[parts.length - 1];
    var el = document.getElementById(current_highlight);
    if (el) { el.setAttribute("style", "border: 2pt solid yellow"); }
  }
}

window.addEventListener("load", highlight_fragment);
window.addEventListener("hashchange", highlight_fragment);
"##;

const STYLE: &str = r#"
html { font-family: sans-serif; }
h1 { margin-bottom: 3ex; border-bottom: 2pt solid #ccc; }
table { border-collapse: collapse; border-bottom: 1pt solid black; }
thead tr { border-top: 1pt solid black; border-bottom: 1pt solid black; }
tr { border-bottom: 1pt solid #ccc; }
th { padding: 4pt; }
td { vertical-align: top; padding: 2pt; }
th:nth-child(1), td:nth-child(1) { background: #eef; }
.intro { max-width: 30em; margin-bottom: 5ex; margin-left: 2ex; }
.outro { max-width: 30em; margin-top: 4ex; }
.draftwarning { border-left: 3pt solid red; padding-left: 1em; }
tr.preliminary { color: #666; }
tr.deprecated { color: #999; text-decoration: line-through; }
"#;

/// Labels of the relations shown in the "More" column, in display order.
const MORE_RELATIONS: [(Predicate, &str); 8] = [
    (Predicate::UseInstead, "Use Instead"),
    (Predicate::Deprecated, "Deprecated Term"),
    (Predicate::ExactMatch, "Same As"),
    (Predicate::Related, "Related"),
    (Predicate::Broader, "Broader"),
    (Predicate::SubClassOf, "Subclass Of"),
    (Predicate::SubPropertyOf, "Subproperty Of"),
    (Predicate::Preliminary, "Preliminary"),
];

/// The label a relation gets in the "More" column.
pub fn relation_label(predicate: Predicate) -> &'static str {
    MORE_RELATIONS
        .iter()
        .find(|(p, _)| *p == predicate)
        .map_or("", |(_, label)| label)
}

/// Render the whole vocabulary as an XHTML page.
pub fn render_html(vocab: &Vocabulary) -> String {
    let meta = vocab.meta();
    let title = escape_html(&format!("IVOA Vocabulary: {}", meta.title()));

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<html xmlns=\"http://www.w3.org/1999/xhtml\">\n<head>\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str("<meta http-equiv=\"content-type\" content=\"text/html;charset=utf-8\"/>\n");
    out.push_str(&format!("<script type=\"text/javascript\">{SCRIPT}</script>\n"));
    out.push_str(&format!("<style type=\"text/css\">{STYLE}</style>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{title}</h1>\n"));

    out.push_str("<div class=\"intro\">\n");
    out.push_str(&format!(
        "<p>This is the description of the namespace <code>{}</code> as of {}.</p>\n",
        escape_html(meta.baseuri()),
        escape_html(meta.timestamp())
    ));
    if meta.draft() {
        out.push_str(
            "<p class=\"draftwarning\">This vocabulary is not yet approved by the IVOA. \
             This means that terms can still disappear without prior notice.</p>\n",
        );
    }
    out.push_str(&format!(
        "<p class=\"description\">{}</p>\n</div>\n",
        escape_html(meta.description())
    ));

    out.push_str(&render_table(vocab));

    let name = escape_html(meta.name());
    out.push_str(&format!(
        "<p class=\"outro\">Alternate formats: <a href=\"{name}.rdf\">RDF</a>, \
         <a href=\"{name}.ttl\">Turtle</a>, <a href=\"{name}.json\">JSON</a>.</p>\n"
    ));
    out.push_str("</body>\n</html>\n");
    out
}

fn render_table(vocab: &Vocabulary) -> String {
    let mut out = String::from("<table class=\"terms\">\n<thead>\n<tr>\n");
    for (title, heading) in [
        ("The formal name of the term as used in URIs", "Predicate"),
        ("Suggested label for the term in human-facing UIs", "Label"),
        ("Human-readable description of the term", "Description"),
        ("If the term is in a wider-narrower relationship to other terms: the more general term.", "Parent"),
        ("Further properties of this term.", "More"),
    ] {
        out.push_str(&format!("<th title=\"{title}\">{heading}</th>\n"));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for term in vocab.sorted_terms() {
        out.push_str(&render_row(vocab, term));
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

/// One `<tr>` for `term`.
pub fn render_row(vocab: &Vocabulary, term: &Term) -> String {
    let preliminary = term.has_flag(Predicate::Preliminary);
    let deprecated = term.has_flag(Predicate::Deprecated);
    let row_class = if preliminary {
        "preliminary"
    } else if deprecated {
        "deprecated"
    } else {
        "term"
    };

    let mut name = escape_html(term.identifier());
    if preliminary {
        name.push_str(" (Preliminary)");
    }
    if deprecated {
        name.push_str(" (Deprecated)");
    }

    let parents = vocab
        .wider(term)
        .into_iter()
        .map(|p| link(vocab, p))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "<tr class=\"{row_class}\" id=\"{id}\">\n\
         <td class=\"term\">{name}</td>\n\
         <td class=\"label\">{label}</td>\n\
         <td class=\"description\">{description}</td>\n\
         <td class=\"parent\">{parents}</td>\n\
         <td class=\"morerels\">{more}</td>\n\
         </tr>\n",
        id = escape_html(term.identifier()),
        label = escape_html(term.label()),
        description = escape_html(term.description()),
        more = more_relations(vocab, term),
    )
}

/// The collapsible "More" cell; empty when every relation of the term is
/// already shown elsewhere in the row.
///
/// The parent column holds the flavour's wider relations with an object and
/// the name marker holds the blank preliminary flag. Everything else is
/// listed here, a blank object as the bare label.
fn more_relations(vocab: &Vocabulary, term: &Term) -> String {
    let wider = vocab.spec().wider_predicate;
    let shown_in_row = |rel: &Relation| match rel.object {
        Some(_) => rel.predicate == wider,
        None => rel.predicate == Predicate::Preliminary,
    };

    let mut lines = Vec::new();
    for (predicate, label) in MORE_RELATIONS {
        let rels: Vec<&Relation> = term
            .sorted_relations()
            .into_iter()
            .filter(|r| r.predicate == predicate && !shown_in_row(*r))
            .collect();
        if rels.iter().any(|r| r.object.is_none()) {
            lines.push(label.to_string());
        }
        let links: Vec<String> = rels
            .iter()
            .filter_map(|r| r.object.as_deref())
            .map(|o| link(vocab, o))
            .collect();
        if !links.is_empty() {
            lines.push(format!("{label}: {}", links.join(", ")));
        }
    }
    if lines.is_empty() {
        return String::new();
    }
    format!(
        "<details><summary>{} more</summary>{}</details>",
        lines.len(),
        lines.join("<br/>")
    )
}

/// A relation object as markup: local terms that exist become anchors,
/// external URIs become links, anything else is plain text.
pub fn link(vocab: &Vocabulary, object: &str) -> String {
    match ObjectRef::classify(object) {
        ObjectRef::Anchor(fragment) if vocab.contains(fragment) => {
            let f = escape_html(fragment);
            format!("<a href=\"#{f}\">{f}</a>")
        }
        ObjectRef::External(uri) => {
            let u = escape_html(uri);
            format!("<a class=\"external\" href=\"{u}\">{u}</a>")
        }
        other => escape_html(other.display_text()),
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Flavour;
    use crate::vocabulary::VocabularyMeta;

    fn vocab(draft: bool) -> Vocabulary {
        let meta = VocabularyMeta::new("demo", "Demo & Co", "A <demo>.", "Ann", "2024-05-01")
            .unwrap()
            .with_draft(draft);
        Vocabulary::from_records(
            meta,
            Flavour::Skos,
            "terms.csv",
            "star;1;Star;A ball of gas.\n\
             dwarf;2;Dwarf;Small & dim;skos:exactMatch(https://example.org/dwarf)\n\
             old;1;Old;;ivoasem:deprecated ivoasem:useInstead(star)\n\
             orphan;1;Orphan;;ivoasem:useInstead(missing)\n",
        )
        .unwrap()
    }

    #[test]
    fn script_survives_in_page() {
        let html = render_html(&vocab(false));
        assert!(html.contains("var parts = document.URL.split(\"#\");"));
        assert!(html.contains("window.addEventListener(\"hashchange\", highlight_fragment);\n</script>"));
    }

    #[test]
    fn off_flavour_relations_listed() {
        let meta = VocabularyMeta::new("demo", "Demo", "Demo.", "Ann", "2024-05-01").unwrap();
        let v = Vocabulary::from_records(
            meta,
            Flavour::RdfClass,
            "terms.csv",
            "a;1;A;\nb;2;B;;skos:broader(a) skos:related ivoasem:preliminary(a)\n",
        )
        .unwrap();
        let row = render_row(&v, v.get("b").unwrap());
        assert!(row.contains("<td class=\"parent\"><a href=\"#a\">a</a></td>"));
        assert!(row.contains(
            "<details><summary>3 more</summary>Related<br/>\
             Broader: <a href=\"#a\">a</a><br/>\
             Preliminary: <a href=\"#a\">a</a></details>"
        ));
        assert!(!row.contains("(Preliminary)"));
        assert_eq!(relation_label(Predicate::SubClassOf), "Subclass Of");
    }

    #[test]
    fn page_frame() {
        let html = render_html(&vocab(false));
        assert!(html.contains("<title>IVOA Vocabulary: Demo &amp; Co</title>"));
        assert!(html.contains("<code>http://www.ivoa.net/rdf/demo</code> as of 2024-05-01."));
        assert!(html.contains("<p class=\"description\">A &lt;demo&gt;.</p>"));
        assert!(!html.contains("draftwarning\">"));
        assert!(html.contains("<a href=\"demo.ttl\">Turtle</a>"));
    }

    #[test]
    fn draft_warning_and_row_class() {
        let v = vocab(true);
        let html = render_html(&v);
        assert!(html.contains("<p class=\"draftwarning\">"));
        let row = render_row(&v, v.get("star").unwrap());
        assert!(row.starts_with("<tr class=\"preliminary\" id=\"star\">"));
        assert!(row.contains("<td class=\"term\">star (Preliminary)</td>"));
    }

    #[test]
    fn parents_and_external_links() {
        let v = vocab(false);
        let row = render_row(&v, v.get("dwarf").unwrap());
        assert!(row.contains("<td class=\"parent\"><a href=\"#star\">star</a></td>"));
        assert!(row.contains("<td class=\"description\">Small &amp; dim</td>"));
        assert!(row.contains(
            "Same As: <a class=\"external\" href=\"https://example.org/dwarf\">"
        ));
    }

    #[test]
    fn deprecated_term_more_cell() {
        let v = vocab(false);
        let row = render_row(&v, v.get("old").unwrap());
        assert!(row.starts_with("<tr class=\"deprecated\""));
        assert!(row.contains("old (Deprecated)"));
        assert!(row.contains(
            "<details><summary>2 more</summary>Use Instead: <a href=\"#star\">star</a><br/>Deprecated Term</details>"
        ));
    }

    #[test]
    fn dangling_anchor_is_plain_text() {
        let v = vocab(false);
        let row = render_row(&v, v.get("orphan").unwrap());
        assert!(row.contains("Use Instead: missing<"));
        let star = render_row(&v, v.get("star").unwrap());
        assert!(star.contains("<td class=\"morerels\"></td>"));
    }
}
