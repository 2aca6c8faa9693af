//! Reader for the semicolon-delimited term source format.
//!
//! ```text
//! # identifier;level;label;description;more relations
//! stars;1;Stars;Self-luminous gas balls.;
//! dwarf;2;Dwarf star;"A small star; usually
//! on the main sequence.";skos:exactMatch(https://example.org/dwarf)
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Fields may be quoted
//! with `"` (doubled inside to escape it), and a quoted field may continue on
//! the following lines. Empty fields are read as absent.

use std::iter::Enumerate;
use std::str::Lines;

use crate::error::VocabError;

/// One record as it appears in the source, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Zero-based position among the non-comment records.
    pub index: usize,
    /// One-based line the record starts on.
    pub line: usize,
    pub fields: Vec<Option<String>>,
}

/// A record with its fields interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct TermRecord {
    pub index: usize,
    pub line: usize,
    pub identifier: String,
    pub depth: usize,
    pub label: Option<String>,
    pub description: Option<String>,
    pub relations: Option<String>,
}

/// Iterates over the records of a source text.
pub struct RecordReader<'a> {
    source_name: &'a str,
    lines: Enumerate<Lines<'a>>,
    next_index: usize,
}

impl<'a> RecordReader<'a> {
    /// `source_name` only appears in error messages.
    pub fn new(source_name: &'a str, text: &'a str) -> Self {
        Self {
            source_name,
            lines: text.lines().enumerate(),
            next_index: 0,
        }
    }

    fn next_content_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines
            .by_ref()
            .find(|(_, ln)| !ln.trim().is_empty() && !ln.starts_with('#'))
            .map(|(i, ln)| (i + 1, ln))
    }

    fn read_record(&mut self, line_no: usize, first: &'a str) -> Result<RawRecord, VocabError> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut at_field_start = true;
        let mut current = first;

        loop {
            let mut chars = current.chars().peekable();
            while let Some(c) = chars.next() {
                if in_quotes {
                    if c == '"' {
                        if chars.peek() == Some(&'"') {
                            chars.next();
                            field.push('"');
                        } else {
                            in_quotes = false;
                        }
                    } else {
                        field.push(c);
                    }
                } else if c == ';' {
                    fields.push(take_field(&mut field));
                    at_field_start = true;
                } else if c == '"' && at_field_start {
                    in_quotes = true;
                    at_field_start = false;
                } else {
                    field.push(c);
                    at_field_start = false;
                }
            }

            if !in_quotes {
                break;
            }
            // a quoted field spans a line break
            match self.lines.next() {
                Some((_, ln)) => {
                    field.push('\n');
                    current = ln;
                }
                None => {
                    return Err(VocabError::UnterminatedQuote {
                        source_name: self.source_name.to_string(),
                        line: line_no,
                    })
                }
            }
        }
        fields.push(take_field(&mut field));

        let index = self.next_index;
        self.next_index += 1;
        Ok(RawRecord {
            index,
            line: line_no,
            fields,
        })
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Result<RawRecord, VocabError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line_no, first) = self.next_content_line()?;
        Some(self.read_record(line_no, first))
    }
}

fn take_field(field: &mut String) -> Option<String> {
    let value = std::mem::take(field);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl RawRecord {
    /// Interpret the fields as `(identifier, level, label, description,
    /// [relations])`.
    pub fn interpret(self, source_name: &str) -> Result<TermRecord, VocabError> {
        if self.fields.len() < 4 {
            return Err(VocabError::IncompleteRecord {
                source_name: source_name.to_string(),
                index: self.index,
                line: self.line,
                record: self.fields,
            });
        }

        let mut fields = self.fields.into_iter();
        let identifier = fields.next().flatten().unwrap_or_default();
        let depth_field = fields.next().flatten().unwrap_or_default();
        let depth = match depth_field.trim().parse::<usize>() {
            Ok(d) if d > 0 => d,
            _ => {
                return Err(VocabError::InvalidDepth {
                    source_name: source_name.to_string(),
                    index: self.index,
                    line: self.line,
                    value: depth_field,
                })
            }
        };
        let label = fields.next().flatten();
        let description = fields.next().flatten();
        let relations = fields.next().flatten();

        Ok(TermRecord {
            index: self.index,
            line: self.line,
            identifier,
            depth,
            label,
            description,
            relations,
        })
    }
}

/// Read and interpret every record of `text`.
pub fn parse_records(source_name: &str, text: &str) -> Result<Vec<TermRecord>, VocabError> {
    RecordReader::new(source_name, text)
        .map(|raw| raw.and_then(|r| r.interpret(source_name)))
        .collect()
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> Vec<RawRecord> {
        RecordReader::new("test.csv", text)
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let recs = raw("# header\n\na;1;A;Desc A\n   \n# more\nb;2;B;Desc B;\n");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].index, 0);
        assert_eq!(recs[0].line, 3);
        assert_eq!(recs[1].index, 1);
        assert_eq!(recs[1].line, 6);
    }

    #[test]
    fn empty_fields_are_absent() {
        let recs = raw("a;1;;Desc;\n");
        assert_eq!(
            recs[0].fields,
            vec![
                Some("a".to_string()),
                Some("1".to_string()),
                None,
                Some("Desc".to_string()),
                None
            ]
        );
    }

    #[test]
    fn quoted_fields() {
        let recs = raw("a;1;\"Semi; colon\";\"He said \"\"hi\"\"\"\n");
        assert_eq!(recs[0].fields[2].as_deref(), Some("Semi; colon"));
        assert_eq!(recs[0].fields[3].as_deref(), Some("He said \"hi\""));
    }

    #[test]
    fn quoted_field_spans_lines() {
        let recs = raw("a;1;A;\"first\n\nsecond\";\nb;1;B;x\n");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].fields[3].as_deref(), Some("first\n\nsecond"));
        assert_eq!(recs[1].line, 4);
    }

    #[test]
    fn unterminated_quote() {
        let err = RecordReader::new("t.csv", "a;1;A;\"open\n")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert!(matches!(err, VocabError::UnterminatedQuote { line: 1, .. }));
    }

    #[test]
    fn unicode_is_preserved() {
        let recs = parse_records("t.csv", "stern;1;Stern – Größe;Ein Ball aus Gas ☀;\n").unwrap();
        assert_eq!(recs[0].label.as_deref(), Some("Stern – Größe"));
        assert_eq!(recs[0].description.as_deref(), Some("Ein Ball aus Gas ☀"));
    }

    #[test]
    fn three_fields_is_incomplete() {
        let err = parse_records("terms.csv", "a;1;A;D\nb;1;B\n").unwrap_err();
        match err {
            VocabError::IncompleteRecord {
                source_name,
                index,
                line,
                ..
            } => {
                assert_eq!(source_name, "terms.csv");
                assert_eq!(index, 1);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn depth_must_be_positive_integer() {
        assert!(matches!(
            parse_records("t.csv", "a;x;A;D\n"),
            Err(VocabError::InvalidDepth { .. })
        ));
        assert!(matches!(
            parse_records("t.csv", "a;0;A;D\n"),
            Err(VocabError::InvalidDepth { .. })
        ));
        assert!(matches!(
            parse_records("t.csv", "a;;A;D\n"),
            Err(VocabError::InvalidDepth { .. })
        ));
    }

    #[test]
    fn interprets_fields() {
        let recs = parse_records("t.csv", "b;2;Label B;Desc B;skos:exactMatch(https://example.org/x)\n")
            .unwrap();
        let r = &recs[0];
        assert_eq!(r.identifier, "b");
        assert_eq!(r.depth, 2);
        assert_eq!(r.label.as_deref(), Some("Label B"));
        assert_eq!(r.relations.as_deref(), Some("skos:exactMatch(https://example.org/x)"));
    }
}
