//! External programs the build hands documents to.
//!
//! Both collaborators are used as filters: a document goes in on stdin, the
//! result comes out on stdout. Any failure is an unexpected error carrying
//! the tool's stderr.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use crate::error::VocabError;

/// Run `program args...` with `input` on stdin and return its stdout.
pub fn run_filter(program: &str, args: &[String], input: String) -> Result<String, VocabError> {
    let failed = |message: String| VocabError::Collaborator {
        tool: program.to_string(),
        message,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| failed(e.to_string()))?;

    // the child may fill its stdout pipe before it has read all of stdin
    let writer = child.stdin.take().map(|mut stdin| {
        thread::spawn(move || stdin.write_all(input.as_bytes()))
    });

    let output = child.wait_with_output().map_err(|e| failed(e.to_string()))?;
    let written = writer.map(|w| w.join());

    if !output.status.success() {
        return Err(failed(format!(
            "{}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    match written {
        Some(Ok(Err(e))) => return Err(failed(e.to_string())),
        Some(Err(_)) => return Err(failed("stdin writer panicked".into())),
        Some(Ok(Ok(()))) | None => {}
    }
    String::from_utf8(output.stdout).map_err(|e| failed(e.to_string()))
}

/// Re-serialises Turtle as RDF/XML without changing the triples.
pub trait RdfXmlConverter {
    fn convert(&self, turtle: &str, baseuri: &str) -> Result<String, VocabError>;
}

/// The `rapper` command line tool from the Raptor RDF library.
#[derive(Debug, Clone)]
pub struct Rapper {
    pub program: String,
}

impl Default for Rapper {
    fn default() -> Self {
        Self {
            program: "rapper".into(),
        }
    }
}

impl RdfXmlConverter for Rapper {
    fn convert(&self, turtle: &str, baseuri: &str) -> Result<String, VocabError> {
        let args = [
            "-q",
            "-i",
            "turtle",
            "-o",
            "rdfxml-abbrev",
            "-",
            baseuri,
        ]
        .map(String::from);
        run_filter(&self.program, &args, turtle.to_string())
    }
}
