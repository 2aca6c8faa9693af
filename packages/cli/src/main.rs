//! `vweft` — build, check and render controlled vocabularies.
//!
//! Provides four subcommands:
//!
//! - **`build`** — publish one vocabulary (or `ALL`) from the definitions file.
//! - **`check`** — parse a single source file and print a summary.
//! - **`render`** — print one rendering of a configured vocabulary to stdout.
//! - **`index`** — write the `index.html` of a published vocabulary tree.
//!
//! Exit status is 0 on success, 1 when a vocabulary source or definition
//! needs fixing, and 2 for anything else (bad arguments, failing external
//! tools, I/O).

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use vocabweft::rdf::format_for_path;
use vocabweft::render::{html::render_html, json::render_json, turtle::render_turtle};
use vocabweft::{
    index, CommandNormalizer, Config, Flavour, PassThrough, Predicate, Publisher, Rapper,
    SkosNormalizer, VocabError, Vocabulary, VocabularyMeta, DEFAULT_ROOT_URI,
};

/// vweft — controlled vocabulary builder
///
/// Turns vocabulary term lists into Turtle, RDF/XML, HTML and JSON.
#[derive(Parser)]
#[command(name = "vweft", version, about, long_about = None)]
struct Cli {
    /// Vocabulary definitions file.
    #[arg(long, global = true, env = "VWEFT_CONFIG", default_value = "vocabs.json")]
    config: PathBuf,

    /// Common root of the vocabulary URIs.
    #[arg(long, global = true, env = "VWEFT_ROOT_URI", value_name = "URI")]
    root_uri: Option<String>,

    /// Program that reshapes RDF sources into SKOS before loading; it reads
    /// and writes N-Triples.
    #[arg(long, global = true, env = "VWEFT_SKOS_NORMALIZER", value_name = "PROGRAM")]
    skos_normalizer: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish a vocabulary below the destination directory.
    ///
    /// Use ALL to rebuild every vocabulary in the definitions file; failures
    /// are logged and the remaining vocabularies are still built.
    Build {
        /// Vocabulary name, or ALL.
        name: String,

        /// Create the output hierarchy below PATH.
        #[arg(long, env = "VWEFT_DEST_DIR", default_value = "build", value_name = "PATH")]
        dest_dir: PathBuf,

        /// Program used to produce RDF/XML from Turtle; `none` skips RDF/XML.
        #[arg(long, env = "VWEFT_RDFXML", default_value = "rapper", value_name = "PROGRAM")]
        rdfxml_converter: String,
    },

    /// Parse a source file and print a summary of its terms.
    ///
    /// Files ending in `.nt`, `.ttl` or `.rdf` are read as RDF, anything else
    /// as records.
    Check {
        /// Path to the source file.
        file: PathBuf,

        /// RDF Class | RDF Property | SKOS
        #[arg(long, default_value = "RDF Class")]
        flavour: Flavour,

        /// Treat every term as preliminary.
        #[arg(long)]
        draft: bool,

        /// Vocabulary URI; term subjects of RDF sources must live in `<URI>#`.
        #[arg(long, value_name = "URI")]
        baseuri: Option<String>,
    },

    /// Print one rendering of a configured vocabulary.
    Render {
        /// Vocabulary name.
        name: String,

        #[arg(long, value_enum, default_value_t = Format::Turtle)]
        format: Format,
    },

    /// Write `index.html` listing every vocabulary below DIR.
    ///
    /// Each directory holding a `META.INF` is one vocabulary.
    Index {
        /// Root of the published vocabulary tree.
        dir: PathBuf,

        /// Page template; `VOCAB_LIST_HERE` marks where the table goes.
        #[arg(long, default_value = "index.template", value_name = "PATH")]
        template: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Turtle,
    Html,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vocabweft=info,vweft=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let normalizer: Box<dyn SkosNormalizer> = match &cli.skos_normalizer {
        Some(program) => Box::new(CommandNormalizer {
            program: program.clone(),
            args: Vec::new(),
        }),
        None => Box::new(PassThrough),
    };

    let result = match &cli.command {
        Command::Build {
            name,
            dest_dir,
            rdfxml_converter,
        } => build(&cli, name, dest_dir, rdfxml_converter, normalizer.as_ref()),
        Command::Check {
            file,
            flavour,
            draft,
            baseuri,
        } => check(file, *flavour, *draft, baseuri.as_deref(), normalizer.as_ref()),
        Command::Render { name, format } => render(&cli, name, *format, normalizer.as_ref()),
        Command::Index { dir, template } => write_index(&cli, dir, template),
    };

    if let Err(err) = result {
        fail(&err);
    }
}

fn build(
    cli: &Cli,
    name: &str,
    dest_dir: &Path,
    converter: &str,
    normalizer: &dyn SkosNormalizer,
) -> Result<(), VocabError> {
    let config = Config::from_file(&cli.config, cli.root_uri.as_deref())?;
    tracing::debug!(config = %cli.config.display(), dest = %dest_dir.display(), "building");
    let mut publisher = Publisher::new(dest_dir);
    if converter != "none" {
        publisher = publisher.with_converter(Box::new(Rapper {
            program: converter.to_string(),
        }));
    }

    if name != "ALL" {
        let dir = publisher.build(&config, name, normalizer)?;
        println!("{}", dir.display());
        return Ok(());
    }

    let report = publisher.build_all(&config, normalizer);
    for name in &report.built {
        println!("built {name}");
    }
    if report.is_success() {
        return Ok(());
    }
    for (name, err) in &report.failed {
        eprintln!("*** While building {name}: {err}");
    }
    let code = if report.failed.iter().all(|(_, e)| e.is_reportable()) {
        1
    } else {
        2
    };
    process::exit(code)
}

fn check(
    file: &Path,
    flavour: Flavour,
    draft: bool,
    baseuri: Option<&str>,
    normalizer: &dyn SkosNormalizer,
) -> Result<(), VocabError> {
    let text = fs::read_to_string(file).map_err(|e| VocabError::UnreadableSource {
        path: file.to_path_buf(),
        reason: e.to_string(),
    })?;
    let name = file
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("unnamed");
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    let mut meta =
        VocabularyMeta::new(name, name, "Unpublished source.", "unknown", today)?.with_draft(draft);
    if let Some(baseuri) = baseuri {
        meta = meta.with_baseuri(baseuri)?;
    }

    let source_name = file.display().to_string();
    let vocab = match format_for_path(file) {
        Some(format) => {
            Vocabulary::from_rdf(meta, flavour, &source_name, &text, format, normalizer)?
        }
        None => Vocabulary::from_records(meta, flavour, &source_name, &text)?,
    };

    print!("{}", summary(&source_name, &vocab));
    Ok(())
}

fn summary(source_name: &str, vocab: &Vocabulary) -> String {
    let terms = vocab.sorted_terms();
    let top_level = terms.iter().filter(|t| vocab.wider(t).is_empty()).count();
    let count = |p: Predicate| terms.iter().filter(|t| t.has_flag(p)).count();
    let widest = terms
        .iter()
        .map(|t| (vocab.narrower(t.identifier()).len(), t.identifier()))
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(a.1)));

    let mut out = format!("{source_name}: {} terms ({})\n", terms.len(), vocab.flavour());
    out.push_str(&format!("  top-level:   {top_level}\n"));
    out.push_str(&format!("  preliminary: {}\n", count(Predicate::Preliminary)));
    out.push_str(&format!("  deprecated:  {}\n", count(Predicate::Deprecated)));
    if let Some((n, id)) = widest.filter(|(n, _)| *n > 0) {
        out.push_str(&format!("  most narrower terms: {id} ({n})\n"));
    }
    out
}

fn render(
    cli: &Cli,
    name: &str,
    format: Format,
    normalizer: &dyn SkosNormalizer,
) -> Result<(), VocabError> {
    let config = Config::from_file(&cli.config, cli.root_uri.as_deref())?;
    let vocab = config.resolve(name)?.load(normalizer)?;
    let text = match format {
        Format::Turtle => render_turtle(&vocab),
        Format::Html => render_html(&vocab),
        Format::Json => render_json(&vocab)?,
    };
    print!("{text}");
    Ok(())
}

fn write_index(cli: &Cli, dir: &Path, template: &Path) -> Result<(), VocabError> {
    let template = index::read_template(template)?;
    let root_uri = cli.root_uri.as_deref().unwrap_or(DEFAULT_ROOT_URI);
    let path = index::write_index(dir, &template, root_uri)?;
    println!("{}", path.display());
    Ok(())
}

/// Print `err` to stderr and exit: 1 for problems in the vocabulary sources,
/// 2 for everything else.
fn fail(err: &VocabError) -> ! {
    if err.is_reportable() {
        eprintln!("*** Fatal: {err}");
        process::exit(1);
    }
    eprintln!("vweft: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    process::exit(2);
}
