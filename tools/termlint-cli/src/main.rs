//! Termlint command-line tool
//!
//! Checks documents against a terminology dictionary and maintains the
//! dictionary file.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::json;
use termlint::{
    AnalysisConfig, AnalysisReport, AnalysisSession, Finding, MatchType, RuleMatcher,
    SemanticBackend, SemanticOutcome, TermDictionary, highlight_term,
};
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;

/// Default model directory
fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termlint")
        .join("model")
}

/// CLI arguments
#[derive(Parser)]
#[command(name = "termlint")]
#[command(about = "Check documents against a controlled terminology dictionary")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more .docx/.pdf documents
    Analyze(AnalyzeArgs),
    /// Inspect or rewrite a dictionary file
    #[command(subcommand)]
    Dictionary(DictionaryCommands),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Documents to check
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Terminology dictionary CSV
    #[arg(short, long, env = "TERMLINT_DICTIONARY")]
    dictionary: PathBuf,

    /// Directory for per-document CSV reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Run semantic search on sentences without rule hits
    #[arg(short, long)]
    semantic: bool,

    /// Semantic corpus CSV (wrong_usage, approved_term, comment)
    #[arg(long, env = "TERMLINT_CORPUS")]
    corpus: Option<PathBuf>,

    /// Sentence embedding model directory
    #[arg(long, env = "TERMLINT_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Use the character-trigram embedder instead of the neural model
    #[arg(long)]
    lexical: bool,

    /// Minimum cosine similarity for a semantic hit
    #[arg(long, default_value_t = termlint::DEFAULT_SEMANTIC_THRESHOLD)]
    semantic_threshold: f32,

    /// Maximum semantic hits per sentence
    #[arg(long, default_value_t = termlint::DEFAULT_TOPN)]
    topn: usize,

    /// Reserved for fuzzy matching; accepted but not applied
    #[arg(long, default_value_t = termlint::DEFAULT_FUZZY_THRESHOLD)]
    fuzzy_threshold: u8,

    /// Print one JSON object per document instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum DictionaryCommands {
    /// Load a dictionary and report problems
    Check {
        /// Dictionary CSV
        path: PathBuf,
    },
    /// Rewrite a dictionary with trimmed values and canonical separators
    Normalize {
        /// Dictionary CSV
        path: PathBuf,

        /// Output file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => analyze(args),
        Commands::Dictionary(DictionaryCommands::Check { path }) => check_dictionary(&path),
        Commands::Dictionary(DictionaryCommands::Normalize { path, output }) => {
            normalize_dictionary(&path, output.as_deref())
        }
    }
}

impl AnalyzeArgs {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig::new()
            .with_semantic(self.semantic)
            .with_semantic_threshold(self.semantic_threshold)
            .with_topn(self.topn)
            .with_fuzzy_threshold(self.fuzzy_threshold)
    }

    fn backend(&self) -> SemanticBackend {
        if self.lexical {
            SemanticBackend::Lexical
        } else {
            SemanticBackend::Neural {
                model_dir: self.model_dir.clone().unwrap_or_else(default_model_dir),
            }
        }
    }
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    let mut session = AnalysisSession::new(args.config()).with_backend(args.backend());
    if let Some(corpus) = &args.corpus {
        session = session.with_corpus(corpus);
    } else if args.semantic {
        warn!("--semantic given without --corpus; semantic results will be unavailable");
    }

    session
        .load_dictionary(&args.dictionary)
        .with_context(|| format!("failed to load dictionary {}", args.dictionary.display()))?;

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let mut names = ReportNames::default();
    let mut failed = 0usize;
    for document in &args.documents {
        let report = match session.analyze(document) {
            Ok(report) => report,
            Err(err) => {
                error!(document = %document.display(), error = %err, "analysis failed");
                failed += 1;
                continue;
            }
        };

        if args.json {
            print_json(document, report)?;
        } else {
            print_report(document, report);
        }
        if let Some(dir) = &args.output_dir {
            write_reports(dir, &names.claim(document), report)?;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} document(s) could not be analyzed", args.documents.len());
    }
    Ok(())
}

fn print_report(document: &Path, report: &AnalysisReport) {
    println!("{}", document.display());
    for finding in report.findings() {
        match finding {
            Finding::Rule(m) => {
                let marker = match m.match_type {
                    MatchType::WrongUsage => "wrong",
                    MatchType::ValidTerm => "ok",
                };
                println!(
                    "  p.{:<3} {marker:<5} {} -> {}: {}",
                    m.page,
                    m.found_term,
                    m.approved_term,
                    highlight_term(&m.context, &m.found_term, "[", "]")
                );
            }
            Finding::Semantic(s) => {
                println!(
                    "  p.{:<3} {:<5} {} -> {} ({:.3}): {}",
                    s.page, "like", s.wrong_usage, s.approved_term, s.score, s.sentence
                );
                if !s.comment.is_empty() {
                    println!("         {}", s.comment);
                }
            }
        }
    }

    let summary = report.summary();
    println!(
        "  {} sentence(s): {} wrong usage(s), {} valid term(s), {} unmatched",
        summary.sentences, summary.wrong_usages, summary.valid_terms, summary.unmatched
    );
    match &report.semantic {
        SemanticOutcome::Disabled => {}
        SemanticOutcome::Completed(results) => {
            println!("  semantic: {} similar known error(s)", results.len());
        }
        SemanticOutcome::Unavailable { reason } => println!("  semantic: unavailable ({reason})"),
    }
}

fn print_json(document: &Path, report: &AnalysisReport) -> Result<()> {
    let semantic = match &report.semantic {
        SemanticOutcome::Disabled => json!({ "status": "disabled" }),
        SemanticOutcome::Completed(results) => json!({ "status": "completed", "results": results }),
        SemanticOutcome::Unavailable { reason } => json!({ "status": "unavailable", "reason": reason }),
    };
    let output = json!({
        "document": document.display().to_string(),
        "summary": report.summary(),
        "matches": report.matches(),
        "unmatched": report.unmatched(),
        "semantic": semantic,
    });
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

/// Report file stems already used in this run.
#[derive(Default)]
struct ReportNames {
    used: HashSet<String>,
}

impl ReportNames {
    /// Returns the document's file stem, suffixed `_2`, `_3`, ... when an
    /// earlier document in the run already took it.
    fn claim(&mut self, document: &Path) -> String {
        let stem = document
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let mut name = stem.to_string();
        let mut n = 2;
        while !self.used.insert(name.clone()) {
            name = format!("{stem}_{n}");
            n += 1;
        }
        name
    }
}

fn create_report(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

fn write_reports(dir: &Path, stem: &str, report: &AnalysisReport) -> Result<()> {
    let rule_path = dir.join(format!("{stem}_rules.csv"));
    report
        .write_rule_csv(create_report(&rule_path)?)
        .with_context(|| format!("failed to write {}", rule_path.display()))?;
    info!(path = %rule_path.display(), "wrote rule report");

    if report.semantic.is_completed() {
        let semantic_path = dir.join(format!("{stem}_semantic.csv"));
        report
            .write_semantic_csv(create_report(&semantic_path)?)
            .with_context(|| format!("failed to write {}", semantic_path.display()))?;
        info!(path = %semantic_path.display(), "wrote semantic report");
    }
    Ok(())
}

fn check_dictionary(path: &Path) -> Result<()> {
    let dictionary = TermDictionary::load_csv(path)
        .with_context(|| format!("failed to load dictionary {}", path.display()))?;
    let matcher = RuleMatcher::new(&dictionary).context("failed to compile dictionary patterns")?;

    let duplicates = dictionary.duplicates();
    let contradictory: Vec<_> = dictionary
        .iter()
        .filter(|e| e.is_self_contradictory())
        .collect();

    println!("{}: {} entries, {} compiled", path.display(), dictionary.len(), matcher.len());
    for entry in &duplicates {
        println!("  duplicate approved_term: {}", entry.approved_term);
    }
    for entry in &contradictory {
        println!("  approved_term listed as wrong usage: {}", entry.approved_term);
    }
    if duplicates.is_empty() && contradictory.is_empty() {
        println!("  no problems found");
    }
    Ok(())
}

fn normalize_dictionary(path: &Path, output: Option<&Path>) -> Result<()> {
    let dictionary = TermDictionary::load_csv(path)
        .with_context(|| format!("failed to load dictionary {}", path.display()))?;
    let target = output.unwrap_or(path);
    dictionary
        .save_csv(target)
        .with_context(|| format!("failed to write {}", target.display()))?;
    println!("{} entries written to {}", dictionary.len(), target.display());
    Ok(())
}
