//! APA checker binary
//!
//! Checks a manuscript, folds in saved model responses, and optionally
//! resolves every issue against a document tree snapshot. The JSON report
//! goes to stdout; logs go to stderr.

use anyhow::Context;
use apa_checker::{
    build_report, load_responses, load_structure, load_tree, parse_ai_source, AiSource, CheckInput,
};
use clap::Parser;
use compliance_engine::{ComplianceEngine, EngineConfig};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "apa-checker")]
#[command(version, about = "Check a manuscript against APA 7 formatting and citation rules")]
struct Args {
    /// Plain-text manuscript, one paragraph per line
    input: PathBuf,

    /// Engine configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Structure summary (JSON); derived from the text when omitted
    #[arg(long)]
    structure: Option<PathBuf>,

    /// Saved model response as <kind>=<path>, kind is content, structure or citations
    #[arg(long = "ai", value_parser = parse_ai_source)]
    ai: Vec<AiSource>,

    /// Document tree snapshot (ProseMirror JSON) to resolve positions against
    #[arg(long)]
    tree: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the report, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("apa-checker v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = ComplianceEngine::with_config(config);

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read manuscript: {}", args.input.display()))?;
    let structure = args.structure.as_deref().map(load_structure).transpose()?;
    let tree = args.tree.as_deref().map(load_tree).transpose()?;

    let input = CheckInput {
        text,
        structure,
        responses: load_responses(&args.ai),
        tree,
    };
    let report = build_report(&engine, &input);

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
