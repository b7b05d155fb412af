//! Quick phrase lookup from the command line.
//!
//! Usage:
//!   quickphrase --data-dir ~/.local/share/quickphrase
//!   quickphrase --data-dir data query sm
//!   quickphrase calc "(1+2)*3"
//!   quickphrase --data-dir data dump --prefix sm --format json
//!   quickphrase --data-dir data compile --output data/quickphrase

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use quickphrase_core::{
    calc, format_record, CandidateList, Config, Entry, QueryContext, QuickPhrase, WordListSpell,
};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quickphrase")]
#[command(about = "Look up quick phrases, evaluate arithmetic and inspect phrase files")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory holding QuickPhrase.mb and quickphrase.d/ (repeatable,
    /// highest priority first, searched before those in the config file)
    #[arg(short, long = "data-dir")]
    data_dir: Vec<PathBuf>,

    /// Language code reported to providers
    #[arg(short, long)]
    lang: Option<String>,

    /// Directory of <lang>.dict word lists for spell suggestions
    #[arg(long)]
    spell_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read queries from stdin, one per line (default)
    Repl,
    /// Print the candidates for a single query
    Query { input: String },
    /// Evaluate an arithmetic expression
    Calc { expr: String },
    /// List dictionary entries
    Dump {
        /// Only entries whose key starts with this prefix
        #[arg(short, long, default_value = "")]
        prefix: String,

        #[arg(short, long, value_enum, default_value_t = DumpFormat::Text)]
        format: DumpFormat,
    },
    /// Write the merged dictionary as <STEM>.fst and <STEM>.bincode
    Compile {
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    /// One record per line, readable as a phrase file
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quickphrase=info,quickphrase_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut args = Args::parse();
    let command = args.command.take().unwrap_or(Command::Repl);

    match command {
        Command::Calc { expr } => run_calc(&expr),
        Command::Repl => {
            let (engine, ctx) = build_engine(&args)?;
            run_repl(&engine, &ctx)
        }
        Command::Query { input } => {
            let (engine, ctx) = build_engine(&args)?;
            print_candidates(&engine.query(&ctx, &input));
            Ok(())
        }
        Command::Dump { prefix, format } => {
            let (engine, _) = build_engine(&args)?;
            run_dump(&engine, &prefix, format)
        }
        Command::Compile { output } => {
            let (engine, _) = build_engine(&args)?;
            run_compile(&engine, output)
        }
    }
}

fn build_engine(args: &Args) -> anyhow::Result<(QuickPhrase, QueryContext)> {
    let config = load_config(args)?;
    let mut engine = QuickPhrase::load(config).context("failed to load phrase dictionary")?;
    if let Some(dir) = &args.spell_dir {
        let spell = WordListSpell::load_dir(dir)
            .with_context(|| format!("failed to load spell word lists from {}", dir.display()))?;
        debug!(languages = ?spell.languages().collect::<Vec<_>>(), "spell backend ready");
        engine = engine.with_spell_backend(Arc::new(spell));
    }
    let ctx = match &args.lang {
        Some(lang) => QueryContext::with_language(lang.as_str()),
        None => QueryContext::new(),
    };
    Ok((engine, ctx))
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => Config::default(),
    };
    if !args.data_dir.is_empty() {
        let mut dirs = args.data_dir.clone();
        dirs.append(&mut config.data_dirs);
        config.data_dirs = dirs;
    }
    if config.data_dirs.is_empty() {
        warn!("no data directories configured, dictionary will be empty");
    }
    Ok(config)
}

fn run_calc(expr: &str) -> anyhow::Result<()> {
    match calc::evaluate(expr) {
        Some(value) => {
            println!("{}", calc::format_number(value));
            Ok(())
        }
        None => anyhow::bail!("not an arithmetic expression: {expr}"),
    }
}

fn run_repl(engine: &QuickPhrase, ctx: &QueryContext) -> anyhow::Result<()> {
    info!(
        entries = engine.dictionary().len(),
        providers = ?engine.providers(),
        "ready"
    );
    println!("Type a key and press Enter. Ctrl+D to exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let raw = line?;
        let input = raw.trim();
        if input.is_empty() {
            continue;
        }
        print_candidates(&engine.query(ctx, input));
        println!();
    }
    Ok(())
}

fn print_candidates(list: &CandidateList) {
    if list.is_empty() {
        println!("  → (no candidates)");
        return;
    }
    for (i, c) in list.iter().enumerate() {
        let marker = if c.is_auto_commit() { " [auto]" } else { "" };
        println!("  {}. {}  → {:?}{}", i + 1, c.label, c.commit_text, marker);
    }
}

fn run_dump(engine: &QuickPhrase, prefix: &str, format: DumpFormat) -> anyhow::Result<()> {
    let dictionary = engine.dictionary();
    match format {
        DumpFormat::Text => {
            for entry in dictionary.lookup(prefix) {
                match format_record(&entry.key, &entry.phrase) {
                    Some(line) => println!("{line}"),
                    None => warn!(key = %entry.key, "key cannot be written as a record"),
                }
            }
        }
        DumpFormat::Json => {
            let entries: Vec<Entry> = dictionary.lookup(prefix).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn run_compile(engine: &QuickPhrase, stem: PathBuf) -> anyhow::Result<()> {
    let dictionary = engine.dictionary();
    let fst_path = stem.with_extension("fst");
    let payload_path = stem.with_extension("bincode");
    dictionary
        .save_artifacts(&fst_path, &payload_path)
        .context("failed to write dictionary artifacts")?;
    info!(
        entries = dictionary.len(),
        keys = dictionary.key_count(),
        fst = %fst_path.display(),
        payloads = %payload_path.display(),
        "dictionary compiled"
    );
    Ok(())
}
