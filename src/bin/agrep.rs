//! agrep Binary
//!
//! Finds the first anagram of a pattern in a text file, optionally building
//! a reusable index file, or answers from a previously built index.

use std::path::PathBuf;

use agrep::finder::find_anagram;
use agrep::{AgrepError, Config, Engine, FileFormat};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// agrep
#[derive(Parser, Debug)]
#[command(name = "agrep")]
#[command(about = "Find an anagram of a pattern in a file of lines")]
#[command(version)]
struct Args {
    /// Text file to scan, or an index file (.idx) built earlier
    file: PathBuf,

    /// Text pattern whose anagram is searched for
    pattern: String,

    /// Index every line and dump the index next to the text file
    #[arg(long)]
    create_index: bool,

    /// Write the index without a superblock (page blocks only)
    #[arg(long)]
    raw_format: bool,

    /// Hash seed for new indexes (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0x1234", value_parser = parse_seed)]
    seed: u32,

    /// Print arena page usage after the search
    #[arg(long)]
    stats: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,agrep=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        tracing::error!("agrep failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> agrep::Result<()> {
    let format = if args.raw_format {
        FileFormat::Raw
    } else {
        FileFormat::Superblock
    };

    let config = Config::builder()
        .hash_seed(args.seed)
        .file_format(format)
        .build();

    let mut engine = Engine::new(config)?;

    match find_anagram(&mut engine, &args.pattern, &args.file, args.create_index)? {
        Some(found) => match found.text {
            Some(text) => println!("Anagram found: [{}] {}", found.line, text),
            None => println!("Anagram found: [{}]", found.line),
        },
        None => println!("Anagram not found..."),
    }

    if args.stats {
        println!("\n{}", engine.memory_stats());
    }

    Ok(())
}

fn parse_seed(input: &str) -> Result<u32, AgrepError> {
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|e| AgrepError::Config(format!("invalid seed '{}': {}", input, e)))
}
