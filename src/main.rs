use clap::{Parser, Subcommand};
use grammar_synth::expander::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use grammar_synth::grammar::DEFAULT_ENTRY;
use grammar_synth::{ExpansionConfig, Grammar, Synthesizer, builtin};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Id under which a grammar passed with --grammar-file is registered
const FILE_GRAMMAR_ID: &str = "file";

/// Grammar-based code snippet synthesizer
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate text from a grammar
    Generate {
        /// Id of a bundled grammar
        #[arg(short, long, default_value = builtin::C_LIKE)]
        grammar: String,

        /// Load the grammar from a JSON file instead
        #[arg(long, conflicts_with = "grammar")]
        grammar_file: Option<PathBuf>,

        /// Entry point to expand
        #[arg(short, long, default_value = DEFAULT_ENTRY)]
        entry: String,

        /// Seed of the first sample; sample i uses seed + i
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Number of samples to generate
        #[arg(short, long, default_value_t = 1)]
        count: u64,

        /// Maximum reference depth
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_DEPTH as u64,
            value_parser = clap::value_parser!(u64).range(1..=MAX_DEPTH_LIMIT as u64)
        )]
        max_depth: u64,
    },

    /// List bundled grammars and their entry points
    List,

    /// Validate a grammar file
    Check {
        /// Path to the grammar file
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let mut synthesizer = Synthesizer::with_builtin()?;

    match cli.command {
        Commands::Generate {
            grammar,
            grammar_file,
            entry,
            seed,
            count,
            max_depth,
        } => {
            let grammar_id = match grammar_file {
                Some(path) => {
                    info!(path = %path.display(), "loading grammar file");
                    synthesizer.load_file(FILE_GRAMMAR_ID, &path)?;
                    FILE_GRAMMAR_ID.to_string()
                }
                None => grammar,
            };
            let synthesizer = synthesizer.with_config(ExpansionConfig::new(max_depth as usize)?);

            for i in 0..count {
                let text = synthesizer.synthesize(&grammar_id, &entry, seed.wrapping_add(i))?;
                println!("{}", text);
            }
        }
        Commands::List => {
            for id in synthesizer.grammar_ids() {
                if let Some(grammar) = synthesizer.grammar(id) {
                    println!("{}: {}", id, grammar.entry_points().join(", "));
                }
            }
        }
        Commands::Check { path } => {
            let grammar = Grammar::from_file(&path, synthesizer.registry().names())?;
            println!(
                "{}: {} rules, entry points: {}",
                path.display(),
                grammar.len(),
                grammar.entry_points().join(", ")
            );
        }
    }

    Ok(())
}
