use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use pentaforge::config::FitnessWeights;
use pentaforge::geometry::{KeyboardDefinition, KeyboardGeometry};
use pentaforge::scorer::{Scorer, ScorerBuilder};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keyboard definition JSON. Uses the built-in 47-key board when omitted.
    #[arg(global = true, short = 'g', long)]
    geometry: Option<String>,

    #[arg(global = true, short, long, default_value = "data/unigrams.csv")]
    unigrams: String,

    #[arg(global = true, short, long, default_value = "data/pentagrams.csv")]
    pentagrams: String,

    #[arg(global = true, long)]
    weights: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Search(cmd::search::SearchArgs),
    Validate(cmd::validate::ValidateArgs),
}

fn fatal(context: &str, e: impl std::fmt::Display) -> ! {
    error!("❌ {}: {}", context, e);
    process::exit(1);
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing PentaForge...");

    let geometry = match &cli.geometry {
        Some(path) => {
            info!("📂 Loading Keyboard: {}", path);
            let def = KeyboardDefinition::load_from_file(path)
                .unwrap_or_else(|e| fatal("Cannot load keyboard", e));
            if !def.meta.name.is_empty() {
                info!("   {} ({} keys)", def.meta.name, def.geometry.key_count());
            }
            def.geometry
        }
        None => {
            info!("📂 Using built-in 47-key board");
            KeyboardGeometry::standard()
        }
    };

    let (cli_weights, sub_name) = match &cli.command {
        Commands::Search(args) => (&args.config.weights, "search"),
        Commands::Validate(args) => (&args.weights, "validate"),
    };

    let weights = match &cli.weights {
        Some(path) => {
            info!("⚖️  Loading Weights from: {}", path);
            let mut file_weights = FitnessWeights::load_from_file(path)
                .unwrap_or_else(|e| fatal("Cannot load weights", e));
            if let Some(sub_matches) = matches.subcommand_matches(sub_name) {
                file_weights.merge_from_cli(cli_weights, sub_matches);
            }
            file_weights
        }
        None => {
            warn!("⚠️  No external weights loaded. Using command line values.");
            cli_weights.clone()
        }
    };

    let scorer: Arc<Scorer> = ScorerBuilder::new()
        .with_geometry(geometry)
        .with_weights(weights)
        .with_corpus_from_files(&cli.unigrams, &cli.pentagrams)
        .and_then(ScorerBuilder::build)
        .map(Arc::new)
        .unwrap_or_else(|e| fatal("FATAL ERROR INITIALIZING SCORER", e));

    let outcome = match cli.command {
        Commands::Search(args) => cmd::search::run(args, scorer),
        Commands::Validate(args) => cmd::validate::run(args, scorer),
    };

    if let Err(e) = outcome {
        fatal("Command failed", e);
    }
}
