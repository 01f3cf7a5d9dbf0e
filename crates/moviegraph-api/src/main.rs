//! CLI entry point for the movie graph API.
//!
//! Acts as a thin transport: reads one JSON request from stdin, writes the
//! JSON response (or an error document) to stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

use moviegraph_api::config::load_graph_config;
use moviegraph_api::{ApiError, MovieApi, Operation};
use moviegraph_graph::Neo4jStore;

#[derive(Parser)]
#[command(name = "moviegraph")]
#[command(about = "Typed movie API over a Neo4j graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: moviegraph).
    #[arg(short, long, default_value = "moviegraph", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// List movies. Reads `{"where": ..., "options": ...}` from stdin.
    Movies,
    /// Create a movie and its actors. Reads a CreateMovieInput from stdin.
    CreateMovie,
    /// Attach an actor to a movie by title. Reads an AddActorInput from stdin.
    AddActor,
}

impl Command {
    fn operation(&self) -> Operation {
        match self {
            Self::Movies => Operation::Movies,
            Self::CreateMovie => Operation::CreateMovie,
            Self::AddActor => Operation::AddActor,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let input = std::io::read_to_string(std::io::stdin())?;

    match execute(&cli, &input).await {
        Ok(response) => {
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", e.payload());
            Err(e.into())
        }
    }
}

async fn execute(cli: &Cli, input: &str) -> Result<Value, ApiError> {
    let payload = if input.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(input)?
    };

    let graph_config = load_graph_config(&cli.config)?;
    let store = Neo4jStore::connect(&graph_config).await?;

    let api = MovieApi::new(store);
    api.dispatch(cli.command.operation(), payload).await
}
