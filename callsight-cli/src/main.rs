use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod seed;

use callsight_mcp::{AnalysisService, CallsightServer};
use callsight_store::TranscriptStore;

#[derive(Parser, Debug)]
#[command(name = "callsight", version)]
#[command(about = "Callsight - call transcript analysis over MCP")]
struct Cli {
    /// Path to the SQLite database.
    #[arg(long, default_value = "callsight.db", global = true)]
    db: PathBuf,

    /// Emit logs as JSON instead of human-readable lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server on stdio
    Serve,
    /// Create the database and insert the sample call transcripts
    Init,
    /// Classify one stored transcript and persist the result
    Analyze {
        /// Transcript id to analyze
        #[arg(long)]
        transcript_id: i64,
    },
    /// Print stored transcript summaries as JSON
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.log_json);

    let store = match TranscriptStore::open(&cli.db) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(db = %cli.db.display(), error = %e, "Failed to open database");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Serve => {
            let server = CallsightServer::new(AnalysisService::new(store));
            if let Err(e) = server.serve_stdio().await {
                tracing::error!(error = %e, "MCP server failed");
                std::process::exit(1);
            }
        }
        Commands::Init => match seed::seed(&store) {
            Ok(ids) => {
                println!("Database initialized at {}", cli.db.display());
                for id in ids {
                    println!("  created transcript {id}");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Seeding failed");
                std::process::exit(1);
            }
        },
        Commands::Analyze { transcript_id } => {
            let service = AnalysisService::new(store);
            match service.analyze(transcript_id.into()) {
                Ok(outcome) => match serde_json::to_string_pretty(&outcome) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to render analysis");
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    tracing::error!(transcript_id, error = %e, "Analysis failed");
                    std::process::exit(1);
                }
            }
        }
        Commands::List => match store.list_transcripts() {
            Ok(summaries) => match serde_json::to_string_pretty(&summaries) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to render transcript list");
                    std::process::exit(1);
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Listing failed");
                std::process::exit(1);
            }
        },
    }
}

/// Install the global subscriber. When serving, stdout belongs to the MCP
/// transport; logs always go to stderr, as JSON when requested.
fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_json_flag_parses_globally() {
        let cli = Cli::try_parse_from(["callsight", "--log-json", "list"]).unwrap();
        assert!(cli.log_json);

        let cli = Cli::try_parse_from(["callsight", "serve", "--log-json"]).unwrap();
        assert!(cli.log_json);

        let cli = Cli::try_parse_from(["callsight", "list"]).unwrap();
        assert!(!cli.log_json);
    }
}
