use clap::{Parser, Subcommand};
use colored::*;
use std::process;

use figstory_cli::analyze::{run_analysis, AnalyzeOptions};
use figstory_cli::output::print_report;
use figstory_cli::{init_tracing, run_server, Config};

#[derive(Parser)]
#[command(name = "figstory")]
#[command(about = "Figstory - draft agile user stories from Figma designs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Import a Figma file and generate stories for its frames
    Analyze {
        /// Figma file, design or prototype link
        figma_url: String,
        /// Maximum number of frames to analyse
        #[arg(long)]
        limit: Option<usize>,
        /// Extra product context passed to the model
        #[arg(long)]
        context: Option<String>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    match command {
        Commands::Serve { port } => {
            if let Some(port) = port.filter(|p| *p != 0) {
                config.port = port;
            }
            println!("{}", "Starting Figstory server...".green().bold());
            println!(
                "{} http://{}:{}",
                "Server will run on".cyan(),
                config.host,
                config.port
            );
            println!("{} {}", "CORS origin:".cyan(), config.cors_origin);
            run_server(config).await
        }
        Commands::Analyze {
            figma_url,
            limit,
            context,
            json,
        } => {
            let options = AnalyzeOptions {
                figma_url,
                limit,
                context,
            };
            let report = run_analysis(&config.service, &options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
    }
}
