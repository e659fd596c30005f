use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use block_schedule::aggregate::Aggregator;
use block_schedule::config::Config;
use block_schedule::models::schedule_table;
use block_schedule::state::{ScheduleController, View};
use block_schedule::{api, render};

#[derive(Parser)]
#[command(name = "blocks")]
#[command(about = "Festival schedule cards from block resources")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL or directory holding the block resources
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the resources once and print the cards for a day
    Show {
        /// Day code (A-G); unknown codes show day A
        #[arg(short, long)]
        day: Option<String>,

        /// Print the view as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Serve the schedule over HTTP
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Load the resources before accepting requests
        #[arg(long)]
        preload: bool,
    },
    /// Print the day-to-block table
    Days,
}

/// Initialize tracing with output to stderr (for `show`) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "block_schedule=info,tower_http=info".into()),
    );

    if use_stderr {
        // Show mode: keep stdout clean for the cards
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn build_controller(config: &Config) -> anyhow::Result<ScheduleController> {
    let aggregator = Aggregator::from_config(config)?;
    Ok(ScheduleController::new(aggregator, config.initial_day))
}

async fn serve(config: Config, preload: bool) -> anyhow::Result<()> {
    let controller = build_controller(&config)?;
    if preload {
        let view = controller.on_load_requested().await;
        tracing::info!("Preload finished: {}", view);
    }

    let app = api::create_router(controller);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!(
        "Block schedule server listening on http://127.0.0.1:{}",
        config.port
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, Some(Commands::Show { .. }));
    init_tracing(use_stderr);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config.source = source;
    }

    match cli.command {
        Some(Commands::Show { day, json }) => {
            let controller = build_controller(&config)?;
            if let Some(day) = day {
                controller.on_day_selected(&day);
            }

            let view = controller.on_load_requested().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::render_view(&view));
            }

            if matches!(view, View::LoadError { .. }) {
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { port, preload }) => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config, preload).await?;
        }
        Some(Commands::Days) => {
            for row in schedule_table() {
                let blocks: Vec<String> = row.blocks.iter().map(|b| b.to_string()).collect();
                println!("{}: {}", row.day, blocks.join(", "));
            }
        }
        None => {
            // Default: start server
            serve(config, false).await?;
        }
    }

    Ok(())
}
