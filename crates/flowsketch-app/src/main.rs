//! Main application entry point.

use clap::{Parser, Subcommand};
use flowsketch_app::bridge::{BRIDGE_URL_ENV, DEFAULT_BRIDGE_URL};
use flowsketch_app::{App, AppConfig, AppResult};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "flowsketch", about = "FlowSketch flowchart sketching shell")]
struct Cli {
    /// Base URL of the SVG rendering service.
    #[arg(long, env = BRIDGE_URL_ENV, default_value = DEFAULT_BRIDGE_URL)]
    bridge_url: String,

    /// Never contact the rendering service.
    #[arg(long)]
    offline: bool,

    /// Background of rendered SVG documents ("none" for transparent).
    #[arg(long, default_value = "white")]
    background: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an editing script and export the result.
    Replay {
        /// Script file (JSON array of steps).
        script: PathBuf,
        /// Interchange document to start from.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Write the interchange document here instead of stdout.
        #[arg(long)]
        out_json: Option<PathBuf>,
        /// Also render the result to this SVG file.
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Render an interchange document to SVG.
    Render {
        /// Interchange document.
        document: PathBuf,
        /// Write the SVG here instead of stdout.
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig {
        background: cli.background,
        bridge_url: cli.bridge_url,
        offline: cli.offline,
        ..AppConfig::default()
    };
    let mut app = App::new(config);

    match cli.command {
        Command::Replay {
            script,
            input,
            out_json,
            svg,
        } => {
            if let Some(input) = input {
                let report = app.load_document(&input)?;
                log::info!("Loaded {} shapes from {}", report.shapes.len(), input.display());
            }
            let summary = app.run_script_file(&script)?;
            log::info!(
                "{} steps, {} redraws, {} texts",
                summary.steps,
                summary.redraws,
                summary.texts
            );

            match out_json {
                Some(path) => app.save_document(&path)?,
                None => println!("{}", serde_json::to_string_pretty(&app.export())?),
            }
            if let Some(path) = svg {
                let client = app.bridge_client()?;
                app.save_svg(&client, &path).await?;
            }
        }
        Command::Render { document, svg } => {
            let report = app.load_document(&document)?;
            if report.skipped > 0 {
                eprintln!("warning: skipped {} records", report.skipped);
            }
            let client = app.bridge_client()?;
            match svg {
                Some(path) => {
                    app.save_svg(&client, &path).await?;
                }
                None => println!("{}", app.render_svg(&client).await?.svg),
            }
        }
    }
    Ok(())
}
