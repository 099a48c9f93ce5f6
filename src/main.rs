use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cell_predictor::{Dashboard, DashboardConfig, InputVector, UiEvent, server};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cell-predictor",
    version,
    about = "Interactive breast cancer cell-measurement dashboard"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the dashboard page
    Serve {
        #[command(flatten)]
        paths: PathArgs,

        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8501")]
        addr: SocketAddr,
    },

    /// Predict a single input and print the result
    Predict {
        #[command(flatten)]
        paths: PathArgs,

        /// JSON object mapping every feature column to a value (defaults to the dataset means)
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Print the slider controls derived from the dataset
    Controls {
        #[command(flatten)]
        paths: PathArgs,
    },
}

#[derive(Debug, Args)]
struct PathArgs {
    /// Dataset CSV
    #[arg(long, default_value = "data.csv")]
    data: PathBuf,

    /// Trained model artifact (MessagePack)
    #[arg(long, default_value = "model.msgpack")]
    model: PathBuf,

    /// Fitted scaler artifact (MessagePack)
    #[arg(long, default_value = "scaler.msgpack")]
    scaler: PathBuf,

    /// Stylesheet injected into the page
    #[arg(long, default_value = "assets/style.css")]
    stylesheet: PathBuf,
}

impl From<PathArgs> for DashboardConfig {
    fn from(args: PathArgs) -> Self {
        DashboardConfig {
            data_path: args.data,
            model_path: args.model,
            scaler_path: args.scaler,
            stylesheet_path: args.stylesheet,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load(paths: PathArgs) -> anyhow::Result<Dashboard> {
    let config = DashboardConfig::from(paths);
    Dashboard::load(&config).context("failed to start dashboard")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Serve { paths, addr } => {
            let dashboard = Arc::new(load(paths)?);
            let app = server::router(dashboard);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            log::info!("🩺 Dashboard listening on http://{addr}");
            axum::serve(listener, app).await?;
        }
        Command::Predict { paths, input } => {
            let dashboard = load(paths)?;
            let event = match input {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {path:?}"))?;
                    let values: HashMap<String, f64> = serde_json::from_str(&raw)
                        .with_context(|| format!("{path:?} is not a JSON object of numbers"))?;
                    UiEvent::SliderChange(InputVector::from_map(&values, dashboard.stats())?)
                }
                None => UiEvent::PageLoad,
            };
            let plan = dashboard.handle(event)?;
            println!("{}", plan.prediction);
        }
        Command::Controls { paths } => {
            let dashboard = load(paths)?;
            for c in dashboard.controls() {
                println!(
                    "{:>26} | min: {:>8.4}, max: {:>10.4}, default: {:>10.4}",
                    c.label, c.min, c.max, c.value
                );
            }
        }
    }

    Ok(())
}
