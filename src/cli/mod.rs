//! Downtime predictor CLI module
//!
//! Command-line entry points: run the server, or train and predict offline
//! against the same model file the server uses.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{Dataset, TARGET_COLUMN};
use crate::export::ModelStore;
use crate::inference::{predict_one, PredictionInput};
use crate::training::{round2, TrainEngine, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "downtime-predictor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train a decision tree on equipment data and predict next-day downtime")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    Serve {
        /// Server port
        #[arg(short, long, env = "API_PORT", default_value = "8000")]
        port: u16,

        /// Server host
        #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Model file
        #[arg(short, long, env = "MODEL_PATH", default_value = "model.bin")]
        model_path: PathBuf,
    },

    /// Train a model from a CSV file and write the model file
    Train {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Output model file
        #[arg(short, long, env = "MODEL_PATH", default_value = "model.bin")]
        output: PathBuf,
    },

    /// Predict downtime for one set of readings
    Predict {
        /// Trained model file
        #[arg(short, long, env = "MODEL_PATH", default_value = "model.bin")]
        model: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        min_temp: f64,

        #[arg(long, allow_negative_numbers = true)]
        max_temp: f64,

        #[arg(long, allow_negative_numbers = true)]
        leakage: f64,

        #[arg(long, allow_negative_numbers = true)]
        electricity: f64,
    },

    /// Show data information
    Info {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(data_path: &Path, output: &Path) -> anyhow::Result<()> {
    section("Train");

    step_run("Loading data");
    let start = Instant::now();
    let dataset = Dataset::from_csv_path(data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", dataset.height(), dataset.width(), start.elapsed()));

    step_run(&format!("Training {}", "decision_tree".cyan()));
    let start = Instant::now();
    let model = TrainEngine::new(TrainingConfig::default()).fit(&dataset)?;
    step_done(&format!("{:?}", start.elapsed()));

    step_run(&format!("Saving → {}", output.display()));
    ModelStore::new(output).save(&model)?;
    step_done("");

    println!();
    println!("  {:<16} {}", muted("Accuracy"), format!("{:.2}", round2(model.metrics.accuracy)).white().bold());
    println!("  {:<16} {}", muted("F1 score"), format!("{:.2}", round2(model.metrics.f1_score)).white().bold());
    println!("  {:<16} {}", muted("Tree depth"), model.tree.get_depth());
    println!("  {:<16} {}", muted("Leaves"), model.tree.get_n_leaves());
    println!();

    Ok(())
}

pub fn cmd_predict(model_path: &Path, input: PredictionInput) -> anyhow::Result<()> {
    section("Predict");

    let model = ModelStore::new(model_path).load()?;
    let prediction = predict_one(&model, &input)?;

    let downtime = match prediction.downtime() {
        "Yes" => "Yes".red().bold(),
        other => other.green().bold(),
    };
    println!("  {:<16} {}", muted("Downtime"), downtime);
    println!("  {:<16} {:.2}", muted("Confidence"), round2(prediction.confidence));
    println!();

    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let dataset = Dataset::from_csv_path(data_path)?;
    let df = dataset.frame();

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!("  {:<12} {}", muted("Target"), TARGET_COLUMN);
    println!();

    println!("  {:<20} {:<12} {:>6} {:>8}", muted("Column"), muted("Type"), muted("Nulls"), muted("Unique"));
    println!("  {}", dim(&"─".repeat(50)));

    for col in df.get_columns() {
        println!(
            "  {:<20} {:<12} {:>6} {:>8}",
            col.name().as_str(),
            format!("{:?}", col.dtype()).truecolor(140, 140, 140),
            col.null_count(),
            col.n_unique().unwrap_or(0)
        );
    }

    println!();
    Ok(())
}

pub async fn cmd_serve(host: &str, port: u16, model_path: PathBuf) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    println!("  {}  {}", "Downtime Predictor".white().bold(), dim(&format!("v{}", env!("CARGO_PKG_VERSION"))));
    println!("  {} {}", muted("API   "), format!("http://{}:{}", host, port).white());
    println!("  {} {}", muted("Model "), model_path.display());
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    let config = ServerConfig {
        host: host.to_string(),
        port,
        model_path,
        ..Default::default()
    };

    run_server(config).await
}
