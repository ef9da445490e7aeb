use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use lanescan_core::Tensor;
use lanescan_dispatch::attrs::{EXCLUSIVE, REVERSE};
use lanescan_dispatch::{Attributes, DispatchConfig, Dispatcher};

mod tensor_json;

use tensor_json::TensorJson;

#[derive(Parser)]
#[command(
    name = "lanescan",
    about = "Cumulative sums over dense tensors",
    long_about = "Runs the CumSum operator on a JSON tensor.\n\nTensors are read as {\"dtype\": \"f32\", \"shape\": [2, 3], \"data\": [...]}\nand written back in the same form.",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List execution providers and what they accept
    Info {
        /// Dispatch config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Cumulative sum along one axis
    Cumsum {
        /// Input tensor JSON file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,
        /// Axis to scan; negative values count from the back
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        axis: i64,
        /// Exclude the current element from each output
        #[arg(long)]
        exclusive: bool,
        /// Accumulate from the end of each lane
        #[arg(long)]
        reverse: bool,
        /// Dispatch config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { config } => cmd_info(config.as_deref()),
        Commands::Cumsum { input, axis, exclusive, reverse, config } => {
            cmd_cumsum(&input, axis, exclusive, reverse, config.as_deref())
        }
    }
}

fn load_dispatcher(config: Option<&Path>) -> anyhow::Result<Dispatcher> {
    let config = match config {
        Some(path) => DispatchConfig::from_file(path)
            .with_context(|| format!("loading dispatch config {}", path.display()))?,
        None => DispatchConfig::default(),
    };
    tracing::debug!(?config, "dispatch config");
    Ok(Dispatcher::from_config(&config)?)
}

fn cmd_info(config: Option<&Path>) -> anyhow::Result<()> {
    let dispatcher = load_dispatcher(config)?;

    println!("lanescan v{}\n", env!("CARGO_PKG_VERSION"));
    println!("Threads: {}", std::thread::available_parallelism().map_or(1, |n| n.get()));
    println!("\nProviders (priority order)");
    for provider in dispatcher.providers() {
        let caps = provider.capabilities();
        let dtypes: Vec<String> = caps.dtypes.iter().map(|d| d.to_string()).collect();
        let rank = caps.max_rank.map_or("any".to_string(), |r| r.to_string());
        println!("  {:<8} dtypes: {:<24} max rank: {}", provider.name(), dtypes.join(", "), rank);
    }
    if !dispatcher.policy().is_empty() {
        println!("\nExclusion rules active");
    }
    Ok(())
}

fn cmd_cumsum(
    input: &str,
    axis: i64,
    exclusive: bool,
    reverse: bool,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let dispatcher = load_dispatcher(config)?;

    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))?
    };
    let output = cumsum_json(&dispatcher, &text, axis, exclusive, reverse)?;
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

/// Parse a JSON tensor, run CumSum through the dispatcher and return the
/// result in the same JSON form.
fn cumsum_json(
    dispatcher: &Dispatcher,
    text: &str,
    axis: i64,
    exclusive: bool,
    reverse: bool,
) -> anyhow::Result<TensorJson> {
    let parsed: TensorJson = serde_json::from_str(text).context("parsing input tensor")?;
    let x = parsed.to_tensor()?;

    let attrs = Attributes::new()
        .with_int(EXCLUSIVE, i64::from(exclusive))
        .with_int(REVERSE, i64::from(reverse));
    let y = dispatcher.run_cumsum(&x, &Tensor::scalar_i64(axis), &attrs)?;
    tracing::info!(shape = %y.shape(), dtype = %y.dtype(), "cumsum complete");

    TensorJson::from_tensor(&y)
}
