use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dreamframe", version)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a PNG image from a prompt.
    Image(GenerateArgs),
    /// Generate an MP4 video from a prompt (placeholder clips require `ffmpeg` on PATH).
    Video(GenerateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Text prompt.
    #[arg(long)]
    prompt: String,

    /// Output file stem (ASCII letters, digits, `-` and `_`).
    #[arg(long)]
    name: Option<String>,

    /// Output root directory; overrides `DREAMFRAME_OUTPUT_ROOT`.
    #[arg(long, env = "DREAMFRAME_OUTPUT_ROOT")]
    out_root: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let (args, video) = match cli.cmd {
        Command::Image(args) => (args, false),
        Command::Video(args) => (args, true),
    };
    let request = dreamframe::GenerationRequest::new(&args.prompt, args.name.as_deref())?;

    let mut cfg = dreamframe::DreamConfig::from_env()?;
    if let Some(root) = args.out_root {
        cfg.output_root = root;
    }
    let app = dreamframe::Dreamframe::from_config(&cfg)?;

    let descriptor = if video {
        app.videos().generate(&request)?
    } else {
        app.images().generate(&request)?
    };

    let json = serde_json::to_string_pretty(&descriptor.response_json())
        .context("serialize response")?;
    println!("{json}");
    Ok(())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
