use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

/// Composite seven weekday animations into one animated GIF strip.
#[derive(Parser, Debug)]
#[command(name = "weekstrip", version)]
struct Cli {
    /// Settings JSON. Relative paths inside it resolve against its directory.
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Directory holding maskL, maskC, maskR and sep (relative to the settings directory).
    #[arg(long, default_value = "masks")]
    masks: PathBuf,

    /// Output GIF path.
    #[arg(long, default_value = "stripe.gif")]
    out: PathBuf,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Log per-stage and per-frame details.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = weekstrip::Settings::from_path(&cli.settings)
        .with_context(|| format!("load settings '{}'", cli.settings.display()))?;
    let root = settings_root(&cli.settings);
    let inputs = weekstrip::InputPaths::resolve(&settings, root, &cli.masks);

    let opts = weekstrip::RenderOpts {
        parallel: cli.parallel,
        threads: cli.threads,
    };
    let frames = weekstrip::render_to_gif(settings, &inputs, &cli.out, &opts)
        .with_context(|| format!("render '{}'", cli.out.display()))?;

    eprintln!("wrote {} ({frames} frames)", cli.out.display());
    Ok(())
}

fn settings_root(settings: &Path) -> &Path {
    settings
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
