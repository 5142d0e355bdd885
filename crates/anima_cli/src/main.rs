use anima_cli::Scenario;
use anima_core::ProfileConfig;
use anima_limbic::{Cast, HeartbeatConfig};
use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Character profiles (TOML). Missing file means built-in defaults.
    #[arg(short, long, env = "ANIMA_PROFILES", default_value = "profiles.toml")]
    profiles: PathBuf,

    /// Scenario to replay (TOML)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Character to run, overriding the scenario
    #[arg(short, long)]
    character: Option<String>,

    /// Start from a snapshot written by an earlier `--snapshot` run
    #[arg(long)]
    restore: Option<PathBuf>,

    /// Print the final snapshot after the last turn
    #[arg(long)]
    snapshot: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(args: &Args) {
    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout carries turn records, so logs go to stderr
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let profiles = ProfileConfig::load_or_default(&args.profiles);
    let scenario = Scenario::load(&args.scenario)?;
    let character = scenario.character_id(args.character.as_deref(), &profiles);

    let cast = Cast::new(profiles, HeartbeatConfig::manual());
    let limbic = match &args.restore {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
            let snapshot = anima_cli::parse_snapshot(&content)?;
            cast.restore(&character, snapshot).await?
        }
        None => cast.get_or_spawn(&character).await?,
    };
    info!("Replaying {} as {}", args.scenario.display(), character);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    anima_cli::replay(&scenario, &limbic, &mut out).await?;

    if args.snapshot {
        let snapshot = limbic.snapshot().await?;
        writeln!(out, "{}", anima_cli::snapshot_line(&snapshot)?)?;
    }
    out.flush()?;

    Ok(())
}
