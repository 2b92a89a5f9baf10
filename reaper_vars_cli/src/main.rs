use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{bounded, Sender};
use reaper_vars::protocol::DeviceEvent;
use reaper_vars::{catalog, JsonLinesSink, MainLoop, ModuleConfig, INBOUND_CAP};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const TICK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Parser, Debug)]
#[command(name = "reaper_vars")]
struct Args {
    /// Module config (JSON). Defaults apply when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long)]
    tracks: Option<u16>,

    #[arg(long)]
    fx: Option<u16>,

    /// Device events as JSON lines; `-` reads stdin.
    #[arg(long, value_name = "PATH", default_value = "-")]
    events: String,

    /// Print the variable catalog as JSON and exit.
    #[arg(long, default_value_t = false)]
    catalog: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args, |var| std::env::var(var).ok())?;
    let cardinality = config.validate().context("invalid configuration")?;

    if args.catalog {
        let variables = catalog::generate(cardinality);
        serde_json::to_writer_pretty(std::io::stdout().lock(), &variables)?;
        println!();
        return Ok(());
    }

    let input: Box<dyn BufRead + Send> = if args.events == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(&args.events)
            .with_context(|| format!("failed to open events file {}", args.events))?;
        Box::new(BufReader::new(file))
    };

    let (tx, rx) = bounded(INBOUND_CAP);
    let reader = std::thread::spawn(move || read_events(input, tx));

    let sink = JsonLinesSink::new(std::io::stdout());
    let mut main_loop = MainLoop::new(rx, &config, sink)?;
    let report = main_loop.start()?;
    tracing::info!(
        tracks = cardinality.tracks(),
        fx = cardinality.fx_per_track(),
        bound = report.bound,
        failed = report.failures.len(),
        "observing"
    );

    loop {
        let outcome = main_loop.tick();
        if outcome.inbound_closed {
            break;
        }
        if outcome.events == 0 {
            std::thread::sleep(TICK_INTERVAL);
        }
    }

    main_loop.shutdown();
    let parsed = reader
        .join()
        .map_err(|_| anyhow::anyhow!("event reader panicked"))?;
    tracing::info!(events = parsed, "input closed; exiting");
    Ok(())
}

/// JSON file (or defaults), then environment, then command-line flags.
fn load_config(
    args: &Args,
    env: impl Fn(&'static str) -> Option<String>,
) -> anyhow::Result<ModuleConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => ModuleConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ModuleConfig::default(),
    };
    config.apply_overrides_from(env)?;
    if let Some(t) = args.tracks {
        config.num_track_variables = t;
    }
    if let Some(f) = args.fx {
        config.num_fx_variables = f;
    }
    Ok(config)
}

fn read_events(input: impl BufRead, tx: Sender<DeviceEvent>) -> usize {
    let mut parsed = 0;
    for (n, line) in input.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!("event input read failed: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<DeviceEvent>(line) {
            Ok(event) => {
                parsed += 1;
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => tracing::warn!(line = n + 1, "skipping malformed event: {e}"),
        }
    }
    parsed
}
