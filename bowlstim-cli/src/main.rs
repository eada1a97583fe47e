use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bowlstim", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an experiment.
    Run(RunArgs),
    /// Load and check an experiment without running it.
    Validate(ValidateArgs),
    /// Poll the tracker's shared-memory region and print decoded deltas.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Experiment JSON.
    #[arg(long)]
    config: PathBuf,

    /// Write every presented frame as a PNG into this directory instead of running headless.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Sequencing event log (CSV).
    #[arg(long)]
    events: Option<PathBuf>,

    /// Tracker sample log (CSV).
    #[arg(long)]
    sensor_log: Option<PathBuf>,

    /// Stop after this many presented frames (brackets included).
    #[arg(long)]
    max_frames: Option<u64>,

    /// Stop as soon as this file exists.
    #[arg(long)]
    stop_file: Option<PathBuf>,

    /// Override the loop rate in Hz.
    #[arg(long)]
    frame_rate: Option<u32>,

    /// Override the run length in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Flip the output for an upside-down display.
    #[arg(long, default_value_t = false)]
    inverted: bool,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Experiment JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Shared-memory region name or path.
    #[arg(long, default_value = "FicTrac")]
    region: String,

    /// Number of polls.
    #[arg(long, default_value_t = 10)]
    samples: u32,

    /// Pause between polls.
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &std::path::Path) -> anyhow::Result<bowlstim::ExperimentConfig> {
    bowlstim::ExperimentConfig::from_path(path)
        .with_context(|| format!("load experiment '{}'", path.display()))
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = load(&args.config)?;
    config.apply(&bowlstim::Overrides {
        frame_rate: args.frame_rate,
        duration: args.duration,
        inverted: args.inverted,
    });

    let clock = bowlstim::ClockHandle::system();
    let plan = config.build(&clock)?;
    let stop = bowlstim::StopCondition {
        max_presents: args.max_frames,
        stop_file: args.stop_file.clone(),
    };
    let sink: Box<dyn bowlstim::OutputSink> = match &args.out_dir {
        Some(dir) => Box::new(bowlstim::PngSequenceSink::create(dir, stop)?),
        None => Box::new(bowlstim::HeadlessSink::new(stop)),
    };

    let mut presenter = bowlstim::Presenter::new(plan.program, plan.stage, sink, clock, plan.opts);
    let report = presenter.run()?;

    if let Some(path) = &args.events {
        bowlstim::export::save_event_csv(path, &report.events)?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(path) = &args.sensor_log {
        bowlstim::export::save_sensor_csv(path, &report.sensor_samples)?;
        eprintln!("wrote {}", path.display());
    }

    let json = serde_json::to_string_pretty(&report).context("serialize run report")?;
    println!("{json}");
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let config = load(&args.config)?;
    config
        .validate()
        .with_context(|| format!("validate experiment '{}'", args.config.display()))?;
    println!(
        "ok: {} program, {}x{} texture at {} Hz",
        config.program.kind(),
        config.display.canvas.width,
        config.display.canvas.height,
        config.frame_rate
    );
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    use bowlstim::SensorLink as _;

    let mut link = bowlstim::ShmSensorLink::new(
        &args.region,
        bowlstim::RecordFormat::default(),
        bowlstim::DEFAULT_REGION_BYTES,
    );
    eprintln!("probing {}", link.path().display());
    let mut valid = 0u32;
    for i in 0..args.samples {
        if i > 0 {
            std::thread::sleep(std::time::Duration::from_millis(args.interval_ms));
        }
        match link.poll() {
            Some(delta) => {
                valid += 1;
                println!(
                    "{}",
                    serde_json::to_string(&delta).context("serialize pose delta")?
                );
            }
            None => println!("null"),
        }
    }
    eprintln!("{valid}/{} valid records", args.samples);
    Ok(())
}
