mod play;
mod reports;
mod simulate;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdin, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use gridiron_game::{DiceBag, GameSession, SessionConfig, Side};
use simulate::{GameRecord, HomeStrategy, SimulationAggregate, aggregate, run_simulation};
use util::parse_seeds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Interactive terminal game
    Play,
    /// Batch of seeded games with automated play-calling
    Simulate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HumanSide {
    Home,
    Away,
}

impl From<HumanSide> for Side {
    fn from(side: HumanSide) -> Self {
        match side {
            HumanSide::Home => Self::Home,
            HumanSide::Away => Self::Away,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "gridiron-cli", version = "0.1.0")]
#[command(about = "Arcade dice football: play at the terminal or simulate seeded games")]
struct Args {
    /// Play interactively or run a simulation batch
    #[arg(long, value_enum, default_value_t = Mode::Play)]
    mode: Mode,

    /// Seeds to run (comma-separated); the first one seeds interactive play
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Games per seed (simulate mode only)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Play-calling strategy for the human side in simulate mode
    #[arg(long, value_enum, default_value_t = HomeStrategy::Balanced)]
    strategy: HomeStrategy,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON session configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side controlled by the human (overrides the config file)
    #[arg(long, value_enum)]
    human_side: Option<HumanSide>,

    /// Roll dice automatically instead of reading them from the prompt
    #[arg(long)]
    auto_dice: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let seeds = parse_seeds(&args.seeds)?;
    let first_seed = seeds.first().copied().unwrap_or_default();
    let config = load_config(&args, first_seed)?;

    announce_banner();

    match args.mode {
        Mode::Play => run_play(&args, config),
        Mode::Simulate => run_simulate(&args, &config, &seeds),
    }
}

fn announce_banner() {
    println!("{}", "🏈 Gridiron Dice".bright_cyan().bold());
    println!("{}", "================".cyan());
}

fn read_config_file(path: &Path) -> Result<SessionConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    SessionConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn load_config(args: &Args, seed: u64) -> Result<SessionConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => read_config_file(path)?,
        None => SessionConfig::default(),
    };
    config.seed = seed;
    if let Some(side) = args.human_side {
        config.human_side = side.into();
    }
    config.validate().context("invalid session configuration")?;
    if args.verbose {
        println!(
            "⚙️  {} plays {}, seed {}, {} s quarters",
            "Human".bold(),
            config.teams.name(config.human_side),
            config.seed,
            config.rules.quarter_seconds
        );
    }
    Ok(config)
}

fn run_play(args: &Args, config: SessionConfig) -> Result<()> {
    let dice = args
        .auto_dice
        .then(|| DiceBag::from_seed(config.seed.rotate_left(17)));
    let mut session = GameSession::new(config)?;
    let mut input = stdin().lock();
    let mut out = stdout().lock();
    play::run_interactive(&mut session, &mut input, &mut out, dice)?;
    out.flush()?;
    Ok(())
}

fn run_simulate(args: &Args, config: &SessionConfig, seeds: &[u64]) -> Result<()> {
    println!("{}", "🎲 Simulating Games".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let start_time = Instant::now();
    let records = run_simulation(config, args.strategy, seeds, args.iterations)?;
    let summary = aggregate(args.strategy, &records);
    if args.verbose {
        for record in &records {
            println!(
                "✅ [seed {} #{}] {}-{} {}",
                record.seed,
                record.iteration,
                record.home_score,
                record.away_score,
                record.verdict
            );
        }
    }
    write_reports(args, &summary, &records, start_time)
}

fn write_reports(
    args: &Args,
    summary: &SimulationAggregate,
    records: &[GameRecord],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, summary, records)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, summary, records)?,
        "csv" => reports::generate_csv_report(&mut output_target, records)?,
        _ => {
            let duration = start_time.elapsed();
            if records.is_empty() {
                writeln!(&mut output_target, "No games simulated.")?;
            } else {
                reports::generate_console_report(&mut output_target, summary, duration)?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
