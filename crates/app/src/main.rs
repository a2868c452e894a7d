use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use interview_core::model::{ConfigError, PacingConfig, QuestionBank};
use serde::Serialize;
use services::{Clock, InterviewError, InterviewSession, PacingTracker};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ENV_DURATION: &str = "INTERVIEW_DURATION_MINUTES";
const ENV_QUESTIONS: &str = "INTERVIEW_TOTAL_QUESTIONS";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidConfig(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw} (expected a positive integer)")
            }
            ArgsError::InvalidConfig(err) => write!(f, "invalid interview config: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_positive<T>(raw: &str, flag: &'static str) -> Result<T, ArgsError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ArgsError::InvalidNumber {
            flag,
            raw: raw.to_string(),
        }),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- status   [--elapsed <min>] [--duration <min>] [--questions <n>]");
    eprintln!("  cargo run -p app -- simulate [--step <min>]    [--duration <min>] [--questions <n>]");
    eprintln!("  cargo run -p app -- watch    [--interval <sec>] [--duration <min>] [--questions <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --duration 60 --questions 10 --elapsed 0 --step 5 --interval 60");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {ENV_DURATION}, {ENV_QUESTIONS}, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Simulate,
    Watch,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "status" => Some(Self::Status),
            "simulate" => Some(Self::Simulate),
            "watch" => Some(Self::Watch),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
struct Args {
    config: PacingConfig,
    elapsed_minutes: u32,
    step_minutes: u32,
    interval_secs: u64,
}

impl Args {
    /// Flags override the environment, which overrides the defaults.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut duration = match env(ENV_DURATION) {
            Some(raw) => parse_positive(&raw, ENV_DURATION)?,
            None => PacingConfig::DEFAULT_DURATION_MINUTES,
        };
        let mut questions = match env(ENV_QUESTIONS) {
            Some(raw) => parse_positive(&raw, ENV_QUESTIONS)?,
            None => PacingConfig::DEFAULT_TOTAL_QUESTIONS,
        };
        let mut elapsed_minutes = 0;
        let mut step_minutes = 5;
        let mut interval_secs = 60;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--duration" => {
                    duration = parse_positive(&require_value(args, "--duration")?, "--duration")?;
                }
                "--questions" => {
                    questions =
                        parse_positive(&require_value(args, "--questions")?, "--questions")?;
                }
                "--elapsed" => {
                    let value = require_value(args, "--elapsed")?;
                    elapsed_minutes =
                        value
                            .trim()
                            .parse()
                            .map_err(|_| ArgsError::InvalidNumber {
                                flag: "--elapsed",
                                raw: value.clone(),
                            })?;
                }
                "--step" => {
                    step_minutes = parse_positive(&require_value(args, "--step")?, "--step")?;
                }
                "--interval" => {
                    interval_secs =
                        parse_positive(&require_value(args, "--interval")?, "--interval")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let config = PacingConfig::new(duration, questions).map_err(ArgsError::InvalidConfig)?;
        // A step longer than the interview would skip every phase.
        if step_minutes > config.total_duration_minutes() {
            return Err(ArgsError::InvalidNumber {
                flag: "--step",
                raw: step_minutes.to_string(),
            });
        }

        Ok(Self {
            config,
            elapsed_minutes,
            step_minutes,
            interval_secs,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Snapshots go to stdout; keep logs on stderr so the JSON stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn new_session(config: PacingConfig, clock: Clock) -> InterviewSession {
    let tracker = PacingTracker::with_config(config).with_clock(clock);
    InterviewSession::new(QuestionBank::default_bank(), Arc::new(tracker))
}

/// One snapshot, `elapsed` minutes into a session on a pinned clock.
fn status(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let start = Utc::now();
    let tracker = PacingTracker::with_config(args.config).with_clock(Clock::fixed(start));
    tracker.mark_session_start_at(start);
    let snapshot = tracker.status_at(start + Duration::minutes(i64::from(args.elapsed_minutes)));
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Walks a simulated interview to past its end, asking one question per step.
fn simulate(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut clock = Clock::fixed(Utc::now());
    let mut session = new_session(args.config, clock);
    session.begin_at(clock.now());

    let end = args
        .config
        .total_duration_minutes()
        .saturating_add(args.step_minutes);
    let mut minute: u32 = 0;
    while minute <= end {
        let turn = session.turn_at(clock.now());
        print_json(&turn)?;

        if turn.status.phase().is_terminal() && turn.question.is_some() {
            info!(minute, "conclusion reached with questions left in the bank");
        }

        match session.next_question() {
            Ok(_) | Err(InterviewError::Completed) => {}
            Err(err) => return Err(err.into()),
        }
        let Some(next) = minute.checked_add(args.step_minutes) else {
            break;
        };
        minute = next;
        clock.advance_minutes(i64::from(args.step_minutes));
    }

    let progress = session.progress();
    info!(
        asked = progress.asked,
        total = progress.total,
        "simulation finished"
    );
    Ok(())
}

/// Live session on the wall clock; prints a snapshot every interval.
async fn watch(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = new_session(args.config, Clock::default_clock());
    session.begin();

    let mut ticker = tokio::time::interval(StdDuration::from_secs(args.interval_secs));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let turn = session.turn();
                print_json(&turn.status)?;
                if turn.status.remaining_minutes() == 0 {
                    info!(session_id = %session.id(), "interview time exhausted");
                    break;
                }
            }
            result = &mut ctrl_c => {
                if let Err(err) = result {
                    warn!(error = %err, "failed to listen for ctrl-c");
                }
                info!(session_id = %session.id(), "interrupted");
                break;
            }
        }
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut argv = std::env::args().skip(1).peekable();

    // Default behavior: a single status snapshot when no subcommand is provided.
    let cmd = match argv.peek().map(String::as_str) {
        None => Command::Status,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Status,
        Some(first) => {
            let cmd = Command::from_arg(first).ok_or_else(|| {
                print_usage();
                ArgsError::UnknownCommand(first.to_string())
            })?;
            argv.next();
            cmd
        }
    };

    let parsed = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Status => status(&parsed),
        Command::Simulate => simulate(&parsed),
        Command::Watch => watch(&parsed).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
