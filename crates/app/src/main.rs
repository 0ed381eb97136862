mod console;

use std::fmt;
use std::sync::Arc;

use services::movies::{FileCatalogLoader, MovieCatalogLoader, builtin_catalog};
use services::{Clock, QuizConfig, QuizError, QuizServices, QuizSession};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use console::{ConsolePresenter, Reply, parse_reply, prompt};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuestionCount { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuestionCount { raw } => {
                write!(f, "invalid --questions value: {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play  [--db <sqlite_url> | --memory] [--questions <n>] [--catalog <path>]");
    eprintln!("  cargo run -p app -- stats [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --questions 10");
    eprintln!("  built-in catalog of ten movies");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_CATALOG, QUIZ_QUESTION_COUNT, QUIZ_RATING_THRESHOLD, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Stats,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: Option<String>,
    catalog: Option<String>,
    config: QuizConfig,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = Some(normalize_sqlite_url(
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:quiz.sqlite3".into()),
        ));
        let mut catalog = std::env::var("QUIZ_CATALOG").ok();
        let mut config = QuizConfig::from_env();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--memory" => db_url = None,
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    let parsed: u32 = value
                        .parse()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ArgsError::InvalidQuestionCount { raw: value.clone() })?;
                    config = config.with_question_count(parsed);
                }
                "--catalog" => catalog = Some(require_value(args, "--catalog")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            catalog,
            config,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// `SQLite` will not create a missing file from a plain URL.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn build_services(args: &Args) -> Result<QuizServices, Box<dyn std::error::Error>> {
    let catalog: Arc<dyn MovieCatalogLoader> = match &args.catalog {
        Some(path) => Arc::new(FileCatalogLoader::new(path)),
        None => Arc::new(builtin_catalog()),
    };
    let clock = Clock::default();

    match &args.db_url {
        Some(db_url) => {
            prepare_sqlite_file(db_url)?;
            debug!(%db_url, "opening statistics database");
            Ok(QuizServices::new_sqlite(db_url, clock, args.config, catalog).await?)
        }
        None => {
            info!("statistics kept in memory for this run");
            Ok(QuizServices::in_memory(clock, args.config, catalog))
        }
    }
}

async fn read_reply(lines: &mut Lines<BufReader<Stdin>>) -> std::io::Result<Reply> {
    loop {
        let Some(line) = lines.next_line().await? else {
            return Ok(Reply::Quit);
        };
        if let Some(reply) = parse_reply(&line) {
            return Ok(reply);
        }
        prompt("Please answer y, n or q:");
    }
}

/// Retry after a failed question fetch. Returns `false` if the player gives up.
async fn retry_question(
    session: &mut QuizSession,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<bool, Box<dyn std::error::Error>> {
    prompt("Try again? [y/n]");
    if read_reply(lines).await? != Reply::Yes {
        return Ok(false);
    }
    let request = session.request_question()?;
    match session.deliver(request.resolve().await).await {
        Ok(_) | Err(QuizError::QuestionSource(_)) => Ok(true),
        Err(err) => Err(err.into()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundStart {
    Ready,
    LoadFailed,
}

/// Start a round and fetch its first question.
///
/// A failed first fetch still counts as `Ready`: the round is running and the
/// question loop offers a retry.
async fn begin_round(session: &mut QuizSession) -> Result<RoundStart, QuizError> {
    let request = match session.start_round().await {
        Ok(request) => request,
        Err(QuizError::QuestionSource(_)) => return Ok(RoundStart::LoadFailed),
        Err(err) => return Err(err),
    };
    match session.deliver(request.resolve().await).await {
        Ok(_) | Err(QuizError::QuestionSource(_)) => Ok(RoundStart::Ready),
        Err(err) => Err(err),
    }
}

async fn play(services: &QuizServices) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = services.session(Arc::new(ConsolePresenter))?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if begin_round(&mut session).await? == RoundStart::LoadFailed {
            prompt("Try again? [y/n]");
            if read_reply(&mut lines).await? == Reply::Yes {
                continue;
            }
            return Ok(());
        }

        while !session.is_complete() {
            if session.is_awaiting_question() {
                if !retry_question(&mut session, &mut lines).await? {
                    return Ok(());
                }
                continue;
            }

            prompt("Answer [y]es / [n]o / [q]uit:");
            let answer = match read_reply(&mut lines).await? {
                Reply::Yes => true,
                Reply::No => false,
                Reply::Quit => return Ok(()),
            };
            match session.submit_answer(answer).await {
                Ok(_) | Err(QuizError::QuestionSource(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        prompt("Play again? [y/n]");
        if read_reply(&mut lines).await? != Reply::Yes {
            return Ok(());
        }
    }
}

async fn show_stats(services: &QuizServices) {
    let stats = services.statistics().snapshot().await;
    println!("Quizzes played: {}", stats.games_count());
    match stats.best_game() {
        Some(best) => println!(
            "Record: {}/{} ({})",
            best.correct_answers(),
            best.total_questions(),
            best.date().format("%d.%m.%y %H:%M")
        ),
        None => println!("Record: -"),
    }
    println!("Average accuracy: {:.2}%", stats.total_accuracy());
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let services = build_services(&parsed).await?;
    match cmd {
        Command::Play => play(&services).await,
        Command::Stats => {
            show_stats(&services).await;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
