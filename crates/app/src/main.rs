use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{Theme, ThemeSource, TopicSelector};
use services::{Clock, QuizService, SessionConfig, ThemeService};
use storage::repository::{InMemoryRepository, Storage};
use tracing_subscriber::EnvFilter;
use ui::vm::{AutoAdvancePolicy, map_subject_cards, map_topic_items};
use ui::{AppContext, UiApp, ViewError, build_app_context};

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingOperand { command: &'static str, operand: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
    InvalidTheme { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingOperand { command, operand } => {
                write!(f, "{command} requires <{operand}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTheme { raw } => {
                write!(f, "invalid theme: {raw} (expected light, dark or toggle)")
            }
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

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- subjects");
    eprintln!("  cargo run -p app -- topics <subject>");
    eprintln!("  cargo run -p app -- quiz <subject> <topic|all>");
    eprintln!("  cargo run -p app -- theme [light|dark|toggle]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --catalog <path>         question catalog (default: data/catalog.json)");
    eprintln!("  --db <sqlite_url>        preference store (default: sqlite:quiz.sqlite3)");
    eprintln!("  --page-size <n>          questions revealed per page (default: 5)");
    eprintln!("  --auto-advance-ms <ms>   delay after a correct answer, 0 disables (default: 1000)");
    eprintln!("  --no-shuffle             keep catalog order");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_CATALOG, QUIZ_DB_URL, QUIZ_PAGE_SIZE, QUIZ_AUTO_ADVANCE_MS,");
    eprintln!("  QUIZ_SYSTEM_THEME (light|dark), RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ThemeCommand {
    Show,
    Set(Theme),
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Subjects,
    Topics { subject: String },
    Quiz { subject: String, topic: TopicSelector },
    Theme(ThemeCommand),
}

struct Args {
    command: Command,
    catalog: PathBuf,
    db_url: String,
    page_size: Option<usize>,
    auto_advance_ms: Option<u64>,
    shuffle: bool,
    system_theme: Theme,
}

impl Args {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut catalog = std::env::var("QUIZ_CATALOG")
            .map_or_else(|_| PathBuf::from("data/catalog.json"), PathBuf::from);
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite:quiz.sqlite3".into()), normalize_sqlite_url);
        let mut page_size = std::env::var("QUIZ_PAGE_SIZE")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok());
        let mut auto_advance_ms = std::env::var("QUIZ_AUTO_ADVANCE_MS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok());
        let system_theme = std::env::var("QUIZ_SYSTEM_THEME")
            .ok()
            .and_then(|value| value.parse::<Theme>().ok())
            .unwrap_or_default();
        let mut shuffle = true;

        let mut positional = Vec::new();
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => catalog = PathBuf::from(require_value(&mut args, "--catalog")?),
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--page-size" => {
                    let value = require_value(&mut args, "--page-size")?;
                    page_size = Some(parse_number("--page-size", value)?);
                }
                "--auto-advance-ms" => {
                    let value = require_value(&mut args, "--auto-advance-ms")?;
                    auto_advance_ms = Some(parse_number("--auto-advance-ms", value)?);
                }
                "--no-shuffle" => shuffle = false,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        Ok(Self {
            command: parse_command(positional)?,
            catalog,
            db_url,
            page_size,
            auto_advance_ms,
            shuffle,
            system_theme,
        })
    }

    fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::default().with_shuffle(self.shuffle);
        match self.page_size {
            Some(size) => config.with_page_size(size),
            None => config,
        }
    }

    fn auto_advance(&self) -> AutoAdvancePolicy {
        match self.auto_advance_ms {
            Some(0) => AutoAdvancePolicy::disabled(),
            Some(ms) => AutoAdvancePolicy::default().with_delay(Duration::from_millis(ms)),
            None => AutoAdvancePolicy::default(),
        }
    }
}

fn parse_command(positional: Vec<String>) -> Result<Command, ArgsError> {
    let mut words = positional.into_iter();
    let Some(first) = words.next() else {
        return Ok(Command::Subjects);
    };

    let command = match first.as_str() {
        "subjects" => Command::Subjects,
        "topics" => Command::Topics {
            subject: words.next().ok_or(ArgsError::MissingOperand {
                command: "topics",
                operand: "subject",
            })?,
        },
        "quiz" => {
            let subject = words.next().ok_or(ArgsError::MissingOperand {
                command: "quiz",
                operand: "subject",
            })?;
            let topic = words.next().ok_or(ArgsError::MissingOperand {
                command: "quiz",
                operand: "topic|all",
            })?;
            Command::Quiz {
                subject,
                topic: TopicSelector::parse(&topic),
            }
        }
        "theme" => Command::Theme(match words.next().as_deref() {
            None => ThemeCommand::Show,
            Some("toggle") => ThemeCommand::Toggle,
            Some(raw) => ThemeCommand::Set(
                raw.parse()
                    .map_err(|_| ArgsError::InvalidTheme { raw: raw.to_owned() })?,
            ),
        }),
        _ => return Err(ArgsError::UnknownArg(first)),
    };

    match words.next() {
        Some(extra) => Err(ArgsError::UnknownArg(extra)),
        None => Ok(command),
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

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

struct TerminalApp {
    quiz: Arc<QuizService>,
    themes: Arc<ThemeService>,
    auto_advance: AutoAdvancePolicy,
}

impl UiApp for TerminalApp {
    fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    fn theme_service(&self) -> Arc<ThemeService> {
        Arc::clone(&self.themes)
    }

    fn auto_advance(&self) -> AutoAdvancePolicy {
        self.auto_advance
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let catalog = InMemoryRepository::from_catalog_file(&args.catalog).await?;

    // Preferences live in SQLite; the catalog stays read-only in memory.
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::with_sqlite_preferences(Arc::new(catalog), &args.db_url).await?;

    let app: Arc<dyn UiApp> = Arc::new(TerminalApp {
        quiz: Arc::new(
            QuizService::new(Clock::system(), Arc::clone(&storage.questions))
                .with_config(args.session_config()),
        ),
        themes: Arc::new(ThemeService::new(Arc::clone(&storage.preferences))),
        auto_advance: args.auto_advance(),
    });
    let mut ctx = build_app_context(&app, args.system_theme)
        .await
        .map_err(|err| err.message())?;

    match args.command {
        Command::Subjects => list_subjects(&ctx).await,
        Command::Topics { subject } => list_topics(&ctx, &subject).await,
        Command::Quiz { subject, topic } => terminal::run_quiz(&ctx, &subject, &topic).await,
        Command::Theme(command) => theme(&mut ctx, command).await,
    }
}

async fn list_subjects(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let subjects = ctx.quiz_service().list_subjects().await?;
    if subjects.is_empty() {
        println!("{}", ViewError::EmptySession.message());
        return Ok(());
    }
    for card in map_subject_cards(&subjects) {
        println!("{:<16} {} ({})", card.key, card.name, card.counts_label);
        if let Some(description) = card.description {
            println!("{:<16} {description}", "");
        }
    }
    Ok(())
}

async fn list_topics(ctx: &AppContext, subject_key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let subject = match ctx.quiz_service().subject(subject_key).await {
        Ok(subject) => subject,
        Err(err) if err.is_empty_state() => {
            println!("{}", ViewError::from(err).message());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", subject.name);
    for item in map_topic_items(&subject) {
        println!("  {:<24} {} questions", item.key, item.question_count);
    }
    Ok(())
}

async fn theme(ctx: &mut AppContext, command: ThemeCommand) -> Result<(), Box<dyn std::error::Error>> {
    let preference = match command {
        ThemeCommand::Show => ctx.theme(),
        ThemeCommand::Set(theme) => ctx.set_theme(theme).await.map_err(|err| err.message())?,
        ThemeCommand::Toggle => ctx.toggle_theme().await.map_err(|err| err.message())?,
    };
    let source = match preference.source() {
        ThemeSource::Persisted => "saved",
        ThemeSource::SystemDefault => "system default",
    };
    println!("theme: {} ({source})", preference.theme());
    Ok(())
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
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
