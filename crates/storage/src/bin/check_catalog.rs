use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{QuestionType, Subject};
use storage::catalog::load_catalog;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    catalog: PathBuf,
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut catalog = std::env::var("QUIZ_CATALOG")
            .map_or_else(|_| PathBuf::from("data/catalog.json"), PathBuf::from);

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => {
                    catalog = args
                        .next()
                        .map(PathBuf::from)
                        .ok_or(ArgsError::MissingValue { flag: "--catalog" })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { catalog })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin check_catalog -- [--catalog <path>]");
    eprintln!();
    eprintln!("Validates every question in the catalog and prints per-subject counts.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_CATALOG (default: data/catalog.json)");
}

fn describe(subject: &Subject) -> String {
    let mut counts = [0_usize; 5];
    for question in subject.topics.iter().flat_map(|t| t.questions.iter()) {
        let slot = match question.question_type() {
            QuestionType::Single => 0,
            QuestionType::Multiple => 1,
            QuestionType::FillBlank => 2,
            QuestionType::Matching => 3,
            QuestionType::Sequence => 4,
        };
        counts[slot] += 1;
    }
    format!(
        "{key}: {topics} topics, single={} multiple={} fill_blank={} matching={} sequence={}",
        counts[0],
        counts[1],
        counts[2],
        counts[3],
        counts[4],
        key = subject.key,
        topics = subject.topics.len(),
    )
}

#[tokio::main]
async fn main() {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            std::process::exit(2);
        }
    };

    match load_catalog(&args.catalog).await {
        Ok(subjects) => {
            for subject in &subjects {
                println!("{}", describe(subject));
            }
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
