//! Line-oriented quiz screen.

use quiz_core::model::{QuestionType, Theme, TopicSelector};
use services::{QuestionStatus, RestartMode};
use tokio::io::{AsyncBufReadExt, BufReader};
use ui::vm::{PendingAction, QuestionBodyVm, QuestionScreenVm, QuizVm, ResultsVm, start_quiz};
use ui::{AppContext, ViewError};

type BoxError = Box<dyn std::error::Error>;

struct Palette {
    good: &'static str,
    bad: &'static str,
    dim: &'static str,
    reset: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                good: "\x1b[32m",
                bad: "\x1b[31m",
                dim: "\x1b[90m",
                reset: "\x1b[0m",
            },
            Theme::Dark => Self {
                good: "\x1b[92m",
                bad: "\x1b[91m",
                dim: "\x1b[37m",
                reset: "\x1b[0m",
            },
        }
    }
}

/// Run one quiz until the user quits or declines a restart.
pub async fn run_quiz(
    ctx: &AppContext,
    subject_key: &str,
    selector: &TopicSelector,
) -> Result<(), BoxError> {
    let (tx, mut advanced) = tokio::sync::mpsc::unbounded_channel();
    let mut vm = match start_quiz(&ctx.quiz_service(), subject_key, selector, ctx.auto_advance())
        .await
    {
        Ok(vm) => vm.with_advance_events(tx),
        Err(err) => {
            println!("{}", err.message());
            return Ok(());
        }
    };
    let palette = Palette::for_theme(ctx.theme().theme());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if let Some(action) = vm.pending() {
            println!("{} [y/N]", action.prompt());
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            if line.trim().eq_ignore_ascii_case("y") {
                if vm.confirm().map_err(ViewError::message)? == Some(PendingAction::Quit) {
                    return Ok(());
                }
            } else {
                vm.dismiss();
            }
            continue;
        }

        if vm.is_complete().map_err(ViewError::message)? {
            print_results(&vm.results().map_err(ViewError::message)?, &palette);
            println!("[r] restart  [s] reshuffle and restart  [q] quit");
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            match line.trim() {
                "r" => vm.restart(RestartMode::SameOrder).map_err(ViewError::message)?,
                "s" => vm.restart(RestartMode::Reshuffle).map_err(ViewError::message)?,
                _ => return Ok(()),
            }
            continue;
        }

        let Some(screen) = vm.screen().map_err(ViewError::message)? else {
            continue;
        };
        print_screen(&screen, &palette);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                if let Some(feedback) = handle_input(&mut vm, &screen, line.trim())? {
                    println!("{feedback}");
                }
            }
            Some(_) = advanced.recv() => {}
        }
    }
}

/// Apply one line of input; returns a message to show, if any.
fn handle_input(
    vm: &mut QuizVm,
    screen: &QuestionScreenVm,
    input: &str,
) -> Result<Option<String>, BoxError> {
    let mut words = input.split_whitespace();
    let command = words.next().unwrap_or_default();
    let arg = words.next();

    let message = match (command, arg) {
        ("", _) => None,
        ("h", _) => Some(help(screen.question_type)),
        ("n", None) => match vm.next().map_err(ViewError::message)? {
            Some(_) => None,
            None => Some("Answer the question first.".to_owned()),
        },
        ("p", None) => (!vm.previous().map_err(ViewError::message)?)
            .then(|| "Already at the first question.".to_owned()),
        ("j", Some(raw)) => {
            let moved = match raw.parse::<usize>() {
                Ok(number) => vm.jump_to(number).map_err(ViewError::message)?,
                Err(_) => false,
            };
            (!moved).then(|| format!("Question {raw} is not available yet."))
        }
        ("c", None) => {
            vm.request(PendingAction::CancelEarly);
            None
        }
        ("q", None) => {
            vm.request(PendingAction::Quit);
            None
        }
        _ => answer_input(vm, screen, input)?,
    };
    Ok(message)
}

fn answer_input(
    vm: &mut QuizVm,
    screen: &QuestionScreenVm,
    input: &str,
) -> Result<Option<String>, BoxError> {
    if screen.verdict.is_some() {
        return Ok(Some("Already answered. Use n, p or j <n> to move.".to_owned()));
    }

    let numbers = || -> Vec<usize> {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(|w| w.parse().ok())
            .collect()
    };

    let accepted = match screen.question_type {
        QuestionType::Single => match numbers().as_slice() {
            [number] if *number > 0 => {
                vm.select_option(number - 1).map_err(ViewError::message)? && submit(vm)?
            }
            _ => false,
        },
        QuestionType::Multiple if input == "s" => submit(vm)?,
        QuestionType::Multiple => {
            let picked = numbers();
            let mut accepted = !picked.is_empty();
            for number in picked {
                accepted &= number > 0 && vm.toggle_option(number - 1).map_err(ViewError::message)?;
            }
            accepted
        }
        QuestionType::FillBlank => {
            let text = input.strip_prefix('=').unwrap_or(input).trim();
            vm.set_blank(text).map_err(ViewError::message)? && submit(vm)?
        }
        QuestionType::Matching if input == "s" => submit(vm)?,
        QuestionType::Matching => match (&screen.body, numbers().as_slice()) {
            (QuestionBodyVm::Matching { rows, right_items }, [row, choice]) => {
                let left = row.checked_sub(1).and_then(|i| rows.get(i));
                let right = choice.checked_sub(1).and_then(|i| right_items.get(i));
                match (left, right) {
                    (Some(left), Some(right)) => {
                        vm.set_match(&left.left, right).map_err(ViewError::message)?
                    }
                    _ => false,
                }
            }
            _ => false,
        },
        QuestionType::Sequence => {
            let mut words = input.split_whitespace();
            let verb = words.next();
            let position = words
                .next()
                .and_then(|w| w.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1));
            match (verb, position) {
                (Some("s"), None) => submit(vm)?,
                (Some("u"), Some(i)) => vm.move_up(i).map_err(ViewError::message)?,
                (Some("d"), Some(i)) => vm.move_down(i).map_err(ViewError::message)?,
                _ => false,
            }
        }
    };

    Ok((!accepted).then(|| format!("Not understood: {input} (h for help)")))
}

fn submit(vm: &mut QuizVm) -> Result<bool, BoxError> {
    Ok(vm.submit().map_err(ViewError::message)?.is_some())
}

fn help(question_type: QuestionType) -> String {
    let answer = match question_type {
        QuestionType::Single => "<n> answer with option n",
        QuestionType::Multiple => "<n> [<n>...] toggle options, s submit",
        QuestionType::FillBlank => "<text> answer (prefix with = to answer n, p, c or q)",
        QuestionType::Matching => "<row> <choice> pair items, s submit",
        QuestionType::Sequence => "u <n> / d <n> move item n up or down, s submit",
    };
    format!("{answer}\nn next, p previous, j <n> jump, c finish early, q quit")
}

fn print_screen(screen: &QuestionScreenVm, palette: &Palette) {
    let navigator: String = screen
        .navigator
        .iter()
        .map(|status| match status {
            QuestionStatus::Correct => format!("{}✓{}", palette.good, palette.reset),
            QuestionStatus::Incorrect => format!("{}✗{}", palette.bad, palette.reset),
            QuestionStatus::Current => "●".to_owned(),
            QuestionStatus::Open => "○".to_owned(),
            QuestionStatus::Locked => format!("{}·{}", palette.dim, palette.reset),
        })
        .collect::<Vec<_>>()
        .join(" ");

    println!();
    println!("{}  {navigator}", screen.progress_label);
    println!("{}. {}", screen.number, screen.text);

    match &screen.body {
        QuestionBodyVm::Choices(options) => {
            let multiple = screen.question_type == QuestionType::Multiple;
            for (i, option) in options.iter().enumerate() {
                let mark = match (multiple, option.selected) {
                    (true, true) => "[x]",
                    (true, false) => "[ ]",
                    (false, true) => "(•)",
                    (false, false) => "( )",
                };
                println!("  {}) {mark} {}", i + 1, option.label);
            }
        }
        QuestionBodyVm::Blank(text) if text.is_empty() => println!("  ______"),
        QuestionBodyVm::Blank(text) => println!("  {text}"),
        QuestionBodyVm::Matching { rows, right_items } => {
            for (i, row) in rows.iter().enumerate() {
                let chosen = row.chosen.as_deref().unwrap_or("?");
                println!("  {}) {} → {chosen}", i + 1, row.left);
            }
            let choices: Vec<String> = right_items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}) {item}", i + 1))
                .collect();
            println!("  {}choices: {}{}", palette.dim, choices.join("  "), palette.reset);
        }
        QuestionBodyVm::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                println!("  {}. {item}", i + 1);
            }
        }
    }

    match screen.verdict {
        Some(true) => println!("{}Correct!{}", palette.good, palette.reset),
        Some(false) => {
            println!("{}Incorrect.{}", palette.bad, palette.reset);
            if let Some(explanation) = &screen.explanation {
                println!("  {explanation}");
            }
        }
        None => {}
    }

    let mut hints = Vec::new();
    if screen.can_go_back {
        hints.push("p previous");
    }
    if screen.can_go_next {
        hints.push(if screen.next_label == "Finish" { "n finish" } else { "n next" });
    }
    hints.extend(["c finish early", "q quit", "h help"]);
    println!("{}{}{}", palette.dim, hints.join("  "), palette.reset);
}

fn print_results(results: &ResultsVm, palette: &Palette) {
    println!();
    if results.cancelled {
        println!("Quiz finished early.");
    }
    println!(
        "Score: {} ({})",
        results.score_label, results.percentage_label
    );
    if let Some(elapsed) = &results.elapsed_label {
        println!("Time: {elapsed}");
    }

    for line in &results.lines {
        println!();
        let (mark, colour) = if line.is_correct {
            ("✓", palette.good)
        } else {
            ("✗", palette.bad)
        };
        println!("{colour}{mark} {}. {}{}", line.number, line.question, palette.reset);
        if let Some(submitted) = &line.submitted_answer {
            println!("  your answer: {submitted}");
        }
        if let Some(correct) = &line.correct_answer {
            println!("  correct:     {correct}");
        }
        if let Some(explanation) = &line.explanation {
            println!("  {}{explanation}{}", palette.dim, palette.reset);
        }
    }
}
