use clap::CommandFactory;
use clap::Parser;
use colored::*;
use dialoguer::{Input, Select};
use env_logger::{Builder, Env, Target};
use is_terminal::IsTerminal;
use log::{debug, info, warn};
use regex_dojo::cli::{Cli, Commands};
use regex_dojo::config::Config;
use regex_dojo::error::{RegexDojoError, Result as DojoResult};
use regex_dojo::output::{
    DisplayOptions, OutputFormat, formatter_for, highlight, render_feedback,
};
use regex_dojo::{
    BoundedMatcher, Curriculum, MatchRecord, Playground, RegexFlags, TutorialSession,
    check_answer, get_regex_matches, matching_signature, validate_regex,
};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

/// Exit status for a pattern that cannot be used or an answer that is wrong.
const EXIT_REJECTED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = setup_logging(&cli) {
        eprintln!("{}", format!("Failed to set up logging: {e}").red());
        return ExitCode::FAILURE;
    }

    let start_time = Instant::now();
    info!("Application started with command: {:?}", cli.command);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", format!("Error: {e}").red());
            ExitCode::FAILURE
        }
    };

    info!(
        "Application finished. Total elapsed time: {:.2?}",
        start_time.elapsed()
    );
    code
}

fn run(cli: &Cli) -> DojoResult<ExitCode> {
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring configuration: {e:#}");
        Config::default()
    });

    let use_color = !cli.no_color && config.display.color && io::stdout().is_terminal();
    if !use_color {
        colored::control::set_override(false);
    }
    let display = DisplayOptions {
        use_color,
        show_positions: config.display.show_positions,
    };

    match &cli.command {
        Commands::Match {
            pattern,
            text,
            file,
            flags,
            format,
        } => run_match(
            pattern,
            text.as_deref(),
            file.as_deref(),
            flags.as_deref(),
            *format,
            &config,
            display,
        ),
        Commands::Check { pattern } => Ok(run_check(pattern)),
        Commands::Lessons => run_lessons(),
        Commands::Exercise {
            lesson,
            answer,
            exercise,
            hint,
        } => run_exercise(*lesson, *exercise, answer, *hint, display),
        Commands::Tutorial { lesson } => run_tutorial(*lesson, display),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "regex-dojo", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn setup_logging(cli: &Cli) -> DojoResult<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| RegexDojoError::Other(e.to_string()))?;
    Ok(())
}

fn run_match(
    pattern: &str,
    text: Option<&str>,
    file: Option<&Path>,
    flags: Option<&str>,
    format: OutputFormat,
    config: &Config,
    display: DisplayOptions,
) -> DojoResult<ExitCode> {
    let flags: RegexFlags = match flags {
        Some(flags) => flags.parse()?,
        None => config.playground.flags()?,
    };

    let text = match (text, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) if io::stdin().is_terminal() => config.playground.sample_text.clone(),
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let playground = Playground::new(pattern, text, flags);
    let report = playground.evaluate();
    let formatter = formatter_for(format, display);
    debug!("Rendering report with the {} formatter", formatter.name());
    println!("{}", formatter.format(&report, &playground.text)?.trim_end());

    if report.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_REJECTED))
    }
}

fn run_check(pattern: &str) -> ExitCode {
    println!("Pattern: {pattern}");
    println!(
        "Length: {}/{}",
        pattern.chars().count(),
        regex_dojo::safety::MAX_PATTERN_LENGTH
    );
    if validate_regex(pattern) {
        println!("Syntax: {}", "valid".green());
    } else {
        println!("Syntax: {}", "invalid".red());
    }
    match matching_signature(pattern) {
        Some(signature) => println!("Safety: {} ({signature})", "blocked".red()),
        None => println!("Safety: {}", "ok".green()),
    }

    match BoundedMatcher::new(pattern, RegexFlags::default()) {
        Ok(_) => {
            println!("{}", "Pattern can be used".green().bold());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", format!("Pattern cannot be used: {e}").red().bold());
            ExitCode::from(EXIT_REJECTED)
        }
    }
}

fn run_lessons() -> DojoResult<ExitCode> {
    let curriculum = Curriculum::builtin()?;
    for lesson in &curriculum.lessons {
        println!("{} {}", format!("{}.", lesson.id).cyan(), lesson.title.bold());
        println!("   {}", lesson.description.dimmed());
        for exercise in &lesson.exercises {
            println!("   {}.{} {}", lesson.id, exercise.id, exercise.question);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn spans(matches: &[MatchRecord]) -> Vec<(usize, usize)> {
    matches
        .iter()
        .map(|m| (m.index, m.index + m.text.len()))
        .collect()
}

fn run_exercise(
    lesson_id: u32,
    exercise_id: u32,
    answer: &str,
    hint: bool,
    display: DisplayOptions,
) -> DojoResult<ExitCode> {
    let curriculum = Curriculum::builtin()?;
    let lesson = curriculum
        .lesson(lesson_id)
        .ok_or_else(|| RegexDojoError::Lesson(format!("no lesson with id {lesson_id}")))?;
    let exercise = lesson
        .exercises
        .iter()
        .find(|ex| ex.id == exercise_id)
        .ok_or_else(|| {
            RegexDojoError::Lesson(format!(
                "lesson {lesson_id} has no exercise {exercise_id}"
            ))
        })?;

    println!("{}", lesson.title.bold());
    println!("{}", exercise.question);
    let matches = get_regex_matches(answer, &exercise.test_string).unwrap_or_default();
    println!(
        "Test string: {}",
        highlight(&exercise.test_string, &spans(&matches), display.use_color)
    );
    if hint {
        if let Some(text) = &exercise.hint {
            println!("Hint: {text}");
        }
    }

    let feedback = check_answer(exercise, answer);
    println!("{}", render_feedback(&feedback, display.use_color));

    if feedback.is_correct() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_REJECTED))
    }
}

fn prompt_error(e: dialoguer::Error) -> RegexDojoError {
    RegexDojoError::Other(format!("prompt failed: {e}"))
}

fn print_exercise(session: &TutorialSession, display: DisplayOptions) {
    let lesson = session.current_lesson();
    let exercise = session.current_exercise();
    println!();
    println!(
        "{} {}",
        format!("Lesson {}:", lesson.id).cyan().bold(),
        lesson.title.bold()
    );
    println!("{}", exercise.question);
    println!(
        "Test string: {}",
        highlight(
            &exercise.test_string,
            &spans(&session.preview()),
            display.use_color
        )
    );
    if let Some(hint) = session.hint() {
        println!("{} {hint}", "Hint:".yellow());
    }
}

fn run_tutorial(lesson: Option<u32>, display: DisplayOptions) -> DojoResult<ExitCode> {
    let mut session = TutorialSession::builtin()?;
    if let Some(id) = lesson {
        session.select_lesson(id)?;
    }

    println!("{}", "Regular expression tutorial".green().bold());
    println!(
        "{}",
        "Type a pattern to check it, or :hint, :next, :lessons, :lesson <id>, :quit".dimmed()
    );

    loop {
        print_exercise(&session, display);
        let input: String = Input::new()
            .with_prompt("Pattern")
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;

        match input.trim() {
            ":quit" | ":q" => break,
            ":hint" => {
                if session.toggle_hint() && session.hint().is_none() {
                    println!("No hint for this exercise.");
                }
            }
            ":next" => {
                if !session.next_exercise() {
                    println!("That was the last exercise.");
                }
            }
            ":lessons" => {
                let titles: Vec<String> = session
                    .lessons()
                    .iter()
                    .map(|l| {
                        let mark = if l.completed { " ✓" } else { "" };
                        format!("{}. {}{mark}", l.id, l.title)
                    })
                    .collect();
                let current = session
                    .lessons()
                    .iter()
                    .position(|l| l.id == session.current_lesson().id)
                    .unwrap_or(0);
                let choice = Select::new()
                    .with_prompt("Lesson")
                    .items(titles.as_slice())
                    .default(current)
                    .interact()
                    .map_err(prompt_error)?;
                let id = session.lessons()[choice].id;
                session.select_lesson(id)?;
            }
            command if command.starts_with(":lesson") => {
                let selected = command[":lesson".len()..]
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| RegexDojoError::Lesson(e.to_string()))
                    .and_then(|id| session.select_lesson(id));
                if let Err(e) = selected {
                    println!("{}", e.to_string().red());
                }
            }
            _ => {
                session.set_pattern(input);
                let feedback = session.check().clone();
                println!(
                    "Matches: {}",
                    highlight(
                        &session.current_exercise().test_string,
                        &spans(&session.preview()),
                        display.use_color
                    )
                );
                println!("{}", render_feedback(&feedback, display.use_color));
                if feedback.is_correct() && !session.next_exercise() {
                    println!("{}", "You finished every exercise!".green().bold());
                    break;
                }
            }
        }
    }

    let (completed, total) = session.progress();
    println!("Completed {completed} of {total} lessons.");
    Ok(ExitCode::SUCCESS)
}
