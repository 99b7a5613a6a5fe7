// ============================================
// src/main.rs
// Connect Activity Generator entry point
// ============================================

use std::fs::{self, File};
use std::io::stdout;
use std::path::PathBuf;
use std::process::ExitCode;

mod activity;
mod cli;
mod config;
mod error;
mod form;
mod generator;
mod print;
mod session;
mod tui;

use activity::{ActivityType, GeneratedActivity, SUBJECT_AREAS};
use cli::{Cli, Command, GenerateArgs, PromptArgs};
use config::{Config, project_dirs};
use error::{AppError, Result};
use form::{Field, FormInput, ValidatedInput};
use generator::{Completion, Dispatcher, Generator};
use session::Session;

use chrono::Local;
use clap::Parser;
use console::style;
use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use log::{LevelFilter, debug, error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::prelude::*;
use tokio::runtime::Runtime;

// --------------------------------------------------
// Logging
// --------------------------------------------------

/// The TUI owns the terminal, so logs go to a file in the data directory.
fn setup_logging(level: &str) -> Result<PathBuf> {
    let log_dir = project_dirs()
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    fs::create_dir_all(&log_dir)?;

    let level = level.parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Warning: Unknown log-level '{}', defaulting to info", level);
        LevelFilter::Info
    });

    let path = log_dir.join("connect.log");
    let file = File::create(&path)?;
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(path)
}

// --------------------------------------------------
// Main
// --------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("{} {}", style("error:").red().bold(), err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?
        .with_overrides(cli.delay_ms, cli.log_level.as_deref());
    let log_path = setup_logging(&config.log_level)?;
    debug!("config: {:?}, log file: {}", config, log_path.display());

    let runtime = Runtime::new()?;

    match cli.command {
        None | Some(Command::Tui) => cmd_tui(&config, &runtime),
        Some(Command::Generate(args)) => cmd_generate(args, &config, &runtime),
        Some(Command::Prompt(args)) => cmd_prompt(args, &config, &runtime),
    }
}

// --------------------------------------------------
// Commands
// --------------------------------------------------

fn cmd_tui(config: &Config, runtime: &Runtime) -> Result<()> {
    let mut dispatcher = Dispatcher::new(runtime.handle().clone(), Generator::new(config.delay()));
    let print_dir = config.print_dir();

    let mut terminal = setup_terminal()?;
    let result = tui::run_app(&mut terminal, &mut dispatcher, &print_dir);
    let restored = restore_terminal();
    if let (Err(_), Err(err)) = (&result, &restored) {
        error!("failed to restore terminal: {err}");
    }
    result.and(restored)
}

fn cmd_generate(args: GenerateArgs, config: &Config, runtime: &Runtime) -> Result<()> {
    let form = FormInput::new(args.year_level, args.subject_area, args.unit_topic);
    let activity_type = args.activity.unwrap_or_else(|| draw_activity(args.seed));
    let (_, activity) = generate_once(form, activity_type, config, runtime)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&activity)?);
    } else {
        print_activity(&activity);
    }
    Ok(())
}

fn cmd_prompt(args: PromptArgs, config: &Config, runtime: &Runtime) -> Result<()> {
    let theme = ColorfulTheme::default();

    let year_level = Input::<String>::with_theme(&theme)
        .with_prompt(Field::YearLevel.label())
        .allow_empty(true)
        .interact_text()?;
    let subject = Select::with_theme(&theme)
        .with_prompt(Field::SubjectArea.label())
        .items(SUBJECT_AREAS)
        .default(0)
        .interact()?;
    let unit_topic = Input::<String>::with_theme(&theme)
        .with_prompt(Field::UnitTopic.label())
        .allow_empty(true)
        .interact_text()?;

    let form = FormInput::new(year_level, SUBJECT_AREAS[subject], unit_topic);
    let (input, activity) = generate_once(form, draw_activity(args.seed), config, runtime)?;
    print_activity(&activity);

    let save = Confirm::with_theme(&theme)
        .with_prompt("Save a printable sheet?")
        .default(false)
        .interact()?;
    if save {
        let path = print::write_sheet(&config.print_dir(), &activity, &input, Local::now())?;
        println!("Saved to {}", style(path.display()).green());
    }
    Ok(())
}

/// Validates, waits out the simulated service, and returns the activity
/// with the input it was generated from.
fn generate_once(
    form: FormInput,
    activity_type: ActivityType,
    config: &Config,
    runtime: &Runtime,
) -> Result<(ValidatedInput, GeneratedActivity)> {
    let mut session = Session::new();
    session.form = form;
    let ticket = session.begin()?;

    eprintln!("{}", style("Generating...").dim());
    let mut dispatcher = Dispatcher::new(runtime.handle().clone(), Generator::new(config.delay()));
    dispatcher.start(ticket, activity_type);
    let completion = runtime
        .block_on(dispatcher.next())
        .ok_or_else(|| AppError::GenerationFailed("no generation in flight".to_string()))?;
    accept(&mut session, completion)
}

/// Lands a completion on the session. Fails unless it is the pending
/// generation.
fn accept(
    session: &mut Session,
    completion: Completion,
) -> Result<(ValidatedInput, GeneratedActivity)> {
    let epoch = completion.epoch;
    let activity = completion.outcome?;
    if !session.complete(epoch, activity.clone()) {
        return Err(AppError::GenerationFailed(format!(
            "result for epoch {} is not the pending generation",
            epoch
        )));
    }
    let input = session
        .generated_from()
        .cloned()
        .ok_or_else(|| AppError::GenerationFailed("generated input missing".to_string()))?;
    Ok((input, activity))
}

fn draw_activity(seed: Option<u64>) -> ActivityType {
    match seed {
        Some(seed) => ActivityType::draw(&mut StdRng::seed_from_u64(seed)),
        None => ActivityType::draw(&mut rand::rng()),
    }
}

fn print_activity(activity: &GeneratedActivity) {
    println!();
    println!("{}", style(&activity.title).magenta().bold());
    println!();
    println!("{}", activity.prompt);
    println!();
    println!("{}", style("Discussion Questions").bold());
    for (i, question) in activity.questions.iter().enumerate() {
        println!("  {} {}", style(format!("{}.", i + 1)).yellow(), question);
    }
    println!();
}

// --------------------------------------------------
// Terminal setup
// --------------------------------------------------

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(Hide)?;
    let backend = CrosstermBackend::new(stdout());
    Ok(Terminal::new(backend)?)
}

fn restore_terminal() -> Result<()> {
    stdout().execute(Show)?;
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}
