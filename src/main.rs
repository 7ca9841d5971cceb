use std::path::{Path, PathBuf};

use chrono::Local;
use clap::error::ErrorKind;
use clap::{Args as ClapArgs, CommandFactory, Parser, Subcommand};
use tracing::{error, info};
use webdev_quiz::data::{load_questions, QuestionSource};
use webdev_quiz::models::{PreferencesUpdate, Theme};
use webdev_quiz::store::{records, JsonFileStore};
use webdev_quiz::{authenticate, logging, App, Quiz, QuizError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory for saved progress, history, statistics and preferences
    #[arg(
        long,
        global = true,
        env = "WEBDEV_QUIZ_DATA_DIR",
        default_value = ".webdev-quiz"
    )]
    data_dir: PathBuf,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(ClapArgs, Debug)]
struct RunArgs {
    /// JSON file or http(s) URL to load the questions from [default: built-in set]
    #[arg(short, long)]
    questions: Option<String>,

    /// Log in as this user before starting
    #[arg(short, long)]
    user: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take the quiz (the default)
    Run(RunArgs),
    /// Remember a username for later runs
    Login { username: String },
    /// Forget the stored username
    Logout,
    /// List past results
    History {
        /// Delete the result with this id
        #[arg(long, conflicts_with = "clear")]
        delete: Option<String>,
        /// Delete every result
        #[arg(long)]
        clear: bool,
    },
    /// Show cumulative statistics
    Stats {
        /// Reset statistics to zero
        #[arg(long)]
        clear: bool,
    },
    /// Show or change preferences
    Prefs(PrefsArgs),
}

#[derive(ClapArgs, Debug)]
struct PrefsArgs {
    #[arg(long, value_enum)]
    theme: Option<Theme>,
    /// Ring the terminal bell when an answer is chosen
    #[arg(long)]
    sound: Option<bool>,
    /// Move to the next question after answering
    #[arg(long)]
    auto_advance: Option<bool>,
    /// Show elapsed time in the header
    #[arg(long)]
    show_timer: Option<bool>,
    /// Restore the default preferences
    #[arg(long, conflicts_with_all = ["theme", "sound", "auto_advance", "show_timer"])]
    reset: bool,
}

impl RunArgs {
    fn is_empty(&self) -> bool {
        self.questions.is_none() && self.user.is_none()
    }

    /// Fills options missing here from `fallback`.
    fn or(self, fallback: RunArgs) -> RunArgs {
        RunArgs {
            questions: self.questions.or(fallback.questions),
            user: self.user.or(fallback.user),
        }
    }
}

impl Args {
    /// The command to execute. Quiz options given before any subcommand
    /// belong to `run`.
    fn into_command(self) -> Result<Command, clap::Error> {
        match self.command {
            None => Ok(Command::Run(self.run)),
            Some(Command::Run(run)) => Ok(Command::Run(run.or(self.run))),
            Some(_) if !self.run.is_empty() => Err(Args::command().error(
                ErrorKind::ArgumentConflict,
                "--questions and --user only apply when taking the quiz",
            )),
            Some(command) => Ok(command),
        }
    }
}

fn main() {
    let args = Args::parse();
    let data_dir = args.data_dir.clone();
    let command = args.into_command().unwrap_or_else(|e| e.exit());

    if let Err(e) = logging::init(&data_dir) {
        eprintln!("Logging disabled: {}", e);
    }

    if let Err(e) = execute(&data_dir, command) {
        error!(error = %e, "command failed");
        match e {
            QuizError::Load(_) => {
                eprintln!("Error loading quiz. Please check the question source.\n{}", e)
            }
            _ => eprintln!("{}", e),
        }
        std::process::exit(1);
    }
}

fn execute(data_dir: &Path, command: Command) -> Result<(), QuizError> {
    let mut store = JsonFileStore::new(data_dir);

    match command {
        Command::Run(run) => run_quiz(store, run),
        Command::Login { username } => {
            let username = authenticate(&mut store, Some(&username))?;
            info!(%username, "logged in");
            println!("Logged in as {}", username);
            Ok(())
        }
        Command::Logout => {
            records::clear_identity(&mut store)?;
            info!("logged out");
            println!("Logged out");
            Ok(())
        }
        Command::History { delete, clear } => history(&mut store, delete, clear),
        Command::Stats { clear } => stats(&mut store, clear),
        Command::Prefs(prefs_args) => prefs(&mut store, prefs_args),
    }
}

fn run_quiz(mut store: JsonFileStore, run: RunArgs) -> Result<(), QuizError> {
    let username = authenticate(&mut store, run.user.as_deref())?;

    let source = run
        .questions
        .as_deref()
        .map(QuestionSource::parse)
        .unwrap_or(QuestionSource::Embedded);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let questions = runtime.block_on(load_questions(&source))?;

    info!(%username, questions = questions.len(), "starting quiz");
    let app = App::new(questions, Box::new(store), username);
    Quiz::new(app).run()
}

fn history(store: &mut JsonFileStore, delete: Option<String>, clear: bool) -> Result<(), QuizError> {
    if clear {
        records::clear_history(store)?;
        println!("History cleared");
        return Ok(());
    }

    if let Some(id) = delete {
        if records::delete_history_entry(store, &id)? {
            println!("Deleted {}", id);
        } else {
            println!("No result with id {}", id);
        }
        return Ok(());
    }

    let entries = records::read_history(&*store);
    if entries.is_empty() {
        println!("No quiz results yet");
        return Ok(());
    }

    println!(
        "{:<36}  {:<16}  {:<16}  {:>7}  {:>4}",
        "ID", "DATE", "USER", "SCORE", "%"
    );
    for entry in entries.iter().rev() {
        println!(
            "{:<36}  {:<16}  {:<16}  {:>7}  {:>3}%",
            entry.id,
            entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            entry.username,
            format!("{}/{}", entry.score, entry.total),
            entry.percentage
        );
    }
    Ok(())
}

fn stats(store: &mut JsonFileStore, clear: bool) -> Result<(), QuizError> {
    if clear {
        records::clear_statistics(store)?;
        println!("Statistics cleared");
        return Ok(());
    }

    let stats = records::read_statistics(&*store);
    if stats.total_quizzes == 0 {
        println!("No quizzes taken yet");
        return Ok(());
    }

    println!("Quizzes taken:       {}", stats.total_quizzes);
    println!("Questions answered:  {}", stats.total_questions_answered);
    println!("Correct / incorrect: {} / {}", stats.total_correct, stats.total_incorrect);
    println!("Average score:       {:.2}", stats.average_score);
    println!("Best / worst score:  {} / {}", stats.best_score, stats.worst_score);
    if let Some(updated) = stats.last_updated {
        println!(
            "Last updated:        {}",
            updated.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    println!("{:>8}  {:>7}  {:>9}  {:>5}", "QUESTION", "CORRECT", "INCORRECT", "TOTAL");
    for (index, counters) in &stats.question_performance {
        println!(
            "{:>8}  {:>7}  {:>9}  {:>5}",
            index + 1,
            counters.correct,
            counters.incorrect,
            counters.total
        );
    }
    Ok(())
}

fn prefs(store: &mut JsonFileStore, args: PrefsArgs) -> Result<(), QuizError> {
    if args.reset {
        records::reset_preferences(store)?;
        println!("Preferences reset");
    }

    let update = PreferencesUpdate {
        theme: args.theme,
        sound_enabled: args.sound,
        auto_advance: args.auto_advance,
        show_timer: args.show_timer,
    };

    let preferences = if update.is_empty() {
        records::read_preferences(&*store)
    } else {
        records::update_preferences(store, update)?
    };

    let theme = match preferences.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    println!("theme:        {}", theme);
    println!("sound:        {}", preferences.sound_enabled);
    println!("auto-advance: {}", preferences.auto_advance);
    println!("show-timer:   {}", preferences.show_timer);
    Ok(())
}
