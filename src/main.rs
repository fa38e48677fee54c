use blitz::{
    app_dirs::AppDirs,
    bonus::{BonusSource, NoBonus, RandomBonus},
    config::{Config, ConfigStore, FileConfigStore},
    leaderboard, logging,
    question::QuestionBank,
    quiz::Quiz,
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    theme::Theme,
    Action, App,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// timed multiple-choice trivia quiz in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed multiple-choice trivia quiz with hints, timer freezes, surprise bonus rounds and a top-ten leaderboard."
)]
pub struct Cli {
    /// name to prefill on the intro screen
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// colour theme
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// path to a JSON question bank to use instead of the built-in one
    #[clap(short = 'b', long)]
    bank: Option<PathBuf>,

    /// disable surprise bonus rounds
    #[clap(long)]
    no_bonus: bool,

    /// seed for bonus rolls, for reproducible sessions
    #[clap(long)]
    seed: Option<u64>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command-line flags override whatever the config file holds.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(name) = &self.name {
            config.username = Some(name.clone());
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(bank) = &self.bank {
            config.question_bank = Some(bank.clone());
        }
        if self.no_bonus {
            config.bonus = false;
        }
        config
    }
}

fn bonus_source(enabled: bool, seed: Option<u64>) -> Box<dyn BonusSource> {
    match (enabled, seed) {
        (false, _) => Box::new(NoBonus),
        (true, Some(seed)) => Box::new(RandomBonus::seeded(seed)),
        (true, None) => Box::new(RandomBonus::from_entropy()),
    }
}

/// Installs file logging, returning the warning to print when that fails.
fn init_logging(path: &Path) -> Option<String> {
    logging::init(path)
        .err()
        .map(|e| format!("warning: logging disabled ({}): {e}", path.display()))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Some(warning) = init_logging(&path) {
            eprintln!("{warning}");
        }
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let bank = match &config.question_bank {
        Some(path) => QuestionBank::from_path(path),
        None => QuestionBank::builtin(),
    };
    let bank = match bank {
        Ok(bank) => bank,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit();
        }
    };
    info!(bank = bank.name(), questions = bank.len(), "question bank loaded");

    let quiz = Quiz::new(
        bank,
        leaderboard::seed()?,
        config.theme,
        bonus_source(config.bonus, cli.seed),
    );
    let mut app = App::new(quiz, config.username.clone());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!(error = %e, "quiz loop failed");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let step = runner.step();
        app.on_elapsed(step.elapsed);

        match step.event {
            QuizEvent::Key(key) => match app.on_key(key) {
                Action::Quit => break,
                Action::Share => app.open_share(),
                Action::Continue => {}
            },
            QuizEvent::Resize | QuizEvent::Tick => {}
        }
    }

    info!("quit");
    Ok(())
}
