mod app;
mod config;
mod event;
mod games;
mod scores;
mod sim;
mod ui;

use std::fs::File;
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::{App, Tab};
use config::{Cli, Settings};
use event::{Event, EventHandler};
use scores::HighScores;

type Term = Terminal<CrosstermBackend<Stdout>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_path())?;
    let settings = Settings::from_cli(&cli)?;
    log::info!("neoncade {} starting with {:?}", env!("CARGO_PKG_VERSION"), settings);

    let high_scores = HighScores::load();
    log::info!("high scores at {}", high_scores.path().display());

    enable_raw_mode().context("enabling raw mode")?;
    // Release events are only reported with the kitty protocol
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    log::info!("keyboard enhancement: {enhanced}");

    let mut terminal = match setup_terminal(enhanced) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = restore_terminal(enhanced);
            return Err(e);
        }
    };

    let mut app = App::new(&settings, high_scores, enhanced);
    if let Some(kind) = cli.game {
        app.open(Tab::for_game(kind));
    }

    let result = run(&mut terminal, &mut app, settings.frame_ms);

    restore_terminal(enhanced).context("restoring terminal")?;
    terminal.show_cursor()?;
    result
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("installing logger")?;
    Ok(())
}

fn setup_terminal(enhanced: bool) -> anyhow::Result<Term> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(enhanced: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    if enhanced {
        execute!(stdout, PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, cursor::Show)
}

fn run(terminal: &mut Term, app: &mut App, frame_ms: u64) -> anyhow::Result<()> {
    let events = EventHandler::new(frame_ms);
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            Event::Tick => {
                let now = Instant::now();
                app.on_frame(now - last_frame);
                last_frame = now;
            }
            Event::Key(key) => app.on_key(key),
        }

        if app.should_quit {
            break;
        }
    }

    log::info!("quit");
    Ok(())
}
