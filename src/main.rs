mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        KeyCode, KeyEvent, KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use quotype::{
    app_dirs::AppDirs,
    caps::{Backend, CapsLockMonitor, LockReader},
    config::{Config, ConfigStore, FileConfigStore, SourceKind},
    controller::SessionController,
    keys::KeyPress,
    logging,
    presenter::ScreenState,
    quotes::QuoteSource,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    session::SessionPhase,
};
use ratatui::{
    backend::{Backend as TuiBackend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::info;

const TICK_RATE_MS: u64 = 100;
const CAPS_POLL_MS: u64 = 500;

/// type famous quotes against the clock
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A quote typing practice TUI: every keystroke is judged against the quote, and finishing shows words per minute, accuracy and elapsed time. Esc draws a new quote at any point."
)]
pub struct Cli {
    /// custom prompt to use
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// where to draw text from
    #[clap(short = 's', long, value_enum)]
    source: Option<SourceKind>,

    /// number of generated sentences per session (with --source sentences)
    #[clap(short = 'f', long = "full-sentences")]
    number_of_sentences: Option<usize>,

    /// hide the running timer while typing
    #[clap(long)]
    no_live_timer: bool,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// where to write the log (default: ~/.local/state/quotype/quotype.log)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command line flags override whatever the config file says
    fn apply_to(&self, config: &mut Config) {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(n) = self.number_of_sentences {
            config.number_of_sentences = n;
        }
        if self.no_live_timer {
            config.live_timer = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub controller: SessionController<Box<dyn QuoteSource>, ScreenState>,
    pub live_timer: bool,
    /// set when the terminal cannot report caps lock itself
    pub caps_monitor: Option<CapsLockMonitor<Box<dyn LockReader>>>,
}

impl App {
    pub fn new(source: Box<dyn QuoteSource>, live_timer: bool) -> Self {
        Self {
            controller: SessionController::new(source, ScreenState::new()),
            live_timer,
            caps_monitor: None,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            // ctrl+c to quit
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Flow::Quit,
            KeyCode::Left => {
                self.controller.retry();
                Flow::Continue
            }
            _ => {
                let mut press = KeyPress::from(key);
                if self.caps_monitor.is_some() {
                    // key events carry no lock state here, keep the polled one
                    press = press.with_caps_lock(self.controller.caps_lock());
                }
                self.controller.handle_key_event(press);
                Flow::Continue
            }
        }
    }

    pub fn on_caps_lock(&mut self, on: bool) {
        self.controller.update_caps_lock(on);
    }

    /// Refresh caps lock from the system when due; true when the banner changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let before = self.controller.caps_lock();
        if let Some(on) = self.caps_monitor.as_mut().and_then(|m| m.poll(now)) {
            self.controller.update_caps_lock(on);
        }
        before != self.controller.caps_lock()
    }

    /// Only a running attempt with a visible clock needs redrawing on ticks
    pub fn needs_tick(&self) -> bool {
        self.live_timer && self.controller.session().phase() == SessionPhase::InProgress
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply_to(&mut config);
    if cli.save_config {
        store.save(&config)?;
    }

    if let Some(log_path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        if let Err(err) = logging::init(&log_path, &config.log_level) {
            eprintln!("logging disabled: {err}");
        }
    }
    info!(source = %config.source, live_timer = config.live_timer, "starting");

    let source = config.quote_source(cli.prompt.clone())?;
    let mut app = App::new(source, config.live_timer);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // caps lock state is only reported with full escape code reporting; releases
    // (event types) let toggling the lock key update the banner on its own
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    } else {
        app.caps_monitor = Backend::detect().map(|backend| {
            CapsLockMonitor::new(
                Box::new(backend) as Box<dyn LockReader>,
                Duration::from_millis(CAPS_POLL_MS),
            )
        });
    }
    info!(enhanced, system_caps_lock = app.caps_monitor.is_some(), "keyboard");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: TuiBackend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            GameEvent::Tick => {
                let caps_changed = app.on_tick(Instant::now());
                if caps_changed || app.needs_tick() {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            GameEvent::CapsLock(on) => {
                app.on_caps_lock(on);
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            GameEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            GameEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    info!("exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotype::quotes::FixedQuote;

    fn app(prompt: &str) -> App {
        App::new(Box::new(FixedQuote(prompt.to_string())), true)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["quotype"]);

        assert_eq!(cli.prompt, None);
        assert_eq!(cli.source, None);
        assert_eq!(cli.number_of_sentences, None);
        assert!(!cli.no_live_timer);
        assert!(!cli.save_config);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_custom_prompt() {
        let cli = Cli::parse_from(["quotype", "-p", "hello world"]);
        assert_eq!(cli.prompt, Some("hello world".to_string()));

        let cli = Cli::parse_from(["quotype", "--prompt", "custom text"]);
        assert_eq!(cli.prompt, Some("custom text".to_string()));
    }

    #[test]
    fn test_cli_source() {
        let cli = Cli::parse_from(["quotype", "-s", "sentences", "-f", "3"]);
        assert_eq!(cli.source, Some(SourceKind::Sentences));
        assert_eq!(cli.number_of_sentences, Some(3));

        let cli = Cli::parse_from(["quotype", "--source", "quotes"]);
        assert_eq!(cli.source, Some(SourceKind::Quotes));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["quotype", "-s", "sentences", "-f", "5", "--no-live-timer"]);
        let mut config = Config::default();

        cli.apply_to(&mut config);

        assert_eq!(config.source, SourceKind::Sentences);
        assert_eq!(config.number_of_sentences, 5);
        assert!(!config.live_timer);
    }

    #[test]
    fn test_cli_leaves_config_alone_without_flags() {
        let cli = Cli::parse_from(["quotype"]);
        let mut config = Config {
            source: SourceKind::Sentences,
            number_of_sentences: 7,
            live_timer: false,
            log_level: "debug".to_string(),
        };
        let before = config.clone();

        cli.apply_to(&mut config);

        assert_eq!(config, before);
    }

    #[test]
    fn test_app_typing_and_quit() {
        let mut app = app("hi");
        assert!(!app.needs_tick());

        assert_eq!(app.on_key(key(KeyCode::Char('h'))), Flow::Continue);
        assert!(app.needs_tick());
        app.on_key(key(KeyCode::Char('i')));

        assert!(app.controller.stats().is_some());
        assert!(!app.needs_tick());
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
    }

    #[test]
    fn test_app_left_arrow_retries() {
        let mut app = app("abc");
        app.on_key(key(KeyCode::Char('a')));

        app.on_key(key(KeyCode::Left));

        assert_eq!(app.controller.session().pointer(), 0);
        assert_eq!(app.controller.session().text(), "abc");
    }

    #[test]
    fn test_app_escape_resets() {
        let mut app = app("abc");
        app.on_key(key(KeyCode::Char('x')));

        app.on_key(key(KeyCode::Esc));

        assert_eq!(app.controller.session().typed_count(), 0);
        assert_eq!(app.controller.presenter().cursor, 0);
    }

    struct Fixed(bool);

    impl LockReader for Fixed {
        fn read(&self) -> Option<bool> {
            Some(self.0)
        }
    }

    #[test]
    fn test_app_caps_lock_release_updates_banner() {
        let mut app = app("ab");

        app.on_caps_lock(true);

        assert!(app.controller.presenter().caps_lock);
        assert_eq!(app.controller.session().typed_count(), 0);

        app.on_key(key(KeyCode::Char('A')));
        // plain key events report no lock state
        assert!(!app.controller.presenter().caps_lock);
    }

    #[test]
    fn test_app_tick_without_monitor_changes_nothing() {
        let mut app = app("ab");
        assert!(!app.on_tick(Instant::now()));
        assert!(!app.controller.caps_lock());
    }

    #[test]
    fn test_app_polled_caps_lock_survives_keys() {
        let mut app = app("ab");
        app.caps_monitor = Some(CapsLockMonitor::new(
            Box::new(Fixed(true)) as Box<dyn LockReader>,
            Duration::from_secs(60),
        ));

        assert!(app.on_tick(Instant::now()));
        assert!(app.controller.presenter().caps_lock);
        assert_eq!(app.controller.session().pointer(), 0);

        app.on_key(key(KeyCode::Char('A')));

        assert!(app.controller.caps_lock());
        assert_eq!(app.controller.session().incorrect_count(), 1);
        // not due yet, and nothing changed anyway
        assert!(!app.on_tick(Instant::now()));
    }

    #[test]
    fn test_live_timer_disabled() {
        let mut app = App::new(Box::new(FixedQuote("abc".to_string())), false);
        app.on_key(key(KeyCode::Char('a')));
        assert!(!app.needs_tick());
    }
}
