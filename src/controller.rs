use std::time::SystemTime;

use tracing::{debug, error, info};

use crate::keys::{Key, KeyPress};
use crate::presenter::Presenter;
use crate::quotes::{prepare_target, QuoteSource};
use crate::session::{CharState, KeyEffect, Session};
use crate::stats::Stats;

/// What the controller did with one key event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Reset,
    Applied(KeyEffect),
}

/// Owns the live session; the single place key events turn into state changes
pub struct SessionController<Q: QuoteSource, P: Presenter> {
    source: Q,
    presenter: P,
    session: Session,
    stats: Option<Stats>,
    attribution: Option<String>,
    caps_lock: bool,
}

impl<Q: QuoteSource, P: Presenter> SessionController<Q, P> {
    /// Build a controller and start the first session right away.
    pub fn new(source: Q, presenter: P) -> Self {
        let mut controller = Self {
            source,
            presenter,
            session: Session::default(),
            stats: None,
            attribution: None,
            caps_lock: false,
        };
        controller.start();
        controller
    }

    /// Discard whatever is in flight and begin a session on fresh text.
    pub fn start(&mut self) {
        let raw = self.source.next_quote();
        // the fallback text belongs to nobody
        self.attribution = match raw.trim() {
            "" => None,
            _ => self.source.attribution().map(str::to_owned),
        };
        self.begin(Session::new(prepare_target(&raw)).unwrap_or_default());
    }

    /// Begin again on the current text.
    pub fn retry(&mut self) {
        let session = self.session.restarted();
        self.begin(session);
    }

    fn begin(&mut self, session: Session) {
        debug!(chars = session.target().len(), "starting session");
        self.session = session;
        self.stats = None;
        self.presenter.on_reset(self.session.text());
        self.presenter.on_cursor(0);
    }

    pub fn handle_key_event(&mut self, event: impl Into<KeyPress>) -> Dispatch {
        self.handle_key_event_at(event, SystemTime::now())
    }

    pub fn handle_key_event_at(&mut self, event: impl Into<KeyPress>, now: SystemTime) -> Dispatch {
        let press = event.into();
        self.update_caps_lock(press.caps_lock);

        if press.key == Key::Escape {
            self.start();
            return Dispatch::Reset;
        }

        let effect = self.session.apply_key_at(press.key, now);
        match effect {
            KeyEffect::Ignored => {}
            KeyEffect::Judged {
                index,
                state,
                finished,
            } => {
                self.presenter.on_char_state(index, state);
                self.presenter.on_cursor(self.session.pointer());
                if finished {
                    self.finish();
                }
            }
            KeyEffect::Erased { index } => {
                self.presenter.on_char_state(index, CharState::Untyped);
                self.presenter.on_cursor(self.session.pointer());
            }
        }

        Dispatch::Applied(effect)
    }

    fn finish(&mut self) {
        match Stats::compute(&self.session) {
            Ok(stats) => {
                info!(
                    wpm = %stats.speed,
                    accuracy = stats.accuracy,
                    duration = %stats.duration_text,
                    "session complete"
                );
                self.presenter.on_finished(&stats);
                self.stats = Some(stats);
            }
            Err(err) => error!(%err, "finished session produced no stats"),
        }
    }

    /// Record the caps lock state without touching the session, e.g. when the
    /// lock key itself is released or the system reports a change.
    pub fn update_caps_lock(&mut self, on: bool) {
        if self.caps_lock != on {
            self.caps_lock = on;
            self.presenter.on_caps_lock(on);
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn caps_lock(&self) -> bool {
        self.caps_lock
    }

    /// Author of the current text, if the source knows one
    pub fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }
}
