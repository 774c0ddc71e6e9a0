use crate::session::CharState;
use crate::stats::Stats;

/// One-way notifications from the session controller to whatever draws the game
pub trait Presenter {
    /// A new target text is up; every character is untyped again.
    fn on_reset(&mut self, target: &str);
    fn on_char_state(&mut self, index: usize, state: CharState);
    fn on_cursor(&mut self, pointer: usize);
    fn on_finished(&mut self, stats: &Stats);
    fn on_caps_lock(&mut self, on: bool);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn on_reset(&mut self, target: &str) {
        (**self).on_reset(target)
    }

    fn on_char_state(&mut self, index: usize, state: CharState) {
        (**self).on_char_state(index, state)
    }

    fn on_cursor(&mut self, pointer: usize) {
        (**self).on_cursor(pointer)
    }

    fn on_finished(&mut self, stats: &Stats) {
        (**self).on_finished(stats)
    }

    fn on_caps_lock(&mut self, on: bool) {
        (**self).on_caps_lock(on)
    }
}

/// Mirror of what should be on screen, rebuilt purely from notifications
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    pub target: Vec<char>,
    pub states: Vec<CharState>,
    pub cursor: usize,
    pub stats: Option<Stats>,
    pub caps_lock: bool,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.stats.is_some()
    }
}

impl Presenter for ScreenState {
    fn on_reset(&mut self, target: &str) {
        self.target = target.chars().collect();
        self.states = vec![CharState::Untyped; self.target.len()];
        self.cursor = 0;
        self.stats = None;
    }

    fn on_char_state(&mut self, index: usize, state: CharState) {
        if let Some(slot) = self.states.get_mut(index) {
            *slot = state;
        }
    }

    fn on_cursor(&mut self, pointer: usize) {
        self.cursor = pointer;
    }

    fn on_finished(&mut self, stats: &Stats) {
        self.stats = Some(stats.clone());
    }

    fn on_caps_lock(&mut self, on: bool) {
        self.caps_lock = on;
    }
}
