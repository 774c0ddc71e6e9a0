//! Caps lock state straight from the desktop, for terminals that never report it
//! in key events.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, trace};

const LEDS_DIR: &str = "/sys/class/leds";

/// Anything that can tell whether caps lock is on right now
pub trait LockReader {
    /// `None` when the state could not be read this time.
    fn read(&self) -> Option<bool>;
}

impl<R: LockReader + ?Sized> LockReader for Box<R> {
    fn read(&self) -> Option<bool> {
        (**self).read()
    }
}

/// System facility used to read the caps lock LED
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// `swaymsg -t get_inputs`
    Sway,
    /// `xset q`
    Xset,
    /// `/sys/class/leds/*capslock*/brightness`
    Sysfs,
}

impl Backend {
    /// First backend that works on this machine, tried in the order sway, X11, sysfs.
    pub fn detect() -> Option<Self> {
        if !cfg!(target_os = "linux") {
            return None;
        }

        let found = [Backend::Sway, Backend::Xset, Backend::Sysfs]
            .into_iter()
            .find(|backend| backend.is_installed() && backend.read().is_some());
        debug!(backend = ?found, "caps lock detection");
        found
    }

    fn is_installed(&self) -> bool {
        match self {
            Backend::Sway => which::which("swaymsg").is_ok(),
            Backend::Xset => which::which("xset").is_ok(),
            Backend::Sysfs => Path::new(LEDS_DIR).is_dir(),
        }
    }
}

impl LockReader for Backend {
    fn read(&self) -> Option<bool> {
        match self {
            Backend::Sway => command_output("swaymsg", &["-t", "get_inputs"])
                .and_then(|out| sway_caps_lock(&out)),
            Backend::Xset => command_output("xset", &["q"]).and_then(|out| xset_caps_lock(&out)),
            Backend::Sysfs => sysfs_caps_lock(Path::new(LEDS_DIR)),
        }
    }
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(program).args(args).output().ok()?;
    if !out.status.success() {
        trace!(program, status = %out.status, "caps lock query failed");
        return None;
    }
    String::from_utf8(out.stdout).ok()
}

/// Read `xkb_active_leds` off every keyboard sway knows about.
pub fn sway_caps_lock(inputs_json: &str) -> Option<bool> {
    let inputs: Value = serde_json::from_str(inputs_json).ok()?;
    let mut seen = false;
    for leds in inputs
        .as_array()?
        .iter()
        .filter_map(|input| input.get("xkb_active_leds")?.as_array())
    {
        seen = true;
        if leds
            .iter()
            .filter_map(Value::as_str)
            .any(|led| led.eq_ignore_ascii_case("caps lock"))
        {
            return Some(true);
        }
    }
    seen.then_some(false)
}

/// Find the `Caps Lock: on|off` field in `xset q` output.
pub fn xset_caps_lock(output: &str) -> Option<bool> {
    output.lines().find_map(|line| {
        let lower = line.to_lowercase();
        let pos = lower.find("caps lock:")?;
        match lower[pos + "caps lock:".len()..].split_whitespace().next()? {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        }
    })
}

/// Any LED named like a caps lock LED with a non-zero brightness.
pub fn sysfs_caps_lock(leds_dir: &Path) -> Option<bool> {
    let mut seen = false;
    for entry in fs::read_dir(leds_dir).ok()?.flatten() {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.contains("capslock") {
            continue;
        }
        let Ok(brightness) = fs::read_to_string(entry.path().join("brightness")) else {
            continue;
        };
        seen = true;
        if brightness.trim().parse::<u32>().is_ok_and(|level| level > 0) {
            return Some(true);
        }
    }
    seen.then_some(false)
}

/// Reads the lock state at most once per interval
pub struct CapsLockMonitor<R: LockReader = Backend> {
    reader: R,
    every: Duration,
    last_read: Option<Instant>,
}

impl<R: LockReader> CapsLockMonitor<R> {
    pub fn new(reader: R, every: Duration) -> Self {
        Self {
            reader,
            every,
            last_read: None,
        }
    }

    /// The current state when a read is due and succeeds.
    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        if let Some(last) = self.last_read {
            if now.saturating_duration_since(last) < self.every {
                return None;
            }
        }
        self.last_read = Some(now);
        self.reader.read()
    }
}
