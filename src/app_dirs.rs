use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Log file under $HOME/.local/state/quotype, or the platform data dir without $HOME
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("quotype");
            Some(state_dir.join("quotype.log"))
        } else {
            ProjectDirs::from("", "", "quotype")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("quotype.log"))
        }
    }
}
