use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "blitz";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("blitz_config.json"))
    }

    /// Log file under `$HOME/.local/state/blitz`, falling back to the platform data dir.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME);
            Some(state_dir.join("blitz.log"))
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().join("blitz.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_name_the_app() {
        assert!(AppDirs::config_path().ends_with("config.json"));
        if let Some(log) = AppDirs::log_path() {
            assert!(log.ends_with("blitz.log"));
            assert!(log.to_string_lossy().contains(APP_NAME));
        }
    }
}
