use std::path::PathBuf;

const APP_DIR: &str = "magnetdeck";

pub fn data_dir() -> PathBuf {
    // XDG layout on macOS too, so the log lands in the same place everywhere
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

/// Key/value file holding the persisted base URL.
pub fn session_file() -> PathBuf {
    data_dir().join("session.json")
}

pub fn log_file() -> PathBuf {
    data_dir().join("magnetdeck.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_app_dirs() {
        assert!(session_file().starts_with(data_dir()));
        assert!(log_file().ends_with("magnetdeck.log"));
        assert!(config_dir().ends_with(APP_DIR));
    }
}
