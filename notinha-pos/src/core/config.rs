use std::path::{Path, PathBuf};

/// Name of the data directory under the user config dir
const APP_DIR_NAME: &str = "goldensky-pos";

/// Process settings
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | NOTINHA_DATA_DIR | `<user config dir>/goldensky-pos` | config, menu and order files |
/// | LOG_LEVEL | info | tracing filter directive |
/// | LOG_DIR | (unset) | daily rolling log files; stdout when unset |
///
/// Restaurant and printer options live in the persisted `config.json`,
/// see `storage::ConfigStore`.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root of all persisted files
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("NOTINHA_DATA_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Settings rooted at a custom data directory
    ///
    /// Commonly used in tests
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let mut settings = Self::from_env();
        settings.data_dir = data_dir.into();
        settings
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    pub fn menu_path(&self) -> PathBuf {
        self.data_dir.join("menu.json")
    }

    pub fn orders_dir(&self) -> PathBuf {
        self.data_dir.join("orders")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_env()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
