use std::path::PathBuf;
use std::time::Duration;

/// Overrides the default source file.
pub const DATA_PATH_ENV: &str = "SALES_DASHBOARD_DATA";

const DEFAULT_DATA_PATH: &str = "Adidas US Sales Datasets.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Sales file loaded at startup.
    pub data_path: PathBuf,
    /// How often the source file is checked for changes.
    pub stale_check_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            stale_check_interval: Duration::from_secs(2),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::with_data_override(std::env::var_os(DATA_PATH_ENV).map(PathBuf::from))
    }

    fn with_data_override(data_path: Option<PathBuf>) -> Self {
        let mut config = Self::default();
        if let Some(path) = data_path.filter(|p| !p.as_os_str().is_empty()) {
            log::debug!("Using data file from ${DATA_PATH_ENV}: {}", path.display());
            config.data_path = path;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_bundled_dataset() {
        let config = DashboardConfig::with_data_override(None);
        assert_eq!(config.data_path, PathBuf::from("Adidas US Sales Datasets.csv"));
        assert_eq!(config.stale_check_interval, Duration::from_secs(2));
    }

    #[test]
    fn override_replaces_path() {
        let config = DashboardConfig::with_data_override(Some("/tmp/q3.parquet".into()));
        assert_eq!(config.data_path, PathBuf::from("/tmp/q3.parquet"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let config = DashboardConfig::with_data_override(Some(PathBuf::new()));
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }
}
