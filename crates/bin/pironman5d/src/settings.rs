//! Daemon settings: TOML file with environment variable overrides.
//!
//! Looks for `pironman5.toml` in the working directory, or at the path in
//! `PIRONMAN5_SETTINGS`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.
//!
//! These settings describe how the daemon runs (where files live, which
//! address the dashboard binds). The device configuration edited by users is
//! the JSON document at [`ConfigSection::path`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use pironman_domain::log_level::LogLevel;

const DEFAULT_SETTINGS_PATH: &str = "pironman5.toml";

/// Top-level settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Persisted config document.
    pub config: ConfigSection,
    /// Web dashboard.
    pub dashboard: DashboardSection,
    /// OLED display.
    pub oled: OledSection,
    /// Automation controller.
    pub automation: AutomationSection,
    /// Logging.
    pub logging: LoggingSection,
}

/// Location of the JSON config document.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConfigSection {
    pub path: PathBuf,
}

/// Dashboard listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    /// Run the dashboard when the build includes it.
    pub enabled: bool,
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OledSection {
    pub ready: bool,
    /// GIF shown once startup completes. Empty disables the splash.
    pub splash_gif: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AutomationSection {
    /// Kernel thermal zone read for the CPU temperature.
    pub thermal_zone: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    /// Level applied to the daemon and its collaborators after startup.
    pub debug_level: Option<LogLevel>,
}

impl Settings {
    /// Load settings from `pironman5.toml` (or `PIRONMAN5_SETTINGS`) if
    /// present, then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting settings are invalid.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var("PIRONMAN5_SETTINGS")
            .unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        let mut settings = Self::from_file(Path::new(&path))?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(SettingsError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(SettingsError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SettingsError> {
        if let Some(val) = var("PIRONMAN5_CONFIG") {
            self.config.path = PathBuf::from(val);
        }
        if let Some(val) = var("PIRONMAN5_HOST") {
            self.dashboard.host = val;
        }
        if let Some(val) = var("PIRONMAN5_PORT") {
            self.dashboard.port = parse_port("PIRONMAN5_PORT", &val)?;
        }
        if let Some(val) = var("PIRONMAN5_BIND") {
            let (host, port) = val.rsplit_once(':').ok_or_else(|| {
                SettingsError::Validation(format!("PIRONMAN5_BIND must be host:port, got `{val}`"))
            })?;
            self.dashboard.port = parse_port("PIRONMAN5_BIND", port)?;
            self.dashboard.host = host.to_string();
        }
        if let Some(val) = var("PIRONMAN5_SPLASH") {
            self.oled.splash_gif = PathBuf::from(val);
        }
        if let Some(val) = var("PIRONMAN5_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("PIRONMAN5_DEBUG_LEVEL") {
            let level = val
                .parse()
                .map_err(|err| SettingsError::Validation(format!("PIRONMAN5_DEBUG_LEVEL: {err}")))?;
            self.logging.debug_level = Some(level);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.dashboard.port == 0 {
            return Err(SettingsError::Validation("port must be non-zero".to_string()));
        }
        if self.config.path.as_os_str().is_empty() {
            return Err(SettingsError::Validation(
                "config path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the dashboard `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.dashboard.host, self.dashboard.port)
    }

    /// Splash GIF path, unless disabled.
    #[must_use]
    pub fn splash_gif(&self) -> Option<&Path> {
        let path = self.oled.splash_gif.as_path();
        (!path.as_os_str().is_empty()).then_some(path)
    }
}

fn parse_port(var: &str, value: &str) -> Result<u16, SettingsError> {
    value
        .parse()
        .map_err(|_| SettingsError::Validation(format!("{var}: invalid port `{value}`")))
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/opt/pironman5/config.json"),
        }
    }
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "0.0.0.0".to_string(),
            port: 34001,
        }
    }
}

impl Default for OledSection {
    fn default() -> Self {
        Self {
            ready: true,
            splash_gif: PathBuf::from("/opt/pironman5/mgunnp.gif"),
        }
    }
}

impl Default for AutomationSection {
    fn default() -> Self {
        Self {
            thermal_zone: PathBuf::from(pironman_adapter_virtual::DEFAULT_THERMAL_ZONE),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "pironman5d=info,pironman=info,tower_http=info".to_string(),
            debug_level: None,
        }
    }
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// TOML parse failure.
    #[error("failed to parse settings file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read settings file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid settings: {0}")]
    Validation(String),
}
