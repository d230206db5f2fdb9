use std::{env, path::PathBuf, time::Duration};

use super::schema::Settings;

const APP_DIR: &str = "soundscaper";

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SOUNDSCAPER__`),
/// then an optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SOUNDSCAPER")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let v = self.mixer.default_volume;
        if !(0.0..=1.0).contains(&v) {
            return Err(format!("mixer.default_volume must be within [0, 1], got {v}"));
        }
        let step = self.mixer.volume_step;
        if !(step > 0.0 && step <= 1.0) {
            return Err(format!("mixer.volume_step must be within (0, 1], got {step}"));
        }
        if self.network.timeout_secs == 0 {
            return Err("network.timeout_secs must be >= 1".to_string());
        }
        let template = self.freesound.preview_url_template.trim();
        if !template.is_empty() && !template.contains("{id}") {
            return Err("freesound.preview_url_template must contain {id}".to_string());
        }
        Ok(())
    }

    pub fn sounds_dir(&self) -> Option<PathBuf> {
        self.storage
            .sounds_dir
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("sounds")))
    }

    pub fn records_dir(&self) -> Option<PathBuf> {
        self.storage
            .records_dir
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("soundscapes")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }
}

/// Resolve the config path from `SOUNDSCAPER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SOUNDSCAPER_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/soundscaper/config.toml`
/// or `~/.config/soundscaper/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("config.toml"))
}

/// `$XDG_DATA_HOME/soundscaper` or `~/.local/share/soundscaper`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    let base = if let Some(xdg) = env::var_os(var).filter(|v| !v.is_empty()) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    };
    base.map(|d| d.join(APP_DIR))
}
