use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

/// Command line options for the client.
#[derive(Parser, Debug, Default)]
pub struct Cli {
    /// Override the data directory.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Enable or disable logging (true/false).
    #[arg(long)]
    pub logging: Option<bool>,
    /// Ambient appearance hint (true when the host prefers dark).
    #[arg(long)]
    pub prefers_dark: Option<bool>,
    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Runtime configuration resolved from file, env and CLI.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base directory for the durable key-value store.
    pub data_dir: PathBuf,
    /// Maximum image attachment size in megabytes.
    pub max_upload_mb: u64,
    /// Whether verbose logging is enabled.
    pub logging_enabled: bool,
    /// Ambient appearance of the host, if known.
    pub prefers_dark: Option<bool>,
    /// Simulated OTP send delay.
    pub otp_delay_ms: u64,
    /// Pause between OTP acceptance and the dashboard redirect.
    pub redirect_delay_ms: u64,
    /// Simulated assistant reply delay.
    pub reply_delay_ms: u64,
    /// Quiet window for the search debounce.
    pub search_debounce_ms: u64,
    /// Country directory endpoint.
    pub countries_url: String,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    chat: FileChat,
    #[serde(default)]
    logging: FileLogging,
    #[serde(default)]
    appearance: FileAppearance,
    #[serde(default)]
    countries: FileCountries,
}

#[derive(Deserialize)]
struct FileChat {
    #[serde(default = "default_otp_delay")]
    otp_delay_ms: u64,
    #[serde(default = "default_redirect_delay")]
    redirect_delay_ms: u64,
    #[serde(default = "default_reply_delay")]
    reply_delay_ms: u64,
    #[serde(default = "default_search_debounce")]
    search_debounce_ms: u64,
}

#[derive(Deserialize)]
struct FileLogging {
    #[serde(default = "default_logging")]
    enabled: bool,
}

#[derive(Deserialize, Default)]
struct FileAppearance {
    prefers_dark: Option<bool>,
}

#[derive(Deserialize)]
struct FileCountries {
    #[serde(default = "default_countries_url")]
    url: String,
}

fn default_otp_delay() -> u64 {
    1000
}

fn default_redirect_delay() -> u64 {
    1500
}

fn default_reply_delay() -> u64 {
    1500
}

fn default_search_debounce() -> u64 {
    300
}

fn default_logging() -> bool {
    true
}

fn default_countries_url() -> String {
    crate::countries::DEFAULT_URL.to_string()
}

impl Default for FileChat {
    fn default() -> Self {
        Self {
            otp_delay_ms: default_otp_delay(),
            redirect_delay_ms: default_redirect_delay(),
            reply_delay_ms: default_reply_delay(),
            search_debounce_ms: default_search_debounce(),
        }
    }
}

impl Default for FileLogging {
    fn default() -> Self {
        Self {
            enabled: default_logging(),
        }
    }
}

impl Default for FileCountries {
    fn default() -> Self {
        Self {
            url: default_countries_url(),
        }
    }
}

impl Config {
    /// Resolve configuration from CLI, environment variables, config file and
    /// defaults, in that order of precedence.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut file_cfg = FileConfig::default();

        // config file path precedence: CLI -> ENV -> default
        let config_path = cli
            .config
            .clone()
            .or_else(|| std::env::var("GEMINI_CHAT_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config/gemini_chat.toml"));

        if let Ok(bytes) = fs::read(&config_path) {
            let contents = String::from_utf8_lossy(&bytes);
            file_cfg = toml::from_str(&contents).context("invalid config file")?;
        }

        let mut logging = file_cfg.logging.enabled;
        let mut prefers_dark = file_cfg.appearance.prefers_dark;

        // environment overrides
        if let Ok(value) = std::env::var("GEMINI_CHAT_LOGGING") {
            if let Ok(value) = value.parse::<bool>() {
                logging = value;
            }
        }
        if let Ok(value) = std::env::var("GEMINI_CHAT_PREFERS_DARK") {
            if let Ok(value) = value.parse::<bool>() {
                prefers_dark = Some(value);
            }
        }

        // CLI overrides
        if let Some(value) = cli.logging {
            logging = value;
        }
        if let Some(value) = cli.prefers_dark {
            prefers_dark = Some(value);
        }

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| std::env::var("DATA_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(default_data_dir);
        let max_upload_mb = std::env::var("MAX_UPLOAD_MB")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(5);

        if file_cfg.chat.search_debounce_ms == 0 {
            anyhow::bail!("invalid_debounce");
        }

        Ok(Self {
            data_dir,
            max_upload_mb,
            logging_enabled: logging,
            prefers_dark,
            otp_delay_ms: file_cfg.chat.otp_delay_ms,
            redirect_delay_ms: file_cfg.chat.redirect_delay_ms,
            reply_delay_ms: file_cfg.chat.reply_delay_ms,
            search_debounce_ms: file_cfg.chat.search_debounce_ms,
            countries_url: file_cfg.countries.url,
        })
    }

    /// Helper to return the upload limit in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn otp_delay(&self) -> Duration {
        Duration::from_millis(self.otp_delay_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Determine the default data directory for the client.
pub fn default_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".local/share/gemini_chat");
        path
    } else {
        PathBuf::from("./gemini_chat_data")
    }
}
