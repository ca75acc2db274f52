use leptos::prelude::{server, ServerFnError};
use leptos::server_fn::error::NoCustomError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use dotenv::dotenv;
use thiserror::Error;

use crate::data::wizard::{DateWindow, WizardConfig, DEFAULT_RESET_DELAY};

/// API root baked in at compile time, overridable through `settings.yaml`.
pub const DEFAULT_API_BASE_URL: &str = match option_env!("LEAGUE_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:8000/api/",
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' not found")]
    MissingEnv(String),
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the booking REST API; may be `${ENV_VAR}`.
    pub api_base_url: String,
    /// Show the court step (5-step flow) instead of the 4-step flow.
    pub court_step: bool,
    /// How long the confirmation is shown, in milliseconds.
    pub reset_delay_ms: u64,
    /// Credentials used by the `api_probe` dev tool only.
    pub probe_email: String,
    pub probe_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            court_step: true,
            reset_delay_ms: DEFAULT_RESET_DELAY.as_millis() as u64,
            probe_email: String::new(),
            probe_password: String::new(),
        }
    }
}

impl Settings {
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        dotenv().ok();

        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_yaml::from_str(contents)?;

        settings.api_base_url = parse_env_var(&settings.api_base_url)?;
        settings.probe_email = parse_env_var(&settings.probe_email)?;
        settings.probe_password = parse_env_var(&settings.probe_password)?;

        Ok(settings)
    }

    /// `settings.yaml` if present, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        if path.as_ref().exists() {
            Self::from_yaml(path)
        } else {
            log::info!("no {} found, using default settings", path.as_ref().display());
            Ok(Self::default())
        }
    }

    /// The part of the settings the browser needs. Probe credentials stay
    /// on the server.
    pub fn client(&self) -> ClientSettings {
        ClientSettings {
            api_base_url: self.api_base_url.clone(),
            court_step: self.court_step,
            reset_delay_ms: self.reset_delay_ms,
        }
    }

    pub fn wizard_config(&self) -> WizardConfig {
        self.client().wizard_config()
    }
}

/// Settings shipped to the browser with the server-rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub court_step: bool,
    pub reset_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Settings::default().client()
    }
}

impl ClientSettings {
    pub fn wizard_config(&self) -> WizardConfig {
        WizardConfig {
            court_step: self.court_step,
            date_window: if self.court_step {
                DateWindow::TodayOrTomorrow
            } else {
                DateWindow::FromToday
            },
            reset_delay: Duration::from_millis(self.reset_delay_ms),
        }
    }
}

#[server(GetClientSettings)]
pub async fn get_client_settings() -> Result<ClientSettings, ServerFnError> {
    let settings = match leptos::prelude::use_context::<Settings>() {
        Some(settings) => settings,
        None => Settings::load_or_default("settings.yaml")
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?,
    };
    Ok(settings.client())
}

fn parse_env_var(value: &str) -> Result<String, SettingsError> {
    if value.starts_with("${") && value.ends_with('}') {
        let env_name = &value[2..value.len() - 1];
        env::var(env_name).map_err(|_| SettingsError::MissingEnv(env_name.to_string()))
    } else {
        Ok(value.to_string())
    }
}
