use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::report::ReportKind;
use crate::error::{AppError, AppResult};

const APP_DIRECTORY: &str = "daily-digest";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_PATH_VAR: &str = "DAILY_DIGEST_CONFIG";

const DEFAULT_JIRA_BATCH_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub jira: JiraSettings,
    pub bitbucket: BitbucketSettings,
    pub standup: ReportSettings,
    pub eod: ReportSettings,
    pub default_producer: Option<String>,
    pub default_namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JiraSettings {
    pub host: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub batch_size: u32,
    pub delay_ms: u64,
}

impl Default for JiraSettings {
    fn default() -> Self {
        Self {
            host: None,
            email: None,
            api_token: None,
            batch_size: DEFAULT_JIRA_BATCH_SIZE,
            delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BitbucketSettings {
    pub workspace: Option<String>,
    pub username: Option<String>,
    pub api_token: Option<String>,
    pub selected_user: Option<String>,
    pub default_repository: Option<String>,
}

impl BitbucketSettings {
    /// The account whose open pull requests are searched.
    pub fn lookup_user(&self) -> Option<&str> {
        self.selected_user
            .as_deref()
            .or(self.username.as_deref())
            .filter(|user| !user.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub track_accomplishments: bool,
}

impl ReportSettings {
    fn tracking() -> Self {
        Self {
            track_accomplishments: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jira: JiraSettings::default(),
            bitbucket: BitbucketSettings::default(),
            standup: ReportSettings::default(),
            eod: ReportSettings::tracking(),
            default_producer: None,
            default_namespace: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let path = match env::var_os(CONFIG_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => config_file_path()?,
        };
        let mut config = Self::from_path(&path)?;
        config.apply_overrides(|name| env::var(name).ok());
        Ok(config)
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(value) = read("DAILY_DIGEST_JIRA_HOST") {
            self.jira.host = Some(value);
        }
        if let Some(value) = read("DAILY_DIGEST_JIRA_EMAIL") {
            self.jira.email = Some(value);
        }
        if let Some(value) = read("DAILY_DIGEST_JIRA_API_TOKEN") {
            self.jira.api_token = Some(value);
        }
        if let Some(value) = read("DAILY_DIGEST_BITBUCKET_WORKSPACE") {
            self.bitbucket.workspace = Some(value);
        }
        if let Some(value) = read("DAILY_DIGEST_BITBUCKET_USERNAME") {
            self.bitbucket.username = Some(value);
        }
        if let Some(value) = read("DAILY_DIGEST_BITBUCKET_API_TOKEN") {
            self.bitbucket.api_token = Some(value);
        }
    }

    pub fn report(&self, kind: ReportKind) -> &ReportSettings {
        match kind {
            ReportKind::Standup => &self.standup,
            ReportKind::EndOfDay => &self.eod,
        }
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIRECTORY))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine configuration directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
