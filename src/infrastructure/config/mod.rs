//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::application::content::DEFAULT_FAQ_URL;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub slack: SlackConfig,
    pub onboarding: OnboardingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlackConfig {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OnboardingConfig {
    /// Substrings that fire the informational auto-reply.
    pub trigger_words: Vec<String>,
    /// Channels the bot reacts to message traffic in.
    pub channels: Vec<String>,
    /// User groups whose members count as admins.
    pub admin_groups: Vec<String>,
    /// Individually configured admin users.
    pub admin_users: Vec<String>,
    /// Users whose messages are never reacted to.
    pub ignored_users: Vec<String>,
    pub faq_url: String,
    /// Admins do not get trigger-word auto-replies when set.
    pub admins_bypass_triggers: bool,
    /// Restrict welcome-on-join to monitored channels when set.
    pub filter_joins: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slack: SlackConfig { token: None },
            onboarding: OnboardingConfig {
                trigger_words: Vec::new(),
                channels: Vec::new(),
                admin_groups: Vec::new(),
                admin_users: Vec::new(),
                ignored_users: Vec::new(),
                faq_url: DEFAULT_FAQ_URL.to_string(),
                admins_bypass_triggers: true,
                filter_joins: false,
            },
        }
    }
}

/// Split a comma list, dropping blanks.
fn comma_set(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Overlay environment variables on top of the loaded file.
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("SLACK_BOT_TOKEN") {
            self.slack.token = Some(token);
        }
        if let Ok(words) = std::env::var("ONBOARD_TRIGGER_WORDS") {
            self.onboarding.trigger_words = comma_set(&words);
        }
        if let Ok(channels) = std::env::var("ONBOARD_CHANNELS") {
            self.onboarding.channels = comma_set(&channels);
        }
        if let Ok(groups) = std::env::var("ONBOARD_ADMIN_GROUPS") {
            self.onboarding.admin_groups = comma_set(&groups);
        }
        if let Ok(users) = std::env::var("ONBOARD_ADMIN_USERS") {
            self.onboarding.admin_users = comma_set(&users);
        }
        if let Ok(users) = std::env::var("ONBOARD_IGNORE_USERS") {
            self.onboarding.ignored_users = comma_set(&users);
        }
        if let Ok(url) = std::env::var("ONBOARD_FAQ_URL") {
            self.onboarding.faq_url = url;
        }
    }

    pub fn token(&self) -> Result<&str, ConfigError> {
        self.slack
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("slack.token".to_string()))
    }

    pub fn trigger_words(&self) -> HashSet<String> {
        to_set(&self.onboarding.trigger_words)
    }

    pub fn channels(&self) -> HashSet<String> {
        to_set(&self.onboarding.channels)
    }

    pub fn admin_groups(&self) -> HashSet<String> {
        to_set(&self.onboarding.admin_groups)
    }

    pub fn admin_users(&self) -> HashSet<String> {
        to_set(&self.onboarding.admin_users)
    }

    pub fn ignored_users(&self) -> HashSet<String> {
        to_set(&self.onboarding.ignored_users)
    }
}
