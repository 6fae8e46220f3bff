use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use rabbitmq_admin_api::{AuthMethod, ClientConfig, Scheme, TlsVerification};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_PORT: u16 = 15672;
pub const DEFAULT_TLS_PORT: u16 = 15671;
pub const PASSWORD_ENV: &str = "RABBITMQ_ADMIN_PASSWORD";

/// Connection profiles stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Config {
    /// Load configuration from the provided path or the default config file.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file at {}", path.display()))?;

        serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed YAML in config file {}", path.display()))
    }

    /// Persist the configuration to disk, creating parent directories if needed.
    pub fn save<P: AsRef<Path>>(&self, path: Option<P>) -> Result<()> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let serialized = serde_yaml::to_string(self)?;
        fs::write(&path, serialized)
            .with_context(|| format!("Unable to write config file {}", path.display()))?;

        Ok(())
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Picks the broker's management endpoint: the requested profile, else
    /// `default_profile`, else whichever profile the map yields first. An
    /// unknown requested name yields `None` and never falls back to another
    /// broker.
    pub fn resolve_profile<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Option<(&'a str, &'a Profile)> {
        if let Some(name) = requested {
            self.profiles.get(name).map(|profile| (name, profile))
        } else if let Some(default_name) = self.default_profile.as_deref() {
            self.profiles
                .get(default_name)
                .map(|profile| (default_name, profile))
        } else if let Some((name, profile)) = self.profiles.iter().next() {
            Some((name.as_str(), profile))
        } else {
            None
        }
    }

    fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".rabbitmq-admin");
        path.push("config.yaml");
        path
    }
}

/// One management endpoint. Missing values fall back to broker defaults, so
/// a profile can be as small as a username.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub scheme: Option<Scheme>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
    pub verify_tls: Option<bool>,
    pub ca_bundle: Option<PathBuf>,
}

impl Profile {
    /// Builds the client configuration for the profile called `name`.
    ///
    /// Password lookup: profile file, then `RABBITMQ_ADMIN_PASSWORD_{NAME}`,
    /// then `RABBITMQ_ADMIN_PASSWORD`.
    pub fn client_config(&self, name: &str) -> Result<ClientConfig> {
        self.client_config_with(name, |key| std::env::var(key).ok())
    }

    fn client_config_with<F>(&self, name: &str, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = self
            .username
            .clone()
            .ok_or_else(|| anyhow!("Profile '{name}' is missing a username."))?;
        let password = self.resolve_password(name, lookup).ok_or_else(|| {
            anyhow!(
                "No password found for profile '{name}'. Set {} or {PASSWORD_ENV}.",
                password_env_var(name)
            )
        })?;

        let scheme = self.scheme.unwrap_or_default();
        let port = self.port.unwrap_or(match scheme {
            Scheme::Http => DEFAULT_PORT,
            Scheme::Https => DEFAULT_TLS_PORT,
        });
        let host = self.host.clone().unwrap_or_else(|| "localhost".to_string());

        let mut config = ClientConfig::new(host, port, AuthMethod::basic(username, password))
            .with_scheme(scheme)
            .with_tls_verification(self.tls_verification());

        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    fn resolve_password<F>(&self, name: &str, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.password
            .clone()
            .or_else(|| lookup(&password_env_var(name)).filter(|p| !p.trim().is_empty()))
            .or_else(|| lookup(PASSWORD_ENV).filter(|p| !p.trim().is_empty()))
    }

    fn tls_verification(&self) -> TlsVerification {
        match (&self.ca_bundle, self.verify_tls) {
            (Some(path), _) => TlsVerification::CaBundle(path.clone()),
            (None, Some(false)) => TlsVerification::Disabled,
            (None, _) => TlsVerification::Enabled,
        }
    }
}

fn password_env_var(profile: &str) -> String {
    format!(
        "{PASSWORD_ENV}_{}",
        profile.to_uppercase().replace(['-', '.', ' '], "_")
    )
}
