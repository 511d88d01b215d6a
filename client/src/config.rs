//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{RoleSelectionPolicy, UnknownVariantError};
use crate::outbound::rest::RestConfig;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("service_url `{value}` is not a valid URL: {source}")]
    InvalidServiceUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("anon_key is required when service_url is set")]
    MissingAnonKey,
    #[error("role_selection: {0}")]
    RoleSelection(#[from] UnknownVariantError),
}

/// Settings for the client binary and adapters.
///
/// Without a `service_url` the binary runs against the in-memory demo
/// backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TEAMUP")]
pub struct ClientSettings {
    /// Root URL of the hosted data service.
    pub service_url: Option<String>,
    /// Public API key for the hosted service.
    pub anon_key: Option<String>,
    /// Access token of the signed-in user.
    pub access_token: Option<String>,
    /// Role selection when an application names no role.
    pub role_selection: Option<String>,
    /// Per-request timeout in seconds. Unset means no timeout.
    pub request_timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Parsed role selection policy, defaulting to first-listed.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::RoleSelection`] for unknown spellings.
    pub fn role_selection(&self) -> Result<RoleSelectionPolicy, SettingsError> {
        self.role_selection
            .as_deref()
            .map_or_else(|| Ok(RoleSelectionPolicy::default()), str::parse)
            .map_err(SettingsError::from)
    }

    /// Configured request timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// REST adapter settings, or `None` when no service is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL does not parse or the anon key is
    /// missing.
    pub fn rest_config(&self) -> Result<Option<RestConfig>, SettingsError> {
        let Some(raw) = self
            .service_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return Ok(None);
        };
        let service_url = Url::parse(raw).map_err(|source| SettingsError::InvalidServiceUrl {
            value: raw.to_owned(),
            source,
        })?;
        let anon_key = self
            .anon_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SettingsError::MissingAnonKey)?;
        Ok(Some(RestConfig {
            service_url,
            anon_key,
            access_token: self.access_token.clone(),
            request_timeout: self.request_timeout(),
        }))
    }
}
