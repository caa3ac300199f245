use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub api_url: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
        }
    }
}

pub fn load_settings() -> DashboardSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file, then the environment.
pub fn load_settings_from(
    settings_file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> DashboardSettings {
    let mut settings = DashboardSettings::default();

    if let Ok(raw) = fs::read_to_string(settings_file) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url") {
                    settings.api_url = v.clone();
                }
            }
            Err(err) => tracing::warn!(
                path = %settings_file.display(),
                "ignoring unreadable settings file: {err}"
            ),
        }
    }

    if let Some(v) = env("CHURN_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    settings
}

/// Validates the service base URL and strips trailing slashes so endpoint
/// paths can be appended directly.
pub fn prepare_api_url(raw_api_url: &str) -> anyhow::Result<String> {
    let raw_api_url = raw_api_url.trim();
    if raw_api_url.is_empty() {
        return Ok(DEFAULT_API_URL.to_string());
    }

    let parsed = Url::parse(raw_api_url)
        .with_context(|| format!("invalid churn service url '{raw_api_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "churn service url '{raw_api_url}' must use http or https, not '{}'",
            parsed.scheme()
        );
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        bail!("churn service url '{raw_api_url}' must not carry a query or fragment");
    }

    Ok(raw_api_url.trim_end_matches('/').to_string())
}
