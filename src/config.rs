use std::path::PathBuf;

use crate::{Credentials, WINNER_IMAGES};

/// Everything we read from the environment at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: String,
    /// Mounted in front of every route, for running behind a shared proxy.
    pub route_prefix: String,
    /// The directory holding `Cards/`.
    pub content_root: PathBuf,
    /// App registration; absent when running against the emulator.
    pub credentials: Option<Credentials>,
    pub winner_images: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from any lookup function, so tests needn't touch the
    /// process environment.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3978".to_string());
        let route_prefix = lookup("ROUTE_PREFIX").unwrap_or_default();
        let content_root = lookup("CONTENT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let app_id = lookup("MICROSOFT_APP_ID").filter(|v| !v.trim().is_empty());
        let app_password = lookup("MICROSOFT_APP_PASSWORD").filter(|v| !v.trim().is_empty());
        let credentials = match (app_id, app_password) {
            (Some(app_id), Some(app_password)) => Some(Credentials {
                app_id,
                app_password,
            }),
            (Some(_), None) | (None, Some(_)) => {
                log::warn!("Only half of MICROSOFT_APP_ID/MICROSOFT_APP_PASSWORD is set; running without credentials");
                None
            }
            (None, None) => None,
        };

        let configured: Vec<String> = lookup("WINNER_IMAGES")
            .map(|v| {
                v.split(',')
                    .map(|url| url.trim().to_string())
                    .filter(|url| !url.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let winner_images = if configured.is_empty() {
            WINNER_IMAGES.iter().map(|url| url.to_string()).collect()
        } else {
            configured
        };

        Config {
            host,
            port,
            route_prefix,
            content_root,
            credentials,
            winner_images,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
