//! Service configuration loaded from the environment.
//!
//! A `.env` file is read first when present; real environment variables
//! win. Variable names are the upper-case field names
//! (`API_BIND`, `TMDB_ACCESS_TOKEN`, ...).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Socket address the HTTP API listens on
    #[serde(default = "default_api_bind")]
    pub api_bind: String,

    /// Single origin allowed by CORS
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    /// v4 read access token; preferred over the api key
    #[serde(default)]
    pub tmdb_access_token: Option<String>,

    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// Upper bound on the candidate pool per request
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Same-director films added to the pool
    #[serde(default = "default_director_filmography_limit")]
    pub director_filmography_limit: usize,

    /// Optional JSON file overriding ranking constants
    #[serde(default)]
    pub ranking_config: Option<PathBuf>,
}

fn default_api_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_tmdb_base_url() -> String {
    sources::tmdb::DEFAULT_BASE_URL.to_string()
}

fn default_max_candidates() -> usize {
    sources::gather::DEFAULT_MAX_CANDIDATES
}

fn default_director_filmography_limit() -> usize {
    sources::gather::DEFAULT_FILMOGRAPHY_LIMIT
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_bind: default_api_bind(),
            cors_origin: default_cors_origin(),
            tmdb_base_url: default_tmdb_base_url(),
            tmdb_access_token: None,
            tmdb_api_key: None,
            max_candidates: default_max_candidates(),
            director_filmography_limit: default_director_filmography_limit(),
            ranking_config: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `.env` and environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<ServiceConfig>().context("Failed to load service config")
    }

    /// Build from an explicit set of variables, ignoring the process environment
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, ServiceConfig>(vars).context("Failed to load service config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.api_bind, "127.0.0.1:3000");
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert_eq!(config.tmdb_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.max_candidates, 45);
        assert_eq!(config.director_filmography_limit, 10);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_vars(vars(&[
            ("API_BIND", "0.0.0.0:8080"),
            ("TMDB_ACCESS_TOKEN", "token"),
            ("MAX_CANDIDATES", "30"),
            ("RANKING_CONFIG", "ranking.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_bind, "0.0.0.0:8080");
        assert_eq!(config.tmdb_access_token.as_deref(), Some("token"));
        assert_eq!(config.tmdb_api_key, None);
        assert_eq!(config.max_candidates, 30);
        assert_eq!(config.ranking_config, Some(PathBuf::from("ranking.json")));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        assert!(ServiceConfig::from_vars(vars(&[("MAX_CANDIDATES", "lots")])).is_err());
    }
}
