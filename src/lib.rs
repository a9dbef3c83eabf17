//! CancApp: client for the CancApp social feed.
//!
//! The crate is the client side of a small social network: registration and
//! email confirmation, login with a cached credential, a feed of posts with
//! comments, and a user directory with profile maintenance. The remote API is
//! an external collaborator reached over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI shell (main.rs)                                │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Store: root state, dispatch, credential cache    │
//! │  - Slices with pending/fulfilled/rejected           │
//! │  - Route guard, page events                         │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - View models │   │ - JSON cache  │   │ - Operations  │
//! │ - Plain text  │   │ - In-memory   │   │ - Endpoints   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                  │
//!                                      ┌───────────────────────┐
//!                                      │ API Layer (api/)      │
//!                                      │ - reqwest client      │
//!                                      │ - envelopes, errors   │
//!                                      └───────────────────────┘
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory (infrastructure/)                 │
//! │  - Entities, ids, validation, errors (domain/)      │
//! └─────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - stderr logs, OTLP JSON span file                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Lowest to highest precedence: built-in defaults, `config.toml` in the data
//! directory (or `--config PATH`), `CANCAPP_*` environment variables, then
//! command-line flags.
//!
//! ```toml
//! base_url = "https://cancapp.runasp.net/api"
//! page_size = 20
//! post_update_route = "path"
//! trace_level = "debug"
//! trace_file = true
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cancapp::{initialize, Config};
//! use cancapp::worker::Operation;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = initialize(&Config::default())?;
//! store.dispatch(Operation::FetchPosts).await?;
//! println!("{} posts", store.snapshot().posts.all_posts.len());
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, DispatchError, Event, RootState, Route, RouteGuard, Store};
pub use domain::{CancappError, Result};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::JsonCredentialStore;
use worker::{PostUpdateRoute, Worker, WorkerSettings};

pub const DEFAULT_BASE_URL: &str = "https://cancapp.runasp.net/api";

/// Prefix of the environment variables read by [`Config::from_env`].
pub const ENV_PREFIX: &str = "CANCAPP_";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the remote API. Default: [`DEFAULT_BASE_URL`]
    pub base_url: String,

    /// Where the session cache, config file and trace file live.
    pub data_dir: PathBuf,

    /// Feed page requested by `posts/get`. Default: 1
    pub page_number: u32,

    /// Feed page size. Default: 10
    pub page_size: u32,

    /// Where the post id goes on `posts/update`. Default: path
    pub post_update_route: PostUpdateRoute,

    /// Per-request timeout; unset means no timeout.
    pub request_timeout_secs: Option<u64>,

    /// Filter directive for logs and spans, e.g. `"debug"`. `RUST_LOG` wins.
    pub trace_level: Option<String>,

    /// Export spans as OTLP JSON to `<data_dir>/cancapp-otlp.json`.
    pub trace_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: infrastructure::data_dir(),
            page_number: 1,
            page_size: 10,
            post_update_route: PostUpdateRoute::default(),
            request_timeout_secs: None,
            trace_level: None,
            trace_file: false,
        }
    }
}

impl Config {
    /// Parses configuration from a key/value map.
    ///
    /// Every key is optional and falls back to its default when missing or
    /// unparseable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use cancapp::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "25".to_string());
    /// map.insert("page_number".to_string(), "not a number".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 25);
    /// assert_eq!(config.page_number, 1);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let base_url = map
            .get("base_url")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_url);

        let data_dir = map
            .get("data_dir")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map_or(defaults.data_dir, infrastructure::expand_tilde);

        let page_number = parse_or(map, "page_number", defaults.page_number);
        let page_size = parse_or(map, "page_size", defaults.page_size);

        let post_update_route = map
            .get("post_update_route")
            .and_then(|raw| {
                let parsed = PostUpdateRoute::parse(raw);
                if parsed.is_none() {
                    tracing::warn!(value = %raw, "unknown post_update_route, using default");
                }
                parsed
            })
            .unwrap_or(defaults.post_update_route);

        let request_timeout_secs = map
            .get("request_timeout_secs")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0);

        let trace_level = map
            .get("trace_level")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let trace_file = map
            .get("trace_file")
            .and_then(|s| parse_bool(s))
            .unwrap_or(defaults.trace_file);

        Self {
            base_url,
            data_dir,
            page_number,
            page_size,
            post_update_route,
            request_timeout_secs,
            trace_level,
            trace_file,
        }
    }

    /// Collects `CANCAPP_*` variables into a map keyed by the lowercased
    /// suffix, e.g. `CANCAPP_BASE_URL` → `base_url`.
    #[must_use]
    pub fn from_env() -> BTreeMap<String, String> {
        env_map(std::env::vars())
    }

    /// Reads a TOML file into a key/value map.
    ///
    /// Scalars are stringified; tables and arrays are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`CancappError::Io`] if the file cannot be read and
    /// [`CancappError::Config`] if it is not valid TOML.
    pub fn read_toml(path: &Path) -> Result<BTreeMap<String, String>> {
        let raw = std::fs::read_to_string(path)?;
        toml_map(&raw).map_err(|e| CancappError::Config(format!("{}: {e}", path.display())))
    }

    /// Loads configuration from the file and environment layers.
    ///
    /// `explicit` must exist when given; otherwise `config.toml` in the data
    /// directory is read if present. The data directory is `data_dir` when
    /// given, else `CANCAPP_DATA_DIR`, else the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(explicit: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        Self::load_layers(explicit, data_dir, Self::from_env())
    }

    fn load_layers(
        explicit: Option<&Path>,
        data_dir: Option<&Path>,
        mut env: BTreeMap<String, String>,
    ) -> Result<Self> {
        let chosen = data_dir.map(Path::to_path_buf);
        let data_dir = chosen.clone().unwrap_or_else(|| {
            env.get("data_dir")
                .map_or_else(infrastructure::data_dir, |dir| infrastructure::expand_tilde(dir))
        });

        let mut map = match explicit {
            Some(path) => Self::read_toml(path)?,
            None => {
                let path = infrastructure::config_file(&data_dir);
                if path.exists() {
                    Self::read_toml(&path)?
                } else {
                    BTreeMap::new()
                }
            }
        };
        map.entry("data_dir".to_string())
            .or_insert_with(|| data_dir.display().to_string());
        if chosen.is_some() {
            env.remove("data_dir");
            map.insert("data_dir".to_string(), data_dir.display().to_string());
        }
        map.extend(env);

        Ok(Self::from_map(&map))
    }

    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        infrastructure::session_file(&self.data_dir)
    }

    #[must_use]
    pub fn trace_file_path(&self) -> PathBuf {
        infrastructure::trace_file(&self.data_dir)
    }

    #[must_use]
    pub const fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            page_number: self.page_number,
            page_size: self.page_size,
            post_update_route: self.post_update_route,
        }
    }
}

fn parse_or<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str, default: T) -> T {
    map.get(key)
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_map(vars: impl IntoIterator<Item = (String, String)>) -> BTreeMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|suffix| (suffix.to_ascii_lowercase(), value))
        })
        .collect()
}

fn toml_map(raw: &str) -> std::result::Result<BTreeMap<String, String>, toml::de::Error> {
    let table: toml::Table = raw.parse()?;
    Ok(table
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    tracing::warn!(key = %key, "ignoring non-scalar config value");
                    return None;
                }
            };
            Some((key, value))
        })
        .collect())
}

/// Builds the application context from configuration.
///
/// Wires an [`api::ApiClient`] for `config.base_url`, a [`Worker`] with the
/// configured paging and post-update route, and the JSON credential cache in
/// the data directory.
///
/// # Errors
///
/// Returns an error if the base URL is invalid, the HTTP client cannot be
/// built, or the credential cache cannot be opened.
pub fn initialize(config: &Config) -> Result<Store> {
    tracing::debug!(base_url = %config.base_url, data_dir = ?config.data_dir, "initializing cancapp");

    let timeout = config.request_timeout_secs.map(Duration::from_secs);
    let client = api::ApiClient::new(&config.base_url, timeout)?;
    let worker = Worker::new(client, config.worker_settings());
    let credentials = JsonCredentialStore::new(config.session_file())?;

    Ok(Store::new(worker, Box::new(credentials)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_yields_defaults() {
        let config = Config::from_map(&BTreeMap::new());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_number, 1);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.post_update_route, PostUpdateRoute::PathId);
        assert_eq!(config.request_timeout_secs, None);
        assert!(!config.trace_file);
    }

    #[test]
    fn map_values_are_parsed() {
        let map: BTreeMap<String, String> = [
            ("base_url", "http://localhost:5000/api"),
            ("data_dir", "/tmp/cancapp-test"),
            ("post_update_route", "body"),
            ("request_timeout_secs", "30"),
            ("trace_level", "debug"),
            ("trace_file", "yes"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_map(&map);
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cancapp-test"));
        assert_eq!(config.post_update_route, PostUpdateRoute::BodyId);
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert!(config.trace_file);
    }

    #[test]
    fn bad_values_fall_back_per_key() {
        let map: BTreeMap<String, String> = [
            ("page_size", "lots"),
            ("post_update_route", "query"),
            ("request_timeout_secs", "0"),
            ("trace_file", "maybe"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_map(&map);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.post_update_route, PostUpdateRoute::PathId);
        assert_eq!(config.request_timeout_secs, None);
        assert!(!config.trace_file);
    }

    #[test]
    fn env_keys_are_stripped_and_lowercased() {
        let vars = vec![
            ("CANCAPP_BASE_URL".to_string(), "http://x".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ];
        let map = env_map(vars);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("base_url").map(String::as_str), Some("http://x"));
    }

    #[test]
    fn toml_scalars_become_strings() {
        let map = toml_map("page_size = 20\ntrace_file = true\nbase_url = \"http://y\"\n[nested]\na = 1\n")
            .unwrap();
        assert_eq!(map.get("page_size").map(String::as_str), Some("20"));
        assert_eq!(map.get("trace_file").map(String::as_str), Some("true"));
        assert_eq!(map.get("base_url").map(String::as_str), Some("http://y"));
        assert!(!map.contains_key("nested"));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = = 3").unwrap();
        assert!(matches!(Config::read_toml(&path), Err(CancappError::Config(_))));
    }

    #[test]
    fn chosen_data_dir_supplies_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "page_size = 20\n").unwrap();
        let env: BTreeMap<String, String> =
            [("data_dir".to_string(), "/elsewhere".to_string())].into();

        let config = Config::load_layers(None, Some(dir.path()), env).unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn chosen_data_dir_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        std::fs::write(other.path().join("config.toml"), "page_size = 50\n").unwrap();
        let env: BTreeMap<String, String> =
            [("data_dir".to_string(), other.path().display().to_string())].into();

        let config = Config::load_layers(None, Some(dir.path()), env).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn initialize_opens_cache_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            base_url: "http://127.0.0.1:9/api".to_string(),
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let store = initialize(&config).unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn initialize_rejects_bad_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            base_url: "not a url".to_string(),
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        assert!(matches!(initialize(&config), Err(CancappError::Config(_))));
    }
}
