use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

/// Environment variable prefix for every configuration key.
pub const ENV_PREFIX: &str = "CADENCE_";

/// Runtime configuration, layered as defaults < `CADENCE_*` environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub listen_addr: String,
    pub loglevel: String,
    /// Key required for directory/resource inserts. Unset disables them.
    pub admin_key: Option<String>,
    /// Master secret for session cookies, at least 64 bytes.
    pub cookie_secret: Option<String>,
    pub insecure_cookie: bool,
    pub seed_path: Option<PathBuf>,
    pub storage_dir: PathBuf,
    pub public_base_url: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:cadence.db".to_string(),
            db_max_connections: 5,
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            admin_key: None,
            cookie_secret: None,
            insecure_cookie: false,
            seed_path: None,
            storage_dir: PathBuf::from("uploads"),
            public_base_url: Url::parse("http://localhost:8000/files/")
                .expect("default public_base_url is a valid URL"),
        }
    }
}

impl Config {
    /// Build the configuration from defaults and the process environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX))
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});
