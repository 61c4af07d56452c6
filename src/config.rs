use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_DESCRIPTOR_URL: &str =
    "https://raw.githubusercontent.com/linecodemanager/Rifas/main/update.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub update: UpdateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Remote JSON descriptor polled for new releases
    #[serde(default = "default_descriptor_url")]
    pub descriptor_url: String,
    /// Version code of the running build; remote must be strictly greater
    #[serde(default = "default_version_code")]
    pub current_version_code: i64,
    /// Where downloaded packages land (system temp dir when unset)
    #[serde(default)]
    pub download_dir: Option<String>,
    #[serde(default = "default_package_file_name")]
    pub package_file_name: String,
    /// Program plus args; the package path is appended as the last argument
    #[serde(default)]
    pub installer_command: Option<String>,
    #[serde(default = "default_true")]
    pub check_on_startup: bool,
    #[serde(default)]
    pub check_interval_secs: Option<u64>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_descriptor_url() -> String {
    DEFAULT_DESCRIPTOR_URL.to_string()
}

fn default_version_code() -> i64 {
    1
}

fn default_package_file_name() -> String {
    "rifas_update.apk".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            descriptor_url: default_descriptor_url(),
            current_version_code: default_version_code(),
            download_dir: None,
            package_file_name: default_package_file_name(),
            installer_command: None,
            check_on_startup: true,
            check_interval_secs: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl UpdateConfig {
    pub fn download_dir(&self) -> std::path::PathBuf {
        match &self.download_dir {
            Some(dir) if !dir.trim().is_empty() => std::path::PathBuf::from(dir),
            _ => env::temp_dir(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_path(&config_path)
    }

    pub fn from_path(config_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            // No file: build from env vars and defaults
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_defaults(),
            Err(e) => {
                return Err(format!("cannot read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        toml::from_str(config_str).map_err(|e| format!("failed to parse config file: {e}").into())
    }

    fn from_defaults() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://rifas.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            update: UpdateConfig::default(),
        }
    }

    /// Env vars win over file values even when the file exists.
    fn apply_env_overrides(&mut self) {
        fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|v| v.parse::<T>().ok())
        }

        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = parsed("SERVER_PORT") {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(mc) = parsed("DB_MAX_CONNECTIONS") {
            self.database.max_connections = mc;
        }

        if let Ok(v) = env::var("UPDATE_DESCRIPTOR_URL") {
            self.update.descriptor_url = v;
        }
        if let Some(code) = parsed("APP_VERSION_CODE") {
            self.update.current_version_code = code;
        }
        if let Ok(v) = env::var("UPDATE_DOWNLOAD_DIR") {
            self.update.download_dir = Some(v);
        }
        if let Ok(v) = env::var("UPDATE_PACKAGE_FILE_NAME") {
            self.update.package_file_name = v;
        }
        if let Ok(v) = env::var("UPDATE_INSTALLER_COMMAND") {
            self.update.installer_command = Some(v);
        }
        if let Some(flag) = parsed("UPDATE_CHECK_ON_STARTUP") {
            self.update.check_on_startup = flag;
        }
        if let Some(secs) = parsed("UPDATE_CHECK_INTERVAL_SECS") {
            self.update.check_interval_secs = Some(secs);
        }
        if let Some(secs) = parsed("UPDATE_REQUEST_TIMEOUT_SECS") {
            self.update.request_timeout_secs = secs;
        }
    }
}
