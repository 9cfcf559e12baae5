//! Server configuration.
//!
//! Loaded from a TOML file; a bare context name resolves to
//! `/etc/grocer/<name>.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use shopping::client::ClientConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding all persistent data.
    pub data_dir: String,

    /// Explicit SQLite path; defaults to `{data_dir}/data.sqlite`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
}

/// Server configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    /// Connection details handed to consuming clients (API base URL and
    /// change-feed endpoint/credential).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientConfig>,
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// A value containing `/` or `.` is used as a path directly; anything
    /// else is treated as a context name under `/etc/grocer/`.
    pub fn resolve_path(context: &str) -> PathBuf {
        if context.contains('/') || context.contains('.') {
            PathBuf::from(context)
        } else {
            PathBuf::from("/etc/grocer").join(format!("{context}.toml"))
        }
    }

    /// Load configuration from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_context_name_vs_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/grocer/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("/etc/grocer/custom.toml"),
            PathBuf::from("/etc/grocer/custom.toml")
        );
    }

    #[test]
    fn parse_full_config() {
        let config: ServerConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/var/lib/grocer"

            [client]
            api_base_url = "http://localhost:8080/api"
            feed_url = "ws://localhost:8080/feed"
            feed_key = "dev-key"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, "/var/lib/grocer");
        assert!(config.storage.db_path.is_none());
        let client = config.client.unwrap();
        assert_eq!(client.api_base_url, "http://localhost:8080/api");
        assert_eq!(client.feed_key, "dev-key");
    }

    #[test]
    fn client_table_is_optional() {
        let config: ServerConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/var/lib/grocer"
            db_path = "/var/lib/grocer/grocer.sqlite"
            "#,
        )
        .unwrap();

        assert!(config.client.is_none());
        assert_eq!(
            config.storage.db_path.as_deref(),
            Some("/var/lib/grocer/grocer.sqlite")
        );
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(file, "[storage]\ndata_dir = \"/tmp/grocer\"").unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.storage.data_dir, "/tmp/grocer");
    }
}
