//! Server configuration
//!
//! Resolution priority for every setting:
//! 1. Command-line argument or its environment variable
//! 2. TOML config file
//! 3. Compiled default

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use mbti_common::config::{self as common_config, TomlConfig};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Log filter used when neither `RUST_LOG` nor a configured level is set
pub const DEFAULT_LOG_FILTER: &str = "mbti_server=info,mbti_common=info,tower_http=info";

/// Command-line arguments for mbti-server
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mbti-server")]
#[command(about = "Personality quiz HTTP service")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MBTI_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "MBTI_HOST")]
    pub host: Option<String>,

    /// Folder holding mbti.db
    #[arg(short, long, env = "MBTI_ROOT_FOLDER")]
    pub root_folder: Option<PathBuf>,

    /// TOML config file (defaults to the platform config location)
    #[arg(short, long, env = "MBTI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bearer token signing secret (overrides the one stored in the database)
    #[arg(long, env = "MBTI_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: Option<String>,

    /// Log filter, e.g. "debug" or "mbti_server=trace"
    #[arg(long, env = "MBTI_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Fully resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub token_secret: Option<String>,
    pub log_filter: String,
}

impl ServerConfig {
    /// Merge arguments over an optional TOML file
    pub fn resolve(args: &Args, toml_config: Option<&TomlConfig>) -> Self {
        let root_folder =
            common_config::resolve_root_folder(args.root_folder.as_deref(), toml_config);
        let database_path = common_config::database_path(&root_folder);

        Self {
            host: args
                .host
                .clone()
                .or_else(|| toml_config.and_then(|c| c.host.clone()))
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args
                .port
                .or_else(|| toml_config.and_then(|c| c.port))
                .unwrap_or(DEFAULT_PORT),
            root_folder,
            database_path,
            token_secret: args
                .token_secret
                .clone()
                .or_else(|| toml_config.and_then(|c| c.token_secret.clone()))
                .filter(|s| !s.trim().is_empty()),
            log_filter: args
                .log_level
                .clone()
                .or_else(|| toml_config.and_then(|c| c.log_level.clone()))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Socket address to bind; `host` must be an IP literal
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Load the TOML file named on the command line, or the platform default
pub fn load_toml(args: &Args) -> mbti_common::Result<Option<TomlConfig>> {
    match &args.config {
        Some(path) => TomlConfig::load(path).map(Some),
        None => TomlConfig::load_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["mbti-server"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    #[serial]
    fn test_defaults_without_toml() {
        let config = ServerConfig::resolve(&args(&["--root-folder", "/tmp/mbti-test"]), None);

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from("/tmp/mbti-test/mbti.db"));
        assert_eq!(config.token_secret, None);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    #[serial]
    fn test_toml_fills_unset_arguments() {
        let toml_config = TomlConfig::parse(
            r#"
            root_folder = "/srv/mbti"
            host = "0.0.0.0"
            port = 8080
            log_level = "debug"
            token_secret = "from-file"
            "#,
        )
        .unwrap();

        let config = ServerConfig::resolve(&args(&[]), Some(&toml_config));

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.root_folder, PathBuf::from("/srv/mbti"));
        assert_eq!(config.token_secret.as_deref(), Some("from-file"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    #[serial]
    fn test_arguments_override_toml() {
        let toml_config = TomlConfig::parse("port = 8080\nhost = \"0.0.0.0\"").unwrap();

        let config = ServerConfig::resolve(
            &args(&["--port", "9000", "--host", "::1", "--root-folder", "/tmp/x"]),
            Some(&toml_config),
        );

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "::1");
        assert_eq!(config.root_folder, PathBuf::from("/tmp/x"));
        assert_eq!(config.bind_addr().unwrap().to_string(), "[::1]:9000");
    }

    #[test]
    #[serial]
    fn test_port_from_environment() {
        std::env::set_var("MBTI_PORT", "4321");
        let parsed = Args::try_parse_from(["mbti-server", "--root-folder", "/tmp/x"]);
        std::env::remove_var("MBTI_PORT");

        let config = ServerConfig::resolve(&parsed.unwrap(), None);
        assert_eq!(config.port, 4321);
    }

    #[test]
    #[serial]
    fn test_blank_token_secret_is_ignored() {
        let config = ServerConfig::resolve(
            &args(&["--token-secret", "  ", "--root-folder", "/tmp/x"]),
            None,
        );
        assert_eq!(config.token_secret, None);
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            root_folder: PathBuf::from("/tmp"),
            database_path: PathBuf::from("/tmp/mbti.db"),
            token_secret: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        };
        assert_eq!(config.bind_addr().unwrap().port(), 3000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..config
        };
        assert!(bad.bind_addr().is_err());
    }
}
