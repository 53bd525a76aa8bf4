//! Command-line flags and their resolution against the environment and
//! MySQL option files.
//!
//! Precedence, highest first: explicit flag, `MYSQL_*` environment
//! variable, option-file `[client]` section, built-in default.

use std::path::PathBuf;

use clap::Parser;

use crate::mycnf::MyCnf;

/// Command-line arguments. The connection flags mirror the ones the
/// `mysql` client understands.
/// <https://dev.mysql.com/doc/refman/8.0/en/mysql-command-options.html>
#[derive(Debug, Default, Parser)]
#[command(name = "mysql-diff-deploy", version, about)]
pub struct Args {
    /// The unix domain socket path for the database
    #[arg(long)]
    pub socket: Option<String>,
    /// The host name of the database
    #[arg(long)]
    pub host: Option<String>,
    /// The port number
    #[arg(long)]
    pub port: Option<u16>,
    /// Username
    #[arg(long)]
    pub user: Option<String>,
    /// Password
    #[arg(long)]
    pub password: Option<String>,
    /// The database name
    #[arg(long)]
    pub database: Option<String>,
    /// Skip interactive approval of the plan before deploying
    #[arg(long)]
    pub auto_approve: bool,
    /// Output the schema difference, then exit
    #[arg(long)]
    pub dry_run: bool,
    /// Import existing table schemas from the running database
    #[arg(long)]
    pub import: bool,
    /// Path to the target schema file (required when deploying)
    pub schema: Option<PathBuf>,
}

/// What the invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Plan and apply the schema file.
    Deploy,
    /// Record the running database's schema as the deployed revision.
    Import,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unix socket path, preferred over host/port when set.
    pub socket: Option<String>,
    /// Server host name.
    pub host: Option<String>,
    /// Server TCP port.
    pub port: u16,
    /// Username.
    pub user: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Database name.
    pub database: Option<String>,
    /// Contents of the target schema file (deploy mode).
    pub schema: Option<String>,
    /// Skip interactive approval.
    pub auto_approve: bool,
    /// Preview only.
    pub dry_run: bool,
    /// Deploy or import.
    pub mode: ExecMode,
}

/// Configuration resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Deploy mode was selected without a schema file argument.
    #[error("a schema file is required")]
    SchemaRequired,
    /// The schema file could not be read.
    #[error("failed to read schema file {path}")]
    ReadSchema {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Resolve the effective configuration from flags, the process
/// environment, and the merged option files.
///
/// # Errors
///
/// See [`ConfigError`].
pub fn resolve(args: &Args, cnf: &MyCnf) -> Result<Config, ConfigError> {
    resolve_with(args, cnf, |name| std::env::var(name).ok())
}

/// [`resolve`] with an explicit environment, for tests.
///
/// # Errors
///
/// See [`ConfigError`].
pub fn resolve_with(
    args: &Args,
    cnf: &MyCnf,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = Config {
        socket: None,
        host: None,
        port: 3306,
        user: None,
        password: None,
        database: None,
        schema: None,
        auto_approve: args.auto_approve,
        dry_run: args.dry_run,
        mode: if args.import {
            ExecMode::Import
        } else {
            ExecMode::Deploy
        },
    };

    // option files first
    if let Some(client) = cnf.get("client") {
        if let Some(v) = client.get("socket") {
            config.socket = Some(v.clone());
        }
        if let Some(v) = client.get("host") {
            config.host = Some(v.clone());
        }
        if let Some(v) = client.get("port").and_then(|v| v.parse().ok()) {
            config.port = v;
        }
        if let Some(v) = client.get("user") {
            config.user = Some(v.clone());
        }
        if let Some(v) = client.get("password") {
            config.password = Some(v.clone());
        }
        if let Some(v) = client.get("database") {
            config.database = Some(v.clone());
        }
    }

    // then the environment
    // https://dev.mysql.com/doc/refman/8.0/en/environment-variables.html
    if let Some(v) = env("MYSQL_UNIX_PORT") {
        config.socket = Some(v);
    }
    if let Some(v) = env("MYSQL_HOST") {
        config.host = Some(v);
    }
    if let Some(v) = env("MYSQL_PWD") {
        config.password = Some(v);
    }
    if let Some(v) = env("MYSQL_TCP_PORT").and_then(|v| v.parse().ok()) {
        config.port = v;
    }
    if config.user.is_none() {
        config.user = env("USER").or_else(|| env("USERNAME"));
    }

    // explicit flags win
    if let Some(v) = &args.socket {
        config.socket = Some(v.clone());
    }
    if let Some(v) = &args.host {
        config.host = Some(v.clone());
    }
    if let Some(v) = args.port {
        config.port = v;
    }
    if let Some(v) = &args.user {
        config.user = Some(v.clone());
    }
    if let Some(v) = &args.password {
        config.password = Some(v.clone());
    }
    if let Some(v) = &args.database {
        config.database = Some(v.clone());
    }

    if config.mode == ExecMode::Deploy {
        let path = args.schema.as_ref().ok_or(ConfigError::SchemaRequired)?;
        let schema = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadSchema {
            path: path.clone(),
            source,
        })?;
        config.schema = Some(schema);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_cnf(options: &[(&str, &str)]) -> MyCnf {
        let mut cnf = MyCnf::new();
        cnf.insert(
            "client".to_string(),
            options
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        cnf
    }

    fn import_args() -> Args {
        Args {
            import: true,
            ..Args::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = resolve_with(&import_args(), &MyCnf::new(), |_| None).unwrap();
        assert_eq!(config.port, 3306);
        assert_eq!(config.host, None);
        assert_eq!(config.mode, ExecMode::Import);
    }

    #[test]
    fn test_option_file_fills_in() {
        let cnf = client_cnf(&[
            ("host", "db.example.com"),
            ("port", "13306"),
            ("user", "app"),
            ("password", "secret"),
            ("database", "prod"),
        ]);
        let config = resolve_with(&import_args(), &cnf, |_| None).unwrap();
        assert_eq!(config.host.as_deref(), Some("db.example.com"));
        assert_eq!(config.port, 13306);
        assert_eq!(config.user.as_deref(), Some("app"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.database.as_deref(), Some("prod"));
    }

    #[test]
    fn test_environment_beats_option_file() {
        let cnf = client_cnf(&[("host", "from-file"), ("port", "1111"), ("password", "old")]);
        let env = |name: &str| match name {
            "MYSQL_HOST" => Some("from-env".to_string()),
            "MYSQL_TCP_PORT" => Some("2222".to_string()),
            "MYSQL_PWD" => Some("new".to_string()),
            "MYSQL_UNIX_PORT" => Some("/tmp/env.sock".to_string()),
            _ => None,
        };
        let config = resolve_with(&import_args(), &cnf, env).unwrap();
        assert_eq!(config.host.as_deref(), Some("from-env"));
        assert_eq!(config.port, 2222);
        assert_eq!(config.password.as_deref(), Some("new"));
        assert_eq!(config.socket.as_deref(), Some("/tmp/env.sock"));
    }

    #[test]
    fn test_flags_beat_everything() {
        let cnf = client_cnf(&[("host", "from-file")]);
        let args = Args {
            host: Some("from-flag".to_string()),
            port: Some(3333),
            user: Some("flag-user".to_string()),
            import: true,
            ..Args::default()
        };
        let env = |name: &str| match name {
            "MYSQL_HOST" => Some("from-env".to_string()),
            _ => None,
        };
        let config = resolve_with(&args, &cnf, env).unwrap();
        assert_eq!(config.host.as_deref(), Some("from-flag"));
        assert_eq!(config.port, 3333);
        assert_eq!(config.user.as_deref(), Some("flag-user"));
    }

    #[test]
    fn test_user_falls_back_to_login_name() {
        let env = |name: &str| (name == "USER").then(|| "login".to_string());
        let config = resolve_with(&import_args(), &MyCnf::new(), env).unwrap();
        assert_eq!(config.user.as_deref(), Some("login"));

        // an option-file user is not overridden by $USER
        let cnf = client_cnf(&[("user", "app")]);
        let config = resolve_with(&import_args(), &cnf, env).unwrap();
        assert_eq!(config.user.as_deref(), Some("app"));
    }

    #[test]
    fn test_deploy_mode_requires_schema() {
        let err = resolve_with(&Args::default(), &MyCnf::new(), |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaRequired));
    }
}
