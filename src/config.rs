//! Runtime configuration
//!
//! Flags fall back to environment variables (a `.env` file is loaded first),
//! then to defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "anima-prime")]
#[command(about = "Anima Prime tabletop RPG companion API")]
pub struct AppConfig {
    /// Address to listen on
    #[arg(long, env = "ANIMA_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// SQLite database file; relative paths resolve against the crate directory
    #[arg(long, env = "ANIMA_DB_PATH", default_value = "anima_prime.db")]
    pub db_path: String,

    /// Email of the admin account created on first start
    #[arg(long, env = "ANIMA_ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Password for the bootstrap admin
    #[arg(long, env = "ANIMA_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn database_path(&self) -> PathBuf {
        resolve_data_path(&self.db_path)
    }

    /// Bootstrap admin credentials, when both are set and non-empty
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        let email = self.admin_email.as_deref().filter(|v| !v.trim().is_empty())?;
        let password = self.admin_password.as_deref().filter(|v| !v.is_empty())?;
        Some((email, password))
    }
}

/// Absolute paths pass through; relative ones are anchored at the crate
/// directory rather than the caller's cwd.
pub fn resolve_data_path(raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(path)
}

/// Load `.env` from the usual search path, then from the crate directory.
pub fn load_env() {
    let _ = dotenv::dotenv();

    let crate_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if crate_env.exists() {
        let _ = dotenv::from_path(&crate_env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("anima-prime").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&["--bind", "127.0.0.1:9000", "--db-path", "/tmp/anima.db"]);
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/anima.db"));
    }

    #[test]
    fn test_relative_db_path_anchored_at_crate() {
        let resolved = resolve_data_path("data/anima.db");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("data/anima.db"));
        assert!(resolved.starts_with(env!("CARGO_MANIFEST_DIR")));
    }

    #[test]
    fn test_admin_credentials_need_both() {
        let only_email = parse(&["--admin-email", "root@anima.test", "--admin-password", ""]);
        assert!(only_email.admin_credentials().is_none());

        let both = parse(&["--admin-email", "root@anima.test", "--admin-password", "s3cret"]);
        assert_eq!(both.admin_credentials(), Some(("root@anima.test", "s3cret")));
    }
}
