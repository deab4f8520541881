//! Process configuration, read once at startup from flags or the environment.

use std::net::SocketAddr;

use clap::Args;

/// Settings shared by every sub-command. Each flag falls back to its
/// environment variable, which may come from a `.env` file.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    #[arg(long, global = true, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    #[arg(long, global = true, env = "DB_PORT", default_value_t = 3306)]
    pub db_port: u16,

    #[arg(long, global = true, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    #[arg(long, global = true, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    #[arg(long, global = true, env = "DB_NAME", default_value = "fatigue_detection")]
    pub db_name: String,

    /// Port the HTTP server listens on (all interfaces).
    #[arg(long, global = true, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long, global = true, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    /// Public base URL of this API, for logs only.
    #[arg(long, global = true, env = "API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Token signing secret. Loaded but not enforced: no route checks auth.
    #[arg(
        long,
        global = true,
        env = "JWT_SECRET",
        default_value = "fatigueDetectionSuperSecret2026",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub jwt_secret: String,
}

impl Settings {
    pub fn db_config(&self) -> db::DbConfig {
        db::DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
        }
    }

    pub fn server_config(&self) -> api::ServerConfig {
        api::ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], self.port)),
            ..api::ServerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        settings: Settings,
    }

    #[test]
    fn flags_override_defaults() {
        let harness = Harness::parse_from([
            "test",
            "--db-host",
            "db.internal",
            "--db-port",
            "3307",
            "--db-name",
            "fleet",
            "--port",
            "9000",
        ]);
        let db = harness.settings.db_config();
        assert_eq!(db.host, "db.internal");
        assert_eq!(db.port, 3307);
        assert_eq!(db.database, "fleet");
        assert_eq!(harness.settings.server_config().bind_addr.port(), 9000);
    }
}
