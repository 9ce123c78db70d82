use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7070,
            database_path: PathBuf::from("data/finboard.db"),
            migrations_path: PathBuf::from("migrations"),
        }
    }
}

/// Accepts `sqlite://path`, `sqlite:path` or a bare path.
fn database_path_from_url(url: &str) -> PathBuf {
    PathBuf::from(
        url.strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url),
    )
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            host: env::var("FINBOARD_HOST").unwrap_or(defaults.host),
            port: env::var("FINBOARD_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_path: env::var("FINBOARD_DATABASE_URL")
                .map(|v| database_path_from_url(&v))
                .unwrap_or(defaults.database_path),
            migrations_path: env::var("FINBOARD_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.migrations_path),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
