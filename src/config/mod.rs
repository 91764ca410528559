/// Application configuration module
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub nasa_api_url: String,
    pub nasa_api_key: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let nasa_api_url =
            env::var("NASA_API_URL").unwrap_or_else(|_| DEFAULT_APOD_URL.to_string());

        let nasa_api_key = env::var("NASA_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| "DEMO_KEY".to_string());

        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        Ok(Self {
            nasa_api_url,
            nasa_api_key,
            port: env_parse("PORT", DEFAULT_PORT),
            public_dir,
            upstream_timeout: Duration::from_secs(env_parse("UPSTREAM_TIMEOUT_SECONDS", 30)),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
