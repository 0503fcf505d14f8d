use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

use crate::auth::{decode_secret_key, AuthConfig};

const DEFAULT_RAPIDAPI_HOST: &str = "yahoo-finance15.p.rapidapi.com";

/// Credentials for the RapidAPI quote endpoint.
#[derive(Clone)]
pub struct MarketDataConfig {
    pub api_key: String,
    pub host: String,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub auth: AuthConfig,
    /// `None` when no API key is set; price refresh then fails.
    pub market_data: Option<MarketDataConfig>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("PL_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid PL_LISTEN_ADDR")?;
        let db_path = env_or("PL_DB_PATH", "./db/app.db");
        let cors_allow = env_or("PL_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("PL_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);

        let secret = std::env::var("PL_JWT_SECRET").context("PL_JWT_SECRET must be set")?;
        let ttl_secs: u64 = env_or("PL_TOKEN_TTL_SECS", "600").parse().unwrap_or(600);
        let cookie_secure = env_or("PL_COOKIE_SECURE", "false").eq_ignore_ascii_case("true");
        let auth = AuthConfig {
            jwt_secret: decode_secret_key(&secret)?,
            access_token_ttl: Duration::from_secs(ttl_secs),
            cookie_secure,
        };

        let market_data = std::env::var("PL_RAPIDAPI_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(|api_key| MarketDataConfig {
                api_key,
                host: env_or("PL_RAPIDAPI_HOST", DEFAULT_RAPIDAPI_HOST),
            });

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            auth,
            market_data,
        })
    }
}
