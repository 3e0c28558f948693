use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// OAuth2 provider endpoints and client credentials (Google by default).
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: String,
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// AI detection endpoint. When unset the mock detector answers instead.
    pub ai_url: Option<String>,
    /// Base URL of the regulator's medicine leaflet host.
    pub leaflet_base_url: String,
    pub oauth: OAuthConfig,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Pocket pharmacist medicine API")]
pub struct Args {
    /// Host to bind to (overrides POCKET_YACSA_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides POCKET_YACSA_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides POCKET_YACSA_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// AI detection endpoint (overrides POCKET_YACSA_AI_URL)
    #[arg(long)]
    pub ai_url: Option<String>,

    /// Leaflet host base URL (overrides POCKET_YACSA_LEAFLET_BASE_URL)
    #[arg(long)]
    pub leaflet_base_url: Option<String>,

    /// OAuth2 client id (overrides POCKET_YACSA_CLIENT_ID)
    #[arg(long)]
    pub client_id: Option<String>,

    /// OAuth2 client secret (overrides POCKET_YACSA_CLIENT_SECRET)
    #[arg(long)]
    pub client_secret: Option<String>,

    /// OAuth2 redirect URL registered with the provider
    /// (overrides POCKET_YACSA_REDIRECT_URL)
    #[arg(long)]
    pub redirect_url: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("POCKET_YACSA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("POCKET_YACSA_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing POCKET_YACSA_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading POCKET_YACSA_PORT"),
        };
        let env_db = env::var("POCKET_YACSA_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/pocket_yacsa.db".into());
        let env_ai = env::var("POCKET_YACSA_AI_URL").ok();
        let env_leaflet = env::var("POCKET_YACSA_LEAFLET_BASE_URL")
            .unwrap_or_else(|_| "https://nedrug.mfds.go.kr/pbp/cmn/html/drb".into());
        let env_client_id = env::var("POCKET_YACSA_CLIENT_ID").unwrap_or_default();
        let env_client_secret = env::var("POCKET_YACSA_CLIENT_SECRET").unwrap_or_default();
        let env_auth_url = env::var("POCKET_YACSA_AUTH_URL")
            .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".into());
        let env_token_url = env::var("POCKET_YACSA_TOKEN_URL")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".into());
        let env_userinfo_url = env::var("POCKET_YACSA_USERINFO_URL")
            .unwrap_or_else(|_| "https://openidconnect.googleapis.com/v1/userinfo".into());
        let env_redirect_url = env::var("POCKET_YACSA_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/oauth2/callback".into());

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            ai_url: args.ai_url.or(env_ai),
            leaflet_base_url: args.leaflet_base_url.unwrap_or(env_leaflet),
            oauth: OAuthConfig {
                client_id: args.client_id.unwrap_or(env_client_id),
                client_secret: args.client_secret.unwrap_or(env_client_secret),
                auth_url: env_auth_url,
                token_url: env_token_url,
                userinfo_url: env_userinfo_url,
                redirect_url: args.redirect_url.unwrap_or(env_redirect_url),
            },
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
