use std::{env, io::Write, path::PathBuf};

use bazaar_common::Secret;
use chrono::Duration;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_BZR_HOST: &str = "127.0.0.1";
const DEFAULT_BZR_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/bazaar.db";
const DEFAULT_UPLOAD_DIR: &str = "data/uploads";
const DEFAULT_EVENT_BUFFER_SIZE: usize = 25;
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Uploaded price lists are written here before they are imported.
    pub upload_dir: PathBuf,
    /// Capacity of the notification and import job queues.
    pub event_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BZR_HOST.to_string(),
            port: DEFAULT_BZR_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BZR_HOST").ok().unwrap_or_else(|| DEFAULT_BZR_HOST.into());
        let port = env::var("BZR_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BZR_PORT. {e} Using the default, {DEFAULT_BZR_PORT}, instead."
                    );
                    DEFAULT_BZR_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BZR_PORT);
        let database_url = env::var("BZR_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ BZR_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let upload_dir = env::var("BZR_UPLOAD_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ BZR_UPLOAD_DIR is not set. Price lists will be stored in {DEFAULT_UPLOAD_DIR}.");
            PathBuf::from(DEFAULT_UPLOAD_DIR)
        });
        let event_buffer_size = env::var("BZR_EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|s| {
                s.parse::<usize>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for BZR_EVENT_BUFFER_SIZE. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        Self { host, port, database_url, auth, upload_dir, event_buffer_size }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HMAC secret used to sign and verify access tokens (HS256).
    pub jwt_secret: Secret<String>,
    /// How long tokens minted by this server remain valid.
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. DO NOT operate on \
             production like this, since every token will be invalidated on restart. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect::<String>();
        match &mut tmpfile {
            Some((f, p)) => match writeln!(f, "{secret}") {
                Ok(()) => warn!(
                    "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, \
                     you are doing it wrong! Set the BZR_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                    p.to_str().unwrap_or("???")
                ),
                Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_lifetime: token_lifetime_from_env() }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S, token_lifetime: Duration) -> Self {
        Self { jwt_secret: Secret::new(secret.into()), token_lifetime }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("BZR_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [BZR_JWT_SECRET]")))?;
        if secret.trim().len() < 16 {
            return Err(ServerError::ConfigurationError(
                "BZR_JWT_SECRET must be at least 16 characters long.".to_string(),
            ));
        }
        Ok(Self { jwt_secret: Secret::new(secret), token_lifetime: token_lifetime_from_env() })
    }
}

fn token_lifetime_from_env() -> Duration {
    env::var("BZR_TOKEN_LIFETIME_HOURS")
        .map_err(|_| {
            debug!(
                "🪛️ BZR_TOKEN_LIFETIME_HOURS is not set. Using the default value of {DEFAULT_TOKEN_LIFETIME_HOURS} hrs."
            )
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for BZR_TOKEN_LIFETIME_HOURS. {e}"))
        })
        .ok()
        .map(Duration::hours)
        .unwrap_or_else(|| Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS))
}
