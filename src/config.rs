//! Configuration for the upstream provider and the local server

use std::fmt;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use log::debug;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_API_URL: &str
  = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Upstream provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig
{   /// Bearer credential sent with every upstream call
    #[serde(skip_serializing)]
    pub api_key: String
  , /// Full chat-completions endpoint
    pub api_url: String
  , /// Request timeout in seconds
    pub timeout_secs: u64
  , /// Value of the HTTP-Referer identification header
    pub referer: String
  , /// Value of the X-Title identification header
    pub title: String
}

impl ProviderConfig
{   pub fn new(api_key: impl Into<String>) -> Self
    {   ProviderConfig
        {   api_key: api_key.into()
          , api_url: DEFAULT_API_URL.to_string()
          , timeout_secs: DEFAULT_TIMEOUT_SECS
          , referer: "http://localhost:8000".to_string()
          , title: "MuseAI".to_string()
        }
    }
}

// The credential never reaches the logs.
impl fmt::Debug for ProviderConfig
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("ProviderConfig")
          .field("api_key", &"<redacted>")
          .field("api_url", &self.api_url)
          .field("timeout_secs", &self.timeout_secs)
          .field("referer", &self.referer)
          .field("title", &self.title)
          .finish()
    }
}

/// Local HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig
{   /// Bind address
    pub host: String
  , /// Bind port
    pub port: u16
  , /// Directory holding index.html, script.js and style.css
    pub frontend_dir: PathBuf
  , /// Allowed CORS origins; empty or "*" means any origin
    pub cors_origins: Vec<String>
}

impl Default for ServerConfig
{   fn default() -> Self
    {   ServerConfig
        {   host: "127.0.0.1".to_string()
          , port: 8000
          , frontend_dir: PathBuf::from("frontend")
          , cors_origins: vec!["*".to_string()]
        }
    }
}

impl ServerConfig
{   pub fn cors_is_permissive(&self) -> bool
    {   self.cors_origins.is_empty()
          || self.cors_origins.iter().any(|o| o == "*")
    }
}

/// MuseAI configuration, built once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuseConfig
{   pub provider: ProviderConfig
  , pub server: ServerConfig
}

impl MuseConfig
{   /// Load from the process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F)
      -> Result<Self, crate::error::Error>
    where
      F: Fn(&str) -> Option<String>
    {   let api_key = lookup(API_KEY_VAR)
          .filter(|k| !k.trim().is_empty())
          .ok_or_else(|| {
            crate::error::Error::StartupConfiguration(format!(
              "{} not found. Add it to the environment or a .env file.",
              API_KEY_VAR
            ))
          })?;

        let mut provider = ProviderConfig::new(api_key);
        if let Some(url) = lookup("OPENROUTER_API_URL")
        {   provider.api_url = url;
        }

        let mut server = ServerConfig::default();
        if let Some(host) = lookup("HOST")
        {   server.host = host;
        }
        if let Some(port) = lookup("PORT")
        {   server.port = port.trim().parse().map_err(|_| {
              crate::error::Error::StartupConfiguration(format!(
                "PORT must be a number, got {:?}", port
              ))
            })?;
        }
        if let Some(dir) = lookup("MUSEAI_FRONTEND_DIR")
        {   server.frontend_dir = PathBuf::from(dir);
        }
        if let Some(origins) = lookup("MUSEAI_CORS_ORIGINS")
        {   server.cors_origins = origins
              .split(',')
              .map(|o| o.trim().to_string())
              .filter(|o| !o.is_empty())
              .collect();
        }

        let config = MuseConfig { provider, server };
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}
