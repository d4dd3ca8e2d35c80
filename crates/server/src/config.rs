use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

/// Settings for the LLM backend a real agent suite talks to. The stub
/// agents ignore them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
}

impl Config {
    pub fn load() -> crate::Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Config {
            server: ServerConfig {
                addr: std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            },
            llm: LlmConfig {
                api_key: std::env::var("LLM_API_KEY").unwrap_or_else(|_| "".to_string()),
                model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            },
        };

        config.server.addr.parse::<SocketAddr>().map_err(|e| {
            crate::Error::Config(format!("invalid SERVER_ADDR {:?}: {}", config.server.addr, e))
        })?;

        if config.llm.api_key.is_empty() {
            tracing::warn!("LLM_API_KEY is not set; real agent backends will be unreachable");
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: "0.0.0.0:8000".to_string(),
            },
            llm: LlmConfig {
                api_key: String::new(),
                model: "gpt-4o".to_string(),
            },
        }
    }
}
