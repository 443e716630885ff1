//! Startup configuration for the relay.
//!
//! Values are read once from CLI flags (falling back to `RELAY_*` environment
//! variables) and then shared read-only with every request.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "mistral";

#[derive(Debug, Clone, Parser)]
#[command(name = "prompt-relay", version, about = "Relay prompts to a local Ollama daemon")]
pub struct RelayConfig {
    /// Address to listen on.
    #[arg(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "RELAY_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Full URL of the backend generate endpoint.
    #[arg(long, env = "RELAY_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Model identifier sent with every prompt.
    #[arg(long, env = "RELAY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Directory holding `index.html` and other front-end assets.
    #[arg(long, env = "RELAY_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Abort backend calls after this many seconds. Unset means wait forever.
    #[arg(long, env = "RELAY_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            static_dir: PathBuf::from("static"),
            timeout_secs: None,
        }
    }
}

impl RelayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
