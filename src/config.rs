use std::env;
use std::path::PathBuf;

use crate::error::{ArtError, Result};

const DEFAULT_PORT: u16 = 8800;
const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
const DEFAULT_IMAGE_DIR: &str = "./image";

/// Process-wide configuration, collected from the environment once at
/// startup. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub openai_api_key: String,
    pub pinata_jwt: String,
    pub rpc_url: String,
    pub keypair_path: PathBuf,
    pub image_dir: PathBuf,
    pub chat_model: String,
    /// Bearer token required on inbound requests. Auth is disabled when unset.
    pub service_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ArtError::Configuration(format!("PORT is not a valid port: {}", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        let openai_api_key = require("OPENAI_API_KEY")?;
        let pinata_jwt = require("PINATA_JWT")?;
        let keypair_path = PathBuf::from(require("WALLET_KEYPAIR_PATH")?);

        let rpc_url = env::var("SOLANA_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let chat_model = env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
        let image_dir =
            PathBuf::from(env::var("IMAGE_DIR").unwrap_or_else(|_| DEFAULT_IMAGE_DIR.to_string()));
        let service_api_key = env::var("SERVICE_API_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self {
            port,
            openai_api_key,
            pinata_jwt,
            rpc_url,
            keypair_path,
            image_dir,
            chat_model,
            service_api_key,
        })
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).map_err(|_| ArtError::Configuration(format!("{} not set", name)))
}
