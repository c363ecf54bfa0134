use reqwest::Client;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::signature::Keypair;

use crate::config::AppConfig;

/// Collaborator handles shared by every request: one HTTP client, the
/// service wallet and its RPC connection. Constructed once in `main`,
/// injected via `web::Data`, never reinitialized per request.
pub struct AppState {
    pub http: Client,
    pub config: AppConfig,
    pub wallet: Keypair,
    pub rpc: RpcClient,
}
