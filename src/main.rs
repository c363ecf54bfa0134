// main.rs
mod api_auth;
mod api_routes;
mod config;
mod error;
mod image_diffusion;
mod llm_client;
mod nft_config;
mod nft_mint;
mod pipeline;
mod prompt_rewrite;
mod state;
mod storage_upload;
mod system_prompt;

use std::fs;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::anyhow;
use dotenv::dotenv;
use log::info;
use reqwest::Client;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::read_keypair_file;
use solana_sdk::signer::Signer;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // Create logs directory if it doesn't exist
    fs::create_dir_all("logs")?;
    // Configure log4rs
    log4rs::init_file("log4rs.yaml", Default::default())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, anyhow!(e)))?;

    info!("Starting artforge service");

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    fs::create_dir_all(&config.image_dir)?;

    let wallet = read_keypair_file(&config.keypair_path).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("failed to load wallet keypair: {}", e),
        )
    })?;
    info!("Service wallet: {}", wallet.pubkey());

    let rpc =
        RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed());

    let port = config.port;
    let service_api_key = config.service_api_key.clone();
    let state = web::Data::new(AppState {
        http: Client::new(),
        config,
        wallet,
        rpc,
    });

    info!("Listening at http://127.0.0.1:{}/", port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(api_auth::ApiKey::new(service_api_key.clone()))
            .app_data(state.clone())
            .configure(api_routes::configure)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
