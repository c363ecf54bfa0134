// api_routes.rs
use std::str::FromStr;

use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

use crate::error::ArtError;
use crate::pipeline;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ImagineQuery {
    user_prompt: Option<String>,
    address: Option<String>,
}

// Set API Routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/imagine", web::get().to(imagine_route));
}

/// `GET /imagine?user_prompt=...&address=...`
///
/// Validation happens up front, before any upstream call: the prompt must
/// be a non-empty string, and the recipient address, when supplied, must
/// parse as a base58 Solana pubkey. The response is sent only after the
/// whole pipeline (mint included) has completed.
async fn imagine_route(
    query: web::Query<ImagineQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ArtError> {
    let user_prompt = match query.user_prompt.as_deref().map(str::trim) {
        Some(prompt) if !prompt.is_empty() => prompt.to_string(),
        _ => return Err(ArtError::Validation("Invalid prompt".to_string())),
    };

    let recipient = match query.address.as_deref().map(str::trim) {
        Some(address) => Some(
            Pubkey::from_str(address)
                .map_err(|_| ArtError::Validation("Invalid recipient address".to_string()))?,
        ),
        None => None,
    };

    info!("Received request -> {}", user_prompt);

    let asset = pipeline::run(&state, &user_prompt, recipient).await?;

    Ok(HttpResponse::Ok().json(asset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use reqwest::Client;
    use solana_client::nonblocking::rpc_client::RpcClient;
    use solana_sdk::signature::Keypair;
    use std::path::PathBuf;

    // The wallet and RPC client are never touched on the 400 paths under
    // test; the RPC URL points at a closed local port on purpose.
    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            http: Client::new(),
            config: AppConfig {
                port: 0,
                openai_api_key: "test-key".to_string(),
                pinata_jwt: "test-jwt".to_string(),
                rpc_url: "http://127.0.0.1:1".to_string(),
                keypair_path: PathBuf::from("/dev/null"),
                image_dir: PathBuf::from("./image"),
                chat_model: "gpt-4o".to_string(),
                service_api_key: None,
            },
            wallet: Keypair::new(),
            rpc: RpcClient::new("http://127.0.0.1:1".to_string()),
        })
    }

    #[actix_web::test]
    async fn missing_user_prompt_is_rejected() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(configure),
        )
        .await;

        let request = test::TestRequest::get().uri("/imagine").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn empty_user_prompt_is_rejected() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(configure),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/imagine?user_prompt=%20%20")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn invalid_recipient_address_is_rejected() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(configure),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/imagine?user_prompt=a+cat+on+a+roof&address=not-base58")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
