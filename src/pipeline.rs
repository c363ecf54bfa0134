use log::info;
use solana_sdk::pubkey::Pubkey;

use crate::error::Result;
use crate::nft_mint::MintedAsset;
use crate::state::AppState;
use crate::{image_diffusion, nft_config, nft_mint, prompt_rewrite, storage_upload};

/// The five-stage generation pipeline, run strictly in sequence: each
/// stage consumes the previous stage's output. Any stage error aborts the
/// run; partially produced assets (a stored image, pinned uploads) are not
/// compensated.
pub async fn run(
    state: &AppState,
    user_prompt: &str,
    recipient: Option<Pubkey>,
) -> Result<MintedAsset> {
    let rewritten = prompt_rewrite::rewrite_prompt(state, user_prompt).await?;
    info!("LLM prompt -> {}", rewritten);

    let config = nft_config::derive_config(state, &rewritten).await?;
    info!("Config set -> {} / {}", config.name, config.description);

    let image_path = image_diffusion::generate_image(state, &rewritten).await?;

    let image_uri = storage_upload::upload_image(state, &image_path).await?;
    let metadata_uri = storage_upload::upload_metadata(state, &config, &image_uri).await?;

    nft_mint::mint_asset(state, &config, &metadata_uri, recipient).await
}
