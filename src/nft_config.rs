use log::{error, info};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::Signer;

use crate::error::Result;
use crate::llm_client::chat_completion;
use crate::state::AppState;
use crate::system_prompt;

pub const DEFAULT_NAME: &str = "Art";
pub const DEFAULT_DESCRIPTION: &str = "Random AI Art";
pub const DEFAULT_MOOD: &str = "Focused";
pub const SELLER_FEE_BASIS_POINTS: u16 = 500; // 500 bp = 5%
pub const SYMBOL: &str = "AIART";
pub const IMAGE_MIME_TYPE: &str = "image/png";

/// Structured output of the metadata derivation call. Every field is
/// optional so one malformed value never poisons the rest.
#[derive(Deserialize, Debug, Default)]
struct DerivedMetadata {
    one_word_title: Option<String>,
    description: Option<String>,
    mood: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct CreatorShare {
    pub address: Pubkey,
    pub share: u8,
}

/// Per-request mint configuration. Built once from LLM output with
/// field-level fallbacks, immutable afterwards.
#[derive(Debug, Clone)]
pub struct MintConfig {
    pub name: String,
    pub description: String,
    pub attributes: Vec<Attribute>,
    pub seller_fee_basis_points: u16,
    pub symbol: String,
    pub image_mime_type: &'static str,
    pub creators: Vec<CreatorShare>,
}

impl MintConfig {
    fn from_derived(derived: DerivedMetadata, creator: Pubkey) -> Self {
        let mood = derived.mood.unwrap_or_else(|| DEFAULT_MOOD.to_string());
        Self {
            name: derived
                .one_word_title
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            description: derived
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            attributes: vec![Attribute {
                trait_type: "Mood".to_string(),
                value: mood,
            }],
            seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
            symbol: SYMBOL.to_string(),
            image_mime_type: IMAGE_MIME_TYPE,
            creators: vec![CreatorShare {
                address: creator,
                share: 100,
            }],
        }
    }
}

/// Stage 2: ask the model for a one-word title, short description and mood
/// for the rewritten prompt, then assemble the mint configuration. A parse
/// failure degrades to the documented defaults rather than failing the
/// request.
pub async fn derive_config(state: &AppState, rewritten_prompt: &str) -> Result<MintConfig> {
    info!("Deriving NFT metadata from rewritten prompt");

    let instruction = system_prompt::metadata_instruction(rewritten_prompt);
    let content = chat_completion(
        &state.http,
        &state.config.openai_api_key,
        &state.config.chat_model,
        &instruction,
        rewritten_prompt,
        true,
    )
    .await?;

    let derived: DerivedMetadata = serde_json::from_str(&content).unwrap_or_else(|e| {
        error!("Failed to parse metadata response, using defaults: {}", e);
        DerivedMetadata::default()
    });

    Ok(MintConfig::from_derived(
        derived,
        state.wallet.pubkey(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Keypair;

    fn creator() -> Pubkey {
        Keypair::new().pubkey()
    }

    #[test]
    fn full_response_is_preserved() {
        let derived: DerivedMetadata =
            serde_json::from_str(r#"{"one_word_title":"Rooftop","description":"A cat at dusk","mood":"Serene"}"#)
                .unwrap();
        let config = MintConfig::from_derived(derived, creator());

        assert_eq!(config.name, "Rooftop");
        assert_eq!(config.description, "A cat at dusk");
        assert_eq!(config.attributes[0].value, "Serene");
    }

    #[test]
    fn missing_fields_fall_back_independently() {
        let derived: DerivedMetadata =
            serde_json::from_str(r#"{"one_word_title":"Rooftop"}"#).unwrap();
        let config = MintConfig::from_derived(derived, creator());

        assert_eq!(config.name, "Rooftop");
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(config.attributes[0].value, DEFAULT_MOOD);
    }

    #[test]
    fn unparseable_body_degrades_to_all_defaults() {
        let derived = serde_json::from_str::<DerivedMetadata>("not json").unwrap_or_default();
        let config = MintConfig::from_derived(derived, creator());

        assert_eq!(config.name, DEFAULT_NAME);
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert_eq!(
            config.attributes,
            vec![Attribute {
                trait_type: "Mood".to_string(),
                value: DEFAULT_MOOD.to_string(),
            }]
        );
    }

    #[test]
    fn fixed_fields_are_constant() {
        let wallet = creator();
        let config = MintConfig::from_derived(DerivedMetadata::default(), wallet);

        assert_eq!(config.seller_fee_basis_points, 500);
        assert_eq!(config.symbol, "AIART");
        assert_eq!(config.image_mime_type, "image/png");
        assert_eq!(config.creators.len(), 1);
        assert_eq!(config.creators[0].address, wallet);
        assert_eq!(config.creators[0].share, 100);
    }
}
