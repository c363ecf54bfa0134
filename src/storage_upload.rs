use std::fs;
use std::path::Path;

use log::{error, info};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::{ArtError, Result};
use crate::nft_config::{Attribute, MintConfig};
use crate::state::AppState;

const PIN_FILE_URL: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
const PIN_JSON_URL: &str = "https://api.pinata.cloud/pinning/pinJSONToIPFS";
const GATEWAY_BASE: &str = "https://gateway.pinata.cloud/ipfs";

#[derive(Deserialize, Debug)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Metaplex-standard off-chain metadata document.
#[derive(Serialize, Debug)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
    pub properties: NftProperties,
}

#[derive(Serialize, Debug)]
pub struct NftProperties {
    pub files: Vec<NftFile>,
}

#[derive(Serialize, Debug)]
pub struct NftFile {
    pub uri: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Serialize, Debug)]
struct PinJsonRequest<'a> {
    #[serde(rename = "pinataContent")]
    pinata_content: &'a NftMetadata,
}

impl NftMetadata {
    pub fn build(config: &MintConfig, image_uri: &str) -> Self {
        Self {
            name: config.name.clone(),
            description: config.description.clone(),
            image: image_uri.to_string(),
            attributes: config.attributes.clone(),
            properties: NftProperties {
                files: vec![NftFile {
                    uri: image_uri.to_string(),
                    file_type: config.image_mime_type.to_string(),
                }],
            },
        }
    }
}

fn gateway_uri(cid: &str) -> String {
    format!("{}/{}", GATEWAY_BASE, cid)
}

/// Stage 4a: pin the raw image bytes. Must run before the metadata upload
/// because the metadata embeds the returned URI.
pub async fn upload_image(state: &AppState, image_path: &Path) -> Result<String> {
    info!("Step 1 - Uploading Image");

    let image_bytes = fs::read(image_path)?;
    let file_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.png".to_string());

    let part = Part::bytes(image_bytes)
        .file_name(file_name)
        .mime_str("image/png")?;
    let form = Form::new().part("file", part);

    let response = state
        .http
        .post(PIN_FILE_URL)
        .bearer_auth(&state.config.pinata_jwt)
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("Image pin failed ({}): {}", status, body);
        return Err(ArtError::Storage(format!("image pin returned {}", status)));
    }

    let pin: PinResponse = serde_json::from_str(&body)?;
    let image_uri = gateway_uri(&pin.ipfs_hash);
    info!("Image URI -> {}", image_uri);

    Ok(image_uri)
}

/// Stage 4b: pin the metadata JSON referencing the freshly pinned image.
pub async fn upload_metadata(
    state: &AppState,
    config: &MintConfig,
    image_uri: &str,
) -> Result<String> {
    info!("Step 2 - Uploading Metadata");

    let metadata = NftMetadata::build(config, image_uri);
    let request = PinJsonRequest {
        pinata_content: &metadata,
    };

    let response = state
        .http
        .post(PIN_JSON_URL)
        .bearer_auth(&state.config.pinata_jwt)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("Metadata pin failed ({}): {}", status, body);
        return Err(ArtError::Storage(format!(
            "metadata pin returned {}",
            status
        )));
    }

    let pin: PinResponse = serde_json::from_str(&body)?;
    let metadata_uri = gateway_uri(&pin.ipfs_hash);
    info!("Metadata URI: {}", metadata_uri);

    Ok(metadata_uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nft_config::{CreatorShare, IMAGE_MIME_TYPE, SELLER_FEE_BASIS_POINTS, SYMBOL};
    use solana_sdk::signature::Keypair;
    use solana_sdk::signer::Signer;

    fn test_config() -> MintConfig {
        MintConfig {
            name: "Rooftop".to_string(),
            description: "A cat at dusk".to_string(),
            attributes: vec![Attribute {
                trait_type: "Mood".to_string(),
                value: "Serene".to_string(),
            }],
            seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
            symbol: SYMBOL.to_string(),
            image_mime_type: IMAGE_MIME_TYPE,
            creators: vec![CreatorShare {
                address: Keypair::new().pubkey(),
                share: 100,
            }],
        }
    }

    #[test]
    fn metadata_embeds_image_uri_and_declares_file_type() {
        let metadata = NftMetadata::build(
            &test_config(),
            "https://gateway.pinata.cloud/ipfs/QmExample",
        );
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["name"], "Rooftop");
        assert_eq!(json["image"], "https://gateway.pinata.cloud/ipfs/QmExample");
        assert_eq!(json["attributes"][0]["trait_type"], "Mood");
        assert_eq!(
            json["properties"]["files"][0]["uri"],
            "https://gateway.pinata.cloud/ipfs/QmExample"
        );
        assert_eq!(json["properties"]["files"][0]["type"], "image/png");
    }

    #[test]
    fn pin_response_parses_ipfs_hash() {
        let pin: PinResponse =
            serde_json::from_str(r#"{"IpfsHash":"QmExample","PinSize":42,"Timestamp":"2024-06-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(gateway_uri(&pin.ipfs_hash), "https://gateway.pinata.cloud/ipfs/QmExample");
    }
}
