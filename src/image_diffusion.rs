use std::fs;
use std::path::PathBuf;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ArtError, Result};
use crate::state::AppState;

const IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";
const IMAGE_MODEL: &str = "dall-e-3";
const IMAGE_SIZE: &str = "1024x1024";

#[derive(Serialize, Debug)]
struct CreateImageRequest {
    prompt: String,
    n: usize,
    size: String,
    model: String,
}

#[derive(Deserialize, Debug)]
struct CreateImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    url: String,
}

fn generation_prompt(rewritten_prompt: &str) -> String {
    format!("{} . Begin!", rewritten_prompt)
}

/// Stage 3: request exactly one square image for the rewritten prompt,
/// download it by URL and persist it under a per-request unique name.
pub async fn generate_image(state: &AppState, rewritten_prompt: &str) -> Result<PathBuf> {
    let request = CreateImageRequest {
        prompt: generation_prompt(rewritten_prompt),
        n: 1,
        size: IMAGE_SIZE.to_string(),
        model: IMAGE_MODEL.to_string(),
    };

    debug!("Sending generate image request: {:?}", request);

    let response = state
        .http
        .post(IMAGES_URL)
        .header("Content-Type", "application/json")
        .bearer_auth(&state.config.openai_api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        let error_response: Value = serde_json::from_str(&response_text).unwrap_or(Value::Null);
        error!("Image API error ({}): {:?}", status, error_response);
        return Err(ArtError::ImageApi(format!("status {}", status)));
    }

    let generate_response: CreateImageResponse = serde_json::from_str(&response_text)?;
    let image_url = generate_response
        .data
        .first()
        .map(|image| image.url.clone())
        .ok_or_else(|| ArtError::ImageApi("no image URL returned".to_string()))?;

    debug!("Fetching generated image from {}", image_url);

    let image_bytes = state
        .http
        .get(&image_url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let image_path = state
        .config
        .image_dir
        .join(format!("{}.png", Uuid::new_v4()));
    fs::write(&image_path, &image_bytes)?;

    info!("Image successfully created and stored in: {}", image_path.display());

    Ok(image_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_appends_directive() {
        assert_eq!(
            generation_prompt("a cat on a roof"),
            "a cat on a roof . Begin!"
        );
    }

    #[test]
    fn response_parsing_takes_first_url() {
        let response: CreateImageResponse = serde_json::from_str(
            r#"{"data":[{"url":"https://images.example/one.png"},{"url":"https://images.example/two.png"}]}"#,
        )
        .unwrap();
        assert_eq!(response.data.first().unwrap().url, "https://images.example/one.png");
    }
}
