use log::info;

use crate::error::Result;
use crate::llm_client::chat_completion;
use crate::state::AppState;
use crate::system_prompt;

/// Stage 1: rewrite the raw user prompt into a stylistically enhanced one.
/// The completion is returned verbatim; the PROMPT/STYLE/MOOD framing is
/// carried forward into image generation untouched.
pub async fn rewrite_prompt(state: &AppState, user_prompt: &str) -> Result<String> {
    info!("Rewriting user prompt");

    let instruction = system_prompt::rewrite_instruction(user_prompt);
    let rewritten = chat_completion(
        &state.http,
        &state.config.openai_api_key,
        &state.config.chat_model,
        &instruction,
        user_prompt,
        false,
    )
    .await?;

    Ok(rewritten)
}
