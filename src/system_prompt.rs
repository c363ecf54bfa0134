// System instructions for the two chat-completion stages.

pub fn rewrite_instruction(user_prompt: &str) -> String {
    format!(
        "
Rewrite the following prompt:
'{}'
Return the adapted prompt without any added comments, title or information.
Expected output:
####
PROMPT: <the re-written prompt, enhanced to augment its artistic qualities and uniqueness>
STYLE: <the requested artistic style>
MOOD: <the desired mood for the prompt>
####
Begin! Produce an answer that respects all the constraints.
",
        user_prompt
    )
}

pub fn metadata_instruction(rewritten_prompt: &str) -> String {
    format!(
        "
Based on this prompt:
'{}'
Generate a .json object with the following values.
Return the .json without any added comments, title or information.
Expected output:

{{
  \"one_word_title\": \"<describe the image in ONE word>\",
  \"description\": \"<a very short description of the prompt>\",
  \"mood\": \"<the mood of the prompt>\"
}}

Begin! Produce a correctly formatted .JSON answer that respects all the constraints.
",
        rewritten_prompt
    )
}
