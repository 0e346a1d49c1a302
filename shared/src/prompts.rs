use crate::types::Result;
use dialoguer::{Input, Password};

pub fn ask_question(placeholder: &str) -> Result<String> {
    let question: String = Input::new()
        .with_prompt("Enter your question")
        .default(placeholder.to_string())
        .show_default(true)
        .interact_text()?;
    Ok(question)
}

pub fn ask_api_key() -> Result<String> {
    let key = Password::new()
        .with_prompt("OpenAI API Key")
        .allow_empty_password(true)
        .interact()?;
    Ok(key)
}
