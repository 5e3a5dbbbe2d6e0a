pub mod formatting;
pub mod prompts;
