// Analysis: prompt templates, the mode controller and the page handlers that drive them.
// All completion calls go through llm_client; nothing here talks HTTP to Gemini.

pub mod controller;
pub mod handlers;
pub mod prompts;
