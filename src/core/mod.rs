pub mod cost;
pub mod text;
pub mod tts;
