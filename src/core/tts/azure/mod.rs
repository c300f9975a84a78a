//! Microsoft Azure Text-to-Speech backend.
//!
//! Two components:
//!
//! - **config**: endpoint/header constants, [`AzureTtsConfig`], and SSML
//!   generation utilities.
//! - **client**: [`AzureSpeechClient`], the [`crate::core::tts::SpeechClient`]
//!   implementation over the Azure Speech REST API.

mod client;
mod config;

pub use client::AzureSpeechClient;
pub use config::{
    AZURE_OUTPUT_FORMAT_HEADER, AZURE_SUBSCRIPTION_KEY_HEADER, AZURE_SUBSCRIPTION_REGION_HEADER,
    AzureTtsConfig, build_ssml, content_type_for_format, escape_xml, voice_locale,
};
