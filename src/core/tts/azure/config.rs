//! Azure Text-to-Speech configuration and SSML generation.
//!
//! The Azure Speech REST API takes an SSML document per request:
//!
//! - Endpoint: `https://{region}.tts.speech.microsoft.com/cognitiveservices/v1`
//! - Required headers: `Ocp-Apim-Subscription-Key`,
//!   `Ocp-Apim-Subscription-Region`, `Content-Type: application/ssml+xml`,
//!   `X-Microsoft-OutputFormat`
//! - Documentation: <https://learn.microsoft.com/en-us/azure/ai-services/speech-service/rest-text-to-speech>

/// Header carrying the Azure subscription key.
pub const AZURE_SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Header carrying the Azure region the subscription key is tied to.
pub const AZURE_SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";

/// Header selecting the synthesis output format.
pub const AZURE_OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// User-Agent value for requests to the Speech API.
pub const USER_AGENT: &str = "tts-gateway";

/// Connection settings for the Azure Speech TTS endpoint.
#[derive(Debug, Clone)]
pub struct AzureTtsConfig {
    /// Subscription key from the Azure Portal (Speech resource → Keys).
    pub subscription_key: String,
    /// Region the Speech resource is deployed in, e.g. `eastus`.
    pub region: String,
    /// Full endpoint URL override. When set, it replaces the regional URL;
    /// used for sovereign clouds and for pointing tests at a mock server.
    pub endpoint: Option<String>,
}

impl AzureTtsConfig {
    /// Returns the synthesis endpoint URL for this configuration.
    pub fn tts_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region
            ),
        }
    }
}

/// Builds the SSML document for one synthesis request.
///
/// The text is XML-escaped and wrapped in `<speak>` → `<voice>` →
/// `<mstts:express-as>` → `<prosody>`. Rate and pitch must already be in
/// canonical signed-percent form (see [`crate::core::tts::prosody`]).
pub fn build_ssml(text: &str, voice: &str, rate: &str, pitch: &str, style: &str) -> String {
    let escaped_text = escape_xml(text);
    let locale = voice_locale(voice);
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' \
         xmlns:mstts='http://www.w3.org/2001/mstts' xml:lang='{locale}'>\
         <voice name='{voice}'>\
         <mstts:express-as style='{style}'>\
         <prosody rate='{rate}' pitch='{pitch}'>\
         {escaped_text}\
         </prosody>\
         </mstts:express-as>\
         </voice>\
         </speak>"
    )
}

/// Derives the BCP-47 locale from an Azure voice name.
///
/// Azure voices are named `{lang}-{region}-{name}` (e.g.
/// `zh-CN-XiaoxiaoNeural` → `zh-CN`); names without a dash fall back to
/// `en-US`.
pub fn voice_locale(voice: &str) -> String {
    if voice.contains('-') {
        voice.splitn(3, '-').take(2).collect::<Vec<_>>().join("-")
    } else {
        "en-US".to_string()
    }
}

/// Escapes the five XML special characters for embedding text in SSML.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Maps an Azure output format identifier to an HTTP content type.
///
/// Matches on the container named in the format string, e.g.
/// `audio-24khz-160kbitrate-mono-mp3` → `audio/mpeg`.
pub fn content_type_for_format(output_format: &str) -> &'static str {
    if output_format.ends_with("mp3") || output_format.contains("kbitrate") {
        "audio/mpeg"
    } else if output_format.contains("opus") || output_format.contains("ogg") {
        "audio/ogg"
    } else if output_format.contains("webm") {
        "audio/webm"
    } else if output_format.starts_with("riff") {
        "audio/wav"
    } else if output_format.starts_with("raw") {
        "audio/pcm"
    } else {
        "application/octet-stream"
    }
}
