use serde::Deserialize;

/// Complete YAML configuration structure.
///
/// All fields are optional to allow partial configuration; environment
/// variables override any value specified here.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///
/// azure:
///   key: "your-subscription-key"
///   region: "eastus"
///
/// defaults:
///   voice: "zh-CN-XiaoxiaoNeural"
///   style: "general"
///   rate: "+0%"
///   pitch: "+0%"
///   output_format: "audio-24khz-160kbitrate-mono-mp3"
///   max_text_length: 4500
///   segment_length: 300
///   enable_streaming: false
///
/// cost:
///   output_dir: "/app/cost"
///   price_per_million_chars: 15.0
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub azure: Option<AzureYaml>,
    pub defaults: Option<DefaultsYaml>,
    pub cost: Option<CostYaml>,
}

/// Server configuration from YAML.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Azure Speech credentials from YAML.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AzureYaml {
    /// Subscription key from the Azure Portal
    /// (Speech resource → Keys and Endpoint → Key 1 or Key 2).
    pub key: Option<String>,
    /// Region the Speech resource is deployed in (e.g. "eastus").
    /// The subscription key is tied to this specific region.
    pub region: Option<String>,
    /// Optional full endpoint URL override.
    pub endpoint: Option<String>,
}

/// Synthesis defaults and limits from YAML.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DefaultsYaml {
    pub voice: Option<String>,
    pub style: Option<String>,
    pub rate: Option<String>,
    pub pitch: Option<String>,
    pub output_format: Option<String>,
    pub max_text_length: Option<usize>,
    pub segment_length: Option<usize>,
    pub enable_streaming: Option<bool>,
}

/// Usage accounting configuration from YAML.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CostYaml {
    pub output_dir: Option<String>,
    pub price_per_million_chars: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document_parses() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 9000
azure:
  key: "secret"
  region: "westeurope"
defaults:
  voice: "en-US-JennyNeural"
  segment_length: 120
  enable_streaming: true
cost:
  output_dir: "/tmp/cost"
  price_per_million_chars: 10.5
"#;
        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.as_ref().unwrap().port, Some(9000));
        assert_eq!(
            config.azure.as_ref().unwrap().region.as_deref(),
            Some("westeurope")
        );
        assert_eq!(
            config.defaults.as_ref().unwrap().segment_length,
            Some(120)
        );
        assert_eq!(
            config.cost.as_ref().unwrap().price_per_million_chars,
            Some(10.5)
        );
    }

    #[test]
    fn partial_document_parses_with_defaults() {
        let config: YamlConfig = serde_yaml::from_str("azure:\n  key: k\n  region: r\n").unwrap();
        assert!(config.server.is_none());
        assert!(config.defaults.is_none());
        assert_eq!(config.azure.unwrap().key.as_deref(), Some("k"));
    }
}
