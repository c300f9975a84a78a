use std::env;
use std::path::PathBuf;

use super::ServerConfig;
use super::utils::parse_bool;
use super::yaml::YamlConfig;

/// Merges environment variables over YAML configuration.
///
/// Priority order (highest to lowest):
/// 1. Environment variables
/// 2. YAML file values
/// 3. Built-in defaults
///
/// # Errors
/// Returns an error if numeric environment variables are malformed or if
/// the Azure key/region are missing from both sources.
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();

    // Helper macro to get a string value with priority: ENV > YAML > default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            env::var($env_var)
                .ok()
                .or_else(|| $yaml_value)
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Helper macro for optional values: ENV > YAML
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            env::var($env_var).ok().or_else(|| $yaml_value)
        };
    }

    // Server configuration
    let host = get_value!(
        "HOST",
        yaml.server.as_ref().and_then(|s| s.host.clone()),
        "0.0.0.0"
    );

    let port = if let Ok(port_str) = env::var("PORT") {
        port_str
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT environment variable: {e}"))?
    } else {
        yaml.server.as_ref().and_then(|s| s.port).unwrap_or(8000)
    };

    // Azure credentials; the only required settings
    let azure_key = get_optional!(
        "AZURE_TTS_KEY",
        yaml.azure.as_ref().and_then(|a| a.key.clone())
    );
    let azure_region = get_optional!(
        "AZURE_TTS_REGION",
        yaml.azure.as_ref().and_then(|a| a.region.clone())
    );
    let (Some(azure_key), Some(azure_region)) = (azure_key, azure_region) else {
        return Err(
            "Azure Speech key/region must be provided in the config file or environment".into(),
        );
    };
    let azure_endpoint = get_optional!(
        "AZURE_TTS_ENDPOINT",
        yaml.azure.as_ref().and_then(|a| a.endpoint.clone())
    );

    // Synthesis defaults
    let default_voice = get_value!(
        "DEFAULT_VOICE",
        yaml.defaults.as_ref().and_then(|d| d.voice.clone()),
        "zh-CN-XiaoxiaoNeural"
    );
    let default_style = get_value!(
        "DEFAULT_STYLE",
        yaml.defaults.as_ref().and_then(|d| d.style.clone()),
        "general"
    );
    let default_rate = get_value!(
        "DEFAULT_RATE",
        yaml.defaults.as_ref().and_then(|d| d.rate.clone()),
        "+0%"
    );
    let default_pitch = get_value!(
        "DEFAULT_PITCH",
        yaml.defaults.as_ref().and_then(|d| d.pitch.clone()),
        "+0%"
    );
    let output_format = get_value!(
        "OUTPUT_FORMAT",
        yaml.defaults.as_ref().and_then(|d| d.output_format.clone()),
        "audio-24khz-160kbitrate-mono-mp3"
    );

    let max_text_length = parse_env_number(
        "MAX_TEXT_LENGTH",
        yaml.defaults.as_ref().and_then(|d| d.max_text_length),
        4500,
    )?;
    let segment_length = parse_env_number(
        "SEGMENT_LENGTH",
        yaml.defaults.as_ref().and_then(|d| d.segment_length),
        300,
    )?;

    let enable_streaming = env::var("ENABLE_STREAMING")
        .ok()
        .and_then(|v| parse_bool(&v))
        .or_else(|| yaml.defaults.as_ref().and_then(|d| d.enable_streaming))
        .unwrap_or(false);

    // Usage accounting
    let cost_output_dir = PathBuf::from(get_value!(
        "COST_OUTPUT_DIR",
        yaml.cost.as_ref().and_then(|c| c.output_dir.clone()),
        "/app/cost"
    ));
    let price_per_million_chars = match env::var("PRICE_PER_MILLION_CHARS") {
        Ok(value) => value
            .parse::<f64>()
            .map_err(|e| format!("Invalid PRICE_PER_MILLION_CHARS: {e}"))?,
        Err(_) => yaml
            .cost
            .as_ref()
            .and_then(|c| c.price_per_million_chars)
            .unwrap_or(15.0),
    };

    Ok(ServerConfig {
        host,
        port,
        azure_key,
        azure_region,
        azure_endpoint,
        default_voice,
        default_style,
        default_rate,
        default_pitch,
        output_format,
        max_text_length,
        segment_length,
        enable_streaming,
        cost_output_dir,
        price_per_million_chars,
    })
}

fn parse_env_number(
    env_var: &str,
    yaml_value: Option<usize>,
    default: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    match env::var(env_var) {
        Ok(value) => value
            .parse::<usize>()
            .map_err(|e| format!("Invalid {env_var}: {e}").into()),
        Err(_) => Ok(yaml_value.unwrap_or(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn cleanup_env_vars() {
        unsafe {
            for var in [
                "HOST",
                "PORT",
                "AZURE_TTS_KEY",
                "AZURE_TTS_REGION",
                "AZURE_TTS_ENDPOINT",
                "DEFAULT_VOICE",
                "SEGMENT_LENGTH",
                "ENABLE_STREAMING",
                "COST_OUTPUT_DIR",
                "PRICE_PER_MILLION_CHARS",
            ] {
                env::remove_var(var);
            }
        }
    }

    fn yaml_with_credentials() -> YamlConfig {
        serde_yaml::from_str("azure:\n  key: yaml-key\n  region: eastus\n").unwrap()
    }

    #[test]
    #[serial]
    fn missing_credentials_is_an_error() {
        cleanup_env_vars();
        assert!(merge_config(None).is_err());
    }

    #[test]
    #[serial]
    fn yaml_credentials_fill_defaults() {
        cleanup_env_vars();
        let config = merge_config(Some(yaml_with_credentials())).unwrap();
        assert_eq!(config.azure_key, "yaml-key");
        assert_eq!(config.azure_region, "eastus");
        assert_eq!(config.port, 8000);
        assert_eq!(config.segment_length, 300);
        assert_eq!(config.max_text_length, 4500);
        assert_eq!(config.default_voice, "zh-CN-XiaoxiaoNeural");
        assert!(!config.enable_streaming);
        assert_eq!(config.price_per_million_chars, 15.0);
    }

    #[test]
    #[serial]
    fn environment_overrides_yaml() {
        cleanup_env_vars();
        unsafe {
            env::set_var("AZURE_TTS_KEY", "env-key");
            env::set_var("SEGMENT_LENGTH", "120");
            env::set_var("ENABLE_STREAMING", "yes");
        }
        let config = merge_config(Some(yaml_with_credentials())).unwrap();
        assert_eq!(config.azure_key, "env-key");
        assert_eq!(config.azure_region, "eastus");
        assert_eq!(config.segment_length, 120);
        assert!(config.enable_streaming);
        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn malformed_numeric_env_is_an_error() {
        cleanup_env_vars();
        unsafe {
            env::set_var("PORT", "not-a-port");
        }
        let result = merge_config(Some(yaml_with_credentials()));
        assert!(result.is_err());
        cleanup_env_vars();
    }
}
