use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config_manager::main::Config;

fn env_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").expect("valid env pattern"))
}

/// Replace `${VAR_NAME}` with the environment value; unknown variables stay verbatim
pub fn substitute_env_vars(content: &str) -> String {
    env_pattern()
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Parse configuration text; JSON for `.json`/`.jsonld` paths, YAML otherwise
pub fn parse_config(content: &str, path: &str) -> Result<Value> {
    let content = substitute_env_vars(content);
    let path_lower = path.to_lowercase();
    let value = if path_lower.ends_with(".json") || path_lower.ends_with(".jsonld") {
        let mut value: Value = serde_json::from_str(&content)?;
        // JSON-LD context carries no settings
        if let Value::Object(ref mut obj) = value {
            obj.remove("@context");
        }
        value
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(value)
}

/// Read a configuration file with environment variable substitution
pub fn read_config(config_path: &str) -> Result<Value> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }
    debug!("Read {} bytes of configuration from {}", content.len(), config_path);
    parse_config(&content, config_path)
}

/// Validate configuration data against the Config model
pub fn validate_config(config_data: &Value) -> Result<Config> {
    let config: Config = serde_json::from_value(config_data.clone())?;
    config.validate()?;
    Ok(config)
}

/// Load text file with encoding detection
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let bytes = fs::read(file_path)?;
    Ok(decode_with_guess(&bytes))
}

/// UTF-8 (BOM stripped) when valid, GBK otherwise
fn decode_with_guess(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEFu8, 0xBB, 0xBF][..]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (cow, _, _) = encoding_rs::GBK.decode(bytes);
            cow.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
system_config:
  port: 9000
  model_service_url: ${BIOGPT_HELPER_TEST_UNSET_VAR}
translation_config:
  translators:
    Google: [en, fr, de]
generation_config:
  seed: 7
  default_model: BioGPT-Large
"#;

    #[test]
    fn yaml_config_fills_defaults() {
        let value = parse_config(YAML, "conf.yaml").unwrap();
        let config = validate_config(&value).unwrap();
        assert_eq!(config.system_config.port, 9000);
        assert_eq!(config.system_config.request_timeout_secs, 600);
        assert_eq!(config.generation_config.seed, 7);
        assert_eq!(
            config.generation_config.default_model,
            crate::inference::ModelId::BioGptLarge
        );
        assert_eq!(config.generation_config.models.len(), 2);
        assert_eq!(config.translation_config.default_translator().as_deref(), Some("Google"));
    }

    #[test]
    fn unknown_env_vars_stay_verbatim() {
        let value = parse_config(YAML, "conf.yaml").unwrap();
        assert_eq!(
            value["system_config"]["model_service_url"],
            "${BIOGPT_HELPER_TEST_UNSET_VAR}"
        );
    }

    #[test]
    fn json_context_is_ignored() {
        let json = r#"{"@context": {"@vocab": "https://example.org/"}, "system_config": {"port": 8600}}"#;
        let config = validate_config(&parse_config(json, "conf.jsonld").unwrap()).unwrap();
        assert_eq!(config.system_config.port, 8600);
    }

    #[test]
    fn translator_without_english_fails_validation() {
        let yaml = "translation_config:\n  translators:\n    Papago: [ko, ja]\n";
        let err = validate_config(&parse_config(yaml, "conf.yaml").unwrap()).unwrap_err();
        assert!(err.to_string().contains("English"));
    }

    #[test]
    fn bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"system_config: {}");
        assert_eq!(decode_with_guess(&bytes), "system_config: {}");
    }
}
