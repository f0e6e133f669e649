use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

fn codes(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

/// Translator settings: provider plus the per-translator language lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(rename = "default_translator")]
    #[serde(default)]
    pub default_translator: Option<String>,

    /// Translator name -> ordered language codes
    #[serde(default = "default_translators")]
    pub translators: BTreeMap<String, Vec<String>>,
}

fn default_provider() -> String {
    "python_service".to_string()
}

fn default_translators() -> BTreeMap<String, Vec<String>> {
    let mut translators = BTreeMap::new();
    translators.insert(
        "DeepL".to_string(),
        codes("bg cs da de el en es et fi fr hu id it ja ko lt lv nb nl pl pt ro ru sk sl sv tr uk zh"),
    );
    translators.insert(
        "Google".to_string(),
        codes(
            "af ar bg bn ca cs da de el en es et fa fi fr he hi hr hu id it ja ko lt lv ms nl no \
             pl pt ro ru sk sl sr sv sw ta th tr uk ur vi zh-CN zh-TW",
        ),
    );
    translators
}

impl TranslationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.translators.is_empty() {
            return Err("At least one translator must be configured".to_string());
        }
        for (name, languages) in &self.translators {
            if languages.is_empty() {
                return Err(format!("Translator {} has no languages", name));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = languages.iter().find(|lang| !seen.insert(lang.as_str())) {
                return Err(format!("Translator {} lists language {} twice", name, dup));
            }
            if !languages.iter().any(|lang| lang == "en") {
                return Err(format!(
                    "Translator {} does not support English, the default output language",
                    name
                ));
            }
        }
        if let Some(default) = &self.default_translator {
            if !self.translators.keys().any(|name| name.eq_ignore_ascii_case(default)) {
                return Err(format!("Default translator {} is not configured", default));
            }
        }
        Ok(())
    }

    /// Configured default, else the first translator
    pub fn default_translator(&self) -> Option<String> {
        self.default_translator
            .clone()
            .or_else(|| self.translators.keys().next().cloned())
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            default_translator: None,
            translators: default_translators(),
        }
    }
}
