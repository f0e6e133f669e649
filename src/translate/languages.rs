use std::collections::BTreeMap;

/// Translator name to ordered language list, as configured
#[derive(Debug, Clone, Default)]
pub struct LanguageMap {
    entries: Vec<(String, Vec<String>)>,
}

impl LanguageMap {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    pub fn from_config(translators: &BTreeMap<String, Vec<String>>) -> Self {
        Self::new(
            translators
                .iter()
                .map(|(name, langs)| (name.clone(), langs.clone()))
                .collect(),
        )
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn languages(&self, translator: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(translator))
            .map(|(_, langs)| langs.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        let map = LanguageMap::new(vec![
            ("Google".to_string(), vec!["en".to_string(), "fr".to_string()]),
            ("DeepL".to_string(), vec!["de".to_string(), "en".to_string()]),
        ]);
        assert_eq!(map.languages("google").map(<[String]>::len), Some(2));
        assert_eq!(map.languages("DEEPL").map(|l| l[0].as_str()), Some("de"));
        assert!(map.languages("bing").is_none());
        assert_eq!(map.names(), vec!["Google", "DeepL"]);
    }
}
