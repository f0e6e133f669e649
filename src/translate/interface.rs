/// Translate interface - translators run in the Python service

use async_trait::async_trait;

/// Interface for a pluggable translation provider.
///
/// Each translator behind the provider has its own language set; callers
/// look it up per translator instead of assuming a shared one.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translator names in display order
    fn translators(&self) -> Vec<String>;

    /// Ordered language codes of one translator, `None` for an unknown one.
    /// Names match case-insensitively.
    fn supported_languages(&self, translator: &str) -> Option<Vec<String>>;

    /// Translate `text`. A `None` source asks the translator to detect it.
    async fn translate(
        &self,
        text: &str,
        translator: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, anyhow::Error>;
}
