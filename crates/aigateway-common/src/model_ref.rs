//! Provider/model identifier parsing
//!
//! Model routers name their models with a single compound string such as
//! `openai/gpt-4`. The part before the first `/` is the provider, everything
//! after it is the model name (which may itself contain further slashes,
//! e.g. `azure/deployments/gpt-4`).

use crate::PROVIDER_MODEL_SEPARATOR;

/// Split a compound identifier on the first separator.
///
/// Returns `(provider, model_name, found)`. When the separator is absent the
/// whole input is returned as the provider with an empty model name. This is
/// a pure split; callers decide what counts as malformed.
pub fn split_provider_model(identifier: &str) -> (&str, &str, bool) {
    match identifier.split_once(PROVIDER_MODEL_SEPARATOR) {
        Some((provider, model)) => (provider, model, true),
        None => (identifier, "", false),
    }
}

/// A well-formed `provider/model-name` reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelRef<'a> {
    /// Provider part, e.g. `openai`
    pub provider: &'a str,
    /// Model part, e.g. `gpt-4`
    pub model: &'a str,
}

impl<'a> ModelRef<'a> {
    /// Parse a compound identifier, requiring a separator and non-empty parts
    pub fn parse(identifier: &'a str) -> Option<Self> {
        let (provider, model, found) = split_provider_model(identifier);
        if !found || provider.is_empty() || model.is_empty() {
            return None;
        }
        Some(Self { provider, model })
    }
}

impl std::fmt::Display for ModelRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.provider, PROVIDER_MODEL_SEPARATOR, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_separator() {
        assert_eq!(
            split_provider_model("openai/gpt-4"),
            ("openai", "gpt-4", true)
        );
        assert_eq!(
            split_provider_model("azure/deployments/gpt-4"),
            ("azure", "deployments/gpt-4", true)
        );
    }

    #[test]
    fn missing_separator_is_reported() {
        assert_eq!(split_provider_model("gpt-4"), ("gpt-4", "", false));
        assert_eq!(split_provider_model(""), ("", "", false));
    }

    #[test]
    fn parse_accepts_provider_and_model() {
        let parsed = ModelRef::parse("anthropic/claude-3-opus").unwrap();
        assert_eq!(parsed.provider, "anthropic");
        assert_eq!(parsed.model, "claude-3-opus");
        assert_eq!(parsed.to_string(), "anthropic/claude-3-opus");
    }

    #[test]
    fn parse_rejects_malformed_identifiers() {
        for bad in ["gpt-4", "/gpt-4", "openai/", "/", ""] {
            assert!(ModelRef::parse(bad).is_none(), "{bad:?} should be rejected");
        }
    }
}
