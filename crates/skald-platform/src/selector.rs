//! Backend selector strings.
//!
//! A selector names a backend and optionally carries configuration as
//! `;`-separated tokens that alternate key and value. A token in key
//! position may instead be a whole `key=value` pair, so these are
//! equivalent:
//!
//! ```text
//! quantinuum;machine;H1-2E;emulate;true
//! quantinuum;machine=H1-2E;emulate=true
//! ```
//!
//! Value tokens are taken verbatim, `=` included.

use skald_hal::BackendConfig;

use crate::error::ConfigError;

/// A parsed backend selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSelector {
    /// Backend id; names both the descriptor file and the transport.
    pub name: String,
    /// Key/value configuration handed to the transport.
    pub config: BackendConfig,
}

impl BackendSelector {
    /// Parse `<id>[;key;value]*` (or `<id>[;key=value]*`).
    ///
    /// Fails with [`ConfigError::MalformedBackendConfig`] when the trailing
    /// tokens cannot be paired. A key given twice keeps its first value.
    pub fn parse(selector: &str) -> Result<Self, ConfigError> {
        let mut tokens = selector.split(';');
        let name = tokens.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(ConfigError::EmptySelector);
        }
        let mut config = BackendConfig::new(name);
        let mut pending: Option<(usize, &str)> = None;
        for (index, token) in tokens.enumerate() {
            match pending.take() {
                Some((_, key)) => config = config.with_extra(key, token),
                None => match token.split_once('=') {
                    Some((key, value)) => config = config.with_extra(key, value),
                    None => pending = Some((index, token)),
                },
            }
        }
        if let Some((index, _)) = pending {
            return Err(ConfigError::MalformedBackendConfig {
                selector: selector.to_string(),
                tokens: index + 1,
            });
        }

        Ok(Self {
            name: name.to_string(),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        let sel = BackendSelector::parse("loopback").unwrap();
        assert_eq!(sel.name, "loopback");
        assert!(sel.config.extra.is_empty());
    }

    #[test]
    fn test_key_value_pairs() {
        let sel = BackendSelector::parse("quantinuum;machine;H1-2E;emulate;true").unwrap();
        assert_eq!(sel.name, "quantinuum");
        assert_eq!(sel.config.name, "quantinuum");
        assert_eq!(sel.config.get("machine"), Some("H1-2E"));
        assert_eq!(sel.config.get("emulate"), Some("true"));
    }

    #[test]
    fn test_equals_pairs() {
        let sel = BackendSelector::parse("quantinuum;machine=H1-2E;emulate;true").unwrap();
        assert_eq!(sel.config.get("machine"), Some("H1-2E"));
        assert_eq!(sel.config.get("emulate"), Some("true"));
    }

    #[test]
    fn test_odd_tokens_rejected() {
        let err = BackendSelector::parse("ibm;onlykey").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MalformedBackendConfig { tokens: 1, .. }
        ));
    }

    #[test]
    fn test_values_keep_equals_signs() {
        let sel = BackendSelector::parse("ibm;api_key;abc==").unwrap();
        assert_eq!(sel.config.get("api_key"), Some("abc=="));

        let sel = BackendSelector::parse("ibm;url;https://h/x?a=b;machine;m").unwrap();
        assert_eq!(sel.config.get("url"), Some("https://h/x?a=b"));
        assert_eq!(sel.config.get("machine"), Some("m"));
    }

    #[test]
    fn test_value_with_equals_does_not_shift_pairs() {
        let err = BackendSelector::parse("ibm;k;a=b;c").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MalformedBackendConfig { tokens: 3, .. }
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            BackendSelector::parse(""),
            Err(ConfigError::EmptySelector)
        ));
    }
}
