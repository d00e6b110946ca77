//! # Source configuration.
//!
//! Provides [`SourceConfig`], the immutable description of one polled endpoint,
//! and the override types used to derive the effective source list from the
//! built-in defaults.
//!
//! ## Resolution
//! ```text
//! default_sources()            SourcesOverride (caller)
//!   global   ─┐                  global:   { intervalMillis: 500 }
//!   bitcoin  ─┼── per slot ──►   bitcoin:  None
//!   ethereum ─┤   per field      ethereum: { alias: "ETHER" }
//!   litecoin ─┘                  litecoin: None
//!                     │
//!                     ▼
//!   Vec<SourceConfig> in slot declaration order (global, bitcoin, ethereum, litecoin)
//! ```
//!
//! ## Rules
//! - A field present in an override replaces the default **for that field only**.
//! - A slot without an override keeps its defaults entirely.
//! - Defaults are produced by a pure function; every call returns fresh values.
//! - `intervalMillis = 0` is valid and means "reschedule immediately after completion".

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default polling interval for every built-in source.
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// One of the four built-in source slots.
///
/// The declaration order is the iteration order used everywhere
/// (defaults, resolution, fetcher creation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceSlot {
    /// Aggregate market statistics.
    Global,
    /// Bitcoin ticker.
    Bitcoin,
    /// Ethereum ticker.
    Ethereum,
    /// Litecoin ticker.
    Litecoin,
}

impl SourceSlot {
    /// All slots in declaration order.
    pub const ALL: [SourceSlot; 4] = [
        SourceSlot::Global,
        SourceSlot::Bitcoin,
        SourceSlot::Ethereum,
        SourceSlot::Litecoin,
    ];

    /// Key used for this slot in override documents.
    pub fn key(&self) -> &'static str {
        match self {
            SourceSlot::Global => "global",
            SourceSlot::Bitcoin => "bitcoin",
            SourceSlot::Ethereum => "ethereum",
            SourceSlot::Litecoin => "litecoin",
        }
    }

    fn default_endpoint(&self) -> &'static str {
        match self {
            SourceSlot::Global => "https://api.coinmarketcap.com/v1/global/",
            SourceSlot::Bitcoin => "https://api.coinmarketcap.com/v1/ticker/bitcoin/",
            SourceSlot::Ethereum => "https://api.coinmarketcap.com/v1/ticker/ethereum/",
            SourceSlot::Litecoin => "https://api.coinmarketcap.com/v1/ticker/litecoin/",
        }
    }

    fn default_alias(&self) -> &'static str {
        match self {
            SourceSlot::Global => "global",
            SourceSlot::Bitcoin => "BTC",
            SourceSlot::Ethereum => "ETH",
            SourceSlot::Litecoin => "LiteCoin",
        }
    }
}

/// Immutable description of one polled source.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use quotefeed::SourceConfig;
///
/// let src = SourceConfig::new("https://example.com/ticker", 1000, "X");
/// assert_eq!(src.interval(), Duration::from_millis(1000));
/// assert_eq!(src.alias(), "X");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    endpoint: String,
    interval_ms: u64,
    alias: String,
}

impl SourceConfig {
    /// Creates a source description.
    pub fn new(endpoint: impl Into<String>, interval_ms: u64, alias: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            interval_ms,
            alias: alias.into(),
        }
    }

    /// Returns the built-in defaults for `slot`.
    pub fn default_for(slot: SourceSlot) -> Self {
        Self::new(
            slot.default_endpoint(),
            DEFAULT_INTERVAL_MS,
            slot.default_alias(),
        )
    }

    /// Endpoint address handed to the transport.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Polling interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Polling interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Short label attached to every event produced by this source.
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// Per-field override for one source. Absent fields keep the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceOverride {
    /// Replacement endpoint.
    pub endpoint: Option<String>,
    /// Replacement interval in milliseconds.
    pub interval_millis: Option<u64>,
    /// Replacement alias.
    pub alias: Option<String>,
}

impl SourceOverride {
    /// Returns an override with the endpoint set.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Returns an override with the interval set.
    pub fn interval_millis(mut self, interval_ms: u64) -> Self {
        self.interval_millis = Some(interval_ms);
        self
    }

    /// Returns an override with the alias set.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Applies present fields on top of `base`.
    pub fn apply(&self, base: SourceConfig) -> SourceConfig {
        SourceConfig {
            endpoint: self.endpoint.clone().unwrap_or(base.endpoint),
            interval_ms: self.interval_millis.unwrap_or(base.interval_ms),
            alias: self.alias.clone().unwrap_or(base.alias),
        }
    }
}

/// Caller-supplied overrides for the built-in slots.
///
/// Parsed from JSON with [`SourcesOverride::from_json`]:
/// ```rust
/// use quotefeed::SourcesOverride;
///
/// let o = SourcesOverride::from_json(r#"{ "bitcoin": { "intervalMillis": 500 } }"#).unwrap();
/// assert_eq!(o.bitcoin.unwrap().interval_millis, Some(500));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesOverride {
    /// Override for [`SourceSlot::Global`].
    pub global: Option<SourceOverride>,
    /// Override for [`SourceSlot::Bitcoin`].
    pub bitcoin: Option<SourceOverride>,
    /// Override for [`SourceSlot::Ethereum`].
    pub ethereum: Option<SourceOverride>,
    /// Override for [`SourceSlot::Litecoin`].
    pub litecoin: Option<SourceOverride>,
}

impl SourcesOverride {
    /// Parses overrides from a JSON document.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(doc).map_err(|e| ConfigError::Parse {
            error: e.to_string(),
        })
    }

    /// Returns a copy with the override for `slot` replaced.
    pub fn with(mut self, slot: SourceSlot, ov: SourceOverride) -> Self {
        *self.slot_mut(slot) = Some(ov);
        self
    }

    /// Returns the override for `slot`, if any.
    pub fn get(&self, slot: SourceSlot) -> Option<&SourceOverride> {
        match slot {
            SourceSlot::Global => self.global.as_ref(),
            SourceSlot::Bitcoin => self.bitcoin.as_ref(),
            SourceSlot::Ethereum => self.ethereum.as_ref(),
            SourceSlot::Litecoin => self.litecoin.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: SourceSlot) -> &mut Option<SourceOverride> {
        match slot {
            SourceSlot::Global => &mut self.global,
            SourceSlot::Bitcoin => &mut self.bitcoin,
            SourceSlot::Ethereum => &mut self.ethereum,
            SourceSlot::Litecoin => &mut self.litecoin,
        }
    }
}

/// Returns fresh built-in defaults for all slots, in declaration order.
pub fn default_sources() -> Vec<SourceConfig> {
    SourceSlot::ALL
        .iter()
        .map(|slot| SourceConfig::default_for(*slot))
        .collect()
}

/// Resolves overrides against the built-in defaults.
///
/// Returns one [`SourceConfig`] per slot in declaration order, or an error if a
/// resolved endpoint or alias is empty.
pub fn resolve_sources(overrides: &SourcesOverride) -> Result<Vec<SourceConfig>, ConfigError> {
    SourceSlot::ALL
        .iter()
        .map(|&slot| {
            let base = SourceConfig::default_for(slot);
            let src = match overrides.get(slot) {
                Some(ov) => ov.apply(base),
                None => base,
            };
            if src.endpoint.trim().is_empty() {
                return Err(ConfigError::EmptyEndpoint { slot });
            }
            if src.alias.trim().is_empty() {
                return Err(ConfigError::EmptyAlias { slot });
            }
            Ok(src)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_in_declaration_order() {
        let aliases: Vec<String> = default_sources()
            .iter()
            .map(|s| s.alias().to_string())
            .collect();
        assert_eq!(aliases, vec!["global", "BTC", "ETH", "LiteCoin"]);
        assert!(
            default_sources()
                .iter()
                .all(|s| s.interval_ms() == DEFAULT_INTERVAL_MS)
        );
    }

    #[test]
    fn test_no_overrides_equals_defaults() {
        let resolved = resolve_sources(&SourcesOverride::default()).unwrap();
        assert_eq!(resolved, default_sources());
    }

    #[test]
    fn test_override_is_per_field() {
        let ov = SourcesOverride::default()
            .with(SourceSlot::Ethereum, SourceOverride::default().interval_millis(750));
        let resolved = resolve_sources(&ov).unwrap();

        let eth = &resolved[2];
        assert_eq!(eth.interval_ms(), 750);
        assert_eq!(eth.alias(), "ETH");
        assert_eq!(
            eth.endpoint(),
            "https://api.coinmarketcap.com/v1/ticker/ethereum/"
        );
        assert_eq!(resolved[1], SourceConfig::default_for(SourceSlot::Bitcoin));
    }

    #[test]
    fn test_override_from_json() {
        let ov = SourcesOverride::from_json(
            r#"{
                "global": { "endpoint": "http://localhost/global", "alias": "G" },
                "litecoin": { "intervalMillis": 0 }
            }"#,
        )
        .unwrap();
        let resolved = resolve_sources(&ov).unwrap();

        assert_eq!(resolved[0].endpoint(), "http://localhost/global");
        assert_eq!(resolved[0].alias(), "G");
        assert_eq!(resolved[0].interval_ms(), DEFAULT_INTERVAL_MS);
        assert_eq!(resolved[3].interval_ms(), 0);
        assert_eq!(resolved[3].alias(), "LiteCoin");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = SourcesOverride::from_json(r#"{ "bitcoin": { "url": "x" } }"#).unwrap_err();
        assert_eq!(err.as_label(), "config_parse");

        let err = SourcesOverride::from_json(r#"{ "dogecoin": {} }"#).unwrap_err();
        assert_eq!(err.as_label(), "config_parse");
    }

    #[test]
    fn test_empty_alias_is_rejected() {
        let ov = SourcesOverride::default().with(SourceSlot::Bitcoin, SourceOverride::default().alias(" "));
        assert_eq!(
            resolve_sources(&ov),
            Err(ConfigError::EmptyAlias {
                slot: SourceSlot::Bitcoin
            })
        );
    }

    #[test]
    fn test_defaults_are_fresh_values() {
        let mut a = default_sources();
        a[0] = SourceConfig::new("changed", 1, "changed");
        assert_eq!(default_sources()[0].alias(), "global");
    }
}
