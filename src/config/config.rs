use bigdecimal::BigDecimal;
use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;

/// Wrapped native asset (WFTM)
pub(crate) const WRAPPED_NATIVE: &str = "0x21be370d5312f44cb42ce377bc9b8a0cef1a4c83";
pub(crate) const DAI: &str = "0x8d11ec38a3eb5e956b052f67da8bdc9bef8abf3e";
pub(crate) const USDC: &str = "0x04068da6c83afcfa0e13ba15a6696662335d5b75";
/// fUSDT
pub(crate) const USDT: &str = "0x049d68029688eabf473097a2fc38ef61633a3c7a";

/// SpookySwap V2 factory
pub(crate) const FACTORY: &str = "0x152ee697f2e276fa89e96742e9bb9ab1f2e61be3";

// SpookySwap WFTM pairs
pub(crate) const DAI_NATIVE_PAIR: &str = "0xe120ffbda0d14f3bb6d6053e90e63c572a66a428";
pub(crate) const USDC_NATIVE_PAIR: &str = "0x2b4c76d0dc16be1c31d4c1dc53bf9b45987fc75c";
pub(crate) const USDT_NATIVE_PAIR: &str = "0x5965e53aa80a0bcf1cd6dbdd72e6a9b2aa047410";

/// Pricing configuration for the reference price resolver, token price
/// discovery and tracked volume classification.
///
/// Defaults reproduce the Fantom SpookySwap deployment. Every address is
/// lowercased on load so lookups can compare strings directly.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PricingSettings {
    /// Factories whose PairCreated logs are indexed; empty accepts any emitter
    pub factories: Vec<String>,
    /// Wrapped native asset; its derived price is always exactly 1
    pub native_token: String,
    pub dai: String,
    pub usdc: String,
    pub usdt: String,
    /// Reference pairs of the native asset against each stablecoin
    pub dai_native_pair: String,
    pub usdc_native_pair: String,
    pub usdt_native_pair: String,
    /// Ordered list of reliably priced tokens. Order matters: the first
    /// qualifying whitelisted counter-party wins during price discovery.
    pub whitelist: Vec<String>,
    /// Pairs excluded from tracked volume (rebasing or otherwise broken tokens)
    pub untracked_pairs: Vec<String>,
    /// Minimum `reserve_eth` for a pair to be used for pricing
    pub minimum_liquidity_threshold_eth: BigDecimal,
    /// Minimum reserve USD for pairs with few liquidity providers to count volume
    pub minimum_usd_threshold_new_pairs: BigDecimal,
    /// Pairs with fewer providers than this are gated by the USD threshold
    pub minimum_liquidity_providers: u64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            factories: vec![FACTORY.to_string()],
            native_token: WRAPPED_NATIVE.to_string(),
            dai: DAI.to_string(),
            usdc: USDC.to_string(),
            usdt: USDT.to_string(),
            dai_native_pair: DAI_NATIVE_PAIR.to_string(),
            usdc_native_pair: USDC_NATIVE_PAIR.to_string(),
            usdt_native_pair: USDT_NATIVE_PAIR.to_string(),
            whitelist: vec![
                WRAPPED_NATIVE.to_string(),
                DAI.to_string(),
                USDC.to_string(),
                USDT.to_string(),
            ],
            untracked_pairs: Vec::new(),
            minimum_liquidity_threshold_eth: BigDecimal::from(100),
            minimum_usd_threshold_new_pairs: BigDecimal::from(1000),
            minimum_liquidity_providers: 5,
        }
    }
}

impl PricingSettings {
    /// Lowercase every configured address.
    fn normalized(mut self) -> Self {
        for address in [
            &mut self.native_token,
            &mut self.dai,
            &mut self.usdc,
            &mut self.usdt,
            &mut self.dai_native_pair,
            &mut self.usdc_native_pair,
            &mut self.usdt_native_pair,
        ] {
            *address = address.to_lowercase();
        }
        self.factories = self.factories.iter().map(|f| f.to_lowercase()).collect();
        self.whitelist = self.whitelist.iter().map(|t| t.to_lowercase()).collect();
        self.untracked_pairs = self.untracked_pairs.iter().map(|p| p.to_lowercase()).collect();
        self
    }

    pub fn is_factory(&self, address: &str) -> bool {
        self.factories.is_empty() || self.factories.iter().any(|f| f == address)
    }

    pub fn is_native(&self, token: &str) -> bool {
        self.native_token == token
    }

    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.whitelist.iter().any(|t| t == token)
    }

    pub fn is_untracked_pair(&self, pair: &str) -> bool {
        self.untracked_pairs.iter().any(|p| p == pair)
    }
}

/// Logger configuration for the binary.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup when present; every section has
/// defaults so an empty or missing file yields the SpookySwap setup.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .build()?;

        Self::finish(s)
    }

    /// Build settings from an in-memory YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?;

        Self::finish(s)
    }

    fn finish(s: Config) -> Result<Self, ConfigError> {
        let mut settings: Settings = s.try_deserialize()?;
        settings.pricing = settings.pricing.normalized();

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_spookyswap() {
        let settings = Settings::default();
        assert_eq!(settings.pricing.whitelist.len(), 4);
        assert_eq!(settings.pricing.whitelist[0], WRAPPED_NATIVE);
        assert_eq!(settings.pricing.minimum_liquidity_threshold_eth, BigDecimal::from(100));
        assert_eq!(settings.pricing.minimum_usd_threshold_new_pairs, BigDecimal::from(1000));
        assert_eq!(settings.pricing.minimum_liquidity_providers, 5);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.pricing.is_factory(FACTORY));
        assert!(!settings.pricing.is_factory(WRAPPED_NATIVE));
    }

    #[test]
    fn test_empty_factory_list_accepts_any_emitter() {
        let pricing = PricingSettings {
            factories: Vec::new(),
            ..PricingSettings::default()
        };
        assert!(pricing.is_factory(WRAPPED_NATIVE));
    }

    #[test]
    fn test_yaml_overrides_and_lowercases() {
        let settings = Settings::from_yaml(
            r#"
pricing:
  factories:
    - "0x00000000000000000000000000000000000000FF"
  native_token: "0xABCDEF0000000000000000000000000000000001"
  whitelist:
    - "0xABCDEF0000000000000000000000000000000001"
    - "0x00000000000000000000000000000000000000AA"
  untracked_pairs:
    - "0x00000000000000000000000000000000000000BB"
  minimum_liquidity_threshold_eth: 50
logging:
  level: debug
"#,
        )
        .unwrap();

        let pricing = &settings.pricing;
        assert!(pricing.is_native("0xabcdef0000000000000000000000000000000001"));
        assert_eq!(
            pricing.whitelist,
            vec![
                "0xabcdef0000000000000000000000000000000001".to_string(),
                "0x00000000000000000000000000000000000000aa".to_string(),
            ]
        );
        assert!(pricing.is_untracked_pair("0x00000000000000000000000000000000000000bb"));
        assert!(pricing.is_factory("0x00000000000000000000000000000000000000ff"));
        assert!(!pricing.is_factory(FACTORY));
        assert_eq!(pricing.minimum_liquidity_threshold_eth, BigDecimal::from(50));
        // Unspecified fields keep their defaults
        assert_eq!(pricing.minimum_usd_threshold_new_pairs, BigDecimal::from(1000));
        assert_eq!(pricing.dai, DAI);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = Settings::from_yaml("").unwrap();
        assert_eq!(settings.pricing.usdc_native_pair, USDC_NATIVE_PAIR);
    }
}
