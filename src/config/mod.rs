#[allow(clippy::module_inception)]
mod config;

pub use config::{LoggingSettings, PricingSettings, Settings};

#[cfg(test)]
pub(crate) use config::{
    DAI, DAI_NATIVE_PAIR, FACTORY, USDC, USDC_NATIVE_PAIR, USDT, USDT_NATIVE_PAIR, WRAPPED_NATIVE,
};
