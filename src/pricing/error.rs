use thiserror::Error;

/// Failures of the pricing core.
///
/// Missing markets are not errors: they degrade to a zero price. These
/// variants cover broken store/registry consistency and arithmetic invariants,
/// which the caller must not paper over.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("pair {pair} is known to the registry but missing from the store")]
    MissingPair { pair: String },

    #[error("token {token} of pair {pair} is missing from the store")]
    MissingToken { token: String, pair: String },

    #[error("pair {pair} returned for token {token} does not contain it")]
    PairMismatch { pair: String, token: String },

    #[error("token {0} has no derived ETH price yet")]
    UnpricedToken(String),

    #[error("qualifying reference pairs have zero total native-asset reserve")]
    ZeroLiquidity,

    #[error(transparent)]
    Lookup(#[from] anyhow::Error),
}
