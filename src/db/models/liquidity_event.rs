use bigdecimal::BigDecimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityEventKind {
    Mint,
    Burn,
}

/// A mint or burn against a pair, valued in USD.
///
/// `amount_usd` values both sides at their derived prices regardless of
/// whitelist status; `tracked_amount_usd` only counts whitelisted sides.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LiquidityEvent {
    pub kind: LiquidityEventKind,
    pub pair: String,
    pub block_number: u64,
    pub log_index: u32,
    pub sender: String,
    pub amount0: BigDecimal,
    pub amount1: BigDecimal,
    pub amount_usd: BigDecimal,
    pub tracked_amount_usd: BigDecimal,
}
