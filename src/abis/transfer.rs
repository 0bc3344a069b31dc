use alloy::sol;

// LP token transfers, used to count distinct liquidity providers per pair
sol! {
    event Transfer(address indexed from, address indexed to, uint256 value);
}
