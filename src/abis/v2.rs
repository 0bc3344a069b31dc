use alloy::sol;

// Factory and pair events of the constant-product AMM (SpookySwap is a Uniswap V2 fork)
sol! {
    event PairCreated(address indexed token0, address indexed token1, address pair, uint256);
    event Mint(address indexed sender, uint256 amount0, uint256 amount1);
    event Burn(address indexed sender, uint256 amount0, uint256 amount1, address indexed to);
    event Sync(uint112 reserve0, uint112 reserve1);
    event Swap(address indexed sender, uint256 amount0In, uint256 amount1In, uint256 amount0Out, uint256 amount1Out, address indexed to);
}
