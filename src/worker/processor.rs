//! Sequential event processor.
//!
//! Applies parsed pair/factory logs to the entity store in (block, log index)
//! order. This is the single writer of `derived_eth`: every token price is
//! computed from counter-party prices written by earlier events, so events must
//! never be reordered or processed concurrently.

use std::sync::Arc;

use alloy::primitives::U256;
use anyhow::Context;
use bigdecimal::{BigDecimal, Zero};
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::{
    config::PricingSettings,
    db::{
        models::{Bundle, LiquidityEvent, LiquidityEventKind, Pair, Token, BUNDLE_ID},
        EntityStore,
    },
    pricing::{PairIndex, PriceResolver, PricingError},
    utils::{convert_token_to_decimal, hex_encode, ZERO_ADDRESS},
    worker::parser::ParsedLog,
};

/// Decimals assumed for tokens whose metadata was never registered
const DEFAULT_DECIMALS: u8 = 18;

/// Drives the pricing core over an ordered stream of events.
pub struct Processor<S: EntityStore> {
    store: S,
    registry: PairIndex,
    resolver: PriceResolver,
    /// (pair, provider) combinations already counted
    providers: FxHashSet<(String, String)>,
    /// Position of the last applied log
    last_position: Option<(u64, u32)>,
}

impl<S: EntityStore> Processor<S> {
    pub fn new(store: S, settings: Arc<PricingSettings>) -> Self {
        Self {
            store,
            registry: PairIndex::new(),
            resolver: PriceResolver::new(settings),
            providers: FxHashSet::default(),
            last_position: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn registry(&self) -> &PairIndex {
        &self.registry
    }

    /// Register token metadata ahead of its first pair.
    ///
    /// Existing tokens keep their pricing state and stats.
    pub fn register_token(&mut self, token: Token) -> anyhow::Result<()> {
        match self.store.load_token(&token.address)? {
            Some(mut existing) => {
                existing.symbol = token.symbol;
                existing.name = token.name;
                existing.decimals = token.decimals;
                self.store.save_token(existing)
            },
            None => self.store.save_token(token),
        }
    }

    /// Apply one log.
    ///
    /// Returns false when the log was skipped: a pair this processor has not
    /// seen created, or a PairCreated from a factory that is not configured. Fails on out-of-order input and on any
    /// store or pricing inconsistency.
    pub fn process(&mut self, log: &ParsedLog) -> anyhow::Result<bool> {
        let position = log.position();
        if let Some(last) = self.last_position {
            if position <= last {
                anyhow::bail!(
                    "Log at block {} index {} is not after block {} index {}",
                    position.0,
                    position.1,
                    last.0,
                    last.1
                );
            }
        }

        let applied = match log {
            ParsedLog::PairCreated { event, log_address, block_number, .. } => {
                let pair = hex_encode(event.pair.as_slice());
                if !self.resolver.settings().is_factory(log_address) {
                    debug!("Ignoring pair {} from unknown factory {}", pair, log_address);
                    self.last_position = Some(position);
                    return Ok(false);
                }
                self.handle_new_pair(
                    &pair,
                    &hex_encode(event.token0.as_slice()),
                    &hex_encode(event.token1.as_slice()),
                    *block_number,
                )
                .with_context(|| {
                    format!("Failed to create pair {} from factory {}", pair, log_address)
                })?
            },
            ParsedLog::Transfer { event, log_address, .. } => self.handle_transfer(
                log_address,
                &hex_encode(event.from.as_slice()),
                &hex_encode(event.to.as_slice()),
            )?,
            ParsedLog::Sync { event, log_address, block_number, .. } => self
                .handle_sync(
                    log_address,
                    U256::from(event.reserve0.to::<u128>()),
                    U256::from(event.reserve1.to::<u128>()),
                    *block_number,
                )
                .with_context(|| {
                    format!("Failed to sync pair {} at block {}", log_address, block_number)
                })?,
            ParsedLog::Mint { event, log_address, block_number, log_index } => self
                .handle_liquidity(
                    LiquidityEventKind::Mint,
                    log_address,
                    &hex_encode(event.sender.as_slice()),
                    event.amount0,
                    event.amount1,
                    (*block_number, *log_index),
                )
                .with_context(|| format!("Failed to apply mint on pair {}", log_address))?,
            ParsedLog::Burn { event, log_address, block_number, log_index } => self
                .handle_liquidity(
                    LiquidityEventKind::Burn,
                    log_address,
                    &hex_encode(event.sender.as_slice()),
                    event.amount0,
                    event.amount1,
                    (*block_number, *log_index),
                )
                .with_context(|| format!("Failed to apply burn on pair {}", log_address))?,
            ParsedLog::Swap { event, log_address, .. } => self
                .handle_swap(
                    log_address,
                    [event.amount0In, event.amount1In],
                    [event.amount0Out, event.amount1Out],
                )
                .with_context(|| format!("Failed to apply swap on pair {}", log_address))?,
        };

        self.last_position = Some(position);
        Ok(applied)
    }

    fn handle_new_pair(
        &mut self,
        pair_address: &str,
        token0: &str,
        token1: &str,
        block_number: u64,
    ) -> anyhow::Result<bool> {
        if self.store.load_pair(pair_address)?.is_some() {
            warn!("Pair {} created twice, ignoring", pair_address);
            return Ok(false);
        }

        let mut factory = self.store.load_factory()?.unwrap_or_default();
        factory.pair_count += 1;
        self.store.save_factory(factory)?;

        if self.store.load_bundle(BUNDLE_ID)?.is_none() {
            self.store.save_bundle(Bundle::default())?;
        }

        self.ensure_token(token0, block_number)?;
        self.ensure_token(token1, block_number)?;

        self.registry.insert(token0, token1, pair_address);
        self.store.save_pair(Pair::new(
            pair_address.to_string(),
            token0.to_string(),
            token1.to_string(),
            block_number,
        ))?;

        debug!("Created pair {} ({} / {})", pair_address, token0, token1);
        Ok(true)
    }

    /// Make sure a token exists and has a (possibly zero) derived price.
    fn ensure_token(&mut self, address: &str, block_number: u64) -> anyhow::Result<()> {
        let mut token = match self.store.load_token(address)? {
            Some(token) => token,
            None => {
                warn!(
                    "No metadata registered for token {}, assuming {} decimals",
                    address, DEFAULT_DECIMALS
                );
                Token::new(
                    address.to_string(),
                    String::new(),
                    String::new(),
                    DEFAULT_DECIMALS,
                )
            },
        };

        if token.derived_eth.is_none() {
            token.set_derived_eth(BigDecimal::zero(), block_number);
        }

        self.store.save_token(token)
    }

    /// Count first-time LP token recipients of a mint as liquidity providers.
    fn handle_transfer(&mut self, pair_address: &str, from: &str, to: &str) -> anyhow::Result<bool> {
        let Some(mut pair) = self.store.load_pair(pair_address)? else {
            // Plain ERC-20 transfers share the signature
            return Ok(false);
        };

        // The locked minimum liquidity goes to the zero address
        if from != ZERO_ADDRESS || to == ZERO_ADDRESS {
            return Ok(true);
        }

        if self.providers.insert((pair.address.clone(), to.to_string())) {
            pair.liquidity_provider_count += 1;
            self.store.save_pair(pair)?;
        }

        Ok(true)
    }

    /// Apply new reserves, then reprice the native asset, both tokens and the
    /// pair's liquidity.
    fn handle_sync(
        &mut self,
        pair_address: &str,
        reserve0: U256,
        reserve1: U256,
        block_number: u64,
    ) -> anyhow::Result<bool> {
        let Some(mut pair) = self.store.load_pair(pair_address)? else {
            debug!("Sync for unknown pair {}, skipping", pair_address);
            return Ok(false);
        };
        let (mut token0, mut token1) = self.load_pair_tokens(&pair)?;
        let mut factory = self.store.load_factory()?.unwrap_or_default();

        // Take out the previous contribution; it is added back once repriced
        factory.total_liquidity_eth -= &pair.tracked_reserve_eth;
        token0.total_liquidity -= &pair.reserve0;
        token1.total_liquidity -= &pair.reserve1;

        let previous = pair.clone();
        pair.set_reserves(
            convert_token_to_decimal(reserve0, token0.decimals),
            convert_token_to_decimal(reserve1, token1.decimals),
        );

        // Pricing reads the new reserves back from the store
        self.store.save_pair(pair.clone())?;
        let eth_price = match self.reprice(&mut pair, &mut token0, &mut token1, block_number) {
            Ok(eth_price) => eth_price,
            Err(err) => {
                self.store.save_pair(previous)?;
                return Err(err.into());
            },
        };

        factory.total_liquidity_eth += &pair.tracked_reserve_eth;
        factory.total_liquidity_usd = &factory.total_liquidity_eth * &eth_price;

        token0.total_liquidity += &pair.reserve0;
        token1.total_liquidity += &pair.reserve1;

        let mut bundle = self.store.load_bundle(BUNDLE_ID)?.unwrap_or_default();
        bundle.eth_price = eth_price;

        self.store.save_bundle(bundle)?;
        self.store.save_pair(pair)?;
        self.store.save_factory(factory)?;
        self.store.save_token(token0)?;
        self.store.save_token(token1)?;

        Ok(true)
    }

    /// Recompute the native asset price, both tokens' derived prices and the
    /// pair's liquidity values. Nothing is saved.
    fn reprice(
        &self,
        pair: &mut Pair,
        token0: &mut Token,
        token1: &mut Token,
        block_number: u64,
    ) -> Result<BigDecimal, PricingError> {
        let eth_price = self.resolver.eth_price_in_usd(&self.store)?;

        // Both prices are computed before either token is updated
        let derived0 =
            self.resolver
                .find_eth_per_token(&token0.address, &self.store, &self.registry)?;
        let derived1 =
            self.resolver
                .find_eth_per_token(&token1.address, &self.store, &self.registry)?;
        token0.set_derived_eth(derived0.clone(), block_number);
        token1.set_derived_eth(derived1.clone(), block_number);

        pair.tracked_reserve_eth = if eth_price.is_zero() {
            BigDecimal::zero()
        } else {
            self.resolver.tracked_liquidity_usd(
                &pair.reserve0,
                token0,
                &pair.reserve1,
                token1,
                &eth_price,
            )? / &eth_price
        };
        pair.reserve_eth = &pair.reserve0 * &derived0 + &pair.reserve1 * &derived1;
        pair.reserve_usd = &pair.reserve_eth * &eth_price;

        Ok(eth_price)
    }

    fn handle_swap(
        &mut self,
        pair_address: &str,
        amounts_in: [U256; 2],
        amounts_out: [U256; 2],
    ) -> anyhow::Result<bool> {
        let Some(mut pair) = self.store.load_pair(pair_address)? else {
            debug!("Swap for unknown pair {}, skipping", pair_address);
            return Ok(false);
        };
        let (mut token0, mut token1) = self.load_pair_tokens(&pair)?;
        let mut factory = self.store.load_factory()?.unwrap_or_default();
        let eth_price = self.store.load_bundle(BUNDLE_ID)?.unwrap_or_default().eth_price;

        let amount0_total = convert_token_to_decimal(amounts_in[0], token0.decimals)
            + convert_token_to_decimal(amounts_out[0], token0.decimals);
        let amount1_total = convert_token_to_decimal(amounts_in[1], token1.decimals)
            + convert_token_to_decimal(amounts_out[1], token1.decimals);

        // Untracked: both sides at their derived prices, averaged
        let derived_amount_eth = (derived_eth(&token1)? * &amount1_total
            + derived_eth(&token0)? * &amount0_total)
            / BigDecimal::from(2);
        let derived_amount_usd = &derived_amount_eth * &eth_price;

        let tracked_amount_usd = self.resolver.tracked_volume_usd(
            &amount0_total,
            &token0,
            &amount1_total,
            &token1,
            &pair,
            &eth_price,
        )?;
        let tracked_amount_eth = if eth_price.is_zero() {
            BigDecimal::zero()
        } else {
            &tracked_amount_usd / &eth_price
        };

        token0.trade_volume += &amount0_total;
        token0.trade_volume_usd += &tracked_amount_usd;
        token0.untracked_volume_usd += &derived_amount_usd;
        token0.tx_count += 1;

        token1.trade_volume += &amount1_total;
        token1.trade_volume_usd += &tracked_amount_usd;
        token1.untracked_volume_usd += &derived_amount_usd;
        token1.tx_count += 1;

        pair.volume_token0 += &amount0_total;
        pair.volume_token1 += &amount1_total;
        pair.volume_usd += &tracked_amount_usd;
        pair.untracked_volume_usd += &derived_amount_usd;
        pair.tx_count += 1;

        factory.total_volume_usd += &tracked_amount_usd;
        factory.total_volume_eth += &tracked_amount_eth;
        factory.untracked_volume_usd += &derived_amount_usd;
        factory.tx_count += 1;

        self.store.save_pair(pair)?;
        self.store.save_token(token0)?;
        self.store.save_token(token1)?;
        self.store.save_factory(factory)?;

        Ok(true)
    }

    fn handle_liquidity(
        &mut self,
        kind: LiquidityEventKind,
        pair_address: &str,
        sender: &str,
        amount0: U256,
        amount1: U256,
        (block_number, log_index): (u64, u32),
    ) -> anyhow::Result<bool> {
        let Some(mut pair) = self.store.load_pair(pair_address)? else {
            debug!("Liquidity event for unknown pair {}, skipping", pair_address);
            return Ok(false);
        };
        let (mut token0, mut token1) = self.load_pair_tokens(&pair)?;
        let mut factory = self.store.load_factory()?.unwrap_or_default();
        let eth_price = self.store.load_bundle(BUNDLE_ID)?.unwrap_or_default().eth_price;

        let amount0 = convert_token_to_decimal(amount0, token0.decimals);
        let amount1 = convert_token_to_decimal(amount1, token1.decimals);

        let amount_usd = (derived_eth(&token1)? * &amount1 + derived_eth(&token0)? * &amount0)
            * &eth_price;
        let tracked_amount_usd = self.resolver.tracked_liquidity_usd(
            &amount0,
            &token0,
            &amount1,
            &token1,
            &eth_price,
        )?;

        token0.tx_count += 1;
        token1.tx_count += 1;
        pair.tx_count += 1;
        factory.tx_count += 1;

        self.store.save_liquidity_event(LiquidityEvent {
            kind,
            pair: pair.address.clone(),
            block_number,
            log_index,
            sender: sender.to_string(),
            amount0,
            amount1,
            amount_usd,
            tracked_amount_usd,
        })?;
        self.store.save_pair(pair)?;
        self.store.save_token(token0)?;
        self.store.save_token(token1)?;
        self.store.save_factory(factory)?;

        Ok(true)
    }

    fn load_pair_tokens(&self, pair: &Pair) -> Result<(Token, Token), PricingError> {
        let load = |address: &str| -> Result<Token, PricingError> {
            self.store
                .load_token(address)?
                .ok_or_else(|| PricingError::MissingToken {
                    token: address.to_string(),
                    pair: pair.address.clone(),
                })
        };

        Ok((load(&pair.token0)?, load(&pair.token1)?))
    }
}

fn derived_eth(token: &Token) -> Result<&BigDecimal, PricingError> {
    token
        .derived_eth
        .as_ref()
        .ok_or_else(|| PricingError::UnpricedToken(token.address.clone()))
}
