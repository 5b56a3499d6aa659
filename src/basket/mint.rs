//! Mint de mAsset contra depósitos de um ou vários bAssets.
//! Políticas:
//! - entrada normalizada: **floor**
//! - mintado: `floor((k1 - k0) * supply / k0)`; bootstrap (`supply == 0`): `k1 - k0`
//! - composição final precisa respeitar os limites de peso

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::fees::apply_recol_to_mint;
use super::guardrails::{
    add_u256, ensure_index, ensure_multi_inputs, ensure_nonzero, mul_div, sub_u256, u256_to_u128_checked,
};
use super::invariant::{compute_invariant, open_snapshot};
use super::normalize::{to_normalized, NormalizedBasket};
use super::types::{BasketConfig, OperationResult, Reserve, U256, MIN_SCALED_AMOUNT};
use super::weights::ensure_in_bounds;

#[inline]
fn ensure_min_scaled(scaled: U256) -> Result<()> {
    if scaled <= U256::from(MIN_SCALED_AMOUNT) {
        crate::basket_bail!(BasketErrorCode::InputTooSmall, scaled => scaled);
    }
    Ok(())
}

/// Quantidade de mAsset que corresponde ao crescimento do invariante `k0 → k1`.
pub fn mint_output(k0: U256, k1: U256, supply: u128) -> Result<u128> {
    let delta = sub_u256(k1, k0)?;
    if supply == 0 {
        return u256_to_u128_checked(delta);
    }
    if k0.is_zero() {
        crate::basket_bail!(BasketErrorCode::InvalidConfig, reason => "supply > 0 com invariante zero");
    }
    u256_to_u128_checked(mul_div(delta, U256::from(supply), k0)?)
}

fn finish_mint(basket: &NormalizedBasket, k0: U256, config: &BasketConfig) -> Result<OperationResult> {
    ensure_in_bounds(&basket.x, basket.sum, &config.limits)?;
    let k1 = compute_invariant(&basket.x, basket.sum, config.a)?;
    let minted = mint_output(k0, k1, config.supply)?;
    let (quantity, fee) = apply_recol_to_mint(minted, k0, config)?;
    Ok(OperationResult::new(quantity, fee))
}

/// Mint com depósito `raw_input` (decimais nativos) do ativo `index`.
pub fn compute_mint(
    reserves: &[Reserve],
    index: usize,
    raw_input: u128,
    config: &BasketConfig,
) -> Result<OperationResult> {
    ensure_index(index, reserves.len())?;
    ensure_nonzero(raw_input)?;
    let (mut basket, k0) = open_snapshot(reserves, config)?;

    let scaled = to_normalized(raw_input, reserves[index].ratio)?;
    ensure_min_scaled(scaled)?;
    basket.credit(index, scaled)?;

    finish_mint(&basket, k0, config)
}

/// Mint com depósitos simultâneos. A ordem de `indices` não altera o
/// resultado; índices repetidos acumulam.
pub fn compute_mint_multi(
    reserves: &[Reserve],
    indices: &[usize],
    raw_inputs: &[u128],
    config: &BasketConfig,
) -> Result<OperationResult> {
    ensure_multi_inputs(indices, raw_inputs, reserves.len())?;
    let (mut basket, k0) = open_snapshot(reserves, config)?;

    let mut total_scaled = U256::zero();
    for (&index, &raw) in indices.iter().zip(raw_inputs) {
        let scaled = to_normalized(raw, reserves[index].ratio)?;
        basket.credit(index, scaled)?;
        total_scaled = add_u256(total_scaled, scaled)?;
    }
    ensure_min_scaled(total_scaled)?;

    finish_mint(&basket, k0, config)
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::normalize::ratio_for_decimals;
    use crate::basket::types::{WeightLimits, WAD};

    fn basket18(units: &[u128]) -> Vec<Reserve> {
        units.iter().map(|u| Reserve::new(ratio_for_decimals(18).unwrap(), u * WAD)).collect()
    }

    fn cfg(supply: u128) -> BasketConfig {
        BasketConfig::new(10_000, WeightLimits::new(5 * WAD / 100, 55 * WAD / 100), supply)
    }

    #[test]
    fn t_mint_output_formula() {
        let k0 = U256::from(100 * WAD);
        let k1 = U256::from(110 * WAD);
        assert_eq!(mint_output(k0, k1, 100 * WAD).unwrap(), 10 * WAD);
        assert_eq!(mint_output(k0, k1, 50 * WAD).unwrap(), 5 * WAD);
        assert_eq!(mint_output(k0, k1, 0).unwrap(), 10 * WAD);
        assert_eq!(
            mint_output(U256::zero(), k1, 1).unwrap_err().code,
            BasketErrorCode::InvalidConfig
        );
    }

    #[test]
    fn t_mint_small_into_balanced_is_close_to_one_to_one() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let r = compute_mint(&reserves, 0, WAD, &cfg(40 * WAD)).unwrap();
        assert_eq!(r.fee, 0);
        // leve slippage: < 1 unidade, mas > 0.99
        assert!(r.quantity < WAD);
        assert!(r.quantity > 99 * WAD / 100);
    }

    #[test]
    fn t_mint_into_scarce_asset_gets_bonus() {
        let reserves = basket18(&[8, 12, 10, 10]);
        let scarce = compute_mint(&reserves, 0, WAD, &cfg(40 * WAD)).unwrap();
        let abundant = compute_mint(&reserves, 1, WAD, &cfg(40 * WAD)).unwrap();
        assert!(scarce.quantity > abundant.quantity);
    }

    #[test]
    fn t_mint_invalid_index() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let err = compute_mint(&reserves, 4, WAD, &cfg(40 * WAD)).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::IndexOutOfRange);
    }

    #[test]
    fn t_mint_too_small() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let err = compute_mint(&reserves, 0, 1_000_000, &cfg(40 * WAD)).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::InputTooSmall);
        let err = compute_mint(&reserves, 0, 0, &cfg(40 * WAD)).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::InvalidArgument);
    }

    #[test]
    fn t_mint_over_weight_limit() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let err = compute_mint(&reserves, 0, 36 * WAD, &cfg(40 * WAD)).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::ExceedsWeightLimits);
    }

    #[test]
    fn t_mint_multi_proportional_is_exact() {
        // depósito proporcional não muda a forma da cesta ⇒ k cresce linearmente
        let reserves = basket18(&[10, 10, 10, 10]);
        let r = compute_mint_multi(&reserves, &[0, 1, 2, 3], &[WAD, WAD, WAD, WAD], &cfg(40 * WAD)).unwrap();
        assert_eq!(r.quantity, 4 * WAD);
    }

    #[test]
    fn t_mint_multi_matches_single() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let single = compute_mint(&reserves, 2, 3 * WAD, &cfg(40 * WAD)).unwrap();
        let multi = compute_mint_multi(&reserves, &[2], &[3 * WAD], &cfg(40 * WAD)).unwrap();
        assert_eq!(single, multi);
    }

    #[test]
    fn t_mint_multi_args() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let err = compute_mint_multi(&reserves, &[0, 1], &[WAD], &cfg(40 * WAD)).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::InvalidArgument);
        let err = compute_mint_multi(&reserves, &[0, 5], &[WAD, WAD], &cfg(40 * WAD)).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::IndexOutOfRange);
    }

    #[test]
    fn t_bootstrap_mint_with_zero_supply() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let r = compute_mint_multi(&reserves, &[0, 1, 2, 3], &[WAD; 4], &cfg(0)).unwrap();
        assert_eq!(r.quantity, 4 * WAD);
    }
}
