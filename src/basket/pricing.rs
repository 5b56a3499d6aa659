//! Utilitários para UI/roteadores: preço do mAsset, pesos, colateralização e
//! cotações com tolerância de slippage.
//! Baseados nas funções puras de `swap.rs` e `redeem.rs`.

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::fees::Collateralisation;
use super::guardrails::{add_u256, mul_div, u256_to_u128_checked};
use super::invariant::open_snapshot;
use super::redeem::compute_redeem_exact;
use super::swap::compute_swap;
use super::types::{BasketConfig, Reserve, Wad, U256, WAD};
use super::weights::{in_bounds, weights};

pub type Ppm = u32;
pub const PPM_SCALE: Ppm = 1_000_000;

#[inline]
fn clamp_tolerance(tolerance_ppm: Ppm) -> u128 {
    u128::from(tolerance_ppm.min(PPM_SCALE))
}

/// Preço do mAsset em WAD e o invariante atual: `(k * WAD / supply, k)`.
pub fn compute_price(reserves: &[Reserve], config: &BasketConfig) -> Result<(Wad, U256)> {
    if config.supply == 0 {
        crate::basket_bail!(BasketErrorCode::InvalidConfig, reason => "supply zero");
    }
    let (_, k) = open_snapshot(reserves, config)?;
    let price = mul_div(k, U256::from(WAD), U256::from(config.supply))?;
    Ok((u256_to_u128_checked(price)?, k))
}

/// Peso (WAD) de cada ativo na composição atual.
pub fn basket_weights(reserves: &[Reserve], config: &BasketConfig) -> Result<Vec<Wad>> {
    let (basket, _) = open_snapshot(reserves, config)?;
    weights(&basket.x, basket.sum)
}

/// `true` quando a composição atual respeita `config.limits`.
pub fn within_limits(reserves: &[Reserve], config: &BasketConfig) -> Result<bool> {
    let (basket, _) = open_snapshot(reserves, config)?;
    in_bounds(&basket.x, basket.sum, &config.limits)
}

pub fn collateralisation(reserves: &[Reserve], config: &BasketConfig) -> Result<Collateralisation> {
    let (_, k) = open_snapshot(reserves, config)?;
    Ok(Collateralisation::classify(k, config.supply))
}

/// **min_out** aceito para um swap com tolerância `tolerance_ppm` (0..1e6):
/// `floor(out * (1 - tol))`.
pub fn min_output_with_tolerance(
    reserves: &[Reserve],
    input_index: usize,
    output_index: usize,
    raw_input: u128,
    fee_rate: Wad,
    config: &BasketConfig,
    tolerance_ppm: Ppm,
) -> Result<u128> {
    let quote = compute_swap(reserves, input_index, output_index, raw_input, fee_rate, config)?;
    let factor = U256::from(u128::from(PPM_SCALE) - clamp_tolerance(tolerance_ppm));
    u256_to_u128_checked(mul_div(U256::from(quote.quantity), factor, U256::from(PPM_SCALE))?)
}

/// **max_in** (mAsset a queimar) para um resgate exato com tolerância:
/// `ceil(burn * (1 + tol))`.
pub fn max_input_with_tolerance(
    reserves: &[Reserve],
    indices: &[usize],
    raw_outputs: &[u128],
    config: &BasketConfig,
    fee_rate: Wad,
    tolerance_ppm: Ppm,
) -> Result<u128> {
    let quote = compute_redeem_exact(reserves, indices, raw_outputs, config, fee_rate)?;
    let scale = U256::from(PPM_SCALE);
    let factor = U256::from(u128::from(PPM_SCALE) + clamp_tolerance(tolerance_ppm));
    let n = add_u256(
        U256::from(quote.quantity) * factor,
        scale - U256::one(),
    )?;
    u256_to_u128_checked(n / scale)
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::normalize::ratio_for_decimals;
    use crate::basket::types::WeightLimits;

    fn basket18(units: &[u128]) -> Vec<Reserve> {
        units.iter().map(|u| Reserve::new(ratio_for_decimals(18).unwrap(), u * WAD)).collect()
    }

    fn cfg(supply: u128) -> BasketConfig {
        BasketConfig::new(10_000, WeightLimits::new(5 * WAD / 100, 55 * WAD / 100), supply)
    }

    #[test]
    fn t_price_at_par() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let (price, k) = compute_price(&reserves, &cfg(40 * WAD)).unwrap();
        assert_eq!(price, WAD);
        assert_eq!(k, U256::from(40 * WAD));
        let (price, _) = compute_price(&reserves, &cfg(80 * WAD)).unwrap();
        assert_eq!(price, WAD / 2);
    }

    #[test]
    fn t_price_zero_supply() {
        let reserves = basket18(&[10, 10]);
        let err = compute_price(&reserves, &cfg(0)).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::InvalidConfig);
    }

    #[test]
    fn t_weights_and_collateralisation() {
        let reserves = basket18(&[10, 30]);
        let w = basket_weights(&reserves, &cfg(40 * WAD)).unwrap();
        assert_eq!(w, vec![WAD / 4, 3 * WAD / 4]);
        assert!(!within_limits(&reserves, &cfg(40 * WAD)).unwrap());
        assert!(within_limits(&basket18(&[10, 10]), &cfg(20 * WAD)).unwrap());
        assert_eq!(
            collateralisation(&basket18(&[10, 10]), &cfg(21 * WAD)).unwrap(),
            Collateralisation::Under
        );
        assert_eq!(
            collateralisation(&basket18(&[10, 10]), &cfg(20 * WAD)).unwrap(),
            Collateralisation::Exact
        );
    }

    #[test]
    fn t_min_out_with_tolerance() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let c = cfg(40 * WAD);
        let out = compute_swap(&reserves, 0, 1, WAD, 0, &c).unwrap().quantity;
        let min_out = min_output_with_tolerance(&reserves, 0, 1, WAD, 0, &c, 5_000).unwrap();
        let expected = (U256::from(out) * U256::from(995_000u32)) / U256::from(PPM_SCALE);
        assert_eq!(min_out, expected.as_u128());
        // tolerância acima de 100% satura em zero
        assert_eq!(min_output_with_tolerance(&reserves, 0, 1, WAD, 0, &c, 2_000_000).unwrap(), 0);
    }

    #[test]
    fn t_max_in_with_tolerance() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let c = cfg(40 * WAD);
        let max_in = max_input_with_tolerance(&reserves, &[0, 1, 2, 3], &[WAD; 4], &c, 0, 5_000).unwrap();
        // burn = 4e18 + 1 ⇒ ceil(burn * 1.005)
        let burn = 4 * WAD + 1;
        let expected = (burn * 1_005_000 + 999_999) / 1_000_000;
        assert_eq!(max_in, expected);
    }
}
