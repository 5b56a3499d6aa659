//! Limitador de peso: depois de cada operação, todo ativo precisa ficar em
//! `limits.min <= x_i / Σx <= limits.max` (WAD).

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::guardrails::{mul_div, u256_to_u128_checked};
use super::types::{Wad, WeightLimits, U256, WAD};

/// Peso de cada ativo em WAD (floor). Cesta vazia ⇒ todos zero.
pub fn weights(x: &[U256], sum: U256) -> Result<Vec<Wad>> {
    if sum.is_zero() {
        return Ok(vec![0; x.len()]);
    }
    x.iter()
        .map(|xi| u256_to_u128_checked(mul_div(*xi, U256::from(WAD), sum)?))
        .collect()
}

/// `true` quando todos os pesos estão dentro dos limites.
pub fn in_bounds(x: &[U256], sum: U256, limits: &WeightLimits) -> Result<bool> {
    Ok(first_breach(x, sum, limits)?.is_none())
}

/// Rejeita a composição com `ExceedsWeightLimits` apontando o primeiro ativo
/// fora dos limites.
pub fn ensure_in_bounds(x: &[U256], sum: U256, limits: &WeightLimits) -> Result<()> {
    match first_breach(x, sum, limits)? {
        None => Ok(()),
        Some((asset, weight)) => Err(crate::basket_err!(
            BasketErrorCode::ExceedsWeightLimits,
            asset => asset,
            weight => weight,
            min => limits.min,
            max => limits.max
        )),
    }
}

fn first_breach(x: &[U256], sum: U256, limits: &WeightLimits) -> Result<Option<(usize, Wad)>> {
    if sum.is_zero() {
        return Ok(None);
    }
    for (i, w) in weights(x, sum)?.into_iter().enumerate() {
        if w > limits.max || w < limits.min {
            return Ok(Some((i, w)));
        }
    }
    Ok(None)
}
