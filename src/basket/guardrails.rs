//! Validações e helpers numéricos seguros para a cesta.
//! Objetivo: entradas seguras e divisões/multiplicações sem estouro.

use super::error::{BasketError, Result};
use super::error_catalog::BasketErrorCode;
use super::error_map;
use super::types::{BasketConfig, Reserve, U256, A_PRECISION, WAD};

#[inline]
fn overflow(op: &'static str) -> BasketError {
    BasketError::new(BasketErrorCode::OverflowNumeric).with_context("op", op)
}

#[inline]
pub fn ensure_nonzero(amount: u128) -> Result<()> {
    if amount == 0 {
        crate::basket_bail!(BasketErrorCode::InvalidArgument, reason => "quantidade zero");
    }
    Ok(())
}

#[inline]
pub fn ensure_index(index: usize, len: usize) -> Result<()> {
    if error_map::from_index(index, len).is_some() {
        crate::basket_bail!(BasketErrorCode::IndexOutOfRange, index => index, len => len);
    }
    Ok(())
}

/// Valida índices/quantidades de operações multi-ativo.
pub fn ensure_multi_inputs(indices: &[usize], quantities: &[u128], len: usize) -> Result<()> {
    match error_map::from_multi_inputs(indices, quantities, len) {
        None => Ok(()),
        Some(BasketErrorCode::IndexOutOfRange) => {
            let bad = indices.iter().copied().find(|&i| i >= len).unwrap_or(len);
            Err(crate::basket_err!(BasketErrorCode::IndexOutOfRange, index => bad, len => len))
        }
        Some(code) => Err(crate::basket_err!(
            code,
            reason => format!("{} índices para {} quantidades", indices.len(), quantities.len())
        )),
    }
}

/// Valida o snapshot `(reserves, config)` antes de qualquer cálculo.
pub fn validate_config(reserves: &[Reserve], config: &BasketConfig) -> Result<()> {
    let Some(code) = error_map::from_config(reserves, config) else {
        return Ok(());
    };
    let reason = if reserves.is_empty() {
        "cesta vazia"
    } else if reserves.iter().any(|r| r.ratio == 0) {
        "ratio zero"
    } else if config.limits.min > config.limits.max {
        "limits.min > limits.max"
    } else if config.limits.max > WAD {
        "limits.max > 100%"
    } else if config.recol_fee >= WAD {
        "recol_fee >= 100%"
    } else {
        "a * n < A_PRECISION"
    };
    Err(crate::basket_err!(code, reason => reason))
}

/// `a * n`, exigindo `>= A_PRECISION` (o termo `nA - A_PRECISION` do solver).
pub fn amplification(a: u128, len: usize) -> Result<U256> {
    let n_a = mul_u256(U256::from(a), U256::from(len))?;
    if n_a < U256::from(A_PRECISION) {
        crate::basket_bail!(BasketErrorCode::InvalidConfig, reason => "a * n < A_PRECISION");
    }
    Ok(n_a)
}

#[inline]
pub fn checked_add(a: u128, b: u128) -> Result<u128> {
    a.checked_add(b).ok_or_else(|| overflow("add"))
}

#[inline]
pub fn checked_sub(a: u128, b: u128) -> Result<u128> {
    a.checked_sub(b).ok_or_else(|| overflow("sub"))
}

#[inline]
pub fn add_u256(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b).ok_or_else(|| overflow("add"))
}

#[inline]
pub fn sub_u256(a: U256, b: U256) -> Result<U256> {
    a.checked_sub(b).ok_or_else(|| overflow("sub"))
}

#[inline]
pub fn mul_u256(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or_else(|| overflow("mul"))
}

#[inline]
pub fn div_u256(n: U256, d: U256) -> Result<U256> {
    if d.is_zero() {
        return Err(overflow("div"));
    }
    Ok(n / d)
}

/// `floor(a * b / d)` em 256 bits.
#[inline]
pub fn mul_div(a: U256, b: U256, d: U256) -> Result<U256> {
    div_u256(mul_u256(a, b)?, d)
}

#[inline]
pub fn u256_to_u128_checked(v: U256) -> Result<u128> {
    if v > U256::from(u128::MAX) {
        Err(overflow("downcast"))
    } else {
        Ok(v.as_u128())
    }
}
