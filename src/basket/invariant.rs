//! Solver do invariante StableSwap multi-ativo (Newton–Raphson em U256).
//!
//! Convenção de amplificação: `nA = a * n`, com `a` escalado por
//! [`A_PRECISION`]. Para `n` saldos normalizados `x_i` com soma `S`:
//!
//! ```text
//! D_P    = D^(n+1) / (n^n · Πx_i)
//! D_next = (nA·S/A_P + n·D_P) · D / ((nA - A_P)·D/A_P + (n+1)·D_P)
//! ```
//!
//! Com `A → ∞` o invariante tende à soma (constant-sum); com `nA → A_P`
//! ele se aproxima do produto (constant-product).
//!
//! Os dois modos convergem quando `|novo - anterior| <= 1`. Estourar o
//! limite de iterações é `DidNotConverge`; nunca se devolve aproximação.

use tracing::trace;

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::guardrails::{
    add_u256, amplification, div_u256, ensure_index, mul_div, mul_u256, sub_u256, validate_config,
};
use super::normalize::NormalizedBasket;
use super::types::{BasketConfig, Reserve, U256, A_PRECISION, MAX_ITERATIONS, MIN_SOLVED_RESERVE};

#[inline]
fn has_converged(current: U256, previous: U256) -> bool {
    if current > previous {
        current - previous <= U256::one()
    } else {
        previous - current <= U256::one()
    }
}

/// Valida o snapshot, normaliza as reservas e calcula `k0`.
pub fn open_snapshot(reserves: &[Reserve], config: &BasketConfig) -> Result<(NormalizedBasket, U256)> {
    validate_config(reserves, config)?;
    let basket = NormalizedBasket::from_reserves(reserves)?;
    let k0 = compute_invariant(&basket.x, basket.sum, config.a)?;
    Ok((basket, k0))
}

/// Invariante `D` para saldos normalizados `x` (com soma `sum`).
pub fn compute_invariant(x: &[U256], sum: U256, a: u128) -> Result<U256> {
    compute_invariant_bounded(x, sum, a, MAX_ITERATIONS)
}

/// Igual a [`compute_invariant`], com limite explícito de iterações.
pub fn compute_invariant_bounded(
    x: &[U256],
    sum: U256,
    a: u128,
    max_iterations: usize,
) -> Result<U256> {
    if sum.is_zero() {
        return Ok(U256::zero());
    }
    let n = U256::from(x.len());
    let n_a = amplification(a, x.len())?;
    let a_prec = U256::from(A_PRECISION);

    // termos constantes ao longo das iterações
    let ann_sum = div_u256(mul_u256(n_a, sum)?, a_prec)?;
    let ann_minus_prec = sub_u256(n_a, a_prec)?;
    let n_plus_one = n + U256::one();

    let mut k = sum;
    for iteration in 0..max_iterations {
        let mut d_p = k;
        for (j, xj) in x.iter().enumerate() {
            if xj.is_zero() {
                crate::basket_bail!(BasketErrorCode::InsufficientLiquidity, asset => j);
            }
            d_p = mul_div(d_p, k, mul_u256(*xj, n)?)?;
        }
        let k_prev = k;
        let numerator = mul_u256(add_u256(ann_sum, mul_u256(d_p, n)?)?, k)?;
        let denominator = add_u256(
            div_u256(mul_u256(ann_minus_prec, k)?, a_prec)?,
            mul_u256(n_plus_one, d_p)?,
        )?;
        k = div_u256(numerator, denominator)?;
        if has_converged(k, k_prev) {
            trace!(iterations = iteration + 1, k = %k, "invariant converged");
            return Ok(k);
        }
    }
    Err(crate::basket_err!(
        BasketErrorCode::DidNotConverge,
        iterations => max_iterations,
        solver => "invariant"
    ))
}

/// Resolve o saldo normalizado do ativo `index` que, com os demais saldos
/// fixos, leva o invariante a `target_k`.
///
/// O resultado é arredondado **para cima** em 1 unidade (a poeira fica na
/// cesta). Soluções abaixo de [`MIN_SOLVED_RESERVE`] são inválidas.
pub fn solve_for_reserve(x: &[U256], a: u128, index: usize, target_k: U256) -> Result<U256> {
    solve_for_reserve_bounded(x, a, index, target_k, MAX_ITERATIONS)
}

/// Igual a [`solve_for_reserve`], com limite explícito de iterações.
pub fn solve_for_reserve_bounded(
    x: &[U256],
    a: u128,
    index: usize,
    target_k: U256,
    max_iterations: usize,
) -> Result<U256> {
    ensure_index(index, x.len())?;
    let n = U256::from(x.len());
    let n_a = amplification(a, x.len())?;
    let a_prec = U256::from(A_PRECISION);

    let mut sum_others = U256::zero();
    let mut k_p = target_k;
    for (i, xi) in x.iter().enumerate() {
        if i == index {
            continue;
        }
        if xi.is_zero() {
            crate::basket_bail!(BasketErrorCode::InsufficientLiquidity, asset => i);
        }
        sum_others = add_u256(sum_others, *xi)?;
        k_p = mul_div(k_p, target_k, mul_u256(*xi, n)?)?;
    }

    // y² + (S' - g)·y = c
    let c = div_u256(
        div_u256(mul_u256(mul_u256(k_p, target_k)?, a_prec)?, n_a)?,
        n,
    )?;
    let g = mul_div(target_k, sub_u256(n_a, a_prec)?, n_a)?;

    let two = U256::from(2u8);
    let mut y = target_k;
    for iteration in 0..max_iterations {
        let y_prev = y;
        let base = add_u256(mul_u256(y, two)?, sum_others)?;
        let denominator = match base.checked_sub(g) {
            Some(d) if !d.is_zero() => d,
            _ => {
                return Err(crate::basket_err!(
                    BasketErrorCode::DidNotConverge,
                    solver => "reserve",
                    iterations => iteration
                ))
            }
        };
        y = div_u256(add_u256(mul_u256(y, y)?, c)?, denominator)?;
        if has_converged(y, y_prev) {
            trace!(iterations = iteration + 1, asset = index, y = %y, "reserve solved");
            let solved = add_u256(y, U256::one())?;
            if solved < U256::from(MIN_SOLVED_RESERVE) {
                crate::basket_bail!(
                    BasketErrorCode::InsufficientLiquidity,
                    asset => index,
                    solved => solved
                );
            }
            return Ok(solved);
        }
    }
    Err(crate::basket_err!(
        BasketErrorCode::DidNotConverge,
        iterations => max_iterations,
        solver => "reserve"
    ))
}
