//! Referência de alta precisão ("goldens") baseada em **BigUint/BigRational**
//! para o invariante StableSwap multi-ativo.
//!
//! Objetivos desta referência:
//! 1. Reproduzir a **mesma recorrência** do core (divisões floor nos mesmos
//!    pontos) sem limite de largura, servindo de oráculo para o U256.
//! 2. Resolver a reserva pela **forma fechada** da quadrática
//!    `y² + b·y = c` em racionais (raiz contínua, sem Newton).
//! 3. Medir o resíduo contínuo da equação StableSwap para um `D` do core.
//!
//! Esta referência não entra no caminho de produção; serve para testes e
//! geração de *goldens*.

use super::error::{BasketError, Result};
use super::error_catalog::BasketErrorCode;
use super::guardrails::ensure_index;
use super::invariant::{compute_invariant, solve_for_reserve};
use super::types::{U256, A_PRECISION, MAX_ITERATIONS};

use num_bigint::{BigInt, BigUint};
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

// -------------------------
// Helpers de conversão
// -------------------------
#[inline]
fn overflow() -> BasketError {
    BasketError::new(BasketErrorCode::OverflowNumeric).with_context("op", "ref_golden")
}

pub fn u256_to_big(v: U256) -> BigUint {
    let mut bytes = [0u8; 32];
    v.to_little_endian(&mut bytes);
    BigUint::from_bytes_le(&bytes)
}

pub fn big_to_u256(v: &BigUint) -> Result<U256> {
    let bytes = v.to_bytes_le();
    if bytes.len() > 32 {
        return Err(overflow());
    }
    Ok(U256::from_little_endian(&bytes))
}

#[inline]
fn q_from_bu(v: &BigUint) -> BigRational {
    BigRational::from_integer(BigInt::from(v.clone()))
}

#[inline]
fn q_int(v: u128) -> BigRational {
    BigRational::from_integer(BigInt::from(v))
}

fn big_sum(x: &[BigUint]) -> BigUint {
    x.iter().fold(BigUint::zero(), |acc, v| acc + v)
}

// -------------------------
// Política (replica exatamente o core, mas em Big-precision)
// -------------------------
/// Invariante pela recorrência do core, em BigUint.
pub fn policy_invariant(x: &[U256], a: u128) -> Result<BigUint> {
    let xs: Vec<BigUint> = x.iter().map(|v| u256_to_big(*v)).collect();
    let sum = big_sum(&xs);
    if sum.is_zero() {
        return Ok(sum);
    }
    let n = BigUint::from(xs.len());
    let n_a = BigUint::from(a) * &n;
    let a_prec = BigUint::from(A_PRECISION);
    if n_a < a_prec || xs.iter().any(Zero::is_zero) {
        return Err(BasketError::new(BasketErrorCode::InvalidConfig).with_context("op", "ref_golden"));
    }
    let ann_sum = &n_a * &sum / &a_prec;
    let ann_minus_prec = &n_a - &a_prec;
    let n_plus_one = &n + BigUint::one();

    let mut k = sum;
    for _ in 0..MAX_ITERATIONS {
        let mut d_p = k.clone();
        for xj in &xs {
            d_p = d_p * &k / (xj * &n);
        }
        let prev = k.clone();
        let numerator = (&ann_sum + &d_p * &n) * &k;
        let denominator = &ann_minus_prec * &k / &a_prec + &n_plus_one * &d_p;
        k = numerator / denominator;
        let diff = if k > prev { &k - &prev } else { &prev - &k };
        if diff <= BigUint::one() {
            return Ok(k);
        }
    }
    Err(BasketError::new(BasketErrorCode::DidNotConverge).with_context("solver", "ref_golden"))
}

// -------------------------
// Contínuo/exato
// -------------------------
/// Raiz contínua (floor) de `y² + (S' - g)·y = c` para o ativo `index`,
/// sem o `+1` de arredondamento do core.
pub fn closed_form_reserve(x: &[U256], a: u128, index: usize, target_k: U256) -> Result<BigUint> {
    ensure_index(index, x.len())?;
    let n = x.len() as u128;
    let n_a = q_int(a.checked_mul(n).ok_or_else(overflow)?);
    let a_prec = q_int(A_PRECISION);
    let k = q_from_bu(&u256_to_big(target_k));

    let mut sum_others = BigRational::zero();
    let mut prod_others = BigRational::one();
    for (i, xi) in x.iter().enumerate() {
        if i == index {
            continue;
        }
        let xi = q_from_bu(&u256_to_big(*xi));
        sum_others += xi.clone();
        prod_others *= xi;
    }
    if prod_others.is_zero() {
        return Err(BasketError::new(BasketErrorCode::InsufficientLiquidity).with_context("op", "ref_golden"));
    }

    // c = K^(n+1) · A_P / (nA · n^n · Πx_j)
    let mut k_pow = k.clone();
    let mut n_pow = BigRational::one();
    for _ in 0..n {
        k_pow *= k.clone();
        n_pow *= q_int(n);
    }
    let c = k_pow * a_prec.clone() / (n_a.clone() * n_pow * prod_others);
    // b = S' - K·(nA - A_P)/nA
    let b = sum_others - k * (n_a.clone() - a_prec) / n_a;

    // y = (-b + sqrt(b² + 4c)) / 2
    let disc = b.clone() * b.clone() + q_int(4) * c;
    let disc_floor = disc.floor().to_integer();
    if disc_floor.is_negative() {
        return Err(overflow());
    }
    let root = BigRational::from_integer(Roots::sqrt(&disc_floor));
    let y = (root - b) / q_int(2);
    let y = y.floor().to_integer();
    y.to_biguint().ok_or_else(overflow)
}

/// Resíduo relativo da equação contínua
/// `Ann·S + D = Ann·D + D^(n+1) / (n^n·Πx)` (com `Ann = nA / A_P`),
/// normalizado por `Ann·D`.
pub fn invariant_residual(x: &[U256], a: u128, k: U256) -> BigRational {
    let n = x.len() as u128;
    let ann = q_int(a) * q_int(n) / q_int(A_PRECISION);
    let d = q_from_bu(&u256_to_big(k));
    let mut sum = BigRational::zero();
    let mut prod = BigRational::one();
    for xi in x {
        let xi = q_from_bu(&u256_to_big(*xi));
        sum += xi.clone();
        prod *= xi;
    }
    if prod.is_zero() || d.is_zero() {
        return BigRational::zero();
    }
    let mut d_pow = d.clone();
    let mut n_pow = BigRational::one();
    for _ in 0..n {
        d_pow *= d.clone();
        n_pow *= q_int(n);
    }
    let lhs = ann.clone() * sum + d.clone();
    let rhs = ann.clone() * d.clone() + d_pow / (n_pow * prod);
    ((lhs - rhs) / (ann * d)).abs()
}

// -------------------------
// Estruturas de comparação (goldens)
// -------------------------
#[derive(Debug, Clone)]
pub struct RefInvariant {
    pub k_core: U256,
    pub k_policy: BigUint,
    pub residual_rel: BigRational,
}

#[derive(Debug, Clone)]
pub struct RefReserve {
    pub y_core: U256,
    pub y_closed: BigUint,
}

impl RefReserve {
    /// `|y_core - y_closed|` em unidades normalizadas.
    pub fn gap(&self) -> BigUint {
        let core = u256_to_big(self.y_core);
        if core > self.y_closed {
            core - &self.y_closed
        } else {
            &self.y_closed - core
        }
    }
}

/// Compara o **core** com a referência (invariante).
pub fn golden_invariant(x: &[U256], a: u128) -> Result<RefInvariant> {
    let sum = x.iter().fold(U256::zero(), |acc, v| acc + *v);
    let k_core = compute_invariant(x, sum, a)?;
    let k_policy = policy_invariant(x, a)?;
    let residual_rel = invariant_residual(x, a, k_core);
    Ok(RefInvariant { k_core, k_policy, residual_rel })
}

/// Compara o **core** com a referência (reserva resolvida).
pub fn golden_reserve(x: &[U256], a: u128, index: usize, target_k: U256) -> Result<RefReserve> {
    let y_core = solve_for_reserve(x, a, index, target_k)?;
    let y_closed = closed_form_reserve(x, a, index, target_k)?;
    Ok(RefReserve { y_core, y_closed })
}
