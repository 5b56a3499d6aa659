//! Mapeamento entre condições de domínio e códigos de erro da cesta.
//! Classificação *pre-flight*: só olha os inputs brutos, sem tocar no solver.
use crate::basket::error_catalog::BasketErrorCode;
use crate::basket::types::{BasketConfig, Reserve, A_PRECISION, WAD};

/// Determina o código de erro para um índice de ativo.
pub fn from_index(index: usize, len: usize) -> Option<BasketErrorCode> {
    if index >= len {
        return Some(BasketErrorCode::IndexOutOfRange);
    }
    None
}

/// Classifica um conjunto de índices/quantidades (mint multi, redeem exato).
pub fn from_multi_inputs(
    indices: &[usize],
    quantities: &[u128],
    len: usize,
) -> Option<BasketErrorCode> {
    if indices.is_empty() || indices.len() != quantities.len() {
        return Some(BasketErrorCode::InvalidArgument);
    }
    if indices.iter().any(|&i| i >= len) {
        return Some(BasketErrorCode::IndexOutOfRange);
    }
    if quantities.iter().all(|&q| q == 0) {
        return Some(BasketErrorCode::InvalidArgument);
    }
    None
}

/// Classifica uma configuração contra uma cesta de `reserves`.
pub fn from_config(reserves: &[Reserve], config: &BasketConfig) -> Option<BasketErrorCode> {
    if reserves.is_empty() || reserves.iter().any(|r| r.ratio == 0) {
        return Some(BasketErrorCode::InvalidConfig);
    }
    if config.limits.min > config.limits.max || config.limits.max > WAD {
        return Some(BasketErrorCode::InvalidConfig);
    }
    if config.recol_fee >= WAD {
        return Some(BasketErrorCode::InvalidConfig);
    }
    match config.a.checked_mul(reserves.len() as u128) {
        Some(n_a) if n_a >= A_PRECISION => None,
        Some(_) => Some(BasketErrorCode::InvalidConfig),
        None => Some(BasketErrorCode::OverflowNumeric),
    }
}
