//! Swap par-a-par a invariante constante.
//! Política de arredondamento:
//! - entrada normalizada: floor
//! - reserva resolvida: +1 (a favor da cesta)
//! - taxa sobre a saída bruta: floor
//! - saída nativa: floor

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::fees::{effective_fee_rate, fee_on_u256};
use super::guardrails::{ensure_index, ensure_nonzero, sub_u256, u256_to_u128_checked};
use super::invariant::{open_snapshot, solve_for_reserve};
use super::normalize::{to_native, to_normalized};
use super::types::{BasketConfig, OperationResult, Reserve, Wad, U256, MIN_SCALED_AMOUNT};
use super::weights::ensure_in_bounds;

/// Troca `raw_input` do ativo `input_index` por `output_index`.
///
/// `quantity` sai em decimais nativos do ativo de saída; `fee` é reportada em
/// unidades normalizadas (mAsset) e permanece na cesta.
pub fn compute_swap(
    reserves: &[Reserve],
    input_index: usize,
    output_index: usize,
    raw_input: u128,
    fee_rate: Wad,
    config: &BasketConfig,
) -> Result<OperationResult> {
    ensure_index(input_index, reserves.len())?;
    ensure_index(output_index, reserves.len())?;
    if input_index == output_index {
        crate::basket_bail!(
            BasketErrorCode::InvalidArgument,
            reason => format!("swap do ativo {} para ele mesmo", input_index)
        );
    }
    ensure_nonzero(raw_input)?;
    let (mut basket, k0) = open_snapshot(reserves, config)?;
    let rate = effective_fee_rate(fee_rate, k0, config)?;

    // 1. entrada
    let scaled = to_normalized(raw_input, reserves[input_index].ratio)?;
    if scaled <= U256::from(MIN_SCALED_AMOUNT) {
        crate::basket_bail!(BasketErrorCode::InputTooSmall, scaled => scaled);
    }
    basket.credit(input_index, scaled)?;

    // 2. nova reserva de saída mantendo k0
    let new_reserve = solve_for_reserve(&basket.x, config.a, output_index, k0)?;
    let old_reserve = basket.x[output_index];
    if new_reserve > old_reserve {
        crate::basket_bail!(
            BasketErrorCode::InsufficientLiquidity,
            asset => output_index,
            solved => new_reserve,
            available => old_reserve
        );
    }
    let raw_output = old_reserve - new_reserve;

    // 3. taxa sobre a saída
    let fee = fee_on_u256(raw_output, rate)?;
    let net_output = sub_u256(raw_output, fee)?;
    let quantity = to_native(net_output, reserves[output_index].ratio)?;

    // 4. limites de peso (a taxa fica na cesta)
    basket.debit(output_index, net_output)?;
    ensure_in_bounds(&basket.x, basket.sum, &config.limits)?;

    Ok(OperationResult::new(quantity, u256_to_u128_checked(fee)?))
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::invariant::compute_invariant;
    use crate::basket::normalize::{ratio_for_decimals, NormalizedBasket};
    use crate::basket::types::{WeightLimits, WAD};

    fn basket18(units: &[u128]) -> Vec<Reserve> {
        units.iter().map(|u| Reserve::new(ratio_for_decimals(18).unwrap(), u * WAD)).collect()
    }

    fn cfg() -> BasketConfig {
        BasketConfig::new(10_000, WeightLimits::new(5 * WAD / 100, 55 * WAD / 100), 40 * WAD)
    }

    #[test]
    fn t_swap_close_to_par_without_fee() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let r = compute_swap(&reserves, 0, 1, WAD, 0, &cfg()).unwrap();
        assert_eq!(r.fee, 0);
        assert!(r.quantity < WAD);
        assert!(r.quantity > 99 * WAD / 100);
    }

    #[test]
    fn t_swap_never_decreases_invariant() {
        let reserves = basket18(&[10, 11, 9, 10]);
        let r = compute_swap(&reserves, 2, 1, 2 * WAD, 0, &cfg()).unwrap();
        let before = NormalizedBasket::from_reserves(&reserves).unwrap();
        let k0 = compute_invariant(&before.x, before.sum, 10_000).unwrap();

        let mut after = reserves.clone();
        after[2].vault_balance += 2 * WAD;
        after[1].vault_balance -= r.quantity;
        let b = NormalizedBasket::from_reserves(&after).unwrap();
        let k1 = compute_invariant(&b.x, b.sum, 10_000).unwrap();
        // tolera 1 unidade de arredondamento do próprio solver
        assert!(k1 + U256::one() >= k0, "k1={} < k0={}", k1, k0);
    }

    #[test]
    fn t_swap_fee_on_output() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let no_fee = compute_swap(&reserves, 0, 1, WAD, 0, &cfg()).unwrap();
        let fee_rate = WAD / 1000; // 0.1%
        let with_fee = compute_swap(&reserves, 0, 1, WAD, fee_rate, &cfg()).unwrap();
        assert_eq!(with_fee.fee, no_fee.quantity / 1000);
        assert_eq!(with_fee.quantity, no_fee.quantity - with_fee.fee);
    }

    #[test]
    fn t_swap_same_index_rejected() {
        let reserves = basket18(&[10, 10, 10, 10]);
        let err = compute_swap(&reserves, 1, 1, WAD, 0, &cfg()).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::InvalidArgument);
    }

    #[test]
    fn t_swap_invalid_indices() {
        let reserves = basket18(&[10, 10, 10, 10]);
        assert_eq!(
            compute_swap(&reserves, 4, 1, WAD, 0, &cfg()).unwrap_err().code,
            BasketErrorCode::IndexOutOfRange
        );
        assert_eq!(
            compute_swap(&reserves, 0, 9, WAD, 0, &cfg()).unwrap_err().code,
            BasketErrorCode::IndexOutOfRange
        );
    }

    #[test]
    fn t_swap_over_weight_limit() {
        // entrada empurra o ativo 0 acima de 55%
        let reserves = basket18(&[10, 10, 10, 10]);
        let err = compute_swap(&reserves, 0, 1, 30 * WAD, 0, &cfg()).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::ExceedsWeightLimits);
    }

    #[test]
    fn t_swap_output_below_min_weight() {
        // saída drena o ativo 1 para baixo de 5%
        let reserves = basket18(&[15, 3, 15, 15]);
        let err = compute_swap(&reserves, 0, 1, WAD, 0, &cfg()).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::ExceedsWeightLimits);
    }
}
