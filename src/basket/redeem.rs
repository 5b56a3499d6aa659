//! Resgates: mAsset → um bAsset, mAsset → saídas exatas, e proporcional.
//! Políticas (sempre contra quem resgata):
//! - `k_final` do resgate simples: floor + 1
//! - saída bruta: floor
//! - mAsset a queimar no resgate exato: floor + 1

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::fees::{bounded_fee_rate, effective_fee_rate, fee_on, gross_up};
use super::guardrails::{
    add_u256, checked_add, checked_sub, ensure_index, ensure_multi_inputs, ensure_nonzero, mul_div,
    sub_u256, u256_to_u128_checked, validate_config,
};
use super::invariant::{compute_invariant, open_snapshot, solve_for_reserve};
use super::normalize::{to_native, to_normalized};
use super::types::{
    BasketConfig, OperationResult, ProportionalRedemption, Reserve, Wad, U256, MIN_SCALED_AMOUNT,
};
use super::weights::ensure_in_bounds;

fn ensure_redeemable(quantity: u128, config: &BasketConfig) -> Result<()> {
    ensure_nonzero(quantity)?;
    if config.supply == 0 {
        crate::basket_bail!(BasketErrorCode::InvalidConfig, reason => "supply zero");
    }
    if quantity > config.supply {
        crate::basket_bail!(
            BasketErrorCode::InsufficientLiquidity,
            requested => quantity,
            supply => config.supply
        );
    }
    Ok(())
}

/// Resgata `masset_quantity` (bruto, com taxa) em um único bAsset `index`.
///
/// `quantity` sai em decimais nativos; `fee` em mAsset.
pub fn compute_redeem(
    reserves: &[Reserve],
    index: usize,
    masset_quantity: u128,
    config: &BasketConfig,
    fee_rate: Wad,
) -> Result<OperationResult> {
    ensure_index(index, reserves.len())?;
    ensure_redeemable(masset_quantity, config)?;
    let (mut basket, k0) = open_snapshot(reserves, config)?;
    let rate = effective_fee_rate(fee_rate, k0, config)?;

    let fee = fee_on(masset_quantity, rate)?;
    let redemption = checked_sub(masset_quantity, fee)?;
    let remaining = checked_sub(config.supply, redemption)?;

    // k_final = k0 * (supply - redemption) / supply + 1
    let k_final = add_u256(
        mul_div(k0, U256::from(remaining), U256::from(config.supply))?,
        U256::one(),
    )?;

    let new_reserve = solve_for_reserve(&basket.x, config.a, index, k_final)?;
    let old_reserve = basket.x[index];
    if new_reserve > old_reserve {
        crate::basket_bail!(
            BasketErrorCode::InsufficientLiquidity,
            asset => index,
            solved => new_reserve,
            available => old_reserve
        );
    }
    let output = old_reserve - new_reserve;
    let quantity = to_native(output, reserves[index].ratio)?;

    basket.debit(index, output)?;
    ensure_in_bounds(&basket.x, basket.sum, &config.limits)?;

    Ok(OperationResult::new(quantity, fee))
}

/// Quanto mAsset precisa ser queimado para retirar exatamente `raw_outputs`
/// dos ativos `indices`. A ordem dos índices não altera o resultado.
///
/// `quantity` é o total a queimar (com taxa); `fee` a parte da taxa.
pub fn compute_redeem_exact(
    reserves: &[Reserve],
    indices: &[usize],
    raw_outputs: &[u128],
    config: &BasketConfig,
    fee_rate: Wad,
) -> Result<OperationResult> {
    ensure_multi_inputs(indices, raw_outputs, reserves.len())?;
    if config.supply == 0 {
        crate::basket_bail!(BasketErrorCode::InvalidConfig, reason => "supply zero");
    }
    let (mut basket, k0) = open_snapshot(reserves, config)?;
    let rate = effective_fee_rate(fee_rate, k0, config)?;

    for (&index, &raw) in indices.iter().zip(raw_outputs) {
        let scaled = to_normalized(raw, reserves[index].ratio)?;
        basket.debit(index, scaled)?;
    }
    ensure_in_bounds(&basket.x, basket.sum, &config.limits)?;

    let k1 = compute_invariant(&basket.x, basket.sum, config.a)?;
    let drop = if k1 >= k0 { U256::zero() } else { sub_u256(k0, k1)? };
    let redeemed = u256_to_u128_checked(mul_div(U256::from(config.supply), drop, k0)?)?;
    if redeemed <= MIN_SCALED_AMOUNT {
        crate::basket_bail!(BasketErrorCode::InputTooSmall, redeemed => redeemed);
    }

    let gross = gross_up(redeemed, rate)?;
    let fee = checked_sub(gross, redeemed)?;
    let burn = checked_add(gross, 1)?;
    if burn > config.supply {
        crate::basket_bail!(
            BasketErrorCode::InsufficientLiquidity,
            requested => burn,
            supply => config.supply
        );
    }
    Ok(OperationResult::new(burn, fee))
}

/// Resgate proporcional: cada reserva cede a mesma fração
/// `(quantidade - taxa) / supply`. Não passa pelos limites de peso (a
/// composição não muda) e só consulta o invariante para decidir a
/// `recol_fee`; sem ela, reservas zeradas são aceitas.
pub fn compute_redeem_proportionately(
    reserves: &[Reserve],
    masset_quantity: u128,
    config: &BasketConfig,
    fee_rate: Wad,
) -> Result<ProportionalRedemption> {
    ensure_redeemable(masset_quantity, config)?;
    let rate = if config.recol_fee == 0 {
        validate_config(reserves, config)?;
        bounded_fee_rate(fee_rate)?
    } else {
        let (_, k0) = open_snapshot(reserves, config)?;
        effective_fee_rate(fee_rate, k0, config)?
    };

    let fee = fee_on(masset_quantity, rate)?;
    let redemption = checked_sub(masset_quantity, fee)?;

    let outputs = reserves
        .iter()
        .map(|reserve| {
            u256_to_u128_checked(mul_div(
                U256::from(reserve.vault_balance),
                U256::from(redemption),
                U256::from(config.supply),
            )?)
        })
        .collect::<Result<Vec<u128>>>()?;

    Ok(ProportionalRedemption { outputs, fee })
}

/// Valor normalizado total de um resgate proporcional (soma das saídas na
/// unidade comum). Útil para conciliar com a fração pedida.
pub fn proportional_value(reserves: &[Reserve], redemption: &ProportionalRedemption) -> Result<U256> {
    if reserves.len() != redemption.outputs.len() {
        crate::basket_bail!(BasketErrorCode::InvalidArgument, reason => "tamanhos diferentes");
    }
    reserves
        .iter()
        .zip(&redemption.outputs)
        .try_fold(U256::zero(), |acc, (reserve, out)| {
            add_u256(acc, to_normalized(*out, reserve.ratio)?)
        })
}
