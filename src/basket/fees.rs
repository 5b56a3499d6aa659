//! Taxas e ajuste de recolateralização.
//!
//! A cesta está **subcolateralizada** quando `supply > k0` (o valor das
//! reservas pelo invariante não cobre o passivo). Só nesse estado a
//! `recol_fee` entra:
//! - swap / redeem / redeem exato / redeem proporcional: somada à taxa base
//! - mint / mint multi: descontada do valor mintado
//!
//! Com `recol_fee == 0` tudo aqui é identidade.

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::guardrails::{checked_add, checked_sub, mul_div, u256_to_u128_checked};
use super::types::{BasketConfig, Wad, U256, WAD};

/// Estado de colateralização de um snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collateralisation {
    Under,
    Exact,
    Over,
}

impl Collateralisation {
    pub fn classify(k0: U256, supply: u128) -> Self {
        let supply = U256::from(supply);
        if supply > k0 {
            Self::Under
        } else if supply == k0 {
            Self::Exact
        } else {
            Self::Over
        }
    }
}

#[inline]
pub fn is_undercollateralised(k0: U256, config: &BasketConfig) -> bool {
    Collateralisation::classify(k0, config.supply) == Collateralisation::Under
}

/// Taxa efetiva: `fee_rate (+ recol_fee se subcolateralizada)`; `>= 100%` é inválido.
pub fn effective_fee_rate(fee_rate: Wad, k0: U256, config: &BasketConfig) -> Result<Wad> {
    let rate = if is_undercollateralised(k0, config) {
        checked_add(fee_rate, config.recol_fee)?
    } else {
        fee_rate
    };
    bounded_fee_rate(rate)
}

/// Exige `rate < 100%`.
pub fn bounded_fee_rate(rate: Wad) -> Result<Wad> {
    if rate >= WAD {
        crate::basket_bail!(
            BasketErrorCode::InvalidConfig,
            reason => format!("taxa efetiva {} >= 100%", rate)
        );
    }
    Ok(rate)
}

/// `floor(amount * rate / WAD)`.
#[inline]
pub fn fee_on(amount: u128, rate: Wad) -> Result<u128> {
    if rate == 0 {
        return Ok(0);
    }
    u256_to_u128_checked(mul_div(U256::from(amount), U256::from(rate), U256::from(WAD))?)
}

/// Versão U256 de [`fee_on`] para quantidades normalizadas.
#[inline]
pub fn fee_on_u256(amount: U256, rate: Wad) -> Result<U256> {
    if rate == 0 {
        return Ok(U256::zero());
    }
    mul_div(amount, U256::from(rate), U256::from(WAD))
}

/// Desconto de recol sobre um mint: devolve `(líquido, taxa)`.
pub fn apply_recol_to_mint(minted: u128, k0: U256, config: &BasketConfig) -> Result<(u128, u128)> {
    if config.recol_fee == 0 || !is_undercollateralised(k0, config) {
        return Ok((minted, 0));
    }
    let fee = fee_on(minted, config.recol_fee)?;
    Ok((checked_sub(minted, fee)?, fee))
}

/// Quantidade bruta que, após a taxa `rate`, entrega `net`:
/// `floor(net * WAD / (WAD - rate))`.
pub fn gross_up(net: u128, rate: Wad) -> Result<u128> {
    if rate >= WAD {
        crate::basket_bail!(BasketErrorCode::InvalidConfig, reason => "taxa >= 100%");
    }
    let gross = mul_div(U256::from(net), U256::from(WAD), U256::from(WAD - rate))?;
    u256_to_u128_checked(gross)
}
