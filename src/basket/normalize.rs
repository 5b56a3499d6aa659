//! Normalização de precisão: saldos brutos (decimais heterogêneos) ⇄ unidade
//! comum de 18 decimais.
//!
//! Política de arredondamento: **floor** nas duas direções. O que a cesta
//! deve ao usuário arredonda para baixo; nunca se fabrica valor.

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::guardrails::{add_u256, ensure_index, mul_div, sub_u256, u256_to_u128_checked};
use super::types::{Reserve, U256, RATIO_SCALE, TARGET_DECIMALS};

/// `ratio` para um ativo com `decimals` casas: `1e8 * 10^(18 - decimals)`.
pub fn ratio_for_decimals(decimals: u32) -> Result<u128> {
    if decimals > TARGET_DECIMALS {
        crate::basket_bail!(
            BasketErrorCode::InvalidConfig,
            reason => format!("{} decimais > {}", decimals, TARGET_DECIMALS)
        );
    }
    Ok(RATIO_SCALE * 10u128.pow(TARGET_DECIMALS - decimals))
}

/// Bruto → normalizado: `floor(raw * ratio / 1e8)`.
#[inline]
pub fn to_normalized(raw: u128, ratio: u128) -> Result<U256> {
    mul_div(U256::from(raw), U256::from(ratio), U256::from(RATIO_SCALE))
}

/// Normalizado → bruto: `floor(normalized * 1e8 / ratio)`.
#[inline]
pub fn to_native(normalized: U256, ratio: u128) -> Result<u128> {
    if ratio == 0 {
        crate::basket_bail!(BasketErrorCode::InvalidConfig, reason => "ratio zero");
    }
    let raw = mul_div(normalized, U256::from(RATIO_SCALE), U256::from(ratio))?;
    u256_to_u128_checked(raw)
}

/// Saldos normalizados `x` e sua soma, derivados de um snapshot de reservas.
///
/// É uma cópia local: mutar aqui nunca toca o estado do chamador.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedBasket {
    pub x: Vec<U256>,
    pub sum: U256,
}

impl NormalizedBasket {
    pub fn from_reserves(reserves: &[Reserve]) -> Result<Self> {
        let mut x = Vec::with_capacity(reserves.len());
        let mut sum = U256::zero();
        for reserve in reserves {
            let xi = to_normalized(reserve.vault_balance, reserve.ratio)?;
            sum = add_u256(sum, xi)?;
            x.push(xi);
        }
        Ok(Self { x, sum })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Credita `amount` normalizado no ativo `index`.
    pub fn credit(&mut self, index: usize, amount: U256) -> Result<()> {
        ensure_index(index, self.x.len())?;
        self.x[index] = add_u256(self.x[index], amount)?;
        self.sum = add_u256(self.sum, amount)?;
        Ok(())
    }

    /// Debita `amount` normalizado do ativo `index`; faltar saldo é
    /// `InsufficientLiquidity`, não overflow.
    pub fn debit(&mut self, index: usize, amount: U256) -> Result<()> {
        ensure_index(index, self.x.len())?;
        if amount > self.x[index] {
            crate::basket_bail!(
                BasketErrorCode::InsufficientLiquidity,
                asset => index,
                requested => amount,
                available => self.x[index]
            );
        }
        self.x[index] = self.x[index] - amount;
        self.sum = sub_u256(self.sum, amount)?;
        Ok(())
    }
}
