//! Tipos básicos da cesta (escala fixa) + U256 para intermediários.
//!
//! Convenções:
//! - quantidades brutas (decimais nativos do ativo), supply e taxas: `u128`
//! - saldos normalizados, invariante e produtos intermediários: `U256`

use uint::construct_uint;
construct_uint! {
    /// Inteiro de 256 bits para contas intermediárias seguras.
    pub struct U256(4);
}

pub type Wad = u128; // escala 1e18

pub const WAD: Wad = 1_000_000_000_000_000_000u128; // 1e18
/// Base do `ratio` de cada ativo: `normalizado = bruto * ratio / RATIO_SCALE`.
pub const RATIO_SCALE: u128 = 100_000_000; // 1e8
/// Precisão do coeficiente de amplificação (`a = 10_000` ⇒ A = 100).
pub const A_PRECISION: u128 = 100;
/// Limite de iterações de Newton (invariante e reserva).
pub const MAX_ITERATIONS: usize = 256;
/// Entradas (e valores resgatados exatos) precisam ser > 1e6 unidades normalizadas.
pub const MIN_SCALED_AMOUNT: u128 = 1_000_000;
/// Reserva resolvida abaixo disto não é uma solução válida.
pub const MIN_SOLVED_RESERVE: u128 = 100_000_000;
/// Decimais da unidade "matemática" comum.
pub const TARGET_DECIMALS: u32 = 18;

/// Uma reserva da cesta (um bAsset).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reserve {
    /// Fator de escala imutável para a unidade comum de 18 decimais.
    pub ratio: u128,
    /// Saldo bruto custodiado, em decimais nativos.
    pub vault_balance: u128,
}

impl Reserve {
    pub fn new(ratio: u128, vault_balance: u128) -> Self {
        Self { ratio, vault_balance }
    }
}

/// Limites de peso (1e18 = 100%).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightLimits {
    pub min: Wad,
    pub max: Wad,
}

impl WeightLimits {
    pub fn new(min: Wad, max: Wad) -> Self {
        Self { min, max }
    }
}

/// Snapshot da configuração passado em cada cálculo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BasketConfig {
    /// Coeficiente de amplificação escalado por [`A_PRECISION`].
    pub a: u128,
    pub limits: WeightLimits,
    /// Supply corrente do token de passivo (mAsset).
    pub supply: u128,
    /// Taxa extra (WAD) cobrada enquanto a cesta estiver subcolateralizada.
    pub recol_fee: Wad,
}

impl BasketConfig {
    pub fn new(a: u128, limits: WeightLimits, supply: u128) -> Self {
        Self { a, limits, supply, recol_fee: 0 }
    }

    pub fn with_recol_fee(mut self, recol_fee: Wad) -> Self {
        self.recol_fee = recol_fee;
        self
    }

    pub fn with_supply(mut self, supply: u128) -> Self {
        self.supply = supply;
        self
    }
}

/// Resultado de um cálculo: quantidade entregue + taxa aplicada.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperationResult {
    pub quantity: u128,
    pub fee: u128,
}

impl OperationResult {
    pub fn new(quantity: u128, fee: u128) -> Self {
        Self { quantity, fee }
    }
}

/// Resultado do resgate proporcional: uma saída bruta por ativo.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProportionalRedemption {
    pub outputs: Vec<u128>,
    pub fee: u128,
}
