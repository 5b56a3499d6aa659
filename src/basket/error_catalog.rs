//! Catálogo imutável de erros do motor da cesta.
use core::fmt;

/// Código de erro do motor.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum BasketErrorCode {
    /// Newton estourou o limite de iterações.
    DidNotConverge,
    /// Composição final fora dos limites de peso.
    ExceedsWeightLimits,
    /// Reservas não cobrem o resgate pedido.
    InsufficientLiquidity,
    /// Índice de ativo fora de `[0, n)`.
    IndexOutOfRange,
    /// Configuração degenerada.
    InvalidConfig,
    /// Entrada abaixo do mínimo de unidades normalizadas.
    InputTooSmall,
    /// Argumentos inconsistentes (tamanhos, índices repetidos, zero).
    InvalidArgument,
    /// Overflow ou underflow em cálculos numéricos.
    OverflowNumeric,
}

impl BasketErrorCode {
    /// Código textual estável do erro.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DidNotConverge => "BSK-0001",
            Self::ExceedsWeightLimits => "BSK-0002",
            Self::InsufficientLiquidity => "BSK-0003",
            Self::IndexOutOfRange => "BSK-0004",
            Self::InvalidConfig => "BSK-0005",
            Self::InputTooSmall => "BSK-0006",
            Self::InvalidArgument => "BSK-0007",
            Self::OverflowNumeric => "BSK-0008",
        }
    }

    /// Título curto em português.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::DidNotConverge => "Invariante não convergiu",
            Self::ExceedsWeightLimits => "Limite de peso excedido",
            Self::InsufficientLiquidity => "Liquidez insuficiente",
            Self::IndexOutOfRange => "Índice inválido",
            Self::InvalidConfig => "Configuração inválida",
            Self::InputTooSmall => "Entrada muito pequena",
            Self::InvalidArgument => "Argumento inválido",
            Self::OverflowNumeric => "Overflow numérico",
        }
    }

    /// Mensagem base em português.
    pub const fn message_pt(&self) -> &'static str {
        match self {
            Self::DidNotConverge => "invariante não convergiu em {iterations} iterações",
            Self::ExceedsWeightLimits => "peso do ativo {asset} ficaria fora dos limites",
            Self::InsufficientLiquidity => "liquidez insuficiente no ativo {asset}",
            Self::IndexOutOfRange => "índice {index} fora da cesta de {len} ativos",
            Self::InvalidConfig => "configuração inválida: {reason}",
            Self::InputTooSmall => "quantidade deve ser > 1e6 unidades",
            Self::InvalidArgument => "argumento inválido: {reason}",
            Self::OverflowNumeric => "overflow/underflow numérico",
        }
    }

    /// `true` quando o chamador pode tentar de novo com outros parâmetros.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ExceedsWeightLimits | Self::InsufficientLiquidity | Self::InputTooSmall
        )
    }

    /// Retorna todas as variantes em ordem estável.
    pub fn all() -> &'static [BasketErrorCode] {
        const ALL: &[BasketErrorCode] = &[
            BasketErrorCode::DidNotConverge,
            BasketErrorCode::ExceedsWeightLimits,
            BasketErrorCode::InsufficientLiquidity,
            BasketErrorCode::IndexOutOfRange,
            BasketErrorCode::InvalidConfig,
            BasketErrorCode::InputTooSmall,
            BasketErrorCode::InvalidArgument,
            BasketErrorCode::OverflowNumeric,
        ];
        ALL
    }
}

impl fmt::Display for BasketErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Mensagem padrão na localidade ativa (pt-BR).
pub fn default_locale_message(code: BasketErrorCode) -> &'static str {
    code.message_pt()
}
