//! Motor de invariante StableSwap para cestas multi-ativo (mAsset).
//!
//! Todos os cálculos são funções puras sobre um snapshot `(reserves, config)`;
//! ver [`basket::InvariantEngine`] para a fachada instrumentada.

pub mod basket;
pub mod obs;
pub mod telemetry;

pub use basket::U256;
