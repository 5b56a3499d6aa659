pub mod types;
pub mod guardrails;
pub mod normalize;
pub mod invariant;
pub mod weights;
pub mod fees;
pub mod mint;
pub mod swap;
pub mod redeem;
pub mod pricing;
pub mod amp;
pub mod engine;
pub mod ref_golden; // oráculo BigInt para testes e goldens

// erros unificados
pub mod error_catalog;
pub mod error;
pub mod error_map;

pub use engine::InvariantEngine;
pub use error::{BasketError, Result};
pub use error_catalog::BasketErrorCode;
pub use types::{BasketConfig, OperationResult, ProportionalRedemption, Reserve, Wad, WeightLimits, U256, WAD};
