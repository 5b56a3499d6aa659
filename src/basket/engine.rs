//! Fachada de consulta sobre um snapshot emprestado `(reserves, config)`.
//!
//! Cada `preview_*` roda dentro de um span `op`, é cronometrado por
//! [`obs::wrap::time`](crate::obs::wrap::time) e, em caso de falha, registra o
//! código e o contexto JSON em `warn`. Nada aqui muta estado: o chamador
//! aplica o resultado às suas reservas.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, warn};

use super::error::Result;
use super::invariant::open_snapshot;
use super::mint::{compute_mint, compute_mint_multi};
use super::pricing::compute_price;
use super::redeem::{compute_redeem, compute_redeem_exact, compute_redeem_proportionately};
use super::swap::compute_swap;
use super::types::{BasketConfig, OperationResult, ProportionalRedemption, Reserve, Wad, U256};
use crate::obs::wrap;
use crate::telemetry::make_info_span;

static OP_SEQ: AtomicU32 = AtomicU32::new(0);

#[derive(Clone, Copy, Debug)]
pub struct InvariantEngine<'a> {
    reserves: &'a [Reserve],
    config: &'a BasketConfig,
}

impl<'a> InvariantEngine<'a> {
    pub fn new(reserves: &'a [Reserve], config: &'a BasketConfig) -> Self {
        Self { reserves, config }
    }

    pub fn reserves(&self) -> &'a [Reserve] {
        self.reserves
    }

    pub fn config(&self) -> &'a BasketConfig {
        self.config
    }

    fn observe<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let op_id = OP_SEQ.fetch_add(1, Ordering::Relaxed);
        let span = make_info_span(op, op_id, "engine");
        let _guard = span.enter();
        let out = wrap::time(op, f);
        match &out {
            Ok(_) => debug!(op, assets = self.reserves.len(), "preview ok"),
            Err(err) => warn!(
                op,
                code = err.code.code(),
                asset = ?err.asset_index(),
                recoverable = err.is_recoverable(),
                context = %err.to_log_json(),
                "preview failed"
            ),
        }
        out
    }

    /// Invariante corrente `k0`.
    pub fn invariant(&self) -> Result<U256> {
        self.observe("invariant", || Ok(open_snapshot(self.reserves, self.config)?.1))
    }

    pub fn preview_mint(&self, index: usize, raw_input: u128) -> Result<OperationResult> {
        self.observe("mint", || compute_mint(self.reserves, index, raw_input, self.config))
    }

    pub fn preview_mint_multi(&self, indices: &[usize], raw_inputs: &[u128]) -> Result<OperationResult> {
        self.observe("mint_multi", || {
            compute_mint_multi(self.reserves, indices, raw_inputs, self.config)
        })
    }

    pub fn preview_swap(
        &self,
        input_index: usize,
        output_index: usize,
        raw_input: u128,
        fee_rate: Wad,
    ) -> Result<OperationResult> {
        self.observe("swap", || {
            compute_swap(self.reserves, input_index, output_index, raw_input, fee_rate, self.config)
        })
    }

    pub fn preview_redeem(&self, index: usize, masset_quantity: u128, fee_rate: Wad) -> Result<OperationResult> {
        self.observe("redeem", || {
            compute_redeem(self.reserves, index, masset_quantity, self.config, fee_rate)
        })
    }

    pub fn preview_redeem_exact(
        &self,
        indices: &[usize],
        raw_outputs: &[u128],
        fee_rate: Wad,
    ) -> Result<OperationResult> {
        self.observe("redeem_exact", || {
            compute_redeem_exact(self.reserves, indices, raw_outputs, self.config, fee_rate)
        })
    }

    pub fn preview_redeem_proportionately(
        &self,
        masset_quantity: u128,
        fee_rate: Wad,
    ) -> Result<ProportionalRedemption> {
        self.observe("redeem_proportionately", || {
            compute_redeem_proportionately(self.reserves, masset_quantity, self.config, fee_rate)
        })
    }

    /// `(preço do mAsset em WAD, k)`.
    pub fn price(&self) -> Result<(Wad, U256)> {
        self.observe("price", || compute_price(self.reserves, self.config))
    }
}
