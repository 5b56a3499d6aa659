use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;

use basket_engine_core::basket::invariant::open_snapshot;
use basket_engine_core::basket::normalize::ratio_for_decimals;
use basket_engine_core::basket::redeem::proportional_value;
use basket_engine_core::basket::{BasketConfig, InvariantEngine, Reserve, WeightLimits, WAD};
use basket_engine_core::telemetry;

fn main() -> Result<()> {
    let tel = telemetry::init("basket-engine-core")?;

    // cesta de 4 stablecoins com decimais diferentes, 1M unidades cada
    let decimals = [6u32, 18, 6, 18];
    let reserves = decimals
        .iter()
        .map(|&d| {
            let ratio = ratio_for_decimals(d)?;
            Ok(Reserve::new(ratio, 1_000_000 * 10u128.pow(d)))
        })
        .collect::<Result<Vec<_>>>()?;
    let config = BasketConfig::new(
        30_000,
        WeightLimits::new(5 * WAD / 100, 55 * WAD / 100),
        4_000_000 * WAD,
    );
    let engine = InvariantEngine::new(&reserves, &config);
    let (_, k0) = open_snapshot(&reserves, &config).context("snapshot inicial")?;

    let t0 = Instant::now();
    let minted = engine.preview_mint(0, 1_000 * 10u128.pow(6))?;
    tel.record_op("mint", t0.elapsed().as_secs_f64() * 1000.0, 0.0);
    info!(quantity = minted.quantity, fee = minted.fee, "mint 1000 USDC-like");

    let t0 = Instant::now();
    let swapped = engine.preview_swap(1, 2, 5_000 * WAD, 3 * WAD / 10_000)?;
    let mut after = reserves.clone();
    after[1].vault_balance += 5_000 * WAD;
    after[2].vault_balance -= swapped.quantity;
    let (_, k1) = open_snapshot(&after, &config).context("snapshot pós-swap")?;
    tel.record_op(
        "swap",
        t0.elapsed().as_secs_f64() * 1000.0,
        telemetry::relative_drift(k0, k1),
    );
    info!(quantity = swapped.quantity, fee = swapped.fee, "swap 5000 → ativo 2");

    let t0 = Instant::now();
    let redeemed = engine.preview_redeem_proportionately(10_000 * WAD, 0)?;
    tel.record_op("redeem_proportionately", t0.elapsed().as_secs_f64() * 1000.0, 0.0);
    let value = proportional_value(&reserves, &redeemed)?;
    info!(outputs = ?redeemed.outputs, value = %value, "resgate proporcional de 10k mAsset");

    let (price, k) = engine.price()?;
    info!(price, k = %k, "preço do mAsset");

    tel.shutdown()?;
    Ok(())
}
