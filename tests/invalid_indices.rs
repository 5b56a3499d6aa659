use basket_engine_core::basket::error_catalog::BasketErrorCode;
use basket_engine_core::basket::mint::{compute_mint, compute_mint_multi};
use basket_engine_core::basket::normalize::ratio_for_decimals;
use basket_engine_core::basket::redeem::{compute_redeem, compute_redeem_exact};
use basket_engine_core::basket::swap::compute_swap;
use basket_engine_core::basket::{BasketConfig, Reserve, WeightLimits, WAD};

fn setup() -> (Vec<Reserve>, BasketConfig) {
    let r = (0..3)
        .map(|_| Reserve::new(ratio_for_decimals(18).unwrap(), 10 * WAD))
        .collect();
    let c = BasketConfig::new(10_000, WeightLimits::new(0, WAD), 30 * WAD);
    (r, c)
}

#[test]
fn every_operation_rejects_out_of_range_index() {
    let (r, c) = setup();
    let oor = BasketErrorCode::IndexOutOfRange;
    assert_eq!(compute_mint(&r, 3, WAD, &c).unwrap_err().code, oor);
    assert_eq!(compute_mint_multi(&r, &[0, 3], &[WAD, WAD], &c).unwrap_err().code, oor);
    assert_eq!(compute_swap(&r, 3, 0, WAD, 0, &c).unwrap_err().code, oor);
    assert_eq!(compute_swap(&r, 0, 3, WAD, 0, &c).unwrap_err().code, oor);
    assert_eq!(compute_redeem(&r, usize::MAX, WAD, &c, 0).unwrap_err().code, oor);
    assert_eq!(compute_redeem_exact(&r, &[5], &[WAD], &c, 0).unwrap_err().code, oor);
}

#[test]
fn context_carries_index_and_len() {
    let (r, c) = setup();
    let err = compute_mint_multi(&r, &[1, 7], &[WAD, WAD], &c).unwrap_err();
    assert_eq!(err.context_value("index"), Some("7"));
    assert_eq!(err.context_value("len"), Some("3"));
    assert_eq!(err.to_user_string(), "[BSK-0004] índice 7 fora da cesta de 3 ativos");
}

#[test]
fn malformed_multi_inputs() {
    let (r, c) = setup();
    let bad = BasketErrorCode::InvalidArgument;
    assert_eq!(compute_mint_multi(&r, &[], &[], &c).unwrap_err().code, bad);
    assert_eq!(compute_mint_multi(&r, &[0, 1], &[WAD], &c).unwrap_err().code, bad);
    assert_eq!(compute_mint_multi(&r, &[0, 1], &[0, 0], &c).unwrap_err().code, bad);
    assert_eq!(compute_redeem_exact(&r, &[0], &[], &c, 0).unwrap_err().code, bad);
}

#[test]
fn degenerate_config_is_rejected() {
    let (r, c) = setup();
    let cfg_err = BasketErrorCode::InvalidConfig;
    assert_eq!(compute_mint(&[], 0, WAD, &c).unwrap_err().code, BasketErrorCode::IndexOutOfRange);
    let inverted = BasketConfig::new(10_000, WeightLimits::new(WAD / 2, WAD / 4), 30 * WAD);
    assert_eq!(compute_mint(&r, 0, WAD, &inverted).unwrap_err().code, cfg_err);
    let tiny_a = BasketConfig::new(1, WeightLimits::new(0, WAD), 30 * WAD);
    assert_eq!(compute_mint(&r, 0, WAD, &tiny_a).unwrap_err().code, cfg_err);
    let mut zero_ratio = r.clone();
    zero_ratio[1].ratio = 0;
    assert_eq!(compute_mint(&zero_ratio, 0, WAD, &c).unwrap_err().code, cfg_err);
}
