use std::collections::HashSet;

use basket_engine_core::basket::error::BasketError;
use basket_engine_core::basket::error_catalog::{default_locale_message, BasketErrorCode};

#[test]
fn all_codes_are_unique() {
    let mut seen = HashSet::new();
    for code in BasketErrorCode::all() {
        assert!(seen.insert(code.code()));
    }
    assert_eq!(seen.len(), BasketErrorCode::all().len());
}

#[test]
fn all_messages_nonempty() {
    for code in BasketErrorCode::all() {
        let message = code.message_pt().trim();
        assert!(
            !message.is_empty(),
            "{} message should not be empty",
            code.code()
        );
        assert!(!code.title().trim().is_empty());
    }
}

#[test]
fn exhaustive_all_slice() {
    assert_eq!(BasketErrorCode::all().len(), 8);
}

#[test]
fn recoverable_split() {
    let recoverable: Vec<_> = BasketErrorCode::all()
        .iter()
        .filter(|c| c.is_recoverable())
        .collect();
    assert_eq!(
        recoverable,
        vec![
            &BasketErrorCode::ExceedsWeightLimits,
            &BasketErrorCode::InsufficientLiquidity,
            &BasketErrorCode::InputTooSmall,
        ]
    );
}

#[test]
fn format_examples_resolve_placeholders() {
    let err = BasketError::new(BasketErrorCode::InvalidConfig).with_context("reason", "cesta vazia");
    let user = err.to_user_string();
    assert!(user.contains("BSK-0005"));
    assert!(user.ends_with("configuração inválida: cesta vazia"));
    let json = err.to_log_json();
    assert!(json.contains("\"context\":{\"reason\":\"cesta vazia\"}"));
    assert_eq!(
        default_locale_message(BasketErrorCode::InputTooSmall),
        "quantidade deve ser > 1e6 unidades"
    );
}
