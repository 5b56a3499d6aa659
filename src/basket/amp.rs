//! Rampa linear do coeficiente de amplificação.
//!
//! Durante uma mudança de `A` o chamador interpola o valor corrente e o
//! coloca em [`BasketConfig::a`](super::types::BasketConfig) antes de cada
//! cálculo. Timestamps são opacos (segundos, blocos...), só importa a ordem.

use super::error::Result;
use super::error_catalog::BasketErrorCode;
use super::guardrails::{mul_div, u256_to_u128_checked};
use super::types::U256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmpRamp {
    pub initial_a: u128,
    pub target_a: u128,
    pub ramp_start: u64,
    pub ramp_end: u64,
}

impl AmpRamp {
    pub fn new(initial_a: u128, target_a: u128, ramp_start: u64, ramp_end: u64) -> Result<Self> {
        if ramp_end < ramp_start {
            crate::basket_bail!(
                BasketErrorCode::InvalidConfig,
                reason => "ramp_end < ramp_start",
                ramp_start => ramp_start,
                ramp_end => ramp_end
            );
        }
        Ok(Self { initial_a, target_a, ramp_start, ramp_end })
    }

    /// `A` fixo, sem rampa.
    pub fn constant(a: u128) -> Self {
        Self { initial_a: a, target_a: a, ramp_start: 0, ramp_end: 0 }
    }

    pub fn is_ramping(&self, now: u64) -> bool {
        now > self.ramp_start && now < self.ramp_end
    }

    /// Valor de `a` em `now` (floor na interpolação).
    pub fn a_at(&self, now: u64) -> Result<u128> {
        if now >= self.ramp_end {
            return Ok(self.target_a);
        }
        if now <= self.ramp_start {
            return Ok(self.initial_a);
        }
        let elapsed = U256::from(now - self.ramp_start);
        let duration = U256::from(self.ramp_end - self.ramp_start);
        if self.target_a >= self.initial_a {
            let delta = mul_div(U256::from(self.target_a - self.initial_a), elapsed, duration)?;
            Ok(self.initial_a + u256_to_u128_checked(delta)?)
        } else {
            let delta = mul_div(U256::from(self.initial_a - self.target_a), elapsed, duration)?;
            Ok(self.initial_a - u256_to_u128_checked(delta)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_ramp_up_and_down() {
        let up = AmpRamp::new(10_000, 20_000, 100, 200).unwrap();
        assert_eq!(up.a_at(50).unwrap(), 10_000);
        assert_eq!(up.a_at(150).unwrap(), 15_000);
        assert_eq!(up.a_at(200).unwrap(), 20_000);
        assert_eq!(up.a_at(10_000).unwrap(), 20_000);

        let down = AmpRamp::new(20_000, 10_000, 100, 200).unwrap();
        assert_eq!(down.a_at(125).unwrap(), 17_500);
        assert!(down.is_ramping(125));
        assert!(!down.is_ramping(200));
    }

    #[test]
    fn t_ramp_inverted_window_rejected() {
        let err = AmpRamp::new(1, 2, 10, 5).unwrap_err();
        assert_eq!(err.code, BasketErrorCode::InvalidConfig);
    }

    #[test]
    fn t_constant_ramp() {
        let r = AmpRamp::constant(5_000);
        assert_eq!(r.a_at(0).unwrap(), 5_000);
        assert_eq!(r.a_at(u64::MAX).unwrap(), 5_000);
    }
}
