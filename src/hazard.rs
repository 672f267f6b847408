//! Monthly lifecycle hazards.
//!
//! Both functions return a per-tick probability. One tick is one month.

/// Number of months in a year; a yearly snapshot is emitted every this many ticks.
pub const MONTHS_PER_YEAR: u64 = 12;

/// Max number of years a person is expected to live.
pub const YEARS_A_PERSON_LIVES: u64 = 100;

/// Max number of months a person is expected to live.
pub const MONTHS_A_PERSON_LIVES: u64 = YEARS_A_PERSON_LIVES * MONTHS_PER_YEAR;

const GOMPERTZ_A: f64 = 8.5e-8;
const GOMPERTZ_K: f64 = 0.148;

/// Probability that a person of the given age (in years) dies during one month.
///
/// A Gompertz curve `A * exp(k * age)`, clamped to `[0, 1]` so it can be used directly as a
/// Bernoulli parameter at advanced ages.
pub fn death_probability(age: f64) -> f64 {
    (GOMPERTZ_A * (GOMPERTZ_K * age).exp()).clamp(0.0, 1.0)
}

/// Probability that a living person produces a child during one month. Independent of age.
#[allow(clippy::cast_precision_loss)]
pub fn birth_probability() -> f64 {
    2.0 / MONTHS_A_PERSON_LIVES as f64
}
