//! Residents and the founder.
//!
//! A [`Person`] is a mortal resident who works, rents and accumulates shares. The [`Founder`] is
//! the single immortal agent that finances housing and absorbs unclaimed shares.

use std::fmt::{self, Display, Formatter};

use rand_distr::Normal;

use crate::hazard::{birth_probability, death_probability, MONTHS_PER_YEAR};
use crate::parameters::IncomeModel;
use crate::random::SimRng;

/// People older than this no longer earn a full wage.
pub const RETIREMENT_AGE: f64 = 60.0;

#[allow(clippy::cast_precision_loss)]
const ONE_MONTH: f64 = 1.0 / MONTHS_PER_YEAR as f64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonId(pub usize);

impl Display for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Person {
    pub label: String,
    /// Age in years.
    pub age: f64,
    pub balance: f64,
    pub parent: Option<PersonId>,

    // Reset after every yearly snapshot.
    pub period_share_income: f64,
    pub period_work_income: f64,

    pub shares_inherited: u64,
    pub money_inherited: f64,
    pub times_moved: u32,
}

impl Person {
    pub fn new(label: impl Into<String>, age: f64, balance: f64, parent: Option<PersonId>) -> Person {
        Person {
            label: label.into(),
            age,
            balance,
            parent,
            period_share_income: 0.0,
            period_work_income: 0.0,
            shares_inherited: 0,
            money_inherited: 0.0,
            times_moved: 0,
        }
    }

    /// A newcomer with age drawn from `[14, 20)` and balance from `[10, 100)`.
    pub fn new_random(label: impl Into<String>, parent: Option<PersonId>, rng: &mut SimRng) -> Person {
        let age = rng.sample_range(14.0..20.0);
        let balance = rng.sample_range(10.0..100.0);
        Person::new(label, age, balance, parent)
    }

    pub fn is_retired(&self) -> bool {
        self.age > RETIREMENT_AGE
    }

    pub fn produces_child_this_month(&self, rng: &mut SimRng) -> bool {
        rng.sample_bool(birth_probability())
    }

    pub fn dies_this_month(&self, rng: &mut SimRng) -> bool {
        rng.sample_bool(death_probability(self.age))
    }

    pub fn age_one_month(&mut self) {
        self.age += ONE_MONTH;
    }

    /// Earns one month of income and returns the amount.
    pub fn work(&mut self, rng: &mut SimRng, income_model: &IncomeModel) -> f64 {
        let income = match *income_model {
            IncomeModel::FixedRanges => {
                let income: u32 = if self.is_retired() {
                    rng.sample_range(3..=6)
                } else {
                    rng.sample_range(8..=12)
                };
                f64::from(income)
            }
            IncomeModel::Normal {
                mean,
                sigma,
                retirement_factor,
            } => {
                let salary = match Normal::new(mean, sigma) {
                    Ok(distribution) => rng.sample_distr(distribution),
                    // Only reachable with a non-finite sigma, which validation rejects.
                    Err(_) => mean,
                };
                if self.is_retired() {
                    salary * retirement_factor
                } else {
                    salary
                }
            }
        };
        self.balance += income;
        self.period_work_income += income;
        income
    }

    pub fn reset_period_income(&mut self) {
        self.period_share_income = 0.0;
        self.period_work_income = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Founder {
    pub label: String,
    pub age: f64,
    pub balance: f64,
    pub period_share_income: f64,
    /// Shares returned to the founder by residents who died without an heir.
    pub shares_inherited: u64,
    pub spent_building_houses: f64,
}

impl Founder {
    pub fn new(label: impl Into<String>, balance: f64) -> Founder {
        Founder {
            label: label.into(),
            age: 0.0,
            balance,
            period_share_income: 0.0,
            shares_inherited: 0,
            spent_building_houses: 0.0,
        }
    }

    pub fn age_one_month(&mut self) {
        self.age += ONE_MONTH;
    }

    /// Debits the cost of a new house.
    pub fn pay_for_construction(&mut self, cost: f64) {
        self.balance -= cost;
        self.spent_building_houses += cost;
    }
}

impl Default for Founder {
    fn default() -> Self {
        Founder::new("Founder", 0.0)
    }
}
