//! The configuration surface consumed by the engine.
//!
//! Parameters are plain data: they are loaded once (usually from a JSON file through the runner),
//! validated, and then read by the [`Community`](crate::community::Community) for the rest of the
//! run. Every field has a default, so a config file only needs to name what it changes:
//!
//! ```json
//! {
//!     "number_of_months_to_run": 1200,
//!     "allow_inheritance": true,
//!     "ruleset": "normal_rent",
//!     "income_model": { "normal": { "mean": 120.0, "sigma": 10.0, "retirement_factor": 0.5 } }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::hazard::{MONTHS_A_PERSON_LIVES, MONTHS_PER_YEAR};

/// The economic model applied at settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
    /// Every rent payment mints shares of the house for the tenant.
    ByShares,
    /// Rent flows through the share ledger but no new shares are minted.
    NormalRent,
}

/// How a person's monthly work income is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeModel {
    /// Uniform integer income: 8..=12 while working, 3..=6 once retired.
    FixedRanges,
    /// Normally distributed income, scaled by `retirement_factor` once retired.
    Normal {
        mean: f64,
        sigma: f64,
        retirement_factor: f64,
    },
}

/// Which living child receives a deceased person's estate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeirSelection {
    /// The first living child in population order (the oldest surviving entry).
    FirstChild,
    /// A child chosen uniformly at random among the living children.
    UniformRandom,
}

/// Whether the founder may go into debt to build houses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionFinancing {
    /// The founder always pays, absorbing unlimited debt.
    Unconditional,
    /// Construction is deferred until the founder's balance exceeds the cost.
    RequireFunds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    // Simulation
    pub number_of_months_to_run: u64,
    pub max_people: usize,
    pub min_people: usize,
    pub initial_number_of_people: usize,
    pub initial_number_of_houses: usize,
    pub allow_inheritance: bool,
    pub heir_selection: HeirSelection,
    pub ruleset: Ruleset,

    // Agent policy
    pub probability_of_changing_house: f64,
    pub minimum_free_houses_policy: usize,
    pub construction_financing: ConstructionFinancing,

    // Houses
    pub average_house_cost: f64,
    pub sigma_house_cost: f64,
    pub number_of_shares_per_house: u64,
    pub house_to_rent_ratio: f64,
    pub shares_per_month_earnings: u64,

    // Earnings
    pub income_model: IncomeModel,
}

#[allow(clippy::cast_precision_loss)]
impl Default for Parameters {
    fn default() -> Self {
        let months_a_person_lives = MONTHS_A_PERSON_LIVES as f64;
        Parameters {
            number_of_months_to_run: MONTHS_A_PERSON_LIVES * 3,
            max_people: 30,
            min_people: 2,
            initial_number_of_people: 5,
            initial_number_of_houses: 20,
            allow_inheritance: false,
            heir_selection: HeirSelection::FirstChild,
            ruleset: Ruleset::ByShares,

            probability_of_changing_house: 10.0 / months_a_person_lives,
            minimum_free_houses_policy: 2,
            construction_financing: ConstructionFinancing::Unconditional,

            average_house_cost: (MONTHS_PER_YEAR * 40 * 15) as f64,
            sigma_house_cost: 200.0,
            number_of_shares_per_house: MONTHS_A_PERSON_LIVES / 2,
            house_to_rent_ratio: 2.0 / months_a_person_lives,
            shares_per_month_earnings: 1,

            income_model: IncomeModel::Normal {
                mean: 100.0,
                sigma: 20.0,
                retirement_factor: 0.2,
            },
        }
    }
}

impl Parameters {
    /// Reads parameters from a JSON file. Missing fields take their default values. The result is
    /// validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if the file cannot be read, is not valid JSON, or describes an
    /// inconsistent configuration.
    pub fn from_json_file(path: &Path) -> Result<Parameters, SimError> {
        let data = fs::read_to_string(path)?;
        Parameters::from_json_str(&data)
    }

    /// # Errors
    ///
    /// Returns a `SimError` if `data` is not valid JSON or fails validation.
    pub fn from_json_str(data: &str) -> Result<Parameters, SimError> {
        let parameters: Parameters = serde_json::from_str(data)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Checks the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameters` describing the first violated constraint.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.probability_of_changing_house) {
            return Err(SimError::InvalidParameters(format!(
                "probability_of_changing_house must be in [0, 1], got {}",
                self.probability_of_changing_house
            )));
        }
        if self.min_people > self.max_people {
            return Err(SimError::InvalidParameters(format!(
                "min_people ({}) exceeds max_people ({})",
                self.min_people, self.max_people
            )));
        }
        if self.initial_number_of_people > self.max_people {
            return Err(SimError::InvalidParameters(format!(
                "initial_number_of_people ({}) exceeds max_people ({})",
                self.initial_number_of_people, self.max_people
            )));
        }
        if self.number_of_shares_per_house == 0 {
            return Err(SimError::InvalidParameters(
                "number_of_shares_per_house must be positive".to_string(),
            ));
        }
        if self.shares_per_month_earnings == 0 {
            return Err(SimError::InvalidParameters(
                "shares_per_month_earnings must be positive".to_string(),
            ));
        }
        if !self.sigma_house_cost.is_finite() || self.sigma_house_cost < 0.0 {
            return Err(SimError::InvalidParameters(format!(
                "sigma_house_cost must be a non-negative number, got {}",
                self.sigma_house_cost
            )));
        }
        if !self.average_house_cost.is_finite() || !self.house_to_rent_ratio.is_finite() {
            return Err(SimError::InvalidParameters(
                "house cost and rent ratio must be finite".to_string(),
            ));
        }
        if let IncomeModel::Normal {
            mean,
            sigma,
            retirement_factor,
        } = self.income_model
        {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(SimError::InvalidParameters(format!(
                    "income sigma must be a non-negative number, got {sigma}"
                )));
            }
            if !mean.is_finite() || !retirement_factor.is_finite() {
                return Err(SimError::InvalidParameters(
                    "income mean and retirement factor must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}
