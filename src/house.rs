//! A dwelling and its share ledger.
//!
//! Each house starts out wholly owned by the founder. Every month a tenant pays rent, the
//! founder's stock decays and ownership is transferred to the tenant, one generation's worth of
//! shares at a time. Once the founder's stock reaches zero, new shares are minted net-new and
//! counted in `inflation`, so `total_shares() == initial shares + inflation` always holds.

use std::fmt::{self, Display, Formatter};

use crate::error::SimError;
use crate::hashing::IndexMap;
use crate::people::PersonId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HouseId(pub usize);

impl Display for HouseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct House {
    id: HouseId,
    label: String,
    cost: f64,
    price: f64,
    founder_shares: u64,
    share_owners: IndexMap<PersonId, u64>,
    inflation: u64,
}

impl House {
    /// Creates a house wholly owned by the founder.
    pub fn new(id: HouseId, label: impl Into<String>, price: f64, founder_shares: u64) -> House {
        House {
            id,
            label: label.into(),
            cost: 0.0,
            price,
            founder_shares,
            share_owners: IndexMap::default(),
            inflation: 0,
        }
    }

    /// Creates a house whose monthly price is derived from its construction cost.
    pub fn from_cost(
        id: HouseId,
        label: impl Into<String>,
        cost: f64,
        shares: u64,
        rent_ratio: f64,
    ) -> House {
        House {
            cost,
            ..House::new(id, label, cost * rent_ratio, shares)
        }
    }

    pub fn id(&self) -> HouseId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The rent a tenant pays each month.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn founder_shares(&self) -> u64 {
        self.founder_shares
    }

    /// Number of shares minted after the founder's stock ran out.
    pub fn inflation(&self) -> u64 {
        self.inflation
    }

    pub fn total_shares(&self) -> u64 {
        self.founder_shares + self.share_owners.values().sum::<u64>()
    }

    pub fn shares_of(&self, person_id: PersonId) -> u64 {
        self.share_owners.get(&person_id).copied().unwrap_or(0)
    }

    pub fn is_owner(&self, person_id: PersonId) -> bool {
        self.share_owners.contains_key(&person_id)
    }

    /// Iterates over `(owner, shares)` in the order owners first acquired shares.
    pub fn owners(&self) -> impl ExactSizeIterator<Item = (PersonId, u64)> + '_ {
        self.share_owners
            .iter()
            .map(|(person_id, shares)| (*person_id, *shares))
    }

    /// Gives `increment` shares to `person_id`. They come out of the founder's stock while it
    /// lasts; any remainder is minted and counted as inflation.
    pub fn assign_share(&mut self, person_id: PersonId, increment: u64) {
        if increment == 0 {
            return;
        }
        let transferred = increment.min(self.founder_shares);
        self.founder_shares -= transferred;
        self.inflation += increment - transferred;

        *self.share_owners.entry(person_id).or_insert(0) += increment;
    }

    /// Moves every share `deceased_id` holds in this house to `heir_id` and returns the amount.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` if `deceased_id` holds no shares here.
    pub fn inherit_to_sibling(
        &mut self,
        deceased_id: PersonId,
        heir_id: PersonId,
    ) -> Result<u64, SimError> {
        let amount = self.take_shares(deceased_id)?;
        *self.share_owners.entry(heir_id).or_insert(0) += amount;
        Ok(amount)
    }

    /// Returns every share `deceased_id` holds in this house to the founder and returns the
    /// amount.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` if `deceased_id` holds no shares here.
    pub fn inherit_to_founder(&mut self, deceased_id: PersonId) -> Result<u64, SimError> {
        let amount = self.take_shares(deceased_id)?;
        self.founder_shares += amount;
        Ok(amount)
    }

    fn take_shares(&mut self, person_id: PersonId) -> Result<u64, SimError> {
        self.share_owners.shift_remove(&person_id).ok_or_else(|| {
            SimError::ContractViolation(format!(
                "person {person_id} holds no shares in house {} ({})",
                self.id, self.label
            ))
        })
    }
}
