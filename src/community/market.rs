//! Moves, house hunting and construction.

use log::{debug, trace};
use rand_distr::Normal;

use super::Community;
use crate::error::SimError;
use crate::house::HouseId;
use crate::parameters::ConstructionFinancing;
use crate::people::PersonId;

/// Chance that a homeless person looks for a house in a given month.
pub const HOMELESS_SEARCH_PROBABILITY: f64 = 0.9;

impl Community {
    /// Tenants may move, the homeless look for a home, and the founder builds when vacancies run
    /// low.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` if a tenant or house disappears mid-phase.
    pub fn market_phase(&mut self) -> Result<(), SimError> {
        let tenants: Vec<PersonId> = self.tenancy.values().copied().collect();
        for person_id in tenants {
            if !self
                .rng
                .sample_bool(self.parameters.probability_of_changing_house)
            {
                continue;
            }
            if let Some(house_id) = self.search_for_house(person_id)? {
                self.occupy_house(person_id, house_id)?;
                if let Some(person) = self.people.get_mut(&person_id) {
                    person.times_moved += 1;
                }
                trace!("tenant {person_id} moves to house {house_id}");
            }
        }

        for person_id in self.homeless_people() {
            if !self.rng.sample_bool(HOMELESS_SEARCH_PROBABILITY) {
                continue;
            }
            match self.search_for_house(person_id)? {
                Some(house_id) => {
                    self.occupy_house(person_id, house_id)?;
                    trace!("homeless {person_id} rents house {house_id}");
                }
                None => trace!("homeless {person_id} found nothing affordable"),
            }
        }

        if self.vacant_houses().len() < self.parameters.minimum_free_houses_policy {
            self.commission_house();
        }
        Ok(())
    }

    fn search_for_house(&mut self, person_id: PersonId) -> Result<Option<HouseId>, SimError> {
        let budget = self
            .person(person_id)
            .ok_or_else(|| {
                SimError::ContractViolation(format!(
                    "person {person_id} cannot look for a house: not a living resident"
                ))
            })?
            .balance;
        Ok(self.random_available_house(budget))
    }

    /// Picks uniformly among vacant houses whose price is strictly below `budget`.
    pub fn random_available_house(&mut self, budget: f64) -> Option<HouseId> {
        let affordable: Vec<HouseId> = self
            .houses
            .iter()
            .filter(|house| house.price() < budget && !self.tenancy.contains_key(&house.id()))
            .map(|house| house.id())
            .collect();
        self.rng.sample_from(affordable.into_iter())
    }

    /// Asks the founder to build one house. Returns the new house, or `None` when the financing
    /// policy defers construction.
    pub fn commission_house(&mut self) -> Option<HouseId> {
        let cost = self.draw_house_cost();
        if self.parameters.construction_financing == ConstructionFinancing::RequireFunds
            && self.founder.balance <= cost
        {
            debug!(
                "founder defers construction: balance {:.2} does not cover {cost:.2}",
                self.founder.balance
            );
            return None;
        }
        Some(self.add_costed_house("new house", cost))
    }

    pub(super) fn draw_house_cost(&mut self) -> f64 {
        let average = self.parameters.average_house_cost;
        match Normal::new(average, self.parameters.sigma_house_cost) {
            Ok(distribution) => self.rng.sample_distr(distribution),
            // Only reachable with a non-finite sigma, which validation rejects.
            Err(_) => average,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::community::Community;
    use crate::parameters::{ConstructionFinancing, Parameters};
    use crate::people::Person;

    fn parameters() -> Parameters {
        Parameters {
            initial_number_of_people: 0,
            initial_number_of_houses: 0,
            min_people: 0,
            minimum_free_houses_policy: 0,
            ..Parameters::default()
        }
    }

    #[test]
    fn available_house_respects_budget_and_vacancy() {
        let mut community = Community::new(parameters(), 1).unwrap();
        let cheap = community.add_house(10.0, 12);
        let pricey = community.add_house(50.0, 12);
        let rented = community.add_house(5.0, 12);
        let tenant = community.add_person(Person::new("tenant", 30.0, 100.0, None));
        community.occupy_house(tenant, rented).unwrap();

        for _ in 0..50 {
            assert_eq!(community.random_available_house(20.0), Some(cheap));
        }
        // The price must be strictly below the budget.
        assert_eq!(community.random_available_house(10.0), None);
        let choice = community.random_available_house(100.0);
        assert!(choice == Some(cheap) || choice == Some(pricey));
    }

    #[test]
    fn homeless_with_money_eventually_find_a_home() {
        let mut community = Community::new(parameters(), 5).unwrap();
        let house = community.add_house(10.0, 12);
        let person = community.add_person(Person::new("a", 30.0, 100.0, None));
        for _ in 0..20 {
            community.market_phase().unwrap();
        }
        assert_eq!(community.current_house(person), Some(house));
        assert_eq!(community.person(person).unwrap().times_moved, 0);
    }

    #[test]
    fn broke_homeless_stay_homeless() {
        let mut community = Community::new(parameters(), 5).unwrap();
        community.add_house(10.0, 12);
        let person = community.add_person(Person::new("a", 30.0, 0.0, None));
        for _ in 0..20 {
            community.market_phase().unwrap();
        }
        assert_eq!(community.homeless_people(), vec![person]);
    }

    #[test]
    fn tenants_move_when_they_always_want_to() {
        let mut community = Community::new(
            Parameters {
                probability_of_changing_house: 1.0,
                ..parameters()
            },
            8,
        )
        .unwrap();
        let first = community.add_house(10.0, 12);
        // Pricier than the current home but still affordable.
        let second = community.add_house(60.0, 12);
        let person = community.add_person(Person::new("a", 30.0, 100.0, None));
        community.occupy_house(person, first).unwrap();

        community.market_phase().unwrap();
        assert_eq!(community.current_house(person), Some(second));
        assert_eq!(community.person(person).unwrap().times_moved, 1);
        assert_eq!(community.tenant_of(first), None);
    }

    #[test]
    fn founder_builds_when_vacancies_run_low() {
        let mut community = Community::new(
            Parameters {
                minimum_free_houses_policy: 2,
                ..parameters()
            },
            3,
        )
        .unwrap();
        community.market_phase().unwrap();
        assert_eq!(community.houses().len(), 1);
        let house = &community.houses()[0];
        assert_eq!(house.label(), "new house 0");
        assert_eq!(house.founder_shares(), 600);
        assert!((house.price() - house.cost() * 2.0 / 1200.0).abs() < 1e-9);
        assert!((community.founder().balance + house.cost()).abs() < 1e-9);
        assert!((community.founder().spent_building_houses - house.cost()).abs() < 1e-9);

        community.market_phase().unwrap();
        assert_eq!(community.houses().len(), 2);
        community.market_phase().unwrap();
        assert_eq!(community.houses().len(), 2);
    }

    #[test]
    fn construction_can_require_funds() {
        let mut community = Community::new(
            Parameters {
                minimum_free_houses_policy: 1,
                construction_financing: ConstructionFinancing::RequireFunds,
                ..parameters()
            },
            3,
        )
        .unwrap();
        assert_eq!(community.commission_house(), None);
        assert!(community.houses().is_empty());

        community.founder_mut().balance = 1_000_000.0;
        community.market_phase().unwrap();
        assert_eq!(community.houses().len(), 1);
        assert!(community.founder().balance < 1_000_000.0);
    }
}
