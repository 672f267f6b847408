//! Work income and the monthly rent settlement.

use log::debug;

use super::Community;
use crate::error::SimError;
use crate::house::HouseId;
use crate::parameters::Ruleset;
use crate::people::PersonId;

impl Community {
    /// Every living resident works for a month.
    pub fn income_phase(&mut self) {
        for person in self.people.values_mut() {
            person.work(&mut self.rng, &self.parameters.income_model);
        }
    }

    /// Collects rent for every occupied house.
    ///
    /// A tenant who cannot cover the price is evicted. Otherwise the payment is split among the
    /// house's shareholders and, under [`Ruleset::ByShares`], the tenant is credited with new
    /// shares.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` if a tenant or shareholder is not a living resident.
    pub fn settlement_phase(&mut self) -> Result<(), SimError> {
        let occupied: Vec<(HouseId, PersonId)> = self.tenancy().collect();
        for (house_id, tenant_id) in occupied {
            let price = self
                .house(house_id)
                .ok_or_else(|| {
                    SimError::ContractViolation(format!("house {house_id} does not exist"))
                })?
                .price();
            let tenant = self.people.get_mut(&tenant_id).ok_or_else(|| {
                SimError::ContractViolation(format!(
                    "house {house_id} is rented by non-resident person {tenant_id}"
                ))
            })?;
            if tenant.balance < price {
                debug!(
                    "person {tenant_id} is evicted from house {house_id}: balance {:.2} below price {price:.2}",
                    tenant.balance
                );
                self.evict(house_id);
                continue;
            }
            tenant.balance -= price;
            self.distribute_payment(house_id, price)?;

            match self.parameters.ruleset {
                Ruleset::ByShares => {
                    let increment = self.parameters.shares_per_month_earnings;
                    if let Some(house) = self.houses.get_mut(house_id.0) {
                        house.assign_share(tenant_id, increment);
                    }
                }
                Ruleset::NormalRent => {}
            }
        }
        Ok(())
    }

    /// Splits `payment` among the shareholders of `house_id` in proportion to their shares and
    /// returns the total paid out. A house with no shares at all pays the founder in full.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` if the house does not exist or lists an owner who is
    /// not a living resident.
    pub fn distribute_payment(&mut self, house_id: HouseId, payment: f64) -> Result<f64, SimError> {
        let house = self.houses.get(house_id.0).ok_or_else(|| {
            SimError::ContractViolation(format!("house {house_id} does not exist"))
        })?;
        let total_shares = house.total_shares();
        if total_shares == 0 {
            self.founder.balance += payment;
            self.founder.period_share_income += payment;
            return Ok(payment);
        }

        #[allow(clippy::cast_precision_loss)]
        let share_of = |shares: u64| shares as f64 / total_shares as f64 * payment;

        let mut paid = 0.0;
        for (owner_id, shares) in house.owners() {
            let owner = self.people.get_mut(&owner_id).ok_or_else(|| {
                SimError::ContractViolation(format!(
                    "house {house_id} lists non-resident person {owner_id} as an owner"
                ))
            })?;
            let payout = share_of(shares);
            owner.balance += payout;
            owner.period_share_income += payout;
            paid += payout;
        }
        let founder_payout = share_of(house.founder_shares());
        self.founder.balance += founder_payout;
        self.founder.period_share_income += founder_payout;
        Ok(paid + founder_payout)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use crate::community::Community;
    use crate::error::SimError;
    use crate::house::HouseId;
    use crate::parameters::{Parameters, Ruleset};
    use crate::people::{Person, PersonId};

    fn empty(ruleset: Ruleset) -> Community {
        Community::new(
            Parameters {
                initial_number_of_people: 0,
                initial_number_of_houses: 0,
                ruleset,
                ..Parameters::default()
            },
            0,
        )
        .unwrap()
    }

    #[test]
    fn rent_buys_a_share() {
        let mut community = empty(Ruleset::ByShares);
        let house = community.add_house(10.0, 12);
        let tenant = community.add_person(Person::new("tenant", 30.0, 100.0, None));
        community.occupy_house(tenant, house).unwrap();

        community.settlement_phase().unwrap();

        assert_approx_eq!(community.person(tenant).unwrap().balance, 90.0);
        assert_approx_eq!(community.founder().balance, 10.0);
        let house = community.house(house).unwrap();
        assert_eq!(house.founder_shares(), 11);
        assert_eq!(house.shares_of(tenant), 1);
        assert_eq!(house.total_shares(), 12);
    }

    #[test]
    fn normal_rent_freezes_ownership() {
        let mut community = empty(Ruleset::NormalRent);
        let house = community.add_house(10.0, 12);
        let tenant = community.add_person(Person::new("tenant", 30.0, 100.0, None));
        community.occupy_house(tenant, house).unwrap();

        for _ in 0..3 {
            community.settlement_phase().unwrap();
        }

        assert_approx_eq!(community.person(tenant).unwrap().balance, 70.0);
        assert_approx_eq!(community.founder().balance, 30.0);
        assert_eq!(community.house(house).unwrap().founder_shares(), 12);
        assert!(!community.house(house).unwrap().is_owner(tenant));
    }

    #[test]
    fn tenant_who_cannot_pay_is_evicted() {
        let mut community = empty(Ruleset::ByShares);
        let house = community.add_house(10.0, 12);
        let tenant = community.add_person(Person::new("tenant", 30.0, 9.5, None));
        community.occupy_house(tenant, house).unwrap();

        community.settlement_phase().unwrap();

        assert_eq!(community.tenant_of(house), None);
        assert_eq!(community.homeless_people(), vec![tenant]);
        assert_approx_eq!(community.person(tenant).unwrap().balance, 9.5);
        assert_approx_eq!(community.founder().balance, 0.0);
        assert_eq!(community.house(house).unwrap().founder_shares(), 12);
    }

    #[test]
    fn owners_are_paid_in_proportion() {
        let mut community = empty(Ruleset::ByShares);
        let house = community.add_house(10.0, 6);
        let a = community.add_person(Person::new("a", 30.0, 0.0, None));
        let b = community.add_person(Person::new("b", 30.0, 0.0, None));
        community.house_mut(house).unwrap().assign_share(a, 3);
        community.house_mut(house).unwrap().assign_share(b, 2);

        let paid = community.distribute_payment(house, 12.0).unwrap();

        assert_approx_eq!(paid, 12.0);
        assert_approx_eq!(community.person(a).unwrap().balance, 6.0);
        assert_approx_eq!(community.person(b).unwrap().period_share_income, 4.0);
        assert_approx_eq!(community.founder().balance, 2.0);
        assert_approx_eq!(community.founder().period_share_income, 2.0);
    }

    #[test]
    fn payouts_sum_to_the_payment() {
        let mut community = empty(Ruleset::ByShares);
        let house = community.add_house(7.3, 5);
        let owners: Vec<PersonId> = (0..7)
            .map(|i| community.add_person(Person::new(format!("person {i}"), 30.0, 0.0, None)))
            .collect();
        for (i, owner) in owners.iter().enumerate() {
            community.house_mut(house).unwrap().assign_share(*owner, i as u64 + 1);
        }
        let paid = community.distribute_payment(house, 7.3).unwrap();
        assert!((paid - 7.3).abs() < 1e-9);
    }

    #[test]
    fn house_without_shares_pays_the_founder() {
        let mut community = empty(Ruleset::ByShares);
        let house = community.add_house(10.0, 0);
        let paid = community.distribute_payment(house, 10.0).unwrap();
        assert_approx_eq!(paid, 10.0);
        assert_approx_eq!(community.founder().balance, 10.0);
    }

    #[test]
    fn paying_into_a_missing_house_is_a_contract_violation() {
        let mut community = empty(Ruleset::ByShares);
        assert!(matches!(
            community.distribute_payment(HouseId(3), 10.0),
            Err(SimError::ContractViolation(_))
        ));
    }

    #[test]
    fn income_phase_pays_everyone() {
        let mut community = empty(Ruleset::ByShares);
        let a = community.add_person(Person::new("a", 30.0, 0.0, None));
        let b = community.add_person(Person::new("b", 70.0, 0.0, None));
        community.income_phase();
        for person_id in [a, b] {
            let person = community.person(person_id).unwrap();
            assert_approx_eq!(person.balance, person.period_work_income);
        }
    }
}
