//! Births, deaths and the disposal of a deceased resident's estate.

use log::debug;

use super::Community;
use crate::error::SimError;
use crate::house::HouseId;
use crate::parameters::HeirSelection;
use crate::people::PersonId;

/// What happened to a resident's estate when they died.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathConsequences {
    pub person_id: PersonId,
    pub age: f64,
    pub heir: Option<PersonId>,
    pub shares_to_heir: u64,
    pub shares_to_founder: u64,
    pub money_to_heir: f64,
    /// Residual balance that left the economy with the deceased.
    pub money_discarded: f64,
    pub released_house: Option<HouseId>,
}

impl Community {
    /// Ages the founder, then gives every living resident a chance to have a child and to die.
    /// Refills the population up to the configured floor afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` if a deceased resident's estate cannot be settled.
    pub fn life_and_death_phase(&mut self) -> Result<Vec<DeathConsequences>, SimError> {
        self.founder.age_one_month();

        let living: Vec<PersonId> = self.people.keys().copied().collect();
        let mut deaths = Vec::new();
        for person_id in living {
            let person = self.people.get(&person_id).ok_or_else(|| {
                SimError::ContractViolation(format!("person {person_id} vanished mid-phase"))
            })?;
            let has_child = self.people.len() < self.parameters.max_people
                && person.produces_child_this_month(&mut self.rng);
            let dies = person.dies_this_month(&mut self.rng);

            if has_child {
                self.add_new_born(Some(person_id));
            }
            if dies {
                deaths.push(self.dispose_of_deceased(person_id)?);
            } else if let Some(person) = self.people.get_mut(&person_id) {
                person.age_one_month();
            }
        }

        while self.people.len() < self.parameters.min_people {
            self.add_new_born(None);
        }
        Ok(deaths)
    }

    /// Removes `person_id` from the living population and settles their estate.
    ///
    /// For every house where the deceased holds shares, the shares go to their heir when
    /// inheritance is enabled and a living child exists, and to the founder otherwise. The
    /// residual balance travels with the first house handed to the heir; without an heir it is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` if `person_id` is not a living resident.
    pub fn dispose_of_deceased(
        &mut self,
        person_id: PersonId,
    ) -> Result<DeathConsequences, SimError> {
        let person = self.people.get(&person_id).ok_or_else(|| {
            SimError::ContractViolation(format!(
                "person {person_id} cannot die: not a living resident"
            ))
        })?;
        let age = person.age;
        let mut residual = person.balance;

        let heir = if self.parameters.allow_inheritance {
            self.select_heir(person_id)
        } else {
            None
        };

        let mut consequences = DeathConsequences {
            person_id,
            age,
            heir,
            shares_to_heir: 0,
            shares_to_founder: 0,
            money_to_heir: 0.0,
            money_discarded: 0.0,
            released_house: None,
        };

        for house in &mut self.houses {
            if !house.is_owner(person_id) {
                continue;
            }
            if let Some(heir_id) = heir {
                let heir_person = self.people.get_mut(&heir_id).ok_or_else(|| {
                    SimError::ContractViolation(format!(
                        "heir {heir_id} of person {person_id} is not a living resident"
                    ))
                })?;
                let amount = house.inherit_to_sibling(person_id, heir_id)?;
                heir_person.shares_inherited += amount;
                heir_person.balance += residual;
                heir_person.money_inherited += residual;
                consequences.shares_to_heir += amount;
                consequences.money_to_heir += residual;
                residual = 0.0;
            } else {
                let amount = house.inherit_to_founder(person_id)?;
                self.founder.shares_inherited += amount;
                consequences.shares_to_founder += amount;
            }
        }
        consequences.money_discarded = residual;

        consequences.released_house = self.release_house(person_id);
        self.people.shift_remove(&person_id);
        self.deceased.insert(person_id);

        debug!(
            "person {person_id} dies at {age:.1}: {} shares to heir {:?}, {} shares to founder, {:.2} discarded",
            consequences.shares_to_heir,
            consequences.heir,
            consequences.shares_to_founder,
            consequences.money_discarded
        );
        Ok(consequences)
    }

    /// The living child who inherits from `person_id`, if any.
    pub fn select_heir(&mut self, person_id: PersonId) -> Option<PersonId> {
        let children: Vec<PersonId> = self
            .people
            .iter()
            .filter(|(_, person)| person.parent == Some(person_id))
            .map(|(id, _)| *id)
            .collect();
        match self.parameters.heir_selection {
            HeirSelection::FirstChild => children.first().copied(),
            HeirSelection::UniformRandom => self.rng.sample_from(children.into_iter()),
        }
    }
}
