//! The orchestrator: every agent, every house, and who lives where.
//!
//! A [`Community`] advances one month per call to [`Community::step`], running a fixed pipeline
//! of phases whose order matters because later phases read balances and ages written by earlier
//! ones:
//!
//! 1. life and death ([`Community::life_and_death_phase`])
//! 2. moves and construction ([`Community::market_phase`])
//! 3. income ([`Community::income_phase`])
//! 4. rent settlement ([`Community::settlement_phase`])
//! 5. tick advance and yearly reporting ([`Community::advance_tick`])
//!
//! The community owns all of its state, including the random stream, so a run is reproducible
//! from its seed and parameters.

mod life_cycle;
mod market;
mod settlement;
mod snapshot;

use std::fmt::{self, Display, Formatter};

use log::{debug, info};

pub use life_cycle::DeathConsequences;
pub use snapshot::{CommunityReport, HouseReport, PersonReport};

use crate::error::SimError;
use crate::hashing::{HashSet, HashSetExt, IndexMap};
use crate::hazard::MONTHS_PER_YEAR;
use crate::house::{House, HouseId};
use crate::parameters::Parameters;
use crate::people::{Founder, Person, PersonId};
use crate::random::SimRng;
use crate::report::ReportSink;

pub struct Community {
    parameters: Parameters,
    rng: SimRng,
    founder: Founder,
    people: IndexMap<PersonId, Person>,
    houses: Vec<House>,
    /// house -> tenant; injective in both directions.
    tenancy: IndexMap<HouseId, PersonId>,
    deceased: HashSet<PersonId>,
    next_person_id: usize,
    tick: u64,
}

impl Community {
    /// Creates a community with no people and no houses, and a founder with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameters` if `parameters` fail validation.
    pub fn new(parameters: Parameters, seed: u64) -> Result<Community, SimError> {
        parameters.validate()?;
        Ok(Community {
            parameters,
            rng: SimRng::new(seed),
            founder: Founder::default(),
            people: IndexMap::default(),
            houses: Vec::new(),
            tenancy: IndexMap::default(),
            deceased: HashSet::new(),
            next_person_id: 0,
            tick: 0,
        })
    }

    /// Creates a community with the configured initial people (all homeless) and houses (all
    /// owned by the founder, who starts in debt for their full cost).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameters` if `parameters` fail validation.
    pub fn from_parameters(parameters: Parameters, seed: u64) -> Result<Community, SimError> {
        let mut community = Community::new(parameters, seed)?;
        for _ in 0..community.parameters.initial_number_of_people {
            community.add_new_born(None);
        }
        for _ in 0..community.parameters.initial_number_of_houses {
            let cost = community.draw_house_cost();
            community.add_costed_house("initial house", cost);
        }
        info!(
            "community (seed {}) starts with {} houses and {} people, founder balance {:.2}, ruleset {:?}",
            community.rng.base_seed(),
            community.houses.len(),
            community.people.len(),
            community.founder.balance,
            community.parameters.ruleset
        );
        Ok(community)
    }

    // Accessors

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn year(&self) -> u64 {
        self.tick / MONTHS_PER_YEAR
    }

    pub fn founder(&self) -> &Founder {
        &self.founder
    }

    pub fn founder_mut(&mut self) -> &mut Founder {
        &mut self.founder
    }

    /// Living people in the order they were added.
    pub fn people(&self) -> impl ExactSizeIterator<Item = (PersonId, &Person)> + '_ {
        self.people.iter().map(|(id, person)| (*id, person))
    }

    pub fn population(&self) -> usize {
        self.people.len()
    }

    pub fn person(&self, person_id: PersonId) -> Option<&Person> {
        self.people.get(&person_id)
    }

    pub fn person_mut(&mut self, person_id: PersonId) -> Option<&mut Person> {
        self.people.get_mut(&person_id)
    }

    pub fn is_alive(&self, person_id: PersonId) -> bool {
        self.people.contains_key(&person_id)
    }

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn house(&self, house_id: HouseId) -> Option<&House> {
        self.houses.get(house_id.0)
    }

    pub fn house_mut(&mut self, house_id: HouseId) -> Option<&mut House> {
        self.houses.get_mut(house_id.0)
    }

    /// Current `(house, tenant)` pairs in the order the tenancies began.
    pub fn tenancy(&self) -> impl ExactSizeIterator<Item = (HouseId, PersonId)> + '_ {
        self.tenancy.iter().map(|(house, person)| (*house, *person))
    }

    pub fn tenant_of(&self, house_id: HouseId) -> Option<PersonId> {
        self.tenancy.get(&house_id).copied()
    }

    pub fn current_house(&self, person_id: PersonId) -> Option<HouseId> {
        self.tenancy
            .iter()
            .find(|(_, tenant)| **tenant == person_id)
            .map(|(house, _)| *house)
    }

    /// Living people who are not tenants of any house, in population order.
    pub fn homeless_people(&self) -> Vec<PersonId> {
        let tenants: HashSet<PersonId> = self.tenancy.values().copied().collect();
        self.people
            .keys()
            .filter(|person_id| !tenants.contains(person_id))
            .copied()
            .collect()
    }

    /// Houses without a tenant, in construction order.
    pub fn vacant_houses(&self) -> Vec<HouseId> {
        self.houses
            .iter()
            .map(House::id)
            .filter(|house_id| !self.tenancy.contains_key(house_id))
            .collect()
    }

    pub fn deceased(&self) -> &HashSet<PersonId> {
        &self.deceased
    }

    // Population and housing stock

    /// Adds a person to the living population and returns their id.
    pub fn add_person(&mut self, person: Person) -> PersonId {
        let person_id = PersonId(self.next_person_id);
        self.next_person_id += 1;
        self.people.insert(person_id, person);
        person_id
    }

    /// Adds a newcomer with a random age and balance, labelled after their id.
    pub fn add_new_born(&mut self, parent: Option<PersonId>) -> PersonId {
        let label = format!("person {}", self.next_person_id);
        let person = Person::new_random(label, parent, &mut self.rng);
        let person_id = self.add_person(person);
        debug!("{person_id} is born (parent {parent:?})");
        person_id
    }

    /// Adds a founder-owned house with an explicit price, bypassing the cost draw and without
    /// charging the founder.
    pub fn add_house(&mut self, price: f64, founder_shares: u64) -> HouseId {
        let house_id = HouseId(self.houses.len());
        self.houses.push(House::new(
            house_id,
            format!("house {house_id}"),
            price,
            founder_shares,
        ));
        house_id
    }

    fn add_costed_house(&mut self, label_prefix: &str, cost: f64) -> HouseId {
        let house_id = HouseId(self.houses.len());
        self.founder.pay_for_construction(cost);
        self.houses.push(House::from_cost(
            house_id,
            format!("{label_prefix} {house_id}"),
            cost,
            self.parameters.number_of_shares_per_house,
            self.parameters.house_to_rent_ratio,
        ));
        debug!(
            "founder builds house {house_id} for {cost:.2}, balance now {:.2}",
            self.founder.balance
        );
        house_id
    }

    // Tenancy

    /// Makes `person_id` the tenant of `house_id`, releasing any house they currently rent.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` if the person is not alive, the house does not
    /// exist, or the house is already rented by someone else.
    pub fn occupy_house(&mut self, person_id: PersonId, house_id: HouseId) -> Result<(), SimError> {
        if !self.is_alive(person_id) {
            return Err(SimError::ContractViolation(format!(
                "person {person_id} cannot rent house {house_id}: not a living resident"
            )));
        }
        if self.house(house_id).is_none() {
            return Err(SimError::ContractViolation(format!(
                "house {house_id} does not exist"
            )));
        }
        if let Some(tenant) = self.tenant_of(house_id) {
            if tenant != person_id {
                return Err(SimError::ContractViolation(format!(
                    "house {house_id} is already rented by person {tenant}"
                )));
            }
            return Ok(());
        }
        self.release_house(person_id);
        self.tenancy.insert(house_id, person_id);
        Ok(())
    }

    /// Ends whatever tenancy `person_id` holds and returns the house they left.
    pub fn release_house(&mut self, person_id: PersonId) -> Option<HouseId> {
        let house_id = self.current_house(person_id)?;
        self.tenancy.shift_remove(&house_id);
        Some(house_id)
    }

    /// Removes the tenant of `house_id` and returns who it was.
    pub fn evict(&mut self, house_id: HouseId) -> Option<PersonId> {
        self.tenancy.shift_remove(&house_id)
    }

    // The monthly step

    /// Runs one month: all five phases in order.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if a ledger contract is violated or the sink rejects a report.
    pub fn step<S: ReportSink>(&mut self, sink: &mut S) -> Result<(), SimError> {
        self.life_and_death_phase()?;
        self.market_phase()?;
        self.income_phase();
        self.settlement_phase()?;
        #[cfg(debug_assertions)]
        self.check_invariants()?;
        self.advance_tick(sink)
    }

    /// Emits the yearly snapshot when a year begins, then moves to the next tick.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if the sink rejects a report.
    pub fn advance_tick<S: ReportSink>(&mut self, sink: &mut S) -> Result<(), SimError> {
        if self.tick % MONTHS_PER_YEAR == 0 {
            self.record_snapshot(self.year(), sink)?;
        }
        self.tick += 1;
        Ok(())
    }

    /// Runs the configured number of months, then [`finish`](Community::finish)es.
    ///
    /// # Errors
    ///
    /// Returns the first `SimError` raised by a step or by the sink.
    pub fn run<S: ReportSink>(&mut self, sink: &mut S) -> Result<(), SimError> {
        let months = self.parameters.number_of_months_to_run;
        info!("running {months} months from tick {}", self.tick);
        for _ in 0..months {
            self.step(sink)?;
        }
        self.finish(sink)
    }

    /// Emits a final snapshot of the end state and flushes the sink. The snapshot is labelled
    /// with the first year not yet reported, so it never collides with a yearly one.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if the sink rejects a report or fails to flush.
    pub fn finish<S: ReportSink>(&mut self, sink: &mut S) -> Result<(), SimError> {
        self.record_snapshot(self.tick.div_ceil(MONTHS_PER_YEAR), sink)?;
        sink.flush()?;
        info!(
            "finished after {} months: {} alive, {} deceased, {} houses, {} homeless",
            self.tick,
            self.people.len(),
            self.deceased.len(),
            self.houses.len(),
            self.homeless_people().len()
        );
        Ok(())
    }

    /// Verifies the structural invariants of the community.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ContractViolation` describing the first broken invariant.
    pub fn check_invariants(&self) -> Result<(), SimError> {
        let mut tenants = HashSet::new();
        for (house_id, person_id) in &self.tenancy {
            if self.house(*house_id).is_none() {
                return Err(SimError::ContractViolation(format!(
                    "tenancy refers to missing house {house_id}"
                )));
            }
            if !self.is_alive(*person_id) {
                return Err(SimError::ContractViolation(format!(
                    "house {house_id} is rented by non-resident person {person_id}"
                )));
            }
            if !tenants.insert(*person_id) {
                return Err(SimError::ContractViolation(format!(
                    "person {person_id} rents more than one house"
                )));
            }
        }
        for house in &self.houses {
            for (owner, shares) in house.owners() {
                if !self.is_alive(owner) {
                    return Err(SimError::ContractViolation(format!(
                        "house {} lists non-resident person {owner} as an owner",
                        house.id()
                    )));
                }
                if shares == 0 {
                    return Err(SimError::ContractViolation(format!(
                        "house {} lists person {owner} with zero shares",
                        house.id()
                    )));
                }
            }
        }
        if let Some(person_id) = self.people.keys().find(|id| self.deceased.contains(id)) {
            return Err(SimError::ContractViolation(format!(
                "person {person_id} is both living and deceased"
            )));
        }
        Ok(())
    }
}

impl Display for Community {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Year {}, month {}",
            self.year(),
            self.tick % MONTHS_PER_YEAR + 1
        )?;
        writeln!(
            f,
            "{}: balance {:.2}, age {:.0}",
            self.founder.label, self.founder.balance, self.founder.age
        )?;
        for house in &self.houses {
            write!(
                f,
                "[{}] price {:.2}, founder {}/{} shares, inflation {}",
                house.label(),
                house.price(),
                house.founder_shares(),
                house.total_shares(),
                house.inflation()
            )?;
            if let Some(tenant) = self.tenant_of(house.id()).and_then(|id| self.person(id)) {
                write!(f, ", tenant {}", tenant.label)?;
            }
            writeln!(f)?;
        }
        for (person_id, person) in &self.people {
            let home = self
                .current_house(*person_id)
                .and_then(|house_id| self.house(house_id))
                .map_or_else(|| "homeless".to_string(), |house| house.label().to_string());
            writeln!(
                f,
                "[{}] balance {:.2}, age {:.2}, moved {} times, {home}",
                person.label, person.balance, person.age, person.times_moved
            )?;
        }
        write!(f, "{} deceased", self.deceased.len())
    }
}
