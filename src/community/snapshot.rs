//! Yearly report rows.

use log::info;
use serde::{Deserialize, Serialize};

use super::Community;
use crate::define_report;
use crate::error::SimError;
use crate::house::HouseId;
use crate::people::PersonId;
use crate::report::ReportSink;

/// The house whose ownership is tracked year by year.
const TRACKED_HOUSE: HouseId = HouseId(0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonReport {
    pub year: u64,
    pub id: String,
    pub balance: f64,
    pub shares: u64,
    pub age: f64,
    pub parent: Option<String>,
    pub inherited: bool,
    pub house: Option<String>,
    pub monthly_payment: f64,
    pub share_income: f64,
    pub work_income: f64,
    pub income: f64,
}

define_report!(PersonReport, "people");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityReport {
    pub year: u64,
    pub homeless: usize,
    pub houses: usize,
    pub people: usize,
    pub deceased: usize,
    pub founder_balance: f64,
    pub spent_building_houses: f64,
}

define_report!(CommunityReport, "community");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseReport {
    pub year: u64,
    pub house: String,
    pub name: String,
    pub shares: u64,
}

define_report!(HouseReport, "example_house");

impl Community {
    /// Sends one row per living person, one community summary and the tracked house's owners to
    /// `sink`, then resets everyone's period income.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if the sink rejects a row.
    pub fn record_snapshot<S: ReportSink>(&mut self, year: u64, sink: &mut S) -> Result<(), SimError> {
        for person_report in self.person_reports(year) {
            sink.send_report(&person_report)?;
        }
        sink.send_report(&self.community_report(year))?;
        for house_report in self.house_reports(year) {
            sink.send_report(&house_report)?;
        }

        for person in self.people.values_mut() {
            person.reset_period_income();
        }
        self.founder.period_share_income = 0.0;

        info!(
            "year {year}: {} alive, {} homeless, {} houses, founder balance {:.2}",
            self.people.len(),
            self.homeless_people().len(),
            self.houses.len(),
            self.founder.balance
        );
        Ok(())
    }

    fn person_reports(&self, year: u64) -> Vec<PersonReport> {
        self.people
            .iter()
            .map(|(person_id, person)| {
                let home = self
                    .current_house(*person_id)
                    .and_then(|house_id| self.house(house_id));
                let monthly_payment = home.map_or(0.0, |house| house.price());
                PersonReport {
                    year,
                    id: person.label.clone(),
                    balance: person.balance,
                    shares: self.houses.iter().map(|house| house.shares_of(*person_id)).sum(),
                    age: person.age,
                    parent: person.parent.map(|parent| self.person_label(parent)),
                    inherited: person.shares_inherited > 0,
                    house: home.map(|house| house.label().to_string()),
                    monthly_payment,
                    share_income: person.period_share_income,
                    work_income: person.period_work_income,
                    income: person.period_share_income + person.period_work_income
                        - monthly_payment,
                }
            })
            .collect()
    }

    fn community_report(&self, year: u64) -> CommunityReport {
        CommunityReport {
            year,
            homeless: self.homeless_people().len(),
            houses: self.houses.len(),
            people: self.people.len(),
            deceased: self.deceased.len(),
            founder_balance: self.founder.balance,
            spent_building_houses: self.founder.spent_building_houses,
        }
    }

    fn house_reports(&self, year: u64) -> Vec<HouseReport> {
        let Some(house) = self.house(TRACKED_HOUSE) else {
            return Vec::new();
        };
        let mut reports = vec![HouseReport {
            year,
            house: house.label().to_string(),
            name: self.founder.label.clone(),
            shares: house.founder_shares(),
        }];
        reports.extend(house.owners().map(|(owner_id, shares)| HouseReport {
            year,
            house: house.label().to_string(),
            name: self.person_label(owner_id),
            shares,
        }));
        reports
    }

    /// Label of a living person, or the default label for someone who has died.
    fn person_label(&self, person_id: PersonId) -> String {
        self.person(person_id)
            .map_or_else(|| format!("person {person_id}"), |person| person.label.clone())
    }
}
