use assert_approx_eq::assert_approx_eq;
use homeshare::community::{Community, CommunityReport, HouseReport, PersonReport};
use homeshare::parameters::{Parameters, Ruleset};
use homeshare::people::Person;
use homeshare::report::MemoryReportSink;

fn bare_parameters() -> Parameters {
    Parameters {
        initial_number_of_people: 0,
        initial_number_of_houses: 0,
        min_people: 0,
        ..Parameters::default()
    }
}

#[test]
fn broke_newcomer_without_houses_stays_homeless() {
    let mut community = Community::new(bare_parameters(), 7).unwrap();
    let person = community.add_person(Person::new("person 0", 20.0, 0.0, None));
    let mut sink = MemoryReportSink::new();

    community.step(&mut sink).unwrap();

    assert!(community.homeless_people().contains(&person));
    assert_eq!(community.tenancy().len(), 0);
    assert_eq!(community.tick(), 1);
}

#[test]
fn first_rent_payment_moves_one_share() {
    let mut community = Community::new(bare_parameters(), 7).unwrap();
    let house = community.add_house(10.0, 12);
    let tenant = community.add_person(Person::new("person 0", 30.0, 100.0, None));
    community.occupy_house(tenant, house).unwrap();

    community.settlement_phase().unwrap();

    assert_approx_eq!(community.person(tenant).unwrap().balance, 90.0);
    assert_approx_eq!(community.founder().balance, 10.0);
    assert_eq!(community.house(house).unwrap().founder_shares(), 11);
    assert_eq!(community.house(house).unwrap().shares_of(tenant), 1);
}

#[test]
fn shares_of_the_childless_dead_return_to_the_founder() {
    let mut community = Community::new(bare_parameters(), 7).unwrap();
    let house = community.add_house(10.0, 12);
    let owner = community.add_person(Person::new("person 0", 80.0, 0.0, None));
    for _ in 0..5 {
        community.house_mut(house).unwrap().assign_share(owner, 1);
    }
    let founder_shares = community.house(house).unwrap().founder_shares();

    community.dispose_of_deceased(owner).unwrap();

    let house = community.house(house).unwrap();
    assert_eq!(house.founder_shares(), founder_shares + 5);
    assert!(!house.is_owner(owner));
    assert_eq!(house.owners().len(), 0);
}

fn assert_full_run_is_consistent(parameters: Parameters, seed: u64) {
    let initial_shares = parameters.number_of_shares_per_house;
    let (min_people, max_people) = (parameters.min_people, parameters.max_people);
    let months = parameters.number_of_months_to_run;

    let mut community = Community::from_parameters(parameters, seed).unwrap();
    let mut sink = MemoryReportSink::new();
    community.run(&mut sink).unwrap();
    community.check_invariants().unwrap();
    assert_eq!(community.tick(), months);

    let yearly = sink.records::<CommunityReport>().unwrap();
    assert_eq!(yearly.len() as u64, months / 12 + 1);
    for report in &yearly {
        assert!(
            (min_people..=max_people).contains(&report.people),
            "year {} has {} people",
            report.year,
            report.people
        );
        assert!(report.homeless <= report.people);
    }

    for house in community.houses() {
        let owned: u64 = house.owners().map(|(_, shares)| shares).sum();
        assert_eq!(house.founder_shares() + owned, house.total_shares());
        assert_eq!(house.total_shares(), initial_shares + house.inflation());
        for (owner, _) in house.owners() {
            assert!(community.is_alive(owner));
            assert!(!community.deceased().contains(&owner));
        }
    }
    for person_id in community.deceased() {
        assert!(!community.is_alive(*person_id));
        assert!(community.current_house(*person_id).is_none());
    }
}

#[test]
fn three_centuries_with_defaults() {
    assert_full_run_is_consistent(Parameters::default(), 0);
}

#[test]
fn three_centuries_with_inheritance() {
    assert_full_run_is_consistent(
        Parameters {
            allow_inheritance: true,
            ..Parameters::default()
        },
        1,
    );
}

#[test]
fn normal_rent_never_transfers_ownership() {
    let parameters = Parameters {
        ruleset: Ruleset::NormalRent,
        number_of_months_to_run: 600,
        ..Parameters::default()
    };
    let mut community = Community::from_parameters(parameters, 3).unwrap();
    let mut sink = MemoryReportSink::new();
    community.run(&mut sink).unwrap();
    for house in community.houses() {
        assert_eq!(house.owners().len(), 0);
        assert_eq!(house.founder_shares(), 600);
        assert_eq!(house.inflation(), 0);
    }
    for report in sink.records::<PersonReport>().unwrap() {
        assert_eq!(report.shares, 0);
        assert_approx_eq!(report.share_income, 0.0);
    }
}

#[test]
fn people_appear_once_per_year_and_the_dead_never_return() {
    let parameters = Parameters {
        number_of_months_to_run: 1200,
        ..Parameters::default()
    };
    let mut community = Community::from_parameters(parameters, 11).unwrap();
    let mut sink = MemoryReportSink::new();
    community.run(&mut sink).unwrap();

    let rows = sink.records::<PersonReport>().unwrap();
    let mut last_year_seen = std::collections::HashMap::new();
    for row in &rows {
        if let Some(previous) = last_year_seen.insert(row.id.clone(), row.year) {
            // Never twice in a year, never after a gap.
            assert_eq!(row.year, previous + 1, "{} reappeared", row.id);
        }
    }
    for person_id in community.deceased() {
        let label = format!("person {person_id}");
        assert!(community.people().all(|(_, person)| person.label != label));
    }
}

#[test]
fn tracked_house_rows_account_for_every_share() {
    let parameters = Parameters {
        number_of_months_to_run: 240,
        ..Parameters::default()
    };
    let mut community = Community::from_parameters(parameters, 5).unwrap();
    let mut sink = MemoryReportSink::new();
    community.run(&mut sink).unwrap();

    let rows = sink.records::<HouseReport>().unwrap();
    let last_year = rows.iter().map(|row| row.year).max().unwrap();
    let final_total: u64 = rows
        .iter()
        .filter(|row| row.year == last_year)
        .map(|row| row.shares)
        .sum();
    assert_eq!(final_total, community.houses()[0].total_shares());
    assert!(rows.iter().all(|row| row.house == "initial house 0"));
}
