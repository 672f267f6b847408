use homeshare::runner::run_with_args;

fn main() {
    match run_with_args(|_, _| Ok(())) {
        Ok(community) => {
            println!(
                "Simulation finished after {} months: {} alive, {} deceased, {} houses, {} homeless",
                community.tick(),
                community.population(),
                community.deceased().len(),
                community.houses().len(),
                community.homeless_people().len()
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
