//! A month-by-month simulation of a small community renting houses under a share-economy
//! ruleset.
//!
//! A founder finances every house and initially owns all of its shares. Each month a tenant pays
//! the house's price, the payment is split among the shareholders in proportion to their holdings,
//! and the tenant is credited with new shares taken from the founder's stock. Over time ownership
//! drifts from the founder to the people who actually live in the houses, and when a resident dies
//! their shares pass to a child or back to the founder.
//!
//! The central object is the [`Community`](community::Community), which owns every agent, house
//! and tenancy and advances one month per [`step`](community::Community::step):
//! * people are born, age and die
//! * tenants move, the homeless look for a home and the founder builds when vacancies run low
//! * everyone works
//! * rent is settled and ownership is updated
//! * yearly snapshots are sent to a [`ReportSink`](report::ReportSink)
//!
//! ```rust
//! use homeshare::community::Community;
//! use homeshare::parameters::Parameters;
//! use homeshare::report::MemoryReportSink;
//!
//! let parameters = Parameters {
//!     number_of_months_to_run: 120,
//!     ..Parameters::default()
//! };
//! let mut community = Community::from_parameters(parameters, 42).unwrap();
//! let mut sink = MemoryReportSink::new();
//! community.run(&mut sink).unwrap();
//! assert_eq!(community.tick(), 120);
//! ```
pub mod community;
pub mod error;
pub mod hashing;
pub mod hazard;
pub mod house;
pub mod log;
pub mod parameters;
pub mod people;
pub mod random;
pub mod report;
pub mod runner;

pub use community::Community;
pub use error::SimError;
pub use parameters::Parameters;
pub use runner::{run_with_args, run_with_base_args, BaseArgs};

// Re-exports for use in model code
pub use csv;
pub use rand;
pub use serde;
pub use serde_json;

pub use crate::log::{debug, error, info, trace, warn, LevelFilter};
