//! Replay-determinism rules (`DS-N1xx`).
//!
//! All of these fire only when the visited node sits inside the replay
//! scope; outside it the same APIs are perfectly fine.

pub mod apis;
mod current_time;
mod environment;
mod io_clients;
mod sleep;
mod spawn;
mod uuid_random;

pub use current_time::CurrentTimeRule;
pub use environment::EnvironmentReadRule;
pub use io_clients::IoClientRule;
pub use sleep::BlockingSleepRule;
pub use spawn::SpawnRule;
pub use uuid_random::UuidRandomRule;

use super::Rule;

/// Returns fresh instances of every determinism rule.
#[must_use]
pub fn get_determinism_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(CurrentTimeRule),
        Box::new(UuidRandomRule),
        Box::new(EnvironmentReadRule),
        Box::new(IoClientRule),
        Box::new(BlockingSleepRule),
        Box::new(SpawnRule),
    ]
}
