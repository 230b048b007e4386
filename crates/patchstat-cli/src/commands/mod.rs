//! Command implementations

mod compare;
mod stats;
mod status;
mod topic;
mod upstreamed;

pub use compare::{cmd_compare, CompareArgs};
pub use stats::cmd_stats;
pub use status::cmd_status;
pub use topic::cmd_topic;
pub use upstreamed::cmd_upstreamed;
