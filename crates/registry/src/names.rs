//! Command names, as typed on the command line. Each word of a name becomes
//! one level of the clap subcommand tree.

pub mod onenote {
    pub const NOTEBOOK_LIST: &str = "onenote notebook list";
}

pub mod planner {
    pub const BUCKET_LIST: &str = "planner bucket list";
    pub const PLAN_LIST: &str = "planner plan list";
}

/// Every command name the catalog provides.
pub const ALL: &[&str] = &[onenote::NOTEBOOK_LIST, planner::BUCKET_LIST, planner::PLAN_LIST];
