//! Port traits for the collaborators the domain calls out to.

pub mod config_port;
pub mod data_port;
pub mod chart_port;
