//! CLI subcommands.

pub mod exists;
pub mod ls;
pub mod stat;
pub mod volumes;
