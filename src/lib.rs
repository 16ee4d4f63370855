//! Bizdesk host: bootstrap and command-line entry for the list-query layer.

pub mod bootstrap;
pub mod cli;
