//! Library side of the `smatch` command line tool.

pub mod config;
pub mod logging;
pub mod run;
