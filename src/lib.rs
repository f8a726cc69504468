pub mod calendar;
pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod git;
pub mod journal;
pub mod target;
