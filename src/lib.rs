#[macro_use]
extern crate lazy_static;

pub mod accounting;
pub mod catalog;
pub mod configuration;
pub mod error;
pub mod formatter;
pub mod helper;
pub mod layout;
pub mod memory;
pub mod planner;
pub mod report;
pub mod size;
pub mod usage;
