//! Vertical guidance façade crate: the profile driver and the pieces it is wired from.

pub mod component;
pub mod consumer;
pub mod driver;
pub mod store;
pub mod trigger;

pub use facade::*;
pub use vnav_climb as climb;
pub use vnav_descent as descent;

mod facade;
