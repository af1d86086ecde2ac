//! Foundational utilities: math types, collections, and logging

pub mod collections;
pub mod logging;
pub mod math;
