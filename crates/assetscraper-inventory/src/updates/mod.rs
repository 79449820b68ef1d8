//! Installed OS update providers

pub mod cim;

pub use cim::CimUpdatesProvider;
