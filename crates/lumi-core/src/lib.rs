//! # lumi-core
//! Foundation types and traits for LumiCal cluster reconstruction.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod traits;
pub mod types;
