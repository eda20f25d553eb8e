//! Integration test suite for LumiCal cluster reconstruction.
//!
//! Exercises the full pipeline from hits to merged clusters and checks the
//! event-level invariants: tower partition, energy conservation and
//! reproducibility across runs and thread counts.

pub mod helpers;
