//! Tower aggregation: hits sharing a `(sector, pad)` cell become one tower.
//!
//! Towers are emitted in descending energy order. Equal-energy towers keep
//! the order in which their cells first appear in the hit list, so the
//! output is fully determined by the input order.

use std::cmp::Reverse;
use std::collections::HashMap;

use lumi_core::types::{Cell, Hit, Tower};
use ordered_float::OrderedFloat;

/// Group `hits` into towers by exact `(sector, pad)` equality.
///
/// Zero hits yield zero towers.
pub fn aggregate_towers(hits: &[Hit]) -> Vec<Tower> {
    let mut slots: HashMap<Cell, usize> = HashMap::new();
    let mut groups: Vec<(Cell, Vec<Hit>)> = Vec::new();

    for hit in hits {
        let cell = hit.cell();
        let slot = *slots.entry(cell).or_insert_with(|| {
            groups.push((cell, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(*hit);
    }

    let mut towers: Vec<Tower> = groups
        .into_iter()
        .map(|(cell, hits)| Tower::from_hits(cell, hits))
        .collect();
    // Stable: ties stay in first-appearance order.
    towers.sort_by_key(|t| Reverse(OrderedFloat(t.energy)));
    towers
}
