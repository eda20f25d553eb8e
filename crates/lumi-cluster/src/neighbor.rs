//! Neighbor resolution: link every tower to the most energetic tower of its
//! 3×3 neighborhood.
//!
//! The scan covers all towers of the event (including the tower itself) in
//! collection order. A candidate replaces the running best only when its
//! energy is strictly greater, so among equal maxima the first one in
//! collection order wins. Seeding in [`labeler`](crate::labeler) depends on
//! this tie-break for reproducible cluster ids.

use lumi_core::types::{Tower, TowerId};

/// Most energetic tower adjacent to `towers[index]`; `index` must be in bounds.
fn most_energetic_neighbor(towers: &[Tower], index: usize) -> TowerId {
    let center = towers[index].cell();
    let mut best = index;
    let mut found = false;

    for (i, candidate) in towers.iter().enumerate() {
        if !center.is_adjacent(&candidate.cell()) {
            continue;
        }
        if !found || candidate.energy > towers[best].energy {
            best = i;
            found = true;
        }
    }

    TowerId(best)
}

/// Set `neighbor` on every tower. Returns the number of local maxima.
///
/// O(n²) in the number of towers, which stays in the low hundreds per event.
pub fn resolve_neighbors(towers: &mut [Tower]) -> usize {
    let links: Vec<TowerId> = (0..towers.len())
        .map(|i| most_energetic_neighbor(towers, i))
        .collect();

    let mut maxima = 0;
    for (i, (tower, link)) in towers.iter_mut().zip(links).enumerate() {
        if link.index() == i {
            maxima += 1;
        }
        tower.neighbor = Some(link);
    }
    maxima
}
