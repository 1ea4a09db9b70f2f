// [libs/domain/topology-engine/src/relax.rs]
//! After an LLM-generated topology places nodes (often all at the same
//! point), an iterative minimum-distance relaxation nudges overlapping
//! positions apart so the initial layout is immediately usable.

use meridian_domain_models::Position;
use std::collections::BTreeMap;
use tracing::debug;

pub const MIN_DISTANCE: f64 = 14.0;
pub const MAX_PASSES: usize = 8;

/// Mutates `positions` in place. Deterministic: two nodes at the exact
/// same point are separated along a fixed angle derived from their
/// ordinal index in the (sorted) key iteration, so repeated calls on
/// identical input produce identical output.
pub fn relax_overlaps(positions: &mut BTreeMap<String, Position>) {
    let keys: Vec<String> = positions.keys().cloned().collect();

    for pass in 0..MAX_PASSES {
        let mut moved = false;

        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let (pi, pj) = (positions[&keys[i]], positions[&keys[j]]);
                let dx = pj.x - pi.x;
                let dy = pj.y - pi.y;
                let distance = (dx * dx + dy * dy).sqrt();

                if distance < MIN_DISTANCE {
                    moved = true;
                    let push = (MIN_DISTANCE - distance) / 2.0;
                    let (ux, uy) = if distance > f64::EPSILON {
                        (dx / distance, dy / distance)
                    } else {
                        // Coincident points: separate along a deterministic
                        // angle derived from the pair's ordinal indices.
                        let angle = (i * 37 + j * 11) as f64;
                        (angle.cos(), angle.sin())
                    };

                    let entry_i = positions.get_mut(&keys[i]).unwrap();
                    entry_i.x -= ux * push;
                    entry_i.y -= uy * push;
                    let entry_j = positions.get_mut(&keys[j]).unwrap();
                    entry_j.x += ux * push;
                    entry_j.y += uy * push;
                }
            }
        }

        if !moved {
            debug!(pass, "relaxation converged");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_coincident_points_by_min_distance() {
        let mut positions = BTreeMap::new();
        positions.insert("a".to_string(), Position { x: 50.0, y: 50.0 });
        positions.insert("b".to_string(), Position { x: 50.0, y: 50.0 });
        positions.insert("c".to_string(), Position { x: 50.0, y: 50.0 });

        relax_overlaps(&mut positions);

        let ids: Vec<_> = positions.keys().cloned().collect();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let a = positions[&ids[i]];
                let b = positions[&ids[j]];
                let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                assert!(dist >= MIN_DISTANCE - 1e-6, "pair ({i},{j}) too close: {dist}");
            }
        }
    }

    #[test]
    fn leaves_well_separated_points_untouched() {
        let mut positions = BTreeMap::new();
        positions.insert("a".to_string(), Position { x: 0.0, y: 0.0 });
        positions.insert("b".to_string(), Position { x: 100.0, y: 100.0 });
        let before = positions.clone();
        relax_overlaps(&mut positions);
        assert_eq!(positions["a"], before["a"]);
        assert_eq!(positions["b"], before["b"]);
    }

    #[test]
    fn is_idempotent_once_converged() {
        let mut positions = BTreeMap::new();
        positions.insert("a".to_string(), Position { x: 50.0, y: 50.0 });
        positions.insert("b".to_string(), Position { x: 50.0, y: 50.0 });
        relax_overlaps(&mut positions);
        let after_first = positions.clone();
        relax_overlaps(&mut positions);
        assert_eq!(positions["a"], after_first["a"]);
        assert_eq!(positions["b"], after_first["b"]);
    }
}
