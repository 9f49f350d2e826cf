//! Topology-preserving slack removal for representative modules.
//!
//! Each sweep pulls modules toward the origin along one axis: a module
//! slides until it meets the far edge of some earlier module it overlaps on
//! the orthogonal axis. Processing in coordinate order (names break ties)
//! keeps the relative order of interacting modules, so the packed topology
//! survives. Mirrors are re-derived by the symmetrizer afterwards and are
//! not touched here.

use crate::error::PlaceError;
use crate::{module_mut, module_ref};
use atoll_model::{ModuleMap, Rect, SymmetryGroup, SymmetryType};

/// Compacts the representatives of the group toward the origin.
///
/// For vertical symmetry the x sweep runs first (the axis-facing direction
/// matters most), then y; horizontal symmetry runs y first, then x.
pub(crate) fn compact(modules: &mut ModuleMap, group: &SymmetryGroup) -> Result<(), PlaceError> {
    let reps = group.representatives();
    if reps.is_empty() {
        return Ok(());
    }

    let mut rects: Vec<(String, Rect)> = Vec::with_capacity(reps.len());
    for name in &reps {
        rects.push((name.clone(), module_ref(modules, name)?.rect()));
    }

    // Translate the block back to the origin if it floats positive.
    let min_x = rects.iter().map(|(_, r)| r.x).min().unwrap_or(0);
    let min_y = rects.iter().map(|(_, r)| r.y).min().unwrap_or(0);
    let dx = min_x.max(0);
    let dy = min_y.max(0);
    if dx > 0 || dy > 0 {
        for (_, r) in &mut rects {
            r.x -= dx;
            r.y -= dy;
        }
    }

    match group.ty {
        SymmetryType::Vertical => {
            sweep_x(&mut rects);
            sweep_y(&mut rects);
        }
        SymmetryType::Horizontal => {
            sweep_y(&mut rects);
            sweep_x(&mut rects);
        }
    }

    for (name, r) in rects {
        module_mut(modules, &name)?.set_position(r.x, r.y);
    }
    Ok(())
}

fn sweep_x(rects: &mut [(String, Rect)]) {
    rects.sort_by(|a, b| a.1.x.cmp(&b.1.x).then_with(|| a.0.cmp(&b.0)));
    for i in 0..rects.len() {
        let mut new_x = 0;
        for j in 0..i {
            let prev = &rects[j].1;
            let cur = &rects[i].1;
            if prev.y < cur.top() && cur.y < prev.top() {
                new_x = new_x.max(prev.right());
            }
        }
        rects[i].1.x = new_x;
    }
}

fn sweep_y(rects: &mut [(String, Rect)]) {
    rects.sort_by(|a, b| a.1.y.cmp(&b.1.y).then_with(|| a.0.cmp(&b.0)));
    for i in 0..rects.len() {
        let mut new_y = 0;
        for j in 0..i {
            let prev = &rects[j].1;
            let cur = &rects[i].1;
            if prev.x < cur.right() && cur.x < prev.right() {
                new_y = new_y.max(prev.top());
            }
        }
        rects[i].1.y = new_y;
    }
}
