//! Symmetry-axis computation and mirror-module positioning.
//!
//! After the representatives are packed, the axis is placed far enough out
//! that every reflected mate keeps non-negative coordinates, then mates and
//! self-symmetric modules are positioned exactly. Centers are half-integers
//! when dimensions are odd, so mirror placement rounds to the nearest grid
//! position; the validator admits a 1.0-unit tolerance for the residual
//! error.

use crate::error::PlaceError;
use crate::{module_mut, module_ref};
use atoll_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use atoll_model::{ModuleMap, SymmetryGroup, SymmetryType};

/// Computes the axis coordinate from the packed representatives and writes
/// it into the group descriptor.
///
/// With symmetry pairs present, the axis clears both the rightmost
/// (bottommost) representative edge and the per-pair bound that keeps each
/// reflected mate's near edge non-negative. With only self-symmetric
/// modules, it clears the layout extent by half the widest (tallest) such
/// module. The extra `+1.0` buffers the rounding applied when mirror
/// positions are quantized to the grid.
pub(crate) fn compute_axis(
    modules: &ModuleMap,
    group: &mut SymmetryGroup,
    sink: &DiagnosticSink,
) -> Result<f64, PlaceError> {
    let axis = match group.ty {
        SymmetryType::Vertical => {
            if !group.pairs.is_empty() {
                let mut min_axis = f64::MIN;
                for pair in &group.pairs {
                    let rep = module_ref(modules, &pair.rep)?;
                    min_axis = min_axis.max(rep.right() as f64);
                }
                for pair in &group.pairs {
                    let rep = module_ref(modules, &pair.rep)?;
                    let mate = module_ref(modules, &pair.mate)?;
                    // mate center = 2*axis - rep center; its left edge stays
                    // non-negative iff axis >= (rep center + mate width/2)/2
                    let bound = (rep.center_x() + mate.width as f64 / 2.0) / 2.0;
                    min_axis = min_axis.max(bound);
                }
                Some(min_axis + 1.0)
            } else if !group.self_symmetric.is_empty() {
                let mut max_x = 0;
                for name in group.representatives() {
                    max_x = max_x.max(module_ref(modules, &name)?.right());
                }
                let mut max_width = 0;
                for name in &group.self_symmetric {
                    max_width = max_width.max(module_ref(modules, name)?.width);
                }
                Some(max_x as f64 + max_width as f64 / 2.0 + 1.0)
            } else {
                None
            }
        }
        SymmetryType::Horizontal => {
            if !group.pairs.is_empty() {
                let mut min_axis = f64::MIN;
                for pair in &group.pairs {
                    let rep = module_ref(modules, &pair.rep)?;
                    min_axis = min_axis.max(rep.top() as f64);
                }
                for pair in &group.pairs {
                    let rep = module_ref(modules, &pair.rep)?;
                    let mate = module_ref(modules, &pair.mate)?;
                    let bound = (rep.center_y() + mate.height as f64 / 2.0) / 2.0;
                    min_axis = min_axis.max(bound);
                }
                Some(min_axis + 1.0)
            } else if !group.self_symmetric.is_empty() {
                let mut max_y = 0;
                for name in group.representatives() {
                    max_y = max_y.max(module_ref(modules, &name)?.top());
                }
                let mut max_height = 0;
                for name in &group.self_symmetric {
                    max_height = max_height.max(module_ref(modules, name)?.height);
                }
                Some(max_y as f64 + max_height as f64 / 2.0 + 1.0)
            } else {
                None
            }
        }
    };

    if let Some(axis) = axis {
        group.set_axis(axis);
        sink.emit(Diagnostic::note(
            DiagnosticCode::new(Category::Placement, 301),
            format!("symmetry axis placed at {axis}"),
        ));
    }
    Ok(group.axis)
}

/// Positions every mate and self-symmetric module against the current axis.
///
/// A mate whose dimensions differ from its representative's is rotated when
/// that reconciles them; otherwise a dimension-mismatch warning is emitted
/// and placement proceeds (validation will reject the result). Mates that
/// needed no rotation have their orientation flag aligned with the
/// representative's.
pub(crate) fn place_mirrors(
    modules: &mut ModuleMap,
    group: &SymmetryGroup,
    sink: &DiagnosticSink,
) -> Result<(), PlaceError> {
    let axis = group.axis;

    for pair in &group.pairs {
        let rep = module_ref(modules, &pair.rep)?.clone();
        let mate = module_mut(modules, &pair.mate)?;

        let mut rotated_to_match = false;
        if (rep.width, rep.height) != (mate.width, mate.height) {
            if rep.width == mate.height && rep.height == mate.width {
                mate.rotate();
                rotated_to_match = true;
                sink.emit(
                    Diagnostic::note(
                        DiagnosticCode::new(Category::Placement, 302),
                        format!("rotated `{}` to match `{}`", pair.mate, pair.rep),
                    )
                    .with_module(pair.mate.clone()),
                );
            } else {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Warning, 201),
                        format!(
                            "dimension mismatch between `{}` ({}x{}) and `{}` ({}x{}) \
                             cannot be resolved by rotation",
                            pair.rep, rep.width, rep.height, pair.mate, mate.width, mate.height
                        ),
                    )
                    .with_module(pair.mate.clone()),
                );
            }
        }

        match group.ty {
            SymmetryType::Vertical => {
                let mate_cx = 2.0 * axis - rep.center_x();
                let mate_x = (mate_cx - mate.width as f64 / 2.0).round() as i32;
                mate.set_position(mate_x, rep.y);
            }
            SymmetryType::Horizontal => {
                let mate_cy = 2.0 * axis - rep.center_y();
                let mate_y = (mate_cy - mate.height as f64 / 2.0).round() as i32;
                mate.set_position(rep.x, mate_y);
            }
        }

        if !rotated_to_match {
            mate.set_rotated(rep.rotated);
        }
    }

    for name in &group.self_symmetric {
        let module = module_mut(modules, name)?;
        match group.ty {
            SymmetryType::Vertical => {
                let half = module.width as f64 / 2.0;
                let x = center_on_axis(axis, half, name, sink);
                module.set_position(x, module.y);
            }
            SymmetryType::Horizontal => {
                let half = module.height as f64 / 2.0;
                let y = center_on_axis(axis, half, name, sink);
                module.set_position(module.x, y);
            }
        }
    }

    Ok(())
}

/// Nearest grid coordinate putting a module of half-extent `half` on the
/// axis, with a neighbor probe when the rounded position is off by more
/// than a quarter unit.
fn center_on_axis(axis: f64, half: f64, name: &str, sink: &DiagnosticSink) -> i32 {
    let rounded = (axis - half).round() as i32;
    let error = (rounded as f64 + half - axis).abs();
    if error <= 0.25 {
        return rounded;
    }
    let error_lo = ((rounded - 1) as f64 + half - axis).abs();
    let error_hi = ((rounded + 1) as f64 + half - axis).abs();
    let chosen = if error_lo < error && error_lo < error_hi {
        rounded - 1
    } else if error_hi < error {
        rounded + 1
    } else {
        rounded
    };
    if chosen != rounded {
        sink.emit(
            Diagnostic::note(
                DiagnosticCode::new(Category::Placement, 303),
                format!("nudged `{name}` to {chosen} for minimum axis error"),
            )
            .with_module(name.to_string()),
        );
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use atoll_model::Module;

    fn registry(mods: &[(&str, i32, i32, i32, i32)]) -> ModuleMap {
        mods.iter()
            .map(|&(name, x, y, w, h)| {
                let mut m = Module::new(name, w, h);
                m.set_position(x, y);
                (name.to_string(), m)
            })
            .collect()
    }

    #[test]
    fn axis_for_single_pair() {
        let modules = registry(&[("a", 0, 0, 10, 20), ("a_m", 0, 0, 10, 20)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_pair("a", "a_m");
        let sink = DiagnosticSink::new();
        let axis = compute_axis(&modules, &mut group, &sink).unwrap();
        // max(right edge 10, (5 + 5)/2) + 1
        assert_eq!(axis, 11.0);
        assert_eq!(group.axis, 11.0);
    }

    #[test]
    fn axis_respects_wide_mate() {
        // The mate is far wider than its rep, so the non-negative bound
        // dominates the representative extent.
        let modules = registry(&[("a", 0, 0, 2, 2), ("a_m", 0, 0, 20, 2)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_pair("a", "a_m");
        let sink = DiagnosticSink::new();
        let axis = compute_axis(&modules, &mut group, &sink).unwrap();
        // max(2, (1 + 10)/2 = 5.5) + 1
        assert_eq!(axis, 6.5);
    }

    #[test]
    fn axis_for_self_symmetric_only() {
        let modules = registry(&[("s", 0, 0, 8, 10)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_self_symmetric("s");
        let sink = DiagnosticSink::new();
        let axis = compute_axis(&modules, &mut group, &sink).unwrap();
        assert_eq!(axis, 13.0);
    }

    #[test]
    fn axis_horizontal_uses_heights() {
        let modules = registry(&[("s", 0, 0, 6, 8)]);
        let mut group = SymmetryGroup::new(SymmetryType::Horizontal);
        group.add_self_symmetric("s");
        let sink = DiagnosticSink::new();
        let axis = compute_axis(&modules, &mut group, &sink).unwrap();
        assert_eq!(axis, 13.0);
    }

    #[test]
    fn axis_untouched_for_empty_group() {
        let modules = ModuleMap::new();
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        let sink = DiagnosticSink::new();
        let axis = compute_axis(&modules, &mut group, &sink).unwrap();
        assert_eq!(axis, -1.0);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn mirror_reflects_about_axis() {
        let mut modules = registry(&[("a", 0, 3, 10, 20), ("a_m", 0, 0, 10, 20)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_pair("a", "a_m");
        group.set_axis(11.0);
        let sink = DiagnosticSink::new();
        place_mirrors(&mut modules, &group, &sink).unwrap();
        // mate center = 22 - 5 = 17 -> x = 12, y copied from the rep
        assert_eq!((modules["a_m"].x, modules["a_m"].y), (12, 3));
    }

    #[test]
    fn horizontal_mirror_reflects_y() {
        let mut modules = registry(&[("a", 2, 0, 10, 20), ("a_m", 0, 0, 10, 20)]);
        let mut group = SymmetryGroup::new(SymmetryType::Horizontal);
        group.add_pair("a", "a_m");
        group.set_axis(21.0);
        let sink = DiagnosticSink::new();
        place_mirrors(&mut modules, &group, &sink).unwrap();
        // mate center_y = 42 - 10 = 32 -> y = 22, x copied from the rep
        assert_eq!((modules["a_m"].x, modules["a_m"].y), (2, 22));
    }

    #[test]
    fn mate_rotates_to_match() {
        let mut modules = registry(&[("a", 0, 0, 10, 4), ("a_m", 0, 0, 4, 10)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_pair("a", "a_m");
        group.set_axis(11.0);
        let sink = DiagnosticSink::new();
        place_mirrors(&mut modules, &group, &sink).unwrap();
        let mate = &modules["a_m"];
        assert_eq!((mate.width, mate.height), (10, 4));
        assert!(mate.rotated);
        assert!(sink
            .diagnostics()
            .iter()
            .any(|d| format!("{}", d.code) == "P302"));
    }

    #[test]
    fn irreconcilable_mate_warns_and_places() {
        let mut modules = registry(&[("a", 0, 0, 10, 4), ("a_m", 0, 0, 3, 9)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_pair("a", "a_m");
        group.set_axis(11.0);
        let sink = DiagnosticSink::new();
        place_mirrors(&mut modules, &group, &sink).unwrap();
        let diags = sink.diagnostics();
        assert!(diags.iter().any(|d| format!("{}", d.code) == "W201"));
        // Still positioned: center 22 - 5 = 17 -> x = round(17 - 1.5) = 16
        assert_eq!(modules["a_m"].x, 16);
        assert_eq!(modules["a_m"].y, 0);
    }

    #[test]
    fn matching_mate_inherits_orientation_flag() {
        let mut modules = registry(&[("a", 0, 0, 10, 20), ("a_m", 0, 0, 10, 20)]);
        modules.get_mut("a").unwrap().set_rotated(true);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_pair("a", "a_m");
        group.set_axis(11.0);
        let sink = DiagnosticSink::new();
        place_mirrors(&mut modules, &group, &sink).unwrap();
        assert!(modules["a_m"].rotated);
        assert_eq!((modules["a_m"].width, modules["a_m"].height), (10, 20));
    }

    #[test]
    fn self_symmetric_centers_on_axis() {
        let mut modules = registry(&[("s", 0, 5, 8, 10)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_self_symmetric("s");
        group.set_axis(13.0);
        let sink = DiagnosticSink::new();
        place_mirrors(&mut modules, &group, &sink).unwrap();
        // exact left = 13 - 4 = 9; y untouched
        assert_eq!((modules["s"].x, modules["s"].y), (9, 5));
    }

    #[test]
    fn self_symmetric_odd_width_stays_within_tolerance() {
        let mut modules = registry(&[("s", 0, 0, 7, 4)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_self_symmetric("s");
        group.set_axis(12.0);
        let sink = DiagnosticSink::new();
        place_mirrors(&mut modules, &group, &sink).unwrap();
        let center = modules["s"].center_x();
        assert!((center - 12.0).abs() <= 0.5);
    }

    #[test]
    fn neighbor_probe_picks_minimum_error() {
        // half = 0.7 exercises the > 0.25 branch of the probe.
        let sink = DiagnosticSink::new();
        let x = center_on_axis(10.0, 0.7, "s", &sink);
        // candidates: 9 (err 0.3), 8 (err 1.3), 10 (err 0.7) -> keep 9
        assert_eq!(x, 9);
    }

    #[test]
    fn unknown_mate_is_fatal() {
        let mut modules = registry(&[("a", 0, 0, 4, 4)]);
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_pair("a", "ghost");
        group.set_axis(6.0);
        let sink = DiagnosticSink::new();
        let err = place_mirrors(&mut modules, &group, &sink).unwrap_err();
        assert!(matches!(err, PlaceError::UnknownModule { name } if name == "ghost"));
    }
}
