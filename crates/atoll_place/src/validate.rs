//! Placement validation: symmetry equations and island connectivity.

use atoll_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use atoll_model::{ModuleMap, Rect, SymmetryGroup, SymmetryType};
use std::collections::HashMap;

/// Allowed deviation from the exact symmetry equations.
///
/// Centers are half-integers when dimensions are odd, so a reflected pair
/// can be off by half a unit per side after rounding to the grid.
const TOLERANCE: f64 = 1.0;

/// Checks non-negative coordinates and the symmetry equations.
///
/// Emits an error diagnostic and returns `false` on the first violation.
/// A pair whose members are missing from the registry is skipped with a
/// warning.
pub(crate) fn validate_symmetry(
    modules: &ModuleMap,
    group: &SymmetryGroup,
    sink: &DiagnosticSink,
) -> bool {
    let mut names: Vec<&String> = modules.keys().collect();
    names.sort();
    for name in names {
        let m = &modules[name];
        if m.x < 0 || m.y < 0 {
            sink.emit(
                Diagnostic::error(
                    DiagnosticCode::new(Category::Error, 105),
                    format!(
                        "module `{name}` has negative coordinates ({}, {})",
                        m.x, m.y
                    ),
                )
                .with_module(name.clone()),
            );
            return false;
        }
    }

    let axis = group.axis;
    for pair in &group.pairs {
        let (rep, mate) = match (modules.get(&pair.rep), modules.get(&pair.mate)) {
            (Some(rep), Some(mate)) => (rep, mate),
            _ => {
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::new(Category::Warning, 202),
                    format!(
                        "cannot validate pair (`{}`, `{}`): module missing from registry",
                        pair.rep, pair.mate
                    ),
                ));
                continue;
            }
        };

        let (sum_error, cross_error) = match group.ty {
            SymmetryType::Vertical => (
                (rep.center_x() + mate.center_x() - 2.0 * axis).abs(),
                (rep.center_y() - mate.center_y()).abs(),
            ),
            SymmetryType::Horizontal => (
                (rep.center_y() + mate.center_y() - 2.0 * axis).abs(),
                (rep.center_x() - mate.center_x()).abs(),
            ),
        };
        if sum_error > TOLERANCE || cross_error > TOLERANCE {
            sink.emit(
                Diagnostic::error(
                    DiagnosticCode::new(Category::Error, 105),
                    format!(
                        "symmetry violated for pair (`{}`, `{}`)",
                        pair.rep, pair.mate
                    ),
                )
                .with_note(format!("center-sum error {sum_error} (tolerance {TOLERANCE})"))
                .with_note(format!("cross-axis error {cross_error}")),
            );
            return false;
        }
    }

    for name in &group.self_symmetric {
        let module = match modules.get(name) {
            Some(module) => module,
            None => {
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::new(Category::Warning, 202),
                    format!("cannot validate missing self-symmetric module `{name}`"),
                ));
                continue;
            }
        };
        let error = match group.ty {
            SymmetryType::Vertical => (module.center_x() - axis).abs(),
            SymmetryType::Horizontal => (module.center_y() - axis).abs(),
        };
        if error > TOLERANCE {
            sink.emit(
                Diagnostic::error(
                    DiagnosticCode::new(Category::Error, 105),
                    format!("self-symmetric `{name}` is off-axis by {error}"),
                )
                .with_module(name.clone()),
            );
            return false;
        }
    }

    true
}

/// Checks that the group's modules form a single connected island.
pub(crate) fn validate_connectivity(
    modules: &ModuleMap,
    group: &SymmetryGroup,
    sink: &DiagnosticSink,
) -> bool {
    let rects: HashMap<String, Rect> = modules
        .iter()
        .map(|(name, m)| (name.clone(), m.rect()))
        .collect();
    let connected = group.is_symmetry_island(&rects);
    if !connected {
        sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 106),
            "modules do not form a connected symmetry island",
        ));
    }
    connected
}

#[cfg(test)]
mod tests {
    use super::*;
    use atoll_model::Module;

    fn placed(name: &str, x: i32, y: i32, w: i32, h: i32) -> (String, Module) {
        let mut m = Module::new(name, w, h);
        m.set_position(x, y);
        (name.to_string(), m)
    }

    fn vertical_pair(axis: f64) -> SymmetryGroup {
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_pair("a", "a_m");
        group.set_axis(axis);
        group
    }

    #[test]
    fn exact_pair_passes() {
        let modules: ModuleMap = [
            placed("a", 0, 0, 10, 20),
            placed("a_m", 12, 0, 10, 20),
        ]
        .into_iter()
        .collect();
        let sink = DiagnosticSink::new();
        assert!(validate_symmetry(&modules, &vertical_pair(11.0), &sink));
        assert!(!sink.has_errors());
    }

    #[test]
    fn negative_coordinate_fails() {
        let modules: ModuleMap = [placed("a", -1, 0, 10, 20), placed("a_m", 12, 0, 10, 20)]
            .into_iter()
            .collect();
        let sink = DiagnosticSink::new();
        assert!(!validate_symmetry(&modules, &vertical_pair(11.0), &sink));
        assert!(sink.has_errors());
    }

    #[test]
    fn broken_center_sum_fails() {
        let modules: ModuleMap = [placed("a", 0, 0, 10, 20), placed("a_m", 15, 0, 10, 20)]
            .into_iter()
            .collect();
        let sink = DiagnosticSink::new();
        assert!(!validate_symmetry(&modules, &vertical_pair(11.0), &sink));
    }

    #[test]
    fn mismatched_y_fails_vertical_pair() {
        let modules: ModuleMap = [placed("a", 0, 0, 10, 20), placed("a_m", 12, 5, 10, 20)]
            .into_iter()
            .collect();
        let sink = DiagnosticSink::new();
        assert!(!validate_symmetry(&modules, &vertical_pair(11.0), &sink));
    }

    #[test]
    fn tolerance_admits_rounding_residue() {
        // Center sum off by exactly 1.0: the boundary of the tolerance.
        let modules: ModuleMap = [placed("a", 0, 0, 10, 20), placed("a_m", 13, 0, 10, 20)]
            .into_iter()
            .collect();
        let sink = DiagnosticSink::new();
        assert!(validate_symmetry(&modules, &vertical_pair(11.0), &sink));
    }

    #[test]
    fn missing_pair_member_warns_and_skips() {
        let modules: ModuleMap = [placed("a", 0, 0, 10, 20)].into_iter().collect();
        let sink = DiagnosticSink::new();
        assert!(validate_symmetry(&modules, &vertical_pair(11.0), &sink));
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(format!("{}", diags[0].code), "W202");
    }

    #[test]
    fn self_symmetric_off_axis_fails() {
        let modules: ModuleMap = [placed("s", 0, 0, 8, 10)].into_iter().collect();
        let mut group = SymmetryGroup::new(SymmetryType::Vertical);
        group.add_self_symmetric("s");
        group.set_axis(13.0);
        let sink = DiagnosticSink::new();
        // center_x = 4, axis = 13: far off.
        assert!(!validate_symmetry(&modules, &group, &sink));
    }

    #[test]
    fn horizontal_pair_checks_y_sum() {
        let modules: ModuleMap = [placed("a", 0, 0, 6, 8), placed("a_m", 0, 10, 6, 8)]
            .into_iter()
            .collect();
        let mut group = SymmetryGroup::new(SymmetryType::Horizontal);
        group.add_pair("a", "a_m");
        group.set_axis(9.0);
        let sink = DiagnosticSink::new();
        assert!(validate_symmetry(&modules, &group, &sink));
    }

    #[test]
    fn connectivity_passes_for_abutting_halves() {
        let modules: ModuleMap = [placed("a", 0, 0, 4, 4), placed("a_m", 4, 0, 4, 4)]
            .into_iter()
            .collect();
        let sink = DiagnosticSink::new();
        assert!(validate_connectivity(&modules, &vertical_pair(4.0), &sink));
    }

    #[test]
    fn connectivity_fails_for_split_halves() {
        let modules: ModuleMap = [placed("a", 0, 0, 4, 4), placed("a_m", 9, 0, 4, 4)]
            .into_iter()
            .collect();
        let sink = DiagnosticSink::new();
        assert!(!validate_connectivity(&modules, &vertical_pair(6.5), &sink));
        assert!(sink.has_errors());
    }
}
