//! Property-based tests for the annular solver stages using proptest
//!
//! These tests check invariants across random grid sizes and contents:
//! - Ghost cells after boundary enforcement (periodic seam, radial walls)
//! - Zero-coefficient diffusion and zero-velocity advection are exact no-ops
//! - Frame steps are deterministic

use annularium::solver::{advect, diffuse, set_bnd, FieldKind, PolarGeometry, Simulation, SolverParams};
use annularium::state::GridField;
use proptest::prelude::*;

const KINDS: [FieldKind; 3] = [FieldKind::Scalar, FieldKind::RadialVelocity, FieldKind::AngularVelocity];

/// Strategy for a field of random size with arbitrary finite contents,
/// ghosts included.
fn random_field() -> impl Strategy<Value = GridField> {
    (1usize..12, 1usize..16).prop_flat_map(|(nr, nt)| {
        prop::collection::vec(-100.0f32..100.0, (nr + 2) * (nt + 2))
            .prop_map(move |data| GridField::from_vec(nr, nt, data).unwrap())
    })
}

fn geometry_for(field: &GridField) -> PolarGeometry {
    PolarGeometry::new(field.nr(), field.ntheta(), 0.5, 2.0).unwrap()
}

/// One queued impulse: cell offsets reduced modulo the grid, plus amounts.
fn forcing() -> impl Strategy<Value = Vec<(usize, usize, f32, f32, f32)>> {
    prop::collection::vec((0usize..64, 0usize..64, 0.0f32..50.0, -3.0f32..3.0, -3.0f32..3.0), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Angular ghosts mirror the opposite interior column for every kind
    #[test]
    fn test_set_bnd_periodic_seam(field in random_field()) {
        let (nr, nt) = (field.nr(), field.ntheta());
        for kind in KINDS {
            let mut x = field.clone();
            set_bnd(kind, &mut x);
            for i in 1..=nr {
                prop_assert_eq!(x.get(i, 0), x.get(i, nt), "{:?} low seam at row {}", kind, i);
                prop_assert_eq!(x.get(i, nt + 1), x.get(i, 1), "{:?} high seam at row {}", kind, i);
            }
        }
    }

    /// Radial ghosts copy (scalar, angular) or negate (radial) the adjacent row
    #[test]
    fn test_set_bnd_radial_walls(field in random_field()) {
        let (nr, nt) = (field.nr(), field.ntheta());
        for kind in KINDS {
            let sign = if kind == FieldKind::RadialVelocity { -1.0 } else { 1.0 };
            let mut x = field.clone();
            set_bnd(kind, &mut x);
            for j in 1..=nt {
                prop_assert_eq!(x.get(0, j), sign * x.get(1, j), "{:?} inner wall at column {}", kind, j);
                prop_assert_eq!(x.get(nr + 1, j), sign * x.get(nr, j), "{:?} outer wall at column {}", kind, j);
            }
        }
    }

    /// Boundary enforcement never touches interior cells
    #[test]
    fn test_set_bnd_keeps_interior(field in random_field()) {
        for kind in KINDS {
            let mut x = field.clone();
            set_bnd(kind, &mut x);
            for (i, j) in field.interior() {
                prop_assert_eq!(x.get(i, j), field.get(i, j));
            }
        }
    }

    /// With a zero coefficient diffusion reproduces its (boundary-set) input
    #[test]
    fn test_diffuse_zero_coefficient_noop(field in random_field(), iter in 0usize..8, dt in 0.01f32..1.0) {
        let g = geometry_for(&field);
        for kind in KINDS {
            let mut x0 = field.clone();
            set_bnd(kind, &mut x0);
            let mut x = GridField::for_geometry(&g);
            diffuse(kind, &mut x, &x0, 0.0, dt, iter, &g);
            for (i, j) in x.interior() {
                prop_assert_eq!(x.get(i, j), x0.get(i, j), "{:?} at ({}, {})", kind, i, j);
            }
        }
    }

    /// Zero velocity leaves every interior cell exactly where it was
    #[test]
    fn test_advect_zero_velocity_identity(field in random_field(), dt in 0.01f32..1.0) {
        let g = geometry_for(&field);
        let mut d0 = field.clone();
        set_bnd(FieldKind::Scalar, &mut d0);
        let zero = GridField::for_geometry(&g);
        let mut d = GridField::for_geometry(&g);
        advect(FieldKind::Scalar, &mut d, &d0, &zero, &zero, dt, &g);
        for (i, j) in d.interior() {
            prop_assert_eq!(d.get(i, j), d0.get(i, j), "moved at ({}, {})", i, j);
        }
    }

    /// Identical forcing sequences give bit-identical fields
    #[test]
    fn test_frame_step_deterministic(nr in 2usize..10, nt in 2usize..20, impulses in forcing()) {
        let run = || {
            let g = PolarGeometry::new(nr, nt, 0.5, 2.0).unwrap();
            let mut sim = Simulation::new(g, SolverParams::default()).unwrap();
            for &(a, b, m, dur, dut) in &impulses {
                let (i, j) = (1 + a % nr, 1 + b % nt);
                sim.add_density_source(i, j, m);
                sim.add_velocity_source(i, j, dur, dut);
                sim.frame_step();
            }
            (sim.density().clone(), sim.ur().clone(), sim.utheta().clone())
        };
        prop_assert_eq!(run(), run());
    }
}
