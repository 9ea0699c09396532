pub mod boundary;
mod core;
pub mod diagnostics;
pub mod forcing;
mod params;

// Re-export public API
pub use self::core::{advect, compute_divergence, diffuse, project};
pub use boundary::{set_bnd, FieldKind};
pub use params::{PolarGeometry, SolverParams};

use crate::error::ConfigError;
use crate::state::{FrameSnapshot, GridField, SimState};

/// Stable-fluids solver on an annulus. Owns every grid for its lifetime.
pub struct Simulation {
    geometry: PolarGeometry,
    params: SolverParams,
    state: SimState,
    frame: u64,
}

impl Simulation {
    pub fn new(geometry: PolarGeometry, params: SolverParams) -> Result<Self, ConfigError> {
        geometry.validate()?;
        params.validate()?;
        log::debug!(
            "simulation {}x{} cells, r in [{}, {}], dr={:.4} dtheta={:.4}",
            geometry.nr,
            geometry.ntheta,
            geometry.r_min,
            geometry.r_max,
            geometry.dr(),
            geometry.dtheta(),
        );
        Ok(Self { state: SimState::new(&geometry), geometry, params, frame: 0 })
    }

    pub fn geometry(&self) -> &PolarGeometry {
        &self.geometry
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Completed frame count.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn density(&self) -> &GridField {
        self.state.density.current()
    }

    pub fn ur(&self) -> &GridField {
        self.state.ur.current()
    }

    pub fn utheta(&self) -> &GridField {
        self.state.utheta.current()
    }

    fn assert_interior(&self, i: usize, j: usize) {
        assert!(
            (1..=self.geometry.nr).contains(&i) && (1..=self.geometry.ntheta).contains(&j),
            "forcing cell ({i}, {j}) is not an interior cell"
        );
    }

    /// Queue density for the next frame. Consumed (zeroed) by `frame_step`.
    pub fn add_density_source(&mut self, i: usize, j: usize, amount: f32) {
        self.assert_interior(i, j);
        self.state.density.source_mut().add(i, j, amount);
    }

    /// Queue a velocity impulse for the next frame. `dutheta` is linear velocity.
    pub fn add_velocity_source(&mut self, i: usize, j: usize, dur: f32, dutheta: f32) {
        self.assert_interior(i, j);
        self.state.ur.source_mut().add(i, j, dur);
        self.state.utheta.source_mut().add(i, j, dutheta);
    }

    /// Diffuse, project, advect and re-project the velocity field.
    pub fn velocity_step(&mut self) {
        let SolverParams { dt, visc, diffuse_iter, project_iter, .. } = self.params;
        let g = &self.geometry;
        let s = &mut self.state;

        s.ur.add_source(dt);
        s.utheta.add_source(dt);
        s.ur.swap();
        s.utheta.swap();

        {
            let (x, x0) = s.ur.split_mut();
            diffuse(FieldKind::RadialVelocity, x, x0, visc, dt, diffuse_iter, g);
        }
        {
            let (x, x0) = s.utheta.split_mut();
            diffuse(FieldKind::AngularVelocity, x, x0, visc, dt, diffuse_iter, g);
        }

        // Project before advecting so the back-trace follows a divergence-free field
        project(
            s.ur.current_mut(),
            s.utheta.current_mut(),
            &mut s.pressure,
            &mut s.divergence,
            project_iter,
            g,
        );

        s.ur.swap();
        s.utheta.swap();

        // Both components are transported by the pre-advection field
        {
            let (d, d0) = s.ur.split_mut();
            advect(FieldKind::RadialVelocity, d, d0, d0, s.utheta.source(), dt, g);
        }
        {
            let (d, d0) = s.utheta.split_mut();
            advect(FieldKind::AngularVelocity, d, d0, s.ur.source(), d0, dt, g);
        }

        project(
            s.ur.current_mut(),
            s.utheta.current_mut(),
            &mut s.pressure,
            &mut s.divergence,
            project_iter,
            g,
        );
    }

    /// Diffuse and advect density through the current velocity field.
    pub fn density_step(&mut self) {
        let SolverParams { dt, diff, diffuse_iter, .. } = self.params;
        let g = &self.geometry;
        let s = &mut self.state;

        s.density.add_source(dt);
        s.density.swap();
        {
            let (x, x0) = s.density.split_mut();
            diffuse(FieldKind::Scalar, x, x0, diff, dt, diffuse_iter, g);
        }
        s.density.swap();
        {
            let (d, d0) = s.density.split_mut();
            advect(FieldKind::Scalar, d, d0, s.ur.current(), s.utheta.current(), dt, g);
        }
    }

    /// One full frame: velocity, then density, then consume the forcing buffers.
    pub fn frame_step(&mut self) {
        self.velocity_step();
        self.density_step();
        self.state.clear_sources();
        self.frame += 1;
        log::trace!("frame {} complete", self.frame);
    }

    /// Copy current fields into a pre-allocated snapshot.
    pub fn snapshot_into(&self, dst: &mut FrameSnapshot) {
        debug_assert_eq!(dst.geometry, self.geometry);
        self.state.snapshot_into(dst);
    }

    /// Back to rest: all fields zeroed, frame counter cleared.
    pub fn reset(&mut self) {
        self.state = SimState::new(&self.geometry);
        self.frame = 0;
    }
}
