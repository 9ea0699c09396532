use std::f32::consts::TAU;

use super::Simulation;

/// A nozzle orbiting the annulus, puffing density and pushing fluid.
///
/// Writes only into the source buffers through the public forcing API, so it
/// behaves like any other external driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    /// Orbit radius, in the same units as `r_min`/`r_max`.
    pub radius: f32,
    /// Orbit rate in rad/s; negative spins clockwise.
    pub spin: f32,
    /// Starting angle in radians.
    pub phase: f32,
    pub density: f32,
    /// Outward push added to `ur`.
    pub radial_push: f32,
    /// Tangential push added to `utheta`.
    pub swirl: f32,
    /// Half-width of the injected patch, in cells.
    pub spread: usize,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            radius: 0.6,
            spin: 0.5,
            phase: 0.0,
            density: 200.0,
            radial_push: 2.0,
            swirl: 4.0,
            spread: 1,
        }
    }
}

impl Emitter {
    /// Nozzle position (r, θ) at `time`, θ in [0, 2π).
    pub fn position(&self, time: f32) -> (f32, f32) {
        (self.radius, (self.phase + self.spin * time).rem_euclid(TAU))
    }

    /// Queue this frame's injection. Does nothing if the nozzle sits off the grid.
    pub fn apply(&self, sim: &mut Simulation, time: f32) {
        let (r, theta) = self.position(time);
        let geometry = *sim.geometry();
        let Some((ci, cj)) = geometry.cell_at(r, theta) else {
            return;
        };
        let spread = self.spread as isize;
        for dj in -spread..=spread {
            let j = geometry.wrap_j(cj as isize + dj);
            for di in -spread..=spread {
                let i = ci as isize + di;
                if i < 1 || i > geometry.nr as isize {
                    continue;
                }
                let falloff = 1.0 / (1.0 + (di.abs() + dj.abs()) as f32);
                sim.add_density_source(i as usize, j, self.density * falloff);
                sim.add_velocity_source(i as usize, j, self.radial_push * falloff, self.swirl * falloff);
            }
        }
    }
}
