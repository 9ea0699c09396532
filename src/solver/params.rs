use std::f32::consts::TAU;

use crate::error::ConfigError;

/// Shape of the annulus: cell counts and radial bounds.
///
/// Fixed for the lifetime of a simulation; changing resolution means building
/// a new `Simulation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarGeometry {
    pub nr: usize,
    pub ntheta: usize,
    pub r_min: f32,
    pub r_max: f32,
}

impl PolarGeometry {
    /// Validate and build a geometry.
    pub fn new(nr: usize, ntheta: usize, r_min: f32, r_max: f32) -> Result<Self, ConfigError> {
        let geometry = Self { nr, ntheta, r_min, r_max };
        geometry.validate()?;
        Ok(geometry)
    }

    /// `r_min` must be strictly positive because both advection and
    /// projection divide by the cell radius.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self { nr, ntheta, r_min, r_max } = *self;
        if nr == 0 || ntheta == 0 {
            return Err(ConfigError::EmptyGrid { nr, ntheta });
        }
        if !r_min.is_finite() {
            return Err(ConfigError::NonFinite { name: "r_min" });
        }
        if !r_max.is_finite() {
            return Err(ConfigError::NonFinite { name: "r_max" });
        }
        if r_min <= 0.0 {
            return Err(ConfigError::NonPositiveInnerRadius(r_min));
        }
        if r_max <= r_min {
            return Err(ConfigError::InvertedRadii { r_min, r_max });
        }
        Ok(())
    }

    /// Radial cell width.
    #[inline]
    pub fn dr(&self) -> f32 {
        (self.r_max - self.r_min) / self.nr as f32
    }

    /// Angular cell width in radians.
    #[inline]
    pub fn dtheta(&self) -> f32 {
        TAU / self.ntheta as f32
    }

    /// Physical radius of the centre of radial row `i` (ghost rows included).
    #[inline]
    pub fn radius(&self, i: usize) -> f32 {
        self.r_min + (i as f32 - 0.5) * self.dr()
    }

    /// Angle of the centre of angular column `j` (ghost columns included).
    #[inline]
    pub fn angle(&self, j: usize) -> f32 {
        (j as f32 - 0.5) * self.dtheta()
    }

    /// Interior cell containing the physical point (r, θ), or `None` outside
    /// the annulus. θ may be any angle.
    pub fn cell_at(&self, r: f32, theta: f32) -> Option<(usize, usize)> {
        if !(self.r_min..=self.r_max).contains(&r) || !theta.is_finite() {
            return None;
        }
        let i = (((r - self.r_min) / self.dr()) as usize + 1).min(self.nr);
        let j = ((theta.rem_euclid(TAU) / self.dtheta()) as usize + 1).min(self.ntheta);
        Some((i, j))
    }

    /// Fold any angular offset from an interior column back into `1..=ntheta`.
    pub fn wrap_j(&self, j: isize) -> usize {
        ((j - 1).rem_euclid(self.ntheta as isize) + 1) as usize
    }

    /// Number of stored values including the ghost ring.
    #[inline]
    pub fn len(&self) -> usize {
        (self.nr + 2) * (self.ntheta + 2)
    }
}

/// Solver coefficients for the fluid simulation.
///
/// `diffuse_iter` and `project_iter` are fixed Gauss-Seidel sweep counts.
/// The solves are never convergence-checked: each step costs the same no
/// matter how far from converged the relaxation is.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParams {
    pub dt: f32,
    pub diff: f32,
    pub visc: f32,
    pub diffuse_iter: usize,
    pub project_iter: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            dt: 0.1,
            diff: 0.0001,
            visc: 0.0001,
            diffuse_iter: 20,
            project_iter: 20,
        }
    }
}

impl SolverParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("dt", self.dt), ("diff", self.diff), ("visc", self.visc)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
        }
        if self.dt <= 0.0 {
            return Err(ConfigError::NonPositiveTimeStep(self.dt));
        }
        if self.diff < 0.0 {
            return Err(ConfigError::NegativeCoefficient { name: "diff", value: self.diff });
        }
        if self.visc < 0.0 {
            return Err(ConfigError::NegativeCoefficient { name: "visc", value: self.visc });
        }
        Ok(())
    }
}
