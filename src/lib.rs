//! Stable-fluids smoke on an annular polar grid.
//!
//! [`solver::Simulation`] owns every field and advances one frame per
//! [`solver::Simulation::frame_step`]; hosts queue forcing between frames and
//! read results back through [`state::FrameSnapshot`].

pub mod config;
pub mod error;
pub mod renderer;
pub mod solver;
pub mod state;
