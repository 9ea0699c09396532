use thiserror::Error;

/// Rejections raised while building a simulation or loading its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must have at least one interior cell in each direction (nr={nr}, ntheta={ntheta})")]
    EmptyGrid { nr: usize, ntheta: usize },

    #[error("inner radius must be positive, got r_min={0}")]
    NonPositiveInnerRadius(f32),

    #[error("outer radius must exceed inner radius (r_min={r_min}, r_max={r_max})")]
    InvertedRadii { r_min: f32, r_max: f32 },

    #[error("time step must be positive, got dt={0}")]
    NonPositiveTimeStep(f32),

    #[error("{name} must be non-negative, got {value}")]
    NegativeCoefficient { name: &'static str, value: f32 },

    #[error("{name} must be finite")]
    NonFinite { name: &'static str },

    #[error("buffer holds {actual} values but the grid needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failures of the interactive or headless host loop.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("window: {0}")]
    Window(#[from] minifb::Error),

    #[error("{field} became non-finite at cell ({i}, {j}) after frame {frame}")]
    NonFinite { field: &'static str, frame: u64, i: usize, j: usize },

    #[error("--config needs a path")]
    MissingConfigPath,
}
