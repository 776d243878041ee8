use crate::entities::Position;
use std::path::PathBuf;

/// Errors raised while reading a house file or a robot log.
/// All of them abort before the first frame is drawn.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("missing {name} parameter in house file")]
    MissingParameter { name: String },

    #[error("parameter {name} has an invalid value '{value}'")]
    InvalidParameter { name: String, value: String },

    #[error("missing docking station in house file")]
    MissingDockingStation,

    #[error("more than one docking station in house file, at {first:?} and {second:?}")]
    MultipleDockingStations { first: Position, second: Position },

    #[error("invalid step on robot log line {line}: {detail}")]
    InvalidStep { line: usize, detail: String },

    #[error("missing 'Steps:' section in robot log")]
    MissingSteps,

    #[error("invalid mission status '{0}'")]
    InvalidStatus(String),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised while replaying a parsed scenario.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("step {step} moves the robot to ({row}, {col}), outside of the {rows}x{cols} house")]
    OutOfBounds {
        step: usize,
        row: isize,
        col: isize,
        rows: usize,
        cols: usize,
    },

    #[error("could not draw frame: {0}")]
    Render(#[from] std::io::Error),

    #[error("could not export frames to {path}: {detail}")]
    Export { path: PathBuf, detail: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("frame rate must be a positive number, got {0}")]
    InvalidFps(f64),
}
