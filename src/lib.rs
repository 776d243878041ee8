//! # vacuum_replay
//!
//! Replays a recorded cleaning robot run in the terminal.
//! Reads a house file and the robot's step log, then draws the house frame by frame
//! with the robot position, battery level and the dirt left behind.

pub mod config;
pub mod error;
pub mod game;
pub mod render;
pub mod replay;
pub mod scenario;
pub use config::PlaybackConfig;
pub use entities::{Action, Cell, Direction, Position};
pub use error::{ConfigError, ReplayError, ScenarioError};
pub use game::{frames, play, Frame, PlaybackSummary, Replay, SimulationState};
pub use map::House;
pub use render::{format_battery, Renderer, TerminalRenderer};
pub use replay::{create_frame_logger, FrameLogger};
pub use scenario::{Dialect, LogEntry, MissionStatus, ParsedScenario, RobotLogSummary, Scenario};

mod entities;
mod map;
