use crate::config::PlaybackConfig;
use crate::entities::{Action, Cell, Position};
use crate::error::ReplayError;
use crate::map::House;
use crate::render::Renderer;
use crate::replay::FrameLogger;
use crate::scenario::{LogEntry, ParsedScenario, Scenario};
use log::{debug, info, warn};
use std::thread;

/// Steps on the docking station needed to recharge an empty battery.
const CHARGE_RATE_DIVISOR: f64 = 20.0;

/// The mutable state of the robot and the house during a replay.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub position: Position,
    /// Remaining battery. Recharging makes it fractional and a depleted robot
    /// that keeps stepping drives it below zero.
    pub battery: f64,
    pub step: usize,
    pub docking_station: Position,
    pub house: House,
}

/// A snapshot of the replay, emitted once at the start and once after each action.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub house: House,
    pub position: Position,
    pub battery: f64,
    pub step: usize,
    pub max_steps: usize,
    pub max_battery: usize,
    /// Whether the robot stayed on the docking station during the last step.
    pub charging: bool,
}

/// Totals of a finished playback.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackSummary {
    pub frames: usize,
    pub steps: usize,
    pub battery: f64,
    pub dirt_left: usize,
}

/// Replays a recorded robot run one action at a time.
pub struct Replay {
    state: SimulationState,
    max_steps: usize,
    max_battery: usize,
    started: bool,
}

impl Replay {
    /// Creates a replay with the robot fully charged on the docking station.
    pub fn new(scenario: &Scenario) -> Replay {
        Replay {
            state: SimulationState {
                position: scenario.docking_station,
                battery: scenario.max_battery as f64,
                step: 0,
                docking_station: scenario.docking_station,
                house: scenario.house.clone(),
            },
            max_steps: scenario.max_steps,
            max_battery: scenario.max_battery,
            started: false,
        }
    }

    /// Starts the replay and returns the initial frame.
    ///
    /// Must be called once before applying any action.
    pub fn start(&mut self) -> Frame {
        self.started = true;
        self.frame(false)
    }

    /// Applies one recorded action and returns the resulting frame.
    ///
    /// Fails without touching the state if the action leaves the house.
    pub fn update(&mut self, action: &Action) -> Result<Frame, ReplayError> {
        if !self.started {
            panic!("Replay has not started! Call `start` to start the replay.");
        }

        let next_position = self.next_position(action)?;
        let max_battery = self.max_battery as f64;
        let state = &mut self.state;

        let is_stay = next_position == state.position;
        state.position = next_position;
        state.step += 1;

        let on_docking_station = state.position == state.docking_station;
        if is_stay && on_docking_station {
            state.battery = (state.battery + max_battery / CHARGE_RATE_DIVISOR).min(max_battery);
        } else {
            state.battery -= 1.0;
        }

        // Dirt is only cleaned while staying in place
        let (row, col) = state.position;
        if let Some(cell) = state.house.get_mut(row, col) {
            if is_stay && cell.dirt_level().is_some() {
                *cell = cell.cleaned();
            }
        }

        let charging = is_stay
            && on_docking_station
            && state
                .house
                .get(row, col)
                .is_some_and(Cell::is_docking_station);

        debug!(
            "Step {}: {:?} to {:?}, battery {}",
            state.step, action, state.position, state.battery
        );

        Ok(self.frame(charging))
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn dirt_left(&self) -> usize {
        self.state.house.dirt_left()
    }

    fn next_position(&self, action: &Action) -> Result<Position, ReplayError> {
        let (row, col) = match action {
            Action::MoveTo((row, col)) => (
                isize::try_from(*row).unwrap_or(isize::MAX),
                isize::try_from(*col).unwrap_or(isize::MAX),
            ),
            _ => {
                let (row_delta, col_delta) = action.delta().unwrap_or((0, 0));
                (
                    self.state.position.0 as isize + row_delta,
                    self.state.position.1 as isize + col_delta,
                )
            }
        };

        let house = &self.state.house;
        if row < 0 || col < 0 || !house.contains(row as usize, col as usize) {
            return Err(ReplayError::OutOfBounds {
                step: self.state.step + 1,
                row,
                col,
                rows: house.height(),
                cols: house.width(),
            });
        }

        Ok((row as usize, col as usize))
    }

    fn frame(&self, charging: bool) -> Frame {
        Frame {
            house: self.state.house.clone(),
            position: self.state.position,
            battery: self.state.battery,
            step: self.state.step,
            max_steps: self.max_steps,
            max_battery: self.max_battery,
            charging,
        }
    }
}

/// Replays every action of a scenario and collects all frames, the initial one first.
pub fn frames(scenario: &Scenario) -> Result<Vec<Frame>, ReplayError> {
    let mut replay = Replay::new(scenario);
    let mut frames = vec![replay.start()];

    for action in scenario.actions() {
        frames.push(replay.update(action)?);
    }

    Ok(frames)
}

/// Plays a scenario back through a renderer, pausing between frames.
///
/// Notes in the log are forwarded as they are reached. Every frame and note is also
/// given to the frame logger, which is saved even when the replay stops on an error.
pub fn play(
    parsed: &ParsedScenario,
    renderer: &mut dyn Renderer,
    frame_logger: &mut dyn FrameLogger,
    config: &PlaybackConfig,
) -> Result<PlaybackSummary, ReplayError> {
    frame_logger.clear();

    let result = play_log(parsed.scenario(), renderer, frame_logger, config);
    let saved = frame_logger.save();
    let summary = result?;
    saved?;

    if let Some(logged) = parsed.summary() {
        if logged.dirt_left != summary.dirt_left {
            warn!(
                "Robot log reports {} dirt left but the replay leaves {}",
                logged.dirt_left, summary.dirt_left
            );
        }
    }

    renderer.finish(&summary)?;
    info!(
        "Replayed {} steps over {} frames, {} dirt left",
        summary.steps, summary.frames, summary.dirt_left
    );

    Ok(summary)
}

fn play_log(
    scenario: &Scenario,
    renderer: &mut dyn Renderer,
    frame_logger: &mut dyn FrameLogger,
    config: &PlaybackConfig,
) -> Result<PlaybackSummary, ReplayError> {
    renderer.init()?;

    let mut replay = Replay::new(scenario);
    let frame = replay.start();
    renderer.draw(&frame)?;
    frame_logger.log_frame(&frame);
    let mut frames = 1;

    for entry in &scenario.log {
        match entry {
            LogEntry::Note(text) => {
                renderer.note(text)?;
                frame_logger.log_note(replay.state().step, text);
            }
            LogEntry::Action(action) => {
                thread::sleep(config.frame_delay());

                let frame = replay.update(action)?;
                renderer.draw(&frame)?;
                frame_logger.log_frame(&frame);
                frames += 1;
            }
        }
    }

    Ok(PlaybackSummary {
        frames,
        steps: replay.state().step,
        battery: replay.state().battery,
        dirt_left: replay.dirt_left(),
    })
}
