use std::path::{Path, PathBuf};
use vacuum_replay::{
    frames, play, scenario, Cell, Dialect, Frame, FrameLogger, MissionStatus, ParsedScenario,
    PlaybackConfig, PlaybackSummary, ReplayError, Renderer,
};

fn test_data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test_data")
        .join(name)
}

fn load(house: &str, log: &str) -> ParsedScenario {
    scenario::load(None, &test_data(house), &test_data(log)).unwrap()
}

/// The frames after each step of `[E, W, s]` on the house `["D1", "11"]`.
fn assert_two_by_two_run(frames: &[Frame]) {
    assert_eq!(frames.len(), 4);

    assert_eq!(frames[0].position, (0, 0));
    assert_eq!(frames[0].battery, 20.0);

    assert_eq!(frames[1].position, (0, 1));
    assert_eq!(frames[1].battery, 19.0);
    assert_eq!(frames[1].house.get(0, 1), Some(&Cell::Dirt(1)));
    assert!(!frames[1].charging);

    assert_eq!(frames[2].position, (0, 0));
    assert_eq!(frames[2].battery, 18.0);
    assert!(!frames[2].charging);

    assert_eq!(frames[3].position, (0, 0));
    assert_eq!(frames[3].battery, 19.0);
    assert_eq!(frames[3].step, 3);
    assert!(frames[3].charging);
}

#[test]
fn test_letter_scenario_replays_moves_and_recharge() {
    let parsed = load("letter_house.txt", "letter_log.txt");

    assert_eq!(parsed.dialect(), Dialect::Letter);
    assert_eq!(parsed.summary().unwrap().status, MissionStatus::Working);
    assert_two_by_two_run(&frames(parsed.scenario()).unwrap());
}

#[test]
fn test_coordinate_scenario_replays_moves_and_recharge() {
    let parsed = load("coordinate_house.txt", "coordinate_log.txt");

    assert_eq!(parsed.dialect(), Dialect::Coordinate);
    assert_eq!(parsed.scenario().docking_station, (0, 0));
    assert_two_by_two_run(&frames(parsed.scenario()).unwrap());
}

#[test]
fn test_both_dialects_produce_the_same_robot_states() {
    let letter = load("letter_house.txt", "letter_log.txt");
    let coordinate = load("coordinate_house.txt", "coordinate_log.txt");

    let letter_frames = frames(letter.scenario()).unwrap();
    let coordinate_frames = frames(coordinate.scenario()).unwrap();

    let states = |frames: &[Frame]| -> Vec<_> {
        frames
            .iter()
            .map(|frame| (frame.position, frame.battery, frame.charging, frame.house.dirt_left()))
            .collect()
    };
    assert_eq!(states(&letter_frames), states(&coordinate_frames));
}

#[test]
fn test_forcing_a_dialect_overrides_detection() {
    let result = scenario::load(
        Some(Dialect::Letter),
        &test_data("coordinate_house.txt"),
        &test_data("coordinate_log.txt"),
    );

    assert!(result.is_err());
}

#[derive(Default)]
struct FrameCounter {
    frames: usize,
    notes: Vec<String>,
}

impl Renderer for FrameCounter {
    fn draw(&mut self, _frame: &Frame) -> std::io::Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn note(&mut self, text: &str) -> std::io::Result<()> {
        self.notes.push(text.to_string());
        Ok(())
    }
}

struct NoLog;
impl FrameLogger for NoLog {}

#[test]
fn test_playing_a_coordinate_log_draws_one_frame_per_step_and_passes_notes_through() {
    let parsed = load("coordinate_house.txt", "coordinate_log.txt");
    let mut renderer = FrameCounter::default();
    let config = PlaybackConfig::new(10_000.0).unwrap();

    let summary = play(&parsed, &mut renderer, &mut NoLog, &config).unwrap();

    assert_eq!(renderer.frames, 4);
    assert_eq!(renderer.notes, vec!["Robot started", "Robot finished"]);
    assert_eq!(
        summary,
        PlaybackSummary {
            frames: 4,
            steps: 3,
            battery: 19.0,
            dirt_left: 3,
        }
    );
}

#[test]
fn test_playing_a_log_that_leaves_the_house_stops_at_the_offending_step() {
    let parsed = load("out_of_bounds_house.txt", "out_of_bounds_log.txt");
    let mut renderer = FrameCounter::default();
    let config = PlaybackConfig::new(10_000.0).unwrap();

    let result = play(&parsed, &mut renderer, &mut NoLog, &config);

    assert!(matches!(
        result,
        Err(ReplayError::OutOfBounds {
            step: 2,
            row: 1,
            col: 1,
            rows: 1,
            cols: 2
        })
    ));
    assert_eq!(renderer.frames, 2);
}
