use crate::entities::Position;
use crate::error::ReplayError;
use crate::game::Frame;
use crate::scenario::{Dialect, ParsedScenario, RobotLogSummary};
use log::debug;
use serde_json::{json, Value};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use uuid::Uuid;

pub fn create_frame_logger(
    filename: Option<PathBuf>,
    parsed: &ParsedScenario,
) -> Box<dyn FrameLogger> {
    match filename {
        None => Box::new(NoOpFrameLogger {}),
        Some(filename) => Box::new(JsonFrameLogger::new(filename, parsed)),
    }
}

pub trait FrameLogger {
    #[allow(unused_variables)]
    fn log_frame(&mut self, frame: &Frame) {}

    #[allow(unused_variables)]
    fn log_note(&mut self, after_step: usize, text: &str) {}

    fn clear(&mut self) {}

    fn save(&mut self) -> Result<(), ReplayError> {
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct Note {
    after_step: usize,
    text: String,
}

struct NoOpFrameLogger;
impl FrameLogger for NoOpFrameLogger {}

struct JsonFrameLogger {
    filename: PathBuf,
    run_id: String,
    dialect: Dialect,
    max_steps: usize,
    max_battery: usize,
    docking_station: Position,
    summary: Option<RobotLogSummary>,
    frames: Vec<Value>,
    notes: Vec<Note>,
}

impl JsonFrameLogger {
    pub fn new(filename: PathBuf, parsed: &ParsedScenario) -> JsonFrameLogger {
        let scenario = parsed.scenario();

        JsonFrameLogger {
            filename,
            run_id: Uuid::new_v4().to_string(),
            dialect: parsed.dialect(),
            max_steps: scenario.max_steps,
            max_battery: scenario.max_battery,
            docking_station: scenario.docking_station,
            summary: parsed.summary().cloned(),
            frames: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn document(&self) -> Value {
        json!({
            "run_id": self.run_id,
            "dialect": self.dialect,
            "max_steps": self.max_steps,
            "max_battery": self.max_battery,
            "docking_station": self.docking_station,
            "summary": self.summary,
            "frames": self.frames,
            "notes": self.notes,
        })
    }

    fn export_error(&self, detail: impl ToString) -> ReplayError {
        ReplayError::Export {
            path: self.filename.clone(),
            detail: detail.to_string(),
        }
    }
}

impl FrameLogger for JsonFrameLogger {
    fn log_frame(&mut self, frame: &Frame) {
        self.frames.push(json!({
            "step": frame.step,
            "position": frame.position,
            "battery": frame.battery,
            "charging": frame.charging,
            "grid": frame.house.rows(),
        }));
    }

    fn log_note(&mut self, after_step: usize, text: &str) {
        self.notes.push(Note {
            after_step,
            text: text.to_string(),
        });
    }

    fn clear(&mut self) {
        self.frames.clear();
        self.notes.clear();
    }

    fn save(&mut self) -> Result<(), ReplayError> {
        let file = File::create(&self.filename).map_err(|e| self.export_error(e))?;

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &self.document())
            .map_err(|e| self.export_error(e))?;
        writer.flush().map_err(|e| self.export_error(e))?;

        debug!(
            "Exported {} frames to {}",
            self.frames.len(),
            self.filename.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::frames;
    use std::fs;

    const HOUSE: &str = "max_robot_steps 10\nmax_battery_steps 20\nhouse\n@2";
    const LOG: &str = "[STEP] (0,1)\nCleaning\n[STEP] (0,1)";

    fn export_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vacuum_replay_{}_{}.json", name, Uuid::new_v4()))
    }

    #[test]
    fn when_saving_a_json_log_one_entry_is_written_per_frame() {
        let parsed = ParsedScenario::parse(Dialect::Coordinate, HOUSE, LOG).unwrap();
        let path = export_path("frames");
        let mut logger = create_frame_logger(Some(path.clone()), &parsed);

        for frame in frames(parsed.scenario()).unwrap() {
            logger.log_frame(&frame);
        }
        logger.log_note(1, "Cleaning");
        logger.save().unwrap();

        let data: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(data["run_id"].as_str().unwrap().len(), 36);
        assert_eq!(data["dialect"], "Coordinate");
        assert_eq!(data["max_battery"], 20);
        assert_eq!(data["docking_station"], json!([0, 0]));
        assert!(data["summary"].is_null());
        assert_eq!(data["frames"].as_array().unwrap().len(), 3);
        assert_eq!(data["frames"][1]["position"], json!([0, 1]));
        assert_eq!(data["frames"][1]["battery"], 19.0);
        assert_eq!(data["frames"][2]["grid"], json!(["@1"]));
        assert_eq!(data["notes"][0]["after_step"], 1);
        assert_eq!(data["notes"][0]["text"], "Cleaning");
    }

    #[test]
    fn when_clearing_a_json_log_previous_frames_are_dropped() {
        let parsed = ParsedScenario::parse(Dialect::Coordinate, HOUSE, LOG).unwrap();
        let path = export_path("clear");
        let mut logger = create_frame_logger(Some(path.clone()), &parsed);

        for frame in frames(parsed.scenario()).unwrap() {
            logger.log_frame(&frame);
        }
        logger.clear();
        logger.save().unwrap();

        let data: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(data["frames"].as_array().unwrap().is_empty());
    }

    #[test]
    fn when_saving_to_an_unwritable_location_an_export_error_is_returned() {
        let parsed = ParsedScenario::parse(Dialect::Coordinate, HOUSE, LOG).unwrap();
        let mut logger =
            create_frame_logger(Some(PathBuf::from("/nonexistent/dir/frames.json")), &parsed);

        assert!(matches!(logger.save(), Err(ReplayError::Export { .. })));
    }

    #[test]
    fn when_no_filename_is_given_nothing_is_saved() {
        let parsed = ParsedScenario::parse(Dialect::Coordinate, HOUSE, LOG).unwrap();
        let mut logger = create_frame_logger(None, &parsed);

        logger.log_note(0, "ignored");
        assert!(logger.save().is_ok());
    }
}
