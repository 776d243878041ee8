use crate::entities::{Action, Cell, Position};
use crate::error::ScenarioError;
use crate::map::House;
use log::{debug, info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::mem;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

const MAX_ROBOT_STEPS: &str = "max_robot_steps";
const MAX_BATTERY_STEPS: &str = "max_battery_steps";
const HOUSE_MARKER: &str = "house";
const STEP_MARKER: &str = "[STEP]";

const MAX_STEPS: &str = "MaxSteps";
const MAX_BATTERY: &str = "MaxBattery";
const ROWS: &str = "Rows";
const COLS: &str = "Cols";
const NUM_STEPS: &str = "NumSteps";
const DIRT_LEFT: &str = "DirtLeft";
const STATUS: &str = "Status";
const IN_DOCK: &str = "InDock";
const SCORE: &str = "Score";
const STEPS_SECTION: &str = "Steps:";
const PARAMETER_DELIMITER: char = '=';

/// Largest accepted `Rows` or `Cols` value, the range of a 32-bit signed integer.
const MAX_DIMENSION: usize = i32::MAX as usize;

static STEP_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]+),([0-9]+)\)").expect("step target pattern is valid"));

/// The two supported house and robot log formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
pub enum Dialect {
    /// `key value` house headers and `[STEP] ... (row,col)` log lines.
    Coordinate,
    /// `Key = Value` headers and a `Steps:` section of single letter codes.
    Letter,
}

impl Dialect {
    /// Picks the dialect from the robot log, letter logs always carry a `Steps:` section.
    pub fn detect(log_contents: &str) -> Dialect {
        if log_contents
            .lines()
            .any(|line| line.trim() == STEPS_SECTION)
        {
            Dialect::Letter
        } else {
            Dialect::Coordinate
        }
    }
}

/// One line of meaning in a robot log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LogEntry {
    Action(Action),
    /// Informational text that is shown as is between frames.
    Note(String),
}

/// Everything needed to replay a run: limits, initial house and the recorded log.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub max_steps: usize,
    pub max_battery: usize,
    /// Start location of the robot, also where it charges.
    pub docking_station: Position,
    pub house: House,
    pub log: Vec<LogEntry>,
}

impl Scenario {
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.log.iter().filter_map(|entry| match entry {
            LogEntry::Action(action) => Some(action),
            LogEntry::Note(_) => None,
        })
    }
}

/// Mission status reported at the end of a letter dialect log.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
pub enum MissionStatus {
    Finished,
    Working,
    Dead,
}

impl FromStr for MissionStatus {
    type Err = ScenarioError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "FINISHED" => Ok(MissionStatus::Finished),
            "WORKING" => Ok(MissionStatus::Working),
            "DEAD" => Ok(MissionStatus::Dead),
            _ => Err(ScenarioError::InvalidStatus(value.to_string())),
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            MissionStatus::Finished => "FINISHED",
            MissionStatus::Working => "WORKING",
            MissionStatus::Dead => "DEAD",
        };
        write!(f, "{}", status)
    }
}

/// The statistics block written ahead of the steps in a letter dialect log.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RobotLogSummary {
    pub num_steps: usize,
    pub dirt_left: usize,
    pub status: MissionStatus,
    pub in_dock: Option<bool>,
    pub score: Option<usize>,
}

/// A scenario together with what its dialect additionally records.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedScenario {
    Coordinate(Scenario),
    Letter {
        scenario: Scenario,
        house_name: String,
        summary: RobotLogSummary,
    },
}

impl ParsedScenario {
    /// Parses a house file and a robot log written in the given dialect.
    pub fn parse(
        dialect: Dialect,
        house_contents: &str,
        log_contents: &str,
    ) -> Result<ParsedScenario, ScenarioError> {
        debug!("Parsing scenario as {:?} dialect", dialect);

        let parsed = match dialect {
            Dialect::Coordinate => ParsedScenario::Coordinate(parse_coordinate(
                house_contents,
                log_contents,
            )?),
            Dialect::Letter => parse_letter(house_contents, log_contents)?,
        };

        let scenario = parsed.scenario();
        info!(
            "Loaded {}x{} house with docking station at {:?}, {} steps recorded",
            scenario.house.height(),
            scenario.house.width(),
            scenario.docking_station,
            scenario.actions().count()
        );

        Ok(parsed)
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            ParsedScenario::Coordinate(_) => Dialect::Coordinate,
            ParsedScenario::Letter { .. } => Dialect::Letter,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        match self {
            ParsedScenario::Coordinate(scenario) => scenario,
            ParsedScenario::Letter { scenario, .. } => scenario,
        }
    }

    pub fn into_scenario(self) -> Scenario {
        match self {
            ParsedScenario::Coordinate(scenario) => scenario,
            ParsedScenario::Letter { scenario, .. } => scenario,
        }
    }

    /// The statistics recorded by the robot, only letter dialect logs carry them.
    pub fn summary(&self) -> Option<&RobotLogSummary> {
        match self {
            ParsedScenario::Coordinate(_) => None,
            ParsedScenario::Letter { summary, .. } => Some(summary),
        }
    }
}

/// Reads and parses a house file and a robot log.
///
/// # Arguments
/// * `dialect` - The dialect of both files. If `None`, it is detected from the robot log.
/// * `house_file` - The path to the house file.
/// * `log_file` - The path to the robot log.
pub fn load(
    dialect: Option<Dialect>,
    house_file: &Path,
    log_file: &Path,
) -> Result<ParsedScenario, ScenarioError> {
    let house_contents = read(house_file)?;
    let log_contents = read(log_file)?;
    let dialect = dialect.unwrap_or_else(|| Dialect::detect(&log_contents));

    ParsedScenario::parse(dialect, &house_contents, &log_contents)
}

fn read(path: &Path) -> Result<String, ScenarioError> {
    fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_coordinate(house_contents: &str, log_contents: &str) -> Result<Scenario, ScenarioError> {
    let mut max_steps = None;
    let mut max_battery = None;
    let mut rows = Vec::new();

    for line in house_contents.lines() {
        if line.starts_with(MAX_ROBOT_STEPS) {
            max_steps = Some(coordinate_parameter(MAX_ROBOT_STEPS, line)?);
        } else if line.starts_with(MAX_BATTERY_STEPS) {
            max_battery = Some(coordinate_parameter(MAX_BATTERY_STEPS, line)?);
        } else if line.starts_with(HOUSE_MARKER) {
            continue;
        } else {
            rows.push(line);
        }
    }

    let max_steps = max_steps.ok_or_else(|| missing(MAX_ROBOT_STEPS))?;
    let max_battery = max_battery.ok_or_else(|| missing(MAX_BATTERY_STEPS))?;
    let (house, docking_station) = House::parse_coordinate(&rows)?;

    let log = log_contents
        .lines()
        .enumerate()
        .map(|(index, line)| {
            if !line.starts_with(STEP_MARKER) {
                return Ok(LogEntry::Note(line.to_string()));
            }
            step_target(line)
                .map(|target| LogEntry::Action(Action::MoveTo(target)))
                .ok_or_else(|| ScenarioError::InvalidStep {
                    line: index + 1,
                    detail: format!("no valid (row,col) target in '{}'", line),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scenario {
        max_steps,
        max_battery,
        docking_station,
        house,
        log,
    })
}

fn coordinate_parameter(name: &str, line: &str) -> Result<usize, ScenarioError> {
    let value = line.split_whitespace().nth(1).unwrap_or_default();
    unsigned(name, value)
}

/// Targets beyond `isize::MAX` cannot be addressed and are rejected.
fn step_target(line: &str) -> Option<Position> {
    let captures = STEP_TARGET.captures(line)?;
    let row = captures.get(1)?.as_str().parse::<isize>().ok()?;
    let col = captures.get(2)?.as_str().parse::<isize>().ok()?;
    Some((row as usize, col as usize))
}

fn parse_letter(house_contents: &str, log_contents: &str) -> Result<ParsedScenario, ScenarioError> {
    let mut lines = house_contents.lines();

    // The first line is the internal name of the house
    let house_name = lines.next().unwrap_or_default().trim().to_string();
    let max_steps = letter_parameter(lines.next(), MAX_STEPS)?;
    let max_battery = letter_parameter(lines.next(), MAX_BATTERY)?;
    let rows = letter_dimension(lines.next(), ROWS)?;
    let cols = letter_dimension(lines.next(), COLS)?;
    let grid_bytes = rows
        .checked_mul(cols)
        .and_then(|cells| cells.checked_mul(mem::size_of::<Cell>()));
    if grid_bytes.map_or(true, |bytes| bytes > isize::MAX as usize) {
        return Err(invalid(
            &format!("{} x {}", ROWS, COLS),
            &format!("{} x {}", rows, cols),
        ));
    }
    let (house, docking_station) = House::parse_letter(cols, rows, lines)?;

    let (summary, actions) = parse_robot_log(log_contents)?;

    Ok(ParsedScenario::Letter {
        scenario: Scenario {
            max_steps,
            max_battery,
            docking_station,
            house,
            log: actions.into_iter().map(LogEntry::Action).collect(),
        },
        house_name,
        summary,
    })
}

/// Reads a `Key = Value` line that must hold the parameter `name`.
fn letter_parameter(line: Option<&str>, name: &str) -> Result<usize, ScenarioError> {
    let (key, value) = line
        .and_then(|line| line.split_once(PARAMETER_DELIMITER))
        .ok_or_else(|| missing(name))?;

    if key.trim() != name {
        return Err(missing(name));
    }

    unsigned(name, value.trim())
}

fn letter_dimension(line: Option<&str>, name: &str) -> Result<usize, ScenarioError> {
    let value = letter_parameter(line, name)?;
    if value > MAX_DIMENSION {
        return Err(invalid(name, &value.to_string()));
    }
    Ok(value)
}

fn parse_robot_log(log_contents: &str) -> Result<(RobotLogSummary, Vec<Action>), ScenarioError> {
    let mut fields = HashMap::new();
    let mut lines = log_contents.lines().enumerate();

    let mut found_steps = false;
    for (_, line) in lines.by_ref() {
        if line.trim() == STEPS_SECTION {
            found_steps = true;
            break;
        }
        if let Some((key, value)) = line.split_once(PARAMETER_DELIMITER) {
            fields.insert(key.trim(), value.trim());
        }
    }

    if !found_steps {
        return Err(ScenarioError::MissingSteps);
    }

    let mut actions = Vec::new();
    for (index, line) in lines {
        for code in line.chars().filter(|code| !code.is_whitespace()) {
            let action = Action::from_code(code).ok_or_else(|| ScenarioError::InvalidStep {
                line: index + 1,
                detail: format!("unknown step code '{}'", code),
            })?;
            actions.push(action);
        }
    }

    let summary = RobotLogSummary {
        num_steps: unsigned(NUM_STEPS, required(&fields, NUM_STEPS)?)?,
        dirt_left: unsigned(DIRT_LEFT, required(&fields, DIRT_LEFT)?)?,
        status: required(&fields, STATUS)?.parse()?,
        in_dock: fields
            .get(IN_DOCK)
            .map(|value| match *value {
                "TRUE" => Ok(true),
                "FALSE" => Ok(false),
                _ => Err(invalid(IN_DOCK, value)),
            })
            .transpose()?,
        score: fields
            .get(SCORE)
            .map(|value| unsigned(SCORE, value))
            .transpose()?,
    };

    // The finish code is not counted as a step by the robot
    let moves = actions
        .iter()
        .filter(|action| **action != Action::Finish)
        .count();
    if summary.num_steps != moves {
        warn!(
            "Robot log reports {} steps but records {}",
            summary.num_steps, moves
        );
    }

    Ok((summary, actions))
}

fn required<'a>(fields: &HashMap<&str, &'a str>, name: &str) -> Result<&'a str, ScenarioError> {
    fields.get(name).copied().ok_or_else(|| missing(name))
}

fn unsigned(name: &str, value: &str) -> Result<usize, ScenarioError> {
    value.parse().map_err(|_| invalid(name, value))
}

fn missing(name: &str) -> ScenarioError {
    ScenarioError::MissingParameter {
        name: name.to_string(),
    }
}

fn invalid(name: &str, value: &str) -> ScenarioError {
    ScenarioError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    }
}
