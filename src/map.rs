use crate::entities::{Cell, Position};
use crate::error::ScenarioError;
use log::warn;

/// The house grid. Dimensions are fixed once parsed; only cell contents change.
#[derive(Clone, Debug, PartialEq)]
pub struct House {
    width: usize,
    height: usize,
    grid: Vec<Cell>,
}

impl House {
    /// Parses the grid rows of a coordinate dialect house file.
    ///
    /// Rows may have different lengths, shorter ones are padded with clear blocks.
    /// The docking station is the first `@` of the first row containing one.
    pub fn parse_coordinate(rows: &[&str]) -> Result<(House, Position), ScenarioError> {
        // Blank lines at the end of the file are not part of the house
        let used = rows
            .iter()
            .rposition(|row| !row.is_empty())
            .map_or(0, |last| last + 1);
        let rows = &rows[..used];

        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut house = House::new(width, rows.len());

        rows.iter().enumerate().for_each(|(row, line)| {
            line.chars().enumerate().for_each(|(col, value)| {
                house.set(row, col, Cell::from_coordinate_char(value));
            });
        });

        let docking_stations = house.docking_stations();
        let docking_station = *docking_stations
            .first()
            .ok_or(ScenarioError::MissingDockingStation)?;

        if docking_stations.len() > 1 {
            warn!(
                "House has {} docking stations, starting from the first one at {:?}",
                docking_stations.len(),
                docking_station
            );
        }

        Ok((house, docking_station))
    }

    /// Parses the grid rows of a letter dialect house file.
    ///
    /// Only the first `height` rows and `width` columns are read and missing blocks are clear.
    /// Exactly one docking station must be present.
    pub fn parse_letter<'a>(
        width: usize,
        height: usize,
        rows: impl Iterator<Item = &'a str>,
    ) -> Result<(House, Position), ScenarioError> {
        let mut house = House::new(width, height);

        rows.take(height).enumerate().for_each(|(row, line)| {
            line.chars().take(width).enumerate().for_each(|(col, value)| {
                house.set(row, col, Cell::from_letter_char(value));
            });
        });

        match house.docking_stations().as_slice() {
            [] => Err(ScenarioError::MissingDockingStation),
            [docking_station] => Ok((house, *docking_station)),
            [first, second, ..] => Err(ScenarioError::MultipleDockingStations {
                first: *first,
                second: *second,
            }),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if !self.contains(row, col) {
            return None;
        }
        self.grid.get(row * self.width + col)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        if !self.contains(row, col) {
            return None;
        }
        self.grid.get_mut(row * self.width + col)
    }

    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        self.grid[row * self.width + col] = value;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Docking station locations in row-major order.
    pub fn docking_stations(&self) -> Vec<Position> {
        self.all(Cell::is_docking_station)
    }

    /// Total dirt left in the house, the sum of all dirt levels.
    pub fn dirt_left(&self) -> usize {
        self.grid
            .iter()
            .filter_map(Cell::dirt_level)
            .map(usize::from)
            .sum()
    }

    /// The grid as one string per row, the way it is drawn.
    pub fn rows(&self) -> Vec<String> {
        self.grid
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(Cell::char).collect())
            .collect()
    }

    fn new(width: usize, height: usize) -> House {
        House {
            width,
            height,
            grid: vec![Cell::Empty; width * height],
        }
    }

    fn all(&self, filter: fn(&Cell) -> bool) -> Vec<Position> {
        self.grid
            .iter()
            .enumerate()
            .filter(|(_, cell)| filter(cell))
            .map(|(index, _)| (index / self.width, index % self.width))
            .collect()
    }
}
