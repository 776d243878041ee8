/// A location in the house as `(row, col)`.
pub type Position = (usize, usize);

/// Docking station glyph used by coordinate dialect house files.
pub const COORDINATE_DOCKING_STATION: char = '@';
/// Docking station glyph used by letter dialect house files.
pub const LETTER_DOCKING_STATION: char = 'D';
/// Wall glyph used by letter dialect house files.
pub const LETTER_WALL: char = 'W';

const CLEAR_BLOCK: char = ' ';
const ZERO_DIRT: char = '0';

/// A single block of the house grid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cell {
    Empty,
    /// A wall or any other obstacle, drawn with the glyph it was parsed from.
    Wall(char),
    /// Dirt level between 1 and 9.
    Dirt(u8),
    /// The docking station, drawn with the glyph it was parsed from.
    DockingStation(char),
}

impl Cell {
    /// Parses a block of a coordinate dialect house.
    ///
    /// Unknown glyphs are kept as obstacles so the house is drawn as written.
    pub fn from_coordinate_char(value: char) -> Cell {
        match value {
            COORDINATE_DOCKING_STATION => Cell::DockingStation(value),
            // Zero dirt is a clear block
            CLEAR_BLOCK | ZERO_DIRT => Cell::Empty,
            '1'..='9' => Cell::Dirt(value as u8 - b'0'),
            _ => Cell::Wall(value),
        }
    }

    /// Parses a block of a letter dialect house.
    ///
    /// Spaces and any unknown characters are clear blocks.
    pub fn from_letter_char(value: char) -> Cell {
        match value {
            LETTER_DOCKING_STATION => Cell::DockingStation(value),
            LETTER_WALL => Cell::Wall(value),
            '1'..='9' => Cell::Dirt(value as u8 - b'0'),
            _ => Cell::Empty,
        }
    }

    pub fn char(&self) -> char {
        match self {
            Cell::Empty => CLEAR_BLOCK,
            Cell::Wall(glyph) | Cell::DockingStation(glyph) => *glyph,
            Cell::Dirt(level) => (b'0' + level) as char,
        }
    }

    pub fn dirt_level(&self) -> Option<u8> {
        match self {
            Cell::Dirt(level) => Some(*level),
            _ => None,
        }
    }

    pub fn is_docking_station(&self) -> bool {
        matches!(self, Cell::DockingStation(_))
    }

    /// Returns the cell after one cleaning pass.
    /// Dirt drops by one level and the last level leaves a clear block.
    pub fn cleaned(self) -> Cell {
        match self {
            Cell::Dirt(level) if level > 1 => Cell::Dirt(level - 1),
            Cell::Dirt(_) => Cell::Empty,
            other => other,
        }
    }
}

/// Represents the direction the robot can move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// The `(row, col)` offset of a single step in this direction.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

/// A single recorded robot action.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    /// Move to an explicit location, as recorded by the coordinate dialect.
    MoveTo(Position),
    Move(Direction),
    Stay,
    /// The robot reported it is done. Replayed like a stay.
    Finish,
}

impl Action {
    /// Parses a letter dialect step code.
    pub fn from_code(code: char) -> Option<Action> {
        match code {
            'N' => Some(Action::Move(Direction::North)),
            'E' => Some(Action::Move(Direction::East)),
            'S' => Some(Action::Move(Direction::South)),
            'W' => Some(Action::Move(Direction::West)),
            's' => Some(Action::Stay),
            'F' => Some(Action::Finish),
            _ => None,
        }
    }

    /// The `(row, col)` offset of this action, `None` for explicit targets.
    pub fn delta(&self) -> Option<(isize, isize)> {
        match self {
            Action::MoveTo(_) => None,
            Action::Move(direction) => Some(direction.delta()),
            Action::Stay | Action::Finish => Some((0, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_parsing_coordinate_blocks_zero_dirt_is_a_clear_block() {
        assert_eq!(Cell::from_coordinate_char('0'), Cell::Empty);
        assert_eq!(Cell::from_coordinate_char(' '), Cell::Empty);
        assert_eq!(Cell::from_coordinate_char('7'), Cell::Dirt(7));
        assert_eq!(Cell::from_coordinate_char('@'), Cell::DockingStation('@'));
        assert_eq!(Cell::from_coordinate_char('#'), Cell::Wall('#'));
    }

    #[test]
    fn when_parsing_letter_blocks_unknown_characters_are_clear_blocks() {
        assert_eq!(Cell::from_letter_char('D'), Cell::DockingStation('D'));
        assert_eq!(Cell::from_letter_char('W'), Cell::Wall('W'));
        assert_eq!(Cell::from_letter_char('0'), Cell::Empty);
        assert_eq!(Cell::from_letter_char('3'), Cell::Dirt(3));
        assert_eq!(Cell::from_letter_char('x'), Cell::Empty);
    }

    #[test]
    fn when_cleaning_a_cell_the_dirt_level_drops_by_one() {
        assert_eq!(Cell::Dirt(5).cleaned(), Cell::Dirt(4));
        assert_eq!(Cell::Dirt(1).cleaned(), Cell::Empty);
        assert_eq!(Cell::Wall('W').cleaned(), Cell::Wall('W'));
        assert_eq!(Cell::DockingStation('D').cleaned(), Cell::DockingStation('D'));
    }

    #[test]
    fn when_drawing_a_cell_the_parsed_glyph_is_returned() {
        assert_eq!(Cell::Dirt(9).char(), '9');
        assert_eq!(Cell::Empty.char(), ' ');
        assert_eq!(Cell::Wall('%').char(), '%');
    }

    #[test]
    fn when_parsing_step_codes_each_code_maps_to_its_delta() {
        let deltas: Vec<_> = "NSEWsF"
            .chars()
            .map(|code| Action::from_code(code).unwrap().delta().unwrap())
            .collect();

        assert_eq!(deltas, vec![(-1, 0), (1, 0), (0, 1), (0, -1), (0, 0), (0, 0)]);
        assert!(Action::from_code('x').is_none());
        assert!(Action::MoveTo((1, 2)).delta().is_none());
    }
}
