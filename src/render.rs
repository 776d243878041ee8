use crate::entities::Cell;
use crate::game::{Frame, PlaybackSummary};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
    terminal::{Clear, ClearType},
};
use std::io::{self, stdout, Stdout, Write};

/// Presents replay frames. The replay itself never touches the terminal.
pub trait Renderer {
    /// One-time setup, called before the first frame.
    fn init(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()>;

    /// Shows an informational line of the robot log.
    #[allow(unused_variables)]
    fn note(&mut self, text: &str) -> io::Result<()> {
        Ok(())
    }

    #[allow(unused_variables)]
    fn finish(&mut self, summary: &PlaybackSummary) -> io::Result<()> {
        Ok(())
    }
}

struct CellStyle {
    foreground: Color,
    background: Color,
    bold: bool,
}

const REGULAR_STYLE: CellStyle = CellStyle {
    foreground: Color::Grey,
    background: Color::Black,
    bold: false,
};

const ROBOT_STYLE: CellStyle = CellStyle {
    foreground: Color::Black,
    background: Color::DarkYellow,
    bold: false,
};

const CHARGING_STYLE: CellStyle = CellStyle {
    foreground: Color::Grey,
    background: Color::DarkGreen,
    bold: true,
};

fn cell_style(is_robot: bool, charging: bool) -> &'static CellStyle {
    match (is_robot, charging) {
        (false, _) => &REGULAR_STYLE,
        (true, false) => &ROBOT_STYLE,
        (true, true) => &CHARGING_STYLE,
    }
}

/// Formats the battery level without a decimal point when it is a whole number.
pub fn format_battery(battery: f64) -> String {
    if battery.fract() == 0.0 {
        format!("{}", battery as i64)
    } else {
        format!("{}", battery)
    }
}

/// Draws frames as colored blocks on a terminal.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout() -> TerminalRenderer<Stdout> {
        TerminalRenderer::new(stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> TerminalRenderer<W> {
        TerminalRenderer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_cell(&mut self, cell: Cell, style: &CellStyle) -> io::Result<()> {
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.out,
            SetForegroundColor(style.foreground),
            SetBackgroundColor(style.background),
            Print(cell.char()),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn init(&mut self) -> io::Result<()> {
        queue!(self.out, Hide, Print("Start\n"))?;
        self.out.flush()
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0), Print("\n\n"))?;

        let house = &frame.house;
        for row in 0..house.height() {
            queue!(self.out, Print('\t'))?;
            for col in 0..house.width() {
                let cell = house.get(row, col).copied().unwrap_or(Cell::Empty);
                let style = cell_style(frame.position == (row, col), frame.charging);
                self.draw_cell(cell, style)?;
            }
            queue!(self.out, Print('\n'))?;
        }
        queue!(self.out, Print('\n'))?;

        if frame.charging {
            queue!(self.out, Print("\t[ Charging ]\n"))?;
        }
        queue!(
            self.out,
            Print(format!(
                "\tBattery: {}/{}\n",
                format_battery(frame.battery),
                frame.max_battery
            )),
            Print(format!("\tStep: {}/{}\n\n", frame.step, frame.max_steps))
        )?;

        self.out.flush()
    }

    fn note(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text), Print('\n'))?;
        self.out.flush()
    }

    fn finish(&mut self, summary: &PlaybackSummary) -> io::Result<()> {
        queue!(
            self.out,
            Show,
            Print(format!(
                "\tFinished after {} steps with {} dirt left\n",
                summary.steps, summary.dirt_left
            ))
        )?;
        self.out.flush()
    }
}
