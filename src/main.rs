use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{cursor::Show, execute};
use std::io::{self, Write};
use std::path::PathBuf;
use vacuum_replay::{
    create_frame_logger, play, scenario, Dialect, PlaybackConfig, TerminalRenderer,
};

#[derive(Parser, Debug)]
#[command(name = "vacuum_replay")]
#[command(about = "Visualize a recorded cleaning robot run in the terminal")]
struct Cli {
    /// The house file containing the map and the robot limits
    house_file: PathBuf,

    /// The robot log containing the recorded steps
    log_file: PathBuf,

    /// Frame rate of the replay in frames per second
    #[arg(long, default_value_t = 1.0)]
    fps: f64,

    /// Format of the house file and robot log
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Also write every frame to this JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Exit right after the last frame instead of waiting for enter
    #[arg(long)]
    no_wait: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Detect from the robot log
    Auto,
    /// `[STEP] (row,col)` log lines
    Coordinate,
    /// `Steps:` section of N/E/S/W/s/F codes
    Letter,
}

impl Format {
    fn dialect(self) -> Option<Dialect> {
        match self {
            Format::Auto => None,
            Format::Coordinate => Some(Dialect::Coordinate),
            Format::Letter => Some(Dialect::Letter),
        }
    }
}

fn main() -> Result<()> {
    // Warnings only by default so logging does not interleave with the frames
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();
    let config = PlaybackConfig::new(cli.fps)?;

    let parsed = scenario::load(cli.format.dialect(), &cli.house_file, &cli.log_file)
        .with_context(|| {
            format!(
                "failed to load {} and {}",
                cli.house_file.display(),
                cli.log_file.display()
            )
        })?;

    let mut renderer = TerminalRenderer::stdout();
    let mut frame_logger = create_frame_logger(cli.export, &parsed);
    if let Err(e) = play(&parsed, &mut renderer, frame_logger.as_mut(), &config) {
        // The renderer only restores the cursor after the last frame
        let _ = execute!(io::stdout(), Show);
        return Err(e).context("replay stopped");
    }

    if !cli.no_wait {
        print!("[ Press enter to exit ]");
        io::stdout().flush()?;
        io::stdin().read_line(&mut String::new())?;
    }

    Ok(())
}
