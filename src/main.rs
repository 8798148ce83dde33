mod error;
mod geo;
mod io;
mod scan;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::geo::Point;
use crate::io::Console;
use crate::scan::FootPrecision;

/// Offset and station of a point against a polyline read from a CSV file.
///
/// Any value not given on the command line is asked for interactively.
#[derive(Parser, Debug, Default)]
#[command(version)]
struct Args {
    /// CSV file with one `x,y` integer vertex per line; only trailing blank lines are allowed
    #[arg(long)]
    input: Option<PathBuf>,

    /// x coordinate of the query point
    #[arg(long, allow_negative_numbers = true)]
    x: Option<i64>,

    /// y coordinate of the query point
    #[arg(long, allow_negative_numbers = true)]
    y: Option<i64>,

    /// Measure station to the perpendicular foot truncated toward zero, as older tools did
    #[arg(long)]
    truncate_foot: bool,

    /// Print the result as JSON; prompts then go to stderr
    #[arg(long)]
    json: bool,

    /// Wait for one more line of input before exiting
    #[arg(long)]
    pause: bool,
}

impl Args {
    fn precision(&self) -> FootPrecision {
        if self.truncate_foot {
            FootPrecision::Truncated
        } else {
            FootPrecision::Exact
        }
    }
}

fn run<R: BufRead, W: Write>(
    args: &Args,
    console: &mut Console<R, W>,
    report: &mut impl Write,
) -> Result<()> {
    let path = match &args.input {
        Some(path) => path.clone(),
        None => PathBuf::from(console.ask("Please enter the path to the CSV file:")?),
    };
    let polyline = io::read_polyline(&path)
        .with_context(|| format!("loading polyline from {}", path.display()))?;

    let x = match args.x {
        Some(x) => x,
        None => console.ask_coordinate("Enter the x coordinate of the point:", "x coordinate")?,
    };
    let y = match args.y {
        Some(y) => y,
        None => console.ask_coordinate("Enter the y coordinate of the point:", "y coordinate")?,
    };
    let query = Point::new(x, y);

    let precision = args.precision();
    info!("scanning {} segments ({:?} foot)", polyline.points().len() - 1, precision);
    let projection = scan::scan(&polyline, query, precision)
        .with_context(|| format!("projecting {} onto {}", query, path.display()))?;

    if args.json {
        writeln!(report, "{}", io::render_json(&projection, precision)?)?;
    } else {
        for line in io::render_text(&projection) {
            writeln!(report, "{}", line)?;
        }
        writeln!(report, "Finished")?;
    }
    report.flush()?;

    if args.pause {
        console.wait()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if args.json {
        let mut console = Console::new(stdin.lock(), std::io::stderr());
        run(&args, &mut console, &mut stdout)
    } else {
        let mut console = Console::new(stdin.lock(), std::io::stdout());
        run(&args, &mut console, &mut stdout)
    }
}
