use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::error::{ProjectError, Result};
use crate::geo::Point;
use crate::scan::{FootPrecision, Polyline, Projection};

fn parse_int(context: impl Into<String>, text: &str) -> Result<i64> {
    let value = text.trim();
    value.parse::<i64>().map_err(|_| ProjectError::Parse {
        context: context.into(),
        value: value.to_string(),
    })
}

/// Parses one `x,y` record. Anything after the second field is ignored.
fn parse_record(line_no: usize, line: &str) -> Result<Point> {
    let mut fields = line.split(',');
    let x = parse_int(format!("line {}, x", line_no), fields.next().unwrap_or(""))?;
    let y = parse_int(format!("line {}, y", line_no), fields.next().unwrap_or(""))?;
    Ok(Point::new(x, y))
}

/// Every line is a record; blank lines are rejected unless they trail the last record.
pub fn parse_polyline(text: &str) -> Result<Polyline> {
    let mut lines: Vec<&str> = text.lines().collect();
    let read = lines.len();
    while matches!(lines.last(), Some(l) if l.trim().is_empty()) {
        lines.pop();
    }
    debug!("{} trailing blank lines ignored", read - lines.len());

    let points = lines
        .iter()
        .enumerate()
        .map(|(i, line)| parse_record(i + 1, line))
        .collect::<Result<Vec<_>>>()?;
    Polyline::new(points)
}

pub fn read_polyline(path: &Path) -> Result<Polyline> {
    let text = fs::read_to_string(path).map_err(|source| ProjectError::InputFile {
        path: path.to_path_buf(),
        source,
    })?;
    let polyline = parse_polyline(&text)?;
    info!(
        "loaded {} points from {} (length {:.2})",
        polyline.points().len(),
        path.display(),
        polyline.length()
    );
    Ok(polyline)
}

pub fn parse_coordinate(label: &str, text: &str) -> Result<i64> {
    parse_int(label, text)
}

/// Line-oriented prompt/answer session over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Prints `prompt` and reads one line without its terminator.
    /// End of input reads as an empty line.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        self.say(prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Blocks until one more line (or end of input) arrives.
    pub fn wait(&mut self) -> Result<()> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }

    pub fn ask_coordinate(&mut self, prompt: &str, label: &str) -> Result<i64> {
        let answer = self.ask(prompt)?;
        parse_coordinate(label, &answer)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Text report: one line per enclosing segment, then the result.
pub fn render_text(projection: &Projection) -> Vec<String> {
    let mut lines: Vec<String> = projection
        .hits
        .iter()
        .map(|hit| {
            format!(
                "The point {} is perpendicular between the points {} and {}",
                projection.query, hit.start, hit.end
            )
        })
        .collect();

    match &projection.best {
        None => lines.push("No valid perpendicular found.".to_string()),
        Some(best) => {
            lines.push(format!(
                "The smallest perpendicular distance is {:.2}",
                best.offset
            ));
            lines.push(format!("The station distance is {:.2}", best.station));
        }
    }
    lines
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    precision: FootPrecision,
    #[serde(flatten)]
    projection: &'a Projection,
}

pub fn render_json(projection: &Projection, precision: FootPrecision) -> Result<String> {
    let report = JsonReport {
        precision,
        projection,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use std::io::Cursor;

    #[test]
    fn parses_records_with_whitespace_and_signs() {
        let polyline = parse_polyline(" 1, -2\n+3,4\r\n5,6,ignored\n\n  \n").unwrap();
        assert_eq!(
            polyline.points(),
            &[Point::new(1, -2), Point::new(3, 4), Point::new(5, 6)]
        );
    }

    #[test]
    fn rejects_non_integer_fields() {
        match parse_polyline("0,0\n1.5,2\n") {
            Err(ProjectError::Parse { context, value }) => {
                assert_eq!(context, "line 2, x");
                assert_eq!(value, "1.5");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(matches!(
            parse_polyline("0,0\n1\n"),
            Err(ProjectError::Parse { .. })
        ));
        assert!(matches!(
            parse_polyline("0,0\n1 000,2\n"),
            Err(ProjectError::Parse { .. })
        ));
    }

    #[test]
    fn blank_line_between_records_is_rejected() {
        match parse_polyline("0,0\n\n10,0\n") {
            Err(ProjectError::Parse { context, value }) => {
                assert_eq!(context, "line 2, x");
                assert_eq!(value, "");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn report_error_is_not_console_error() {
        let err: ProjectError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ProjectError::Report(_)));
        assert!(err.to_string().starts_with("cannot render report"));
    }

    #[test]
    fn single_point_file_is_too_short() {
        assert!(matches!(
            parse_polyline("4,4\n"),
            Err(ProjectError::TooFewPoints(1))
        ));
    }

    #[test]
    fn reads_polyline_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,0\n10,0\n20,0").unwrap();
        let polyline = read_polyline(file.path()).unwrap();
        assert_eq!(polyline.points().len(), 3);
    }

    #[test]
    fn missing_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        match read_polyline(&path) {
            Err(ProjectError::InputFile { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected input file error, got {:?}", other),
        }
    }

    #[test]
    fn console_prompts_and_reads() {
        let mut console = Console::new(Cursor::new("12\r\nabc\n"), Vec::new());
        assert_eq!(console.ask_coordinate("x?", "x coordinate").unwrap(), 12);
        assert!(matches!(
            console.ask_coordinate("y?", "y coordinate"),
            Err(ProjectError::Parse { .. })
        ));
        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "x?\ny?\n");
    }

    #[test]
    fn text_report_formats_two_decimals() {
        let polyline = parse_polyline("0,0\n3,0\n").unwrap();
        let projection = scan(&polyline, Point::new(1, 2), FootPrecision::Truncated).unwrap();
        assert_eq!(
            render_text(&projection),
            vec![
                "The point (1, 2) is perpendicular between the points (0, 0) and (3, 0)",
                "The smallest perpendicular distance is 2.00",
                "The station distance is 1.00",
            ]
        );
    }

    #[test]
    fn json_report_carries_result() {
        let polyline = parse_polyline("0,0\n10,0\n20,0\n").unwrap();
        let projection = scan(&polyline, Point::new(5, 5), FootPrecision::Exact).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&projection, FootPrecision::Exact).unwrap()).unwrap();
        assert_eq!(json["precision"], "exact");
        assert_eq!(json["best"]["offset"], 5.0);
        assert_eq!(json["best"]["station"], 5.0);
        assert_eq!(json["query"]["x"], 5);
        assert_eq!(json["hits"].as_array().unwrap().len(), 1);
    }
}
