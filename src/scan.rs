use log::{debug, info};
use serde::Serialize;

use crate::error::{ProjectError, Result};
use crate::geo::{self, Point, PointF};

/// Ordered vertices; consecutive pairs form the segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Result<Polyline> {
        if points.len() < 2 {
            return Err(ProjectError::TooFewPoints(points.len()));
        }
        Ok(Polyline { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn length(&self) -> f64 {
        self.segments()
            .map(|(a, b)| geo::distance(a.into(), b.into()))
            .sum()
    }
}

/// Which perpendicular foot the station is measured to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FootPrecision {
    #[default]
    Exact,
    /// Foot coordinates truncated toward zero before measuring.
    Truncated,
}

/// A segment whose endpoint perpendiculars enclose the query point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hit {
    pub segment: usize,
    pub start: Point,
    pub end: Point,
    pub distance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StationOffset {
    pub offset: f64,
    pub station: f64,
    pub segment: usize,
    pub foot: PointF,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Projection {
    pub query: Point,
    pub hits: Vec<Hit>,
    pub best: Option<StationOffset>,
    pub total_length: f64,
}

fn degenerate(index: usize, start: Point, end: Point) -> ProjectError {
    ProjectError::DegenerateSegment { index, start, end }
}

/// Walks every segment in order and keeps the smallest perpendicular offset.
///
/// Only strictly smaller offsets replace the current best, so on ties the
/// lowest segment index wins.
pub fn scan(polyline: &Polyline, query: Point, precision: FootPrecision) -> Result<Projection> {
    let mut hits = Vec::new();
    let mut best: Option<StationOffset> = None;
    let mut total_distance = 0.0;

    for (i, (p1, p2)) in polyline.segments().enumerate() {
        let segment_length = geo::distance(p1.into(), p2.into());

        let within =
            geo::is_perpendicular_to_segment(p1, p2, query).ok_or_else(|| degenerate(i, p1, p2))?;
        debug!("segment {} {} -> {}: within bounds = {}", i, p1, p2, within);

        if within {
            let distance =
                geo::perpendicular_distance(p1, p2, query).ok_or_else(|| degenerate(i, p1, p2))?;

            if best.as_ref().map_or(true, |b| distance < b.offset) {
                let foot =
                    geo::intersection_point(p1, p2, query).ok_or_else(|| degenerate(i, p1, p2))?;
                let measured_to = match precision {
                    FootPrecision::Truncated => foot.truncate().into(),
                    FootPrecision::Exact => foot,
                };
                // a truncated or rounded foot can land past the segment end
                let along = geo::distance(p1.into(), measured_to).min(segment_length);
                best = Some(StationOffset {
                    offset: distance,
                    station: total_distance + along,
                    segment: i,
                    foot,
                });
            }

            hits.push(Hit {
                segment: i,
                start: p1,
                end: p2,
                distance,
            });
        }

        total_distance += segment_length;
    }

    match &best {
        Some(b) => info!(
            "query {}: offset {:.4} at station {:.4} on segment {}",
            query, b.offset, b.station, b.segment
        ),
        None => info!("query {}: no segment encloses the perpendicular", query),
    }

    Ok(Projection {
        query,
        hits,
        best,
        total_length: total_distance,
    })
}
