//! linear referencing along segment geometries. OvertureMaps locates connectors
//! by a fraction `at` in [0, 1] of a segment's length; here that length is the
//! Haversine (great-circle) length of the linestring in meters.
//!
//! interpolation and substring share [LinearReference::locate], so an edge sliced
//! at an offset ends exactly on the connector point materialized at that offset.

use geo::line_measures::{Distance, InterpolatePoint};
use geo::{Coord, Haversine, LineString, Point};

use crate::collection::OvertureMapsCollectionError;

/// a linestring with the cumulative Haversine distance at each of its coordinates.
pub struct LinearReference<'a> {
    line: &'a LineString<f64>,
    distances: Vec<f64>,
}

impl<'a> LinearReference<'a> {
    pub fn new(line: &'a LineString<f64>) -> Result<Self, OvertureMapsCollectionError> {
        if line.0.len() < 2 {
            return Err(OvertureMapsCollectionError::InvalidGeometry(format!(
                "linestring must have at least 2 coordinates, found {}",
                line.0.len()
            )));
        }
        let mut acc = 0.0;
        let mut distances = Vec::with_capacity(line.0.len());
        distances.push(acc);
        for (src, dst) in line.0.iter().zip(line.0.iter().skip(1)) {
            acc += Haversine.distance(Point(*src), Point(*dst));
            distances.push(acc);
        }
        Ok(Self { line, distances })
    }

    /// Haversine length of the full line, in meters.
    pub fn length_meters(&self) -> f64 {
        self.distances.last().copied().unwrap_or_default()
    }

    /// the point found at the fraction `at` of the line length.
    pub fn interpolate(&self, at: f64) -> Result<Point<f64>, OvertureMapsCollectionError> {
        self.locate(at).map(Point)
    }

    /// the sub-line between fractions `from` and `to`, with `from < to`. it begins
    /// and ends at the interpolated points and keeps every original coordinate
    /// strictly between them.
    pub fn substring(
        &self,
        from: f64,
        to: f64,
    ) -> Result<LineString<f64>, OvertureMapsCollectionError> {
        let start = self.locate(from)?;
        let end = self.locate(to)?;
        if from >= to {
            return Err(OvertureMapsCollectionError::InvalidGeometry(format!(
                "substring requires from < to, found [{from}, {to}]"
            )));
        }
        let total = self.length_meters();
        let (from_distance, to_distance) = (from * total, to * total);

        let mut coords = vec![start];
        coords.extend(
            self.line
                .0
                .iter()
                .zip(self.distances.iter())
                .filter(|(_, d)| from_distance < **d && **d < to_distance)
                .map(|(c, _)| *c),
        );
        coords.push(end);
        Ok(LineString::new(coords))
    }

    fn locate(&self, at: f64) -> Result<Coord<f64>, OvertureMapsCollectionError> {
        if !(0.0..=1.0).contains(&at) {
            return Err(OvertureMapsCollectionError::InvalidGeometry(format!(
                "linear reference {at} is not within [0, 1]"
            )));
        }
        let coords = &self.line.0;
        let last = coords.len() - 1;
        let total = self.length_meters();
        if at == 0.0 || total <= 0.0 {
            return Ok(coords[0]);
        }
        if at == 1.0 {
            return Ok(coords[last]);
        }

        let target = at * total;
        let idx = self
            .distances
            .windows(2)
            .position(|w| target <= w[1])
            .unwrap_or(last - 1);
        let (d_src, d_dst) = (self.distances[idx], self.distances[idx + 1]);
        let ratio = if d_dst > d_src {
            (target - d_src) / (d_dst - d_src)
        } else {
            0.0
        };
        if ratio <= 0.0 {
            Ok(coords[idx])
        } else if ratio >= 1.0 {
            Ok(coords[idx + 1])
        } else {
            let point =
                Haversine.point_at_ratio_between(Point(coords[idx]), Point(coords[idx + 1]), ratio);
            Ok(point.0)
        }
    }
}

/// interpolate the point at fraction `at` along `line`.
pub fn interpolate_point(
    line: &LineString<f64>,
    at: f64,
) -> Result<Point<f64>, OvertureMapsCollectionError> {
    LinearReference::new(line)?.interpolate(at)
}

/// slice `line` between the fractions `from` and `to`.
pub fn line_substring(
    line: &LineString<f64>,
    from: f64,
    to: f64,
) -> Result<LineString<f64>, OvertureMapsCollectionError> {
    LinearReference::new(line)?.substring(from, to)
}
