//! Result decoders for operations whose raw response needs reshaping.
//!
//! # Design
//! Most operations hand back whatever JSON the service produced. A few
//! declare a `DecodeKind` that turns the payload into points or line
//! segments. The service encodes these either as keyed objects
//! (`{"X":..}`, `{"From":..,"To":..}`), as coordinate arrays, or as one flat
//! array of floats; all three are accepted. Decoders are pure and fail with
//! `ApiError::DecodeError` on any other shape.

use serde_json::Value;

use crate::error::ApiError;
use crate::types::{Line, Point3d};

/// Post-processing declared by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    Point3d,
    Line,
}

impl DecodeKind {
    pub fn apply(self, raw: Value) -> Result<Output, ApiError> {
        match self {
            DecodeKind::Point3d => decode_points(raw).map(Output::Points),
            DecodeKind::Line => decode_lines(raw).map(Output::Lines),
        }
    }
}

/// The value an operation returns to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The JSON response, unchanged.
    Raw(Value),
    Points(Vec<Point3d>),
    Lines(Vec<Line>),
}

impl Output {
    /// Apply `decode` when present, otherwise pass `raw` through.
    pub fn from_raw(raw: Value, decode: Option<DecodeKind>) -> Result<Self, ApiError> {
        match decode {
            Some(kind) => kind.apply(raw),
            None => Ok(Output::Raw(raw)),
        }
    }
}

/// Conversion from an `Output` into the type a typed wrapper returns.
pub trait FromOutput: Sized {
    fn from_output(output: Output) -> Result<Self, ApiError>;
}

impl FromOutput for Value {
    fn from_output(output: Output) -> Result<Self, ApiError> {
        match output {
            Output::Raw(value) => Ok(value),
            other => Err(mismatch("raw JSON", &other)),
        }
    }
}

impl FromOutput for Vec<Point3d> {
    fn from_output(output: Output) -> Result<Self, ApiError> {
        match output {
            Output::Points(points) => Ok(points),
            other => Err(mismatch("points", &other)),
        }
    }
}

impl FromOutput for Vec<Line> {
    fn from_output(output: Output) -> Result<Self, ApiError> {
        match output {
            Output::Lines(lines) => Ok(lines),
            other => Err(mismatch("lines", &other)),
        }
    }
}

fn mismatch(expected: &str, found: &Output) -> ApiError {
    let found = match found {
        Output::Raw(_) => "raw JSON",
        Output::Points(_) => "points",
        Output::Lines(_) => "lines",
    };
    ApiError::DecodeError(format!("expected {expected}, operation produced {found}"))
}

/// Decode a point list. `null` is an empty list and a lone point object is a
/// one-element list.
pub fn decode_points(raw: Value) -> Result<Vec<Point3d>, ApiError> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => point_from_value(raw).map(|point| vec![point]),
        Value::Array(items) if items.iter().all(Value::is_number) => {
            let coords = numbers(&items)?;
            if coords.len() % 3 != 0 {
                return Err(ApiError::DecodeError(format!(
                    "flat point array has {} values, not a multiple of 3",
                    coords.len()
                )));
            }
            Ok(coords.chunks_exact(3).map(|c| Point3d::new(c[0], c[1], c[2])).collect())
        }
        Value::Array(items) => items.into_iter().map(point_from_value).collect(),
        other => Err(ApiError::DecodeError(format!("expected points, got {other}"))),
    }
}

/// Decode a line-segment list. Same conventions as [`decode_points`], with
/// six values per segment in the flat form.
pub fn decode_lines(raw: Value) -> Result<Vec<Line>, ApiError> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => line_from_value(raw).map(|line| vec![line]),
        Value::Array(items) if items.iter().all(Value::is_number) => {
            let coords = numbers(&items)?;
            if coords.len() % 6 != 0 {
                return Err(ApiError::DecodeError(format!(
                    "flat line array has {} values, not a multiple of 6",
                    coords.len()
                )));
            }
            Ok(coords.chunks_exact(6).map(line_from_coords).collect())
        }
        Value::Array(items) => items.into_iter().map(line_from_value).collect(),
        other => Err(ApiError::DecodeError(format!("expected lines, got {other}"))),
    }
}

fn point_from_value(value: Value) -> Result<Point3d, ApiError> {
    match value {
        Value::Array(items) => match numbers(&items)?.as_slice() {
            &[x, y, z] => Ok(Point3d::new(x, y, z)),
            other => Err(ApiError::DecodeError(format!(
                "point array needs 3 coordinates, got {}",
                other.len()
            ))),
        },
        value => serde_json::from_value(value).map_err(|e| ApiError::DecodeError(format!("point: {e}"))),
    }
}

fn line_from_value(value: Value) -> Result<Line, ApiError> {
    match value {
        Value::Array(items) => {
            let coords = numbers(&items)?;
            if coords.len() != 6 {
                return Err(ApiError::DecodeError(format!(
                    "line array needs 6 coordinates, got {}",
                    coords.len()
                )));
            }
            Ok(line_from_coords(&coords))
        }
        value => serde_json::from_value(value).map_err(|e| ApiError::DecodeError(format!("line: {e}"))),
    }
}

fn line_from_coords(c: &[f64]) -> Line {
    Line::new(Point3d::new(c[0], c[1], c[2]), Point3d::new(c[3], c[4], c[5]))
}

fn numbers(items: &[Value]) -> Result<Vec<f64>, ApiError> {
    items
        .iter()
        .map(|item| {
            item.as_f64()
                .ok_or_else(|| ApiError::DecodeError(format!("expected a number, got {item}")))
        })
        .collect()
}
