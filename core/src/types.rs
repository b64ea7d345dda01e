//! Geometry values exchanged with the compute service.
//!
//! # Design
//! Field names follow the service's JSON encoding (`X`, `From`, `XAxis`,
//! ...), so these types serialize straight into request arguments and
//! deserialize straight out of decoded responses. Free-form geometry
//! (curves, meshes, breps) is never interpreted client-side; it travels as
//! an already-encoded `CommonObject`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vector3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3d {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A bounded line segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Line {
    pub from: Point3d,
    pub to: Point3d,
}

impl Line {
    pub const fn new(from: Point3d, to: Point3d) -> Self {
        Self { from, to }
    }
}

/// An oriented plane given by its origin and frame axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Plane {
    pub origin: Point3d,
    pub x_axis: Vector3d,
    pub y_axis: Vector3d,
    pub z_axis: Vector3d,
}

impl Plane {
    pub const fn world_xy() -> Self {
        Self {
            origin: Point3d::new(0.0, 0.0, 0.0),
            x_axis: Vector3d::new(1.0, 0.0, 0.0),
            y_axis: Vector3d::new(0.0, 1.0, 0.0),
            z_axis: Vector3d::new(0.0, 0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ray3d {
    pub position: Point3d,
    pub direction: Vector3d,
}

impl Ray3d {
    pub const fn new(position: Point3d, direction: Vector3d) -> Self {
        Self {
            position,
            direction,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Interval {
    pub t0: f64,
    pub t1: f64,
}

impl Interval {
    pub const fn new(t0: f64, t1: f64) -> Self {
        Self { t0, t1 }
    }
}

/// An openNURBS object encoded by rhino3dm (`CommonObject.Encode()`).
///
/// `data` is the base64 archive; the client passes it through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonObject {
    pub version: i32,
    pub archive3dm: i32,
    pub opennurbs: i32,
    pub data: String,
}

pub type Curve = CommonObject;
pub type PolylineCurve = CommonObject;
pub type Surface = CommonObject;
pub type Brep = CommonObject;
pub type BrepFace = CommonObject;
pub type Mesh = CommonObject;
pub type GeometryBase = CommonObject;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_uses_service_field_names() {
        let json = serde_json::to_value(Point3d::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, serde_json::json!({"X": 1.0, "Y": 2.0, "Z": 3.0}));
    }

    #[test]
    fn plane_axes_are_pascal_case() {
        let json = serde_json::to_value(Plane::world_xy()).unwrap();
        assert_eq!(json["Origin"]["X"], 0.0);
        assert_eq!(json["XAxis"]["X"], 1.0);
        assert_eq!(json["YAxis"]["Y"], 1.0);
        assert_eq!(json["ZAxis"]["Z"], 1.0);
    }

    #[test]
    fn ray_and_interval_field_names() {
        let ray = Ray3d::new(Point3d::new(0.0, 0.0, 5.0), Vector3d::new(0.0, 0.0, -1.0));
        let json = serde_json::to_value(ray).unwrap();
        assert_eq!(json["Position"]["Z"], 5.0);
        assert_eq!(json["Direction"]["Z"], -1.0);

        let json = serde_json::to_value(Interval::new(0.0, 2.5)).unwrap();
        assert_eq!(json, serde_json::json!({"T0": 0.0, "T1": 2.5}));
    }

    #[test]
    fn line_reads_from_and_to() {
        let line: Line = serde_json::from_str(
            r#"{"From":{"X":0,"Y":0,"Z":0},"To":{"X":1,"Y":1,"Z":1}}"#,
        )
        .unwrap();
        assert_eq!(line.to, Point3d::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn common_object_keeps_lowercase_keys() {
        let object = CommonObject {
            version: 10000,
            archive3dm: 70,
            opennurbs: -1879048185,
            data: "+n8CAA==".to_string(),
        };
        let json = serde_json::to_value(&object).unwrap();
        assert_eq!(json["archive3dm"], 70);
        assert_eq!(json["data"], "+n8CAA==");
    }
}
