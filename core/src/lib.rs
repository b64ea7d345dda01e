//! Synchronous client for the Rhino Compute intersection endpoints.
//!
//! # Overview
//! Every `Rhino.Geometry.Intersect.Intersection` overload exposed by a
//! Rhino Compute server is a remote procedure call: a POST of the positional
//! arguments as a JSON array to a fixed path, answered with JSON. This crate
//! turns that surface into typed calls (`Compute::mesh_ray`,
//! `Compute::ray_shoot_multiple`, ...). All geometry work happens on the
//! server; the client only moves and reshapes data.
//!
//! # Design
//! - `intersection::Operation` is the registry: path, parameter order and
//!   optional result decoder per operation, generated from one table.
//! - `ComputeClient` is stateless. It builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network (host-does-IO).
//! - `Transport` executes requests; `UreqTransport` is the blocking HTTP
//!   implementation.
//! - Batched (`?multiple=true`) calls take one list per parameter and are
//!   transposed by `batch::transpose` into one argument tuple per item.
//!
//! ```no_run
//! use compute_core::{Compute, ComputeConfig, Mesh, Point3d, Ray3d, Vector3d};
//!
//! # fn main() -> Result<(), compute_core::ApiError> {
//! # let mesh: Mesh = unimplemented!();
//! let compute = Compute::from_config(&ComputeConfig::from_env()?);
//! let ray = Ray3d::new(Point3d::new(0.0, 0.0, 10.0), Vector3d::new(0.0, 0.0, -1.0));
//! let t = compute.mesh_ray(&mesh, &ray)?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod client;
pub mod compute;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod intersection;
pub mod operation;
pub mod transport;
pub mod types;

pub use client::{ComputeClient, VersionInfo};
pub use compute::Compute;
pub use config::ComputeConfig;
pub use decode::{DecodeKind, FromOutput, Output};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use intersection::Operation;
pub use operation::OperationDescriptor;
pub use transport::{Transport, UreqTransport};
pub use types::{
    Brep, BrepFace, CommonObject, Curve, GeometryBase, Interval, Line, Mesh, Plane, Point3d, PolylineCurve, Ray3d,
    Surface, Vector3d,
};
