//! Registry of the `Rhino.Geometry.Intersect.Intersection` endpoints.
//!
//! # Design
//! Every endpoint has the same shape: a fixed path, an ordered parameter
//! list and an optional result decoder. The table at the bottom of this file
//! is the single source for all three; `intersection_operations!` expands it
//! into the `Operation` enum, its descriptors, and two typed methods on
//! `Compute` per entry (`name` for a single call, `name_multiple` for a
//! batched one). The batched form takes one slice per parameter; item `i` of
//! every slice forms call `i`.

use std::borrow::Borrow;

use serde_json::Value;

use crate::compute::Compute;
use crate::decode::{DecodeKind, FromOutput};
use crate::error::ApiError;
use crate::operation::{to_arg, to_column, OperationDescriptor};
use crate::transport::Transport;
use crate::types::{
    Brep, BrepFace, Curve, GeometryBase, Interval, Line, Mesh, Plane, Point3d, PolylineCurve, Ray3d, Surface,
    Vector3d,
};

const PATH_PREFIX: &str = "rhino/geometry/intersect/intersection/";

macro_rules! decode_kind {
    (Raw) => {
        None
    };
    (Points) => {
        Some(DecodeKind::Point3d)
    };
    (Lines) => {
        Some(DecodeKind::Line)
    };
}

macro_rules! output_type {
    (Raw) => { Value };
    (Points) => { Vec<Point3d> };
    (Lines) => { Vec<Line> };
}

macro_rules! intersection_operations {
    ($(
        $(#[$meta:meta])*
        $variant:ident => $single:ident, $multiple:ident {
            path: $path:literal,
            params: ($($param:ident: $ty:ty),* $(,)?),
            output: $output:ident $(,)?
        }
    )*) => {
        /// A remote intersection operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($(#[$meta])* $variant,)*
        }

        impl Operation {
            pub const ALL: &'static [Operation] = &[$(Operation::$variant,)*];

            pub fn descriptor(self) -> OperationDescriptor {
                match self {
                    $(Operation::$variant => OperationDescriptor {
                        name: stringify!($variant),
                        path: concat!("rhino/geometry/intersect/intersection/", $path),
                        params: &[$(stringify!($param)),*],
                        decode: decode_kind!($output),
                    },)*
                }
            }

            /// Look an operation up by its variant name (`"MeshRay"`).
            pub fn from_name(name: &str) -> Option<Operation> {
                match name {
                    $(stringify!($variant) => Some(Operation::$variant),)*
                    _ => None,
                }
            }
        }

        impl<T: Transport> Compute<T> {
            $(
                $(#[$meta])*
                #[allow(clippy::too_many_arguments)]
                pub fn $single(&self, $($param: &$ty),*) -> Result<output_type!($output), ApiError> {
                    let args = vec![$(to_arg::<$ty>($param)?),*];
                    let output = self.call(Operation::$variant, args)?;
                    <output_type!($output) as FromOutput>::from_output(output)
                }

                #[doc = concat!("Batched [`Compute::", stringify!($single), "`]: one call per item, zipped across the argument lists.")]
                #[allow(clippy::too_many_arguments)]
                pub fn $multiple(&self, $($param: &[impl Borrow<$ty>]),*) -> Result<Vec<output_type!($output)>, ApiError> {
                    let columns = vec![$(to_column::<$ty, _>($param)?),*];
                    self.call_multiple(Operation::$variant, columns)?
                        .into_iter()
                        .map(<output_type!($output) as FromOutput>::from_output)
                        .collect()
                }
            )*
        }
    };
}

impl Operation {
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn path(self) -> &'static str {
        self.descriptor().path
    }

    /// Path suffix identifying the overload (`"meshray-mesh_ray3d"`).
    pub fn endpoint(self) -> &'static str {
        self.path().trim_start_matches(PATH_PREFIX)
    }
}

intersection_operations! {
    /// Intersects a curve with an infinite plane. Returns the intersection
    /// events, or null when there are none.
    CurvePlane => curve_plane, curve_plane_multiple {
        path: "curveplane-curve_plane_double",
        params: (curve: Curve, plane: Plane, tolerance: f64),
        output: Raw,
    }

    /// Intersects a mesh with an infinite plane. Returns the intersection
    /// polylines, or null.
    MeshPlane => mesh_plane, mesh_plane_multiple {
        path: "meshplane-mesh_plane",
        params: (mesh: Mesh, plane: Plane),
        output: Raw,
    }

    /// Intersects a mesh with several infinite planes.
    MeshPlanes => mesh_planes, mesh_planes_multiple {
        path: "meshplane-mesh_planearray",
        params: (mesh: Mesh, planes: [Plane]),
        output: Raw,
    }

    /// Intersects a brep with an infinite plane. Returns
    /// `[success, curves, points]`.
    BrepPlane => brep_plane, brep_plane_multiple {
        path: "brepplane-brep_plane_double_curvearray_point3darray",
        params: (brep: Brep, plane: Plane, tolerance: f64),
        output: Raw,
    }

    /// Finds the places where a curve intersects itself.
    CurveSelf => curve_self, curve_self_multiple {
        path: "curveself-curve_double",
        params: (curve: Curve, tolerance: f64),
        output: Raw,
    }

    CurveCurve => curve_curve, curve_curve_multiple {
        path: "curvecurve-curve_curve_double_double",
        params: (curve_a: Curve, curve_b: Curve, tolerance: f64, overlap_tolerance: f64),
        output: Raw,
    }

    /// Intersects a curve with an infinite line.
    CurveLine => curve_line, curve_line_multiple {
        path: "curveline-curve_line_double_double",
        params: (curve: Curve, line: Line, tolerance: f64, overlap_tolerance: f64),
        output: Raw,
    }

    CurveSurface => curve_surface, curve_surface_multiple {
        path: "curvesurface-curve_surface_double_double",
        params: (curve: Curve, surface: Surface, tolerance: f64, overlap_tolerance: f64),
        output: Raw,
    }

    /// Like `CurveSurface`, restricted to `curve_domain` of the curve.
    CurveSurfaceDomain => curve_surface_domain, curve_surface_domain_multiple {
        path: "curvesurface-curve_interval_surface_double_double",
        params: (
            curve: Curve,
            curve_domain: Interval,
            surface: Surface,
            tolerance: f64,
            overlap_tolerance: f64,
        ),
        output: Raw,
    }

    /// Intersects a curve with a brep. Returns `[success, overlap curves,
    /// intersection points]`; partial results may accompany `false`.
    CurveBrep => curve_brep, curve_brep_multiple {
        path: "curvebrep-curve_brep_double_curvearray_point3darray",
        params: (curve: Curve, brep: Brep, tolerance: f64),
        output: Raw,
    }

    /// Intersects a curve with a brep, returning curve parameters.
    CurveBrepParameters => curve_brep_parameters, curve_brep_parameters_multiple {
        path: "curvebrep-curve_brep_double_double_doublearray",
        params: (curve: Curve, brep: Brep, tolerance: f64, angle_tolerance: f64),
        output: Raw,
    }

    CurveBrepFace => curve_brep_face, curve_brep_face_multiple {
        path: "curvebrepface-curve_brepface_double_curvearray_point3darray",
        params: (curve: Curve, face: BrepFace, tolerance: f64),
        output: Raw,
    }

    SurfaceSurface => surface_surface, surface_surface_multiple {
        path: "surfacesurface-surface_surface_double_curvearray_point3darray",
        params: (surface_a: Surface, surface_b: Surface, tolerance: f64),
        output: Raw,
    }

    /// Intersects two breps. Returns `[success, curves, points]`.
    BrepBrep => brep_brep, brep_brep_multiple {
        path: "brepbrep-brep_brep_double_curvearray_point3darray",
        params: (brep_a: Brep, brep_b: Brep, tolerance: f64),
        output: Raw,
    }

    BrepSurface => brep_surface, brep_surface_multiple {
        path: "brepsurface-brep_surface_double_curvearray_point3darray",
        params: (brep: Brep, surface: Surface, tolerance: f64),
        output: Raw,
    }

    /// Legacy mesh/mesh intersection; overlaps and near misses are ignored.
    /// Returns the intersection segments.
    MeshMeshFast => mesh_mesh_fast, mesh_mesh_fast_multiple {
        path: "meshmeshfast-mesh_mesh",
        params: (mesh_a: Mesh, mesh_b: Mesh),
        output: Lines,
    }

    /// Intersects a set of meshes. Returns `[success, intersections,
    /// overlaps]`. `text_log`, `cancel` and `progress` are server-side
    /// objects and are normally null.
    MeshMesh => mesh_mesh, mesh_mesh_multiple {
        path: "meshmesh-mesharray_double_bool_setscombinations_polylinearray_bool_polylinearray_fileio.textlog_system.threading.cancellationtoken_doublearray",
        params: (
            meshes: [Mesh],
            tolerance: f64,
            preprocessing: bool,
            sets: i32,
            overlaps: bool,
            text_log: Value,
            cancel: Value,
            progress: Value,
        ),
        output: Raw,
    }

    /// Like `MeshMesh`, with overlaps returned as a single mesh.
    MeshMeshOverlapMesh => mesh_mesh_overlap_mesh, mesh_mesh_overlap_mesh_multiple {
        path: "meshmesh-mesharray_double_bool_setscombinations_polylinearray_mesh_fileio.textlog_system.threading.cancellationtoken_doublearray",
        params: (
            meshes: [Mesh],
            tolerance: f64,
            preprocessing: bool,
            sets: i32,
            text_log: Value,
            cancel: Value,
            progress: Value,
        ),
        output: Raw,
    }

    MeshMeshAccurate => mesh_mesh_accurate, mesh_mesh_accurate_multiple {
        path: "meshmeshaccurate-mesh_mesh_double",
        params: (mesh_a: Mesh, mesh_b: Mesh, tolerance: f64),
        output: Raw,
    }

    /// First hit of a ray on a mesh: the ray parameter when `>= 0`, a
    /// negative value when nothing was hit.
    MeshRay => mesh_ray, mesh_ray_multiple {
        path: "meshray-mesh_ray3d",
        params: (mesh: Mesh, ray: Ray3d),
        output: Raw,
    }

    /// Like `MeshRay`, also returning the indices of the faces hit.
    MeshRayFaces => mesh_ray_faces, mesh_ray_faces_multiple {
        path: "meshray-mesh_ray3d_intarray",
        params: (mesh: Mesh, ray: Ray3d),
        output: Raw,
    }

    /// Returns `[points, face indices]`.
    MeshPolyline => mesh_polyline, mesh_polyline_multiple {
        path: "meshpolyline-mesh_polylinecurve_intarray",
        params: (mesh: Mesh, curve: PolylineCurve),
        output: Raw,
    }

    /// Returns `[points, face indices]`.
    MeshLine => mesh_line, mesh_line_multiple {
        path: "meshline-mesh_line_intarray",
        params: (mesh: Mesh, line: Line),
        output: Raw,
    }

    /// Bounces a ray off surfaces and breps, up to `max_reflections`
    /// (1..=1000) times. Returns the reflection points.
    RayShoot => ray_shoot, ray_shoot_multiple {
        path: "rayshoot-ray3d_geometrybasearray_int",
        params: (ray: Ray3d, geometry: [GeometryBase], max_reflections: i32),
        output: Points,
    }

    /// Projects points onto meshes along `direction`.
    ProjectPointsToMeshes => project_points_to_meshes, project_points_to_meshes_multiple {
        path: "projectpointstomeshes-mesharray_point3darray_vector3d_double",
        params: (meshes: [Mesh], points: [Point3d], direction: Vector3d, tolerance: f64),
        output: Points,
    }

    /// Returns `[projected points, indices]` where projected point `i` comes
    /// from input point `indices[i]`.
    ProjectPointsToMeshesEx => project_points_to_meshes_ex, project_points_to_meshes_ex_multiple {
        path: "projectpointstomeshesex-mesharray_point3darray_vector3d_double_intarray",
        params: (meshes: [Mesh], points: [Point3d], direction: Vector3d, tolerance: f64),
        output: Raw,
    }

    /// Projects points onto breps along `direction`.
    ProjectPointsToBreps => project_points_to_breps, project_points_to_breps_multiple {
        path: "projectpointstobreps-breparray_point3darray_vector3d_double",
        params: (breps: [Brep], points: [Point3d], direction: Vector3d, tolerance: f64),
        output: Points,
    }

    ProjectPointsToBrepsEx => project_points_to_breps_ex, project_points_to_breps_ex_multiple {
        path: "projectpointstobrepsex-breparray_point3darray_vector3d_double_intarray",
        params: (breps: [Brep], points: [Point3d], direction: Vector3d, tolerance: f64),
        output: Raw,
    }
}
