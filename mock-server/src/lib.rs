//! In-memory stand-in for a Rhino Compute server.
//!
//! Serves the intersection endpoints with canned, deterministic geometry
//! (every "mesh" and "brep" is the world XY plane), plus `/healthcheck`,
//! `/version` and `/calls`, which lists the requests received so far.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const INTERSECTION_PREFIX: &str = "/rhino/geometry/intersect/intersection";

/// A request as seen by the server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub multiple: bool,
    pub stopat: Option<u32>,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Deserialize)]
pub struct CallQuery {
    #[serde(default)]
    pub multiple: bool,
    pub stopat: Option<u32>,
}

#[derive(Default)]
pub struct MockState {
    api_key: Option<String>,
    calls: RwLock<Vec<RecordedCall>>,
}

pub type Shared = Arc<MockState>;

pub fn app() -> Router {
    router(MockState::default())
}

/// Like [`app`], but rejects requests whose `RhinoComputeKey` header does not
/// match `api_key` with 401.
pub fn app_with_api_key(api_key: &str) -> Router {
    router(MockState {
        api_key: Some(api_key.to_string()),
        ..MockState::default()
    })
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/version", get(version))
        .route("/calls", get(list_calls))
        .route(&format!("{INTERSECTION_PREFIX}/{{endpoint}}"), post(intersect))
        .layer(DefaultBodyLimit::disable())
        .with_state(Arc::new(state))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_api_key(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_api_key(api_key)).await
}

async fn healthcheck() -> &'static str {
    "healthy"
}

async fn version() -> Json<Value> {
    Json(json!({
        "rhino": "8.0.0.0",
        "compute": env!("CARGO_PKG_VERSION"),
        "git_sha": null,
    }))
}

async fn list_calls(State(state): State<Shared>) -> Json<Vec<RecordedCall>> {
    Json(state.calls.read().await.clone())
}

async fn intersect(
    State(state): State<Shared>,
    Path(endpoint): Path<String>,
    Query(query): Query<CallQuery>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let api_key = headers
        .get("RhinoComputeKey")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    if state.api_key.is_some() && state.api_key != api_key {
        return Err(StatusCode::UNAUTHORIZED);
    }

    state.calls.write().await.push(RecordedCall {
        endpoint: endpoint.clone(),
        multiple: query.multiple,
        stopat: query.stopat,
        api_key,
        body: body.clone(),
    });
    tracing::info!(%endpoint, multiple = query.multiple, "intersection call");

    let Value::Array(items) = body else {
        return Err(StatusCode::BAD_REQUEST);
    };
    if query.multiple {
        items
            .iter()
            .map(|item| match item {
                Value::Array(args) => Ok(evaluate(&endpoint, args)),
                _ => Err(StatusCode::BAD_REQUEST),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|results| Json(Value::Array(results)))
    } else {
        Ok(Json(evaluate(&endpoint, &items)))
    }
}

/// Canned answer for one call. Unknown endpoints echo their arguments.
pub fn evaluate(endpoint: &str, args: &[Value]) -> Value {
    match endpoint {
        "meshray-mesh_ray3d" => json!(ray_parameter(args.get(1))),
        "meshray-mesh_ray3d_intarray" => {
            let t = ray_parameter(args.get(1));
            let faces: Vec<i32> = if t >= 0.0 { vec![0] } else { Vec::new() };
            json!([t, faces])
        }
        "rayshoot-ray3d_geometrybasearray_int" => {
            let t = ray_parameter(args.first());
            match (t >= 0.0, args.first()) {
                (true, Some(ray)) => json!([point_along(ray, t)]),
                _ => json!([]),
            }
        }
        "projectpointstomeshes-mesharray_point3darray_vector3d_double"
        | "projectpointstobreps-breparray_point3darray_vector3d_double" => Value::Array(flatten(args.get(1))),
        "projectpointstomeshesex-mesharray_point3darray_vector3d_double_intarray"
        | "projectpointstobrepsex-breparray_point3darray_vector3d_double_intarray" => {
            let points = flatten(args.get(1));
            let indices: Vec<usize> = (0..points.len()).collect();
            json!([points, indices])
        }
        "meshmeshfast-mesh_mesh" => json!([
            {"From": {"X": 0.0, "Y": 0.0, "Z": 0.0}, "To": {"X": 1.0, "Y": 0.0, "Z": 0.0}}
        ]),
        _ => json!({ "endpoint": endpoint, "args": args }),
    }
}

fn coord(value: &Value, axis: &str) -> f64 {
    value.get(axis).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Parameter at which `ray` meets z = 0, or -1 when it never does.
fn ray_parameter(ray: Option<&Value>) -> f64 {
    let Some(ray) = ray else {
        return -1.0;
    };
    let z = coord(&ray["Position"], "Z");
    let dz = coord(&ray["Direction"], "Z");
    if dz == 0.0 {
        return -1.0;
    }
    let t = -z / dz;
    if t >= 0.0 {
        t
    } else {
        -1.0
    }
}

fn point_along(ray: &Value, t: f64) -> Value {
    let (position, direction) = (&ray["Position"], &ray["Direction"]);
    json!({
        "X": coord(position, "X") + t * coord(direction, "X"),
        "Y": coord(position, "Y") + t * coord(direction, "Y"),
        "Z": coord(position, "Z") + t * coord(direction, "Z"),
    })
}

fn flatten(points: Option<&Value>) -> Vec<Value> {
    points
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .map(|p| json!({"X": coord(p, "X"), "Y": coord(p, "Y"), "Z": 0.0}))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(z: f64, dz: f64) -> Value {
        json!({"Position": {"X": 1.0, "Y": 2.0, "Z": z}, "Direction": {"X": 0.0, "Y": 0.0, "Z": dz}})
    }

    #[test]
    fn mesh_ray_hits_the_xy_plane() {
        assert_eq!(evaluate("meshray-mesh_ray3d", &[json!(null), ray(5.0, -1.0)]), json!(5.0));
    }

    #[test]
    fn mesh_ray_away_from_the_plane_misses() {
        assert_eq!(evaluate("meshray-mesh_ray3d", &[json!(null), ray(5.0, 1.0)]), json!(-1.0));
        assert_eq!(evaluate("meshray-mesh_ray3d", &[json!(null), ray(5.0, 0.0)]), json!(-1.0));
    }

    #[test]
    fn mesh_ray_faces_lists_face_zero_on_hit() {
        let result = evaluate("meshray-mesh_ray3d_intarray", &[json!(null), ray(2.0, -2.0)]);
        assert_eq!(result, json!([1.0, [0]]));
    }

    #[test]
    fn ray_shoot_returns_the_hit_point() {
        let result = evaluate("rayshoot-ray3d_geometrybasearray_int", &[ray(3.0, -1.0), json!([]), json!(1)]);
        assert_eq!(result, json!([{"X": 1.0, "Y": 2.0, "Z": 0.0}]));
    }

    #[test]
    fn projection_drops_points_to_z_zero() {
        let points = json!([{"X": 1, "Y": 2, "Z": 3}]);
        let result = evaluate(
            "projectpointstobrepsex-breparray_point3darray_vector3d_double_intarray",
            &[json!([]), points, json!(null), json!(0.01)],
        );
        assert_eq!(result, json!([[{"X": 1.0, "Y": 2.0, "Z": 0.0}], [0]]));
    }

    #[test]
    fn unknown_endpoints_echo() {
        let result = evaluate("curveself-curve_double", &[json!("c"), json!(0.1)]);
        assert_eq!(result["endpoint"], "curveself-curve_double");
        assert_eq!(result["args"], json!(["c", 0.1]));
    }

    #[test]
    fn recorded_call_roundtrips_through_json() {
        let call = RecordedCall {
            endpoint: "meshray-mesh_ray3d".to_string(),
            multiple: true,
            stopat: None,
            api_key: Some("k".to_string()),
            body: json!([[1, 2]]),
        };
        let back: RecordedCall = serde_json::from_value(serde_json::to_value(&call).unwrap()).unwrap();
        assert_eq!(back, call);
    }
}
