//! Dispatch: build, execute, parse.
//!
//! `Compute` pairs a `ComputeClient` with a `Transport`. The generic
//! `call`/`call_multiple` work for any `Operation`; the typed per-operation
//! wrappers generated in `intersection` sit on top of them.

use serde_json::Value;

use crate::client::{ComputeClient, VersionInfo};
use crate::config::ComputeConfig;
use crate::decode::Output;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::intersection::Operation;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct Compute<T> {
    client: ComputeClient,
    transport: T,
}

impl Compute<UreqTransport> {
    /// Client over the blocking HTTP transport, configured from `config`.
    pub fn from_config(config: &ComputeConfig) -> Self {
        Self::with_transport(ComputeClient::from_config(config), UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> Compute<T> {
    pub fn with_transport(client: ComputeClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ComputeClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Single call of `op` with one JSON value per parameter.
    ///
    /// # Panics
    /// If `args.len()` differs from the operation's arity.
    pub fn call(&self, op: Operation, args: Vec<Value>) -> Result<Output, ApiError> {
        let request = self.client.build_call(op, &args)?;
        let response = self.send(op, &request, 1)?;
        self.client.parse_call(op, response)
    }

    /// Batched call of `op` with one column per parameter. Returns one
    /// output per item, in order.
    ///
    /// # Panics
    /// If `columns.len()` differs from the operation's arity.
    pub fn call_multiple(&self, op: Operation, columns: Vec<Vec<Value>>) -> Result<Vec<Output>, ApiError> {
        let items = columns.iter().map(Vec::len).min().unwrap_or(0);
        let request = self.client.build_call_multiple(op, columns)?;
        let response = self.send(op, &request, items)?;
        self.client.parse_call_multiple(op, response)
    }

    pub fn healthcheck(&self) -> Result<(), ApiError> {
        let response = self.transport.execute(&self.client.build_healthcheck())?;
        self.client.parse_healthcheck(response)
    }

    pub fn version(&self) -> Result<VersionInfo, ApiError> {
        let response = self.transport.execute(&self.client.build_version())?;
        self.client.parse_version(response)
    }

    fn send(&self, op: Operation, request: &HttpRequest, items: usize) -> Result<HttpResponse, ApiError> {
        tracing::debug!(operation = op.name(), url = %request.url, items, "compute call");
        self.transport.execute(request)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::types::{Line, Mesh, Point3d, Ray3d, Vector3d};

    const PREFIX: &str = "http://compute.test/rhino/geometry/intersect/intersection/";

    /// Records every request and replies with queued bodies (`"null"` once
    /// the queue is empty).
    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<HttpRequest>>,
        replies: Mutex<VecDeque<(u16, String)>>,
    }

    impl Recorder {
        fn replying(bodies: &[&str]) -> Self {
            let recorder = Self::default();
            recorder
                .replies
                .lock()
                .unwrap()
                .extend(bodies.iter().map(|body| (200, body.to_string())));
            recorder
        }

        fn urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().iter().map(|r| r.url.clone()).collect()
        }

        fn last_body(&self) -> Value {
            let requests = self.requests.lock().unwrap();
            serde_json::from_str(requests.last().unwrap().body.as_deref().unwrap()).unwrap()
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            let (status, body) = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((200, "null".to_string()));
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body,
            })
        }
    }

    struct Offline;

    impl Transport for Offline {
        fn execute(&self, _: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn compute(recorder: &Recorder) -> Compute<&Recorder> {
        Compute::with_transport(ComputeClient::new("http://compute.test"), recorder)
    }

    fn mesh() -> Mesh {
        Mesh {
            version: 10000,
            archive3dm: 70,
            opennurbs: -1879048185,
            data: "mesh".to_string(),
        }
    }

    fn down_ray() -> Ray3d {
        Ray3d::new(Point3d::new(0.0, 0.0, 5.0), Vector3d::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn every_operation_requests_its_fixed_path() {
        for &op in Operation::ALL {
            let recorder = Recorder::default();
            let args = vec![Value::Null; op.descriptor().arity()];
            compute(&recorder).call(op, args).unwrap();
            assert_eq!(recorder.urls(), vec![format!("http://compute.test/{}", op.descriptor().path)]);
        }
    }

    #[test]
    fn every_operation_batches_on_the_same_path_with_the_flag() {
        for &op in Operation::ALL {
            let recorder = Recorder::replying(&["[]"]);
            let columns = vec![Vec::new(); op.descriptor().arity()];
            compute(&recorder).call_multiple(op, columns).unwrap();
            assert_eq!(
                recorder.urls(),
                vec![format!("http://compute.test/{}?multiple=true", op.descriptor().path)]
            );
        }
    }

    #[test]
    fn mesh_ray_returns_the_raw_parameter() {
        let recorder = Recorder::replying(&["4.5", "-1.0"]);
        let c = compute(&recorder);
        assert_eq!(c.mesh_ray(&mesh(), &down_ray()).unwrap(), json!(4.5));
        assert_eq!(c.mesh_ray(&mesh(), &down_ray()).unwrap(), json!(-1.0));

        let urls = recorder.urls();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], format!("{PREFIX}meshray-mesh_ray3d"));
        let body = recorder.last_body();
        assert_eq!(body[0]["data"], "mesh");
        assert_eq!(body[1]["Direction"]["Z"], -1.0);
    }

    #[test]
    fn ray_shoot_decodes_points() {
        let recorder = Recorder::replying(&[r#"[{"X":0,"Y":0,"Z":0},{"X":1,"Y":0,"Z":2}]"#]);
        let points = compute(&recorder).ray_shoot(&down_ray(), &[mesh()], &10).unwrap();
        assert_eq!(points, vec![Point3d::new(0.0, 0.0, 0.0), Point3d::new(1.0, 0.0, 2.0)]);
        assert_eq!(recorder.urls()[0], format!("{PREFIX}rayshoot-ray3d_geometrybasearray_int"));
        assert_eq!(recorder.last_body()[2], json!(10));
    }

    #[test]
    fn mesh_mesh_fast_decodes_lines() {
        let recorder = Recorder::replying(&["[0,0,0,1,0,0,0,1,0,1,1,0]"]);
        let lines = compute(&recorder).mesh_mesh_fast(&mesh(), &mesh()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], Line::new(Point3d::new(0.0, 1.0, 0.0), Point3d::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn typed_multiple_zips_argument_lists() {
        let recorder = Recorder::replying(&["[1.0, -1.0]"]);
        let rays = [down_ray(), Ray3d::default()];
        let results = compute(&recorder).mesh_ray_multiple(&[mesh(), mesh()], &rays).unwrap();
        assert_eq!(results, vec![json!(1.0), json!(-1.0)]);

        let body = recorder.last_body();
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0][1]["Position"]["Z"], 5.0);
        assert_eq!(body[1][1]["Position"]["Z"], 0.0);
    }

    #[test]
    fn typed_multiple_decodes_each_item() {
        let recorder = Recorder::replying(&["[[1,2,3], null]"]);
        let meshes = vec![vec![mesh()], vec![mesh()]];
        let points = [vec![Point3d::new(1.0, 2.0, 9.0)], Vec::new()];
        let direction = Vector3d::new(0.0, 0.0, -1.0);
        let results = compute(&recorder)
            .project_points_to_meshes_multiple(&meshes, &points, &[direction, direction], &[0.01, 0.01])
            .unwrap();
        assert_eq!(results, vec![vec![Point3d::new(1.0, 2.0, 3.0)], Vec::new()]);
    }

    #[test]
    fn mismatched_batch_lengths_truncate() {
        let recorder = Recorder::replying(&["[0.5]"]);
        let results = compute(&recorder)
            .curve_self_multiple(&[mesh(), mesh(), mesh()], &[0.01])
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(recorder.last_body().as_array().unwrap().len(), 1);
    }

    #[test]
    fn undecoded_response_is_returned_unchanged() {
        let raw = r#"[true, [{"version":10000}], [{"X":1,"Y":1,"Z":1}]]"#;
        let recorder = Recorder::replying(&[raw]);
        let result = compute(&recorder).brep_brep(&mesh(), &mesh(), &0.001).unwrap();
        assert_eq!(result, serde_json::from_str::<Value>(raw).unwrap());
    }

    #[test]
    fn transport_errors_propagate_unchanged() {
        let c = Compute::with_transport(ComputeClient::new("http://compute.test"), Offline);
        let err = c.mesh_ray(&mesh(), &down_ray()).unwrap_err();
        assert!(matches!(err, ApiError::Transport(msg) if msg == "connection refused"));
    }

    #[test]
    fn http_errors_propagate() {
        let recorder = Recorder::default();
        recorder.replies.lock().unwrap().push_back((500, "boom".to_string()));
        let err = compute(&recorder).curve_self(&mesh(), &0.1).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, body } if body == "boom"));
    }

    #[test]
    fn version_and_healthcheck_use_probes() {
        let recorder = Recorder::replying(&["\"healthy\"", r#"{"rhino":"8.0","compute":"8.0.1","git_sha":null}"#]);
        let c = compute(&recorder);
        c.healthcheck().unwrap();
        let info = c.version().unwrap();
        assert_eq!(info.compute, "8.0.1");
        assert_eq!(
            recorder.urls(),
            vec!["http://compute.test/healthcheck", "http://compute.test/version"]
        );
    }
}
