//! Static description of a remote operation.
//!
//! The registry itself (the `Operation` enum and its table) lives in
//! `intersection`; this module holds the descriptor shape and the argument
//! packing helpers the generated wrappers use.

use std::borrow::Borrow;

use serde::Serialize;
use serde_json::Value;

use crate::decode::DecodeKind;
use crate::error::ApiError;

/// Endpoint path and parameter order of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    /// Path relative to the service root, without a query string.
    pub path: &'static str,
    pub params: &'static [&'static str],
    pub decode: Option<DecodeKind>,
}

impl OperationDescriptor {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Serialize one argument into its JSON payload form.
pub fn to_arg<V: Serialize + ?Sized>(value: &V) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Serialize one column of a batched call.
pub fn to_column<V, B>(items: &[B]) -> Result<Vec<Value>, ApiError>
where
    V: Serialize + ?Sized,
    B: Borrow<V>,
{
    items.iter().map(|item| to_arg(item.borrow())).collect()
}
