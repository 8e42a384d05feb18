//! Backend module - the wrapped master clients.
//!
//! The router never talks to minions or the master itself. The embedding
//! application implements:
//!
//! - [`LocalClient`] - execution modules on minions (`cmd`, `run_job`, `cmd_batch`)
//! - [`RunnerClient`] - runner modules on the master
//! - [`WheelClient`] - wheel modules on the master
//! - [`ClientFactory`] - builds a fresh client of each family per request
//!
//! Errors returned by these traits reach the caller of
//! [`ApiClient::run`](crate::ApiClient::run) unchanged.

mod call;

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use futures::stream::BoxStream;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use call::{
    BatchCall, LocalCall, RunnerCall, Target, WheelCall, DEFAULT_BATCH, DEFAULT_EXPR_FORM,
};

use crate::error::{BoxError, Result, SaltApiError};
use crate::opts::ApiOpts;

/// Boxed future for backend calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result type of backend calls.
pub type BackendResult<T> = std::result::Result<T, BoxError>;

/// Lazily produced per-batch returns of `cmd_batch`.
pub type BatchStream = BoxStream<'static, BackendResult<Value>>;

/// Identifier of a published job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Job id.
    pub jid: String,
    /// Minions expected to return.
    #[serde(default)]
    pub minions: Vec<String>,
}

/// Execution modules on minions.
pub trait LocalClient: Send + Sync {
    /// Run and wait; returns the returns keyed by minion id.
    fn cmd(&self, call: LocalCall) -> BoxFuture<'_, BackendResult<Value>>;

    /// Publish and return immediately.
    fn run_job(&self, call: LocalCall) -> BoxFuture<'_, BackendResult<JobHandle>>;

    /// Run in batches. The stream must not borrow the client: it outlives it.
    fn cmd_batch(&self, call: BatchCall) -> BackendResult<BatchStream>;
}

/// Runner modules on the master.
pub trait RunnerClient: Send + Sync {
    fn low(&self, call: RunnerCall) -> BoxFuture<'_, BackendResult<Value>>;
}

/// Wheel modules on the master.
pub trait WheelClient: Send + Sync {
    fn master_call(&self, call: WheelCall) -> BoxFuture<'_, BackendResult<Value>>;
}

/// Builds wrapped clients from process options.
///
/// Called once per dispatched request.
pub trait ClientFactory: Send + Sync {
    fn local_client(&self, conf_file: &Path) -> BackendResult<Box<dyn LocalClient>>;

    fn runner_client(&self, opts: &ApiOpts) -> BackendResult<Box<dyn RunnerClient>>;

    fn wheel_client(&self, opts: &ApiOpts) -> BackendResult<Box<dyn WheelClient>>;
}

/// What a dispatched lowstate produced, exactly as the backend returned it.
pub enum Dispatched {
    /// `cmd`, runner and wheel returns.
    Return(Value),
    /// `run_job` result.
    Job(JobHandle),
    /// `cmd_batch` result.
    Batches(BatchStream),
}

impl Dispatched {
    pub fn as_return(&self) -> Option<&Value> {
        match self {
            Dispatched::Return(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_return(self) -> Option<Value> {
        match self {
            Dispatched::Return(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_job(self) -> Option<JobHandle> {
        match self {
            Dispatched::Job(job) => Some(job),
            _ => None,
        }
    }

    pub fn into_batches(self) -> Option<BatchStream> {
        match self {
            Dispatched::Batches(stream) => Some(stream),
            _ => None,
        }
    }

    /// Flatten into a single value; batches are drained into a list.
    ///
    /// # Errors
    ///
    /// Returns the first batch error, or a serialization error for the job
    /// handle.
    pub async fn into_value(self) -> Result<Value> {
        match self {
            Dispatched::Return(v) => Ok(v),
            Dispatched::Job(job) => Ok(serde_json::to_value(job)?),
            Dispatched::Batches(stream) => {
                let batches: Vec<Value> =
                    stream.try_collect().await.map_err(SaltApiError::Backend)?;
                Ok(Value::Array(batches))
            }
        }
    }
}

impl fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatched::Return(v) => f.debug_tuple("Return").field(v).finish(),
            Dispatched::Job(job) => f.debug_tuple("Job").field(job).finish(),
            Dispatched::Batches(_) => f.write_str("Batches(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_into_value_return() {
        let out = Dispatched::Return(json!({"minion1": true}));
        assert_eq!(out.as_return(), Some(&json!({"minion1": true})));
        assert_eq!(out.into_value().await.unwrap(), json!({"minion1": true}));
    }

    #[tokio::test]
    async fn test_into_value_job() {
        let out = Dispatched::Job(JobHandle {
            jid: "20131219215650131543".into(),
            minions: vec!["ms-1".into(), "ms-2".into()],
        });
        assert_eq!(
            out.into_value().await.unwrap(),
            json!({"jid": "20131219215650131543", "minions": ["ms-1", "ms-2"]})
        );
    }

    #[tokio::test]
    async fn test_into_value_batches() {
        let batches =
            stream::iter(vec![Ok(json!({"ms-1": true})), Ok(json!({"ms-2": true}))]).boxed();
        let out = Dispatched::Batches(batches);
        assert_eq!(
            out.into_value().await.unwrap(),
            json!([{"ms-1": true}, {"ms-2": true}])
        );
    }

    #[tokio::test]
    async fn test_into_value_batch_error() {
        let batches = stream::iter(vec![
            Ok(json!({"ms-1": true})),
            Err::<Value, BoxError>("batch timed out".into()),
        ])
        .boxed();
        let err = Dispatched::Batches(batches).into_value().await.unwrap_err();
        assert_eq!(err.to_string(), "batch timed out");
    }

    #[test]
    fn test_job_handle_minions_default() {
        let job: JobHandle = serde_json::from_str(r#"{"jid": "1"}"#).unwrap();
        assert!(job.minions.is_empty());
    }

    #[test]
    fn test_debug_hides_stream() {
        let out = Dispatched::Batches(stream::empty().boxed());
        assert_eq!(format!("{out:?}"), "Batches(..)");
        assert!(out.into_job().is_none());
    }
}
