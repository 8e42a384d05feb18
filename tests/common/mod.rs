//! In-memory wrapped clients for router tests.
//!
//! Every call is recorded with the arguments it received; returns are
//! canned per function name.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use saltapi_client::backend::{
    BackendResult, BatchCall, BatchStream, BoxFuture, ClientFactory, JobHandle, LocalCall,
    LocalClient, RunnerCall, RunnerClient, WheelCall, WheelClient,
};
use saltapi_client::ApiOpts;
use serde_json::{json, Value};

/// One observed backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Cmd(LocalCall),
    RunJob(LocalCall),
    CmdBatch(BatchCall),
    Low(RunnerCall),
    MasterCall(WheelCall),
}

#[derive(Default)]
pub struct MemoryMaster {
    pub calls: Mutex<Vec<Recorded>>,
    pub conf_files: Mutex<Vec<PathBuf>>,
    pub clients_built: Mutex<usize>,
    returns: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, String>>,
}

impl MemoryMaster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer calls of `fun` with `value`.
    pub fn returns(&self, fun: &str, value: Value) {
        self.returns.lock().unwrap().insert(fun.to_string(), value);
    }

    /// Fail calls of `fun` with `message`.
    pub fn fails(&self, fun: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(fun.to_string(), message.to_string());
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clients_built(&self) -> usize {
        *self.clients_built.lock().unwrap()
    }

    fn answer(&self, fun: &str, record: Recorded) -> BackendResult<Value> {
        self.calls.lock().unwrap().push(record);
        if let Some(message) = self.failures.lock().unwrap().get(fun) {
            return Err(message.clone().into());
        }
        Ok(self
            .returns
            .lock()
            .unwrap()
            .get(fun)
            .cloned()
            .unwrap_or(Value::Null))
    }
}

pub struct MemoryLocal(Arc<MemoryMaster>);
pub struct MemoryRunner(Arc<MemoryMaster>);
pub struct MemoryWheel(Arc<MemoryMaster>);

impl LocalClient for MemoryLocal {
    fn cmd(&self, call: LocalCall) -> BoxFuture<'_, BackendResult<Value>> {
        let fun = call.fun.clone();
        let ret = self.0.answer(&fun, Recorded::Cmd(call));
        Box::pin(async move { ret })
    }

    fn run_job(&self, call: LocalCall) -> BoxFuture<'_, BackendResult<JobHandle>> {
        let fun = call.fun.clone();
        let ret = self.0.answer(&fun, Recorded::RunJob(call)).map(|_| JobHandle {
            jid: "20131219215650131543".to_string(),
            minions: vec!["minion1".to_string(), "minion2".to_string()],
        });
        Box::pin(async move { ret })
    }

    fn cmd_batch(&self, call: BatchCall) -> BackendResult<BatchStream> {
        let fun = call.local.fun.clone();
        self.0.answer(&fun, Recorded::CmdBatch(call))?;
        Ok(stream::iter(vec![
            Ok(json!({"minion1": true})),
            Ok(json!({"minion2": true})),
        ])
        .boxed())
    }
}

impl RunnerClient for MemoryRunner {
    fn low(&self, call: RunnerCall) -> BoxFuture<'_, BackendResult<Value>> {
        let fun = call.fun.clone();
        let ret = self.0.answer(&fun, Recorded::Low(call));
        Box::pin(async move { ret })
    }
}

impl WheelClient for MemoryWheel {
    fn master_call(&self, call: WheelCall) -> BoxFuture<'_, BackendResult<Value>> {
        let fun = call.fun().unwrap_or_default().to_string();
        let ret = self.0.answer(&fun, Recorded::MasterCall(call));
        Box::pin(async move { ret })
    }
}

pub struct MemoryFactory(pub Arc<MemoryMaster>);

impl MemoryFactory {
    fn built(&self) {
        *self.0.clients_built.lock().unwrap() += 1;
    }
}

impl ClientFactory for MemoryFactory {
    fn local_client(&self, conf_file: &Path) -> BackendResult<Box<dyn LocalClient>> {
        self.built();
        self.0.conf_files.lock().unwrap().push(conf_file.to_path_buf());
        Ok(Box::new(MemoryLocal(self.0.clone())))
    }

    fn runner_client(&self, _opts: &ApiOpts) -> BackendResult<Box<dyn RunnerClient>> {
        self.built();
        Ok(Box::new(MemoryRunner(self.0.clone())))
    }

    fn wheel_client(&self, _opts: &ApiOpts) -> BackendResult<Box<dyn WheelClient>> {
        self.built();
        Ok(Box::new(MemoryWheel(self.0.clone())))
    }
}

/// Tracing output for `cargo test -- --nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
