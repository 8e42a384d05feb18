//! Dispatch demo - route a lowstate body onto stand-in clients.
//!
//! This example demonstrates:
//! - Implementing the wrapped clients behind [`ClientFactory`]
//! - Decoding a JSON lowstate body into chunks
//! - Running every chunk and printing what each client returned
//!
//! # Running
//!
//! ```text
//! RUST_LOG=saltapi_client=debug cargo run --example dispatch -- \
//!     '[{"client":"local","tgt":"*","fun":"test.ping","token":"abc"},
//!       {"client":"sync","fun":"wheel.key.list_all","token":"abc"}]'
//! ```

use std::path::Path;

use futures::stream::{self, StreamExt};
use saltapi_client::backend::{
    BackendResult, BatchCall, BatchStream, BoxFuture, ClientFactory, JobHandle, LocalCall,
    LocalClient, RunnerCall, RunnerClient, Target, WheelCall, WheelClient,
};
use saltapi_client::codec::JsonCodec;
use saltapi_client::{ApiClient, ApiOpts, BoxError};
use serde_json::{json, Value};

const SAMPLE: &str = r#"[
    {"client": "local", "tgt": "*", "fun": "test.ping", "token": "abc"},
    {"fun": "test.ping", "tgt": "web*", "eauth": "pam"},
    {"client": "sync", "fun": "runner.manage.up", "token": "abc"},
    {"client": "sync", "fun": "wheel.key.list_all", "token": "abc"},
    {"client": "local", "fun": "test.ping"}
]"#;

const MINIONS: [&str; 2] = ["minion1", "minion2"];

/// Answers every call as if all minions were up.
struct DemoLocal;

fn targeted(tgt: &Target) -> Vec<&'static str> {
    match tgt {
        Target::Expr(expr) if expr == "*" => MINIONS.to_vec(),
        Target::Expr(expr) => MINIONS
            .iter()
            .copied()
            .filter(|m| m.starts_with(expr.trim_end_matches('*')))
            .collect(),
        Target::List(list) => MINIONS
            .iter()
            .copied()
            .filter(|m| list.iter().any(|t| t == m))
            .collect(),
    }
}

impl LocalClient for DemoLocal {
    fn cmd(&self, call: LocalCall) -> BoxFuture<'_, BackendResult<Value>> {
        let ret: serde_json::Map<String, Value> = targeted(&call.tgt)
            .into_iter()
            .map(|m| (m.to_string(), Value::Bool(true)))
            .collect();
        Box::pin(async move { Ok(Value::Object(ret)) })
    }

    fn run_job(&self, call: LocalCall) -> BoxFuture<'_, BackendResult<JobHandle>> {
        let minions = targeted(&call.tgt).into_iter().map(String::from).collect();
        Box::pin(async move {
            Ok(JobHandle {
                jid: "20131219215650131543".to_string(),
                minions,
            })
        })
    }

    fn cmd_batch(&self, call: BatchCall) -> BackendResult<BatchStream> {
        let batches: Vec<BackendResult<Value>> = targeted(&call.local.tgt)
            .into_iter()
            .map(|m| Ok(json!({ m: true })))
            .collect();
        Ok(stream::iter(batches).boxed())
    }
}

struct DemoRunner;

impl RunnerClient for DemoRunner {
    fn low(&self, call: RunnerCall) -> BoxFuture<'_, BackendResult<Value>> {
        Box::pin(async move {
            match call.fun.as_str() {
                "manage.up" => Ok(json!(MINIONS)),
                other => Err(BoxError::from(format!("'{other}' is not available."))),
            }
        })
    }
}

struct DemoWheel;

impl WheelClient for DemoWheel {
    fn master_call(&self, call: WheelCall) -> BoxFuture<'_, BackendResult<Value>> {
        let fun = call.fun().unwrap_or_default().to_string();
        Box::pin(async move {
            match fun.as_str() {
                "key.list_all" => Ok(json!({"minions": MINIONS, "minions_pre": []})),
                other => Err(BoxError::from(format!("'{other}' is not available."))),
            }
        })
    }
}

struct DemoFactory;

impl ClientFactory for DemoFactory {
    fn local_client(&self, conf_file: &Path) -> BackendResult<Box<dyn LocalClient>> {
        tracing::info!(conf_file = %conf_file.display(), "Building local client");
        Ok(Box::new(DemoLocal))
    }

    fn runner_client(&self, _opts: &ApiOpts) -> BackendResult<Box<dyn RunnerClient>> {
        Ok(Box::new(DemoRunner))
    }

    fn wheel_client(&self, _opts: &ApiOpts) -> BackendResult<Box<dyn WheelClient>> {
        Ok(Box::new(DemoWheel))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let body = std::env::args().nth(1).unwrap_or_else(|| SAMPLE.to_string());
    let chunks = JsonCodec::decode_lowstate(body.as_bytes())?;

    let client = ApiClient::new(ApiOpts::load_from("saltapi")?, DemoFactory);

    for (i, result) in client.run_all(&chunks).await.into_iter().enumerate() {
        match result {
            Ok(out) => println!("[{i}] {}", out.into_value().await?),
            Err(e) => println!("[{i}] error: {e}"),
        }
    }

    Ok(())
}
