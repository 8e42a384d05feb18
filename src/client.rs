//! The lowstate router.
//!
//! [`ApiClient`] gives uniform access to the master's client interfaces:
//! 1. Resolve the client name and function (see [`resolve`])
//! 2. Match the remaining keys against the selected call
//! 3. Build a fresh wrapped client from the options
//! 4. Invoke it and hand back whatever it returned
//!
//! # Example
//!
//! ```ignore
//! use saltapi_client::{ApiClient, ApiOpts, Lowstate};
//!
//! let client = ApiClient::new(ApiOpts::default(), MyFactory::default());
//!
//! // runs `key.list_all` through the wheel client
//! let low = Lowstate::new()
//!     .with("client", "sync")
//!     .with("fun", "wheel.key.list_all")
//!     .with("token", token);
//! let keys = client.run(&low).await?.into_value().await?;
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use crate::backend::{
    BatchCall, ClientFactory, Dispatched, LocalCall, LocalClient, RunnerCall, WheelCall,
};
use crate::error::{Result, SaltApiError};
use crate::handler::{adapt, resolve, CallArgs, HandlerKind, ResolvedRequest};
use crate::lowstate::Lowstate;
use crate::opts::ApiOpts;

/// Dispatches lowstate records onto the wrapped clients.
///
/// Holds no per-request state; a new wrapped client is built for every call.
#[derive(Clone)]
pub struct ApiClient {
    opts: ApiOpts,
    factory: Arc<dyn ClientFactory>,
}

impl ApiClient {
    /// Create a router over the given options and client factory.
    pub fn new<F>(opts: ApiOpts, factory: F) -> Self
    where
        F: ClientFactory + 'static,
    {
        Self::with_factory(opts, Arc::new(factory))
    }

    /// Create a router sharing an existing factory.
    pub fn with_factory(opts: ApiOpts, factory: Arc<dyn ClientFactory>) -> Self {
        Self { opts, factory }
    }

    pub fn opts(&self) -> &ApiOpts {
        &self.opts
    }

    /// Resolve a lowstate without dispatching it.
    pub fn resolve(&self, low: &Lowstate) -> Result<ResolvedRequest> {
        resolve(low)
    }

    /// Execute the function named by the lowstate in the client it selects.
    ///
    /// `client` is `sync` or `async` (default `async`); a `wheel.` or
    /// `runner.` prefix on `fun` selects that client in the given mode,
    /// otherwise the local client is used. Legacy client names (`local`,
    /// `runner`, `wheel`, `local_batch`, ...) are accepted as-is.
    ///
    /// # Errors
    ///
    /// Request errors from resolution and argument adaptation are returned
    /// before any client is built. Errors from the wrapped client are
    /// returned as [`SaltApiError::Backend`], unchanged.
    pub async fn run(&self, low: &Lowstate) -> Result<Dispatched> {
        let req = resolve(low)?;
        let kind = req.handler();
        let args = adapt(kind.params(), &req)?;

        debug!(
            client = %req.client,
            handler = ?kind,
            call = kind.params().call,
            fun = req.fun().unwrap_or_default(),
            "Dispatching lowstate"
        );
        trace!(
            positional = args.positional.len(),
            named = args.named.len(),
            extra = args.extra.len(),
            "Adapted call arguments"
        );

        match kind {
            HandlerKind::LocalSync => self.local_sync(args).await,
            HandlerKind::LocalAsync => self.local_async(args).await,
            HandlerKind::LocalBatch => self.local_batch(args),
            HandlerKind::Runner => self.runner(args).await,
            HandlerKind::Wheel => self.wheel(args).await,
        }
    }

    /// Run each chunk in order, one result per chunk.
    ///
    /// A failing chunk does not stop the ones after it.
    pub async fn run_all(&self, chunks: &[Lowstate]) -> Vec<Result<Dispatched>> {
        let mut results = Vec::with_capacity(chunks.len());
        for low in chunks {
            results.push(self.run(low).await);
        }
        results
    }

    /// `cmd`: run on the targeted minions and wait for their returns.
    async fn local_sync(&self, args: CallArgs) -> Result<Dispatched> {
        let call = LocalCall::from_args(args)?;
        let local = self.local_client()?;
        let ret = local.cmd(call).await.map_err(SaltApiError::Backend)?;
        Ok(Dispatched::Return(ret))
    }

    /// `run_job`: publish and return the job id.
    async fn local_async(&self, args: CallArgs) -> Result<Dispatched> {
        let call = LocalCall::from_args(args)?;
        let local = self.local_client()?;
        let job = local.run_job(call).await.map_err(SaltApiError::Backend)?;
        Ok(Dispatched::Job(job))
    }

    /// `cmd_batch`: returns lazily, batch by batch.
    fn local_batch(&self, args: CallArgs) -> Result<Dispatched> {
        let call = BatchCall::from_args(args)?;
        let local = self.local_client()?;
        let batches = local.cmd_batch(call).map_err(SaltApiError::Backend)?;
        Ok(Dispatched::Batches(batches))
    }

    /// Runner modules. There is no asynchronous runner call yet, so
    /// `runner_async` ends up here too.
    async fn runner(&self, args: CallArgs) -> Result<Dispatched> {
        let call = RunnerCall::from_args(args)?;
        let runner = self
            .factory
            .runner_client(&self.opts)
            .map_err(SaltApiError::Backend)?;
        let ret = runner.low(call).await.map_err(SaltApiError::Backend)?;
        Ok(Dispatched::Return(ret))
    }

    /// Wheel modules, `fun` passed inside the kwargs. Sync in either mode.
    async fn wheel(&self, args: CallArgs) -> Result<Dispatched> {
        let call = WheelCall::from_args(args)?;
        let wheel = self
            .factory
            .wheel_client(&self.opts)
            .map_err(SaltApiError::Backend)?;
        let ret = wheel.master_call(call).await.map_err(SaltApiError::Backend)?;
        Ok(Dispatched::Return(ret))
    }

    fn local_client(&self) -> Result<Box<dyn LocalClient>> {
        self.factory
            .local_client(self.opts.conf_file())
            .map_err(SaltApiError::Backend)
    }
}
