//! Handler module - client resolution and argument adaptation.
//!
//! Provides:
//! - [`ClientName`] / [`HandlerKind`] - the closed set of clients and the calls behind them
//! - [`resolve`] - lowstate to [`ResolvedRequest`] normalization
//! - [`adapt`] - matching request fields against a call's [`HandlerParams`]
//!
//! # Example
//!
//! ```
//! use saltapi_client::handler::{adapt, resolve, HandlerKind};
//! use saltapi_client::Lowstate;
//!
//! let low = Lowstate::new()
//!     .with("client", "sync")
//!     .with("fun", "wheel.key.list_all")
//!     .with("token", "abc");
//!
//! let req = resolve(&low).unwrap();
//! assert_eq!(req.handler(), HandlerKind::Wheel);
//! assert_eq!(req.fun(), Some("key.list_all"));
//!
//! let args = adapt(req.handler().params(), &req).unwrap();
//! assert_eq!(args.positional.len(), 1);
//! ```

mod params;
mod registry;
mod resolve;

pub use params::{
    adapt, CallArgs, HandlerParams, LOCAL_CMD, LOCAL_CMD_BATCH, LOCAL_RUN_JOB, RUNNER_LOW,
    WHEEL_MASTER_CALL,
};
pub use registry::{ClientName, HandlerKind, Mode, Prefix};
pub use resolve::{resolve, ResolvedRequest, DEFAULT_CLIENT};
