//! Client name table.
//!
//! Every accepted value of a lowstate's `client` key is a [`ClientName`].
//! Several names are aliases: they all map onto one of five
//! [`HandlerKind`]s, and that mapping is an exhaustive `match`.
//!
//! | names                                   | handler                |
//! |-----------------------------------------|------------------------|
//! | `local_sync`, `local`, `sync`           | [`HandlerKind::LocalSync`]  |
//! | `local_async`, `async`                  | [`HandlerKind::LocalAsync`] |
//! | `local_batch`                           | [`HandlerKind::LocalBatch`] |
//! | `runner_sync`, `runner`, `runner_async` | [`HandlerKind::Runner`]     |
//! | `wheel_sync`, `wheel`, `wheel_async`    | [`HandlerKind::Wheel`]      |
//!
//! There is no asynchronous runner or wheel call; the `_async` names run
//! synchronously.

use std::fmt;
use std::str::FromStr;

use super::params::{
    HandlerParams, LOCAL_CMD, LOCAL_CMD_BATCH, LOCAL_RUN_JOB, RUNNER_LOW, WHEEL_MASTER_CALL,
};
use crate::error::SaltApiError;

/// A `client` value the router knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientName {
    LocalSync,
    LocalAsync,
    LocalBatch,
    RunnerSync,
    RunnerAsync,
    WheelSync,
    WheelAsync,
    Sync,
    Async,
    Local,
    Runner,
    Wheel,
}

impl ClientName {
    /// Every known name.
    pub const ALL: [ClientName; 12] = [
        ClientName::LocalSync,
        ClientName::LocalAsync,
        ClientName::LocalBatch,
        ClientName::RunnerSync,
        ClientName::RunnerAsync,
        ClientName::WheelSync,
        ClientName::WheelAsync,
        ClientName::Sync,
        ClientName::Async,
        ClientName::Local,
        ClientName::Runner,
        ClientName::Wheel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClientName::LocalSync => "local_sync",
            ClientName::LocalAsync => "local_async",
            ClientName::LocalBatch => "local_batch",
            ClientName::RunnerSync => "runner_sync",
            ClientName::RunnerAsync => "runner_async",
            ClientName::WheelSync => "wheel_sync",
            ClientName::WheelAsync => "wheel_async",
            ClientName::Sync => "sync",
            ClientName::Async => "async",
            ClientName::Local => "local",
            ClientName::Runner => "runner",
            ClientName::Wheel => "wheel",
        }
    }

    /// The handler this name dispatches to.
    pub fn handler(self) -> HandlerKind {
        match self {
            ClientName::LocalSync | ClientName::Local | ClientName::Sync => HandlerKind::LocalSync,
            ClientName::LocalAsync | ClientName::Async => HandlerKind::LocalAsync,
            ClientName::LocalBatch => HandlerKind::LocalBatch,
            ClientName::RunnerSync | ClientName::Runner | ClientName::RunnerAsync => {
                HandlerKind::Runner
            }
            ClientName::WheelSync | ClientName::Wheel | ClientName::WheelAsync => {
                HandlerKind::Wheel
            }
        }
    }

    /// Name for a `wheel.`/`runner.` prefixed function in the given mode.
    pub fn prefixed(prefix: Prefix, mode: Mode) -> Self {
        match (prefix, mode) {
            (Prefix::Wheel, Mode::Sync) => ClientName::WheelSync,
            (Prefix::Wheel, Mode::Async) => ClientName::WheelAsync,
            (Prefix::Runner, Mode::Sync) => ClientName::RunnerSync,
            (Prefix::Runner, Mode::Async) => ClientName::RunnerAsync,
        }
    }
}

impl FromStr for ClientName {
    type Err = SaltApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| SaltApiError::UnknownClient(s.to_string()))
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The distinct calls behind the client names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Run on targeted minions and wait for the returns.
    LocalSync,
    /// Publish a job and return its id immediately.
    LocalAsync,
    /// Run on targeted minions in batches.
    LocalBatch,
    /// Run a runner module on the master.
    Runner,
    /// Run a wheel module on the master.
    Wheel,
}

impl HandlerKind {
    /// Declared parameters of the wrapped call.
    pub fn params(self) -> &'static HandlerParams {
        match self {
            HandlerKind::LocalSync => &LOCAL_CMD,
            HandlerKind::LocalAsync => &LOCAL_RUN_JOB,
            HandlerKind::LocalBatch => &LOCAL_CMD_BATCH,
            HandlerKind::Runner => &RUNNER_LOW,
            HandlerKind::Wheel => &WHEEL_MASTER_CALL,
        }
    }
}

/// Client mode accepted alongside a prefixed function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sync,
    Async,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sync" => Some(Mode::Sync),
            "async" => Some(Mode::Async),
            _ => None,
        }
    }
}

/// Function prefix that selects a master-side client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Wheel,
    Runner,
}

impl Prefix {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "wheel" => Some(Prefix::Wheel),
            "runner" => Some(Prefix::Runner),
            _ => None,
        }
    }
}
