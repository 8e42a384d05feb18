//! # saltapi-client
//!
//! Uniform access to the master's client interfaces through lowstate
//! records.
//!
//! A lowstate is a flat mapping naming the client, the function and its
//! arguments. [`ApiClient`] normalizes that mapping, checks that credentials
//! are present and hands the call to one of three wrapped clients:
//!
//! - **local**: run execution modules on targeted minions
//!   (`cmd`, `run_job`, `cmd_batch`)
//! - **runner**: run runner modules on the master
//! - **wheel**: run wheel modules on the master
//!
//! The wrapped clients are supplied by the embedding application through
//! [`backend::ClientFactory`]; this crate only decides which one to call and
//! with which arguments.
//!
//! ## Example
//!
//! ```ignore
//! use saltapi_client::{ApiClient, ApiOpts, Lowstate};
//!
//! let client = ApiClient::new(ApiOpts::load_from("saltapi")?, MyFactory::default());
//!
//! let low = Lowstate::new()
//!     .with("client", "local")
//!     .with("tgt", "*")
//!     .with("fun", "test.ping")
//!     .with("arg", "")
//!     .with("token", "d40d1e1e");
//!
//! let ret = client.run(&low).await?;
//! ```

pub mod backend;
pub mod codec;
pub mod error;
pub mod handler;

mod client;
mod lowstate;
mod opts;

pub use client::ApiClient;
pub use error::{BoxError, Result, SaltApiError};
pub use handler::{ClientName, HandlerKind, ResolvedRequest};
pub use lowstate::Lowstate;
pub use opts::{ApiOpts, DEFAULT_CONF_FILE};
