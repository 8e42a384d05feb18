//! Lowstate normalization.
//!
//! Turns a [`Lowstate`] into a [`ResolvedRequest`] without touching the
//! original record:
//!
//! 1. a missing `client` means `async`
//! 2. `wheel.<a>.<b>` / `runner.<a>.<b>` functions select the master-side
//!    client in the requested mode and lose their prefix
//! 3. a `token` or `eauth` key must be present
//! 4. the client name must be a known one

use serde_json::{Map, Value};

use super::registry::{ClientName, HandlerKind, Mode, Prefix};
use crate::error::{Result, SaltApiError};
use crate::lowstate::{Lowstate, CLIENT_KEY, FUN_KEY};

/// Client used when the lowstate names none.
pub const DEFAULT_CLIENT: &str = "async";

/// A lowstate after client/fun normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    /// Resolved client name.
    pub client: ClientName,
    /// Function, with any `wheel.`/`runner.` prefix stripped.
    pub fun: Option<String>,
    /// Every other key of the lowstate, credentials included.
    pub args: Map<String, Value>,
}

impl ResolvedRequest {
    pub fn handler(&self) -> HandlerKind {
        self.client.handler()
    }

    pub fn fun(&self) -> Option<&str> {
        self.fun.as_deref()
    }
}

/// Resolve which client a lowstate is for.
///
/// # Errors
///
/// - [`SaltApiError::InvalidClientMode`] for a prefixed function whose client
///   is not `sync` or `async`
/// - [`SaltApiError::AuthenticationRequired`] when no credentials are present
/// - [`SaltApiError::UnknownClient`] when the client name is not recognized
/// - [`SaltApiError::InvalidArgument`] when `client` or `fun` is not a string
///
/// A non-string `client` or `fun` is only reported once credentials are
/// known to be present; a non-string `fun` never carries a prefix.
pub fn resolve(low: &Lowstate) -> Result<ResolvedRequest> {
    let requested = low.client().map(|c| c.unwrap_or(DEFAULT_CLIENT));
    let raw_fun = low.fun();
    let fun_str = raw_fun.as_ref().ok().copied().flatten();

    let (client, fun) = match fun_str.and_then(split_prefix) {
        Some((prefix, rest)) => {
            let mode = requested
                .as_ref()
                .ok()
                .and_then(|c| Mode::parse(c))
                .ok_or_else(|| SaltApiError::InvalidClientMode {
                    client: client_label(low),
                    fun: fun_str.unwrap_or_default().to_string(),
                })?;
            (Ok(ClientName::prefixed(prefix, mode)), Ok(Some(rest)))
        }
        None => (requested.and_then(|c| c.parse::<ClientName>()), raw_fun),
    };

    if !low.has_credentials() {
        return Err(SaltApiError::AuthenticationRequired);
    }
    let client = client?;
    let fun = fun?;

    let args = low
        .iter()
        .filter(|(k, _)| k.as_str() != CLIENT_KEY && k.as_str() != FUN_KEY)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(ResolvedRequest {
        client,
        fun: fun.map(str::to_string),
        args,
    })
}

/// The `client` value as it appears in error messages.
fn client_label(low: &Lowstate) -> String {
    match low.get(CLIENT_KEY) {
        None => DEFAULT_CLIENT.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `runner.jobs.lookup_jid` -> `(Runner, "jobs.lookup_jid")`.
///
/// Needs at least two segments after the prefix; `wheel.key` is left alone.
fn split_prefix(fun: &str) -> Option<(Prefix, &str)> {
    let (head, rest) = fun.split_once('.')?;
    let prefix = Prefix::parse(head)?;
    rest.contains('.').then_some((prefix, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn low() -> Lowstate {
        Lowstate::new().with("token", "x")
    }

    #[test]
    fn test_default_client_is_async() {
        let req = resolve(&Lowstate::new().with("fun", "test.ping").with("eauth", "pam")).unwrap();
        assert_eq!(req.client, ClientName::Async);
        assert_eq!(req.handler(), HandlerKind::LocalAsync);
        assert_eq!(req.fun(), Some("test.ping"));
    }

    #[test]
    fn test_wheel_prefix_sync() {
        let req = resolve(&low().with("client", "sync").with("fun", "wheel.foo.bar")).unwrap();
        assert_eq!(req.client, ClientName::WheelSync);
        assert_eq!(req.fun(), Some("foo.bar"));
    }

    #[test]
    fn test_runner_prefix_async() {
        let req =
            resolve(&low().with("client", "async").with("fun", "runner.jobs.list_jobs")).unwrap();
        assert_eq!(req.client, ClientName::RunnerAsync);
        assert_eq!(req.handler(), HandlerKind::Runner);
        assert_eq!(req.fun(), Some("jobs.list_jobs"));
    }

    #[test]
    fn test_prefix_with_default_client() {
        let req = resolve(&low().with("fun", "wheel.key.list_all")).unwrap();
        assert_eq!(req.client, ClientName::WheelAsync);
    }

    #[test]
    fn test_prefix_with_invalid_mode() {
        let err =
            resolve(&low().with("client", "weird").with("fun", "runner.foo.bar")).unwrap_err();
        match err {
            SaltApiError::InvalidClientMode { client, fun } => {
                assert_eq!(client, "weird");
                assert_eq!(fun, "runner.foo.bar");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_prefix_with_legacy_client_name_rejected() {
        let err =
            resolve(&low().with("client", "wheel").with("fun", "wheel.key.list_all")).unwrap_err();
        assert!(matches!(err, SaltApiError::InvalidClientMode { .. }));
    }

    #[test]
    fn test_short_prefixed_fun_not_rewritten() {
        let req = resolve(&low().with("client", "wheel").with("fun", "wheel.key")).unwrap();
        assert_eq!(req.client, ClientName::Wheel);
        assert_eq!(req.fun(), Some("wheel.key"));
    }

    #[test]
    fn test_other_prefix_not_rewritten() {
        let req = resolve(&low().with("client", "local").with("fun", "state.sls.extra")).unwrap();
        assert_eq!(req.client, ClientName::Local);
        assert_eq!(req.fun(), Some("state.sls.extra"));
    }

    #[test]
    fn test_missing_credentials() {
        for low in [
            Lowstate::new(),
            Lowstate::new().with("client", "local").with("fun", "test.ping"),
            Lowstate::new().with("client", "bogus"),
            Lowstate::new().with("client", "sync").with("fun", "wheel.key.list_all"),
            Lowstate::new().with("username", "fred").with("password", "x"),
        ] {
            assert!(matches!(resolve(&low), Err(SaltApiError::AuthenticationRequired)));
        }
    }

    #[test]
    fn test_non_string_fields_without_credentials() {
        for low in [
            Lowstate::new().with("client", 3).with("fun", "test.ping"),
            Lowstate::new().with("client", Value::Null),
            Lowstate::new().with("fun", json!(["x"])),
            Lowstate::new().with("client", "sync").with("fun", json!({"wheel": "key.list_all"})),
        ] {
            assert!(matches!(resolve(&low), Err(SaltApiError::AuthenticationRequired)));
        }
    }

    #[test]
    fn test_non_string_fields_with_credentials() {
        let err = resolve(&low().with("client", 3).with("fun", "test.ping")).unwrap_err();
        assert!(matches!(err, SaltApiError::InvalidArgument { ref arg, .. } if arg == "client"));

        let err = resolve(&low().with("client", Value::Null)).unwrap_err();
        assert!(matches!(err, SaltApiError::InvalidArgument { ref arg, .. } if arg == "client"));

        let err = resolve(&low().with("client", "local").with("fun", json!(["x"]))).unwrap_err();
        assert!(matches!(err, SaltApiError::InvalidArgument { ref arg, .. } if arg == "fun"));
    }

    #[test]
    fn test_non_string_client_with_prefixed_fun() {
        let low = Lowstate::new().with("client", 3).with("fun", "wheel.key.list_all");
        match resolve(&low).unwrap_err() {
            SaltApiError::InvalidClientMode { client, fun } => {
                assert_eq!(client, "3");
                assert_eq!(fun, "wheel.key.list_all");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_mode_reported_before_credentials() {
        let low = Lowstate::new().with("client", "local").with("fun", "wheel.key.list_all");
        assert!(matches!(resolve(&low), Err(SaltApiError::InvalidClientMode { .. })));
    }

    #[test]
    fn test_unknown_client() {
        let err = resolve(&low().with("client", "ssh").with("fun", "test.ping")).unwrap_err();
        assert!(matches!(err, SaltApiError::UnknownClient(ref n) if n == "ssh"));
    }

    #[test]
    fn test_args_exclude_client_and_fun() {
        let req = resolve(
            &low()
                .with("client", "local")
                .with("fun", "test.ping")
                .with("tgt", "*")
                .with("arg", ""),
        )
        .unwrap();
        let mut keys: Vec<&str> = req.args.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["arg", "tgt", "token"]);
    }

    #[test]
    fn test_input_untouched_and_idempotent() {
        let low = low().with("client", "sync").with("fun", "wheel.foo.bar");
        let before = low.clone();

        let first = resolve(&low).unwrap();
        let second = resolve(&low).unwrap();

        assert_eq!(low, before);
        assert_eq!(first, second);
    }
}
