//! Declared parameters of the wrapped calls, and argument adaptation.
//!
//! Each wrapped call has positional parameters (required, passed in order)
//! and named parameters (optional). Lowstate keys are matched against them
//! by name; anything left over is forwarded as an extra named argument.

use serde_json::{Map, Value};

use super::resolve::ResolvedRequest;
use crate::error::{Result, SaltApiError};
use crate::lowstate::FUN_KEY;

/// Parameter table of one wrapped call.
#[derive(Debug, PartialEq, Eq)]
pub struct HandlerParams {
    /// Name of the wrapped call, for diagnostics.
    pub call: &'static str,
    /// Required parameters, in call order.
    pub positional: &'static [&'static str],
    /// Optional named parameters.
    pub named: &'static [&'static str],
}

/// `LocalClient.cmd(tgt, fun, arg, timeout, expr_form, ret, kwarg, **kwargs)`
pub const LOCAL_CMD: HandlerParams = HandlerParams {
    call: "cmd",
    positional: &["tgt", "fun"],
    named: &["arg", "timeout", "expr_form", "ret", "kwarg"],
};

/// `LocalClient.run_job(tgt, fun, arg, expr_form, ret, timeout, kwarg, **kwargs)`
pub const LOCAL_RUN_JOB: HandlerParams = HandlerParams {
    call: "run_job",
    positional: &["tgt", "fun"],
    named: &["arg", "expr_form", "ret", "timeout", "kwarg"],
};

/// `LocalClient.cmd_batch(tgt, fun, arg, expr_form, ret, kwarg, batch, **kwargs)`
pub const LOCAL_CMD_BATCH: HandlerParams = HandlerParams {
    call: "cmd_batch",
    positional: &["tgt", "fun"],
    named: &["arg", "expr_form", "ret", "kwarg", "batch"],
};

/// `RunnerClient.low(fun, kwargs)`
pub const RUNNER_LOW: HandlerParams = HandlerParams {
    call: "low",
    positional: &["fun"],
    named: &[],
};

/// `Wheel.master_call(**kwargs)`; `fun` is folded back into the kwargs.
pub const WHEEL_MASTER_CALL: HandlerParams = HandlerParams {
    call: "master_call",
    positional: &["fun"],
    named: &[],
};

/// Arguments matched against a [`HandlerParams`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallArgs {
    /// Values of the positional parameters, in declared order.
    pub positional: Vec<Value>,
    /// Declared named parameters that were present.
    pub named: Map<String, Value>,
    /// Undeclared keys, forwarded verbatim.
    pub extra: Map<String, Value>,
}

impl CallArgs {
    /// Remove and return a declared named parameter.
    pub fn take_named(&mut self, name: &str) -> Option<Value> {
        self.named.remove(name)
    }
}

/// Match a resolved request against a parameter table.
///
/// # Errors
///
/// Returns [`SaltApiError::MissingArgument`] if a positional parameter is
/// absent.
pub fn adapt(params: &HandlerParams, request: &ResolvedRequest) -> Result<CallArgs> {
    let mut rest = request.args.clone();
    let mut args = CallArgs::default();

    for &param in params.positional {
        let value = if param == FUN_KEY {
            request.fun.clone().map(Value::String)
        } else {
            rest.remove(param)
        };
        let value = value.ok_or(SaltApiError::MissingArgument {
            client: request.client.as_str(),
            arg: param,
        })?;
        args.positional.push(value);
    }

    for &param in params.named {
        if let Some(value) = rest.remove(param) {
            args.named.insert(param.to_string(), value);
        }
    }

    args.extra = rest;
    Ok(args)
}
