//! Typed argument records for the wrapped calls.
//!
//! Built from [`CallArgs`] after adaptation. Field values are validated
//! here; anything the record does not model travels in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SaltApiError};
use crate::handler::CallArgs;

/// Default target expression type.
pub const DEFAULT_EXPR_FORM: &str = "glob";

/// Default batch size for `cmd_batch`.
pub const DEFAULT_BATCH: &str = "10%";

/// Minion target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// A target expression, interpreted according to `expr_form`.
    Expr(String),
    /// An explicit minion list.
    List(Vec<String>),
}

impl Target {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Target::Expr(s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(SaltApiError::invalid(
                        "tgt",
                        format!("list entries must be strings, got {other}"),
                    )),
                })
                .collect::<Result<Vec<_>>>()
                .map(Target::List),
            other => Err(SaltApiError::invalid(
                "tgt",
                format!("expected a string or a list, got {other}"),
            )),
        }
    }
}

/// Arguments of `cmd` and `run_job`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalCall {
    pub tgt: Target,
    pub fun: String,
    pub arg: Vec<Value>,
    pub timeout: Option<u64>,
    pub expr_form: String,
    pub ret: String,
    pub kwarg: Option<Map<String, Value>>,
    /// Undeclared lowstate keys, credentials included.
    pub extra: Map<String, Value>,
}

impl LocalCall {
    pub(crate) fn from_args(mut args: CallArgs) -> Result<Self> {
        let mut positional = std::mem::take(&mut args.positional).into_iter();
        let tgt = Target::from_value(positional.next().unwrap_or(Value::Null))?;
        let fun = string_arg("fun", positional.next().unwrap_or(Value::Null))?;

        let arg = args.take_named("arg").map_or(Ok(Vec::new()), arg_list)?;
        let timeout = args.take_named("timeout").map(timeout_arg).transpose()?;
        let expr_form = optional_string_arg("expr_form", args.take_named("expr_form"))?
            .unwrap_or_else(|| DEFAULT_EXPR_FORM.to_string());
        let ret = optional_string_arg("ret", args.take_named("ret"))?.unwrap_or_default();
        let kwarg = args.take_named("kwarg").map(kwarg_arg).transpose()?.flatten();

        Ok(Self {
            tgt,
            fun,
            arg,
            timeout,
            expr_form,
            ret,
            kwarg,
            extra: args.extra,
        })
    }
}

/// Arguments of `cmd_batch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchCall {
    #[serde(flatten)]
    pub local: LocalCall,
    /// Batch size, a minion count or a percentage.
    pub batch: String,
}

impl BatchCall {
    pub(crate) fn from_args(mut args: CallArgs) -> Result<Self> {
        let batch = match args.take_named("batch") {
            None => DEFAULT_BATCH.to_string(),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(SaltApiError::invalid(
                    "batch",
                    format!("expected a count or a percentage, got {other}"),
                ))
            }
        };
        let local = LocalCall::from_args(args)?;
        Ok(Self { local, batch })
    }
}

/// Arguments of `RunnerClient.low(fun, kwargs)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerCall {
    pub fun: String,
    pub kwargs: Map<String, Value>,
}

impl RunnerCall {
    pub(crate) fn from_args(mut args: CallArgs) -> Result<Self> {
        let fun = string_arg("fun", args.positional.pop().unwrap_or(Value::Null))?;
        let mut kwargs = std::mem::take(&mut args.named);
        kwargs.extend(args.extra);
        Ok(Self { fun, kwargs })
    }
}

/// Arguments of `Wheel.master_call(**kwargs)`, `fun` included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WheelCall {
    pub kwargs: Map<String, Value>,
}

impl WheelCall {
    pub(crate) fn from_args(mut args: CallArgs) -> Result<Self> {
        let fun = string_arg("fun", args.positional.pop().unwrap_or(Value::Null))?;
        let mut kwargs = std::mem::take(&mut args.named);
        kwargs.extend(args.extra);
        kwargs.insert("fun".to_string(), Value::String(fun));
        Ok(Self { kwargs })
    }

    pub fn fun(&self) -> Option<&str> {
        self.kwargs.get("fun").and_then(Value::as_str)
    }
}

fn string_arg(name: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(SaltApiError::invalid(
            name,
            format!("expected a string, got {other}"),
        )),
    }
}

/// Absent and null both mean "use the default".
fn optional_string_arg(name: &str, value: Option<Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(other) => string_arg(name, other).map(Some),
    }
}

/// `arg` may be a list, a single value, or empty (`""` / null).
fn arg_list(value: Value) -> Result<Vec<Value>> {
    Ok(match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        other => vec![other],
    })
}

fn timeout_arg(value: Value) -> Result<u64> {
    let parsed = match &value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SaltApiError::invalid(
            "timeout",
            format!("expected a non-negative integer, got {value}"),
        )
    })
}

fn kwarg_arg(value: Value) -> Result<Option<Map<String, Value>>> {
    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(SaltApiError::invalid(
            "kwarg",
            format!("expected a mapping, got {other}"),
        )),
    }
}
