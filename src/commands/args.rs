//! Argument binding.
//!
//! Commands declare their arguments as a static list of [`ArgSpec`]s
//! instead of parsing tokens themselves. The binder walks that list
//! left-to-right over the tokens left after routing:
//!
//! | Kind      | Consumes                     | Missing token          |
//! |-----------|------------------------------|------------------------|
//! | `Str`     | exactly one token            | `TooFewArguments`      |
//! | `Int`     | one token, base-10 `i64`     | `TooFewArguments`      |
//! | `StrList` | every remaining token        | empty list is fine     |
//! | `IntList` | every remaining token, `i64` | empty list is fine     |
//!
//! List kinds are only legal as the last argument. Tokens left over after
//! the last argument are an error. Binding is all-or-nothing.
//!
//! Each dispatch binds into a fresh [`Args`] value, so nothing a command
//! saw in one invocation can leak into the next one.

use super::Command;
use crate::error::HandlerError;
use thiserror::Error;

/// Semantic type of an argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Str,
    Int,
    StrList,
    IntList,
}

impl ArgKind {
    #[inline]
    pub fn is_list(self) -> bool {
        matches!(self, Self::StrList | Self::IntList)
    }

    fn label(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::StrList => "string list",
            Self::IntList => "integer list",
        }
    }
}

/// One declared argument: the name shown in usage text plus its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
}

impl ArgSpec {
    pub const fn string(name: &'static str) -> Self {
        Self { name, kind: ArgKind::Str }
    }

    pub const fn int(name: &'static str) -> Self {
        Self { name, kind: ArgKind::Int }
    }

    pub const fn strings(name: &'static str) -> Self {
        Self { name, kind: ArgKind::StrList }
    }

    pub const fn ints(name: &'static str) -> Self {
        Self { name, kind: ArgKind::IntList }
    }
}

/// A bound argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    StrList(Vec<String>),
    IntList(Vec<i64>),
}

impl ArgValue {
    fn zero(kind: ArgKind) -> Self {
        match kind {
            ArgKind::Str => Self::Str(String::new()),
            ArgKind::Int => Self::Int(0),
            ArgKind::StrList => Self::StrList(Vec::new()),
            ArgKind::IntList => Self::IntList(Vec::new()),
        }
    }
}

/// Arity and type failures while binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("too few arguments: missing `{field}`")]
    TooFewArguments { field: &'static str },

    #[error("too many arguments: expected {expected}, got {got}")]
    TooManyArguments { expected: usize, got: usize },

    #[error("`{field}` must be an integer, got `{token}`")]
    InvalidInteger { field: &'static str, token: String },

    #[error("list argument `{field}` must be the last argument")]
    ListNotLast { field: &'static str },
}

/// Check that only the last argument is a list.
pub fn validate(specs: &[ArgSpec]) -> Result<(), BindError> {
    let Some((_, init)) = specs.split_last() else {
        return Ok(());
    };
    match init.iter().find(|spec| spec.kind.is_list()) {
        Some(spec) => Err(BindError::ListNotLast { field: spec.name }),
        None => Ok(()),
    }
}

fn parse_int(spec: &ArgSpec, token: &str) -> Result<i64, BindError> {
    token.parse().map_err(|_| BindError::InvalidInteger {
        field: spec.name,
        token: token.to_string(),
    })
}

/// Bound arguments for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    specs: &'static [ArgSpec],
    values: Vec<ArgValue>,
}

impl Args {
    /// Zero-valued arguments for `specs`.
    pub fn new(specs: &'static [ArgSpec]) -> Self {
        Self {
            specs,
            values: specs.iter().map(|spec| ArgValue::zero(spec.kind)).collect(),
        }
    }

    /// Bind `tokens` into a fresh value.
    pub fn bind(specs: &'static [ArgSpec], tokens: &[&str]) -> Result<Self, BindError> {
        let mut args = Self::new(specs);
        args.fill(tokens)?;
        Ok(args)
    }

    /// Populate every slot from `tokens`.
    ///
    /// On error the current values are left untouched.
    pub fn fill(&mut self, tokens: &[&str]) -> Result<(), BindError> {
        validate(self.specs)?;

        let mut values = Vec::with_capacity(self.specs.len());
        let mut rest = tokens;
        for spec in self.specs {
            let value = match spec.kind {
                ArgKind::Str | ArgKind::Int => {
                    let (token, tail) = rest
                        .split_first()
                        .ok_or(BindError::TooFewArguments { field: spec.name })?;
                    rest = tail;
                    if spec.kind == ArgKind::Str {
                        ArgValue::Str(token.to_string())
                    } else {
                        ArgValue::Int(parse_int(spec, token)?)
                    }
                }
                ArgKind::StrList => {
                    let list = rest.iter().map(|token| token.to_string()).collect();
                    rest = &[];
                    ArgValue::StrList(list)
                }
                ArgKind::IntList => {
                    let list = rest
                        .iter()
                        .map(|token| parse_int(spec, token))
                        .collect::<Result<_, _>>()?;
                    rest = &[];
                    ArgValue::IntList(list)
                }
            };
            values.push(value);
        }

        if !rest.is_empty() {
            return Err(BindError::TooManyArguments {
                expected: tokens.len() - rest.len(),
                got: tokens.len(),
            });
        }

        self.values = values;
        Ok(())
    }

    /// Reset every slot to its zero value.
    pub fn clean(&mut self) {
        for (value, spec) in self.values.iter_mut().zip(self.specs) {
            *value = ArgValue::zero(spec.kind);
        }
    }

    pub fn specs(&self) -> &'static [ArgSpec] {
        self.specs
    }

    fn value(&self, name: &str) -> Option<&ArgValue> {
        self.specs
            .iter()
            .zip(&self.values)
            .find(|(spec, _)| spec.name == name)
            .map(|(_, value)| value)
    }

    pub fn string(&self, name: &str) -> Result<&str, HandlerError> {
        match self.value(name) {
            Some(ArgValue::Str(value)) => Ok(value),
            _ => Err(missing(name, ArgKind::Str)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64, HandlerError> {
        match self.value(name) {
            Some(ArgValue::Int(value)) => Ok(*value),
            _ => Err(missing(name, ArgKind::Int)),
        }
    }

    pub fn strings(&self, name: &str) -> Result<&[String], HandlerError> {
        match self.value(name) {
            Some(ArgValue::StrList(value)) => Ok(value),
            _ => Err(missing(name, ArgKind::StrList)),
        }
    }

    pub fn ints(&self, name: &str) -> Result<&[i64], HandlerError> {
        match self.value(name) {
            Some(ArgValue::IntList(value)) => Ok(value),
            _ => Err(missing(name, ArgKind::IntList)),
        }
    }
}

fn missing(name: &str, kind: ArgKind) -> HandlerError {
    HandlerError::Internal(format!("no {} argument named `{name}`", kind.label()))
}

/// Render `<prefix><alias> <arg1> <arg2> ...` from declarations only.
pub fn usage(prefix: &str, command: &dyn Command) -> String {
    let alias = command.aliases().first().copied().unwrap_or_default();
    let mut out = format!("{prefix}{alias}");
    for spec in command.args() {
        out.push(' ');
        out.push_str(spec.name);
    }
    out
}
