use super::model::Model;
use crate::scope::Namespace;
use std::fmt;

/// A runtime value bound in a scope
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Species { initial_amount: f64 },
    /// `variable' = math`
    RateRule { variable: String, math: String },
    /// A model definition; calling it produces an [`Value::Object`]
    Model(Model),
    /// The namespace of an instantiated model
    Object(Namespace<Value>),
}

impl Value {
    pub fn rate_rule(variable: impl Into<String>, math: impl Into<String>) -> Self {
        Self::RateRule {
            variable: variable.into(),
            math: math.into(),
        }
    }

    pub fn species(initial_amount: f64) -> Self {
        Self::Species { initial_amount }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Species { .. } => "species",
            Self::RateRule { .. } => "rate rule",
            Self::Model(_) => "model",
            Self::Object(_) => "object",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Namespace<Value>> {
        match self {
            Self::Object(ns) => Some(ns),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "\"{}\"", s),
            Self::Species { initial_amount } => write!(f, "<species {}>", initial_amount),
            Self::RateRule { variable, math } => write!(f, "<rate rule {}' = {}>", variable, math),
            Self::Model(model) => write!(f, "<model {}>", model.name()),
            Self::Object(ns) => write!(f, "<object with {} names>", ns.len()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
