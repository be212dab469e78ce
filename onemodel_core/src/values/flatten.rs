//! Flattening of an instantiated model tree into unique names
//!
//! Every object bound as `name` is walked with its namespace pushed under
//! identifier `name`. Leaves inside the object therefore resolve to
//! `…__name__leaf`, and references from inner rate rules to names in outer
//! objects resolve to the outer full name.

use super::value::Value;
use crate::config::compile_time::scope::MAX_FLATTEN_DEPTH;
use crate::config::runtime::ScopePreferences;
use crate::lexical::{tokenize, LexerError};
use crate::logging::{codes, Code};
use crate::scope::{Namespace, Scope, ScopeError};
use crate::{log_error, log_success, log_warning};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlattenError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("Cannot read math of rate rule '{rule}': {source}")]
    Math {
        rule: String,
        #[source]
        source: LexerError,
    },
}

impl FlattenError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Scope(error) => error.error_code(),
            Self::Math { source, .. } => source.error_code(),
        }
    }
}

/// An exported leaf value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlatValue {
    Parameter { value: f64 },
    Text { value: String },
    Species { initial_amount: f64 },
    RateRule { variable: String, math: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatEntry {
    pub name: String,
    #[serde(flatten)]
    pub value: FlatValue,
}

/// Flat `(unique_name, value)` list in walk order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatModel {
    entries: Vec<FlatEntry>,
}

impl FlatModel {
    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&FlatValue> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Flattener {
    preferences: ScopePreferences,
    seen: HashSet<String>,
    output: FlatModel,
}

impl Flattener {
    pub fn new() -> Self {
        Self::with_preferences(&ScopePreferences::default())
    }

    pub fn with_preferences(preferences: &ScopePreferences) -> Self {
        Self {
            preferences: preferences.clone(),
            seen: HashSet::new(),
            output: FlatModel::default(),
        }
    }

    /// Flatten everything reachable from `root`. Model definitions are
    /// skipped; only instantiated objects contribute names.
    pub fn flatten(mut self, root: &Namespace<Value>) -> Result<FlatModel, FlattenError> {
        let mut scope = Scope::with_preferences(&self.preferences);
        let mut frame = scope.enter(root.clone(), "");

        if let Err(error) = self.walk(&mut frame, 0) {
            log_error!(error.error_code(), &error.to_string());
            return Err(error);
        }
        drop(frame);

        log_success!(codes::success::FLATTENING_COMPLETE,
            "Model flattened",
            "entries" => self.output.len()
        );
        Ok(self.output)
    }

    fn walk(&mut self, scope: &mut Scope<Value>, depth: usize) -> Result<(), FlattenError> {
        let entries: Vec<(String, Value)> = scope
            .peek()
            .map(|ns| ns.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        for (name, value) in entries {
            let flat = match value {
                Value::Number(value) => FlatValue::Parameter { value },
                Value::Text(value) => FlatValue::Text { value },
                Value::Species { initial_amount } => FlatValue::Species { initial_amount },
                Value::RateRule { variable, math } => FlatValue::RateRule {
                    variable: scope.get_fullname(&variable)?,
                    math: rewrite_math(scope, &name, &math)?,
                },
                Value::Model(_) => continue,
                Value::Object(namespace) => {
                    if depth + 1 > MAX_FLATTEN_DEPTH {
                        return Err(ScopeError::FlattenTooDeep { depth: depth + 1 }.into());
                    }
                    let mut inner = scope.enter(namespace, name);
                    self.walk(&mut inner, depth + 1)?;
                    continue;
                }
            };

            let fullname = scope.get_fullname(&name)?;
            self.record(fullname, flat)?;
        }

        Ok(())
    }

    fn record(&mut self, fullname: String, value: FlatValue) -> Result<(), FlattenError> {
        if !self.seen.insert(fullname.clone()) {
            if self.preferences.reject_name_collisions {
                return Err(ScopeError::NameCollision { fullname }.into());
            }
            log_warning!("Duplicate full name ignored", "fullname" => fullname);
            return Ok(());
        }

        self.output.entries.push(FlatEntry {
            name: fullname,
            value,
        });
        Ok(())
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten with default preferences
pub fn flatten(root: &Namespace<Value>) -> Result<FlatModel, FlattenError> {
    Flattener::new().flatten(root)
}

/// Re-lex rate rule math and replace every identifier bound to an exported
/// leaf in `scope` with its full name. Unbound identifiers (function names
/// such as `exp`), names of models and objects, and all other text are kept
/// verbatim.
fn rewrite_math(scope: &Scope<Value>, rule: &str, math: &str) -> Result<String, FlattenError> {
    let (tokens, error) = tokenize(rule, math);
    if let Some(source) = error {
        return Err(FlattenError::Math {
            rule: rule.to_string(),
            source,
        });
    }

    let chars: Vec<char> = math.chars().collect();
    let mut output = String::with_capacity(math.len());
    let mut cursor = 0;

    for token in &tokens {
        let Some(name) = token.kind.as_identifier() else {
            continue;
        };
        if !scope.get(name).is_some_and(is_exported) {
            continue;
        }

        let start = token.span.start.offset();
        output.extend(&chars[cursor..start]);
        output.push_str(&scope.get_fullname(name)?);
        cursor = token.span.end.offset();
    }
    output.extend(&chars[cursor..]);

    Ok(output)
}

/// Leaves appear in the flat model; models and objects never do
fn is_exported(value: &Value) -> bool {
    !matches!(value, Value::Model(_) | Value::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{self, LogLevel, LoggingService, MemoryLogger};
    use crate::values::Model;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn object(bindings: Vec<(&str, Value)>) -> Value {
        Value::Object(bindings.into_iter().collect())
    }

    #[test]
    fn test_nested_objects_get_prefixed_names() {
        let root: Namespace<Value> = vec![
            ("V", Value::Number(1.0)),
            (
                "A",
                object(vec![
                    ("k", Value::Number(0.5)),
                    ("B", object(vec![("x", Value::species(3.0))])),
                ]),
            ),
        ]
        .into_iter()
        .collect();

        let flat = flatten(&root).unwrap();
        let names: Vec<_> = flat.names().collect();

        assert_eq!(names, ["A__B__x", "A__k", "V"]);
        assert_eq!(flat.get("A__B__x"), Some(&FlatValue::Species { initial_amount: 3.0 }));
        assert_eq!(flat.get("V"), Some(&FlatValue::Parameter { value: 1.0 }));
    }

    #[test]
    fn test_same_name_in_sibling_instances_stays_unique() {
        let instance = || object(vec![("k", Value::Number(1.0)), ("S", Value::species(0.0))]);
        let root: Namespace<Value> = vec![("A", instance()), ("B", instance())].into_iter().collect();

        let flat = flatten(&root).unwrap();
        let names: Vec<_> = flat.names().collect();
        assert_eq!(names, ["A__S", "A__k", "B__S", "B__k"]);
    }

    #[test]
    fn test_rate_rule_references_are_rewritten() {
        let root: Namespace<Value> = vec![
            ("V", Value::Number(2.0)),
            (
                "A",
                object(vec![
                    ("k", Value::Number(0.1)),
                    ("S", Value::species(10.0)),
                    ("decay", Value::rate_rule("S", "-k*S/V + exp(k)")),
                ]),
            ),
        ]
        .into_iter()
        .collect();

        let flat = flatten(&root).unwrap();
        assert_eq!(
            flat.get("A__decay"),
            Some(&FlatValue::RateRule {
                variable: "A__S".to_string(),
                math: "-A__k*A__S/V + exp(A__k)".to_string(),
            })
        );
    }

    #[test]
    fn test_math_keeps_model_and_object_names() {
        let sub = Model::new("sub", |_: &mut Scope<Value>| Ok(()));
        let root: Namespace<Value> = vec![(
            "B",
            object(vec![
                ("k", Value::Number(1.0)),
                ("S", Value::species(2.0)),
                ("C", object(vec![("z", Value::Number(3.0))])),
                ("sub", Value::Model(sub)),
                ("r", Value::rate_rule("S", "k * C + sub(S)")),
            ]),
        )]
        .into_iter()
        .collect();

        let flat = flatten(&root).unwrap();
        assert_eq!(
            flat.get("B__r"),
            Some(&FlatValue::RateRule {
                variable: "B__S".to_string(),
                math: "B__k * C + sub(B__S)".to_string(),
            })
        );
        assert!(flat.get("B__C").is_none());
        assert_eq!(flat.get("B__C__z"), Some(&FlatValue::Parameter { value: 3.0 }));
    }

    #[test]
    fn test_scope_transitions_follow_preferences() {
        let memory = Arc::new(MemoryLogger::with_capacity(100));
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
        let root: Namespace<Value> = vec![("A", object(vec![("k", Value::Number(1.0))]))]
            .into_iter()
            .collect();

        logging::with_local_logger(service, || {
            Flattener::with_preferences(&ScopePreferences {
                log_scope_transitions: false,
                ..ScopePreferences::default()
            })
            .flatten(&root)
            .unwrap();
            assert!(!memory.get_events().iter().any(|e| e.message == "Scope push"));

            Flattener::with_preferences(&ScopePreferences {
                log_scope_transitions: true,
                ..ScopePreferences::default()
            })
            .flatten(&root)
            .unwrap();
        });

        let pushed: Vec<_> = memory
            .get_events()
            .iter()
            .filter(|e| e.message == "Scope push")
            .filter_map(|e| e.context.get("identifier").cloned())
            .collect();
        assert_eq!(pushed, ["", "A"]);
    }

    #[test]
    fn test_models_are_not_exported() {
        let model = Model::new("m", |_: &mut Scope<Value>| Ok(()));
        let root: Namespace<Value> = vec![("m", Value::Model(model)), ("k", Value::Number(1.0))]
            .into_iter()
            .collect();

        let flat = flatten(&root).unwrap();
        assert_eq!(flat.names().collect::<Vec<_>>(), ["k"]);
    }

    #[test]
    fn test_collision_is_rejected() {
        // Object `A` holding `k` collides with a top-level `A__k`
        let root: Namespace<Value> = vec![
            ("A", object(vec![("k", Value::Number(1.0))])),
            ("A__k", Value::Number(2.0)),
        ]
        .into_iter()
        .collect();

        assert_matches!(
            flatten(&root),
            Err(FlattenError::Scope(ScopeError::NameCollision { ref fullname })) if fullname == "A__k"
        );

        let lenient = Flattener::with_preferences(&ScopePreferences {
            reject_name_collisions: false,
            ..ScopePreferences::default()
        })
        .flatten(&root)
        .unwrap();
        assert_eq!(lenient.len(), 1);
        assert_eq!(lenient.get("A__k"), Some(&FlatValue::Parameter { value: 1.0 }));
    }

    #[test]
    fn test_unresolved_rate_rule_variable() {
        let root: Namespace<Value> = vec![("r", Value::rate_rule("ghost", "1"))].into_iter().collect();
        assert_matches!(
            flatten(&root),
            Err(FlattenError::Scope(ScopeError::UnresolvedName { ref name })) if name == "ghost"
        );
    }

    #[test]
    fn test_bad_math_reports_lexer_error() {
        let root: Namespace<Value> = vec![
            ("S", Value::species(1.0)),
            ("r", Value::rate_rule("S", "2 $ S")),
        ]
        .into_iter()
        .collect();

        let error = flatten(&root).unwrap_err();
        assert_matches!(error, FlattenError::Math { ref rule, .. } if rule == "r");
        assert_eq!(error.error_code(), codes::lexical::ILLEGAL_CHARACTER);
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Number(1.0);
        for _ in 0..=MAX_FLATTEN_DEPTH {
            value = object(vec![("m", value)]);
        }
        let root: Namespace<Value> = vec![("m", value)].into_iter().collect();

        assert_matches!(flatten(&root), Err(FlattenError::Scope(ScopeError::FlattenTooDeep { .. })));
    }

    #[test]
    fn test_json_output() {
        let root: Namespace<Value> = vec![("A", object(vec![("S", Value::species(5.0))]))]
            .into_iter()
            .collect();

        let json: serde_json::Value = serde_json::from_str(&flatten(&root).unwrap().to_json().unwrap()).unwrap();
        assert_eq!(json["entries"][0]["name"], "A__S");
        assert_eq!(json["entries"][0]["type"], "species");
        assert_eq!(json["entries"][0]["initial_amount"], 5.0);
    }
}
