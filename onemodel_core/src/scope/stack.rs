//! The namespace stack behind lexical scoping and name flattening

use super::error::ScopeError;
use super::guard::ScopeGuard;
use super::namespace::Namespace;
use crate::config::compile_time::scope::MAX_FULLNAME_LENGTH;
use crate::config::runtime::ScopePreferences;
use crate::{log_debug, log_error};

/// Separator placed after each frame identifier in a full name
pub const FULLNAME_SEPARATOR: &str = "__";

/// A LIFO stack of namespaces, innermost last.
///
/// `namespaces` and `identifiers` are parallel: `identifiers[i]` is the name
/// `namespaces[i]` was pushed under, or `""` for an anonymous frame. Every
/// mutation keeps the two the same length.
#[derive(Debug, Clone)]
pub struct Scope<V> {
    namespaces: Vec<Namespace<V>>,
    identifiers: Vec<String>,
    log_transitions: bool,
}

impl<V> Scope<V> {
    pub fn new() -> Self {
        Self {
            namespaces: Vec::new(),
            identifiers: Vec::new(),
            log_transitions: false,
        }
    }

    pub fn with_preferences(preferences: &ScopePreferences) -> Self {
        Self {
            log_transitions: preferences.log_scope_transitions,
            ..Self::new()
        }
    }

    /// Push a frame. Identifiers need not be unique.
    pub fn push(&mut self, namespace: Namespace<V>, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if self.log_transitions {
            log_debug!("Scope push",
                "identifier" => identifier,
                "depth" => self.depth() + 1
            );
        }
        self.namespaces.push(namespace);
        self.identifiers.push(identifier);
    }

    /// Remove the innermost frame and hand it back. The namespace is not
    /// destroyed, so a caller may keep it alive elsewhere.
    pub fn pop(&mut self) -> Result<(Namespace<V>, String), ScopeError> {
        match (self.namespaces.pop(), self.identifiers.pop()) {
            (Some(namespace), Some(identifier)) => {
                if self.log_transitions {
                    log_debug!("Scope pop",
                        "identifier" => identifier,
                        "depth" => self.depth()
                    );
                }
                Ok((namespace, identifier))
            }
            _ => Err(empty_scope("pop")),
        }
    }

    /// Push a frame that is popped again when the returned guard drops
    pub fn enter(&mut self, namespace: Namespace<V>, identifier: impl Into<String>) -> ScopeGuard<'_, V> {
        let base_depth = self.depth();
        self.push(namespace, identifier);
        ScopeGuard::new(self, base_depth)
    }

    pub(super) fn truncate(&mut self, depth: usize) {
        self.namespaces.truncate(depth);
        self.identifiers.truncate(depth);
    }

    pub fn peek(&self) -> Option<&Namespace<V>> {
        self.namespaces.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut Namespace<V>> {
        self.namespaces.last_mut()
    }

    /// Bind `name` in the innermost namespace only
    pub fn set(&mut self, name: impl Into<String>, value: V) -> Result<(), ScopeError> {
        let namespace = self.namespaces.last_mut().ok_or_else(|| empty_scope("set"))?;
        namespace.insert(name, value);
        Ok(())
    }

    /// Innermost binding of `name`, or `None` if no frame defines it
    pub fn get(&self, name: &str) -> Option<&V> {
        self.namespaces.iter().rev().find_map(|ns| ns.get(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.namespaces.iter_mut().rev().find_map(|ns| ns.get_mut(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.owning_depth(name).is_some()
    }

    /// Index of the innermost frame that binds `name`
    fn owning_depth(&self, name: &str) -> Option<usize> {
        self.namespaces.iter().rposition(|ns| ns.contains(name))
    }

    /// Globally unique name for `name` as resolved from the innermost frame.
    ///
    /// The non-empty identifiers of every frame from the outermost up to and
    /// including the owning one are joined in order, each followed by `__`,
    /// then `name` is appended: frames `A`, `B`, `""` with `x` bound in the
    /// last give `A__B__x`, and `x` bound in `B` itself gives the same.
    /// Depends only on the current stack contents.
    pub fn get_fullname(&self, name: &str) -> Result<String, ScopeError> {
        let depth = self
            .owning_depth(name)
            .ok_or_else(|| ScopeError::UnresolvedName {
                name: name.to_string(),
            })?;

        let mut fullname = String::new();
        for identifier in self.identifiers[..=depth].iter().filter(|id| !id.is_empty()) {
            fullname.push_str(identifier);
            fullname.push_str(FULLNAME_SEPARATOR);
        }
        fullname.push_str(name);

        let length = fullname.chars().count();
        if length > MAX_FULLNAME_LENGTH {
            return Err(ScopeError::FullnameTooLong { length });
        }
        Ok(fullname)
    }

    pub fn depth(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Frame identifiers, outermost first
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn namespaces(&self) -> &[Namespace<V>] {
        &self.namespaces
    }
}

impl<V> Default for Scope<V> {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn empty_scope(operation: &'static str) -> ScopeError {
    let error = ScopeError::EmptyScope { operation };
    log_error!(error.error_code(), &error.to_string(), "operation" => operation);
    error
}
