use super::value::Value;
use crate::logging::codes;
use crate::scope::{Namespace, Scope, ScopeError};
use crate::log_success;
use std::fmt;
use std::rc::Rc;

/// The executable body of a model definition.
///
/// Implementations bind the model's names into the innermost frame of the
/// scope they are handed; outer frames are visible for lookups.
pub trait ModelBody {
    fn evaluate(&self, scope: &mut Scope<Value>) -> Result<(), ScopeError>;
}

impl<F> ModelBody for F
where
    F: Fn(&mut Scope<Value>) -> Result<(), ScopeError>,
{
    fn evaluate(&self, scope: &mut Scope<Value>) -> Result<(), ScopeError> {
        self(scope)
    }
}

/// A named model definition. Clones share the same body.
#[derive(Clone)]
pub struct Model {
    name: String,
    body: Rc<dyn ModelBody>,
}

impl Model {
    pub fn new(name: impl Into<String>, body: impl ModelBody + 'static) -> Self {
        Self {
            name: name.into(),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the body in a fresh frame and return the frame's bindings as
    /// an object. The frame is popped whether or not the body succeeds.
    pub fn instantiate(&self, scope: &mut Scope<Value>) -> Result<Value, ScopeError> {
        let mut frame = scope.enter(Namespace::new(), "");
        self.body.evaluate(&mut frame)?;
        let (namespace, _) = frame.exit()?;

        log_success!(codes::success::MODEL_INSTANTIATED,
            "Model instantiated",
            "model" => self.name,
            "names" => namespace.len()
        );

        Ok(Value::Object(namespace))
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<model {}>", self.name)
    }
}

/// Two models are equal only if they are the same definition
impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body) && self.name == other.name
    }
}
