use crate::reserved::is_reserved;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Which names `Environment::set` is willing to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    /// Every name is bound, reserved words included.
    #[default]
    Permissive,
    /// Forbidden and reserved names are refused; `set` still returns the value.
    RejectReserved,
}

impl Admission {
    pub fn is_forbidden(&self, _name: &str) -> bool {
        false
    }

    /// Returns the value to store, or `None` when the binding is refused.
    pub fn admit(&self, name: &str, value: Value) -> Option<Value> {
        let restricted = self.is_forbidden(name) || is_reserved(name);
        match self {
            Admission::Permissive => Some(value),
            Admission::RejectReserved if restricted => None,
            Admission::RejectReserved => Some(value),
        }
    }
}

/// Flat variable namespace shared by every standard library call.
///
/// There is no scoping and no removal; the last write to a name wins.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
    admission: Admission,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admission(admission: Admission) -> Self {
        Self {
            variables: HashMap::new(),
            admission,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Value {
        match self.admission.admit(name, value.clone()) {
            Some(admitted) => {
                debug!(name, value = %admitted, "bound variable");
                self.variables.insert(name.to_string(), admitted.clone());
                admitted
            }
            None => {
                debug!(name, "binding refused by admission filter");
                value
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Bindings sorted by name.
    pub fn bindings(&self) -> Vec<(&str, &Value)> {
        let mut bindings: Vec<_> = self.variables.iter().map(|(k, v)| (k.as_str(), v)).collect();
        bindings.sort_by(|a, b| a.0.cmp(b.0));
        bindings
    }
}
