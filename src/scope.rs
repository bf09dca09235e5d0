use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    value::Value,
};

/// The single global scope: variable name to its current value.
#[derive(Debug, Default)]
pub struct Scope {
    values: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing any earlier binding.
    pub fn set(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.values.get(name).ok_or_else(|| Error::UndefinedVariable {
            name: name.to_owned(),
        })
    }
}
