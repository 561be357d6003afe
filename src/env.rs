//! Variable environment passed to filters and projections

use crate::error::{Error, Result};
use crate::value::Value;

/// The variable bindings for one candidate combination
///
/// Every filter and the projection receive the environment by reference and
/// resolve variables through it by name. Resolution is a direct lookup over
/// the declared clause names; a miss is always an
/// [`Error::UnboundVariable`], never a fallback to some outer scope.
///
/// The engine allocates one environment per evaluation and rebinds its
/// slots between combinations, so callables must not assume bindings
/// outlive their own invocation.
#[derive(Debug)]
pub struct Env {
    names: Vec<String>,
    values: Vec<Value>,
}

impl Env {
    pub(crate) fn new(names: Vec<String>) -> Self {
        let values = vec![Value::Null; names.len()];
        Self { names, values }
    }

    /// Rebind the slot at `index` for the next combination
    pub(crate) fn bind(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Result<&Value> {
        // Linear scan: comprehensions bind a handful of variables at most
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
            .ok_or_else(|| Error::UnboundVariable(name.to_string()))
    }

    /// Look up an integer variable
    pub fn int(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value.as_int().ok_or_else(|| Error::TypeMismatch {
            name: name.to_string(),
            expected: "int",
            found: value.type_name(),
        })
    }

    /// Look up a numeric variable as a float (ints widen)
    pub fn float(&self, name: &str) -> Result<f64> {
        let value = self.get(name)?;
        value.as_float().ok_or_else(|| Error::TypeMismatch {
            name: name.to_string(),
            expected: "float",
            found: value.type_name(),
        })
    }

    /// Look up a boolean variable
    pub fn bool(&self, name: &str) -> Result<bool> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| Error::TypeMismatch {
            name: name.to_string(),
            expected: "bool",
            found: value.type_name(),
        })
    }

    /// Look up a string variable
    pub fn str(&self, name: &str) -> Result<&str> {
        let value = self.get(name)?;
        value.as_str().ok_or_else(|| Error::TypeMismatch {
            name: name.to_string(),
            expected: "string",
            found: value.type_name(),
        })
    }

    /// Look up a list variable
    pub fn list(&self, name: &str) -> Result<&[Value]> {
        let value = self.get(name)?;
        value.as_list().ok_or_else(|| Error::TypeMismatch {
            name: name.to_string(),
            expected: "list",
            found: value.type_name(),
        })
    }

    /// Declared variable names, in clause declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
