//! Fluent builder for deferred list comprehensions

use crate::env::Env;
use crate::error::{Error, Result};
use crate::evaluator;
use crate::value::Value;
use std::cell::OnceCell;
use std::fmt;

pub(crate) type ProjectionFn = Box<dyn Fn(&Env) -> Result<Value>>;
pub(crate) type FilterFn = Box<dyn Fn(&Env) -> Result<bool>>;

/// One `for <name> in <source>` generator clause
#[derive(Debug)]
pub(crate) struct Clause {
    pub(crate) name: String,
    pub(crate) source: Vec<Value>,
}

/// A chainable list comprehension with deferred evaluation
///
/// A comprehension is constructed with a projection, then grown by
/// declaring variables ([`var`](Self::var)), binding them to sources
/// ([`in_values`](Self::in_values) / [`in_with`](Self::in_with)), and
/// appending filters ([`filter`](Self::filter)). Nothing runs until a
/// materializing operation ([`force`](Self::force), [`len`](Self::len),
/// [`iter`](Self::iter), equality, `Display`, ...) asks for the result;
/// the result is then computed once and cached for the lifetime of the
/// instance.
///
/// ```
/// use comprehend::{comprehension, Value};
///
/// let pairs = comprehension(|env| {
///     Ok(Value::List(vec![env.get("x")?.clone(), env.get("y")?.clone()]))
/// })
/// .var("x")?
/// .in_values([1, 2, 3])?
/// .var("y")?
/// .in_values([3, 1, 4])?
/// .filter(|env| Ok(env.int("x")? != env.int("y")?))?;
///
/// assert_eq!(pairs.len()?, 7);
/// # Ok::<(), comprehend::Error>(())
/// ```
pub struct Comprehension {
    projection: ProjectionFn,
    clauses: Vec<Clause>,
    filters: Vec<FilterFn>,
    pending: Option<String>,
    results: OnceCell<Vec<Value>>,
}

impl Comprehension {
    /// Create a comprehension from its projection
    pub fn new<P>(projection: P) -> Self
    where
        P: Fn(&Env) -> Result<Value> + 'static,
    {
        Self {
            projection: Box::new(projection),
            clauses: Vec::new(),
            filters: Vec::new(),
            pending: None,
            results: OnceCell::new(),
        }
    }

    /// Declare the variable for the next generator clause
    ///
    /// Must be followed by [`in_values`](Self::in_values) or
    /// [`in_with`](Self::in_with) before anything else happens to the
    /// builder.
    pub fn var(mut self, name: impl Into<String>) -> Result<Self> {
        self.ensure_open()?;
        if let Some(pending) = &self.pending {
            return Err(Error::InvalidBinding(format!(
                "variable '{pending}' was declared but never bound"
            )));
        }
        let name = name.into();
        if self.clauses.iter().any(|c| c.name == name) {
            return Err(Error::DuplicateVariable(name));
        }
        self.pending = Some(name);
        Ok(self)
    }

    /// Bind the declared variable to a literal sequence
    pub fn in_values<I>(mut self, source: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.ensure_open()?;
        let name = self.pending.take().ok_or_else(|| {
            Error::InvalidBinding("no variable declared for this source".to_string())
        })?;
        self.clauses.push(Clause {
            name,
            source: source.into_iter().map(Into::into).collect(),
        });
        Ok(self)
    }

    /// Bind the declared variable to the sequence a supplier produces
    ///
    /// The supplier runs once, at registration time; afterwards the clause
    /// is indistinguishable from one bound with [`in_values`](Self::in_values).
    pub fn in_with<F, I>(self, supplier: F) -> Result<Self>
    where
        F: FnOnce() -> I,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.ensure_open()?;
        if self.pending.is_none() {
            return Err(Error::InvalidBinding(
                "no variable declared for this source".to_string(),
            ));
        }
        self.in_values(supplier())
    }

    /// Append a filter predicate
    ///
    /// Filters see every declared variable and run in declaration order,
    /// stopping at the first one that rejects a combination.
    pub fn filter<F>(mut self, predicate: F) -> Result<Self>
    where
        F: Fn(&Env) -> Result<bool> + 'static,
    {
        self.ensure_open()?;
        if let Some(pending) = &self.pending {
            return Err(Error::InvalidBinding(format!(
                "variable '{pending}' was declared but never bound"
            )));
        }
        self.filters.push(Box::new(predicate));
        Ok(self)
    }

    /// Materialize the comprehension, computing the result on first call
    ///
    /// Evaluation runs at most once per instance; every later call (and
    /// every forwarding operation) reuses the cached sequence.
    pub fn force(&self) -> Result<&[Value]> {
        if let Some(cached) = self.results.get() {
            return Ok(cached);
        }
        if let Some(pending) = &self.pending {
            return Err(Error::InvalidBinding(format!(
                "variable '{pending}' was declared but never bound"
            )));
        }
        let computed = evaluator::evaluate(&self.projection, &self.clauses, &self.filters)?;
        Ok(self.results.get_or_init(|| computed))
    }

    /// Number of results
    pub fn len(&self) -> Result<usize> {
        Ok(self.force()?.len())
    }

    /// Whether the comprehension produced no results
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.force()?.is_empty())
    }

    /// Result at `index`, or `None` when out of range
    pub fn get(&self, index: usize) -> Result<Option<&Value>> {
        Ok(self.force()?.get(index))
    }

    /// First result, if any
    pub fn first(&self) -> Result<Option<&Value>> {
        Ok(self.force()?.first())
    }

    /// Iterate over the results
    pub fn iter(&self) -> Result<std::slice::Iter<'_, Value>> {
        Ok(self.force()?.iter())
    }

    /// Clone the results into a plain vector
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        Ok(self.force()?.to_vec())
    }

    /// Consume the builder, yielding the results
    pub fn into_vec(self) -> Result<Vec<Value>> {
        self.force()?;
        Ok(self.results.into_inner().unwrap_or_default())
    }

    /// The results as a single [`Value::List`]
    pub fn to_value(&self) -> Result<Value> {
        Ok(Value::List(self.to_vec()?))
    }

    /// The results as a `serde_json` array
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::Value::Array(
            self.force()?.iter().map(Value::to_json).collect(),
        ))
    }

    /// Render the results in the [`Value`] display syntax
    pub fn to_string_repr(&self) -> Result<String> {
        let strs: Vec<_> = self.force()?.iter().map(Value::to_string_repr).collect();
        Ok(format!("[{}]", strs.join(", ")))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.results.get().is_some() {
            Err(Error::Finalized)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Comprehension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comprehension")
            .field("clauses", &self.clauses)
            .field("filters", &self.filters.len())
            .field("pending", &self.pending)
            .field("materialized", &self.results.get().is_some())
            .finish()
    }
}

/// Forwarding `Display`: forces evaluation, rendering an evaluation error
/// inline since `fmt` cannot carry one.
impl fmt::Display for Comprehension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_string_repr() {
            Ok(repr) => f.write_str(&repr),
            Err(err) => write!(f, "<unevaluable comprehension: {err}>"),
        }
    }
}

/// Forwarding equality against a plain sequence. A comprehension whose
/// evaluation fails compares unequal to everything.
impl PartialEq<[Value]> for Comprehension {
    fn eq(&self, other: &[Value]) -> bool {
        self.force().map(|values| values == other).unwrap_or(false)
    }
}

impl PartialEq<Vec<Value>> for Comprehension {
    fn eq(&self, other: &Vec<Value>) -> bool {
        self.force()
            .map(|values| values == other.as_slice())
            .unwrap_or(false)
    }
}

impl PartialEq<Comprehension> for Vec<Value> {
    fn eq(&self, other: &Comprehension) -> bool {
        other == self
    }
}
