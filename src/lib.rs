//! comprehend - fluent, chainable list comprehensions
//!
//! Builds a filtered, mapped cross-product of one or more sequences with
//! method chaining instead of comprehension syntax, deferring all work
//! until a result is actually needed:
//!
//! ```
//! use comprehend::{comprehension, Value};
//!
//! // squares = [x**2 for x in range(10)]
//! let squares = comprehension(|env| {
//!     let x = env.int("x")?;
//!     Ok(Value::Int(x * x))
//! })
//! .var("x")?
//! .in_values(0..10)?;
//!
//! assert_eq!(
//!     squares.to_vec()?,
//!     [0, 1, 4, 9, 16, 25, 36, 49, 64, 81].map(Value::Int)
//! );
//! # Ok::<(), comprehend::Error>(())
//! ```
//!
//! Clause order fixes the nesting: the first declared variable is the
//! outermost loop, the last varies fastest. Filters run in declaration
//! order and short-circuit. The result is computed at most once per
//! builder and cached; registration after that fails with
//! [`Error::Finalized`].

pub mod builder;
pub mod env;
pub mod error;
pub mod value;

mod evaluator;

// Re-export commonly used types
pub use builder::Comprehension;
pub use env::Env;
pub use error::{Error, Result};
pub use value::Value;

/// Create a comprehension from its projection
///
/// Equivalent to [`Comprehension::new`]; the free function reads better at
/// the head of a chain.
pub fn comprehension<P>(projection: P) -> Comprehension
where
    P: Fn(&Env) -> Result<Value> + 'static,
{
    Comprehension::new(projection)
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
