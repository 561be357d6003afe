//! Cross-product evaluation engine for comprehensions

use crate::builder::{Clause, FilterFn, ProjectionFn};
use crate::env::Env;
use crate::error::Result;
use crate::value::Value;
use tracing::{debug, trace};

/// Materialize a comprehension into its result sequence
///
/// Enumerates the cross-product of the clause sources in nested-loop order:
/// the first declared clause is the outermost loop and the last declared
/// clause varies fastest. For each combination the environment is rebound,
/// filters run in declaration order (stopping at the first rejection), and
/// the projection output of every surviving combination is appended.
pub(crate) fn evaluate(
    projection: &ProjectionFn,
    clauses: &[Clause],
    filters: &[FilterFn],
) -> Result<Vec<Value>> {
    debug!(
        clauses = clauses.len(),
        filters = filters.len(),
        "materializing comprehension"
    );

    // Degenerate cross-product: no clauses means no combinations. An empty
    // source empties the whole product as well.
    if clauses.is_empty() || clauses.iter().any(|c| c.source.is_empty()) {
        return Ok(Vec::new());
    }

    let names = clauses.iter().map(|c| c.name.clone()).collect();
    let mut env = Env::new(names);
    let mut indices = vec![0usize; clauses.len()];
    let mut results = Vec::new();

    'combinations: loop {
        for (slot, (clause, &index)) in clauses.iter().zip(indices.iter()).enumerate() {
            env.bind(slot, clause.source[index].clone());
        }

        let mut passed = true;
        for filter in filters {
            if !filter(&env)? {
                trace!(?indices, "combination rejected");
                passed = false;
                break;
            }
        }

        if passed {
            results.push(projection(&env)?);
        }

        // Odometer increment: the last clause is the fastest-varying digit
        let mut position = clauses.len();
        loop {
            if position == 0 {
                break 'combinations;
            }
            position -= 1;
            indices[position] += 1;
            if indices[position] < clauses[position].source.len() {
                break;
            }
            indices[position] = 0;
        }
    }

    debug!(results = results.len(), "comprehension materialized");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::Cell;
    use std::rc::Rc;

    fn clause(name: &str, values: Vec<i64>) -> Clause {
        Clause {
            name: name.to_string(),
            source: values.into_iter().map(Value::Int).collect(),
        }
    }

    fn identity_pair() -> ProjectionFn {
        Box::new(|env| {
            Ok(Value::List(vec![
                env.get("x")?.clone(),
                env.get("y")?.clone(),
            ]))
        })
    }

    #[test]
    fn test_no_clauses_is_empty() {
        let projection: ProjectionFn = Box::new(|_| Ok(Value::Null));
        assert_eq!(evaluate(&projection, &[], &[]).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn test_empty_source_empties_product() {
        let projection = identity_pair();
        let clauses = vec![clause("x", vec![1, 2]), clause("y", vec![])];
        assert_eq!(
            evaluate(&projection, &clauses, &[]).unwrap(),
            Vec::<Value>::new()
        );
    }

    #[test]
    fn test_nesting_order() {
        // [(x, y) for x in [1,2] for y in [10, 20]]: x is the outer loop
        let projection = identity_pair();
        let clauses = vec![clause("x", vec![1, 2]), clause("y", vec![10, 20])];
        let results = evaluate(&projection, &clauses, &[]).unwrap();

        let pair = |a: i64, b: i64| Value::List(vec![Value::Int(a), Value::Int(b)]);
        assert_eq!(
            results,
            vec![pair(1, 10), pair(1, 20), pair(2, 10), pair(2, 20)]
        );
    }

    #[test]
    fn test_filter_short_circuit() {
        let projection: ProjectionFn = Box::new(|env| Ok(env.get("x")?.clone()));
        let clauses = vec![clause("x", vec![1, 2, 3])];

        let second_calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&second_calls);

        let filters: Vec<FilterFn> = vec![
            Box::new(|env| Ok(env.int("x")? != 2)),
            Box::new(move |_| {
                counter.set(counter.get() + 1);
                Ok(true)
            }),
        ];

        let results = evaluate(&projection, &clauses, &filters).unwrap();
        assert_eq!(results, vec![Value::Int(1), Value::Int(3)]);
        // The second filter never ran for the rejected combination
        assert_eq!(second_calls.get(), 2);
    }

    #[test]
    fn test_unbound_variable_aborts() {
        let projection: ProjectionFn = Box::new(|env| Ok(env.get("missing")?.clone()));
        let clauses = vec![clause("x", vec![1])];
        assert_eq!(
            evaluate(&projection, &clauses, &[]),
            Err(Error::UnboundVariable("missing".to_string()))
        );
    }
}
