//! Deep merge of intersection outputs

use crate::value::Value;

/// Merges the outputs of both sides of an intersection.
///
/// Equal values merge to themselves, objects merge key-wise and arrays
/// of equal length merge element-wise. Anything else is a conflict.
pub(crate) fn merge_values(left: Value, right: Value) -> Option<Value> {
    if left == right {
        return Some(left);
    }
    match (left, right) {
        (Value::Object(mut merged), Value::Object(other)) => {
            for (key, value) in other {
                let value = match merged.remove(&key) {
                    Some(existing) => merge_values(existing, value)?,
                    None => value,
                };
                merged.insert(key, value);
            }
            Some(Value::Object(merged))
        }
        (Value::Array(a), Value::Array(b)) if a.len() == b.len() => a
            .into_iter()
            .zip(b)
            .map(|(x, y)| merge_values(x, y))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_objects_unions_keys() {
        let left = Value::object([("a", Value::from(1)), ("shared", Value::from("x"))]);
        let right = Value::object([("b", Value::from(2)), ("shared", Value::from("x"))]);
        let merged = merge_values(left, right).unwrap();
        assert_eq!(
            merged,
            Value::object([
                ("a", Value::from(1)),
                ("b", Value::from(2)),
                ("shared", Value::from("x")),
            ])
        );
    }

    #[test]
    fn test_conflicts() {
        assert!(merge_values(Value::from(1), Value::from(2)).is_none());
        assert!(merge_values(
            Value::array([Value::from(1)]),
            Value::array([Value::from(1), Value::from(2)])
        )
        .is_none());
        let left = Value::object([("a", Value::from(1))]);
        let right = Value::object([("a", Value::from("1"))]);
        assert!(merge_values(left, right).is_none());
    }

    #[test]
    fn test_nested_arrays_merge_elementwise() {
        let left = Value::array([Value::object([("x", Value::from(1))])]);
        let right = Value::array([Value::object([("y", Value::from(2))])]);
        assert_eq!(
            merge_values(left, right).unwrap(),
            Value::array([Value::object([("x", Value::from(1)), ("y", Value::from(2))])])
        );
    }
}
