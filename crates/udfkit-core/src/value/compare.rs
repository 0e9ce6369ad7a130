use crate::value::Value;
use std::cmp::Ordering;

impl Value {
    /// Total canonical order: variant tag first, then payload.
    ///
    /// Lists compare element-wise then by length; maps compare entry-wise
    /// (key, then value) and assume both sides are already normalized.
    #[must_use]
    pub fn canonical_cmp(left: &Self, right: &Self) -> Ordering {
        let tag_order = left.canonical_tag().cmp(&right.canonical_tag());
        if tag_order != Ordering::Equal {
            return tag_order;
        }

        match (left, right) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => cmp_lists(a, b),
            (Self::Map(a), Self::Map(b)) => cmp_map_entries(a, b),
            _ => Ordering::Equal,
        }
    }
}

fn cmp_lists(left: &[Value], right: &[Value]) -> Ordering {
    for (a, b) in left.iter().zip(right) {
        let order = Value::canonical_cmp(a, b);
        if order != Ordering::Equal {
            return order;
        }
    }

    left.len().cmp(&right.len())
}

fn cmp_map_entries(left: &[(Value, Value)], right: &[(Value, Value)]) -> Ordering {
    for ((left_key, left_value), (right_key, right_value)) in left.iter().zip(right) {
        let order = Value::canonical_cmp(left_key, right_key)
            .then_with(|| Value::canonical_cmp(left_value, right_value));
        if order != Ordering::Equal {
            return order;
        }
    }

    left.len().cmp(&right.len())
}
