use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::{FilterOp, FilterOrderInfo, SortDirection};

/// Evaluates the JSON WHERE language against a JSON row.
///
/// Mirrors the SQL produced by `FilterWhere`: a missing column reads as NULL,
/// comparisons against NULL are false, `$ilike` is case-insensitive and `\`
/// escapes `%` / `_` in LIKE patterns.
pub struct FilterMatch;

impl FilterMatch {
    pub fn matches(where_data: &Value, row: &Map<String, Value>) -> Result<bool, FilterError> {
        match where_data {
            Value::Null => Ok(true),
            Value::Object(obj) => {
                for (key, value) in obj {
                    let matched = if key.starts_with('$') {
                        Self::matches_logical(key, value, row)?
                    } else {
                        Self::matches_field(key, value, row)?
                    };
                    if !matched {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        }
    }

    fn matches_logical(op: &str, value: &Value, row: &Map<String, Value>) -> Result<bool, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let mut results = Vec::with_capacity(arr.len());
                for v in arr {
                    results.push(Self::matches(v, row)?);
                }
                Ok(if op == "$and" {
                    results.into_iter().all(|r| r)
                } else {
                    results.into_iter().any(|r| r)
                })
            }
            "$not" => Ok(!Self::matches(value, row)?),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn matches_field(field: &str, value: &Value, row: &Map<String, Value>) -> Result<bool, FilterError> {
        let actual = row.get(field).unwrap_or(&Value::Null);
        match value {
            Value::Object(obj) => {
                for (op_key, op_val) in obj {
                    if !Self::matches_condition(actual, FilterOp::from_key(op_key)?, op_val)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Self::matches_condition(actual, FilterOp::Eq, value),
        }
    }

    fn matches_condition(actual: &Value, operator: FilterOp, data: &Value) -> Result<bool, FilterError> {
        let matched = match operator {
            FilterOp::Eq if data.is_null() => actual.is_null(),
            FilterOp::Ne if data.is_null() => !actual.is_null(),
            _ if actual.is_null() => false,
            FilterOp::Eq => Self::values_equal(actual, data),
            FilterOp::Ne => !Self::values_equal(actual, data),
            FilterOp::Gt => Self::compare_values(actual, data) == Some(Ordering::Greater),
            FilterOp::Gte => matches!(Self::compare_values(actual, data), Some(Ordering::Greater | Ordering::Equal)),
            FilterOp::Lt => Self::compare_values(actual, data) == Some(Ordering::Less),
            FilterOp::Lte => matches!(Self::compare_values(actual, data), Some(Ordering::Less | Ordering::Equal)),
            FilterOp::Like | FilterOp::ILike => {
                let pattern = data
                    .as_str()
                    .ok_or_else(|| FilterError::InvalidOperatorData("LIKE requires a string pattern".to_string()))?;
                match actual.as_str() {
                    Some(text) => like_match(text, pattern, operator == FilterOp::ILike),
                    None => false,
                }
            }
            FilterOp::In | FilterOp::NIn => {
                let values = data.as_array().ok_or_else(|| {
                    FilterError::InvalidOperatorData(format!("{:?} requires array", operator))
                })?;
                let found = values.iter().any(|v| Self::values_equal(actual, v));
                if operator == FilterOp::In { found } else { !found }
            }
        };
        Ok(matched)
    }

    fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x == y,
                _ => x.as_f64() == y.as_f64(),
            },
            _ => a == b,
        }
    }

    /// Ordering between two JSON scalars of the same kind; `None` when they are not comparable
    pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
            },
            (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
            (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
            _ => None,
        }
    }

    /// Sort rows by an order spec. NULLs sort last ascending and first descending, like Postgres.
    pub fn sort_rows(rows: &mut [Map<String, Value>], order: &[FilterOrderInfo]) {
        rows.sort_by(|left, right| {
            for info in order {
                let a = left.get(&info.column).unwrap_or(&Value::Null);
                let b = right.get(&info.column).unwrap_or(&Value::Null);
                let ordering = match (a.is_null(), b.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => Self::compare_values(a, b).unwrap_or(Ordering::Equal),
                };
                let ordering = match info.sort {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

enum LikeToken {
    Any,
    One,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => LikeToken::Any,
            '_' => LikeToken::One,
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

fn like_match(text: &str, pattern: &str, case_insensitive: bool) -> bool {
    let fold = |c: char| if case_insensitive { c.to_lowercase().next().unwrap_or(c) } else { c };
    let text: Vec<char> = text.chars().map(fold).collect();
    let tokens = like_tokens(pattern);

    // reachable[j]: the first i tokens can consume exactly j characters
    let mut reachable = vec![false; text.len() + 1];
    reachable[0] = true;
    for token in &tokens {
        let mut next = vec![false; text.len() + 1];
        for j in 0..=text.len() {
            if !reachable[j] {
                continue;
            }
            match token {
                LikeToken::Any => {
                    for slot in next.iter_mut().skip(j) {
                        *slot = true;
                    }
                    break;
                }
                LikeToken::One => {
                    if j < text.len() {
                        next[j + 1] = true;
                    }
                }
                LikeToken::Literal(c) => {
                    if j < text.len() && text[j] == fold(*c) {
                        next[j + 1] = true;
                    }
                }
            }
        }
        reachable = next;
    }
    reachable[text.len()]
}
