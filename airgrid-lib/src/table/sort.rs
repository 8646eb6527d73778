//! Sort state and value ordering.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::model::Value;

/// Direction of an active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Applies the direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// An active sort: column key plus direction.
///
/// "No sort" is represented as `Option::<Sort>::None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub key: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Returns the sort that follows `current` when `key` is clicked.
    ///
    /// A different key starts ascending; the same key cycles
    /// ascending → descending → none.
    pub fn cycle(current: Option<&Sort>, key: &str) -> Option<Sort> {
        match current {
            Some(sort) if sort.key == key => match sort.direction {
                SortDirection::Asc => Some(Sort::desc(key)),
                SortDirection::Desc => None,
            },
            _ => Some(Sort::asc(key)),
        }
    }
}

/// Orders two field values ascending.
///
/// Values that both read as finite numbers compare numerically, and any
/// number sorts before any non-number. Two non-numbers compare by string
/// form with [`natural_cmp`]; missing and null values read as the empty
/// string. Splitting numbers from text keeps this a total order, which
/// `sort_by` requires.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);

    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => natural_cmp(&a.to_text(), &b.to_text()),
    }
}

/// Case-insensitive string ordering that compares digit runs by value.
///
/// `"item2"` sorts before `"Item10"`, and strings differing only in case
/// are equal so a stable sort keeps their original order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        let ordering = match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let xs = take_digits(&mut a);
                let ys = take_digits(&mut b);
                cmp_digit_runs(&xs, &ys)
            }
            (Some(x), Some(y)) => {
                a.next();
                b.next();
                Iterator::cmp(x.to_lowercase(), y.to_lowercase())
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        let asc = Sort::cycle(None, "name");
        assert_eq!(asc, Some(Sort::asc("name")));
        let desc = Sort::cycle(asc.as_ref(), "name");
        assert_eq!(desc, Some(Sort::desc("name")));
        assert_eq!(Sort::cycle(desc.as_ref(), "name"), None);
    }

    #[test]
    fn test_cycle_other_key_restarts() {
        let current = Sort::desc("name");
        assert_eq!(Sort::cycle(Some(&current), "price"), Some(Sort::asc("price")));
    }

    #[test]
    fn test_natural_order() {
        assert_eq!(natural_cmp("item2", "item10"), Ordering::Less);
        assert_eq!(natural_cmp("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
        assert_eq!(natural_cmp("v007", "v7"), Ordering::Equal);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let nine = Value::from("9");
        let ten = Value::from(10i64);
        assert_eq!(compare_values(Some(&nine), Some(&ten)), Ordering::Less);

        let cheap = Value::from(0.5);
        let pricey = Value::from("12.75");
        assert_eq!(compare_values(Some(&pricey), Some(&cheap)), Ordering::Greater);
    }

    #[test]
    fn test_mixed_values_fall_back_to_text() {
        let number = Value::from(5i64);
        let word = Value::from("five");
        assert_eq!(compare_values(Some(&number), Some(&word)), Ordering::Less);
        assert_eq!(compare_values(None, Some(&word)), Ordering::Less);
        assert_eq!(compare_values(None, Some(&Value::Null)), Ordering::Equal);
    }

    #[test]
    fn test_numbers_sort_before_text() {
        let decimal = Value::from("0.85");
        let code = Value::from("0.10x");
        assert_eq!(compare_values(Some(&decimal), Some(&code)), Ordering::Less);
        assert_eq!(compare_values(Some(&code), Some(&decimal)), Ordering::Greater);
        assert_eq!(compare_values(Some(&Value::from(99i64)), None), Ordering::Less);
    }

    #[test]
    fn test_mixed_sort_is_total_for_any_input_order() {
        const MIXED: [&str; 12] = [
            "0.9", "0.85", "0.10x", "1.5", "1.25", "1.10a", "", "item2", "Item10", "-3", "v007", "12",
        ];
        let values: Vec<Value> = (0..60).map(|i| Value::from(MIXED[i % MIXED.len()])).collect();
        let n = values.len();

        let mut expected: Option<Vec<String>> = None;
        // every stride is coprime with 60, so each (stride, offset) pair is a permutation
        for stride in [1, 7, 11, 13, 59] {
            for offset in 0..n {
                let mut shuffled: Vec<&Value> = (0..n).map(|i| &values[(i * stride + offset) % n]).collect();
                shuffled.sort_by(|a, b| compare_values(Some(a), Some(b)));

                for pair in shuffled.windows(2) {
                    assert_ne!(compare_values(Some(pair[0]), Some(pair[1])), Ordering::Greater);
                }
                let texts: Vec<String> = shuffled.iter().map(|v| v.to_text().into_owned()).collect();
                match &expected {
                    Some(first) => assert_eq!(&texts, first),
                    None => expected = Some(texts),
                }
            }
        }

        let sorted = expected.unwrap();
        assert_eq!(sorted[0], "-3");
        let first_text = sorted.iter().position(|t| Value::from(t.as_str()).as_number().is_none()).unwrap();
        assert!(sorted[first_text..].iter().all(|t| Value::from(t.as_str()).as_number().is_none()));
    }
}
