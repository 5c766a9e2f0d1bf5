use std::cmp::Ordering;

use anyhow::anyhow;

/// Compare two field values lexicographically as strings. Never fails.
pub fn compare_string(item1: &str, item2: &str) -> Result<Ordering, anyhow::Error> {
    Ok(item1.cmp(item2))
}

/// Compare two field values as signed 64 bit integers.
///
/// Fails when either value does not parse, naming the offending value. The
/// error aborts the sort or table build in progress.
pub fn compare_number(item1: &str, item2: &str) -> Result<Ordering, anyhow::Error> {
    let number1 = parse_number(item1)?;
    let number2 = parse_number(item2)?;
    Ok(number1.cmp(&number2))
}

fn parse_number(item: &str) -> Result<i64, anyhow::Error> {
    item.parse::<i64>()
        .map_err(|_| anyhow!("{item} is not a number"))
}

/// Wrap a comparator to reverse its ordering. Errors pass through unchanged.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use csv_row_store::compare::{compare_string, descending};
///
/// let compare = descending(compare_string);
/// assert_eq!(compare("a", "b").unwrap(), Ordering::Greater);
/// ```
pub fn descending<C>(compare: C) -> impl Fn(&str, &str) -> Result<Ordering, anyhow::Error>
where
    C: Fn(&str, &str) -> Result<Ordering, anyhow::Error>,
{
    move |item1, item2| compare(item1, item2).map(Ordering::reverse)
}

/// Stable multi-key sort shared by the sorted-rows variants.
///
/// `key` extracts the k-th key column value from an item; the comparator is
/// applied to key columns in caller order and the first non-equal result
/// wins. Items whose key columns all compare equal keep their input order.
/// The first comparator error stops the comparison work and is returned,
/// leaving the caller to discard the slice.
pub(crate) fn sort_stable<T, K, C>(
    items: &mut [T],
    key_count: usize,
    key: K,
    compare: &C,
) -> Result<(), anyhow::Error>
where
    K: Fn(&T, usize) -> &str,
    C: Fn(&str, &str) -> Result<Ordering, anyhow::Error>,
{
    let mut sort_error: Option<anyhow::Error> = None;
    items.sort_by(|item1, item2| {
        if sort_error.is_some() {
            return Ordering::Equal;
        }
        for k in 0..key_count {
            match compare(key(item1, k), key(item2, k)) {
                Ok(Ordering::Equal) => continue,
                Ok(ordering) => return ordering,
                Err(e) => {
                    sort_error = Some(e);
                    return Ordering::Equal;
                }
            }
        }
        Ordering::Equal
    });

    match sort_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
