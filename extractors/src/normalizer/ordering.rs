use std::cmp::Ordering;

/// True when `items` is in non-decreasing order, or non-increasing when
/// `inverse_order` is set. Empty and single-item lists are sorted.
pub fn verify_list_sorted<T: Ord>(items: &[T], inverse_order: bool) -> bool {
    is_sorted_by(items, inverse_order, |a, b| a.cmp(b))
}

/// [`verify_list_sorted`] for strings, comparing them case-insensitively
pub fn verify_list_sorted_ignore_case<S: AsRef<str>>(items: &[S], inverse_order: bool) -> bool {
    is_sorted_by(items, inverse_order, |a, b| {
        a.as_ref().to_lowercase().cmp(&b.as_ref().to_lowercase())
    })
}

fn is_sorted_by<T, F>(items: &[T], inverse_order: bool, compare: F) -> bool
where
    F: Fn(&T, &T) -> Ordering,
{
    items.windows(2).all(|pair| {
        let ordering = compare(&pair[0], &pair[1]);
        if inverse_order {
            ordering != Ordering::Less
        } else {
            ordering != Ordering::Greater
        }
    })
}
