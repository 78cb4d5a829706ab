//! Set containment helper

/// Return `true` if `key` is exactly equal to one of `items`
pub fn contains<S: AsRef<str>>(items: &[S], key: &str) -> bool {
    items.iter().any(|item| item.as_ref() == key)
}
