//! Search predicates shared by the list filters

/// Case-insensitive substring match of `needle` against any of `fields`.
///
/// A missing or blank needle matches everything.
pub fn matches_search<'a, I>(needle: Option<&str>, fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = match needle.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_lowercase(),
        _ => return true,
    };
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Equality check for an optional enum filter; `None` matches everything.
pub fn matches_eq<T: PartialEq>(wanted: Option<&T>, actual: &T) -> bool {
    wanted.is_none_or(|w| w == actual)
}
