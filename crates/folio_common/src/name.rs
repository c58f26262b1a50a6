//! Helpers for backslash-qualified class and namespace names.

/// Separator between namespace segments (`Acme\Http\Client`).
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Strips any leading separators so `\Foo\Bar` and `Foo\Bar` name the same class.
pub fn normalize_class_name(name: &str) -> &str {
    name.trim_start_matches(NAMESPACE_SEPARATOR)
}

/// Returns the last segment of a qualified name.
pub fn short_name(name: &str) -> &str {
    match name.rfind(NAMESPACE_SEPARATOR) {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Returns every proper ancestor of a namespace, nearest first.
///
/// `Acme\Http\Client` yields `Acme\Http` then `Acme`. The global namespace
/// (`""`) is never included.
pub fn namespace_ancestors(namespace: &str) -> Vec<&str> {
    let mut ancestors = Vec::new();
    let mut current = namespace;
    while let Some(pos) = current.rfind(NAMESPACE_SEPARATOR) {
        current = &current[..pos];
        if current.is_empty() {
            break;
        }
        ancestors.push(current);
    }
    ancestors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_leading_separators() {
        assert_eq!(normalize_class_name("\\Acme\\Foo"), "Acme\\Foo");
        assert_eq!(normalize_class_name("Foo"), "Foo");
    }

    #[test]
    fn short_name_of_qualified() {
        assert_eq!(short_name("Acme\\Http\\Client"), "Client");
        assert_eq!(short_name("Client"), "Client");
    }

    #[test]
    fn ancestors_nearest_first() {
        assert_eq!(
            namespace_ancestors("Acme\\Http\\Client"),
            vec!["Acme\\Http", "Acme"]
        );
        assert!(namespace_ancestors("Acme").is_empty());
        assert!(namespace_ancestors("").is_empty());
    }
}
