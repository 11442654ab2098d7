use regex::Regex;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").expect("valid separator regex"));

/// Canonical lookup key of a project name.
///
/// Lowercases the name and folds every run of `-`, `_` and `.` into a single
/// `-`, so that `Foo_Bar`, `foo.bar` and `FOO--bar` all identify the same
/// project.
///
/// # Examples
///
/// ```
/// use cheeseshop_index::normalize;
/// assert_eq!(normalize("Django_REST.framework"), "django-rest-framework");
/// assert_eq!(normalize("zope.interface"), "zope-interface");
/// ```
pub fn normalize(name: &str) -> String {
    SEPARATORS.replace_all(&name.to_lowercase(), "-").into_owned()
}
