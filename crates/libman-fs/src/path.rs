//! Library directory naming and containment checks

use std::path::{Component, Path};

/// Map a library name to the directory name it is installed under.
///
/// Characters outside `[A-Za-z0-9._-]` become `_`. Names made only of dots
/// are rewritten entirely so the result can never climb out of its parent.
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return "_".repeat(sanitized.len().max(1));
    }
    sanitized
}

/// Check lexically that `path` is strictly below `root`.
///
/// Used before any recursive removal so a corrupt record cannot delete
/// anything outside an install location.
pub fn is_within(root: &Path, path: &Path) -> bool {
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return false;
    }
    match path.strip_prefix(root) {
        Ok(rest) => rest.components().next().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Servo", "Servo")]
    #[case("Adafruit GFX Library", "Adafruit_GFX_Library")]
    #[case("lib/with/slash", "lib_with_slash")]
    #[case("v1.2-beta_x", "v1.2-beta_x")]
    #[case("..", "__")]
    #[case("", "_")]
    fn test_sanitize_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_name(input), expected);
    }

    #[test]
    fn test_is_within() {
        let root = Path::new("/data/libraries");
        assert!(is_within(root, Path::new("/data/libraries/Servo")));
        assert!(!is_within(root, Path::new("/data/libraries")));
        assert!(!is_within(root, Path::new("/data/other/Servo")));
        assert!(!is_within(root, Path::new("/data/libraries/../other")));
    }
}
