//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Version line shown by `engine4k --version` and the editor title bar.
pub fn version_string() -> String {
    format!(
        "engine4k {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_commit_is_short_hash_or_unknown() {
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }

    #[test]
    fn test_build_date_format() {
        assert!(BUILD_DATE.len() == 10 || BUILD_DATE == "unknown");
    }

    #[test]
    fn test_version_string_mentions_package_version() {
        let v = version_string();
        assert!(v.starts_with("engine4k "));
        assert!(v.contains(env!("CARGO_PKG_VERSION")));
        assert!(v.contains(BUILD_COMMIT));
    }
}
