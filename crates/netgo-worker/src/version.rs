//! The version line a worker prints when it starts.
//!
//! The commit comes from the `build.rs` git metadata. A checkout with local
//! changes is marked `-dirty` so console logs from test builds stand out.

/// Package version plus the commit the worker was built from.
///
/// Reads `0.1.0 (1a2b3c4)`, or `0.1.0 (unknown)` for a build outside git.
#[must_use]
pub fn build_version() -> String {
    version_line(
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA"),
        option_env!("VERGEN_GIT_DIRTY") == Some("true"),
    )
}

fn version_line(package: &str, commit: Option<&str>, dirty: bool) -> String {
    match commit {
        Some(commit) if dirty => format!("{package} ({commit}-dirty)"),
        Some(commit) => format!("{package} ({commit})"),
        None => format!("{package} (unknown)"),
    }
}
