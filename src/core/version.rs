//! Build metadata generated by the build script.
//! Kept in one place so the CLI and log banners agree on what was built.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Package version followed by git hash and build time, used for `--version`
pub fn long_version() -> &'static str {
    LONG_VERSION
}
