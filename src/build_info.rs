//! Version and build stamp baked in by build.rs.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version string, e.g. `idle-miner 0.1.0 (2026-10-14 abc1234)`.
pub fn version_line() -> String {
    format!(
        "idle-miner {} ({} {})",
        BUILD_VERSION, BUILD_DATE, BUILD_COMMIT
    )
}
