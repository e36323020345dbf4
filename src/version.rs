// Build-time version from Cargo.toml, reported by GET /version

/// fridgetop version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");
