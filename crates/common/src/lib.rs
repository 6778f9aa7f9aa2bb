//! Shared types used across the rolestage crates.
//!
//! # Invariants
//! - Colors are authored as sRGB hex and converted to linear only at the GPU boundary.
//! - Every configuration field has a default; an empty config file is valid.

pub mod config;
mod types;

pub use config::{ConfigError, ViewerConfig, WindowConfig};
pub use types::{Color, Transform};

pub fn crate_info() -> &'static str {
    concat!("rolestage-common v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
