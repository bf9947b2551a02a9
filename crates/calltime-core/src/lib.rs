pub mod archetype;
pub mod carousel;
pub mod error;
pub mod gifts;
pub mod share;
pub mod types;

pub use error::RecapError;
pub use types::*;

/// Product name used in file names, share text, and hashtags.
pub const PRODUCT_NAME: &str = "Calltime";

/// Recap year used when neither config nor flags name one.
pub const DEFAULT_YEAR: i32 = 2025;
