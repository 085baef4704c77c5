//! tmxkit core - identifier layout and shared value types

mod types;
mod positions;

pub use types::*;
pub use positions::*;
