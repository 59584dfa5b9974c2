#![warn(clippy::pedantic)]

pub mod error;
pub mod header;
pub mod vint;

pub use error::WireError;
pub use header::{ElementHeader, MAX_HEADER_LEN};
pub use vint::{ElementSize, MAX_ID_WIDTH, MAX_SIZE_WIDTH};
