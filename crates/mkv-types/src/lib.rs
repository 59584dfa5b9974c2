#![warn(clippy::pedantic)]

pub mod error;
pub mod kind;
pub mod type_info;
pub mod registry;
pub mod matroska;
pub mod frame;
pub mod value;

pub use error::TypeError;
pub use frame::{Frame, Lacing};
pub use kind::ElementKind;
pub use registry::TypeRegistry;
pub use type_info::ElementTypeInfo;
pub use value::{MkvValue, UnsignedPolicy};
