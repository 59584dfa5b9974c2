#![warn(clippy::pedantic)]

pub mod assembler;
pub mod config;
pub mod element;
pub mod error;
pub mod metadata;
pub mod reader;
pub mod replay;
pub mod source;
pub mod tokenizer;
pub mod visitor;

pub use assembler::DocumentAssembler;
pub use config::{ReaderConfig, TokenizerOptions};
pub use element::{DataElement, EndContainer, MkvElement, StartContainer};
pub use error::{ApplyError, ParseError};
pub use metadata::{ElementMetadata, ElementPath};
pub use reader::StreamingMkvReader;
pub use source::{ByteSource, ChunkedSource, ReaderSource};
pub use tokenizer::{EbmlTokenizer, TokenizerCallback};
pub use visitor::{CompositeVisitor, FrameEvent, FrameVisitor, MkvElementVisitor};

pub use mkv_types::{
    ElementKind, ElementTypeInfo, Frame, Lacing, MkvValue, TypeError, TypeRegistry, UnsignedPolicy,
};
pub use mkv_wire::ElementSize;
