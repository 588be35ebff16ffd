//! Graph documents the viewer can load.

mod demo;
mod document;
mod load;

pub use demo::demo_document;
pub use document::{GraphDocument, LinkPropertyEntry, NodeEntry};
pub use load::GraphSource;
