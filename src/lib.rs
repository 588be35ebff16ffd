pub mod graph;
pub mod source;
pub mod util;
