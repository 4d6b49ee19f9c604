/// The DOM-based parser, which parses the supplied input and produces a complete [crate::JsonValue]
/// representation of its contents.
pub mod dom;

pub use dom::Parser;
