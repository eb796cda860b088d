pub mod dimension;
pub mod flex;
pub mod parsers;
pub mod style;

pub use dimension::{Dimension, Dimensions, Edge, Edges, Unit, Value};
pub use flex::{Align, Direction, Display, FlexDirection, Justify, Overflow, PositionType, Wrap};
pub use parsers::StyleParseError;
pub use style::Style;
