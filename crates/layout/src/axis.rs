//! Mapping from flex axes to physical edges and dimensions.
use flexlay_style::{Dimension, Edge, FlexDirection};

pub(crate) trait AxisExt {
    /// The edge where items along this axis start.
    fn leading_edge(self) -> Edge;
    /// The edge where items along this axis end.
    fn trailing_edge(self) -> Edge;
    /// The size measured along this axis.
    fn dimension(self) -> Dimension;
}

impl AxisExt for FlexDirection {
    fn leading_edge(self) -> Edge {
        match self {
            FlexDirection::Column => Edge::Top,
            FlexDirection::ColumnReverse => Edge::Bottom,
            FlexDirection::Row => Edge::Left,
            FlexDirection::RowReverse => Edge::Right,
        }
    }

    fn trailing_edge(self) -> Edge {
        match self {
            FlexDirection::Column => Edge::Bottom,
            FlexDirection::ColumnReverse => Edge::Top,
            FlexDirection::Row => Edge::Right,
            FlexDirection::RowReverse => Edge::Left,
        }
    }

    fn dimension(self) -> Dimension {
        if self.is_row() {
            Dimension::Width
        } else {
            Dimension::Height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_axes_swap_edges() {
        assert_eq!(FlexDirection::RowReverse.leading_edge(), Edge::Right);
        assert_eq!(FlexDirection::RowReverse.trailing_edge(), Edge::Left);
        assert_eq!(FlexDirection::ColumnReverse.leading_edge(), Edge::Bottom);
        assert_eq!(FlexDirection::Column.dimension(), Dimension::Height);
        assert_eq!(FlexDirection::RowReverse.dimension(), Dimension::Width);
    }
}
