//! Defines enums for the flexbox layout properties.
//!
//! Each enum has exactly one default and serializes as its CSS keyword.
use crate::parsers::StyleParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! keyword_enum {
    ($name:ident, $property:literal { $($variant:ident => $keyword:literal),+ $(,)? }) => {
        impl $name {
            pub const VARIANTS: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $keyword),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StyleParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($keyword => Ok($name::$variant),)+
                    _ => Err(StyleParseError::InvalidValue {
                        property: $property.to_string(),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Inherit,
    Ltr,
    Rtl,
}

keyword_enum!(Direction, "direction" {
    Inherit => "inherit",
    Ltr => "ltr",
    Rtl => "rtl",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    #[default]
    Column,
    ColumnReverse,
    Row,
    RowReverse,
}

keyword_enum!(FlexDirection, "flex-direction" {
    Column => "column",
    ColumnReverse => "column-reverse",
    Row => "row",
    RowReverse => "row-reverse",
});

impl FlexDirection {
    pub fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    pub fn is_column(self) -> bool {
        matches!(self, FlexDirection::Column | FlexDirection::ColumnReverse)
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }

    /// Row directions flip under right-to-left layout.
    pub fn resolve(self, direction: Direction) -> FlexDirection {
        if direction == Direction::Rtl {
            match self {
                FlexDirection::Row => return FlexDirection::RowReverse,
                FlexDirection::RowReverse => return FlexDirection::Row,
                _ => {}
            }
        }
        self
    }

    /// The cross axis for this main axis under `direction`.
    pub fn cross(self, direction: Direction) -> FlexDirection {
        if self.is_column() {
            FlexDirection::Row.resolve(direction)
        } else {
            FlexDirection::Column
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

keyword_enum!(Justify, "justify-content" {
    FlexStart => "flex-start",
    Center => "center",
    FlexEnd => "flex-end",
    SpaceBetween => "space-between",
    SpaceAround => "space-around",
    SpaceEvenly => "space-evenly",
});

/// Shared by `align-items`, `align-self` and `align-content`. `auto` only
/// has meaning for `align-self`, where it defers to the owner's
/// `align-items`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    #[default]
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
    Baseline,
    SpaceBetween,
    SpaceAround,
}

keyword_enum!(Align, "align" {
    Auto => "auto",
    FlexStart => "flex-start",
    Center => "center",
    FlexEnd => "flex-end",
    Stretch => "stretch",
    Baseline => "baseline",
    SpaceBetween => "space-between",
    SpaceAround => "space-around",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PositionType {
    #[default]
    Relative,
    Absolute,
}

keyword_enum!(PositionType, "position" {
    Relative => "relative",
    Absolute => "absolute",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Wrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

keyword_enum!(Wrap, "flex-wrap" {
    NoWrap => "no-wrap",
    Wrap => "wrap",
    WrapReverse => "wrap-reverse",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
}

keyword_enum!(Overflow, "overflow" {
    Visible => "visible",
    Hidden => "hidden",
    Scroll => "scroll",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    #[default]
    Flex,
    None,
}

keyword_enum!(Display, "display" {
    Flex => "flex",
    None => "none",
});
