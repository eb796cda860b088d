//! Defines length values and the edge/axis collections that hold them.
use crate::parsers::{StyleParseError, parse_value};
use flexlay_types::math::{FLOAT_EPSILON, UNDEFINED, is_undefined};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Undefined,
    Point,
    Percent,
    Auto,
}

/// A style length: undefined, auto, an absolute number of points, or a
/// percentage of the owner's size along the relevant axis.
#[derive(Debug, Clone, Copy)]
pub struct Value {
    pub value: f32,
    pub unit: Unit,
}

impl Value {
    pub const UNDEFINED: Value = Value {
        value: UNDEFINED,
        unit: Unit::Undefined,
    };
    pub const AUTO: Value = Value {
        value: UNDEFINED,
        unit: Unit::Auto,
    };
    pub const ZERO: Value = Value {
        value: 0.0,
        unit: Unit::Point,
    };

    /// A point value. NaN yields [`Value::UNDEFINED`].
    pub fn points(value: f32) -> Self {
        if is_undefined(value) {
            return Self::UNDEFINED;
        }
        Self {
            value,
            unit: Unit::Point,
        }
    }

    /// A percentage value. NaN yields [`Value::UNDEFINED`].
    pub fn percent(value: f32) -> Self {
        if is_undefined(value) {
            return Self::UNDEFINED;
        }
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.unit == Unit::Undefined
    }

    pub fn is_auto(&self) -> bool {
        self.unit == Unit::Auto
    }

    /// Resolves against `owner_size`; anything that is not a point or
    /// percent value resolves to NaN, as does a percent of an undefined size.
    pub fn resolve(&self, owner_size: f32) -> f32 {
        match self.unit {
            Unit::Point => self.value,
            Unit::Percent => self.value * owner_size * 0.01,
            Unit::Undefined | Unit::Auto => UNDEFINED,
        }
    }

    /// Margin resolution: `auto` contributes nothing to size arithmetic.
    pub fn resolve_margin(&self, owner_size: f32) -> f32 {
        if self.unit == Unit::Auto {
            0.0
        } else {
            self.resolve(owner_size)
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.unit != other.unit {
            return false;
        }
        if self.unit == Unit::Undefined || (is_undefined(self.value) && is_undefined(other.value)) {
            return true;
        }
        (self.value - other.value).abs() < FLOAT_EPSILON
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Undefined => f.write_str("undefined"),
            Unit::Auto => f.write_str("auto"),
            Unit::Point => write!(f, "{}pt", self.value),
            Unit::Percent => write!(f, "{}%", self.value),
        }
    }
}

impl FromStr for Value {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value(s)
    }
}

impl From<f32> for Value {
    fn from(points: f32) -> Self {
        Value::points(points)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.unit {
            Unit::Point => serializer.serialize_f32(self.value),
            _ => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;
        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number, a string like '10pt', '50%' or 'auto', or a map")
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::points(value as f32))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::points(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::points(value as f32))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E>
            where
                E: de::Error,
            {
                parse_value(value).map_err(E::custom)
            }

            fn visit_unit<E>(self) -> Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::UNDEFINED)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut number = UNDEFINED;
                let mut unit = String::from("point");
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "value" => number = map.next_value()?,
                        "unit" => unit = map.next_value()?,
                        _ => { /* ignore unknown fields */ }
                    }
                }
                match unit.to_ascii_lowercase().as_str() {
                    "point" | "pt" | "px" => Ok(Value::points(number)),
                    "percent" | "%" => Ok(Value::percent(number)),
                    "auto" => Ok(Value::AUTO),
                    "undefined" => Ok(Value::UNDEFINED),
                    other => Err(de::Error::custom(format!("unknown unit '{}'", other))),
                }
            }
        }
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Style edges. `Start`/`End` follow the layout direction; `Horizontal`,
/// `Vertical` and `All` are shorthands consulted when a specific edge is
/// unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
    Start,
    End,
    Horizontal,
    Vertical,
    All,
}

impl Edge {
    pub const ALL_EDGES: [Edge; 9] = [
        Edge::Left,
        Edge::Top,
        Edge::Right,
        Edge::Bottom,
        Edge::Start,
        Edge::End,
        Edge::Horizontal,
        Edge::Vertical,
        Edge::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Start => "start",
            Edge::End => "end",
            Edge::Horizontal => "horizontal",
            Edge::Vertical => "vertical",
            Edge::All => "all",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edge {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Edge::ALL_EDGES
            .iter()
            .copied()
            .find(|edge| edge.as_str() == lowered)
            .ok_or_else(|| StyleParseError::InvalidValue {
                property: "edge".to_string(),
                value: s.to_string(),
            })
    }
}

/// Nine edge slots of [`Value`], one per [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges([Value; 9]);

impl Edges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `edge` through the shorthand fallbacks: vertical for
    /// top/bottom, horizontal for left/right/start/end, then all. `Start`
    /// and `End` never fall back to `default`.
    pub fn computed(&self, edge: Edge, default: Value) -> Value {
        let own = self[edge];
        if !own.is_undefined() {
            return own;
        }

        if matches!(edge, Edge::Top | Edge::Bottom) && !self[Edge::Vertical].is_undefined() {
            return self[Edge::Vertical];
        }

        if matches!(edge, Edge::Left | Edge::Right | Edge::Start | Edge::End)
            && !self[Edge::Horizontal].is_undefined()
        {
            return self[Edge::Horizontal];
        }

        if !self[Edge::All].is_undefined() {
            return self[Edge::All];
        }

        if matches!(edge, Edge::Start | Edge::End) {
            return Value::UNDEFINED;
        }

        default
    }

    /// Iterates the edges that hold a value.
    pub fn iter_defined(&self) -> impl Iterator<Item = (Edge, Value)> + '_ {
        Edge::ALL_EDGES
            .iter()
            .map(|edge| (*edge, self[*edge]))
            .filter(|(_, value)| !value.is_undefined())
    }
}

impl Index<Edge> for Edges {
    type Output = Value;

    fn index(&self, edge: Edge) -> &Value {
        &self.0[edge as usize]
    }
}

impl IndexMut<Edge> for Edges {
    fn index_mut(&mut self, edge: Edge) -> &mut Value {
        &mut self.0[edge as usize]
    }
}

impl Serialize for Edges {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let defined: Vec<(Edge, Value)> = self.iter_defined().collect();
        let mut map = serializer.serialize_map(Some(defined.len()))?;
        for (edge, value) in defined {
            map.serialize_entry(edge.as_str(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Edges {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EdgesVisitor;
        impl<'de> de::Visitor<'de> for EdgesVisitor {
            type Value = Edges;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a single value for all edges or a map of edge to value")
            }

            fn visit_f64<E>(self, value: f64) -> Result<Edges, E>
            where
                E: de::Error,
            {
                let mut edges = Edges::default();
                edges[Edge::All] = Value::points(value as f32);
                Ok(edges)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Edges, E>
            where
                E: de::Error,
            {
                self.visit_f64(value as f64)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Edges, E>
            where
                E: de::Error,
            {
                self.visit_f64(value as f64)
            }

            fn visit_str<E>(self, value: &str) -> Result<Edges, E>
            where
                E: de::Error,
            {
                let mut edges = Edges::default();
                edges[Edge::All] = parse_value(value).map_err(E::custom)?;
                Ok(edges)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Edges, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut edges = Edges::default();
                while let Some(key) = map.next_key::<String>()? {
                    let edge: Edge = key.parse().map_err(de::Error::custom)?;
                    edges[edge] = map.next_value()?;
                }
                Ok(edges)
            }
        }
        deserializer.deserialize_any(EdgesVisitor)
    }
}

/// The two sizing axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A width/height pair of [`Value`]s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: Value,
    pub height: Value,
}

impl Dimensions {
    pub const fn splat(value: Value) -> Self {
        Self {
            width: value,
            height: value,
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::splat(Value::UNDEFINED)
    }
}

impl Index<Dimension> for Dimensions {
    type Output = Value;

    fn index(&self, dim: Dimension) -> &Value {
        match dim {
            Dimension::Width => &self.width,
            Dimension::Height => &self.height,
        }
    }
}

impl IndexMut<Dimension> for Dimensions {
    fn index_mut(&mut self, dim: Dimension) -> &mut Value {
        match dim {
            Dimension::Width => &mut self.width,
            Dimension::Height => &mut self.height,
        }
    }
}
