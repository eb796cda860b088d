use serde::{Deserialize, Serialize};

/// A width/height pair. Either side may be NaN, which means "undefined".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn undefined() -> Self {
        Self {
            width: f32::NAN,
            height: f32::NAN,
        }
    }

    /// True when both sides are defined numbers.
    pub fn is_defined(&self) -> bool {
        !self.width.is_nan() && !self.height.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_size_is_not_defined() {
        assert!(!Size::undefined().is_defined());
        assert!(Size::zero().is_defined());
        assert!(!Size::new(10.0, f32::NAN).is_defined());
    }
}
