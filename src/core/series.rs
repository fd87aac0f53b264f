//! Grid-aligned series values

use serde::{Deserialize, Serialize};

/// A single value of a grid-aligned series.
///
/// `Absent` marks grid points where the value is undefined (outside a
/// holding's validity window, before the first recorded price, ...). It is
/// never encoded as a sentinel number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SeriesPoint {
    Present(f64),
    Absent,
}

impl SeriesPoint {
    pub fn is_present(&self) -> bool {
        matches!(self, SeriesPoint::Present(_))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            SeriesPoint::Present(v) => Some(*v),
            SeriesPoint::Absent => None,
        }
    }

    /// Present and different from zero.
    pub fn is_nonzero(&self) -> bool {
        matches!(self, SeriesPoint::Present(v) if *v != 0.0)
    }
}

impl From<Option<f64>> for SeriesPoint {
    fn from(value: Option<f64>) -> Self {
        value.map_or(SeriesPoint::Absent, SeriesPoint::Present)
    }
}

/// A labelled series, index-aligned with the grid it was computed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(SeriesPoint::value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_from_option() {
        assert_eq!(SeriesPoint::from(Some(2.5)), SeriesPoint::Present(2.5));
        assert_eq!(SeriesPoint::from(None), SeriesPoint::Absent);
        assert!(!SeriesPoint::Present(0.0).is_nonzero());
        assert!(SeriesPoint::Present(0.0).is_present());
    }

    #[test]
    fn test_point_serialization() {
        let json = serde_json::to_string(&vec![SeriesPoint::Present(1.0), SeriesPoint::Absent])
            .expect("Failed to serialize");
        assert_eq!(
            json,
            r#"[{"kind":"present","value":1.0},{"kind":"absent"}]"#
        );
    }
}
