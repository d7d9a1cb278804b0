//! Per-frame attribution values for one explanation method.

use serde_json::Value;

use super::{ArtifactError, FromArtifact, Payload};

/// Ordered attribution scores, one per input frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributionSeries {
    values: Vec<f64>,
}

impl AttributionSeries {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Derive a series from `{ "attributions": [number, ...] }`.
    pub fn from_json(value: &Value) -> Result<Self, ArtifactError> {
        let Some(field) = value.get("attributions") else {
            return Err(ArtifactError::MalformedData(
                "missing 'attributions' field".into(),
            ));
        };
        let Some(items) = field.as_array() else {
            return Err(ArtifactError::MalformedData(
                "'attributions' is not an array".into(),
            ));
        };
        let values = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_f64().ok_or_else(|| {
                    ArtifactError::MalformedData(format!("attributions[{index}] is not a number"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn frame_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, frame: usize) -> Option<f64> {
        self.values.get(frame).copied()
    }

    /// Smallest and largest value, or `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let first = *self.values.first()?;
        Some(
            self.values
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }
}

impl FromArtifact for AttributionSeries {
    fn from_payload(payload: Payload) -> Result<Self, ArtifactError> {
        match payload {
            Payload::Json(value) => Self::from_json(&value),
            Payload::Url(url) => Err(ArtifactError::MalformedData(format!(
                "{url} is a media artifact, expected attributions"
            ))),
        }
    }
}
