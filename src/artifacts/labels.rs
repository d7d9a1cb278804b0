//! Class label table published as `{ "<class name>": <class id>, ... }`.

use serde_json::Value;

use super::{ArtifactError, FromArtifact, Payload};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelEntry {
    pub class_id: i64,
    pub class_name: String,
}

/// Class ids and names ordered by ascending id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelMapping {
    entries: Vec<LabelEntry>,
}

impl LabelMapping {
    pub fn from_json(value: &Value) -> Result<Self, ArtifactError> {
        let Some(object) = value.as_object() else {
            return Err(ArtifactError::MalformedData(
                "labels must be an object mapping class names to ids".into(),
            ));
        };
        let mut entries = object
            .iter()
            .map(|(name, id)| {
                id.as_i64()
                    .map(|class_id| LabelEntry {
                        class_id,
                        class_name: name.clone(),
                    })
                    .ok_or_else(|| {
                        ArtifactError::MalformedData(format!(
                            "label '{name}' has a non-integer id: {id}"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        // Name breaks id ties so the order never depends on key order.
        entries.sort_by(|a, b| {
            a.class_id
                .cmp(&b.class_id)
                .then_with(|| a.class_name.cmp(&b.class_name))
        });
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the class with the given id.
    pub fn name_of(&self, class_id: i64) -> Option<&str> {
        self.entries
            .binary_search_by_key(&class_id, |entry| entry.class_id)
            .ok()
            .map(|index| self.entries[index].class_name.as_str())
    }
}

impl FromArtifact for LabelMapping {
    fn from_payload(payload: Payload) -> Result<Self, ArtifactError> {
        match payload {
            Payload::Json(value) => Self::from_json(&value),
            Payload::Url(url) => Err(ArtifactError::MalformedData(format!(
                "{url} is a media artifact, expected labels"
            ))),
        }
    }
}
