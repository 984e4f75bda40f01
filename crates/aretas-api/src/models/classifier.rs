// Data classifier entities
//
// A classifier is a label (optionally nested under a parent) that can be
// attached to windows of sensor data. Each attachment is a classifier
// record covering a time range on a set of MACs.

use serde::{Deserialize, Serialize};

use super::common::{Mac, Payload, null_as_default};

fn no_feature() -> i64 {
    -1
}

// ── DataClassifier ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataClassifier {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Integer feature encoding of the label, `-1` when unassigned.
    #[serde(default = "no_feature")]
    pub feature_int: i64,
    #[serde(default)]
    pub regression_target_val: f64,
    #[serde(default)]
    pub is_public: bool,
    /// Sensor types a record must cover to be valid for this classifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_types: Vec<i64>,
}

impl DataClassifier {
    /// A new, unsaved classifier. The server assigns its id on create.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            parent_id: None,
            label: label.into(),
            description: String::new(),
            feature_int: no_feature(),
            regression_target_val: 0.0,
            is_public: false,
            required_types: Vec::new(),
        }
    }
}

impl Payload for DataClassifier {}

// ── DataClassifierRecord ─────────────────────────────────────────────

/// A labelled time window on one or more sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataClassifierRecord {
    pub id: String,
    pub data_classifier_id: String,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assoc_macs: Vec<Mac>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_types: Vec<i64>,
    #[serde(default)]
    pub regression_value: f64,
}

impl DataClassifierRecord {
    /// A new, unsaved record for `data_classifier_id` over `[start, end]`.
    pub fn new(data_classifier_id: impl Into<String>, start_timestamp: i64, end_timestamp: i64) -> Self {
        Self {
            id: String::new(),
            data_classifier_id: data_classifier_id.into(),
            start_timestamp,
            end_timestamp,
            assoc_macs: Vec::new(),
            target_types: Vec::new(),
            regression_value: 0.0,
        }
    }
}

impl Payload for DataClassifierRecord {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::WriteIntent;
    use serde_json::json;

    #[test]
    fn create_payload_omits_identity() {
        let mut classifier = DataClassifier::new("Cooking");
        classifier.id = "dc-9".into();
        let payload = classifier.to_payload(WriteIntent::Create).unwrap();
        assert!(payload.get("id").is_none());
        assert_eq!(payload["label"], "Cooking");
        assert_eq!(payload["featureInt"], -1);
        assert_eq!(payload["requiredTypes"], json!([]));
    }

    #[test]
    fn update_and_delete_keep_identity_unchanged() {
        let mut record = DataClassifierRecord::new("dc-9", 1000, 2000);
        record.id = "rec-1".into();
        record.assoc_macs = vec![Mac(11), Mac(12)];
        for intent in [WriteIntent::Update, WriteIntent::Delete] {
            let payload = record.to_payload(intent).unwrap();
            assert_eq!(payload["id"], "rec-1");
            assert_eq!(payload["dataClassifierId"], "dc-9");
            assert_eq!(payload["assocMacs"], json!([11, 12]));
        }
    }

    #[test]
    fn classifier_defaults_apply_to_sparse_payloads() {
        let classifier: DataClassifier =
            serde_json::from_value(json!({ "id": "dc-1", "description": null })).unwrap();
        assert_eq!(classifier.feature_int, -1);
        assert_eq!(classifier.description, "");
        assert!(classifier.required_types.is_empty());
    }
}
