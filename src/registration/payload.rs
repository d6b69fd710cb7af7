use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the occurrence form submits in one go.
///
/// Reference fields are wire integers where `0` means "not set". They default to `0`
/// when omitted, so an absent key and an explicit zero are indistinguishable.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FullOccurrenceRequest {
    pub occurrence: OccurrencePayload,
    pub classification: ClassificationPayload,
    pub place: PlacePayload,
    pub observation: ObservationPayload,
    pub specimen: SpecimenPayload,
    pub make_specimen: MakeSpecimenPayload,
    pub identification: IdentificationPayload,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OccurrencePayload {
    #[serde(default)]
    pub project_id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub individual_id: Option<i64>,
    #[serde(default)]
    pub lifestage: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub body_length: Option<f64>,
    /// `YYYY-MM-DDTHH:MM`
    pub created_at: String,
    #[serde(default)]
    pub timezone: i16,
    #[serde(default)]
    pub language_id: u64,
    #[serde(default)]
    pub note: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClassificationPayload {
    pub class_classification: Value,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlacePayload {
    /// WKT point, or `POINT( )` when the form had no coordinates.
    pub coordinates: String,
    pub place_name_json: PlaceNamePayload,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlaceNamePayload {
    pub class_place_name: Value,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ObservationPayload {
    pub user_id: u64,
    #[serde(default)]
    pub observation_method_id: u64,
    #[serde(default)]
    pub behavior: String,
    pub observed_at: String,
    #[serde(default)]
    pub timezone: i16,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SpecimenPayload {
    #[serde(default)]
    pub specimen_method_id: u64,
    #[serde(default)]
    pub institution_id: u64,
    #[serde(default)]
    pub collection_id: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MakeSpecimenPayload {
    pub user_id: u64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub created_at: String,
    #[serde(default)]
    pub timezone: i16,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IdentificationPayload {
    pub user_id: u64,
    #[serde(default)]
    pub source_info: String,
    pub identificated_at: String,
    #[serde(default)]
    pub timezone: i16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_references_default_to_zero() {
        let payload: SpecimenPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload.specimen_method_id, 0);
        assert_eq!(payload.institution_id, 0);
        assert_eq!(payload.collection_id, 0);
    }

    #[test]
    fn negative_reference_is_rejected() {
        let err = serde_json::from_value::<SpecimenPayload>(json!({"institution_id": -1}))
            .unwrap_err();
        assert!(err.to_string().contains("invalid value"));
    }

    #[test]
    fn missing_timestamp_is_rejected() {
        let err = serde_json::from_value::<ObservationPayload>(json!({"user_id": 1}))
            .unwrap_err();
        assert!(err.to_string().contains("observed_at"));
    }
}
