use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::{
    records::{
        Identification, Language, MakeSpecimen, Observation, Occurrence, OccurrenceDetail,
        Specimen,
    },
    RecordId,
};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub message: String,
    pub occurrence_id: RecordId,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceResponse {
    pub occurrence_id: RecordId,
    pub project_id: Option<RecordId>,
    pub user_id: RecordId,
    pub individual_id: Option<i64>,
    pub lifestage: String,
    pub sex: String,
    pub classification_id: RecordId,
    pub place_id: Option<RecordId>,
    pub body_length: Option<f64>,
    pub language_id: Option<RecordId>,
    pub note: String,
    pub created_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrencesResponse {
    pub occurrences: Vec<OccurrenceResponse>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    pub place_id: RecordId,
    pub coordinates: Option<String>,
    pub place_name_id: RecordId,
    pub place_name: Option<Value>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResponse {
    pub observation_id: RecordId,
    pub user_id: RecordId,
    pub observation_method_id: Option<RecordId>,
    pub behavior: String,
    pub observed_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenResponse {
    pub specimen_id: RecordId,
    pub specimen_method_id: Option<RecordId>,
    pub institution_id: Option<RecordId>,
    pub collection_id: Option<RecordId>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeSpecimenResponse {
    pub make_specimen_id: RecordId,
    pub specimen_id: RecordId,
    pub user_id: RecordId,
    pub date: Option<NaiveDate>,
    pub specimen_method_id: Option<RecordId>,
    pub created_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResponse {
    pub identification_id: RecordId,
    pub user_id: RecordId,
    pub source_info: String,
    pub identificated_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceDetailResponse {
    pub occurrence: OccurrenceResponse,
    pub classification: Option<Value>,
    pub place: Option<PlaceResponse>,
    pub observations: Vec<ObservationResponse>,
    pub specimens: Vec<SpecimenResponse>,
    pub make_specimens: Vec<MakeSpecimenResponse>,
    pub identifications: Vec<IdentificationResponse>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageResponse {
    pub language_id: RecordId,
    pub language_short: String,
    pub language_common: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageResponse>,
}

impl From<Occurrence> for OccurrenceResponse {
    fn from(occurrence: Occurrence) -> Self {
        Self {
            occurrence_id: occurrence.id,
            project_id: occurrence.project_id,
            user_id: occurrence.user_id,
            individual_id: occurrence.individual_id,
            lifestage: occurrence.lifestage,
            sex: occurrence.sex,
            classification_id: occurrence.classification_id,
            place_id: occurrence.place_id,
            body_length: occurrence.body_length,
            language_id: occurrence.language_id,
            note: occurrence.note,
            created_at: occurrence.created_at,
            timezone: occurrence.timezone,
        }
    }
}

impl From<Observation> for ObservationResponse {
    fn from(o: Observation) -> Self {
        Self {
            observation_id: o.id,
            user_id: o.user_id,
            observation_method_id: o.observation_method_id,
            behavior: o.behavior,
            observed_at: o.observed_at,
            timezone: o.timezone,
        }
    }
}

impl From<Specimen> for SpecimenResponse {
    fn from(s: Specimen) -> Self {
        Self {
            specimen_id: s.id,
            specimen_method_id: s.specimen_method_id,
            institution_id: s.institution_id,
            collection_id: s.collection_id,
        }
    }
}

impl From<MakeSpecimen> for MakeSpecimenResponse {
    fn from(m: MakeSpecimen) -> Self {
        Self {
            make_specimen_id: m.id,
            specimen_id: m.specimen_id,
            user_id: m.user_id,
            date: m.date,
            specimen_method_id: m.specimen_method_id,
            created_at: m.created_at,
            timezone: m.timezone,
        }
    }
}

impl From<Identification> for IdentificationResponse {
    fn from(i: Identification) -> Self {
        Self {
            identification_id: i.id,
            user_id: i.user_id,
            source_info: i.source_info,
            identificated_at: i.identificated_at,
            timezone: i.timezone,
        }
    }
}

impl From<Language> for LanguageResponse {
    fn from(language: Language) -> Self {
        Self {
            language_id: language.id,
            language_short: language.short,
            language_common: language.common,
        }
    }
}

impl From<OccurrenceDetail> for OccurrenceDetailResponse {
    fn from(detail: OccurrenceDetail) -> Self {
        let place_name = detail.place_name.map(|name| name.document);
        Self {
            occurrence: detail.occurrence.into(),
            classification: detail.classification.map(|c| c.document),
            place: detail.place.map(|place| PlaceResponse {
                place_id: place.id,
                coordinates: place.coordinates,
                place_name_id: place.place_name_id,
                place_name,
            }),
            observations: detail.observations.into_iter().map(Into::into).collect(),
            specimens: detail.specimens.into_iter().map(Into::into).collect(),
            make_specimens: detail.make_specimens.into_iter().map(Into::into).collect(),
            identifications: detail.identifications.into_iter().map(Into::into).collect(),
        }
    }
}
