use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Primary key as exposed by the store. SQLite never hands out zero.
pub type RecordId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub id: RecordId,
    pub document: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaceName {
    pub id: RecordId,
    pub document: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPlace {
    /// Point geometry as WKT text, absent when no coordinates were given.
    pub coordinates: Option<String>,
    pub place_name_id: RecordId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Place {
    pub id: RecordId,
    pub coordinates: Option<String>,
    pub place_name_id: RecordId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewOccurrence {
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

#[derive(Clone, Debug, PartialEq)]
pub struct Occurrence {
    pub id: RecordId,
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

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewObservation {
    pub user_id: RecordId,
    pub occurrence_id: RecordId,
    pub observation_method_id: Option<RecordId>,
    pub behavior: String,
    pub observed_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub id: RecordId,
    pub user_id: RecordId,
    pub occurrence_id: RecordId,
    pub observation_method_id: Option<RecordId>,
    pub behavior: String,
    pub observed_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSpecimen {
    pub occurrence_id: RecordId,
    pub specimen_method_id: Option<RecordId>,
    pub institution_id: Option<RecordId>,
    pub collection_id: Option<RecordId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Specimen {
    pub id: RecordId,
    pub occurrence_id: RecordId,
    pub specimen_method_id: Option<RecordId>,
    pub institution_id: Option<RecordId>,
    pub collection_id: Option<RecordId>,
}

/// The act of preparing a specimen from an occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMakeSpecimen {
    pub occurrence_id: RecordId,
    pub user_id: RecordId,
    pub specimen_id: RecordId,
    pub date: NaiveDate,
    pub specimen_method_id: Option<RecordId>,
    pub created_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MakeSpecimen {
    pub id: RecordId,
    pub occurrence_id: RecordId,
    pub user_id: RecordId,
    pub specimen_id: RecordId,
    pub date: Option<NaiveDate>,
    pub specimen_method_id: Option<RecordId>,
    pub created_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewIdentification {
    pub user_id: RecordId,
    pub occurrence_id: RecordId,
    pub source_info: String,
    pub identificated_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identification {
    pub id: RecordId,
    pub user_id: RecordId,
    pub occurrence_id: RecordId,
    pub source_info: String,
    pub identificated_at: NaiveDateTime,
    pub timezone: i16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub id: RecordId,
    pub short: String,
    pub common: String,
}

/// An occurrence together with every record that hangs off it.
#[derive(Clone, Debug, PartialEq)]
pub struct OccurrenceDetail {
    pub occurrence: Occurrence,
    pub classification: Option<Classification>,
    pub place: Option<Place>,
    pub place_name: Option<PlaceName>,
    pub observations: Vec<Observation>,
    pub specimens: Vec<Specimen>,
    pub make_specimens: Vec<MakeSpecimen>,
    pub identifications: Vec<Identification>,
}
