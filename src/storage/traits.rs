use anyhow::Result;
use serde_json::Value;

use super::records::{
    Classification, Identification, Language, MakeSpecimen, NewIdentification, NewMakeSpecimen,
    NewObservation, NewOccurrence, NewPlace, NewSpecimen, Observation, Occurrence,
    OccurrenceDetail, Place, PlaceName, RecordId, Specimen,
};

pub trait StorageRead {
    fn load_occurrence(&self, id: RecordId) -> Result<Option<Occurrence>>;
    fn list_occurrences(&self) -> Result<Vec<Occurrence>>;
    fn load_classification(&self, id: RecordId) -> Result<Option<Classification>>;
    fn load_place(&self, id: RecordId) -> Result<Option<Place>>;
    fn load_place_name(&self, id: RecordId) -> Result<Option<PlaceName>>;
    fn list_observations(&self, occurrence_id: RecordId) -> Result<Vec<Observation>>;
    fn list_specimens(&self, occurrence_id: RecordId) -> Result<Vec<Specimen>>;
    fn list_make_specimens(&self, occurrence_id: RecordId) -> Result<Vec<MakeSpecimen>>;
    fn list_identifications(&self, occurrence_id: RecordId) -> Result<Vec<Identification>>;
    fn list_languages(&self) -> Result<Vec<Language>>;

    fn load_occurrence_detail(&self, id: RecordId) -> Result<Option<OccurrenceDetail>> {
        let Some(occurrence) = self.load_occurrence(id)? else {
            return Ok(None);
        };

        let classification = self.load_classification(occurrence.classification_id)?;
        let place = match occurrence.place_id {
            Some(place_id) => self.load_place(place_id)?,
            None => None,
        };
        let place_name = match &place {
            Some(place) => self.load_place_name(place.place_name_id)?,
            None => None,
        };

        Ok(Some(OccurrenceDetail {
            classification,
            place,
            place_name,
            observations: self.list_observations(id)?,
            specimens: self.list_specimens(id)?,
            make_specimens: self.list_make_specimens(id)?,
            identifications: self.list_identifications(id)?,
            occurrence,
        }))
    }
}

/// Inserts return the identifier generated by the store.
pub trait StorageWrite {
    fn insert_classification(&self, document: &Value) -> Result<RecordId>;
    fn insert_place_name(&self, document: &Value) -> Result<RecordId>;
    fn insert_place(&self, place: &NewPlace) -> Result<RecordId>;
    fn insert_occurrence(&self, occurrence: &NewOccurrence) -> Result<RecordId>;
    fn insert_observation(&self, observation: &NewObservation) -> Result<RecordId>;
    fn insert_specimen(&self, specimen: &NewSpecimen) -> Result<RecordId>;
    fn insert_make_specimen(&self, act: &NewMakeSpecimen) -> Result<RecordId>;
    fn insert_identification(&self, identification: &NewIdentification) -> Result<RecordId>;
}

/// A unit of work. Dropping it without `commit` discards every write made through it.
pub trait StorageTx: StorageRead + StorageWrite {
    fn commit(self) -> Result<()>;
    fn rollback(self) -> Result<()>;
}

pub trait Storage: StorageRead {
    type Tx: StorageTx;

    fn begin_tx(&self) -> Result<Self::Tx>;
}
