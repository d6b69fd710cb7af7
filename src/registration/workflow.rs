use serde::Serialize;

use super::{
    coerce::{coerce_coordinates, non_zero_ref, parse_date, parse_instant},
    error::{Entity, RegistrationError, TemporalField},
    payload::FullOccurrenceRequest,
};
use crate::storage::{
    records::{
        NewIdentification, NewMakeSpecimen, NewObservation, NewOccurrence, NewPlace, NewSpecimen,
    },
    RecordId, Storage, StorageTx, StorageWrite,
};

/// Identifiers of the records written by one registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredOccurrence {
    pub classification_id: RecordId,
    pub place_name_id: RecordId,
    pub place_id: RecordId,
    pub occurrence_id: RecordId,
    pub observation_id: RecordId,
    pub specimen_id: RecordId,
    pub make_specimen_id: RecordId,
    pub identification_id: RecordId,
}

/// Registers a full occurrence inside a single unit of work.
///
/// Either every record is committed or none is: the first failing step rolls back
/// everything written before it and its error is returned unchanged.
pub fn register_full_occurrence<S: Storage>(
    storage: &S,
    request: &FullOccurrenceRequest,
) -> Result<RegisteredOccurrence, RegistrationError> {
    let _span = ::tracing::info_span!(
        "register_full_occurrence",
        user_id = request.occurrence.user_id
    )
    .entered();

    let tx = storage
        .begin_tx()
        .map_err(|cause| RegistrationError::UnitOfWork {
            stage: "begin",
            cause,
        })?;

    let registered = match digest(&tx, request) {
        Ok(registered) => registered,
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                log::error!("rollback after failed registration: {:#}", rollback_err);
            }
            return Err(err);
        }
    };

    tx.commit()
        .map_err(|cause| RegistrationError::UnitOfWork {
            stage: "commit",
            cause,
        })?;

    log::info!(
        "🪲 Registered occurrence {} (specimen {}, identification {})",
        registered.occurrence_id,
        registered.specimen_id,
        registered.identification_id
    );
    Ok(registered)
}

fn digest<T: StorageWrite>(
    tx: &T,
    request: &FullOccurrenceRequest,
) -> Result<RegisteredOccurrence, RegistrationError> {
    let classification_id = tx
        .insert_classification(&request.classification.class_classification)
        .map_err(RegistrationError::persistence(Entity::Classification))?;
    log::debug!("classification {} inserted", classification_id);

    let place_name_id = tx
        .insert_place_name(&request.place.place_name_json.class_place_name)
        .map_err(RegistrationError::persistence(Entity::PlaceName))?;

    let place_id = tx
        .insert_place(&NewPlace {
            coordinates: coerce_coordinates(&request.place.coordinates),
            place_name_id,
        })
        .map_err(RegistrationError::persistence(Entity::Place))?;
    log::debug!("place {} inserted with name {}", place_id, place_name_id);

    let payload = &request.occurrence;
    let created_at = parse_instant(TemporalField::OccurrenceCreatedAt, &payload.created_at)?;
    let occurrence_id = tx
        .insert_occurrence(&NewOccurrence {
            project_id: non_zero_ref(payload.project_id),
            user_id: payload.user_id,
            individual_id: payload.individual_id,
            lifestage: payload.lifestage.clone(),
            sex: payload.sex.clone(),
            classification_id,
            place_id: non_zero_ref(place_id),
            body_length: payload.body_length,
            language_id: non_zero_ref(payload.language_id),
            note: payload.note.clone(),
            created_at,
            timezone: payload.timezone,
        })
        .map_err(RegistrationError::persistence(Entity::Occurrence))?;
    log::debug!("occurrence {} inserted", occurrence_id);

    let payload = &request.observation;
    let observed_at = parse_instant(TemporalField::ObservationObservedAt, &payload.observed_at)?;
    let observation_id = tx
        .insert_observation(&NewObservation {
            user_id: payload.user_id,
            occurrence_id,
            observation_method_id: non_zero_ref(payload.observation_method_id),
            behavior: payload.behavior.clone(),
            observed_at,
            timezone: payload.timezone,
        })
        .map_err(RegistrationError::persistence(Entity::Observation))?;

    let specimen_method_id = non_zero_ref(request.specimen.specimen_method_id);
    let specimen_id = tx
        .insert_specimen(&NewSpecimen {
            occurrence_id,
            specimen_method_id,
            institution_id: non_zero_ref(request.specimen.institution_id),
            collection_id: non_zero_ref(request.specimen.collection_id),
        })
        .map_err(RegistrationError::persistence(Entity::Specimen))?;
    log::debug!("specimen {} inserted", specimen_id);

    let payload = &request.make_specimen;
    let date = parse_date(TemporalField::MakeSpecimenDate, &payload.date)?;
    let made_at = parse_instant(TemporalField::MakeSpecimenCreatedAt, &payload.created_at)?;
    let make_specimen_id = tx
        .insert_make_specimen(&NewMakeSpecimen {
            occurrence_id,
            user_id: payload.user_id,
            specimen_id,
            date,
            // the act records the method the specimen itself was prepared with
            specimen_method_id,
            created_at: made_at,
            timezone: payload.timezone,
        })
        .map_err(RegistrationError::persistence(Entity::MakeSpecimen))?;

    let payload = &request.identification;
    let identificated_at = parse_instant(
        TemporalField::IdentificationIdentificatedAt,
        &payload.identificated_at,
    )?;
    let identification_id = tx
        .insert_identification(&NewIdentification {
            user_id: payload.user_id,
            occurrence_id,
            source_info: payload.source_info.clone(),
            identificated_at,
            timezone: payload.timezone,
        })
        .map_err(RegistrationError::persistence(Entity::Identification))?;

    Ok(RegisteredOccurrence {
        classification_id,
        place_name_id,
        place_id,
        occurrence_id,
        observation_id,
        specimen_id,
        make_specimen_id,
        identification_id,
    })
}
