use std::fmt;

use thiserror::Error;

/// Wire fields carrying a date or an instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemporalField {
    OccurrenceCreatedAt,
    ObservationObservedAt,
    MakeSpecimenDate,
    MakeSpecimenCreatedAt,
    IdentificationIdentificatedAt,
}

impl fmt::Display for TemporalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemporalField::OccurrenceCreatedAt => "occurrence.created_at",
            TemporalField::ObservationObservedAt => "observation.observed_at",
            TemporalField::MakeSpecimenDate => "make_specimen.date",
            TemporalField::MakeSpecimenCreatedAt => "make_specimen.created_at",
            TemporalField::IdentificationIdentificatedAt => "identification.identificated_at",
        };
        f.write_str(name)
    }
}

/// Records written by a registration, in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Classification,
    PlaceName,
    Place,
    Occurrence,
    Observation,
    Specimen,
    MakeSpecimen,
    Identification,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Classification => "classification",
            Entity::PlaceName => "place name",
            Entity::Place => "place",
            Entity::Occurrence => "occurrence",
            Entity::Observation => "observation",
            Entity::Specimen => "specimen",
            Entity::MakeSpecimen => "make-specimen act",
            Entity::Identification => "identification",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("invalid temporal field {field}: {value:?} does not match layout {layout}")]
    InvalidTemporal {
        field: TemporalField,
        value: String,
        layout: &'static str,
        /// Absent when chrono accepted the text but it is not in the fixed-width layout.
        #[source]
        source: Option<chrono::ParseError>,
    },
    #[error("failed to persist {entity}: {cause:#}")]
    Persistence { entity: Entity, cause: anyhow::Error },
    #[error("failed to {stage} unit of work: {cause:#}")]
    UnitOfWork {
        stage: &'static str,
        cause: anyhow::Error,
    },
}

impl RegistrationError {
    pub(crate) fn persistence(entity: Entity) -> impl FnOnce(anyhow::Error) -> Self {
        move |cause| RegistrationError::Persistence { entity, cause }
    }
}
