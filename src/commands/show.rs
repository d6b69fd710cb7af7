use std::io::Write;

use anyhow::Context;

use crate::rest::models::OccurrenceDetailResponse;
use crate::storage::{RecordId, Storage};

pub fn run<S: Storage, W: Write>(storage: &S, id: RecordId, out: &mut W) -> anyhow::Result<()> {
    let detail = storage
        .load_occurrence_detail(id)
        .with_context(|| format!("loading occurrence {}", id))?
        .with_context(|| format!("occurrence {} not found", id))?;

    serde_json::to_writer_pretty(&mut *out, &OccurrenceDetailResponse::from(detail))?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::Command;
    use crate::registration::{register_full_occurrence, test_support::sample_request};
    use crate::storage::sqlite::test_support::seeded_storage;

    #[test]
    fn show_prints_linked_records() {
        let (_dir, storage) = seeded_storage();
        let registered = register_full_occurrence(&storage, &sample_request()).unwrap();

        let mut out = Vec::new();
        Command::Show {
            id: registered.occurrence_id,
        }
        .run_to(&storage, &mut out)
        .unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["occurrence"]["occurrenceId"], registered.occurrence_id);
        assert_eq!(printed["classification"]["genus"], "Carabus");
        assert_eq!(printed["makeSpecimens"][0]["specimenId"], registered.specimen_id);
    }

    #[test]
    fn show_unknown_id_fails() {
        let (_dir, storage) = seeded_storage();
        let err = Command::Show { id: 99 }
            .run_to(&storage, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "occurrence 99 not found");
    }
}
