use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::registration::{register_full_occurrence, FullOccurrenceRequest};
use crate::storage::Storage;

pub fn run<S: Storage, W: Write>(storage: &S, file: &Path, out: &mut W) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let request: FullOccurrenceRequest = serde_json::from_str(&raw)
        .with_context(|| format!("parsing full occurrence from {}", file.display()))?;

    let registered = register_full_occurrence(storage, &request)?;

    serde_json::to_writer_pretty(&mut *out, &registered)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::Command;
    use crate::registration::test_support::sample_request_json;
    use crate::storage::sqlite::test_support::{count_rows, seeded_storage};

    #[test]
    fn register_prints_created_ids() {
        let (dir, storage) = seeded_storage();
        let file = dir.path().join("occurrence.json");
        std::fs::write(&file, sample_request_json().to_string()).unwrap();

        let mut out = Vec::new();
        Command::Register { file }.run_to(&storage, &mut out).unwrap();

        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(printed["occurrenceId"].as_u64().unwrap() > 0);
        assert!(printed["makeSpecimenId"].is_u64());
        assert_eq!(count_rows(&storage, "occurrence"), 1);
        assert_eq!(count_rows(&storage, "identifications"), 1);
    }

    #[test]
    fn register_reports_unreadable_payload() {
        let (dir, storage) = seeded_storage();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, "{\"occurrence\":").unwrap();

        let err = Command::Register { file }
            .run_to(&storage, &mut Vec::new())
            .unwrap_err();
        assert!(format!("{err:#}").contains("parsing full occurrence"));
        assert_eq!(count_rows(&storage, "classification_json"), 0);
    }

    #[test]
    fn register_surfaces_workflow_error() {
        let (dir, storage) = seeded_storage();
        let mut payload = sample_request_json();
        payload["identification"]["identificated_at"] = "yesterday".into();
        let file = dir.path().join("occurrence.json");
        std::fs::write(&file, payload.to_string()).unwrap();

        let err = Command::Register { file }
            .run_to(&storage, &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().contains("identification.identificated_at"));
        assert_eq!(count_rows(&storage, "occurrence"), 0);
    }
}
