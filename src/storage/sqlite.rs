use anyhow::Result;
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

use super::{
    records::{
        Classification, Identification, Language, MakeSpecimen, NewIdentification,
        NewMakeSpecimen, NewObservation, NewOccurrence, NewPlace, NewSpecimen, Observation,
        Occurrence, OccurrenceDetail, Place, PlaceName, RecordId, Specimen,
    },
    traits::{Storage, StorageRead, StorageTx, StorageWrite},
};

const DB_SCHEMA_VERSION: i64 = 1;

const OCCURRENCE_COLUMNS: &str = "occurrence_id, project_id, user_id, individual_id, lifestage, sex, \
     classification_id, place_id, body_length, language_id, note, created_at, timezone";

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

pub struct SqliteTx {
    conn: Connection,
    finished: bool,
}

impl StorageTx for SqliteTx {
    fn commit(mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        self.finished = true;
        Ok(())
    }

    fn rollback(mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteTx {
    fn drop(&mut self) {
        if self.finished || self.conn.is_autocommit() {
            return;
        }
        if let Err(err) = self.conn.execute("ROLLBACK", []) {
            log::error!("failed to roll back abandoned transaction: {}", err);
        }
    }
}

fn open_conn(path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(std::time::Duration::from_millis(500))?;
    Ok(conn)
}

fn sql_id(id: RecordId) -> rusqlite::Result<i64> {
    i64::try_from(id).map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))
}

fn sql_opt_id(id: Option<RecordId>) -> rusqlite::Result<Option<i64>> {
    id.map(sql_id).transpose()
}

fn inserted_id(conn: &Connection) -> rusqlite::Result<RecordId> {
    let rowid = conn.last_insert_rowid();
    RecordId::try_from(rowid).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, rowid))
}

fn get_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<RecordId> {
    let raw: i64 = row.get(idx)?;
    raw.try_into()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(err)))
}

fn get_opt_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<RecordId>> {
    let raw: Option<i64> = row.get(idx)?;
    raw.map(|value| {
        value.try_into().map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(err))
        })
    })
    .transpose()
}

fn get_json(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Value> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn map_occurrence_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Occurrence> {
    Ok(Occurrence {
        id: get_id(row, 0)?,
        project_id: get_opt_id(row, 1)?,
        user_id: get_id(row, 2)?,
        individual_id: row.get(3)?,
        lifestage: row.get(4)?,
        sex: row.get(5)?,
        classification_id: get_id(row, 6)?,
        place_id: get_opt_id(row, 7)?,
        body_length: row.get(8)?,
        language_id: get_opt_id(row, 9)?,
        note: row.get(10)?,
        created_at: row.get(11)?,
        timezone: row.get(12)?,
    })
}

fn map_observation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Observation> {
    Ok(Observation {
        id: get_id(row, 0)?,
        user_id: get_id(row, 1)?,
        occurrence_id: get_id(row, 2)?,
        observation_method_id: get_opt_id(row, 3)?,
        behavior: row.get(4)?,
        observed_at: row.get(5)?,
        timezone: row.get(6)?,
    })
}

fn map_specimen_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Specimen> {
    Ok(Specimen {
        id: get_id(row, 0)?,
        occurrence_id: get_id(row, 1)?,
        specimen_method_id: get_opt_id(row, 2)?,
        institution_id: get_opt_id(row, 3)?,
        collection_id: get_opt_id(row, 4)?,
    })
}

fn map_make_specimen_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MakeSpecimen> {
    Ok(MakeSpecimen {
        id: get_id(row, 0)?,
        occurrence_id: get_id(row, 1)?,
        user_id: get_id(row, 2)?,
        specimen_id: get_id(row, 3)?,
        date: row.get(4)?,
        specimen_method_id: get_opt_id(row, 5)?,
        created_at: row.get(6)?,
        timezone: row.get(7)?,
    })
}

fn map_identification_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Identification> {
    Ok(Identification {
        id: get_id(row, 0)?,
        user_id: get_id(row, 1)?,
        occurrence_id: get_id(row, 2)?,
        source_info: row.get(3)?,
        identificated_at: row.get(4)?,
        timezone: row.get(5)?,
    })
}

fn db_load_occurrence(conn: &Connection, id: RecordId) -> rusqlite::Result<Option<Occurrence>> {
    conn.query_row(
        &format!("SELECT {OCCURRENCE_COLUMNS} FROM occurrence WHERE occurrence_id = ?1"),
        params![sql_id(id)?],
        map_occurrence_row,
    )
    .optional()
}

fn db_list_occurrences(conn: &Connection) -> rusqlite::Result<Vec<Occurrence>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {OCCURRENCE_COLUMNS} FROM occurrence ORDER BY occurrence_id"
    ))?;
    let rows = stmt
        .query_map([], map_occurrence_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_load_classification(
    conn: &Connection,
    id: RecordId,
) -> rusqlite::Result<Option<Classification>> {
    conn.query_row(
        "SELECT classification_id, class_classification FROM classification_json WHERE classification_id = ?1",
        params![sql_id(id)?],
        |row| {
            Ok(Classification {
                id: get_id(row, 0)?,
                document: get_json(row, 1)?,
            })
        },
    )
    .optional()
}

fn db_load_place(conn: &Connection, id: RecordId) -> rusqlite::Result<Option<Place>> {
    conn.query_row(
        "SELECT place_id, coordinates, place_name_id FROM places WHERE place_id = ?1",
        params![sql_id(id)?],
        |row| {
            Ok(Place {
                id: get_id(row, 0)?,
                coordinates: row.get(1)?,
                place_name_id: get_id(row, 2)?,
            })
        },
    )
    .optional()
}

fn db_load_place_name(conn: &Connection, id: RecordId) -> rusqlite::Result<Option<PlaceName>> {
    conn.query_row(
        "SELECT place_name_id, class_place_name FROM place_names_json WHERE place_name_id = ?1",
        params![sql_id(id)?],
        |row| {
            Ok(PlaceName {
                id: get_id(row, 0)?,
                document: get_json(row, 1)?,
            })
        },
    )
    .optional()
}

fn db_list_observations(
    conn: &Connection,
    occurrence_id: RecordId,
) -> rusqlite::Result<Vec<Observation>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT observations_id, user_id, occurrence_id, observation_method_id, behavior, observed_at, timezone
        FROM observations
        WHERE occurrence_id = ?1
        ORDER BY observations_id
        "#,
    )?;
    let rows = stmt
        .query_map(params![sql_id(occurrence_id)?], map_observation_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_list_specimens(conn: &Connection, occurrence_id: RecordId) -> rusqlite::Result<Vec<Specimen>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT specimen_id, occurrence_id, specimen_method_id, institution_id, collection_id
        FROM specimen
        WHERE occurrence_id = ?1
        ORDER BY specimen_id
        "#,
    )?;
    let rows = stmt
        .query_map(params![sql_id(occurrence_id)?], map_specimen_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_list_make_specimens(
    conn: &Connection,
    occurrence_id: RecordId,
) -> rusqlite::Result<Vec<MakeSpecimen>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT make_specimen_id, occurrence_id, user_id, specimen_id, date, specimen_method_id, created_at, timezone
        FROM make_specimen
        WHERE occurrence_id = ?1
        ORDER BY make_specimen_id
        "#,
    )?;
    let rows = stmt
        .query_map(params![sql_id(occurrence_id)?], map_make_specimen_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_list_identifications(
    conn: &Connection,
    occurrence_id: RecordId,
) -> rusqlite::Result<Vec<Identification>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT identification_id, user_id, occurrence_id, source_info, identificated_at, timezone
        FROM identifications
        WHERE occurrence_id = ?1
        ORDER BY identification_id
        "#,
    )?;
    let rows = stmt
        .query_map(params![sql_id(occurrence_id)?], map_identification_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_list_languages(conn: &Connection) -> rusqlite::Result<Vec<Language>> {
    let mut stmt = conn.prepare(
        "SELECT language_id, language_short, language_common FROM languages ORDER BY language_id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Language {
                id: get_id(row, 0)?,
                short: row.get(1)?,
                common: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_insert_classification(conn: &Connection, document: &Value) -> rusqlite::Result<RecordId> {
    conn.execute(
        "INSERT INTO classification_json (class_classification) VALUES (?1)",
        params![document.to_string()],
    )?;
    inserted_id(conn)
}

fn db_insert_place_name(conn: &Connection, document: &Value) -> rusqlite::Result<RecordId> {
    conn.execute(
        "INSERT INTO place_names_json (class_place_name) VALUES (?1)",
        params![document.to_string()],
    )?;
    inserted_id(conn)
}

fn db_insert_place(conn: &Connection, place: &NewPlace) -> rusqlite::Result<RecordId> {
    conn.execute(
        "INSERT INTO places (coordinates, place_name_id) VALUES (?1, ?2)",
        params![place.coordinates, sql_id(place.place_name_id)?],
    )?;
    inserted_id(conn)
}

fn db_insert_occurrence(conn: &Connection, occurrence: &NewOccurrence) -> rusqlite::Result<RecordId> {
    conn.execute(
        r#"
        INSERT INTO occurrence (
            project_id, user_id, individual_id, lifestage, sex, classification_id,
            place_id, body_length, language_id, note, created_at, timezone
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            sql_opt_id(occurrence.project_id)?,
            sql_id(occurrence.user_id)?,
            occurrence.individual_id,
            occurrence.lifestage,
            occurrence.sex,
            sql_id(occurrence.classification_id)?,
            sql_opt_id(occurrence.place_id)?,
            occurrence.body_length,
            sql_opt_id(occurrence.language_id)?,
            occurrence.note,
            occurrence.created_at,
            occurrence.timezone
        ],
    )?;
    inserted_id(conn)
}

fn db_insert_observation(
    conn: &Connection,
    observation: &NewObservation,
) -> rusqlite::Result<RecordId> {
    conn.execute(
        r#"
        INSERT INTO observations (
            user_id, occurrence_id, observation_method_id, behavior, observed_at, timezone
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            sql_id(observation.user_id)?,
            sql_id(observation.occurrence_id)?,
            sql_opt_id(observation.observation_method_id)?,
            observation.behavior,
            observation.observed_at,
            observation.timezone
        ],
    )?;
    inserted_id(conn)
}

fn db_insert_specimen(conn: &Connection, specimen: &NewSpecimen) -> rusqlite::Result<RecordId> {
    conn.execute(
        r#"
        INSERT INTO specimen (occurrence_id, specimen_method_id, institution_id, collection_id)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            sql_id(specimen.occurrence_id)?,
            sql_opt_id(specimen.specimen_method_id)?,
            sql_opt_id(specimen.institution_id)?,
            sql_opt_id(specimen.collection_id)?
        ],
    )?;
    inserted_id(conn)
}

fn db_insert_make_specimen(conn: &Connection, act: &NewMakeSpecimen) -> rusqlite::Result<RecordId> {
    conn.execute(
        r#"
        INSERT INTO make_specimen (
            occurrence_id, user_id, specimen_id, date, specimen_method_id, created_at, timezone
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            sql_id(act.occurrence_id)?,
            sql_id(act.user_id)?,
            sql_id(act.specimen_id)?,
            act.date,
            sql_opt_id(act.specimen_method_id)?,
            act.created_at,
            act.timezone
        ],
    )?;
    inserted_id(conn)
}

fn db_insert_identification(
    conn: &Connection,
    identification: &NewIdentification,
) -> rusqlite::Result<RecordId> {
    conn.execute(
        r#"
        INSERT INTO identifications (
            user_id, occurrence_id, source_info, identificated_at, timezone
        ) VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            sql_id(identification.user_id)?,
            sql_id(identification.occurrence_id)?,
            identification.source_info,
            identification.identificated_at,
            identification.timezone
        ],
    )?;
    inserted_id(conn)
}

impl StorageRead for SqliteTx {
    fn load_occurrence(&self, id: RecordId) -> Result<Option<Occurrence>> {
        Ok(db_load_occurrence(&self.conn, id)?)
    }

    fn list_occurrences(&self) -> Result<Vec<Occurrence>> {
        Ok(db_list_occurrences(&self.conn)?)
    }

    fn load_classification(&self, id: RecordId) -> Result<Option<Classification>> {
        Ok(db_load_classification(&self.conn, id)?)
    }

    fn load_place(&self, id: RecordId) -> Result<Option<Place>> {
        Ok(db_load_place(&self.conn, id)?)
    }

    fn load_place_name(&self, id: RecordId) -> Result<Option<PlaceName>> {
        Ok(db_load_place_name(&self.conn, id)?)
    }

    fn list_observations(&self, occurrence_id: RecordId) -> Result<Vec<Observation>> {
        Ok(db_list_observations(&self.conn, occurrence_id)?)
    }

    fn list_specimens(&self, occurrence_id: RecordId) -> Result<Vec<Specimen>> {
        Ok(db_list_specimens(&self.conn, occurrence_id)?)
    }

    fn list_make_specimens(&self, occurrence_id: RecordId) -> Result<Vec<MakeSpecimen>> {
        Ok(db_list_make_specimens(&self.conn, occurrence_id)?)
    }

    fn list_identifications(&self, occurrence_id: RecordId) -> Result<Vec<Identification>> {
        Ok(db_list_identifications(&self.conn, occurrence_id)?)
    }

    fn list_languages(&self) -> Result<Vec<Language>> {
        Ok(db_list_languages(&self.conn)?)
    }
}

impl StorageWrite for SqliteTx {
    fn insert_classification(&self, document: &Value) -> Result<RecordId> {
        Ok(db_insert_classification(&self.conn, document)?)
    }

    fn insert_place_name(&self, document: &Value) -> Result<RecordId> {
        Ok(db_insert_place_name(&self.conn, document)?)
    }

    fn insert_place(&self, place: &NewPlace) -> Result<RecordId> {
        Ok(db_insert_place(&self.conn, place)?)
    }

    fn insert_occurrence(&self, occurrence: &NewOccurrence) -> Result<RecordId> {
        Ok(db_insert_occurrence(&self.conn, occurrence)?)
    }

    fn insert_observation(&self, observation: &NewObservation) -> Result<RecordId> {
        Ok(db_insert_observation(&self.conn, observation)?)
    }

    fn insert_specimen(&self, specimen: &NewSpecimen) -> Result<RecordId> {
        Ok(db_insert_specimen(&self.conn, specimen)?)
    }

    fn insert_make_specimen(&self, act: &NewMakeSpecimen) -> Result<RecordId> {
        Ok(db_insert_make_specimen(&self.conn, act)?)
    }

    fn insert_identification(&self, identification: &NewIdentification) -> Result<RecordId> {
        Ok(db_insert_identification(&self.conn, identification)?)
    }
}

impl Storage for SqliteStorage {
    type Tx = SqliteTx;

    fn begin_tx(&self) -> Result<Self::Tx> {
        let conn = open_conn(&self.path)?;
        conn.execute("BEGIN IMMEDIATE", [])?;

        Ok(SqliteTx {
            conn,
            finished: false,
        })
    }
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        if !std::path::Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = open_conn(&self.path)?;
        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        if version == 0 {
            conn.execute_batch(
                r#"
            CREATE TABLE users (
                user_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_name TEXT NOT NULL,
                display_name TEXT NOT NULL DEFAULT '',
                timezone INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE projects (
                project_id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            );
            CREATE TABLE languages (
                language_id INTEGER PRIMARY KEY AUTOINCREMENT,
                language_short TEXT NOT NULL,
                language_common TEXT NOT NULL
            );
            CREATE TABLE observation_methods (
                observation_method_id INTEGER PRIMARY KEY AUTOINCREMENT,
                method_common_name TEXT NOT NULL
            );
            CREATE TABLE specimen_methods (
                specimen_methods_id INTEGER PRIMARY KEY AUTOINCREMENT,
                method_common_name TEXT NOT NULL
            );
            CREATE TABLE institution_id_code (
                institution_id INTEGER PRIMARY KEY AUTOINCREMENT,
                institution_code TEXT NOT NULL
            );
            CREATE TABLE collection_id_code (
                collection_id INTEGER PRIMARY KEY AUTOINCREMENT,
                collection_code TEXT NOT NULL
            );
            CREATE TABLE classification_json (
                classification_id INTEGER PRIMARY KEY AUTOINCREMENT,
                class_classification TEXT NOT NULL CHECK (json_valid(class_classification))
            );
            CREATE TABLE place_names_json (
                place_name_id INTEGER PRIMARY KEY AUTOINCREMENT,
                class_place_name TEXT NOT NULL CHECK (json_valid(class_place_name))
            );
            CREATE TABLE places (
                place_id INTEGER PRIMARY KEY AUTOINCREMENT,
                coordinates TEXT,
                place_name_id INTEGER NOT NULL REFERENCES place_names_json(place_name_id)
            );
            CREATE TABLE occurrence (
                occurrence_id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER REFERENCES projects(project_id),
                user_id INTEGER NOT NULL REFERENCES users(user_id),
                individual_id INTEGER,
                lifestage TEXT NOT NULL,
                sex TEXT NOT NULL,
                classification_id INTEGER NOT NULL REFERENCES classification_json(classification_id),
                place_id INTEGER REFERENCES places(place_id),
                body_length REAL,
                language_id INTEGER REFERENCES languages(language_id),
                note TEXT NOT NULL,
                created_at TEXT NOT NULL,
                timezone INTEGER NOT NULL
            );
            CREATE TABLE observations (
                observations_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(user_id),
                occurrence_id INTEGER NOT NULL REFERENCES occurrence(occurrence_id),
                observation_method_id INTEGER REFERENCES observation_methods(observation_method_id),
                behavior TEXT NOT NULL,
                observed_at TEXT NOT NULL,
                timezone INTEGER NOT NULL
            );
            CREATE TABLE specimen (
                specimen_id INTEGER PRIMARY KEY AUTOINCREMENT,
                occurrence_id INTEGER NOT NULL REFERENCES occurrence(occurrence_id),
                specimen_method_id INTEGER REFERENCES specimen_methods(specimen_methods_id),
                institution_id INTEGER REFERENCES institution_id_code(institution_id),
                collection_id INTEGER REFERENCES collection_id_code(collection_id)
            );
            CREATE TABLE make_specimen (
                make_specimen_id INTEGER PRIMARY KEY AUTOINCREMENT,
                occurrence_id INTEGER NOT NULL REFERENCES occurrence(occurrence_id),
                user_id INTEGER NOT NULL REFERENCES users(user_id),
                specimen_id INTEGER NOT NULL REFERENCES specimen(specimen_id),
                date TEXT,
                specimen_method_id INTEGER REFERENCES specimen_methods(specimen_methods_id),
                created_at TEXT NOT NULL,
                timezone INTEGER NOT NULL
            );
            CREATE TABLE identifications (
                identification_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(user_id),
                occurrence_id INTEGER NOT NULL REFERENCES occurrence(occurrence_id),
                source_info TEXT NOT NULL,
                identificated_at TEXT NOT NULL,
                timezone INTEGER NOT NULL
            );
            CREATE INDEX observations_occurrence_idx ON observations(occurrence_id);
            CREATE INDEX specimen_occurrence_idx ON specimen(occurrence_id);
            CREATE INDEX make_specimen_occurrence_idx ON make_specimen(occurrence_id);
            CREATE INDEX identifications_occurrence_idx ON identifications(occurrence_id);
        "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

impl StorageRead for SqliteStorage {
    fn load_occurrence(&self, id: RecordId) -> Result<Option<Occurrence>> {
        let row = self.with_conn(|conn| db_load_occurrence(conn, id))?;
        Ok(row)
    }

    fn list_occurrences(&self) -> Result<Vec<Occurrence>> {
        let rows = self.with_conn(db_list_occurrences)?;
        Ok(rows)
    }

    fn load_classification(&self, id: RecordId) -> Result<Option<Classification>> {
        let row = self.with_conn(|conn| db_load_classification(conn, id))?;
        Ok(row)
    }

    fn load_place(&self, id: RecordId) -> Result<Option<Place>> {
        let row = self.with_conn(|conn| db_load_place(conn, id))?;
        Ok(row)
    }

    fn load_place_name(&self, id: RecordId) -> Result<Option<PlaceName>> {
        let row = self.with_conn(|conn| db_load_place_name(conn, id))?;
        Ok(row)
    }

    fn list_observations(&self, occurrence_id: RecordId) -> Result<Vec<Observation>> {
        let rows = self.with_conn(|conn| db_list_observations(conn, occurrence_id))?;
        Ok(rows)
    }

    fn list_specimens(&self, occurrence_id: RecordId) -> Result<Vec<Specimen>> {
        let rows = self.with_conn(|conn| db_list_specimens(conn, occurrence_id))?;
        Ok(rows)
    }

    fn list_make_specimens(&self, occurrence_id: RecordId) -> Result<Vec<MakeSpecimen>> {
        let rows = self.with_conn(|conn| db_list_make_specimens(conn, occurrence_id))?;
        Ok(rows)
    }

    fn list_identifications(&self, occurrence_id: RecordId) -> Result<Vec<Identification>> {
        let rows = self.with_conn(|conn| db_list_identifications(conn, occurrence_id))?;
        Ok(rows)
    }

    fn list_languages(&self) -> Result<Vec<Language>> {
        let rows = self.with_conn(db_list_languages)?;
        Ok(rows)
    }

    // Every read of the detail runs on one connection inside one read transaction.
    fn load_occurrence_detail(&self, id: RecordId) -> Result<Option<OccurrenceDetail>> {
        let conn = open_conn(&self.path)?;
        Self::migrate(&conn)?;
        conn.execute("BEGIN DEFERRED", [])?;
        let snapshot = SqliteTx {
            conn,
            finished: false,
        };

        let detail = snapshot.load_occurrence_detail(id)?;
        snapshot.commit()?;
        Ok(detail)
    }
}
