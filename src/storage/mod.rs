pub mod records;
pub mod sqlite;
pub mod traits;

pub use records::RecordId;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageRead, StorageTx, StorageWrite};
