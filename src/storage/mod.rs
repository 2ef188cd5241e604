//! Durable storage and configuration.

pub mod config;
pub mod persistence;
pub mod schema;
pub mod slot;
pub mod sqlite;

pub use config::{AppConfig, ConfigError, MapSettings, ProxySettings, StorageBackend, StorageSettings};
pub use persistence::{WorkoutPersistence, WORKOUTS_KEY};
pub use slot::{FileSlot, MemorySlot, StorageError, StorageSlot};
pub use sqlite::SqliteSlot;

/// Open the slot selected by the storage settings, relative to the data dir.
pub fn open_slot(config: &AppConfig) -> Result<Box<dyn StorageSlot>, StorageError> {
    let path = config.data_dir.join(&config.storage.path);

    let slot: Box<dyn StorageSlot> = match config.storage.backend {
        StorageBackend::Sqlite => Box::new(SqliteSlot::open(&path)?),
        StorageBackend::File => Box::new(FileSlot::open(&path)?),
    };

    tracing::info!(
        "Using {:?} workout storage at {}",
        config.storage.backend,
        path.display()
    );
    Ok(slot)
}
