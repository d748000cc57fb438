//! Settings Repository (singleton record)

use shared::models::{Settings, SettingsUpdate};

use crate::db::storage::{StorageResult, check_version};
use crate::db::Storage;
use crate::utils::AppResult;

#[derive(Clone)]
pub struct SettingsRepository {
    storage: Storage,
}

impl SettingsRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Current settings (accepting orders unless switched off)
    pub fn get(&self) -> AppResult<Settings> {
        Ok(self.storage.get_settings()?)
    }

    /// Merge a partial update and bump the version
    pub fn update(&self, patch: SettingsUpdate) -> AppResult<Settings> {
        let settings = self.update_txn(patch)?;
        tracing::info!(
            accepting_orders = settings.accepting_orders,
            version = settings.version,
            "Settings updated"
        );
        Ok(settings)
    }

    fn update_txn(&self, patch: SettingsUpdate) -> StorageResult<Settings> {
        let txn = self.storage.begin_write()?;
        let mut settings = self.storage.get_settings_txn(&txn)?;
        check_version(patch.version, settings.version)?;

        if let Some(accepting) = patch.accepting_orders {
            settings.accepting_orders = accepting;
        }
        settings.version += 1;

        self.storage.store_settings(&txn, &settings)?;
        txn.commit()?;
        Ok(settings)
    }
}
