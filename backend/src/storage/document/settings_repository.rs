//! Settings documents live in `settings/{user_id}.yaml`.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::connection::DocumentConnection;
use crate::domain::models::settings::DomainSettings;
use crate::storage::traits::SettingsStorage;

const COLLECTION: &str = "settings";

#[derive(Clone)]
pub struct SettingsRepository {
    connection: DocumentConnection,
}

impl SettingsRepository {
    pub fn new(connection: DocumentConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl SettingsStorage for SettingsRepository {
    async fn get_settings(&self, user_id: &str) -> Result<Option<DomainSettings>> {
        self.connection.read_document(COLLECTION, user_id)
    }

    async fn store_settings(&self, settings: &DomainSettings) -> Result<()> {
        debug!("Storing settings for {}", settings.user_id);
        self.connection
            .write_document(COLLECTION, &settings.user_id, settings)
    }

    async fn delete_settings(&self, user_id: &str) -> Result<bool> {
        self.connection.remove_document(COLLECTION, user_id)
    }
}
