//! Whole-document persistence seam.
//!
//! Campaign documents are always read and written as a whole. The
//! `update_module` operation replaces one top-level section and is the only
//! partial write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::document::CampaignDocument;

/// Top-level sections of a campaign document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignModule {
    Npcs,
    Locations,
    Factions,
    WorldState,
    Progression,
}

impl CampaignModule {
    /// Field name of the section in the serialized document.
    pub fn field_name(&self) -> &'static str {
        match self {
            CampaignModule::Npcs => "npcs",
            CampaignModule::Locations => "locations",
            CampaignModule::Factions => "factions",
            CampaignModule::WorldState => "world_state",
            CampaignModule::Progression => "progression",
        }
    }
}

/// Errors raised by a campaign store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("campaign '{0}' not found")]
    NotFound(String),

    #[error("campaign '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid {module:?} data: {source}")]
    InvalidModule {
        module: CampaignModule,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A point-in-time copy of a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignBackup {
    pub campaign_id: String,
    pub taken_at: DateTime<Utc>,
    pub document: CampaignDocument,
}

/// Storage for campaign documents keyed by campaign id.
pub trait CampaignStore {
    fn create(&mut self, document: CampaignDocument) -> Result<(), StoreError>;

    fn load(&self, campaign_id: &str) -> Result<CampaignDocument, StoreError>;

    /// Replace the stored document with `document`.
    fn save(&mut self, document: CampaignDocument) -> Result<(), StoreError>;

    fn update_module(
        &mut self,
        campaign_id: &str,
        module: CampaignModule,
        data: Value,
    ) -> Result<(), StoreError>;

    fn delete(&mut self, campaign_id: &str) -> Result<CampaignDocument, StoreError>;

    fn backup(&mut self, campaign_id: &str) -> Result<CampaignBackup, StoreError>;
}

/// Process-local store, used by hosts without persistence and by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCampaignStore {
    documents: HashMap<String, CampaignDocument>,
    backups: HashMap<String, Vec<CampaignBackup>>,
}

impl InMemoryCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backups taken for a campaign, oldest first.
    pub fn backups(&self, campaign_id: &str) -> &[CampaignBackup] {
        self.backups
            .get(campaign_id)
            .map(|b| b.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl CampaignStore for InMemoryCampaignStore {
    fn create(&mut self, document: CampaignDocument) -> Result<(), StoreError> {
        if self.documents.contains_key(&document.id) {
            return Err(StoreError::AlreadyExists(document.id));
        }
        tracing::debug!(campaign_id = %document.id, "campaign created");
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    fn load(&self, campaign_id: &str) -> Result<CampaignDocument, StoreError> {
        self.documents
            .get(campaign_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(campaign_id.to_string()))
    }

    fn save(&mut self, document: CampaignDocument) -> Result<(), StoreError> {
        match self.documents.get_mut(&document.id) {
            Some(existing) => {
                *existing = document;
                Ok(())
            }
            None => Err(StoreError::NotFound(document.id)),
        }
    }

    fn update_module(
        &mut self,
        campaign_id: &str,
        module: CampaignModule,
        data: Value,
    ) -> Result<(), StoreError> {
        let existing = self
            .documents
            .get_mut(campaign_id)
            .ok_or_else(|| StoreError::NotFound(campaign_id.to_string()))?;

        let mut value = serde_json::to_value(&*existing)?;
        if let Value::Object(fields) = &mut value {
            fields.insert(module.field_name().to_string(), data);
        }
        *existing = serde_json::from_value(value)
            .map_err(|source| StoreError::InvalidModule { module, source })?;
        existing.updated_at = Some(Utc::now());
        Ok(())
    }

    fn delete(&mut self, campaign_id: &str) -> Result<CampaignDocument, StoreError> {
        self.backups.remove(campaign_id);
        self.documents
            .remove(campaign_id)
            .ok_or_else(|| StoreError::NotFound(campaign_id.to_string()))
    }

    fn backup(&mut self, campaign_id: &str) -> Result<CampaignBackup, StoreError> {
        let backup = CampaignBackup {
            campaign_id: campaign_id.to_string(),
            taken_at: Utc::now(),
            document: self.load(campaign_id)?,
        };
        self.backups
            .entry(campaign_id.to_string())
            .or_default()
            .push(backup.clone());
        tracing::debug!(campaign_id, "campaign backed up");
        Ok(backup)
    }
}
