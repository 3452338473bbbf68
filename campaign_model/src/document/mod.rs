//! The campaign document - the whole record the rules engine reads and rewrites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::{merge_fields, EntityId, EntityKind, Faction, Location, Npc};
use crate::progression::{Progression, TimelineEvent};
use crate::world_state::WorldState;

/// The complete state of one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CampaignDocument {
    pub id: String,
    pub name: String,

    /// NPC roster.
    #[serde(default)]
    pub npcs: Vec<Npc>,

    #[serde(default)]
    pub locations: Vec<Location>,

    #[serde(default)]
    pub factions: Vec<Faction>,

    #[serde(default)]
    pub world_state: WorldState,

    /// Absent until the first plot or timeline entry is recorded.
    #[serde(default)]
    pub progression: Option<Progression>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CampaignDocument {
    /// Create a new empty campaign.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn get_npc(&self, id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == *id)
    }

    pub fn add_npc(&mut self, npc: Npc) -> EntityId {
        let id = npc.id.clone();
        self.npcs.push(npc);
        id
    }

    pub fn add_location(&mut self, location: Location) -> EntityId {
        let id = location.id.clone();
        self.locations.push(location);
        id
    }

    pub fn add_faction(&mut self, faction: Faction) -> EntityId {
        let id = faction.id.clone();
        self.factions.push(faction);
        id
    }

    /// Which collection holds the entity with this id, searching NPCs, then
    /// locations, then factions.
    pub fn locate_entity(&self, id: &str) -> Option<EntityKind> {
        if self.npcs.iter().any(|n| n.id == *id) {
            Some(EntityKind::Npc)
        } else if self.locations.iter().any(|l| l.id == *id) {
            Some(EntityKind::Location)
        } else if self.factions.iter().any(|f| f.id == *id) {
            Some(EntityKind::Faction)
        } else {
            None
        }
    }

    /// Shallow-merge `changes` into the first entity whose id matches.
    ///
    /// Returns `Ok(None)` when no entity has that id.
    pub fn merge_into_entity(
        &mut self,
        id: &str,
        changes: &Map<String, Value>,
    ) -> Result<Option<EntityKind>, serde_json::Error> {
        let Some(kind) = self.locate_entity(id) else {
            return Ok(None);
        };

        match kind {
            EntityKind::Npc => {
                if let Some(npc) = self.npcs.iter_mut().find(|n| n.id == *id) {
                    merge_fields(npc, changes)?;
                }
            }
            EntityKind::Location => {
                if let Some(location) = self.locations.iter_mut().find(|l| l.id == *id) {
                    merge_fields(location, changes)?;
                }
            }
            EntityKind::Faction => {
                if let Some(faction) = self.factions.iter_mut().find(|f| f.id == *id) {
                    merge_fields(faction, changes)?;
                }
            }
        }

        Ok(Some(kind))
    }

    /// The progression container, created with a default main plotline if
    /// the campaign has none yet.
    pub fn progression_mut(&mut self) -> &mut Progression {
        self.progression.get_or_insert_with(Progression::default)
    }

    /// All timeline entries, oldest first.
    pub fn timeline(&self) -> &[TimelineEvent] {
        self.progression
            .as_ref()
            .map(|p| p.timeline.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_into_npc() {
        let mut doc = CampaignDocument::new("c1", "Saltmarsh");
        doc.add_npc(Npc::new("Eliander").with_id("npc_1"));

        let changes = json!({ "status": "captured", "disposition": -20 });
        let kind = doc
            .merge_into_entity("npc_1", changes.as_object().unwrap())
            .unwrap();

        assert_eq!(kind, Some(EntityKind::Npc));
        let npc = doc.get_npc("npc_1").unwrap();
        assert_eq!(npc.status.as_deref(), Some("captured"));
        assert_eq!(npc.disposition, -20);
    }

    #[test]
    fn test_merge_into_missing_entity() {
        let mut doc = CampaignDocument::new("c1", "Saltmarsh");
        let before = doc.clone();

        let changes = json!({ "status": "dead" });
        let kind = doc.merge_into_entity("ghost", changes.as_object().unwrap()).unwrap();

        assert!(kind.is_none());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_npcs_are_searched_before_locations() {
        let mut doc = CampaignDocument::new("c1", "Saltmarsh");
        let mut location = Location::new("Haunted House");
        location.id = EntityId::from("shared");
        doc.add_location(location);
        doc.add_npc(Npc::new("Ned").with_id("shared"));

        assert_eq!(doc.locate_entity("shared"), Some(EntityKind::Npc));
    }

    #[test]
    fn test_progression_created_on_demand() {
        let mut doc = CampaignDocument::new("c1", "Saltmarsh");
        assert!(doc.timeline().is_empty());

        doc.progression_mut();
        let progression = doc.progression.as_ref().unwrap();
        assert_eq!(progression.main_plotline.id, "main");
    }
}
