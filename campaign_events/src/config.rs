//! Configuration loading for the event engine.
//!
//! Settings come from a TOML file; every field has a default, so an empty
//! file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::triggers::EventTrigger;

/// Complete engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: GeneralConfig,
    /// Extra triggers registered after the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<EventTrigger>,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Default configuration with automatic updates switched off.
    pub fn disabled() -> Self {
        Self {
            engine: GeneralConfig {
                auto_updates: false,
                ..GeneralConfig::default()
            },
            triggers: Vec::new(),
        }
    }

    pub fn with_max_events(mut self, max_events_per_session: usize) -> Self {
        self.engine.max_events_per_session = max_events_per_session;
        self
    }
}

/// General engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// When off, processing passes return the document untouched
    pub auto_updates: bool,
    /// Queue capacity; events beyond it are dropped
    pub max_events_per_session: usize,
    /// Register the built-in triggers at construction
    pub seed_default_triggers: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            auto_updates: true,
            max_events_per_session: 100,
            seed_default_triggers: true,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triggers::{default_triggers, npc_status_change, ActionKind, ConditionOperator, EventAction};
    use serde_json::Value;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::parse("").unwrap();
        assert!(config.engine.auto_updates);
        assert_eq!(config.engine.max_events_per_session, 100);
        assert!(config.engine.seed_default_triggers);
        assert!(config.triggers.is_empty());
    }

    #[test]
    fn test_parse_engine_section_and_triggers() {
        let config = EngineConfig::parse(
            r#"
            [engine]
            auto_updates = false
            max_events_per_session = 12

            [[triggers]]
            id = "death_toll"
            name = "Death toll"
            event_types = ["npc_update"]
            priority = 9
            cooldown_minutes = 30

            [[triggers.conditions]]
            kind = "entity_property"
            target = "status"
            operator = "equals"
            value = "dead"

            [[triggers.actions]]
            kind = "create_event"
            changes = { name = "A death", type = "character" }

            [[triggers.actions]]
            kind = "summon_dragon"
            "#,
        )
        .unwrap();

        assert!(!config.engine.auto_updates);
        assert_eq!(config.engine.max_events_per_session, 12);
        assert!(config.engine.seed_default_triggers);

        let trigger = &config.triggers[0];
        assert!(trigger.enabled);
        assert_eq!(trigger.cooldown_minutes, Some(30));
        assert_eq!(trigger.conditions[0].operator, ConditionOperator::Equals);
        assert_eq!(trigger.actions[0].changes["type"], "character");
        assert_eq!(trigger.actions[1].kind, ActionKind::Unknown);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = EngineConfig::default().with_max_events(7);
        let text = config.to_toml().unwrap();
        let parsed = EngineConfig::parse(&text).unwrap();
        assert_eq!(parsed.engine.max_events_per_session, 7);
    }

    #[test]
    fn test_null_values_survive_toml_round_trip() {
        let config = EngineConfig {
            triggers: vec![
                npc_status_change(),
                EventTrigger::new("quiet", "Quiet")
                    .on_event("rest")
                    .with_action(EventAction::update_entity("npc_1", Value::Null)),
            ],
            ..EngineConfig::default()
        };

        let text = config.to_toml().unwrap();
        let parsed = EngineConfig::parse(&text).unwrap();

        assert_eq!(parsed.triggers, config.triggers);
        assert_eq!(parsed.triggers[0].conditions[0].value, Value::Null);
        assert_eq!(parsed.triggers[1].actions[0].changes, Value::Null);
    }

    #[test]
    fn test_default_triggers_serialize() {
        let config = EngineConfig {
            triggers: default_triggers(),
            ..EngineConfig::default()
        };
        let parsed = EngineConfig::parse(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.triggers, default_triggers());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nseed_default_triggers = false").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert!(!config.engine.seed_default_triggers);

        let missing = EngineConfig::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = EngineConfig::parse("[engine]\nmax_events_per_session = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
