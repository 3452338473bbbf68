//! Story progression: plotlines, acts and the campaign timeline.

mod timeline;

pub use timeline::*;

use serde::{Deserialize, Serialize};

/// Lifecycle of a plotline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlotStatus {
    #[default]
    Planned,
    Active,
    Completed,
    Abandoned,
}

/// One act of a plotline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    pub name: String,
    #[serde(default)]
    pub summary: String,
}

impl Act {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: String::new(),
        }
    }
}

/// A story arc made of ordered acts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plotline {
    pub id: String,
    pub name: String,
    pub acts: Vec<Act>,
    /// Index into `acts`.
    #[serde(default)]
    pub current_act: usize,
    #[serde(default)]
    pub status: PlotStatus,
    /// Ids of timeline events belonging to this plotline.
    #[serde(default)]
    pub timeline: Vec<String>,
}

impl Plotline {
    pub fn new(id: impl Into<String>, name: impl Into<String>, acts: Vec<Act>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            acts,
            current_act: 0,
            status: PlotStatus::Planned,
            timeline: Vec::new(),
        }
    }

    /// The plotline a brand-new progression starts with.
    pub fn default_main() -> Self {
        Self {
            status: PlotStatus::Active,
            ..Self::new("main", "Main Story", vec![Act::new("Act I")])
        }
    }

    /// Whether `reference` names this plotline, by id or by name.
    pub fn is_named(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }

    /// Move to the next act.
    ///
    /// Returns `false` and leaves the plotline untouched when already on the
    /// last act.
    pub fn advance(&mut self) -> bool {
        if self.current_act.saturating_add(1) >= self.acts.len() {
            return false;
        }
        self.current_act += 1;
        self.status = PlotStatus::Active;
        true
    }
}

/// Everything that tracks how the story has moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub main_plotline: Plotline,
    #[serde(default)]
    pub plotlines: Vec<Plotline>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            main_plotline: Plotline::default_main(),
            plotlines: Vec::new(),
            timeline: Vec::new(),
        }
    }
}

impl Progression {
    /// Find a plotline by id or name, the main plotline first.
    pub fn plotline_mut(&mut self, reference: &str) -> Option<&mut Plotline> {
        if self.main_plotline.is_named(reference) {
            return Some(&mut self.main_plotline);
        }
        self.plotlines.iter_mut().find(|p| p.is_named(reference))
    }

    pub fn has_timeline_event(&self, id: &str) -> bool {
        self.timeline.iter().any(|e| e.id == id)
    }
}
