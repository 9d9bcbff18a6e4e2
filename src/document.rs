//! Saved diagram: settings, phasor records and an opaque view transform

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;
use crate::registry::{PhasorRecord, Registry};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub settings: Settings,
    pub phasors: Vec<PhasorRecord>,
    /// Pan and zoom state of the view, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<serde_json::Value>,
}

impl Document {
    /// Snapshot of the current state
    pub fn capture(
        registry: &Registry,
        settings: &Settings,
        transform: Option<serde_json::Value>,
    ) -> Self {
        Document {
            settings: settings.clone(),
            phasors: registry.records(),
            transform,
        }
    }

    pub fn to_json(
        registry: &Registry,
        settings: &Settings,
        transform: Option<serde_json::Value>,
    ) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Self::capture(registry, settings, transform))
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace the registry contents and settings with this document.
    ///
    /// Settings are checked first. Both are applied or neither is.
    pub fn apply(&self, registry: &mut Registry, settings: &mut Settings) -> Result<(), LoadError> {
        if let Err(error) = self.settings.validate() {
            crate::log::warn!(%error, "document settings rejected");
            return Err(error.into());
        }
        registry.load(&self.phasors)?;
        *settings = self.settings.clone();
        Ok(())
    }

    /// Parse and apply in one step. Returns the view transform, if any.
    pub fn load(
        json: &str,
        registry: &mut Registry,
        settings: &mut Settings,
    ) -> Result<Option<serde_json::Value>, LoadError> {
        let doc = Self::from_json(json)?;
        doc.apply(registry, settings)?;
        Ok(doc.transform)
    }
}
