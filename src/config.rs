//! Resource configuration handed over by the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::registry::{Api, Model};

/// Free-form attribute document attached to a resource.
pub type Attributes = serde_json::Map<String, Value>;

/// One resource entry from the machine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    #[serde(default = "Api::gripper")]
    pub api: Api,
    #[serde(default = "crate::sander_model")]
    pub model: Model,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ResourceConfig {
    /// A sander config with no attributes.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api: Api::gripper(),
            model: crate::sander_model(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

/// Layout flags recognized in the sander's attributes. Anything else is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SanderConfig {
    /// Approximate the sanding block with a capsule instead of a box.
    pub capsules: bool,
    /// Model the internal clamp as well.
    pub fancy: bool,
}

/// Which hard-coded geometry table to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Pivot capsule, block box, hose sphere.
    Standard,
    /// Like [`Layout::Standard`] with the block as a capsule. Never contains a box.
    Capsules,
    /// Internal clamp, pivot, block and hose.
    Expanded,
}

impl SanderConfig {
    /// Reads the layout flags. Never fails: a flag that is absent, null or not a boolean
    /// counts as unset.
    pub fn from_resource(conf: &ResourceConfig) -> Self {
        let flag = |key: &str| match conf.attributes.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(set)) => *set,
            Some(other) => {
                warn!(name = %conf.name, key, value = %other, "ignoring non-boolean layout flag");
                false
            }
        };
        Self {
            capsules: flag("capsules"),
            fancy: flag("fancy"),
        }
    }

    pub fn layout(&self) -> Layout {
        match (self.capsules, self.fancy) {
            (false, false) => Layout::Standard,
            (true, false) => Layout::Capsules,
            (false, true) => Layout::Expanded,
            (true, true) => {
                warn!("both `capsules` and `fancy` set; using the fancy layout");
                Layout::Expanded
            }
        }
    }
}
