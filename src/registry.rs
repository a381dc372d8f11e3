//! Explicit model registration.
//!
//! The process builds a [`Registry`] at startup and hands it to the serving loop; nothing is
//! registered as a side effect of loading the crate.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ResourceConfig;
use crate::error::{Result, ToolError};
use crate::gripper::Gripper;

fn split_triple(s: &str) -> Option<(&str, &str, &str)> {
    let mut parts = s.split(':');
    let triple = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || [triple.0, triple.1, triple.2].iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(triple)
}

/// Resource API, e.g. `rdk:component:gripper`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Api {
    pub namespace: String,
    pub kind: String,
    pub subtype: String,
}

impl Api {
    pub fn gripper() -> Self {
        Self {
            namespace: "rdk".to_string(),
            kind: "component".to_string(),
            subtype: "gripper".to_string(),
        }
    }
}

/// Namespaced model identifier (organization, family, name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Model {
    pub namespace: String,
    pub family: String,
    pub name: String,
}

impl Model {
    pub fn new(namespace: &str, family: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            family: family.to_string(),
            name: name.to_string(),
        }
    }
}

macro_rules! triple_conversions {
    ($ty:ident, $a:ident, $b:ident, $c:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}:{}", self.$a, self.$b, self.$c)
            }
        }

        impl FromStr for $ty {
            type Err = ToolError;

            fn from_str(s: &str) -> Result<Self> {
                let (a, b, c) =
                    split_triple(s).ok_or_else(|| ToolError::MalformedModel(s.to_string()))?;
                Ok(Self {
                    $a: a.to_string(),
                    $b: b.to_string(),
                    $c: c.to_string(),
                })
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ToolError;

            fn try_from(s: String) -> Result<Self> {
                s.parse()
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> String {
                v.to_string()
            }
        }
    };
}

triple_conversions!(Api, namespace, kind, subtype);
triple_conversions!(Model, namespace, family, name);

/// Builds a resource from its configuration.
pub type Constructor = fn(&ResourceConfig) -> Result<Arc<dyn Gripper>>;

/// Constructors keyed by (API, model).
#[derive(Default)]
pub struct Registry {
    constructors: HashMap<(Api, Model), Constructor>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("models", &self.models().map(|(a, m)| format!("{a} {m}")).collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` for `(api, model)`. A second registration replaces the first.
    pub fn register(&mut self, api: Api, model: Model, constructor: Constructor) {
        debug!(%api, %model, "registering model");
        self.constructors.insert((api, model), constructor);
    }

    pub fn models(&self) -> impl Iterator<Item = (&Api, &Model)> {
        self.constructors.keys().map(|(a, m)| (a, m))
    }

    /// Runs the constructor registered for the config's API and model.
    pub fn construct(&self, conf: &ResourceConfig) -> Result<Arc<dyn Gripper>> {
        let constructor = self
            .constructors
            .get(&(conf.api.clone(), conf.model.clone()))
            .ok_or_else(|| ToolError::UnknownModel {
                api: conf.api.to_string(),
                model: conf.model.to_string(),
            })?;
        constructor(conf)
    }
}
