//! Named parameter sets keyed by internal name.
//!
//! Unlike the binary state block, a patch survives reordering of the
//! parameter table and is readable by people. With the `serde` feature it can
//! be stored in any serde format.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{WolpError, WolpResult},
    params::{ParamId, ParamStore},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub name: String,
    pub description: Option<String>,
    pub values: BTreeMap<String, f32>,
}

impl Patch {
    /// Capture the writable parameters of a store.
    pub fn capture(name: impl Into<String>, store: &ParamStore) -> Self {
        let values = ParamId::ALL
            .iter()
            .filter(|id| !id.is_read_only())
            .map(|id| (id.info().internal_name.to_string(), store.get(*id)))
            .collect();

        Self {
            name: name.into(),
            description: None,
            values,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Write the patch into a store. Every name is resolved first; if any is
    /// unknown nothing is written.
    pub fn apply(&self, store: &ParamStore) -> WolpResult<()> {
        let resolved = self
            .values
            .iter()
            .map(|(name, value)| {
                ParamId::from_name(name)
                    .map(|id| (id, *value))
                    .ok_or_else(|| WolpError::UnknownParameter { name: name.clone() })
            })
            .collect::<WolpResult<Vec<_>>>()?;

        for (id, value) in resolved {
            store.set(id, value);
        }
        log::debug!("applied patch '{}' ({} values)", self.name, self.values.len());
        Ok(())
    }
}
