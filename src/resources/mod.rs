//! Owned game resources
//!
//! Characters, conflicts, eidolons, powers and scenes share one lifecycle:
//! created with the requester stamped as `ParentKey`, then read, updated or
//! deleted only by that owner or an admin. Each kind plugs into the generic
//! handlers through [`Resource`].

pub mod character;
pub mod conflict;
pub mod eidolon;
pub mod power;
pub mod scene;

pub use character::Character;
pub use conflict::Conflict;
pub use eidolon::Eidolon;
pub use power::Power;
pub use scene::Scene;

use crate::api::{validation::Validate, FieldErrors};
use crate::store::Owned;
use serde::{de::DeserializeOwned, Deserialize};

/// Client-suppliable fields of a resource, all optional on the wire
pub trait FieldSet: DeserializeOwned + Send + 'static {
    /// Required-on-create check
    fn check_required(&self) -> Result<(), FieldErrors>;
}

pub trait Resource: Owned + 'static {
    /// Singular noun used in messages ("character")
    const NOUN: &'static str;

    type Fields: FieldSet;

    /// Build a new resource from validated fields, owned by `parent_key`.
    fn create(fields: Self::Fields, parent_key: String) -> Self;

    /// Overwrite every field present in `fields`. Ownership never changes.
    fn update(&mut self, fields: Self::Fields);
}

/// Create body: every required field must be present
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct NewResource<F>(pub F);

impl<F: FieldSet> Validate for NewResource<F> {
    fn validate(&self) -> Result<(), FieldErrors> {
        self.0.check_required()
    }
}

/// Update body: any subset of fields
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct ResourcePatch<F>(pub F);

impl<F: FieldSet> Validate for ResourcePatch<F> {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

/// Assign `$src` into `$dst` when present.
macro_rules! merge {
    ($dst:expr, $src:expr) => {
        if let Some(value) = $src {
            $dst = value;
        }
    };
}

pub(crate) use merge;
