use super::{merge, FieldSet, Resource};
use crate::api::{validation::require, FieldErrors};
use crate::store::{Entity, Owned};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Power {
    pub name: String,
    pub description: String,
    #[serde(rename = "Type")]
    pub kind: i64,
    /// Keys of the status changes this power applies
    pub effect: Vec<String>,
    pub parent_key: String,
}

impl Entity for Power {
    const KIND: &'static str = "powers";
}

impl Owned for Power {
    fn parent_key(&self) -> &str {
        &self.parent_key
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PowerFields {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<i64>,
    pub effect: Option<Vec<String>>,
}

impl FieldSet for PowerFields {
    fn check_required(&self) -> Result<(), FieldErrors> {
        require(&[
            ("Name", self.name.is_some()),
            ("Description", self.description.is_some()),
            ("Type", self.kind.is_some()),
            ("Effect", self.effect.is_some()),
        ])
    }
}

impl Resource for Power {
    const NOUN: &'static str = "power";
    type Fields = PowerFields;

    fn create(fields: PowerFields, parent_key: String) -> Self {
        Self {
            name: fields.name.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            kind: fields.kind.unwrap_or_default(),
            effect: fields.effect.unwrap_or_default(),
            parent_key,
        }
    }

    fn update(&mut self, fields: PowerFields) {
        merge!(self.name, fields.name);
        merge!(self.description, fields.description);
        merge!(self.kind, fields.kind);
        merge!(self.effect, fields.effect);
    }
}
