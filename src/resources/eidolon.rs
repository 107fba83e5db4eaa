use super::{merge, FieldSet, Resource};
use crate::api::{validation::require, FieldErrors};
use crate::store::{Entity, Owned};
use serde::{Deserialize, Serialize};

/// Summoned spirit companion. Type, skill, powers and weakness are indices
/// into client-side tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Eidolon {
    pub name: String,
    pub description: String,
    pub level: i64,
    #[serde(rename = "Type")]
    pub kind: i64,
    pub skill: i64,
    pub powers: Vec<i64>,
    pub weakness: i64,
    pub parent_key: String,
}

impl Entity for Eidolon {
    const KIND: &'static str = "eidolons";
}

impl Owned for Eidolon {
    fn parent_key(&self) -> &str {
        &self.parent_key
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EidolonFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub level: Option<i64>,
    #[serde(rename = "Type")]
    pub kind: Option<i64>,
    pub skill: Option<i64>,
    pub powers: Option<Vec<i64>>,
    pub weakness: Option<i64>,
}

impl FieldSet for EidolonFields {
    fn check_required(&self) -> Result<(), FieldErrors> {
        require(&[
            ("Name", self.name.is_some()),
            ("Description", self.description.is_some()),
            ("Level", self.level.is_some()),
            ("Type", self.kind.is_some()),
            ("Skill", self.skill.is_some()),
            ("Powers", self.powers.is_some()),
            ("Weakness", self.weakness.is_some()),
        ])
    }
}

impl Resource for Eidolon {
    const NOUN: &'static str = "eidolon";
    type Fields = EidolonFields;

    fn create(fields: EidolonFields, parent_key: String) -> Self {
        Self {
            name: fields.name.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            level: fields.level.unwrap_or_default(),
            kind: fields.kind.unwrap_or_default(),
            skill: fields.skill.unwrap_or_default(),
            powers: fields.powers.unwrap_or_default(),
            weakness: fields.weakness.unwrap_or_default(),
            parent_key,
        }
    }

    fn update(&mut self, fields: EidolonFields) {
        merge!(self.name, fields.name);
        merge!(self.description, fields.description);
        merge!(self.level, fields.level);
        merge!(self.kind, fields.kind);
        merge!(self.skill, fields.skill);
        merge!(self.powers, fields.powers);
        merge!(self.weakness, fields.weakness);
    }
}
