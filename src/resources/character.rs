//! Player characters

use super::{merge, FieldSet, Resource};
use crate::api::{validation::require, FieldErrors};
use crate::store::{Entity, Owned};
use serde::{Deserialize, Serialize};

/// One tickable character trait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CharacterTrait {
    pub value: String,
    #[serde(default)]
    pub is_ticked: bool,
}

impl CharacterTrait {
    pub fn toggle(&mut self) {
        self.is_ticked = !self.is_ticked;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Skill {
    #[serde(rename = "ID")]
    pub id: String,
    pub rating: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Character {
    pub name: String,
    pub concept: String,
    pub mark: String,
    pub passion: String,
    pub traits: Vec<CharacterTrait>,
    pub skills: Vec<Skill>,
    pub powers: Vec<String>,
    pub background: String,
    pub links: Vec<String>,
    pub parent_key: String,
}

impl Entity for Character {
    const KIND: &'static str = "characters";
}

impl Owned for Character {
    fn parent_key(&self) -> &str {
        &self.parent_key
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CharacterFields {
    pub name: Option<String>,
    pub concept: Option<String>,
    pub mark: Option<String>,
    pub passion: Option<String>,
    pub traits: Option<Vec<CharacterTrait>>,
    pub skills: Option<Vec<Skill>>,
    pub powers: Option<Vec<String>>,
    pub background: Option<String>,
    pub links: Option<Vec<String>>,
}

impl FieldSet for CharacterFields {
    fn check_required(&self) -> Result<(), FieldErrors> {
        require(&[
            ("Name", self.name.is_some()),
            ("Concept", self.concept.is_some()),
            ("Mark", self.mark.is_some()),
            ("Passion", self.passion.is_some()),
            ("Traits", self.traits.is_some()),
            ("Skills", self.skills.is_some()),
            ("Powers", self.powers.is_some()),
            ("Background", self.background.is_some()),
            ("Links", self.links.is_some()),
        ])
    }
}

impl Resource for Character {
    const NOUN: &'static str = "character";
    type Fields = CharacterFields;

    fn create(fields: CharacterFields, parent_key: String) -> Self {
        Self {
            name: fields.name.unwrap_or_default(),
            concept: fields.concept.unwrap_or_default(),
            mark: fields.mark.unwrap_or_default(),
            passion: fields.passion.unwrap_or_default(),
            traits: fields.traits.unwrap_or_default(),
            skills: fields.skills.unwrap_or_default(),
            powers: fields.powers.unwrap_or_default(),
            background: fields.background.unwrap_or_default(),
            links: fields.links.unwrap_or_default(),
            parent_key,
        }
    }

    fn update(&mut self, fields: CharacterFields) {
        merge!(self.name, fields.name);
        merge!(self.concept, fields.concept);
        merge!(self.mark, fields.mark);
        merge!(self.passion, fields.passion);
        merge!(self.traits, fields.traits);
        merge!(self.skills, fields.skills);
        merge!(self.powers, fields.powers);
        merge!(self.background, fields.background);
        merge!(self.links, fields.links);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_body() -> serde_json::Value {
        json!({
            "Name": "Kaia",
            "Concept": "Wandering oracle",
            "Mark": "Silver eyes",
            "Passion": "Truth",
            "Traits": [{ "Value": "Curious" }, { "Value": "Stubborn", "IsTicked": true }],
            "Skills": [{ "ID": "lore", "Rating": 3 }],
            "Powers": ["p1"],
            "Background": "Raised in the archive",
            "Links": []
        })
    }

    #[test]
    fn test_create_from_full_body() {
        let fields: CharacterFields = serde_json::from_value(full_body()).unwrap();
        assert!(fields.check_required().is_ok());

        let character = Character::create(fields, "owner".into());
        assert_eq!(character.parent_key(), "owner");
        assert_eq!(character.traits.len(), 2);
        assert!(!character.traits[0].is_ticked);
        assert!(character.traits[1].is_ticked);
        assert_eq!(character.skills[0].rating, 3);
    }

    #[test]
    fn test_missing_fields_reported() {
        let fields: CharacterFields = serde_json::from_value(json!({ "Name": "Kaia" })).unwrap();
        let errors = fields.check_required().unwrap_err();

        assert_eq!(errors.len(), 8);
        assert!(errors.get("Name").is_none());
        assert!(errors.get("Links").is_some());
    }

    #[test]
    fn test_parent_key_not_client_settable() {
        let mut body = full_body();
        body["ParentKey"] = json!("someone-else");
        let fields: CharacterFields = serde_json::from_value(body).unwrap();

        let character = Character::create(fields, "me".into());
        assert_eq!(character.parent_key, "me");
    }

    #[test]
    fn test_partial_update() {
        let fields: CharacterFields = serde_json::from_value(full_body()).unwrap();
        let mut character = Character::create(fields, "me".into());

        let patch: CharacterFields =
            serde_json::from_value(json!({ "Passion": "Freedom", "Links": ["c2"] })).unwrap();
        character.update(patch);

        assert_eq!(character.passion, "Freedom");
        assert_eq!(character.links, vec!["c2".to_string()]);
        assert_eq!(character.name, "Kaia");
        assert_eq!(character.parent_key, "me");
    }

    #[test]
    fn test_wire_names() {
        let fields: CharacterFields = serde_json::from_value(full_body()).unwrap();
        let value = serde_json::to_value(Character::create(fields, "me".into())).unwrap();

        assert_eq!(value["ParentKey"], "me");
        assert_eq!(value["Skills"][0]["ID"], "lore");
        assert_eq!(value["Traits"][0]["IsTicked"], false);
    }
}
