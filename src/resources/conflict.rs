use super::{merge, FieldSet, Resource};
use crate::api::{validation::require, FieldErrors};
use crate::store::{Entity, Owned};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Conflict {
    pub name: String,
    pub description: String,
    pub goal: String,
    pub difficulty: i64,
    pub targets: Vec<String>,
    pub is_resolved: bool,
    pub parent_key: String,
}

impl Entity for Conflict {
    const KIND: &'static str = "conflicts";
}

impl Owned for Conflict {
    fn parent_key(&self) -> &str {
        &self.parent_key
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConflictFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub difficulty: Option<i64>,
    pub targets: Option<Vec<String>>,
    pub is_resolved: Option<bool>,
}

impl FieldSet for ConflictFields {
    fn check_required(&self) -> Result<(), FieldErrors> {
        require(&[
            ("Name", self.name.is_some()),
            ("Description", self.description.is_some()),
            ("Goal", self.goal.is_some()),
            ("Difficulty", self.difficulty.is_some()),
            ("Targets", self.targets.is_some()),
        ])
    }
}

impl Resource for Conflict {
    const NOUN: &'static str = "conflict";
    type Fields = ConflictFields;

    /// New conflicts always start unresolved.
    fn create(fields: ConflictFields, parent_key: String) -> Self {
        Self {
            name: fields.name.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            goal: fields.goal.unwrap_or_default(),
            difficulty: fields.difficulty.unwrap_or_default(),
            targets: fields.targets.unwrap_or_default(),
            is_resolved: false,
            parent_key,
        }
    }

    fn update(&mut self, fields: ConflictFields) {
        merge!(self.name, fields.name);
        merge!(self.description, fields.description);
        merge!(self.goal, fields.goal);
        merge!(self.difficulty, fields.difficulty);
        merge!(self.targets, fields.targets);
        merge!(self.is_resolved, fields.is_resolved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> ConflictFields {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_created_unresolved() {
        let body = fields(json!({
            "Name": "Siege",
            "Description": "The walls are failing",
            "Goal": "Hold the gate",
            "Difficulty": 4,
            "Targets": ["c1", "c2"],
            "IsResolved": true
        }));
        assert!(body.check_required().is_ok());

        let conflict = Conflict::create(body, "me".into());
        assert!(!conflict.is_resolved);
        assert_eq!(conflict.difficulty, 4);
    }

    #[test]
    fn test_is_resolved_optional_on_create() {
        let body = fields(json!({
            "Name": "Siege",
            "Description": "",
            "Goal": "",
            "Difficulty": 1,
            "Targets": []
        }));
        assert!(body.check_required().is_ok());
    }

    #[test]
    fn test_resolve_by_update() {
        let mut conflict = Conflict::create(
            fields(json!({
                "Name": "Duel",
                "Description": "At dawn",
                "Goal": "Survive",
                "Difficulty": 2,
                "Targets": []
            })),
            "me".into(),
        );

        conflict.update(fields(json!({ "IsResolved": true })));
        assert!(conflict.is_resolved);
        assert_eq!(conflict.name, "Duel");
    }

    #[test]
    fn test_difficulty_must_be_integer() {
        let result = serde_json::from_value::<ConflictFields>(json!({ "Difficulty": "hard" }));
        assert!(result.is_err());
    }
}
