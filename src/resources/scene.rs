use super::{merge, FieldSet, Resource};
use crate::api::{validation::require, FieldErrors};
use crate::store::{Entity, Owned};
use serde::{Deserialize, Serialize};

/// Bonus granted to a user during a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SceneBonus {
    #[serde(rename = "BonusID")]
    pub bonus_id: String,
    #[serde(rename = "UserID")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Scene {
    pub name: String,
    pub description: String,
    pub is_resolved: bool,
    pub bonus: Vec<SceneBonus>,
    pub parent_key: String,
}

impl Entity for Scene {
    const KIND: &'static str = "scenes";
}

impl Owned for Scene {
    fn parent_key(&self) -> &str {
        &self.parent_key
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SceneFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_resolved: Option<bool>,
    pub bonus: Option<Vec<SceneBonus>>,
}

impl FieldSet for SceneFields {
    fn check_required(&self) -> Result<(), FieldErrors> {
        require(&[
            ("Name", self.name.is_some()),
            ("Description", self.description.is_some()),
        ])
    }
}

impl Resource for Scene {
    const NOUN: &'static str = "scene";
    type Fields = SceneFields;

    /// Scenes open unresolved with no bonuses handed out.
    fn create(fields: SceneFields, parent_key: String) -> Self {
        Self {
            name: fields.name.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            is_resolved: false,
            bonus: Vec::new(),
            parent_key,
        }
    }

    fn update(&mut self, fields: SceneFields) {
        merge!(self.name, fields.name);
        merge!(self.description, fields.description);
        merge!(self.is_resolved, fields.is_resolved);
        merge!(self.bonus, fields.bonus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_ignores_state_fields() {
        let fields: SceneFields = serde_json::from_value(json!({
            "Name": "Harbor",
            "Description": "Fog rolls in",
            "IsResolved": true,
            "Bonus": [{ "BonusID": "b1", "UserID": "u1" }]
        }))
        .unwrap();

        let scene = Scene::create(fields, "me".into());
        assert!(!scene.is_resolved);
        assert!(scene.bonus.is_empty());

        let value = serde_json::to_value(&scene).unwrap();
        assert_eq!(value["Bonus"], json!([]));
    }

    #[test]
    fn test_award_bonus() {
        let mut scene = Scene::create(
            serde_json::from_value(json!({ "Name": "Harbor", "Description": "" })).unwrap(),
            "me".into(),
        );

        scene.update(
            serde_json::from_value(json!({
                "IsResolved": true,
                "Bonus": [{ "BonusID": "b1", "UserID": "u1" }]
            }))
            .unwrap(),
        );

        assert!(scene.is_resolved);
        assert_eq!(
            scene.bonus,
            vec![SceneBonus {
                bonus_id: "b1".into(),
                user_id: "u1".into()
            }]
        );
    }
}
