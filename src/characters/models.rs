use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

fn empty_object() -> Value {
    json!({})
}

fn empty_array() -> Value {
    json!([])
}

/// Player card shown in the roster list
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlayerSummary {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Aria Nightwind")]
    pub name: String,
    #[schema(example = 3)]
    pub level: i32,
    pub image: Option<String>,
}

/// Full player sheet
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Player {
    pub id: i32,
    /// Account that created the player (0 for the bootstrap admin)
    pub user_id: Option<i32>,
    pub name: String,
    pub level: i32,
    pub image: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub stats: Value,
    #[schema(value_type = Object)]
    pub skills: Value,
    #[schema(value_type = Object)]
    pub equipment: Value,
    #[serde(rename = "equipmentInventory")]
    #[schema(value_type = Object)]
    pub equipment_inventory: Value,
    #[schema(value_type = Object)]
    pub inventory: Value,
}

/// Body for creating or replacing a player.
///
/// Updates replace every editable field, matching how the sheet editor saves.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PlayerPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Aria Nightwind")]
    pub name: String,
    #[validate(range(min = 1, message = "Level must be at least 1"))]
    #[schema(example = 1)]
    pub level: i32,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub stats: Value,
    #[serde(default = "empty_array")]
    #[schema(value_type = Object)]
    pub skills: Value,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub equipment: Value,
    #[serde(default = "empty_array", rename = "equipmentInventory")]
    #[schema(value_type = Object)]
    pub equipment_inventory: Value,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub inventory: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Monster {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    #[schema(value_type = Object)]
    pub stats: Value,
    #[schema(value_type = Object)]
    pub skills: Value,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMonster {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Cave Troll")]
    pub name: String,
    pub image: Option<String>,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub stats: Value,
    #[serde(default = "empty_array")]
    #[schema(value_type = Object)]
    pub skills: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Skill {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub skill_type: Option<String>,
    #[schema(value_type = Object)]
    pub damage_formula: Value,
    #[schema(value_type = Object)]
    pub buff_effect: Value,
    #[schema(value_type = Object)]
    pub debuff_effect: Value,
    pub description: Option<String>,
    pub skill_for: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSkill {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Fireball")]
    pub name: String,
    #[schema(example = "magic")]
    pub category: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "damage")]
    pub skill_type: Option<String>,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub damage_formula: Value,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub buff_effect: Value,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    pub debuff_effect: Value,
    pub description: Option<String>,
    #[schema(example = "player")]
    pub skill_for: Option<String>,
}
