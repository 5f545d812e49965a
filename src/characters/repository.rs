use async_trait::async_trait;
use sqlx::PgPool;

use crate::characters::models::{
    CreateMonster, CreateSkill, Monster, Player, PlayerPayload, PlayerSummary, Skill,
};

/// Persistence seam for players, monsters and skills
#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn list_players(&self) -> Result<Vec<PlayerSummary>, sqlx::Error>;

    async fn find_player(&self, id: i32) -> Result<Option<Player>, sqlx::Error>;

    async fn create_player(
        &self,
        creator_id: i32,
        payload: &PlayerPayload,
    ) -> Result<Player, sqlx::Error>;

    /// Replace a player's editable fields; `None` when the id does not exist
    async fn update_player(
        &self,
        id: i32,
        payload: &PlayerPayload,
    ) -> Result<Option<Player>, sqlx::Error>;

    async fn list_monsters(&self) -> Result<Vec<Monster>, sqlx::Error>;

    async fn create_monster(&self, payload: &CreateMonster) -> Result<Monster, sqlx::Error>;

    async fn list_skills(&self) -> Result<Vec<Skill>, sqlx::Error>;

    async fn create_skill(&self, payload: &CreateSkill) -> Result<Skill, sqlx::Error>;
}

const PLAYER_COLUMNS: &str = "id, user_id, name, level, image, description, stats, skills, \
                              equipment, equipment_inventory, inventory";

/// Repository for players, monsters and skills
#[derive(Clone)]
pub struct CharacterRepository {
    pool: PgPool,
}

impl CharacterRepository {
    /// Create a new CharacterRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CharacterStore for CharacterRepository {
    async fn list_players(&self) -> Result<Vec<PlayerSummary>, sqlx::Error> {
        sqlx::query_as::<_, PlayerSummary>(
            "SELECT id, name, level, image FROM players ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn find_player(&self, id: i32) -> Result<Option<Player>, sqlx::Error> {
        let sql = format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS);
        sqlx::query_as::<_, Player>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_player(
        &self,
        creator_id: i32,
        payload: &PlayerPayload,
    ) -> Result<Player, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO players (user_id, name, level, image, description, stats, skills,
                                 equipment, equipment_inventory, inventory)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        );
        sqlx::query_as::<_, Player>(&sql)
            .bind(creator_id)
            .bind(&payload.name)
            .bind(payload.level)
            .bind(&payload.image)
            .bind(&payload.description)
            .bind(&payload.stats)
            .bind(&payload.skills)
            .bind(&payload.equipment)
            .bind(&payload.equipment_inventory)
            .bind(&payload.inventory)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_player(
        &self,
        id: i32,
        payload: &PlayerPayload,
    ) -> Result<Option<Player>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE players
            SET name = $1,
                level = $2,
                image = $3,
                description = $4,
                stats = $5,
                skills = $6,
                equipment = $7,
                equipment_inventory = $8,
                inventory = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        );
        sqlx::query_as::<_, Player>(&sql)
            .bind(&payload.name)
            .bind(payload.level)
            .bind(&payload.image)
            .bind(&payload.description)
            .bind(&payload.stats)
            .bind(&payload.skills)
            .bind(&payload.equipment)
            .bind(&payload.equipment_inventory)
            .bind(&payload.inventory)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_monsters(&self) -> Result<Vec<Monster>, sqlx::Error> {
        sqlx::query_as::<_, Monster>(
            "SELECT id, name, image, stats, skills FROM monsters ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn create_monster(&self, payload: &CreateMonster) -> Result<Monster, sqlx::Error> {
        sqlx::query_as::<_, Monster>(
            r#"
            INSERT INTO monsters (name, image, stats, skills)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, image, stats, skills
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.image)
        .bind(&payload.stats)
        .bind(&payload.skills)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name, category, skill_type, damage_formula, buff_effect,
                   debuff_effect, description, skill_for
            FROM skills
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn create_skill(&self, payload: &CreateSkill) -> Result<Skill, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (name, category, skill_type, damage_formula, buff_effect,
                                debuff_effect, description, skill_for)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, category, skill_type, damage_formula, buff_effect,
                      debuff_effect, description, skill_for
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.category)
        .bind(&payload.skill_type)
        .bind(&payload.damage_formula)
        .bind(&payload.buff_effect)
        .bind(&payload.debuff_effect)
        .bind(&payload.description)
        .bind(&payload.skill_for)
        .fetch_one(&self.pool)
        .await
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::sync::Mutex;

    /// In-memory store used by the HTTP tests
    #[derive(Default)]
    pub struct InMemoryCharacterStore {
        players: Mutex<Vec<Player>>,
        monsters: Mutex<Vec<Monster>>,
        skills: Mutex<Vec<Skill>>,
    }

    impl InMemoryCharacterStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn player_count(&self) -> usize {
            self.players.lock().unwrap().len()
        }
    }

    fn replace_fields(player: &mut Player, payload: &PlayerPayload) {
        player.name = payload.name.clone();
        player.level = payload.level;
        player.image = payload.image.clone();
        player.description = payload.description.clone();
        player.stats = payload.stats.clone();
        player.skills = payload.skills.clone();
        player.equipment = payload.equipment.clone();
        player.equipment_inventory = payload.equipment_inventory.clone();
        player.inventory = payload.inventory.clone();
    }

    #[async_trait]
    impl CharacterStore for InMemoryCharacterStore {
        async fn list_players(&self) -> Result<Vec<PlayerSummary>, sqlx::Error> {
            let players = self.players.lock().unwrap();
            Ok(players
                .iter()
                .map(|p| PlayerSummary {
                    id: p.id,
                    name: p.name.clone(),
                    level: p.level,
                    image: p.image.clone(),
                })
                .collect())
        }

        async fn find_player(&self, id: i32) -> Result<Option<Player>, sqlx::Error> {
            let players = self.players.lock().unwrap();
            Ok(players.iter().find(|p| p.id == id).cloned())
        }

        async fn create_player(
            &self,
            creator_id: i32,
            payload: &PlayerPayload,
        ) -> Result<Player, sqlx::Error> {
            let mut players = self.players.lock().unwrap();
            let player = Player {
                id: players.len() as i32 + 1,
                user_id: Some(creator_id),
                name: payload.name.clone(),
                level: payload.level,
                image: payload.image.clone(),
                description: payload.description.clone(),
                stats: payload.stats.clone(),
                skills: payload.skills.clone(),
                equipment: payload.equipment.clone(),
                equipment_inventory: payload.equipment_inventory.clone(),
                inventory: payload.inventory.clone(),
            };
            players.push(player.clone());
            Ok(player)
        }

        async fn update_player(
            &self,
            id: i32,
            payload: &PlayerPayload,
        ) -> Result<Option<Player>, sqlx::Error> {
            let mut players = self.players.lock().unwrap();
            Ok(players.iter_mut().find(|p| p.id == id).map(|player| {
                replace_fields(player, payload);
                player.clone()
            }))
        }

        async fn list_monsters(&self) -> Result<Vec<Monster>, sqlx::Error> {
            Ok(self.monsters.lock().unwrap().clone())
        }

        async fn create_monster(&self, payload: &CreateMonster) -> Result<Monster, sqlx::Error> {
            let mut monsters = self.monsters.lock().unwrap();
            let monster = Monster {
                id: monsters.len() as i32 + 1,
                name: payload.name.clone(),
                image: payload.image.clone(),
                stats: payload.stats.clone(),
                skills: payload.skills.clone(),
            };
            monsters.push(monster.clone());
            Ok(monster)
        }

        async fn list_skills(&self) -> Result<Vec<Skill>, sqlx::Error> {
            Ok(self.skills.lock().unwrap().clone())
        }

        async fn create_skill(&self, payload: &CreateSkill) -> Result<Skill, sqlx::Error> {
            let mut skills = self.skills.lock().unwrap();
            let skill = Skill {
                id: skills.len() as i32 + 1,
                name: payload.name.clone(),
                category: payload.category.clone(),
                skill_type: payload.skill_type.clone(),
                damage_formula: payload.damage_formula.clone(),
                buff_effect: payload.buff_effect.clone(),
                debuff_effect: payload.debuff_effect.clone(),
                description: payload.description.clone(),
                skill_for: payload.skill_for.clone(),
            };
            skills.push(skill.clone());
            Ok(skill)
        }
    }
}
