// HTTP handlers for player, monster and skill endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::{AuthenticatedUser, Role};
use crate::characters::{
    models::{CreateMonster, CreateSkill, Monster, Player, PlayerPayload, PlayerSummary, Skill},
    repository::CharacterStore,
};
use crate::error::ApiError;

/// Handler for GET /api/players
#[utoipa::path(
    get,
    path = "/api/players",
    responses(
        (status = 200, description = "Player roster", body = Vec<PlayerSummary>),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token")
    ),
    security(("bearer_auth" = [])),
    tag = "players"
)]
pub async fn list_players(
    State(repo): State<Arc<dyn CharacterStore>>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<PlayerSummary>>, ApiError> {
    let players = repo.list_players().await?;
    tracing::debug!("Retrieved {} players", players.len());
    Ok(Json(players))
}

/// Handler for GET /api/players/:id
#[utoipa::path(
    get,
    path = "/api/players/{id}",
    params(("id" = i32, Path, description = "Player ID")),
    responses(
        (status = 200, description = "Player found", body = Player),
        (status = 404, description = "Player not found")
    ),
    security(("bearer_auth" = [])),
    tag = "players"
)]
pub async fn get_player(
    State(repo): State<Arc<dyn CharacterStore>>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Player>, ApiError> {
    let player = repo.find_player(id).await?.ok_or_else(|| ApiError::NotFound {
        resource: "Player".to_string(),
        id: id.to_string(),
    })?;
    Ok(Json(player))
}

/// Handler for POST /api/players
/// Admin only; the role check runs before the body is parsed or the database touched
#[utoipa::path(
    post,
    path = "/api/players",
    request_body = PlayerPayload,
    responses(
        (status = 201, description = "Player created", body = Player),
        (status = 400, description = "Invalid input data"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "players"
)]
pub async fn create_player(
    State(repo): State<Arc<dyn CharacterStore>>,
    user: AuthenticatedUser,
    payload: Result<Json<PlayerPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    user.require_role(Role::Admin, "Only admins can create new characters.")?;
    let Json(payload) = payload?;
    payload.validate()?;

    let player = repo.create_player(user.user_id, &payload).await?;

    tracing::info!("User {} created player {}", user.user_id, player.id);
    Ok((StatusCode::CREATED, Json(player)))
}

/// Handler for PUT /api/players/:id
#[utoipa::path(
    put,
    path = "/api/players/{id}",
    params(("id" = i32, Path, description = "Player ID")),
    request_body = PlayerPayload,
    responses(
        (status = 200, description = "Player updated", body = Player),
        (status = 400, description = "Invalid input data"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Player not found")
    ),
    security(("bearer_auth" = [])),
    tag = "players"
)]
pub async fn update_player(
    State(repo): State<Arc<dyn CharacterStore>>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    payload: Result<Json<PlayerPayload>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    user.require_role(Role::Admin, "Only admins can update characters.")?;
    let Json(payload) = payload?;
    payload.validate()?;

    let player = repo
        .update_player(id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Player".to_string(),
            id: id.to_string(),
        })?;

    tracing::info!("User {} updated player {}", user.user_id, id);
    Ok(Json(player))
}

/// Handler for GET /api/monsters
#[utoipa::path(
    get,
    path = "/api/monsters",
    responses((status = 200, description = "All monsters", body = Vec<Monster>)),
    security(("bearer_auth" = [])),
    tag = "monsters"
)]
pub async fn list_monsters(
    State(repo): State<Arc<dyn CharacterStore>>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Monster>>, ApiError> {
    Ok(Json(repo.list_monsters().await?))
}

/// Handler for POST /api/monsters
#[utoipa::path(
    post,
    path = "/api/monsters",
    request_body = CreateMonster,
    responses(
        (status = 201, description = "Monster created", body = Monster),
        (status = 400, description = "Invalid input data")
    ),
    security(("bearer_auth" = [])),
    tag = "monsters"
)]
pub async fn create_monster(
    State(repo): State<Arc<dyn CharacterStore>>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateMonster>, JsonRejection>,
) -> Result<(StatusCode, Json<Monster>), ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let monster = repo.create_monster(&payload).await?;

    tracing::info!("User {} created monster {}", user.user_id, monster.id);
    Ok((StatusCode::CREATED, Json(monster)))
}

/// Handler for GET /api/skills
#[utoipa::path(
    get,
    path = "/api/skills",
    responses((status = 200, description = "All skills", body = Vec<Skill>)),
    security(("bearer_auth" = [])),
    tag = "skills"
)]
pub async fn list_skills(
    State(repo): State<Arc<dyn CharacterStore>>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Skill>>, ApiError> {
    Ok(Json(repo.list_skills().await?))
}

/// Handler for POST /api/skills
#[utoipa::path(
    post,
    path = "/api/skills",
    request_body = CreateSkill,
    responses(
        (status = 201, description = "Skill created", body = Skill),
        (status = 400, description = "Invalid input data")
    ),
    security(("bearer_auth" = [])),
    tag = "skills"
)]
pub async fn create_skill(
    State(repo): State<Arc<dyn CharacterStore>>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateSkill>, JsonRejection>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let skill = repo.create_skill(&payload).await?;

    tracing::info!("User {} created skill {}", user.user_id, skill.id);
    Ok((StatusCode::CREATED, Json(skill)))
}
