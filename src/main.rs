mod auth;
mod characters;
mod config;
mod db;
mod error;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing_subscriber::EnvFilter;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, TokenService, UserRepository};
use characters::{CharacterRepository, CharacterStore};
use config::AppConfig;
use error::StartupError;

/// Character images arrive as data URLs
const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::me_handler,
        characters::handlers::list_players,
        characters::handlers::get_player,
        characters::handlers::create_player,
        characters::handlers::update_player,
        characters::handlers::list_monsters,
        characters::handlers::create_monster,
        characters::handlers::list_skills,
        characters::handlers::create_skill,
    ),
    components(schemas(
        auth::models::Role,
        auth::models::RegisterRequest,
        auth::models::LoginRequest,
        auth::models::LoginResponse,
        auth::models::MessageResponse,
        auth::models::SessionResponse,
        characters::models::PlayerSummary,
        characters::models::Player,
        characters::models::PlayerPayload,
        characters::models::Monster,
        characters::models::CreateMonster,
        characters::models::Skill,
        characters::models::CreateSkill,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and session endpoints"),
        (name = "players", description = "Player characters"),
        (name = "monsters", description = "Monster roster"),
        (name = "skills", description = "Skill library")
    ),
    info(
        title = "Character Vault API",
        version = "0.1.0",
        description = "Players, monsters and skills behind a login wall"
    )
)]
struct ApiDoc;

/// Registers the bearer token scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub characters: Arc<dyn CharacterStore>,
}

impl AppState {
    /// Wire the services from a pool and the loaded configuration
    pub fn new(db: PgPool, config: &AppConfig) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth.jwt_secret));
        let users = Arc::new(UserRepository::new(db.clone()));
        let auth = Arc::new(AuthService::new(
            users,
            tokens.clone(),
            config.auth.bootstrap_admin.clone(),
        ));

        Self {
            auth,
            tokens,
            characters: Arc::new(CharacterRepository::new(db)),
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<dyn CharacterStore> {
    fn from_ref(state: &AppState) -> Self {
        state.characters.clone()
    }
}

/// API routes without docs or static files
fn api_routes() -> Router<AppState> {
    use auth::handlers::{login_handler, me_handler, register_handler};
    use characters::handlers::{
        create_monster, create_player, create_skill, get_player, list_monsters, list_players,
        list_skills, update_player,
    };

    Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        .route("/api/players", get(list_players).post(create_player))
        .route("/api/players/:id", get(get_player).put(update_player))
        .route("/api/monsters", get(list_monsters).post(create_monster))
        .route("/api/skills", get(list_skills).post(create_skill))
}

/// Creates and configures the application router
/// Maps API endpoints, Swagger UI and the static pages, plus CORS and body limits
fn create_router(state: AppState, static_dir: &str) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes())
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT)),
        )
        .with_state(state)
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    let state = AppState::new(db_pool, &config);

    if let Some(seed) = &config.auth.admin_seed {
        state.auth.seed_admin(seed).await?;
    }

    let app = create_router(state, &config.server.static_dir);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Character Vault is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Character Vault API - Starting...");

    let result = match AppConfig::from_env() {
        Ok(config) => run(config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Fatal: {}", e);
        std::process::exit(1);
    }
}
