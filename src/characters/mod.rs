// Player, monster and skill records behind the login wall

pub mod handlers;
pub mod models;
pub mod repository;

pub use repository::{CharacterRepository, CharacterStore};
