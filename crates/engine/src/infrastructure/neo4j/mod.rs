//! Neo4j adapter for the weapon document store.

mod helpers;
mod schema;
mod weapon_repo;

pub use schema::ensure_schema;
pub use weapon_repo::Neo4jWeaponRepo;
