//! Neo4j deserialization helpers for row conversion.

use neo4rs::{Node, Row};
use serde_json::Map;

use crate::infrastructure::ports::RepoError;
use ordnance_domain::Weapon;

/// Convert a row carrying a `w:Weapon` node into a [`Weapon`].
///
/// The stat payload lives in the `stats` property as a JSON string; a
/// missing or empty property decodes to an empty map.
pub fn row_to_weapon(row: Row) -> Result<Weapon, RepoError> {
    let node: Node = row.get("w").map_err(|e| RepoError::database("query", e))?;

    let name: String = node
        .get("name")
        .map_err(|e| RepoError::database("query", e))?;
    let category: String = node.get("category").unwrap_or_default();

    let stats = match node.get::<String>("stats") {
        Ok(json) if !json.is_empty() => {
            serde_json::from_str(&json).map_err(|e| RepoError::Serialization(e.to_string()))?
        }
        _ => Map::new(),
    };

    Ok(Weapon {
        name,
        category,
        stats,
    })
}

/// Whether a driver error is the uniqueness constraint on `Weapon.name`
/// firing. Two concurrent inserts of the same name can both pass the
/// existence pre-check; the constraint is the backstop and must surface
/// as `AlreadyExists`, not as a generic database error.
pub fn is_unique_violation(err: &neo4rs::Error) -> bool {
    is_unique_violation_msg(&err.to_string())
}

/// Message-level classification behind [`is_unique_violation`]. The server
/// reports the violation as a `ConstraintValidationFailed` status; some
/// driver paths only carry the rendered "already exists" message text.
pub fn is_unique_violation_msg(text: &str) -> bool {
    text.contains("ConstraintValidationFailed") || text.contains("already exists")
}
