//! Neo4j schema initialization - constraints and indexes.

use neo4rs::{query, Graph};

/// Initialize Neo4j schema with required constraints.
///
/// This should be called once on startup. The uniqueness constraint on
/// `Weapon.name` is the backstop for the non-atomic check-then-insert in
/// the repository. Created with IF NOT EXISTS to be idempotent.
pub async fn ensure_schema(graph: &Graph) -> Result<(), neo4rs::Error> {
    graph
        .run(query(
            "CREATE CONSTRAINT weapon_name_unique IF NOT EXISTS
             FOR (w:Weapon) REQUIRE w.name IS UNIQUE",
        ))
        .await?;

    tracing::info!("Neo4j schema initialized (weapon name uniqueness ensured)");
    Ok(())
}
