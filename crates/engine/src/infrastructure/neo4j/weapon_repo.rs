//! Neo4j weapon repository implementation.
//!
//! Weapons are `:Weapon` nodes keyed by `name`, with the opaque stat
//! payload stored as a JSON string in the `stats` property.
//!
//! Search strategy (documented contract): case-insensitive substring
//! containment against `name`, not a tokenized text index. `"mav"` matches
//! `"AGM-65 Maverick"`; whole-word stemming does not apply.

use async_trait::async_trait;
use neo4rs::{query, Graph, Query};

use super::helpers::{is_unique_violation, is_unique_violation_msg, row_to_weapon};
use crate::infrastructure::ports::{RepoError, WeaponRepo};
use ordnance_domain::{Category, Weapon, WeaponPatch};

pub struct Neo4jWeaponRepo {
    graph: Graph,
}

impl Neo4jWeaponRepo {
    /// The graph handle is cheaply cloneable and safe for concurrent use;
    /// no lock is held across a store call.
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    async fn collect(&self, q: Query, operation: &'static str) -> Result<Vec<Weapon>, RepoError> {
        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database(operation, e))?;

        let mut weapons = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| RepoError::database(operation, e))?
        {
            weapons.push(row_to_weapon(row)?);
        }

        Ok(weapons)
    }

    async fn count_scalar(&self, q: Query, operation: &'static str) -> Result<i64, RepoError> {
        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database(operation, e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database(operation, e))?
        {
            Some(row) => row
                .get("n")
                .map_err(|e| RepoError::database(operation, e)),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl WeaponRepo for Neo4jWeaponRepo {
    async fn list(&self) -> Result<Vec<Weapon>, RepoError> {
        let q = query(
            "MATCH (w:Weapon)
            WHERE w.name IS NOT NULL
            RETURN w
            ORDER BY w.name",
        );

        let weapons = self.collect(q, "list").await?;
        if weapons.is_empty() {
            return Err(RepoError::not_found("collection", "weapons"));
        }

        Ok(weapons)
    }

    async fn get_by_name(&self, name: &str) -> Result<Weapon, RepoError> {
        let q = query("MATCH (w:Weapon {name: $name}) RETURN w").param("name", name.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("get_by_name", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("get_by_name", e))?
        {
            Some(row) => row_to_weapon(row),
            None => Err(RepoError::not_found("weapon", name)),
        }
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Weapon>, RepoError> {
        let q = query(
            "MATCH (w:Weapon {category: $category})
            RETURN w
            ORDER BY w.name",
        )
        .param("category", category.to_string());

        let weapons = self.collect(q, "list_by_category").await?;
        if weapons.is_empty() {
            return Err(RepoError::not_found("category", category));
        }

        Ok(weapons)
    }

    async fn insert(&self, weapon: &Weapon) -> Result<(), RepoError> {
        // Existence pre-check. Not atomic with the write below; the
        // uniqueness constraint on name is the backstop.
        let count_q = query("MATCH (w:Weapon {name: $name}) RETURN count(w) AS n")
            .param("name", weapon.name.clone());
        if self.count_scalar(count_q, "insert").await? != 0 {
            return Err(RepoError::already_exists(&weapon.name));
        }

        let stats = serde_json::to_string(&weapon.stats)
            .map_err(|e| RepoError::Serialization(e.to_string()))?;

        let q = query("CREATE (w:Weapon {name: $name, category: $category, stats: $stats})")
            .param("name", weapon.name.clone())
            .param("category", weapon.category.clone())
            .param("stats", stats);

        self.graph.run(q).await.map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::already_exists(&weapon.name)
            } else {
                RepoError::database("insert", e)
            }
        })?;

        tracing::debug!(name = %weapon.name, "inserted weapon");
        Ok(())
    }

    async fn update(&self, name: &str, patch: &WeaponPatch) -> Result<(), RepoError> {
        // Read-modify-write: stat keys merge individually, which a blanket
        // SET on the JSON payload cannot express in Cypher. The read also
        // distinguishes an unmatched name from a matched-but-unchanged one.
        let mut weapon = self.get_by_name(name).await?;
        patch.apply(&mut weapon);

        let stats = serde_json::to_string(&weapon.stats)
            .map_err(|e| RepoError::Serialization(e.to_string()))?;

        let q = query(
            "MATCH (w:Weapon {name: $name})
            SET w.name = $new_name, w.category = $category, w.stats = $stats
            RETURN count(w) AS n",
        )
        .param("name", name.to_string())
        .param("new_name", weapon.name.clone())
        .param("category", weapon.category.clone())
        .param("stats", stats);

        let matched = self.count_scalar(q, "update").await.map_err(|e| {
            match e {
                // Renaming onto an existing name trips the constraint.
                RepoError::Database { message, .. } if is_unique_violation_msg(&message) => {
                    RepoError::already_exists(&weapon.name)
                }
                other => other,
            }
        })?;

        if matched == 0 {
            return Err(RepoError::not_found("weapon", name));
        }

        tracing::debug!(name = %name, "updated weapon");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), RepoError> {
        let q = query(
            "MATCH (w:Weapon {name: $name})
            DETACH DELETE w
            RETURN count(w) AS n",
        )
        .param("name", name.to_string());

        let deleted = self.count_scalar(q, "delete").await?;
        if deleted == 0 {
            return Err(RepoError::not_found("weapon", name));
        }

        tracing::debug!(name = %name, "deleted weapon");
        Ok(())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Weapon>, RepoError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(RepoError::validation("search keyword must not be empty"));
        }

        let q = query(
            "MATCH (w:Weapon)
            WHERE toLower(w.name) CONTAINS toLower($keyword)
            RETURN w
            ORDER BY w.name",
        )
        .param("keyword", keyword.to_string());

        let weapons = self.collect(q, "search").await?;
        if weapons.is_empty() {
            return Err(RepoError::not_found("search", keyword));
        }

        Ok(weapons)
    }

    async fn distinct_categories(&self) -> Result<Vec<Category>, RepoError> {
        let q = query(
            "MATCH (w:Weapon)
            WHERE w.category IS NOT NULL AND w.category <> ''
            RETURN DISTINCT w.category AS name
            ORDER BY name",
        );

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("distinct_categories", e))?;

        let mut categories = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| RepoError::database("distinct_categories", e))?
        {
            let name: String = row
                .get("name")
                .map_err(|e| RepoError::database("distinct_categories", e))?;
            categories.push(Category::new(name));
        }

        Ok(categories)
    }
}
