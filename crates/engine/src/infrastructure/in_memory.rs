//! In-memory port implementations.
//!
//! These back the handler and contract tests; they implement the exact
//! port semantics (empty-result-is-NotFound, check-then-insert, merge
//! patch) without a running store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CategoryReader, RepoError, WeaponRepo};
use ordnance_domain::{Category, Weapon, WeaponPatch};

pub struct InMemoryWeaponRepo {
    weapons: RwLock<Vec<Weapon>>,
}

impl InMemoryWeaponRepo {
    pub fn new() -> Self {
        Self {
            weapons: RwLock::new(Vec::new()),
        }
    }

    pub fn with_weapons(weapons: Vec<Weapon>) -> Self {
        Self {
            weapons: RwLock::new(weapons),
        }
    }
}

impl Default for InMemoryWeaponRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeaponRepo for InMemoryWeaponRepo {
    async fn list(&self) -> Result<Vec<Weapon>, RepoError> {
        let weapons = self.weapons.read().await;
        if weapons.is_empty() {
            return Err(RepoError::not_found("collection", "weapons"));
        }
        Ok(weapons.clone())
    }

    async fn get_by_name(&self, name: &str) -> Result<Weapon, RepoError> {
        self.weapons
            .read()
            .await
            .iter()
            .find(|w| w.name == name)
            .cloned()
            .ok_or_else(|| RepoError::not_found("weapon", name))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Weapon>, RepoError> {
        let matches: Vec<Weapon> = self
            .weapons
            .read()
            .await
            .iter()
            .filter(|w| w.category == category)
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(RepoError::not_found("category", category));
        }
        Ok(matches)
    }

    async fn insert(&self, weapon: &Weapon) -> Result<(), RepoError> {
        let mut weapons = self.weapons.write().await;
        if weapons.iter().any(|w| w.name == weapon.name) {
            return Err(RepoError::already_exists(&weapon.name));
        }
        weapons.push(weapon.clone());
        Ok(())
    }

    async fn update(&self, name: &str, patch: &WeaponPatch) -> Result<(), RepoError> {
        let mut weapons = self.weapons.write().await;
        let index = weapons
            .iter()
            .position(|w| w.name == name)
            .ok_or_else(|| RepoError::not_found("weapon", name))?;

        // A rename onto another record's name would leave two entries with
        // the same identity key; the uniqueness backstop rejects it.
        if let Some(new_name) = &patch.name {
            if new_name != name && weapons.iter().any(|w| w.name == *new_name) {
                return Err(RepoError::already_exists(new_name));
            }
        }

        patch.apply(&mut weapons[index]);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), RepoError> {
        let mut weapons = self.weapons.write().await;
        let before = weapons.len();
        weapons.retain(|w| w.name != name);

        if weapons.len() == before {
            return Err(RepoError::not_found("weapon", name));
        }
        Ok(())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Weapon>, RepoError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(RepoError::validation("search keyword must not be empty"));
        }

        let needle = keyword.to_lowercase();
        let matches: Vec<Weapon> = self
            .weapons
            .read()
            .await
            .iter()
            .filter(|w| w.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(RepoError::not_found("search", keyword));
        }
        Ok(matches)
    }

    async fn distinct_categories(&self) -> Result<Vec<Category>, RepoError> {
        let weapons = self.weapons.read().await;
        let mut names: Vec<String> = weapons
            .iter()
            .filter(|w| !w.category.is_empty())
            .map(|w| w.category.clone())
            .collect();
        names.sort();
        names.dedup();

        Ok(names.into_iter().map(Category::new).collect())
    }
}

pub struct InMemoryCategoryReader {
    categories: Vec<Category>,
}

impl InMemoryCategoryReader {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CategoryReader for InMemoryCategoryReader {
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        Ok(self.categories.clone())
    }
}
