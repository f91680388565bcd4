//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Ports exist for:
//! - The weapon document store (could swap Neo4j -> another document store)
//! - The relational category list (read-only external collaborator)

mod error;

pub use error::RepoError;

use async_trait::async_trait;
use ordnance_domain::{Category, Weapon, WeaponPatch};

/// Access to the weapon document store.
///
/// Empty-result policy: `list`, `list_by_category`, and `search` surface an
/// empty result set as [`RepoError::NotFound`], never as an empty success.
/// This keeps the API boundary free of null-vs-empty ambiguity and matches
/// the behavior every handler depends on.
#[async_trait]
pub trait WeaponRepo: Send + Sync {
    /// All weapons, unfiltered. Records without a name are never returned.
    async fn list(&self) -> Result<Vec<Weapon>, RepoError>;

    /// Exact, case-sensitive match on the identity key.
    async fn get_by_name(&self, name: &str) -> Result<Weapon, RepoError>;

    /// Exact match on the stored `category` field. The code is not
    /// validated against the registry.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Weapon>, RepoError>;

    /// Check-then-insert keyed on `name`. The existence pre-check is not
    /// atomic with the write; the store's uniqueness constraint is the
    /// backstop, and a constraint-violation write also surfaces as
    /// [`RepoError::AlreadyExists`].
    async fn insert(&self, weapon: &Weapon) -> Result<(), RepoError>;

    /// Merge-patch onto the record matched by `name`. A zero matched-count
    /// is [`RepoError::NotFound`]; matched-but-unchanged is success. A
    /// rename onto another record's name is [`RepoError::AlreadyExists`],
    /// preserving at most one record per name.
    async fn update(&self, name: &str, patch: &WeaponPatch) -> Result<(), RepoError>;

    /// Remove the record matched by `name`. A zero deleted-count is
    /// [`RepoError::NotFound`].
    async fn delete(&self, name: &str) -> Result<(), RepoError>;

    /// Case-insensitive substring containment match against `name`.
    /// An empty keyword is rejected with [`RepoError::Validation`] before
    /// any store call.
    async fn search(&self, keyword: &str) -> Result<Vec<Weapon>, RepoError>;

    /// Distinct non-null `category` values across the collection. Serves
    /// `/categories` in the single-store deployment.
    async fn distinct_categories(&self) -> Result<Vec<Category>, RepoError>;
}

/// Read-only accessor for the relational store's category list.
///
/// Opaque upstream dependency: failures surface to the caller, nothing is
/// retried or cached here.
#[async_trait]
pub trait CategoryReader: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError>;
}
