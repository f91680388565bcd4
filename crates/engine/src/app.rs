//! Application wiring: explicitly injected store dependencies.
//!
//! Store clients are constructed in `main` and passed in; nothing here is
//! ambient global state. `categories` is optional: without the relational
//! store, `/categories` is served from the document collection instead.

use std::sync::Arc;

use crate::infrastructure::ports::{CategoryReader, WeaponRepo};

pub struct App {
    pub weapons: Arc<dyn WeaponRepo>,
    pub categories: Option<Arc<dyn CategoryReader>>,
}

impl App {
    pub fn new(weapons: Arc<dyn WeaponRepo>, categories: Option<Arc<dyn CategoryReader>>) -> Self {
        Self {
            weapons,
            categories,
        }
    }
}
