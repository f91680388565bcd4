//! Category taxonomy: codes, presentation variants, and the static registry.
//!
//! Historically this was a method-per-case dispatch; it is now a single
//! lookup table. Adding a category means adding one row to
//! [`CATEGORY_TABLE`].
//!
//! Canonical key format: lowercase, hyphen-separated codes
//! (`ir-all-aspect`, not `IrAllAspect` or `ir_all_aspect`).

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A taxonomy entry as served by `/categories`.
///
/// Sourced from the relational store (or distinct over the document
/// collection); independent of the registry below and not guaranteed to
/// stay in sync with stored `category` field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Which presentation template applies to a category's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RendererTag {
    IrMissile,
    RadarMissile,
    CommandGuided,
    GuidedBomb,
    AntiShip,
}

/// Static association between a category code and its presentation variant.
/// Fixed at build time; no runtime mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryVariant {
    pub code: &'static str,
    pub renderer: RendererTag,
}

/// The closed set of guidance-family codes known to the catalog.
pub const CATEGORY_TABLE: &[CategoryVariant] = &[
    CategoryVariant { code: "ir-all-aspect", renderer: RendererTag::IrMissile },
    CategoryVariant { code: "ir-rear-aspect", renderer: RendererTag::IrMissile },
    CategoryVariant { code: "ir-helicopter", renderer: RendererTag::IrMissile },
    CategoryVariant { code: "sarh", renderer: RendererTag::RadarMissile },
    CategoryVariant { code: "arh", renderer: RendererTag::RadarMissile },
    CategoryVariant { code: "mclos", renderer: RendererTag::CommandGuided },
    CategoryVariant { code: "saclos", renderer: RendererTag::CommandGuided },
    CategoryVariant { code: "laser-guided", renderer: RendererTag::CommandGuided },
    CategoryVariant { code: "beam-riding", renderer: RendererTag::CommandGuided },
    CategoryVariant { code: "guided-bomb", renderer: RendererTag::GuidedBomb },
    CategoryVariant { code: "anti-ship", renderer: RendererTag::AntiShip },
];

/// Resolve a category code to its presentation variant.
///
/// Pure, deterministic, constant time. Unknown codes resolve to `None`;
/// callers must treat that as "no content", not as an error.
pub fn resolve(code: &str) -> Option<CategoryVariant> {
    static INDEX: OnceLock<HashMap<&'static str, CategoryVariant>> = OnceLock::new();
    INDEX
        .get_or_init(|| CATEGORY_TABLE.iter().map(|v| (v.code, *v)).collect())
        .get(code)
        .copied()
}
