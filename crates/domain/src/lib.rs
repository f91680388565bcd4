//! Pure domain types for the Ordnance catalog. No I/O lives here.

mod category;
mod weapon;

pub use category::{resolve, Category, CategoryVariant, RendererTag, CATEGORY_TABLE};
pub use weapon::{Weapon, WeaponPatch};
