//! Infrastructure: store adapters behind the port traits.

pub mod categories;
pub mod in_memory;
pub mod neo4j;
pub mod ports;
