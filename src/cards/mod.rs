//! Card system: definitions, catalog, and hands.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `Element`: Fire, water, snow and the cycle between them
//! - `Card`: A card resolved against the catalog
//! - `CardCatalog`: Read-only lookup service shared by all sessions
//! - `CardRegistry`: In-memory catalog
//! - `Hand`: A participant's draw pile, dealt cards and pick

pub mod definition;
pub mod hand;
pub mod registry;

pub use definition::{Card, CardId, CardStats, Element};
pub use hand::Hand;
pub use registry::{CardCatalog, CardRegistry, CatalogError};
