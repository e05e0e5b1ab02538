//! Collectibles catalog: coins and banknotes grouped into collections
//!
//! Each stored entity has a client-facing resource, a free-text search and
//! a registered sort-key mapping. [`catalog_mappings`] builds the table the
//! server shares across handlers.

pub mod banknote;
pub mod coin;
pub mod collection;
pub mod mappings;

pub use banknote::{Banknote, BanknoteDto, BanknoteSpecs};
pub use coin::{Coin, CoinDto, CoinSpecs};
pub use collection::{Collection, CollectionDto, CollectionSpecs};
pub use mappings::catalog_mappings;
