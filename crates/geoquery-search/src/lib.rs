mod client;
mod error;
mod payload;
mod tiles;

pub use client::GeosearchClient;
pub use error::SearchError;
pub use payload::{BboxFilter, SearchPayload};
pub use tiles::{aggregate_tile, aggregate_tiles, TileHit, TileSet};
