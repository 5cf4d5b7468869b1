pub mod feed;
pub mod rest;
pub mod stream;

pub use feed::{MarketFeed, QuoteEntry, QuoteSource};
pub use rest::SnapshotClient;
pub use stream::{ConnectionStatus, PriceStream};
