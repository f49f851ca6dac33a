//! Services for fetching, aggregation, state, and persistence

pub mod aggregator;
pub mod fetcher;
pub mod refresher;
pub mod sample;
pub mod state;
pub mod store;

pub use aggregator::Aggregator;
pub use fetcher::SourceFetcher;
pub use refresher::AppContext;
pub use state::MarketState;
pub use store::{ListingStore, StoreLookup};
