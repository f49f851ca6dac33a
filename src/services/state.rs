//! Process-wide market state
//!
//! The current collections live in an immutable snapshot behind
//! `RwLock<Arc<...>>`. A refresh builds a complete new snapshot and swaps
//! the Arc, so readers always observe a whole generation — never a
//! mid-replacement mix of old and new entries. Queries clone the Arc and
//! run lock-free on their copy.

use chrono::{DateTime, Utc};
use log::warn;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::types::{GmpRecord, GmpView, IpoListing, IpoStatus, MainboardStock, SearchResults};

/// One immutable generation of the market data.
#[derive(Debug, Default, Clone)]
pub struct MarketSnapshot {
    pub ipos: Vec<IpoListing>,
    pub mainboard: Vec<MainboardStock>,
    pub gmp: HashMap<String, GmpRecord>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    pub fn is_empty(&self) -> bool {
        self.ipos.is_empty() && self.mainboard.is_empty() && self.gmp.is_empty()
    }

    /// All listings, optionally filtered by status equality.
    pub fn listings(&self, status: Option<IpoStatus>) -> Vec<IpoListing> {
        match status {
            Some(wanted) => self
                .ipos
                .iter()
                .filter(|i| i.status == wanted)
                .cloned()
                .collect(),
            None => self.ipos.clone(),
        }
    }

    /// Exact symbol match. Absence is a first-class outcome.
    pub fn by_symbol(&self, symbol: &str) -> Option<&IpoListing> {
        self.ipos
            .iter()
            .find(|i| i.symbol.as_deref() == Some(symbol))
    }

    /// Case-sensitive substring search over company names and symbols of
    /// both collections. The `sme` set is reserved for a listing type the
    /// pipeline never populates and is always empty.
    pub fn search(&self, query: &str) -> SearchResults {
        let ipos = self
            .ipos
            .iter()
            .filter(|i| {
                i.company_name.contains(query)
                    || i.symbol.as_deref().is_some_and(|s| s.contains(query))
            })
            .cloned()
            .collect();
        let mainboard = self
            .mainboard
            .iter()
            .filter(|s| s.company_name.contains(query) || s.symbol.contains(query))
            .cloned()
            .collect();
        SearchResults {
            ipos,
            mainboard,
            sme: Vec::new(),
        }
    }

    /// Per-listing GMP projections.
    pub fn gmp_views(&self) -> Vec<GmpView> {
        self.ipos.iter().map(GmpView::from_listing).collect()
    }
}

/// Single-writer state container injected into request handlers.
pub struct MarketState {
    snapshot: RwLock<Arc<MarketSnapshot>>,
}

impl MarketState {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(MarketSnapshot::default())),
        }
    }

    pub fn with_snapshot(snapshot: MarketSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Current snapshot handle. Cheap; holds the lock only for the clone.
    pub fn snapshot(&self) -> Arc<MarketSnapshot> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new generation wholesale.
    ///
    /// An empty snapshot never replaces a non-empty one: concurrent
    /// refresh cycles may race, but a cycle that produced nothing cannot
    /// wipe out data another cycle published.
    pub fn publish(&self, next: MarketSnapshot) {
        let mut guard = match self.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if next.is_empty() && !guard.is_empty() {
            warn!("refresh produced no data; keeping previous snapshot");
            return;
        }
        *guard = Arc::new(next);
    }

    /// Clone-modify-swap one listing in place (admin create path).
    /// Last write wins on symbol collisions.
    pub fn upsert_listing(&self, listing: IpoListing) {
        let mut guard = match self.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = (**guard).clone();
        super::store::upsert_by_symbol(&mut next.ipos, listing);
        *guard = Arc::new(next);
    }

    pub fn has_data(&self) -> bool {
        !self.snapshot().is_empty()
    }
}

impl Default for MarketState {
    fn default() -> Self {
        Self::new()
    }
}
