//! Listing store — the optional write-behind mirror
//!
//! A JSON document on disk holding the persisted listing collections.
//! Reads return a typed [`StoreLookup`] instead of swallowing failures:
//! the caller sees `Unavailable` and decides to substitute the sample set.
//! Writes are best-effort; a failed save is logged by the caller and never
//! surfaces on read paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{IpoListing, MainboardStock, Result, TrackerError};

/// Outcome of a store read. `Unavailable` covers a missing file, an
/// unreadable file, and a corrupt document alike — the substitution policy
/// is the caller's, not the store's.
#[derive(Debug)]
pub enum StoreLookup<T> {
    Found(T),
    Unavailable,
}

impl<T> StoreLookup<T> {
    pub fn unwrap_or_else<F: FnOnce() -> T>(self, fallback: F) -> T {
        match self {
            StoreLookup::Found(value) => value,
            StoreLookup::Unavailable => fallback(),
        }
    }
}

/// The persisted document.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreDocument {
    pub updated_at: DateTime<Utc>,
    pub listings: Vec<IpoListing>,
    #[serde(default)]
    pub mainboard: Vec<MainboardStock>,
}

pub struct ListingStore {
    path: PathBuf,
}

impl ListingStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted document. Any failure maps to `Unavailable`.
    pub fn load(&self) -> StoreLookup<StoreDocument> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return StoreLookup::Unavailable,
        };
        match serde_json::from_str(&content) {
            Ok(doc) => StoreLookup::Found(doc),
            Err(e) => {
                log::warn!("store document corrupt at {:?}: {}", self.path, e);
                StoreLookup::Unavailable
            }
        }
    }

    /// Persist the current collections wholesale.
    pub fn save(&self, listings: &[IpoListing], mainboard: &[MainboardStock]) -> Result<()> {
        let doc = StoreDocument {
            updated_at: Utc::now(),
            listings: listings.to_vec(),
            mainboard: mainboard.to_vec(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&doc)
            .map_err(|e| TrackerError::Store(format!("serialization failed: {e}")))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Insert or replace one listing by symbol, persisting the result.
    ///
    /// Validation failures propagate (the admin route turns them into a
    /// 400); an unavailable store starts from an empty document rather
    /// than failing the insert.
    pub fn insert_listing(&self, listing: &IpoListing) -> Result<()> {
        validate_listing(listing)?;

        let mut doc = self.load().unwrap_or_else(|| StoreDocument {
            updated_at: Utc::now(),
            listings: Vec::new(),
            mainboard: Vec::new(),
        });

        upsert_by_symbol(&mut doc.listings, listing.clone());
        self.save(&doc.listings, &doc.mainboard)
    }
}

/// Replace an existing entry with the same symbol, or append.
pub fn upsert_by_symbol(listings: &mut Vec<IpoListing>, listing: IpoListing) {
    match listings
        .iter_mut()
        .find(|l| l.symbol.is_some() && l.symbol == listing.symbol)
    {
        Some(existing) => *existing = listing,
        None => listings.push(listing),
    }
}

/// Admin-write validation. Read paths never validate.
pub fn validate_listing(listing: &IpoListing) -> Result<()> {
    if listing.company_name.trim().is_empty() {
        return Err(TrackerError::Validation("companyName is required".into()));
    }
    match &listing.symbol {
        Some(s) if !s.trim().is_empty() => {}
        _ => return Err(TrackerError::Validation("symbol is required".into())),
    }
    if listing.issue_price <= 0.0 {
        return Err(TrackerError::Validation(
            "issuePrice must be positive".into(),
        ));
    }
    if listing.price_range_min > listing.price_range_max {
        return Err(TrackerError::Validation(
            "priceRangeMin exceeds priceRangeMax".into(),
        ));
    }
    Ok(())
}
