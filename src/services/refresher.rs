//! Refresh cycle and background scheduling
//!
//! A refresh is fetch -> normalize -> merge -> join -> publish. The
//! scheduler replaces the original deployment's cron pair: an hourly
//! unconditional refresh plus a 10-minute bootstrap tick that only fires
//! while the cache is still empty. Overlapping cycles are neither queued
//! nor cancelled; whichever publishes last wins.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::{Config, DataSourceMode};
use crate::services::{sample, Aggregator, ListingStore, MarketState, SourceFetcher};
use crate::services::state::MarketSnapshot;
use crate::sources::SourceDescriptor;
use crate::types::{IpoListing, MainboardStock, Result};

/// Unconditional refresh cadence
const REFRESH_INTERVAL_SECS: u64 = 3600;

/// Bootstrap cadence, active only while the cache is empty
const BOOTSTRAP_INTERVAL_SECS: u64 = 600;

/// Everything a request handler or refresh cycle needs.
pub struct AppContext {
    pub config: Config,
    pub state: MarketState,
    pub store: ListingStore,
    pub fetcher: SourceFetcher,
    pub gmp_sources: Vec<SourceDescriptor>,
    pub ipo_api_sources: Vec<SourceDescriptor>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let store = ListingStore::new(config.store_path.clone());
        Ok(Self {
            config,
            state: MarketState::new(),
            store,
            fetcher: SourceFetcher::new()?,
            gmp_sources: crate::sources::default_gmp_sources(),
            ipo_api_sources: crate::sources::default_ipo_api_sources(),
        })
    }
}

/// Run one refresh cycle and publish the resulting snapshot.
///
/// Read paths never see a failure from here: every fallback bottoms out at
/// the built-in sample set, and an all-empty result cannot displace a
/// populated cache (see `MarketState::publish`).
pub async fn refresh(ctx: &AppContext) {
    let snapshot = match ctx.config.data_source {
        DataSourceMode::Sample => sample_snapshot(),
        DataSourceMode::Store => stored_snapshot(ctx),
        DataSourceMode::Live => live_snapshot(ctx).await,
    };
    info!(
        "refresh complete: {} listings, {} gmp records",
        snapshot.ipos.len(),
        snapshot.gmp.len()
    );
    ctx.state.publish(snapshot);
}

fn sample_snapshot() -> MarketSnapshot {
    MarketSnapshot {
        ipos: sample::ipo_listings(),
        mainboard: sample::mainboard_stocks(),
        gmp: Default::default(),
        refreshed_at: Some(Utc::now()),
    }
}

/// Listings from the store when available, samples otherwise.
fn stored_collections(ctx: &AppContext) -> (Vec<IpoListing>, Vec<MainboardStock>) {
    match ctx.store.load() {
        crate::services::StoreLookup::Found(doc) => {
            let mainboard = if doc.mainboard.is_empty() {
                sample::mainboard_stocks()
            } else {
                doc.mainboard
            };
            (doc.listings, mainboard)
        }
        crate::services::StoreLookup::Unavailable => {
            (sample::ipo_listings(), sample::mainboard_stocks())
        }
    }
}

fn stored_snapshot(ctx: &AppContext) -> MarketSnapshot {
    let (ipos, mainboard) = stored_collections(ctx);
    MarketSnapshot {
        ipos,
        mainboard,
        gmp: Default::default(),
        refreshed_at: Some(Utc::now()),
    }
}

async fn live_snapshot(ctx: &AppContext) -> MarketSnapshot {
    let scraped = ctx.fetcher.fetch_gmp(&ctx.gmp_sources).await;

    // exchange calendar payloads are passed through unchanged and only
    // probed for availability; nothing joins them into listings yet
    for source in &ctx.ipo_api_sources {
        match ctx.fetcher.fetch_json(&source.url).await {
            Some(payload) => info!(
                "calendar source {} available ({} bytes decoded)",
                source.url,
                payload.to_string().len()
            ),
            None => warn!("calendar source {} unavailable", source.url),
        }
    }

    let (mut ipos, mainboard) = stored_collections(ctx);
    join_gmp(&mut ipos, &scraped);

    // a cycle where every source failed keeps the previous merge
    let gmp = if scraped.is_empty() {
        ctx.state.snapshot().gmp.clone()
    } else {
        scraped
    };

    // write-behind mirror; failures degrade to in-memory only
    if let Err(e) = ctx.store.save(&ipos, &mainboard) {
        warn!("store save failed: {e}");
    }

    MarketSnapshot {
        ipos,
        mainboard,
        gmp,
        refreshed_at: Some(Utc::now()),
    }
}

/// Overlay scraped premiums onto listings, matched by uppercase company
/// name. Listings without a scraped counterpart keep their stored values.
fn join_gmp(
    ipos: &mut [IpoListing],
    scraped: &std::collections::HashMap<String, crate::types::GmpRecord>,
) {
    for ipo in ipos.iter_mut() {
        if let Some(record) = Aggregator::lookup(scraped, &ipo.company_name.to_uppercase()) {
            ipo.gmp = record.gmp;
            ipo.gmp_percent = record.gmp_percent;
        }
    }
}

/// Background refresh loop. Never returns; spawn it.
pub async fn run_scheduler(ctx: Arc<AppContext>) {
    let hourly_period = Duration::from_secs(REFRESH_INTERVAL_SECS);
    let bootstrap_period = Duration::from_secs(BOOTSTRAP_INTERVAL_SECS);

    // first ticks land one full period out; startup already refreshed
    let mut hourly = interval_at(Instant::now() + hourly_period, hourly_period);
    let mut bootstrap = interval_at(Instant::now() + bootstrap_period, bootstrap_period);
    hourly.set_missed_tick_behavior(MissedTickBehavior::Delay);
    bootstrap.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = hourly.tick() => {
                info!("hourly refresh");
                refresh(&ctx).await;
            }
            _ = bootstrap.tick() => {
                if !ctx.state.has_data() {
                    info!("bootstrap refresh (cache empty)");
                    refresh(&ctx).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Reliability;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn context(mode: DataSourceMode, store_path: PathBuf) -> AppContext {
        AppContext::new(Config {
            port: 0,
            store_path,
            data_source: mode,
        })
        .unwrap()
    }

    fn record(identifier: &str, gmp: i64) -> crate::types::GmpRecord {
        crate::types::GmpRecord {
            identifier: identifier.to_string(),
            gmp,
            gmp_percent: gmp as f64,
            source_url: "s".to_string(),
            observed_at: Utc::now(),
            reliability: Reliability::Medium,
        }
    }

    // ========== join_gmp ==========

    #[test]
    fn test_join_gmp_overlays_matching_listing() {
        let mut ipos = sample::ipo_listings();
        let mut scraped = HashMap::new();
        scraped.insert("DHARA RAIL PROJECTS".to_string(), record("DHARA RAIL PROJECTS", 77));

        join_gmp(&mut ipos, &scraped);

        let dhara = ipos
            .iter()
            .find(|i| i.company_name == "Dhara Rail Projects")
            .unwrap();
        assert_eq!(dhara.gmp, 77);
        // unmatched listings keep their stored values
        let apollo = ipos
            .iter()
            .find(|i| i.company_name == "Apollo Techno Industries")
            .unwrap();
        assert_eq!(apollo.gmp, 12);
    }

    // ========== refresh modes ==========

    #[tokio::test]
    async fn test_refresh_sample_mode_publishes_samples() {
        let temp = TempDir::new().unwrap();
        let ctx = context(DataSourceMode::Sample, temp.path().join("s.json"));

        refresh(&ctx).await;

        let snap = ctx.state.snapshot();
        assert_eq!(snap.ipos.len(), 5);
        assert_eq!(snap.mainboard.len(), 3);
        assert!(snap.refreshed_at.is_some());
    }

    #[tokio::test]
    async fn test_refresh_store_mode_unavailable_store_falls_back() {
        let temp = TempDir::new().unwrap();
        let ctx = context(DataSourceMode::Store, temp.path().join("missing.json"));

        refresh(&ctx).await;

        // store unavailable -> sample substitution, never an error
        assert_eq!(ctx.state.snapshot().ipos.len(), 5);
    }

    #[tokio::test]
    async fn test_refresh_store_mode_prefers_persisted_listings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        let store = ListingStore::new(path.clone());
        let mut listings = sample::ipo_listings();
        listings.truncate(2);
        store.save(&listings, &[]).unwrap();

        let ctx = context(DataSourceMode::Store, path);
        refresh(&ctx).await;

        let snap = ctx.state.snapshot();
        assert_eq!(snap.ipos.len(), 2);
        // empty persisted mainboard falls back to samples
        assert_eq!(snap.mainboard.len(), 3);
    }

    #[tokio::test]
    async fn test_live_refresh_with_dead_sources_keeps_previous_gmp() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(DataSourceMode::Live, temp.path().join("s.json"));
        ctx.gmp_sources = vec![SourceDescriptor::html("http://127.0.0.1:1/nope")];
        ctx.ipo_api_sources = vec![SourceDescriptor::json("http://127.0.0.1:1/api")];

        // seed a previous merge
        let mut seeded = sample_snapshot();
        seeded.gmp.insert("X".to_string(), record("X", 9));
        ctx.state.publish(seeded);

        refresh(&ctx).await;

        let snap = ctx.state.snapshot();
        assert_eq!(snap.ipos.len(), 5);
        assert_eq!(snap.gmp.len(), 1, "failed cycle keeps last-known merge");
    }

    #[tokio::test]
    async fn test_live_refresh_mirrors_to_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mirror.json");
        let mut ctx = context(DataSourceMode::Live, path.clone());
        ctx.gmp_sources = Vec::new();
        ctx.ipo_api_sources = Vec::new();

        refresh(&ctx).await;

        match ListingStore::new(path).load() {
            crate::services::StoreLookup::Found(doc) => assert_eq!(doc.listings.len(), 5),
            crate::services::StoreLookup::Unavailable => panic!("expected mirrored document"),
        }
    }
}
