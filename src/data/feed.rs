//! Data-binding layer: one coherent read model per tracked pair.
//!
//! Seeds from a REST snapshot, patches individual symbols as stream
//! updates arrive, and re-fetches the full snapshot on a fixed period as a
//! fallback path. The two writers race by design; every write stamps a
//! global revision and an origin tag so last-applied-wins stays observable
//! instead of silently resolved.

use {
    std::{
        collections::HashMap,
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, AtomicU64, Ordering},
        },
        thread,
        time::Duration,
    },
    tokio::{runtime::Runtime, time::sleep},
};

use crate::{
    data::{PriceStream, SnapshotClient},
    models::PriceQuote,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSource {
    Snapshot,
    Stream,
}

#[derive(Debug, Clone)]
pub struct QuoteEntry {
    pub quote: PriceQuote,
    pub source: QuoteSource,
    /// Global write ordinal; later writes always carry a larger value.
    pub revision: u64,
}

struct FeedShared {
    entries: Mutex<HashMap<String, QuoteEntry>>,
    error: Mutex<Option<String>>,
    loading: AtomicBool,
    revision: AtomicU64,
    /// Cleared on teardown; late snapshot results and stream callbacks
    /// check it and discard themselves.
    alive: AtomicBool,
}

impl FeedShared {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            error: Mutex::new(None),
            loading: AtomicBool::new(true),
            revision: AtomicU64::new(0),
            alive: AtomicBool::new(true),
        }
    }
}

pub struct MarketFeed {
    pairs: Vec<String>,
    shared: Arc<FeedShared>,
    stream: Arc<PriceStream>,
    refresh_handle: Option<thread::JoinHandle<()>>,
}

impl MarketFeed {
    /// Starts tracking `pairs`: subscribes each to the stream and spawns
    /// the snapshot/refresh worker.
    pub fn new(
        client: SnapshotClient,
        stream: Arc<PriceStream>,
        pairs: Vec<String>,
        refresh_period: Duration,
    ) -> Self {
        let shared = Arc::new(FeedShared::new());

        for pair in &pairs {
            let shared_cb = Arc::clone(&shared);
            stream.subscribe(
                pair,
                Box::new(move |quote| {
                    if shared_cb.alive.load(Ordering::SeqCst) {
                        apply_update(&shared_cb, quote, QuoteSource::Stream);
                    }
                }),
            );
        }

        let shared_worker = Arc::clone(&shared);
        let worker_pairs = pairs.clone();
        let refresh_handle = thread::spawn(move || {
            let rt = Runtime::new().expect("Failed to create runtime");
            rt.block_on(refresh_worker(
                client,
                shared_worker,
                worker_pairs,
                refresh_period,
            ));
        });

        Self {
            pairs,
            shared,
            stream,
            refresh_handle: Some(refresh_handle),
        }
    }

    /// Entries in the configured pair order; pairs with no data yet are
    /// simply absent.
    pub fn entries(&self) -> Vec<QuoteEntry> {
        let entries = self.shared.entries.lock().unwrap();
        self.pairs
            .iter()
            .filter_map(|p| entries.get(p).cloned())
            .collect()
    }

    pub fn entry(&self, pair: &str) -> Option<QuoteEntry> {
        self.shared.entries.lock().unwrap().get(pair).cloned()
    }

    pub fn pairs(&self) -> &[String] {
        &self.pairs
    }

    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::SeqCst)
    }

    pub fn error(&self) -> Option<String> {
        self.shared.error.lock().unwrap().clone()
    }

    pub fn latest_update_ms(&self) -> Option<i64> {
        let entries = self.shared.entries.lock().unwrap();
        entries.values().map(|e| e.quote.last_update_ms).max()
    }

    /// Teardown: unsubscribe every pair and stop the refresh worker. Late
    /// results are discarded via the liveness flag.
    pub fn close(&mut self) {
        self.shared.alive.store(false, Ordering::SeqCst);
        for pair in &self.pairs {
            self.stream.unsubscribe(pair);
        }
        if let Some(handle) = self.refresh_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MarketFeed {
    fn drop(&mut self) {
        self.close();
    }
}

async fn refresh_worker(
    client: SnapshotClient,
    shared: Arc<FeedShared>,
    pairs: Vec<String>,
    refresh_period: Duration,
) {
    fetch_into(&client, &shared, &pairs).await;
    shared.loading.store(false, Ordering::SeqCst);

    // Short ticks so teardown never waits out a full refresh period.
    let tick = Duration::from_millis(250);
    let mut elapsed = Duration::ZERO;
    loop {
        sleep(tick).await;
        if !shared.alive.load(Ordering::SeqCst) {
            return;
        }
        elapsed += tick;
        if elapsed >= refresh_period {
            elapsed = Duration::ZERO;
            fetch_into(&client, &shared, &pairs).await;
        }
    }
}

async fn fetch_into(client: &SnapshotClient, shared: &Arc<FeedShared>, pairs: &[String]) {
    match client.fetch_quotes(pairs).await {
        Ok(quotes) => {
            if !shared.alive.load(Ordering::SeqCst) {
                return;
            }
            for quote in quotes {
                apply_update(shared, quote, QuoteSource::Snapshot);
            }
            *shared.error.lock().unwrap() = None;
        }
        Err(e) => {
            log::error!("Snapshot fetch failed: {:#}", e);
            if shared.alive.load(Ordering::SeqCst) {
                *shared.error.lock().unwrap() = Some("Market data unavailable".to_string());
            }
        }
    }
}

/// Replaces exactly one symbol's entry. Whoever writes last wins; the
/// revision stamp records who that was.
fn apply_update(shared: &FeedShared, quote: PriceQuote, source: QuoteSource) {
    let mut entries = shared.entries.lock().unwrap();
    // Stamped while holding the entries lock: a later insert always
    // carries a larger revision.
    let revision = shared.revision.fetch_add(1, Ordering::SeqCst) + 1;
    entries.insert(
        quote.symbol.clone(),
        QuoteEntry {
            quote,
            source,
            revision,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamSettings;

    fn quote(symbol: &str, price: f64) -> PriceQuote {
        PriceQuote {
            symbol: symbol.to_string(),
            price,
            change_24h: 0.0,
            change_percent_24h: 0.0,
            volume_24h: 0.0,
            high_24h: 0.0,
            low_24h: 0.0,
            last_update_ms: 0,
        }
    }

    #[test]
    fn snapshot_yields_one_entry_per_symbol() {
        let shared = FeedShared::new();
        // Duplicate symbol in the input still collapses to a single entry.
        for q in [
            quote("BTC/USDT", 45_000.0),
            quote("ETH/USDT", 2_200.0),
            quote("BTC/USDT", 45_001.0),
        ] {
            apply_update(&shared, q, QuoteSource::Snapshot);
        }
        let entries = shared.entries.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["BTC/USDT"].quote.price, 45_001.0);
    }

    #[test]
    fn stream_update_patches_only_its_symbol() {
        let shared = FeedShared::new();
        apply_update(&shared, quote("BTC/USDT", 45_000.0), QuoteSource::Snapshot);
        apply_update(&shared, quote("ETH/USDT", 2_200.0), QuoteSource::Snapshot);

        apply_update(&shared, quote("BTC/USDT", 45_200.0), QuoteSource::Stream);

        let entries = shared.entries.lock().unwrap();
        assert_eq!(entries["BTC/USDT"].quote.price, 45_200.0);
        assert_eq!(entries["BTC/USDT"].source, QuoteSource::Stream);
        assert_eq!(entries["ETH/USDT"].quote.price, 2_200.0);
        assert_eq!(entries["ETH/USDT"].source, QuoteSource::Snapshot);
    }

    #[test]
    fn last_writer_wins_and_is_observable() {
        let shared = FeedShared::new();
        apply_update(&shared, quote("BTC/USDT", 1.0), QuoteSource::Stream);
        let first_rev = shared.entries.lock().unwrap()["BTC/USDT"].revision;

        // A snapshot landing after the stream update overwrites it; the
        // revision records the ordering.
        apply_update(&shared, quote("BTC/USDT", 2.0), QuoteSource::Snapshot);
        let entry = shared.entries.lock().unwrap()["BTC/USDT"].clone();
        assert_eq!(entry.quote.price, 2.0);
        assert_eq!(entry.source, QuoteSource::Snapshot);
        assert!(entry.revision > first_rev);
    }

    #[test]
    fn concurrent_writers_keep_per_symbol_revisions_monotone() {
        let shared = Arc::new(FeedShared::new());
        let done = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let reader = {
            let shared = Arc::clone(&shared);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last = 0u64;
                while !done.load(Ordering::SeqCst) {
                    if let Some(entry) = shared.entries.lock().unwrap().get("BTC/USDT") {
                        assert!(entry.revision >= last, "revision went backwards");
                        last = entry.revision;
                    }
                }
            })
        };

        let writers: Vec<_> = (0..4)
            .map(|n: u64| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let source = if n % 2 == 0 {
                        QuoteSource::Snapshot
                    } else {
                        QuoteSource::Stream
                    };
                    for i in 0..200 {
                        apply_update(&shared, quote("BTC/USDT", (n * 200 + i) as f64), source);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::SeqCst);
        reader.join().unwrap();

        assert_eq!(shared.entries.lock().unwrap()["BTC/USDT"].revision, 800);
    }

    #[test]
    fn failed_snapshot_sets_error_flag_and_teardown_unsubscribes() {
        // Unroutable endpoints: the fetch fails fast, the stream never
        // connects. Only offline behavior is under test here.
        let client = SnapshotClient::with_base_url("http://127.0.0.1:9");
        let stream = Arc::new(PriceStream::new(StreamSettings {
            url: "ws://127.0.0.1:9".to_string(),
            initial_reconnect_delay: Duration::from_millis(10),
            max_reconnect_delay: Duration::from_millis(20),
            max_reconnect_attempts: 1,
        }));
        let mut feed = MarketFeed::new(
            client,
            Arc::clone(&stream),
            vec!["BTC/USDT".to_string(), "ETH/USDT".to_string()],
            Duration::from_secs(30),
        );

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while feed.is_loading() {
            assert!(std::time::Instant::now() < deadline, "feed never settled");
            thread::sleep(Duration::from_millis(20));
        }

        assert!(feed.error().is_some());
        assert!(feed.entries().is_empty());
        assert_eq!(stream.subscriber_count(), 2);

        feed.close();
        assert_eq!(stream.subscriber_count(), 0);
        stream.stop();
    }
}
