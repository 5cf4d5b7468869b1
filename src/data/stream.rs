//! Shared-connection ticker stream multiplexer.
//!
//! One WebSocket connection serves every subscribed pair. The registry maps
//! a display symbol to a single callback; a fresh subscribe silently
//! replaces the previous one (no fan-out). The connection lives on its own
//! thread with a dedicated runtime and reconnects with doubling delay up to
//! a cap; past `max_reconnect_attempts` the stream parks in `Unavailable`
//! until a new subscribe revives it.

use {
    futures::{SinkExt, StreamExt},
    serde_json::{Value, json},
    std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        thread,
        time::Duration,
    },
    tokio::{
        runtime::Runtime,
        sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
        time::sleep,
    },
    tokio_tungstenite::{connect_async, tungstenite::Message},
};

use crate::{
    config::StreamSettings,
    models::{PriceQuote, symbol},
    utils::now_timestamp_ms,
};

pub type QuoteCallback = Box<dyn FnMut(PriceQuote) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    #[default]
    Disconnected,
    /// Reconnect budget exhausted; revived by the next subscribe.
    Unavailable,
}

/// Symbol -> single callback. Not shared outside this module; the event
/// loop and the GUI thread serialize access through the mutex.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    map: HashMap<String, QuoteCallback>,
}

impl SubscriberRegistry {
    /// Registers `callback` for `pair`, replacing any existing one.
    pub(crate) fn insert(&mut self, pair: String, callback: QuoteCallback) {
        self.map.insert(pair, callback);
    }

    /// Returns whether anything was actually removed.
    pub(crate) fn remove(&mut self, pair: &str) -> bool {
        self.map.remove(pair).is_some()
    }

    /// Hands the quote to the matching callback. Quotes for unregistered
    /// symbols are dropped.
    pub(crate) fn dispatch(&mut self, quote: PriceQuote) -> bool {
        match self.map.get_mut(&quote.symbol) {
            Some(callback) => {
                callback(quote);
                true
            }
            None => false,
        }
    }

    pub(crate) fn symbols(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

enum Command {
    Subscribe(String),
    Unsubscribe(String),
    Shutdown,
}

/// The stream service. Explicitly constructed and injectable (no global
/// state); `subscribe` lazily spins up the connection thread.
pub struct PriceStream {
    settings: StreamSettings,
    registry: Arc<Mutex<SubscriberRegistry>>,
    status: Arc<Mutex<ConnectionStatus>>,
    cmd_tx: Mutex<Option<UnboundedSender<Command>>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl PriceStream {
    pub fn new(settings: StreamSettings) -> Self {
        Self {
            settings,
            registry: Arc::new(Mutex::new(SubscriberRegistry::default())),
            status: Arc::new(Mutex::new(ConnectionStatus::default())),
            cmd_tx: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    /// Registers `callback` for `pair` (replacing any prior callback) and
    /// asks the connection to subscribe to the pair's ticker stream. The
    /// shared connection is opened lazily on the first call.
    pub fn subscribe(&self, pair: &str, callback: QuoteCallback) {
        self.registry
            .lock()
            .unwrap()
            .insert(pair.to_string(), callback);
        self.ensure_started();
        self.send_command(Command::Subscribe(pair.to_string()));
    }

    /// Drops the pair's callback and sends an UNSUBSCRIBE frame if
    /// connected. The connection itself stays up even with no subscribers
    /// left. Unsubscribing a pair that was never subscribed is a no-op.
    pub fn unsubscribe(&self, pair: &str) {
        let removed = self.registry.lock().unwrap().remove(pair);
        if removed {
            self.send_command(Command::Unsubscribe(pair.to_string()));
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.lock().unwrap()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().unwrap().len()
    }

    /// Stops the connection thread and joins it. Safe to call twice; a
    /// later subscribe starts a fresh connection thread.
    pub fn stop(&self) {
        self.send_command(Command::Shutdown);
        if let Some(handle) = self.handle.lock().unwrap().take() {
            let _ = handle.join();
        }
        *self.cmd_tx.lock().unwrap() = None;
    }

    fn ensure_started(&self) {
        let mut tx_slot = self.cmd_tx.lock().unwrap();
        if tx_slot.is_some() {
            return;
        }
        let (tx, rx) = unbounded_channel();
        let registry = Arc::clone(&self.registry);
        let status = Arc::clone(&self.status);
        let settings = self.settings.clone();
        let handle = thread::spawn(move || {
            let rt = Runtime::new().expect("Failed to create runtime");
            rt.block_on(connection_task(settings, registry, status, rx));
        });
        *tx_slot = Some(tx);
        *self.handle.lock().unwrap() = Some(handle);
    }

    fn send_command(&self, cmd: Command) {
        if let Some(tx) = self.cmd_tx.lock().unwrap().as_ref() {
            let _ = tx.send(cmd);
        }
    }
}

impl Drop for PriceStream {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn connection_task(
    settings: StreamSettings,
    registry: Arc<Mutex<SubscriberRegistry>>,
    status: Arc<Mutex<ConnectionStatus>>,
    mut cmd_rx: UnboundedReceiver<Command>,
) {
    let mut next_frame_id: u64 = 1;
    let mut attempts: u32 = 0;

    'outer: loop {
        // Park until someone subscribes.
        while registry.lock().unwrap().is_empty() {
            match cmd_rx.recv().await {
                Some(Command::Shutdown) | None => break 'outer,
                Some(_) => {}
            }
        }

        *status.lock().unwrap() = ConnectionStatus::Connecting;
        log::info!("Connecting to ticker stream at {}", settings.url);

        match connect_async(&settings.url).await {
            Ok((ws, _)) => {
                *status.lock().unwrap() = ConnectionStatus::Connected;
                attempts = 0;
                let (mut write, mut read) = ws.split();

                // Re-establish every registered subscription. Best-effort:
                // no server acknowledgment is awaited.
                let pairs = registry.lock().unwrap().symbols();
                for pair in pairs {
                    let frame =
                        control_frame("SUBSCRIBE", &symbol::stream_name(&pair), next_frame_id);
                    next_frame_id += 1;
                    if write.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }

                loop {
                    tokio::select! {
                        cmd = cmd_rx.recv() => match cmd {
                            Some(Command::Subscribe(pair)) => {
                                let frame = control_frame(
                                    "SUBSCRIBE", &symbol::stream_name(&pair), next_frame_id);
                                next_frame_id += 1;
                                let _ = write.send(Message::Text(frame.into())).await;
                            }
                            Some(Command::Unsubscribe(pair)) => {
                                let frame = control_frame(
                                    "UNSUBSCRIBE", &symbol::stream_name(&pair), next_frame_id);
                                next_frame_id += 1;
                                let _ = write.send(Message::Text(frame.into())).await;
                            }
                            Some(Command::Shutdown) | None => break 'outer,
                        },
                        msg = read.next() => match msg {
                            Some(Ok(Message::Text(text))) => {
                                if let Some(quote) = parse_ticker_frame(&text) {
                                    registry.lock().unwrap().dispatch(quote);
                                }
                            }
                            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                            Some(Ok(Message::Close(_))) | None => break,
                            Some(Err(e)) => {
                                log::error!("WebSocket error: {}", e);
                                break;
                            }
                            Some(Ok(_)) => {}
                        },
                    }
                }
            }
            Err(e) => {
                log::error!("WebSocket connection failed: {}", e);
            }
        }

        *status.lock().unwrap() = ConnectionStatus::Disconnected;

        if registry.lock().unwrap().is_empty() {
            // Nobody listening; wait for the next subscribe at loop top.
            continue;
        }

        attempts += 1;
        if attempts > settings.max_reconnect_attempts {
            *status.lock().unwrap() = ConnectionStatus::Unavailable;
            log::error!(
                "Ticker stream unavailable after {} reconnect attempts",
                settings.max_reconnect_attempts
            );
            loop {
                match cmd_rx.recv().await {
                    Some(Command::Subscribe(_)) => {
                        attempts = 0;
                        break;
                    }
                    Some(Command::Unsubscribe(_)) => {}
                    Some(Command::Shutdown) | None => break 'outer,
                }
            }
            continue;
        }

        let delay = reconnect_delay(&settings, attempts);
        log::warn!(
            "Ticker stream disconnected. Reconnecting in {:?} (attempt {}/{})",
            delay,
            attempts,
            settings.max_reconnect_attempts
        );
        tokio::select! {
            _ = sleep(delay) => {}
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Shutdown) | None => break 'outer,
                Some(_) => {}
            },
        }
    }

    *status.lock().unwrap() = ConnectionStatus::Disconnected;
}

fn control_frame(method: &str, stream: &str, id: u64) -> String {
    json!({ "method": method, "params": [stream], "id": id }).to_string()
}

/// Doubling delay, capped. `attempt` is 1-based.
fn reconnect_delay(settings: &StreamSettings, attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(16);
    (settings.initial_reconnect_delay * factor).min(settings.max_reconnect_delay)
}

/// Translates a raw inbound frame into a quote. Non-ticker events (control
/// acknowledgments, other streams) return None silently; malformed JSON is
/// logged and swallowed so one bad frame never tears down the connection.
pub(crate) fn parse_ticker_frame(text: &str) -> Option<PriceQuote> {
    let v: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Unparseable stream frame: {}", e);
            return None;
        }
    };
    if v["e"].as_str() != Some("24hrTicker") {
        return None;
    }

    let exchange_symbol = v["s"].as_str()?;
    let field = |key: &str| v[key].as_str().and_then(|s| s.parse::<f64>().ok());

    Some(PriceQuote {
        symbol: symbol::to_display(exchange_symbol),
        price: field("c")?,
        // "p" (absolute change) is absent from some reduced payloads.
        change_24h: field("p").unwrap_or(0.0),
        change_percent_24h: field("P")?,
        volume_24h: field("v")?,
        high_24h: field("h")?,
        low_24h: field("l")?,
        last_update_ms: now_timestamp_ms(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc,
    };
    use tokio::net::{TcpListener, TcpStream};
    use tokio_tungstenite::{WebSocketStream, accept_async};

    const TICKER_FRAME: &str = r#"{"e":"24hrTicker","s":"BTCUSDT","c":"45200","p":"700","P":"1.6","v":"1250","h":"45700","l":"44300"}"#;

    fn quote(symbol: &str) -> PriceQuote {
        PriceQuote {
            symbol: symbol.to_string(),
            price: 1.0,
            change_24h: 0.0,
            change_percent_24h: 0.0,
            volume_24h: 0.0,
            high_24h: 0.0,
            low_24h: 0.0,
            last_update_ms: 0,
        }
    }

    #[test]
    fn resubscribing_replaces_the_callback() {
        let first_hits = Arc::new(AtomicUsize::new(0));
        let second_hits = Arc::new(AtomicUsize::new(0));
        let mut registry = SubscriberRegistry::default();

        let hits = Arc::clone(&first_hits);
        registry.insert(
            "BTC/USDT".to_string(),
            Box::new(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let hits = Arc::clone(&second_hits);
        registry.insert(
            "BTC/USDT".to_string(),
            Box::new(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(registry.len(), 1);
        assert!(registry.dispatch(quote("BTC/USDT")));
        assert_eq!(first_hits.load(Ordering::SeqCst), 0);
        assert_eq!(second_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn quotes_for_unregistered_symbols_are_dropped() {
        let mut registry = SubscriberRegistry::default();
        registry.insert("BTC/USDT".to_string(), Box::new(|_| {}));
        assert!(!registry.dispatch(quote("ETH/USDT")));
    }

    #[test]
    fn unsubscribing_unknown_pair_is_a_noop() {
        let mut registry = SubscriberRegistry::default();
        assert!(!registry.remove("BTC/USDT"));

        // Same at the service level: no panic, no connection spun up.
        let service = PriceStream::new(StreamSettings::default());
        service.unsubscribe("BTC/USDT");
        assert_eq!(service.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn ticker_frame_is_translated() {
        let quote = parse_ticker_frame(TICKER_FRAME).unwrap();
        assert_eq!(quote.symbol, "BTC/USDT");
        assert_eq!(quote.price, 45_200.0);
        assert_eq!(quote.change_24h, 700.0);
        assert_eq!(quote.change_percent_24h, 1.6);
        assert_eq!(quote.volume_24h, 1_250.0);
        assert_eq!(quote.high_24h, 45_700.0);
        assert_eq!(quote.low_24h, 44_300.0);
    }

    #[test]
    fn non_ticker_and_malformed_frames_are_dropped() {
        assert!(parse_ticker_frame(r#"{"result":null,"id":1}"#).is_none());
        assert!(parse_ticker_frame("not json at all").is_none());
        assert!(parse_ticker_frame(r#"{"e":"kline","s":"BTCUSDT"}"#).is_none());
    }

    #[test]
    fn control_frames_match_the_exchange_shape() {
        let frame = control_frame("SUBSCRIBE", "btcusdt@ticker", 7);
        let v: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(v["method"], "SUBSCRIBE");
        assert_eq!(v["params"][0], "btcusdt@ticker");
        assert_eq!(v["id"], 7);
    }

    #[test]
    fn reconnect_delay_doubles_and_caps() {
        let settings = StreamSettings {
            initial_reconnect_delay: Duration::from_secs(5),
            max_reconnect_delay: Duration::from_secs(60),
            ..StreamSettings::default()
        };
        assert_eq!(reconnect_delay(&settings, 1), Duration::from_secs(5));
        assert_eq!(reconnect_delay(&settings, 2), Duration::from_secs(10));
        assert_eq!(reconnect_delay(&settings, 3), Duration::from_secs(20));
        assert_eq!(reconnect_delay(&settings, 10), Duration::from_secs(60));
    }

    fn wait_for_status<F: Fn(ConnectionStatus) -> bool>(
        service: &PriceStream,
        what: &str,
        accept: F,
    ) {
        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while !accept(service.status()) {
            assert!(
                std::time::Instant::now() < deadline,
                "status never became {} (last: {:?})",
                what,
                service.status()
            );
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn exhausted_reconnects_park_unavailable_until_resubscribe() {
        // Unroutable endpoint: every connect fails fast, the budget of one
        // attempt burns immediately.
        let service = PriceStream::new(StreamSettings {
            url: "ws://127.0.0.1:9".to_string(),
            initial_reconnect_delay: Duration::from_millis(50),
            max_reconnect_delay: Duration::from_millis(100),
            max_reconnect_attempts: 1,
        });
        service.subscribe("BTC/USDT", Box::new(|_| {}));
        wait_for_status(&service, "Unavailable", |s| s == ConnectionStatus::Unavailable);

        // A fresh subscribe resets the attempt counter and revives the
        // connection loop; the status leaves the parked state.
        service.subscribe("ETH/USDT", Box::new(|_| {}));
        wait_for_status(&service, "revived", |s| s != ConnectionStatus::Unavailable);

        service.stop();
    }

    #[test]
    fn stream_restarts_after_stop() {
        let service = PriceStream::new(StreamSettings {
            url: "ws://127.0.0.1:9".to_string(),
            initial_reconnect_delay: Duration::from_millis(50),
            max_reconnect_delay: Duration::from_millis(100),
            max_reconnect_attempts: 1,
        });
        service.subscribe("BTC/USDT", Box::new(|_| {}));
        service.stop();
        assert_eq!(service.status(), ConnectionStatus::Disconnected);

        // Subscribing again spins up a new connection thread; reaching
        // Unavailable proves the loop is live and retrying.
        service.subscribe("ETH/USDT", Box::new(|_| {}));
        wait_for_status(&service, "Unavailable", |s| s == ConnectionStatus::Unavailable);

        service.stop();
    }

    async fn expect_subscribe(ws: &mut WebSocketStream<TcpStream>) -> String {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    if text.contains("SUBSCRIBE") {
                        return text.to_string();
                    }
                }
                Some(Ok(_)) => {}
                other => panic!("expected a subscribe frame, got {:?}", other),
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reconnects_and_resubscribes_after_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            // Session 1: take the subscribe frame, push one ticker, drop.
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let first = expect_subscribe(&mut ws).await;
            ws.send(Message::Text(TICKER_FRAME.into())).await.unwrap();
            drop(ws);

            // Session 2: the service must come back on its own and
            // re-establish the subscription.
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let second = expect_subscribe(&mut ws).await;
            (first, second)
        });

        let settings = StreamSettings {
            url: format!("ws://{}", addr),
            initial_reconnect_delay: Duration::from_millis(100),
            max_reconnect_delay: Duration::from_millis(400),
            max_reconnect_attempts: 5,
        };
        let service = PriceStream::new(settings);

        let (quote_tx, quote_rx) = mpsc::channel();
        service.subscribe(
            "BTC/USDT",
            Box::new(move |q| {
                let _ = quote_tx.send(q);
            }),
        );

        let quote = tokio::task::spawn_blocking(move || {
            quote_rx.recv_timeout(Duration::from_secs(5))
        })
        .await
        .unwrap()
        .expect("callback never saw the pushed ticker frame");
        assert_eq!(quote.symbol, "BTC/USDT");
        assert_eq!(quote.price, 45_200.0);

        let (first, second) = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("no reconnect within the deadline")
            .unwrap();
        assert!(first.contains("btcusdt@ticker"));
        assert!(second.contains("btcusdt@ticker"));

        service.stop();
    }
}
