use crate::domain::errors::QuoteError;
use crate::domain::ports::{QuoteRequest, QuoteService};
use crate::domain::trading::charges::RawQuote;
use crate::infrastructure::quote::session::SessionTracker;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type RequestPredicate = Arc<dyn Fn(&QuoteRequest) -> bool + Send + Sync>;

/// Deterministic fee calculator for dry runs and tests.
///
/// Answers every request with the same charges (₹50.00 in total by default),
/// optionally after a random delay, and can be told to fail or panic for
/// selected requests. Open sessions are tracked like a real calculator's.
#[derive(Clone)]
pub struct MockQuoteService {
    response: RawQuote,
    overrides: Vec<(RequestPredicate, RawQuote)>,
    latency_ms: Option<(u64, u64)>,
    fail_when: Option<RequestPredicate>,
    panic_when: Option<RequestPredicate>,
    sessions: SessionTracker,
    calls: Arc<AtomicUsize>,
}

impl MockQuoteService {
    pub fn new() -> Self {
        Self {
            response: Self::default_response(),
            overrides: Vec::new(),
            latency_ms: None,
            fail_when: None,
            panic_when: None,
            sessions: SessionTracker::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Brokerage 40 + STT 5 + exchange 2 + GST 1.50 + SEBI 0.50 + stamp 1 = 50.
    pub fn default_response() -> RawQuote {
        RawQuote {
            brokerage: Some("₹40.00".to_string()),
            stt: Some("₹5.00".to_string()),
            exchange_txn_charge: Some("₹2.00".to_string()),
            gst: Some("₹1.50".to_string()),
            sebi_charges: Some("₹0.50".to_string()),
            stamp_duty: Some("₹1.00".to_string()),
            total_charges: Some("₹50.00".to_string()),
            breakeven_points: Some("₹0.50".to_string()),
        }
    }

    /// Answer every request not matched by [`Self::with_response_when`] with `response`.
    pub fn with_response(mut self, response: RawQuote) -> Self {
        self.response = response;
        self
    }

    /// Answer requests matching `predicate` with `response`. Earlier
    /// registrations win.
    pub fn with_response_when<F>(mut self, predicate: F, response: RawQuote) -> Self
    where
        F: Fn(&QuoteRequest) -> bool + Send + Sync + 'static,
    {
        self.overrides.push((Arc::new(predicate), response));
        self
    }

    /// Sleep a uniformly random `min_ms..=max_ms` before answering.
    pub fn with_latency_jitter(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_ms = Some((min_ms.min(max_ms), max_ms.max(min_ms)));
        self
    }

    pub fn with_sessions(mut self, sessions: SessionTracker) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn fail_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&QuoteRequest) -> bool + Send + Sync + 'static,
    {
        self.fail_when = Some(Arc::new(predicate));
        self
    }

    pub fn panic_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&QuoteRequest) -> bool + Send + Sync + 'static,
    {
        self.panic_when = Some(Arc::new(predicate));
        self
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockQuoteService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteService for MockQuoteService {
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _session = self.sessions.open(self.name());

        if let Some((min, max)) = self.latency_ms {
            let delay = rand::rng().random_range(min..=max);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.panic_when.as_ref().is_some_and(|p| p(request)) {
            panic!("mock calculator crashed for {:?}", request);
        }
        if self.fail_when.as_ref().is_some_and(|p| p(request)) {
            return Err(QuoteError::ServiceUnavailable {
                reason: "mock calculator rejected request".to_string(),
            });
        }

        let response = self
            .overrides
            .iter()
            .find(|(matches, _)| matches(request))
            .map_or(&self.response, |(_, response)| response);
        Ok(response.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
