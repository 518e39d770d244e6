//! The quote store.
//!
//! `QuoteStore` maps `TICKER:PROVIDER` keys to the latest `QuoteRecord`.
//! Repeated inserts of a tracked key cost nothing; `update` always refetches.
//! A failed fetch never creates or alters an entry.
//!
//! The map sits behind a mutex shared with the refresh thread. Fetches run with
//! the mutex released, so a slow provider holds up neither foreground readers
//! nor unrelated writers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indexmap::IndexMap;
use log::{debug, warn};
use stock_common::key::{DELIMITER, make_key, split_key};
use stock_common::{Provider, QuoteError, QuoteRecord, Result};

use crate::provider::{AdapterConfig, ProviderAdapter};
use crate::scheduler::Refresher;
use crate::snapshot::Snapshot;
use crate::source::QuoteSource;

/// Characters that would change the provider request target.
const FORBIDDEN_IN_TICKER: &[char] = &['/', '?', '#', '%', '&'];

/// State shared between the store handle and its refresh thread.
pub(crate) struct Shared<S> {
    entries: Mutex<IndexMap<String, QuoteRecord>>,
    source: S,
}

impl<S: QuoteSource> Shared<S> {
    fn new(source: S) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            source,
        }
    }

    /// Records are replaced whole, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, IndexMap<String, QuoteRecord>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fetch_into(&self, ticker: &str, provider: &str, credential: &str, force: bool) -> Result<String> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(QuoteError::InvalidInput("empty ticker".to_string()));
        }
        if let Some(bad) = ticker
            .chars()
            .find(|c| *c == DELIMITER || FORBIDDEN_IN_TICKER.contains(c) || c.is_whitespace())
        {
            return Err(QuoteError::InvalidInput(format!(
                "ticker '{}' contains '{}'",
                ticker, bad
            )));
        }
        let provider = Provider::from_code(provider)?;
        let key = make_key(&ticker, provider.code());

        let credential = {
            let entries = self.lock();
            match entries.get(&key) {
                Some(_) if !force => return Ok(key),
                Some(existing) if credential.is_empty() => existing.credential.clone(),
                _ => credential.to_string(),
            }
        };

        let record = self.source.fetch(&ticker, provider, &credential)?;
        let mut entries = self.lock();
        if force {
            entries.insert(key.clone(), record);
        } else {
            // Someone else may have filled the key while we were fetching.
            entries.entry(key.clone()).or_insert(record);
        }
        Ok(key)
    }

    /// Refetches a tracked key. A key removed while the fetch was in flight
    /// stays removed; one re-keyed with another credential keeps the newer record.
    pub(crate) fn refresh(&self, key: &str, credential: &str) -> Result<()> {
        let (ticker, code) = split_key(key);
        let provider = Provider::from_code(&code)?;
        let record = self.source.fetch(&ticker, provider, credential)?;

        match self.lock().get_mut(key) {
            Some(slot) if slot.credential == credential => *slot = record,
            Some(_) => debug!("{} changed credential during refresh", key),
            None => debug!("{} was removed during refresh", key),
        }
        Ok(())
    }

    /// Keys with the credential each was fetched with.
    pub(crate) fn tracked(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .map(|(key, record)| (key.clone(), record.credential.clone()))
            .collect()
    }
}

/// In-memory quote cache keyed by `TICKER:PROVIDER`.
///
/// Dropping the store stops its refresh thread, if any, and waits for it.
pub struct QuoteStore<S: QuoteSource + 'static = ProviderAdapter> {
    shared: Arc<Shared<S>>,
    refresher: Mutex<Option<Refresher>>,
}

impl QuoteStore<ProviderAdapter> {
    /// Creates an empty store backed by the live provider APIs.
    pub fn connect(config: AdapterConfig) -> Result<Self> {
        Ok(Self::new(ProviderAdapter::new(config)?))
    }
}

impl<S: QuoteSource + 'static> QuoteStore<S> {
    /// Creates an empty store fetching through `source`.
    pub fn new(source: S) -> Self {
        Self {
            shared: Arc::new(Shared::new(source)),
            refresher: Mutex::new(None),
        }
    }

    /// Adds the quote for `ticker` at `provider` unless the key is already
    /// tracked, in which case nothing is fetched.
    ///
    /// Returns the key, or `None` when the input is invalid or the fetch failed.
    pub fn insert(&self, ticker: &str, provider: &str, credential: &str) -> Option<String> {
        self.try_insert(ticker, provider, credential)
            .map_err(|e| warn!("Insert of {} at {} failed: {}", ticker, provider, e))
            .ok()
    }

    /// `insert` with the failure cause.
    pub fn try_insert(&self, ticker: &str, provider: &str, credential: &str) -> Result<String> {
        self.shared.fetch_into(ticker, provider, credential, false)
    }

    /// Fetches the quote for `ticker` at `provider` and stores it, replacing
    /// any previous record. An empty `credential` reuses the stored one.
    ///
    /// Returns the key, or `None` when the input is invalid or the fetch
    /// failed; the previous record then stays in place.
    pub fn update(&self, ticker: &str, provider: &str, credential: &str) -> Option<String> {
        self.try_update(ticker, provider, credential)
            .map_err(|e| warn!("Update of {} at {} failed: {}", ticker, provider, e))
            .ok()
    }

    /// `update` with the failure cause.
    pub fn try_update(&self, ticker: &str, provider: &str, credential: &str) -> Result<String> {
        self.shared.fetch_into(ticker, provider, credential, true)
    }

    /// Drops the entry for `ticker` at `provider`; does nothing if absent.
    pub fn remove(&self, ticker: &str, provider: &str) {
        let key = make_key(ticker.trim(), provider.trim());
        if self.shared.lock().shift_remove(&key).is_some() {
            debug!("Removed {}", key);
        }
    }

    /// Record stored under `key`.
    pub fn get(&self, key: &str) -> Result<QuoteRecord> {
        self.shared
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| QuoteError::NotFound(key.to_string()))
    }

    /// Whether `key` is tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.shared.lock().contains_key(key)
    }

    /// Company name stored under `key`.
    pub fn company_name(&self, key: &str) -> Result<String> {
        self.get(key).map(|r| r.company_name)
    }

    /// Price stored under `key`.
    pub fn price(&self, key: &str) -> Result<f64> {
        self.get(key).map(|r| r.price)
    }

    /// Fractional change stored under `key`.
    pub fn price_change(&self, key: &str) -> Result<f64> {
        self.get(key).map(|r| r.change)
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// Whether no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    /// Copy of all entries, taken under the lock.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.shared
                .lock()
                .iter()
                .map(|(key, record)| (key.clone(), record.clone()))
                .collect(),
        )
    }

    /// Table of all entries; see `Snapshot`'s `Display`.
    pub fn render_table(&self) -> String {
        self.snapshot().to_string()
    }

    /// Starts refetching every tracked key each `interval`.
    ///
    /// Returns `false` without starting anything if a refresh thread is
    /// already running.
    pub fn maintain(&self, interval: Duration) -> Result<bool> {
        let mut refresher = self.refresher.lock()?;
        if refresher.is_some() {
            return Ok(false);
        }
        *refresher = Some(Refresher::start(Arc::clone(&self.shared), interval)?);
        Ok(true)
    }

    /// Stops the refresh thread and waits for it to exit. A refresh pass under
    /// way completes first. Does nothing if no thread runs.
    pub fn desist(&self) {
        let refresher = self
            .refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(refresher) = refresher {
            refresher.stop();
        }
    }

    /// Whether a refresh thread is running.
    pub fn is_maintaining(&self) -> bool {
        self.refresher
            .lock()
            .map(|r| r.is_some())
            .unwrap_or(false)
    }
}

impl<S: QuoteSource + 'static> Drop for QuoteStore<S> {
    fn drop(&mut self) {
        self.desist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl QuoteSource for Counting {
        fn fetch(&self, ticker: &str, _provider: Provider, credential: &str) -> Result<QuoteRecord> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(QuoteRecord::new(ticker, n as f64, 0.0, credential))
        }
    }

    fn store() -> QuoteStore<Counting> {
        QuoteStore::new(Counting {
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn refresh_does_not_resurrect_removed_keys() {
        let store = store();
        let key = store.insert("AAPL", "FMP", "k").unwrap();
        let tracked = store.shared.tracked();
        store.remove("AAPL", "FMP");

        for (key, credential) in tracked {
            store.shared.refresh(&key, &credential).unwrap();
        }
        assert!(!store.contains(&key));
        assert_eq!(store.shared.source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn refresh_reuses_stored_credential() {
        let store = store();
        store.insert("amzn", "av", "secret").unwrap();
        assert_eq!(
            store.shared.tracked(),
            vec![("AMZN:AV".to_string(), "secret".to_string())]
        );
    }

    #[test]
    fn update_with_empty_credential_keeps_stored_one() {
        let store = store();
        let key = store.insert("AMZN", "AV", "secret").unwrap();
        store.update("AMZN", "AV", "").unwrap();
        let record = store.get(&key).unwrap();
        assert_eq!(record.credential, "secret");
        assert_eq!(record.price, 2.0);
    }

    #[test]
    fn refresh_keeps_record_updated_with_new_credential() {
        let store = store();
        let key = store.insert("AMZN", "AV", "old").unwrap();
        let tracked = store.shared.tracked();
        store.update("AMZN", "AV", "new").unwrap();

        for (key, credential) in tracked {
            store.shared.refresh(&key, &credential).unwrap();
        }
        let record = store.get(&key).unwrap();
        assert_eq!(record.credential, "new");
        assert_eq!(record.price, 2.0);
    }

    #[test]
    fn ticker_with_delimiter_is_rejected() {
        let store = store();
        assert!(matches!(
            store.try_insert("A:B", "FMP", ""),
            Err(QuoteError::InvalidInput(_))
        ));
        assert!(store.is_empty());
    }
}
