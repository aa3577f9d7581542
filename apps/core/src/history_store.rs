use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_CAPACITY: usize = 100;
const MIN_CAPACITY: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<String>,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            entries: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn add(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }

        if let Some(position) = self.entries.iter().position(|entry| *entry == text) {
            self.entries.remove(position);
        }
        self.entries.insert(0, text);

        if self.entries.len() > self.capacity {
            self.entries.pop();
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn front(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedHistory {
    inner: Arc<Mutex<HistoryStore>>,
}

impl SharedHistory {
    pub fn new(store: HistoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(HistoryStore::new(capacity))
    }

    pub fn add(&self, text: impl Into<String>) {
        self.lock().add(text);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lock().entries().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    // Poisoning is recovered: the store stays usable after a panicking caller.
    fn lock(&self) -> MutexGuard<'_, HistoryStore> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
