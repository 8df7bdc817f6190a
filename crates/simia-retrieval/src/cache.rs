// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded LRU cache for query embedding vectors.
//!
//! Keys are content hashes of the normalized query text, so retries and
//! trivially reworded lookups ("  Macaques? " vs "macaques?") share one
//! entry. The cache itself is not synchronized; callers wrap it in a
//! mutex and hold the lock only for lookups and inserts, never across
//! an embedding call.

use std::collections::{HashMap, VecDeque};

use sha2::{Digest, Sha256};

/// Cache key for a query: SHA-256 hex of the lower-cased, trimmed text.
pub fn cache_key(query: &str) -> String {
    let normalized = query.to_lowercase();
    hex::encode(Sha256::digest(normalized.trim().as_bytes()))
}

/// LRU map from normalized-query hash to embedding vector.
#[derive(Debug)]
pub struct EmbeddingCache {
    capacity: usize,
    entries: HashMap<String, Vec<f32>>,
    lru: VecDeque<String>,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            lru: VecDeque::new(),
        }
    }

    /// Look up a vector, marking the entry most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<Vec<f32>> {
        let hit = self.entries.get(key).cloned();
        if hit.is_some() {
            self.bump(key);
        }
        hit
    }

    /// Insert a vector, evicting least recently used entries while the
    /// cache is over capacity.
    pub fn insert(&mut self, key: String, vector: Vec<f32>) {
        self.entries.insert(key.clone(), vector);
        self.bump(&key);
        while self.entries.len() > self.capacity {
            match self.lru.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bump(&mut self, key: &str) {
        self.lru.retain(|k| k != key);
        self.lru.push_back(key.to_string());
    }
}
