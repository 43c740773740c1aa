use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::pipeline::traits::{CacheKey, ScoreCache};
use crate::types::{AlignmentResult, PhonemeSequence};

impl CacheKey {
    pub fn for_sequences(
        aligner: &'static str,
        observed: &PhonemeSequence,
        reference: &PhonemeSequence,
    ) -> Self {
        Self {
            aligner,
            observed_hash: hash_sequence(observed),
            reference_hash: hash_sequence(reference),
        }
    }
}

fn hash_sequence(sequence: &PhonemeSequence) -> u64 {
    let mut hasher = DefaultHasher::new();
    sequence.hash(&mut hasher);
    hasher.finish()
}

/// In-process cache with a fixed entry budget. Once full, new results are
/// not stored; existing entries are kept.
pub struct MemoryScoreCache {
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, AlignmentResult>>,
}

impl MemoryScoreCache {
    pub const DEFAULT_CAPACITY: usize = 4_096;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(_) => {
                tracing::warn!("score cache: lock poisoned, reporting as empty");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut entries) => entries.clear(),
            Err(_) => tracing::warn!("score cache: lock poisoned, clear skipped"),
        }
    }
}

impl Default for MemoryScoreCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl ScoreCache for MemoryScoreCache {
    fn get(&self, key: &CacheKey) -> Option<AlignmentResult> {
        let Ok(entries) = self.entries.lock() else {
            tracing::warn!("score cache: lock poisoned, treating lookup as a miss");
            return None;
        };
        entries.get(key).cloned()
    }

    fn insert(&self, key: CacheKey, result: AlignmentResult) {
        let Ok(mut entries) = self.entries.lock() else {
            tracing::warn!("score cache: lock poisoned, result not stored");
            return;
        };
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            return;
        }
        entries.insert(key, result);
    }
}
