use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
    sync::{LazyLock, RwLock}
};

use crate::{node::Node, query::SqlDialect};

/// Global statement cache
static STATEMENT_CACHE: LazyLock<RwLock<StatementCache>> =
    LazyLock::new(|| RwLock::new(StatementCache::new(1000)));

/// LRU-like cache for parsed statement trees, keyed by SQL text and dialect
pub struct StatementCache {
    cache:    HashMap<u64, Vec<Node>>,
    max_size: usize
}

impl StatementCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(max_size),
            max_size
        }
    }

    fn hash_key(sql: &str, dialect: SqlDialect) -> u64 {
        let mut hasher = DefaultHasher::new();
        sql.hash(&mut hasher);
        dialect.hash(&mut hasher);
        hasher.finish()
    }

    pub fn get(&self, sql: &str, dialect: SqlDialect) -> Option<Vec<Node>> {
        let key = Self::hash_key(sql, dialect);
        self.cache.get(&key).cloned()
    }

    pub fn insert(&mut self, sql: &str, dialect: SqlDialect, statements: Vec<Node>) {
        // Simple eviction: clear half when full
        if self.cache.len() >= self.max_size {
            let keys: Vec<_> = self.cache.keys().take(self.max_size / 2).copied().collect();
            for key in keys {
                self.cache.remove(&key);
            }
        }

        let key = Self::hash_key(sql, dialect);
        self.cache.insert(key, statements);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Get cached statements or None
pub fn get_cached(sql: &str, dialect: SqlDialect) -> Option<Vec<Node>> {
    STATEMENT_CACHE.read().ok()?.get(sql, dialect)
}

/// Cache parsed statements
pub fn cache_statements(sql: &str, dialect: SqlDialect, statements: Vec<Node>) {
    if let Ok(mut cache) = STATEMENT_CACHE.write() {
        cache.insert(sql, dialect, statements);
    }
}
