use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use moka::future::Cache;
use sqlx::SqlitePool;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use crate::error::ApiError;

/// Expected capacity and false-positive rate.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Fast "is this email already registered" answers for signup.
///
/// The cuckoo filter gives a cheap negative, the moka cache a cheap positive,
/// and the database decides everything in between. Emails are never removed
/// from the users table, so positives never go stale.
pub struct EmailRegistry {
    filter: RwLock<CuckooFilter<String>>,
    taken: Cache<String, ()>,
}

impl Default for EmailRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl EmailRegistry {
    pub fn new() -> Self {
        Self {
            filter: RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)),
            taken: Cache::builder()
                .max_capacity(500_000)
                .time_to_live(Duration::from_secs(86400))
                .build(),
        }
    }

    fn might_exist(&self, email: &String) -> bool {
        self.filter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(email)
    }

    /// Mark a single email as taken
    pub async fn remember(&self, email: &str) {
        let email = normalize(email);
        self.filter
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(&email);
        self.taken.insert(email, ()).await;
    }

    /// true  => email AVAILABLE
    /// false => email TAKEN
    pub async fn is_available(&self, email: &str, pool: &SqlitePool) -> Result<bool, ApiError> {
        let email = normalize(email);

        // 1. filter says never seen: definitely free
        if !self.might_exist(&email) {
            return Ok(true);
        }

        // 2. cache hit: definitely taken
        if self.taken.get(&email).await.is_some() {
            return Ok(false);
        }

        // 3. database fallback
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)",
        )
        .bind(&email)
        .fetch_one(pool)
        .await?
            != 0;

        if exists {
            self.taken.insert(email, ()).await;
        }
        Ok(!exists)
    }

    /// Warm up filter and cache from the users table, streaming in batches.
    pub async fn warmup(&self, pool: &SqlitePool, batch_size: usize) -> Result<()> {
        let mut stream = sqlx::query_scalar::<_, String>("SELECT email FROM users").fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0usize;

        while let Some(row) = stream.next().await {
            let email = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;
            batch.push(normalize(&email));
            total += 1;

            if batch.len() == batch_size {
                self.insert_batch(&batch).await;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.insert_batch(&batch).await;
        }

        log::info!("Email registry warmup complete: {} users", total);
        Ok(())
    }

    /// Insert a batch of normalized emails
    async fn insert_batch(&self, emails: &[String]) {
        {
            let mut filter = self.filter.write().unwrap_or_else(PoisonError::into_inner);
            for email in emails {
                filter.add(email);
            }
        }

        let inserts: Vec<_> = emails
            .iter()
            .map(|e| self.taken.insert(e.clone(), ()))
            .collect();
        futures::future::join_all(inserts).await;
    }
}
