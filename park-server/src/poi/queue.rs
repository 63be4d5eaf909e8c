//! Queue Randomizer
//!
//! Periodically re-rolls every POI's current queue length and emits one
//! invalidation signal per batch so connected clients refetch. The
//! randomization policy is a pure function; the timer shell only applies
//! its output and notifies.

use rand::Rng;
use sqlx::SqlitePool;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use shared::message::BusMessage;

use crate::db::repository::poi as poi_repo;
use crate::message::MessageBus;

/// Upper bound for a rolled queue length, in minutes (inclusive)
pub const MAX_QUEUE_MINUTES: i64 = 30;

/// Roll a fresh queue length for every id: uniform in
/// `[0, MAX_QUEUE_MINUTES]`, independent of the previous value
/// (no smoothing, no correlation).
pub fn next_queue_lengths<R: Rng>(rng: &mut R, pois: &[(String, i64)]) -> Vec<(String, i64)> {
    pois.iter()
        .map(|(id, _)| (id.clone(), rng.gen_range(0..=MAX_QUEUE_MINUTES)))
        .collect()
}

/// Timer-driven queue mutation + invalidation broadcast
pub struct QueueRandomizer {
    pool: SqlitePool,
    bus: MessageBus,
    interval: Duration,
}

impl QueueRandomizer {
    pub fn new(pool: SqlitePool, bus: MessageBus, interval: Duration) -> Self {
        Self {
            pool,
            bus,
            interval,
        }
    }

    /// Run until the shutdown token fires. Each tick is independent; a
    /// failed tick never kills the timer.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // tokio intervals fire immediately; swallow the first tick so the
        // initial roll happens one full interval after startup
        ticker.tick().await;

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Queue randomizer started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Queue randomizer shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One randomization pass over the whole store.
    pub async fn tick(&self) {
        let projection = match poi_repo::queue_projection(&self.pool).await {
            Ok(projection) => projection,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read queue projection, skipping tick");
                return;
            }
        };

        let updates = {
            let mut rng = rand::thread_rng();
            next_queue_lengths(&mut rng, &projection)
        };

        self.apply_and_notify(updates).await;
    }

    /// Persist each update (failures are logged and skipped, the rest of
    /// the batch proceeds), then emit exactly one invalidation signal,
    /// unconditionally. Readers must tolerate a signal that does not
    /// guarantee every POI actually changed.
    pub async fn apply_and_notify(&self, updates: Vec<(String, i64)>) -> usize {
        let total = updates.len();
        let mut updated = 0;
        for (id, minutes) in updates {
            match poi_repo::set_queue_length(&self.pool, &id, minutes).await {
                Ok(()) => updated += 1,
                Err(e) => {
                    tracing::warn!(poi_id = %id, error = %e, "Failed to update queue length, skipping");
                }
            }
        }

        tracing::debug!(updated, total, "Queue lengths re-rolled");
        self.bus.publish(BusMessage::queue_update());
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn projection(ids: &[&str]) -> Vec<(String, i64)> {
        ids.iter().map(|id| (id.to_string(), 99)).collect()
    }

    #[test]
    fn test_rolled_values_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let pois = projection(&["x", "y", "z"]);
        for _ in 0..100 {
            for (_, minutes) in next_queue_lengths(&mut rng, &pois) {
                assert!((0..=MAX_QUEUE_MINUTES).contains(&minutes));
            }
        }
    }

    #[test]
    fn test_every_poi_gets_a_value() {
        let mut rng = StdRng::seed_from_u64(7);
        let pois = projection(&["x", "y", "z"]);
        let updates = next_queue_lengths(&mut rng, &pois);
        let ids: Vec<&str> = updates.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_previous_value_is_ignored() {
        // same rng seed, wildly different previous values → same output
        let with_high = projection(&["x", "y"]);
        let with_zero: Vec<(String, i64)> =
            with_high.iter().map(|(id, _)| (id.clone(), 0)).collect();

        let a = next_queue_lengths(&mut StdRng::seed_from_u64(42), &with_high);
        let b = next_queue_lengths(&mut StdRng::seed_from_u64(42), &with_zero);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_projection_yields_empty_batch() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(next_queue_lengths(&mut rng, &[]).is_empty());
    }
}
