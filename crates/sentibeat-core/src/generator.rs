//! Synthetic event generation.
//!
//! Each tick the engine asks its [`EventGenerator`] for exactly one new
//! event. The production generator picks uniformly from the article pool
//! with replacement and stamps the pick with a fresh identifier; both draws
//! come from the same RNG, so a seeded RNG replays the same stream.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sentibeat_types::{Event, EventId};

use crate::catalog::ArticlePool;

/// A source of new timeline events.
pub trait EventGenerator {
    /// Produce the next event. Must always succeed.
    fn next_event(&mut self) -> Event;
}

/// Pick one article from `pool` and stamp it with a random identifier.
pub fn generate_event<R: Rng>(pool: &ArticlePool, rng: &mut R) -> Event {
    let index = rng.random_range(0..pool.len());
    let article = pool.get(index).unwrap_or_else(|| pool.first());
    Event::from_article(article, EventId::from_random_bytes(rng.random()))
}

/// Uniform random generator over an [`ArticlePool`].
#[derive(Debug, Clone)]
pub struct RandomEventGenerator<R = SmallRng> {
    pool: ArticlePool,
    rng: R,
}

impl<R: Rng> RandomEventGenerator<R> {
    /// Create a generator with an explicit RNG.
    pub const fn with_rng(pool: ArticlePool, rng: R) -> Self {
        Self { pool, rng }
    }

    /// The pool this generator draws from.
    pub const fn pool(&self) -> &ArticlePool {
        &self.pool
    }
}

impl RandomEventGenerator<SmallRng> {
    /// Create a generator, seeded for reproducible runs or from OS entropy.
    pub fn new(pool: ArticlePool, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        Self { pool, rng }
    }
}

impl<R: Rng> EventGenerator for RandomEventGenerator<R> {
    fn next_event(&mut self) -> Event {
        generate_event(&self.pool, &mut self.rng)
    }
}

/// Replays a fixed sequence of articles in order, cycling at the end.
///
/// Handy for deterministic demos and tests. Events are stamped with
/// [`EventId::scripted`] identifiers, which never collide with seed ones.
#[derive(Debug, Clone)]
pub struct ScriptedEventGenerator {
    pool: ArticlePool,
    cursor: usize,
    issued: u64,
}

impl ScriptedEventGenerator {
    /// Cycle through `pool` in order.
    pub const fn new(pool: ArticlePool) -> Self {
        Self {
            pool,
            cursor: 0,
            issued: 0,
        }
    }
}

impl EventGenerator for ScriptedEventGenerator {
    fn next_event(&mut self) -> Event {
        let article = self.pool.get(self.cursor).unwrap_or_else(|| self.pool.first());
        let id = EventId::scripted(self.issued);
        self.cursor = self.cursor.saturating_add(1).checked_rem(self.pool.len()).unwrap_or(0);
        self.issued = self.issued.saturating_add(1);
        Event::from_article(article, id)
    }
}
