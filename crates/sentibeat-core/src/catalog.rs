//! Sample article pool, seed log and source display metadata.
//!
//! The pool is fixed at ten articles that alternate between positive and
//! negative sentiment. The first few seed the log at startup; every tick
//! afterwards draws one article from the whole pool with replacement.

use sentibeat_types::{Article, Event, EventId, Sentiment, Source, SourceId};

use crate::config::FaviconConfig;

/// Errors that can occur when building the article pool or seed log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// An article pool needs at least one article.
    #[error("article pool is empty")]
    EmptyPool,

    /// More seed events requested than the pool holds.
    #[error("seed count {requested} exceeds pool size {available}")]
    SeedTooLarge {
        /// Requested seed count.
        requested: usize,
        /// Articles in the pool.
        available: usize,
    },
}

/// Built-in sample articles: (title, sentiment, source, url).
const SAMPLE_ARTICLES: [ArticleRow; 10] = [
    (
        "GPT-5 rumors: major capability jump",
        Sentiment::Positive,
        SourceId::X,
        "https://example.com/1",
    ),
    (
        "OpenAI safety researchers resign",
        Sentiment::Negative,
        SourceId::Axios,
        "https://example.com/2",
    ),
    (
        "Local LLMs now match GPT-4 on benchmarks",
        Sentiment::Positive,
        SourceId::Reddit,
        "https://example.com/3",
    ),
    (
        "AI job displacement report sparks debate",
        Sentiment::Negative,
        SourceId::Substack,
        "https://example.com/4",
    ),
    (
        "New open-source model hits top of leaderboard",
        Sentiment::Positive,
        SourceId::TechCrunch,
        "https://example.com/5",
    ),
    (
        "Regulators propose strict AI liability rules",
        Sentiment::Negative,
        SourceId::Axios,
        "https://example.com/6",
    ),
    (
        "AI-assisted coding boosts productivity 40%",
        Sentiment::Positive,
        SourceId::Substack,
        "https://example.com/7",
    ),
    (
        "Deepfake scandals prompt new legislation",
        Sentiment::Negative,
        SourceId::Reddit,
        "https://example.com/8",
    ),
    (
        "Multimodal agents go mainstream",
        Sentiment::Positive,
        SourceId::X,
        "https://example.com/9",
    ),
    (
        "Training costs could limit smaller labs",
        Sentiment::Negative,
        SourceId::Arxiv,
        "https://example.com/10",
    ),
];

type ArticleRow = (&'static str, Sentiment, SourceId, &'static str);

fn to_article((title, sentiment, source, url): ArticleRow) -> Article {
    Article {
        title: title.to_owned(),
        url: url.to_owned(),
        source,
        sentiment,
    }
}

/// A non-empty, ordered pool of articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePool {
    first: Article,
    rest: Vec<Article>,
}

impl ArticlePool {
    /// Build a pool from a list of articles.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyPool`] if `articles` is empty.
    pub fn new(articles: Vec<Article>) -> Result<Self, CatalogError> {
        let mut iter = articles.into_iter();
        let first = iter.next().ok_or(CatalogError::EmptyPool)?;
        Ok(Self {
            first,
            rest: iter.collect(),
        })
    }

    /// The pool of built-in sample articles.
    pub fn builtin() -> Self {
        let [first, rest @ ..] = SAMPLE_ARTICLES;
        Self {
            first: to_article(first),
            rest: rest.into_iter().map(to_article).collect(),
        }
    }

    /// Number of articles in the pool (always at least 1).
    pub const fn len(&self) -> usize {
        self.rest.len().saturating_add(1)
    }

    /// Always `false`; present for API symmetry with collections.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Article at `index` in pool order.
    pub fn get(&self, index: usize) -> Option<&Article> {
        match index.checked_sub(1) {
            None => Some(&self.first),
            Some(i) => self.rest.get(i),
        }
    }

    /// The first article. Used as the fallback for any out-of-range pick.
    pub const fn first(&self) -> &Article {
        &self.first
    }

    /// Iterate articles in pool order.
    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// The first `count` articles as seed events with fixed identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SeedTooLarge`] if `count` exceeds the pool.
    pub fn seed_events(&self, count: usize) -> Result<Vec<Event>, CatalogError> {
        if count > self.len() {
            return Err(CatalogError::SeedTooLarge {
                requested: count,
                available: self.len(),
            });
        }
        Ok(self
            .iter()
            .take(count)
            .zip(0_u64..)
            .map(|(article, index)| Event::from_article(article, EventId::seed(index)))
            .collect())
    }
}

/// Favicon image URL for a domain: `<provider>?domain=<domain>&sz=<size>`.
pub fn favicon_url(provider_url: &str, domain: &str, size: u32) -> String {
    format!("{provider_url}?domain={domain}&sz={size}")
}

/// Favicon URL for a source under the given provider settings.
pub fn source_favicon(source: SourceId, favicon: &FaviconConfig) -> String {
    favicon_url(&favicon.provider_url, source.domain(), favicon.size)
}

/// Resolve the display metadata for one source.
pub fn source_info(source: SourceId, favicon: &FaviconConfig) -> Source {
    Source {
        id: source,
        label: source.label().to_owned(),
        color: source.color().to_owned(),
        domain: source.domain().to_owned(),
        favicon_url: source_favicon(source, favicon),
    }
}

/// The whole registry, in legend order.
pub fn all_sources(favicon: &FaviconConfig) -> Vec<Source> {
    SourceId::ALL
        .iter()
        .map(|&id| source_info(id, favicon))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pool_has_ten_articles() {
        let pool = ArticlePool::builtin();
        assert_eq!(pool.len(), 10);
        assert_eq!(pool.first().title, "GPT-5 rumors: major capability jump");
        assert_eq!(pool.get(9).unwrap().source, SourceId::Arxiv);
        assert!(pool.get(10).is_none());
    }

    #[test]
    fn builtin_pool_alternates_sentiment() {
        let pool = ArticlePool::builtin();
        for (i, article) in pool.iter().enumerate() {
            let expected = if i % 2 == 0 {
                Sentiment::Positive
            } else {
                Sentiment::Negative
            };
            assert_eq!(article.sentiment, expected, "article {i}");
        }
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert_eq!(ArticlePool::new(Vec::new()), Err(CatalogError::EmptyPool));
    }

    #[test]
    fn seed_events_use_pool_order_and_fixed_ids() {
        let pool = ArticlePool::builtin();
        let seeds = pool.seed_events(5).unwrap();
        assert_eq!(seeds.len(), 5);
        let signs: Vec<i32> = seeds.iter().map(|e| e.sentiment.value()).collect();
        assert_eq!(signs, vec![1, -1, 1, -1, 1]);
        assert_eq!(seeds[0].id, EventId::seed(0));
        assert_eq!(seeds[4].id, EventId::seed(4));
        assert_eq!(pool.seed_events(5).unwrap(), seeds);
    }

    #[test]
    fn seed_count_cannot_exceed_pool() {
        let pool = ArticlePool::builtin();
        assert_eq!(
            pool.seed_events(11),
            Err(CatalogError::SeedTooLarge {
                requested: 11,
                available: 10
            })
        );
        assert!(pool.seed_events(0).unwrap().is_empty());
    }

    #[test]
    fn favicon_url_format() {
        assert_eq!(
            favicon_url("https://www.google.com/s2/favicons", "arxiv.org", 64),
            "https://www.google.com/s2/favicons?domain=arxiv.org&sz=64"
        );
    }

    #[test]
    fn registry_resolves_all_sources() {
        let favicon = FaviconConfig::default();
        let sources = all_sources(&favicon);
        assert_eq!(sources.len(), 6);
        let techcrunch = sources.iter().find(|s| s.id == SourceId::TechCrunch).unwrap();
        assert_eq!(techcrunch.label, "TechCrunch");
        assert_eq!(techcrunch.color, "#00a562");
        assert!(techcrunch.favicon_url.ends_with("domain=techcrunch.com&sz=64"));
    }
}
