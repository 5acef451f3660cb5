//! Enumeration types for the Sentibeat timeline.
//!
//! [`SourceId`] doubles as the static source registry: each variant carries
//! its display label, color and domain. [`Sentiment`] is the per-event
//! polarity and serializes as the integer `1` or `-1`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// One of the six known publication sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SourceId {
    /// reddit.com
    Reddit,
    /// x.com
    X,
    /// substack.com
    Substack,
    /// axios.com
    Axios,
    /// techcrunch.com
    TechCrunch,
    /// arxiv.org
    Arxiv,
}

impl SourceId {
    /// Every registered source, in legend order.
    pub const ALL: [Self; 6] = [
        Self::Reddit,
        Self::X,
        Self::Substack,
        Self::Axios,
        Self::TechCrunch,
        Self::Arxiv,
    ];

    /// Stable lowercase identifier, identical to the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reddit => "reddit",
            Self::X => "x",
            Self::Substack => "substack",
            Self::Axios => "axios",
            Self::TechCrunch => "techcrunch",
            Self::Arxiv => "arxiv",
        }
    }

    /// Human-readable label shown in the feed and legend.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reddit => "Reddit",
            Self::X => "X",
            Self::Substack => "Substack",
            Self::Axios => "Axios",
            Self::TechCrunch => "TechCrunch",
            Self::Arxiv => "arXiv",
        }
    }

    /// CSS color used for the legend swatch.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Reddit => "#ff4500",
            Self::X => "#000",
            Self::Substack => "#ff6719",
            Self::Axios => "#008fd5",
            Self::TechCrunch => "#00a562",
            Self::Arxiv => "#b31b1b",
        }
    }

    /// Domain used to resolve the favicon.
    pub const fn domain(self) -> &'static str {
        match self {
            Self::Reddit => "reddit.com",
            Self::X => "x.com",
            Self::Substack => "substack.com",
            Self::Axios => "axios.com",
            Self::TechCrunch => "techcrunch.com",
            Self::Arxiv => "arxiv.org",
        }
    }
}

impl core::fmt::Display for SourceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Returned when a sentiment value other than `1` or `-1` is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid sentiment {0}: expected 1 or -1")]
pub struct InvalidSentiment(pub i8);

/// Polarity of a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Sentiment {
    /// Counts `+1` toward the running score.
    Positive,
    /// Counts `-1` toward the running score.
    Negative,
}

impl Sentiment {
    /// Signed contribution to the cumulative score.
    pub const fn value(self) -> i32 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    /// Whether this is [`Sentiment::Positive`].
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }

    /// Whether this is [`Sentiment::Negative`].
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Negative)
    }
}

impl From<Sentiment> for i8 {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Positive => 1,
            Sentiment::Negative => -1,
        }
    }
}

impl TryFrom<i8> for Sentiment {
    type Error = InvalidSentiment;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Positive),
            -1 => Ok(Self::Negative),
            other => Err(InvalidSentiment(other)),
        }
    }
}
