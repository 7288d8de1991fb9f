//! Rate feed decoding.
//!
//! The feed is an XML envelope holding `Cube` elements. Two schema
//! versions have been published:
//!
//! ```text
//! nested (v2, live):  Envelope > Cube > Cube[time] > Cube[currency, rate]
//! flat   (v1):        Envelope > Cube > Cube[currency, rate]
//! ```
//!
//! The parser is configured for one of them, or for `Auto` which accepts
//! rate entries at either depth.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{FxError, FxResult};

const ROOT_ELEMENT: &[u8] = b"Envelope";
const CUBE_ELEMENT: &[u8] = b"Cube";

/// Which schema version of the feed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedShape {
    /// Rate entries sit inside a dated day cube.
    #[default]
    Nested,
    /// Rate entries sit directly inside the outer cube.
    Flat,
    /// Accept entries at either depth.
    Auto,
}

impl FeedShape {
    /// Whether a rate entry found at this cube depth belongs to the feed.
    fn accepts(&self, cube_depth: usize) -> bool {
        match self {
            FeedShape::Nested => cube_depth == 3,
            FeedShape::Flat => cube_depth == 2,
            FeedShape::Auto => cube_depth == 2 || cube_depth == 3,
        }
    }
}

impl fmt::Display for FeedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeedShape::Nested => "nested",
            FeedShape::Flat => "flat",
            FeedShape::Auto => "auto",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for FeedShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nested" => Ok(FeedShape::Nested),
            "flat" => Ok(FeedShape::Flat),
            "auto" => Ok(FeedShape::Auto),
            other => Err(format!("Unknown feed shape: {}", other)),
        }
    }
}

/// One `(currency, rate)` pair as it appears in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateFeedEntry {
    /// Currency code attribute.
    pub currency: String,
    /// Rate attribute, undecoded.
    pub rate: String,
}

impl RateFeedEntry {
    /// Create a new entry.
    pub fn new(currency: impl Into<String>, rate: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            rate: rate.into(),
        }
    }

    /// Decode the rate text. Only finite, strictly positive rates are usable.
    pub fn parse_rate(&self) -> FxResult<f64> {
        let rate: f64 = self.rate.trim().parse().map_err(|_| FxError::EntryParse {
            currency: self.currency.clone(),
            reason: format!("rate '{}' is not a number", self.rate),
        })?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(FxError::EntryParse {
                currency: self.currency.clone(),
                reason: format!("rate '{}' is not a positive finite number", self.rate),
            });
        }

        Ok(rate)
    }
}

/// A decoded feed document.
#[derive(Debug, Clone, Default)]
pub struct RateFeed {
    /// Date of the day cube, when the feed carries one.
    pub as_of: Option<NaiveDate>,
    /// Rate entries in document order.
    pub entries: Vec<RateFeedEntry>,
}

/// Decodes rate feed documents into flat entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateFeedParser {
    shape: FeedShape,
}

impl RateFeedParser {
    /// Create a parser for the given schema version.
    pub fn new(shape: FeedShape) -> Self {
        Self { shape }
    }

    /// Decode a feed document.
    ///
    /// Fails with [`FxError::FeedFormat`] when the document is not well-formed
    /// XML, has the wrong root element, or holds no rate entries at the
    /// configured depth. Entries with undecodable rate text are kept here and
    /// dropped later when the rate table is built.
    pub fn parse(&self, document: &[u8]) -> FxResult<RateFeed> {
        let mut reader = Reader::from_reader(document);
        let mut buf = Vec::new();
        let mut open: Vec<Vec<u8>> = Vec::new();
        let mut seen_root = false;
        let mut feed = RateFeed::default();
        let mut misplaced = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    Self::check_root(&open, &mut seen_root, &name)?;
                    if name == CUBE_ELEMENT {
                        let depth = cube_depth(&open) + 1;
                        misplaced += self.visit_cube(&e, depth, &mut feed)?;
                    }
                    open.push(name);
                }
                Ok(Event::Empty(e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    Self::check_root(&open, &mut seen_root, &name)?;
                    if name == CUBE_ELEMENT {
                        let depth = cube_depth(&open) + 1;
                        misplaced += self.visit_cube(&e, depth, &mut feed)?;
                    }
                }
                Ok(Event::End(_)) => {
                    open.pop();
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(FxError::FeedFormat(format!(
                        "at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
            }
            buf.clear();
        }

        if !seen_root {
            return Err(FxError::FeedFormat("document is empty".to_string()));
        }
        if !open.is_empty() {
            return Err(FxError::FeedFormat(
                "unexpected end of document".to_string(),
            ));
        }
        if feed.entries.is_empty() {
            return Err(FxError::FeedFormat(format!(
                "no rate entries found for {} feed shape ({} at other depths)",
                self.shape, misplaced
            )));
        }

        debug!(
            entries = feed.entries.len(),
            misplaced,
            as_of = ?feed.as_of,
            "Decoded rate feed"
        );

        Ok(feed)
    }

    fn check_root(open: &[Vec<u8>], seen_root: &mut bool, name: &[u8]) -> FxResult<()> {
        if !open.is_empty() {
            return Ok(());
        }
        if *seen_root {
            return Err(FxError::FeedFormat(
                "content after the root element".to_string(),
            ));
        }
        if name != ROOT_ELEMENT {
            return Err(FxError::FeedFormat(format!(
                "expected root element Envelope, found {}",
                String::from_utf8_lossy(name)
            )));
        }
        *seen_root = true;
        Ok(())
    }

    /// Record a cube element. Returns 1 if it was a rate entry at a depth
    /// this shape does not accept.
    fn visit_cube(&self, e: &BytesStart<'_>, depth: usize, feed: &mut RateFeed) -> FxResult<usize> {
        if feed.as_of.is_none() {
            if let Some(time) = attribute(e, b"time")? {
                feed.as_of = NaiveDate::parse_from_str(time.trim(), "%Y-%m-%d").ok();
            }
        }

        let Some(currency) = attribute(e, b"currency")? else {
            return Ok(0);
        };

        if !self.shape.accepts(depth) {
            debug!(currency = %currency, depth, "Ignoring rate entry at unexpected depth");
            return Ok(1);
        }

        let rate = attribute(e, b"rate")?.unwrap_or_default();
        feed.entries.push(RateFeedEntry::new(currency, rate));
        Ok(0)
    }
}

fn cube_depth(open: &[Vec<u8>]) -> usize {
    open.iter().filter(|name| name.as_slice() == CUBE_ELEMENT).count()
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> FxResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| FxError::FeedFormat(err.to_string()))?;
        if attr.key.local_name().as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| FxError::FeedFormat(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
