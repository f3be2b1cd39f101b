//! Share codes: a whole score, packed into the last path segment of a score page URL.
//!
//! Layout is a version byte (`0`) followed by a [bincode] record, the whole thing in
//! URL-safe base64 without padding. This has to stay stable, links are already out there.

use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use bincode::error::{DecodeError, EncodeError};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use url::Url;

use crate::score::{Category, Score, ScoreSnapshot};

const VERSION: u8 = 0;

/// Accepted player name lengths, in bytes.
const NAME_LEN: std::ops::RangeInclusive<usize> = 1..=50;

#[derive(Debug, thiserror::Error)]
pub enum ShareCodeError {
    #[error("player name must be 1 to 50 bytes long, got {0}")]
    NameLength(usize),

    #[error("couldn't encode score: {0}")]
    Encode(#[from] EncodeError),

    #[error("share code isn't valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unknown share code version {0}")]
    Version(u8),

    #[error("share code is empty")]
    Empty,

    #[error("couldn't decode score: {0}")]
    Decode(#[from] DecodeError),

    #[error("share code has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("share code timestamp {0} is out of range")]
    Timestamp(i64),

    #[error("base url {0} can't take a path")]
    BaseUrl(Url),
}

/// Wire record for version 0.
///
/// Field order is part of the format. bincode uses varints, so integer widths don't
/// change the size much.
#[derive(Debug, bincode::Encode, bincode::Decode)]
struct RecordV0 {
    /// Unix timestamp in minutes
    timestamp: i64,

    trashness: i32,
    sex: i32,
    alcohol: i32,
    drugs: i32,

    player_name: String,
}

/// A score as published under a share link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedScore {
    pub player_name: String,
    pub score: Score,
    pub shared_at: DateTime<Utc>,
}

impl SharedScore {
    pub fn new(player_name: impl Into<String>, score: Score, shared_at: DateTime<Utc>) -> Self {
        Self {
            player_name: player_name.into(),
            score,
            shared_at,
        }
    }

    /// Shared now, as far as the clock is concerned.
    pub fn now(player_name: impl Into<String>, score: Score) -> Self {
        Self::new(player_name, score, Utc::now())
    }

    /// `shared_at` at the precision a share code keeps.
    pub fn shared_at_minute(&self) -> DateTime<Utc> {
        self.shared_at
            .duration_trunc(TimeDelta::minutes(1))
            .unwrap_or(self.shared_at)
    }

    #[tracing::instrument(skip_all, fields(player_name = %self.player_name))]
    pub fn encode(&self) -> Result<String, ShareCodeError> {
        let name_len = self.player_name.len();
        if !NAME_LEN.contains(&name_len) {
            tracing::warn!(name_len, "rejecting player name");
            return Err(ShareCodeError::NameLength(name_len));
        }

        let record = RecordV0 {
            timestamp: self.shared_at.timestamp().div_euclid(60),
            trashness: self.score[Category::Trashness],
            sex: self.score[Category::Sex],
            alcohol: self.score[Category::Alcohol],
            drugs: self.score[Category::Drugs],
            player_name: self.player_name.clone(),
        };

        let mut raw = vec![VERSION];
        raw.extend(bincode::encode_to_vec(record, bincode::config::standard())?);

        let code = BASE64_URL_SAFE_NO_PAD.encode(raw);
        tracing::debug!(%code, "encoded share code");

        Ok(code)
    }

    #[tracing::instrument]
    pub fn decode(code: &str) -> Result<Self, ShareCodeError> {
        let raw = BASE64_URL_SAFE_NO_PAD.decode(code)?;

        let (version, body) = raw.split_first().ok_or(ShareCodeError::Empty)?;
        if *version != VERSION {
            return Err(ShareCodeError::Version(*version));
        }

        let (record, read): (RecordV0, usize) =
            bincode::decode_from_slice(body, bincode::config::standard())?;
        if read != body.len() {
            return Err(ShareCodeError::TrailingBytes(body.len() - read));
        }
        tracing::trace!(?record);

        let shared_at = record
            .timestamp
            .checked_mul(60)
            .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
            .ok_or(ShareCodeError::Timestamp(record.timestamp))?;

        Ok(Self {
            player_name: record.player_name,
            score: Score::new(record.trashness, record.sex, record.alcohol, record.drugs),
            shared_at,
        })
    }

    /// The score page for this share, under `base_url`.
    pub fn share_url(&self, base_url: &Url) -> Result<Url, ShareCodeError> {
        let code = self.encode()?;

        let mut url = base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ShareCodeError::BaseUrl(base_url.clone()))?
            .pop_if_empty()
            .extend(["score", code.as_str()]);

        Ok(url)
    }
}

impl From<&SharedScore> for ScoreSnapshot {
    fn from(shared: &SharedScore) -> Self {
        Self::from((shared.player_name.as_str(), shared.score))
    }
}
