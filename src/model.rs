// Core structs: NormalizedReview, ListingResult, InputSpec and the error types
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::path::PathBuf;
use thiserror::Error;

/// The host side of a review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewee {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
}

/// The guest who wrote a review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub localized_reviewer_location: Option<String>,
}

/// A review in the output contract. Every field is always serialized,
/// absent values as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReview {
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub reviewee: Reviewee,
    #[serde(default)]
    pub reviewer: Reviewer,
    #[serde(default)]
    pub rating: Option<Number>,
    #[serde(default)]
    pub localized_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewList {
    #[serde(default)]
    pub reviews: Vec<NormalizedReview>,
}

/// All reviews collected for one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResult {
    pub roomid: String,
    #[serde(default)]
    pub count: usize,
    #[serde(rename = "Reviews", default)]
    pub reviews: ReviewList,
}

impl ListingResult {
    pub fn new(roomid: impl Into<String>, reviews: Vec<NormalizedReview>) -> Self {
        Self {
            roomid: roomid.into(),
            count: reviews.len(),
            reviews: ReviewList { reviews },
        }
    }

    pub fn empty(roomid: impl Into<String>) -> Self {
        Self::new(roomid, Vec::new())
    }
}

/// Validated contents of the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    pub roomids: Vec<String>,
    pub limit_per_listing: u32,
}

pub const DEFAULT_LIMIT_PER_LISTING: u32 = 20;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream responded with HTTP {status}")]
    Status { status: u16 },
    #[error("could not decode upstream payload: {0}")]
    Decode(String),
    #[error("mock fixture unusable: {0}")]
    Fixture(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input JSON must be an object")]
    NotAnObject,
    #[error("input JSON must contain a 'roomids' array")]
    MissingRoomIds,
    #[error("input JSON must contain non-empty 'roomids' array")]
    EmptyRoomIds,
    #[error("room id at position {index} must be a string or a number, got {found}")]
    InvalidRoomId { index: usize, found: String },
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {0}")]
    NotFound(PathBuf),
    #[error(transparent)]
    File(#[from] FileError),
}
