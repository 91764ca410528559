/// Domain models for the application
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[serde(other)]
    Other,
}

/// One day's APOD entry, normalized from the upstream body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub date: NaiveDate,
    pub title: String,
    pub explanation: String,
    pub media_type: MediaType,
    /// Absent on some `other` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// Which upstream record(s) to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApodSelector {
    Today,
    OnDate(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl ApodSelector {
    /// Selector-specific query parameters, excluding credentials
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            ApodSelector::Today => Vec::new(),
            ApodSelector::OnDate(date) => vec![("date", date.to_string())],
            ApodSelector::Range { start, end } => vec![
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
            ],
        }
    }
}

/// Adapter result: a bare record, or a newest-first sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApodPayload {
    Single(MediaRecord),
    Many(Vec<MediaRecord>),
}

impl ApodPayload {
    /// Gallery view of the payload; single records become one-element sequences
    pub fn into_records(self) -> Vec<MediaRecord> {
        match self {
            ApodPayload::Single(record) => vec![record],
            ApodPayload::Many(records) => records,
        }
    }
}

/// Pushed event body, tagged with the `type` the page switches on
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    #[serde(rename = "connection")]
    Connected { message: String },
    ApodUpdate { data: ApodPayload },
    GalleryUpdate { data: Vec<MediaRecord> },
    NewFact { fact: String },
}

/// Envelope written to every live viewer channel
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl BroadcastEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn connected(message: impl Into<String>) -> Self {
        Self::new(EventKind::Connected {
            message: message.into(),
        })
    }

    pub fn apod_update(data: ApodPayload) -> Self {
        Self::new(EventKind::ApodUpdate { data })
    }

    pub fn gallery_update(data: Vec<MediaRecord>) -> Self {
        Self::new(EventKind::GalleryUpdate { data })
    }

    pub fn new_fact(fact: impl Into<String>) -> Self {
        Self::new(EventKind::NewFact { fact: fact.into() })
    }
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub connected_clients: usize,
}
