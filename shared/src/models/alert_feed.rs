//! Bounded rolling alert feed
//!
//! The dashboard keeps a short, newest-first list of alerts. The feed is owned
//! by whoever displays it; the evaluators never hold on to alerts themselves.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::disaster::DisasterAlert;
use super::hazard::{AlertSeverity, HazardCatalogue};
use super::weather_alert::AlertRecord;

/// Number of alerts the dashboard banner shows at once
pub const DEFAULT_FEED_CAPACITY: usize = 5;

/// Anything that can be shown in an alert feed
pub trait FeedEntry {
    fn id(&self) -> &str;

    /// Hazard type wire name
    fn type_code(&self) -> &str;

    fn location(&self) -> Option<&str>;

    fn severity(&self) -> AlertSeverity;

    fn timestamp(&self) -> DateTime<Utc>;

    /// Two entries with equal keys describe the same ongoing hazard
    fn same_hazard(&self, other: &Self) -> bool {
        self.type_code() == other.type_code() && self.location() == other.location()
    }
}

impl<K: HazardCatalogue> FeedEntry for AlertRecord<K> {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_code(&self) -> &str {
        self.kind.code()
    }

    fn location(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    fn severity(&self) -> AlertSeverity {
        self.severity
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl FeedEntry for DisasterAlert {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_code(&self) -> &str {
        self.kind.code()
    }

    fn location(&self) -> Option<&str> {
        self.affected_regions.first().map(String::as_str)
    }

    fn severity(&self) -> AlertSeverity {
        self.severity
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Rule alerts all report "Local Area", so the point they cover is part of the key
    fn same_hazard(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.location() == other.location()
            && self.coordinates == other.coordinates
    }
}

/// Newest-first list of alerts with a fixed capacity
#[derive(Debug, Clone, Serialize)]
pub struct AlertFeed<T> {
    capacity: usize,
    entries: Vec<T>,
}

impl<T: FeedEntry> Default for AlertFeed<T> {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl<T: FeedEntry> AlertFeed<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Add an alert at the front of the feed.
    ///
    /// Returns `false` and leaves the feed untouched when an alert for the same
    /// hazard type and location is already shown. The oldest alert falls off
    /// once the feed is full.
    pub fn insert(&mut self, entry: T) -> bool {
        if self.capacity == 0 || self.entries.iter().any(|e| e.same_hazard(&entry)) {
            return false;
        }
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        true
    }

    /// Insert several alerts in order, returning how many were accepted
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, entries: I) -> usize {
        entries
            .into_iter()
            .map(|entry| self.insert(entry))
            .filter(|inserted| *inserted)
            .count()
    }

    /// Remove an alert by id
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        self.entries.len() != before
    }

    /// Drop alerts older than `ttl` relative to `now`, returning how many went
    pub fn expire(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| now - e.timestamp() <= ttl);
        before - self.entries.len()
    }

    pub fn highest_severity(&self) -> Option<AlertSeverity> {
        self.entries.iter().map(FeedEntry::severity).max()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
