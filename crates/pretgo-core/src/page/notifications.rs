use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Banner severity, named after the flash categories of the loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BannerId(pub u64);

#[derive(Debug, Clone)]
pub struct Banner {
    pub id: BannerId,
    pub level: Level,
    pub message: String,
    pub shown_at: Instant,
}

/// Dismissible banners that close themselves after a fixed lifetime.
#[derive(Debug)]
pub struct BannerQueue {
    ttl: Duration,
    next_id: u64,
    banners: Vec<Banner>,
}

impl BannerQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 0,
            banners: Vec::new(),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>, now: Instant) -> BannerId {
        let id = BannerId(self.next_id);
        self.next_id += 1;
        self.banners.push(Banner {
            id,
            level,
            message: message.into(),
            shown_at: now,
        });
        id
    }

    pub fn dismiss(&mut self, id: BannerId) -> bool {
        let before = self.banners.len();
        self.banners.retain(|b| b.id != id);
        self.banners.len() != before
    }

    /// Drops expired banners; returns how many were closed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.banners.len();
        let ttl = self.ttl;
        self.banners
            .retain(|b| now.saturating_duration_since(b.shown_at) < ttl);
        before - self.banners.len()
    }

    /// Oldest first.
    pub fn visible(&self) -> &[Banner] {
        &self.banners
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}

impl Default for BannerQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}
