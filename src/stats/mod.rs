//! Corpus-wide usage statistics, computed once after loading.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::Conversation;

/// Histogram key for messages with no usable timestamp.
pub const UNKNOWN_MONTH: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    pub conversation_count: usize,
    pub corrupt_count: usize,
    pub message_count: usize,
    pub role_counts: BTreeMap<String, usize>,
    /// Messages per model slug, for messages that record one.
    pub model_usage: BTreeMap<String, usize>,
    /// Messages per `YYYY-MM`. Values sum to `message_count`.
    pub monthly_activity: BTreeMap<String, usize>,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

impl UsageStats {
    pub fn compute(conversations: &[Conversation], corrupt_count: usize) -> Self {
        let mut stats = Self {
            conversation_count: conversations.len(),
            corrupt_count,
            message_count: 0,
            role_counts: BTreeMap::new(),
            model_usage: BTreeMap::new(),
            monthly_activity: BTreeMap::new(),
            earliest: None,
            latest: None,
        };

        for conversation in conversations {
            let started = conversation.create_time.or(conversation.update_time);
            if let Some(started) = started {
                stats.earliest = Some(stats.earliest.map_or(started, |e| e.min(started)));
                stats.latest = Some(stats.latest.map_or(started, |l| l.max(started)));
            }

            for message in &conversation.messages {
                stats.message_count += 1;
                *stats.role_counts.entry(message.role.as_str().to_string()).or_insert(0) += 1;
                if let Some(model) = &message.model_slug {
                    *stats.model_usage.entry(model.clone()).or_insert(0) += 1;
                }
                let bucket = message.create_time.or(started).map(month_key);
                let bucket = bucket.unwrap_or_else(|| UNKNOWN_MONTH.to_string());
                *stats.monthly_activity.entry(bucket).or_insert(0) += 1;
            }
        }

        stats
    }
}

fn month_key(timestamp: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", timestamp.year(), timestamp.month())
}
