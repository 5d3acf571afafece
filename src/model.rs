// src/model.rs
//! Wire types for the tracker backend. All of them are read-only copies of
//! backend-owned records; timestamps stay as strings and are parsed at
//! display time so one bad value cannot sink a whole listing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source: String,
    /// "positive" | "negative" | "neutral"; `None` while still being scored.
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub fetched_at: Option<String>,
}

/// The subset of a mention the alerts endpoint embeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMention {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Absent on some streamed payloads.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub alert_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Set on streamed alerts (first 200 chars of the mention).
    #[serde(default)]
    pub mention_text: Option<String>,
    /// Set on polled alerts.
    #[serde(default)]
    pub mention: Option<AlertMention>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub resolved: Option<bool>,
}

impl Alert {
    /// Text of the related mention, whichever channel delivered it.
    pub fn related_mention(&self) -> Option<&str> {
        self.mention_text
            .as_deref()
            .or_else(|| self.mention.as_ref().map(|m| m.text.as_str()))
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub last_24h: u64,
    #[serde(default)]
    pub last_7d: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub negative: u64,
    #[serde(default)]
    pub neutral: u64,
}

impl SentimentCounts {
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub unresolved: u64,
    #[serde(default)]
    pub recent_24h: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    /// Hour of day, 0..=23.
    pub hour: u32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCount {
    #[serde(default)]
    pub topic: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCount {
    #[serde(default)]
    pub source: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub mentions: MentionCounts,
    #[serde(default)]
    pub sentiment: SentimentCounts,
    #[serde(default)]
    pub alerts: AlertCounts,
    #[serde(default)]
    pub hourly_mentions: Vec<HourBucket>,
    #[serde(default)]
    pub topics: Vec<TopicCount>,
    #[serde(default)]
    pub sources: Vec<SourceCount>,
}

/// List endpoints answer either a bare array or a paginated object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Paged {
        #[serde(default = "Vec::new")]
        results: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(v) => v,
            Listing::Paged { results } => results,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartFetchRequest {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartFetchResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_accepts_both_shapes() {
        let bare: Listing<TopicCount> =
            serde_json::from_value(json!([{ "topic": "pricing", "count": 3 }])).unwrap();
        assert_eq!(bare.into_vec().len(), 1);

        let paged: Listing<TopicCount> = serde_json::from_value(json!({
            "count": 1,
            "results": [{ "topic": null, "count": 2 }]
        }))
        .unwrap();
        let v = paged.into_vec();
        assert_eq!(v[0].topic, None);
        assert_eq!(v[0].count, 2);

        let empty: Listing<TopicCount> = serde_json::from_value(json!({ "detail": "x" })).unwrap();
        assert!(empty.into_vec().is_empty());
    }

    #[test]
    fn streamed_alert_without_id_or_timestamp_parses() {
        let a: Alert = serde_json::from_str(
            r#"{"alert_type":"negative_spike","description":"5 negative mentions in last 10 minutes","mention_text":"bad service"}"#,
        )
        .unwrap();
        assert_eq!(a.id, None);
        assert_eq!(a.created_at, None);
        assert_eq!(a.related_mention(), Some("bad service"));
    }

    #[test]
    fn polled_alert_falls_back_to_nested_mention() {
        let a: Alert = serde_json::from_value(json!({
            "id": 7,
            "alert_type": "negative_spike",
            "description": null,
            "resolved": false,
            "created_at": "2025-09-06T09:00:00.000000Z",
            "mention": { "id": 3, "text": "terrible update", "source": "rss" }
        }))
        .unwrap();
        assert_eq!(a.related_mention(), Some("terrible update"));
        assert_eq!(a.resolved, Some(false));
    }

    #[test]
    fn stats_tolerate_missing_sections() {
        let s: DashboardStats = serde_json::from_value(json!({
            "mentions": { "total": 10, "last_24h": 4 },
            "sentiment": { "positive": 1, "negative": 2, "neutral": 3 },
            "alerts": { "unresolved": 1, "recent_24h": 1 },
            "hourly_mentions": [{ "hour": 13, "count": 2 }]
        }))
        .unwrap();
        assert_eq!(s.sentiment.total(), 6);
        assert!(s.topics.is_empty());
        assert!(s.sources.is_empty());
    }
}
