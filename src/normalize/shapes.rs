//! Rank payload shapes observed from the upstream API.
//!
//! Each extractor knows where one shape keeps its rank record. Field names
//! inside a located record are shared across shapes and read by
//! `PartialRank::from_record`.

use serde_json::{Map, Value};

/// Fields pulled out of a rank payload before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRank {
    pub tier: Option<String>,
    pub rating_points: Option<i64>,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub icon_url: Option<String>,
}

impl PartialRank {
    /// Read the known field aliases from a single rank record.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            tier: tier_of(record),
            rating_points: first_int(record, &["ranking_in_tier", "leaguePoints", "rr", "lp"]),
            wins: first_int(record, &["wins"]),
            losses: first_int(record, &["losses"]),
            icon_url: icon_of(record),
        }
    }
}

/// One way of locating a rank record inside a raw payload.
pub trait ShapeExtractor: Send + Sync {
    /// Shape name for logging.
    fn name(&self) -> &'static str;

    /// Extract the record, or `None` if the payload is not this shape.
    fn extract(&self, raw: &Value) -> Option<PartialRank>;
}

/// A list of rank entries, either the body itself or under `entries`/`data`.
/// The first entry wins.
pub struct ListShape;

impl ShapeExtractor for ListShape {
    fn name(&self) -> &'static str {
        "list"
    }

    fn extract(&self, raw: &Value) -> Option<PartialRank> {
        let list = match raw {
            Value::Array(items) => items,
            Value::Object(obj) => ["entries", "data"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_array))?,
            _ => return None,
        };

        let first = list.first()?;
        Some(
            first
                .as_object()
                .map(PartialRank::from_record)
                .unwrap_or_default(),
        )
    }
}

/// A single MMR object under `data` carrying `currenttierpatched`.
pub struct MmrDataShape;

impl ShapeExtractor for MmrDataShape {
    fn name(&self) -> &'static str {
        "mmr-data"
    }

    fn extract(&self, raw: &Value) -> Option<PartialRank> {
        let data = raw.get("data")?.as_object()?;
        if !data.contains_key("currenttierpatched") {
            return None;
        }
        Some(PartialRank::from_record(data))
    }
}

/// A nested "current season" container: `data.current_data`, `data.current`
/// or a top-level `current_data`.
pub struct CurrentDataShape;

impl ShapeExtractor for CurrentDataShape {
    fn name(&self) -> &'static str {
        "current-data"
    }

    fn extract(&self, raw: &Value) -> Option<PartialRank> {
        let container = ["/data/current_data", "/data/current", "/current_data"]
            .iter()
            .find_map(|ptr| raw.pointer(ptr).and_then(Value::as_object))?;
        Some(PartialRank::from_record(container))
    }
}

/// The extractors in the order they are tried.
pub fn default_extractors() -> Vec<Box<dyn ShapeExtractor>> {
    vec![
        Box::new(ListShape),
        Box::new(MmrDataShape),
        Box::new(CurrentDataShape),
    ]
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn tier_of(record: &Map<String, Value>) -> Option<String> {
    for key in ["currenttierpatched", "tier_patched"] {
        if let Some(tier) = record.get(key).and_then(Value::as_str).and_then(non_blank) {
            return Some(tier);
        }
    }

    match record.get("tier") {
        // League entries split the division into `rank`
        Some(Value::String(tier)) => {
            let tier = non_blank(tier)?;
            match record.get("rank").and_then(Value::as_str).and_then(non_blank) {
                Some(rank) => Some(format!("{} {}", tier, rank)),
                None => Some(tier),
            }
        }
        Some(Value::Object(obj)) => obj.get("name").and_then(Value::as_str).and_then(non_blank),
        _ => None,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn first_int(record: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| record.get(*key).and_then(as_int))
}

fn icon_of(record: &Map<String, Value>) -> Option<String> {
    let images = record.get("images");
    [
        record.get("iconUrl"),
        images.and_then(|i| i.get("large")),
        images.and_then(|i| i.get("small")),
    ]
    .into_iter()
    .flatten()
    .find_map(|v| v.as_str().and_then(non_blank))
}
