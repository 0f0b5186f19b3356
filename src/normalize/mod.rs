//! Rank normalization.
//!
//! Turns whatever the upstream rank endpoint returned into a
//! `NormalizedRank`. Shapes are tried in priority order; by default an
//! unrecognized payload degrades to the unranked record instead of failing.

pub mod shapes;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::{NormalizedRank, RawRankResponse, Stat, UNRANKED_TIER};
pub use shapes::{
    default_extractors, CurrentDataShape, ListShape, MmrDataShape, PartialRank, ShapeExtractor,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Rank payload matches no known shape")]
    UnrecognizedShape,
}

/// Ordered set of shape extractors plus the unrecognized-shape policy.
pub struct Normalizer {
    extractors: Vec<Box<dyn ShapeExtractor>>,
    strict: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            extractors: default_extractors(),
            strict: false,
        }
    }
}

impl Normalizer {
    /// Normalizer that rejects payloads no extractor recognizes.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Append an extractor; it is tried after the existing ones.
    pub fn with_extractor(mut self, extractor: Box<dyn ShapeExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn normalize(&self, raw: &RawRankResponse) -> Result<NormalizedRank, NormalizeError> {
        let body = match raw {
            RawRankResponse::NotRanked => return Ok(NormalizedRank::unranked()),
            RawRankResponse::Body(body) => body,
        };

        let matched = self.extractors.iter().find_map(|extractor| {
            extractor.extract(body).map(|partial| {
                debug!("Rank payload matched shape {}", extractor.name());
                partial
            })
        });

        let partial = match matched {
            Some(partial) => partial,
            // An empty, null or empty-list body carries no rank, same as NotRanked
            None if is_empty_payload(body) => PartialRank::default(),
            None if self.strict => return Err(NormalizeError::UnrecognizedShape),
            None => {
                debug!("Rank payload matched no known shape, using defaults");
                PartialRank::default()
            }
        };

        Ok(finish(partial))
    }
}

/// Normalize with the default, lenient extractor chain.
pub fn normalize(raw: &RawRankResponse) -> NormalizedRank {
    Normalizer::default()
        .normalize(raw)
        .unwrap_or_else(|_| NormalizedRank::unranked())
}

fn is_empty_payload(body: &serde_json::Value) -> bool {
    use serde_json::Value;

    let empty_list =
        |value: Option<&Value>| matches!(value, Some(Value::Array(items)) if items.is_empty());

    match body {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(obj) => {
            obj.is_empty() || empty_list(obj.get("entries")) || empty_list(obj.get("data"))
        }
        _ => false,
    }
}

/// Apply defaults to an extracted record.
fn finish(partial: PartialRank) -> NormalizedRank {
    let tier = partial
        .tier
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNRANKED_TIER.to_string());
    let (tier_base, division) = split_tier(&tier);

    NormalizedRank {
        tier_base,
        division,
        tier,
        rating_points: Stat::from(partial.rating_points),
        wins: Stat::from(partial.wins),
        losses: Stat::from(partial.losses),
        icon_url: partial.icon_url.as_deref().and_then(valid_icon_url),
    }
}

/// Split a display tier into its base name and division suffix.
///
/// The division is the trailing token when it is a number or a roman
/// numeral: "Diamond 2" gives ("Diamond", "2"), "GOLD II" gives ("GOLD", "II").
pub fn split_tier(tier: &str) -> (String, String) {
    let tokens: Vec<&str> = tier.split_whitespace().collect();
    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() && is_division(last) => {
            (rest.join(" "), last.to_string())
        }
        _ => (tokens.join(" "), String::new()),
    }
}

fn is_division(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit())
        || matches!(token.to_ascii_uppercase().as_str(), "I" | "II" | "III" | "IV" | "V")
}

/// Accept only absolute http(s) URLs with a host.
fn valid_icon_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    let web = matches!(url.scheme(), "http" | "https");
    (web && url.host_str().is_some()).then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body(value: serde_json::Value) -> RawRankResponse {
        RawRankResponse::Body(value)
    }

    #[test]
    fn test_not_ranked_is_unranked() {
        let rank = normalize(&RawRankResponse::NotRanked);
        assert_eq!(rank.tier, "Unranked");
        assert!(rank.rating_points.is_unknown());
        assert!(rank.wins.is_unknown());
        assert!(rank.losses.is_unknown());
        assert!(rank.icon_url.is_none());
    }

    #[test]
    fn test_empty_object_same_as_not_ranked() {
        assert_eq!(
            normalize(&body(json!({}))),
            normalize(&RawRankResponse::NotRanked)
        );
        assert_eq!(
            normalize(&body(serde_json::Value::Null)),
            normalize(&RawRankResponse::NotRanked)
        );
    }

    #[test]
    fn test_empty_object_is_not_an_error_even_when_strict() {
        let rank = Normalizer::strict().normalize(&body(json!({}))).unwrap();
        assert!(rank.is_unranked());
    }

    #[test]
    fn test_empty_lists_are_unranked_even_when_strict() {
        for payload in [json!([]), json!({"data": []}), json!({"status": 200, "entries": []})] {
            let raw = body(payload.clone());
            assert_eq!(
                Normalizer::strict().normalize(&raw).unwrap(),
                NormalizedRank::unranked(),
                "payload {}",
                payload
            );
            assert_eq!(normalize(&raw), NormalizedRank::unranked());
        }
    }

    #[test]
    fn test_mmr_data_payload() {
        let rank = normalize(&body(json!({
            "data": {"currenttierpatched": "Gold 2", "ranking_in_tier": 42}
        })));

        assert_eq!(rank.tier, "Gold 2");
        assert_eq!(rank.tier_base, "Gold");
        assert_eq!(rank.division, "2");
        assert_eq!(rank.rating_points, Stat::Known(42));
        assert!(rank.wins.is_unknown());
        assert!(rank.losses.is_unknown());
    }

    #[test]
    fn test_league_list_payload() {
        let rank = normalize(&body(json!([{
            "queueType": "RANKED_SOLO_5x5",
            "tier": "EMERALD",
            "rank": "III",
            "leaguePoints": 0,
            "wins": 25,
            "losses": 30
        }])));

        assert_eq!(rank.tier, "EMERALD III");
        assert_eq!(rank.tier_base, "EMERALD");
        assert_eq!(rank.division, "III");
        assert_eq!(rank.rating_points, Stat::Known(0));
        assert_eq!(rank.wins, Stat::Known(25));
        assert_eq!(rank.losses, Stat::Known(30));
    }

    #[test]
    fn test_current_data_payload_with_icon() {
        let rank = normalize(&body(json!({
            "status": 200,
            "data": {
                "name": "Player",
                "current_data": {
                    "currenttierpatched": "Diamond 2",
                    "ranking_in_tier": 77,
                    "images": {"large": "https://media.test/tiers/20/large.png"}
                }
            }
        })));

        assert_eq!(rank.tier, "Diamond 2");
        assert_eq!(rank.tier_base, "Diamond");
        assert_eq!(rank.division, "2");
        assert_eq!(rank.rating_points, Stat::Known(77));
        assert_eq!(
            rank.icon_url.map(|u| u.to_string()),
            Some("https://media.test/tiers/20/large.png".to_string())
        );
    }

    #[test]
    fn test_list_shape_wins_over_later_shapes() {
        let rank = normalize(&body(json!({
            "entries": [{"tier": "SILVER", "rank": "I"}],
            "current_data": {"currenttierpatched": "Radiant"}
        })));
        assert_eq!(rank.tier, "SILVER I");
    }

    #[test]
    fn test_matched_shape_without_tier_defaults_to_unranked() {
        let rank = normalize(&body(json!([{"wins": 3, "losses": 0}])));
        assert_eq!(rank.tier, "Unranked");
        assert_eq!(rank.wins, Stat::Known(3));
        assert_eq!(rank.losses, Stat::Known(0));
    }

    #[test]
    fn test_unrecognized_shape_lenient_and_strict() {
        let raw = body(json!({"errors": [{"message": "unexpected"}]}));

        assert!(normalize(&raw).is_unranked());
        assert_eq!(
            Normalizer::strict().normalize(&raw),
            Err(NormalizeError::UnrecognizedShape)
        );
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = body(json!({"data": {"currenttierpatched": "Immortal 3", "ranking_in_tier": 5}}));
        assert_eq!(normalize(&raw), normalize(&raw));
    }

    #[test]
    fn test_tier_never_empty() {
        let payloads = [
            json!([{"tier": ""}]),
            json!({"data": {"currenttierpatched": ""}}),
            json!({"data": {"current_data": {}}}),
            json!({"data": {"currenttierpatched": "Gold 1"}}),
            json!("just a string"),
        ];
        for payload in payloads {
            let rank = normalize(&body(payload));
            assert!(!rank.tier.is_empty());
            assert!(!rank.tier_base.is_empty());
        }
    }

    #[test]
    fn test_icon_url_validation() {
        let with_icon = |icon: &str| {
            normalize(&body(json!({
                "data": {"currenttierpatched": "Gold 1", "images": {"small": icon}}
            })))
            .icon_url
        };

        assert!(with_icon("https://cdn.test/gold.png").is_some());
        assert!(with_icon("http://cdn.test/gold.png").is_some());
        assert!(with_icon("ftp://cdn.test/gold.png").is_none());
        assert!(with_icon("/relative/gold.png").is_none());
        assert!(with_icon("not a url").is_none());
    }

    #[test]
    fn test_split_tier() {
        assert_eq!(split_tier("Diamond 2"), ("Diamond".to_string(), "2".to_string()));
        assert_eq!(split_tier("GOLD IV"), ("GOLD".to_string(), "IV".to_string()));
        assert_eq!(split_tier("Radiant"), ("Radiant".to_string(), String::new()));
        assert_eq!(split_tier("Unranked"), ("Unranked".to_string(), String::new()));
        assert_eq!(split_tier("Grand Master"), ("Grand Master".to_string(), String::new()));
        assert_eq!(split_tier("Grand Master 1"), ("Grand Master".to_string(), "1".to_string()));
        assert_eq!(split_tier("3"), ("3".to_string(), String::new()));
    }

    struct ProfileShape;

    impl ShapeExtractor for ProfileShape {
        fn name(&self) -> &'static str {
            "profile"
        }

        fn extract(&self, raw: &serde_json::Value) -> Option<PartialRank> {
            let profile = raw.get("profile")?.as_object()?;
            Some(PartialRank::from_record(profile))
        }
    }

    #[test]
    fn test_custom_extractor_is_tried_last() {
        let normalizer = Normalizer::strict().with_extractor(Box::new(ProfileShape));
        let rank = normalizer
            .normalize(&body(json!({"profile": {"tier": "Bronze", "lp": 9}})))
            .unwrap();

        assert_eq!(rank.tier, "Bronze");
        assert_eq!(rank.rating_points, Stat::Known(9));
        assert!(normalizer.is_strict());
    }
}
