//! Server-side HTML for the search form and lookup results.
//!
//! The page lives in `templates/index.html`; askama escapes every
//! interpolated value.

use askama::Template;

use crate::lookup::{LookupOutcome, LookupRequest};
use crate::models::{NormalizedRank, RiotId, Stat};

/// Flash message severity; maps to a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Info,
    Warning,
    Error,
}

impl FlashLevel {
    fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Info => "flash-info",
            FlashLevel::Warning => "flash-warning",
            FlashLevel::Error => "flash-error",
        }
    }
}

/// Everything needed to draw the page.
pub struct PageView<'a> {
    pub form: &'a LookupRequest,
    pub regions: &'a [String],
    pub default_region: &'a str,
    pub outcome: Option<&'a LookupOutcome>,
}

struct RegionOption<'a> {
    value: &'a str,
    label: String,
    selected: bool,
}

struct Flash {
    level: FlashLevel,
    message: String,
}

struct RankCard {
    player: String,
    color: &'static str,
    tier: String,
    icon_url: Option<String>,
    rating_points: Stat,
    wins: Stat,
    losses: Stat,
    win_rate: Option<String>,
}

impl RankCard {
    fn new(player: &RiotId, rank: &NormalizedRank) -> Self {
        Self {
            player: player.to_string(),
            color: tier_color(&rank.tier_base),
            tier: rank.tier.clone(),
            icon_url: rank.icon_url.as_ref().map(|url| url.to_string()),
            rating_points: rank.rating_points,
            wins: rank.wins,
            losses: rank.losses,
            win_rate: rank.win_rate().map(|rate| format!("{:.1}%", rate)),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage<'a> {
    username: &'a str,
    tag: &'a str,
    regions: Vec<RegionOption<'a>>,
    flash: Option<Flash>,
    card: Option<RankCard>,
}

/// Accent colour for a tier name (without division), case-insensitive.
pub fn tier_color(tier_base: &str) -> &'static str {
    match tier_base.to_ascii_lowercase().as_str() {
        "iron" => "#5e5a59",
        "bronze" => "#a5714e",
        "silver" => "#b4c0c4",
        "gold" => "#e5b645",
        "platinum" => "#3fa6a8",
        "emerald" => "#2fbf71",
        "diamond" => "#b489f0",
        "master" => "#9d48e0",
        "grandmaster" => "#e84057",
        "challenger" => "#f4c874",
        "ascendant" => "#2e9e6b",
        "immortal" => "#bb3d65",
        "radiant" => "#fff3a6",
        _ => "#8a8f98",
    }
}

/// Flash message for outcomes that carry no rank card.
pub fn flash_for(outcome: &LookupOutcome) -> Option<(FlashLevel, String)> {
    match outcome {
        LookupOutcome::Ranked { .. } => None,
        LookupOutcome::Unranked { player, .. } => Some((
            FlashLevel::Info,
            format!("{} has no competitive rank this season.", player),
        )),
        LookupOutcome::NotFound { player } => Some((
            FlashLevel::Warning,
            format!("Player {} was not found in this region.", player),
        )),
        LookupOutcome::Failed(e) => Some((FlashLevel::Error, e.user_message())),
    }
}

/// Render the whole page: form, then flash message or rank card.
pub fn render_page(view: &PageView<'_>) -> Result<String, askama::Error> {
    let selected = view
        .form
        .region
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(view.default_region);

    let regions = view
        .regions
        .iter()
        .map(|region| RegionOption {
            value: region,
            label: region.to_uppercase(),
            selected: region.eq_ignore_ascii_case(selected),
        })
        .collect();

    let flash = view
        .outcome
        .and_then(flash_for)
        .map(|(level, message)| Flash { level, message });

    let card = view.outcome.and_then(|outcome| {
        let player = outcome.player()?;
        let rank = outcome.rank()?;
        Some(RankCard::new(player, &rank))
    });

    IndexPage {
        username: &view.form.username,
        tag: &view.form.tag,
        regions,
        flash,
        card,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupError;
    use crate::models::Region;
    use crate::upstream::UpstreamError;

    fn regions() -> Vec<String> {
        vec!["eu".to_string(), "na".to_string()]
    }

    fn player() -> RiotId {
        RiotId::new("Player", "EUW").unwrap()
    }

    fn render(form: &LookupRequest, outcome: Option<&LookupOutcome>) -> String {
        let regions = regions();
        render_page(&PageView {
            form,
            regions: &regions,
            default_region: "eu",
            outcome,
        })
        .unwrap()
    }

    #[test]
    fn test_tier_color() {
        assert_eq!(tier_color("Gold"), tier_color("GOLD"));
        assert_ne!(tier_color("Gold"), tier_color("Iron"));
        assert_eq!(tier_color("Unranked"), "#8a8f98");
    }

    #[test]
    fn test_empty_page_has_form_and_default_region() {
        let html = render(&LookupRequest::default(), None);
        assert!(html.contains(r#"action="/lookup""#));
        assert!(html.contains(r#"<option value="eu" selected>EU</option>"#));
        assert!(html.contains(r#"<option value="na">NA</option>"#));
        assert!(!html.contains("class=\"card\""));
    }

    #[test]
    fn test_form_values_are_escaped() {
        let form = LookupRequest::new("<b>x</b>", "\"1");
        let html = render(&form, None);
        assert!(html.contains("&lt;b&gt;x"));
        assert!(html.contains("&quot;1"));
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn test_ranked_card() {
        let mut rank = NormalizedRank::unranked();
        rank.tier = "Gold 2".to_string();
        rank.tier_base = "Gold".to_string();
        rank.division = "2".to_string();
        rank.rating_points = Stat::Known(42);
        rank.wins = Stat::Known(3);
        rank.losses = Stat::Known(1);

        let outcome = LookupOutcome::Ranked {
            player: player(),
            region: Region::parse("eu", &regions()).unwrap(),
            rank,
        };
        let html = render(&LookupRequest::new("Player", "EUW"), Some(&outcome));

        assert!(html.contains("Player#EUW"));
        assert!(html.contains(r#"<p class="tier">Gold 2</p>"#));
        assert!(html.contains("<dd>42</dd>"));
        assert!(html.contains("75.0%"));
        assert!(html.contains(tier_color("Gold")));
        assert!(!html.contains("class=\"flash"));
    }

    #[test]
    fn test_unranked_card_shows_unknown_sentinels() {
        let outcome = LookupOutcome::Unranked {
            player: player(),
            region: Region::parse("eu", &regions()).unwrap(),
        };
        let html = render(&LookupRequest::new("Player", "EUW"), Some(&outcome));

        assert!(html.contains(r#"class="flash flash-info""#));
        assert!(html.contains(r#"<p class="tier">Unranked</p>"#));
        assert!(html.contains("<dd>--</dd>"));
        assert!(!html.contains("Win rate"));
    }

    #[test]
    fn test_upstream_text_is_escaped() {
        let mut rank = NormalizedRank::unranked();
        rank.tier = "<i>Gold</i> 2".to_string();
        rank.tier_base = "<i>Gold</i>".to_string();
        rank.division = "2".to_string();

        let outcome = LookupOutcome::Ranked {
            player: RiotId::new("A&B", "EUW").unwrap(),
            region: Region::parse("eu", &regions()).unwrap(),
            rank,
        };
        let html = render(&LookupRequest::new("A&B", "EUW"), Some(&outcome));

        assert!(html.contains("&lt;i&gt;Gold"));
        assert!(!html.contains("<i>"));
        assert!(html.contains("A&amp;B#EUW"));
    }

    #[test]
    fn test_not_found_flash() {
        let outcome = LookupOutcome::NotFound { player: player() };
        let html = render(&LookupRequest::new("Player", "EUW"), Some(&outcome));

        assert!(html.contains(r#"class="flash flash-warning""#));
        assert!(html.contains("was not found"));
        assert!(!html.contains("class=\"card\""));
    }

    #[test]
    fn test_error_flash_uses_user_message() {
        let outcome = LookupOutcome::Failed(LookupError::Upstream(UpstreamError::Http {
            status: 429,
        }));
        let html = render(&LookupRequest::new("Player", "EUW"), Some(&outcome));

        assert!(html.contains(r#"class="flash flash-error""#));
        assert!(html.contains("Rate limit exceeded"));
    }
}
