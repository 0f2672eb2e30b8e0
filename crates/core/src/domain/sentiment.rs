use crate::domain::theme::canonical_theme_label;
use crate::ingest::types::RawThemeSentiment;
use serde::{Deserialize, Serialize};

/// Qualitative market-mood bucket shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Positive,
    Neutral,
    Negative,
}

impl MoodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Positive => "positive",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Negative => "negative",
        }
    }

    /// Bucket a 0..100 sentiment score. A missing score is neutral, the same
    /// default the aggregate uses when nothing is scorable.
    pub fn from_score(score: Option<f64>, thresholds: &MoodThresholds) -> Self {
        let Some(score) = score else {
            return MoodLabel::Neutral;
        };
        if score >= thresholds.positive_min {
            MoodLabel::Positive
        } else if score >= thresholds.neutral_min {
            MoodLabel::Neutral
        } else {
            MoodLabel::Negative
        }
    }
}

/// Score cutoffs for the mood buckets. These are part of the observable
/// contract of the mood indicator, not a tuning detail.
#[derive(Debug, Clone, Copy)]
pub struct MoodThresholds {
    pub positive_min: f64,
    pub neutral_min: f64,
}

impl Default for MoodThresholds {
    fn default() -> Self {
        Self {
            positive_min: 66.0,
            neutral_min: 40.0,
        }
    }
}

impl MoodThresholds {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("MOOD_POSITIVE_MIN") {
            if let Ok(n) = s.parse::<f64>() {
                out.positive_min = n;
            }
        }

        if let Ok(s) = std::env::var("MOOD_NEUTRAL_MIN") {
            if let Ok(n) = s.parse::<f64>() {
                out.neutral_min = n;
            }
        }

        out
    }
}

/// Per-theme sentiment after canonicalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeOutlook {
    pub theme: String,
    pub label: String,
    pub score: Option<f64>,
    pub sentiment: MoodLabel,
    pub count: i64,
}

pub fn build_theme_outlooks(
    raw: &[RawThemeSentiment],
    thresholds: &MoodThresholds,
) -> Vec<ThemeOutlook> {
    raw.iter()
        .map(|t| {
            let score = t.score.filter(|s| !s.is_nan());
            ThemeOutlook {
                theme: t.theme.trim().to_string(),
                label: canonical_theme_label(t.theme_label.as_deref().unwrap_or(&t.theme)),
                score,
                sentiment: MoodLabel::from_score(score, thresholds),
                count: t.count.unwrap_or(0),
            }
        })
        .collect()
}

/// Collapse all theme outlooks into one label via a count-weighted mean.
///
/// Unscored themes are excluded from the average (not zeroed). A theme with a
/// non-positive sample count still gets weight 1 so a sparsely covered theme
/// cannot vanish from the aggregate. No scorable themes at all means neutral.
pub fn integrated_mood(themes: &[ThemeOutlook], thresholds: &MoodThresholds) -> MoodLabel {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for theme in themes {
        let Some(score) = theme.score else {
            continue;
        };
        let weight = if theme.count > 0 {
            theme.count as f64
        } else {
            1.0
        };
        weighted_sum += score * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return MoodLabel::Neutral;
    }

    MoodLabel::from_score(Some(weighted_sum / total_weight), thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outlook(score: Option<f64>, count: i64) -> ThemeOutlook {
        ThemeOutlook {
            theme: "t".to_string(),
            label: "t".to_string(),
            score,
            sentiment: MoodLabel::from_score(score, &MoodThresholds::default()),
            count,
        }
    }

    #[test]
    fn empty_input_is_neutral() {
        let t = MoodThresholds::default();
        assert_eq!(integrated_mood(&[], &t), MoodLabel::Neutral);
    }

    #[test]
    fn unscored_themes_are_excluded_not_zeroed() {
        let t = MoodThresholds::default();
        let themes = vec![outlook(Some(80.0), 3), outlook(None, 100)];
        // Average is 80, not dragged down by the unscored theme.
        assert_eq!(integrated_mood(&themes, &t), MoodLabel::Positive);

        let only_unscored = vec![outlook(None, 5), outlook(None, 0)];
        assert_eq!(integrated_mood(&only_unscored, &t), MoodLabel::Neutral);
    }

    #[test]
    fn equal_weights_average_between_thresholds() {
        let t = MoodThresholds::default();
        // Mean 50 sits between neutral_min 40 and positive_min 66.
        let themes = vec![outlook(Some(80.0), 1), outlook(Some(20.0), 1)];
        assert_eq!(integrated_mood(&themes, &t), MoodLabel::Neutral);
    }

    #[test]
    fn non_positive_counts_weigh_as_one() {
        let t = MoodThresholds::default();
        // (90*10 + 10*1) / 11 ~= 82.7, not (90+10)/2.
        let themes = vec![outlook(Some(90.0), 10), outlook(Some(10.0), 0)];
        assert_eq!(integrated_mood(&themes, &t), MoodLabel::Positive);
    }

    #[test]
    fn order_does_not_matter() {
        let t = MoodThresholds::default();
        let a = vec![outlook(Some(70.0), 2), outlook(Some(30.0), 4), outlook(Some(55.0), 1)];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(integrated_mood(&a, &t), integrated_mood(&b, &t));
    }

    #[test]
    fn threshold_boundaries_are_inclusive() {
        let t = MoodThresholds::default();
        assert_eq!(MoodLabel::from_score(Some(66.0), &t), MoodLabel::Positive);
        assert_eq!(MoodLabel::from_score(Some(40.0), &t), MoodLabel::Neutral);
        assert_eq!(MoodLabel::from_score(Some(39.9), &t), MoodLabel::Negative);
        assert_eq!(MoodLabel::from_score(None, &t), MoodLabel::Neutral);
    }

    #[test]
    fn outlooks_canonicalize_labels_and_default_counts() {
        let raw: Vec<RawThemeSentiment> = serde_json::from_value(json!([
            {"theme": "semiconductor_ai", "theme_label": "반도체 AI", "score": 72.0, "count": 14},
            {"theme": "battery", "score": null, "count": null},
        ]))
        .unwrap();

        let outlooks = build_theme_outlooks(&raw, &MoodThresholds::default());
        assert_eq!(outlooks[0].label, "반도체/AI");
        assert_eq!(outlooks[0].sentiment, MoodLabel::Positive);
        assert_eq!(outlooks[1].label, "2차전지");
        assert_eq!(outlooks[1].score, None);
        assert_eq!(outlooks[1].sentiment, MoodLabel::Neutral);
        assert_eq!(outlooks[1].count, 0);
    }
}
