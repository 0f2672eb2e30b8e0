use serde::{Deserialize, Serialize};

// The onboarding flow builds one natural-language query per user:
// "<sectors> 산업의 트렌드와 <risk text> 투자 정보". These markers must track
// that template byte-for-byte; there is no schema and no error signal when
// the template changes upstream.
const TREND_CONNECTOR: &str = " 산업의 트렌드와 ";
const INFO_SUFFIX: &str = " 투자 정보";
const LOOSE_MARKER: &str = "트렌드와";
const SECTOR_QUALIFIER: &str = "산업";
const MAX_SECTORS: usize = 10;

/// Single-letter investor-risk classification recovered from the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Aggressive,
    Neutral,
    Conservative,
    Unknown,
}

impl RiskProfile {
    pub fn code(&self) -> &'static str {
        match self {
            RiskProfile::Aggressive => "A",
            RiskProfile::Neutral => "B",
            RiskProfile::Conservative => "C",
            RiskProfile::Unknown => "",
        }
    }

    fn from_risk_text(text: &str) -> Self {
        if text.contains("공격") {
            RiskProfile::Aggressive
        } else if text.contains("중립") {
            RiskProfile::Neutral
        } else if text.contains("안정") || text.contains("보수") {
            RiskProfile::Conservative
        } else {
            RiskProfile::Unknown
        }
    }
}

/// Structured fields recovered from the query text. Recomputed per render,
/// never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTextProfile {
    pub sectors: Vec<String>,
    pub risk_text: String,
    pub risk: RiskProfile,
}

impl QueryTextProfile {
    pub fn empty() -> Self {
        Self {
            sectors: Vec::new(),
            risk_text: String::new(),
            risk: RiskProfile::Unknown,
        }
    }
}

/// Best-effort parse of the query template. Input that matches neither the
/// exact template nor the loose marker yields an empty profile, never an
/// error; this is a display-string parser, not input validation.
pub fn parse_query_text(text: &str) -> QueryTextProfile {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return QueryTextProfile::empty();
    }

    // Exact template: split on the connector, strip the fixed tail.
    if let Some((left, right)) = trimmed.split_once(TREND_CONNECTOR) {
        if let Some(risk_part) = right.trim_end().strip_suffix(INFO_SUFFIX) {
            return build_profile(left, risk_part);
        }
    }

    // Loose fallback: slice around the marker and strip suffixes best-effort.
    if let Some(pos) = trimmed.find(LOOSE_MARKER) {
        let left = trimmed[..pos]
            .trim_end()
            .trim_end_matches("산업의")
            .trim_end();
        let mut right = trimmed[pos + LOOSE_MARKER.len()..].trim();
        right = right
            .strip_suffix(INFO_SUFFIX.trim_start())
            .unwrap_or(right)
            .trim_end();
        return build_profile(left, right);
    }

    QueryTextProfile::empty()
}

fn build_profile(sector_part: &str, risk_part: &str) -> QueryTextProfile {
    let risk_text = risk_part.trim().to_string();
    let risk = RiskProfile::from_risk_text(&risk_text);

    QueryTextProfile {
        sectors: parse_sectors(sector_part),
        risk_text,
        risk,
    }
}

fn parse_sectors(part: &str) -> Vec<String> {
    part.split(',')
        .map(|token| {
            let token = token.trim();
            token.strip_suffix(SECTOR_QUALIFIER).unwrap_or(token).trim()
        })
        .filter(|token| !token.is_empty())
        .take(MAX_SECTORS)
        .map(|token| token.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_canonical_template() {
        let p = parse_query_text("반도체, AI 산업의 트렌드와 공격형 투자 정보");
        assert_eq!(p.sectors, vec!["반도체", "AI"]);
        assert!(p.risk_text.contains("공격형"));
        assert_eq!(p.risk, RiskProfile::Aggressive);
        assert_eq!(p.risk.code(), "A");
    }

    #[test]
    fn maps_each_risk_wording_to_a_code() {
        let neutral = parse_query_text("금융 산업의 트렌드와 위험중립형 투자 정보");
        assert_eq!(neutral.risk.code(), "B");

        let conservative = parse_query_text("바이오 산업의 트렌드와 안정추구형 투자 정보");
        assert_eq!(conservative.risk.code(), "C");

        let unknown = parse_query_text("바이오 산업의 트렌드와 단타 투자 정보");
        assert_eq!(unknown.risk, RiskProfile::Unknown);
        assert_eq!(unknown.risk.code(), "");
    }

    #[test]
    fn strips_the_sector_qualifier_and_empty_tokens() {
        let p = parse_query_text("2차전지산업, , 자동차산업 산업의 트렌드와 중립형 투자 정보");
        assert_eq!(p.sectors, vec!["2차전지", "자동차"]);
    }

    #[test]
    fn caps_the_sector_list_at_ten() {
        let sectors = (1..=14).map(|i| format!("테마{i}")).collect::<Vec<_>>().join(", ");
        let text = format!("{sectors} 산업의 트렌드와 공격형 투자 정보");
        let p = parse_query_text(&text);
        assert_eq!(p.sectors.len(), 10);
        assert_eq!(p.sectors[0], "테마1");
        assert_eq!(p.sectors[9], "테마10");
    }

    #[test]
    fn falls_back_to_the_loose_marker() {
        // Tail wording drifted, connector spacing collapsed.
        let p = parse_query_text("반도체, 금융 산업의트렌드와 공격형 투자 정보");
        assert_eq!(p.sectors, vec!["반도체", "금융"]);
        assert_eq!(p.risk, RiskProfile::Aggressive);
    }

    #[test]
    fn non_template_input_yields_an_empty_profile() {
        let p = parse_query_text("오늘 삼성전자 주가 알려줘");
        assert!(p.sectors.is_empty());
        assert_eq!(p.risk_text, "");
        assert_eq!(p.risk, RiskProfile::Unknown);

        let blank = parse_query_text("   ");
        assert!(blank.sectors.is_empty());
    }
}
