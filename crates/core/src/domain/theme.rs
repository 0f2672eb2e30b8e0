// Theme keys arrive in several generations of upstream spelling: English
// snake_case codes, Korean display labels with or without slashes, and a few
// legacy codes that never made it into the primary table. Canonicalization is
// exact-match only; an unknown key is shown as-is.

pub const THEME_SEMICONDUCTOR_AI: &str = "반도체/AI";
pub const THEME_BATTERY: &str = "2차전지";
pub const THEME_BIO_HEALTH: &str = "바이오/헬스케어";
pub const THEME_INTERNET_PLATFORM: &str = "인터넷/플랫폼";
pub const THEME_FINANCE_HOLDING: &str = "금융/지주";
pub const THEME_AUTOMOTIVE: &str = "자동차";
pub const THEME_ENERGY: &str = "에너지/정유";
pub const THEME_ENTERTAINMENT: &str = "엔터/미디어";
pub const THEME_OTHER: &str = "기타";

// Primary table: upstream theme codes and their common label spellings,
// keyed by the folded form (see fold_theme_key).
const THEME_ALIASES: &[(&str, &str)] = &[
    ("SEMICONDUCTOR", THEME_SEMICONDUCTOR_AI),
    ("SEMICONDUCTORAI", THEME_SEMICONDUCTOR_AI),
    ("반도체", THEME_SEMICONDUCTOR_AI),
    ("반도체AI", THEME_SEMICONDUCTOR_AI),
    ("AI반도체", THEME_SEMICONDUCTOR_AI),
    ("BATTERY", THEME_BATTERY),
    ("SECONDARYBATTERY", THEME_BATTERY),
    ("2차전지", THEME_BATTERY),
    ("이차전지", THEME_BATTERY),
    ("BIO", THEME_BIO_HEALTH),
    ("BIOHEALTH", THEME_BIO_HEALTH),
    ("바이오", THEME_BIO_HEALTH),
    ("바이오헬스케어", THEME_BIO_HEALTH),
    ("헬스케어", THEME_BIO_HEALTH),
    ("INTERNET", THEME_INTERNET_PLATFORM),
    ("PLATFORM", THEME_INTERNET_PLATFORM),
    ("INTERNETPLATFORM", THEME_INTERNET_PLATFORM),
    ("인터넷", THEME_INTERNET_PLATFORM),
    ("플랫폼", THEME_INTERNET_PLATFORM),
    ("인터넷플랫폼", THEME_INTERNET_PLATFORM),
    ("FINANCE", THEME_FINANCE_HOLDING),
    ("HOLDING", THEME_FINANCE_HOLDING),
    ("FINANCEHOLDING", THEME_FINANCE_HOLDING),
    ("금융", THEME_FINANCE_HOLDING),
    ("지주", THEME_FINANCE_HOLDING),
    ("금융지주", THEME_FINANCE_HOLDING),
    ("AUTO", THEME_AUTOMOTIVE),
    ("AUTOMOTIVE", THEME_AUTOMOTIVE),
    ("자동차", THEME_AUTOMOTIVE),
    ("ENERGY", THEME_ENERGY),
    ("GREENENERGY", THEME_ENERGY),
    ("OILENERGY", THEME_ENERGY),
    ("에너지", THEME_ENERGY),
    ("정유", THEME_ENERGY),
    ("에너지정유", THEME_ENERGY),
    ("친환경에너지", THEME_ENERGY),
    ("ENTERTAINMENT", THEME_ENTERTAINMENT),
    ("MEDIA", THEME_ENTERTAINMENT),
    ("엔터", THEME_ENTERTAINMENT),
    ("엔터미디어", THEME_ENTERTAINMENT),
    ("미디어", THEME_ENTERTAINMENT),
    ("ETC", THEME_OTHER),
    ("OTHER", THEME_OTHER),
    ("기타", THEME_OTHER),
];

// Secondary table for keys the primary table never covered: legacy numeric
// codes still emitted by older ranking payloads.
const UNMAPPED_THEME_KEYS: &[(&str, &str)] = &[
    ("THEME01", THEME_SEMICONDUCTOR_AI),
    ("THEME02", THEME_BATTERY),
    ("THEME03", THEME_BIO_HEALTH),
    ("THEME04", THEME_INTERNET_PLATFORM),
    ("THEME05", THEME_FINANCE_HOLDING),
    ("THEME99", THEME_OTHER),
];

/// Map a raw theme key or label to its display label. Unmappable input comes
/// back trimmed but otherwise verbatim.
pub fn canonical_theme_label(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let folded = fold_theme_key(trimmed);

    for (alias, label) in THEME_ALIASES {
        if *alias == folded {
            return (*label).to_string();
        }
    }
    for (key, label) in UNMAPPED_THEME_KEYS {
        if *key == folded {
            return (*label).to_string();
        }
    }

    trimmed.to_string()
}

/// Fold a key for table lookup: drop whitespace and the separators upstream
/// uses inconsistently, uppercase ASCII.
fn fold_theme_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_' | '/'))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_codes_and_labels_to_one_vocabulary() {
        assert_eq!(canonical_theme_label("semiconductor_ai"), THEME_SEMICONDUCTOR_AI);
        assert_eq!(canonical_theme_label("반도체/AI"), THEME_SEMICONDUCTOR_AI);
        assert_eq!(canonical_theme_label(" secondary-battery "), THEME_BATTERY);
        assert_eq!(canonical_theme_label("이차전지"), THEME_BATTERY);
        assert_eq!(canonical_theme_label("금융/지주"), THEME_FINANCE_HOLDING);
    }

    #[test]
    fn legacy_codes_resolve_via_secondary_table() {
        assert_eq!(canonical_theme_label("THEME_01"), THEME_SEMICONDUCTOR_AI);
        assert_eq!(canonical_theme_label("theme-99"), THEME_OTHER);
    }

    #[test]
    fn unknown_labels_pass_through_trimmed() {
        assert_eq!(canonical_theme_label("  우주항공  "), "우주항공");
        assert_eq!(canonical_theme_label(""), "");
        assert_eq!(canonical_theme_label("   "), "");
    }

    #[test]
    fn canonical_labels_are_fixed_points() {
        let labels = [
            THEME_SEMICONDUCTOR_AI,
            THEME_BATTERY,
            THEME_BIO_HEALTH,
            THEME_INTERNET_PLATFORM,
            THEME_FINANCE_HOLDING,
            THEME_AUTOMOTIVE,
            THEME_ENERGY,
            THEME_ENTERTAINMENT,
            THEME_OTHER,
        ];
        for label in labels {
            assert_eq!(canonical_theme_label(label), label);
        }
    }
}
