//! Contract term derivation
//!
//! Normalizes the free-text contract terms extracted from CPS/RC documents:
//! execution delay, late penalty rate and cap, award mode and final guarantee
//! rate, then computes the estimated final guarantee amount from the tender's
//! total estimate. Unparsable text degrades to `None`.

use crate::json_parser::JsonParser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tender_core::{
    parse_amount, AmountFormat, ContractDetails, FinalGuarantee, LatePenalty, TotalEstimate,
    MAX_UNWRAP_DEPTH,
};

const DELAY_UNITS: &str = r"jours?|j|days?|mois|months?|semaines?|weeks?|ans?|ann[ée]es?|years?";

// Digits grouped by thousands with a space, or a plain run, with optional decimals
const GROUPED_NUMBER: &str = r"\d{1,3}(?:[ \x{a0}\x{202f}]\d{3})+(?:[.,]\d+)?|\d+(?:[.,]\d+)?";

const GROUP_SPACES: [char; 3] = [' ', '\u{a0}', '\u{202f}'];

static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static DELAY_UNIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b({})\b", DELAY_UNITS)).unwrap());

// "90 jours", "90jours", "(03) mois"
static QUANTITY_UNIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)(\d+)\s*\)?\s*({})\b", DELAY_UNITS)).unwrap());

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)?").unwrap());

static FRACTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({n})\s*/\s*({n})", n = GROUPED_NUMBER)).unwrap()
});

static PER_MILLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:‰|pour\s*mille)").unwrap());

static PERCENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:%|pour\s*cent)").unwrap());

static BARE_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:[.,]\d+)?)\s*$").unwrap());

static CAP_KEYWORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)plafon").unwrap());

/// Unit of an execution delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl DelayUnit {
    /// Map a unit word (French or English, any case) to its unit
    pub fn from_word(word: &str) -> Option<Self> {
        let word = word.to_lowercase();
        match word.as_str() {
            "j" | "jour" | "jours" | "day" | "days" => Some(DelayUnit::Days),
            "semaine" | "semaines" | "week" | "weeks" => Some(DelayUnit::Weeks),
            "mois" | "month" | "months" => Some(DelayUnit::Months),
            "an" | "ans" | "année" | "années" | "annee" | "annees" | "year" | "years" => {
                Some(DelayUnit::Years)
            }
            _ => None,
        }
    }

    /// Display label used in canonical delays
    pub fn label(self) -> &'static str {
        match self {
            DelayUnit::Days => "Jours",
            DelayUnit::Weeks => "Semaines",
            DelayUnit::Months => "Mois",
            DelayUnit::Years => "Ans",
        }
    }
}

/// Normalize an execution delay to `"<N> Jours|Semaines|Mois|Ans"`
///
/// An integer directly followed by a unit word wins, so article numbers ahead of
/// the delay are skipped. Otherwise the first integer is the quantity and the
/// unit is the first unit word after it, else the first unit word anywhere,
/// else days.
pub fn normalize_delay(text: &str) -> Option<String> {
    let (quantity, unit) = match QUANTITY_UNIT_PATTERN.captures(text) {
        Some(caps) => (caps.get(1)?.as_str(), DelayUnit::from_word(&caps[2])),
        None => {
            let quantity = INTEGER_PATTERN.find(text)?;
            let unit = DELAY_UNIT_PATTERN
                .find(&text[quantity.end()..])
                .or_else(|| DELAY_UNIT_PATTERN.find(text))
                .and_then(|m| DelayUnit::from_word(m.as_str()));
            (quantity.as_str(), unit)
        }
    };
    let count = quantity.trim_start_matches('0');
    let count = if count.is_empty() { "0" } else { count };

    Some(format!("{} {}", count, unit.unwrap_or(DelayUnit::Days).label()))
}

/// Normalize a daily penalty rate to a percentage
///
/// Accepted notations, tried in this order: fraction `a/b` (a/b × 100, either
/// side may be grouped by thousands as in `1/1 000`),
/// per-mille `x‰` (x / 10), percentage `x%`, and a bare number read as a
/// percentage. Any other text gives `None`.
pub fn parse_penalty_rate(text: &str) -> Option<f64> {
    if let Some(caps) = FRACTION_PATTERN.captures(text) {
        let numerator = parse_number(&caps[1])?;
        let denominator = parse_number(&caps[2])?;
        if denominator == 0.0 {
            return None;
        }
        return Some(round_rate(numerator * 100.0 / denominator));
    }
    if let Some(caps) = PER_MILLE_PATTERN.captures(text) {
        return parse_number(&caps[1]).map(|v| round_rate(v / 10.0));
    }
    if let Some(caps) = PERCENT_PATTERN.captures(text) {
        return parse_number(&caps[1]).map(round_rate);
    }
    BARE_NUMBER_PATTERN
        .captures(text)
        .and_then(|caps| parse_number(&caps[1]))
        .map(round_rate)
}

/// Leading numeric percentage of a rate text (`"3 % du montant"` gives 3)
///
/// A number marked with `%` or "pour cent" is preferred, so article numbers
/// ahead of the rate are skipped. Without such a marker the first number is read.
pub fn parse_percentage(text: &str) -> Option<f64> {
    find_percentage(text).map(|(value, _)| value)
}

/// Percentage of `text` and the byte offset where its match ends
fn find_percentage(text: &str) -> Option<(f64, usize)> {
    if let Some(caps) = PERCENT_PATTERN.captures(text) {
        let end = caps.get(0)?.end();
        return parse_number(&caps[1]).map(|v| (round_rate(v), end));
    }
    let number = NUMBER_PATTERN.find(text)?;
    parse_number(number.as_str()).map(|v| (round_rate(v), number.end()))
}

fn parse_number(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|c| !GROUP_SPACES.contains(c)).collect();
    digits.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

fn round_rate(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Contract term derivation
#[derive(Debug, Clone)]
pub struct ContractDerivation {
    amount_format: AmountFormat,
    max_depth: usize,
}

impl ContractDerivation {
    /// Create a derivation with the default amount format and unwrap depth
    pub fn new() -> Self {
        Self {
            amount_format: AmountFormat::default(),
            max_depth: MAX_UNWRAP_DEPTH,
        }
    }

    /// Set the format of the estimated guarantee amount
    pub fn with_amount_format(mut self, amount_format: AmountFormat) -> Self {
        self.amount_format = amount_format;
        self
    }

    /// Set the maximum number of `{value: ...}` wrappers peeled per leaf
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Derive the contract view from raw contract details and the total estimate
    pub fn derive(&self, raw: Option<&Value>, estimate: &TotalEstimate) -> ContractDetails {
        let raw = raw.map(|r| JsonParser::peel(r, self.max_depth));

        let execution_delay = raw
            .and_then(|r| self.text(r, "delai_execution"))
            .and_then(|text| normalize_delay(&text));
        let award_mode = raw.and_then(|r| self.text(r, "mode_attribution"));
        let late_penalty = raw
            .and_then(|r| r.get("penalite_retard"))
            .map(|p| self.late_penalty(p))
            .unwrap_or_default();
        let rate_percent = raw
            .and_then(|r| r.get("caution_definitive"))
            .and_then(|c| self.guarantee_rate(c));

        ContractDetails {
            execution_delay,
            late_penalty,
            award_mode,
            final_guarantee: FinalGuarantee {
                rate_percent,
                estimated_amount: self.estimated_guarantee_amount(estimate, rate_percent),
            },
        }
    }

    /// Guarantee amount for `rate_percent` of the total estimate, formatted
    ///
    /// `None` unless both the estimate amount and the rate are known, and the
    /// result can be rendered exactly.
    pub fn estimated_guarantee_amount(
        &self,
        estimate: &TotalEstimate,
        rate_percent: Option<f64>,
    ) -> Option<String> {
        let rate = rate_percent?;
        let amount = estimate.amount.as_deref().and_then(parse_amount)?;
        let value = amount * rate / 100.0;
        self.amount_format.format(value, estimate.currency.as_deref())
    }

    /// Penalty given either as `{taux, plafond}` or as one text
    fn late_penalty(&self, raw: &Value) -> LatePenalty {
        let raw = JsonParser::peel(raw, self.max_depth);
        if raw.get("taux").is_some() || raw.get("plafond").is_some() {
            return LatePenalty {
                daily_rate_percent: self
                    .text(raw, "taux")
                    .and_then(|t| parse_penalty_rate(&t)),
                cap_percent: self.text(raw, "plafond").and_then(|t| parse_percentage(&t)),
            };
        }

        let Some(text) = JsonParser::get_text(raw, &[], self.max_depth) else {
            return LatePenalty::default();
        };
        match CAP_KEYWORD_PATTERN.find(&text) {
            Some(keyword) => {
                let tail = &text[keyword.end()..];
                let cap = find_percentage(tail);
                // "Plafond: 10%; 1/1000 par jour" puts the rate after the cap
                let daily_rate_percent = parse_penalty_rate(&text[..keyword.start()])
                    .or_else(|| cap.and_then(|(_, end)| parse_penalty_rate(&tail[end..])));
                LatePenalty {
                    daily_rate_percent,
                    cap_percent: cap.map(|(value, _)| value),
                }
            }
            None => LatePenalty {
                daily_rate_percent: parse_penalty_rate(&text),
                cap_percent: None,
            },
        }
    }

    /// Guarantee rate given either as `{taux, montant_estime}` or as one text
    fn guarantee_rate(&self, raw: &Value) -> Option<f64> {
        let raw = JsonParser::peel(raw, self.max_depth);
        let text = if raw.get("taux").is_some() {
            self.text(raw, "taux")
        } else {
            JsonParser::get_text(raw, &[], self.max_depth)
        };
        text.and_then(|t| parse_percentage(&t))
    }

    fn text(&self, raw: &Value, key: &str) -> Option<String> {
        JsonParser::get_text(raw, &[key], self.max_depth)
    }
}

impl Default for ContractDerivation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn estimate(amount: &str, currency: Option<&str>) -> TotalEstimate {
        TotalEstimate {
            amount: Some(amount.to_string()),
            currency: currency.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_delay() {
        assert_eq!(normalize_delay("30 jours calendaires").as_deref(), Some("30 Jours"));
        assert_eq!(normalize_delay("3 mois").as_deref(), Some("3 Mois"));
        assert_eq!(normalize_delay("Trois (3) MOIS").as_deref(), Some("3 Mois"));
        assert_eq!(normalize_delay("60 working days").as_deref(), Some("60 Jours"));
        assert_eq!(normalize_delay("2 ans").as_deref(), Some("2 Ans"));
        assert_eq!(normalize_delay("1 année").as_deref(), Some("1 Ans"));
        assert_eq!(normalize_delay("6 semaines").as_deref(), Some("6 Semaines"));
        assert_eq!(normalize_delay("12 months").as_deref(), Some("12 Mois"));
        assert_eq!(normalize_delay("Quatre (04) mois").as_deref(), Some("4 Mois"));
    }

    #[test]
    fn test_normalize_delay_skips_article_numbers() {
        assert_eq!(normalize_delay("Article 7 : 90 jours").as_deref(), Some("90 Jours"));
        assert_eq!(
            normalize_delay("Art. 12 du CPS - délai de 6 mois").as_deref(),
            Some("6 Mois")
        );
        assert_eq!(normalize_delay("120jours").as_deref(), Some("120 Jours"));
    }

    #[test]
    fn test_normalize_delay_defaults_and_failures() {
        assert_eq!(normalize_delay("45").as_deref(), Some("45 Jours"));
        assert_eq!(normalize_delay("090 j").as_deref(), Some("90 Jours"));
        assert_eq!(normalize_delay("délai: mois 4").as_deref(), Some("4 Mois"));
        assert_eq!(normalize_delay("à définir"), None);
        assert_eq!(normalize_delay(""), None);
    }

    #[test]
    fn test_penalty_notations() {
        assert_eq!(parse_penalty_rate("1/1000"), Some(0.1));
        assert_eq!(parse_penalty_rate("1‰"), Some(0.1));
        assert_eq!(parse_penalty_rate("2%"), Some(2.0));
        assert_eq!(parse_penalty_rate("1/1000 du montant par jour de retard"), Some(0.1));
        assert_eq!(parse_penalty_rate("0,5 %"), Some(0.5));
        assert_eq!(parse_penalty_rate("2 pour mille"), Some(0.2));
        assert_eq!(parse_penalty_rate("0.2"), Some(0.2));
    }

    #[test]
    fn test_penalty_fraction_with_grouped_denominator() {
        assert_eq!(parse_penalty_rate("1/1 000"), Some(0.1));
        assert_eq!(parse_penalty_rate("1/1 000 du montant par jour"), Some(0.1));
        assert_eq!(parse_penalty_rate("1/1\u{a0}000"), Some(0.1));
        assert_eq!(parse_penalty_rate("1/2000"), Some(0.05));
        assert_eq!(parse_penalty_rate("5/10 000"), Some(0.05));
    }

    #[test]
    fn test_penalty_rejects_unqualified_text() {
        assert_eq!(parse_penalty_rate("500 DH par jour"), None);
        assert_eq!(parse_penalty_rate("1/0"), None);
        assert_eq!(parse_penalty_rate("selon CPS"), None);
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("3%"), Some(3.0));
        assert_eq!(parse_percentage("3 % du montant initial"), Some(3.0));
        assert_eq!(parse_percentage("1,5"), Some(1.5));
        assert_eq!(parse_percentage("trois pour cent"), None);
        assert_eq!(parse_percentage("3 pour cent"), Some(3.0));
    }

    #[test]
    fn test_parse_percentage_skips_article_numbers() {
        assert_eq!(
            parse_percentage("Article 40 du CPS : 3% du montant initial"),
            Some(3.0)
        );
        assert_eq!(parse_percentage("art. 15 - 10 pour cent"), Some(10.0));
    }

    #[test]
    fn test_guarantee_rate_after_article_reference() {
        let raw = json!({ "caution_definitive": "Article 40 du CPS : 3% du montant initial" });
        let details = ContractDerivation::new()
            .derive(Some(&raw), &estimate("500 000,00", Some("DH")));
        assert_eq!(details.final_guarantee.rate_percent, Some(3.0));
        assert_eq!(
            details.final_guarantee.estimated_amount.as_deref(),
            Some("15 000,00 DH")
        );
    }

    #[test]
    fn test_penalty_text_leading_with_cap() {
        let raw = json!({ "penalite_retard": "Plafond: 10%; pénalité de 1/1000 par jour" });
        let details = ContractDerivation::new().derive(Some(&raw), &TotalEstimate::default());
        assert_eq!(details.late_penalty.daily_rate_percent, Some(0.1));
        assert_eq!(details.late_penalty.cap_percent, Some(10.0));
    }

    #[test]
    fn test_guarantee_amount_out_of_range() {
        let huge = format!("1{}", "0".repeat(45));
        let amount = ContractDerivation::new()
            .estimated_guarantee_amount(&estimate(&huge, Some("DH")), Some(3.0));
        assert_eq!(amount, None);
    }

    #[test]
    fn test_derive_object_forms() {
        let raw = json!({
            "delai_execution": { "value": "30 jours calendaires", "source": "CPS art. 7" },
            "penalite_retard": { "taux": "1/1000", "plafond": "10%" },
            "mode_attribution": "Offre économiquement la plus avantageuse",
            "caution_definitive": { "taux": "3%", "montant_estime": "ignored" }
        });
        let details = ContractDerivation::new()
            .derive(Some(&raw), &estimate("500 000,00", Some("DH")));
        assert_eq!(details.execution_delay.as_deref(), Some("30 Jours"));
        assert_eq!(details.late_penalty.daily_rate_percent, Some(0.1));
        assert_eq!(details.late_penalty.cap_percent, Some(10.0));
        assert_eq!(
            details.award_mode.as_deref(),
            Some("Offre économiquement la plus avantageuse")
        );
        assert_eq!(details.final_guarantee.rate_percent, Some(3.0));
        assert_eq!(
            details.final_guarantee.estimated_amount.as_deref(),
            Some("15 000,00 DH")
        );
    }

    #[test]
    fn test_derive_text_forms() {
        let raw = json!({
            "penalite_retard": "1‰ par jour de retard, plafonnée à 8 % du montant",
            "caution_definitive": "3% du montant initial du marché"
        });
        let details = ContractDerivation::new().derive(Some(&raw), &estimate("1.200.000", None));
        assert_eq!(details.late_penalty.daily_rate_percent, Some(0.1));
        assert_eq!(details.late_penalty.cap_percent, Some(8.0));
        assert_eq!(details.final_guarantee.estimated_amount.as_deref(), Some("36 000,00 DH"));
    }

    #[test]
    fn test_missing_operand_gives_no_amount() {
        let derivation = ContractDerivation::new();
        let raw = json!({ "caution_definitive": "selon le CPS" });
        let details = derivation.derive(Some(&raw), &estimate("500 000,00", Some("DH")));
        assert_eq!(details.final_guarantee.rate_percent, None);
        assert_eq!(details.final_guarantee.estimated_amount, None);

        let raw = json!({ "caution_definitive": "3%" });
        let details = derivation.derive(Some(&raw), &estimate("non communiqué", Some("DH")));
        assert_eq!(details.final_guarantee.rate_percent, Some(3.0));
        assert_eq!(details.final_guarantee.estimated_amount, None);

        let details = derivation.derive(Some(&raw), &TotalEstimate::default());
        assert_eq!(details.final_guarantee.estimated_amount, None);
    }

    #[test]
    fn test_derive_absent_or_malformed() {
        let derivation = ContractDerivation::new();
        assert_eq!(
            derivation.derive(None, &TotalEstimate::default()),
            ContractDetails::default()
        );
        let raw = json!({
            "penalite_retard": [1, 2],
            "delai_execution": true,
            "caution_definitive": {}
        });
        assert_eq!(
            derivation.derive(Some(&raw), &TotalEstimate::default()),
            ContractDetails::default()
        );
    }

    #[test]
    fn test_custom_amount_format() {
        let format = AmountFormat::new()
            .with_separators(',', '.')
            .with_default_currency("MAD");
        let derivation = ContractDerivation::new().with_amount_format(format);
        assert_eq!(
            derivation.estimated_guarantee_amount(&estimate("250000", None), Some(1.5)),
            Some("3,750.00 MAD".to_string())
        );
    }
}
