//! Keyword scans over document text, fed to the advisor and risk stages as
//! supporting notes.

/// Terms that signal metrics worth discussing in an investment view.
pub const INVESTMENT_TERMS: &[&str] = &[
    "revenue",
    "profit",
    "growth",
    "debt",
    "cash flow",
    "operating margin",
];

/// Terms that signal risk exposure.
pub const RISK_TERMS: &[&str] = &[
    "debt",
    "loss",
    "liability",
    "volatility",
    "inflation",
    "exposure",
    "decline",
];

/// Documents shorter than this are too thin for investment notes.
const MIN_INVESTMENT_CHARS: usize = 100;

/// Documents shorter than this are too thin for risk notes.
const MIN_RISK_CHARS: usize = 50;

/// Terms from `terms` that occur in `text`, case-insensitively, in list order.
pub fn matched_terms<'a>(text: &str, terms: &[&'a str]) -> Vec<&'a str> {
    let haystack = text.to_lowercase();
    terms
        .iter()
        .copied()
        .filter(|term| haystack.contains(term))
        .collect()
}

/// Investment notes for the advisor stage.
pub fn investment_notes(document: &str) -> String {
    if document.chars().count() < MIN_INVESTMENT_CHARS {
        return "Document too short or invalid for meaningful investment analysis.".to_string();
    }

    let found = matched_terms(document, INVESTMENT_TERMS);
    let headline = if found.is_empty() {
        "- No major financial metrics identified.".to_string()
    } else {
        format!("- Key financial metrics mentioned: {}.", found.join(", "))
    };

    format!(
        "Investment Analysis Summary:\n{headline}\n\
         - Review revenue growth and profit margins.\n\
         - Evaluate debt ratios and liquidity levels.\n\
         - Focus on diversification to reduce risk exposure.\n\
         - Maintain a long-term outlook guided by fundamentals."
    )
}

/// Risk notes for the risk assessment stage.
pub fn risk_notes(document: &str) -> String {
    if document.chars().count() < MIN_RISK_CHARS {
        return "Insufficient data for risk assessment.".to_string();
    }

    let found = matched_terms(document, RISK_TERMS);
    let headline = if found.is_empty() {
        "- No major risk indicators detected.".to_string()
    } else {
        format!("- Detected potential risk indicators: {}.", found.join(", "))
    };

    format!(
        "Risk Assessment Report:\n{headline}\n\
         - Review credit exposure and liquidity risks.\n\
         - Monitor market volatility and inflation trends.\n\
         - Assess compliance and operational resilience.\n\
         - Recommend appropriate hedging or diversification strategies."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILING: &str = "Quarterly REVENUE rose while operating margin held steady. \
        Free Cash Flow improved; long-term Debt was refinanced amid inflation and FX volatility.";

    #[test]
    fn matching_is_case_insensitive_and_ordered() {
        assert_eq!(
            matched_terms(FILING, INVESTMENT_TERMS),
            vec!["revenue", "debt", "cash flow", "operating margin"]
        );
        assert_eq!(
            matched_terms(FILING, RISK_TERMS),
            vec!["debt", "volatility", "inflation"]
        );
    }

    #[test]
    fn short_documents_get_fixed_notes() {
        assert_eq!(
            investment_notes("revenue up"),
            "Document too short or invalid for meaningful investment analysis."
        );
        assert_eq!(risk_notes("debt"), "Insufficient data for risk assessment.");
    }

    #[test]
    fn notes_list_found_terms() {
        let notes = investment_notes(FILING);
        assert!(notes.contains("Key financial metrics mentioned: revenue, debt, cash flow, operating margin."));

        let notes = risk_notes(FILING);
        assert!(notes.contains("Detected potential risk indicators: debt, volatility, inflation."));
    }

    #[test]
    fn notes_without_matches_say_so() {
        let text = "a".repeat(200);
        assert!(investment_notes(&text).contains("No major financial metrics identified."));
        assert!(risk_notes(&text).contains("No major risk indicators detected."));
    }
}
