//! Direction rules: which marker phrase means which kind of transaction.
//!
//! Rules are evaluated top to bottom against the lowercased message and the
//! first one whose marker appears wins. Adding a phrasing (or a new kind of
//! outflow) means adding a row here, not another branch in the parser.

use anyhow::Result;
use cashflow_core::draft::{DraftKind, SAVINGS_DEPOSIT_TITLE};
use regex::Regex;
use std::sync::OnceLock;

/// Which way the money moved relative to the phone's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    /// Outbound payments become savings deposits when the counterparty is
    /// the savings provider.
    Outbound,
}

/// Recognizes the savings provider among counterparties.
///
/// Case-insensitive substring match over a token list. Tighten the tokens
/// (or the match) here; nothing else in the cascade knows about the brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingsProvider {
    tokens: Vec<String>,
}

impl Default for SavingsProvider {
    fn default() -> Self {
        Self::new(["zidi", "ziidi"])
    }
}

impl SavingsProvider {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn matches(&self, partner: &str) -> bool {
        let partner = partner.to_lowercase();
        self.tokens.iter().any(|t| partner.contains(t.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    /// Lowercase phrases; any one present selects the rule
    markers: Vec<String>,
    /// Tried in order, first non-empty capture group 1 is the partner
    partner_patterns: Vec<Regex>,
    pub fallback_partner: String,
    pub title_prefix: String,
    pub direction: Direction,
}

/// Safaricom sometimes writes "paid to SHOP. on 1/1/25".
fn clean_partner(raw: &str) -> String {
    raw.trim().trim_end_matches('.').trim_end().to_string()
}

/// Outcome of the first matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: DraftKind,
    pub partner: String,
    pub title: String,
}

impl Rule {
    pub fn new(
        name: &str,
        markers: &[&str],
        partner_patterns: &[&str],
        fallback_partner: &str,
        title_prefix: &str,
        direction: Direction,
    ) -> Result<Self> {
        let partner_patterns = partner_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            markers: markers.iter().map(|m| m.to_lowercase()).collect(),
            partner_patterns,
            fallback_partner: fallback_partner.to_string(),
            title_prefix: title_prefix.to_string(),
            direction,
        })
    }

    /// `lowered` must already be lowercased.
    pub fn applies(&self, lowered: &str) -> bool {
        self.markers.iter().any(|m| lowered.contains(m.as_str()))
    }

    pub fn partner(&self, message: &str) -> String {
        self.partner_patterns
            .iter()
            .filter_map(|re| re.captures(message))
            .filter_map(|caps| caps.get(1).map(|m| clean_partner(m.as_str())))
            .find(|p| !p.is_empty())
            .unwrap_or_else(|| self.fallback_partner.clone())
    }

    pub fn classify(&self, message: &str, savings: &SavingsProvider) -> Classification {
        let partner = self.partner(message);
        match self.direction {
            Direction::Inbound => Classification {
                kind: DraftKind::Income,
                title: format!("{} {}", self.title_prefix, partner),
                partner,
            },
            Direction::Outbound if savings.matches(&partner) => Classification {
                kind: DraftKind::Savings,
                title: SAVINGS_DEPOSIT_TITLE.to_string(),
                partner,
            },
            Direction::Outbound => Classification {
                kind: DraftKind::expense(),
                title: format!("{} {}", self.title_prefix, partner),
                partner,
            },
        }
    }
}

/// The stock M-PESA phrasings, in priority order.
pub fn default_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            Rule::new(
                "received",
                &["received"],
                &[r"(?i)from\s+(.+?)\s+on\b", r"(?i)from\s+(.+?)\."],
                "Unknown Source",
                "Received from",
                Direction::Inbound,
            )
            .expect("invalid received rule"),
            Rule::new(
                "paid-or-sent-to",
                &["paid to", "sent to"],
                &[
                    r"(?i)(?:paid|sent)\s+to\s+(.+?)\s+on\b",
                    r"(?i)(?:paid|sent)\s+to\s+(.+?)\.",
                ],
                "Unknown recipient",
                "Paid to",
                Direction::Outbound,
            )
            .expect("invalid paid-to rule"),
            Rule::new(
                "paid-for",
                &["paid for"],
                &[r"(?i)paid\s+for\s+(.+?)\s+on\b", r"(?i)paid\s+for\s+(.+?)\."],
                "Services",
                "Payment for",
                Direction::Outbound,
            )
            .expect("invalid paid-for rule"),
        ]
    })
}

/// Run the rule table; `None` when no marker is present.
pub fn classify(message: &str, rules: &[Rule], savings: &SavingsProvider) -> Option<Classification> {
    let lowered = message.to_lowercase();
    let rule = rules.iter().find(|r| r.applies(&lowered))?;
    tracing::debug!(rule = %rule.name, "matched direction rule");
    Some(rule.classify(message, savings))
}
