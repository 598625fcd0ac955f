// Canonical workflow vocabularies and the mapping tables that absorb a
// decade of inconsistent spellings. The historical data mixes underscores,
// hyphens, and synonyms ("purchased" for contract-received, "normal" for
// medium); everything funnels through these enums so the rest of the code
// never sees a raw stage string.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageParseError {
    #[error("Unknown deal stage: '{0}'")]
    UnknownStage(String),
    #[error("Unknown deal priority: '{0}'")]
    UnknownPriority(String),
}

/// Finance workflow stage, canonical hyphenated vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinanceStage {
    Intake,
    UnderReview,
    Approved,
    ContractSent,
    ContractReceived,
    FundsDisbursed,
    TitleReceived,
    Closed,
    Cancelled,
}

impl FinanceStage {
    pub const ALL: [FinanceStage; 9] = [
        FinanceStage::Intake,
        FinanceStage::UnderReview,
        FinanceStage::Approved,
        FinanceStage::ContractSent,
        FinanceStage::ContractReceived,
        FinanceStage::FundsDisbursed,
        FinanceStage::TitleReceived,
        FinanceStage::Closed,
        FinanceStage::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FinanceStage::Intake => "intake",
            FinanceStage::UnderReview => "under-review",
            FinanceStage::Approved => "approved",
            FinanceStage::ContractSent => "contract-sent",
            FinanceStage::ContractReceived => "contract-received",
            FinanceStage::FundsDisbursed => "funds-disbursed",
            FinanceStage::TitleReceived => "title-received",
            FinanceStage::Closed => "closed",
            FinanceStage::Cancelled => "cancelled",
        }
    }

    /// Parse any historically observed spelling. Case-, whitespace- and
    /// separator-insensitive. Unknown input is an error, not a pass-through.
    pub fn parse(raw: &str) -> Result<Self, StageParseError> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match key.as_str() {
            "intake" | "new" | "lead" => Ok(FinanceStage::Intake),
            "under-review" | "in-review" | "review" | "pending" => Ok(FinanceStage::UnderReview),
            "approved" | "finance-approved" => Ok(FinanceStage::Approved),
            "contract-sent" | "docs-sent" => Ok(FinanceStage::ContractSent),
            "contract-received" | "docs-received" | "purchased" => Ok(FinanceStage::ContractReceived),
            "funds-disbursed" | "funded" | "disbursed" => Ok(FinanceStage::FundsDisbursed),
            "title-received" | "title-in" => Ok(FinanceStage::TitleReceived),
            "closed" | "complete" | "completed" | "done" => Ok(FinanceStage::Closed),
            "cancelled" | "canceled" | "dead" | "lost" => Ok(FinanceStage::Cancelled),
            _ => Err(StageParseError::UnknownStage(raw.to_string())),
        }
    }

    /// Project the finance stage into the sales pipeline vocabulary
    pub fn sales_stage(&self) -> SalesStage {
        match self {
            FinanceStage::Intake | FinanceStage::UnderReview => SalesStage::Prospect,
            FinanceStage::Approved | FinanceStage::ContractSent => SalesStage::Negotiation,
            FinanceStage::ContractReceived => SalesStage::Contract,
            FinanceStage::FundsDisbursed => SalesStage::Funding,
            FinanceStage::TitleReceived => SalesStage::Delivered,
            FinanceStage::Closed => SalesStage::Closed,
            FinanceStage::Cancelled => SalesStage::Lost,
        }
    }
}

impl std::fmt::Display for FinanceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sales pipeline stage, the vocabulary the pipeline UI works in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SalesStage {
    Prospect,
    Negotiation,
    Contract,
    Funding,
    Delivered,
    Closed,
    Lost,
}

impl SalesStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesStage::Prospect => "prospect",
            SalesStage::Negotiation => "negotiation",
            SalesStage::Contract => "contract",
            SalesStage::Funding => "funding",
            SalesStage::Delivered => "delivered",
            SalesStage::Closed => "closed",
            SalesStage::Lost => "lost",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, StageParseError> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match key.as_str() {
            "prospect" => Ok(SalesStage::Prospect),
            "negotiation" => Ok(SalesStage::Negotiation),
            "contract" => Ok(SalesStage::Contract),
            "funding" => Ok(SalesStage::Funding),
            "delivered" => Ok(SalesStage::Delivered),
            "closed" => Ok(SalesStage::Closed),
            "lost" => Ok(SalesStage::Lost),
            _ => Err(StageParseError::UnknownStage(raw.to_string())),
        }
    }
}

impl std::fmt::Display for SalesStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deal priority, canonical four-level vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl DealPriority {
    pub const ALL: [DealPriority; 4] = [
        DealPriority::Low,
        DealPriority::Medium,
        DealPriority::High,
        DealPriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealPriority::Low => "low",
            DealPriority::Medium => "medium",
            DealPriority::High => "high",
            DealPriority::Urgent => "urgent",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, StageParseError> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match key.as_str() {
            "low" | "none" | "minor" => Ok(DealPriority::Low),
            "medium" | "med" | "normal" | "standard" | "default" => Ok(DealPriority::Medium),
            "high" | "important" => Ok(DealPriority::High),
            "urgent" | "critical" | "rush" | "asap" => Ok(DealPriority::Urgent),
            _ => Err(StageParseError::UnknownPriority(raw.to_string())),
        }
    }
}

impl std::fmt::Display for DealPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_idempotent_over_canonical_vocabulary() {
        for stage in FinanceStage::ALL {
            assert_eq!(FinanceStage::parse(stage.as_str()).unwrap(), stage);
        }
        for priority in DealPriority::ALL {
            assert_eq!(DealPriority::parse(priority.as_str()).unwrap(), priority);
        }
    }

    #[test]
    fn historical_underscore_spellings_normalize() {
        assert_eq!(
            FinanceStage::parse("funds_disbursed").unwrap(),
            FinanceStage::FundsDisbursed
        );
        assert_eq!(
            FinanceStage::parse("contract_received").unwrap(),
            FinanceStage::ContractReceived
        );
        assert_eq!(
            FinanceStage::parse("under_review").unwrap(),
            FinanceStage::UnderReview
        );
        assert_eq!(
            FinanceStage::parse("title_received").unwrap(),
            FinanceStage::TitleReceived
        );
    }

    #[test]
    fn historical_synonyms_normalize() {
        assert_eq!(
            FinanceStage::parse("purchased").unwrap(),
            FinanceStage::ContractReceived
        );
        assert_eq!(FinanceStage::parse("funded").unwrap(), FinanceStage::FundsDisbursed);
        assert_eq!(FinanceStage::parse("done").unwrap(), FinanceStage::Closed);
        assert_eq!(FinanceStage::parse("canceled").unwrap(), FinanceStage::Cancelled);
        assert_eq!(DealPriority::parse("normal").unwrap(), DealPriority::Medium);
        assert_eq!(DealPriority::parse("critical").unwrap(), DealPriority::Urgent);
    }

    #[test]
    fn mixed_legacy_pair_normalizes() {
        // {stage: 'funds_disbursed', priority: 'normal'}
        //   -> {stage: 'funds-disbursed', priority: 'medium'}
        let stage = FinanceStage::parse("funds_disbursed").unwrap();
        let priority = DealPriority::parse("normal").unwrap();
        assert_eq!(stage.as_str(), "funds-disbursed");
        assert_eq!(priority.as_str(), "medium");
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(
            FinanceStage::parse("  Contract Received ").unwrap(),
            FinanceStage::ContractReceived
        );
        assert_eq!(DealPriority::parse("NORMAL").unwrap(), DealPriority::Medium);
    }

    #[test]
    fn unknown_input_is_an_error_not_a_pass_through() {
        assert!(matches!(
            FinanceStage::parse("warp-speed"),
            Err(StageParseError::UnknownStage(_))
        ));
        assert!(matches!(
            DealPriority::parse("whenever"),
            Err(StageParseError::UnknownPriority(_))
        ));
    }

    #[test]
    fn every_finance_stage_maps_into_the_sales_pipeline() {
        use std::collections::HashSet;
        let mapped: HashSet<SalesStage> =
            FinanceStage::ALL.iter().map(|s| s.sales_stage()).collect();
        assert!(mapped.contains(&SalesStage::Prospect));
        assert!(mapped.contains(&SalesStage::Lost));
        assert_eq!(
            FinanceStage::ContractReceived.sales_stage(),
            SalesStage::Contract
        );
    }
}
