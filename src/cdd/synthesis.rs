use super::{NextStep, Scenario, ToolKind};
use serde::{Deserialize, Serialize};

const REPORT_GENERATED_AT: &str = "2025-11-29T12:00:00Z";
const SCORE_SCALE: &str = "0-100";
/// Positive-scenario scores below this read as low risk
const LOW_RISK_CEILING: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub role: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub name: String,
    pub country: String,
    pub incorporation_date: String,
    pub industry: String,
    pub contacts: Vec<Contact>,
    pub status: String,
    pub risk_profile: String,
    pub notes: String,
    pub next_steps: Vec<NextStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub sanctions: u32,
    pub geo_risk: u32,
    pub industry_risk: u32,
    pub transaction_pattern: u32,
}

impl RiskFactors {
    pub const BASELINE: RiskFactors = RiskFactors {
        sanctions: 5,
        geo_risk: 12,
        industry_risk: 20,
        transaction_pattern: 35,
    };

    pub fn total(&self) -> u32 {
        self.sanctions + self.geo_risk + self.industry_risk + self.transaction_pattern
    }

    /// Composite score on the 0-100 scale
    pub fn composite(&self, scenario: Scenario) -> u32 {
        let total = f64::from(self.total());
        match scenario {
            Scenario::Negative => ((total * 2.0) as u32).min(100),
            Scenario::Positive => (total * 0.3) as u32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub customer_id: String,
    pub scale: String,
    pub factors: RiskFactors,
    pub score: u32,
    pub interpretation: String,
    pub recommendation: Vec<String>,
    pub next_steps: Vec<NextStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskExplanation {
    pub customer_id: String,
    pub explanation: String,
    pub recommendation: Vec<String>,
    pub next_steps: Vec<NextStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenIssue {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub kyc_verified: bool,
    pub aml_checks_passed: bool,
    pub open_issues: Vec<OpenIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub customer_id: String,
    pub report_id: String,
    pub generated_at: String,
    pub summary: ReportSummary,
    pub next_steps: Vec<NextStep>,
}

/// Result of any CDD tool; serializes as the bare record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CddResult {
    Profile(CustomerProfile),
    Score(RiskScore),
    Explanation(RiskExplanation),
    Report(ComplianceReport),
}

impl CddResult {
    pub fn kind(&self) -> ToolKind {
        match self {
            CddResult::Profile(_) => ToolKind::Profile,
            CddResult::Score(_) => ToolKind::Score,
            CddResult::Explanation(_) => ToolKind::Explain,
            CddResult::Report(_) => ToolKind::Report,
        }
    }

    pub fn customer_id(&self) -> &str {
        match self {
            CddResult::Profile(p) => &p.customer_id,
            CddResult::Score(s) => &s.customer_id,
            CddResult::Explanation(e) => &e.customer_id,
            CddResult::Report(r) => &r.customer_id,
        }
    }

    pub fn next_steps(&self) -> &[NextStep] {
        match self {
            CddResult::Profile(p) => &p.next_steps,
            CddResult::Score(s) => &s.next_steps,
            CddResult::Explanation(e) => &e.next_steps,
            CddResult::Report(r) => &r.next_steps,
        }
    }

    pub fn next_steps_mut(&mut self) -> &mut Vec<NextStep> {
        match self {
            CddResult::Profile(p) => &mut p.next_steps,
            CddResult::Score(s) => &mut s.next_steps,
            CddResult::Explanation(e) => &mut e.next_steps,
            CddResult::Report(r) => &mut r.next_steps,
        }
    }
}

/// Build the canned result for `kind` in `scenario`, echoing `customer_id`.
///
/// `next_steps` holds only the human actions; structured follow-up calls are
/// attached by the facade.
pub fn synthesize(kind: ToolKind, customer_id: &str, scenario: Scenario) -> CddResult {
    match kind {
        ToolKind::Profile => CddResult::Profile(profile(customer_id, scenario)),
        ToolKind::Score => CddResult::Score(risk_score(customer_id, scenario)),
        ToolKind::Explain => CddResult::Explanation(explanation(customer_id, scenario)),
        ToolKind::Report => CddResult::Report(report(customer_id, scenario)),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn actions(items: &[&str]) -> Vec<NextStep> {
    items.iter().map(|s| NextStep::action(*s)).collect()
}

fn profile(customer_id: &str, scenario: Scenario) -> CustomerProfile {
    let (status, risk_profile, notes, next_steps) = match scenario {
        Scenario::Negative => (
            "under_review",
            "high",
            "Potential sanctions exposure and anomalous transactions detected",
            actions(&[
                "Collect additional KYC",
                "Enhanced monitoring",
                "Escalate to AML officer",
            ]),
        ),
        Scenario::Positive => (
            "active",
            "low",
            "Customer in good standing",
            actions(&["Standard monitoring", "Periodic review in 12 months"]),
        ),
    };

    CustomerProfile {
        customer_id: customer_id.to_string(),
        name: "ACME Corp".into(),
        country: "US".into(),
        incorporation_date: "2010-07-16".into(),
        industry: "Financial Services".into(),
        contacts: vec![Contact {
            name: "Jane Doe".into(),
            role: "Compliance Officer".into(),
            email: "jane.doe@example.com".into(),
        }],
        status: status.into(),
        risk_profile: risk_profile.into(),
        notes: notes.into(),
        next_steps,
    }
}

fn risk_score(customer_id: &str, scenario: Scenario) -> RiskScore {
    let factors = RiskFactors::BASELINE;
    let score = factors.composite(scenario);

    let (interpretation, recommendation, next_steps) = match scenario {
        Scenario::Negative => (
            "High risk",
            strings(&[
                "Immediate enhanced due diligence",
                "Transaction restrictions until cleared",
            ]),
            actions(&[
                "Freeze suspicious accounts",
                "Collect source-of-funds evidence",
                "Notify AML team",
            ]),
        ),
        Scenario::Positive if score < LOW_RISK_CEILING => (
            "Low risk",
            strings(&["Standard monitoring"]),
            actions(&["Routine checks"]),
        ),
        Scenario::Positive => (
            "Moderate risk",
            strings(&["Enhanced monitoring"]),
            actions(&["Request a brief KYC update"]),
        ),
    };

    RiskScore {
        customer_id: customer_id.to_string(),
        scale: SCORE_SCALE.into(),
        factors,
        score,
        interpretation: interpretation.into(),
        recommendation,
        next_steps,
    }
}

fn explanation(customer_id: &str, scenario: Scenario) -> RiskExplanation {
    let (text, recommendation, next_steps) = match scenario {
        Scenario::Negative => (
            "High risk indicators: suspicious transaction patterns, exposure to higher-risk geographies, and possible name matches in screening results.",
            strings(&[
                "Immediate enhanced due diligence",
                "Temporary transaction restrictions",
                "Collect and verify source-of-funds and beneficial ownership documentation",
            ]),
            actions(&[
                "Escalate to AML officer",
                "Open investigation ticket",
                "Contact counterparty banks if required",
            ]),
        ),
        Scenario::Positive => (
            "Low risk profile: strong KYC, low geolocation exposure, and normal transaction patterns.",
            strings(&["Standard monitoring", "Annual re-check"]),
            actions(&["Continue normal monitoring", "Re-run scoring yearly"]),
        ),
    };

    RiskExplanation {
        customer_id: customer_id.to_string(),
        explanation: text.into(),
        recommendation,
        next_steps,
    }
}

fn report(customer_id: &str, scenario: Scenario) -> ComplianceReport {
    let (summary, next_steps) = match scenario {
        Scenario::Negative => (
            ReportSummary {
                kyc_verified: false,
                aml_checks_passed: false,
                open_issues: vec![
                    OpenIssue {
                        id: "ISS-01".into(),
                        description: "Multiple high-value transfers to flagged jurisdictions"
                            .into(),
                    },
                    OpenIssue {
                        id: "ISS-02".into(),
                        description: "Possible mismatch in beneficial owner documentation".into(),
                    },
                ],
            },
            actions(&[
                "Freeze account pending investigation",
                "Collect source-of-funds evidence",
                "Escalate to AML officer and file internal incident",
            ]),
        ),
        Scenario::Positive => (
            ReportSummary {
                kyc_verified: true,
                aml_checks_passed: true,
                open_issues: Vec::new(),
            },
            actions(&["Archive check results", "Re-evaluate in 12 months"]),
        ),
    };

    ComplianceReport {
        customer_id: customer_id.to_string(),
        report_id: format!("RPT-{customer_id}-001"),
        generated_at: REPORT_GENERATED_AT.into(),
        summary,
        next_steps,
    }
}
