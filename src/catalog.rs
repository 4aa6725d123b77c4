//! The fixed registry of Autumn Budget 2025 provisions.
//!
//! The catalog is versioned data, not behavior: nine provisions, defined at
//! process start and never mutated. Each entry carries the display strings
//! the UI needs, the measure kind, the chart color, and — crucially for the
//! aggregator — the explicit mapping from the provision to the impact
//! column(s) that carry its modeled effect. A provision usually maps to a
//! single column; the unearned-income provision is a composite over the
//! dividend, savings, and property sub-policy columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier for one budget provision.
///
/// This is a closed enumeration: every provision the dashboard knows about
/// is a variant here, and every string id arriving from a URL resolves
/// through [`ProvisionId::resolve`] or is dropped. Variant order is catalog
/// order, which is also the UI display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionId {
    /// Two-child limit repeal.
    TwoChildLimit,
    /// Fuel duty freeze extension.
    FuelDutyFreeze,
    /// Rail fares freeze.
    RailFaresFreeze,
    /// Income tax threshold freeze extension.
    ThresholdFreezeExtension,
    /// Student loan repayment threshold freeze.
    #[serde(rename = "freeze_student_loan_thresholds")]
    StudentLoanThresholdFreeze,
    /// Salary sacrifice pension cap.
    SalarySacrificeCap,
    /// Combined unearned income tax increases (dividends, savings, property).
    #[serde(rename = "unearned_income_tax_increase_2pp")]
    UnearnedIncomeTaxIncrease,
    /// High value council tax surcharge.
    HighValueCouncilTaxSurcharge,
    /// Electric vehicle mileage charge.
    EvMileageCharge,
}

impl ProvisionId {
    /// All provisions, in catalog order.
    pub const ALL: [Self; 9] = [
        Self::TwoChildLimit,
        Self::FuelDutyFreeze,
        Self::RailFaresFreeze,
        Self::ThresholdFreezeExtension,
        Self::StudentLoanThresholdFreeze,
        Self::SalarySacrificeCap,
        Self::UnearnedIncomeTaxIncrease,
        Self::HighValueCouncilTaxSurcharge,
        Self::EvMileageCharge,
    ];

    /// The stable slug used in URLs and data files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoChildLimit => "two_child_limit",
            Self::FuelDutyFreeze => "fuel_duty_freeze",
            Self::RailFaresFreeze => "rail_fares_freeze",
            Self::ThresholdFreezeExtension => "threshold_freeze_extension",
            Self::StudentLoanThresholdFreeze => "freeze_student_loan_thresholds",
            Self::SalarySacrificeCap => "salary_sacrifice_cap",
            Self::UnearnedIncomeTaxIncrease => "unearned_income_tax_increase_2pp",
            Self::HighValueCouncilTaxSurcharge => "high_value_council_tax_surcharge",
            Self::EvMileageCharge => "ev_mileage_charge",
        }
    }

    /// Resolves a canonical slug or a known legacy alias.
    ///
    /// Aliases are explicit and exhaustive: older links and exports used
    /// the three unearned-income sub-policy ids and a couple of informal
    /// names. Anything not listed here is unknown and the caller drops it.
    #[must_use]
    pub fn resolve(id: &str) -> Option<Self> {
        if let Ok(parsed) = id.parse() {
            return Some(parsed);
        }

        match id {
            "dividend_tax_increase_2pp"
            | "savings_tax_increase_2pp"
            | "property_tax_increase_2pp" => Some(Self::UnearnedIncomeTaxIncrease),
            "student_loan_freeze" => Some(Self::StudentLoanThresholdFreeze),
            "mansion_tax" => Some(Self::HighValueCouncilTaxSurcharge),
            "ev_excise_duty" => Some(Self::EvMileageCharge),
            _ => None,
        }
    }

    /// The catalog entry for this provision.
    #[must_use]
    pub fn provision(self) -> &'static Provision {
        &CATALOG[self as usize]
    }

    /// The impact column(s) carrying this provision's modeled effect.
    #[must_use]
    pub fn impact_columns(self) -> &'static [&'static str] {
        self.provision().columns
    }
}

impl FromStr for ProvisionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownProvision { id: s.to_string() })
    }
}

impl fmt::Display for ProvisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a provision costs the treasury or raises revenue.
///
/// Spending measures are recorded as positive-for-household effects,
/// revenue raisers as negative-for-household effects. The aggregator
/// preserves this convention without renormalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    /// Costs the treasury; households gain.
    Spending,
    /// Raises revenue; households pay.
    Revenue,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Provision {
    /// Stable identifier.
    pub id: ProvisionId,
    /// Display name.
    pub name: &'static str,
    /// Short description for toggles and tooltips.
    pub description: &'static str,
    /// Long-form explanation; may contain inline hyperlink markup, rendered
    /// as-is by the presentation layer.
    pub explanation: &'static str,
    /// Spending measure or revenue raiser.
    pub kind: MeasureKind,
    /// Impact column(s) in `constituency.csv` carrying this provision.
    pub columns: &'static [&'static str],
    /// Chart color for this provision's series.
    pub color: &'static str,
}

/// The fixed, ordered catalog of the nine Autumn Budget 2025 provisions.
pub static CATALOG: [Provision; 9] = [
    Provision {
        id: ProvisionId::TwoChildLimit,
        name: "2 child limit repeal",
        description: "Removes the two-child limit on benefits from April 2026.",
        explanation: "The limit restricts child-related payments in Universal \
            Credit and Tax Credits to the first two children in a family. The \
            Budget removes it from April 2026, compared against a pre-budget \
            baseline with a limit of 2.",
        kind: MeasureKind::Spending,
        columns: &["two_child_limit"],
        color: "#2C6496",
    },
    Provision {
        id: ProvisionId::FuelDutyFreeze,
        name: "Fuel duty freeze extension",
        description: "Extends the 5p fuel duty cut until September 2026, then a staggered reversal.",
        explanation: "Without the freeze, the 5p cut would have ended in March \
            2026 with RPI uprating thereafter. See \
            <a href=\"https://policyengine.org/uk/research/fuel-duty-freeze-2025\">the research note</a> \
            for the staggered reversal schedule.",
        kind: MeasureKind::Spending,
        columns: &["fuel_duty_freeze"],
        color: "#39C6C0",
    },
    Provision {
        id: ProvisionId::RailFaresFreeze,
        name: "Rail fares freeze",
        description: "Freezes regulated rail fares for one year from March 2026.",
        explanation: "The first fares freeze in 30 years; fares would otherwise \
            have risen 5.8% under the RPI formula. Saves commuters on expensive \
            routes over £300 a year. See \
            <a href=\"https://policyengine.org/uk/research/rail-fares-freeze-2025\">the research note</a>.",
        kind: MeasureKind::Spending,
        columns: &["rail_fares_freeze"],
        color: "#4B9B6E",
    },
    Provision {
        id: ProvisionId::ThresholdFreezeExtension,
        name: "Threshold freeze extension",
        description: "Extends the income tax threshold freeze from April 2028 to April 2031.",
        explanation: "The personal allowance stays at £12,570 and the higher \
            rate threshold at £37,700, compared against a pre-budget baseline \
            that resumed inflation uprating from 2028.",
        kind: MeasureKind::Revenue,
        columns: &["threshold_freeze_extension"],
        color: "#D97706",
    },
    Provision {
        id: ProvisionId::StudentLoanThresholdFreeze,
        name: "Student loan threshold freeze",
        description: "Freezes Plan 2 repayment thresholds for three years from April 2027.",
        explanation: "The Plan 2 threshold is held at £29,385 through April \
            2029 instead of rising with RPI, so graduates repay more. RPI \
            uprating resumes from 2030.",
        kind: MeasureKind::Revenue,
        columns: &["freeze_student_loan_thresholds"],
        color: "#8B5CF6",
    },
    Provision {
        id: ProvisionId::SalarySacrificeCap,
        name: "Salary sacrifice cap",
        description: "Caps salary-sacrificed pension contributions at £2,000 from April 2029.",
        explanation: "Contributions above the cap become employment income \
            subject to income tax and NICs, with a broad-base haircut where \
            employers spread increased NI costs across all workers.",
        kind: MeasureKind::Revenue,
        columns: &["salary_sacrifice_cap"],
        color: "#DC2626",
    },
    Provision {
        id: ProvisionId::UnearnedIncomeTaxIncrease,
        name: "Unearned income tax increases",
        description: "Raises tax rates on dividend, savings and property income by 2pp.",
        explanation: "Dividend rates rise from April 2026, savings and property \
            rates from April 2027, each by two percentage points. Shown as one \
            combined provision; the modeled effect is the sum of the three \
            underlying measures.",
        kind: MeasureKind::Revenue,
        columns: &[
            "dividend_tax_increase_2pp",
            "savings_tax_increase_2pp",
            "property_tax_increase_2pp",
        ],
        color: "#B45309",
    },
    Provision {
        id: ProvisionId::HighValueCouncilTaxSurcharge,
        name: "High value council tax surcharge",
        description: "Annual surcharge on homes valued over £2 million from April 2028.",
        explanation: "A council tax surcharge on residential property valued \
            above £2 million, rising with property value, payable by owners \
            from April 2028.",
        kind: MeasureKind::Revenue,
        columns: &["high_value_council_tax_surcharge"],
        color: "#64748B",
    },
    Provision {
        id: ProvisionId::EvMileageCharge,
        name: "Electric vehicle mileage charge",
        description: "Per-mile charge for electric and plug-in hybrid cars from April 2028.",
        explanation: "Electric vehicle drivers pay 3p per mile (1.5p for \
            plug-in hybrids) alongside vehicle excise duty, partially \
            replacing foregone fuel duty revenue.",
        kind: MeasureKind::Revenue,
        columns: &["ev_mileage_charge"],
        color: "#0E7490",
    },
];

/// The full ordered catalog.
#[must_use]
pub fn catalog() -> &'static [Provision; 9] {
    &CATALOG
}

/// All canonical provision ids, in catalog order.
#[must_use]
pub fn provision_ids() -> Vec<&'static str> {
    ProvisionId::ALL.iter().map(|p| p.as_str()).collect()
}
