//! The impact aggregator.
//!
//! Transforms the full row set into the numeric shapes each visualization
//! needs, scoped to the active constituency and year and limited to the sum
//! of effects from the currently toggled provisions.
//!
//! The central algorithmic property is the additive composition law: a
//! row's net impact is the sum, over selected provisions, of that
//! provision's signed contribution. Deselecting a provision removes exactly
//! its contribution; the empty selection sums to zero for every row.
//! Contributions are summed in fixed catalog order, so identical inputs
//! always produce bit-identical outputs. Nothing is cached: every call is a
//! pure re-derivation, and redundant recomputation is safe by design.
//!
//! Sign convention: spending measures are positive-for-household, revenue
//! raisers negative. The aggregate preserves signs without renormalization.
//! Missing or unparseable cells contribute zero to sums, so a malformed row
//! only ever affects its own derived values.

use serde::{Deserialize, Serialize};

use crate::catalog::ProvisionId;
use crate::dataset::{
    ImpactDataset, COL_FAMILY_TYPE, COL_HOUSEHOLD_INCOME, COL_INCOME_DECILE, COL_YEAR,
    COL_CONSTITUENCY_CODE,
};
use crate::selection::{SelectionState, Year};
use crate::table::Row;

/// Signed contribution of one provision to one row.
///
/// For a composite provision this is the sum of its sub-columns. A missing
/// or unparseable cell contributes zero.
#[must_use]
pub fn provision_contribution(row: &Row, id: ProvisionId) -> f64 {
    id.impact_columns()
        .iter()
        .map(|col| row.number(col).unwrap_or(0.0))
        .sum()
}

/// Net impact of the selected provisions on one row.
///
/// Summation runs in catalog order independent of how the selection was
/// built, keeping equal selections bit-identical.
#[must_use]
pub fn net_row_impact(row: &Row, state: &SelectionState) -> f64 {
    ProvisionId::ALL
        .into_iter()
        .filter(|id| state.is_selected(*id))
        .map(|id| provision_contribution(row, id))
        .sum()
}

/// Net-impact sum for one family-type bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyTypeImpact {
    /// Family-type label as it appears in the dataset.
    pub family_type: String,
    /// Summed net impact across the bucket's households.
    pub total: f64,
    /// Number of household records in the bucket.
    pub households: usize,
}

/// One aggregate value per supported year, selection held fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    /// Projection year.
    pub year: u16,
    /// Summed net impact across the year's matching rows.
    pub total: f64,
}

/// Net impact for one income decile, absolute and relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeBandImpact {
    /// Income decile (1 = lowest).
    pub decile: u8,
    /// Summed net impact in currency.
    pub total: f64,
    /// Net impact as a percentage of the band's summed income
    /// (zero when the band has no recorded income).
    pub share_of_income: f64,
}

/// One `(income, net impact)` point per household record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Gross household income.
    pub income: f64,
    /// Net impact of the selected provisions.
    pub impact: f64,
}

/// The full bundle of derived series the presentation layer consumes.
///
/// Recomputed wholesale whenever the selection or the dataset changes;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    /// Net impact by family type.
    pub family_breakdown: Vec<FamilyTypeImpact>,
    /// Net impact over the supported years.
    pub trend: Vec<YearPoint>,
    /// Net impact by income decile.
    pub income_distribution: Vec<IncomeBandImpact>,
    /// Per-household income vs. impact coordinates.
    pub scatter: Vec<ScatterPoint>,
}

impl AggregatedSeries {
    /// Derives all four series for the given dataset and selection.
    #[must_use]
    pub fn compute(dataset: &ImpactDataset, state: &SelectionState) -> Self {
        let aggregator = ImpactAggregator::new(dataset, state);
        Self {
            family_breakdown: aggregator.family_breakdown(),
            trend: aggregator.trend(),
            income_distribution: aggregator.income_distribution(),
            scatter: aggregator.scatter(),
        }
    }
}

/// Pure derivation over `{dataset, selection}`.
#[derive(Debug, Clone, Copy)]
pub struct ImpactAggregator<'a> {
    dataset: &'a ImpactDataset,
    state: &'a SelectionState,
}

impl<'a> ImpactAggregator<'a> {
    /// Creates an aggregator borrowing the dataset and selection.
    #[must_use]
    pub const fn new(dataset: &'a ImpactDataset, state: &'a SelectionState) -> Self {
        Self { dataset, state }
    }

    /// Total net impact across the rows matching the active constituency
    /// and year.
    #[must_use]
    pub fn net_impact(&self) -> f64 {
        self.matching_rows(Some(self.state.year))
            .map(|row| net_row_impact(row, self.state))
            .sum()
    }

    /// Net impact bucketed by family type, sorted by label.
    ///
    /// Rows without a family-type value are left out of the breakdown.
    #[must_use]
    pub fn family_breakdown(&self) -> Vec<FamilyTypeImpact> {
        let mut buckets: std::collections::BTreeMap<String, (f64, usize)> =
            std::collections::BTreeMap::new();

        for row in self.matching_rows(Some(self.state.year)) {
            let Some(family_type) = row.get(COL_FAMILY_TYPE) else {
                continue;
            };
            let entry = buckets.entry(family_type.to_string()).or_insert((0.0, 0));
            entry.0 += net_row_impact(row, self.state);
            entry.1 += 1;
        }

        buckets
            .into_iter()
            .map(|(family_type, (total, households))| FamilyTypeImpact {
                family_type,
                total,
                households,
            })
            .collect()
    }

    /// Net impact per supported year, holding the policy selection fixed.
    #[must_use]
    pub fn trend(&self) -> Vec<YearPoint> {
        Year::supported()
            .map(|year| YearPoint {
                year: year.get(),
                total: self
                    .matching_rows(Some(year))
                    .map(|row| net_row_impact(row, self.state))
                    .sum(),
            })
            .collect()
    }

    /// Net impact per income decile, absolute and as a percentage of the
    /// band's summed income.
    ///
    /// Rows without a decile in 1–10 are left out of the distribution.
    #[must_use]
    pub fn income_distribution(&self) -> Vec<IncomeBandImpact> {
        let mut bands: std::collections::BTreeMap<u8, (f64, f64)> =
            std::collections::BTreeMap::new();

        for row in self.matching_rows(Some(self.state.year)) {
            let Some(decile) = row
                .number(COL_INCOME_DECILE)
                .map(|d| d as i64)
                .filter(|d| (1..=10).contains(d))
            else {
                continue;
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let decile = decile as u8;
            let entry = bands.entry(decile).or_insert((0.0, 0.0));
            entry.0 += net_row_impact(row, self.state);
            entry.1 += row.number(COL_HOUSEHOLD_INCOME).unwrap_or(0.0);
        }

        bands
            .into_iter()
            .map(|(decile, (total, income))| IncomeBandImpact {
                decile,
                total,
                share_of_income: if income > 0.0 {
                    100.0 * total / income
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// One scatter point per household record with a parseable income.
    #[must_use]
    pub fn scatter(&self) -> Vec<ScatterPoint> {
        self.matching_rows(Some(self.state.year))
            .filter_map(|row| {
                let income = row.number(COL_HOUSEHOLD_INCOME)?;
                Some(ScatterPoint {
                    income,
                    impact: net_row_impact(row, self.state),
                })
            })
            .collect()
    }

    /// Rows matching the active constituency and, when `year` is given,
    /// that projection year. Rows without a parseable year value are
    /// treated as year-agnostic.
    fn matching_rows(&self, year: Option<Year>) -> impl Iterator<Item = &'a Row> {
        let code = self
            .state
            .constituency
            .as_ref()
            .map(|c| c.code.clone());
        let year = year.map(Year::get);

        self.dataset.rows().iter().filter(move |row| {
            if let Some(code) = &code {
                if row.get(COL_CONSTITUENCY_CODE) != Some(code.as_str()) {
                    return false;
                }
            }
            if let Some(year) = year {
                if let Some(row_year) = row.number(COL_YEAR) {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    if row_year as u16 != year {
                        return false;
                    }
                }
            }
            true
        })
    }
}
