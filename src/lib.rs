//! # budgetscope - Constituency impacts of the Autumn Budget 2025
//!
//! budgetscope is the aggregation core behind a dashboard that explores the
//! estimated local-area effects of the Autumn Budget 2025 across the 650 UK
//! electoral constituencies. It loads the precomputed impact table, keeps a
//! URL-synchronized selection, and derives the numeric series every chart
//! consumes.
//!
//! ## Core Concepts
//!
//! - **Provision**: one discrete budget policy change with its own modeled
//!   impact, registered in a fixed nine-entry catalog
//! - **Constituency**: one of 650 electoral units, the unit of local-area
//!   aggregation
//! - **Selection**: the {constituency, provision toggles, year} tuple,
//!   round-tripped through the URL query string
//! - **AggregatedSeries**: the derived family-type, trend, income-band, and
//!   scatter shapes, recomputed as a pure function of rows and selection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use budgetscope::{DashboardSession, ProvisionId, SelectionAction};
//!
//! // Boot from the static dataset and the page's query string.
//! let mut session = DashboardSession::boot(
//!     "public/data/constituency.csv",
//!     "policies=two_child_limit&constituency=E14001234",
//! );
//!
//! // Toggling a provision yields freshly derived series.
//! let series = session
//!     .apply(SelectionAction::ToggleProvision(ProvisionId::FuelDutyFreeze))
//!     .unwrap();
//! assert_eq!(series.trend.len(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Data layer
pub mod catalog;
pub mod constituency;
pub mod dataset;
pub mod error;
pub mod table;

// Selection and derivation
pub mod aggregate;
pub mod selection;
pub mod session;
pub mod store;

// Re-export primary types at crate root for convenience
pub use aggregate::{
    net_row_impact, provision_contribution, AggregatedSeries, FamilyTypeImpact,
    ImpactAggregator, IncomeBandImpact, ScatterPoint, YearPoint,
};
pub use catalog::{catalog, MeasureKind, Provision, ProvisionId, CATALOG};
pub use constituency::{code_is_well_formed, ConstituencyRef};
pub use dataset::{Fingerprint, ImpactDataset};
pub use error::{BudgetError, BudgetResult, DataError, ValidationError};
pub use selection::{SelectionState, Year};
pub use session::DashboardSession;
pub use store::{
    SelectionAction, SelectionChange, SelectionStore, SelectionWatch, SubscriptionId,
};
pub use table::{Row, Table};
