//! The in-memory data-grid engine.
//!
//! This is the core of the application: a rule-based filter evaluator, a
//! type-aware stable sort, the column visibility/order model, and the
//! session object that ties them into one `refresh()` pipeline. The engine
//! operates on a snapshot of [`TrackRecord`](crate::model::TrackRecord)s
//! and never touches the files they came from.

pub mod columns;
pub mod filter;
pub mod session;
pub mod sort;

pub use columns::{Column, ColumnCatalog};
pub use filter::{FilterOp, FilterRule, FilterSet};
pub use session::GridSession;
pub use sort::SortState;
