//! Market-study assistant over the data.gouv.fr open-data catalog.
//!
//! One request flows sector/location → term expansion → bounded catalog
//! aggregation → five heuristic analysis stages plus optional narrative
//! enrichment → a single report object. Every external failure degrades to
//! an empty field; a run always returns a report.

pub mod analysis;
pub mod catalog;
pub mod llm;
pub mod narrative;
pub mod report;
pub mod sectors;
pub mod server;
pub mod state;
