//! Filter-and-aggregate core of the enrollment analytics dashboard.
//!
//! A host loads a [`Dataset`] once, builds a [`Selection`] from its controls and
//! calls [`render`] on every interaction.

pub mod blocks;
pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod report;
pub mod stats;

pub use dashboard::{render, Dashboard, RenderParams};
pub use dataset::Dataset;
pub use error::LoadError;
pub use filter::{Choice, DayType, FilteredView, Selection};
