//! Presentation blocks. Each one is a pure function of a [`FilteredView`]
//! plus, for a few of them, a user-chosen parameter.
//!
//! [`FilteredView`]: crate::filter::FilteredView

pub mod comparative;
pub mod demographic;
pub mod explorer;
pub mod geographic;
pub mod kpi;
pub mod statistical;
pub mod temporal;
