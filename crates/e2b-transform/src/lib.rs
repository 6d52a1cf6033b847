//! Extraction and standardization of E2B(R2) adverse event reports.
//!
//! A validated [`RawForm`](e2b_model::RawForm) is flattened by
//! [`extract_adverse_event_data`] and then mapped onto a
//! [`StandardRecord`](e2b_model::StandardRecord) by [`transform_to_standard`].

pub mod extract;
pub mod options;
pub mod standardize;

pub use extract::extract_adverse_event_data;
pub use options::{GenderMapping, RoleMapping, StandardizeOptions};
pub use standardize::{DEFAULT_REPORT_VERSION, transform_to_standard};
