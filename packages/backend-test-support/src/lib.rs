//! Test helpers shared by the backend's integration suites.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
