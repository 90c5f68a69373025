//! Classification pipeline
//!
//! raw row → mission adapter → features → scaling → classifier → verdict,
//! driven by the batch and single-sample orchestrators.

pub mod error;
pub mod features;
pub mod mission;
pub mod model;
pub mod pipeline;
pub mod reference;
pub mod scaling;
pub mod verdict;
