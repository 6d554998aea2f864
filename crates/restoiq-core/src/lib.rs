//! RestoIQ Core: field map, result envelope, configuration, errors.

pub mod config;
pub mod envelope;
pub mod error;
pub mod fields;

pub use config::{DefaultTargets, PipelineConfig};
pub use envelope::{EnvelopeMeta, EnvelopeStatus, ResultEnvelope, StatusCode};
pub use error::{Error, Result};
pub use fields::{
    is_canonical, DetectedMarker, FieldMap, FieldValue, BUSINESS_FIELDS, CANONICAL_FIELDS,
    GROWTH_FIELDS,
};
