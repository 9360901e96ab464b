//! Tabular outputs: fixed schemas, the dataset description document
//! and the aggregation pass

pub mod aggregate;
pub mod dataset_description;
pub mod schema;

pub use aggregate::MetadataAggregator;
pub use dataset_description::{dataset_description, write_dataset_description, PROTECTED_KEYS};
pub use schema::{
    participants_fields, scans_mr_fields, sessions_fields, PARTICIPANTS_HEADER, SCANS_MICR_HEADER,
    SCANS_MR_HEADER, SCANS_OP_HEADER, SESSIONS_HEADER,
};
