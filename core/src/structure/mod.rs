//! Dataset structuring: converter driver, bucket routing, placement
//! and the run changelog

pub mod buckets;
pub mod changelog;
pub mod convert;
pub mod structurer;

pub use buckets::ModalityBucket;
pub use changelog::{Changelog, ChangelogEntry, SkipReason};
pub use convert::ConverterCommand;
pub use structurer::{
    ConvertedSeries, DatasetStructurer, ScanPlacement, SeriesDefaults, SeriesOutcome,
};
