pub mod config;
pub mod input;
pub mod pipeline;
pub mod resolve;
pub mod segment;
pub mod serialize;
pub mod simfile;

pub use config::{ConfigError, ConvertConfig, OutputRouting, SimfilePlan};
pub use pipeline::{Conversion, ConversionJob, ConversionPipeline};
pub use resolve::{UnitResolver, UnitWarning};
pub use segment::TempoSegmenter;
