pub mod executor;

pub use executor::{
    default_output_path, MarkerEntry, MarkerPipeline, MarkerReport, MarkerSettings,
};
