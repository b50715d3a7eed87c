mod errors;
mod feature_builder;
pub(crate) mod stats;

pub use errors::FeatureError;
pub use feature_builder::build_features;
#[cfg(test)]
pub use feature_builder::RATIO_CAP;
