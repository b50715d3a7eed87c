mod settings;

pub use settings::{Overrides, Settings};
#[cfg(test)]
pub use settings::Paths;
