mod pipeline;
#[cfg(test)]
mod tests;

pub use pipeline::Pipeline;
