//! Error type for the conversion pipeline.
//!
//! Style and markup handling never fail; only reading the input through the
//! DOM provider and loading a configuration document can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The HTML parser could not read the input.
    #[error("failed to parse HTML: {0}")]
    Parse(#[from] std::io::Error),

    /// A conversion config document was not valid JSON for [`ConvertConfig`].
    ///
    /// [`ConvertConfig`]: crate::pipeline::ConvertConfig
    #[error("invalid conversion config: {0}")]
    Config(#[from] serde_json::Error),
}
