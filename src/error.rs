//! The things that can go wrong while picking a winner and drawing its card.
//! Connector trouble is reported through `anyhow` instead; see `connector`.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RandomlyError {
    /// Nothing to choose from, or an activity missing what we need to answer it.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The card template could not be read from disk.
    #[error("unable to read card template @ {path:?}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The card template is not a valid handlebars template.
    #[error("unable to parse card template: {0}")]
    TemplateParse(#[from] handlebars::TemplateError),

    /// The template parsed but asked for something the model doesn't have.
    #[error("unable to render card template: {0}")]
    TemplateRender(#[from] handlebars::RenderError),

    /// The rendered card is not JSON, so it cannot ride along as an attachment.
    #[error("rendered card is not valid json: {0}")]
    CardPayload(#[from] serde_json::Error),
}
