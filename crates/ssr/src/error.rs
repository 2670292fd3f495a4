use html::MarkupError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error("could not start the render runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
