use html::Node;
use tokio::time::Instant;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::report::RenderReport;
use crate::serializer::Serializer;

/// A finished document together with what each component waited for.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub html: String,
    pub report: RenderReport,
}

/// Serialize a whole document: doctype, then the root's markup.
pub async fn render_document(root: &Node, config: &RenderConfig) -> Result<String, RenderError> {
    render_with_report(root, config).await.map(|r| r.html)
}

pub async fn render_with_report(root: &Node, config: &RenderConfig) -> Result<Rendered, RenderError> {
    let start = Instant::now();
    let mut html = String::from(config.doctype.as_str());
    let mut serializer = Serializer::new(config);
    serializer.serialize(root, &mut html).await?;
    let report = serializer.into_report();
    log::debug!(
        target: "ssr.serializer",
        "rendered {} bytes, {} components, in {}ms",
        html.len(),
        report.nodes.len(),
        start.elapsed().as_millis()
    );
    Ok(Rendered { html, report })
}
