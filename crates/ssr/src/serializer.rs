use std::fmt::Write;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use html::{Attribute, AttributeMap, Component, ElementSnapshot, Node, Readiness, is_void_element};
use tokio::time::Instant;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::report::{ReadinessOutcome, RenderReport};

const TARGET: &str = "ssr.serializer";

/// Receives markup fragments in document order.
pub trait FragmentSink {
    fn push_fragment(&mut self, fragment: &str);
}

impl FragmentSink for String {
    fn push_fragment(&mut self, fragment: &str) {
        self.push_str(fragment);
    }
}

/// Fragment sink that keeps each fragment separate.
pub struct VecFragmentSink<'a>(pub &'a mut Vec<String>);

impl FragmentSink for VecFragmentSink<'_> {
    fn push_fragment(&mut self, fragment: &str) {
        self.0.push(fragment.to_string());
    }
}

/// Per-component progress within one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitState {
    NotVisited,
    AwaitingReadiness,
    Emitting,
    Done,
}

fn advance(tag: &str, from: VisitState, to: VisitState) -> VisitState {
    log::trace!(target: TARGET, "<{tag}> {from:?} -> {to:?}");
    to
}

/// One serialization pass over a tree.
pub struct Serializer<'c> {
    config: &'c RenderConfig,
    report: RenderReport,
}

impl<'c> Serializer<'c> {
    pub fn new(config: &'c RenderConfig) -> Self {
        Self {
            config,
            report: RenderReport::default(),
        }
    }

    pub fn report(&self) -> &RenderReport {
        &self.report
    }

    pub fn into_report(self) -> RenderReport {
        self.report
    }

    /// Write `node` and its subtree into `sink`, awaiting each component's
    /// readiness before reading its state.
    pub fn serialize<'a>(
        &'a mut self,
        node: &'a Node,
        sink: &'a mut dyn FragmentSink,
    ) -> LocalBoxFuture<'a, Result<(), RenderError>> {
        async move {
            match node {
                Node::Document { children, .. } => {
                    let root = children
                        .iter()
                        .find(|c| matches!(c, Node::Element { .. } | Node::Component(_)));
                    match root {
                        Some(root) => self.serialize(root, sink).await,
                        None => Ok(()),
                    }
                }
                Node::Fragment { children } => {
                    for child in children {
                        self.serialize(child, sink).await?;
                    }
                    Ok(())
                }
                Node::Text { text } => {
                    sink.push_fragment(text);
                    Ok(())
                }
                Node::Comment { text } => {
                    sink.push_fragment(&format!("<!--{text}-->"));
                    Ok(())
                }
                Node::Element {
                    name,
                    attributes,
                    children,
                } => self.emit_element(name, attributes, children, sink).await,
                Node::Component(component) => {
                    let tag = component.tag_name().to_ascii_lowercase();
                    let snapshot = self.visit_component(&tag, component.as_ref()).await?;
                    self.emit_element(&tag, &snapshot.attributes, &snapshot.children, sink)
                        .await?;
                    advance(&tag, VisitState::Emitting, VisitState::Done);
                    Ok(())
                }
            }
        }
        .boxed_local()
    }

    async fn visit_component(
        &mut self,
        tag: &str,
        component: &dyn Component,
    ) -> Result<ElementSnapshot, RenderError> {
        let mut state = VisitState::NotVisited;
        let start = Instant::now();
        let outcome = match component.readiness() {
            None => ReadinessOutcome::Immediate,
            Some(readiness) => {
                state = advance(tag, state, VisitState::AwaitingReadiness);
                self.await_readiness(tag, readiness).await
            }
        };
        advance(tag, state, VisitState::Emitting);
        self.report.push(tag, outcome, start.elapsed());
        Ok(component.snapshot()?)
    }

    async fn await_readiness(&self, tag: &str, readiness: Readiness) -> ReadinessOutcome {
        if readiness.is_ready() {
            return ReadinessOutcome::Immediate;
        }
        let timeout = self.config.per_node_timeout;
        let start = Instant::now();
        match tokio::time::timeout(timeout, readiness.wait()).await {
            Ok(Ok(())) => {
                log::debug!(
                    target: TARGET,
                    "<{tag}> ready after {}ms",
                    start.elapsed().as_millis()
                );
                ReadinessOutcome::Ready
            }
            Ok(Err(err)) => {
                log::error!(target: TARGET, "caught error waiting for <{tag}>: {err}");
                ReadinessOutcome::Failed
            }
            Err(_) => {
                log::warn!(
                    target: TARGET,
                    "<{tag}> not ready after {}ms, emitting current state",
                    timeout.as_millis()
                );
                ReadinessOutcome::TimedOut
            }
        }
    }

    async fn emit_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        children: &[Node],
        sink: &mut dyn FragmentSink,
    ) -> Result<(), RenderError> {
        let tag = name.to_ascii_lowercase();
        let mut open = String::with_capacity(tag.len() + 2 + attributes.len() * 16);
        let _ = write!(open, "<{tag}");
        AttributeMap::new(attributes).write_to(&mut open);
        open.push('>');
        sink.push_fragment(&open);

        for child in children {
            self.serialize(child, sink).await?;
        }

        if !is_void_element(&tag) {
            sink.push_fragment(&format!("</{tag}>"));
        }
        Ok(())
    }
}
