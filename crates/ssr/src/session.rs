use std::future::Future;
use std::time::Duration;

use html::Node;
use tokio::runtime::{Builder, Runtime};
use tokio::task::LocalSet;

use crate::assembler::{Rendered, render_with_report};
use crate::config::RenderConfig;
use crate::error::RenderError;

/// Single-threaded execution context shared by component tasks and the
/// serializer.
///
/// Components spawn their fetches with `spawn_local` when they connect, so
/// mounting must happen inside `enter` (or `run_until`); the tasks then make
/// progress whenever the session runs a render.
pub struct Session {
    runtime: Runtime,
    local: LocalSet,
    config: RenderConfig,
}

impl Session {
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let runtime = Builder::new_current_thread().enable_time().build()?;
        Ok(Self {
            runtime,
            local: LocalSet::new(),
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Run `f` with this session's runtime and local set as the spawn target.
    pub fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        let _runtime = self.runtime.enter();
        let _local = self.local.enter();
        f()
    }

    pub fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.local.block_on(&self.runtime, future)
    }

    /// Render `root` with the given per-node timeout.
    pub fn render(&self, root: &Node, timeout: Duration) -> Result<String, RenderError> {
        let config = self.config.clone().with_timeout(timeout);
        self.run_until(render_with_report(root, &config))
            .map(|rendered| rendered.html)
    }

    /// Render `root` with the session's configuration.
    pub fn render_with_report(&self, root: &Node) -> Result<Rendered, RenderError> {
        self.run_until(render_with_report(root, &self.config))
    }
}
