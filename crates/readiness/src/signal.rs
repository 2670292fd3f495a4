use futures::future::join_all;
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadinessError {
    #[error("readiness signal was dropped before it resolved")]
    Abandoned,
}

/// Producer half of a one-shot readiness flag, owned by its node.
///
/// `arm` swaps a resolved signal for a fresh pending one. Consumers that
/// already hold a `Readiness` keep observing the signal they were given.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<bool>,
}

impl ReadySignal {
    pub fn resolved() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx }
    }

    pub fn pending() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn is_resolved(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn arm(&mut self) {
        if self.is_resolved() {
            *self = Self::pending();
        }
    }

    pub fn resolve(&self) {
        self.tx.send_replace(true);
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            signals: vec![self.tx.subscribe()],
        }
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::resolved()
    }
}

/// Consumer half: ready once every contained signal has resolved.
///
/// The empty set is already ready.
#[derive(Clone, Debug, Default)]
pub struct Readiness {
    signals: Vec<watch::Receiver<bool>>,
}

impl Readiness {
    pub fn ready() -> Self {
        Self::default()
    }

    pub(crate) fn from_receiver(rx: watch::Receiver<bool>) -> Self {
        Self { signals: vec![rx] }
    }

    pub fn all(parts: impl IntoIterator<Item = Readiness>) -> Self {
        let signals = parts.into_iter().flat_map(|r| r.signals).collect();
        Self { signals }
    }

    pub fn is_ready(&self) -> bool {
        self.signals.iter().all(|rx| *rx.borrow())
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Resolves when all signals are ready. A producer dropped while still
    /// pending yields `ReadinessError::Abandoned`.
    pub async fn wait(self) -> Result<(), ReadinessError> {
        let waits = self.signals.into_iter().map(|mut rx| async move {
            rx.wait_for(|ready| *ready)
                .await
                .map(|_| ())
                .map_err(|_| ReadinessError::Abandoned)
        });
        for result in join_all(waits).await {
            result?;
        }
        Ok(())
    }
}
