use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};

use core_types::Generation;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::abort::{AbortController, AbortSignal};
use crate::signal::{Readiness, ReadySignal};

const TARGET: &str = "readiness.coalescer";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The result matched the current tag and mutated the node.
    Applied,
    /// A newer operation was issued before this one finished.
    Stale,
    /// The operation itself failed; the node keeps its previous state.
    Failed,
    /// The node was detached, or the operation was dropped unfinished.
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationRecord {
    pub tag: Generation,
    pub outcome: Option<Outcome>,
}

struct Slot {
    record: OperationRecord,
    done: watch::Receiver<bool>,
}

struct Inner<S> {
    label: &'static str,
    state: S,
    tag: Generation,
    slots: Vec<Slot>,
    settled: usize,
    first_result: ReadySignal,
    abort: AbortController,
    detached: bool,
}

impl<S> Inner<S> {
    fn record(&mut self, tag: Generation, outcome: Outcome) {
        let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.record.tag == tag && slot.record.outcome.is_none())
        else {
            return;
        };
        slot.record.outcome = Some(outcome);
        self.settled += 1;
        self.first_result.resolve();
        log::trace!(target: TARGET, "{}: operation {tag} settled as {outcome:?}", self.label);
    }
}

/// A node's state together with its generation tag, outstanding operation
/// slots, first-result readiness and abort flag.
///
/// Cloning shares the same node; spawned operations only hold a weak
/// reference, so dropping every clone makes late results no-ops.
pub struct Coalesced<S> {
    inner: Rc<RefCell<Inner<S>>>,
}

impl<S> Clone for Coalesced<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for Coalesced<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Coalesced")
                .field("label", &inner.label)
                .field("tag", &inner.tag)
                .field("operations", &inner.slots.len())
                .field("settled", &inner.settled)
                .field("detached", &inner.detached)
                .finish(),
            Err(_) => f.write_str("Coalesced { <borrowed> }"),
        }
    }
}

impl<S: 'static> Coalesced<S> {
    /// A fresh node: tag `0`, no operations, ready.
    pub fn new(label: &'static str, state: S) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                label,
                state,
                tag: 0,
                slots: Vec::new(),
                settled: 0,
                first_result: ReadySignal::resolved(),
                abort: AbortController::new(),
                detached: false,
            })),
        }
    }

    pub fn label(&self) -> &'static str {
        self.inner.borrow().label
    }

    pub fn tag(&self) -> Generation {
        self.inner.borrow().tag
    }

    pub fn is_current(&self, tag: Generation) -> bool {
        let inner = self.inner.borrow();
        !inner.detached && inner.tag == tag
    }

    pub fn is_detached(&self) -> bool {
        self.inner.borrow().detached
    }

    /// Operations issued but not yet settled.
    pub fn pending(&self) -> usize {
        let inner = self.inner.borrow();
        inner.slots.len() - inner.settled
    }

    /// Every operation this node ever issued, in issue order.
    pub fn history(&self) -> Vec<OperationRecord> {
        self.inner
            .borrow()
            .slots
            .iter()
            .map(|slot| slot.record.clone())
            .collect()
    }

    /// Read the node state. `f` must not call back into this node.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Like `with`, but `None` while the state is mutably borrowed.
    pub fn try_with<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        let inner = self.inner.try_borrow().ok()?;
        Some(f(&inner.state))
    }

    /// Mutate the node state outside of any operation (event handlers).
    /// `f` must not call back into this node.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.inner.borrow_mut().state)
    }

    pub fn abort_signal(&self) -> AbortSignal {
        self.inner.borrow().abort.signal()
    }

    /// Ready once at least one operation settled, or immediately when the
    /// node never had work pending.
    pub fn readiness(&self) -> Readiness {
        self.inner.borrow().first_result.readiness()
    }

    /// Ready once every operation issued so far has settled.
    pub fn settled(&self) -> Readiness {
        let inner = self.inner.borrow();
        Readiness::all(inner.slots.iter().map(|slot| Readiness::from_receiver(slot.done.clone())))
    }

    /// Announce work that will be issued later (for example once another node
    /// reports back). No-op once a result was produced or after `detach`.
    pub fn arm(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.settled == 0 && !inner.detached {
            inner.first_result.arm();
        }
    }

    /// Declare the current state final without producing a result.
    pub fn mark_ready(&self) {
        self.inner.borrow().first_result.resolve();
    }

    /// Stamp a new operation with the next tag and open its slot.
    pub fn issue(&self) -> Ticket<S> {
        let mut inner = self.inner.borrow_mut();
        inner.tag += 1;
        let tag = inner.tag;
        if inner.settled == 0 && !inner.detached {
            inner.first_result.arm();
        }
        let (tx, rx) = watch::channel(false);
        inner.slots.push(Slot {
            record: OperationRecord { tag, outcome: None },
            done: rx,
        });
        log::trace!(target: TARGET, "{}: issued operation {tag}", inner.label);
        Ticket {
            tag,
            done: Some(tx),
            owner: Rc::downgrade(&self.inner),
        }
    }

    /// Run `f` against the node state only if `tag` is still current.
    pub fn apply(&self, tag: Generation, f: impl FnOnce(&mut S)) -> bool {
        self.apply_with(tag, f).is_some()
    }

    pub fn apply_with<R>(&self, tag: Generation, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let mut inner = self.inner.borrow_mut();
        if inner.detached {
            log::debug!(target: TARGET, "{}: dropping result {tag}, node detached", inner.label);
            return None;
        }
        if inner.tag != tag {
            log::debug!(
                target: TARGET,
                "{}: dropping stale result {tag}, current is {}",
                inner.label,
                inner.tag
            );
            return None;
        }
        Some(f(&mut inner.state))
    }

    pub fn settle(&self, mut ticket: Ticket<S>, outcome: Outcome) {
        let done = ticket.done.take();
        self.inner.borrow_mut().record(ticket.tag, outcome);
        if let Some(done) = done {
            done.send_replace(true);
        }
    }

    /// Stop every running operation and reject all later results.
    ///
    /// A still-pending first result is dropped: current waiters see
    /// `ReadinessError::Abandoned` and later `readiness()` calls are ready.
    pub fn detach(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.detached {
            return;
        }
        inner.detached = true;
        inner.abort.abort();
        if !inner.first_result.is_resolved() {
            inner.first_result = ReadySignal::resolved();
        }
        log::debug!(target: TARGET, "{}: detached at tag {}", inner.label, inner.tag);
    }

    pub fn spawn<T, E, F, A>(&self, op: F, apply: A) -> Generation
    where
        T: 'static,
        E: fmt::Display + 'static,
        F: Future<Output = Result<T, E>> + 'static,
        A: FnOnce(&mut S, T) + 'static,
    {
        self.spawn_then(op, apply, |()| {})
    }

    /// Issue, run `op` on the local set, and apply its value if the tag is
    /// still current. `then` runs after the state borrow is released and only
    /// for applied results, so it may dispatch events back into the tree.
    pub fn spawn_then<T, E, F, A, R, K>(&self, op: F, apply: A, then: K) -> Generation
    where
        T: 'static,
        E: fmt::Display + 'static,
        F: Future<Output = Result<T, E>> + 'static,
        A: FnOnce(&mut S, T) -> R + 'static,
        R: 'static,
        K: FnOnce(R) + 'static,
    {
        let ticket = self.issue();
        let tag = ticket.tag();
        let abort = self.abort_signal();
        let owner = Rc::downgrade(&self.inner);
        let label = self.label();

        tokio::task::spawn_local(async move {
            let start = Instant::now();
            let result = tokio::select! {
                biased;
                _ = abort.aborted() => None,
                result = op => Some(result),
            };
            let Some(inner) = owner.upgrade() else {
                return;
            };
            let node = Coalesced { inner };
            let outcome = match result {
                None => Outcome::Cancelled,
                Some(Err(err)) => {
                    log::warn!(target: TARGET, "{label}: operation {tag} failed: {err}");
                    Outcome::Failed
                }
                Some(Ok(value)) => match node.apply_with(tag, |state| apply(state, value)) {
                    Some(applied) => {
                        node.settle(ticket, Outcome::Applied);
                        log::debug!(
                            target: TARGET,
                            "{label}: operation {tag} applied after {}ms",
                            start.elapsed().as_millis()
                        );
                        then(applied);
                        return;
                    }
                    None if node.is_detached() => Outcome::Cancelled,
                    None => Outcome::Stale,
                },
            };
            node.settle(ticket, outcome);
            log::debug!(
                target: TARGET,
                "{label}: operation {tag} finished as {outcome:?} after {}ms",
                start.elapsed().as_millis()
            );
        });
        tag
    }
}

/// Handle for one issued operation. Dropping it without `settle` records the
/// operation as cancelled and still resolves its slot.
pub struct Ticket<S> {
    tag: Generation,
    done: Option<watch::Sender<bool>>,
    owner: Weak<RefCell<Inner<S>>>,
}

impl<S> Ticket<S> {
    pub fn tag(&self) -> Generation {
        self.tag
    }
}

impl<S> fmt::Debug for Ticket<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket").field("tag", &self.tag).finish()
    }
}

impl<S> Drop for Ticket<S> {
    fn drop(&mut self) {
        let Some(done) = self.done.take() else {
            return;
        };
        if let Some(inner) = self.owner.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.record(self.tag, Outcome::Cancelled);
            }
        }
        done.send_replace(true);
    }
}
