use std::cell::RefCell;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use net::{Fetch, FetchError};
use tokio::sync::oneshot;

struct Call<Q, T> {
    query: Q,
    reply: Option<oneshot::Sender<Result<T, FetchError>>>,
}

/// Fetcher whose requests stay in flight until the test answers them, in
/// any order. A request whose future was dropped is not an error.
pub struct ManualFetcher<Q, T> {
    calls: RefCell<Vec<Call<Q, T>>>,
}

impl<Q, T> Default for ManualFetcher<Q, T> {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl<Q: Clone, T> ManualFetcher<Q, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queries(&self) -> Vec<Q> {
        self.calls.borrow().iter().map(|c| c.query.clone()).collect()
    }

    pub fn calls(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Answer request `index` (0-based, issue order). `false` if it was
    /// already answered or the requester is gone.
    pub fn respond(&self, index: usize, result: Result<T, FetchError>) -> bool {
        let reply = self
            .calls
            .borrow_mut()
            .get_mut(index)
            .and_then(|call| call.reply.take());
        match reply {
            Some(reply) => reply.send(result).is_ok(),
            None => false,
        }
    }

    pub fn respond_last(&self, result: Result<T, FetchError>) -> bool {
        match self.calls().checked_sub(1) {
            Some(last) => self.respond(last, result),
            None => false,
        }
    }
}

impl<Q: 'static, T: 'static> Fetch<Q> for ManualFetcher<Q, T> {
    type Output = T;

    fn fetch(&self, query: Q) -> LocalBoxFuture<'static, Result<T, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.calls.borrow_mut().push(Call {
            query,
            reply: Some(tx),
        });
        async move { rx.await.unwrap_or(Err(FetchError::Cancelled)) }.boxed_local()
    }
}
