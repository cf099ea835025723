//! Request lifetimes
//!
//! Every load and save runs inside a `RequestScope`. Cancelling the scope,
//! or dropping the `ScopeGuard` owned by the screen, abandons in-flight
//! requests so their responses never touch editor state.

use std::future::Future;

use futures::future::{select, Either};
use futures::pin_mut;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request cancelled")]
pub struct Cancelled;

#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    token: CancellationToken,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Child scopes are cancelled with their parent but not the reverse.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels this scope when the returned guard is dropped.
    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard {
            scope: self.clone(),
        }
    }

    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        let cancelled = self.token.cancelled();
        pin_mut!(future);
        pin_mut!(cancelled);
        match select(future, cancelled).await {
            Either::Left((output, _)) => Ok(output),
            Either::Right(((), _)) => Err(Cancelled),
        }
    }
}

#[derive(Debug)]
pub struct ScopeGuard {
    scope: RequestScope,
}

impl ScopeGuard {
    pub fn scope(&self) -> &RequestScope {
        &self.scope
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
