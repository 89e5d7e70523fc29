use tokio_util::sync::CancellationToken;

/// Cancellation signal shared by every request bound to it.
///
/// Once fired it stays fired: there is no reset. A caller that needs its own
/// cancellation scope creates a fresh signal (or a [`child`](Self::child) of
/// an existing one) and passes it per call.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort every in-flight and future request bound to this signal.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal fires; immediately if it already has.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// A signal that fires with this one but can also be fired on its own.
    pub fn child(&self) -> Self {
        Self { token: self.token.child_token() }
    }
}
