//! Session state and busy flags.
//!
//! The mutex is only ever held for a few field reads or writes and never
//! across an `.await`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy::primitives::Address;

/// Identifies one connected-wallet session. Bumped on every reset.
pub type Epoch = u64;

#[derive(Debug, Default)]
struct SessionInner {
    wallet: Option<Address>,
    draft: String,
    epoch: Epoch,
}

/// Wallet, draft and busy flags for one board.
#[derive(Debug, Default)]
pub struct Session {
    inner: Mutex<SessionInner>,
    connecting: AtomicBool,
    attesting: AtomicUsize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn wallet(&self) -> Option<Address> {
        self.lock().wallet
    }

    pub fn epoch(&self) -> Epoch {
        self.lock().epoch
    }

    /// Connected wallet together with the epoch it belongs to.
    pub fn connected(&self) -> Option<(Address, Epoch)> {
        let inner = self.lock();
        inner.wallet.map(|wallet| (wallet, inner.epoch))
    }

    /// Whether `wallet` is still the connected account of `epoch`.
    pub fn is_current(&self, wallet: Address, epoch: Epoch) -> bool {
        let inner = self.lock();
        inner.epoch == epoch && inner.wallet == Some(wallet)
    }

    /// Store a gated wallet, unless the session was reset since `epoch`.
    pub fn admit(&self, wallet: Address, epoch: Epoch) -> bool {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            return false;
        }
        inner.wallet = Some(wallet);
        true
    }

    /// Drop the wallet after a failed connect, unless the session was
    /// reset since `epoch` (in which case it is already disconnected).
    /// Dropping a connected wallet starts a new epoch, like [`reset`](Self::reset).
    pub fn reject(&self, epoch: Epoch) {
        let mut inner = self.lock();
        if inner.epoch == epoch && inner.wallet.take().is_some() {
            inner.epoch += 1;
        }
    }

    /// Drop the wallet and start a new epoch. Draft is kept.
    pub fn reset(&self) -> Option<Address> {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.wallet.take()
    }

    pub fn draft(&self) -> String {
        self.lock().draft.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.lock().draft = text.into();
    }

    /// Clear the draft if it still holds `submitted`. Text typed while the
    /// submit was in flight survives.
    pub fn clear_draft_if(&self, submitted: &str) -> bool {
        let mut inner = self.lock();
        if inner.draft == submitted {
            inner.draft.clear();
            true
        } else {
            false
        }
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::SeqCst)
    }

    pub fn is_attesting(&self) -> bool {
        self.attesting.load(Ordering::SeqCst) > 0
    }

    /// Raise the exclusive connect flag; `None` if already raised.
    pub fn begin_connect(&self) -> Option<BusyGuard<'_>> {
        self.connecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard::Connecting(&self.connecting))
    }

    /// Raise the attest flag. Overlapping submits stack.
    pub fn begin_attest(&self) -> BusyGuard<'_> {
        self.attesting.fetch_add(1, Ordering::SeqCst);
        BusyGuard::Attesting(&self.attesting)
    }
}

/// Lowers its busy flag when dropped, on every exit path.
#[derive(Debug)]
pub enum BusyGuard<'a> {
    Connecting(&'a AtomicBool),
    Attesting(&'a AtomicUsize),
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        match self {
            BusyGuard::Connecting(flag) => flag.store(false, Ordering::SeqCst),
            BusyGuard::Attesting(count) => {
                count.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }
}
