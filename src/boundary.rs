//! Thread attachment and fault capture at the native/provider boundary.
//!
//! Every trampoline attaches the calling native thread by creating an
//! [`Env`]. The guard is `!Send` and lives on the trampoline's stack, so it
//! can never be cached across calls or handed to another thread. All state
//! it touches is thread-local:
//!
//! | State | Meaning |
//! |-------|---------|
//! | depth | Number of trampolines currently active on this thread |
//! | attachments | Total attachments performed by this thread |
//! | live bindings | Argument bindings not yet released |
//! | pending fault | A provider panic not yet reported |
//!
//! Provider code runs through [`Env::call`], which catches panics and records
//! them as the thread's pending [`Fault`]. The dispatcher clears the fault at
//! the end of the call and reports `EIO`.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use crate::error::BridgeError;
use crate::operation::Operation;

thread_local! {
    static THREAD: ThreadEnv = const {
        ThreadEnv {
            depth: Cell::new(0),
            attachments: Cell::new(0),
            live: Cell::new(0),
            fault: RefCell::new(None),
        }
    };
}

struct ThreadEnv {
    depth: Cell<usize>,
    attachments: Cell<u64>,
    live: Cell<usize>,
    fault: RefCell<Option<Fault>>,
}

/// An unchecked failure raised by provider code (a panic).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    operation: Operation,
    message: String,
}

impl Fault {
    fn from_panic(operation: Operation, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Self { operation, message }
    }

    /// Operation that was running when the fault was raised.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Panic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider panicked in {}: {}", self.operation, self.message)
    }
}

/// Boundary state of the current thread, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadStats {
    /// Trampolines currently active on this thread.
    pub depth: usize,
    /// Attachments performed by this thread so far.
    pub attachments: u64,
    /// Argument bindings not yet released.
    pub live_bindings: usize,
    /// Whether a fault is waiting to be reported.
    pub pending_fault: bool,
}

/// Snapshot of the current thread's boundary state.
///
/// Outside a trampoline `depth` and `live_bindings` are always zero and no
/// fault is pending.
pub fn thread_stats() -> ThreadStats {
    THREAD
        .try_with(|t| ThreadStats {
            depth: t.depth.get(),
            attachments: t.attachments.get(),
            live_bindings: t.live.get(),
            pending_fault: t.fault.try_borrow().map(|f| f.is_some()).unwrap_or(false),
        })
        .unwrap_or_default()
}

/// Attachment of the current native thread, valid for one trampoline call.
pub(crate) struct Env {
    _not_send: PhantomData<*const ()>,
}

impl Env {
    /// Attach the current thread.
    ///
    /// Fails only while the thread's locals are being torn down.
    pub(crate) fn attach() -> Result<Self, BridgeError> {
        let lingering = THREAD
            .try_with(|t| {
                let outer = t.depth.get() == 0;
                t.depth.set(t.depth.get() + 1);
                t.attachments.set(t.attachments.get() + 1);
                if outer { t.fault.borrow_mut().take() } else { None }
            })
            .map_err(|_| BridgeError::Detached)?;
        if let Some(fault) = lingering {
            tracing::warn!(%fault, "discarding fault left over from an earlier call");
        }
        Ok(Env {
            _not_send: PhantomData,
        })
    }

    /// Run provider code, converting a panic into the thread's pending fault.
    ///
    /// Returns `None` if the closure panicked.
    pub(crate) fn call<R>(&self, op: Operation, f: impl FnOnce() -> R) -> Option<R> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                self.raise(Fault::from_panic(op, payload));
                None
            }
        }
    }

    /// Record `fault` as pending; an older unreported fault is replaced.
    pub(crate) fn raise(&self, fault: Fault) {
        let previous = THREAD
            .try_with(|t| t.fault.borrow_mut().replace(fault))
            .ok()
            .flatten();
        if let Some(previous) = previous {
            tracing::warn!(fault = %previous, "fault replaced before it was reported");
        }
    }

    /// Take the pending fault, clearing it.
    pub(crate) fn take_fault(&self) -> Option<Fault> {
        THREAD
            .try_with(|t| t.fault.borrow_mut().take())
            .ok()
            .flatten()
    }

    fn adjust_live(&self, up: bool) {
        let _ = THREAD.try_with(|t| {
            let live = t.live.get();
            t.live.set(if up { live + 1 } else { live.saturating_sub(1) });
        });
    }
}

impl Drop for Env {
    fn drop(&mut self) {
        let _ = THREAD.try_with(|t| t.depth.set(t.depth.get().saturating_sub(1)));
    }
}

/// Registration of one argument binding with the thread's [`Env`].
///
/// Held as a field by every binding type; dropping it releases the binding.
pub(crate) struct Registration<'e> {
    env: &'e Env,
}

impl<'e> Registration<'e> {
    pub(crate) fn new(env: &'e Env) -> Self {
        env.adjust_live(true);
        Self { env }
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.env.adjust_live(false);
    }
}
