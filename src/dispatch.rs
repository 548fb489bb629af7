//! The per-call protocol every trampoline follows.
//!
//! 1. The result starts as `-EIO`.
//! 2. The thread attaches and the session is located from the request
//!    context; the trampoline body builds its bindings in native parameter
//!    order.
//! 3. [`Call::invoke`] resolves the operation (absent → `-ENOSYS`) and runs
//!    the provider under `catch_unwind`.
//! 4. The body merges output bindings in reverse order.
//! 5. The provider's result becomes the native integer.
//! 6. Bindings drop at the end of the body, in reverse creation order.
//! 7. A pending fault is logged, cleared and reported as `-EIO`.

use libc::{c_int, c_void};

use crate::boundary::Env;
use crate::error::{BridgeError, FsError, FsResult};
use crate::native::{self, FuseContext};
use crate::operation::Operation;
use crate::session::{Request, Session};
use crate::traits::Filesystem;

/// Why a call ended without a provider result.
pub(crate) enum Abort {
    /// The provider does not implement the operation.
    Unsupported,
    /// The provider panicked; the fault is pending on the thread.
    Faulted,
    /// The bridge could not build or finish the call.
    Bridge(BridgeError),
}

impl From<BridgeError> for Abort {
    fn from(err: BridgeError) -> Self {
        Abort::Bridge(err)
    }
}

/// One call in flight: the attached thread, the session and the caller.
pub(crate) struct Call<'e> {
    env: &'e Env,
    session: &'e Session,
    ctx: FuseContext,
    op: Operation,
}

impl<'e> Call<'e> {
    fn locate(env: &'e Env, op: Operation) -> Result<Self, BridgeError> {
        let ctx = native::current_context()?;
        // SAFETY: `private_data` is the pointer from `SessionHandle::user_data`
        // (returned again by `init`); the handle outlives the mount.
        let session = unsafe { ctx.private_data.cast::<Session>().as_ref() }.ok_or(BridgeError::NoSession)?;
        Ok(Self {
            env,
            session,
            ctx,
            op,
        })
    }

    pub(crate) fn env(&self) -> &'e Env {
        self.env
    }

    pub(crate) fn session(&self) -> &'e Session {
        self.session
    }

    pub(crate) fn op(&self) -> Operation {
        self.op
    }

    /// The `private_data` pointer of the request context.
    pub(crate) fn user_data(&self) -> *mut c_void {
        self.ctx.private_data
    }

    /// Resolve the operation and run `f` against the provider.
    pub(crate) fn invoke<T>(
        &self,
        f: impl FnOnce(&dyn Filesystem, &Request<'_>) -> FsResult<T>,
    ) -> Result<FsResult<T>, Abort> {
        let present = self
            .env
            .call(self.op, || self.session.resolve(self.op))
            .ok_or(Abort::Faulted)?;
        if !present {
            return Err(Abort::Unsupported);
        }
        let req = Request::new(self.session, self.ctx.uid, self.ctx.gid, self.ctx.pid);
        self.env
            .call(self.op, || f(self.session.provider(), &req))
            .ok_or(Abort::Faulted)
    }
}

/// Run `body` under the call protocol; `Err` carries the negative errno.
pub(crate) fn run<T>(op: Operation, body: impl FnOnce(&Call<'_>) -> Result<T, Abort>) -> Result<T, c_int> {
    let span = tracing::trace_span!("fuse_op", op = op.name());
    let _enter = span.enter();
    tracing::trace!("enter");

    let env = match Env::attach() {
        Ok(env) => env,
        Err(err) => {
            tracing::error!(error = %err, "bridge fault");
            return Err(-libc::EIO);
        }
    };

    let mut result = match Call::locate(&env, op).map_err(Abort::from).and_then(|call| body(&call)) {
        Ok(value) => Ok(value),
        Err(Abort::Unsupported) => {
            tracing::debug!("operation not implemented by provider");
            Err(-libc::ENOSYS)
        }
        Err(Abort::Faulted) => Err(-libc::EIO),
        Err(Abort::Bridge(err)) => {
            tracing::error!(error = %err, "bridge fault");
            Err(-libc::EIO)
        }
    };

    if let Some(fault) = env.take_fault() {
        tracing::error!(%fault, "unchecked provider fault");
        result = Err(-libc::EIO);
    }
    drop(env);

    match &result {
        Ok(_) => tracing::trace!("leave"),
        Err(errno) => tracing::trace!(retval = *errno, "leave"),
    }
    result
}

/// [`run`] for operations returning a native `int`.
pub(crate) fn dispatch(op: Operation, body: impl FnOnce(&Call<'_>) -> Result<c_int, Abort>) -> c_int {
    run(op, body).unwrap_or_else(|errno| errno)
}

/// Native result of a provider error.
fn provider_error(op: Operation, err: &FsError) -> c_int {
    tracing::debug!(op = op.name(), error = %err, errno = err.errno(), "provider error");
    -err.errno()
}

/// Native result of an operation without a count.
pub(crate) fn status(op: Operation, result: FsResult<()>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(err) => provider_error(op, &err),
    }
}

/// Native result of an operation returning a byte count.
///
/// A count beyond `capacity` yields `-ERANGE`, except for a size query
/// (`size_query` with an empty buffer), whose count is the size needed.
pub(crate) fn byte_count(
    op: Operation,
    result: FsResult<usize>,
    capacity: usize,
    size_query: bool,
) -> Result<c_int, Abort> {
    let count = match result {
        Ok(count) => count,
        Err(err) => return Ok(provider_error(op, &err)),
    };
    if count > capacity && !(size_query && capacity == 0) {
        tracing::warn!(op = op.name(), count, capacity, "provider reported more bytes than the buffer holds");
        return Ok(-libc::ERANGE);
    }
    c_int::try_from(count).map_err(|_| Abort::Bridge(BridgeError::CountOverflow { count }))
}
