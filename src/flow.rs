use bitflags::bitflags;
use std::time::Duration;
use thiserror::Error;

bitflags! {
	/// Readiness events a [`TransportFlow`] can be waited on.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct EventMask: u8 {
		const READABLE = 0b001;
		const WRITABLE = 0b010;
		const ERROR = 0b100;
	}
}

/// Failure outcome of a non-blocking transport operation.
///
/// This mirrors the transport engine's own outcome vocabulary, which is wider than the
/// set the shim maps onto distinct errno values; everything outside the mapped set is
/// reported to callers as one generic code (see [`crate::SocketTable::sendmsg`]).
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
	/// The operation could not complete immediately; retry once the flow is ready.
	#[error("operation would block")]
	WouldBlock,
	#[error("I/O failure")]
	Io,
	#[error("bad argument")]
	BadArgument,
	/// The destination buffer is smaller than the incoming message unit.
	#[error("message too big for buffer")]
	MessageTooBig,
	#[error("out of memory")]
	OutOfMemory,
	#[error("name resolution failed")]
	Dns,
	#[error("security failure")]
	Security,
	#[error("no usable transport")]
	Unable,
	#[error("internal transport error")]
	Internal,
}

/// An asynchronous, protocol-agnostic network endpoint.
///
/// All three operations take `&self`: a flow is shared between the calling thread and
/// whatever drives the transport engine, so interior mutability is the implementer's
/// concern. The shim serializes `write`/`read` per descriptor with its own lock and
/// never calls `wait` while holding that lock.
pub trait TransportFlow: Send + Sync {
	/// Queue `buf` for transmission as one atomic unit.
	///
	/// Completes immediately: either the transport accepts the whole buffer, or nothing
	/// was queued and the error says why. There is no partial write.
	fn write(&self, buf: &[u8]) -> Result<(), FlowError>;

	/// Read the next available data into `buf`, returning the number of bytes transferred.
	///
	/// Completes immediately. `Ok(0)` means the peer closed the flow, not an error. On a
	/// message-oriented transport a unit larger than `buf` yields
	/// [`FlowError::MessageTooBig`] rather than truncating.
	fn read(&self, buf: &mut [u8]) -> Result<usize, FlowError>;

	/// Block the calling thread until any event in `interest` is pending or `timeout`
	/// elapses; `None` waits indefinitely. Returns the events that fired; wakes may be
	/// spurious, so a subsequent `write`/`read` can still report
	/// [`FlowError::WouldBlock`].
	fn wait(&self, interest: EventMask, timeout: Option<Duration>) -> EventMask;
}
