use crate::flow::TransportFlow;
use bitflags::bitflags;
use parking_lot::Mutex;
use std::os::unix::io::RawFd;
use std::sync::Arc;

bitflags! {
	/// Per-descriptor flag bits for flow-backed sockets. Passthrough descriptors keep
	/// their policy in the kernel (`O_NONBLOCK`) instead.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct SocketFlags: u32 {
		/// Would-block outcomes return immediately instead of waiting.
		const NONBLOCKING = 0x01;
	}
}

/// Mutable descriptor state; only ever touched while holding the entry lock.
#[derive(Debug)]
pub(crate) struct FlowShared {
	pub(crate) flags: SocketFlags,
}

/// A descriptor bound to a transport flow.
///
/// `flow` is immutable after creation and shared with the transport engine, so it is
/// readable without the lock. `state` is the per-entry lock of the blocking bridge: held
/// for the duration of every transport `write`/`read`, released across `wait` so a
/// blocked caller cannot starve concurrent operations on the same descriptor.
pub(crate) struct FlowEndpoint {
	pub(crate) flow: Arc<dyn TransportFlow>,
	pub(crate) state: Mutex<FlowShared>,
}

/// The two descriptor modes. An entry is in exactly one for its entire lifetime; mode
/// never changes after creation.
pub(crate) enum Backend {
	Flow(FlowEndpoint),
	Raw(RawFd),
}

/// One open compatibility-layer descriptor.
pub(crate) struct SocketEntry {
	pub(crate) backend: Backend,
}

impl SocketEntry {
	pub(crate) fn flow(flow: Arc<dyn TransportFlow>) -> Self {
		Self {
			backend: Backend::Flow(FlowEndpoint {
				flow,
				state: Mutex::new(FlowShared {
					flags: SocketFlags::empty(),
				}),
			}),
		}
	}

	pub(crate) fn raw(fd: RawFd) -> Self {
		Self {
			backend: Backend::Raw(fd),
		}
	}
}
