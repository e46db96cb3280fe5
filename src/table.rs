use crate::entry::{Backend, SocketEntry, SocketFlags};
use crate::flow::TransportFlow;
use nix::errno::Errno;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Opaque compatibility-layer descriptor. Never a raw fd; only meaningful to the
/// [`SocketTable`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u32);

/// The descriptor table: a lock-protected mapping from opaque handle to entry.
///
/// There is deliberately no global instance; callers pass the table to every operation.
/// The table owns each entry until explicit [`close`](SocketTable::close), and hands out
/// `Arc` clones internally so an operation blocked in a wait stays valid even if the
/// handle is closed underneath it.
pub struct SocketTable {
	entries: RwLock<HashMap<Handle, Arc<SocketEntry>>>,
	next: AtomicU32,
}

impl SocketTable {
	#[must_use]
	pub fn new() -> Self {
		Self {
			entries: RwLock::new(HashMap::new()),
			next: AtomicU32::new(1),
		}
	}

	fn insert(&self, entry: SocketEntry) -> Handle {
		let id = self.next.fetch_add(1, Ordering::Relaxed);
		// Handles are never reused; wrapping past u32::MAX would hand out a live one.
		assert!(id != u32::MAX, "descriptor handle space exhausted");
		let handle = Handle(id);
		let previous = self.entries.write().insert(handle, Arc::new(entry));
		debug_assert!(previous.is_none());
		handle
	}

	/// Create a flow-backed descriptor. Every operation on the returned handle goes
	/// through the blocking bridge.
	#[must_use]
	pub fn bind_flow(&self, flow: Arc<dyn TransportFlow>) -> Handle {
		self.insert(SocketEntry::flow(flow))
	}

	/// Adopt an existing OS socket (e.g. an inherited descriptor) in passthrough mode.
	/// Every operation on the returned handle forwards unchanged to the native call.
	#[must_use]
	pub fn wrap_raw(&self, fd: RawFd) -> Handle {
		self.insert(SocketEntry::raw(fd))
	}

	pub(crate) fn get(&self, handle: Handle) -> Result<Arc<SocketEntry>, Errno> {
		self.entries.read().get(&handle).cloned().ok_or(Errno::EBADF)
	}

	/// Remove the entry and, for a passthrough descriptor, close the raw fd. A bound
	/// flow is released by dropping our reference; its shutdown belongs to the
	/// transport engine. Must not race an in-flight operation on a raw descriptor,
	/// same as native `close`.
	pub fn close(&self, handle: Handle) -> Result<(), Errno> {
		let entry = self.entries.write().remove(&handle).ok_or(Errno::EBADF)?;
		match &entry.backend {
			Backend::Raw(fd) => {
				let _ = Errno::result(unsafe { libc::close(*fd) })?;
				Ok(())
			}
			Backend::Flow(_) => Ok(()),
		}
	}

	/// Set the descriptor-level non-blocking policy: a flag bit under the entry lock
	/// for a flow, `O_NONBLOCK` for a raw socket.
	pub fn set_nonblocking(&self, handle: Handle, nonblocking: bool) -> Result<(), Errno> {
		let entry = self.get(handle)?;
		match &entry.backend {
			Backend::Flow(endpoint) => {
				endpoint
					.state
					.lock()
					.flags
					.set(SocketFlags::NONBLOCKING, nonblocking);
				Ok(())
			}
			Backend::Raw(fd) => {
				let flags = Errno::result(unsafe { libc::fcntl(*fd, libc::F_GETFL) })?;
				let flags = if nonblocking {
					flags | libc::O_NONBLOCK
				} else {
					flags & !libc::O_NONBLOCK
				};
				let _ = Errno::result(unsafe { libc::fcntl(*fd, libc::F_SETFL, flags) })?;
				Ok(())
			}
		}
	}

	pub fn nonblocking(&self, handle: Handle) -> Result<bool, Errno> {
		let entry = self.get(handle)?;
		match &entry.backend {
			Backend::Flow(endpoint) => Ok(endpoint
				.state
				.lock()
				.flags
				.contains(SocketFlags::NONBLOCKING)),
			Backend::Raw(fd) => {
				let flags = Errno::result(unsafe { libc::fcntl(*fd, libc::F_GETFL) })?;
				Ok(flags & libc::O_NONBLOCK != 0)
			}
		}
	}
}

impl Default for SocketTable {
	fn default() -> Self {
		Self::new()
	}
}
