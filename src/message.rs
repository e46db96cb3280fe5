use nix::sys::socket::SockaddrStorage;
use std::io::{IoSlice, IoSliceMut};

/// Canonical form of every outbound call family: an optional destination address and a
/// vector of buffer segments. `send`/`sendto`/`write` each build one of these with
/// exactly one segment before dispatching.
pub struct SendMessage<'a> {
	/// Destination, honored in passthrough mode; a flow is a connected endpoint, so
	/// flow-backed descriptors ignore it.
	pub addr: Option<SockaddrStorage>,
	pub segments: &'a [IoSlice<'a>],
}

/// Canonical form of every inbound call family. `addr` is filled with the source
/// address on return in passthrough mode and left `None` in flow mode.
pub struct RecvMessage<'a, 'b> {
	pub addr: Option<SockaddrStorage>,
	pub segments: &'a mut [IoSliceMut<'b>],
}

impl SendMessage<'_> {
	/// The one buffer segment the transport can transfer atomically.
	///
	/// The underlying transport cannot yet merge multiple segments into one atomic
	/// transfer, and sending only the first would corrupt higher-level framing, so
	/// anything other than exactly one segment is a hard failure rather than a
	/// partial transfer.
	pub(crate) fn single(&self) -> &[u8] {
		assert_eq!(
			self.segments.len(),
			1,
			"scatter/gather I/O is not supported"
		);
		&self.segments[0]
	}
}

impl RecvMessage<'_, '_> {
	pub(crate) fn single(&mut self) -> &mut [u8] {
		assert_eq!(
			self.segments.len(),
			1,
			"scatter/gather I/O is not supported"
		);
		&mut self.segments[0]
	}
}
