use crate::bridge::{self, Direction};
use crate::entry::Backend;
use crate::flow::FlowError;
use crate::message::{RecvMessage, SendMessage};
use crate::table::{Handle, SocketTable};
use nix::errno::Errno;
use nix::sys::socket::{MsgFlags, SockaddrLike, SockaddrStorage};
use std::io::{IoSlice, IoSliceMut};
use std::mem;
use std::os::unix::io::RawFd;

/// Outbound transport outcomes → errno. Everything outside the mapped set collapses to
/// `ENOENT`, the transport's "unexpected condition" code.
fn send_errno(err: FlowError) -> Errno {
	match err {
		FlowError::WouldBlock => Errno::EAGAIN,
		FlowError::Io => Errno::EIO,
		FlowError::BadArgument => Errno::EINVAL,
		FlowError::OutOfMemory => Errno::ENOMEM,
		_ => Errno::ENOENT,
	}
}

/// Inbound transport outcomes → errno. Differs from the send table: message-too-big is
/// a receive-only condition, out-of-memory a send-only one.
fn recv_errno(err: FlowError) -> Errno {
	match err {
		FlowError::WouldBlock => Errno::EAGAIN,
		FlowError::Io => Errno::EIO,
		FlowError::MessageTooBig => Errno::EMSGSIZE,
		FlowError::BadArgument => Errno::EINVAL,
		_ => Errno::ENOENT,
	}
}

fn raw_sendmsg(fd: RawFd, message: &SendMessage<'_>, flags: MsgFlags) -> Result<usize, Errno> {
	let buf = message.single();
	let sent = match &message.addr {
		Some(addr) => Errno::result(unsafe {
			libc::sendto(
				fd,
				buf.as_ptr().cast(),
				buf.len(),
				flags.bits(),
				addr.as_ptr(),
				addr.len(),
			)
		})?,
		None => Errno::result(unsafe {
			libc::send(fd, buf.as_ptr().cast(), buf.len(), flags.bits())
		})?,
	};
	Ok(sent as usize)
}

fn raw_recvmsg(
	fd: RawFd, message: &mut RecvMessage<'_, '_>, flags: MsgFlags,
) -> Result<usize, Errno> {
	let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
	let mut addrlen = size_of::<libc::sockaddr_storage>() as libc::socklen_t;
	let buf = message.single();
	let received = Errno::result(unsafe {
		libc::recvfrom(
			fd,
			buf.as_mut_ptr().cast(),
			buf.len(),
			flags.bits(),
			std::ptr::addr_of_mut!(storage).cast(),
			&mut addrlen,
		)
	})?;
	message.addr = if addrlen == 0 {
		None
	} else {
		unsafe { SockaddrStorage::from_raw(std::ptr::addr_of!(storage).cast(), Some(addrlen)) }
	};
	Ok(received as usize)
}

/// The POSIX-compatible call surface, one entry point per call family. Parameter order
/// and meaning match the native calls each replaces; results are errno-shaped.
impl SocketTable {
	/// `sendmsg()` equivalent on the canonical message shape.
	///
	/// On a flow-backed descriptor a successful send returns 0: the transport accepts
	/// the whole buffer as one atomic unit, so there is no partial count to report.
	/// Passthrough descriptors return the native byte count.
	///
	/// # Panics
	///
	/// If `message` carries more than one buffer segment (see crate docs).
	pub fn sendmsg(
		&self, handle: Handle, message: &SendMessage<'_>, flags: MsgFlags,
	) -> Result<usize, Errno> {
		let entry = self.get(handle)?;
		match &entry.backend {
			Backend::Flow(endpoint) => {
				let buf = message.single();
				bridge::transfer(
					&endpoint.state,
					&*endpoint.flow,
					Direction::Send,
					flags,
					|flow| flow.write(buf),
				)
				.map(|()| 0)
				.map_err(send_errno)
			}
			Backend::Raw(fd) => raw_sendmsg(*fd, message, flags),
		}
	}

	/// `recvmsg()` equivalent on the canonical message shape. `Ok(0)` on a flow-backed
	/// descriptor means the peer closed the flow.
	///
	/// # Panics
	///
	/// If `message` carries more than one buffer segment (see crate docs).
	pub fn recvmsg(
		&self, handle: Handle, message: &mut RecvMessage<'_, '_>, flags: MsgFlags,
	) -> Result<usize, Errno> {
		let entry = self.get(handle)?;
		match &entry.backend {
			Backend::Flow(endpoint) => {
				let buf = message.single();
				bridge::transfer(
					&endpoint.state,
					&*endpoint.flow,
					Direction::Recv,
					flags,
					|flow| flow.read(buf),
				)
				.map_err(recv_errno)
			}
			Backend::Raw(fd) => raw_recvmsg(*fd, message, flags),
		}
	}

	/// `write()` equivalent.
	pub fn write(&self, handle: Handle, buf: &[u8]) -> Result<usize, Errno> {
		self.send(handle, buf, MsgFlags::empty())
	}

	/// `send()` equivalent.
	pub fn send(&self, handle: Handle, buf: &[u8], flags: MsgFlags) -> Result<usize, Errno> {
		let segments = [IoSlice::new(buf)];
		self.sendmsg(
			handle,
			&SendMessage {
				addr: None,
				segments: &segments,
			},
			flags,
		)
	}

	/// `sendto()` equivalent. A flow is a connected endpoint, so flow-backed
	/// descriptors ignore `addr`; passthrough descriptors forward it.
	pub fn sendto(
		&self, handle: Handle, buf: &[u8], flags: MsgFlags, addr: Option<SockaddrStorage>,
	) -> Result<usize, Errno> {
		let segments = [IoSlice::new(buf)];
		self.sendmsg(
			handle,
			&SendMessage {
				addr,
				segments: &segments,
			},
			flags,
		)
	}

	/// `read()` equivalent.
	pub fn read(&self, handle: Handle, buf: &mut [u8]) -> Result<usize, Errno> {
		self.recv(handle, buf, MsgFlags::empty())
	}

	/// `recv()` equivalent.
	pub fn recv(
		&self, handle: Handle, buf: &mut [u8], flags: MsgFlags,
	) -> Result<usize, Errno> {
		let mut segments = [IoSliceMut::new(buf)];
		let mut message = RecvMessage {
			addr: None,
			segments: &mut segments,
		};
		self.recvmsg(handle, &mut message, flags)
	}

	/// `recvfrom()` equivalent. The source address is reported for passthrough
	/// descriptors and is `None` for flow-backed ones.
	pub fn recvfrom(
		&self, handle: Handle, buf: &mut [u8], flags: MsgFlags,
	) -> Result<(usize, Option<SockaddrStorage>), Errno> {
		let mut segments = [IoSliceMut::new(buf)];
		let mut message = RecvMessage {
			addr: None,
			segments: &mut segments,
		};
		let received = self.recvmsg(handle, &mut message, flags)?;
		Ok((received, message.addr))
	}

	/// Multi-address send with per-message metadata. Requires true scatter/gather
	/// support from the transport layer, which does not exist yet; fails fast rather
	/// than transmitting a subset.
	///
	/// # Panics
	///
	/// Always.
	pub fn sendv(
		&self, _handle: Handle, _buf: &[u8], _to: &[SockaddrStorage], _flags: MsgFlags,
	) -> Result<usize, Errno> {
		unimplemented!("vectorized send requires scatter/gather transport support")
	}

	/// Receive with per-message metadata. See [`sendv`](SocketTable::sendv).
	///
	/// # Panics
	///
	/// Always.
	pub fn recvv(
		&self, _handle: Handle, _buf: &mut [u8], _flags: MsgFlags,
	) -> Result<(usize, Option<SockaddrStorage>), Errno> {
		unimplemented!("vectorized receive requires scatter/gather transport support")
	}
}
