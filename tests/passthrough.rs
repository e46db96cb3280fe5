//! Passthrough-mode contract: a shim call on a wrapped raw socket is indistinguishable
//! from the native call on that socket.

use flowsock::{Errno, MsgFlags, SockaddrStorage, SocketTable};
use std::io::{Read, Write};
use std::net::UdpSocket;
use std::os::unix::io::IntoRawFd;
use std::os::unix::net::{UnixDatagram, UnixStream};
use std::time::Duration;

#[test]
fn send_reaches_peer_like_native_send() {
	let (ours, mut theirs) = UnixStream::pair().unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	assert_eq!(table.send(handle, b"hello", MsgFlags::empty()), Ok(5));

	let mut buf = [0_u8; 16];
	let received = theirs.read(&mut buf).unwrap();
	assert_eq!(&buf[..received], b"hello");
	table.close(handle).unwrap();
}

#[test]
fn recv_sees_native_write() {
	let (ours, mut theirs) = UnixStream::pair().unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	theirs.write_all(b"from the peer").unwrap();
	let mut buf = [0_u8; 32];
	assert_eq!(
		table.recv(handle, &mut buf, MsgFlags::empty()),
		Ok(b"from the peer".len())
	);
	assert_eq!(&buf[..13], b"from the peer");
	table.close(handle).unwrap();
}

#[test]
fn write_and_read_are_send_and_recv() {
	let (ours, mut theirs) = UnixStream::pair().unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	assert_eq!(table.write(handle, b"abc"), Ok(3));
	theirs.write_all(b"def").unwrap();
	let mut buf = [0_u8; 8];
	assert_eq!(table.read(handle, &mut buf), Ok(3));
	assert_eq!(&buf[..3], b"def");
	table.close(handle).unwrap();
}

#[test]
fn nonblocking_raw_recv_is_eagain() {
	let (ours, _theirs) = UnixStream::pair().unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	table.set_nonblocking(handle, true).unwrap();
	assert_eq!(table.nonblocking(handle), Ok(true));

	let mut buf = [0_u8; 8];
	assert_eq!(
		table.recv(handle, &mut buf, MsgFlags::empty()),
		Err(Errno::EAGAIN)
	);
	table.close(handle).unwrap();
}

#[test]
fn dontwait_flag_forwards_to_kernel() {
	let (ours, _theirs) = UnixStream::pair().unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	// Descriptor stays blocking; the per-call flag alone must reach the native call.
	let mut buf = [0_u8; 8];
	assert_eq!(
		table.recv(handle, &mut buf, MsgFlags::MSG_DONTWAIT),
		Err(Errno::EAGAIN)
	);
	table.close(handle).unwrap();
}

#[test]
fn recv_returns_zero_on_peer_close() {
	let (ours, theirs) = UnixStream::pair().unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	drop(theirs);
	let mut buf = [0_u8; 8];
	assert_eq!(table.recv(handle, &mut buf, MsgFlags::empty()), Ok(0));
	table.close(handle).unwrap();
}

#[test]
fn datagram_payloads_pass_through_whole() {
	let (ours, theirs) = UnixDatagram::pair().unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	theirs.send(b"unit one").unwrap();
	theirs.send(b"unit two").unwrap();

	let mut buf = [0_u8; 64];
	let (received, _addr) = table.recvfrom(handle, &mut buf, MsgFlags::empty()).unwrap();
	assert_eq!(&buf[..received], b"unit one");
	assert_eq!(table.recv(handle, &mut buf, MsgFlags::empty()), Ok(8));
	assert_eq!(&buf[..8], b"unit two");
	table.close(handle).unwrap();
}

#[test]
fn addressed_sendto_reaches_bound_datagram_peer() {
	let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
	peer.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
	let ours = UdpSocket::bind("127.0.0.1:0").unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	let addr = SockaddrStorage::from(peer.local_addr().unwrap());
	assert_eq!(
		table.sendto(handle, b"addressed", MsgFlags::empty(), Some(addr)),
		Ok(9)
	);

	let mut buf = [0_u8; 32];
	let (received, _from) = peer.recv_from(&mut buf).unwrap();
	assert_eq!(&buf[..received], b"addressed");
	table.close(handle).unwrap();
}

#[test]
fn wrapped_descriptor_is_closed_by_table_close() {
	let (ours, mut theirs) = UnixStream::pair().unwrap();
	let table = SocketTable::new();
	let handle = table.wrap_raw(ours.into_raw_fd());

	table.close(handle).unwrap();
	// The raw fd was really closed: the peer sees EOF.
	let mut buf = [0_u8; 4];
	assert_eq!(theirs.read(&mut buf).unwrap(), 0);
}
