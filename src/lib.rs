//! A POSIX-style blocking socket surface over an asynchronous, non-blocking transport flow.
//!
//! The traditional socket calls (`send`, `recv`, `sendto`, `recvfrom`, `sendmsg`, `recvmsg`,
//! plus plain `write`/`read`) assume the kernel will block the calling thread until an
//! operation can make progress. A transport flow has no such notion: its `write`/`read`
//! complete immediately with either success, a would-block condition, or a terminal error,
//! and the only way to suspend is an explicit event wait. This crate bridges the two worlds
//! so that existing blocking-socket code keeps working unchanged on top of a flow.
//!
//! Every descriptor lives in a [`SocketTable`] and is fixed, for its whole lifetime, in one
//! of two modes:
//!
//! * **flow-backed** — bound to an implementer of [`TransportFlow`]. Calls go through the
//!   blocking bridge: one non-blocking attempt under the descriptor's lock, and if that
//!   would block on a blocking descriptor, one event wait (with the lock released) followed
//!   by exactly one retry. A wake that still yields would-block surfaces as `EAGAIN` rather
//!   than looping, so every call has bounded latency.
//! * **passthrough** — wrapping a raw OS socket the crate did not create (e.g. an inherited
//!   descriptor). Every call forwards bit-for-bit to the equivalent native call; the kernel
//!   already blocks correctly.
//!
//! Callers see standard errno-shaped results either way; from their side the shim is
//! indistinguishable from a native socket.
//!
//! # Note
//!
//! Scatter/gather I/O is not supported: `sendmsg`/`recvmsg` accept exactly one buffer
//! segment and fail hard (assert) on more, rather than silently transmitting a subset.
//! Currently doesn't support Windows.

#![warn(
	trivial_casts,
	trivial_numeric_casts,
	unused_import_braces,
	unused_qualifications,
	unused_results,
	clippy::pedantic,
)] // from https://github.com/rust-unofficial/patterns/blob/master/anti_patterns/deny-warnings.md
#![allow(
	clippy::doc_markdown,
	clippy::if_not_else,
	clippy::module_name_repetitions,
	clippy::missing_errors_doc,
	clippy::missing_panics_doc,
	clippy::must_use_candidate,
	clippy::cast_sign_loss,
	clippy::cast_possible_truncation
)]

mod bridge;
mod entry;
mod flow;
mod io;
mod message;
mod table;

pub use entry::SocketFlags;
pub use flow::{EventMask, FlowError, TransportFlow};
pub use message::{RecvMessage, SendMessage};
pub use table::{Handle, SocketTable};

// The errno/flag/address vocabulary of the native calls being replaced.
pub use nix::errno::Errno;
pub use nix::sys::socket::{MsgFlags, SockaddrStorage};
