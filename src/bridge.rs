use crate::entry::{FlowShared, SocketFlags};
use crate::flow::{EventMask, FlowError, TransportFlow};
use log::trace;
use nix::sys::socket::MsgFlags;
use parking_lot::Mutex;

/// Direction of a transfer; selects which readiness events the bridge waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
	Send,
	Recv,
}
impl Direction {
	fn wait_mask(self) -> EventMask {
		match self {
			Direction::Send => EventMask::WRITABLE | EventMask::ERROR,
			Direction::Recv => EventMask::READABLE | EventMask::ERROR,
		}
	}
}

/// What happens after the first transport attempt.
#[derive(Debug)]
enum Step<T> {
	Done(Result<T, FlowError>),
	WaitThenRetry(EventMask),
}

fn classify<T>(
	result: Result<T, FlowError>, flags: SocketFlags, call: MsgFlags, direction: Direction,
) -> Step<T> {
	match result {
		Err(FlowError::WouldBlock)
			if !flags.contains(SocketFlags::NONBLOCKING)
				&& !call.contains(MsgFlags::MSG_DONTWAIT) =>
		{
			Step::WaitThenRetry(direction.wait_mask())
		}
		done => Step::Done(done),
	}
}

/// Impose blocking semantics on one non-blocking transfer.
///
/// The entry lock is held for every transport attempt and released across the wait, and
/// there is at most one wait-and-retry cycle per call: whatever the retry yields —
/// success, would-block again (a spurious wake), or an error — is the caller's result.
pub(crate) fn transfer<T>(
	state: &Mutex<FlowShared>, flow: &dyn TransportFlow, direction: Direction, call: MsgFlags,
	mut attempt: impl FnMut(&dyn TransportFlow) -> Result<T, FlowError>,
) -> Result<T, FlowError> {
	let guard = state.lock();
	match classify(attempt(flow), guard.flags, call, direction) {
		Step::Done(result) => result,
		Step::WaitThenRetry(mask) => {
			drop(guard);
			trace!("transfer {:?} would block, waiting on {:?}", direction, mask);
			let _ = flow.wait(mask, None);
			let guard = state.lock();
			let result = attempt(flow);
			drop(guard);
			if result.is_err() {
				trace!("transfer {:?} retry {:?}", direction, result.as_ref().err());
			}
			result
		}
	}
}
