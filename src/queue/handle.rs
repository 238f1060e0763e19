//! Type-erased view of a channel, as carried inside a [`Value`](crate::format::Value).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Direction a channel handle permits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Send and receive.
    Both,
    /// Send only.
    SendOnly,
    /// Receive only.
    RecvOnly,
}

impl Direction {
    /// Whether values can be received through this direction.
    #[must_use]
    pub fn can_receive(self) -> bool {
        matches!(self, Self::Both | Self::RecvOnly)
    }
}

/// Outcome of a failed non-blocking probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProbeError {
    /// Open with nothing buffered.
    Empty,
    /// Closed with nothing buffered.
    Closed,
    /// The destination cannot hold the element type.
    Mismatch,
}

pub(crate) trait DynQueue: Send + Sync {
    fn len(&self) -> usize;

    fn capacity(&self) -> Option<usize>;

    fn is_closed(&self) -> bool;

    fn element_type(&self) -> String;

    /// Whether `slot` has the element type.
    fn accepts(&self, slot: &dyn Any) -> bool;

    /// Dequeue at most one value without blocking, writing it to `slot`.
    fn try_recv_into(&self, slot: Option<&mut dyn Any>) -> Result<(), ProbeError>;
}

/// Live, type-erased handle on a channel.
///
/// Cloning shares the underlying buffer. Two handles are equal when they
/// view the same channel in the same direction.
#[derive(Clone)]
pub struct QueueRef {
    handle: Arc<dyn DynQueue>,
    direction: Direction,
}

impl QueueRef {
    pub(crate) fn new(handle: Arc<dyn DynQueue>, direction: Direction) -> Self {
        Self { handle, direction }
    }

    /// Direction of the handle this value was taken from.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of buffered values right now.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handle.len()
    }

    /// Whether nothing is buffered right now.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handle.len() == 0
    }

    /// Buffer size, `None` when unbounded.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.handle.capacity()
    }

    /// Whether the channel has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    /// Name of the element type.
    #[must_use]
    pub fn element_type(&self) -> String {
        self.handle.element_type()
    }

    /// Address of the shared channel state.
    #[must_use]
    pub fn address(&self) -> usize {
        Arc::as_ptr(&self.handle).cast::<()>() as usize
    }

    pub(crate) fn accepts(&self, slot: &dyn Any) -> bool {
        self.handle.accepts(slot)
    }

    pub(crate) fn try_recv_into(&self, slot: Option<&mut dyn Any>) -> Result<(), ProbeError> {
        self.handle.try_recv_into(slot)
    }
}

impl PartialEq for QueueRef {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address() && self.direction == other.direction
    }
}

impl fmt::Debug for QueueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueRef")
            .field("direction", &self.direction)
            .field("element", &self.element_type())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("closed", &self.is_closed())
            .finish()
    }
}
