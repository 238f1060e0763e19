//! Channel with inspectable direction, capacity, length and lifecycle.
//!
//! # Example
//!
//! ```rust
//! use matchkit::queue::{Channel, TryRecvError};
//!
//! let channel = Channel::<i32>::bounded(2);
//! channel.send(1).unwrap();
//! channel.close();
//!
//! // Buffered values outlive the close.
//! assert_eq!(channel.try_recv(), Ok(1));
//! assert_eq!(channel.try_recv(), Err(TryRecvError::Disconnected));
//! ```

use std::any::Any;
use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use super::handle::{Direction, DynQueue, ProbeError, QueueRef};
use crate::format::{short_type_name, Inspect, Kind, Value};

struct ChannelInner<T> {
    /// Values waiting to be received.
    queue: Mutex<VecDeque<T>>,
    /// Buffer size; `None` when unbounded.
    capacity: Option<usize>,
    /// Set once by `close`; never cleared.
    closed: AtomicBool,
    /// Waker for a receiver waiting for a value.
    receiver_waker: Mutex<Option<Waker>>,
    /// Waker for a sender waiting for room.
    sender_waker: Mutex<Option<Waker>>,
}

impl<T> ChannelInner<T> {
    /// Push a value. On a full buffer, `waker` (if any) is registered before
    /// the lock is released so a concurrent receive cannot be missed.
    fn push(&self, value: T, waker: Option<&Waker>) -> Result<(), TrySendError<T>> {
        let mut queue = self.queue.lock();
        if self.closed.load(Ordering::SeqCst) {
            return Err(TrySendError::Closed(value));
        }
        if self.capacity.is_some_and(|capacity| queue.len() >= capacity) {
            if let Some(waker) = waker {
                *self.sender_waker.lock() = Some(waker.clone());
            }
            return Err(TrySendError::Full(value));
        }
        queue.push_back(value);

        if let Some(waker) = self.receiver_waker.lock().take() {
            waker.wake();
        }
        Ok(())
    }

    /// Pop a value from an already locked buffer.
    fn pop(&self, queue: &mut VecDeque<T>, waker: Option<&Waker>) -> Result<T, TryRecvError> {
        if let Some(value) = queue.pop_front() {
            if let Some(waker) = self.sender_waker.lock().take() {
                waker.wake();
            }
            Ok(value)
        } else if self.closed.load(Ordering::SeqCst) {
            Err(TryRecvError::Disconnected)
        } else {
            if let Some(waker) = waker {
                *self.receiver_waker.lock() = Some(waker.clone());
            }
            Err(TryRecvError::Empty)
        }
    }

    fn try_pop(&self, waker: Option<&Waker>) -> Result<T, TryRecvError> {
        let mut queue = self.queue.lock();
        self.pop(&mut queue, waker)
    }

    fn close(&self) {
        let _queue = self.queue.lock();
        self.closed.store(true, Ordering::SeqCst);
        if let Some(waker) = self.receiver_waker.lock().take() {
            waker.wake();
        }
        if let Some(waker) = self.sender_waker.lock().take() {
            waker.wake();
        }
    }
}

impl<T: Send + 'static> DynQueue for ChannelInner<T> {
    fn len(&self) -> usize {
        self.queue.lock().len()
    }

    fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn element_type(&self) -> String {
        short_type_name(std::any::type_name::<T>())
    }

    fn accepts(&self, slot: &dyn Any) -> bool {
        slot.is::<T>()
    }

    fn try_recv_into(&self, slot: Option<&mut dyn Any>) -> Result<(), ProbeError> {
        // Check the destination before touching the buffer so a mismatch
        // never loses a value.
        let slot = match slot {
            Some(slot) => Some(slot.downcast_mut::<T>().ok_or(ProbeError::Mismatch)?),
            None => None,
        };

        let mut queue = self.queue.lock();
        let value = self.pop(&mut queue, None).map_err(|err| match err {
            TryRecvError::Empty => ProbeError::Empty,
            TryRecvError::Disconnected => ProbeError::Closed,
        })?;
        drop(queue);

        if let Some(slot) = slot {
            *slot = value;
        }
        Ok(())
    }
}

/// Error returned by a non-blocking send.
#[derive(Clone, PartialEq, Eq)]
pub enum TrySendError<T> {
    /// The buffer is full.
    Full(T),
    /// The channel is closed.
    Closed(T),
}

impl<T> TrySendError<T> {
    /// Recover the value that could not be sent.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) | Self::Closed(value) => value,
        }
    }
}

impl<T> Debug for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
            Self::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> fmt::Display for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => write!(f, "sending on a full channel"),
            Self::Closed(_) => write!(f, "sending on a closed channel"),
        }
    }
}

impl<T> std::error::Error for TrySendError<T> {}

/// Error returned when receiving from a closed, drained channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvError;

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "receiving on a closed channel")
    }
}

impl std::error::Error for RecvError {}

/// Error returned when trying to receive without blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// Channel is empty but not closed.
    Empty,
    /// Channel is closed and empty.
    Disconnected,
}

impl fmt::Display for TryRecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "channel is empty"),
            Self::Disconnected => write!(f, "channel is disconnected"),
        }
    }
}

impl std::error::Error for TryRecvError {}

/// Bidirectional channel handle.
///
/// Clones share the same buffer. [`Channel::sender`] and
/// [`Channel::receiver`] hand out direction-restricted views.
pub struct Channel<T> {
    inner: Arc<ChannelInner<T>>,
}

impl<T> Channel<T> {
    /// Create a channel that buffers up to `capacity` values.
    ///
    /// A capacity of zero is rounded up to one: sends never block, so a
    /// channel without a buffer could never hold a value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use matchkit::queue::Channel;
    ///
    /// let channel = Channel::<i32>::bounded(1);
    /// assert_eq!(channel.capacity(), Some(1));
    /// ```
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(Some(capacity.max(1)))
    }

    /// Create a channel with an unbounded buffer.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                queue: Mutex::new(VecDeque::new()),
                capacity,
                closed: AtomicBool::new(false),
                receiver_waker: Mutex::new(None),
                sender_waker: Mutex::new(None),
            }),
        }
    }

    /// Send-only view of this channel.
    #[must_use]
    pub fn sender(&self) -> Sender<T> {
        Sender {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Receive-only view of this channel.
    #[must_use]
    pub fn receiver(&self) -> Receiver<T> {
        Receiver {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Split into a send-only and a receive-only view.
    #[must_use]
    pub fn split(self) -> (Sender<T>, Receiver<T>) {
        (self.sender(), self.receiver())
    }

    /// Send a value without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TrySendError::Closed`] after [`close`](Self::close) and
    /// [`TrySendError::Full`] when the buffer is at capacity.
    pub fn send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.inner.push(value, None)
    }

    /// Send a value, waiting for room in the buffer.
    pub fn send_async(&self, value: T) -> SendFuture<'_, T> {
        SendFuture {
            inner: &*self.inner,
            value: Some(value),
        }
    }

    /// Try to receive a value without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`TryRecvError::Empty`] if nothing is buffered, or
    /// [`TryRecvError::Disconnected`] if the channel is closed and drained.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.inner.try_pop(None)
    }

    /// Receive a value asynchronously.
    pub fn recv(&self) -> RecvFuture<'_, T> {
        RecvFuture { inner: &*self.inner }
    }

    /// Close the channel. Buffered values stay receivable.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Check if the channel is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Number of buffered values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Check if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.queue.lock().is_empty()
    }

    /// Buffer size, `None` when unbounded.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Sending half of a channel.
pub struct Sender<T> {
    inner: Arc<ChannelInner<T>>,
}

impl<T> Sender<T> {
    /// Send a value without waiting.
    ///
    /// # Errors
    ///
    /// See [`Channel::send`].
    pub fn send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.inner.push(value, None)
    }

    /// Send a value, waiting for room in the buffer.
    pub fn send_async(&self, value: T) -> SendFuture<'_, T> {
        SendFuture {
            inner: &*self.inner,
            value: Some(value),
        }
    }

    /// Close the channel.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Check if the channel is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Number of buffered values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Check if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.queue.lock().is_empty()
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Receiving half of a channel.
pub struct Receiver<T> {
    inner: Arc<ChannelInner<T>>,
}

impl<T> Receiver<T> {
    /// Try to receive a value without blocking.
    ///
    /// # Errors
    ///
    /// See [`Channel::try_recv`].
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.inner.try_pop(None)
    }

    /// Receive a value asynchronously.
    ///
    /// Resolves to `Err(RecvError)` once the channel is closed and drained.
    pub fn recv(&self) -> RecvFuture<'_, T> {
        RecvFuture { inner: &*self.inner }
    }

    /// Check if the channel is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Number of buffered values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Check if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.queue.lock().is_empty()
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

macro_rules! debug_handle {
    ($($name:ident),+) => {
        $(
            impl<T> Debug for $name<T> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($name))
                        .field("closed", &self.is_closed())
                        .field("len", &self.len())
                        .field("capacity", &self.inner.capacity)
                        .finish()
                }
            }
        )+
    };
}

debug_handle!(Channel, Sender, Receiver);

fn queue_value<H: ?Sized, T: Send + 'static>(
    inner: &Arc<ChannelInner<T>>,
    direction: Direction,
) -> Value {
    let handle: Arc<dyn DynQueue> = Arc::clone(inner) as Arc<dyn DynQueue>;
    Value::of::<H>(Kind::Queue(QueueRef::new(handle, direction)))
}

impl<T: Send + 'static> Inspect for Channel<T> {
    fn inspect(&self) -> Value {
        queue_value::<Self, T>(&self.inner, Direction::Both)
    }
}

impl<T: Send + 'static> Inspect for Sender<T> {
    fn inspect(&self) -> Value {
        queue_value::<Self, T>(&self.inner, Direction::SendOnly)
    }
}

impl<T: Send + 'static> Inspect for Receiver<T> {
    fn inspect(&self) -> Value {
        queue_value::<Self, T>(&self.inner, Direction::RecvOnly)
    }
}

/// Future for async send.
pub struct SendFuture<'a, T> {
    inner: &'a ChannelInner<T>,
    value: Option<T>,
}

impl<T> Unpin for SendFuture<'_, T> {}

impl<T> Future for SendFuture<'_, T> {
    type Output = Result<(), TrySendError<T>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(value) = self.value.take() else {
            panic!("polled after completion");
        };

        match self.inner.push(value, Some(cx.waker())) {
            Err(TrySendError::Full(value)) => {
                self.value = Some(value);
                Poll::Pending
            }
            result => Poll::Ready(result),
        }
    }
}

/// Future for async receive.
pub struct RecvFuture<'a, T> {
    inner: &'a ChannelInner<T>,
}

impl<T> Future for RecvFuture<'_, T> {
    type Output = Result<T, RecvError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.inner.try_pop(Some(cx.waker())) {
            Ok(value) => Poll::Ready(Ok(value)),
            Err(TryRecvError::Disconnected) => Poll::Ready(Err(RecvError)),
            Err(TryRecvError::Empty) => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_channel() {
        let channel = Channel::<i32>::unbounded();
        channel.send(1).unwrap();
        channel.send(2).unwrap();
        channel.send(3).unwrap();

        assert_eq!(channel.len(), 3);
        assert_eq!(channel.capacity(), None);
        assert_eq!(channel.try_recv().unwrap(), 1);
        assert_eq!(channel.try_recv().unwrap(), 2);
        assert_eq!(channel.try_recv().unwrap(), 3);
    }

    #[test]
    fn test_bounded_channel() {
        let channel = Channel::<i32>::bounded(2);
        channel.send(1).unwrap();
        channel.send(2).unwrap();

        assert_eq!(channel.send(3), Err(TrySendError::Full(3)));

        assert_eq!(channel.try_recv().unwrap(), 1);
        channel.send(3).unwrap();
        assert_eq!(channel.len(), 2);
    }

    #[test]
    fn test_zero_capacity_rounds_up() {
        let channel = Channel::<i32>::bounded(0);
        assert_eq!(channel.capacity(), Some(1));
        channel.send(1).unwrap();
        assert!(channel.send(2).is_err());
    }

    #[test]
    fn test_close_keeps_buffered_values() {
        let channel = Channel::<i32>::unbounded();
        channel.send(1).unwrap();
        channel.close();

        assert_eq!(channel.send(2), Err(TrySendError::Closed(2)));
        assert!(channel.is_closed());

        assert_eq!(channel.try_recv().unwrap(), 1);
        assert_eq!(channel.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn test_try_recv_empty() {
        let channel = Channel::<i32>::unbounded();
        assert_eq!(channel.try_recv(), Err(TryRecvError::Empty));
        assert!(channel.is_empty());
    }

    #[test]
    fn test_views_share_buffer() {
        let channel = Channel::<i32>::bounded(4);
        let (tx, rx) = channel.clone().split();

        tx.send(1).unwrap();
        channel.send(2).unwrap();

        assert_eq!(rx.len(), 2);
        assert_eq!(rx.try_recv().unwrap(), 1);
        assert_eq!(channel.try_recv().unwrap(), 2);

        tx.close();
        assert!(rx.is_closed());
        assert!(channel.is_closed());
    }

    #[test]
    fn test_into_inner() {
        assert_eq!(TrySendError::Full(5).into_inner(), 5);
        assert_eq!(TrySendError::Closed(6).into_inner(), 6);
    }

    #[test]
    fn test_probe_checks_type_before_dequeue() {
        let channel = Channel::<i32>::bounded(1);
        channel.send(17).unwrap();

        let mut wrong = false;
        assert_eq!(
            channel.inner.try_recv_into(Some(&mut wrong)),
            Err(ProbeError::Mismatch)
        );
        assert!(!wrong);
        assert_eq!(channel.len(), 1);

        let mut right = 0i32;
        assert_eq!(channel.inner.try_recv_into(Some(&mut right)), Ok(()));
        assert_eq!(right, 17);
        assert_eq!(channel.inner.try_recv_into(None), Err(ProbeError::Empty));

        channel.close();
        assert_eq!(channel.inner.try_recv_into(None), Err(ProbeError::Closed));
    }

    #[test]
    fn test_inspect_directions() {
        let channel = Channel::<u8>::bounded(3);
        channel.send(1).unwrap();

        let value = channel.inspect();
        assert_eq!(value.type_name(), Some("Channel<u8>"));
        let Kind::Queue(queue) = value.kind() else {
            panic!("expected a queue");
        };
        assert_eq!(queue.direction(), Direction::Both);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.capacity(), Some(3));
        assert_eq!(queue.element_type(), "u8");

        let Kind::Queue(queue) = channel.sender().inspect().kind().clone() else {
            panic!("expected a queue");
        };
        assert_eq!(queue.direction(), Direction::SendOnly);

        let Kind::Queue(queue) = channel.receiver().inspect().kind().clone() else {
            panic!("expected a queue");
        };
        assert_eq!(queue.direction(), Direction::RecvOnly);
    }

    #[tokio::test]
    async fn test_async_send_recv() {
        let channel = Channel::<i32>::unbounded();

        channel.send_async(1).await.unwrap();
        channel.send_async(2).await.unwrap();

        assert_eq!(channel.recv().await.unwrap(), 1);
        assert_eq!(channel.recv().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_async_send_waits_for_room() {
        let channel = Channel::<i32>::bounded(1);
        channel.send(1).unwrap();

        let tx = channel.sender();
        let handle = tokio::spawn(async move {
            tx.send_async(2).await.unwrap();
        });

        tokio::task::yield_now().await;
        assert_eq!(channel.recv().await.unwrap(), 1);
        handle.await.unwrap();
        assert_eq!(channel.recv().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_async_recv_after_close() {
        let (tx, rx) = Channel::<i32>::unbounded().split();

        tx.send(1).unwrap();
        tx.close();

        assert_eq!(rx.recv().await.unwrap(), 1);
        assert_eq!(rx.recv().await, Err(RecvError));
    }

    #[test]
    fn test_debug_impls() {
        let channel = Channel::<i32>::unbounded();
        channel.send(1).unwrap();

        assert!(format!("{channel:?}").contains("Channel"));
        assert!(format!("{:?}", channel.sender()).contains("Sender"));
        assert!(format!("{:?}", channel.receiver()).contains("len: 1"));
    }

    #[test]
    fn test_error_display() {
        assert!(TrySendError::Closed(1).to_string().contains("closed channel"));
        assert!(TrySendError::Full(1).to_string().contains("full channel"));
        assert!(RecvError.to_string().contains("closed channel"));
        assert!(TryRecvError::Empty.to_string().contains("empty"));
        assert!(TryRecvError::Disconnected
            .to_string()
            .contains("disconnected"));
    }
}
