//! Ping-pong frame exchange
//!
//! The two raw frames are never shared. They move by ownership between
//! the acquisition loop and the render loop through two small channels:
//!
//! ```text
//!            ready (filled frames)
//!  producer ───────────────────────▶ consumer
//!     ▲                                  │
//!     └──────────────────────────────────┘
//!            free (consumed frames)
//! ```
//!
//! The producer always holds exactly one frame to write into. Publishing
//! swaps it for a free frame. If the consumer has not yet taken the
//! pending frame, the new frame replaces it and the stale buffer becomes
//! the next write target, so the consumer always sees the newest capture.
//! Only while the consumer holds the other frame is the new frame itself
//! dropped and overwritten. A [`ReadyFrame`] hands its buffer back to the
//! free list when dropped.

use core::ops::Deref;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use super::{RawFrame, Slot};

/// An owned handle to one of the two frame buffers
pub type FrameRef = &'static mut RawFrame;

type FrameChannel = Channel<CriticalSectionRawMutex, FrameRef, 2>;

/// Outcome of [`FrameProducer::publish`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Publish {
    /// Frame handed to the consumer
    Ready(Slot),
    /// Consumer behind; the frame in this slot was discarded
    ///
    /// Either the stale pending frame was replaced by the new one, or the
    /// consumer holds the other buffer and the new frame itself is lost.
    Dropped(Slot),
}

/// Channel pair connecting the frame producer and consumer
pub struct FrameExchange {
    ready: FrameChannel,
    free: FrameChannel,
}

impl Default for FrameExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameExchange {
    pub const fn new() -> Self {
        Self {
            ready: Channel::new(),
            free: Channel::new(),
        }
    }

    /// Stamp the buffer slots and split into producer and consumer ends
    ///
    /// Call once per exchange; the pair owns both buffers from then on.
    pub fn split(&'static self, frames: &'static mut [RawFrame; 2]) -> (FrameProducer, FrameConsumer) {
        let [ping, pong] = frames;
        ping.slot = Slot::Ping;
        pong.slot = Slot::Pong;

        // Capacity two, both empty: cannot fail
        let _ = self.free.try_send(pong);

        (
            FrameProducer {
                exchange: self,
                current: ping,
            },
            FrameConsumer { exchange: self },
        )
    }
}

/// Acquisition end of the exchange
pub struct FrameProducer {
    exchange: &'static FrameExchange,
    current: FrameRef,
}

impl FrameProducer {
    /// The buffer the next frame is written into
    pub fn frame_mut(&mut self) -> &mut RawFrame {
        &mut *self.current
    }

    /// Slot of the buffer being written
    pub fn slot(&self) -> Slot {
        self.current.slot
    }

    /// Hand the current buffer to the consumer
    pub fn publish(&mut self) -> Publish {
        let slot = self.current.slot;

        if let Ok(next) = self.exchange.free.try_receive() {
            let done = core::mem::replace(&mut self.current, next);
            return match self.exchange.ready.try_send(done) {
                Ok(()) => Publish::Ready(slot),
                Err(TrySendError::Full(done)) => {
                    // Only two buffers exist, so this never happens; keep both anyway
                    let spare = core::mem::replace(&mut self.current, done);
                    let _ = self.exchange.free.try_send(spare);
                    Publish::Dropped(slot)
                }
            };
        }

        // Pending frame not taken yet: swap it out for the newer one
        match self.exchange.ready.try_receive() {
            Ok(stale) => {
                let stale_slot = stale.slot;
                let done = core::mem::replace(&mut self.current, stale);
                // Just emptied, cannot be full
                let _ = self.exchange.ready.try_send(done);
                Publish::Dropped(stale_slot)
            }
            // Consumer holds the other buffer; overwrite this one
            Err(_) => Publish::Dropped(slot),
        }
    }
}

/// Render end of the exchange
pub struct FrameConsumer {
    exchange: &'static FrameExchange,
}

impl FrameConsumer {
    /// Take the ready frame if one is waiting
    pub fn try_take(&mut self) -> Option<ReadyFrame> {
        self.exchange.ready.try_receive().ok().map(|frame| ReadyFrame {
            frame: Some(frame),
            exchange: self.exchange,
        })
    }

    /// Wait for the next ready frame
    pub async fn take(&mut self) -> ReadyFrame {
        let frame = self.exchange.ready.receive().await;
        ReadyFrame {
            frame: Some(frame),
            exchange: self.exchange,
        }
    }
}

/// A filled frame on loan to the consumer
///
/// Dereferences to the frame; returns it to the producer when dropped.
pub struct ReadyFrame {
    frame: Option<FrameRef>,
    exchange: &'static FrameExchange,
}

impl ReadyFrame {
    pub fn slot(&self) -> Slot {
        self.deref().slot
    }
}

impl Deref for ReadyFrame {
    type Target = RawFrame;

    fn deref(&self) -> &RawFrame {
        match &self.frame {
            Some(frame) => &**frame,
            // Only emptied in drop
            None => unreachable!(),
        }
    }
}

impl Drop for ReadyFrame {
    fn drop(&mut self) {
        if let Some(frame) = self.frame.take() {
            let _ = self.exchange.free.try_send(frame);
        }
    }
}
