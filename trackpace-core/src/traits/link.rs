//! Link Layer Contract
//!
//! The wireless stack (MAC, regional parameters, duty-cycle bookkeeping) is
//! vendor code. The scheduler only needs to know whether it may transmit now,
//! how large the next frame may be, and whether a frame was accepted.

/// Result of handing a frame to the link layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendOutcome {
    /// Frame queued for transmission
    Enqueued,
    /// Frame exceeds the current payload ceiling
    TooLarge,
    /// Transmit budget exhausted, try again later
    DutyCycleBlocked,
}

/// Uplink stack seen from the scheduler
///
/// ## Payload ceiling
///
/// `max_payload_len` changes with the data rate the network has assigned and
/// with MAC commands waiting to piggyback on the next uplink. It must be
/// queried immediately before building a frame.
///
/// ## Duty cycle
///
/// `duty_cycle_remaining_ms` is negative while transmission is blocked; its
/// magnitude is the wait until the next opportunity.
pub trait LinkLayer {
    /// Whether the device has joined the network
    fn is_joined(&self) -> bool;

    /// Hand a frame to the stack
    fn send(&mut self, payload: &[u8], confirmed: bool) -> SendOutcome;

    /// Largest application payload the next uplink can carry (bytes)
    fn max_payload_len(&self) -> u16;

    /// Request an empty uplink that flushes pending MAC commands
    fn request_flush_frame(&mut self, confirmed: bool);

    /// Remaining transmit budget in milliseconds, negative when blocked
    fn duty_cycle_remaining_ms(&self) -> i32;

    /// Ask the network for the current time (answered through
    /// [`crate::scheduler::Tracker::on_time_sync`])
    fn request_time_sync(&mut self);
}
