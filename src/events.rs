//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - The comparator GPIO ISR (armed edge crossed)
//! - The wake ticker (light-sleep interval elapsed)
//! - Wake-time sampling (moisture / potentiometer changed)
//!
//! Events are consumed by the main control loop, which processes them
//! one at a time.  Handlers therefore run to completion with respect to
//! each other; the queue is the exclusion mechanism that keeps the
//! valve/debounce/armed-edge state single-writer.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO ISR     │────▶│              │     │              │
//! │ Wake ticker  │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Sampling     │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Comparator crossed up into the wet band (dry → wet).
    EdgeRising = 0,
    /// Comparator crossed down into the dry band (wet → dry).
    EdgeFalling = 1,

    /// Moisture sample moved by more than the deadband
    /// (sample-triggered strategy only).
    MoistureChanged = 10,
    /// Threshold potentiometer moved by more than the deadband.
    ReferenceChanged = 11,

    /// One light-sleep wake period elapsed.
    WakeTick = 20,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISRs write (produce), main loop reads (consume).
// Uses atomic head/tail indices.  The buffer is intentionally
// kept in a static so ISR callbacks can access it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: each slot is written by the single producer side before the
// head index is released, and read by the single consumer side before
// the tail index is released.  The acquire/release pairs on HEAD/TAIL
// order the slot accesses; no concurrent access to one slot is possible.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped — the physical
/// condition it reported will re-announce itself on the next change).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; slot publication is ordered by the
    // Release store on EVENT_HEAD below.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; the Acquire load on EVENT_HEAD above
    // ordered this slot read after the producer's write.
    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::EdgeRising),
        1 => Some(Event::EdgeFalling),
        10 => Some(Event::MoistureChanged),
        11 => Some(Event::ReferenceChanged),
        20 => Some(Event::WakeTick),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The queue is a process-wide static; hold this across each test so
    // the harness's parallel runner cannot interleave two producers.
    static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn drain_all() {
        while pop_event().is_some() {}
    }

    #[test]
    fn push_pop_fifo() {
        let _guard = TEST_LOCK.lock().unwrap();
        drain_all();
        assert!(push_event(Event::EdgeFalling));
        assert!(push_event(Event::WakeTick));
        assert_eq!(pop_event(), Some(Event::EdgeFalling));
        assert_eq!(pop_event(), Some(Event::WakeTick));
        assert_eq!(pop_event(), None);
    }

    #[test]
    fn full_queue_drops() {
        let _guard = TEST_LOCK.lock().unwrap();
        drain_all();
        // One slot is sacrificed to distinguish full from empty.
        for _ in 0..EVENT_QUEUE_CAP - 1 {
            assert!(push_event(Event::WakeTick));
        }
        assert!(!push_event(Event::EdgeRising));
        assert_eq!(queue_len(), EVENT_QUEUE_CAP - 1);
        drain_all();
    }
}
