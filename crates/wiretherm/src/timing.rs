//! # Timing profile
//!
//! Every delay the signalling layer performs between line transitions is
//! collected here under a protocol-level name, instead of being scattered
//! through the bit operations as bare numbers.

/// Minimum durations for each phase of the 1-Wire signalling.
///
/// Every value is a lower bound. The engine never releases or samples the
/// line earlier than the profile states, but tolerates later completion on
/// systems with coarse timers; the protocol has no upper bound on slot
/// spacing as long as the line idles high between slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    /// Reset pulse low hold. The protocol requires at least 480 us.
    pub reset_low_us: u32,
    /// Offset from bus release to the presence sample. Responding
    /// peripherals pull the line low 15-60 us after release and hold it
    /// for 60-240 us, so sampling at ~70 us lands inside the pulse.
    pub presence_sample_us: u32,
    /// Extra hold after a detected presence pulse before the host resumes
    /// driving the line.
    pub presence_hold_us: u32,
    /// Idle-high recovery before a write slot opens.
    pub write_idle_us: u32,
    /// Initial low pulse that opens a slot, at least 1 us.
    pub slot_start_us: u32,
    /// Bulk of a write slot during which the bit value is driven.
    pub slot_hold_us: u32,
    /// Inter-slot gap after the line is forced back high.
    pub slot_recovery_us: u32,
    /// Settle time between releasing the line in a read slot and sampling
    /// it. The sample must land within 15 us of the slot opening or the
    /// pull-up will have erased a transmitted zero.
    pub read_sample_us: u32,
    /// Remainder of the minimum 60 us read slot after the sample.
    pub read_tail_us: u32,
    /// Conversion wait at full resolution, at least 750 ms.
    pub conversion_wait_ms: u32,
}

impl TimingProfile {
    /// Datasheet-derived timings for the DS18B20 at 12-bit resolution.
    pub const DS18B20: Self = Self {
        reset_low_us: 480,
        presence_sample_us: 70,
        presence_hold_us: 10,
        write_idle_us: 50,
        slot_start_us: 2,
        slot_hold_us: 60,
        slot_recovery_us: 12,
        read_sample_us: 10,
        read_tail_us: 50,
        conversion_wait_ms: 750,
    };
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::DS18B20
    }
}
