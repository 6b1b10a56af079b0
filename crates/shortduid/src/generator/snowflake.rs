use core::cmp;

use portable_atomic::{AtomicI64, AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{MonotonicClock, TimeSource, UniqueId};

/// Number of sequence slots, one per value of the 12-bit sequence field.
pub const SLOT_COUNT: usize = UniqueId::SEQUENCE_MASK as usize + 1;

/// A lock-free, shard-aware unique ID generator.
///
/// Every call to [`Self::next_id`] draws the next value of a shared counter
/// as its sequence, then claims that sequence value for the current
/// millisecond in a 4096-entry slot table. Each slot remembers the first
/// timestamp it can still hand out. When a slot is claimed again within the
/// same millisecond (more than 4096 IDs per millisecond) the claim borrows
/// the next free millisecond instead, so IDs drift forward rather than
/// collide.
///
/// A shared high-water mark holds the largest timestamp handed out so far.
/// Every claim starts from it, so once a slot has drifted forward no later
/// call falls back behind it.
///
/// ## Features
/// - ✅ Thread-safe and lock-free: one `fetch_add` and a CAS loop on one slot
/// - ✅ Never blocks or yields, even under sequence overflow
/// - ✅ Timestamps never decrease in issuance order: a call that starts after
///   another one returned never gets an older timestamp, on any thread
///
/// ## Caveats
/// Uniqueness holds per instance. Distinct generators must be given distinct
/// shard IDs, and the clock must not run backward across restarts.
///
/// ## Recommended When
/// - Many threads mint IDs from one shared instance
/// - Bursts above 4096 IDs per millisecond must not stall callers
pub struct SnowflakeIdGenerator<T = MonotonicClock>
where
    T: TimeSource<u64>,
{
    #[cfg(feature = "cache-padded")]
    sequence: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    sequence: AtomicU64,
    #[cfg(feature = "cache-padded")]
    high_water: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    high_water: AtomicU64,
    slots: Box<[AtomicU64]>,
    time_offset: AtomicI64,
    shard_id: u64,
    epoch_start: u64,
    salt: String,
    time: T,
}

impl SnowflakeIdGenerator<MonotonicClock> {
    /// Creates a generator backed by a fresh [`MonotonicClock`].
    ///
    /// # Parameters
    ///
    /// - `shard_id`: identifies the issuing node. Masked to 10 bits.
    /// - `salt`: kept for callers that derive a [`HashCodec`] from the same
    ///   configuration. It does not affect the IDs.
    /// - `epoch_start`: custom epoch, in Unix milliseconds. A value in the
    ///   future is reset to `0`.
    ///
    /// # Example
    /// ```
    /// use shortduid::SnowflakeIdGenerator;
    ///
    /// let generator = SnowflakeIdGenerator::new(5, "", 0);
    /// let a = generator.next_id();
    /// let b = generator.next_id();
    ///
    /// assert_eq!(a.shard_id(), 5);
    /// assert_ne!(a, b);
    /// ```
    ///
    /// [`HashCodec`]: crate::HashCodec
    #[must_use]
    pub fn new(shard_id: u64, salt: &str, epoch_start: u64) -> Self {
        Self::with_time(shard_id, salt, epoch_start, MonotonicClock::new())
    }
}

impl<T> SnowflakeIdGenerator<T>
where
    T: TimeSource<u64>,
{
    /// Creates a generator reading time from `time`.
    ///
    /// See [`SnowflakeIdGenerator::new`] for the meaning of the other
    /// parameters.
    pub fn with_time(shard_id: u64, salt: &str, epoch_start: u64, time: T) -> Self {
        let now = time.current_millis();
        let epoch_start = if epoch_start > now {
            #[cfg(feature = "tracing")]
            tracing::warn!(epoch_start, now, "epoch_start lies in the future, resetting to 0");
            0
        } else {
            epoch_start
        };

        let shard_id = shard_id & UniqueId::SHARD_ID_MASK;
        #[cfg(feature = "tracing")]
        tracing::debug!(shard_id, epoch_start, "created unique id generator");

        let slots: Box<[AtomicU64]> = (0..SLOT_COUNT).map(|_| AtomicU64::new(0)).collect();
        Self {
            #[cfg(feature = "cache-padded")]
            sequence: crossbeam_utils::CachePadded::new(AtomicU64::new(0)),
            #[cfg(not(feature = "cache-padded"))]
            sequence: AtomicU64::new(0),
            #[cfg(feature = "cache-padded")]
            high_water: crossbeam_utils::CachePadded::new(AtomicU64::new(0)),
            #[cfg(not(feature = "cache-padded"))]
            high_water: AtomicU64::new(0),
            slots,
            time_offset: AtomicI64::new(0),
            shard_id,
            epoch_start,
            salt: salt.to_owned(),
            time,
        }
    }

    /// Generates the next unique ID.
    ///
    /// Never fails and never waits. Under more than 4096 requests within one
    /// millisecond the overflowing requests carry a timestamp up to a few
    /// milliseconds ahead of the clock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> UniqueId {
        let now = self.elapsed_millis();
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) & UniqueId::SEQUENCE_MASK;
        let candidate = cmp::max(now, self.high_water.load(Ordering::SeqCst));
        let timestamp = self.claim_slot(sequence, candidate);
        self.high_water.fetch_max(timestamp, Ordering::SeqCst);
        UniqueId::from_components(timestamp, self.shard_id, sequence)
    }

    /// Generates `count` IDs in issuance order.
    pub fn next_ids(&self, count: usize) -> Vec<UniqueId> {
        (0..count).map(|_| self.next_id()).collect()
    }

    /// Claims `sequence` at `timestamp` or, if that pairing is taken, at the
    /// earliest later timestamp still free for this slot. Returns the
    /// timestamp actually used.
    fn claim_slot(&self, sequence: u64, timestamp: u64) -> u64 {
        let slot = &self.slots[sequence as usize];
        let mut next_free = slot.load(Ordering::SeqCst);
        loop {
            let claimed = cmp::max(timestamp, next_free);
            match slot.compare_exchange_weak(
                next_free,
                claimed.saturating_add(1),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => {
                    #[cfg(feature = "tracing")]
                    if claimed > timestamp {
                        tracing::trace!(sequence, drift = claimed - timestamp, "sequence overflow");
                    }
                    return claimed;
                }
                Err(actual) => next_free = actual,
            }
        }
    }

    /// Milliseconds since `epoch_start`, with the test offset applied.
    fn elapsed_millis(&self) -> u64 {
        let offset = self.time_offset.load(Ordering::SeqCst);
        self.time
            .current_millis()
            .saturating_sub(self.epoch_start)
            .saturating_add_signed(offset.saturating_neg())
    }

    /// Returns the shard ID embedded in every ID, already masked to 10 bits.
    pub const fn shard_id(&self) -> u64 {
        self.shard_id
    }

    /// Returns the effective epoch, in Unix milliseconds.
    pub const fn epoch_start(&self) -> u64 {
        self.epoch_start
    }

    /// Returns the salt this generator was configured with.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Returns the current time, in Unix milliseconds, as seen by this
    /// generator's clock. The test offset is not applied.
    pub fn current_time_ms(&self) -> u64 {
        self.time.current_millis()
    }

    /// Skews the generator's notion of time by `offset` milliseconds. A
    /// positive offset moves generated timestamps into the past, a negative
    /// one into the future. Timestamps already issued still bound later ones
    /// from below.
    ///
    /// Intended for tests only.
    pub fn set_time_offset(&self, offset: i64) {
        self.time_offset.store(offset, Ordering::SeqCst);
    }

    /// Returns the offset set by [`Self::set_time_offset`].
    pub fn time_offset(&self) -> i64 {
        self.time_offset.load(Ordering::SeqCst)
    }
}
