use core::{fmt, num::ParseIntError, str::FromStr};

/// A 64-bit unique ID minted by a [`SnowflakeIdGenerator`].
///
/// - 42 bits timestamp (ms since the generator's `epoch_start`, wraps at 2^42)
/// - 10 bits shard ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21             12 11             0
///              +----------------+-----------------+---------------+
///  Field:      | timestamp (42) |  shard ID (10)  | sequence (12) |
///              +----------------+-----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB ----->|
/// ```
///
/// Ordering is the ordering of the raw integer, so IDs sort by timestamp
/// first, then shard, then sequence.
///
/// [`SnowflakeIdGenerator`]: crate::SnowflakeIdGenerator
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniqueId {
    id: u64,
}

impl UniqueId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 10-bit shard ID field. Occupies bits 12
    /// through 21.
    pub const SHARD_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the shard ID to its correct position (bit 12).
    pub const SHARD_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields into an ID. Each field is masked to its width
    /// first, so out-of-range values wrap instead of bleeding into their
    /// neighbours.
    #[must_use]
    pub const fn from_components(timestamp: u64, shard_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let shard_id = (shard_id & Self::SHARD_ID_MASK) << Self::SHARD_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | shard_id | sequence,
        }
    }

    /// Wraps a raw integer without interpretation. Every `u64` is a valid ID.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw packed integer.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp from the packed ID.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the shard ID from the packed ID.
    #[must_use]
    pub const fn shard_id(&self) -> u64 {
        (self.id >> Self::SHARD_ID_SHIFT) & Self::SHARD_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum possible value for the timestamp field.
    #[must_use]
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum possible value for the shard ID field.
    #[must_use]
    pub const fn max_shard_id() -> u64 {
        Self::SHARD_ID_MASK
    }

    /// Returns the maximum possible value for the sequence field.
    #[must_use]
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns the Unix time, in milliseconds, at which this ID was issued by
    /// a generator configured with `epoch_start`.
    ///
    /// Drift borrowed during sequence overflow is included, and the 42-bit
    /// wraparound is not undone.
    #[must_use]
    pub const fn unix_millis(&self, epoch_start: u64) -> u64 {
        self.timestamp().saturating_add(epoch_start)
    }

    /// Returns the ID as a zero-padded 20-digit string.
    #[must_use]
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<u64> for UniqueId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<UniqueId> for u64 {
    fn from(id: UniqueId) -> Self {
        id.to_raw()
    }
}

impl FromStr for UniqueId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::from_raw)
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("shard_id", &self.shard_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
