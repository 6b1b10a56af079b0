use crate::{HashCodec, MonotonicClock, Result, SnowflakeIdGenerator, TimeSource, UniqueId};

/// A unique ID generator paired with a [`HashCodec`] sharing its salt.
///
/// This is the convenience entry point: mint IDs, turn them into short
/// opaque codes, and turn codes back into numbers.
///
/// # Example
/// ```
/// use shortduid::ShortDuid;
///
/// let duid = ShortDuid::new(7, "my salt", 0);
///
/// let id = duid.next_id();
/// let code = duid.encode(&[id.to_raw()]);
///
/// assert_eq!(duid.decode(&code), vec![id.to_raw()]);
/// ```
pub struct ShortDuid<T = MonotonicClock>
where
    T: TimeSource<u64>,
{
    generator: SnowflakeIdGenerator<T>,
    codec: HashCodec,
}

impl ShortDuid<MonotonicClock> {
    /// Creates a generator and a codec (default alphabet, no minimum length)
    /// from the same salt.
    #[must_use]
    pub fn new(shard_id: u64, salt: &str, epoch_start: u64) -> Self {
        Self::with_time(shard_id, salt, epoch_start, MonotonicClock::new())
    }
}

impl<T> ShortDuid<T>
where
    T: TimeSource<u64>,
{
    /// Like [`ShortDuid::new`], but the generator reads time from `time`.
    ///
    /// ```
    /// use shortduid::{ShortDuid, TimeSource};
    ///
    /// struct FixedTime;
    /// impl TimeSource<u64> for FixedTime {
    ///     fn current_millis(&self) -> u64 {
    ///         1_000
    ///     }
    /// }
    ///
    /// let duid = ShortDuid::with_time(3, "salt", 0, FixedTime);
    /// assert_eq!(duid.next_id().timestamp(), 1_000);
    /// assert_eq!(duid.current_time_ms(), 1_000);
    /// ```
    pub fn with_time(shard_id: u64, salt: &str, epoch_start: u64, time: T) -> Self {
        Self {
            generator: SnowflakeIdGenerator::with_time(shard_id, salt, epoch_start, time),
            codec: HashCodec::with_salt(salt),
        }
    }

    /// Pairs an existing generator with an independently configured codec,
    /// for example one with a minimum length or a custom alphabet.
    pub const fn from_parts(generator: SnowflakeIdGenerator<T>, codec: HashCodec) -> Self {
        Self { generator, codec }
    }

    /// Generates the next unique ID. See [`SnowflakeIdGenerator::next_id`].
    pub fn next_id(&self) -> UniqueId {
        self.generator.next_id()
    }

    /// Generates `count` IDs in issuance order.
    pub fn next_ids(&self, count: usize) -> Vec<UniqueId> {
        self.generator.next_ids(count)
    }

    /// Mints a fresh ID and returns its code.
    pub fn next_code(&self) -> String {
        self.codec.encode(&[self.next_id().to_raw()])
    }

    /// Mints `count` fresh IDs and returns one code per ID.
    pub fn next_codes(&self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_code()).collect()
    }

    /// Encodes `numbers` into a single code.
    pub fn encode(&self, numbers: &[u64]) -> String {
        self.codec.encode(numbers)
    }

    /// Decodes a code without validating it. See [`HashCodec::decode`].
    pub fn decode(&self, code: &str) -> Vec<u64> {
        self.codec.decode(code)
    }

    /// See [`HashCodec::try_decode`].
    pub fn try_decode(&self, code: &str) -> Result<Vec<u64>> {
        self.codec.try_decode(code)
    }

    /// Returns the shard ID embedded in every ID.
    pub const fn shard_id(&self) -> u64 {
        self.generator.shard_id()
    }

    /// Returns the effective epoch, in Unix milliseconds.
    pub const fn epoch_start(&self) -> u64 {
        self.generator.epoch_start()
    }

    /// Returns the salt shared by the generator and the default codec.
    pub fn salt(&self) -> &str {
        self.generator.salt()
    }

    /// Returns the generator clock's current Unix time in milliseconds.
    pub fn current_time_ms(&self) -> u64 {
        self.generator.current_time_ms()
    }

    /// Test-only clock skew. See [`SnowflakeIdGenerator::set_time_offset`].
    pub fn set_time_offset(&self, offset: i64) {
        self.generator.set_time_offset(offset);
    }

    /// Returns the underlying ID generator.
    pub const fn generator(&self) -> &SnowflakeIdGenerator<T> {
        &self.generator
    }

    /// Returns the underlying codec.
    pub const fn codec(&self) -> &HashCodec {
        &self.codec
    }
}
