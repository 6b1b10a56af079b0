use crate::{MonotonicClock, SnowflakeIdGenerator, TimeSource, UniqueId};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::scope;

struct MockTime {
    millis: u64,
}

impl TimeSource<u64> for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

#[derive(Clone)]
struct SharedMockTime {
    millis: Arc<AtomicU64>,
}

impl SharedMockTime {
    fn new(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource<u64> for SharedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

const SEQUENCES: u64 = UniqueId::max_sequence() + 1;

fn fixed(shard_id: u64, millis: u64) -> SnowflakeIdGenerator<MockTime> {
    SnowflakeIdGenerator::with_time(shard_id, "", 0, MockTime { millis })
}

#[test]
fn sequential_ids_differ_only_in_sequence() {
    let generator = fixed(5, 42);

    let id1 = generator.next_id();
    let id2 = generator.next_id();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id1.shard_id(), 5);
    assert_eq!(id2.shard_id(), 5);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id1.to_raw(), (42 << 22) | (5 << 12));
    assert_eq!(id2.to_raw(), id1.to_raw() + 1);
}

#[test]
fn next_ids_returns_ids_in_issuance_order() {
    let generator = fixed(1, 7);

    let ids = generator.next_ids(10);

    assert_eq!(ids.len(), 10);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(id.sequence(), i as u64);
    }
    assert!(generator.next_ids(0).is_empty());
}

#[test]
fn sequence_overflow_drifts_into_following_milliseconds() {
    let generator = fixed(0, 42);

    let ids = generator.next_ids(2 * SEQUENCES as usize + 1);

    let (first, rest) = ids.split_at(SEQUENCES as usize);
    let (second, third) = rest.split_at(SEQUENCES as usize);
    assert!(first.iter().all(|id| id.timestamp() == 42));
    assert!(second.iter().all(|id| id.timestamp() == 43));
    assert_eq!(third[0].timestamp(), 44);
    assert_eq!(third[0].sequence(), 0);

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn overflow_drift_is_absorbed_once_the_clock_catches_up() {
    let time = SharedMockTime::new(100);
    let generator = SnowflakeIdGenerator::with_time(0, "", 0, time.clone());

    let _ = generator.next_ids(SEQUENCES as usize);
    assert_eq!(generator.next_id().timestamp(), 101);

    time.advance(10);
    assert_eq!(generator.next_id().timestamp(), 110);
}

#[test]
fn timestamps_never_decrease_for_a_sequential_caller() {
    let time = SharedMockTime::new(42);
    let generator = SnowflakeIdGenerator::with_time(3, "", 0, time.clone());

    let mut ids = Vec::with_capacity(20_000);
    for i in 0..20_000 {
        if i > 0 && i % 3_000 == 0 {
            time.advance(1);
        }
        if i == 10_000 {
            time.advance(100);
        }
        ids.push(generator.next_id());
    }

    assert!(ids.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn ids_are_unique_across_threads_on_a_frozen_clock() {
    const IDS_PER_THREAD: usize = 10_000;
    let threads = num_cpus::get().max(2);
    let generator = fixed(9, 1_000);

    let all: Vec<UniqueId> = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| generator.next_ids(IDS_PER_THREAD)))
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread panicked"))
            .collect()
    });

    assert_eq!(all.len(), threads * IDS_PER_THREAD);
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());
    assert!(all.iter().all(|id| id.timestamp() >= 1_000 && id.shard_id() == 9));
}

#[test]
fn ids_are_unique_across_threads_on_the_monotonic_clock() {
    const IDS_PER_THREAD: usize = 5_000;
    let threads = num_cpus::get().max(2);
    let generator = SnowflakeIdGenerator::new(1, "salt", 0);

    let all: Vec<UniqueId> = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| generator.next_ids(IDS_PER_THREAD)))
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread panicked"))
            .collect()
    });

    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), threads * IDS_PER_THREAD);
}

#[test]
fn timestamps_never_decrease_per_thread_under_contention() {
    // several sequence wraps per thread, so slots drift while others race
    const IDS_PER_THREAD: usize = 20_000;
    let threads = num_cpus::get().max(8);
    let generator = fixed(2, 500);

    let per_thread: Vec<Vec<UniqueId>> = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| generator.next_ids(IDS_PER_THREAD)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect()
    });

    for ids in &per_thread {
        assert!(ids.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
    }
    let unique: HashSet<_> = per_thread.iter().flatten().collect();
    assert_eq!(unique.len(), threads * IDS_PER_THREAD);
}

#[test]
fn ids_issued_after_other_threads_finish_are_never_older() {
    let generator = fixed(0, 500);

    let newest = scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| generator.next_ids(3 * SEQUENCES as usize)))
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread panicked"))
            .map(|id| id.timestamp())
            .max()
            .expect("ids were generated")
    });

    for id in generator.next_ids(SEQUENCES as usize) {
        assert!(id.timestamp() >= newest);
    }
}

#[test]
fn timestamps_are_relative_to_the_epoch() {
    let generator = SnowflakeIdGenerator::with_time(0, "", 4_000, MockTime { millis: 10_000 });

    let id = generator.next_id();

    assert_eq!(generator.epoch_start(), 4_000);
    assert_eq!(id.timestamp(), 6_000);
    assert_eq!(id.unix_millis(generator.epoch_start()), 10_000);
}

#[test]
fn future_epoch_is_reset_to_zero() {
    let generator = SnowflakeIdGenerator::with_time(0, "", 5_000, MockTime { millis: 1_000 });

    assert_eq!(generator.epoch_start(), 0);
    assert_eq!(generator.next_id().timestamp(), 1_000);
}

#[test]
fn time_offset_skews_generated_timestamps() {
    let generator = fixed(0, 1_000);
    assert_eq!(generator.time_offset(), 0);

    generator.set_time_offset(100);
    assert_eq!(generator.time_offset(), 100);
    assert_eq!(generator.next_id().timestamp(), 900);

    generator.set_time_offset(-100);
    assert_eq!(generator.next_id().timestamp(), 1_100);

    // offset is not applied to the reported clock
    assert_eq!(generator.current_time_ms(), 1_000);
}

#[test]
fn time_offset_saturates_at_the_epoch() {
    let generator = fixed(0, 10);
    generator.set_time_offset(50);

    assert_eq!(generator.next_id().timestamp(), 0);
}

#[test]
fn shard_id_is_masked_to_ten_bits() {
    let generator = fixed(1024 + 7, 42);

    assert_eq!(generator.shard_id(), 7);
    assert_eq!(generator.next_id().shard_id(), 7);
}

#[test]
fn exposes_configuration() {
    let generator = SnowflakeIdGenerator::with_time(2, "pepper", 0, MockTime { millis: 77 });

    assert_eq!(generator.salt(), "pepper");
    assert_eq!(generator.shard_id(), 2);
    assert_eq!(generator.current_time_ms(), 77);
}

#[test]
fn default_clock_is_wall_clock_aligned() {
    let clock = MonotonicClock::new();
    let generator = SnowflakeIdGenerator::new(0, "", 0);

    let id = generator.next_id();

    assert!(id.timestamp() >= clock.start_millis());
    assert!(id.unix_millis(0) >= clock.start_millis());
}
