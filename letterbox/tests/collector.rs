use std::time::Duration;

use letterbox::{Category, Collector, CollectorConfig, Error, Result};
use tokio::time::advance;

/// Waits until every command enqueued so far has been applied.
async fn settle<P: letterbox::Payload>(collector: &Collector<P>) {
    collector.stats().await.unwrap();
}

fn values<P: Clone + letterbox::Payload>(entries: &[std::sync::Arc<letterbox::Entry<P>>]) -> Vec<P> {
    entries.iter().map(|e| e.value().clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn one_dead_letter_in_a_forty_second_window() -> Result {
    let collector = Collector::with_capacity(10)?;
    collector.record(Category::DeadLetter, "lost").await?;

    let window = collector.calculate_for_window_ms(40_000).await?;
    assert_eq!(window.dead_letters.count, 1);
    assert_eq!(window.unhandled.count, 0);
    assert_eq!(window.dropped.count, 0);

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn snapshot_lists_newest_first() -> Result {
    let collector = Collector::with_capacity(10)?;
    for v in ["a", "b", "c"] {
        collector.record(Category::Unhandled, v).await?;
    }

    let snapshot = collector.snapshot().await?;
    assert_eq!(values(snapshot.unhandled()), vec!["c", "b", "a"]);
    assert!(snapshot.dead_letters().is_empty());
    assert!(snapshot.dropped().is_empty());

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn overflowing_capacity_keeps_most_recent() -> Result {
    let collector = Collector::with_capacity(5)?;
    for i in 1..=7 {
        collector.record(Category::Unhandled, i.to_string()).await?;
    }

    let snapshot = collector.snapshot().await?;
    assert_eq!(values(snapshot.unhandled()), vec!["7", "6", "5", "4", "3"]);

    let window = collector.calculate_for_window(Duration::from_secs(3600)).await?;
    assert_eq!(window.unhandled.count, 5);

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn fresh_history_is_a_minimum_estimate() -> Result {
    let collector = Collector::with_capacity(10)?;
    for v in ["x", "y", "z"] {
        collector.record(Category::Unhandled, v).await?;
    }

    let window = collector.calculate_for_window_ms(40_000).await?;
    assert_eq!(window.unhandled.count, 3);
    assert!(window.unhandled.is_minimum_estimate);

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn history_older_than_window_gives_exact_count() -> Result {
    let collector = Collector::with_capacity(10)?;
    for (i, v) in ["x", "y", "z"].into_iter().enumerate() {
        if i > 0 {
            advance(Duration::from_millis(500)).await;
        }
        collector.record(Category::Unhandled, v).await?;
        settle(&collector).await;
    }

    let window = collector.calculate_for_window_ms(300).await?;
    assert!(window.unhandled.count > 0);
    assert_eq!(window.unhandled.count, 1);
    assert!(!window.unhandled.is_minimum_estimate);

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn non_positive_windows_carry_no_evidence() -> Result {
    let collector = Collector::with_capacity(4)?;
    collector.record(Category::Dropped, 1u32).await?;
    advance(Duration::from_secs(1)).await;

    for ms in [0, -1, i64::MIN] {
        let window = collector.calculate_for_window_ms(ms).await?;
        for category in Category::ALL {
            assert_eq!(window.get(category).count, 0);
            assert!(window.get(category).is_minimum_estimate);
        }
    }

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn empty_categories_report_zero() -> Result {
    let collector = Collector::<u32>::with_capacity(3)?;
    advance(Duration::from_secs(10)).await;

    for ms in [1, 1_000, 60_000] {
        let window = collector.calculate_for_window_ms(ms).await?;
        assert_eq!(window.total(), 0);
        assert!(window.dead_letters.is_minimum_estimate);
    }
    assert!(collector.snapshot().await?.is_empty());

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn capacity_holds_after_every_prefix() -> Result {
    let capacity = 4;
    let collector = Collector::with_capacity(capacity)?;

    for i in 0..20u32 {
        let category = Category::ALL[(i % 3) as usize];
        collector.record(category, i).await?;

        let snapshot = collector.snapshot().await?;
        let stats = collector.stats().await?;
        for category in Category::ALL {
            let retained = snapshot.get(category);
            let recorded = stats.get(category).recorded as usize;
            assert!(retained.len() <= capacity);
            assert_eq!(retained.len(), recorded.min(capacity));

            // retained entries are exactly the most recent ones of this category
            let expected: Vec<u32> = (0..=i)
                .filter(|n| Category::ALL[(n % 3) as usize] == category)
                .rev()
                .take(capacity)
                .collect();
            assert_eq!(values(retained), expected);
        }
    }

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn timestamps_decrease_in_snapshots() -> Result {
    let collector = Collector::with_capacity(8)?;
    for i in 0..6u32 {
        collector.record(Category::Dropped, i).await?;
        settle(&collector).await;
        advance(Duration::from_millis(10)).await;
    }

    let snapshot = collector.snapshot().await?;
    let stamps: Vec<_> = snapshot.dropped().iter().map(|e| e.timestamp()).collect();
    assert!(stamps.windows(2).all(|w| w[0] > w[1]));

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn window_counts_are_monotonic_and_sound() -> Result {
    let capacity = 5;
    let collector = Collector::with_capacity(capacity)?;

    // one record every 100ms for 1s; only the last five survive
    let mut recorded_at = Vec::new();
    for i in 0..10u32 {
        if i > 0 {
            advance(Duration::from_millis(100)).await;
        }
        collector.record(Category::DeadLetter, i).await?;
        settle(&collector).await;
        recorded_at.push(i as u64 * 100);
    }
    let now_ms = 900u64;

    let mut last = 0;
    for window_ms in [0u64, 50, 100, 250, 400, 401, 450, 700, 2_000] {
        let window = collector.calculate_for_window(Duration::from_millis(window_ms)).await?;
        let result = window.dead_letters;
        assert!(result.count >= last);
        last = result.count;

        if !result.is_minimum_estimate {
            let truth = recorded_at
                .iter()
                .filter(|&&t| t + window_ms >= now_ms)
                .count();
            assert_eq!(result.count, truth, "window {window_ms}ms");
        }
    }

    // the oldest survivor is 400ms old: a 400ms window is provably complete,
    // a 450ms window is not
    let exact = collector.calculate_for_window_ms(400).await?.dead_letters;
    assert!(!exact.is_minimum_estimate);
    assert_eq!(exact.count, capacity);
    let partial = collector.calculate_for_window_ms(450).await?.dead_letters;
    assert!(partial.is_minimum_estimate);
    assert_eq!(partial.count, capacity);

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn snapshots_are_independent_of_later_records() -> Result {
    let collector = Collector::with_capacity(2)?;
    collector.record(Category::Unhandled, "a").await?;
    let before = collector.snapshot().await?;

    collector.record(Category::Unhandled, "b").await?;
    collector.record(Category::Unhandled, "c").await?;
    let after = collector.snapshot().await?;

    assert_eq!(values(before.unhandled()), vec!["a"]);
    assert_eq!(values(after.unhandled()), vec!["c", "b"]);

    collector.stop().await
}

#[tokio::test(start_paused = true)]
async fn clear_empties_every_category() -> Result {
    let collector = Collector::with_capacity(4)?;
    for category in Category::ALL {
        collector.record(category, "x").await?;
    }
    collector.clear().await?;

    assert!(collector.snapshot().await?.is_empty());
    let stats = collector.stats().await?;
    assert_eq!(stats.total_recorded(), 3);
    assert_eq!(stats.unhandled.retained, 0);

    collector.stop().await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_respect_capacity() -> Result {
    let capacity = 16;
    let collector = Collector::new(
        CollectorConfig::default()
            .with_capacity(capacity)
            .with_command_channel_capacity(8),
    )?;

    let mut tasks = Vec::new();
    for producer in 0..4u32 {
        let handle = collector.handle();
        tasks.push(tokio::spawn(async move {
            for i in 0..100u32 {
                let category = Category::ALL[(i % 3) as usize];
                handle.record(category, (producer, i)).await?;
            }
            Ok::<_, Error>(())
        }));
    }

    let reader = collector.handle();
    let readers = tokio::spawn(async move {
        for _ in 0..20 {
            let snapshot = reader.snapshot().await?;
            for category in Category::ALL {
                assert!(snapshot.get(category).len() <= capacity);
            }
            let window = reader.calculate_for_window(Duration::from_secs(60)).await?;
            assert!(window.total() <= 3 * capacity);
        }
        Ok::<_, Error>(())
    });

    for task in tasks {
        task.await.unwrap()?;
    }
    readers.await.unwrap()?;

    let stats = collector.stats().await?;
    assert_eq!(stats.total_recorded(), 400);
    for category in Category::ALL {
        let s = stats.get(category);
        assert_eq!(s.retained, capacity);
        assert_eq!(s.recorded - s.evicted, capacity as u64);
    }

    // per producer, retained entries keep the producer's own send order
    let snapshot = collector.snapshot().await?;
    for category in Category::ALL {
        for producer in 0..4u32 {
            let seq: Vec<u32> = snapshot
                .get(category)
                .iter()
                .filter(|e| e.value().0 == producer)
                .map(|e| e.value().1)
                .collect();
            assert!(seq.windows(2).all(|w| w[0] > w[1]));
        }
    }

    collector.stop().await
}

#[tokio::test]
async fn stopped_collector_rejects_operations() -> Result {
    let collector = Collector::with_capacity(2)?;
    let handle = collector.handle();
    handle.record(Category::DeadLetter, 1u8).await?;
    collector.stop().await?;

    assert_eq!(handle.record(Category::DeadLetter, 2).await, Err(Error::NotRunning));
    assert!(matches!(handle.snapshot().await, Err(Error::NotRunning)));
    assert_eq!(handle.calculate_for_window_ms(1_000).await, Err(Error::NotRunning));
    Ok(())
}
