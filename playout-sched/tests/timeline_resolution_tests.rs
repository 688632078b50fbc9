//! Resolver and schedule-origin properties over irregular timelines

use playout_sched::schedule::resolve;
use playout_sched::{Entry, ScheduleOrigin, Timeline};
use std::time::{Duration, Instant};

fn timeline_of(durations: &[f64]) -> Timeline {
    Timeline::from_entries(
        durations
            .iter()
            .enumerate()
            .map(|(i, d)| Entry::new(format!("/media/{i}.mp4"), format!("{i}.mp4"), *d).unwrap())
            .collect(),
    )
}

fn irregular() -> Timeline {
    timeline_of(&[0.1, 7.3, 0.001, 12.0, 3600.5, 0.2, 0.7, 45.0])
}

/// Sample points: every boundary, its neighbours, and a uniform grid
fn sample_points(timeline: &Timeline) -> Vec<f64> {
    let mut points = Vec::new();
    for &start in timeline.cumulative_starts() {
        points.push(start);
        points.push(start - 1e-9);
        points.push(start + 1e-9);
    }
    let total = timeline.total_duration();
    let steps = 2000;
    for k in 0..=steps {
        points.push(total * k as f64 / steps as f64);
    }
    points.push(total);
    points.push(total + 1.0);
    points.sort_by(|a, b| a.total_cmp(b));
    points
}

#[test]
fn test_resolve_is_the_containing_entry() {
    let timeline = irregular();
    let starts = timeline.cumulative_starts();
    let ends = timeline.cumulative_ends();

    for e in sample_points(&timeline) {
        let expected = (0..timeline.len()).find(|&i| starts[i] <= e && e < ends[i]);
        assert_eq!(resolve(e, &timeline), expected, "elapsed {}", e);
    }
}

#[test]
fn test_boundaries_belong_to_next_entry() {
    let timeline = irregular();
    for (i, &start) in timeline.cumulative_starts().iter().enumerate() {
        assert_eq!(resolve(start, &timeline), Some(i));
    }
    assert_eq!(resolve(timeline.total_duration(), &timeline), None);
}

#[test]
fn test_resolve_is_monotonic() {
    let timeline = irregular();
    let points = sample_points(&timeline);

    // None before the first entry sorts lowest; None after the end is
    // only reachable once every entry has been passed.
    let mut last: Option<usize> = None;
    let mut finished = false;
    for e in points {
        match resolve(e, &timeline) {
            Some(i) => {
                assert!(!finished, "entry {} resolved after the end at {}", i, e);
                if let Some(prev) = last {
                    assert!(i >= prev, "went back from {} to {} at {}", prev, i, e);
                }
                last = Some(i);
            }
            None if e >= 0.0 => finished = true,
            None => {}
        }
    }
    assert_eq!(last, Some(timeline.len() - 1));
}

#[test]
fn test_out_of_range_and_nan() {
    let timeline = irregular();
    assert_eq!(resolve(-0.5, &timeline), None);
    assert_eq!(resolve(f64::NAN, &timeline), None);
    assert_eq!(resolve(f64::INFINITY, &timeline), None);
    assert_eq!(resolve(0.0, &Timeline::new()), None);
}

#[test]
fn test_partition_survives_edits() {
    let mut timeline = irregular();
    timeline.insert(3, vec![Entry::new("/media/x.mp4", "x.mp4", 0.3).unwrap()]);
    timeline.move_down(&[0, 4]).unwrap();
    timeline.delete(&[2, 6]).unwrap();
    let block = timeline.copy_block(&[0, 1]).unwrap();
    timeline.paste_block(Some(2), &block);

    let starts = timeline.cumulative_starts();
    let ends = timeline.cumulative_ends();
    assert_eq!(starts[0], 0.0);
    for i in 0..timeline.len() {
        assert!(ends[i] > starts[i]);
        if i + 1 < timeline.len() {
            assert_eq!(ends[i], starts[i + 1]);
        }
    }
    assert_eq!(timeline.total_duration(), ends[timeline.len() - 1]);
}

#[test]
fn test_shift_to_lands_inside_target_entry() {
    let timeline = irregular();
    let base = Instant::now();

    for offset in [0.0, -12.25, 1_000_000.1, 3599.999] {
        for wall in [0.0, 0.7, 86_400.3] {
            let now = base + Duration::from_secs_f64(wall);
            for k in 0..timeline.len() {
                let mut origin = ScheduleOrigin::new(base, offset);
                let target = timeline.start_of(k).unwrap();
                origin.shift_to(target, now);
                assert_eq!(
                    resolve(origin.elapsed_at(now), &timeline),
                    Some(k),
                    "offset {} wall {} entry {}",
                    offset,
                    wall,
                    k
                );
            }
        }
    }
}
