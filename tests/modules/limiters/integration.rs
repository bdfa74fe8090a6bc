//! 限流器模块集成测试
//!
//! 通过手动时钟回放调用序列，验证窗口边界、容量上限和并发安全

use crate::common::{assert_capacity_bound, manual_limiter, replay_secs};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use signal_filter::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// N = 3, W = 10：填满容量后拒绝，t=0 的记录在 t=11 已过期
#[test]
fn test_fill_then_slide() {
    let decisions = replay_secs(3, 10, &[0, 1, 2, 3, 11]);
    assert_eq!(decisions, vec![true, true, true, false, true]);
}

/// N = 1, W = 5：恰好在 t + W 时记录不再计数
#[test]
fn test_exact_boundary_expires() {
    let decisions = replay_secs(1, 5, &[0, 4, 5]);
    assert_eq!(decisions, vec![true, false, true]);
}

/// 相同调用序列的回放结果完全一致
#[test]
fn test_replay_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(2026);
    let mut calls = Vec::new();
    let mut t = 0;
    for _ in 0..500 {
        t += rng.gen_range(0..4);
        calls.push(t);
    }

    let first = replay_secs(7, 20, &calls);
    let second = replay_secs(7, 20, &calls);
    assert_eq!(first, second);
    assert!(first.iter().any(|&d| d));
    assert!(first.iter().any(|&d| !d));
}

/// 随机时间序列下任意尾随窗口内放行数不超过容量
#[test]
fn test_capacity_bound_holds_for_random_arrivals() {
    let window = Duration::from_millis(1000);
    let (limiter, clock) = manual_limiter(5, window);
    let mut rng = StdRng::seed_from_u64(42);
    let mut admitted_at = Vec::new();

    for _ in 0..2_000 {
        clock.advance(Duration::from_millis(rng.gen_range(0..120)));
        if limiter.try_admit() {
            admitted_at.push(clock.now());
        }
    }

    assert_capacity_bound(&admitted_at, 5, window);
    assert_eq!(limiter.stats().attempted(), 2_000);
    assert_eq!(limiter.stats().admitted as usize, admitted_at.len());
}

/// 窗口持续滑动时，放行数等于每个窗口的容量
#[test]
fn test_steady_stream_admits_capacity_per_window() {
    let (limiter, clock) = manual_limiter(4, Duration::from_secs(10));
    let mut admitted = 0;

    // 每秒一个信号，持续 100 秒
    for t in 0..100 {
        clock.set_secs(t);
        if limiter.try_admit() {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 40);
}

/// 多线程同时调用时不会超额放行，每次调用都只返回一次
#[test]
fn test_concurrent_callers_never_over_admit() {
    let (limiter, clock) = manual_limiter(50, Duration::from_secs(1));
    let limiter = Arc::new(limiter);
    let barrier = Arc::new(Barrier::new(8));
    let decisions = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    for _ in 0..8 {
        let limiter = Arc::clone(&limiter);
        let barrier = Arc::clone(&barrier);
        let decisions = Arc::clone(&decisions);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let mut allowed = 0;
            for _ in 0..100 {
                decisions.fetch_add(1, Ordering::SeqCst);
                if limiter.try_admit() {
                    allowed += 1;
                }
            }
            allowed
        }));
    }

    let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(allowed, 50);
    assert_eq!(decisions.load(Ordering::SeqCst), 800);

    // 窗口过后再放行一批
    clock.set_secs(1);
    let second: usize = (0..100).filter(|_| limiter.try_admit()).count();
    assert_eq!(second, 50);
}

/// 推进时钟与并发调用交错进行
#[test]
fn test_concurrent_callers_with_moving_clock() {
    let window = Duration::from_millis(100);
    let (limiter, clock) = manual_limiter(3, window);
    let limiter = Arc::new(limiter);
    let admitted = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    for _ in 0..4 {
        let limiter = Arc::clone(&limiter);
        let admitted = Arc::clone(&admitted);
        handles.push(thread::spawn(move || {
            for _ in 0..200 {
                if limiter.try_admit() {
                    admitted.fetch_add(1, Ordering::SeqCst);
                }
            }
        }));
    }

    let ticker = {
        let clock = clock.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                clock.advance(Duration::from_millis(10));
                thread::yield_now();
            }
        })
    };

    for handle in handles {
        handle.join().unwrap();
    }
    ticker.join().unwrap();

    // 时钟总共推进 500ms，最多经历 6 个不重叠窗口
    let admitted = admitted.load(Ordering::SeqCst);
    assert!(admitted >= 3);
    assert!(admitted <= 3 * 6);
    assert!(limiter.in_window() <= 3);
}

/// 通过 trait 对象使用过滤器
#[test]
fn test_filter_trait_object() {
    let filter: Arc<dyn Filter> =
        Arc::new(SlidingWindowLimiter::new(2, Duration::from_secs(60)).unwrap());

    let results: Vec<bool> = (0..4).map(|_| filter.is_signal_allowed()).collect();
    assert_eq!(results, vec![true, true, false, false]);
}

/// 最小容量：每个窗口只放行一个信号
#[test]
fn test_minimum_capacity() {
    assert!(matches!(
        SlidingWindowLimiter::new(0, Duration::from_secs(1)),
        Err(FilterError::InvalidConfiguration(_))
    ));

    let decisions = replay_secs(1, 3, &[0, 0, 1, 2, 3, 3]);
    assert_eq!(decisions, vec![true, false, false, false, true, false]);
}

/// 系统时钟下窗口过后恢复放行
#[test]
fn test_system_clock_window_slides() {
    let limiter = SlidingWindowLimiter::new(5, Duration::from_millis(50)).unwrap();

    for _ in 0..5 {
        assert!(limiter.try_admit());
    }
    assert!(!limiter.try_admit());
    assert!(limiter.retry_after().is_some());

    thread::sleep(Duration::from_millis(60));

    assert!(limiter.try_admit());
}
