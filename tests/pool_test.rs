/*!
 * Worker Pool Integration Tests
 *
 * Submission, result delivery, panics, and shutdown draining
 */

use futures::executor::block_on;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use sync_containers::{
    BlockingQueue, ConcurrentTable, PoolConfig, PoolError, TaskError, WorkerPool,
};

#[test]
fn test_shutdown_drains_accepted_tasks() {
    let pool = WorkerPool::new(4).unwrap();
    let ran = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let ran = ran.clone();
            pool.submit(move || {
                thread::sleep(Duration::from_micros(200));
                ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap()
        })
        .collect();

    pool.shutdown();
    assert_eq!(ran.load(Ordering::SeqCst), 100);
    for handle in handles {
        assert_eq!(handle.join(), Ok(()));
    }
}

#[test]
fn test_submission_after_shutdown_is_rejected() {
    let pool = WorkerPool::new(2).unwrap();
    pool.shutdown();

    let ran = Arc::new(AtomicUsize::new(0));
    let ran_clone = ran.clone();
    let result = pool.submit(move || {
        ran_clone.fetch_add(1, Ordering::SeqCst);
    });

    assert!(matches!(result, Err(PoolError::SubmissionAfterShutdown)));
    thread::sleep(Duration::from_millis(10));
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_tasks_run_on_distinct_workers() {
    let pool = WorkerPool::new(4).unwrap();
    let names = Arc::new(Mutex::new(HashSet::new()));
    let gate = Arc::new(std::sync::Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let names = names.clone();
            let gate = gate.clone();
            pool.submit(move || {
                // All four must be running at once to pass the barrier
                gate.wait();
                let name = thread::current().name().map(str::to_string);
                names.lock().unwrap().insert(name);
            })
            .unwrap()
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(names.lock().unwrap().len(), 4);
}

#[test]
fn test_panic_reported_through_handle() {
    let pool = WorkerPool::new(2).unwrap();
    let failing = pool
        .submit(|| -> String { panic!("index {} out of range", 12) })
        .unwrap();
    let fine = pool.submit(|| "still running".to_string()).unwrap();

    assert_eq!(
        failing.join(),
        Err(TaskError::Panicked("index 12 out of range".into()))
    );
    assert_eq!(fine.join(), Ok("still running".to_string()));
}

#[test]
fn test_join_async_resolves() {
    let pool = WorkerPool::new(2).unwrap();
    let handle = pool.submit(|| (1..=10u32).sum::<u32>()).unwrap();
    assert_eq!(block_on(handle.join_async()), Ok(55));
}

#[test]
fn test_task_ids_are_unique() {
    let pool = WorkerPool::new(2).unwrap();
    let handles: Vec<_> = (0..50).map(|_| pool.submit(|| ()).unwrap()).collect();
    let ids: HashSet<_> = handles.iter().map(|h| h.id()).collect();
    assert_eq!(ids.len(), 50);
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_pool_fills_shared_table() {
    let pool = WorkerPool::new(4).unwrap();
    let table = Arc::new(ConcurrentTable::new());

    let handles: Vec<_> = (0..1_000u32)
        .map(|i| {
            let table = table.clone();
            pool.submit(move || table.add_pair(i, i.to_string())).unwrap()
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(table.len(), 1_000);
    assert_eq!(table.get_value(&777, String::new()), "777");
}

#[test]
fn test_results_flow_back_through_queue() {
    let pool = WorkerPool::new(3).unwrap();
    let results = Arc::new(BlockingQueue::new());

    for i in 0..30u32 {
        let results = results.clone();
        let _ = pool.submit(move || results.push(i)).unwrap();
    }
    pool.shutdown();

    let mut collected = Vec::new();
    while let Some(value) = results.try_pop() {
        collected.push(value);
    }
    collected.sort_unstable();
    assert_eq!(collected, (0..30).collect::<Vec<_>>());
}

#[test]
fn test_stats_after_shutdown() {
    let pool = WorkerPool::new(2).unwrap();
    for _ in 0..5 {
        let _ = pool.submit(|| ()).unwrap();
    }
    let _ = pool.submit(|| -> u8 { panic!("boom") }).unwrap();
    pool.shutdown();

    let stats = pool.stats();
    assert_eq!(stats.workers, 2);
    assert_eq!(stats.submitted, 6);
    assert_eq!(stats.completed, 5);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.active, 0);
    assert_eq!(stats.pending(), 0);
}

#[test]
fn test_config_from_json() {
    let config: PoolConfig =
        serde_json::from_str(r#"{"workers": 3, "thread_name_prefix": "ingest"}"#).unwrap();
    assert_eq!(config.workers, 3);
    assert_eq!(config.stack_size, None);

    let pool = WorkerPool::with_config(config).unwrap();
    assert_eq!(pool.worker_count(), 3);
    let name = pool
        .submit(|| thread::current().name().map(str::to_string))
        .unwrap()
        .join()
        .unwrap();
    assert!(name.is_some_and(|n| n.starts_with("ingest-")));
}

#[test]
fn test_invalid_config_rejected() {
    let config = PoolConfig {
        thread_name_prefix: String::new(),
        ..PoolConfig::with_workers(2)
    };
    assert!(matches!(
        WorkerPool::with_config(config),
        Err(PoolError::InvalidConfig(_))
    ));
}

#[test]
fn test_task_shutdown_races_outside_shutdown() {
    let pool = Arc::new(WorkerPool::new(2).unwrap());
    let inner = pool.clone();
    let _ = pool
        .submit(move || {
            thread::sleep(Duration::from_millis(100));
            inner.shutdown();
        })
        .unwrap();

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    let outside = {
        let pool = pool.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            pool.shutdown();
            let _ = done_tx.send(());
        })
    };

    assert!(
        done_rx.recv_timeout(Duration::from_secs(5)).is_ok(),
        "outside shutdown never returned"
    );
    outside.join().unwrap();
    assert!(pool.is_shutdown());
    assert!(pool.submit(|| ()).is_err());
}
