/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Tests for unit failures, timeouts and cancellation.

#[cfg(test)]
mod tests {
    use crate::executor::{BatchExecutor, ExecutorConfig, ExecutorError, Strategy, UnitFailure};
    use crate::unit::FnSimulator;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_panicking_unit_fails_the_batch_without_hanging() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let simulator = FnSimulator::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                panic!("simulated fault");
            }
            tokio::time::sleep(Duration::from_millis(20))
        });
        let executor = BatchExecutor::with_simulator(ExecutorConfig::default(), simulator);
        let batch: Vec<Vec<i64>> = (0..5).map(|i| vec![i, 0]).collect();

        let error = tokio::time::timeout(Duration::from_secs(5), executor.run_concurrent(&batch))
            .await
            .expect("batch must not hang")
            .unwrap_err();

        match error {
            ExecutorError::UnitFailed {
                index,
                failure,
                failed_units,
            } => {
                assert!(index < batch.len());
                assert_eq!(failed_units, 1);
                assert_eq!(
                    failure,
                    UnitFailure::Panicked {
                        message: "simulated fault".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        // Every unit was still run: one failure does not stop the others.
        assert_eq!(calls.load(Ordering::SeqCst), batch.len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_panicking_unit_is_counted() {
        let simulator = FnSimulator::new(|| -> std::future::Ready<()> {
            panic!("always fails");
        });
        let executor = BatchExecutor::with_simulator(ExecutorConfig::default(), simulator);
        let batch = vec![vec![2, 1]; 4];

        let error = executor.run_concurrent_ordered(&batch).await.unwrap_err();

        assert!(matches!(
            error,
            ExecutorError::UnitFailed {
                index: 0,
                failed_units: 4,
                ..
            }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_timeout_cancels_outstanding_units() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();
        let simulator = FnSimulator::new(move || {
            let counter = counter.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        let executor = BatchExecutor::with_simulator(
            ExecutorConfig::default().with_batch_timeout(Duration::from_millis(50)),
            simulator,
        );
        let batch = vec![vec![3, 2, 1]; 3];

        let start = Instant::now();
        let error = executor.run_concurrent(&batch).await.unwrap_err();

        assert!(start.elapsed() < Duration::from_millis(300));
        assert_eq!(
            error,
            ExecutorError::Timeout {
                timeout: Duration::from_millis(50),
                completed: 0,
                total: 3,
            }
        );

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_sequential_panic_is_returned_as_unit_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let simulator = FnSimulator::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                panic!("sequential fault");
            }
            std::future::ready(())
        });
        let executor = BatchExecutor::with_simulator(ExecutorConfig::default(), simulator);
        let batch = vec![vec![3, 1], vec![2, 1], vec![9, 8]];

        // Run on its own task: a panic escaping the executor would surface
        // here as a `JoinError` instead of a returned error.
        let outcome = tokio::spawn(async move { executor.run_sequential(&batch).await })
            .await
            .expect("sequential panic must not escape the executor");

        assert_eq!(
            outcome.unwrap_err(),
            ExecutorError::UnitFailed {
                index: 1,
                failure: UnitFailure::Panicked {
                    message: "sequential fault".to_string()
                },
                failed_units: 1,
            }
        );
        // The units after the failed one still ran.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_sequential_counts_every_panicking_unit() {
        let simulator = FnSimulator::new(|| -> std::future::Ready<()> {
            panic!("always fails");
        });
        let executor = BatchExecutor::with_simulator(ExecutorConfig::default(), simulator);
        let batch = vec![vec![1]; 3];

        let error = executor.run(Strategy::Sequential, &batch).await.unwrap_err();

        assert!(matches!(
            error,
            ExecutorError::UnitFailed {
                index: 0,
                failed_units: 3,
                ..
            }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dropping_a_concurrent_run_aborts_its_units() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();
        let simulator = FnSimulator::new(move || {
            let counter = counter.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        let executor = BatchExecutor::with_simulator(ExecutorConfig::default(), simulator);
        let batch = vec![vec![5, 4, 3]; 10];

        // No batch timeout configured: the caller gives up instead.
        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), executor.run_concurrent(&batch)).await;
        assert!(abandoned.is_err());
        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            executor.run_concurrent_ordered(&batch),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sequential_timeout_reports_progress() {
        let executor = BatchExecutor::new(
            ExecutorConfig::default()
                .with_unit_delay(Duration::from_millis(30))
                .with_batch_timeout(Duration::from_millis(100)),
        );
        let batch = vec![vec![1]; 10];

        let error = executor.run_sequential(&batch).await.unwrap_err();

        assert!(error.is_timeout());
        match error {
            ExecutorError::Timeout {
                completed, total, ..
            } => {
                assert_eq!(total, 10);
                assert!(completed < total);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_generous_timeout_does_not_interfere() {
        let executor = BatchExecutor::new(
            ExecutorConfig::default()
                .with_unit_delay(Duration::from_millis(5))
                .with_batch_timeout(Duration::from_secs(10)),
        );
        let batch = vec![vec![3, 1, 2], vec![5, 4]];

        let sequential = executor.run_sequential(&batch).await.unwrap();
        let ordered = executor.run_concurrent_ordered(&batch).await.unwrap();

        assert_eq!(sequential.sorted, ordered.sorted);
    }

    #[test]
    fn test_error_messages() {
        let timeout = ExecutorError::Timeout {
            timeout: Duration::from_millis(50),
            completed: 1,
            total: 3,
        };
        assert_eq!(
            timeout.to_string(),
            "batch timed out after 50ms: 1 of 3 units completed"
        );

        let failed = ExecutorError::UnitFailed {
            index: 2,
            failure: UnitFailure::Cancelled,
            failed_units: 1,
        };
        assert_eq!(
            failed.to_string(),
            "unit 2 failed (1 failed units in batch): unit was cancelled"
        );
    }
}
