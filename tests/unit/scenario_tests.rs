use batchsort_rs::{
    BatchExecutor, ExecutorConfig, ExecutorError, FnSimulator, NoDelay, Sequence, Strategy,
};
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_tracing;

    const UNIT_DELAY: Duration = Duration::from_millis(80);

    fn sorted(sequence: &[i64]) -> Sequence {
        let mut copy = sequence.to_vec();
        copy.sort();
        copy
    }

    // --- The reference scenario from the service documentation ---

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reference_scenario_both_strategies() {
        init_tracing();
        let executor =
            BatchExecutor::new(ExecutorConfig::default().with_unit_delay(UNIT_DELAY));
        let batch = vec![vec![3, 1, 2], vec![5, 4]];

        let sequential = executor.run_sequential(&batch).await.unwrap();
        let concurrent = executor.run_concurrent(&batch).await.unwrap();

        assert_eq!(sequential.sorted, vec![vec![1, 2, 3], vec![4, 5]]);
        assert!(sequential.elapsed >= UNIT_DELAY * 2);

        let mut arrived = concurrent.sorted.clone();
        arrived.sort();
        assert_eq!(arrived, vec![vec![1, 2, 3], vec![4, 5]]);
        assert!(concurrent.elapsed >= UNIT_DELAY);
        assert!(concurrent.elapsed < sequential.elapsed);
    }

    // --- Properties over several batch shapes ---

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_properties_hold_for_every_strategy() {
        init_tracing();
        let executor = BatchExecutor::with_simulator(ExecutorConfig::default(), NoDelay);
        let batches: Vec<Vec<Sequence>> = vec![
            vec![],
            vec![vec![]],
            vec![vec![1]],
            vec![vec![2, 2, 2], vec![-1, 5, -1], vec![]],
            (0..50).map(|i| (0..i).rev().collect()).collect(),
        ];

        for batch in &batches {
            for strategy in Strategy::ALL {
                let result = executor.run(strategy, batch).await.unwrap();
                assert_eq!(result.len(), batch.len());
                assert!(result
                    .sorted
                    .iter()
                    .all(|s| s.windows(2).all(|w| w[0] <= w[1])));

                let expected: Vec<Sequence> = batch.iter().map(|s| sorted(s)).collect();
                if strategy.preserves_order() {
                    assert_eq!(result.sorted, expected);
                } else {
                    let mut got = result.sorted.clone();
                    let mut want = expected;
                    got.sort();
                    want.sort();
                    assert_eq!(got, want);
                }
            }
        }
    }

    // --- Failure policy ---

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unit_panic_surfaces_as_batch_failure() {
        init_tracing();
        let executor = BatchExecutor::with_simulator(
            ExecutorConfig::default(),
            FnSimulator::new(|| -> std::future::Ready<()> { panic!("fault injected") }),
        );

        let error = executor
            .run_concurrent(&[vec![1, 2], vec![3]])
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ExecutorError::UnitFailed {
                failed_units: 2,
                ..
            }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_timeout_with_bounded_pool() {
        init_tracing();
        let executor = BatchExecutor::new(
            ExecutorConfig::default()
                .with_unit_delay(Duration::from_millis(50))
                .with_max_concurrency(1)
                .with_batch_timeout(Duration::from_millis(120)),
        );
        let batch = vec![vec![1]; 8];

        let error = executor.run_concurrent(&batch).await.unwrap_err();

        match error {
            ExecutorError::Timeout {
                completed, total, ..
            } => {
                assert_eq!(total, 8);
                assert!(completed < 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
