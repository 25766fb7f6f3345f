use batchsort_rs::wire::process_payload;
use batchsort_rs::{BatchExecutor, ExecutorConfig, SortResponse, Strategy, WireError};
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_tracing;

    fn executor() -> BatchExecutor {
        BatchExecutor::new(ExecutorConfig::default().with_unit_delay(Duration::from_millis(20)))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_routes_select_strategies() {
        init_tracing();
        let executor = executor();
        let body = br#"{"to_sort": [[3, 1, 2], [5, 4], [0]]}"#;

        for route in ["/process-single", "/process-concurrent"] {
            let strategy = Strategy::from_route(route).unwrap();
            let response = process_payload(&executor, strategy, body).await.unwrap();
            let mut response: SortResponse = serde_json::from_slice(&response).unwrap();

            assert!(response.time_ns >= 20_000_000);
            response.sorted_arrays.sort();
            assert_eq!(
                response.sorted_arrays,
                vec![vec![0], vec![1, 2, 3], vec![4, 5]]
            );
        }
    }

    #[tokio::test]
    async fn test_empty_object_is_empty_batch() {
        init_tracing();
        let response = process_payload(&executor(), Strategy::Concurrent, b"{}")
            .await
            .unwrap();
        let response: SortResponse = serde_json::from_slice(&response).unwrap();

        assert!(response.sorted_arrays.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_rejected() {
        init_tracing();
        let error = process_payload(
            &executor(),
            Strategy::Sequential,
            br#"{"to_sort": [[1, true]]}"#,
        )
        .await
        .unwrap_err();

        assert!(matches!(error, WireError::InvalidPayload(_)));
        assert!(error.to_string().starts_with("invalid JSON payload"));
    }

    #[test]
    fn test_config_file_drives_executor() {
        let config =
            ExecutorConfig::from_json(r#"{"unit_delay_ms": 5, "max_concurrency": 2}"#).unwrap();
        let executor = BatchExecutor::new(config.clone());

        assert_eq!(executor.config(), &config);
    }
}
