//! Cracker Module Tests
//!
//! ## Test Scopes
//! - **Validation**: Malformed assignments are refused before anything is queued.
//! - **Engine**: Enumeration covers exactly the assigned range and collects every match.
//! - **Pool**: Each accepted assignment produces exactly one report; a full queue refuses work.
//! - **Wire Format**: Assignment and report field names match what the manager sends.

#[cfg(test)]
mod tests {
    use crate::cracker::engine::{crack_partition, md5_hex, validate};
    use crate::cracker::pool::CrackerPool;
    use crate::cracker::protocol::WorkerTask;
    use crate::cracker::reporter::Reporter;
    use crate::error::CrackError;

    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn task(hash: &str, alphabet: &str, max_length: u32, part_number: u32, part_count: u32) -> WorkerTask {
        WorkerTask {
            request_id: "req-1".to_string(),
            hash: hash.to_string(),
            alphabet: alphabet.to_string(),
            max_length,
            part_number,
            part_count,
        }
    }

    /// Forwards every report into a channel.
    struct ChannelReporter {
        sender: mpsc::UnboundedSender<(String, Vec<String>)>,
    }

    #[async_trait]
    impl Reporter for ChannelReporter {
        async fn send_result(&self, request_id: &str, words: Vec<String>) -> anyhow::Result<()> {
            let _ = self.sender.send((request_id.to_string(), words));
            Ok(())
        }
    }

    /// Always fails, counting attempts.
    struct FailingReporter {
        attempts: mpsc::UnboundedSender<()>,
    }

    #[async_trait]
    impl Reporter for FailingReporter {
        async fn send_result(&self, _request_id: &str, _words: Vec<String>) -> anyhow::Result<()> {
            let _ = self.attempts.send(());
            Err(anyhow::anyhow!("manager unreachable"))
        }
    }

    // ============================================================
    // DIGEST
    // ============================================================

    #[test]
    fn test_md5_hex_known_values() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    // ============================================================
    // VALIDATION
    // ============================================================

    #[test]
    fn test_validate_rejects_malformed_assignments() {
        let cases = [
            task("h", "", 2, 0, 1),
            task("h", "ab", 0, 0, 1),
            task("h", "ab", 2, 0, 0),
            task("h", "ab", 2, 3, 3),
            task("h", "ab", 200, 0, 1),
            task("h", "a", 129, 0, 1),
            task("h", "a", 4_000_000_000, 0, 1),
        ];

        for case in cases {
            assert!(
                matches!(validate(&case), Err(CrackError::Validation(_))),
                "expected rejection for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_assignment() {
        let keyspace = validate(&task("h", "abc", 3, 2, 3)).unwrap();
        assert_eq!(keyspace.total(), 27);
    }

    // ============================================================
    // ENGINE
    // ============================================================

    #[test]
    fn test_only_owning_partition_matches() {
        let target = md5_hex("ba");

        assert!(crack_partition(&task(&target, "ab", 2, 0, 2)).unwrap().is_empty());
        assert_eq!(
            crack_partition(&task(&target, "ab", 2, 1, 2)).unwrap(),
            vec!["ba"]
        );
    }

    #[test]
    fn test_shorter_words_are_never_tried() {
        // "a" has length 1; only 2-character words are enumerated
        let target = md5_hex("a");

        for part in 0..2 {
            assert!(crack_partition(&task(&target, "ab", 2, part, 2)).unwrap().is_empty());
        }
    }

    #[test]
    fn test_every_word_found_by_exactly_one_partition() {
        let alphabet = "abcd";
        let part_count = 3;

        for word in ["aaa", "abc", "cab", "ddd", "dca"] {
            let target = md5_hex(word);
            let hits: Vec<Vec<String>> = (0..part_count)
                .map(|part| crack_partition(&task(&target, alphabet, 3, part, part_count)).unwrap())
                .collect();

            let found: Vec<&String> = hits.iter().flatten().collect();
            assert_eq!(found, vec![word], "word {} found {:?}", word, hits);
        }
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let upper = md5_hex("ab").to_uppercase();

        assert!(crack_partition(&task(&upper, "ab", 2, 0, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_enumeration_is_repeatable() {
        let assignment = task(&md5_hex("xyzx"), "xyz", 4, 1, 2);

        let first = crack_partition(&assignment).unwrap();
        let second = crack_partition(&assignment).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, vec!["xyzx"]);
    }

    // ============================================================
    // POOL
    // ============================================================

    #[tokio::test]
    async fn test_pool_reports_matches() {
        // ARRANGE
        let (sender, mut reports) = mpsc::unbounded_channel();
        let pool = CrackerPool::start(Arc::new(ChannelReporter { sender }), 2, 8);

        // ACT
        pool.accept(task(&md5_hex("bb"), "ab", 2, 1, 2)).unwrap();

        // ASSERT
        let (request_id, words) = tokio::time::timeout(Duration::from_secs(5), reports.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request_id, "req-1");
        assert_eq!(words, vec!["bb"]);
    }

    #[tokio::test]
    async fn test_pool_reports_exactly_once_even_without_match() {
        let (sender, mut reports) = mpsc::unbounded_channel();
        let pool = CrackerPool::start(Arc::new(ChannelReporter { sender }), 1, 8);

        pool.accept(task(&md5_hex("zz"), "ab", 2, 0, 2)).unwrap();

        let (_, words) = tokio::time::timeout(Duration::from_secs(5), reports.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(words.is_empty());

        // nothing else arrives
        let extra = tokio::time::timeout(Duration::from_millis(200), reports.recv()).await;
        assert!(extra.is_err());
    }

    #[tokio::test]
    async fn test_pool_handles_many_assignments() {
        let (sender, mut reports) = mpsc::unbounded_channel();
        let pool = CrackerPool::start(Arc::new(ChannelReporter { sender }), 3, 16);
        let target = md5_hex("cab");

        for part in 0..4 {
            pool.accept(task(&target, "abc", 3, part, 4)).unwrap();
        }

        let mut all_words = Vec::new();
        for _ in 0..4 {
            let (_, words) = tokio::time::timeout(Duration::from_secs(5), reports.recv())
                .await
                .unwrap()
                .unwrap();
            all_words.extend(words);
        }
        assert_eq!(all_words, vec!["cab"]);
    }

    #[tokio::test]
    async fn test_pool_refuses_invalid_assignment() {
        let (sender, _reports) = mpsc::unbounded_channel();
        let pool = CrackerPool::start(Arc::new(ChannelReporter { sender }), 1, 8);

        let result = pool.accept(task("h", "", 2, 0, 1));

        assert!(matches!(result, Err(CrackError::Validation(_))));
    }

    #[tokio::test]
    async fn test_full_queue_refuses_work() {
        // No loops draining the queue, one slot
        let (sender, _reports) = mpsc::unbounded_channel();
        let pool = CrackerPool::start(Arc::new(ChannelReporter { sender }), 0, 1);

        assert!(pool.accept(task("h", "ab", 2, 0, 2)).is_ok());
        let refused = pool.accept(task("h", "ab", 2, 1, 2));

        assert!(matches!(refused, Err(CrackError::Transport(_))));
    }

    #[tokio::test]
    async fn test_failed_report_is_not_retried() {
        let (attempts, mut attempt_log) = mpsc::unbounded_channel();
        let pool = CrackerPool::start(Arc::new(FailingReporter { attempts }), 1, 4);

        pool.accept(task("h", "ab", 1, 0, 1)).unwrap();

        tokio::time::timeout(Duration::from_secs(5), attempt_log.recv())
            .await
            .unwrap()
            .unwrap();
        let retry = tokio::time::timeout(Duration::from_millis(200), attempt_log.recv()).await;
        assert!(retry.is_err());
    }

    // ============================================================
    // WIRE FORMAT
    // ============================================================

    #[test]
    fn test_assignment_uses_camel_case() {
        let json = serde_json::to_value(task("h", "ab", 2, 1, 3)).unwrap();

        assert_eq!(json["requestId"], "req-1");
        assert_eq!(json["maxLength"], 2);
        assert_eq!(json["partNumber"], 1);
        assert_eq!(json["partCount"], 3);
    }

    #[test]
    fn test_negative_max_length_is_rejected_by_decoding() {
        let raw = r#"{"requestId":"r","hash":"h","alphabet":"ab","maxLength":-1,"partNumber":0,"partCount":1}"#;

        assert!(serde_json::from_str::<WorkerTask>(raw).is_err());
    }
}
