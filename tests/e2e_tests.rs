//! End-to-end integration tests
//!
//! These tests validate the complete transfer processing pipeline using
//! predefined CSV fixtures. Each fixture test:
//! 1. Reads input.csv from a fixture directory
//! 2. Executes every transfer against a fresh ledger and log
//! 3. Renders the final balances as CSV
//! 4. Compares the output with expected.csv
//!
//! Fixtures are located in tests/fixtures/ and run with the default
//! (overdraft allowed) policy. Each test is run with both strategies.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::collections::HashSet;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use transfer_ledger::cli::StrategyType;
    use transfer_ledger::strategy::{create_strategy, BatchConfig, ProcessingSummary};
    use transfer_ledger::{
        write_balances_csv, write_journal_csv, Ledger, LedgerConfig, LedgerError, OverdraftPolicy,
        TransactionLog,
    };

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    /// Run a strategy over `path` with a fresh ledger built from `config`
    fn run(
        path: &Path,
        strategy_type: StrategyType,
        batch: Option<BatchConfig>,
        config: LedgerConfig,
    ) -> (Arc<Ledger>, Arc<TransactionLog>, ProcessingSummary) {
        let ledger = Arc::new(Ledger::with_config(config));
        let log = Arc::new(TransactionLog::new());

        let summary = create_strategy(strategy_type, batch)
            .process(path, Arc::clone(&ledger), Arc::clone(&log))
            .unwrap_or_else(|e| panic!("Failed to process transfers: {}", e));

        (ledger, log, summary)
    }

    fn balances_csv(ledger: &Ledger) -> String {
        let mut output = Vec::new();
        write_balances_csv(&ledger.snapshot(), &mut output).expect("Failed to write balances");
        String::from_utf8(output).expect("Balances are not UTF-8")
    }

    /// Run a fixture by processing input.csv and comparing with expected.csv
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        let (ledger, _, _) = run(
            Path::new(&input_path),
            strategy_type,
            None,
            LedgerConfig::default(),
        );
        let actual_output = balances_csv(&ledger);

        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
        assert_eq!(ledger.total(), Decimal::ZERO);
    }

    /// End-to-end test for all fixtures with both strategies
    #[rstest]
    #[case("happy_path")]
    #[case("circular_transfers")]
    #[case("malformed_data")]
    #[case("precision_testing")]
    #[case("multiple_pairs")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy);
    }

    #[rstest]
    fn test_malformed_rows_are_counted(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let (_, log, summary) = run(
            Path::new("tests/fixtures/malformed_data/input.csv"),
            strategy,
            None,
            LedgerConfig::default(),
        );

        assert_eq!(summary, ProcessingSummary { executed: 2, rejected: 6 });
        assert_eq!(log.len(), 2);
    }

    #[rstest]
    fn test_strict_policy_with_issuer(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let file = create_temp_csv(
            "sender,receiver,amount\n\
             alice,bob,10\n\
             mint,alice,100\n\
             alice,bob,60\n\
             alice,carol,60\n\
             bob,carol,60\n",
        );
        let config = LedgerConfig::new(OverdraftPolicy::RejectIfInsufficient).with_issuer("mint");

        // Batch size 1 keeps every transfer in its own batch
        let (ledger, log, summary) =
            run(file.path(), strategy, Some(BatchConfig::new(1, 2)), config);

        assert_eq!(summary, ProcessingSummary { executed: 3, rejected: 2 });
        assert_eq!(log.len(), 3);
        assert_eq!(ledger.get_balance("mint"), Decimal::new(-100, 0));
        assert_eq!(ledger.get_balance("alice"), Decimal::new(40, 0));
        assert_eq!(ledger.get_balance("bob"), Decimal::ZERO);
        assert_eq!(ledger.get_balance("carol"), Decimal::new(60, 0));
        assert_eq!(ledger.total(), Decimal::ZERO);
    }

    #[test]
    fn test_sync_journal_output() {
        let (_, log, _) = run(
            Path::new("tests/fixtures/happy_path/input.csv"),
            StrategyType::Sync,
            None,
            LedgerConfig::default(),
        );
        let mut output = Vec::new();

        write_journal_csv(log.all(), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,sender,receiver,amount,sender_balance,receiver_balance\n\
             1,Alice,Bob,50.0,-50.0,50.0\n\
             2,Bob,Charlie,25.0,25.0,25.0\n"
        );
    }

    #[test]
    fn test_async_journal_has_unique_increasing_ids() {
        let (_, log, summary) = run(
            Path::new("tests/fixtures/multiple_pairs/input.csv"),
            StrategyType::Async,
            Some(BatchConfig::new(4, 4)),
            LedgerConfig::default(),
        );

        let ids: Vec<u64> = log.all().map(|entry| entry.id.value()).collect();
        let unique: HashSet<u64> = ids.iter().copied().collect();

        assert_eq!(summary.executed, 9);
        assert_eq!(unique.len(), 9);
        assert_eq!(ids, (1..=9).collect::<Vec<u64>>());
    }

    #[rstest]
    fn test_missing_input_file_is_fatal(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let result = create_strategy(strategy, None).process(
            Path::new("tests/fixtures/does_not_exist.csv"),
            Arc::new(Ledger::new()),
            Arc::new(TransactionLog::new()),
        );

        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
    }

    #[rstest]
    fn test_header_only_input_leaves_ledger_empty(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let file = create_temp_csv("sender,receiver,amount\n");

        let (ledger, log, summary) = run(file.path(), strategy, None, LedgerConfig::default());

        assert_eq!(summary, ProcessingSummary::default());
        assert!(ledger.is_empty());
        assert!(log.is_empty());
        assert_eq!(balances_csv(&ledger), "account,balance\n");
    }
}
