//! # WAL Recovery Tests
//!
//! Crash-recovery behavior: replaying `data.wal` over whatever snapshot
//! exists reproduces the state the statements would have produced live,
//! and the log is removed once replay completes.

use std::fs;

use tempfile::tempdir;

use minisql::Database;

mod replay_tests {
    use super::*;

    #[test]
    fn scenario_wal_only_recovery() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("data.wal"),
            "CREATE TABLE waltest (id INT)\nINSERT INTO waltest VALUES (1)\n",
        )
        .unwrap();

        let db = Database::open(dir.path()).unwrap();
        assert_eq!(db.execute("SELECT * FROM waltest").unwrap(), "id\n1\n");
        assert!(
            !dir.path().join("data.wal").exists(),
            "the WAL SHOULD be removed after replay"
        );
    }

    #[test]
    fn replay_over_snapshot_matches_live_execution() {
        let live_dir = tempdir().unwrap();
        let crash_dir = tempdir().unwrap();

        let statements = [
            "INSERT INTO users VALUES (2, 'Bob')",
            "UPDATE users SET name='Carol' WHERE id=1",
        ];

        // Live run: everything executed normally.
        let live = Database::open(live_dir.path()).unwrap();
        live.execute("CREATE TABLE users (id INT, name TEXT)").unwrap();
        live.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();
        for stmt in statements {
            live.execute(stmt).unwrap();
        }

        // Crash run: same base state, then the tail statements only ever
        // reach the WAL.
        {
            let db = Database::open(crash_dir.path()).unwrap();
            db.execute("CREATE TABLE users (id INT, name TEXT)").unwrap();
            db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();
        }
        let wal_tail = statements.join("\n") + "\n";
        fs::write(crash_dir.path().join("data.wal"), wal_tail).unwrap();

        let recovered = Database::open(crash_dir.path()).unwrap();
        assert_eq!(
            recovered.execute("SELECT * FROM users").unwrap(),
            live.execute("SELECT * FROM users").unwrap(),
            "replay SHOULD reproduce the live execution"
        );
    }

    #[test]
    fn blank_wal_lines_are_ignored() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("data.wal"),
            "\nCREATE TABLE t (a INT)\n\n   \nINSERT INTO t VALUES (5)\n\n",
        )
        .unwrap();

        let db = Database::open(dir.path()).unwrap();
        assert_eq!(db.execute("SELECT * FROM t").unwrap(), "a\n5\n");
    }

    #[test]
    fn replay_failure_aborts_initialization() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("data.wal"),
            "INSERT INTO missing VALUES (1)\n",
        )
        .unwrap();

        let err = Database::open(dir.path()).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("WAL replay failed"), "got: {chain}");
        assert!(chain.contains("table 'missing' not found"), "got: {chain}");
        assert!(
            dir.path().join("data.wal").exists(),
            "a failed replay SHOULD leave the WAL in place"
        );
    }

    #[test]
    fn failed_statement_leaves_wal_line_behind() {
        let dir = tempdir().unwrap();
        {
            let db = Database::open(dir.path()).unwrap();
            db.execute("CREATE TABLE t (id INT)").unwrap();
            // WAL append happens before validation; the bad line stays.
            db.execute("INSERT INTO t VALUES ('abc')").unwrap_err();
        }
        let wal = fs::read_to_string(dir.path().join("data.wal")).unwrap();
        assert!(wal.contains("INSERT INTO t VALUES ('abc')"), "got: {wal}");

        // Replaying it reproduces the same failure and aborts the open.
        let err = Database::open(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid INT literal 'abc'"));
    }

    #[test]
    fn wal_is_truncated_after_each_successful_mutation() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        db.execute("CREATE TABLE t (a INT)").unwrap();
        assert!(!dir.path().join("data.wal").exists());

        db.execute("INSERT INTO t VALUES (1)").unwrap();
        assert!(!dir.path().join("data.wal").exists());
    }
}
