//! # Transaction Tests
//!
//! Snapshot/rollback semantics: a transaction holds the catalog
//! exclusively, buffers its WAL lines in memory, and either flushes them
//! in order on commit or restores the begin-time catalog on rollback.

use std::fs;

use tempfile::tempdir;

use minisql::Database;

mod rollback_tests {
    use super::*;

    #[test]
    fn scenario_rollback_restores_pre_transaction_rows() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.execute("CREATE TABLE users (id INT, name TEXT)").unwrap();
        db.execute("INSERT INTO users VALUES (1, 'Alice')").unwrap();

        let mut tx = db.begin();
        tx.exec("INSERT INTO users VALUES (2, 'C')").unwrap();
        assert_eq!(
            tx.exec("SELECT * FROM users").unwrap(),
            "id\tname\n1\tAlice\n2\tC\n",
            "statements inside the transaction SHOULD see its writes"
        );
        tx.rollback();

        assert_eq!(
            db.execute("SELECT * FROM users").unwrap(),
            "id\tname\n1\tAlice\n"
        );
        assert!(
            !dir.path().join("data.wal").exists(),
            "rollback SHOULD leave no WAL entries behind"
        );
    }

    #[test]
    fn dropping_an_open_transaction_rolls_back() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.execute("CREATE TABLE t (a INT)").unwrap();

        {
            let mut tx = db.begin();
            tx.exec("INSERT INTO t VALUES (1)").unwrap();
        }

        assert_eq!(db.execute("SELECT * FROM t").unwrap(), "a\n");
    }

    #[test]
    fn rollback_restores_replaced_tables() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.execute("CREATE TABLE t (a INT)").unwrap();
        db.execute("INSERT INTO t VALUES (7)").unwrap();

        let mut tx = db.begin();
        tx.exec("CREATE TABLE t (b TEXT)").unwrap();
        tx.rollback();

        assert_eq!(db.execute("SELECT * FROM t").unwrap(), "a\n7\n");
    }
}

mod commit_tests {
    use super::*;

    #[test]
    fn commit_makes_writes_durable() {
        let dir = tempdir().unwrap();
        {
            let db = Database::open(dir.path()).unwrap();
            db.execute("CREATE TABLE users (id INT, name TEXT)").unwrap();

            let mut tx = db.begin();
            tx.exec("INSERT INTO users VALUES (1, 'Alice')").unwrap();
            tx.exec("INSERT INTO users VALUES (2, 'Bob')").unwrap();
            tx.commit().unwrap();

            assert_eq!(
                db.execute("SELECT * FROM users").unwrap(),
                "id\tname\n1\tAlice\n2\tBob\n"
            );
            assert!(
                !dir.path().join("data.wal").exists(),
                "commit SHOULD truncate the WAL after persisting"
            );
        }

        let reopened = Database::open(dir.path()).unwrap();
        assert_eq!(
            reopened.execute("SELECT * FROM users").unwrap(),
            "id\tname\n1\tAlice\n2\tBob\n"
        );
    }

    #[test]
    fn wal_stays_buffered_until_commit() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.execute("CREATE TABLE t (a INT)").unwrap();

        let mut tx = db.begin();
        tx.exec("INSERT INTO t VALUES (1)").unwrap();
        assert!(
            !dir.path().join("data.wal").exists(),
            "transactional statements SHOULD NOT reach the WAL file before commit"
        );
        tx.commit().unwrap();
    }

    #[test]
    fn transaction_errors_do_not_poison_the_handle() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.execute("CREATE TABLE t (a INT)").unwrap();

        let mut tx = db.begin();
        tx.exec("INSERT INTO missing VALUES (1)").unwrap_err();
        tx.exec("INSERT INTO t VALUES (1)").unwrap();
        tx.commit().unwrap();

        assert_eq!(db.execute("SELECT * FROM t").unwrap(), "a\n1\n");
    }
}

mod isolation_tests {
    use super::*;

    #[test]
    fn writers_block_until_the_transaction_finishes() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.execute("CREATE TABLE t (a INT)").unwrap();

        let mut tx = db.begin();
        tx.exec("INSERT INTO t VALUES (1)").unwrap();

        let other = db.clone();
        let handle = std::thread::spawn(move || {
            // Blocks on the catalog lock until the transaction releases it.
            other.execute("INSERT INTO t VALUES (2)").unwrap()
        });

        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(!handle.is_finished(), "a concurrent writer SHOULD block");

        tx.commit().unwrap();
        handle.join().unwrap();

        assert_eq!(db.execute("SELECT * FROM t").unwrap(), "a\n1\n2\n");
    }
}
