use anyhow::Result;
use chrono::Utc;
use schema_manager::{
    cli::cmd_apply::{EXIT_ROLLED_BACK, exit_status},
    errors::{CatalogError, MigrationError},
    types::{HistoryMode, RunState, SchemaUpdate, UpdateOutcome, UpdateResult},
};

use crate::common::{TestEnv, init_test_env};

fn results(outcomes: &[UpdateOutcome]) -> Vec<(i64, UpdateResult)> {
    outcomes.iter().map(|o| (o.index, o.result)).collect()
}

fn write_scenario(env: &TestEnv, bad: &str) -> Result<()> {
    env.write_update("1-init.sql", "CREATE TABLE users (id INTEGER PRIMARY KEY);")?;
    env.write_update("2-add_col.sql", "ALTER TABLE users ADD COLUMN email TEXT;")?;
    env.write_update("3-bad.sql", bad)?;
    env.write_update("4-idx.sql", "CREATE INDEX idx_users_email ON users (email);")?;
    Ok(())
}

#[tokio::test]
async fn test_run_applies_every_update_in_order() -> Result<()> {
    let env = init_test_env().await?;
    write_scenario(&env, "CREATE TABLE teams (id INTEGER PRIMARY KEY);")?;

    let report = env.services.migration_service.run(&env.options()).await?;

    assert_eq!(report.state, RunState::Committed);
    assert!(report.is_success());
    assert_eq!(exit_status(&report), 0);
    assert_eq!(
        results(&report.outcomes),
        vec![
            (1, UpdateResult::Succeeded),
            (2, UpdateResult::Succeeded),
            (3, UpdateResult::Succeeded),
            (4, UpdateResult::Succeeded)
        ]
    );

    assert!(env.column_exists("users", "email").await);
    assert!(env.table_exists("teams").await);

    let rows = env.history_rows().await?;
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].name, "add_col");
    assert_eq!(rows[1].file_name, "2-add_col.sql");
    Ok(())
}

#[tokio::test]
async fn test_second_run_is_a_no_op() -> Result<()> {
    let env = init_test_env().await?;
    write_scenario(&env, "CREATE TABLE teams (id INTEGER PRIMARY KEY);")?;

    env.services.migration_service.run(&env.options()).await?;
    let report = env.services.migration_service.run(&env.options()).await?;

    assert_eq!(report.state, RunState::Committed);
    assert!(report.outcomes.is_empty());
    assert!(report.is_success());
    assert_eq!(report.last_successful.map(|u| u.index), Some(4));
    assert_eq!(env.history_rows().await?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_failure_rolls_back_and_abandons_batch() -> Result<()> {
    let env = init_test_env().await?;
    write_scenario(&env, "CREATE TABLE broken (")?;

    let report = env.services.migration_service.run(&env.options()).await?;

    assert_eq!(report.state, RunState::RolledBack);
    assert!(!report.is_success());
    assert_eq!(exit_status(&report), EXIT_ROLLED_BACK);
    assert_eq!(
        results(&report.outcomes),
        vec![
            (1, UpdateResult::Abandoned),
            (2, UpdateResult::Abandoned),
            (3, UpdateResult::Failed)
        ]
    );

    // Nothing of the batch survived, and update 4 never ran.
    assert!(!env.table_exists("users").await);

    let rows = env.history_rows().await?;
    assert_eq!(
        rows.iter().map(|r| (r.index, r.result)).collect::<Vec<_>>(),
        results(&report.outcomes)
    );
    assert_eq!(env.history().last_successful().await?, None);
    Ok(())
}

#[tokio::test]
async fn test_rerun_after_fix_starts_from_the_beginning() -> Result<()> {
    let env = init_test_env().await?;
    write_scenario(&env, "CREATE TABLE broken (")?;
    env.services.migration_service.run(&env.options()).await?;

    env.write_update("3-bad.sql", "CREATE TABLE teams (id INTEGER PRIMARY KEY);")?;
    let report = env.services.migration_service.run(&env.options()).await?;

    assert_eq!(report.state, RunState::Committed);
    assert_eq!(report.outcomes.len(), 4);
    assert!(report.outcomes.iter().all(|o| o.is_succeeded()));
    assert_eq!(env.history_rows().await?.len(), 7);
    Ok(())
}

#[tokio::test]
async fn test_first_update_failure_records_only_it() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-bad.sql", "NOT VALID SQL")?;
    env.write_update("2-ok.sql", "CREATE TABLE users (id INTEGER PRIMARY KEY);")?;

    let report = env.services.migration_service.run(&env.options()).await?;

    assert_eq!(report.state, RunState::RolledBack);
    assert_eq!(results(&report.outcomes), vec![(1, UpdateResult::Failed)]);
    assert!(!env.table_exists("users").await);
    Ok(())
}

#[tokio::test]
async fn test_resume_after_last_success() -> Result<()> {
    let env = init_test_env().await?;
    for i in 1..=5 {
        // Already applied; running them again would fail.
        env.write_update(&format!("{}-old{}.sql", i, i), "NOT VALID SQL")?;
    }
    for i in 6..=8 {
        env.write_update(
            &format!("{}-new{}.sql", i, i),
            &format!("CREATE TABLE t{} (id INTEGER PRIMARY KEY);", i),
        )?;
    }

    env.history().ensure_table().await?;
    let now = Utc::now();
    let applied: Vec<_> = (1..=5)
        .map(|i| {
            let update = SchemaUpdate::new(format!("old{}", i), i, format!("{}-old{}.sql", i, i));
            UpdateOutcome::started(&update, now).succeeded(now)
        })
        .collect();
    env.history().record_outcomes(&applied).await?;

    let plan = env.services.migration_service.plan(&env.options()).await?;
    assert_eq!(plan.catalog.len(), 8);
    assert_eq!(
        plan.pending.iter().map(|u| u.index).collect::<Vec<_>>(),
        vec![6, 7, 8]
    );

    let report = env.services.migration_service.run(&env.options()).await?;
    assert_eq!(
        results(&report.outcomes),
        vec![
            (6, UpdateResult::Succeeded),
            (7, UpdateResult::Succeeded),
            (8, UpdateResult::Succeeded)
        ]
    );
    assert!(env.table_exists("t8").await);
    Ok(())
}

#[tokio::test]
async fn test_sequence_gap_is_fatal() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-a.sql", "CREATE TABLE a (id INTEGER);")?;
    env.write_update("2-b.sql", "CREATE TABLE b (id INTEGER);")?;
    env.write_update("5-c.sql", "CREATE TABLE c (id INTEGER);")?;

    let res = env.services.migration_service.run(&env.options()).await;

    match res {
        Err(MigrationError::Catalog(CatalogError::SequenceGap { at, next })) => {
            assert_eq!(at, "2-b.sql");
            assert_eq!(next, "5-c.sql");
        }
        other => panic!("expected sequence gap, got {:?}", other),
    }
    assert!(!env.table_exists("a").await);
    assert!(!env.table_exists("schema_update_history").await);
    Ok(())
}

#[tokio::test]
async fn test_malformed_filename_is_fatal() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-a.sql", "CREATE TABLE a (id INTEGER);")?;
    env.write_update("notes.txt", "not an update")?;

    let res = env.services.migration_service.run(&env.options()).await;

    assert!(matches!(
        res,
        Err(MigrationError::Catalog(CatalogError::MalformedFilename { filename })) if filename == "notes.txt"
    ));
    assert!(!env.table_exists("a").await);
    Ok(())
}

#[tokio::test]
async fn test_novalidate_allows_gaps_without_transaction() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-a.sql", "CREATE TABLE a (id INTEGER);")?;
    env.write_update("2-b.sql", "CREATE TABLE b (id INTEGER);")?;
    env.write_update("5-c.sql", "CREATE TABLE c (id INTEGER);")?;

    let options = schema_manager::config::MigrationOptions {
        novalidate: true,
        ..env.options()
    };
    let report = env.services.migration_service.run(&options).await?;

    assert_eq!(report.state, RunState::Committed);
    assert_eq!(
        results(&report.outcomes),
        vec![
            (1, UpdateResult::Succeeded),
            (2, UpdateResult::Succeeded),
            (5, UpdateResult::Succeeded)
        ]
    );
    assert!(env.table_exists("c").await);
    Ok(())
}

#[tokio::test]
async fn test_novalidate_failure_keeps_independent_commits() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-a.sql", "CREATE TABLE a (id INTEGER);")?;
    env.write_update("2-b.sql", "NOT VALID SQL")?;
    env.write_update("5-c.sql", "CREATE TABLE c (id INTEGER);")?;

    let options = schema_manager::config::MigrationOptions {
        novalidate: true,
        ..env.options()
    };
    let report = env.services.migration_service.run(&options).await?;

    assert_eq!(report.state, RunState::Committed);
    assert_eq!(
        results(&report.outcomes),
        vec![
            (1, UpdateResult::Succeeded),
            (2, UpdateResult::Failed),
            (5, UpdateResult::Succeeded)
        ]
    );
    assert!(report.has_failures());
    assert_eq!(exit_status(&report), EXIT_ROLLED_BACK);
    assert!(env.table_exists("a").await);
    assert!(env.table_exists("c").await);
    Ok(())
}

#[tokio::test]
async fn test_history_ignore_treats_everything_as_pending() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-a.sql", "CREATE TABLE IF NOT EXISTS a (id INTEGER);")?;
    env.write_update("2-b.sql", "CREATE TABLE IF NOT EXISTS b (id INTEGER);")?;
    env.services.migration_service.run(&env.options()).await?;

    let options = schema_manager::config::MigrationOptions {
        history: HistoryMode::Ignore,
        ..env.options()
    };
    let plan = env.services.migration_service.plan(&options).await?;
    assert_eq!(plan.last_successful, None);
    assert_eq!(plan.pending.len(), 2);

    let report = env.services.migration_service.run(&options).await?;
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(env.history_rows().await?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_range_applies_before_resume() -> Result<()> {
    let env = init_test_env().await?;
    for i in 1..=4 {
        env.write_update(
            &format!("{}-t{}.sql", i, i),
            &format!("CREATE TABLE t{} (id INTEGER);", i),
        )?;
    }

    let options = schema_manager::config::MigrationOptions {
        start: Some(2),
        end: Some(3),
        ..env.options()
    };
    let report = env.services.migration_service.run(&options).await?;
    assert_eq!(
        report.outcomes.iter().map(|o| o.index).collect::<Vec<_>>(),
        vec![2, 3]
    );
    assert!(!env.table_exists("t1").await);

    // The resume point is now 3, so an unrestricted run only picks up 4.
    let report = env.services.migration_service.run(&env.options()).await?;
    assert_eq!(
        report.outcomes.iter().map(|o| o.index).collect::<Vec<_>>(),
        vec![4]
    );
    assert!(!env.table_exists("t1").await);
    Ok(())
}

#[tokio::test]
async fn test_invalid_range_is_fatal() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-a.sql", "CREATE TABLE a (id INTEGER);")?;

    let options = schema_manager::config::MigrationOptions {
        start: Some(3),
        end: Some(1),
        ..env.options()
    };
    let res = env.services.migration_service.run(&options).await;
    assert!(matches!(
        res,
        Err(MigrationError::Catalog(CatalogError::InvalidRange { start: 3, end: 1 }))
    ));
    Ok(())
}

#[tokio::test]
async fn test_empty_directory_is_up_to_date() -> Result<()> {
    let env = init_test_env().await?;

    let report = env.services.migration_service.run(&env.options()).await?;

    assert_eq!(report.state, RunState::Committed);
    assert!(report.outcomes.is_empty());
    assert!(env.history_rows().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_history_persistence_failure_is_distinct() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-a.sql", "CREATE TABLE a (id INTEGER);")?;
    env.write_update("2-drop_history.sql", "DROP TABLE schema_update_history;")?;

    let res = env.services.migration_service.run(&env.options()).await;

    let err = res.expect_err("recording into a dropped table must fail");
    assert!(err.is_history_persistence());
    assert!(matches!(
        err,
        MigrationError::HistoryPersistence {
            count: 2,
            state: RunState::Committed,
            ..
        }
    ));
    assert!(err.to_string().contains("out of sync"));
    // The migrations themselves were committed.
    assert!(env.table_exists("a").await);
    Ok(())
}

#[tokio::test]
async fn test_plan_on_fresh_database_writes_nothing() -> Result<()> {
    let env = init_test_env().await?;
    write_scenario(&env, "CREATE TABLE teams (id INTEGER PRIMARY KEY);")?;

    let plan = env.services.migration_service.plan(&env.options()).await?;

    assert_eq!(plan.last_successful, None);
    assert_eq!(
        plan.pending.iter().map(|u| u.index).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert!(!env.history().has_table().await?);
    assert!(!env.table_exists("schema_update_history").await);
    Ok(())
}

#[tokio::test]
async fn test_failed_commit_abandons_every_outcome() -> Result<()> {
    let env = init_test_env().await?;
    env.write_update("1-parent.sql", "CREATE TABLE p (id INTEGER PRIMARY KEY);")?;
    // The deferred foreign key is only checked at COMMIT, which then fails.
    env.write_update(
        "2-child.sql",
        "CREATE TABLE c (pid INTEGER REFERENCES p(id) DEFERRABLE INITIALLY DEFERRED);\
         INSERT INTO c (pid) VALUES (42);",
    )?;

    let report = env.services.migration_service.run(&env.options()).await?;

    assert_eq!(report.state, RunState::RolledBack);
    assert_eq!(exit_status(&report), EXIT_ROLLED_BACK);
    assert_eq!(
        results(&report.outcomes),
        vec![(1, UpdateResult::Abandoned), (2, UpdateResult::Abandoned)]
    );

    let rows = env.history_rows().await?;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.result == UpdateResult::Abandoned));
    assert!(!env.table_exists("p").await);
    Ok(())
}
