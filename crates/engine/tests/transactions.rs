use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, Money, NewCategoryCmd, NewTransactionCmd, Patch, SyncUserCmd,
    TransactionKind, TransactionListFilter, TransactionPatch,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    for (uid, email) in [("alice-uid", "alice@example.com"), ("bob-uid", "bob@example.com")] {
        engine
            .sync_user(SyncUserCmd::new(uid, email))
            .await
            .unwrap();
    }
    (engine, db)
}

async fn category(engine: &Engine, owner: Option<&str>, name: &str, kind: &str) -> i32 {
    let mut cmd = NewCategoryCmd::new(name, kind);
    if let Some(owner) = owner {
        cmd = cmd.owner(owner);
    }
    engine.create_category(cmd).await.unwrap().id
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn validation(message: &str) -> EngineError {
    EngineError::Validation(message.to_string())
}

fn not_found(message: &str) -> EngineError {
    EngineError::NotFound(message.to_string())
}

#[tokio::test]
async fn create_then_get_returns_stored_fields_with_category() {
    let (engine, _db) = engine_with_db().await;
    let groceries = category(&engine, Some("alice-uid"), "Groceries", "expense").await;

    let created = engine
        .create_transaction(
            NewTransactionCmd::new("alice-uid", "50.00", "expense", "2024-03-01")
                .category_id(groceries)
                .description("weekly shop"),
        )
        .await
        .unwrap();

    assert_eq!(created.amount, Money::new(5000));
    assert_eq!(created.kind, TransactionKind::Expense);
    assert_eq!(created.category_name.as_deref(), Some("Groceries"));
    assert_eq!(created.category_kind, Some(TransactionKind::Expense));

    let fetched = engine
        .transaction(created.id, Some("alice-uid"))
        .await
        .unwrap();
    assert_eq!(fetched.amount, created.amount);
    assert_eq!(fetched.kind, created.kind);
    assert_eq!(fetched.description.as_deref(), Some("weekly shop"));
    assert_eq!(fetched.transaction_date, date(2024, 3, 1));
    assert_eq!(fetched.category_id, Some(groceries));
}

#[tokio::test]
async fn create_validates_in_order_and_persists_nothing() {
    let (engine, _db) = engine_with_db().await;

    let missing = NewTransactionCmd {
        firebase_uid: Some("alice-uid".to_string()),
        amount: Some("10".to_string()),
        kind: Some("income".to_string()),
        ..Default::default()
    };
    let cases = [
        (
            missing,
            validation("amount, type, and transaction_date are required"),
        ),
        (
            NewTransactionCmd::new("alice-uid", "-5", "transfer", "2024-03-01"),
            validation("type must be either \"income\" or \"expense\""),
        ),
        (
            NewTransactionCmd::new("alice-uid", "-5", "expense", "2024-03-01"),
            validation("amount must be greater than 0"),
        ),
        (
            NewTransactionCmd::new("alice-uid", "0", "expense", "2024-03-01"),
            validation("amount must be greater than 0"),
        ),
        (
            NewTransactionCmd::new("alice-uid", "12.345", "expense", "bad-date"),
            validation("amount must have at most 2 decimal places"),
        ),
        (
            NewTransactionCmd::new("alice-uid", "12.34", "expense", "2024-13-01"),
            validation("transaction_date must be a valid date (YYYY-MM-DD)"),
        ),
        (
            NewTransactionCmd::new("nobody", "12.34", "expense", "2024-03-01"),
            not_found("User not found"),
        ),
        (
            NewTransactionCmd::new("alice-uid", "12.34", "expense", "2024-03-01").category_id(999),
            not_found("Category not found"),
        ),
    ];

    for (cmd, expected) in cases {
        assert_eq!(engine.create_transaction(cmd).await.unwrap_err(), expected);
    }

    let listed = engine
        .list_transactions(Some("alice-uid"), &TransactionListFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn create_accepts_global_category_but_not_foreign_one() {
    let (engine, _db) = engine_with_db().await;
    let global = category(&engine, None, "Salary", "income").await;
    let bobs = category(&engine, Some("bob-uid"), "Hobbies", "expense").await;

    let tx = engine
        .create_transaction(
            NewTransactionCmd::new("alice-uid", "1000", "income", "2024-03-01").category_id(global),
        )
        .await
        .unwrap();
    assert_eq!(tx.category_name.as_deref(), Some("Salary"));

    let err = engine
        .create_transaction(
            NewTransactionCmd::new("alice-uid", "5", "expense", "2024-03-01").category_id(bobs),
        )
        .await
        .unwrap_err();
    assert_eq!(err, not_found("Category not found"));
}

#[tokio::test]
async fn list_orders_newest_date_first_and_applies_filters() {
    let (engine, _db) = engine_with_db().await;
    let food = category(&engine, Some("alice-uid"), "Food", "expense").await;

    let a = engine
        .create_transaction(
            NewTransactionCmd::new("alice-uid", "10", "expense", "2024-03-01").category_id(food),
        )
        .await
        .unwrap();
    let b = engine
        .create_transaction(NewTransactionCmd::new("alice-uid", "20", "income", "2024-03-02"))
        .await
        .unwrap();
    let c = engine
        .create_transaction(NewTransactionCmd::new("alice-uid", "30", "expense", "2024-03-01"))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::new("bob-uid", "99", "expense", "2024-03-01"))
        .await
        .unwrap();

    let all = engine
        .list_transactions(Some("alice-uid"), &TransactionListFilter::default())
        .await
        .unwrap();
    let ids: Vec<i32> = all.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![b.id, c.id, a.id]);

    let again = engine
        .list_transactions(Some("alice-uid"), &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(again, all);

    let expenses = TransactionListFilter::from_query(Some("expense"), None, None, None).unwrap();
    let listed = engine
        .list_transactions(Some("alice-uid"), &expenses)
        .await
        .unwrap();
    assert_eq!(listed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![c.id, a.id]);

    let ignored_kind =
        TransactionListFilter::from_query(Some("transfer"), None, None, None).unwrap();
    let listed = engine
        .list_transactions(Some("alice-uid"), &ignored_kind)
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);

    let inclusive_day =
        TransactionListFilter::from_query(None, Some("2024-03-02"), Some("2024-03-02"), None)
            .unwrap();
    let listed = engine
        .list_transactions(Some("alice-uid"), &inclusive_day)
        .await
        .unwrap();
    assert_eq!(listed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b.id]);

    let by_category = TransactionListFilter::from_query(None, None, None, Some(food)).unwrap();
    let listed = engine
        .list_transactions(Some("alice-uid"), &by_category)
        .await
        .unwrap();
    assert_eq!(listed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![a.id]);

    let err = engine
        .list_transactions(Some("nobody"), &TransactionListFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err, not_found("User not found"));
}

#[tokio::test]
async fn other_users_cannot_get_update_or_delete() {
    let (engine, _db) = engine_with_db().await;
    let tx = engine
        .create_transaction(NewTransactionCmd::new("alice-uid", "10", "expense", "2024-03-01"))
        .await
        .unwrap();
    let expected = not_found("Transaction not found");

    assert_eq!(
        engine.transaction(tx.id, Some("bob-uid")).await.unwrap_err(),
        expected
    );
    assert_eq!(engine.transaction(tx.id, None).await.unwrap_err(), expected);

    let patch = TransactionPatch {
        amount: Patch::Set("1".to_string()),
        ..Default::default()
    };
    assert_eq!(
        engine
            .update_transaction(tx.id, Some("bob-uid"), patch)
            .await
            .unwrap_err(),
        expected
    );
    assert_eq!(
        engine
            .delete_transaction(tx.id, Some("bob-uid"))
            .await
            .unwrap_err(),
        expected
    );

    let still_there = engine.transaction(tx.id, Some("alice-uid")).await.unwrap();
    assert_eq!(still_there.amount, Money::new(1000));
}

#[tokio::test]
async fn update_merges_patch_and_distinguishes_clear_from_keep() {
    let (engine, _db) = engine_with_db().await;
    let food = category(&engine, Some("alice-uid"), "Food", "expense").await;
    let tx = engine
        .create_transaction(
            NewTransactionCmd::new("alice-uid", "10", "expense", "2024-03-01")
                .category_id(food)
                .description("lunch"),
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            tx.id,
            Some("alice-uid"),
            TransactionPatch {
                amount: Patch::Set("12.50".to_string()),
                transaction_date: Patch::Set("2024-03-05".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, Money::new(1250));
    assert_eq!(updated.transaction_date, date(2024, 3, 5));
    assert_eq!(updated.category_id, Some(food));
    assert_eq!(updated.description.as_deref(), Some("lunch"));
    assert_eq!(updated.kind, TransactionKind::Expense);

    let cleared = engine
        .update_transaction(
            tx.id,
            Some("alice-uid"),
            TransactionPatch {
                category_id: Patch::Set(None),
                description: Patch::Set(None),
                kind: Patch::Set(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.category_id, None);
    assert_eq!(cleared.category_name, None);
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.kind, TransactionKind::Expense);
    assert_eq!(cleared.amount, Money::new(1250));
}

#[tokio::test]
async fn update_stores_explicit_empty_description() {
    let (engine, _db) = engine_with_db().await;
    let tx = engine
        .create_transaction(
            NewTransactionCmd::new("alice-uid", "10", "expense", "2024-03-01").description("  "),
        )
        .await
        .unwrap();
    assert_eq!(tx.description, None);

    let updated = engine
        .update_transaction(
            tx.id,
            Some("alice-uid"),
            TransactionPatch {
                description: Patch::Set(Some(String::new())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some(""));
}

#[tokio::test]
async fn update_rejects_invalid_amount_and_type() {
    let (engine, _db) = engine_with_db().await;
    let tx = engine
        .create_transaction(NewTransactionCmd::new("alice-uid", "10", "expense", "2024-03-01"))
        .await
        .unwrap();

    let err = engine
        .update_transaction(
            tx.id,
            Some("alice-uid"),
            TransactionPatch {
                amount: Patch::Set("0".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, validation("amount must be greater than 0"));

    let err = engine
        .update_transaction(
            tx.id,
            Some("alice-uid"),
            TransactionPatch {
                kind: Patch::Set("refund".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, validation("type must be either \"income\" or \"expense\""));

    let unchanged = engine.transaction(tx.id, Some("alice-uid")).await.unwrap();
    assert_eq!(unchanged.amount, Money::new(1000));
    assert_eq!(unchanged.kind, TransactionKind::Expense);
}

#[tokio::test]
async fn delete_is_scoped_and_reports_missing_rows() {
    let (engine, _db) = engine_with_db().await;
    let tx = engine
        .create_transaction(NewTransactionCmd::new("alice-uid", "10", "expense", "2024-03-01"))
        .await
        .unwrap();

    engine
        .delete_transaction(tx.id, Some("alice-uid"))
        .await
        .unwrap();
    assert_eq!(
        engine
            .delete_transaction(tx.id, Some("alice-uid"))
            .await
            .unwrap_err(),
        not_found("Transaction not found")
    );
    assert_eq!(
        engine
            .delete_transaction(424242, Some("alice-uid"))
            .await
            .unwrap_err(),
        not_found("Transaction not found")
    );
}

#[tokio::test]
async fn deleting_category_leaves_transactions_uncategorized() {
    let (engine, _db) = engine_with_db().await;
    let food = category(&engine, Some("alice-uid"), "Food", "expense").await;
    let tx = engine
        .create_transaction(
            NewTransactionCmd::new("alice-uid", "10", "expense", "2024-03-01").category_id(food),
        )
        .await
        .unwrap();

    engine.delete_category(food).await.unwrap();

    let fetched = engine.transaction(tx.id, Some("alice-uid")).await.unwrap();
    assert_eq!(fetched.category_id, None);
    assert_eq!(fetched.category_name, None);
    assert_eq!(fetched.category_kind, None);
}

#[tokio::test]
async fn deleting_user_cascades_to_owned_rows() {
    let (engine, db) = engine_with_db().await;
    category(&engine, Some("alice-uid"), "Food", "expense").await;
    engine
        .create_transaction(NewTransactionCmd::new("alice-uid", "10", "expense", "2024-03-01"))
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "DELETE FROM users WHERE firebase_uid = ?",
        vec!["alice-uid".into()],
    ))
    .await
    .unwrap();

    let remaining = db
        .query_one(Statement::from_string(
            backend,
            "SELECT (SELECT COUNT(*) FROM transactions) + (SELECT COUNT(*) FROM categories) AS n",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(remaining.try_get::<i64>("", "n").unwrap(), 0);
}

#[tokio::test]
async fn summary_groups_by_transaction_type_within_window() {
    let (engine, _db) = engine_with_db().await;
    let salary = category(&engine, None, "Salary", "income").await;

    for (amount, kind, day) in [
        ("1000.00", "income", "2024-03-01"),
        ("50.00", "expense", "2024-03-02"),
        ("25.50", "expense", "2024-03-31"),
        ("70.00", "expense", "2024-04-01"),
    ] {
        engine
            .create_transaction(NewTransactionCmd::new("alice-uid", amount, kind, day))
            .await
            .unwrap();
    }
    // An expense filed under an income category still counts as an expense.
    engine
        .create_transaction(
            NewTransactionCmd::new("alice-uid", "4.50", "expense", "2024-03-15")
                .category_id(salary),
        )
        .await
        .unwrap();

    let march =
        TransactionListFilter::from_query(None, Some("2024-03-01"), Some("2024-03-31"), None)
            .unwrap();
    let summary = engine.summary(Some("alice-uid"), &march).await.unwrap();
    assert_eq!(summary.income.total, Money::new(100_000));
    assert_eq!(summary.income.count, 1);
    assert_eq!(summary.expense.total, Money::new(8_000));
    assert_eq!(summary.expense.count, 3);
    assert_eq!(summary.balance, summary.income.total - summary.expense.total);

    let listed = engine
        .list_transactions(Some("alice-uid"), &march)
        .await
        .unwrap();
    assert_eq!(
        summary.income.count + summary.expense.count,
        listed.len() as u64
    );
}

#[tokio::test]
async fn summary_defaults_missing_groups_and_allows_negative_balance() {
    let (engine, _db) = engine_with_db().await;

    let empty = engine
        .summary(Some("bob-uid"), &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(empty.income.total, Money::ZERO);
    assert_eq!(empty.income.count, 0);
    assert_eq!(empty.expense.count, 0);
    assert_eq!(empty.balance, Money::ZERO);

    engine
        .create_transaction(NewTransactionCmd::new("bob-uid", "40", "expense", "2024-01-01"))
        .await
        .unwrap();
    let summary = engine
        .summary(Some("bob-uid"), &TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(summary.balance, Money::new(-4000));

    let err = engine
        .summary(Some("nobody"), &TransactionListFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err, not_found("User not found"));
}
