use sea_orm::{Database, DatabaseConnection};

use engine::{
    Engine, EngineError, NewAccountTypeCmd, NewCurrencyCmd, NewPaymentMethodCmd, Patch,
    PaymentMethodKind, PaymentMethodPatch, SyncOutcome, SyncUserCmd,
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
    (engine, db)
}

fn currency(code: &str, name: &str, is_default: bool) -> NewCurrencyCmd {
    NewCurrencyCmd {
        code: Some(code.to_string()),
        name: Some(name.to_string()),
        symbol: None,
        is_default: Some(is_default),
    }
}

#[tokio::test]
async fn sync_user_creates_then_updates() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .sync_user(SyncUserCmd::new("uid-1", "first@example.com").display_name("First"))
        .await
        .unwrap();
    let SyncOutcome::Created(user) = created else {
        panic!("expected a new user");
    };
    assert_eq!(user.display_name.as_deref(), Some("First"));
    assert!(!user.email_verified);

    let updated = engine
        .sync_user(SyncUserCmd {
            email_verified: Some(true),
            ..SyncUserCmd::new("uid-1", "second@example.com")
        })
        .await
        .unwrap();
    assert!(matches!(updated, SyncOutcome::Updated(_)));
    let updated = updated.into_user();
    assert_eq!(updated.id, user.id);
    assert_eq!(updated.email, "second@example.com");
    assert!(updated.email_verified);

    assert_eq!(
        engine.user_by_email("second@example.com").await.unwrap().id,
        user.id
    );
    assert_eq!(engine.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sync_user_requires_uid_and_email() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .sync_user(SyncUserCmd {
            firebase_uid: Some("uid-1".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("firebase_uid and email are required".to_string())
    );

    let err = engine.user_by_firebase_uid("missing").await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("User not found".to_string()));
}

#[tokio::test]
async fn currency_default_moves_to_newest_default() {
    let (engine, _db) = engine_with_db().await;
    engine.create_currency(currency("usd", "US Dollar", true)).await.unwrap();
    engine.create_currency(currency("JPY", "Yen", false)).await.unwrap();
    engine.create_currency(currency("EUR", "Euro", true)).await.unwrap();

    let listed = engine.list_currencies().await.unwrap();
    let codes: Vec<&str> = listed.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["EUR", "JPY", "USD"]);
    assert_eq!(listed.iter().filter(|c| c.is_default).count(), 1);

    assert_eq!(engine.currency_by_code("usd").await.unwrap().name, "US Dollar");

    let err = engine
        .create_currency(currency("Usd", "Again", false))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("currency code already exists".to_string())
    );

    let err = engine
        .create_currency(currency("eur", "Euro again", true))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("currency code already exists".to_string())
    );
    let defaults: Vec<String> = engine
        .list_currencies()
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.is_default)
        .map(|c| c.code)
        .collect();
    assert_eq!(defaults, vec!["EUR".to_string()]);
    assert_eq!(engine.currency_by_code("EUR").await.unwrap().name, "Euro");

    let err = engine.currency_by_code("GBP").await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("Currency not found".to_string()));
}

#[tokio::test]
async fn payment_methods_are_owner_scoped() {
    let (engine, _db) = engine_with_db().await;
    engine
        .sync_user(SyncUserCmd::new("uid-1", "one@example.com"))
        .await
        .unwrap();

    let card = engine
        .create_payment_method(NewPaymentMethodCmd {
            firebase_uid: Some("uid-1".to_string()),
            name: Some("Visa".to_string()),
            kind: Some("card".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(card.kind, PaymentMethodKind::Card);

    assert_eq!(engine.list_payment_methods(Some("uid-1")).await.unwrap().len(), 1);
    assert!(engine.list_payment_methods(Some("ghost")).await.unwrap().is_empty());
    assert!(engine.list_payment_methods(None).await.unwrap().is_empty());

    let err = engine
        .create_payment_method(NewPaymentMethodCmd {
            name: Some("Barter".to_string()),
            kind: Some("goats".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn payment_method_update_and_delete() {
    let (engine, _db) = engine_with_db().await;
    let cash = engine
        .create_payment_method(NewPaymentMethodCmd {
            name: Some("Wallet".to_string()),
            kind: Some("cash".to_string()),
            description: Some("pocket money".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let updated = engine
        .update_payment_method(
            cash.id,
            PaymentMethodPatch {
                kind: Patch::Set("digital".to_string()),
                description: Patch::Set(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Wallet");
    assert_eq!(updated.kind, PaymentMethodKind::Digital);
    assert_eq!(updated.description, None);

    engine.delete_payment_method(cash.id).await.unwrap();
    let expected = EngineError::NotFound("Payment method not found".to_string());
    assert_eq!(engine.payment_method(cash.id).await.unwrap_err(), expected);
    assert_eq!(
        engine.delete_payment_method(cash.id).await.unwrap_err(),
        expected
    );
}

#[tokio::test]
async fn account_types_are_listed_by_name() {
    let (engine, _db) = engine_with_db().await;
    for name in ["Savings", "Checking"] {
        engine
            .create_account_type(NewAccountTypeCmd {
                name: Some(name.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let listed = engine.list_account_types().await.unwrap();
    let names: Vec<&str> = listed.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Checking", "Savings"]);
    assert_eq!(
        engine.account_type(listed[0].id).await.unwrap().name,
        "Checking"
    );

    let err = engine
        .create_account_type(NewAccountTypeCmd::default())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Validation("name is required".to_string()));
    let err = engine.account_type(9999).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("Account type not found".to_string()));
}
