//! Transactions API endpoints

use api_types::{
    MessageResponse, OwnerQuery,
    transaction::{
        AmountInput, KindTotalsView, SummaryQuery, SummaryResponse, SummaryView,
        TransactionListQuery, TransactionNew, TransactionResponse, TransactionUpdate,
        TransactionView, TransactionsResponse,
    },
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{
    KindTotals, NewTransactionCmd, Patch, Summary, Transaction, TransactionListFilter,
    TransactionPatch,
};

use crate::{ServerError, parse_id, server::ServerState};

const NOT_FOUND: &str = "Transaction not found";

fn map_transaction(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        user_id: tx.user_id,
        category_id: tx.category_id,
        amount: tx.amount.to_major_f64(),
        kind: tx.kind.as_str().to_string(),
        description: tx.description,
        transaction_date: tx.transaction_date,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
        category_name: tx.category_name,
        category_type: tx.category_kind.map(|k| k.as_str().to_string()),
    }
}

fn map_totals(totals: KindTotals) -> KindTotalsView {
    KindTotalsView {
        total: totals.total.to_major_f64(),
        count: totals.count,
    }
}

fn map_summary(summary: Summary) -> SummaryView {
    SummaryView {
        income: map_totals(summary.income),
        expense: map_totals(summary.expense),
        balance: summary.balance.to_major_f64(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionResponse>), ServerError> {
    let Json(payload) = payload?;
    let cmd = NewTransactionCmd {
        firebase_uid: payload.firebase_uid,
        category_id: payload.category_id,
        amount: payload.amount.map(AmountInput::into_text),
        kind: payload.kind,
        description: payload.description,
        transaction_date: payload.transaction_date,
    };
    let tx = state.engine.create_transaction(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            success: true,
            message: Some("Transaction created successfully".to_string()),
            transaction: map_transaction(tx),
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<TransactionListQuery>, QueryRejection>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let Query(query) = query?;
    let filter = TransactionListFilter::from_query(
        query.kind.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        query.category_id,
    )?;

    let transactions: Vec<TransactionView> = state
        .engine
        .list_transactions(query.firebase_uid.as_deref(), &filter)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(TransactionsResponse {
        success: true,
        count: transactions.len(),
        transactions,
    }))
}

pub async fn summary(
    State(state): State<ServerState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let Query(query) = query?;
    let window = TransactionListFilter::from_query(
        None,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        None,
    )?;
    let summary = state
        .engine
        .summary(query.firebase_uid.as_deref(), &window)
        .await?;

    Ok(Json(SummaryResponse {
        success: true,
        summary: map_summary(summary),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<TransactionResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Query(query) = query?;
    let tx = state
        .engine
        .transaction(id, query.firebase_uid.as_deref())
        .await?;

    Ok(Json(TransactionResponse {
        success: true,
        message: None,
        transaction: map_transaction(tx),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<TransactionResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(payload) = payload?;
    let patch = TransactionPatch {
        category_id: Patch::from(payload.category_id),
        amount: Patch::from(payload.amount.map(AmountInput::into_text)),
        kind: Patch::from(payload.kind),
        description: Patch::from(payload.description),
        transaction_date: Patch::from(payload.transaction_date),
    };
    let tx = state
        .engine
        .update_transaction(id, payload.firebase_uid.as_deref(), patch)
        .await?;

    Ok(Json(TransactionResponse {
        success: true,
        message: Some("Transaction updated successfully".to_string()),
        transaction: map_transaction(tx),
    }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Query(query) = query?;
    state
        .engine
        .delete_transaction(id, query.firebase_uid.as_deref())
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Transaction deleted successfully".to_string(),
    }))
}
