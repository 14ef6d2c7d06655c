//! Online transaction listing, detail and spreadsheet import.

#![allow(clippy::unwrap_used)]

use std::io::Write;

use backoffice_admin::api::{ApiError, SpreadsheetUpload, XLSX_MIME};
use backoffice_core::{
    CreateOnlineTransactionRequest, OnlineTransactionsQuery, SaleChannel, TransactionFilters,
    TransactionId, TransactionProductInput, UpdateOnlineTransactionRequest,
};
use backoffice_integration_tests::{BEARER, logged_in, page_json, token, transaction_json};
use httpmock::prelude::*;
use serde_json::json;

const UPLOAD_PATH: &str = "/api/v1/online-transactions/auto-input-excel";

#[tokio::test]
async fn test_list_sends_filters() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/online-transactions")
                .header("authorization", BEARER)
                .query_param("page_number", "0")
                .query_param("page_size", "10")
                .query_param("type", "TIKTOK")
                .query_param("period_month", "3")
                .query_param("period_year", "2024");
            then.status(200).json_body(json!({
                "data": [transaction_json("t1", "ORD-1")],
                "metadata": {
                    "page_number": 0,
                    "page_size": 10,
                    "total_count": 1,
                    "total_pages": 1
                }
            }));
        })
        .await;

    let state = logged_in(&server);
    let query = OnlineTransactionsQuery::default().with_filters(TransactionFilters {
        channel: Some(SaleChannel::Tiktok),
        order_number: None,
        period_month: Some(3),
        period_year: Some(2024),
    });

    let page = state
        .queries()
        .online_transactions(&query, Some(&token()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.metadata.total_count, Some(1));
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_detail_with_products() {
    let server = MockServer::start_async().await;
    let mut tx = transaction_json("t1", "ORD-1");
    tx["products"] = json!([
        {
            "id": "tp1",
            "product_id": "p1",
            "product_name": "Gelas A",
            "quantity": 2,
            "cost_price": 1000,
            "sale_price": 1500,
            "fee_amount": 100
        },
        {
            "id": "tp2",
            "product_id": "p2",
            "product_name": "Gelas B",
            "quantity": 3,
            "cost_price": 2000,
            "sale_price": 2500,
            "fee_amount": 200
        }
    ]);
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/api/v1/online-transactions/t1");
            then.status(200).json_body(json!({ "data": tx }));
        })
        .await;

    let state = logged_in(&server);
    let tx = state
        .queries()
        .online_transaction(&TransactionId::new("t1"), Some(&token()))
        .await
        .unwrap();

    assert_eq!(tx.channel, SaleChannel::Shopee);
    assert_eq!(tx.total_quantity(), 5);
}

#[tokio::test]
async fn test_create_and_update_with_explicit_amounts() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/online-transactions")
                .header("authorization", BEARER)
                .json_body(json!({
                    "type": "LAZADA",
                    "order_number": "ORD-2",
                    "period_month": 4,
                    "period_year": 2024,
                    "products": [{
                        "product_id": "p1",
                        "quantity": 1,
                        "base_amount": 1000,
                        "sale_amount": 1500,
                        "fee_amount": 100
                    }]
                }));
            then.status(201).json_body(json!({ "id": "t2" }));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/v1/online-transactions/t2")
                .json_body(json!({ "order_number": "ORD-2B" }));
            then.status(200).body("");
        })
        .await;

    let state = logged_in(&server);
    let request = CreateOnlineTransactionRequest {
        channel: SaleChannel::Lazada,
        order_number: "ORD-2".to_string(),
        period_month: 4,
        period_year: 2024,
        products: vec![TransactionProductInput {
            id: None,
            product_id: "p1".into(),
            quantity: 1,
            base_amount: 1_000.into(),
            sale_amount: 1_500.into(),
            fee_amount: 100.into(),
        }],
    };
    let created = state
        .queries()
        .create_online_transaction(&request, Some(&token()))
        .await
        .unwrap();
    assert_eq!(created, json!({ "id": "t2" }));

    let patch = UpdateOnlineTransactionRequest {
        order_number: Some("ORD-2B".to_string()),
        ..UpdateOnlineTransactionRequest::default()
    };
    let updated = state
        .queries()
        .update_online_transaction(&TransactionId::new("t2"), &patch, Some(&token()))
        .await
        .unwrap();
    assert!(updated.is_null());

    create.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn test_upload_sends_multipart_file() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(UPLOAD_PATH)
                .header("authorization", BEARER)
                .header_exists("content-type")
                .body_contains("name=\"file\"")
                .body_contains("filename=\"orders.xlsx\"")
                .body_contains(XLSX_MIME);
            then.status(200).json_body(json!({ "created": 3 }));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.xlsx");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"PK fake workbook")
        .unwrap();

    let state = logged_in(&server);
    let upload = SpreadsheetUpload::from_path(&path).await.unwrap();
    let body = state
        .queries()
        .upload_spreadsheet(upload, Some(&token()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(body, json!({ "created": 3 }));
}

#[tokio::test]
async fn test_non_spreadsheet_is_rejected_before_any_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path(UPLOAD_PATH);
            then.status(200);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.csv");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let err = SpreadsheetUpload::from_path(&path).await.unwrap_err();
    assert!(matches!(err, ApiError::UnsupportedFileType(_)));
    assert_eq!(err.to_string(), "Please upload an Excel file (.xlsx or .xls)");

    let err = SpreadsheetUpload::from_bytes("orders.pdf", "application/pdf", vec![1]).unwrap_err();
    assert!(matches!(err, ApiError::UnsupportedFileType(_)));

    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_upload_error_field_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(UPLOAD_PATH);
            then.status(400).json_body(json!({ "error": "Sheet 'Orders' not found" }));
        })
        .await;

    let state = logged_in(&server);
    let upload = SpreadsheetUpload::from_bytes("orders.xlsx", XLSX_MIME, vec![1, 2, 3]).unwrap();
    let err = state
        .queries()
        .upload_spreadsheet(upload, Some(&token()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Sheet 'Orders' not found");
}

#[tokio::test]
async fn test_upload_failure_without_body_uses_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(UPLOAD_PATH);
            then.status(502);
        })
        .await;

    let state = logged_in(&server);
    let upload = SpreadsheetUpload::from_bytes("orders.xls", "application/vnd.ms-excel", vec![1])
        .unwrap();
    let err = state
        .queries()
        .upload_spreadsheet(upload, Some(&token()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to upload file");
}

#[tokio::test]
async fn test_full_page_offers_next() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/online-transactions");
            then.status(200).json_body(page_json(
                (0..10).map(|i| transaction_json(&format!("t{i}"), "ORD")).collect(),
                0,
                10,
            ));
        })
        .await;

    let state = logged_in(&server);
    let page = state
        .queries()
        .online_transactions(&OnlineTransactionsQuery::default(), Some(&token()))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 10);
    assert!(page.has_next());
    assert!(!page.metadata.has_previous());
}

#[tokio::test]
async fn test_filter_without_matches_returns_empty_page() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/online-transactions")
                .query_param("order_number", "NOPE");
            then.status(200).json_body(json!({
                "data": null,
                "metadata": {
                    "page_number": 0,
                    "page_size": 10,
                    "total_count": 0,
                    "total_pages": 0
                }
            }));
        })
        .await;

    let state = logged_in(&server);
    let query = OnlineTransactionsQuery::default().with_filters(TransactionFilters {
        order_number: Some("NOPE".to_string()),
        ..TransactionFilters::default()
    });
    let page = state
        .queries()
        .online_transactions(&query, Some(&token()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(page.data.is_empty());
    assert!(!page.has_next());
}
