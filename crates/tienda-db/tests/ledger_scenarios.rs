//! End-to-end stock ledger behaviour against an in-memory database.

mod common;

use chrono::{Duration, Utc};
use common::{price, Shop};
use tienda_core::{
    EntryLine, ErrorCode, SaleLine, StockAdjustmentMode, TransactionFilter, TransactionStatus,
    TransactionType, MAX_LINE_QUANTITY, MAX_STOCK, MAX_UNIT_PRICE_CENTS,
};

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
async fn test_sale_reduces_stock_and_computes_total() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;

    let sale = shop
        .db
        .ledger()
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 3, price(2000))], Some("  mostrador  "))
        .await
        .unwrap();

    assert_eq!(sale.transaction_type, TransactionType::Sale);
    assert_eq!(sale.status, TransactionStatus::Completed);
    assert_eq!(sale.total_cents, 6000);
    assert_eq!(sale.user_name, "María Vendedora");
    assert_eq!(sale.notes.as_deref(), Some("mostrador"));
    assert_eq!(sale.items.len(), 1);
    assert_eq!(sale.items[0].subtotal_cents, 6000);
    assert_eq!(shop.stock_of(&v1.id).await, 7);
}

#[tokio::test]
async fn test_sale_over_stock_is_rejected_without_side_effects() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 7).await;

    let err = shop
        .db
        .ledger()
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 8, price(2000))], None)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InsufficientStock);
    assert_eq!(shop.stock_of(&v1.id).await, 7);
    assert_eq!(shop.transaction_count().await, 0);
}

#[tokio::test]
async fn test_sale_of_exact_stock_empties_variant() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 4).await;
    let ledger = shop.db.ledger();

    ledger
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 4, price(1500))], None)
        .await
        .unwrap();
    assert_eq!(shop.stock_of(&v1.id).await, 0);

    let err = ledger
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 1, price(1500))], None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientStock);
    assert_eq!(shop.stock_of(&v1.id).await, 0);
}

#[tokio::test]
async fn test_multi_line_sale_is_all_or_nothing() {
    let shop = Shop::open().await;
    let plenty = shop.variant("Blanco", 10).await;
    let scarce = shop.variant("Negro", 1).await;

    let lines = [
        SaleLine::new(&plenty.id, 2, price(4500)),
        SaleLine::new(&scarce.id, 2, price(4500)),
    ];
    let err = shop.db.ledger().create_sale(&shop.vendedora, &lines, None).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InsufficientStock);
    assert_eq!(shop.stock_of(&plenty.id).await, 10);
    assert_eq!(shop.stock_of(&scarce.id).await, 1);
    assert_eq!(shop.transaction_count().await, 0);
    assert_eq!(shop.item_count().await, 0);
}

#[tokio::test]
async fn test_sale_with_unknown_variant_changes_nothing() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;

    let lines = [
        SaleLine::new(&v1.id, 2, price(4500)),
        SaleLine::new("no-such-variant", 1, price(4500)),
    ];
    let err = shop.db.ledger().create_sale(&shop.vendedora, &lines, None).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(shop.stock_of(&v1.id).await, 10);
    assert_eq!(shop.transaction_count().await, 0);
}

#[tokio::test]
async fn test_repeated_lines_are_checked_against_combined_demand() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 5).await;
    let ledger = shop.db.ledger();

    let too_many = [
        SaleLine::new(&v1.id, 3, price(1000)),
        SaleLine::new(&v1.id, 3, price(1000)),
    ];
    let err = ledger.create_sale(&shop.vendedora, &too_many, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientStock);
    assert_eq!(shop.stock_of(&v1.id).await, 5);

    let fits = [
        SaleLine::new(&v1.id, 2, price(1000)),
        SaleLine::new(&v1.id, 3, price(900)),
    ];
    let sale = ledger.create_sale(&shop.vendedora, &fits, None).await.unwrap();
    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.total_cents, 2000 + 2700);
    assert_eq!(shop.stock_of(&v1.id).await, 0);
}

#[tokio::test]
async fn test_invalid_sale_input_is_a_validation_error() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let ledger = shop.db.ledger();

    let cases = [
        vec![],
        vec![SaleLine::new(&v1.id, 0, price(1000))],
        vec![SaleLine::new(&v1.id, -2, price(1000))],
        vec![SaleLine::new(&v1.id, 1, price(0))],
        vec![SaleLine::new("", 1, price(1000))],
    ];
    for lines in cases {
        let err = ledger.create_sale(&shop.vendedora, &lines, None).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError, "lines: {lines:?}");
    }

    let long_notes = "x".repeat(501);
    let err = ledger
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 1, price(1000))], Some(&long_notes))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    assert_eq!(shop.stock_of(&v1.id).await, 10);
    assert_eq!(shop.transaction_count().await, 0);
}

#[tokio::test]
async fn test_sale_quantities_past_i64_are_rejected() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;

    let lines = [
        SaleLine::new(&v1.id, i64::MAX, price(1)),
        SaleLine::new(&v1.id, 1, price(1)),
    ];
    let err = shop.db.ledger().create_sale(&shop.vendedora, &lines, None).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(shop.stock_of(&v1.id).await, 10);
    assert_eq!(shop.transaction_count().await, 0);
}

#[tokio::test]
async fn test_sale_total_past_i64_is_rejected() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let ledger = shop.db.ledger();

    // Every line is in range; 100k subtotals of 10^14 cents are not
    let lines = vec![SaleLine::new(&v1.id, MAX_LINE_QUANTITY, price(MAX_UNIT_PRICE_CENTS)); 100_000];
    let err = ledger.create_sale(&shop.vendedora, &lines, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let oversized = [SaleLine::new(&v1.id, 4_000_000_000_000, price(10_000_000))];
    let err = ledger.create_sale(&shop.vendedora, &oversized, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    assert_eq!(shop.stock_of(&v1.id).await, 10);
    assert_eq!(shop.transaction_count().await, 0);
}

// =============================================================================
// Entries
// =============================================================================

#[tokio::test]
async fn test_entry_adds_stock_with_zero_total() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 7).await;

    let entry = shop
        .db
        .ledger()
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 5, Some(price(1000)))], None)
        .await
        .unwrap();

    assert_eq!(entry.transaction_type, TransactionType::Entry);
    assert_eq!(entry.total_cents, 0);
    assert_eq!(entry.items[0].unit_price_cents, 1000);
    assert_eq!(entry.items[0].subtotal_cents, 0);
    assert_eq!(entry.user_name, "Administrador");
    assert_eq!(shop.stock_of(&v1.id).await, 12);
}

#[tokio::test]
async fn test_entry_without_cost_records_zero_unit_price() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 0).await;

    let entry = shop
        .db
        .ledger()
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 3, None)], None)
        .await
        .unwrap();

    assert_eq!(entry.items[0].unit_price_cents, 0);
    assert_eq!(shop.stock_of(&v1.id).await, 3);
}

#[tokio::test]
async fn test_entry_rejects_bad_lines() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 2).await;
    let ledger = shop.db.ledger();

    let err = ledger
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 1, Some(price(-1)))], None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let err = ledger
        .create_entry(
            &shop.admin,
            &[EntryLine::new(&v1.id, 4, None), EntryLine::new("missing", 1, None)],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    assert_eq!(shop.stock_of(&v1.id).await, 2);
    assert_eq!(shop.transaction_count().await, 0);
}

#[tokio::test]
async fn test_entry_past_stock_ceiling_is_rejected() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", MAX_STOCK - 1).await;
    let ledger = shop.db.ledger();

    let err = ledger
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 4_000_000_000_000, None)], None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let err = ledger
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 2, None)], None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    ledger
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 1, None)], None)
        .await
        .unwrap();
    assert_eq!(shop.stock_of(&v1.id).await, MAX_STOCK);
    assert_eq!(shop.transaction_count().await, 1);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_sale_entry_cancel_sequence() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let ledger = shop.db.ledger();

    let sale = ledger
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 3, price(2000))], None)
        .await
        .unwrap();
    assert_eq!(shop.stock_of(&v1.id).await, 7);

    let err = ledger
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 8, price(2000))], None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientStock);

    ledger
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 5, Some(price(1000)))], None)
        .await
        .unwrap();
    assert_eq!(shop.stock_of(&v1.id).await, 12);

    let cancelled = ledger.cancel(&sale.id).await.unwrap();
    assert_eq!(cancelled.status, TransactionStatus::Cancelled);
    assert_eq!(cancelled.items.len(), 1);
    assert_eq!(shop.stock_of(&v1.id).await, 15);

    let err = ledger.cancel(&sale.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert_eq!(shop.stock_of(&v1.id).await, 15);
}

#[tokio::test]
async fn test_cancelled_sale_keeps_its_record() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let ledger = shop.db.ledger();

    let sale = ledger
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 2, price(2500))], None)
        .await
        .unwrap();
    ledger.cancel(&sale.id).await.unwrap();

    let stored = shop.db.stock().get_transaction(&sale.id).await.unwrap();
    assert_eq!(stored.status, TransactionStatus::Cancelled);
    assert_eq!(stored.total_cents, 5000);
    assert_eq!(stored.items.len(), 1);
    assert_eq!(shop.stock_of(&v1.id).await, 10);
}

#[tokio::test]
async fn test_entry_cancel_round_trip() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 4).await;
    let v2 = shop.variant("Negro", 0).await;
    let ledger = shop.db.ledger();

    let entry = ledger
        .create_entry(
            &shop.admin,
            &[EntryLine::new(&v1.id, 6, None), EntryLine::new(&v2.id, 2, None)],
            None,
        )
        .await
        .unwrap();
    assert_eq!(shop.stock_of(&v1.id).await, 10);

    ledger.cancel(&entry.id).await.unwrap();
    assert_eq!(shop.stock_of(&v1.id).await, 4);
    assert_eq!(shop.stock_of(&v2.id).await, 0);
}

#[tokio::test]
async fn test_entry_cancel_blocked_when_units_were_sold() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 0).await;
    let ledger = shop.db.ledger();

    let entry = ledger
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 5, None)], None)
        .await
        .unwrap();
    ledger
        .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, 4, price(3000))], None)
        .await
        .unwrap();

    let err = ledger.cancel(&entry.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert_eq!(shop.stock_of(&v1.id).await, 1);

    let stored = shop.db.stock().get_transaction(&entry.id).await.unwrap();
    assert_eq!(stored.status, TransactionStatus::Completed);
}

#[tokio::test]
async fn test_blocked_entry_cancel_rolls_back_earlier_variants() {
    let shop = Shop::open().await;
    let a = shop.variant("Blanco", 0).await;
    let b = shop.variant("Negro", 0).await;
    let ledger = shop.db.ledger();

    let entry = ledger
        .create_entry(
            &shop.admin,
            &[EntryLine::new(&a.id, 5, None), EntryLine::new(&b.id, 5, None)],
            None,
        )
        .await
        .unwrap();
    ledger
        .create_sale(&shop.vendedora, &[SaleLine::new(&b.id, 4, price(3000))], None)
        .await
        .unwrap();

    // A is reversed first inside the unit of work, then B misses its guard
    let err = ledger.cancel(&entry.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);

    assert_eq!(shop.stock_of(&a.id).await, 5);
    assert_eq!(shop.stock_of(&b.id).await, 1);
    let stored = shop.db.stock().get_transaction(&entry.id).await.unwrap();
    assert_eq!(stored.status, TransactionStatus::Completed);
}

#[tokio::test]
async fn test_cancel_unknown_transaction() {
    let shop = Shop::open().await;

    let err = shop.db.ledger().cancel("no-such-transaction").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

// =============================================================================
// Adjustments
// =============================================================================

#[tokio::test]
async fn test_adjust_stock_modes() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let ledger = shop.db.ledger();

    let v = ledger
        .adjust_stock(&v1.id, 4, StockAdjustmentMode::Increase, Some("conteo"))
        .await
        .unwrap();
    assert_eq!(v.stock, 14);

    let v = ledger
        .adjust_stock(&v1.id, 3, StockAdjustmentMode::Decrease, None)
        .await
        .unwrap();
    assert_eq!(v.stock, 11);

    let v = ledger
        .adjust_stock(&v1.id, 50, StockAdjustmentMode::Decrease, None)
        .await
        .unwrap();
    assert_eq!(v.stock, 0);

    let v = ledger
        .adjust_stock(&v1.id, 6, StockAdjustmentMode::Set, None)
        .await
        .unwrap();
    assert_eq!(v.stock, 6);
    assert_eq!(shop.stock_of(&v1.id).await, 6);

    // Adjustments leave no ledger trail
    assert!(shop.db.stock().stock_history(&v1.id).await.unwrap().is_empty());
    assert_eq!(shop.transaction_count().await, 0);
}

#[tokio::test]
async fn test_adjust_stock_rejections() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let ledger = shop.db.ledger();

    let err = ledger
        .adjust_stock(&v1.id, -1, StockAdjustmentMode::Set, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let err = ledger
        .adjust_stock("missing", 1, StockAdjustmentMode::Increase, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    assert_eq!(shop.stock_of(&v1.id).await, 10);
}

#[tokio::test]
async fn test_adjust_stock_respects_ceiling() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let ledger = shop.db.ledger();

    let err = ledger
        .adjust_stock(&v1.id, MAX_STOCK, StockAdjustmentMode::Increase, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let err = ledger
        .adjust_stock(&v1.id, i64::MAX, StockAdjustmentMode::Set, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(shop.stock_of(&v1.id).await, 10);

    let v = ledger
        .adjust_stock(&v1.id, MAX_STOCK, StockAdjustmentMode::Set, None)
        .await
        .unwrap();
    assert_eq!(v.stock, MAX_STOCK);
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn test_stock_level_of_unknown_variant() {
    let shop = Shop::open().await;

    let err = shop.db.stock().stock_level("missing").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn test_low_stock_lists_active_variants_emptiest_first() {
    let shop = Shop::open().await;
    let empty = shop.variant("Blanco", 0).await;
    let few = shop.variant("Negro", 3).await;
    let at_threshold = shop.variant("Azul", 5).await;
    let _plenty = shop.variant("Rojo", 20).await;
    let retired = shop.variant("Verde", 1).await;
    shop.db.variants().set_active(&retired.id, false).await.unwrap();

    let stock = shop.db.stock();

    let low = stock.low_stock(None).await.unwrap();
    let ids: Vec<&str> = low.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec![empty.id.as_str(), few.id.as_str(), at_threshold.id.as_str()]);

    let low = stock.low_stock(Some(0)).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, empty.id);

    let low = stock.with_low_stock_threshold(3).low_stock(None).await.unwrap();
    assert_eq!(low.len(), 2);

    let err = shop.db.stock().low_stock(Some(-1)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_stock_history_newest_first() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let other = shop.variant("Negro", 10).await;
    let ledger = shop.db.ledger();

    let sale = ledger
        .create_sale(
            &shop.vendedora,
            &[SaleLine::new(&v1.id, 2, price(4500)), SaleLine::new(&other.id, 1, price(4500))],
            None,
        )
        .await
        .unwrap();
    let entry = ledger
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 6, None)], None)
        .await
        .unwrap();
    ledger.cancel(&sale.id).await.unwrap();

    let history = shop.db.stock().stock_history(&v1.id).await.unwrap();
    assert_eq!(history.len(), 2);

    assert_eq!(history[0].transaction_id, entry.id);
    assert_eq!(history[0].transaction_type, TransactionType::Entry);
    assert_eq!(history[0].user_name, "Administrador");
    assert_eq!(history[0].stock_delta(), 6);

    assert_eq!(history[1].transaction_id, sale.id);
    assert_eq!(history[1].status, TransactionStatus::Cancelled);
    assert_eq!(history[1].user_name, "María Vendedora");
    assert_eq!(history[1].quantity, 2);
    assert_eq!(history[1].stock_delta(), -2);

    assert!(shop.db.stock().stock_history("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_transactions_filters_and_pages() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 50).await;
    let ledger = shop.db.ledger();

    let mut sales = Vec::new();
    for quantity in 1..=3 {
        let sale = ledger
            .create_sale(&shop.vendedora, &[SaleLine::new(&v1.id, quantity, price(1000))], None)
            .await
            .unwrap();
        sales.push(sale);
    }
    ledger
        .create_entry(&shop.admin, &[EntryLine::new(&v1.id, 10, None)], None)
        .await
        .unwrap();
    ledger.cancel(&sales[0].id).await.unwrap();

    let stock = shop.db.stock();

    let all = stock.list_transactions(&TransactionFilter::default()).await.unwrap();
    assert_eq!(all.meta.total, 4);
    assert_eq!(all.meta.page, 1);
    assert_eq!(all.meta.limit, 10);
    assert_eq!(all.meta.total_pages, 1);
    assert_eq!(all.data[0].transaction_type, TransactionType::Entry);
    assert!(all.data.iter().all(|t| !t.items.is_empty()));

    let only_sales = stock
        .list_transactions(&TransactionFilter {
            transaction_type: Some(TransactionType::Sale),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(only_sales.meta.total, 3);
    assert!(only_sales.data.iter().all(|t| t.transaction_type == TransactionType::Sale));

    let cancelled = stock
        .list_transactions(&TransactionFilter {
            status: Some(TransactionStatus::Cancelled),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(cancelled.meta.total, 1);
    assert_eq!(cancelled.data[0].id, sales[0].id);

    let second_page = stock
        .list_transactions(&TransactionFilter {
            page: Some(2),
            limit: Some(3),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(second_page.meta.total, 4);
    assert_eq!(second_page.meta.total_pages, 2);
    assert_eq!(second_page.data.len(), 1);
    assert_eq!(second_page.data[0].id, sales[0].id);

    let now = Utc::now();
    let future = stock
        .list_transactions(&TransactionFilter {
            from: Some(now + Duration::hours(1)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(future.meta.total, 0);
    assert!(future.data.is_empty());

    let window = stock
        .list_transactions(&TransactionFilter {
            from: Some(now - Duration::hours(1)),
            to: Some(now + Duration::hours(1)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(window.meta.total, 4);
}

#[tokio::test]
async fn test_list_transactions_rejects_bad_paging() {
    let shop = Shop::open().await;
    let stock = shop.db.stock();

    for filter in [
        TransactionFilter { page: Some(0), ..Default::default() },
        TransactionFilter { limit: Some(0), ..Default::default() },
        TransactionFilter { limit: Some(101), ..Default::default() },
        TransactionFilter {
            from: Some(Utc::now()),
            to: Some(Utc::now() - Duration::days(1)),
            ..Default::default()
        },
    ] {
        let err = stock.list_transactions(&filter).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError, "filter: {filter:?}");
    }
}

#[tokio::test]
async fn test_get_transaction_with_items() {
    let shop = Shop::open().await;
    let v1 = shop.variant("Blanco", 10).await;
    let v2 = shop.variant("Negro", 10).await;

    let sale = shop
        .db
        .ledger()
        .create_sale(
            &shop.vendedora,
            &[SaleLine::new(&v1.id, 1, price(4500)), SaleLine::new(&v2.id, 2, price(4000))],
            None,
        )
        .await
        .unwrap();

    let stored = shop.db.stock().get_transaction(&sale.id).await.unwrap();
    assert_eq!(stored.id, sale.id);
    assert_eq!(stored.total_cents, 12500);
    assert_eq!(stored.items.len(), 2);
    assert_eq!(stored.items[0].variant_id, v1.id);
    assert_eq!(stored.items[1].subtotal_cents, 8000);

    let err = shop.db.stock().get_transaction("missing").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}
