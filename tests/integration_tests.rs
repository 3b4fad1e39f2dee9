use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use stock_opname::*;

fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 2)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn item(id: &str, nama: &str, stok_a: i64, stok_b: i64, harga: f64) -> Item {
    Item {
        id: id.to_string(),
        nama: nama.to_string(),
        kategori: "Elektronik".to_string(),
        satuan: "pcs".to_string(),
        stok_a,
        stok_b,
        harga,
    }
}

fn tx(id: &str, jenis: TransactionKind, jumlah: i64, tanggal: impl Into<RawDate>) -> Transaction {
    Transaction {
        id_barang: id.to_string(),
        nama_barang: String::new(),
        jenis,
        jumlah,
        tanggal: tanggal.into(),
        row_index: None,
        keterangan: String::new(),
        petugas: String::new(),
    }
}

fn processor() -> StockOpnameProcessor {
    StockOpnameProcessor::new(ReportConfig::default()).unwrap()
}

#[test]
fn test_january_report_scenario() {
    let source = InMemorySource::new(vec![item("ELK-0001", "Kabel NYM", 20, 0, 0.0)])
        .with_transactions(
            Warehouse::A,
            vec![
                tx("ELK-0001", TransactionKind::In, 5, "10/01/2026 09:00:00"),
                tx("ELK-0001", TransactionKind::Out, 3, "30/01/2026 13:00:00"),
            ],
        );

    let doc = processor()
        .generate_at(&source, 2026, 1, Warehouse::A, generated_at())
        .unwrap();

    assert_eq!(doc.window.start, dt(2025, 12, 26, 0, 0, 0));
    assert_eq!(doc.window.end, dt(2026, 1, 25, 23, 59, 59));

    let row = &doc.rows[0];
    assert_eq!(row.stok_akhir, 23);
    assert_eq!(row.masuk, 5);
    assert_eq!(row.keluar, 0);
    assert_eq!(row.saldo_awal, 18);
}

#[test]
fn test_identity_holds_for_every_row_of_a_busy_ledger() {
    let items = vec![
        item("ELK-0001", "Kabel NYM", 40, 12, 250_000.0),
        item("ELK-0002", "Lampu LED", 0, 3, 35_000.0),
        item("ATK-0001", "Kertas A4", 7, 0, 48_000.0),
        item("ATK-0002", "Map Plastik", 0, 0, 2_000.0),
        item("BNG-0001", "Semen", 100, 80, 65_000.0),
    ];

    let ledger = vec![
        tx("ELK-0001", TransactionKind::In, 10, "26/12/2025 00:00:00"),
        tx("ELK-0001", TransactionKind::Out, 4, "2026-01-03T02:00:00.000Z"),
        tx("ELK-0001", TransactionKind::Out, 6, 46048.25),
        tx("ELK-0002", TransactionKind::Out, 5, "25/01/2026 23:59:59"),
        tx("ELK-0002", TransactionKind::In, 5, "20/12/2025 08:00"),
        tx("ATK-0001", TransactionKind::In, 2, "Keliru"),
        tx("BNG-0001", TransactionKind::Out, 25, "15/01/2026 07:30"),
        tx("BNG-0001", TransactionKind::In, 50, "01/02/2026 07:30"),
        tx("HILANG-01", TransactionKind::Out, 99, "15/01/2026 07:30"),
    ];

    let source = InMemorySource::new(items).with_transactions(Warehouse::A, ledger);
    let doc = processor()
        .generate_at(&source, 2026, 1, Warehouse::A, generated_at())
        .unwrap();

    for row in &doc.rows {
        assert_eq!(
            row.saldo_awal + row.masuk - row.keluar,
            row.stok_akhir,
            "identity broken for {}",
            row.id
        );
    }

    let ids: Vec<&str> = doc.rows.iter().map(|r| r.id.as_str()).collect();
    assert!(!ids.contains(&"ATK-0002"));
    assert!(!ids.contains(&"HILANG-01"));

    let elk = doc.rows.iter().find(|r| r.id == "ELK-0001").unwrap();
    // 46048.25 is 26/01/2026 06:00, just after the cut-off.
    assert_eq!(elk.stok_akhir, 46);
    assert_eq!(elk.masuk, 10);
    assert_eq!(elk.keluar, 4);
    assert_eq!(elk.saldo_awal, 40);

    let lampu = doc.rows.iter().find(|r| r.id == "ELK-0002").unwrap();
    assert_eq!(lampu.stok_akhir, 0);
    assert_eq!(lampu.keluar, 5);
    assert_eq!(lampu.saldo_awal, 5);

    let semen = doc.rows.iter().find(|r| r.id == "BNG-0001").unwrap();
    assert_eq!(semen.stok_akhir, 50);
    assert_eq!(semen.saldo_awal, 75);

    let kertas = doc.rows.iter().find(|r| r.id == "ATK-0001").unwrap();
    assert_eq!(kertas.masuk, 0);
    assert_eq!(kertas.stok_akhir, 7);

    let expected_total: i64 = doc.rows.iter().map(|r| r.stok_akhir).sum();
    assert_eq!(doc.totals.stok_akhir, expected_total);
}

#[test]
fn test_warehouses_are_reconciled_independently() {
    let items = vec![item("ELK-0001", "Kabel NYM", 10, 4, 0.0)];
    let source = InMemorySource::new(items)
        .with_transactions(
            Warehouse::A,
            vec![tx("ELK-0001", TransactionKind::Out, 2, "01/02/2026")],
        )
        .with_transactions(
            Warehouse::B,
            vec![tx("ELK-0001", TransactionKind::In, 4, "01/02/2026")],
        );

    let a = processor()
        .generate_at(&source, 2026, 1, Warehouse::A, generated_at())
        .unwrap();
    let b = processor()
        .generate_at(&source, 2026, 1, Warehouse::B, generated_at())
        .unwrap();

    assert_eq!(a.rows[0].stok_akhir, 12);
    assert!(b.rows.is_empty());
}

#[test]
fn test_report_from_api_payloads_and_csv_export() {
    let items_body = json!({
        "success": true,
        "data": [
            {"id": "ELK-0001", "nama": "Kabel NYM", "kategori": "Elektronik", "satuan": "roll", "stokA": "20", "stokB": 0, "harga": 250000},
            {"id": "ELK-0002", "nama": "Lampu LED", "kategori": "Elektronik", "satuan": "pcs", "stokA": null, "stokB": 3}
        ]
    })
    .to_string();
    let ledger_body = json!({
        "success": true,
        "data": [
            {"idBarang": "ELK-0001", "namaBarang": "Kabel NYM", "jenis": "Masuk", "jumlah": "5", "tanggal": "10/01/2026 10:00:00", "rowIndex": 2},
            {"idBarang": "ELK-0001", "namaBarang": "Kabel NYM", "jenis": "Keluar", "jumlah": 3, "tanggal": "30/01/2026 10:00:00", "rowIndex": 3},
            {"idBarang": "ELK-0001", "jenis": "Pinjam", "jumlah": 1, "tanggal": "12/01/2026"}
        ]
    })
    .to_string();

    let source = JsonPayloadSource::new(items_body).with_transactions(Warehouse::A, ledger_body);
    let doc = processor()
        .generate_at(&source, 2026, 1, Warehouse::A, generated_at())
        .unwrap();

    assert_eq!(doc.rows.len(), 1);
    assert_eq!(doc.rows[0].saldo_awal, 18);
    assert_eq!(doc.rows[0].stok_akhir, 23);
    assert!((doc.totals.total_nilai - 23.0 * 250_000.0).abs() < 1e-6);

    let csv = export::to_csv_string(&doc, &ReportConfig::default()).unwrap();
    assert!(csv.contains("Periode: 26 Desember 2025 - 25 Januari 2026"));
    assert!(csv.contains("1,ELK-0001,Kabel NYM,Elektronik,roll,250000,18,5,0,23,5750000"));
    assert_eq!(export::file_name(&doc), "SO_GudangKalipucang_Januari2026.csv");

    let json = doc.to_json().unwrap();
    assert!(json.contains("\"saldo_awal\": 18"));
}

#[test]
fn test_api_failure_aborts_report() {
    let source = JsonPayloadSource::new(r#"{"success": false, "error": "Script timeout"}"#);
    let result = processor().generate_at(&source, 2026, 1, Warehouse::A, generated_at());
    assert!(matches!(result, Err(StockOpnameError::Api(ref msg)) if msg == "Script timeout"));
}

#[test]
fn test_empty_master_payload_is_rejected() {
    let source = JsonPayloadSource::new(r#"{"success": true, "data": []}"#);
    let result = processor().generate_at(&source, 2026, 1, Warehouse::A, generated_at());
    assert!(matches!(result, Err(StockOpnameError::EmptyItemMaster)));
}

#[test]
fn test_month_selection_drives_the_window() {
    let (year, month) = parse_month_selection("2025-06").unwrap();
    let window = resolve_window(year, month).unwrap();
    assert_eq!(window.start, dt(2025, 5, 26, 0, 0, 0));
    assert_eq!(window.end, dt(2025, 6, 25, 23, 59, 59));

    assert!(matches!(
        parse_month_selection(""),
        Err(StockOpnameError::InvalidPeriod(_))
    ));
}

#[test]
fn test_date_normalization_contract() {
    for raw in ["", "-", "32/13/2025"] {
        assert!(is_sentinel(normalize_str(raw)));
    }
    assert!(is_sentinel(normalize(&RawDate::Missing)));
    assert!(is_sentinel(normalize(&RawDate::from(&serde_json::Value::Null))));
    assert_eq!(normalize_str("05/01/2026 14:30:00"), dt(2026, 1, 5, 14, 30, 0));
}

#[test]
fn test_custom_time_zone_moves_boundary_transactions() {
    let items = vec![item("ELK-0001", "Kabel NYM", 10, 0, 0.0)];
    // 25/01/2026 20:00 UTC is 26/01/2026 03:00 in WIB.
    let ledger = vec![tx("ELK-0001", TransactionKind::Out, 1, "2026-01-25T20:00:00Z")];
    let source = InMemorySource::new(items).with_transactions(Warehouse::A, ledger);

    let wib = processor()
        .generate_at(&source, 2026, 1, Warehouse::A, generated_at())
        .unwrap();
    assert_eq!(wib.rows[0].keluar, 0);
    assert_eq!(wib.rows[0].stok_akhir, 11);

    let utc = StockOpnameProcessor::new(
        ReportConfig::from_json_str(r#"{"utc_offset_minutes": 0}"#).unwrap(),
    )
    .unwrap()
    .generate_at(&source, 2026, 1, Warehouse::A, generated_at())
    .unwrap();
    assert_eq!(utc.rows[0].keluar, 1);
    assert_eq!(utc.rows[0].stok_akhir, 10);
}

#[test]
fn test_search_and_log_over_the_same_snapshot() {
    let items = vec![
        item("ELK-0001", "Kabel NYM", 0, 0, 0.0),
        item("ELK-0003", "Lampu LED", 4, 0, 0.0),
    ];

    assert!(matches!(
        lookup(&items, "kabel nym"),
        SearchOutcome::Selected(i) if i.id == "ELK-0001"
    ));
    assert_eq!(next_item_id(&items, "ELK").unwrap(), "ELK-0002");

    let ledger = vec![
        tx("ELK-0001", TransactionKind::In, 2, "05/01/2026 08:00"),
        tx("ELK-0003", TransactionKind::Out, 1, "06/01/2026 08:00"),
    ];
    let filter = TransactionFilter::default().with_kind(TransactionKind::In);
    let entries = filter_transactions(&ledger, &filter, &DateNormalizer::default());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].transaction.id_barang, "ELK-0001");
}

#[test]
fn test_oversized_and_empty_quantities_do_not_abort_report() {
    let items_body = json!({
        "success": true,
        "data": [{"id": "ELK-0001", "nama": "Kabel NYM", "stokA": 5, "stokB": 0}]
    })
    .to_string();
    let ledger_body = json!({
        "success": true,
        "data": [
            {"idBarang": "ELK-0001", "jenis": "Masuk", "jumlah": 1e19, "tanggal": "10/01/2026"},
            {"idBarang": "ELK-0001", "jenis": "Masuk", "jumlah": 1e19, "tanggal": "11/01/2026"},
            {"idBarang": "ELK-0001", "jenis": "Keluar", "jumlah": 0, "tanggal": "12/01/2026"},
            {"idBarang": "ELK-0001", "jenis": "Keluar", "jumlah": -4, "tanggal": "12/01/2026"}
        ]
    })
    .to_string();

    let source = JsonPayloadSource::new(items_body).with_transactions(Warehouse::A, ledger_body);
    let doc = processor()
        .generate_at(&source, 2026, 1, Warehouse::A, generated_at())
        .unwrap();

    let row = &doc.rows[0];
    assert_eq!(row.masuk, 2 * ingestion::MAX_QUANTITY);
    assert_eq!(row.keluar, 0);
    assert_eq!(row.stok_akhir, 5);
    assert_eq!(row.saldo_awal + row.masuk - row.keluar, row.stok_akhir);
    assert_eq!(doc.negative_balances, vec!["ELK-0001".to_string()]);
}

#[test]
fn test_negative_reconstruction_is_flagged_on_the_document() {
    let items = vec![
        item("ELK-0001", "Kabel NYM", 0, 0, 0.0),
        item("ELK-0002", "Lampu LED", 3, 0, 0.0),
    ];
    let ledger = vec![tx("ELK-0001", TransactionKind::In, 2, "01/02/2026 10:00")];
    let source = InMemorySource::new(items).with_transactions(Warehouse::A, ledger);

    let doc = processor()
        .generate_at(&source, 2026, 1, Warehouse::A, generated_at())
        .unwrap();

    assert!(doc.rows.iter().all(|r| r.id != "ELK-0001"));
    assert_eq!(doc.negative_balances, vec!["ELK-0001".to_string()]);
    assert!(doc.to_json().unwrap().contains("\"negative_balances\""));
}

#[test]
fn test_deleting_a_logged_transaction_restores_stock() {
    let mut items = vec![item("ELK-0001", "Kabel NYM", 10, 0, 0.0)];
    let ledger = ingestion::transactions_from_json(
        &json!({
            "success": true,
            "data": [
                {"idBarang": "ELK-0001", "jenis": "Keluar", "jumlah": 4, "tanggal": "05/01/2026", "rowIndex": 8},
                {"idBarang": "ELK-0001", "jenis": "Masuk", "jumlah": 1, "tanggal": "06/01/2026"}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let request = DeleteRequest::from_transaction(Warehouse::A, &ledger[0]).unwrap();
    assert_eq!(request.apply_to(&mut items).unwrap(), 14);
    assert!(DeleteRequest::from_transaction(Warehouse::A, &ledger[1]).is_err());
}
