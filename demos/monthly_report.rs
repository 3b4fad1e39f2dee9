//! Builds a stock opname report from captured API responses and writes it as CSV.
//!
//! Usage: cargo run --example monthly_report -- <items.json> <transactions.json> <YYYY-MM> <A|B>
//!
//! Without arguments a small built-in ledger for Gudang Kalipucang, January 2026, is used.

use std::env;
use std::fs::{self, File};
use stock_opname::*;

const SAMPLE_ITEMS: &str = r#"{
    "success": true,
    "data": [
        {"id": "ELK-0001", "nama": "Kabel NYM 2x1.5", "kategori": "Elektronik", "satuan": "roll", "stokA": 20, "stokB": 4, "harga": 250000},
        {"id": "ELK-0002", "nama": "Lampu LED 10W", "kategori": "Elektronik", "satuan": "pcs", "stokA": 0, "stokB": 12, "harga": 35000},
        {"id": "ATK-0001", "nama": "Kertas A4", "kategori": "Alat Tulis", "satuan": "rim", "stokA": "7", "stokB": null, "harga": 48000}
    ]
}"#;

const SAMPLE_LEDGER: &str = r#"{
    "success": true,
    "data": [
        {"idBarang": "ELK-0001", "namaBarang": "Kabel NYM 2x1.5", "jenis": "Masuk", "jumlah": 5, "tanggal": "10/01/2026 10:00:00", "rowIndex": 2},
        {"idBarang": "ELK-0001", "namaBarang": "Kabel NYM 2x1.5", "jenis": "Keluar", "jumlah": 3, "tanggal": "30/01/2026 13:15:00", "rowIndex": 3},
        {"idBarang": "ELK-0002", "namaBarang": "Lampu LED 10W", "jenis": "Out", "jumlah": 6, "tanggal": "2026-01-12T03:00:00.000Z", "rowIndex": 4},
        {"idBarang": "ATK-0001", "namaBarang": "Kertas A4", "jenis": "In", "jumlah": 2, "tanggal": 46020.5, "rowIndex": 5}
    ]
}"#;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let (items_body, ledger_body, selection, warehouse) = if args.len() >= 4 {
        (
            fs::read_to_string(&args[0])?,
            fs::read_to_string(&args[1])?,
            args[2].clone(),
            Warehouse::parse(&args[3])?,
        )
    } else {
        println!("No input files given, using the built-in sample ledger.");
        (
            SAMPLE_ITEMS.to_string(),
            SAMPLE_LEDGER.to_string(),
            "2026-01".to_string(),
            Warehouse::A,
        )
    };

    let (year, month) = parse_month_selection(&selection)?;
    let source = JsonPayloadSource::new(items_body).with_transactions(warehouse, ledger_body);

    let config = ReportConfig::default();
    let processor = StockOpnameProcessor::new(config.clone())?;
    let report = processor.generate(&source, year, month, warehouse)?;

    println!("{}", report.title());
    println!("Periode: {}", report.window.label());
    println!(
        "{:<10} {:<20} {:>6} {:>6} {:>6} {:>6}",
        "ID", "Nama", "Awal", "Masuk", "Keluar", "Akhir"
    );
    for row in &report.rows {
        println!(
            "{:<10} {:<20} {:>6} {:>6} {:>6} {:>6}",
            row.id, row.nama, row.saldo_awal, row.masuk, row.keluar, row.stok_akhir
        );
    }
    println!("Total nilai: {:.2}", report.totals.total_nilai);

    let file_name = export::file_name(&report);
    let file = File::create(&file_name)?;
    export::write_csv(&report, &config, file)?;
    println!("Exported {} item(s) to {}", report.rows.len(), file_name);

    Ok(())
}
