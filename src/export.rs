//! CSV rendering of stock opname reports.

use crate::config::ReportConfig;
use crate::error::Result;
use crate::report::ReportDocument;
use crate::utils::month_name;
use csv::WriterBuilder;
use std::io::Write;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const COLUMNS: [&str; 11] = [
    "No",
    "ID",
    "Nama Barang",
    "Kategori",
    "Satuan",
    "Harga Satuan",
    "Saldo Awal",
    "Masuk",
    "Keluar",
    "Stok Akhir",
    "Nilai",
];

pub fn write_csv<W: Write>(
    doc: &ReportDocument,
    config: &ReportConfig,
    mut writer: W,
) -> Result<()> {
    if config.include_bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut wrt = WriterBuilder::new().flexible(true).from_writer(writer);

    wrt.write_record([doc.title()])?;
    wrt.write_record([format!("Periode: {}", doc.window.label())])?;
    wrt.write_record([format!(
        "Dibuat: {}",
        doc.generated_at.format("%d/%m/%Y %H:%M:%S")
    )])?;
    wrt.write_record([""])?;
    wrt.write_record(COLUMNS)?;

    for (idx, row) in doc.rows.iter().enumerate() {
        wrt.write_record([
            (idx + 1).to_string(),
            row.id.clone(),
            row.nama.clone(),
            row.kategori.clone(),
            row.satuan.clone(),
            format_amount(row.harga_satuan),
            row.saldo_awal.to_string(),
            row.masuk.to_string(),
            row.keluar.to_string(),
            row.stok_akhir.to_string(),
            format_amount(row.total_nilai),
        ])?;
    }

    if config.include_totals_row {
        let totals = &doc.totals;
        wrt.write_record([
            String::new(),
            String::new(),
            "TOTAL".to_string(),
            String::new(),
            String::new(),
            String::new(),
            totals.saldo_awal.to_string(),
            totals.masuk.to_string(),
            totals.keluar.to_string(),
            totals.stok_akhir.to_string(),
            format_amount(totals.total_nilai),
        ])?;
    }

    wrt.flush()?;
    Ok(())
}

pub fn to_csv_string(doc: &ReportDocument, config: &ReportConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(doc, config, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// "SO_GudangKalipucang_Januari2026.csv"
pub fn file_name(doc: &ReportDocument) -> String {
    format!(
        "SO_{}_{}{}.csv",
        doc.warehouse.display_name().replace(' ', ""),
        month_name(doc.month),
        doc.year
    )
}

/// Whole amounts without decimals, everything else rounded to cents.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
