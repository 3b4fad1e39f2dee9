use stock_opname::*;

fn main() -> anyhow::Result<()> {
    let mut items = vec![
        Item {
            id: "ELK-0001".to_string(),
            nama: "Kabel NYM 2x1.5".to_string(),
            kategori: "Elektronik".to_string(),
            satuan: "roll".to_string(),
            stok_a: 20,
            stok_b: 4,
            harga: 250_000.0,
        },
        Item {
            id: "ELK-0003".to_string(),
            nama: "Stop Kontak".to_string(),
            kategori: "Elektronik".to_string(),
            satuan: "pcs".to_string(),
            stok_a: 0,
            stok_b: 0,
            harga: 18_000.0,
        },
    ];

    for query in ["elk-0001", "elk", "stpkntk", "semen"] {
        match lookup(&items, query) {
            SearchOutcome::Selected(item) => {
                println!(
                    "{:>10}: selected {} ({}), stok A {}",
                    query,
                    item.id,
                    item.nama,
                    item.stock(Warehouse::A)
                )
            }
            SearchOutcome::Choices(hits) => {
                let ids: Vec<&str> = hits.iter().map(|h| h.item.id.as_str()).collect();
                println!("{:>10}: {} candidates {:?}", query, hits.len(), ids)
            }
            SearchOutcome::NotFound => println!("{:>10}: not found, offer a new item", query),
        }
    }

    let category = NewCategoryDraft {
        nama: "Elektronik".to_string(),
        inisial: "elk".to_string(),
    }
    .into_category()?;
    let new_item = NewItemDraft {
        id_barang: next_item_id(&items, &category.inisial)?,
        nama: "Saklar Tunggal".to_string(),
        kategori: category.nama.clone(),
        satuan: "pcs".to_string(),
        stok_awal: 15,
        warehouse: Some(Warehouse::A),
    }
    .into_item(&items)?;
    println!("Added {} ({}) with {} in stock", new_item.id, new_item.nama, new_item.stok_a);
    items.push(new_item);

    let draft = TransactionDraft {
        warehouse: Some(Warehouse::A),
        jenis: Some(TransactionKind::Out),
        id_barang: "ELK-0001".to_string(),
        nama_barang: "Kabel NYM 2x1.5".to_string(),
        tanggal: "2026-01-14T09:30".to_string(),
        jumlah: 2,
        satuan: "roll".to_string(),
        pic: "Budi".to_string(),
        petugas: "Sari".to_string(),
        keterangan: "Proyek gudang Troso".to_string(),
    };
    let (warehouse, transaction) = draft.into_transaction()?;
    println!(
        "Recorded {} {} {} at {}",
        transaction.jenis.label(),
        transaction.jumlah,
        transaction.id_barang,
        warehouse
    );

    let ledger = vec![Transaction {
        row_index: Some(42),
        ..transaction
    }];
    let filter = TransactionFilter::default().with_month(2026, 1)?;
    for entry in filter_transactions(&ledger, &filter, &DateNormalizer::default()) {
        println!(
            "{}  {}  {}",
            entry.display_date(),
            entry.signed_quantity(),
            entry.transaction.id_barang
        );
    }

    let delete = DeleteRequest::from_transaction(warehouse, &ledger[0])?;
    let restored = delete.apply_to(&mut items)?;
    println!(
        "Deleted row {}; {} back to {} in {}",
        delete.row_index, delete.id_barang, restored, warehouse
    );

    Ok(())
}
