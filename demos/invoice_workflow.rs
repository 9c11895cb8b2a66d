//! Invoice creation workflow example

use bigdecimal::BigDecimal;
use billing_core::{
    render_html, render_pdf,
    utils::MemoryStorage,
    BillingStorage, BusinessProfile, CatalogEntry, DocumentType, InvoiceForm, Party,
    PaymentMode, SessionContext, TaxRateEntry, TaxRateTable, TcsBasis, TcsCharge, ThemeKey,
    WithholdingKind, WithholdingRate,
};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Billing Core - Invoice Workflow Example\n");

    // 1. Seed a backend with rates, a party, and catalog entries
    let mut storage = MemoryStorage::new();
    storage.set_rate_table(TaxRateTable::new(vec![
        TaxRateEntry {
            id: "r5".to_string(),
            label: "GST @ 5%".to_string(),
            rate: BigDecimal::from(5),
            cess_rate: BigDecimal::from(0),
        },
        TaxRateEntry {
            id: "r18".to_string(),
            label: "GST @ 18%".to_string(),
            rate: BigDecimal::from(18),
            cess_rate: BigDecimal::from(0),
        },
    ]));

    let party = Party::new(
        "p1".to_string(),
        "Sharma Stores".to_string(),
        "Tamil Nadu".to_string(),
    );
    storage.save_party(&party).await?;
    storage
        .save_catalog_entry(&CatalogEntry::item(
            "itm1".to_string(),
            "Widget".to_string(),
            BigDecimal::from(1000),
            "r18".to_string(),
        ))
        .await?;
    storage
        .save_catalog_entry(&CatalogEntry::service(
            "svc1".to_string(),
            "Installation".to_string(),
            BigDecimal::from(200),
            "r5".to_string(),
        ))
        .await?;

    // 2. Mount a sales-invoice form for a Kerala business
    let business = BusinessProfile::new("Acme Traders".to_string(), "Kerala".to_string());
    let context = SessionContext::new("demo-token".to_string(), business.clone());
    let mut form = InvoiceForm::mount(
        storage,
        context,
        DocumentType::SalesInvoice,
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
    )
    .await?;
    println!("📋 Next invoice number: {}", form.next_number());

    // 3. Pick the party; Tamil Nadu vs Kerala makes this inter-state
    form.set_party("p1").await?;
    println!("🌍 Jurisdiction: {:?}", form.jurisdiction());

    // 4. Add lines and edit them
    let widget_line = form.add_catalog_entry("itm1").await?;
    form.set_quantity(&widget_line, 2)?;
    form.set_discount(&widget_line, BigDecimal::from(10))?;
    form.add_catalog_entry("svc1").await?;

    // 5. Apply 1% TCS on the taxable amount
    let tcs_rate = WithholdingRate::new(
        "tcs1".to_string(),
        WithholdingKind::Tcs,
        "TCS on sale of goods".to_string(),
        "206C(1H)".to_string(),
        BigDecimal::from(1),
    )?;
    form.set_tcs(Some(TcsCharge::new(tcs_rate, TcsBasis::Taxable)?));

    let summary = form.summary();
    println!("\n💰 Summary:");
    println!("  Taxable:     ₹{}", summary.taxable_amount);
    println!("  Discount:    ₹{}", summary.discount_amount);
    for group in &summary.rate_groups {
        println!(
            "  GST @ {:>2}%:   IGST ₹{}",
            group.nominal_rate, group.igst_amount
        );
    }
    println!("  TCS:         ₹{}", summary.tcs_amount);
    println!("  Grand Total: ₹{}", summary.grand_total);

    // 6. Submit
    form.set_amount_received(BigDecimal::from(500))?;
    form.set_payment_mode(PaymentMode::Cash);
    let document = form.submit().await?;
    println!(
        "\n✅ Saved {} #{} due {} with balance ₹{}",
        document.doc_type.label(),
        document.number,
        document.due_date,
        document.balance
    );

    // 7. Render it under a couple of themes
    let html = render_html(&document, ThemeKey::Classic, &business)?;
    println!("🎨 Classic HTML: {} bytes", html.len());
    let pdf = render_pdf(&document, ThemeKey::Midnight, &business)?;
    println!("📄 Midnight PDF: {} bytes as {}", pdf.bytes.len(), pdf.filename);

    Ok(())
}
