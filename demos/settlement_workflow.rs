//! Payment settlement workflow example

use bigdecimal::BigDecimal;
use billing_core::{
    utils::MemoryStorage, BankAccount, BankAccountKind, BillingStorage, BusinessProfile,
    CatalogEntry, DocumentType, InvoiceForm, Party, PaymentMode, SessionContext, SettlementForm,
    TaxRateEntry, TaxRateTable,
};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("💸 Billing Core - Settlement Workflow Example\n");

    let mut storage = MemoryStorage::new();
    storage.set_rate_table(TaxRateTable::new(vec![TaxRateEntry {
        id: "r18".to_string(),
        label: "GST @ 18%".to_string(),
        rate: BigDecimal::from(18),
        cess_rate: BigDecimal::from(0),
    }]));
    storage.add_bank_account(BankAccount {
        id: "acc1".to_string(),
        name: "Current Account".to_string(),
        kind: BankAccountKind::Bank,
        opening_balance: BigDecimal::from(0),
        as_of: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        details: None,
    });

    let party = Party::new("p1".to_string(), "Sharma Stores".to_string(), "Kerala".to_string());
    storage.save_party(&party).await?;
    storage
        .save_catalog_entry(&CatalogEntry::item(
            "itm1".to_string(),
            "Widget".to_string(),
            BigDecimal::from(1000),
            "r18".to_string(),
        ))
        .await?;

    let business = BusinessProfile::new("Acme Traders".to_string(), "Kerala".to_string());
    let context = SessionContext::new("demo-token".to_string(), business);

    // 1. Leave two invoices unpaid
    for quantity in [3u32, 4] {
        let mut form = InvoiceForm::mount(
            storage.clone(),
            context.clone(),
            DocumentType::SalesInvoice,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        )
        .await?;
        form.set_party("p1").await?;
        let line = form.add_catalog_entry("itm1").await?;
        form.set_quantity(&line, quantity)?;
        let document = form.submit().await?;
        println!(
            "🧾 Invoice #{} issued, balance ₹{}",
            document.number, document.balance
        );
    }

    // 2. Receive one payment against both
    let mut form = SettlementForm::mount(
        storage.clone(),
        context,
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
    )
    .await?;
    form.set_party("p1").await?;
    println!("\n📂 Outstanding documents: {}", form.outstanding().len());

    // 3. The customer deducted 1% TDS on the first invoice
    let first_doc = form.outstanding()[0].document_id.clone();
    let rate_id = form
        .define_tds_rate(
            "TDS on purchase of goods".to_string(),
            "194Q".to_string(),
            BigDecimal::from(1),
        )
        .await?;
    form.apply_tds(&first_doc, &rate_id)?;

    form.set_payment_amount(BigDecimal::from(5000));
    form.set_payment_mode(PaymentMode::BankTransfer);
    form.set_bank_account("acc1").await?;

    let preview = form.allocation();
    println!("\n📊 Allocation preview for ₹5000:");
    for entry in &preview.entries {
        println!(
            "  Invoice #{}: effective ₹{}, settles ₹{}, leaves ₹{}",
            entry.number, entry.effective_balance, entry.amount_settled, entry.remaining_balance
        );
    }
    println!("  Unapplied: ₹{}", preview.unapplied);

    // 4. Record it
    let settlement = form.submit().await?;
    println!(
        "\n✅ Settlement {} recorded, ₹{} settled",
        settlement.id, settlement.allocation.total_settled
    );

    for outstanding in storage.outstanding_for_party("p1").await? {
        println!(
            "  Invoice #{} now owes ₹{}",
            outstanding.number, outstanding.balance
        );
    }

    Ok(())
}
