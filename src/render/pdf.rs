//! PDF rendering of a document on a single A4 page

use std::io::BufWriter;

use printpdf::{BuiltinFont, Color, Line, Mm, PdfDocument, Point, Rgb};

use crate::invoice::Document;
use crate::render::html::format_money;
use crate::render::theme::{hex_to_rgb, ThemeKey};
use crate::types::{BillingError, BillingResult, BusinessProfile};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;

/// A rendered PDF with the filename the caller should save it under
pub struct PdfOutput {
    pub bytes: Vec<u8>,
    pub filename: String,
}

fn rgb_color(hex: &str) -> BillingResult<Color> {
    let (r, g, b) = hex_to_rgb(hex)?;
    Ok(Color::Rgb(Rgb::new(r, g, b, None)))
}

fn rule(layer: &printpdf::PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn text(
    layer: &printpdf::PdfLayerReference,
    font: &printpdf::IndirectFontRef,
    content: &str,
    size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(content, size, Mm(x), Mm(y), font);
}

/// Render a document to a single-page A4 PDF under a theme
pub fn render_pdf(
    document: &Document,
    theme: ThemeKey,
    business: &BusinessProfile,
) -> BillingResult<PdfOutput> {
    let palette = theme.palette();
    let title = document.doc_type.label();

    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| BillingError::Render(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| BillingError::Render(e.to_string()))?;

    layer.set_outline_color(rgb_color(palette.table_border)?);

    // Header: business on the left, document identity on the right
    let mut y: f32 = 282.0;
    layer.set_fill_color(rgb_color(palette.header_bg)?);
    text(&layer, &font_bold, &business.name, 16.0, MARGIN, y);
    text(&layer, &font_bold, title, 16.0, 140.0, y);

    layer.set_fill_color(rgb_color(palette.body_text)?);
    y -= 6.0;
    if let Some(gstin) = &business.gstin {
        text(&layer, &font, &format!("GSTIN: {gstin}"), 9.0, MARGIN, y);
    }
    text(
        &layer,
        &font,
        &format!("No. {}", document.number),
        10.0,
        140.0,
        y,
    );
    y -= 5.0;
    if let Some(address) = &business.address {
        text(&layer, &font, address, 9.0, MARGIN, y);
    }
    text(
        &layer,
        &font,
        &format!("Date: {}", document.date.format("%d-%m-%Y")),
        10.0,
        140.0,
        y,
    );
    y -= 5.0;
    text(
        &layer,
        &font,
        &format!("Due: {}", document.due_date.format("%d-%m-%Y")),
        10.0,
        140.0,
        y,
    );

    y -= 6.0;
    rule(&layer, y);

    // Party block
    y -= 8.0;
    layer.set_fill_color(rgb_color(palette.accent)?);
    text(&layer, &font_bold, "Bill To", 10.0, MARGIN, y);
    layer.set_fill_color(rgb_color(palette.body_text)?);
    y -= 6.0;
    text(&layer, &font_bold, &document.party.name, 11.0, MARGIN, y);
    if let Some(address) = &document.party.address {
        y -= 5.0;
        text(&layer, &font, address, 9.0, MARGIN, y);
    }
    if let Some(gstin) = &document.party.gstin {
        y -= 5.0;
        text(&layer, &font, &format!("GSTIN: {gstin}"), 9.0, MARGIN, y);
    }

    // Line-item table
    let x_desc = MARGIN;
    let x_qty = 110.0;
    let x_price = 130.0;
    let x_tax = 155.0;
    let x_amount = 178.0;

    y -= 10.0;
    layer.set_fill_color(rgb_color(palette.table_header_bg)?);
    text(&layer, &font_bold, "Description", 10.0, x_desc, y);
    text(&layer, &font_bold, "Qty", 10.0, x_qty, y);
    text(&layer, &font_bold, "Rate", 10.0, x_price, y);
    text(&layer, &font_bold, "Tax", 10.0, x_tax, y);
    text(&layer, &font_bold, "Amount", 10.0, x_amount, y);
    y -= 3.0;
    rule(&layer, y);

    layer.set_fill_color(rgb_color(palette.body_text)?);
    y -= 6.0;
    for (index, line) in document.lines.iter().enumerate() {
        if y < 60.0 {
            return Err(BillingError::Render(
                "Too many line items for one page".to_string(),
            ));
        }
        let description = match &line.hsn_sac {
            Some(code) => format!("{}. {} ({})", index + 1, line.description, code),
            None => format!("{}. {}", index + 1, line.description),
        };
        text(&layer, &font, &description, 9.0, x_desc, y);
        text(&layer, &font, &line.quantity.to_string(), 9.0, x_qty, y);
        text(&layer, &font, &format_money(&line.unit_price), 9.0, x_price, y);
        text(&layer, &font, &format_money(&line.tax_amount), 9.0, x_tax, y);
        text(&layer, &font, &format_money(&line.line_total), 9.0, x_amount, y);
        y -= 6.0;
    }
    rule(&layer, y);

    // Per-rate tax breakup
    y -= 8.0;
    for group in &document.summary.rate_groups {
        let label = format!("GST @ {}%", group.nominal_rate);
        text(&layer, &font, &label, 9.0, x_desc, y);
        text(
            &layer,
            &font,
            &format!("CGST {}", format_money(&group.cgst_amount)),
            9.0,
            x_qty,
            y,
        );
        text(
            &layer,
            &font,
            &format!("SGST {}", format_money(&group.sgst_amount)),
            9.0,
            x_price + 5.0,
            y,
        );
        text(
            &layer,
            &font,
            &format!("IGST {}", format_money(&group.igst_amount)),
            9.0,
            x_tax + 5.0,
            y,
        );
        y -= 5.0;
    }

    // Totals block
    let summary = &document.summary;
    y -= 6.0;
    layer.set_fill_color(rgb_color(palette.totals_text)?);
    text(&layer, &font, "Taxable Amount", 10.0, 130.0, y);
    text(&layer, &font, &format_money(&summary.taxable_amount), 10.0, x_amount, y);
    y -= 6.0;
    text(&layer, &font, "Discount", 10.0, 130.0, y);
    text(&layer, &font, &format_money(&summary.discount_amount), 10.0, x_amount, y);
    if summary.tcs_amount != bigdecimal::BigDecimal::from(0) {
        y -= 6.0;
        text(&layer, &font, "TCS", 10.0, 130.0, y);
        text(&layer, &font, &format_money(&summary.tcs_amount), 10.0, x_amount, y);
    }
    y -= 7.0;
    text(&layer, &font_bold, "Grand Total", 12.0, 130.0, y);
    text(&layer, &font_bold, &format_money(&summary.grand_total), 12.0, x_amount, y);
    y -= 6.0;
    text(&layer, &font, "Amount Received", 10.0, 130.0, y);
    text(&layer, &font, &format_money(&document.amount_received), 10.0, x_amount, y);
    y -= 6.0;
    text(&layer, &font, "Balance", 10.0, 130.0, y);
    text(&layer, &font, &format_money(&document.balance), 10.0, x_amount, y);

    // Notes and signature line
    if let Some(notes) = &document.notes {
        if !notes.trim().is_empty() {
            text(&layer, &font, notes, 8.0, MARGIN, 25.0);
        }
    }
    text(&layer, &font, "Authorised Signatory", 8.0, 160.0, 20.0);

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| BillingError::Render(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| BillingError::Render(e.to_string()))?;

    Ok(PdfOutput {
        bytes,
        filename: format!("{}_Invoice.pdf", document.number),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{Document, DocumentDraft, DocumentSummary, LineItem};
    use crate::tax::{TaxJurisdiction, TaxRateEntry, TaxRateTable};
    use crate::types::{CatalogEntry, DocumentType, Party, PaymentMode};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn sample_document() -> (Document, BusinessProfile) {
        let table = TaxRateTable::new(vec![TaxRateEntry {
            id: "r18".to_string(),
            label: "GST @ 18%".to_string(),
            rate: BigDecimal::from(18),
            cess_rate: BigDecimal::from(0),
        }]);
        let entry = CatalogEntry::item(
            "itm1".to_string(),
            "Widget".to_string(),
            BigDecimal::from(1000),
            "r18".to_string(),
        );
        let line = LineItem::from_catalog(&entry, &table, TaxJurisdiction::IntraState).unwrap();
        let lines = vec![line];
        let summary = DocumentSummary::calculate(&lines, None);

        let business = BusinessProfile::new("Acme Traders".to_string(), "Kerala".to_string());
        let draft = DocumentDraft {
            doc_type: DocumentType::SalesInvoice,
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            party: Party::new("p1".to_string(), "Sharma Stores".to_string(), "Kerala".to_string()),
            lines,
            summary,
            amount_received: BigDecimal::from(0),
            payment_mode: PaymentMode::Cash,
            bank_account_id: None,
            notes: None,
            signature_url: None,
        };
        let document = Document::from_draft("d1".to_string(), 12, draft, &business).unwrap();
        (document, business)
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let (document, business) = sample_document();
        let output = render_pdf(&document, ThemeKey::Classic, &business).unwrap();

        assert!(output.bytes.starts_with(b"%PDF"));
        assert_eq!(output.filename, "12_Invoice.pdf");
    }

    #[test]
    fn test_all_themes_render() {
        let (document, business) = sample_document();
        for theme in ThemeKey::ALL {
            assert!(render_pdf(&document, theme, &business).is_ok(), "{:?}", theme);
        }
    }
}
