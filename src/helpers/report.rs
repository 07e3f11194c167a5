//! Consumption report rendering.
//!
//! Both renderers take the already-aggregated rows for a single user and
//! year and produce the bytes that are attached to a download response or
//! an outgoing email. The CSV layout keeps the historical column names
//! (`AÑO`, `MES`, `M3_AGUA`, `M3_GAS`, `COSTO_CLP`) so existing
//! spreadsheets keep importing without changes.

use anyhow::Result;
use common::ReportRow;
use model::entities::profile::ReportFormat;
use printpdf::{BuiltinFont, Mm, PdfDocument};

/// Render the CSV report for one user and year.
pub fn consumption_csv(username: &str, year: i32, rows: &[ReportRow]) -> Result<Vec<u8>> {
    // The preamble rows have two fields while data rows have five
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    wtr.write_record(["Usuario", username])?;
    wtr.write_record(["Año", &year.to_string()])?;
    wtr.write_record(std::iter::empty::<&str>())?;
    wtr.write_record(["AÑO", "MES", "M3_AGUA", "M3_GAS", "COSTO_CLP"])?;

    for row in rows {
        wtr.write_record([
            row.year.to_string(),
            row.month.clone(),
            row.water_m3.to_string(),
            row.gas_m3.to_string(),
            row.cost.to_string(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flush csv writer: {e}"))?;
    Ok(bytes)
}

/// Render the PDF report for one user and year.
///
/// A4 portrait with a bold title line and a fixed-width table. Long
/// histories spill onto continuation pages.
pub fn consumption_pdf(username: &str, year: i32, rows: &[ReportRow]) -> Result<Vec<u8>> {
    let title = format!("Reporte de Consumo - {} - {}", username, year);
    let (doc, page, layer) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "contenido");

    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let mono = doc.add_builtin_font(BuiltinFont::Courier)?;

    let mut current = doc.get_page(page).get_layer(layer);
    current.use_text(&title, 16.0, Mm(20.0), Mm(270.0), &bold);

    let columns = [
        (Mm(20.0), "AÑO"),
        (Mm(50.0), "MES"),
        (Mm(85.0), "M3_AGUA"),
        (Mm(120.0), "M3_GAS"),
        (Mm(155.0), "COSTO_CLP"),
    ];
    for (x, heading) in columns {
        current.use_text(heading, 10.0, x, Mm(255.0), &bold);
    }

    let mut y = 247.0;
    for row in rows {
        if y < 20.0 {
            let (next_page, next_layer) = doc.add_page(Mm(210.0), Mm(297.0), "contenido");
            current = doc.get_page(next_page).get_layer(next_layer);
            y = 270.0;
        }

        current.use_text(row.year.to_string(), 10.0, Mm(20.0), Mm(y), &mono);
        current.use_text(&row.month, 10.0, Mm(50.0), Mm(y), &mono);
        current.use_text(row.water_m3.to_string(), 10.0, Mm(85.0), Mm(y), &mono);
        current.use_text(row.gas_m3.to_string(), 10.0, Mm(120.0), Mm(y), &mono);
        current.use_text(row.cost.to_string(), 10.0, Mm(155.0), Mm(y), &mono);
        y -= 8.0;
    }

    let bytes = doc.save_to_bytes()?;
    Ok(bytes)
}

/// MIME type for a report attachment or download.
pub fn report_content_type(format: ReportFormat) -> &'static str {
    match format {
        ReportFormat::Csv => "text/csv; charset=utf-8",
        ReportFormat::Pdf => "application/pdf",
    }
}

/// Attachment and download filename for a user's yearly report.
pub fn report_filename(username: &str, year: i32, format: ReportFormat) -> String {
    format!(
        "reporte-consumo-{}-{}.{}",
        slugify(username),
        year,
        format.extension()
    )
}

/// Lowercase the input and collapse every non-alphanumeric run into a
/// single dash.
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric(), "-")
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_rows() -> Vec<ReportRow> {
        vec![
            ReportRow {
                year: 2025,
                month: "ene".to_string(),
                water_m3: Decimal::new(1050, 2),
                gas_m3: Decimal::new(320, 2),
                cost: Decimal::new(45000, 0),
            },
            ReportRow {
                year: 2025,
                month: "feb".to_string(),
                water_m3: Decimal::ZERO,
                gas_m3: Decimal::ZERO,
                cost: Decimal::ZERO,
            },
        ]
    }

    #[test]
    fn csv_report_has_preamble_and_rows() {
        let bytes = consumption_csv("berta", 2025, &sample_rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Usuario,berta");
        assert_eq!(lines[1], "Año,2025");
        assert!(lines[2].is_empty());
        assert_eq!(lines[3], "AÑO,MES,M3_AGUA,M3_GAS,COSTO_CLP");
        assert_eq!(lines[4], "2025,ene,10.50,3.20,45000");
        assert_eq!(lines[5], "2025,feb,0,0,0");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn pdf_report_produces_a_document() {
        let bytes = consumption_pdf("berta", 2025, &sample_rows()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn pdf_report_handles_long_histories() {
        let mut rows = Vec::new();
        for i in 0..120 {
            rows.push(ReportRow {
                year: 2020 + (i / 12),
                month: "ene".to_string(),
                water_m3: Decimal::new(i as i64, 0),
                gas_m3: Decimal::ZERO,
                cost: Decimal::ZERO,
            });
        }
        let bytes = consumption_pdf("berta", 2025, &rows).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Sala Cuna Las Flores"), "sala-cuna-las-flores");
        assert_eq!(slugify("  Berta__2 "), "berta-2");
        assert_eq!(slugify("ñuñoa"), "ñuñoa");
    }

    #[test]
    fn filename_uses_slug_and_extension() {
        assert_eq!(
            report_filename("Sala Cuna", 2025, ReportFormat::Pdf),
            "reporte-consumo-sala-cuna-2025.pdf"
        );
        assert_eq!(
            report_filename("berta", 2024, ReportFormat::Csv),
            "reporte-consumo-berta-2024.csv"
        );
    }
}
