use anyhow::anyhow;
use rust_xlsxwriter::Workbook;

use crate::domain::listing::{ListingRow, LISTING_FIELDS};

const SECTION_COLUMN: &str = "Section";
const SHEET_NAME: &str = "Listings";

pub fn listings_to_csv(rows: &[ListingRow]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![SECTION_COLUMN];
    header.extend(LISTING_FIELDS);
    writer.write_record(&header)?;

    for row in rows {
        writer.write_record([
            row.section.as_str(),
            row.record.location.as_str(),
            row.record.price.as_str(),
            row.record.property_type.as_str(),
            row.record.size.as_str(),
            row.record.developer.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("finalizing csv buffer: {}", e))
}

// Same column layout as the CSV export.
pub fn listings_to_xlsx(rows: &[ListingRow]) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    worksheet.write_string(0, 0, SECTION_COLUMN)?;
    for (col, field) in LISTING_FIELDS.iter().enumerate() {
        worksheet.write_string(0, col as u16 + 1, *field)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, row.section.as_str())?;
        worksheet.write_string(r, 1, row.record.location.as_str())?;
        worksheet.write_string(r, 2, row.record.price.as_str())?;
        worksheet.write_string(r, 3, row.record.property_type.as_str())?;
        worksheet.write_string(r, 4, row.record.size.as_str())?;
        worksheet.write_string(r, 5, row.record.developer.as_str())?;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}
