use crate::domain::analysis::{ChunkAnalysis, ChunkOutcome};

// Column order for the table and the exports.
pub const LISTING_FIELDS: [&str; 5] = ["Location", "Price", "Property Type", "Size", "Developer"];

#[derive(Debug, Default, PartialEq, Clone)]
pub struct ListingRecord {
    pub location: String,
    pub price: String,
    pub property_type: String,
    pub size: String,
    pub developer: String,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ListingRow {
    pub section: String,
    pub record: ListingRecord,
}

/// Only the first colon on a line delimits, so values may contain colons.
/// Unknown keys are ignored; fields the reply never mentions stay empty.
pub fn parse_listing_record(reply: &str) -> ListingRecord {
    let mut record = ListingRecord::default();

    for line in reply.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            match key.trim() {
                "Location" => record.location = value.to_string(),
                "Price" => record.price = value.to_string(),
                "Property Type" => record.property_type = value.to_string(),
                "Size" => record.size = value.to_string(),
                "Developer" => record.developer = value.to_string(),
                _ => {}
            }
        }
    }

    record
}

/// Failed outcomes still get a row, all fields empty, so the table always
/// mirrors the chunk count.
pub fn tabulate_listings(results: &[ChunkAnalysis]) -> Vec<ListingRow> {
    results
        .iter()
        .map(|analysis| {
            let record = match &analysis.outcome {
                ChunkOutcome::Reply(reply) => parse_listing_record(reply),
                ChunkOutcome::Failed(_) => ListingRecord::default(),
            };
            ListingRow {
                section: format!("Part {}", analysis.index),
                record,
            }
        })
        .collect()
}
