use anyhow::Result;
use chrono::{DateTime, Utc};

use super::Ticket;

const EXPORT_COLUMNS: [&str; 10] = [
    "id",
    "title",
    "description",
    "priority",
    "category",
    "status",
    "submitted_by",
    "assigned_to",
    "created_at",
    "updated_at",
];

const UNASSIGNED: &str = "unassigned";

/// Projects the filtered subset to the fixed column tuple and serializes it
/// as CSV: one header row, one row per ticket. Embedded delimiters and quotes
/// are escaped by the writer. Does not mutate anything.
pub fn write_csv(tickets: &[Ticket]) -> Result<Vec<u8>> {
    let mut csv_writer = csv::Writer::from_writer(vec![]);

    csv_writer.write_record(EXPORT_COLUMNS)?;

    for ticket in tickets {
        csv_writer.write_record([
            ticket.id.to_string(),
            ticket.title.clone(),
            ticket.description.clone(),
            ticket.priority.as_str().to_string(),
            ticket.category.clone(),
            ticket.status.as_str().to_string(),
            ticket.submitted_by.clone(),
            ticket
                .assigned_to
                .clone()
                .unwrap_or_else(|| UNASSIGNED.to_string()),
            ticket.created_at.format("%Y-%m-%d").to_string(),
            ticket.updated_at.format("%Y-%m-%d").to_string(),
        ])?;
    }

    Ok(csv_writer.into_inner()?)
}

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("tickets_{}.csv", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::test_support::sample_ticket;

    #[test]
    fn test_single_ticket_is_two_lines() {
        let ticket = sample_ticket("Printer offline", "a@x.com");
        let bytes = write_csv(&[ticket.clone()]).expect("Export failed");
        let text = String::from_utf8(bytes).expect("Invalid UTF-8");

        let lines: Vec<&str> = text.trim_end().lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], EXPORT_COLUMNS.join(","));
        assert!(lines[1].contains(&ticket.id.to_string()));
        assert!(lines[1].contains("Printer offline"));
        assert!(lines[1].contains("a@x.com"));
    }

    #[test]
    fn test_unassigned_placeholder() {
        let ticket = sample_ticket("Printer offline", "a@x.com");
        let bytes = write_csv(&[ticket]).expect("Export failed");
        let text = String::from_utf8(bytes).expect("Invalid UTF-8");

        assert!(text.contains(UNASSIGNED));
    }

    #[test]
    fn test_embedded_delimiters_are_escaped() {
        let mut ticket = sample_ticket("Broken screen, keyboard and \"mouse\"", "a@x.com");
        ticket.description = "first line\nsecond line".into();

        let bytes = write_csv(&[ticket]).expect("Export failed");
        let text = String::from_utf8(bytes).expect("Invalid UTF-8");

        assert!(text.contains("\"Broken screen, keyboard and \"\"mouse\"\"\""));
        assert!(text.contains("\"first line\nsecond line\""));
    }

    #[test]
    fn test_one_row_per_ticket() {
        let tickets: Vec<_> = (0..4)
            .map(|i| sample_ticket(&format!("Ticket {i}"), "a@x.com"))
            .collect();

        let bytes = write_csv(&tickets).expect("Export failed");
        let text = String::from_utf8(bytes).expect("Invalid UTF-8");
        assert_eq!(text.trim_end().lines().count(), 5);
    }

    #[test]
    fn test_export_filename_carries_date() {
        let now = Utc::now();
        let name = export_filename(now);
        assert!(name.starts_with("tickets_"));
        assert!(name.ends_with(".csv"));
        assert!(name.contains(&now.format("%Y-%m-%d").to_string()));
    }
}
