//! Colored terminal rendering for citybeat records.

use chrono::NaiveDate;
use citybeat_core::EventRecord;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventRecord {
    fn render(&self) -> String {
        let mut line = format!("  {} {}", format_time(self.time()).dimmed(), self.title().bold());

        if !self.location().is_empty() {
            line.push_str(&format!(" {} {}", "@".dimmed(), self.location()));
        }

        if !self.tags().is_empty() {
            let tags = self.tags().iter().cloned().collect::<Vec<_>>().join(", ");
            line.push_str(&format!(" {}", format!("[{}]", tags).cyan()));
        }

        if !self.link().is_empty() {
            line.push_str(&format!("\n          {}", self.link().dimmed()));
        }

        line
    }
}

/// Print records grouped under a date heading. Expects them already in date order.
pub fn print_grouped(records: &[&EventRecord], today: NaiveDate) {
    let mut current_label: Option<String> = None;

    for record in records {
        let label = format_date_label(record.date(), today);

        if current_label.as_ref() != Some(&label) {
            if current_label.is_some() {
                println!();
            }
            println!("{}", label.bold());
            current_label = Some(label);
        }

        println!("{}", record.render());
    }
}

/// "Today", "Tomorrow", "Fri Jul 5", or "Date unknown"
pub fn format_date_label(date: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(date) = date else {
        return "Date unknown".to_string();
    };

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Right-aligned clock time, or "all-day" when the source gave none.
fn format_time(time: &str) -> String {
    if time.is_empty() {
        "all-day".to_string()
    } else {
        format!("{:>7}", time)
    }
}
