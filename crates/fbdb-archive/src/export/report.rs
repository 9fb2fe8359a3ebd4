use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use fbdb_core::FeedbackRecord;

use super::{row_values, COLUMNS};

pub const REPORT_TITLE: &str = "Visitor Feedback Export";

const GENERATED_FORMAT: &str = "%B %d, %Y at %I:%M %p UTC";

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
.header { text-align: center; margin-bottom: 20px; }
.header h1 { color: #333; }
.export-date { text-align: right; margin-bottom: 20px; font-style: italic; color: #666; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th { background-color: #4e73df; color: white; padding: 10px; text-align: left; }
td { padding: 8px; border-bottom: 1px solid #ddd; vertical-align: top; }
tr:nth-child(even) { background-color: #f2f2f2; }
.footer { text-align: center; margin-top: 30px; font-size: 12px; color: #666; }
@media print { th { -webkit-print-color-adjust: exact; print-color-adjust: exact; } }
";

/// Escape text for safe inclusion in HTML element content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a self-contained printable HTML table of `records`.
///
/// Output depends only on the inputs.
#[must_use]
pub fn render_report(records: &[FeedbackRecord], generated_at: DateTime<Utc>) -> String {
    let mut html = String::with_capacity(2048 + records.len() * 256);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    let _ = writeln!(html, "<title>{REPORT_TITLE}</title>");
    let _ = write!(html, "<style>\n{STYLE}</style>\n");
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(html, "<div class=\"header\"><h1>{REPORT_TITLE}</h1></div>");
    let _ = writeln!(
        html,
        "<div class=\"export-date\">Generated on {}</div>",
        generated_at.format(GENERATED_FORMAT)
    );

    html.push_str("<table>\n<thead>\n<tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in records {
        html.push_str("<tr>");
        for value in row_values(record) {
            let _ = write!(html, "<td>{}</td>", escape_html(&value));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    let noun = if records.len() == 1 { "record" } else { "records" };
    let _ = writeln!(
        html,
        "<div class=\"footer\"><p>{} {noun} exported</p></div>",
        records.len()
    );
    html.push_str("</body>\n</html>\n");
    html
}
