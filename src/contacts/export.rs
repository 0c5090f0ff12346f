//! CSV export of contact submissions.

use super::model::ContactSubmission;

const HEADER: [&str; 9] = [
    "id",
    "name",
    "email",
    "phone",
    "subject",
    "message",
    "status",
    "attachmentUrl",
    "createdAt",
];

/// Leading characters a spreadsheet reads as the start of a formula.
const FORMULA_TRIGGERS: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Prefixes formula-looking text with `'` so spreadsheets show it as text,
/// then quotes the field when it holds a delimiter, quote or line break.
/// Inner quotes are doubled.
fn escape(field: &str) -> String {
    let field = if field.starts_with(FORMULA_TRIGGERS) {
        format!("'{field}")
    } else {
        field.to_string()
    };
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field
    }
}

/// Renders submissions as CSV with a header row and CRLF line endings.
pub fn to_csv(contacts: &[ContactSubmission]) -> String {
    let mut out = HEADER.join(",");
    out.push_str("\r\n");

    for c in contacts {
        let row = [
            c.id.to_string(),
            c.name.clone(),
            c.email.clone(),
            c.phone.clone(),
            c.subject.clone(),
            c.message.clone(),
            c.status.as_str().to_string(),
            c.attachment_url.clone().unwrap_or_default(),
            c.created_at.to_rfc3339(),
        ];
        let line: Vec<String> = row.iter().map(|f| escape(f)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }

    out
}
