//! PDF rendering of a [`StudentForm`].
//!
//! Writes a minimal PDF 1.4 document by hand: Letter pages, the two standard
//! Helvetica faces, and one uncompressed content stream per page. A typical
//! form fits on one page.

use crate::report::StudentForm;
use crate::types::Student;

/// MIME type of a PDF document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 50;
const VALUE_X: i64 = 200;

const TITLE_SIZE: i64 = 18;
const SUBTITLE_SIZE: i64 = 12;
const BODY_SIZE: i64 = 11;
const LINE_HEIGHT: i64 = 20;
/// Baseline step between the wrapped lines of one value.
const WRAP_HEIGHT: i64 = 14;

/// Room for a value, in glyph units (thousandths of the body font size).
const VALUE_UNITS: i64 = (PAGE_WIDTH - MARGIN - VALUE_X) * 1000 / BODY_SIZE;

/// Attachment name for a student's form.
#[must_use]
pub fn pdf_filename(student: &Student) -> String {
    format!("data-santri-{}.pdf", student.nis)
}

/// Render `student` as a PDF form.
#[must_use]
pub fn render_student_pdf(student: &Student) -> Vec<u8> {
    render_form(&StudentForm::from_student(student))
}

/// Render a prepared form. Values too wide for the page wrap onto further
/// lines, and the form continues on a new page when it reaches the bottom
/// margin.
#[must_use]
pub fn render_form(form: &StudentForm) -> Vec<u8> {
    let pages = page_streams(form);

    // Objects 1-4 are fixed; each page then adds a page object and its
    // content stream.
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        String::new(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    let mut kids = Vec::with_capacity(pages.len());
    for content in pages {
        let page_id = objects.len() + 1;
        kids.push(format!("{page_id} 0 R"));
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ));
    }
    objects[1] = format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        kids.len()
    );

    // Everything written below is ASCII, so string length equals byte offset.
    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{body}\nendobj\n", idx + 1));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));

    out.into_bytes()
}

/// Lay the form out into one content stream per page.
fn page_streams(form: &StudentForm) -> Vec<String> {
    let mut pages = Vec::new();
    let mut stream = String::new();

    let title_y = PAGE_HEIGHT - MARGIN;
    text_op(
        &mut stream,
        "F2",
        TITLE_SIZE,
        centered_x(&form.title, TITLE_SIZE),
        title_y,
        &form.title,
    );
    let subtitle_y = title_y - 24;
    text_op(
        &mut stream,
        "F1",
        SUBTITLE_SIZE,
        centered_x(&form.subtitle, SUBTITLE_SIZE),
        subtitle_y,
        &form.subtitle,
    );

    // Rule under the title block.
    let rule_y = subtitle_y - 14;
    stream.push_str(&format!(
        "{MARGIN} {rule_y} m {} {rule_y} l S\n",
        PAGE_WIDTH - MARGIN
    ));

    let mut y = rule_y - 26;
    for line in &form.lines {
        for (idx, part) in wrap_text(&line.value, VALUE_UNITS).iter().enumerate() {
            if y < MARGIN {
                pages.push(std::mem::take(&mut stream));
                y = PAGE_HEIGHT - MARGIN;
            }
            if idx == 0 {
                text_op(&mut stream, "F2", BODY_SIZE, MARGIN, y, &format!("{}:", line.label));
            }
            text_op(&mut stream, "F1", BODY_SIZE, VALUE_X, y, part);
            y -= WRAP_HEIGHT;
        }
        y -= LINE_HEIGHT - WRAP_HEIGHT;
    }

    pages.push(stream);
    pages
}

fn text_op(stream: &mut String, font: &str, size: i64, x: i64, y: i64, text: &str) {
    stream.push_str(&format!(
        "BT /{font} {size} Tf {x} {y} Td ({}) Tj ET\n",
        escape_text(text)
    ));
}

/// Approximate Helvetica advance of `ch`, in thousandths of the font size.
///
/// Exact for lowercase letters and digits; capitals are rounded up.
fn advance(ch: char) -> i64 {
    match ch {
        'i' | 'j' | 'l' | '\'' | '|' => 222,
        ' ' | 'f' | 't' | 'I' | '.' | ',' | ':' | ';' | '!' | '/' | '[' | ']' => 278,
        'r' | '(' | ')' | '-' | '`' => 333,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500,
        'w' => 722,
        'm' | 'M' => 833,
        'W' => 944,
        'A'..='Z' | '@' | '%' => 778,
        _ => 556,
    }
}

fn text_units(text: &str) -> i64 {
    text.chars().map(advance).sum()
}

/// Left edge that centers `text` on the page.
fn centered_x(text: &str, size: i64) -> i64 {
    let width = text_units(text) * size / 1000;
    ((PAGE_WIDTH - width) / 2).max(MARGIN)
}

/// Break `text` into lines no wider than `max_units`, at spaces where
/// possible. Always yields at least one line.
fn wrap_text(text: &str, max_units: i64) -> Vec<String> {
    let space = advance(' ');
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0;

    for word in text.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let word_width = text_units(rest);
            let needed = if current.is_empty() {
                word_width
            } else {
                width + space + word_width
            };
            if needed <= max_units {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(rest);
                width = needed;
                break;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                width = 0;
                continue;
            }
            // A single word wider than the line: split it.
            let mut taken = 0;
            let split = rest
                .char_indices()
                .find(|&(_, ch)| {
                    taken += advance(ch);
                    taken > max_units
                })
                .map_or(rest.len(), |(pos, _)| pos.max(ch_len(rest)));
            lines.push(rest[..split].to_string());
            rest = &rest[split..];
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Byte length of the first character, so a split always makes progress.
fn ch_len(text: &str) -> usize {
    text.chars().next().map_or(0, char::len_utf8)
}

/// Escape `text` for a PDF literal string.
///
/// Latin-1 characters are written as octal escapes (WinAnsi agrees with
/// Latin-1 above 0xA0); anything else becomes `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", u32::from(ch))),
            _ => out.push('?'),
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
