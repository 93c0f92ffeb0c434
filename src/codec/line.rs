//! Delimited line encoding/decoding
//!
//! ## Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ header:  col_a,col_b,col_c\n                 │
//! │ row:     1,plain text,"with, comma"\n        │
//! │ row:     2,,"say ""hi""\nsecond line"\n      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! - Fields are separated by `,`
//! - A field containing `,` `"` CR or LF is wrapped in quotes, inner quotes doubled
//! - Quoted fields may span physical lines
//! - Empty field = absent value

use crate::error::{Result, SeatwiseError};

/// Field separator
pub const DELIMITER: char = ',';

/// Quote character for fields that need escaping
pub const QUOTE: char = '"';

/// A decoded physical row (one logical record, possibly several lines)
#[derive(Debug)]
pub struct RawRow {
    /// 1-based line number where the row starts
    pub line: usize,

    /// Decoded fields, or the reason the row could not be tokenized
    pub fields: Result<Vec<String>>,
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode one logical row, without the trailing newline
pub fn encode_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        encode_field(field.as_ref(), &mut out);
    }
    out
}

/// Encode a header row followed by data rows, one line per row
pub fn encode_document<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> String {
    let mut out = encode_line(header);
    out.push('\n');
    for row in rows {
        out.push_str(&encode_line(row));
        out.push('\n');
    }
    out
}

fn encode_field(field: &str, out: &mut String) {
    let needs_quotes = field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r');

    if !needs_quotes {
        out.push_str(field);
        return;
    }

    out.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a whole document into rows
///
/// Never fails as a whole: a row that cannot be tokenized carries its own
/// `MalformedRow` error so the caller can skip it and keep the rest.
/// Blank lines are dropped.
pub fn decode_document(text: &str) -> Vec<RawRow> {
    let mut decoder = Decoder::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if decoder.in_quotes {
            match c {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    chars.next();
                    decoder.field.push(QUOTE);
                }
                QUOTE => decoder.in_quotes = false,
                '\n' => {
                    decoder.line += 1;
                    decoder.field.push('\n');
                }
                _ => decoder.field.push(c),
            }
            continue;
        }

        match c {
            DELIMITER => decoder.end_field(),
            QUOTE => {
                if decoder.field.is_empty() && !decoder.quoted {
                    decoder.in_quotes = true;
                    decoder.quoted = true;
                } else {
                    decoder.fail("unexpected quote inside unquoted field");
                }
            }
            // CRLF line endings: the LF closes the row
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                decoder.end_row();
                decoder.line += 1;
                decoder.row_start = decoder.line;
            }
            _ => {
                if decoder.quoted {
                    decoder.fail("characters after closing quote");
                } else {
                    decoder.field.push(c);
                }
            }
        }
    }

    if decoder.in_quotes {
        decoder.fail("unterminated quoted field");
        decoder.end_row();
    } else if decoder.has_pending() {
        decoder.end_row();
    }

    decoder.rows
}

/// Tokenizer state for `decode_document`
struct Decoder {
    rows: Vec<RawRow>,
    fields: Vec<String>,
    field: String,
    in_quotes: bool,
    quoted: bool,
    line: usize,
    row_start: usize,
    error: Option<String>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            fields: Vec::new(),
            field: String::new(),
            in_quotes: false,
            quoted: false,
            line: 1,
            row_start: 1,
            error: None,
        }
    }
}

impl Decoder {
    fn end_field(&mut self) {
        self.fields.push(std::mem::take(&mut self.field));
        self.quoted = false;
    }

    fn fail(&mut self, reason: &str) {
        if self.error.is_none() {
            self.error = Some(reason.to_string());
        }
    }

    fn has_pending(&self) -> bool {
        !self.fields.is_empty() || !self.field.is_empty() || self.quoted
    }

    fn end_row(&mut self) {
        let blank = self.fields.is_empty() && self.field.is_empty() && !self.quoted;
        self.end_field();
        let fields = std::mem::take(&mut self.fields);

        if blank && self.error.is_none() {
            return;
        }

        let fields = match self.error.take() {
            Some(reason) => Err(SeatwiseError::MalformedRow {
                line: self.row_start,
                reason,
            }),
            None => Ok(fields),
        };

        self.rows.push(RawRow {
            line: self.row_start,
            fields,
        });
    }
}
