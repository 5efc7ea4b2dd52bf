//! Cursor based splitting of directive text into `(tag, payload)` pairs.
//!
//! Several directives may share one line with nothing but the directive
//! indicator between them. An indicator only starts a new directive when it
//! is outside every quoted string and bracket pair, so payloads such as
//! `{ regex: "^.+@.+$" }` stay intact.

use crate::parser::line::{DIRECTIVE_INDICATOR, leading_tag};

/// One directive as written: its tag name and raw payload text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDirective<'a> {
    /// Tag name without the indicator.
    pub tag: &'a str,
    /// Payload text, trimmed, with one trailing separator comma removed.
    pub payload: &'a str,
    /// Byte offset of the directive indicator within the tokenized text.
    pub offset: usize,
}

/// Iterator over the directives of a piece of text.
#[derive(Debug, Clone)]
pub struct DirectiveTokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> DirectiveTokenizer<'a> {
    /// Tokenize `src`. Text before the first indicator is skipped.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Find the next top-level indicator at or after `from`.
    fn next_indicator(&self, from: usize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        let mut i = from;

        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some(q) => {
                    if b == b'\\' {
                        i += 1;
                    } else if b == q {
                        quote = None;
                    }
                }
                None => match b {
                    b'"' | b'\'' => quote = Some(b),
                    b'{' | b'[' => depth += 1,
                    b'}' | b']' => depth = depth.saturating_sub(1),
                    _ if b == DIRECTIVE_INDICATOR as u8 && depth == 0 => return Some(i),
                    _ => {}
                },
            }
            i += 1;
        }

        None
    }
}

impl<'a> Iterator for DirectiveTokenizer<'a> {
    type Item = RawDirective<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_indicator(self.pos)?;
        let tag_start = start + DIRECTIVE_INDICATOR.len_utf8();
        let tag = leading_tag(&self.src[tag_start..]);
        let payload_start = tag_start + tag.len();
        let end = self
            .next_indicator(payload_start)
            .unwrap_or(self.src.len());
        self.pos = end;

        let payload = self.src[payload_start..end].trim();
        let payload = payload.strip_suffix(',').unwrap_or(payload).trim_end();

        Some(RawDirective {
            tag,
            payload,
            offset: start,
        })
    }
}
