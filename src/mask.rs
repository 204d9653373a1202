//! Placeholder masking for spans that a later rewrite must not touch.
//!
//! A [`Mask`] swaps text out for numbered tokens, lets other rules run over the
//! document, then swaps the original text back in. Tokens are delimited by a
//! private-use code point that does not occur in the input, so they can never
//! be confused with document content.

use std::ops::RangeInclusive;

const PRIVATE_USE: [RangeInclusive<u32>; 2] = [0xE000..=0xF8FF, 0xF0000..=0xFFFFD];

pub struct Mask {
    sentinel: char,
    spans: Vec<String>,
}

impl Mask {
    /// Create a mask whose tokens cannot collide with anything in `text`.
    pub fn for_text(text: &str) -> Self {
        let sentinel = PRIVATE_USE
            .into_iter()
            .flatten()
            .filter_map(char::from_u32)
            .find(|c| !text.contains(*c))
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        Self {
            sentinel,
            spans: Vec::new(),
        }
    }

    /// Store `span` and return the token that stands in for it.
    pub fn hide(&mut self, span: impl Into<String>) -> String {
        let idx = self.spans.len();
        self.spans.push(span.into());
        format!("{s}{idx}{s}", s = self.sentinel)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Replace every token in `text` with the span it was issued for.
    ///
    /// Stored spans may themselves contain earlier tokens; those are resolved
    /// too, so no token survives.
    pub fn reveal(&self, text: &str) -> String {
        if self.is_empty() || !text.contains(self.sentinel) {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        // Sentinels only come from tokens, so odd segments are always indices.
        for (i, segment) in text.split(self.sentinel).enumerate() {
            if i % 2 == 0 {
                out.push_str(segment);
                continue;
            }
            match segment.parse::<usize>().ok().and_then(|idx| self.spans.get(idx)) {
                Some(span) => out.push_str(&self.reveal(span)),
                None => {
                    out.push(self.sentinel);
                    out.push_str(segment);
                    out.push(self.sentinel);
                }
            }
        }
        out
    }
}
