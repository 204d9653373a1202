//! Convert Markdown documents to Slack message formatting.
//!
//! Slack's formatting differs from Markdown in a few places:
//! - Bold: `*text*` (not `**text**`), headings become bold lines
//! - Italic: `_text_`
//! - Lists: `•` bullets, `◦` for the second level
//! - Links: `text (url)`
//! - Block quotes: indented by four spaces
//! - Code fences carry no language tag
//! - Tables are rendered as aligned text inside a code fence
//!
//! ```
//! assert_eq!(md2slack::convert("**bold** and *italic*"), "*bold* and _italic_");
//! ```

pub mod io;
mod mask;
pub mod mrkdwn;
pub mod table;

pub use mrkdwn::convert;
