use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::mask::Mask;
use crate::table;

struct Patterns {
    md_heading: Regex,
    md_bold: Regex,
    md_italic: Regex,
    fenced_code: Regex,
    md_ul_dash: Regex,
    md_ul_nested: Regex,
    md_link: Regex,
    md_blockquote: Regex,
}

static RE: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    md_heading: Regex::new(r"(?m)^#{1,3} ([^\r\n]*)").unwrap(),
    md_bold: Regex::new(r"\*\*(.*?)\*\*").unwrap(),
    md_italic: Regex::new(r"\*([^*\n]+)\*").unwrap(),
    fenced_code: Regex::new(r"(?s)```[^`\s]*\n(.*?)```").unwrap(),
    md_ul_dash: Regex::new(r"(?m)^- ").unwrap(),
    md_ul_nested: Regex::new(r"(?m)^  - ").unwrap(),
    md_link: Regex::new(r"\[([^\]\n]+)\]\(([^)\n]+)\)").unwrap(),
    md_blockquote: Regex::new(r"(?m)^> ").unwrap(),
});

/// Convert a Markdown document to Slack message formatting.
///
/// Never fails: constructs that are not recognized are left as they are.
pub fn convert(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut mask = Mask::for_text(input);

    // Headings and bold produce single-asterisk bold, which the italic rule
    // would otherwise pick up. Their asterisks stay masked until it has run.
    let text = rewrite_headings(input, &mut mask);
    let text = rewrite_bold(&text, &mut mask);
    let text = rewrite_italic(&text);
    trace!(masked = mask.len(), "restoring bold spans");
    let text = mask.reveal(&text);

    let text = rewrite_code_fences(&text);
    let text = rewrite_lists(&text);
    let text = rewrite_links(&text);
    let text = rewrite_blockquotes(&text);

    table::reformat_tables(&text)
}

/// `# Title` through `### Title` → `*Title*`.
///
/// Only the surrounding asterisks are masked; emphasis inside the heading is
/// still converted by the later rules.
fn rewrite_headings(text: &str, mask: &mut Mask) -> String {
    RE.md_heading
        .replace_all(text, |caps: &regex::Captures| {
            let open = mask.hide("*");
            let close = mask.hide("*");
            format!("{}{}{}", open, &caps[1], close)
        })
        .into_owned()
}

/// `**bold**` → `*bold*`, masked as a whole.
fn rewrite_bold(text: &str, mask: &mut Mask) -> String {
    RE.md_bold
        .replace_all(text, |caps: &regex::Captures| mask.hide(format!("*{}*", &caps[1])))
        .into_owned()
}

/// `*italic*` → `_italic_`.
fn rewrite_italic(text: &str) -> String {
    RE.md_italic.replace_all(text, "_${1}_").into_owned()
}

/// Drop the language tag from fenced code blocks.
fn rewrite_code_fences(text: &str) -> String {
    RE.fenced_code.replace_all(text, "```\n${1}```").into_owned()
}

/// `- item` → `• item`, `  - item` → `  ◦ item`. Ordered lists are kept.
fn rewrite_lists(text: &str) -> String {
    let text = RE.md_ul_dash.replace_all(text, "\u{2022} ");
    RE.md_ul_nested.replace_all(&text, "  \u{25E6} ").into_owned()
}

/// `[text](url)` → `text (url)`.
fn rewrite_links(text: &str) -> String {
    RE.md_link.replace_all(text, "$1 ($2)").into_owned()
}

/// `> quote` → four-space indent.
fn rewrite_blockquotes(text: &str) -> String {
    RE.md_blockquote.replace_all(text, "    ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn has_private_use(text: &str) -> bool {
        text.chars()
            .any(|c| ('\u{E000}'..='\u{F8FF}').contains(&c) || c >= '\u{F0000}')
    }

    // === Basic formatting ===

    #[test]
    fn test_bold() {
        assert_eq!(convert("**bold**"), "*bold*");
    }

    #[test]
    fn test_italic() {
        assert_eq!(convert("*italic*"), "_italic_");
    }

    #[test]
    fn test_bold_survives_italic_pass() {
        assert_eq!(convert("**bold** and *italic*"), "*bold* and _italic_");
    }

    #[test]
    fn test_italic_stays_on_one_line() {
        assert_eq!(convert("* a\n* b"), "* a\n* b");
        assert_eq!(
            convert("2 * 3 is six\nand 4 * 5 is twenty"),
            "2 * 3 is six\nand 4 * 5 is twenty"
        );
        assert_eq!(convert("one *two*\nthree *four*"), "one _two_\nthree _four_");
    }

    #[test]
    fn test_consecutive_bold() {
        assert_eq!(convert("**a** **b** **c**"), "*a* *b* *c*");
    }

    #[test]
    fn test_empty_bold() {
        assert_eq!(convert("****"), "**");
    }

    #[test]
    fn test_unicode_content() {
        assert_eq!(convert("**太字**"), "*太字*");
        assert_eq!(convert("*斜体*"), "_斜体_");
    }

    #[test]
    fn test_emoji_in_bold() {
        assert_eq!(convert("**🎉 celebration 🎉**"), "*🎉 celebration 🎉*");
    }

    // === Headers ===

    #[test]
    fn test_h1() {
        assert_eq!(convert("# Title"), "*Title*");
    }

    #[test]
    fn test_h2() {
        assert_eq!(convert("## Title"), "*Title*");
    }

    #[test]
    fn test_h3() {
        assert_eq!(convert("### Title"), "*Title*");
    }

    #[test]
    fn test_h4_passthrough() {
        assert_eq!(convert("#### Title"), "#### Title");
    }

    #[test]
    fn test_hash_without_space_passthrough() {
        assert_eq!(convert("#hashtag"), "#hashtag");
    }

    #[test]
    fn test_headers_on_any_line() {
        assert_eq!(
            convert("intro\n## Section\ntext\n# Top"),
            "intro\n*Section*\ntext\n*Top*"
        );
    }

    #[test]
    fn test_header_with_crlf() {
        assert_eq!(convert("# Title\r\nbody"), "*Title*\r\nbody");
    }

    #[test]
    fn test_header_content_still_converts() {
        assert_eq!(convert("# a *b* [c](d)"), "*a _b_ c (d)*");
    }

    // === Code ===

    #[test]
    fn test_inline_code_passthrough() {
        assert_eq!(convert("use `code` here"), "use `code` here");
    }

    #[test]
    fn test_code_block_language_stripped() {
        let input = "```python\ndef hello():\n    pass\n```";
        assert_eq!(convert(input), "```\ndef hello():\n    pass\n```");
    }

    #[test]
    fn test_code_block_without_language() {
        let input = "text\n```\nlet x = 1;\n```\nmore";
        assert_eq!(convert(input), input);
    }

    #[test]
    fn test_inline_triple_backtick_keeps_prose() {
        let input = "Use ``` fences like this\nfoo\n```";
        assert_eq!(convert(input), input);
    }

    // === Lists ===

    #[test]
    fn test_unordered_list() {
        assert_eq!(convert("- item"), "\u{2022} item");
        assert_eq!(
            convert("- item 1\n- item 2"),
            "\u{2022} item 1\n\u{2022} item 2"
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(convert("  - sub"), "  \u{25E6} sub");
        assert_eq!(
            convert("- top\n  - sub\n- next"),
            "\u{2022} top\n  \u{25E6} sub\n\u{2022} next"
        );
    }

    #[test]
    fn test_deeper_list_passthrough() {
        assert_eq!(convert("    - deep"), "    - deep");
    }

    #[test]
    fn test_ordered_list_passthrough() {
        assert_eq!(convert("1. first\n2. second"), "1. first\n2. second");
    }

    // === Links ===

    #[test]
    fn test_link() {
        assert_eq!(
            convert("[text](http://example.com)"),
            "text (http://example.com)"
        );
    }

    #[test]
    fn test_link_in_sentence() {
        assert_eq!(
            convert("see [the docs](https://docs.example.com) first"),
            "see the docs (https://docs.example.com) first"
        );
    }

    #[test]
    fn test_link_does_not_cross_lines() {
        assert_eq!(convert("[a\nb](url)"), "[a\nb](url)");
    }

    // === Blockquote ===

    #[test]
    fn test_blockquote() {
        assert_eq!(convert("> quoted"), "    quoted");
        assert_eq!(convert("> a\n> b"), "    a\n    b");
    }

    #[test]
    fn test_blockquote_needs_space() {
        assert_eq!(convert(">quoted"), ">quoted");
    }

    // === Tables ===

    #[test]
    fn test_table() {
        let input = "|A|B|\n|---|---|\n|1|2|";
        assert_eq!(convert(input), "```\nA | B\n--|--\n1 | 2\n```");
    }

    #[test]
    fn test_table_with_padding() {
        let input = "| Where to look | What |\n|---|---|\n| **Reuters** | Markets |";
        assert_eq!(
            convert(input),
            "```\nWhere to look | What   \n--------------|--------\n*Reuters*     | Markets\n```"
        );
    }

    #[test]
    fn test_pipe_without_borders_passthrough() {
        assert_eq!(convert("a | b"), "a | b");
    }

    #[test]
    fn test_single_table_row_passthrough() {
        assert_eq!(convert("| A | B |"), "| A | B |");
    }

    // === Edge cases ===

    #[test]
    fn test_empty_input() {
        assert_eq!(convert(""), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        for input in [
            "hello world",
            "\n\n",
            "line one\n  indented line\n",
            "snake_case and 2 * 3",
            "price: $5 (approx)",
        ] {
            assert_eq!(convert(input), input);
        }
    }

    #[test]
    fn test_no_placeholder_leaks() {
        let input = "# Title *b*\n**c** **d** *e* **f**\n### *g*";
        let output = convert(input);
        assert!(!has_private_use(&output));
        assert!(!output.contains("**"));
    }

    #[test]
    fn test_private_use_input_preserved() {
        assert_eq!(
            convert("\u{E000}0\u{E000} **b**"),
            "\u{E000}0\u{E000} *b*"
        );
    }

    // === Re-running the conversion ===

    #[test]
    fn test_code_fence_stable() {
        let once = convert("```rust\nfn main() {}\n```");
        assert_eq!(convert(&once), once);
    }

    #[test]
    fn test_link_stable() {
        let once = convert("[text](http://example.com)");
        assert_eq!(convert(&once), once);
    }

    #[test]
    fn test_bold_not_idempotent() {
        let once = convert("**bold**");
        assert_eq!(once, "*bold*");
        assert_eq!(convert(&once), "_bold_");
    }

    // === Realistic LLM output ===

    #[test]
    fn test_llm_output() {
        let input = r#"Here's a summary:

## Key Points

1. **First point**: This is important
2. **Second point**: Also relevant

- Use `code` for examples
- Check [the docs](https://docs.example.com)
  - nested *detail*

```python
def hello():
    print("hi")
```

> Note: This is a blockquote

| Name | State |
|------|-------|
| api | ready |
| worker | stale |"#;

        let expected = r#"Here's a summary:

*Key Points*

1. *First point*: This is important
2. *Second point*: Also relevant

• Use `code` for examples
• Check the docs (https://docs.example.com)
  ◦ nested _detail_

```
def hello():
    print("hi")
```

    Note: This is a blockquote

```
Name   | State
-------|------
api    | ready
worker | stale
```"#;

        assert_eq!(convert(input), expected);
    }
}
