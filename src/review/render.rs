//! Markdown to terminal text for review output.

use crossterm::style::{Color, Stylize};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const RULE_WIDTH: usize = 40;

/// Render `markdown` for display in a terminal.
///
/// With `styled` off the output is plain text that keeps heading markers
/// and inline-code backticks. Code blocks are indented by four spaces.
pub fn render_markdown(markdown: &str, styled: bool) -> String {
    let mut state = RenderState::new(styled);
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    for event in Parser::new_ext(markdown, options) {
        state.handle(event);
    }
    state.finish()
}

struct RenderState {
    styled: bool,
    out: String,
    bold: usize,
    italic: usize,
    heading: Option<HeadingLevel>,
    /// Next number for ordered lists, `None` for bullets.
    lists: Vec<Option<u64>>,
    in_code_block: bool,
    quote_depth: usize,
    link_urls: Vec<String>,
    /// Set right after a list marker so the item's first block stays on its line.
    item_open: bool,
}

impl RenderState {
    fn new(styled: bool) -> Self {
        Self {
            styled,
            out: String::new(),
            bold: 0,
            italic: 0,
            heading: None,
            lists: Vec::new(),
            in_code_block: false,
            quote_depth: 0,
            link_urls: Vec::new(),
            item_open: false,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.write(&html, None),
            Event::SoftBreak => self.write(" ", None),
            Event::HardBreak => self.newline(),
            Event::Rule => {
                self.block_break();
                let rule = "─".repeat(RULE_WIDTH);
                self.write(&rule, Some(Color::DarkGrey));
                self.newline();
            }
            Event::TaskListMarker(done) => self.write(if done { "[x] " } else { "[ ] " }, None),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.block_break(),
            Tag::Heading { level, .. } => {
                self.block_break();
                self.heading = Some(level);
                if !self.styled {
                    let marker = format!("{} ", "#".repeat(level as usize));
                    self.write(&marker, None);
                }
            }
            Tag::BlockQuote(_) => {
                self.block_break();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.block_break();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.block_break();
                } else {
                    self.ensure_newline();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.ensure_newline();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.write(&"  ".repeat(depth), None);
                self.write(&marker, Some(Color::Cyan));
                self.item_open = true;
            }
            Tag::Emphasis => self.italic += 1,
            Tag::Strong => self.bold += 1,
            Tag::Link { dest_url, .. } => self.link_urls.push(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.newline(),
            TagEnd::Heading(_) => {
                self.heading = None;
                self.newline();
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.ensure_newline();
            }
            TagEnd::CodeBlock => {
                self.ensure_newline();
                self.in_code_block = false;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.ensure_newline();
            }
            TagEnd::Item => self.ensure_newline(),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Link => {
                if let Some(url) = self.link_urls.pop() {
                    self.write(&format!(" ({url})"), Some(Color::DarkGrey));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if !self.in_code_block {
            let color = self.heading.map(|_| Color::Magenta);
            self.write(text, color);
            return;
        }

        for line in text.split_inclusive('\n') {
            let (body, ends_line) = match line.strip_suffix('\n') {
                Some(body) => (body, true),
                None => (line, false),
            };
            if self.at_line_start() {
                self.write("    ", None);
            }
            self.write(body, Some(Color::Yellow));
            if ends_line {
                self.newline();
            }
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.styled {
            self.write(code, Some(Color::Yellow));
        } else {
            self.write(&format!("`{code}`"), None);
        }
    }

    /// Append text, prefixing quote bars at the start of a line.
    fn write(&mut self, text: &str, color: Option<Color>) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start() && self.quote_depth > 0 {
            let bars = "│ ".repeat(self.quote_depth);
            self.push_styled(&bars, Some(Color::DarkGrey), false, false);
        }
        let bold = self.bold > 0 || self.heading.is_some();
        let italic = self.italic > 0;
        self.push_styled(text, color, bold, italic);
        self.item_open = false;
    }

    fn push_styled(&mut self, text: &str, color: Option<Color>, bold: bool, italic: bool) {
        if !self.styled {
            self.out.push_str(text);
            return;
        }
        let mut content = text.stylize();
        if bold {
            content = content.bold();
        }
        if italic {
            content = content.italic();
        }
        if let Some(color) = color {
            content = content.with(color);
        }
        self.out.push_str(&content.to_string());
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn newline(&mut self) {
        self.out.push('\n');
    }

    fn ensure_newline(&mut self) {
        if !self.at_line_start() {
            self.newline();
        }
    }

    /// Separate a new block from the previous one by a blank line.
    fn block_break(&mut self) {
        if self.item_open || self.out.is_empty() {
            return;
        }
        self.ensure_newline();
        if !self.out.ends_with("\n\n") && self.lists.is_empty() {
            self.newline();
        }
    }

    fn finish(self) -> String {
        let mut out = self.out.trim_end().to_string();
        out.push('\n');
        out
    }
}
