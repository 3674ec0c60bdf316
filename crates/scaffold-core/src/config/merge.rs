//! Idempotent, non-destructive merge of [`ConfigFragments`] into a config document
//!
//! The document is never re-serialized. Each fragment category is located with the
//! tokenizer in [`super::syntax`] and the required text is spliced in at the right
//! offsets, so formatting, comments and unrelated properties survive untouched.
//! Categories are applied in a fixed order (modules, css, then the blocks) and every
//! step re-scans the text produced by the previous one.

use super::fragments::{ConfigFragments, PropertyBlock};
use super::syntax::{self, Entry, Property, Token, TokenKind};
use thiserror::Error;

const DEFAULT_INDENT: &str = "  ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("no `defineNuxtConfig({{ ... }})` or `export default {{ ... }}` object found")]
    RootNotFound,
}

/// Result of a merge: the new text plus what changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub text: String,
    /// One entry per insertion, e.g. `modules += '@nuxt/ui'`
    pub added: Vec<String>,
    /// Properties that exist but could not be extended (not an array literal)
    pub skipped: Vec<String>,
}

impl MergeReport {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Merge `fragments` into `existing`, returning the merged text.
///
/// Entries already present are left alone, so merging the same fragments twice is a
/// no-op the second time. Existing text is only ever added to.
pub fn merge(existing: &str, fragments: &ConfigFragments) -> Result<MergeReport, MergeError> {
    Document::parse(existing)?;

    let mut report = MergeReport {
        text: existing.to_string(),
        ..Default::default()
    };

    merge_array(&mut report, "modules", &fragments.modules)?;
    merge_array(&mut report, "css", &fragments.stylesheets)?;
    for block in &fragments.blocks {
        merge_block(&mut report, block)?;
    }

    Ok(report)
}

fn merge_array(report: &mut MergeReport, key: &str, wanted: &[String]) -> Result<(), MergeError> {
    if wanted.is_empty() {
        return Ok(());
    }

    let doc = Document::parse(&report.text)?;
    let (text, added) = match doc.property(key) {
        Some(property) => {
            let Some((open, close)) = doc.array_bounds(property) else {
                report.skipped.push(format!("{key} (not an array literal)"));
                return Ok(());
            };
            let items = syntax::entries(&doc.tokens, open, close);
            let present: Vec<&str> = items.iter().filter_map(|item| doc.item_name(item)).collect();
            let missing = missing_entries(wanted, &present);
            if missing.is_empty() {
                return Ok(());
            }

            let quote = doc.quote_style(&items);
            let rendered: Vec<String> = missing.iter().map(|m| quoted(m, quote)).collect();
            (doc.extend_array(open, close, &items, &rendered), rendered)
        }
        None => {
            let rendered: Vec<String> = missing_entries(wanted, &[])
                .iter()
                .map(|m| quoted(m, '\''))
                .collect();
            let value = render_array(&rendered, doc.indent());
            (doc.insert_property(key, &value), rendered)
        }
    };

    report.text = text;
    report
        .added
        .extend(added.into_iter().map(|entry| format!("{key} += {entry}")));
    Ok(())
}

fn merge_block(report: &mut MergeReport, block: &PropertyBlock) -> Result<(), MergeError> {
    let doc = Document::parse(&report.text)?;
    let Some(property) = doc.property(&block.key) else {
        let value = reindent(&block.value, doc.indent());
        report.text = doc.insert_property(&block.key, &value);
        report.added.push(format!("{} block", block.key));
        return Ok(());
    };

    let Some((open, close)) = object_bounds(&doc.tokens, property) else {
        report
            .skipped
            .push(format!("{} (not an object literal)", block.key));
        return Ok(());
    };
    let Some(snippet) = Snippet::parse(&block.value) else {
        return Ok(());
    };

    let mut edits = Vec::new();
    let mut added = Vec::new();
    doc.merge_object(
        (open, close),
        &snippet,
        (0, snippet.close),
        &block.key,
        &mut edits,
        &mut added,
    );
    if edits.is_empty() {
        return Ok(());
    }

    report.text = apply_edits(doc.source, edits);
    report.added.extend(added);
    Ok(())
}

/// Bounds of a property's value when it is an object literal
fn object_bounds(tokens: &[Token], property: &Property) -> Option<(usize, usize)> {
    let open = property.value().filter(|&v| tokens[v].is(b'{'))?;
    let close = syntax::matching(tokens, open)?;
    (close <= property.entry.last).then_some((open, close))
}

/// A fragment value that is an object literal, e.g. `{ storage: { ... } }`
struct Snippet<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    close: usize,
}

impl<'a> Snippet<'a> {
    fn parse(source: &'a str) -> Option<Self> {
        let tokens = syntax::tokenize(source);
        if !tokens.first()?.is(b'{') {
            return None;
        }
        let close = syntax::matching(&tokens, 0)?;
        Some(Self {
            source,
            tokens,
            close,
        })
    }

    fn entry_text(&self, entry: &Entry) -> &'a str {
        &self.source[self.tokens[entry.first].start..self.tokens[entry.last].end]
    }
}

/// Move the continuation lines of `text` from indentation `from` to `to`
fn relocate(text: &str, from: &str, to: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 || line.trim().is_empty() {
                line.to_string()
            } else {
                let line = line.strip_prefix(from).unwrap_or_else(|| line.trim_start());
                format!("{to}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fold a multi-line snippet onto one line
fn collapse(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Entries of `wanted` not in `present`, without repeats, in `wanted` order
fn missing_entries<'a>(wanted: &'a [String], present: &[&str]) -> Vec<&'a str> {
    let mut missing: Vec<&str> = Vec::new();
    for entry in wanted {
        if !present.contains(&entry.as_str()) && !missing.contains(&entry.as_str()) {
            missing.push(entry);
        }
    }
    missing
}

fn quoted(value: &str, quote: char) -> String {
    let escaped = value.replace(quote, &format!("\\{quote}"));
    format!("{quote}{escaped}{quote}")
}

fn render_array(items: &[String], indent: &str) -> String {
    let mut out = String::from("[\n");
    for (idx, item) in items.iter().enumerate() {
        out.push_str(indent);
        out.push_str(indent);
        out.push_str(item);
        if idx + 1 < items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(indent);
    out.push(']');
    out
}

/// Indent every line after the first by `indent`
fn reindent(value: &str, indent: &str) -> String {
    value
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply insertions; insertions at the same offset keep their push order
fn apply_edits(source: &str, edits: Vec<(usize, String)>) -> String {
    let mut edits: Vec<(usize, usize, String)> = edits
        .into_iter()
        .enumerate()
        .map(|(seq, (pos, text))| (pos, seq, text))
        .collect();
    edits.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let mut out = source.to_string();
    for (pos, _, text) in edits {
        out.insert_str(pos, &text);
    }
    out
}

/// A tokenized config document with its root object located
struct Document<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    open: usize,
    close: usize,
    properties: Vec<Property>,
}

impl<'a> Document<'a> {
    fn parse(source: &'a str) -> Result<Self, MergeError> {
        let tokens = syntax::tokenize(source);
        let (open, close) = syntax::root_object(source, &tokens).ok_or(MergeError::RootNotFound)?;
        let properties = syntax::properties(source, &tokens, open, close);
        Ok(Self {
            source,
            tokens,
            open,
            close,
            properties,
        })
    }

    fn property(&self, key: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.key.as_deref() == Some(key))
    }

    /// Indentation used for top-level properties
    fn indent(&self) -> &'a str {
        self.properties
            .first()
            .map(|p| syntax::line_indent(self.source, self.tokens[p.entry.first].start))
            .filter(|indent| !indent.is_empty())
            .unwrap_or(DEFAULT_INDENT)
    }

    fn array_bounds(&self, property: &Property) -> Option<(usize, usize)> {
        let open = property.value().filter(|&v| self.tokens[v].is(b'['))?;
        let close = syntax::matching(&self.tokens, open)?;
        (close <= property.entry.last).then_some((open, close))
    }

    /// The string an array item stands for: `'id'` or the first element of `['id', { ... }]`
    fn item_name(&self, item: &Entry) -> Option<&'a str> {
        let first = self.tokens[item.first];
        let literal = match first.kind {
            TokenKind::Str => first,
            TokenKind::Punct(b'[') if item.first < item.last => {
                let next = self.tokens[item.first + 1];
                (next.kind == TokenKind::Str).then_some(next)?
            }
            _ => return None,
        };
        Some(syntax::unquote(literal.text(self.source)))
    }

    fn quote_style(&self, items: &[Entry]) -> char {
        items
            .iter()
            .map(|item| self.tokens[item.first])
            .find(|token| token.kind == TokenKind::Str)
            .and_then(|token| token.text(self.source).chars().next())
            .filter(|quote| *quote != '`')
            .unwrap_or('\'')
    }

    fn extend_array(&self, open: usize, close: usize, items: &[Entry], rendered: &[String]) -> String {
        let open_end = self.tokens[open].end;
        let close_start = self.tokens[close].start;
        let inner = &self.source[open_end..close_start];
        let multiline = inner.contains('\n');

        let edit = match items.last() {
            None if !multiline && inner.trim().is_empty() => {
                return format!(
                    "{}{}{}",
                    &self.source[..open_end],
                    rendered.join(", "),
                    &self.source[close_start..]
                );
            }
            None if !multiline => (open_end, rendered.join(", ")),
            None => {
                let indent = format!(
                    "{}{}",
                    syntax::line_indent(self.source, close_start),
                    self.indent()
                );
                let lines: Vec<String> = rendered.iter().map(|r| format!("\n{indent}{r}")).collect();
                (open_end, lines.join(","))
            }
            Some(last) if multiline => {
                let indent = syntax::line_indent(self.source, self.tokens[last.first].start);
                match last.comma {
                    Some(comma) => (
                        self.tokens[comma].end,
                        rendered.iter().map(|r| format!("\n{indent}{r},")).collect(),
                    ),
                    None => (
                        self.tokens[last.last].end,
                        rendered.iter().map(|r| format!(",\n{indent}{r}")).collect(),
                    ),
                }
            }
            Some(last) => match last.comma {
                Some(comma) => (
                    self.tokens[comma].end,
                    rendered.iter().map(|r| format!(" {r},")).collect(),
                ),
                None => (
                    self.tokens[last.last].end,
                    rendered.iter().map(|r| format!(", {r}")).collect(),
                ),
            },
        };

        apply_edits(self.source, vec![edit])
    }

    /// Collect the edits adding the keys of the snippet object `wanted` that the object
    /// spanning `target` lacks. Keys present on both sides with object values are merged
    /// recursively; any other present key keeps its existing value.
    fn merge_object(
        &self,
        target: (usize, usize),
        snippet: &Snippet<'_>,
        wanted: (usize, usize),
        path: &str,
        edits: &mut Vec<(usize, String)>,
        added: &mut Vec<String>,
    ) {
        let (open, close) = target;
        let present = syntax::properties(self.source, &self.tokens, open, close);
        let mut missing = Vec::new();

        for property in syntax::properties(snippet.source, &snippet.tokens, wanted.0, wanted.1) {
            let Some(key) = property.key.as_deref() else {
                continue;
            };
            let existing = present.iter().find(|p| p.key.as_deref() == Some(key));
            match existing {
                None => missing.push(property),
                Some(existing) => {
                    let inner = object_bounds(&self.tokens, existing);
                    let nested = object_bounds(&snippet.tokens, &property);
                    if let (Some(inner), Some(nested)) = (inner, nested) {
                        let path = format!("{path}.{key}");
                        self.merge_object(inner, snippet, nested, &path, edits, added);
                    }
                }
            }
        }
        if missing.is_empty() {
            return;
        }

        let open_end = self.tokens[open].end;
        let close_start = self.tokens[close].start;
        let multiline = self.source[open_end..close_start].contains('\n');

        if multiline {
            let indent = match present.first() {
                Some(first) => syntax::line_indent(self.source, self.tokens[first.entry.first].start)
                    .to_string(),
                None => format!(
                    "{}{}",
                    syntax::line_indent(self.source, close_start),
                    self.indent()
                ),
            };
            if let Some(last) = present.last() {
                if last.entry.comma.is_none() {
                    edits.push((self.tokens[last.entry.last].end, ",".to_string()));
                }
            }
            let rendered: String = missing
                .iter()
                .map(|property| {
                    let base = syntax::line_indent(
                        snippet.source,
                        snippet.tokens[property.entry.first].start,
                    );
                    let text = relocate(snippet.entry_text(&property.entry), base, &indent);
                    format!("{indent}{text},\n")
                })
                .collect();

            let line_start = self.source[..close_start].rfind('\n').map_or(0, |n| n + 1);
            if self.source[line_start..close_start].trim().is_empty() {
                edits.push((line_start, rendered));
            } else {
                let closing = syntax::line_indent(self.source, close_start);
                edits.push((close_start, format!("\n{rendered}{closing}")));
            }
        } else {
            let joined = missing
                .iter()
                .map(|property| collapse(snippet.entry_text(&property.entry)))
                .collect::<Vec<_>>()
                .join(", ");
            let edit = match present.last() {
                None => (open_end, format!(" {joined} ")),
                Some(last) => match last.entry.comma {
                    Some(comma) => (self.tokens[comma].end, format!(" {joined},")),
                    None => (self.tokens[last.entry.last].end, format!(", {joined}")),
                },
            };
            edits.push(edit);
        }

        added.extend(
            missing
                .iter()
                .filter_map(|property| property.key.as_deref())
                .map(|key| format!("{path}.{key}")),
        );
    }

    /// Add `key: value,` as the last property of the root object
    fn insert_property(&self, key: &str, value: &str) -> String {
        let indent = self.indent();
        let mut edits = Vec::new();

        if let Some(last) = self.properties.last() {
            if last.entry.comma.is_none() {
                edits.push((self.tokens[last.entry.last].end, ",".to_string()));
            }
        }

        let close_start = self.tokens[self.close].start;
        let line_start = self.source[..close_start].rfind('\n').map_or(0, |n| n + 1);
        let property = format!("{indent}{key}: {value},\n");
        let close_on_own_line = line_start > self.tokens[self.open].end
            && self.source[line_start..close_start].trim().is_empty();

        if close_on_own_line {
            edits.push((line_start, property));
        } else {
            edits.push((close_start, format!("\n{property}")));
        }

        apply_edits(self.source, edits)
    }
}
