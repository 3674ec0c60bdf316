//! Just enough lexing of a `nuxt.config.ts` to find its top-level structure
//!
//! The lexer skips whitespace and comments and keeps string literals whole, so brackets
//! and commas inside strings or comments never affect nesting. Everything else is
//! treated as opaque text.
//!
//! Regex literals and `${...}` substitutions inside template literals are not lexed: a
//! bracket or quote inside a regex is taken at face value, and a template literal ends at
//! its first unescaped backtick. A root object whose brackets do not balance under these
//! rules is reported as missing, which the merge surfaces as a recoverable failure.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// One of `{ } [ ] ( ) , :`
    Punct(u8),
    /// A quoted string, quotes included
    Str,
    /// An identifier or number
    Word,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is(&self, punct: u8) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// One comma-separated entry of an object or array, as inclusive token indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    pub first: usize,
    pub last: usize,
    pub comma: Option<usize>,
}

/// A top-level property of the root config object
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Property {
    pub key: Option<String>,
    pub entry: Entry,
}

impl Property {
    /// Token index where the value starts, if the entry is a `key: value` pair
    pub fn value(&self) -> Option<usize> {
        self.key.as_ref()?;
        let value = self.entry.first + 2;
        (value <= self.entry.last).then_some(value)
    }
}

pub(crate) fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        let start = i;

        let kind = match b {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'/' if next == Some(b'/') => {
                i = source[i..].find('\n').map_or(bytes.len(), |n| i + n);
                continue;
            }
            b'/' if next == Some(b'*') => {
                i = source[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2);
                continue;
            }
            b'\'' | b'"' | b'`' => {
                i = string_end(bytes, i);
                TokenKind::Str
            }
            b'{' | b'}' | b'[' | b']' | b'(' | b')' | b',' | b':' => {
                i += 1;
                TokenKind::Punct(b)
            }
            b if is_word_byte(b) => {
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                TokenKind::Word
            }
            _ => {
                i += source[i..].chars().next().map_or(1, char::len_utf8);
                TokenKind::Other
            }
        };

        tokens.push(Token {
            kind,
            start,
            end: i,
        });
    }

    tokens
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn string_end(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut j = open + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

fn is_open(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Punct(b'{' | b'[' | b'('))
}

fn is_close(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Punct(b'}' | b']' | b')'))
}

/// Index of the token closing the bracket opened at `open`. `None` when a closing bracket
/// does not pair with the innermost open one.
pub(crate) fn matching(tokens: &[Token], open: usize) -> Option<usize> {
    let mut stack = Vec::new();
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::Punct(b @ (b'{' | b'[' | b'(')) => stack.push(b),
            TokenKind::Punct(b @ (b'}' | b']' | b')')) => {
                let opened = stack.pop()?;
                let expected = match opened {
                    b'{' => b'}',
                    b'[' => b']',
                    _ => b')',
                };
                if b != expected {
                    return None;
                }
                if stack.is_empty() {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split the tokens strictly between `open` and `close` into comma-separated entries
pub(crate) fn entries(tokens: &[Token], open: usize, close: usize) -> Vec<Entry> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut first: Option<usize> = None;
    let mut last = open;

    for idx in open + 1..close {
        let token = &tokens[idx];
        if depth == 0 && token.is(b',') {
            if let Some(first) = first.take() {
                out.push(Entry {
                    first,
                    last,
                    comma: Some(idx),
                });
            }
            continue;
        }
        if is_open(token) {
            depth += 1;
        } else if is_close(token) {
            depth = depth.saturating_sub(1);
        }
        first.get_or_insert(idx);
        last = idx;
    }

    if let Some(first) = first {
        out.push(Entry {
            first,
            last,
            comma: None,
        });
    }
    out
}

/// The object passed to `defineNuxtConfig(...)`, or a plain `export default { ... }`
pub(crate) fn root_object(source: &str, tokens: &[Token]) -> Option<(usize, usize)> {
    let word = |idx: usize, text: &str| {
        tokens
            .get(idx)
            .is_some_and(|t| t.kind == TokenKind::Word && t.text(source) == text)
    };
    let punct = |idx: usize, p: u8| tokens.get(idx).is_some_and(|t| t.is(p));

    let open = (0..tokens.len())
        .find(|&i| word(i, "defineNuxtConfig") && punct(i + 1, b'(') && punct(i + 2, b'{'))
        .map(|i| i + 2)
        .or_else(|| {
            (0..tokens.len())
                .find(|&i| word(i, "export") && word(i + 1, "default") && punct(i + 2, b'{'))
                .map(|i| i + 2)
        })?;

    matching(tokens, open).map(|close| (open, close))
}

/// Top-level properties of the object spanning `open..=close`
pub(crate) fn properties(source: &str, tokens: &[Token], open: usize, close: usize) -> Vec<Property> {
    entries(tokens, open, close)
        .into_iter()
        .map(|entry| {
            let key_token = tokens[entry.first];
            let has_colon = entry.first < entry.last && tokens[entry.first + 1].is(b':');
            let key = match key_token.kind {
                TokenKind::Word if has_colon => Some(key_token.text(source).to_string()),
                TokenKind::Str if has_colon => Some(unquote(key_token.text(source)).to_string()),
                _ => None,
            };
            Property { key, entry }
        })
        .collect()
}

/// Strip the surrounding quotes of a string literal
pub(crate) fn unquote(literal: &str) -> &str {
    if literal.len() >= 2 {
        &literal[1..literal.len() - 1]
    } else {
        literal
    }
}

/// Leading whitespace of the line containing `pos`
pub(crate) fn line_indent(source: &str, pos: usize) -> &str {
    let line_start = source[..pos].rfind('\n').map_or(0, |n| n + 1);
    let line = &source[line_start..pos];
    let width = line.len() - line.trim_start().len();
    &line[..width]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_brackets_inside_strings_and_comments_are_ignored() {
        let source = "['a]', /* ] */ \"b,c\"] // ]";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Punct(b'['),
                TokenKind::Str,
                TokenKind::Punct(b','),
                TokenKind::Str,
                TokenKind::Punct(b']'),
            ]
        );
    }

    #[test]
    fn test_escaped_quotes_stay_in_string() {
        let tokens = tokenize(r"'it\'s' x");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text(r"'it\'s' x"), r"'it\'s'");
    }

    #[test]
    fn test_non_ascii_text_is_tokenized_on_char_boundaries() {
        let source = "title: 'café' → ok";
        for token in tokenize(source) {
            let _ = token.text(source);
        }
    }

    #[test]
    fn test_root_object_of_define_nuxt_config() {
        let source = "// comment\nexport default defineNuxtConfig({\n  ssr: false\n})\n";
        let tokens = tokenize(source);
        let (open, close) = root_object(source, &tokens).unwrap();
        assert!(tokens[open].is(b'{'));
        assert!(tokens[close].is(b'}'));

        let props = properties(source, &tokens, open, close);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].key.as_deref(), Some("ssr"));
        assert_eq!(props[0].entry.comma, None);
    }

    #[test]
    fn test_root_object_of_plain_export() {
        let source = "export default { modules: [] }";
        let tokens = tokenize(source);
        assert!(root_object(source, &tokens).is_some());
    }

    #[test]
    fn test_nested_properties_are_not_top_level() {
        let source = "export default defineNuxtConfig({\n  devtools: { enabled: true, modules: [] },\n  'css': [],\n  ...extra,\n})";
        let tokens = tokenize(source);
        let (open, close) = root_object(source, &tokens).unwrap();
        let keys: Vec<_> = properties(source, &tokens, open, close)
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(
            keys,
            vec![Some("devtools".to_string()), Some("css".to_string()), None]
        );
    }

    #[test]
    fn test_unbalanced_root_is_not_found() {
        let source = "export default defineNuxtConfig({\n  modules: [\n})\n";
        assert_eq!(root_object(source, &tokenize(source)), None);
    }

    #[test]
    fn test_bracket_in_regex_literal_is_not_found() {
        let source =
            "export default defineNuxtConfig({\n  routeRules: { match: /[a-z/ },\n})\n";
        assert_eq!(root_object(source, &tokenize(source)), None);
    }

    #[test]
    fn test_mismatched_bracket_kinds() {
        let tokens = tokenize("{ [ }");
        assert_eq!(matching(&tokens, 0), None);
        let tokens = tokenize("{ [ ] }");
        assert_eq!(matching(&tokens, 0), Some(3));
    }

    #[test]
    fn test_line_indent() {
        let source = "a\n    b";
        assert_eq!(line_indent(source, source.len() - 1), "    ");
        assert_eq!(line_indent(source, 0), "");
    }
}
