//! Markup lexer using logos
//!
//! Two lexers: [`Token`] splits a fragment into tags and text, and
//! [`AttrToken`] splits the inside of a start tag into attribute parts.

use logos::{Lexer, Logos};

/// Markup tokens
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    /// `<!-- ... -->`, body consumed by callback
    #[token("<!--", comment)]
    Comment(&'src str),

    /// `<!DOCTYPE ...>` and other declarations
    #[regex(r"<![a-zA-Z][^>]*>")]
    Declaration,

    /// `<tag attr="value" ...>` or `<tag ... />`
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9-]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    StartTag(&'src str),

    /// `</tag>`
    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", |lex| lex.slice())]
    EndTag(&'src str),

    /// Character data between tags
    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

fn comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let rest = lex.remainder();
    let end = rest.find("-->")?;
    lex.bump(end + 3);
    Some(&rest[..end])
}

/// Attribute tokens inside a start tag
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum AttrToken<'src> {
    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    DoubleQuoted(&'src str),

    #[regex(r#"'[^']*'"#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    SingleQuoted(&'src str),

    /// Attribute name or unquoted value
    #[regex(r#"[^ \t\r\n"'=]+"#, |lex| lex.slice())]
    Word(&'src str),
}

/// Split a start tag (`<a href="#" class=btn>`) into its name, the raw
/// attribute source, and whether it was written self-closing.
pub fn split_start_tag(raw: &str) -> (&str, &str, bool) {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };
    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(inner.len());
    (&inner[..name_end], &inner[name_end..], self_closing)
}

/// Tag name of an end tag (`</div >` → `div`)
pub fn end_tag_name(raw: &str) -> &str {
    raw.trim_start_matches("</").trim_end_matches('>').trim()
}

/// Tokenize a fragment, keeping byte offsets for error reporting
///
/// Unlexable input (a lone `<`) is reported as `Err(offset)`.
pub fn tokenize(source: &str) -> Vec<(Result<Token<'_>, usize>, usize)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let start = lexer.span().start;
        tokens.push((result.map_err(|_| start), start));
    }
    tokens
}
