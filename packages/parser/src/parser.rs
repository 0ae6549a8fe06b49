use crate::ast::{is_void_element, Element, Node, NodeId, NODE_ID_ATTR};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{end_tag_name, split_start_tag, tokenize, AttrToken, Token};
use logos::Logos;

/// Parser for markup fragments
///
/// Best-effort about structure: an end tag closes the nearest open element
/// with the same name (and everything opened inside it), stray end tags are
/// ignored, and elements still open at end of input are closed there.
/// Comments and declarations are skipped. Whitespace-only text is kept
/// inside elements; at the top level, runs containing a line break are
/// source formatting and are dropped.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Result<Token<'src>, usize>, usize)>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
        }
    }

    /// Parse the fragment into top-level nodes
    pub fn parse_nodes(self) -> ParseResult<Vec<Node>> {
        let mut roots: Vec<Node> = Vec::new();
        let mut open: Vec<Element> = Vec::new();

        for (token, pos) in self.tokens {
            let token = token.map_err(ParseError::lexer_error)?;
            match token {
                Token::Comment(_) | Token::Declaration => {}

                Token::Text(raw) => {
                    if open.is_empty() && is_layout_whitespace(raw) {
                        continue;
                    }
                    let content = html_escape::decode_html_entities(raw).into_owned();
                    push_node(&mut open, &mut roots, Node::text(content));
                }

                Token::StartTag(raw) => {
                    let (name, attr_source, self_closing) = split_start_tag(raw);
                    let el = parse_element(name, attr_source, pos)?;
                    if self_closing || el.is_void() {
                        push_node(&mut open, &mut roots, Node::Element(el));
                    } else {
                        open.push(el);
                    }
                }

                Token::EndTag(raw) => {
                    let name = end_tag_name(raw).to_ascii_lowercase();
                    if is_void_element(&name) {
                        continue;
                    }
                    let Some(depth) = open.iter().rposition(|el| el.tag == name) else {
                        tracing::debug!(pos, tag = %name, "ignoring stray end tag");
                        continue;
                    };
                    close_to(&mut open, &mut roots, depth);
                }
            }
        }

        if !open.is_empty() {
            tracing::debug!(
                pos = self.source.len(),
                open = open.len(),
                "closing elements left open at end of input"
            );
            close_to(&mut open, &mut roots, 0);
        }

        Ok(roots)
    }
}

/// Pop open elements down to `depth`, attaching each to its parent
fn close_to(open: &mut Vec<Element>, roots: &mut Vec<Node>, depth: usize) {
    while open.len() > depth {
        if let Some(el) = open.pop() {
            push_node(open, roots, Node::Element(el));
        }
    }
}

fn is_layout_whitespace(raw: &str) -> bool {
    raw.trim().is_empty() && raw.contains('\n')
}

fn push_node(open: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn parse_element(name: &str, attr_source: &str, pos: usize) -> ParseResult<Element> {
    let mut el = Element::new(name.to_ascii_lowercase());
    let mut tokens = AttrToken::lexer(attr_source).peekable();

    while let Some(token) = tokens.next() {
        let token = token.map_err(|_| ParseError::invalid_syntax(pos, "malformed attribute"))?;
        let AttrToken::Word(attr_name) = token else {
            return Err(ParseError::invalid_syntax(pos, "expected attribute name"));
        };

        let value = if matches!(tokens.peek(), Some(Ok(AttrToken::Equals))) {
            tokens.next();
            match tokens.next() {
                Some(Ok(AttrToken::DoubleQuoted(v)))
                | Some(Ok(AttrToken::SingleQuoted(v)))
                | Some(Ok(AttrToken::Word(v))) => v,
                _ => {
                    return Err(ParseError::invalid_syntax(
                        pos,
                        format!("attribute `{}` is missing a value", attr_name),
                    ));
                }
            }
        } else {
            ""
        };

        let attr_name = attr_name.to_ascii_lowercase();
        let value = html_escape::decode_html_entities(value).into_owned();
        if attr_name == NODE_ID_ATTR {
            el.id = Some(NodeId::new(value));
        } else {
            el.attributes.set(attr_name, value);
        }
    }

    Ok(el)
}

/// Parse a markup fragment into nodes
pub fn parse_fragment(source: &str) -> ParseResult<Vec<Node>> {
    Parser::new(source).parse_nodes()
}
