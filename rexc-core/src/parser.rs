//! Parser for pattern DSL source
//!
//! A recursive descent parser over the scanner's token stream. Precedence,
//! lowest to highest: alternation (`|`), concatenation (implicit), postfix
//! quantifiers binding to the immediately preceding atom.
//!
//! Directive lines (`%flags`, `%lang`, `%engine`) are handled here before
//! scanning begins; they must appear before any pattern content. Capturing
//! groups are numbered left to right by their opening parenthesis. The
//! parser permits duplicate group names syntactically; uniqueness is a
//! semantic concern checked by the compiler.
//!
//! The parser fails fast: the first error encountered aborts the parse.

use crate::ast::{ClassItem, Directives, GroupKind, Node, QuantMode};
use crate::error::{Span, SyntaxError, SyntaxErrorKind};
use crate::scanner::{GroupOpenKind, Scanner, Token, TokenKind};

/// Parse pattern source into its directives and AST
pub fn parse(source: &str) -> Result<(Directives, Node), SyntaxError> {
    let (directives, start, line) = parse_directives(source)?;
    reject_late_directives(source, start, line)?;
    let mut parser = Parser::new(source, start, line, directives.flags.extended)?;
    let root = parser.parse_pattern()?;
    Ok((directives, root))
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
    lookahead: Result<Token, SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(
        source: &'a str,
        start: usize,
        line: u32,
        extended: bool,
    ) -> Result<Self, SyntaxError> {
        let mut scanner = Scanner::with_origin(source, start, line, extended);
        let current = scanner.next_token()?;
        let lookahead = scanner.next_token();
        Ok(Parser {
            scanner,
            current,
            lookahead,
        })
    }

    /// Advance to the next token; scan errors surface when their token
    /// would be consumed, keeping error order deterministic
    fn advance(&mut self) -> Result<(), SyntaxError> {
        let next = self.scanner.next_token();
        let promoted = std::mem::replace(&mut self.lookahead, next);
        self.current = promoted?;
        Ok(())
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.lookahead.as_ref().ok().map(|t| &t.kind)
    }

    fn parse_pattern(&mut self) -> Result<Node, SyntaxError> {
        let root = self.parse_alt()?;
        if matches!(self.current.kind, TokenKind::Eof) {
            Ok(root)
        } else {
            Err(SyntaxError::new(
                SyntaxErrorKind::UnmatchedCloseParen,
                self.current.span,
            ))
        }
    }

    /// alternation := sequence ( '|' sequence )*
    fn parse_alt(&mut self) -> Result<Node, SyntaxError> {
        if matches!(self.current.kind, TokenKind::Pipe) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::AlternationMissingOperand,
                self.current.span,
            ));
        }

        let first = self.parse_seq()?;
        if !matches!(self.current.kind, TokenKind::Pipe) {
            return Ok(first);
        }

        let mut branches = vec![first];
        while matches!(self.current.kind, TokenKind::Pipe) {
            let pipe_span = self.current.span;
            self.advance()?;
            if matches!(self.current.kind, TokenKind::Eof | TokenKind::Pipe) {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::AlternationMissingOperand,
                    pipe_span,
                ));
            }
            branches.push(self.parse_seq()?);
        }

        let span = branches[0].span().to(branches[branches.len() - 1].span());
        Ok(Node::Alt { branches, span })
    }

    /// sequence := quantified*
    fn parse_seq(&mut self) -> Result<Node, SyntaxError> {
        let here = self.current.span;
        let mut parts = Vec::new();

        while !matches!(
            self.current.kind,
            TokenKind::Eof | TokenKind::Pipe | TokenKind::GroupClose
        ) {
            let atom = self.parse_atom()?;
            parts.push(self.parse_quant_if_any(atom)?);
        }

        Ok(match parts.len() {
            0 => Node::Seq {
                parts,
                span: Span::new(here.start, here.start, here.line, here.column),
            },
            1 => parts.into_iter().next().unwrap(),
            _ => {
                let span = parts[0].span().to(parts[parts.len() - 1].span());
                Node::Seq { parts, span }
            }
        })
    }

    /// atom := literal | '.' | anchor | class | group | backref | property
    fn parse_atom(&mut self) -> Result<Node, SyntaxError> {
        let span = self.current.span;
        match self.current.kind.clone() {
            TokenKind::Literal(ch) => {
                self.advance()?;
                Ok(Node::Lit { ch, span })
            }
            TokenKind::Dot => {
                self.advance()?;
                Ok(Node::Dot { span })
            }
            TokenKind::Caret => {
                self.advance()?;
                Ok(Node::Anchor {
                    at: crate::ast::AnchorKind::Start,
                    span,
                })
            }
            TokenKind::Dollar => {
                self.advance()?;
                Ok(Node::Anchor {
                    at: crate::ast::AnchorKind::End,
                    span,
                })
            }
            TokenKind::Anchor(at) => {
                self.advance()?;
                Ok(Node::Anchor { at, span })
            }
            TokenKind::ClassEscape { kind, negated } => {
                self.advance()?;
                // a bare shorthand is a one-item class; `\D` negates the class
                Ok(Node::CharClass {
                    negated,
                    items: vec![ClassItem::Escape {
                        kind,
                        negated: false,
                        span,
                    }],
                    span,
                })
            }
            TokenKind::Property {
                negated,
                name,
                value,
            } => {
                self.advance()?;
                Ok(Node::UnicodeProperty {
                    negated,
                    name,
                    value,
                    span,
                })
            }
            TokenKind::Backref(target) => {
                self.advance()?;
                Ok(Node::Backref { target, span })
            }
            TokenKind::GroupOpen(open) => self.parse_group(open, span),
            TokenKind::ClassOpen => self.parse_class(span),
            TokenKind::Star
            | TokenKind::Plus
            | TokenKind::Question
            | TokenKind::Bounds { .. } => Err(SyntaxError::new(
                SyntaxErrorKind::NothingToRepeat,
                span,
            )),
            TokenKind::GroupClose => Err(SyntaxError::new(
                SyntaxErrorKind::UnmatchedCloseParen,
                span,
            )),
            // the sequence loop stops on Eof and Pipe, and class tokens
            // only appear while parse_class drives the scanner
            TokenKind::Eof
            | TokenKind::Pipe
            | TokenKind::ClassClose
            | TokenKind::ClassDash => {
                unreachable!("token {:?} cannot start an atom", self.current.kind)
            }
        }
    }

    /// group := opener alternation ')'
    fn parse_group(&mut self, open: GroupOpenKind, open_span: Span) -> Result<Node, SyntaxError> {
        self.advance()?;
        let body = self.parse_alt()?;
        if !matches!(self.current.kind, TokenKind::GroupClose) {
            // report at the opener, that is where the fix belongs
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnterminatedGroup,
                open_span,
            ));
        }
        let close_span = self.current.span;
        self.advance()?;
        let span = open_span.to(close_span);
        let body = Box::new(body);

        Ok(match open {
            GroupOpenKind::Capture => Node::Group {
                kind: GroupKind::Capture,
                body,
                span,
            },
            GroupOpenKind::NonCapture => Node::Group {
                kind: GroupKind::NonCapture,
                body,
                span,
            },
            GroupOpenKind::Named(name) => Node::Group {
                kind: GroupKind::Named(name),
                body,
                span,
            },
            GroupOpenKind::Atomic => Node::Group {
                kind: GroupKind::Atomic,
                body,
                span,
            },
            GroupOpenKind::Look { dir, negated } => Node::Look {
                dir,
                negated,
                body,
                span,
            },
        })
    }

    /// class := '[' '^'? item+ ']'
    fn parse_class(&mut self, open_span: Span) -> Result<Node, SyntaxError> {
        self.advance()?;
        let negated = if matches!(self.current.kind, TokenKind::Caret) {
            self.advance()?;
            true
        } else {
            false
        };

        let mut items = Vec::new();
        loop {
            match self.current.kind.clone() {
                TokenKind::ClassClose => break,
                TokenKind::Eof => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnterminatedClass,
                        open_span,
                    ));
                }
                TokenKind::Literal(from) => {
                    let lit_span = self.current.span;
                    self.advance()?;
                    // 'a-z' forms a range; a '-' before ']' stays literal
                    if matches!(self.current.kind, TokenKind::ClassDash)
                        && let Some(&TokenKind::Literal(to)) = self.peek_kind()
                    {
                        self.advance()?;
                        let to_span = self.current.span;
                        self.advance()?;
                        items.push(ClassItem::Range {
                            from,
                            to,
                            span: lit_span.to(to_span),
                        });
                    } else {
                        items.push(ClassItem::Lit { ch: from, span: lit_span });
                    }
                }
                TokenKind::Caret => {
                    let span = self.current.span;
                    self.advance()?;
                    items.push(ClassItem::Lit { ch: '^', span });
                }
                TokenKind::ClassDash => {
                    let span = self.current.span;
                    self.advance()?;
                    items.push(ClassItem::Lit { ch: '-', span });
                }
                TokenKind::ClassEscape { kind, negated } => {
                    let span = self.current.span;
                    self.advance()?;
                    items.push(ClassItem::Escape {
                        kind,
                        negated,
                        span,
                    });
                }
                TokenKind::Property {
                    negated,
                    name,
                    value,
                } => {
                    let span = self.current.span;
                    self.advance()?;
                    items.push(ClassItem::Property {
                        negated,
                        name,
                        value,
                        span,
                    });
                }
                kind => unreachable!("token {:?} cannot appear in a class", kind),
            }
        }

        if items.is_empty() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::EmptyClass,
                open_span.to(self.current.span),
            ));
        }
        let close_span = self.current.span;
        self.advance()?;
        Ok(Node::CharClass {
            negated,
            items,
            span: open_span.to(close_span),
        })
    }

    /// quantifier := ('*' | '+' | '?' | bounds) ('?' | '+')?
    fn parse_quant_if_any(&mut self, atom: Node) -> Result<Node, SyntaxError> {
        let (min, max) = match self.current.kind {
            TokenKind::Star => (0, None),
            TokenKind::Plus => (1, None),
            TokenKind::Question => (0, Some(1)),
            TokenKind::Bounds { min, max } => (min, max),
            _ => return Ok(atom),
        };
        let quant_span = self.current.span;

        if matches!(atom, Node::Anchor { .. }) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::QuantifierOnAnchor,
                quant_span,
            ));
        }
        if let Some(m) = max
            && min > m
        {
            return Err(SyntaxError::new(
                SyntaxErrorKind::QuantifierRange { min, max: m },
                quant_span,
            ));
        }
        self.advance()?;

        let (mode, end_span) = match self.current.kind {
            TokenKind::Question => {
                let span = self.current.span;
                self.advance()?;
                (QuantMode::Lazy, span)
            }
            TokenKind::Plus => {
                let span = self.current.span;
                self.advance()?;
                (QuantMode::Possessive, span)
            }
            _ => (QuantMode::Greedy, quant_span),
        };

        let span = atom.span().to(end_span);
        Ok(Node::Quant {
            child: Box::new(atom),
            min,
            max,
            mode,
            span,
        })
    }
}

/// Consume leading directive lines; returns the directives plus the byte
/// offset and line number where the pattern itself begins
fn parse_directives(source: &str) -> Result<(Directives, usize, u32), SyntaxError> {
    let mut directives = Directives::default();
    let mut offset = 0usize;
    let mut line_no = 1u32;

    for raw in source.split_inclusive('\n') {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            offset += raw.len();
            line_no += 1;
            continue;
        }
        if !trimmed.starts_with('%') {
            break;
        }

        let indent = raw.len() - raw.trim_start().len();
        let line_span = Span::new(
            offset + indent,
            offset + indent + trimmed.len(),
            line_no,
            indent as u32 + 1,
        );
        let body = &trimmed[1..];
        let (name, rest) = match body.find(char::is_whitespace) {
            Some(i) => (&body[..i], body[i..].trim()),
            None => (body, ""),
        };

        match name {
            "flags" => {
                let rest_offset = offset + subslice_offset(raw, rest);
                for (i, letter) in rest.char_indices() {
                    if matches!(letter, ',' | ' ' | '\t' | '[' | ']') {
                        continue;
                    }
                    if !directives.flags.set_letter(letter) {
                        let at = rest_offset + i;
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::UnknownFlag(letter),
                            Span::new(
                                at,
                                at + letter.len_utf8(),
                                line_no,
                                (subslice_offset(raw, rest) + i) as u32 + 1,
                            ),
                        ));
                    }
                }
            }
            "lang" => {
                if !rest.is_empty() {
                    directives.lang = Some(rest.to_string());
                }
            }
            "engine" => {
                if !rest.is_empty() {
                    directives.engine = Some(rest.to_string());
                }
            }
            other => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnknownDirective(other.to_string()),
                    line_span,
                ));
            }
        }

        offset += raw.len();
        line_no += 1;
    }

    Ok((directives, offset, line_no))
}

/// A directive line after pattern content has started is an error
fn reject_late_directives(source: &str, start: usize, line: u32) -> Result<(), SyntaxError> {
    let mut offset = start;
    let mut line_no = line;
    for raw in source[start..].split_inclusive('\n') {
        let lead = raw.trim_start();
        for directive in ["%flags", "%lang", "%engine"] {
            if lead.starts_with(directive) {
                let indent = raw.len() - lead.len();
                return Err(SyntaxError::new(
                    SyntaxErrorKind::MisplacedDirective,
                    Span::new(
                        offset + indent,
                        offset + indent + directive.len(),
                        line_no,
                        indent as u32 + 1,
                    ),
                ));
            }
        }
        offset += raw.len();
        line_no += 1;
    }
    Ok(())
}

/// Byte offset of `sub` within `parent`; `sub` must be a subslice of it
fn subslice_offset(parent: &str, sub: &str) -> usize {
    sub.as_ptr() as usize - parent.as_ptr() as usize
}
