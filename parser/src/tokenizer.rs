//! The tokenizer: turns a UTF-8 source buffer into two parallel arrays,
//! `TokenKind`s and their `ByteRange`s, terminated by a sentinel `Eof`.
//!
//! Scanning is single-pass and never fails: a byte sequence the lexer can't
//! classify becomes a `TokenKind::Invalid` token rather than aborting, so
//! the parser always gets a complete token stream to recover around.

use corec_ast::{TokenKind, KEYWORDS};
use corec_span::{BytePos, ByteRange};
use std::iter::Peekable;
use std::str::CharIndices;

pub struct TokenizedSource {
    pub kinds: Vec<TokenKind>,
    pub locs: Vec<ByteRange>,
}

pub fn tokenize(source: &str) -> TokenizedSource {
    let mut lexer = Lexer::new(source);
    let mut kinds = Vec::new();
    let mut locs = Vec::new();

    loop {
        let (kind, range) = lexer.next_token();
        let is_eof = matches!(kind, TokenKind::Eof);
        kinds.push(kind);
        locs.push(range);
        if is_eof {
            break;
        }
    }

    TokenizedSource { kinds, locs }
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, chars: source.char_indices().peekable(), len: source.len() }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(offset..)?.chars().next()
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn cur_pos(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.len)
    }

    fn range(&self, start: usize, end: usize) -> ByteRange {
        ByteRange::new(BytePos::from_usize(start), BytePos::from_usize(end))
    }

    fn next_token(&mut self) -> (TokenKind, ByteRange) {
        self.skip_whitespace();

        let start = self.cur_pos();
        let Some((_, c)) = self.bump() else {
            return (TokenKind::Eof, self.range(start, start));
        };

        let kind = match c {
            '/' => self.lex_slash(),
            c if c.is_ascii_digit() => self.lex_number(c),
            c if is_ident_start(c) => self.lex_ident_or_keyword(start),
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            '\\' if self.peek_char() == Some('\\') => self.lex_multiline_string_line(),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '~' => TokenKind::Tilde,
            '?' => TokenKind::Question,
            '@' => self.lex_at(),
            '.' => self.lex_dot(),
            '!' => self.lex_one_or_two('=', TokenKind::Bang, TokenKind::BangEqual),
            '=' => self.lex_equal(),
            '<' => self.lex_angle('<', TokenKind::Less, TokenKind::LessEqual, TokenKind::ShiftLeft, TokenKind::ShiftLeftEqual),
            '>' => self.lex_angle('>', TokenKind::Greater, TokenKind::GreaterEqual, TokenKind::ShiftRight, TokenKind::ShiftRightEqual),
            '&' => self.lex_amp(),
            '|' => self.lex_pipe(),
            '^' => self.lex_one_or_two('=', TokenKind::Caret, TokenKind::CaretEqual),
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '%' => self.lex_one_or_two('=', TokenKind::Percent, TokenKind::PercentEqual),
            _ => TokenKind::Invalid,
        };

        let end = self.cur_pos();
        (kind, self.range(start, end))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat_if(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn lex_one_or_two(&mut self, next: char, one: TokenKind, two: TokenKind) -> TokenKind {
        if self.eat_if(next) {
            two
        } else {
            one
        }
    }

    fn lex_equal(&mut self) -> TokenKind {
        if self.eat_if('=') {
            TokenKind::EqualEqual
        } else if self.eat_if('>') {
            TokenKind::FatArrow
        } else {
            TokenKind::Equal
        }
    }

    fn lex_angle(&mut self, ch: char, lt: TokenKind, lt_eq: TokenKind, shift: TokenKind, shift_eq: TokenKind) -> TokenKind {
        if self.eat_if(ch) {
            if self.eat_if('=') {
                shift_eq
            } else {
                shift
            }
        } else if self.eat_if('=') {
            lt_eq
        } else {
            lt
        }
    }

    fn lex_amp(&mut self) -> TokenKind {
        if self.eat_if('&') {
            TokenKind::AmpAmp
        } else if self.eat_if('=') {
            TokenKind::AmpEqual
        } else {
            TokenKind::Amp
        }
    }

    fn lex_pipe(&mut self) -> TokenKind {
        if self.eat_if('|') {
            TokenKind::PipePipe
        } else if self.eat_if('=') {
            TokenKind::PipeEqual
        } else {
            TokenKind::Pipe
        }
    }

    fn lex_plus(&mut self) -> TokenKind {
        if self.eat_if('+') {
            TokenKind::PlusPlus
        } else if self.eat_if('%') {
            if self.eat_if('=') {
                TokenKind::PlusPercentEqual
            } else {
                TokenKind::PlusPercent
            }
        } else if self.eat_if('=') {
            TokenKind::PlusEqual
        } else {
            TokenKind::Plus
        }
    }

    fn lex_minus(&mut self) -> TokenKind {
        if self.eat_if('>') {
            TokenKind::Arrow
        } else if self.eat_if('%') {
            if self.eat_if('=') {
                TokenKind::MinusPercentEqual
            } else {
                TokenKind::MinusPercent
            }
        } else if self.eat_if('=') {
            TokenKind::MinusEqual
        } else {
            TokenKind::Minus
        }
    }

    fn lex_star(&mut self) -> TokenKind {
        if self.eat_if('*') {
            TokenKind::StarStar
        } else if self.eat_if('%') {
            if self.eat_if('=') {
                TokenKind::StarPercentEqual
            } else {
                TokenKind::StarPercent
            }
        } else if self.eat_if('=') {
            TokenKind::StarEqual
        } else {
            TokenKind::Star
        }
    }

    fn lex_dot(&mut self) -> TokenKind {
        if self.eat_if('.') {
            if self.eat_if('.') {
                TokenKind::DotDotDot
            } else {
                TokenKind::DotDot
            }
        } else if self.eat_if('*') {
            TokenKind::DotStar
        } else if self.eat_if('?') {
            TokenKind::DotQuestion
        } else {
            TokenKind::Dot
        }
    }

    fn lex_slash(&mut self) -> TokenKind {
        if self.peek_char() == Some('/') {
            self.bump();
            // `///` is a doc comment, `//!` a container doc comment, plain `//` trivia.
            let kind = match self.peek_char() {
                Some('/') if { let pos = self.cur_pos(); self.peek_at(pos + 1) } != Some('/') => {
                    self.bump();
                    TokenKind::DocComment
                }
                Some('!') => {
                    self.bump();
                    TokenKind::ContainerDocComment
                }
                _ => TokenKind::LineComment,
            };
            while !matches!(self.peek_char(), None | Some('\n')) {
                self.bump();
            }
            kind
        } else if self.eat_if('=') {
            TokenKind::SlashEqual
        } else {
            TokenKind::Slash
        }
    }

    fn lex_number(&mut self, first: char) -> TokenKind {
        let mut is_float = false;
        if first == '0' && matches!(self.peek_char(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            self.bump();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                self.bump();
            }
            return TokenKind::IntegerLiteral;
        }
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.bump();
        }
        if self.peek_char() == Some('.') && { let pos = self.cur_pos(); self.peek_at(pos + 1) }.is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.bump();
            }
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.bump();
            }
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        if is_float { TokenKind::FloatLiteral } else { TokenKind::IntegerLiteral }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> TokenKind {
        while matches!(self.peek_char(), Some(c) if is_ident_continue(c)) {
            self.bump();
        }
        let end = self.cur_pos();
        let text = &self.source[start..end];
        if text == "_" {
            return TokenKind::Identifier;
        }
        for (kw, kind) in KEYWORDS {
            if *kw == text {
                return kind.clone();
            }
        }
        TokenKind::Identifier
    }

    /// `@` followed directly by identifier characters is a builtin call name
    /// (`@intCast`, `@import`, ...); a lone `@` is invalid in this grammar.
    fn lex_at(&mut self) -> TokenKind {
        if matches!(self.peek_char(), Some(c) if c.is_ascii_alphabetic() || c == '_') {
            while matches!(self.peek_char(), Some(c) if is_ident_continue(c)) {
                self.bump();
            }
            TokenKind::Builtin
        } else {
            TokenKind::At
        }
    }

    fn lex_string(&mut self) -> TokenKind {
        loop {
            match self.bump() {
                None | Some((_, '"')) => break,
                Some((_, '\\')) => {
                    self.bump();
                }
                _ => {}
            }
        }
        TokenKind::StringLiteral
    }

    fn lex_char(&mut self) -> TokenKind {
        loop {
            match self.bump() {
                None | Some((_, '\'')) => break,
                Some((_, '\\')) => {
                    self.bump();
                }
                _ => {}
            }
        }
        TokenKind::CharLiteral
    }

    /// A `\\` begins a multiline string literal line that runs to end-of-line.
    fn lex_multiline_string_line(&mut self) -> TokenKind {
        self.bump(); // second backslash
        while !matches!(self.peek_char(), None | Some('\n')) {
            self.bump();
        }
        TokenKind::MultilineStringLiteralLine
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
