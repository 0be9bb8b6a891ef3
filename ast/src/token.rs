use serde::{Deserialize, Serialize};
use std::fmt;

/// Every lexical category the tokenizer can produce.
///
/// Trivia (`LineComment`, `DocComment`, `ContainerDocComment`) is present in
/// the token stream but invisible to grammar productions: the cursor's
/// `advance` and `push_back` skip line comments automatically, while doc
/// comments are peeled off explicitly before declarations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    MultilineStringLiteralLine,
    Builtin,

    // Trivia
    LineComment,
    DocComment,
    ContainerDocComment,

    // Keywords
    KeywordTest,
    KeywordComptime,
    KeywordPub,
    KeywordExport,
    KeywordExtern,
    KeywordInline,
    KeywordNoinline,
    KeywordUsingnamespace,
    KeywordThreadlocal,
    KeywordConst,
    KeywordVar,
    KeywordFn,
    KeywordStruct,
    KeywordEnum,
    KeywordUnion,
    KeywordError,
    KeywordAnyframe,
    KeywordAsync,
    KeywordAwait,
    KeywordSuspend,
    KeywordNosuspend,
    KeywordResume,
    KeywordDefer,
    KeywordErrdefer,
    KeywordIf,
    KeywordElse,
    KeywordFor,
    KeywordWhile,
    KeywordSwitch,
    KeywordBreak,
    KeywordContinue,
    KeywordReturn,
    KeywordTry,
    KeywordCatch,
    KeywordOr,
    KeywordAnd,
    KeywordOrelse,
    KeywordVolatile,
    KeywordAllowzero,
    KeywordAlign,
    KeywordLinksection,
    KeywordCallconv,
    KeywordPacked,
    KeywordOpaque,
    KeywordAnytype,
    KeywordAsm,
    KeywordTrue,
    KeywordFalse,
    KeywordNull,
    KeywordUndefined,
    KeywordUnreachable,

    // Punctuation and operators
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    DotDot,
    DotDotDot,
    DotStar,
    DotQuestion,
    Question,
    Bang,
    Tilde,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Plus,
    PlusPlus,
    PlusPercent,
    Minus,
    MinusPercent,
    Star,
    StarStar,
    StarPercent,
    Slash,
    Percent,
    ShiftLeft,
    ShiftRight,
    EqualEqual,
    BangEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    ShiftLeftEqual,
    ShiftRightEqual,
    AmpEqual,
    CaretEqual,
    PipeEqual,
    StarPercentEqual,
    PlusPercentEqual,
    MinusPercentEqual,
    Arrow,
    FatArrow,
    At,

    /// Lexer could not classify the byte(s); carried so the parser can still
    /// advance past it and report `InvalidToken`.
    Invalid,

    /// Sentinel terminating every token stream. The root's `last_token`
    /// always points here.
    Eof,
}

/// Keyword spellings, in the order the lexer tries them. Kept as a flat table
/// (rather than a hash map) since the set is small and looked up once per
/// identifier-shaped lexeme.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("test", TokenKind::KeywordTest),
    ("comptime", TokenKind::KeywordComptime),
    ("pub", TokenKind::KeywordPub),
    ("export", TokenKind::KeywordExport),
    ("extern", TokenKind::KeywordExtern),
    ("inline", TokenKind::KeywordInline),
    ("noinline", TokenKind::KeywordNoinline),
    ("usingnamespace", TokenKind::KeywordUsingnamespace),
    ("threadlocal", TokenKind::KeywordThreadlocal),
    ("const", TokenKind::KeywordConst),
    ("var", TokenKind::KeywordVar),
    ("fn", TokenKind::KeywordFn),
    ("struct", TokenKind::KeywordStruct),
    ("enum", TokenKind::KeywordEnum),
    ("union", TokenKind::KeywordUnion),
    ("error", TokenKind::KeywordError),
    ("anyframe", TokenKind::KeywordAnyframe),
    ("async", TokenKind::KeywordAsync),
    ("await", TokenKind::KeywordAwait),
    ("suspend", TokenKind::KeywordSuspend),
    ("nosuspend", TokenKind::KeywordNosuspend),
    ("resume", TokenKind::KeywordResume),
    ("defer", TokenKind::KeywordDefer),
    ("errdefer", TokenKind::KeywordErrdefer),
    ("if", TokenKind::KeywordIf),
    ("else", TokenKind::KeywordElse),
    ("for", TokenKind::KeywordFor),
    ("while", TokenKind::KeywordWhile),
    ("switch", TokenKind::KeywordSwitch),
    ("break", TokenKind::KeywordBreak),
    ("continue", TokenKind::KeywordContinue),
    ("return", TokenKind::KeywordReturn),
    ("try", TokenKind::KeywordTry),
    ("catch", TokenKind::KeywordCatch),
    ("or", TokenKind::KeywordOr),
    ("and", TokenKind::KeywordAnd),
    ("orelse", TokenKind::KeywordOrelse),
    ("volatile", TokenKind::KeywordVolatile),
    ("allowzero", TokenKind::KeywordAllowzero),
    ("align", TokenKind::KeywordAlign),
    ("linksection", TokenKind::KeywordLinksection),
    ("callconv", TokenKind::KeywordCallconv),
    ("packed", TokenKind::KeywordPacked),
    ("opaque", TokenKind::KeywordOpaque),
    ("anytype", TokenKind::KeywordAnytype),
    ("asm", TokenKind::KeywordAsm),
    ("true", TokenKind::KeywordTrue),
    ("false", TokenKind::KeywordFalse),
    ("null", TokenKind::KeywordNull),
    ("undefined", TokenKind::KeywordUndefined),
    ("unreachable", TokenKind::KeywordUnreachable),
];

impl TokenKind {
    /// `true` for trivia kinds: tokens that occupy a slot in the token arrays
    /// but are never matched against directly by grammar productions.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::DocComment | TokenKind::ContainerDocComment)
    }

    pub fn is_line_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let s = match self {
            Identifier => "an identifier",
            IntegerLiteral => "an integer literal",
            FloatLiteral => "a float literal",
            CharLiteral => "a character literal",
            StringLiteral => "a string literal",
            MultilineStringLiteralLine => "a multiline string literal",
            Builtin => "a builtin call",
            LineComment => "a line comment",
            DocComment => "a doc comment",
            ContainerDocComment => "a container doc comment",
            KeywordTest => "'test'",
            KeywordComptime => "'comptime'",
            KeywordPub => "'pub'",
            KeywordExport => "'export'",
            KeywordExtern => "'extern'",
            KeywordInline => "'inline'",
            KeywordNoinline => "'noinline'",
            KeywordUsingnamespace => "'usingnamespace'",
            KeywordThreadlocal => "'threadlocal'",
            KeywordConst => "'const'",
            KeywordVar => "'var'",
            KeywordFn => "'fn'",
            KeywordStruct => "'struct'",
            KeywordEnum => "'enum'",
            KeywordUnion => "'union'",
            KeywordError => "'error'",
            KeywordAnyframe => "'anyframe'",
            KeywordAsync => "'async'",
            KeywordAwait => "'await'",
            KeywordSuspend => "'suspend'",
            KeywordNosuspend => "'nosuspend'",
            KeywordResume => "'resume'",
            KeywordDefer => "'defer'",
            KeywordErrdefer => "'errdefer'",
            KeywordIf => "'if'",
            KeywordElse => "'else'",
            KeywordFor => "'for'",
            KeywordWhile => "'while'",
            KeywordSwitch => "'switch'",
            KeywordBreak => "'break'",
            KeywordContinue => "'continue'",
            KeywordReturn => "'return'",
            KeywordTry => "'try'",
            KeywordCatch => "'catch'",
            KeywordOr => "'or'",
            KeywordAnd => "'and'",
            KeywordOrelse => "'orelse'",
            KeywordVolatile => "'volatile'",
            KeywordAllowzero => "'allowzero'",
            KeywordAlign => "'align'",
            KeywordLinksection => "'linksection'",
            KeywordCallconv => "'callconv'",
            KeywordPacked => "'packed'",
            KeywordOpaque => "'opaque'",
            KeywordAnytype => "'anytype'",
            KeywordAsm => "'asm'",
            KeywordTrue => "'true'",
            KeywordFalse => "'false'",
            KeywordNull => "'null'",
            KeywordUndefined => "'undefined'",
            KeywordUnreachable => "'unreachable'",
            LParen => "'('",
            RParen => "')'",
            LBrace => "'{'",
            RBrace => "'}'",
            LBracket => "'['",
            RBracket => "']'",
            Comma => "','",
            Semicolon => "';'",
            Colon => "':'",
            Dot => "'.'",
            DotDot => "'..'",
            DotDotDot => "'...'",
            DotStar => "'.*'",
            DotQuestion => "'.?'",
            Question => "'?'",
            Bang => "'!'",
            Tilde => "'~'",
            Amp => "'&'",
            AmpAmp => "'&&'",
            Pipe => "'|'",
            PipePipe => "'||'",
            Caret => "'^'",
            Plus => "'+'",
            PlusPlus => "'++'",
            PlusPercent => "'+%'",
            Minus => "'-'",
            MinusPercent => "'-%'",
            Star => "'*'",
            StarStar => "'**'",
            StarPercent => "'*%'",
            Slash => "'/'",
            Percent => "'%'",
            ShiftLeft => "'<<'",
            ShiftRight => "'>>'",
            EqualEqual => "'=='",
            BangEqual => "'!='",
            Less => "'<'",
            Greater => "'>'",
            LessEqual => "'<='",
            GreaterEqual => "'>='",
            Equal => "'='",
            PlusEqual => "'+='",
            MinusEqual => "'-='",
            StarEqual => "'*='",
            SlashEqual => "'/='",
            PercentEqual => "'%='",
            ShiftLeftEqual => "'<<='",
            ShiftRightEqual => "'>>='",
            AmpEqual => "'&='",
            CaretEqual => "'^='",
            PipeEqual => "'|='",
            StarPercentEqual => "'*%='",
            PlusPercentEqual => "'+%='",
            MinusPercentEqual => "'-%='",
            Arrow => "'->'",
            FatArrow => "'=>'",
            At => "'@'",
            Invalid => "an invalid token",
            Eof => "end of file",
        };
        write!(f, "{s}")
    }
}
