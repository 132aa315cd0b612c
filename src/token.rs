use crate::diagnostic::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Declare,
    Constant,
    Type,
    EndType,
    Input,
    Output,
    If,
    Then,
    Else,
    EndIf,
    Case,
    Of,
    Otherwise,
    EndCase,
    For,
    To,
    Step,
    Next,
    While,
    Do,
    EndWhile,
    Repeat,
    Until,
    Procedure,
    EndProcedure,
    Function,
    EndFunction,
    Returns,
    Return,
    Call,
    ByRef,
    ByVal,
    Array,
    Integer,
    Real,
    String,
    Boolean,
    Char,
    Date,
    Mod,
    Div,
    And,
    Or,
    Not,
    True,
    False,
}

impl Keyword {
    /// Matches an already upper-cased word against the closed keyword set.
    pub fn from_word(word: &str) -> Option<Keyword> {
        let keyword = match word {
            "DECLARE" => Keyword::Declare,
            "CONSTANT" => Keyword::Constant,
            "TYPE" => Keyword::Type,
            "ENDTYPE" => Keyword::EndType,
            "INPUT" => Keyword::Input,
            "OUTPUT" => Keyword::Output,
            "IF" => Keyword::If,
            "THEN" => Keyword::Then,
            "ELSE" => Keyword::Else,
            "ENDIF" => Keyword::EndIf,
            "CASE" => Keyword::Case,
            "OF" => Keyword::Of,
            "OTHERWISE" => Keyword::Otherwise,
            "ENDCASE" => Keyword::EndCase,
            "FOR" => Keyword::For,
            "TO" => Keyword::To,
            "STEP" => Keyword::Step,
            "NEXT" => Keyword::Next,
            "WHILE" => Keyword::While,
            "DO" => Keyword::Do,
            "ENDWHILE" => Keyword::EndWhile,
            "REPEAT" => Keyword::Repeat,
            "UNTIL" => Keyword::Until,
            "PROCEDURE" => Keyword::Procedure,
            "ENDPROCEDURE" => Keyword::EndProcedure,
            "FUNCTION" => Keyword::Function,
            "ENDFUNCTION" => Keyword::EndFunction,
            "RETURNS" => Keyword::Returns,
            "RETURN" => Keyword::Return,
            "CALL" => Keyword::Call,
            "BYREF" => Keyword::ByRef,
            "BYVAL" => Keyword::ByVal,
            "ARRAY" => Keyword::Array,
            "INTEGER" => Keyword::Integer,
            "REAL" => Keyword::Real,
            "STRING" => Keyword::String,
            "BOOLEAN" => Keyword::Boolean,
            "CHAR" => Keyword::Char,
            "DATE" => Keyword::Date,
            "MOD" => Keyword::Mod,
            "DIV" => Keyword::Div,
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "NOT" => Keyword::Not,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Declare => "DECLARE",
            Keyword::Constant => "CONSTANT",
            Keyword::Type => "TYPE",
            Keyword::EndType => "ENDTYPE",
            Keyword::Input => "INPUT",
            Keyword::Output => "OUTPUT",
            Keyword::If => "IF",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::EndIf => "ENDIF",
            Keyword::Case => "CASE",
            Keyword::Of => "OF",
            Keyword::Otherwise => "OTHERWISE",
            Keyword::EndCase => "ENDCASE",
            Keyword::For => "FOR",
            Keyword::To => "TO",
            Keyword::Step => "STEP",
            Keyword::Next => "NEXT",
            Keyword::While => "WHILE",
            Keyword::Do => "DO",
            Keyword::EndWhile => "ENDWHILE",
            Keyword::Repeat => "REPEAT",
            Keyword::Until => "UNTIL",
            Keyword::Procedure => "PROCEDURE",
            Keyword::EndProcedure => "ENDPROCEDURE",
            Keyword::Function => "FUNCTION",
            Keyword::EndFunction => "ENDFUNCTION",
            Keyword::Returns => "RETURNS",
            Keyword::Return => "RETURN",
            Keyword::Call => "CALL",
            Keyword::ByRef => "BYREF",
            Keyword::ByVal => "BYVAL",
            Keyword::Array => "ARRAY",
            Keyword::Integer => "INTEGER",
            Keyword::Real => "REAL",
            Keyword::String => "STRING",
            Keyword::Boolean => "BOOLEAN",
            Keyword::Char => "CHAR",
            Keyword::Date => "DATE",
            Keyword::Mod => "MOD",
            Keyword::Div => "DIV",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
        }
    }
}

/// Coarse token classification, in the scanner's matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    StringLiteral,
    RealLiteral,
    IntegerLiteral,
    Keyword,
    Identifier,
    Assign,
    Comparison,
    Operator,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),

    Ident(String),
    Number(f64, bool), // (value, is_real)
    String(String),

    /// `←` or its ASCII spelling `<-`
    Assign,

    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,

    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Ampersand,

    Colon,
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Keyword(_) => TokenKind::Keyword,
            Token::Ident(_) => TokenKind::Identifier,
            Token::Number(_, true) => TokenKind::RealLiteral,
            Token::Number(_, false) => TokenKind::IntegerLiteral,
            Token::String(_) => TokenKind::StringLiteral,
            Token::Assign => TokenKind::Assign,
            Token::Eq
            | Token::NotEq
            | Token::Less
            | Token::Greater
            | Token::LessEq
            | Token::GreaterEq => TokenKind::Comparison,
            Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Caret
            | Token::Ampersand => TokenKind::Operator,
            Token::Colon
            | Token::Comma
            | Token::Dot
            | Token::LParen
            | Token::RParen
            | Token::LBracket
            | Token::RBracket => TokenKind::Punctuation,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(keyword) => write!(f, "{}", keyword.as_str()),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Number(value, _) => write!(f, "{}", value),
            Token::String(text) => write!(f, "\"{}\"", text),
            Token::Assign => write!(f, "←"),
            Token::Eq => write!(f, "="),
            Token::NotEq => write!(f, "<>"),
            Token::Less => write!(f, "<"),
            Token::Greater => write!(f, ">"),
            Token::LessEq => write!(f, "<="),
            Token::GreaterEq => write!(f, ">="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::Ampersand => write!(f, "&"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
        }
    }
}

/// A token with its byte span and 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

impl SpannedToken {
    pub fn kind(&self) -> TokenKind {
        self.token.kind()
    }

    /// Normalized token text: keywords upper-cased, assignment always `←`.
    pub fn text(&self) -> String {
        self.token.to_string()
    }
}
