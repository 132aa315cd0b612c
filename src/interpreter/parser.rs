use crate::ast::{
    BinaryOp, CaseClause, Expr, FieldDecl, Param, Program, RecordType, Stmt, Subroutine, UnaryOp,
};
use crate::diagnostic::Span;
use crate::interpreter::error::ParseError;
use crate::token::{Keyword, SpannedToken, Token};
use crate::value::Value;
use std::rc::Rc;

/// Deepest allowed nesting of blocks, parentheses and prefix operators.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Recursive-descent parser over the scanner's token stream. Fails fast:
/// the first violation aborts the parse.
pub struct TokenParser {
    tokens: Vec<SpannedToken>,
    current: usize,
    source_len: usize,
    depth: usize,
}

impl TokenParser {
    pub fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            current: 0,
            source_len,
            depth: 0,
        }
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|st| &st.token)
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1).map(|st| &st.token)
    }

    fn current_line(&self) -> Option<usize> {
        self.tokens.get(self.current).map(|st| st.line)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|st| st.span)
            .unwrap_or_else(|| Span::new(self.source_len, self.source_len))
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        if self.current < self.tokens.len() {
            let st = self.tokens[self.current].clone();
            self.current += 1;
            Some(st)
        } else {
            None
        }
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.current_token(), Some(token) if token.is_keyword(keyword))
    }

    fn at_any_keyword(&self, keywords: &[Keyword]) -> bool {
        keywords.iter().any(|k| self.at_keyword(*k))
    }

    fn at(&self, token: &Token) -> bool {
        self.current_token() == Some(token)
    }

    /// Error located at the current token, or at end of input.
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.current_line(), self.current_span())
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "Nesting exceeds the maximum depth of {}",
                MAX_NESTING_DEPTH
            )));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.at(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.error(format!("Expected '{}'", expected)))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Span, ParseError> {
        if self.at_keyword(keyword) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.error(format!("Expected {}", keyword.as_str())))
        }
    }

    fn expect_identifier(&mut self) -> Result<Rc<str>, ParseError> {
        match self.current_token() {
            Some(Token::Ident(name)) => {
                let name = Rc::from(name.as_str());
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("Expected identifier")),
        }
    }

    /// A built-in type keyword or a record type name.
    fn parse_type_name(&mut self) -> Result<Rc<str>, ParseError> {
        let name: Rc<str> = match self.current_token() {
            Some(Token::Keyword(
                keyword @ (Keyword::Integer
                | Keyword::Real
                | Keyword::String
                | Keyword::Boolean
                | Keyword::Char
                | Keyword::Date),
            )) => Rc::from(keyword.as_str()),
            Some(Token::Ident(name)) => Rc::from(name.as_str()),
            _ => return Err(self.error("Expected data type")),
        };
        self.advance();
        Ok(name)
    }

    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut items = Vec::new();
        while self.current_token().is_some() {
            items.push(self.parse_top_level()?);
        }
        Ok(Program { items })
    }

    fn parse_top_level(&mut self) -> Result<Stmt, ParseError> {
        match self.current_token() {
            Some(Token::Keyword(Keyword::Procedure)) => self.parse_procedure(),
            Some(Token::Keyword(Keyword::Function)) => self.parse_function(),
            Some(Token::Keyword(Keyword::Type)) => self.parse_type(),
            _ => self.parse_statement(),
        }
    }

    /// Statements up to (not including) one of `closers`. Running out of
    /// tokens stops the loop; the caller's closer check then fails.
    fn parse_body(&mut self, closers: &[Keyword]) -> Result<Vec<Stmt>, ParseError> {
        self.nested(|parser| {
            let mut body = Vec::new();
            while parser.current_token().is_some() && !parser.at_any_keyword(closers) {
                body.push(parser.parse_statement()?);
            }
            Ok(body)
        })
    }

    fn parse_procedure(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::Procedure)?;
        let name = self.expect_identifier()?;
        let params = self.parse_params()?;
        let body = self.parse_body(&[Keyword::EndProcedure])?;
        self.expect_keyword(Keyword::EndProcedure)?;
        Ok(Stmt::Procedure(Rc::new(Subroutine {
            name,
            params,
            returns: None,
            body,
        })))
    }

    fn parse_function(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::Function)?;
        let name = self.expect_identifier()?;
        let params = self.parse_params()?;
        self.expect_keyword(Keyword::Returns)?;
        let returns = self.parse_type_name()?;
        let body = self.parse_body(&[Keyword::EndFunction])?;
        self.expect_keyword(Keyword::EndFunction)?;
        Ok(Stmt::Function(Rc::new(Subroutine {
            name,
            params,
            returns: Some(returns),
            body,
        })))
    }

    /// `( [BYREF|BYVAL] name : type, ... )`, or nothing at all.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        if !self.at(&Token::LParen) {
            return Ok(params);
        }
        self.advance();
        if !self.at(&Token::RParen) {
            loop {
                let by_ref = if self.at_keyword(Keyword::ByRef) {
                    self.advance();
                    true
                } else {
                    if self.at_keyword(Keyword::ByVal) {
                        self.advance();
                    }
                    false
                };
                let name = self.expect_identifier()?;
                self.expect(Token::Colon)?;
                let type_name = self.parse_type_name()?;
                params.push(Param {
                    name,
                    type_name,
                    by_ref,
                });
                if self.at(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;
        Ok(params)
    }

    fn parse_type(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::Type)?;
        let name = self.expect_identifier()?;
        let mut fields = Vec::new();
        while self.current_token().is_some() && !self.at_keyword(Keyword::EndType) {
            if !self.at_keyword(Keyword::Declare) {
                return Err(self.error("Expected DECLARE or ENDTYPE"));
            }
            self.advance();
            let names = self.parse_name_list()?;
            self.expect(Token::Colon)?;
            let type_name = self.parse_type_name()?;
            fields.extend(names.into_iter().map(|name| FieldDecl {
                name,
                type_name: type_name.clone(),
            }));
        }
        self.expect_keyword(Keyword::EndType)?;
        Ok(Stmt::TypeDecl(Rc::new(RecordType { name, fields })))
    }

    fn parse_name_list(&mut self) -> Result<Vec<Rc<str>>, ParseError> {
        let mut names = vec![self.expect_identifier()?];
        while self.at(&Token::Comma) {
            self.advance();
            names.push(self.expect_identifier()?);
        }
        Ok(names)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let token = match self.current_token() {
            Some(token) => token.clone(),
            None => return Err(self.error("Expected statement")),
        };

        match token {
            Token::Keyword(Keyword::Declare) => self.parse_declare(),
            Token::Keyword(Keyword::Constant) => self.parse_constant(),
            Token::Keyword(Keyword::Output) => self.parse_output(),
            Token::Keyword(Keyword::Input) => {
                self.advance();
                Ok(Stmt::Input(self.expect_identifier()?))
            }
            Token::Keyword(Keyword::If) => self.parse_if(),
            Token::Keyword(Keyword::While) => self.parse_while(),
            Token::Keyword(Keyword::Repeat) => self.parse_repeat(),
            Token::Keyword(Keyword::For) => self.parse_for(),
            Token::Keyword(Keyword::Case) => self.parse_case(),
            Token::Keyword(Keyword::Call) => {
                self.advance();
                self.parse_call_statement()
            }
            Token::Keyword(Keyword::Return) => {
                self.advance();
                Ok(Stmt::Return(self.parse_expression()?))
            }
            Token::Keyword(keyword) => Err(self.error(format!("Unexpected {}", keyword.as_str()))),
            Token::Ident(_) => match self.peek_next() {
                Some(Token::Assign) => self.parse_assignment(),
                Some(Token::LBracket) => self.parse_array_assignment(),
                Some(Token::Dot) => self.parse_field_assignment(),
                _ => self.parse_call_statement(),
            },
            other => Err(self.error(format!("Unexpected '{}'", other))),
        }
    }

    fn parse_declare(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::Declare)?;
        let names = self.parse_name_list()?;
        self.expect(Token::Colon)?;

        if self.at_keyword(Keyword::Array) {
            self.advance();
            self.expect(Token::LBracket)?;
            let lower = self.parse_expression()?;
            self.expect(Token::Colon)?;
            let upper = self.parse_expression()?;
            self.expect(Token::RBracket)?;
            self.expect_keyword(Keyword::Of)?;
            let element_type = self.parse_type_name()?;
            return Ok(Stmt::DeclareArray {
                names,
                lower,
                upper,
                element_type,
            });
        }

        let type_name = self.parse_type_name()?;
        Ok(Stmt::Declare { names, type_name })
    }

    fn parse_constant(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::Constant)?;
        let name = self.expect_identifier()?;
        self.expect(Token::Assign)?;
        let value = self.parse_expression()?;
        Ok(Stmt::Constant { name, value })
    }

    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier()?;
        self.expect(Token::Assign)?;
        let value = self.parse_expression()?;
        Ok(Stmt::Assign {
            name,
            field: None,
            value,
        })
    }

    fn parse_field_assignment(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier()?;
        self.expect(Token::Dot)?;
        let field = self.expect_identifier()?;
        self.expect(Token::Assign)?;
        let value = self.parse_expression()?;
        Ok(Stmt::Assign {
            name,
            field: Some(field),
            value,
        })
    }

    fn parse_array_assignment(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier()?;
        self.expect(Token::LBracket)?;
        let index = self.parse_expression()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Assign)?;
        let value = self.parse_expression()?;
        Ok(Stmt::ArrayAssign { name, index, value })
    }

    /// `name` or `name(args)`, with or without a leading `CALL`.
    fn parse_call_statement(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier()?;
        let args = if self.at(&Token::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Stmt::Call { name, args })
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if !self.at(&Token::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.at(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;
        Ok(args)
    }

    fn parse_output(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::Output)?;
        let mut exprs = vec![self.parse_expression()?];
        while self.at(&Token::Comma) {
            self.advance();
            exprs.push(self.parse_expression()?);
        }
        Ok(Stmt::Output(exprs))
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::If)?;
        let condition = self.parse_expression()?;
        self.expect_keyword(Keyword::Then)?;
        let then_branch = self.parse_body(&[Keyword::Else, Keyword::EndIf])?;
        let else_branch = if self.at_keyword(Keyword::Else) {
            self.advance();
            self.parse_body(&[Keyword::EndIf])?
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::EndIf)?;
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::While)?;
        let condition = self.parse_expression()?;
        self.expect_keyword(Keyword::Do)?;
        let body = self.parse_body(&[Keyword::EndWhile])?;
        self.expect_keyword(Keyword::EndWhile)?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_repeat(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::Repeat)?;
        let body = self.parse_body(&[Keyword::Until])?;
        self.expect_keyword(Keyword::Until)?;
        let condition = self.parse_expression()?;
        Ok(Stmt::Repeat { body, condition })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::For)?;
        let var = self.expect_identifier()?;
        self.expect(Token::Assign)?;
        let start = self.parse_expression()?;
        self.expect_keyword(Keyword::To)?;
        let end = self.parse_expression()?;
        let step = if self.at_keyword(Keyword::Step) {
            self.advance();
            self.parse_expression()?
        } else {
            Expr::Literal(Value::Number(1.0))
        };
        let body = self.parse_body(&[Keyword::Next])?;
        let next_line = self.current_line();
        self.expect_keyword(Keyword::Next)?;
        // `NEXT i` names the loop variable only on the same line; an
        // identifier on the following line starts a new statement.
        if matches!(self.current_token(), Some(Token::Ident(_))) && self.current_line() == next_line {
            self.advance();
        }
        Ok(Stmt::For {
            var,
            start,
            end,
            step,
            body,
        })
    }

    fn parse_case(&mut self) -> Result<Stmt, ParseError> {
        self.expect_keyword(Keyword::Case)?;
        self.expect_keyword(Keyword::Of)?;
        let subject = self.expect_identifier()?;
        let mut clauses = Vec::new();
        while self.current_token().is_some()
            && !self.at_any_keyword(&[Keyword::Otherwise, Keyword::EndCase])
        {
            let value = self.parse_expression()?;
            self.expect(Token::Colon)?;
            let body = Box::new(self.parse_statement()?);
            clauses.push(CaseClause { value, body });
        }
        let otherwise = if self.at_keyword(Keyword::Otherwise) {
            self.advance();
            self.parse_body(&[Keyword::EndCase])?
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::EndCase)?;
        Ok(Stmt::Case {
            subject,
            clauses,
            otherwise,
        })
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(|parser| parser.parse_binary_expr(1))
    }

    fn token_to_binary_operator(token: &Token) -> Option<(u8, BinaryOp)> {
        match token {
            Token::Keyword(Keyword::Or) => Some((1, BinaryOp::Or)),
            Token::Keyword(Keyword::And) => Some((2, BinaryOp::And)),
            Token::Eq => Some((3, BinaryOp::Eq)),
            Token::NotEq => Some((3, BinaryOp::NotEq)),
            Token::Less => Some((3, BinaryOp::Less)),
            Token::Greater => Some((3, BinaryOp::Greater)),
            Token::LessEq => Some((3, BinaryOp::LessEq)),
            Token::GreaterEq => Some((3, BinaryOp::GreaterEq)),
            Token::Plus => Some((4, BinaryOp::Add)),
            Token::Minus => Some((4, BinaryOp::Sub)),
            Token::Ampersand => Some((4, BinaryOp::Concat)),
            Token::Star => Some((5, BinaryOp::Mul)),
            Token::Slash => Some((5, BinaryOp::Div)),
            Token::Keyword(Keyword::Div) => Some((5, BinaryOp::IntDiv)),
            Token::Keyword(Keyword::Mod) => Some((5, BinaryOp::Mod)),
            Token::Caret => Some((5, BinaryOp::Pow)),
            _ => None,
        }
    }

    /// Every level is left-associative, `^` included.
    fn parse_binary_expr(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(token) = self.current_token() {
            let (precedence, op) = match Self::token_to_binary_operator(token) {
                Some((prec, op)) if prec >= min_precedence => (prec, op),
                _ => break,
            };
            self.advance();
            let right = self.parse_binary_expr(precedence + 1)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current_token() {
            Some(Token::Keyword(Keyword::Not)) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.parse_primary(),
        };
        self.advance();
        let expr = self.nested(Self::parse_unary)?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = match self.current_token() {
            Some(token) => token.clone(),
            None => return Err(self.error("Expected expression")),
        };

        match token {
            Token::Number(n, _) => {
                self.advance();
                Ok(Expr::Literal(Value::Number(n)))
            }
            Token::String(text) => {
                self.advance();
                Ok(Expr::Literal(Value::string(text)))
            }
            Token::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Value::Bool(true)))
            }
            Token::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Value::Bool(false)))
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Ident(name) => {
                self.advance();
                let name: Rc<str> = Rc::from(name.as_str());
                match self.current_token() {
                    Some(Token::LBracket) => {
                        self.advance();
                        let index = self.parse_expression()?;
                        self.expect(Token::RBracket)?;
                        Ok(Expr::ArrayAccess {
                            name,
                            index: Box::new(index),
                        })
                    }
                    Some(Token::LParen) => {
                        let args = self.parse_arguments()?;
                        Ok(Expr::Call { name, args })
                    }
                    Some(Token::Dot) => {
                        self.advance();
                        let field = self.expect_identifier()?;
                        Ok(Expr::Variable {
                            name,
                            field: Some(field),
                        })
                    }
                    _ => Ok(Expr::Variable { name, field: None }),
                }
            }
            other => Err(self.error(format!("Unexpected '{}' in expression", other))),
        }
    }
}
