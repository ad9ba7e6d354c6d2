//! Recursive-descent parser over the hand-written lexer's
//! token stream. Declarations are parsed directly into their final AST
//! shape; expressions are parsed into a flat `ast::Chain` at each
//! precedence-agnostic boundary and folded by `precedence::resolve_chain`
//! once the chain is complete. Like the loader, the parser collects
//! errors into a `Diagnostics<ParseError>` rather than failing on the
//! first one, so a single file reports every syntax error it contains.

use crate::ast::{self, Arg, Decl, Expr, Node, Span, Statement, TypeSlot};
use crate::error::{Diagnostics, ParseError, Position};
use crate::lexer::{Lexer, Positioned, Token};
use crate::precedence;
use crate::types::Type;
use std::rc::Rc;

pub struct Parser {
    tokens: Vec<Positioned<Token>>,
    pos: usize,
    pub diagnostics: Diagnostics<ParseError>,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    pub fn new(src: &str) -> PResult<Parser> {
        let tokens = Lexer::new(src).tokenize()?;
        Ok(Parser { tokens, pos: 0, diagnostics: Diagnostics::new() })
    }

    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].value
    }

    fn cur_span(&self) -> Span {
        self.tokens[self.pos.min(self.tokens.len() - 1)].span
    }

    fn cur_pos(&self) -> Position {
        let s = self.cur_span();
        Position { line: s.line, col: s.col }
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos.min(self.tokens.len() - 1)].value.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn at_symbol(&self, s: &str) -> bool {
        matches!(self.cur(), Token::Symbol(sym) if *sym == s)
    }

    fn at_keyword(&self, k: &str) -> bool {
        matches!(self.cur(), Token::Keyword(kw) if *kw == k)
    }

    fn eat_symbol(&mut self, s: &'static str) -> PResult<()> {
        if self.at_symbol(s) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(vec![s.to_string()]))
        }
    }

    fn eat_keyword(&mut self, k: &'static str) -> PResult<()> {
        if self.at_keyword(k) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(vec![k.to_string()]))
        }
    }

    fn eat_ident(&mut self) -> PResult<String> {
        match self.cur().clone() {
            Token::Ident(name) => {
                self.bump();
                Ok(name)
            }
            _ => Err(self.unexpected(vec!["identifier".to_string()])),
        }
    }

    fn unexpected(&self, expected: Vec<String>) -> ParseError {
        let found = match self.cur() {
            Token::Eof => "<eof>".to_string(),
            other => format!("{other:?}"),
        };
        if matches!(self.cur(), Token::Eof) {
            ParseError::UnexpectedEof { pos: self.cur_pos() }
        } else {
            ParseError::UnexpectedToken { pos: self.cur_pos(), found, expected }
        }
    }

    /// Skip forward to the next statement/declaration boundary after a
    /// parse error, so one bad construct doesn't stop the whole file from
    /// being checked.
    fn synchronize_to_semicolon_or_brace(&mut self) {
        loop {
            match self.cur() {
                Token::Eof => return,
                Token::Symbol(";") => {
                    self.bump();
                    return;
                }
                Token::Symbol("}") => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    // ---- top level ----

    pub fn parse_file(&mut self, canonical_path: &str) -> ast::File {
        tracing::debug!(target: "parser", %canonical_path, "parse_file");
        let mut imports = Vec::new();
        while self.at_keyword("import") {
            match self.parse_import() {
                Ok(i) => imports.push(i),
                Err(e) => {
                    tracing::debug!(target: "parser", %canonical_path, error = %e, "import parse error, synchronizing");
                    self.diagnostics.push(e);
                    self.synchronize_to_semicolon_or_brace();
                }
            }
        }
        let mut decls = Vec::new();
        while !matches!(self.cur(), Token::Eof) {
            match self.parse_decl() {
                Ok(d) => decls.push(d),
                Err(e) => {
                    tracing::debug!(target: "parser", %canonical_path, error = %e, "decl parse error, synchronizing");
                    self.diagnostics.push(e);
                    let before = self.pos;
                    self.synchronize_to_semicolon_or_brace();
                    // At top level there is no enclosing `}` for a stray
                    // closing brace to belong to; skip it so we don't spin
                    // on the same token forever.
                    if self.pos == before && self.at_symbol("}") {
                        self.bump();
                    }
                }
            }
        }
        if !self.diagnostics.is_ok() {
            tracing::warn!(target: "parser", %canonical_path, count = self.diagnostics.errors.len(), "file parsed with errors");
        }
        ast::File { canonical_path: canonical_path.to_string(), imports, decls }
    }

    fn parse_import(&mut self) -> PResult<ast::Import> {
        let span = self.cur_span();
        self.eat_keyword("import")?;
        let path = match self.bump() {
            Token::Str(s) => s,
            _ => return Err(ParseError::UnexpectedToken { pos: self.cur_pos(), found: format!("{:?}", self.cur()), expected: vec!["string".to_string()] }),
        };
        let alias = if self.at_keyword("as") {
            self.bump();
            Some(self.eat_ident()?)
        } else {
            None
        };
        if self.at_symbol(";") {
            self.bump();
        }
        Ok(ast::Import { path, alias, span })
    }

    fn parse_decl(&mut self) -> PResult<Node<Decl>> {
        if self.at_keyword("component") {
            return Ok(Rc::new(Decl::Component(self.parse_component()?)));
        }
        if self.at_keyword("enum") {
            return Ok(Rc::new(Decl::Enum(self.parse_enum()?)));
        }
        if self.at_keyword("system") {
            return Ok(Rc::new(Decl::System(self.parse_system()?)));
        }
        if self.at_keyword("aggregator") {
            return Ok(Rc::new(Decl::Aggregator(self.parse_aggregator()?)));
        }
        if self.at_keyword("options") {
            return Ok(Rc::new(Decl::Options(self.parse_options()?)));
        }
        Err(self.unexpected(vec![
            "component".to_string(),
            "enum".to_string(),
            "system".to_string(),
            "aggregator".to_string(),
            "options".to_string(),
        ]))
    }

    fn parse_type(&mut self) -> PResult<Type> {
        let name = self.eat_ident()?;
        Ok(match name.as_str() {
            "Int" => Type::Int,
            "Float" => Type::Float,
            "Bool" => Type::Bool,
            "Str" => Type::Str,
            "Duration" => Type::Duration,
            "Void" => Type::Void,
            "List" => {
                self.eat_symbol("[")?;
                let inner = self.parse_type()?;
                self.eat_symbol("]")?;
                Type::List(Rc::new(inner))
            }
            "Outcomes" => {
                self.eat_symbol("[")?;
                let inner = self.parse_type()?;
                self.eat_symbol("]")?;
                Type::Outcomes(Rc::new(inner))
            }
            other => Type::Named(other.to_string()),
        })
    }

    fn parse_params(&mut self) -> PResult<Vec<ast::Param>> {
        self.eat_symbol("(")?;
        let mut params = Vec::new();
        while !self.at_symbol(")") {
            let span = self.cur_span();
            let name = self.eat_ident()?;
            let declared_type = if self.at_symbol(":") {
                self.bump();
                Some(self.parse_type()?)
            } else {
                None
            };
            let default = if self.at_symbol("=") {
                self.bump();
                Some(self.parse_expr()?)
            } else {
                None
            };
            params.push(ast::Param { name, declared_type, default, span });
            if self.at_symbol(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.eat_symbol(")")?;
        Ok(params)
    }

    fn parse_component(&mut self) -> PResult<Node<ast::Component>> {
        let span = self.cur_span();
        self.eat_keyword("component")?;
        let name = self.eat_ident()?;
        self.eat_symbol("{")?;
        let mut params = Vec::new();
        let mut uses = Vec::new();
        let mut methods = Vec::new();
        while !self.at_symbol("}") {
            if self.at_keyword("uses") {
                let dep_span = self.cur_span();
                self.bump();
                let dep_name = self.eat_ident()?;
                self.eat_symbol(":")?;
                let component_name = self.eat_ident()?;
                if self.at_symbol(";") {
                    self.bump();
                }
                uses.push(ast::Dependency { name: dep_name, component_name, span: dep_span });
            } else if self.at_keyword("method") || self.at_keyword("native") {
                methods.push(self.parse_method()?);
            } else {
                let p_span = self.cur_span();
                let p_name = self.eat_ident()?;
                let declared_type = if self.at_symbol(":") {
                    self.bump();
                    Some(self.parse_type()?)
                } else {
                    None
                };
                let default = if self.at_symbol("=") {
                    self.bump();
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                if self.at_symbol(";") {
                    self.bump();
                }
                params.push(ast::Param { name: p_name, declared_type, default, span: p_span });
            }
        }
        self.eat_symbol("}")?;
        Ok(Rc::new(ast::Component { name, params, uses, methods, span }))
    }

    fn parse_method(&mut self) -> PResult<Node<ast::Method>> {
        let span = self.cur_span();
        let native = if self.at_keyword("native") {
            self.bump();
            true
        } else {
            false
        };
        self.eat_keyword("method")?;
        let name = self.eat_ident()?;
        let params = self.parse_params()?;
        let return_type = if self.at_symbol("->") {
            self.bump();
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = if native {
            if self.at_symbol(";") {
                self.bump();
            }
            Vec::new()
        } else {
            self.parse_block()?
        };
        Ok(Rc::new(ast::Method { name, params, return_type, native, body, span }))
    }

    fn parse_enum(&mut self) -> PResult<Node<ast::Enum>> {
        let span = self.cur_span();
        self.eat_keyword("enum")?;
        let name = self.eat_ident()?;
        self.eat_symbol("{")?;
        let mut values = Vec::new();
        while !self.at_symbol("}") {
            values.push(self.eat_ident()?);
            if self.at_symbol(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.eat_symbol("}")?;
        Ok(Rc::new(ast::Enum { name, values, span }))
    }

    fn parse_system(&mut self) -> PResult<Node<ast::System>> {
        let span = self.cur_span();
        self.eat_keyword("system")?;
        let name = self.eat_ident()?;
        self.eat_symbol("{")?;
        let mut instances = Vec::new();
        let mut statements = Vec::new();
        while !self.at_symbol("}") {
            if self.at_keyword("instance") {
                instances.push(self.parse_instance()?);
            } else {
                statements.push(self.parse_statement()?);
            }
        }
        self.eat_symbol("}")?;
        Ok(Rc::new(ast::System { name, instances, statements, span }))
    }

    fn parse_instance(&mut self) -> PResult<ast::Instance> {
        let span = self.cur_span();
        self.eat_keyword("instance")?;
        let name = self.eat_ident()?;
        self.eat_symbol(":")?;
        let component_name = self.eat_ident()?;
        let mut overrides = Vec::new();
        if self.at_symbol("{") {
            self.bump();
            while !self.at_symbol("}") {
                let field = self.eat_ident()?;
                self.eat_symbol(":")?;
                let value = self.parse_expr()?;
                if self.at_symbol(";") {
                    self.bump();
                } else if self.at_symbol(",") {
                    self.bump();
                }
                overrides.push((field, value));
            }
            self.eat_symbol("}")?;
        }
        if self.at_symbol(";") {
            self.bump();
        }
        Ok(ast::Instance { name, component_name, overrides, span })
    }

    fn parse_aggregator(&mut self) -> PResult<Node<ast::Aggregator>> {
        let span = self.cur_span();
        self.eat_keyword("aggregator")?;
        let name = self.eat_ident()?;
        let params = self.parse_params()?;
        let return_type = if self.at_symbol("->") {
            self.bump();
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Rc::new(ast::Aggregator { name, params, return_type, body, span }))
    }

    fn parse_options(&mut self) -> PResult<Node<ast::Options>> {
        let span = self.cur_span();
        self.eat_keyword("options")?;
        self.eat_symbol("{")?;
        let mut entries = Vec::new();
        while !self.at_symbol("}") {
            let name = self.eat_ident()?;
            self.eat_symbol(":")?;
            let value = self.parse_expr()?;
            if self.at_symbol(";") {
                self.bump();
            }
            entries.push((name, value));
        }
        self.eat_symbol("}")?;
        Ok(Rc::new(ast::Options { entries, span }))
    }

    // ---- statements ----

    fn parse_block(&mut self) -> PResult<Vec<Node<Statement>>> {
        self.eat_symbol("{")?;
        let mut stmts = Vec::new();
        while !self.at_symbol("}") {
            match self.parse_statement() {
                Ok(s) => stmts.push(s),
                Err(e) => {
                    self.diagnostics.push(e);
                    self.synchronize_to_semicolon_or_brace();
                }
            }
        }
        self.eat_symbol("}")?;
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> PResult<Node<Statement>> {
        let span = self.cur_span();
        if self.at_keyword("let") {
            self.bump();
            let mut names = Vec::new();
            if self.at_symbol("(") {
                self.bump();
                while !self.at_symbol(")") {
                    names.push(self.eat_ident()?);
                    if self.at_symbol(",") {
                        self.bump();
                    } else {
                        break;
                    }
                }
                self.eat_symbol(")")?;
            } else {
                names.push(self.eat_ident()?);
            }
            self.eat_symbol("=")?;
            let value = self.parse_expr()?;
            if self.at_symbol(";") {
                self.bump();
            }
            return Ok(Rc::new(Statement::Let(names, value, span)));
        }
        if self.at_keyword("set") {
            self.bump();
            let target = self.parse_expr()?;
            self.eat_symbol("=")?;
            let value = self.parse_expr()?;
            if self.at_symbol(";") {
                self.bump();
            }
            return Ok(Rc::new(Statement::Set(target, value, span)));
        }
        if self.at_keyword("if") {
            self.bump();
            let cond = self.parse_expr()?;
            let then_body = self.parse_block()?;
            let else_body = if self.at_keyword("else") {
                self.bump();
                if self.at_keyword("if") {
                    vec![self.parse_statement()?]
                } else {
                    self.parse_block()?
                }
            } else {
                Vec::new()
            };
            return Ok(Rc::new(Statement::If(cond, then_body, else_body, span)));
        }
        if self.at_keyword("for") {
            self.bump();
            let var = self.eat_ident()?;
            self.eat_keyword("in")?;
            let iter = self.parse_expr()?;
            let body = self.parse_block()?;
            return Ok(Rc::new(Statement::For(var, iter, body, span)));
        }
        if self.at_keyword("return") {
            self.bump();
            let value = if self.at_symbol(";") || self.at_symbol("}") {
                None
            } else {
                Some(self.parse_expr()?)
            };
            if self.at_symbol(";") {
                self.bump();
            }
            return Ok(Rc::new(Statement::Return(value, span)));
        }
        if self.at_symbol("{") {
            let body = self.parse_block()?;
            return Ok(Rc::new(Statement::Block(body, span)));
        }
        let expr = self.parse_expr()?;
        if self.at_symbol(";") {
            self.bump();
        }
        Ok(Rc::new(Statement::Expression(expr, span)))
    }

    // ---- expressions ----

    pub fn parse_expr(&mut self) -> PResult<Node<Expr>> {
        let first = self.parse_unary()?;
        let chain_span = first.span();
        let mut rest = Vec::new();
        while let Some(op) = self.peek_chain_operator() {
            let op_span = self.cur_span();
            self.bump();
            let rhs = self.parse_unary()?;
            rest.push((op, op_span, rhs));
        }
        if rest.is_empty() {
            return Ok(first);
        }
        let chain = ast::Chain { first, rest, span: chain_span };
        precedence::resolve_chain(&chain).map_err(|e| ParseError::UnexpectedToken {
            pos: e.pos,
            found: e.reason.clone(),
            expected: vec!["non-chaining comparison".to_string()],
        })
    }

    fn peek_chain_operator(&self) -> Option<String> {
        match self.cur() {
            Token::Symbol(s) if matches!(*s, "+" | "-" | "*" | "/" | "%" | "&&" | "||" | "==" | "!=" | "<" | ">" | "<=" | ">=") => Some(s.to_string()),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> PResult<Node<Expr>> {
        let span = self.cur_span();
        if self.at_symbol("!") {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(Rc::new(Expr::Unary(ast::UnOp::Not, operand, span, TypeSlot::new())));
        }
        if self.at_symbol("-") {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(Rc::new(Expr::Unary(ast::UnOp::Neg, operand, span, TypeSlot::new())));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Node<Expr>> {
        let mut expr = self.parse_primary()?;
        loop {
            let span = self.cur_span();
            if self.at_symbol(".") {
                self.bump();
                let name = self.eat_ident()?;
                expr = Rc::new(Expr::Member(expr, name, span, TypeSlot::new()));
            } else if self.at_symbol("[") {
                self.bump();
                let idx = self.parse_expr()?;
                self.eat_symbol("]")?;
                expr = Rc::new(Expr::Index(expr, idx, span, TypeSlot::new()));
            } else if self.at_symbol("(") {
                let args = self.parse_args()?;
                expr = Rc::new(Expr::Call(expr, args, span, TypeSlot::new()));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> PResult<Vec<Arg>> {
        self.eat_symbol("(")?;
        let mut args = Vec::new();
        while !self.at_symbol(")") {
            // Named argument: `ident: expr`. Disambiguate by lookahead.
            if let Token::Ident(name) = self.cur().clone() {
                if matches!(self.tokens.get(self.pos + 1).map(|p| &p.value), Some(Token::Symbol(":"))) {
                    self.bump();
                    self.bump();
                    let value = self.parse_expr()?;
                    args.push(Arg { name: Some(name), value });
                    if self.at_symbol(",") {
                        self.bump();
                    }
                    continue;
                }
            }
            let value = self.parse_expr()?;
            args.push(Arg { name: None, value });
            if self.at_symbol(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.eat_symbol(")")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<Node<Expr>> {
        let span = self.cur_span();
        match self.cur().clone() {
            Token::Int(n) => {
                self.bump();
                Ok(Rc::new(Expr::IntLit(n, span)))
            }
            Token::Float(f) => {
                self.bump();
                Ok(Rc::new(Expr::FloatLit(f, span)))
            }
            Token::Duration(d) => {
                self.bump();
                Ok(Rc::new(Expr::DurationLit(d, span)))
            }
            Token::Str(s) => {
                self.bump();
                Ok(Rc::new(Expr::StrLit(s, span)))
            }
            Token::Keyword("true") => {
                self.bump();
                Ok(Rc::new(Expr::BoolLit(true, span)))
            }
            Token::Keyword("false") => {
                self.bump();
                Ok(Rc::new(Expr::BoolLit(false, span)))
            }
            Token::Keyword("nil") => {
                self.bump();
                Ok(Rc::new(Expr::NilLit(span)))
            }
            Token::Ident(name) => {
                self.bump();
                Ok(Rc::new(Expr::Identifier(name, span, TypeSlot::new())))
            }
            Token::Keyword("sample") => {
                self.bump();
                self.eat_symbol("(")?;
                let inner = self.parse_expr()?;
                self.eat_symbol(")")?;
                Ok(Rc::new(Expr::Sample(inner, span, TypeSlot::new())))
            }
            Token::Keyword("go") => {
                self.bump();
                let inner = self.parse_expr()?;
                let loop_count = if self.at_keyword("for") {
                    self.bump();
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                Ok(Rc::new(Expr::Go(inner, loop_count, span, TypeSlot::new())))
            }
            Token::Keyword("wait") => {
                self.bump();
                let mut futures = vec![self.parse_expr()?];
                while self.at_symbol(",") {
                    self.bump();
                    futures.push(self.parse_expr()?);
                }
                let mode = if self.at_keyword("as") {
                    self.bump();
                    Some(self.eat_ident()?)
                } else {
                    None
                };
                Ok(Rc::new(Expr::Wait(futures, mode, span, TypeSlot::new())))
            }
            Token::Keyword("distribute") => self.parse_distribute(span),
            Token::Symbol("(") => {
                self.bump();
                let first = self.parse_expr()?;
                if self.at_symbol(",") {
                    let mut items = vec![first];
                    while self.at_symbol(",") {
                        self.bump();
                        if self.at_symbol(")") {
                            break;
                        }
                        items.push(self.parse_expr()?);
                    }
                    self.eat_symbol(")")?;
                    Ok(Rc::new(Expr::Tuple(items, span, TypeSlot::new())))
                } else {
                    self.eat_symbol(")")?;
                    Ok(first)
                }
            }
            _ => Err(self.unexpected(vec!["expression".to_string()])),
        }
    }

    /// `distribute { weight -> expr, ... }` — a literal outcome table.
    fn parse_distribute(&mut self, span: Span) -> PResult<Node<Expr>> {
        self.eat_keyword("distribute")?;
        self.eat_symbol("{")?;
        let mut arms = Vec::new();
        while !self.at_symbol("}") {
            let weight = self.parse_expr()?;
            self.eat_symbol("->")?;
            let value = self.parse_expr()?;
            arms.push((weight, value));
            if self.at_symbol(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.eat_symbol("}")?;
        Ok(Rc::new(Expr::Distribute(arms, span, TypeSlot::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok_expr(src: &str) -> Node<Expr> {
        let mut p = Parser::new(src).unwrap();
        let e = p.parse_expr().unwrap();
        assert!(p.diagnostics.is_ok());
        e
    }

    #[test]
    fn parses_literals() {
        assert!(matches!(&*parse_ok_expr("42"), Expr::IntLit(42, _)));
        assert!(matches!(&*parse_ok_expr("42.5"), Expr::FloatLit(_, _)));
        assert!(matches!(&*parse_ok_expr("\"hi\""), Expr::StrLit(s, _) if s == "hi"));
        assert!(matches!(&*parse_ok_expr("foo"), Expr::Identifier(n, _, _) if n == "foo"));
    }

    #[test]
    fn parses_precedence_respecting_chain() {
        let e = parse_ok_expr("1 + 2 * 3");
        match &*e {
            Expr::Binary(ast::BinOp::Add, _, rhs, ..) => {
                assert!(matches!(&**rhs, Expr::Binary(ast::BinOp::Mul, ..)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_member_index_and_call_postfix_chain() {
        let e = parse_ok_expr("disk.read(1, count: 2)[0]");
        assert!(matches!(&*e, Expr::Index(..)));
    }

    #[test]
    fn parses_full_component_declaration() {
        let src = r#"
            component Disk {
                latency: Duration = 2ms;
                uses cache: Cache;
                native method read(key: Int) -> Outcomes[Int];
                method write(key: Int, value: Int) {
                    let ok = sample(cache.put(key, value));
                    return ok;
                }
            }
        "#;
        let mut p = Parser::new(src).unwrap();
        let file = p.parse_file("test.sim");
        assert!(p.diagnostics.is_ok(), "{:?}", p.diagnostics.errors);
        assert_eq!(file.decls.len(), 1);
        match &*file.decls[0] {
            Decl::Component(c) => {
                assert_eq!(c.name, "Disk");
                assert_eq!(c.params.len(), 1);
                assert_eq!(c.uses.len(), 1);
                assert_eq!(c.methods.len(), 2);
                assert!(c.methods[0].native);
            }
            other => panic!("expected component, got {other:?}"),
        }
    }

    #[test]
    fn collects_multiple_errors_instead_of_failing_fast() {
        let src = "component { } enum { }";
        let mut p = Parser::new(src).unwrap();
        let _ = p.parse_file("bad.sim");
        assert!(p.diagnostics.errors.len() >= 2);
    }

    #[test]
    fn chained_comparison_is_reported_as_error() {
        let mut p = Parser::new("1 < 2 < 3").unwrap();
        assert!(p.parse_expr().is_err());
    }

    #[test]
    fn comparison_chain_interleaved_with_tighter_operator_is_reported_as_error() {
        // The `+` binds tighter than `<` and folds away first, so the two
        // `<`s still end up directly nested even though they aren't
        // raw-adjacent in the source text.
        let mut p = Parser::new("1 < 2 + 3 < 4").unwrap();
        assert!(p.parse_expr().is_err());
    }
}
