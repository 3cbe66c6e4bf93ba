//! Recursive-descent parser for the Thrift IDL subset used by schema files
//!
//! Produces an unresolved `Document`: named types are kept as written and
//! resolved later against the document and its includes.

use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::lexer::{tokenize, Spanned, Token};
use super::types::{ConstValue, FieldKind, RecordFlavor, Requiredness};

/// Type as written in the IDL
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Base(FieldKind),
    /// Typedef, enum or struct name, possibly `document.Name`
    Named(String),
    List(Box<TypeExpr>),
    Set(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub id: i16,
    pub name: String,
    pub ty: TypeExpr,
    pub requiredness: Requiredness,
    pub default: Option<ConstValue>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub name: String,
    pub flavor: RecordFlavor,
    pub fields: Vec<FieldDecl>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<(String, i32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub value: ConstValue,
    pub line: usize,
}

/// Parsed, unresolved IDL document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Include paths exactly as written
    pub includes: Vec<String>,
    pub namespaces: Vec<(String, String)>,
    pub records: Vec<RecordDecl>,
    pub enums: Vec<EnumDecl>,
    pub typedefs: Vec<TypedefDecl>,
    pub consts: Vec<ConstDecl>,
}

/// Parses IDL `source` for the document named `schema`
pub fn parse_document(schema: &str, source: &str) -> SchemaResult<Document> {
    let tokens = tokenize(schema, source)?;
    Parser { schema, tokens, pos: 0 }.document()
}

struct Parser<'a> {
    schema: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn document(mut self) -> SchemaResult<Document> {
        let mut doc = Document::default();

        while let Some(token) = self.peek().cloned() {
            let keyword = match token {
                Token::Ident(word) => word,
                other => return Err(self.error(format!("expected definition, found {:?}", other))),
            };
            self.pos += 1;

            match keyword.as_str() {
                "include" => {
                    let path = self.expect_literal()?;
                    doc.includes.push(path);
                }
                "cpp_include" => {
                    self.expect_literal()?;
                }
                "namespace" => {
                    let scope = match self.next_token() {
                        Some(Token::Ident(scope)) => scope,
                        Some(Token::Symbol('*')) => "*".to_string(),
                        _ => return Err(self.error("expected namespace scope")),
                    };
                    let name = self.expect_ident()?;
                    doc.namespaces.push((scope, name));
                }
                "typedef" => {
                    let line = self.line();
                    let ty = self.type_expr()?;
                    let name = self.expect_ident()?;
                    self.skip_annotations()?;
                    self.skip_separator();
                    doc.typedefs.push(TypedefDecl { name, ty, line });
                }
                "const" => {
                    let line = self.line();
                    let ty = self.type_expr()?;
                    let name = self.expect_ident()?;
                    self.expect_symbol('=')?;
                    let value = self.const_value()?;
                    self.skip_separator();
                    doc.consts.push(ConstDecl { name, ty, value, line });
                }
                "enum" => {
                    let decl = self.enum_decl()?;
                    doc.enums.push(decl);
                }
                "senum" => {
                    self.expect_ident()?;
                    self.skip_block('{', '}')?;
                }
                "struct" => doc.records.push(self.record_decl(RecordFlavor::Struct)?),
                "union" => doc.records.push(self.record_decl(RecordFlavor::Union)?),
                "exception" => doc.records.push(self.record_decl(RecordFlavor::Exception)?),
                "service" => {
                    self.expect_ident()?;
                    if self.peek_ident("extends") {
                        self.pos += 1;
                        self.expect_ident()?;
                    }
                    self.skip_block('{', '}')?;
                    self.skip_annotations()?;
                }
                other => return Err(self.error(format!("unknown definition keyword '{}'", other))),
            }
        }

        Ok(doc)
    }

    fn enum_decl(&mut self) -> SchemaResult<EnumDecl> {
        let name = self.expect_ident()?;
        self.expect_symbol('{')?;

        let mut members = Vec::new();
        let mut next_value: i64 = 0;
        while !self.eat_symbol('}') {
            let member = self.expect_ident()?;
            if self.eat_symbol('=') {
                next_value = match self.next_token() {
                    Some(Token::Int(v)) => v,
                    _ => return Err(self.error(format!("expected integer value for {}.{}", name, member))),
                };
            }
            let value = i32::try_from(next_value)
                .map_err(|_| self.error(format!("enum value out of range: {}", next_value)))?;
            members.push((member, value));
            next_value += 1;
            self.skip_annotations()?;
            self.skip_separator();
        }
        self.skip_annotations()?;

        Ok(EnumDecl { name, members })
    }

    fn record_decl(&mut self, flavor: RecordFlavor) -> SchemaResult<RecordDecl> {
        let line = self.line();
        let name = self.expect_ident()?;
        if self.peek_ident("xsd_all") {
            self.pos += 1;
        }
        self.expect_symbol('{')?;

        let mut fields = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut implicit_id: i16 = -1;
        while !self.eat_symbol('}') {
            let field = self.field_decl(&mut implicit_id)?;
            if !seen_ids.insert(field.id) {
                return Err(SchemaError::malformed_at_line(
                    self.schema,
                    field.line,
                    format!("duplicate field id {} in {}", field.id, name),
                ));
            }
            fields.push(field);
        }
        self.skip_annotations()?;

        Ok(RecordDecl { name, flavor, fields, line })
    }

    fn field_decl(&mut self, implicit_id: &mut i16) -> SchemaResult<FieldDecl> {
        let line = self.line();

        let id = if let Some(Token::Int(value)) = self.peek() {
            let value = *value;
            self.pos += 1;
            self.expect_symbol(':')?;
            i16::try_from(value).map_err(|_| self.error(format!("field id out of range: {}", value)))?
        } else {
            let id = *implicit_id;
            *implicit_id -= 1;
            id
        };

        let requiredness = if self.peek_ident("required") {
            self.pos += 1;
            Requiredness::Required
        } else if self.peek_ident("optional") {
            self.pos += 1;
            Requiredness::Optional
        } else {
            Requiredness::Default
        };

        let ty = self.type_expr()?;
        let name = self.expect_ident()?;
        let default = if self.eat_symbol('=') {
            Some(self.const_value()?)
        } else {
            None
        };
        self.skip_annotations()?;
        self.skip_separator();

        Ok(FieldDecl { id, name, ty, requiredness, default, line })
    }

    fn type_expr(&mut self) -> SchemaResult<TypeExpr> {
        let word = self.expect_ident()?;
        let ty = match word.as_str() {
            "bool" => TypeExpr::Base(FieldKind::Bool),
            "byte" | "i8" => TypeExpr::Base(FieldKind::Byte),
            "i16" => TypeExpr::Base(FieldKind::I16),
            "i32" => TypeExpr::Base(FieldKind::I32),
            "i64" => TypeExpr::Base(FieldKind::I64),
            "double" => TypeExpr::Base(FieldKind::Double),
            "string" | "slist" => TypeExpr::Base(FieldKind::String),
            "binary" => TypeExpr::Base(FieldKind::Binary),
            "list" => {
                self.expect_symbol('<')?;
                let elem = self.type_expr()?;
                self.expect_symbol('>')?;
                self.skip_cpp_type()?;
                TypeExpr::List(Box::new(elem))
            }
            "set" => {
                self.skip_cpp_type()?;
                self.expect_symbol('<')?;
                let elem = self.type_expr()?;
                self.expect_symbol('>')?;
                TypeExpr::Set(Box::new(elem))
            }
            "map" => {
                self.skip_cpp_type()?;
                self.expect_symbol('<')?;
                let key = self.type_expr()?;
                self.expect_symbol(',')?;
                let value = self.type_expr()?;
                self.expect_symbol('>')?;
                TypeExpr::Map(Box::new(key), Box::new(value))
            }
            _ => TypeExpr::Named(word),
        };
        self.skip_annotations()?;
        Ok(ty)
    }

    fn const_value(&mut self) -> SchemaResult<ConstValue> {
        match self.next_token() {
            Some(Token::Int(v)) => Ok(ConstValue::Int(v)),
            Some(Token::Double(v)) => Ok(ConstValue::Double(v)),
            Some(Token::Literal(s)) => Ok(ConstValue::Str(s)),
            Some(Token::Ident(word)) => Ok(match word.as_str() {
                "true" => ConstValue::Bool(true),
                "false" => ConstValue::Bool(false),
                _ => ConstValue::Ident(word),
            }),
            Some(Token::Symbol('[')) => {
                let mut items = Vec::new();
                while !self.eat_symbol(']') {
                    items.push(self.const_value()?);
                    self.skip_separator();
                }
                Ok(ConstValue::List(items))
            }
            Some(Token::Symbol('{')) => {
                let mut entries = Vec::new();
                while !self.eat_symbol('}') {
                    let key = self.const_value()?;
                    self.expect_symbol(':')?;
                    let value = self.const_value()?;
                    entries.push((key, value));
                    self.skip_separator();
                }
                Ok(ConstValue::Map(entries))
            }
            other => Err(self.error(format!("expected constant value, found {:?}", other))),
        }
    }

    fn skip_cpp_type(&mut self) -> SchemaResult<()> {
        if self.peek_ident("cpp_type") {
            self.pos += 1;
            self.expect_literal()?;
        }
        Ok(())
    }

    fn skip_annotations(&mut self) -> SchemaResult<()> {
        if matches!(self.peek(), Some(Token::Symbol('('))) {
            self.skip_block('(', ')')?;
        }
        Ok(())
    }

    /// Skips a balanced `open ... close` group starting at the current token
    fn skip_block(&mut self, open: char, close: char) -> SchemaResult<()> {
        self.expect_symbol(open)?;
        let mut depth = 1;
        while depth > 0 {
            match self.next_token() {
                Some(Token::Symbol(c)) if c == open => depth += 1,
                Some(Token::Symbol(c)) if c == close => depth -= 1,
                Some(_) => {}
                None => return Err(self.error(format!("unbalanced '{}'", open))),
            }
        }
        Ok(())
    }

    fn skip_separator(&mut self) {
        if matches!(self.peek(), Some(Token::Symbol(',')) | Some(Token::Symbol(';'))) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_ident(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(w)) if w == word)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_symbol(&mut self, symbol: char) -> bool {
        if matches!(self.peek(), Some(Token::Symbol(c)) if *c == symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_symbol(&mut self, symbol: char) -> SchemaResult<()> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}', found {:?}", symbol, self.peek())))
        }
    }

    fn expect_ident(&mut self) -> SchemaResult<String> {
        match self.next_token() {
            Some(Token::Ident(word)) => Ok(word),
            other => Err(self.error(format!("expected identifier, found {:?}", other))),
        }
    }

    fn expect_literal(&mut self) -> SchemaResult<String> {
        match self.next_token() {
            Some(Token::Literal(text)) => Ok(text),
            other => Err(self.error(format!("expected string literal, found {:?}", other))),
        }
    }

    /// Line of the current token, or of the last one at end of input
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |s| s.line)
    }

    fn error(&self, reason: impl Into<String>) -> SchemaError {
        SchemaError::malformed_at_line(self.schema, self.line(), reason)
    }
}
