//! Type signatures.
//!
//! A [`TypeRef`] names the underlying declaration, its type arguments and its
//! nullability. Equality is structural: the optional `alias` is a display hint
//! recorded by schema providers and never takes part in comparison, so an alias
//! and the type it stands for compare equal.

use crate::error::SchemaError;
use crate::names;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Declaration-site or use-site variance of a type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    Invariant,
    /// `out T`
    Out,
    /// `in T`
    In,
}

impl Variance {
    fn prefix(&self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::Out => "out ",
            Variance::In => "in ",
        }
    }
}

/// A type argument of a generic signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    /// Star projection `*`.
    Star,
    Type { variance: Variance, ty: TypeRef },
}

impl TypeArg {
    pub fn invariant(ty: TypeRef) -> Self {
        TypeArg::Type {
            variance: Variance::Invariant,
            ty,
        }
    }

    pub fn out(ty: TypeRef) -> Self {
        TypeArg::Type {
            variance: Variance::Out,
            ty,
        }
    }

    /// The argument type, `None` for star projections.
    pub fn ty(&self) -> Option<&TypeRef> {
        match self {
            TypeArg::Star => None,
            TypeArg::Type { ty, .. } => Some(ty),
        }
    }

    pub fn variance(&self) -> Option<Variance> {
        match self {
            TypeArg::Star => None,
            TypeArg::Type { variance, .. } => Some(*variance),
        }
    }
}

/// A reference to a declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    /// Fully-qualified name of the underlying declaration.
    pub name: String,
    pub args: Vec<TypeArg>,
    pub nullable: bool,
    /// Name the type was written as, if it was reached through an alias.
    pub alias: Option<String>,
}

impl TypeRef {
    /// Non-generic, non-null type. Short well-known names are qualified.
    pub fn new(name: &str) -> Self {
        Self {
            name: names::qualify(name).to_string(),
            args: Vec::new(),
            nullable: false,
            alias: None,
        }
    }

    pub fn generic(name: &str, args: Vec<TypeArg>) -> Self {
        Self {
            args,
            ..Self::new(name)
        }
    }

    /// Parse Kotlin type notation, e.g. `Map<String, List<out Int?>>?`.
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        let mut parser = NotationParser { input, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }

    pub fn with_nullability(&self, nullable: bool) -> Self {
        Self {
            nullable,
            ..self.clone()
        }
    }

    /// The nullable variant of this type.
    pub fn as_nullable(&self) -> Self {
        self.with_nullability(true)
    }

    /// The non-null variant of this type.
    pub fn as_non_null(&self) -> Self {
        self.with_nullability(false)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Whether both signatures refer to the same declaration, ignoring arguments
    /// and nullability.
    pub fn is(&self, qualified: &str) -> bool {
        self.name == qualified
    }

    /// The type of the `index`-th argument, `None` if absent or a star projection.
    pub fn type_arg(&self, index: usize) -> Option<&TypeRef> {
        self.args.get(index).and_then(TypeArg::ty)
    }

    pub fn simple_name(&self) -> &str {
        names::simple_name(&self.name)
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.nullable == other.nullable && self.args == other.args
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.args.hash(state);
        self.nullable.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Star => f.write_str("*"),
            TypeArg::Type { variance, ty } => write!(f, "{}{}", variance.prefix(), ty),
        }
    }
}

impl FromStr for TypeRef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

struct NotationParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> NotationParser<'a> {
    fn error(&self, message: &str) -> SchemaError {
        SchemaError::TypeNotation {
            input: self.input.to_string(),
            message: format!("{} at offset {}", message, self.pos),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: u8) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        let bytes = self.input.as_bytes();
        if start == self.pos || bytes[start].is_ascii_digit() {
            self.pos = start;
            return None;
        }
        Some(&self.input[start..self.pos])
    }

    /// Whitespace followed by the start of a name.
    fn at_spaced_name(&self) -> bool {
        let rest = &self.input.as_bytes()[self.pos..];
        let spaces = rest.iter().take_while(|c| c.is_ascii_whitespace()).count();
        spaces > 0
            && rest
                .get(spaces)
                .is_some_and(|c| c.is_ascii_alphabetic() || *c == b'_')
    }

    fn parse_name(&mut self) -> Result<String, SchemaError> {
        let first = self.ident().ok_or_else(|| self.error("expected type name"))?;
        let mut name = first.to_string();
        while self.peek() == Some(b'.') {
            self.pos += 1;
            let segment = self
                .ident()
                .ok_or_else(|| self.error("expected name segment after `.`"))?;
            name.push('.');
            name.push_str(segment);
        }
        Ok(names::qualify(&name).to_string())
    }

    fn parse_type(&mut self) -> Result<TypeRef, SchemaError> {
        let name = self.parse_name()?;
        let mut args = Vec::new();
        if self.eat(b'<') {
            loop {
                args.push(self.parse_arg()?);
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }
        let nullable = self.eat(b'?');
        Ok(TypeRef {
            name,
            args,
            nullable,
            alias: None,
        })
    }

    fn parse_arg(&mut self) -> Result<TypeArg, SchemaError> {
        if self.eat(b'*') {
            return Ok(TypeArg::Star);
        }
        let save = self.pos;
        let variance = match self.ident() {
            Some("out") if self.at_spaced_name() => Variance::Out,
            Some("in") if self.at_spaced_name() => Variance::In,
            _ => {
                self.pos = save;
                Variance::Invariant
            }
        };
        let ty = self.parse_type()?;
        Ok(TypeArg::Type { variance, ty })
    }
}
