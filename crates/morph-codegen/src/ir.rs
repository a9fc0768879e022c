//! Intermediate representation of generated mapping code.
//!
//! Converters build [`Expr`] trees instead of splicing strings; writers in
//! [`crate::output`] render them at the end. Names containing a `.` are
//! qualified and carry their import requirement with them: the writer renders
//! the simple name and records the import.

use morph_schema::TypeRef;
use serde::{Deserialize, Serialize};

/// A call argument, named or positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Expr,
}

impl Arg {
    pub fn positional(value: Expr) -> Self {
        Self { name: None, value }
    }

    pub fn named(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }
}

/// A trailing lambda. No parameters means the implicit `it`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    /// Parameter list as written, e.g. `(key, _)`.
    pub params: Vec<String>,
    pub body: Box<Expr>,
}

impl Lambda {
    pub fn it(body: Expr) -> Self {
        Self {
            params: Vec::new(),
            body: Box::new(body),
        }
    }

    pub fn with_params(params: &[&str], body: Expr) -> Self {
        Self {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Box::new(body),
        }
    }
}

/// One branch of a `when`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenArm {
    pub pattern: Expr,
    pub value: Expr,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    /// Local name: a variable, parameter or receiver property.
    Ident { name: String },
    /// Code emitted verbatim (constants, user expressions).
    Raw { code: String },
    Null,
    /// Reference to a type or object by qualified name.
    TypeName { name: String },
    /// `receiver.name` or `receiver?.name`.
    Member {
        receiver: Box<Expr>,
        name: String,
        safe: bool,
    },
    /// `receiver.name(args) { lambda }` or, without receiver, `name(args)`.
    Call {
        receiver: Option<Box<Expr>>,
        name: String,
        args: Vec<Arg>,
        lambda: Option<Lambda>,
        safe: bool,
    },
    /// `expr!!`
    NotNull { expr: Box<Expr> },
    /// `(expr as Type)`
    Cast { expr: Box<Expr>, ty: TypeRef },
    Binary {
        left: Box<Expr>,
        op: String,
        right: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    When { subject: Box<Expr>, arms: Vec<WhenArm> },
    Index { receiver: Box<Expr>, index: Box<Expr> },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident { name: name.into() }
    }

    /// The implicit lambda parameter.
    pub fn it() -> Self {
        Expr::ident("it")
    }

    pub fn raw(code: impl Into<String>) -> Self {
        Expr::Raw { code: code.into() }
    }

    pub fn type_name(name: impl Into<String>) -> Self {
        Expr::TypeName { name: name.into() }
    }

    /// Receiver-less call, e.g. a constructor call `com.example.Person(..)`.
    pub fn function(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Expr::Call {
            receiver: None,
            name: name.into(),
            args,
            lambda: None,
            safe: false,
        }
    }

    pub fn member(self, name: impl Into<String>, safe: bool) -> Self {
        Expr::Member {
            receiver: Box::new(self),
            name: name.into(),
            safe,
        }
    }

    pub fn call(self, name: impl Into<String>, args: Vec<Arg>, safe: bool) -> Self {
        Expr::Call {
            receiver: Some(Box::new(self)),
            name: name.into(),
            args,
            lambda: None,
            safe,
        }
    }

    pub fn call_with_lambda(self, name: impl Into<String>, safe: bool, lambda: Lambda) -> Self {
        Expr::Call {
            receiver: Some(Box::new(self)),
            name: name.into(),
            args: Vec::new(),
            lambda: Some(lambda),
            safe,
        }
    }

    pub fn not_null(self) -> Self {
        Expr::NotNull {
            expr: Box::new(self),
        }
    }

    pub fn cast(self, ty: TypeRef) -> Self {
        Expr::Cast {
            expr: Box::new(self),
            ty,
        }
    }

    pub fn binary(self, op: impl Into<String>, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(self),
            op: op.into(),
            right: Box::new(right),
        }
    }

    pub fn index(self, index: Expr) -> Self {
        Expr::Index {
            receiver: Box::new(self),
            index: Box::new(index),
        }
    }
}

/// A statement of a mapping function body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Stmt {
    Val { name: String, init: Expr },
    Assign { target: Expr, value: Expr },
    Return { value: Expr },
}

/// The body of one generated mapping function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub body: Vec<Stmt>,
}

impl Fragment {
    /// The expression of a single-`return` body.
    pub fn returned_expr(&self) -> Option<&Expr> {
        match self.body.as_slice() {
            [Stmt::Return { value }] => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_serializes_for_inspection() {
        let items = Expr::ident("dto").member("items", true);
        let fragment = Fragment {
            body: vec![
                Stmt::Val {
                    name: "target".into(),
                    init: Expr::function(
                        "com.example.Person",
                        vec![Arg::named("tags", items.call_with_lambda("map", true, Lambda::it(Expr::it().not_null())))],
                    ),
                },
                Stmt::Assign {
                    target: Expr::ident("target").member("size", false),
                    value: Expr::ident("dto").member("size", false).cast(TypeRef::new("Long")),
                },
                Stmt::Return {
                    value: Expr::ident("target"),
                },
            ],
        };

        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json["body"][0]["stmt"], "val");
        assert_eq!(json["body"][0]["init"]["node"], "call");
        assert_eq!(json["body"][1]["value"]["node"], "cast");
        assert_eq!(json["body"][1]["value"]["expr"]["node"], "member");

        let back: Fragment = serde_json::from_value(json).unwrap();
        assert_eq!(back, fragment);
    }
}
