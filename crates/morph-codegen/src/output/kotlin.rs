//! Kotlin writer for mapping fragments.
//!
//! Qualified names in the IR are shortened to their simple name and recorded
//! as imports. Names from default-imported packages are shortened without an
//! import. When two different declarations share a simple name, the one seen
//! later is written fully qualified.

use crate::ir::*;
use crate::output::RenderedCode;
use crate::traits::Writer;
use morph_schema::{TypeArg, TypeRef, Variance, names};
use std::collections::{BTreeMap, BTreeSet};

/// Static instance of the Kotlin writer for registry.
pub static KOTLIN_WRITER: KotlinWriterImpl = KotlinWriterImpl;

/// Kotlin writer implementing the Writer trait.
pub struct KotlinWriterImpl;

impl Writer for KotlinWriterImpl {
    fn language(&self) -> &'static str {
        "kotlin"
    }

    fn extension(&self) -> &'static str {
        "kt"
    }

    fn write(&self, fragment: &Fragment) -> RenderedCode {
        KotlinWriter::emit(fragment)
    }
}

/// Emits IR as Kotlin source code.
pub struct KotlinWriter {
    output: String,
    indent: usize,
    /// Simple name -> the qualified name it stands for in this output.
    names: BTreeMap<String, String>,
    /// Imported extension functions. Same-named extensions from different
    /// packages can all be imported; overload resolution picks by receiver.
    extensions: BTreeSet<String>,
}

impl Default for KotlinWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl KotlinWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
            names: BTreeMap::new(),
            extensions: BTreeSet::new(),
        }
    }

    /// Emit a fragment as a Kotlin function body.
    pub fn emit(fragment: &Fragment) -> RenderedCode {
        let mut writer = Self::new();
        for stmt in &fragment.body {
            writer.write_stmt(stmt);
            writer.output.push('\n');
        }
        let imports = writer.imports();
        RenderedCode {
            body: writer.output,
            imports,
        }
    }

    /// Render a single expression, discarding imports.
    pub fn expr_to_string(expr: &Expr) -> String {
        let mut writer = Self::new();
        writer.write_expr(expr);
        writer.output
    }

    fn imports(&self) -> Vec<String> {
        let imports: BTreeSet<&String> = self
            .names
            .values()
            .chain(&self.extensions)
            .filter(|qualified| !names::DEFAULT_IMPORTS.contains(&names::package_of(qualified)))
            .collect();
        imports.into_iter().cloned().collect()
    }

    /// How `qualified` is spelled in the output.
    fn name_ref(&mut self, qualified: &str) -> String {
        if !qualified.contains('.') {
            return qualified.to_string();
        }
        let simple = names::simple_name(qualified);
        match self.names.get(simple) {
            Some(existing) if existing == qualified => simple.to_string(),
            Some(_) => qualified.to_string(),
            None => {
                self.names.insert(simple.to_string(), qualified.to_string());
                simple.to_string()
            }
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::Val { name, init } => {
                self.output.push_str("val ");
                self.output.push_str(name);
                self.output.push_str(" = ");
                self.write_expr(init);
            }
            Stmt::Assign { target, value } => {
                self.write_expr(target);
                self.output.push_str(" = ");
                self.write_expr(value);
            }
            Stmt::Return { value } => {
                self.output.push_str("return ");
                self.write_expr(value);
            }
        }
    }

    fn write_type(&mut self, ty: &TypeRef) {
        let name = self.name_ref(&ty.name);
        self.output.push_str(&name);
        if !ty.args.is_empty() {
            self.output.push('<');
            for (i, arg) in ty.args.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                match arg {
                    TypeArg::Star => self.output.push('*'),
                    TypeArg::Type { variance, ty } => {
                        match variance {
                            Variance::Invariant => {}
                            Variance::Out => self.output.push_str("out "),
                            Variance::In => self.output.push_str("in "),
                        }
                        self.write_type(ty);
                    }
                }
            }
            self.output.push('>');
        }
        if ty.nullable {
            self.output.push('?');
        }
    }

    /// Write an expression used as a receiver or operand of a postfix operator.
    fn write_receiver(&mut self, expr: &Expr) {
        if matches!(expr, Expr::Binary { .. } | Expr::If { .. }) {
            self.output.push('(');
            self.write_expr(expr);
            self.output.push(')');
        } else {
            self.write_expr(expr);
        }
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident { name } => self.output.push_str(name),

            Expr::Raw { code } => self.output.push_str(code),

            Expr::Null => self.output.push_str("null"),

            Expr::TypeName { name } => {
                let name = self.name_ref(name);
                self.output.push_str(&name);
            }

            Expr::Member {
                receiver,
                name,
                safe,
            } => {
                self.write_receiver(receiver);
                self.output.push_str(if *safe { "?." } else { "." });
                self.output.push_str(name);
            }

            Expr::Call {
                receiver,
                name,
                args,
                lambda,
                safe,
            } => {
                match receiver {
                    Some(receiver) => {
                        self.write_receiver(receiver);
                        self.output.push_str(if *safe { "?." } else { "." });
                        // Qualified extension function: import it, call by simple name.
                        let simple = names::simple_name(name);
                        if simple.len() != name.len() {
                            self.extensions.insert(name.clone());
                        }
                        self.output.push_str(simple);
                    }
                    None => {
                        let name = self.name_ref(name);
                        self.output.push_str(&name);
                    }
                }
                if !args.is_empty() || lambda.is_none() {
                    self.output.push('(');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.output.push_str(", ");
                        }
                        if let Some(name) = &arg.name {
                            self.output.push_str(name);
                            self.output.push_str(" = ");
                        }
                        self.write_expr(&arg.value);
                    }
                    self.output.push(')');
                }
                if let Some(lambda) = lambda {
                    self.output.push_str(" { ");
                    if !lambda.params.is_empty() {
                        self.output.push_str(&lambda.params.join(", "));
                        self.output.push_str(" -> ");
                    }
                    self.write_expr(&lambda.body);
                    self.output.push_str(" }");
                }
            }

            Expr::NotNull { expr } => {
                self.write_receiver(expr);
                self.output.push_str("!!");
            }

            Expr::Cast { expr, ty } => {
                self.output.push('(');
                self.write_receiver(expr);
                self.output.push_str(" as ");
                self.write_type(ty);
                self.output.push(')');
            }

            Expr::Binary { left, op, right } => {
                self.write_receiver(left);
                self.output.push(' ');
                self.output.push_str(op);
                self.output.push(' ');
                self.write_receiver(right);
            }

            Expr::If {
                cond,
                then,
                otherwise,
            } => {
                self.output.push_str("if (");
                self.write_expr(cond);
                self.output.push_str(") ");
                self.write_expr(then);
                self.output.push_str(" else ");
                self.write_expr(otherwise);
            }

            Expr::When { subject, arms } => {
                self.output.push_str("when (");
                self.write_expr(subject);
                self.output.push_str(") {\n");
                self.indent += 1;
                for arm in arms {
                    self.write_indent();
                    self.write_expr(&arm.pattern);
                    self.output.push_str(" -> ");
                    self.write_expr(&arm.value);
                    self.output.push('\n');
                }
                self.indent -= 1;
                self.write_indent();
                self.output.push('}');
            }

            Expr::Index { receiver, index } => {
                self.write_receiver(receiver);
                self.output.push('[');
                self.write_expr(index);
                self.output.push(']');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(args: Vec<Arg>) -> Expr {
        Expr::function("com.example.Person", args)
    }

    #[test]
    fn test_return_constructor_call() {
        let fragment = Fragment {
            body: vec![Stmt::Return {
                value: person(vec![Arg::named("name", Expr::ident("name"))]),
            }],
        };
        let code = KotlinWriter::emit(&fragment);
        insta::assert_snapshot!(code.body.trim_end(), @"return Person(name = name)");
        assert_eq!(code.imports, vec!["com.example.Person".to_string()]);
    }

    #[test]
    fn test_val_and_assignments() {
        let fragment = Fragment {
            body: vec![
                Stmt::Val {
                    name: "target".into(),
                    init: person(Vec::new()),
                },
                Stmt::Assign {
                    target: Expr::ident("target").member("age", false),
                    value: Expr::ident("age"),
                },
                Stmt::Return {
                    value: Expr::ident("target"),
                },
            ],
        };
        insta::assert_snapshot!(KotlinWriter::emit(&fragment).body.trim_end(), @r"
        val target = Person()
        target.age = age
        return target
        ");
    }

    #[test]
    fn test_lambda_without_parens() {
        let expr = Expr::ident("tags")
            .call_with_lambda(
                "map",
                false,
                Lambda::it(Expr::it().call("toInt", Vec::new(), false)),
            )
            .call("toSet", Vec::new(), false);
        assert_eq!(KotlinWriter::expr_to_string(&expr), "tags.map { it.toInt() }.toSet()");
    }

    #[test]
    fn test_destructuring_lambda() {
        let expr = Expr::ident("m").call_with_lambda(
            "mapKeys",
            true,
            Lambda::with_params(&["(key, _)"], Expr::ident("key").call("toInt", Vec::new(), false)),
        );
        assert_eq!(
            KotlinWriter::expr_to_string(&expr),
            "m?.mapKeys { (key, _) -> key.toInt() }"
        );
    }

    #[test]
    fn test_when_is_indented() {
        let expr = Expr::When {
            subject: Box::new(Expr::ident("color")),
            arms: vec![
                WhenArm {
                    pattern: Expr::type_name("a.Color").member("RED", false),
                    value: Expr::type_name("b.Color").member("RED", false),
                },
                WhenArm {
                    pattern: Expr::Null,
                    value: Expr::Null,
                },
            ],
        };
        let code = KotlinWriter::emit(&Fragment {
            body: vec![Stmt::Return { value: expr }],
        });
        insta::assert_snapshot!(code.body.trim_end(), @r"
        return when (color) {
            Color.RED -> b.Color.RED
            null -> null
        }
        ");
        assert_eq!(code.imports, vec!["a.Color".to_string()]);
    }

    #[test]
    fn test_cast_and_assertion() {
        let ty = TypeRef::parse("MutableList<String?>").unwrap();
        let expr = Expr::ident("xs").cast(ty).not_null();
        assert_eq!(
            KotlinWriter::expr_to_string(&expr),
            "(xs as MutableList<String?>)!!"
        );
    }

    #[test]
    fn test_binary_receiver_is_parenthesized() {
        let expr = Expr::ident("a").binary("to", Expr::ident("b")).call("first", Vec::new(), false);
        assert_eq!(KotlinWriter::expr_to_string(&expr), "(a to b).first()");
    }

    #[test]
    fn test_extension_import() {
        let expr = Expr::ident("xs").call("kotlinx.collections.immutable.toImmutableList", Vec::new(), false);
        let code = KotlinWriter::emit(&Fragment {
            body: vec![Stmt::Return { value: expr }],
        });
        assert_eq!(code.body, "return xs.toImmutableList()\n");
        assert_eq!(
            code.imports,
            vec!["kotlinx.collections.immutable.toImmutableList".to_string()]
        );
    }

    #[test]
    fn test_same_named_extensions_are_all_imported() {
        let fragment = Fragment {
            body: vec![
                Stmt::Val {
                    name: "p".into(),
                    init: Expr::ident("x").call("com.a.toDto", Vec::new(), false),
                },
                Stmt::Return {
                    value: Expr::ident("y").call("com.b.toDto", Vec::new(), false),
                },
            ],
        };
        let code = KotlinWriter::emit(&fragment);
        insta::assert_snapshot!(code.body.trim_end(), @r"
        val p = x.toDto()
        return y.toDto()
        ");
        assert_eq!(code.imports, vec!["com.a.toDto".to_string(), "com.b.toDto".to_string()]);
    }

    #[test]
    fn test_default_package_conflict_is_qualified() {
        let expr = Expr::function(
            "com.example.Pair",
            vec![Arg::positional(Expr::function("kotlin.Pair", Vec::new()))],
        );
        let code = KotlinWriter::emit(&Fragment {
            body: vec![Stmt::Return { value: expr }],
        });
        assert_eq!(code.body, "return Pair(kotlin.Pair())\n");
        assert_eq!(code.imports, vec!["com.example.Pair".to_string()]);
    }
}
