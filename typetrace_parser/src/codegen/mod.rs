//! Source printer
//!
//! Renders an AST back to JavaScript with two-space indentation. Parentheses
//! are emitted from operator precedence, so synthesized nodes never need
//! explicit `Paren` wrappers to print correctly.

mod expressions;

use crate::ast::{
    Block, Class, ClassMember, DefaultExport, ExportDecl, Expr, ForHead, ForInit, Function,
    FunctionBody, ImportSpecifier, MethodKind, Program, PropKey, Stmt, VarDecl,
};
use crate::token::Precedence;

/// Print a program
pub fn generate(program: &Program) -> String {
    let mut printer = Printer::new();
    for stmt in &program.body {
        printer.stmt(stmt);
    }
    printer.finish()
}

/// Print a single expression
pub fn generate_expr(expr: &Expr) -> String {
    let mut printer = Printer::new();
    printer.expr(expr, Precedence::Comma);
    printer.finish()
}

#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    indent: usize,
    /// Parenthesize `in` (for-statement initializers)
    no_in: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    // ==================== Statements ====================

    /// Print a statement on its own line
    pub fn stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        self.stmt_inline(stmt);
        self.out.push('\n');
    }

    /// Print a statement at the current position, without a trailing newline
    fn stmt_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr { expr, .. } => {
                if expressions::starts_ambiguously(expr, true) {
                    self.write("(");
                    self.expr(expr, Precedence::Comma);
                    self.write(")");
                } else {
                    self.expr(expr, Precedence::Comma);
                }
                self.write(";");
            }
            Stmt::Var(decl) => {
                self.var_decl(decl);
                self.write(";");
            }
            Stmt::Function(function) => self.function(function, None),
            Stmt::Class(class) => self.class(class),
            Stmt::Return { arg, .. } => {
                self.write("return");
                if let Some(arg) = arg {
                    self.write(" ");
                    self.expr(arg, Precedence::Comma);
                }
                self.write(";");
            }
            Stmt::If {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.write("if (");
                self.expr(test, Precedence::Comma);
                self.write(")");
                self.body(consequent);
                if let Some(alternate) = alternate {
                    if matches!(**consequent, Stmt::Block(_)) {
                        self.write(" else");
                    } else {
                        self.newline();
                        self.write("else");
                    }
                    if matches!(**alternate, Stmt::If { .. }) {
                        self.write(" ");
                        self.stmt_inline(alternate);
                    } else {
                        self.body(alternate);
                    }
                }
            }
            Stmt::Block(block) => self.block(block),
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                self.write("for (");
                self.no_in = true;
                match init {
                    Some(ForInit::Var(decl)) => self.var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.expr(expr, Precedence::Comma),
                    None => {}
                }
                self.no_in = false;
                self.write(";");
                if let Some(test) = test {
                    self.write(" ");
                    self.expr(test, Precedence::Comma);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write(" ");
                    self.expr(update, Precedence::Comma);
                }
                self.write(")");
                self.body(body);
            }
            Stmt::ForIn {
                left, right, body, ..
            } => {
                self.write("for (");
                self.for_head(left);
                self.write(" in ");
                self.expr(right, Precedence::Comma);
                self.write(")");
                self.body(body);
            }
            Stmt::ForOf {
                left,
                right,
                body,
                is_await,
                ..
            } => {
                self.write(if *is_await { "for await (" } else { "for (" });
                self.for_head(left);
                self.write(" of ");
                self.expr(right, Precedence::Assign);
                self.write(")");
                self.body(body);
            }
            Stmt::While { test, body, .. } => {
                self.write("while (");
                self.expr(test, Precedence::Comma);
                self.write(")");
                self.body(body);
            }
            Stmt::DoWhile { body, test, .. } => {
                self.write("do");
                self.body(body);
                if matches!(**body, Stmt::Block(_)) {
                    self.write(" ");
                } else {
                    self.newline();
                }
                self.write("while (");
                self.expr(test, Precedence::Comma);
                self.write(");");
            }
            Stmt::Break { label, .. } => {
                self.write("break");
                if let Some(label) = label {
                    self.write(" ");
                    self.write(&label.name);
                }
                self.write(";");
            }
            Stmt::Continue { label, .. } => {
                self.write("continue");
                if let Some(label) = label {
                    self.write(" ");
                    self.write(&label.name);
                }
                self.write(";");
            }
            Stmt::Throw { arg, .. } => {
                self.write("throw ");
                self.expr(arg, Precedence::Comma);
                self.write(";");
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.write("try ");
                self.block(block);
                if let Some(handler) = handler {
                    self.write(" catch ");
                    if let Some(param) = &handler.param {
                        self.write("(");
                        self.pattern(param);
                        self.write(") ");
                    }
                    self.block(&handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.write(" finally ");
                    self.block(finalizer);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
                ..
            } => {
                self.write("switch (");
                self.expr(discriminant, Precedence::Comma);
                self.write(") {");
                self.indent += 1;
                for case in cases {
                    self.newline();
                    match &case.test {
                        Some(test) => {
                            self.write("case ");
                            self.expr(test, Precedence::Comma);
                            self.write(":");
                        }
                        None => self.write("default:"),
                    }
                    self.indent += 1;
                    for stmt in &case.consequent {
                        self.newline();
                        self.stmt_inline(stmt);
                    }
                    self.indent -= 1;
                }
                self.indent -= 1;
                self.newline();
                self.write("}");
            }
            Stmt::Labeled { label, body, .. } => {
                self.write(&label.name);
                self.write(": ");
                self.stmt_inline(body);
            }
            Stmt::Import(import) => {
                self.write("import ");
                let mut named = Vec::new();
                let mut wrote_clause = false;
                for specifier in &import.specifiers {
                    match specifier {
                        ImportSpecifier::Default(local) => {
                            self.write(&local.name);
                            wrote_clause = true;
                        }
                        ImportSpecifier::Namespace(local) => {
                            if wrote_clause {
                                self.write(", ");
                            }
                            self.write("* as ");
                            self.write(&local.name);
                            wrote_clause = true;
                        }
                        ImportSpecifier::Named { imported, local } => {
                            named.push(if *imported == local.name {
                                local.name.clone()
                            } else {
                                format!("{} as {}", imported, local.name)
                            });
                        }
                    }
                }
                if !named.is_empty() {
                    if wrote_clause {
                        self.write(", ");
                    }
                    self.write("{");
                    self.write(&named.join(", "));
                    self.write("}");
                    wrote_clause = true;
                }
                if wrote_clause {
                    self.write(" from ");
                }
                self.write(&import.source.raw);
                self.write(";");
            }
            Stmt::Export(export) => self.export(export),
            Stmt::Empty { .. } => self.write(";"),
            Stmt::Debugger { .. } => self.write("debugger;"),
        }
    }

    fn export(&mut self, export: &ExportDecl) {
        self.write("export ");
        match export {
            ExportDecl::Decl { decl, .. } => self.stmt_inline(decl),
            ExportDecl::Default { value, .. } => {
                self.write("default ");
                match value {
                    DefaultExport::Function(function) => self.function(function, None),
                    DefaultExport::Class(class) => self.class(class),
                    DefaultExport::Expr(expr) => {
                        if expressions::starts_ambiguously(expr, true) {
                            self.write("(");
                            self.expr(expr, Precedence::Assign);
                            self.write(")");
                        } else {
                            self.expr(expr, Precedence::Assign);
                        }
                        self.write(";");
                    }
                }
            }
            ExportDecl::Named {
                specifiers, source, ..
            } => {
                let names: Vec<String> = specifiers
                    .iter()
                    .map(|s| {
                        if s.local == s.exported {
                            s.local.clone()
                        } else {
                            format!("{} as {}", s.local, s.exported)
                        }
                    })
                    .collect();
                self.write("{");
                self.write(&names.join(", "));
                self.write("}");
                if let Some(source) = source {
                    self.write(" from ");
                    self.write(&source.raw);
                }
                self.write(";");
            }
            ExportDecl::All {
                exported, source, ..
            } => {
                self.write("*");
                if let Some(exported) = exported {
                    self.write(" as ");
                    self.write(exported);
                }
                self.write(" from ");
                self.write(&source.raw);
                self.write(";");
            }
        }
    }

    /// Body of a compound statement, after its header
    fn body(&mut self, body: &Stmt) {
        match body {
            Stmt::Block(block) => {
                self.write(" ");
                self.block(block);
            }
            Stmt::Empty { .. } => self.write(";"),
            other => {
                self.write(" ");
                self.stmt_inline(other);
            }
        }
    }

    pub fn block(&mut self, block: &Block) {
        if block.body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent += 1;
        for stmt in &block.body {
            self.newline();
            self.stmt_inline(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.write(decl.kind.as_str());
        self.write(" ");
        for (i, declarator) in decl.decls.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.pattern(&declarator.id);
            if let Some(init) = &declarator.init {
                self.write(" = ");
                self.expr(init, Precedence::Assign);
            }
        }
    }

    fn for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::Var(decl) => self.var_decl(decl),
            ForHead::Pattern(pattern) => self.pattern(pattern),
        }
    }

    // ==================== Functions & Classes ====================

    /// Print a function; `method` carries the key and kind for methods
    fn function(&mut self, function: &Function, method: Option<(&PropKey, MethodKind)>) {
        let saved_in = std::mem::replace(&mut self.no_in, false);
        match method {
            Some((key, kind)) => {
                if function.is_async {
                    self.write("async ");
                }
                match kind {
                    MethodKind::Getter => self.write("get "),
                    MethodKind::Setter => self.write("set "),
                    MethodKind::Method | MethodKind::Constructor => {}
                }
                if function.is_generator {
                    self.write("*");
                }
                self.prop_key(key);
            }
            None => {
                if function.is_async {
                    self.write("async ");
                }
                if !function.is_arrow {
                    self.write(if function.is_generator {
                        "function*"
                    } else {
                        "function"
                    });
                    match &function.id {
                        Some(id) => {
                            self.write(" ");
                            self.write(&id.name);
                        }
                        None => self.write(" "),
                    }
                }
            }
        }

        self.write("(");
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.pattern(param);
        }
        self.write(")");

        if function.is_arrow {
            self.write(" =>");
        }
        match &function.body {
            FunctionBody::Block(block) => {
                self.write(" ");
                self.block(block);
            }
            FunctionBody::Expr(expr) => {
                self.write(" ");
                if expressions::starts_ambiguously(expr, false) {
                    self.write("(");
                    self.expr(expr, Precedence::Comma);
                    self.write(")");
                } else {
                    self.expr(expr, Precedence::Assign);
                }
            }
        }
        self.no_in = saved_in;
    }

    fn class(&mut self, class: &Class) {
        self.write("class");
        if let Some(id) = &class.id {
            self.write(" ");
            self.write(&id.name);
        }
        if let Some(super_class) = &class.super_class {
            self.write(" extends ");
            self.expr(super_class, Precedence::Call);
        }
        if class.body.is_empty() {
            self.write(" {}");
            return;
        }

        self.write(" {");
        self.indent += 1;
        for member in &class.body {
            self.newline();
            match member {
                ClassMember::Method {
                    key,
                    kind,
                    is_static,
                    function,
                    ..
                } => {
                    if *is_static {
                        self.write("static ");
                    }
                    self.function(function, Some((key, *kind)));
                }
                ClassMember::Property {
                    key,
                    is_static,
                    value,
                    ..
                } => {
                    if *is_static {
                        self.write("static ");
                    }
                    self.prop_key(key);
                    if let Some(value) = value {
                        self.write(" = ");
                        self.expr(value, Precedence::Assign);
                    }
                    self.write(";");
                }
                ClassMember::StaticBlock { body, .. } => {
                    self.write("static ");
                    self.block(body);
                }
            }
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn prop_key(&mut self, key: &PropKey) {
        match key {
            PropKey::Ident(id) => self.write(&id.name),
            PropKey::Lit(lit) => self.write(&lit.raw),
            PropKey::Private(id) => {
                self.write("#");
                self.write(&id.name);
            }
            PropKey::Computed(expr) => {
                self.write("[");
                self.expr(expr, Precedence::Assign);
                self.write("]");
            }
        }
    }
}
