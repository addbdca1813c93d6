//! Typed syntax tree for JavaScript modules
//!
//! Every function-like construct (declarations, expressions, arrows, class
//! and object methods, accessors, constructors) shares the [`Function`] node
//! so rewrites can treat them uniformly.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A parsed module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Identifier created by a rewrite, without source position
    pub fn synthetic(name: impl Into<String>) -> Self {
        Self::new(name, Span::synthetic())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub body: Vec<Stmt>,
    pub span: Span,
}

// ==================== Statements ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr {
        expr: Expr,
        span: Span,
    },
    Var(VarDecl),
    Function(Function),
    Class(Class),
    Return {
        arg: Option<Expr>,
        span: Span,
    },
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
        span: Span,
    },
    Block(Block),
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
        span: Span,
    },
    ForIn {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    ForOf {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
        is_await: bool,
        span: Span,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
        span: Span,
    },
    Break {
        label: Option<Ident>,
        span: Span,
    },
    Continue {
        label: Option<Ident>,
        span: Span,
    },
    Throw {
        arg: Expr,
        span: Span,
    },
    Try {
        block: Block,
        handler: Option<CatchClause>,
        finalizer: Option<Block>,
        span: Span,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
        span: Span,
    },
    Labeled {
        label: Ident,
        body: Box<Stmt>,
        span: Span,
    },
    Import(ImportDecl),
    Export(ExportDecl),
    Empty {
        span: Span,
    },
    Debugger {
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::For { span, .. }
            | Stmt::ForIn { span, .. }
            | Stmt::ForOf { span, .. }
            | Stmt::While { span, .. }
            | Stmt::DoWhile { span, .. }
            | Stmt::Break { span, .. }
            | Stmt::Continue { span, .. }
            | Stmt::Throw { span, .. }
            | Stmt::Try { span, .. }
            | Stmt::Switch { span, .. }
            | Stmt::Labeled { span, .. }
            | Stmt::Empty { span }
            | Stmt::Debugger { span } => *span,
            Stmt::Var(decl) => decl.span,
            Stmt::Function(function) => function.span,
            Stmt::Class(class) => class.span,
            Stmt::Block(block) => block.span,
            Stmt::Import(import) => import.span,
            Stmt::Export(export) => export.span(),
        }
    }

    /// String-literal expression statement (a directive when it leads a body)
    pub fn as_directive(&self) -> Option<&str> {
        match self {
            Stmt::Expr {
                expr:
                    Expr::Lit(Lit {
                        kind: LitKind::Str,
                        raw,
                        ..
                    }),
                ..
            } => Some(raw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub kind: VarKind,
    pub decls: Vec<VarDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub id: Pattern,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    Var(VarDecl),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForHead {
    Var(VarDecl),
    Pattern(Pattern),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// `None` for `default:`
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
    pub span: Span,
}

// ==================== Modules ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: Lit,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportSpecifier {
    /// `import a from "m"`
    Default(Ident),
    /// `import * as ns from "m"`
    Namespace(Ident),
    /// `import { imported as local } from "m"`; `imported` may be a string
    Named { imported: String, local: Ident },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportDecl {
    /// `export function f() {}`, `export const a = 1`, ...
    Decl { decl: Box<Stmt>, span: Span },
    /// `export default ...`
    Default { value: DefaultExport, span: Span },
    /// `export { a, b as c } from "m"`
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<Lit>,
        span: Span,
    },
    /// `export * from "m"`, `export * as ns from "m"`
    All {
        exported: Option<String>,
        source: Lit,
        span: Span,
    },
}

impl ExportDecl {
    pub fn span(&self) -> Span {
        match self {
            ExportDecl::Decl { span, .. }
            | ExportDecl::Default { span, .. }
            | ExportDecl::Named { span, .. }
            | ExportDecl::All { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultExport {
    Function(Function),
    Class(Class),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

// ==================== Functions & classes ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: Option<Ident>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_arrow: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    Block(Block),
    /// Concise arrow body: `x => x + 1`
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: Option<Ident>,
    pub super_class: Option<Box<Expr>>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassMember {
    Method {
        key: PropKey,
        kind: MethodKind,
        is_static: bool,
        function: Function,
        span: Span,
    },
    Property {
        key: PropKey,
        is_static: bool,
        value: Option<Expr>,
        span: Span,
    },
    StaticBlock {
        body: Block,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropKey {
    Ident(Ident),
    /// String or numeric literal key
    Lit(Lit),
    /// `#name`, stored without the `#`
    Private(Ident),
    Computed(Box<Expr>),
}

// ==================== Expressions ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    Null,
    Bool,
    Num,
    BigInt,
    Str,
    Regex,
}

/// Literal, kept as its source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lit {
    pub kind: LitKind,
    pub raw: String,
    pub span: Span,
}

impl Lit {
    /// Double-quoted string literal for an arbitrary value
    pub fn string(value: &str) -> Self {
        let raw = serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""));
        Self {
            kind: LitKind::Str,
            raw,
            span: Span::synthetic(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Raw text chunks; always one more than `exprs`
    pub quasis: Vec<String>,
    pub exprs: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprOrSpread {
    pub spread: bool,
    pub expr: Expr,
}

impl ExprOrSpread {
    pub fn expr(expr: Expr) -> Self {
        Self {
            spread: false,
            expr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prop {
    KeyValue {
        key: PropKey,
        value: Expr,
        span: Span,
    },
    /// `{ a }`; `default` is only valid when the object is reinterpreted as a
    /// pattern (`({ a = 1 } = obj)`)
    Shorthand {
        id: Ident,
        default: Option<Expr>,
        span: Span,
    },
    Method {
        key: PropKey,
        kind: MethodKind,
        function: Function,
        span: Span,
    },
    Spread {
        arg: Expr,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberProp {
    Ident(Ident),
    Private(Ident),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    BitNot,
    Plus,
    Minus,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    BitOr,
    BitXor,
    BitAnd,
    In,
    InstanceOf,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::EqEqEq => "===",
            BinaryOp::NotEqEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Coalesce => "??",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Coalesce,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Exp => "**=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::And => "&&=",
            AssignOp::Or => "||=",
            AssignOp::Coalesce => "??=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Ident(Ident),
    Lit(Lit),
    Template(Template),
    TaggedTemplate {
        tag: Box<Expr>,
        quasi: Template,
        span: Span,
    },
    This(Span),
    Super(Span),
    /// `#name` on the left of `in`
    PrivateName(Ident),
    Array {
        elems: Vec<Option<ExprOrSpread>>,
        span: Span,
    },
    Object {
        props: Vec<Prop>,
        span: Span,
    },
    Function(Box<Function>),
    Arrow(Box<Function>),
    Class(Box<Class>),
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
        span: Span,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        arg: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Assign {
        op: AssignOp,
        target: Box<Pattern>,
        value: Box<Expr>,
        span: Span,
    },
    Cond {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<ExprOrSpread>,
        optional: bool,
        span: Span,
    },
    New {
        callee: Box<Expr>,
        args: Option<Vec<ExprOrSpread>>,
        span: Span,
    },
    Member {
        object: Box<Expr>,
        prop: MemberProp,
        optional: bool,
        span: Span,
    },
    Seq {
        exprs: Vec<Expr>,
        span: Span,
    },
    Yield {
        arg: Option<Box<Expr>>,
        delegate: bool,
        span: Span,
    },
    Await {
        arg: Box<Expr>,
        span: Span,
    },
    /// `new.target`, `import.meta`
    MetaProp {
        meta: Ident,
        prop: Ident,
        span: Span,
    },
    Paren {
        expr: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(ident) | Expr::PrivateName(ident) => ident.span,
            Expr::Lit(lit) => lit.span,
            Expr::Template(template) => template.span,
            Expr::This(span) | Expr::Super(span) => *span,
            Expr::Function(function) | Expr::Arrow(function) => function.span,
            Expr::Class(class) => class.span,
            Expr::TaggedTemplate { span, .. }
            | Expr::Array { span, .. }
            | Expr::Object { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Update { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Logical { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Cond { span, .. }
            | Expr::Call { span, .. }
            | Expr::New { span, .. }
            | Expr::Member { span, .. }
            | Expr::Seq { span, .. }
            | Expr::Yield { span, .. }
            | Expr::Await { span, .. }
            | Expr::MetaProp { span, .. }
            | Expr::Paren { span, .. } => *span,
        }
    }

    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(Ident::synthetic(name))
    }

    /// The `undefined` identifier
    pub fn undefined() -> Expr {
        Expr::ident("undefined")
    }

    /// Synthesized call `callee(args...)`
    pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            args: args.into_iter().map(ExprOrSpread::expr).collect(),
            optional: false,
            span: Span::synthetic(),
        }
    }

    /// Synthesized member access `object.name` (or `object?.name`)
    pub fn member(object: Expr, name: impl Into<String>, optional: bool) -> Expr {
        Expr::Member {
            object: Box::new(object),
            prop: MemberProp::Ident(Ident::synthetic(name)),
            optional,
            span: Span::synthetic(),
        }
    }
}

// ==================== Patterns ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Ident(Ident),
    Array {
        /// `None` is a hole; a trailing `Pattern::Rest` collects the rest
        elems: Vec<Option<Pattern>>,
        span: Span,
    },
    Object {
        props: Vec<ObjectPatProp>,
        span: Span,
    },
    /// Binding with a default value: `a = 1`
    Assign {
        left: Box<Pattern>,
        right: Box<Expr>,
        span: Span,
    },
    Rest {
        arg: Box<Pattern>,
        span: Span,
    },
    /// Member-expression target, only valid in assignments
    Expr(Box<Expr>),
}

impl Pattern {
    pub fn ident(name: impl Into<String>) -> Pattern {
        Pattern::Ident(Ident::synthetic(name))
    }

    pub fn span(&self) -> Span {
        match self {
            Pattern::Ident(ident) => ident.span,
            Pattern::Array { span, .. }
            | Pattern::Object { span, .. }
            | Pattern::Assign { span, .. }
            | Pattern::Rest { span, .. } => *span,
            Pattern::Expr(expr) => expr.span(),
        }
    }

    /// Names bound by this pattern, in source order
    pub fn bound_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_bound_names(&mut names);
        names
    }

    fn collect_bound_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Pattern::Ident(ident) => names.push(&ident.name),
            Pattern::Array { elems, .. } => {
                for elem in elems.iter().flatten() {
                    elem.collect_bound_names(names);
                }
            }
            Pattern::Object { props, .. } => {
                for prop in props {
                    match prop {
                        ObjectPatProp::KeyValue { value, .. } => value.collect_bound_names(names),
                        ObjectPatProp::Shorthand { id, .. } => names.push(&id.name),
                        ObjectPatProp::Rest { arg, .. } => arg.collect_bound_names(names),
                    }
                }
            }
            Pattern::Assign { left, .. } => left.collect_bound_names(names),
            Pattern::Rest { arg, .. } => arg.collect_bound_names(names),
            Pattern::Expr(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectPatProp {
    KeyValue {
        key: PropKey,
        value: Pattern,
        span: Span,
    },
    Shorthand {
        id: Ident,
        default: Option<Expr>,
        span: Span,
    },
    Rest {
        arg: Pattern,
        span: Span,
    },
}
