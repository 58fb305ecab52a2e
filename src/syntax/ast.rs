//! Abstract Syntax Tree definitions for Numgrad
//!
//! Trees are produced by an external parser and consumed by the checker.
//! Expression and statement nodes carry a [`NodeId`], which keys every
//! checker output table, and the [`Span`] used when reporting on them.
//!
//! Type annotations are plain [`Type`] values; names the parser could not
//! resolve are carried as [`Type::Unresolved`].

use crate::diagnostics::Span;
use crate::types::{ClassType, FuncType, Type};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide unique node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Generate a new unique node ID
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A braced list of statements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self {
            id: NodeId::new(),
            span: Span::default(),
            stmts,
        }
    }
}

/// Function literal, named or anonymous; also used for class methods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncLit {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub name: Option<String>,
    /// Receiver name when this literal is a method
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub param_names: Vec<String>,
    pub ty: FuncType,
    pub body: Block,
}

impl FuncLit {
    pub fn new(params: Vec<(&str, Type)>, results: Vec<Type>, body: Vec<Stmt>) -> Self {
        let (param_names, params) = params
            .into_iter()
            .map(|(name, ty)| (name.to_string(), ty))
            .unzip();
        Self {
            id: NodeId::new(),
            span: Span::default(),
            name: None,
            receiver: None,
            param_names,
            ty: FuncType { params, results },
            body: Block::new(body),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }
}

/// Class declaration: a named struct-with-methods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub name: String,
    /// Declared shape; field and method types may still be unresolved
    pub class: ClassType,
    /// Method bodies, in the same order as `class.method_names`
    #[serde(default)]
    pub methods: Vec<FuncLit>,
}

/// Import declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Import {
    #[serde(default)]
    pub id: NodeId,
    #[serde(default)]
    pub span: Span,
    pub path: String,
    /// Local name; defaults to the package's own name
    #[serde(default)]
    pub name: Option<String>,
    /// `import "go:path"` style import resolved through the foreign bridge
    #[serde(default)]
    pub foreign: bool,
}

/// Statement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    /// `a, b = x, y` or, when `decl` is set, `a, b := x, y`
    Assign {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        #[serde(default)]
        decl: bool,
        left: Vec<Expr>,
        right: Vec<Expr>,
    },
    /// Bare expression statement
    Simple {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        expr: Box<Expr>,
    },
    Block(Block),
    If {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        #[serde(default)]
        init: Option<Box<Stmt>>,
        cond: Box<Expr>,
        body: Block,
        #[serde(default)]
        else_branch: Option<Box<Stmt>>,
    },
    For {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        #[serde(default)]
        init: Option<Box<Stmt>>,
        #[serde(default)]
        cond: Option<Box<Expr>>,
        #[serde(default)]
        post: Option<Box<Stmt>>,
        body: Block,
    },
    ClassDecl(ClassDecl),
    Return {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        #[serde(default)]
        exprs: Vec<Expr>,
    },
    Import(Import),
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Assign { id, .. }
            | Stmt::Simple { id, .. }
            | Stmt::If { id, .. }
            | Stmt::For { id, .. }
            | Stmt::Return { id, .. } => *id,
            Stmt::Block(block) => block.id,
            Stmt::ClassDecl(decl) => decl.id,
            Stmt::Import(import) => import.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Stmt::Assign { span, .. }
            | Stmt::Simple { span, .. }
            | Stmt::If { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Return { span, .. } => span,
            Stmt::Block(block) => &block.span,
            Stmt::ClassDecl(decl) => &decl.span,
            Stmt::Import(import) => &import.span,
        }
    }

    /// `names := values`
    pub fn define(names: &[&str], values: Vec<Expr>) -> Self {
        Stmt::Assign {
            id: NodeId::new(),
            span: Span::default(),
            decl: true,
            left: names.iter().map(|n| Expr::ident(*n)).collect(),
            right: values,
        }
    }

    /// `targets := values` with arbitrary left-hand expressions
    pub fn assign_decl(targets: Vec<Expr>, values: Vec<Expr>) -> Self {
        Stmt::Assign {
            id: NodeId::new(),
            span: Span::default(),
            decl: true,
            left: targets,
            right: values,
        }
    }

    /// `targets = values`
    pub fn assign(targets: Vec<Expr>, values: Vec<Expr>) -> Self {
        Stmt::Assign {
            id: NodeId::new(),
            span: Span::default(),
            decl: false,
            left: targets,
            right: values,
        }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Simple {
            id: NodeId::new(),
            span: Span::default(),
            expr: Box::new(expr),
        }
    }

    pub fn block(stmts: Vec<Stmt>) -> Self {
        Stmt::Block(Block::new(stmts))
    }

    pub fn ret(exprs: Vec<Expr>) -> Self {
        Stmt::Return {
            id: NodeId::new(),
            span: Span::default(),
            exprs,
        }
    }

    pub fn if_then(init: Option<Stmt>, cond: Expr, body: Vec<Stmt>, else_branch: Option<Stmt>) -> Self {
        Stmt::If {
            id: NodeId::new(),
            span: Span::default(),
            init: init.map(Box::new),
            cond: Box::new(cond),
            body: Block::new(body),
            else_branch: else_branch.map(Box::new),
        }
    }

    pub fn for_loop(
        init: Option<Stmt>,
        cond: Option<Expr>,
        post: Option<Stmt>,
        body: Vec<Stmt>,
    ) -> Self {
        Stmt::For {
            id: NodeId::new(),
            span: Span::default(),
            init: init.map(Box::new),
            cond: cond.map(Box::new),
            post: post.map(Box::new),
            body: Block::new(body),
        }
    }

    pub fn class(name: impl Into<String>, class: ClassType, methods: Vec<FuncLit>) -> Self {
        Stmt::ClassDecl(ClassDecl {
            id: NodeId::new(),
            span: Span::default(),
            name: name.into(),
            class,
            methods,
        })
    }

    pub fn import(path: impl Into<String>, name: Option<&str>, foreign: bool) -> Self {
        Stmt::Import(Import {
            id: NodeId::new(),
            span: Span::default(),
            path: path.into(),
            name: name.map(str::to_string),
            foreign,
        })
    }
}

/// Literal payload; numeric literals keep their source text so the checker
/// can evaluate them exactly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Bool(bool),
    Int(String),
    Float(String),
    String(String),
}

/// Expression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    Ident {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        name: String,
    },
    BasicLit {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        value: Literal,
    },
    FuncLit(FuncLit),
    /// Class construction, `Point{1, 2}`
    CompLit {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        ty: Type,
        /// Field names for the `Point{x: 1}` form
        #[serde(default)]
        names: Vec<String>,
        #[serde(default)]
        elements: Vec<Expr>,
    },
    /// Table construction, `[|]float64{{"a", "b"}, {1, 2}, {3, 4}}`
    TableLit {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        ty: Type,
        #[serde(default)]
        col_names: Vec<Expr>,
        #[serde(default)]
        rows: Vec<Vec<Expr>>,
    },
    Unary {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        func: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// `left.name`
    Selector {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        left: Box<Expr>,
        name: String,
    },
    /// Shell escape, `($$ ls -l $$)`
    Shell {
        #[serde(default)]
        id: NodeId,
        #[serde(default)]
        span: Span,
        #[serde(default)]
        command: String,
    },
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Ident { id, .. }
            | Expr::BasicLit { id, .. }
            | Expr::CompLit { id, .. }
            | Expr::TableLit { id, .. }
            | Expr::Unary { id, .. }
            | Expr::Binary { id, .. }
            | Expr::Call { id, .. }
            | Expr::Selector { id, .. }
            | Expr::Shell { id, .. } => *id,
            Expr::FuncLit(func) => func.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expr::Ident { span, .. }
            | Expr::BasicLit { span, .. }
            | Expr::CompLit { span, .. }
            | Expr::TableLit { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Call { span, .. }
            | Expr::Selector { span, .. }
            | Expr::Shell { span, .. } => span,
            Expr::FuncLit(func) => &func.span,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident {
            id: NodeId::new(),
            span: Span::default(),
            name: name.into(),
        }
    }

    pub fn literal(value: Literal) -> Self {
        Expr::BasicLit {
            id: NodeId::new(),
            span: Span::default(),
            value,
        }
    }

    pub fn int(text: impl Into<String>) -> Self {
        Expr::literal(Literal::Int(text.into()))
    }

    pub fn float(text: impl Into<String>) -> Self {
        Expr::literal(Literal::Float(text.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Expr::literal(Literal::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::literal(Literal::String(value.into()))
    }

    pub fn func(func: FuncLit) -> Self {
        Expr::FuncLit(func)
    }

    pub fn comp_lit(ty: Type, elements: Vec<Expr>) -> Self {
        Expr::CompLit {
            id: NodeId::new(),
            span: Span::default(),
            ty,
            names: Vec::new(),
            elements,
        }
    }

    pub fn table_lit(ty: Type, col_names: Vec<Expr>, rows: Vec<Vec<Expr>>) -> Self {
        Expr::TableLit {
            id: NodeId::new(),
            span: Span::default(),
            ty,
            col_names,
            rows,
        }
    }

    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Expr::Unary {
            id: NodeId::new(),
            span: Span::default(),
            op,
            expr: Box::new(expr),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            id: NodeId::new(),
            span: Span::default(),
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            id: NodeId::new(),
            span: Span::default(),
            func: Box::new(func),
            args,
        }
    }

    pub fn selector(left: Expr, name: impl Into<String>) -> Self {
        Expr::Selector {
            id: NodeId::new(),
            span: Span::default(),
            left: Box::new(left),
            name: name.into(),
        }
    }

    pub fn shell(command: impl Into<String>) -> Self {
        Expr::Shell {
            id: NodeId::new(),
            span: Span::default(),
            command: command.into(),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_ordering(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Parenthesized expression
    Paren,
    Neg,
    Not,
}
