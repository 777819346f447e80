//! AST node definitions.
//!
//! Statements and expressions are closed sum types; every consumer matches
//! on them exhaustively. Type annotations never reach the tree: the parser
//! erases them while reading the source.

use dscript_core::text::Position;

// ============================================================================
// Expressions
// ============================================================================

/// The kind of a literal constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    Int,
    Float,
    String,
    Rune,
    True,
    False,
    Null,
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    LogicalAnd,
    LogicalOr,
    Nullish,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Exp => "**",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
            BinaryOperator::Nullish => "??",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::StrictEq => "===",
            BinaryOperator::StrictNotEq => "!==",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
    BitNot,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(ConstantExpr),
    Identifier(IdentExpr),
    Selector(SelectorExpr),
    Index(IndexExpr),
    Call(CallExpr),
    NewInstance(NewInstanceExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Ternary(TernaryExpr),
    MapLiteral(MapLiteralExpr),
    ArrayLiteral(ArrayLiteralExpr),
    FuncLiteral(FuncLiteralExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantExpr {
    pub position: Position,
    pub kind: ConstantKind,
    pub value: String,
}

impl ConstantExpr {
    pub fn new(position: Position, kind: ConstantKind, value: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            value: value.into(),
        }
    }

    pub fn undefined(position: Position) -> Self {
        Self::new(position, ConstantKind::Undefined, "undefined")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentExpr {
    pub position: Position,
    pub name: String,
}

/// `x.member` or `x?.member`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub member: IdentExpr,
    /// Optional chaining `?.`
    pub optional: bool,
    /// Outermost node of a postfix chain.
    pub first_in_chain: bool,
}

/// `x[index]` or `x?.[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub lbrack: Position,
    pub index: Box<Expr>,
    pub optional: bool,
    pub first_in_chain: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub lparen: Position,
    pub args: Vec<Expr>,
    /// The last argument carries a spread operator.
    pub spread: bool,
    pub optional: bool,
    pub first_in_chain: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInstanceExpr {
    pub position: Position,
    /// An identifier or a single `.`-qualified selector.
    pub type_name: Box<Expr>,
    pub args: Vec<Expr>,
    pub spread: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub position: Position,
    pub op: UnaryOperator,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpr {
    pub condition: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub position: Position,
    pub key: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLiteralExpr {
    pub position: Position,
    pub entries: Vec<KeyValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteralExpr {
    pub position: Position,
    pub elements: Vec<Expr>,
}

/// `function (args) { ... }` or an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncLiteralExpr {
    pub position: Position,
    pub arguments: Arguments,
    pub body: BlockStmt,
}

impl Expr {
    pub fn position(&self) -> Position {
        match self {
            Expr::Constant(e) => e.position,
            Expr::Identifier(e) => e.position,
            Expr::Selector(e) => e.x.position(),
            Expr::Index(e) => e.x.position(),
            Expr::Call(e) => e.callee.position(),
            Expr::NewInstance(e) => e.position,
            Expr::Binary(e) => e.left.position(),
            Expr::Unary(e) => e.position,
            Expr::Ternary(e) => e.condition.position(),
            Expr::MapLiteral(e) => e.position,
            Expr::ArrayLiteral(e) => e.position,
            Expr::FuncLiteral(e) => e.position,
        }
    }

    /// Flag the node as the outermost link of a postfix chain. Only
    /// selectors, index and call expressions carry the flag.
    pub fn mark_first_in_chain(&mut self) {
        match self {
            Expr::Selector(e) => e.first_in_chain = true,
            Expr::Index(e) => e.first_in_chain = true,
            Expr::Call(e) => e.first_in_chain = true,
            _ => {}
        }
    }

    pub fn is_first_in_chain(&self) -> bool {
        match self {
            Expr::Selector(e) => e.first_in_chain,
            Expr::Index(e) => e.first_in_chain,
            Expr::Call(e) => e.first_in_chain,
            _ => false,
        }
    }
}

// ============================================================================
// Function signatures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub position: Position,
    pub name: String,
    /// Declared with `?`.
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    /// Position of the opening `(`.
    pub opening: Position,
    pub fields: Vec<Field>,
    /// The last field was declared with `...`.
    pub variadic: bool,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    FuncDecl(FuncDeclStmt),
    ClassDecl(ClassDeclStmt),
    EnumDecl(EnumDeclStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Break(BranchStmt),
    Continue(BranchStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Try(TryStmt),
    Call(CallExpr),
    Assign(AssignStmt),
    IncDec(IncDecStmt),
    /// A terminal self-recursive call, rewritten for frame reuse.
    TailCall(CallExpr),
    Delete(DeleteStmt),
    Block(BlockStmt),
    Label(LabelStmt),
}

impl Stmt {
    pub fn position(&self) -> Position {
        match self {
            Stmt::VarDecl(s) => s.position,
            Stmt::FuncDecl(s) => s.position,
            Stmt::ClassDecl(s) => s.position,
            Stmt::EnumDecl(s) => s.position,
            Stmt::If(s) => s.position,
            Stmt::While(s) => s.position,
            Stmt::For(s) => s.position,
            Stmt::Switch(s) => s.position,
            Stmt::Break(s) | Stmt::Continue(s) => s.position,
            Stmt::Return(s) => s.position,
            Stmt::Throw(s) => s.position,
            Stmt::Try(s) => s.position,
            Stmt::Call(c) | Stmt::TailCall(c) => c.callee.position(),
            Stmt::Assign(s) => s.left.position(),
            Stmt::IncDec(s) => s.target.position(),
            Stmt::Delete(s) => s.position,
            Stmt::Block(s) => s.lbrace,
            Stmt::Label(s) => s.position,
        }
    }

    /// Whether control never falls off the end of this statement.
    pub fn is_control_transfer(&self) -> bool {
        matches!(
            self,
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Return(_) | Stmt::Throw(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub lbrace: Position,
    pub statements: Vec<Stmt>,
    pub rbrace: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub position: Position,
    pub name: String,
    pub value: Expr,
    pub exported: bool,
    pub is_const: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDeclStmt {
    pub position: Position,
    pub name: String,
    pub arguments: Arguments,
    pub exported: bool,
    pub attributes: Vec<String>,
    pub body: BlockStmt,
    /// Set for `Type.prototype.name = function () {}` methods.
    pub receiver_type: Option<String>,
}

impl FuncDeclStmt {
    pub fn variadic(&self) -> bool {
        self.arguments.variadic
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclStmt {
    pub position: Position,
    pub name: String,
    pub exported: bool,
    pub attributes: Vec<String>,
    pub fields: Vec<VarDeclStmt>,
    pub functions: Vec<FuncDeclStmt>,
    pub getters: Vec<FuncDeclStmt>,
    pub setters: Vec<FuncDeclStmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumValueKind {
    Int,
    String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub position: Position,
    pub name: String,
    pub kind: EnumValueKind,
    /// Literal text: the number for int members, the string for string members.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclStmt {
    pub position: Position,
    pub name: String,
    pub exported: bool,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBlock {
    pub condition: Expr,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub position: Position,
    /// `if` and every `else if`, in source order.
    pub blocks: Vec<IfBlock>,
    pub else_block: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub position: Position,
    pub condition: Expr,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForKind {
    /// `for (init; condition; step)`, every clause optional.
    Classic {
        declarations: Vec<Stmt>,
        condition: Option<Expr>,
        step: Option<Box<Stmt>>,
    },
    /// `for (let key in expr)`
    In { binding: IdentExpr, expr: Expr },
    /// `for (let value of expr)`
    Of { binding: IdentExpr, expr: Expr },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub position: Position,
    pub kind: ForKind,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseBlock {
    pub position: Position,
    /// `None` for the default block.
    pub expr: Option<Expr>,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub position: Position,
    pub expr: Expr,
    pub blocks: Vec<CaseBlock>,
    pub default: Option<CaseBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchStmt {
    pub position: Position,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub position: Position,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStmt {
    pub position: Position,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub position: Position,
    pub binding: Option<IdentExpr>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub position: Position,
    pub body: BlockStmt,
    pub catch: Option<CatchClause>,
    pub finally: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub left: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOperator {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncDecStmt {
    pub op: IncDecOperator,
    pub target: Expr,
}

/// `delete object.property`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub position: Position,
    pub object: String,
    pub property: String,
}

/// A label attached to a `for`, `while` or `switch` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStmt {
    pub position: Position,
    pub name: String,
    pub body: Box<Stmt>,
}
