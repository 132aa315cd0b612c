use crate::value::Value;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Add,
    Sub,
    Concat,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// `name` or `name.field`
    Variable {
        name: Rc<str>,
        field: Option<Rc<str>>,
    },
    ArrayAccess {
        name: Rc<str>,
        index: Box<Expr>,
    },
    Call {
        name: Rc<str>,
        args: Vec<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
}

impl Expr {
    pub fn variable(name: &str) -> Self {
        Expr::Variable {
            name: Rc::from(name),
            field: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Rc<str>,
    pub type_name: Rc<str>,
}

/// `TYPE name ... ENDTYPE`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub name: Rc<str>,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Rc<str>,
    pub type_name: Rc<str>,
    /// Recorded from `BYREF`; binding is always by value.
    pub by_ref: bool,
}

/// A procedure (`returns == None`) or function body.
#[derive(Debug, Clone, PartialEq)]
pub struct Subroutine {
    pub name: Rc<str>,
    pub params: Vec<Param>,
    pub returns: Option<Rc<str>>,
    pub body: Vec<Stmt>,
}

impl Subroutine {
    pub fn is_function(&self) -> bool {
        self.returns.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub value: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    TypeDecl(Rc<RecordType>),
    Declare {
        names: Vec<Rc<str>>,
        type_name: Rc<str>,
    },
    DeclareArray {
        names: Vec<Rc<str>>,
        lower: Expr,
        upper: Expr,
        element_type: Rc<str>,
    },
    Constant {
        name: Rc<str>,
        value: Expr,
    },
    Assign {
        name: Rc<str>,
        field: Option<Rc<str>>,
        value: Expr,
    },
    ArrayAssign {
        name: Rc<str>,
        index: Expr,
        value: Expr,
    },
    Output(Vec<Expr>),
    Input(Rc<str>),
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    Repeat {
        body: Vec<Stmt>,
        condition: Expr,
    },
    For {
        var: Rc<str>,
        start: Expr,
        end: Expr,
        step: Expr,
        body: Vec<Stmt>,
    },
    Case {
        subject: Rc<str>,
        clauses: Vec<CaseClause>,
        otherwise: Vec<Stmt>,
    },
    Procedure(Rc<Subroutine>),
    Function(Rc<Subroutine>),
    Call {
        name: Rc<str>,
        args: Vec<Expr>,
    },
    Return(Expr),
}

impl Stmt {
    /// Leading keyword of the statement, used in traces.
    pub fn keyword(&self) -> &'static str {
        match self {
            Stmt::TypeDecl(_) => "TYPE",
            Stmt::Declare { .. } | Stmt::DeclareArray { .. } => "DECLARE",
            Stmt::Constant { .. } => "CONSTANT",
            Stmt::Assign { .. } | Stmt::ArrayAssign { .. } => "assignment",
            Stmt::Output(_) => "OUTPUT",
            Stmt::Input(_) => "INPUT",
            Stmt::If { .. } => "IF",
            Stmt::While { .. } => "WHILE",
            Stmt::Repeat { .. } => "REPEAT",
            Stmt::For { .. } => "FOR",
            Stmt::Case { .. } => "CASE",
            Stmt::Procedure(_) => "PROCEDURE",
            Stmt::Function(_) => "FUNCTION",
            Stmt::Call { .. } => "CALL",
            Stmt::Return(_) => "RETURN",
        }
    }

    /// Declarations registered by the hoisting pass rather than executed.
    pub fn is_hoisted(&self) -> bool {
        matches!(self, Stmt::TypeDecl(_) | Stmt::Procedure(_) | Stmt::Function(_))
    }
}

/// Root of the tree: top-level declarations and statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub items: Vec<Stmt>,
}
