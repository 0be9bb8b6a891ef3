use corec_span::TokenIndex;
use serde::{Deserialize, Serialize};

/// The index of a node within a [`crate::Tree`]'s arena.
///
/// Nodes are never copied or moved once built; every reference to a child is
/// by `NodeId` into the arena that owns it.
pub type NodeId = u32;

/// What shape of container a [`NodeKind::ContainerDecl`] declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerKind {
    Struct,
    Enum,
    Union,
}

/// Pointer arity for [`NodeKind::PtrType`] (`*T`, `**T`, `[*]T`, `[*c]T`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PtrSize {
    One,
    Many,
    Slice,
    C,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlFlowKind {
    Break,
    Continue,
    Return,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsmOutputKind {
    /// `-> Type`
    ReturnType(NodeId),
    /// An existing local bound by identifier.
    Variable(TokenIndex),
}

/// One grammar production's worth of parsed structure.
///
/// Variants whose child count is only known at parse time (e.g. `decls`,
/// `statements`, `params`) hold a `Vec<NodeId>`; since every node (and
/// everything it owns) lives in the same [`crate::Tree`], dropping the tree
/// frees the whole AST in one pass, the same as if the children were
/// tail-allocated after a fixed header.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    // ---- Top level -------------------------------------------------
    Root {
        decls: Vec<NodeId>,
        eof_token: TokenIndex,
    },
    TestDecl {
        name_token: Option<TokenIndex>,
        doc_comments: Vec<TokenIndex>,
        body: NodeId,
    },
    UseDecl {
        expr: NodeId,
    },
    VarDecl {
        is_pub: bool,
        is_export: bool,
        is_extern: bool,
        is_threadlocal: bool,
        extern_lib: Option<TokenIndex>,
        is_const: bool,
        name_token: TokenIndex,
        type_expr: Option<NodeId>,
        align_expr: Option<NodeId>,
        linksection_expr: Option<NodeId>,
        value: Option<NodeId>,
        doc_comments: Vec<TokenIndex>,
    },
    FnProto {
        is_pub: bool,
        is_export: bool,
        is_extern: bool,
        is_inline: bool,
        is_noinline: bool,
        is_async: bool,
        extern_lib: Option<TokenIndex>,
        name_token: Option<TokenIndex>,
        params: Vec<NodeId>,
        is_variadic: bool,
        align_expr: Option<NodeId>,
        linksection_expr: Option<NodeId>,
        callconv_expr: Option<NodeId>,
        has_error_union: bool,
        return_type: NodeId,
        body: Option<NodeId>,
        doc_comments: Vec<TokenIndex>,
    },
    Param {
        is_comptime: bool,
        is_noalias: bool,
        name_token: Option<TokenIndex>,
        is_anytype: bool,
        type_expr: Option<NodeId>,
    },
    ContainerField {
        is_comptime: bool,
        name_token: TokenIndex,
        type_expr: Option<NodeId>,
        is_var_type: bool,
        align_expr: Option<NodeId>,
        value: Option<NodeId>,
        doc_comments: Vec<TokenIndex>,
    },
    TopLevelComptime {
        body: NodeId,
    },

    // ---- Types -------------------------------------------------------
    ContainerDecl {
        kind: ContainerKind,
        is_packed: bool,
        is_extern: bool,
        backing: Option<NodeId>,
        fields_and_decls: Vec<NodeId>,
    },
    ErrorSetDecl {
        members: Vec<TokenIndex>,
    },
    PtrType {
        size: PtrSize,
        is_const: bool,
        is_volatile: bool,
        is_allowzero: bool,
        align_expr: Option<NodeId>,
        bit_range: Option<(NodeId, NodeId)>,
        sentinel: Option<NodeId>,
        child: NodeId,
    },
    ArrayType {
        len: Option<NodeId>,
        sentinel: Option<NodeId>,
        child: NodeId,
    },
    OptionalType {
        child: NodeId,
    },
    ErrorUnionType {
        error_set: Option<NodeId>,
        payload: NodeId,
    },
    AnyframeType {
        child: Option<NodeId>,
    },
    VarType,
    InvalidType,

    // ---- Expressions: literals ----------------------------------------
    IntLiteral {
        token: TokenIndex,
    },
    FloatLiteral {
        token: TokenIndex,
    },
    CharLiteral {
        token: TokenIndex,
    },
    StringLiteral {
        token: TokenIndex,
    },
    MultilineStringLiteral {
        lines: Vec<TokenIndex>,
    },
    BoolLiteral {
        token: TokenIndex,
        value: bool,
    },
    NullLiteral {
        token: TokenIndex,
    },
    UndefinedLiteral {
        token: TokenIndex,
    },
    UnreachableLiteral {
        token: TokenIndex,
    },
    Identifier {
        token: TokenIndex,
    },
    EnumLiteral {
        name_token: TokenIndex,
    },
    ErrorValue {
        name_token: TokenIndex,
    },

    // ---- Expressions: composite -----------------------------------------
    InfixOp {
        op_token: TokenIndex,
        lhs: NodeId,
        rhs: NodeId,
    },
    /// `lhs catch |payload| rhs` -- singled out from `InfixOp` because,
    /// unlike the rest of the bitwise-precedence row, it carries an optional
    /// payload binding the error value in `rhs`.
    Catch {
        lhs: NodeId,
        payload: Option<NodeId>,
        rhs: NodeId,
    },
    Range {
        lhs: Option<NodeId>,
        rhs: Option<NodeId>,
    },
    PrefixOp {
        op_token: TokenIndex,
        operand: NodeId,
    },
    FieldAccess {
        lhs: NodeId,
        name_token: TokenIndex,
    },
    DerefAccess {
        lhs: NodeId,
    },
    OptionalUnwrap {
        lhs: NodeId,
    },
    IndexAccess {
        lhs: NodeId,
        index: NodeId,
    },
    SliceAccess {
        lhs: NodeId,
        start: NodeId,
        end: Option<NodeId>,
        sentinel: Option<NodeId>,
    },
    Call {
        callee: NodeId,
        args: Vec<NodeId>,
        is_async: bool,
    },
    BuiltinCall {
        name_token: TokenIndex,
        args: Vec<NodeId>,
    },
    GroupedExpression {
        inner: NodeId,
    },
    FieldInitializer {
        name_token: TokenIndex,
        value: NodeId,
    },
    StructInitializer {
        type_expr: Option<NodeId>,
        fields: Vec<NodeId>,
    },
    ArrayInitializer {
        type_expr: Option<NodeId>,
        elements: Vec<NodeId>,
    },

    // ---- Control flow --------------------------------------------------
    If {
        condition: NodeId,
        payload: Option<NodeId>,
        then_branch: NodeId,
        else_payload: Option<NodeId>,
        else_branch: Option<NodeId>,
    },
    ForInput {
        sequence: NodeId,
        capture_token: Option<TokenIndex>,
        capture_is_ptr: bool,
    },
    For {
        label: Option<TokenIndex>,
        inputs: Vec<NodeId>,
        index_capture: Option<TokenIndex>,
        body: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        label: Option<TokenIndex>,
        condition: NodeId,
        payload: Option<NodeId>,
        continue_expr: Option<NodeId>,
        body: NodeId,
        else_payload: Option<NodeId>,
        else_branch: Option<NodeId>,
    },
    Switch {
        condition: NodeId,
        cases: Vec<NodeId>,
    },
    SwitchCase {
        items: Vec<NodeId>,
        is_else: bool,
        payload: Option<NodeId>,
        value: NodeId,
    },
    Block {
        label: Option<TokenIndex>,
        statements: Vec<NodeId>,
    },
    Defer {
        is_err_defer: bool,
        payload: Option<NodeId>,
        body: NodeId,
    },
    Suspend {
        body: Option<NodeId>,
    },
    Nosuspend {
        body: NodeId,
    },
    ControlFlowExpression {
        kind: ControlFlowKind,
        label: Option<TokenIndex>,
        value: Option<NodeId>,
    },
    Comptime {
        body: NodeId,
    },

    // ---- Payloads --------------------------------------------------------
    Payload {
        name_token: TokenIndex,
    },
    PointerPayload {
        is_ptr: bool,
        name_token: TokenIndex,
    },
    PointerIndexPayload {
        is_ptr: bool,
        name_token: TokenIndex,
        index_token: Option<TokenIndex>,
    },

    // ---- Assembly ----------------------------------------------------------
    Asm {
        is_volatile: bool,
        template: NodeId,
        outputs: Vec<NodeId>,
        inputs: Vec<NodeId>,
        clobbers: Vec<TokenIndex>,
    },
    AsmOutput {
        name_token: Option<TokenIndex>,
        constraint_token: TokenIndex,
        kind: AsmOutputKind,
    },
    AsmInput {
        name_token: Option<TokenIndex>,
        constraint_token: TokenIndex,
        expr: NodeId,
    },

    // ---- Trivia binding -----------------------------------------------------
    DocComment {
        lines: Vec<TokenIndex>,
    },

    /// A placeholder substituted where a production needed a node but could
    /// not build one after an error; keeps `first_token <= last_token` and
    /// the parent's span containment invariant intact.
    Invalid,
}

/// A single AST node: a kind tag plus the token span it covers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub first_token: TokenIndex,
    pub last_token: TokenIndex,
}

impl Node {
    pub fn new(kind: NodeKind, first_token: TokenIndex, last_token: TokenIndex) -> Self {
        debug_assert!(first_token <= last_token);
        Self { kind, first_token, last_token }
    }
}
