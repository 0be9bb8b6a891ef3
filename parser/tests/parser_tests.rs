//! End-to-end parse tests exercising the scenarios and invariants this
//! grammar is expected to satisfy on representative input.

use corec_ast::{NodeKind, TokenKind};
use corec_diagnostics::DiagnosticKind;
use corec_parser::parse;

fn assert_no_errors(tree: &corec_parser::Tree) {
    assert!(tree.errors.is_empty(), "unexpected diagnostics: {:?}", tree.errors);
}

#[test]
fn const_decl_with_precedence() {
    let tree = parse("const x: i32 = 1 + 2 * 3;");
    assert_no_errors(&tree);
    let NodeKind::Root { decls, .. } = &tree.root_node().kind else { panic!("expected Root") };
    assert_eq!(decls.len(), 1);
    let decl = tree.node(decls[0]);
    let NodeKind::VarDecl { is_const, value, .. } = &decl.kind else { panic!("expected VarDecl") };
    assert!(*is_const);
    let value = value.expect("initializer");
    let NodeKind::InfixOp { lhs, rhs, .. } = &tree.node(value).kind else { panic!("expected top-level +") };
    assert!(matches!(tree.node(*lhs).kind, NodeKind::IntLiteral { .. }));
    assert!(matches!(tree.node(*rhs).kind, NodeKind::InfixOp { .. }));
}

#[test]
fn fn_decl_with_params_and_return() {
    let tree = parse("fn f(x: i32, y: i32) void { return x + y; }");
    assert_no_errors(&tree);
    let NodeKind::Root { decls, .. } = &tree.root_node().kind else { panic!("expected Root") };
    assert_eq!(decls.len(), 1);
    let NodeKind::FnProto { params, body, .. } = &tree.node(decls[0]).kind else { panic!("expected FnProto") };
    assert_eq!(params.len(), 2);
    let body = body.expect("block body");
    let NodeKind::Block { statements, .. } = &tree.node(body).kind else { panic!("expected Block") };
    assert_eq!(statements.len(), 1);
    assert!(matches!(tree.node(statements[0]).kind, NodeKind::ControlFlowExpression { .. }));
}

#[test]
fn decl_after_field_is_flagged_but_not_the_reverse() {
    let tree = parse("pub const S = struct { a: u8, b: u8 = 1, fn m() void {} };");
    assert_eq!(tree.errors.len(), 1, "expected exactly one DeclBetweenFields: {:?}", tree.errors);
    assert_eq!(tree.errors[0].kind, DiagnosticKind::DeclBetweenFields);
}

#[test]
fn switch_with_range_item() {
    let tree = parse(r#"const x = switch (y) { 1, 2 => "a", 3 ... 5 => "b", else => "c", };"#);
    assert_no_errors(&tree);
    let NodeKind::Root { decls, .. } = &tree.root_node().kind else { panic!("expected Root") };
    let NodeKind::VarDecl { value, .. } = &tree.node(decls[0]).kind else { panic!("expected VarDecl") };
    let NodeKind::Switch { cases, .. } = &tree.node(value.unwrap()).kind else { panic!("expected Switch") };
    assert_eq!(cases.len(), 3);
    let NodeKind::SwitchCase { items, .. } = &tree.node(cases[1]).kind else { panic!("expected SwitchCase") };
    assert_eq!(items.len(), 1);
    assert!(matches!(tree.node(items[0]).kind, NodeKind::Range { .. }));
}

#[test]
fn pointer_type_with_qualifiers_and_sentinel() {
    let tree = parse("const p: *align(4) const [*:0]u8 = undefined;");
    assert_no_errors(&tree);
    let NodeKind::Root { decls, .. } = &tree.root_node().kind else { panic!("expected Root") };
    let NodeKind::VarDecl { type_expr, .. } = &tree.node(decls[0]).kind else { panic!("expected VarDecl") };
    let NodeKind::PtrType { is_const, align_expr, child, .. } = &tree.node(type_expr.unwrap()).kind else {
        panic!("expected outer PtrType")
    };
    assert!(*is_const);
    assert!(align_expr.is_some());
    assert!(matches!(tree.node(*child).kind, NodeKind::PtrType { .. }));
}

#[test]
fn double_ampersand_reports_invalid_and_and_recovers() {
    let tree = parse("test \"x\" { const a = b && c; }");
    assert_eq!(tree.errors.iter().filter(|d| d.kind == DiagnosticKind::InvalidAnd).count(), 1);
    let NodeKind::Root { decls, .. } = &tree.root_node().kind else { panic!("expected Root") };
    let NodeKind::TestDecl { body, .. } = &tree.node(decls[0]).kind else { panic!("expected TestDecl") };
    assert!(matches!(tree.node(*body).kind, NodeKind::Block { .. }));
}

#[test]
fn line_comment_between_tokens_does_not_change_structure() {
    let without = parse("const x = 1 + 2;");
    let with = parse("const x = 1 // a comment\n+ 2;");
    assert_no_errors(&without);
    assert_no_errors(&with);
    assert_eq!(without.arena.len(), with.arena.len());
}

#[test]
fn multiline_string_run_survives_interleaved_line_comment() {
    let source = "const s =\n    \\\\first\n    // a stray note\n    \\\\second\n;\n";
    let tree = parse(source);
    assert_no_errors(&tree);
    let NodeKind::Root { decls, .. } = &tree.root_node().kind else { panic!("expected Root") };
    let NodeKind::VarDecl { value, .. } = &tree.node(decls[0]).kind else { panic!("expected VarDecl") };
    let NodeKind::MultilineStringLiteral { lines } = &tree.node(value.unwrap()).kind else {
        panic!("expected MultilineStringLiteral")
    };
    assert_eq!(lines.len(), 2, "the comment line must not break the run");
}

#[test]
fn unattached_doc_comment_is_reported() {
    let tree = parse("/// dangling\n");
    assert!(tree.errors.iter().any(|d| d.kind == DiagnosticKind::UnattachedDocComment));
}

#[test]
fn doc_comment_attaches_to_following_decl() {
    let tree = parse("/// docs for f\nfn f() void {}\n");
    assert!(!tree.errors.iter().any(|d| d.kind == DiagnosticKind::UnattachedDocComment));
    let NodeKind::Root { decls, .. } = &tree.root_node().kind else { panic!("expected Root") };
    let NodeKind::FnProto { doc_comments, .. } = &tree.node(decls[0]).kind else { panic!("expected FnProto") };
    assert_eq!(doc_comments.len(), 1);
}

#[test]
fn chained_compare_does_not_build_left_assoc_tree() {
    // `a == b == c` -- the second `==` cannot be consumed by `compare` again
    // (property P8), so it is left for the statement terminator to reject.
    let tree = parse("const x = a == b == c;");
    assert!(!tree.errors.is_empty(), "chained compare must not silently parse");
}

#[test]
fn root_ends_in_eof_token() {
    let tree = parse("const x = 1;");
    let NodeKind::Root { eof_token, .. } = &tree.root_node().kind else { panic!("expected Root") };
    assert_eq!(tree.token_kinds[*eof_token as usize], TokenKind::Eof);
}

#[test]
fn malformed_decl_recovers_and_parses_the_rest() {
    let tree = parse("const = ; const y = 2;");
    assert!(!tree.errors.is_empty());
    let NodeKind::Root { decls, .. } = &tree.root_node().kind else { panic!("expected Root") };
    assert!(decls.iter().any(|&id| {
        matches!(&tree.node(id).kind, NodeKind::VarDecl { value: Some(v), .. }
            if matches!(tree.node(*v).kind, NodeKind::IntLiteral { .. }))
    }));
}

#[test]
fn asm_block_with_outputs_and_inputs() {
    let tree = parse(r#"fn f() void { asm volatile ("nop" : [ret] "=r" (-> i32) : [x] "r" (1) : "memory"); }"#);
    assert_no_errors(&tree);
}
