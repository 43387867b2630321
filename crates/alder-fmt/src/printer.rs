// SPDX-License-Identifier: (MIT OR Apache-2.0)

use alder_ast::{walk, Ast, BinOp, NodeId, NodeKind, UnaryOp, Visitor};

const INDENT_WIDTH: usize = 4;

/// Renders a subtree as source text via the visitor protocol. Operator
/// expressions are parenthesized, so the output re-parses to the same
/// shape without precedence bookkeeping.
pub struct Printer {
    output: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    // --- Helpers ---

    fn emit(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn emit_indent(&mut self) {
        for _ in 0..self.indent * INDENT_WIDTH {
            self.output.push(' ');
        }
    }

    fn emit_str_literal(&mut self, s: &str) {
        self.output.push('"');
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\t' => self.output.push_str("\\t"),
                _ => self.output.push(c),
            }
        }
        self.output.push('"');
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

fn bin_op_token(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::And => "&&",
        BinOp::Or => "||",
    }
}

fn unary_op_token(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Not => "!",
    }
}

impl Visitor for Printer {
    fn visit_module(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::Module { items } = &ast.node(id).kind else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.emit("\n");
            }
            walk(self, ast, *item);
            self.emit("\n");
        }
    }

    fn visit_function(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::Function { name, params, body } = &ast.node(id).kind else {
            return;
        };
        self.emit("fn ");
        self.emit(name);
        self.emit("(");
        self.emit(&params.join(", "));
        self.emit(")");
        match body {
            Some(block) => {
                self.emit(" ");
                walk(self, ast, *block);
            }
            None => self.emit(";"),
        }
    }

    fn visit_block(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::Block { stmts } = &ast.node(id).kind else {
            return;
        };
        if stmts.is_empty() {
            self.emit("{}");
            return;
        }
        self.emit("{\n");
        self.indent += 1;
        for stmt in stmts {
            self.emit_indent();
            walk(self, ast, *stmt);
            self.emit("\n");
        }
        self.indent -= 1;
        self.emit_indent();
        self.emit("}");
    }

    fn visit_let(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::Let { name, init } = &ast.node(id).kind else {
            return;
        };
        self.emit("let ");
        self.emit(name);
        self.emit(" = ");
        walk(self, ast, *init);
        self.emit(";");
    }

    fn visit_expr_stmt(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::ExprStmt { expr } = &ast.node(id).kind else {
            return;
        };
        walk(self, ast, *expr);
        self.emit(";");
    }

    fn visit_return(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::Return { value } = &ast.node(id).kind else {
            return;
        };
        self.emit("return");
        if let Some(value) = value {
            self.emit(" ");
            walk(self, ast, *value);
        }
        self.emit(";");
    }

    fn visit_if(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::If {
            cond,
            then_block,
            else_block,
        } = &ast.node(id).kind
        else {
            return;
        };
        self.emit("if ");
        walk(self, ast, *cond);
        self.emit(" ");
        walk(self, ast, *then_block);
        if let Some(else_block) = else_block {
            self.emit(" else ");
            walk(self, ast, *else_block);
        }
    }

    fn visit_binary(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::Binary { op, lhs, rhs } = &ast.node(id).kind else {
            return;
        };
        self.emit("(");
        walk(self, ast, *lhs);
        self.emit(" ");
        self.emit(bin_op_token(*op));
        self.emit(" ");
        walk(self, ast, *rhs);
        self.emit(")");
    }

    fn visit_unary(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::Unary { op, operand } = &ast.node(id).kind else {
            return;
        };
        self.emit("(");
        self.emit(unary_op_token(*op));
        walk(self, ast, *operand);
        self.emit(")");
    }

    fn visit_call(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::Call { callee, args } = &ast.node(id).kind else {
            return;
        };
        walk(self, ast, *callee);
        self.emit("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            walk(self, ast, *arg);
        }
        self.emit(")");
    }

    fn visit_ident(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::Ident(name) = &ast.node(id).kind {
            self.emit(name);
        }
    }

    fn visit_int(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::Int(value) = &ast.node(id).kind {
            self.emit(&value.to_string());
        }
    }

    fn visit_bool(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::Bool(value) = &ast.node(id).kind {
            self.emit(if *value { "true" } else { "false" });
        }
    }

    fn visit_str(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::Str(value) = &ast.node(id).kind {
            self.emit_str_literal(value);
        }
    }
}
