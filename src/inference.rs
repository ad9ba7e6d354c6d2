//! Bidirectional type inference over the description-language AST: a
//! struct wrapping the active scope with an `infer_expr` dispatched by
//! `Expr` variant, collecting errors into a `Diagnostics` instead of
//! returning on the first mismatch, matching the parser and loader's
//! error-collection policy.
//!
//! Inference runs in three passes per program: the first registers every
//! declaration's *signature* (component param/dependency types, method
//! signatures, enum membership) in the root `TypeScope` without looking at
//! any method body; the second checks that every param/field carries a
//! declared type, a default, or both, and that the two agree when both are
//! present; the third walks every method body, system, and aggregator,
//! resolving `Type::Named` references left by the parser against the
//! signatures the first pass registered, and writing the result into each
//! expression's `TypeSlot`.

use crate::ast::{self, BinOp, Decl, Expr, File, Node, Statement, UnOp};
use crate::env::{Binding, TypeScope};
use crate::error::{Diagnostics, TypeError};
use crate::types::{MethodSig, Type};
use std::rc::Rc;

pub struct Inference {
    pub diagnostics: Diagnostics<TypeError>,
}

type TResult = Result<Type, TypeError>;

impl Inference {
    pub fn new() -> Inference {
        Inference { diagnostics: Diagnostics::new() }
    }

    /// Run both passes over every file, in file-iteration order. Files are
    /// assumed already merged into one namespace (the loader keeps
    /// per-file ASTs, but declarations share one global scope; there are
    /// no module-private declarations).
    pub fn check_files(&mut self, files: &[&File]) -> TypeScope {
        tracing::debug!(target: "inference", file_count = files.len(), "check_files");
        let root = TypeScope::root();
        for file in files {
            for decl in &file.decls {
                self.register_signature(&root, decl);
            }
        }
        for file in files {
            for decl in &file.decls {
                self.check_param_signatures(&root, decl);
            }
        }
        for file in files {
            for decl in &file.decls {
                self.check_decl_body(&root, decl);
            }
        }
        if !self.diagnostics.is_ok() {
            tracing::warn!(target: "inference", count = self.diagnostics.errors.len(), "type inference reported errors");
        }
        root
    }

    /// Declaration-signature pass: every component field, `uses`
    /// dependency-free param, aggregator param, and method param must carry
    /// a declared type, a default value, or both; when both are present
    /// they must agree (Int default widens to a Float-declared param).
    fn check_param_signatures(&mut self, scope: &TypeScope, decl: &Node<Decl>) {
        match &**decl {
            Decl::Component(c) => {
                for p in &c.params {
                    self.check_param_signature(scope, p);
                }
                for m in &c.methods {
                    for p in &m.params {
                        self.check_param_signature(scope, p);
                    }
                }
            }
            Decl::Aggregator(a) => {
                for p in &a.params {
                    self.check_param_signature(scope, p);
                }
            }
            Decl::Enum(_) | Decl::System(_) | Decl::Options(_) => {}
        }
    }

    fn check_param_signature(&mut self, scope: &TypeScope, p: &ast::Param) {
        let pos = crate::error::Position { line: p.span.line, col: p.span.col };
        match (&p.declared_type, &p.default) {
            (None, None) => {
                self.diagnostics.push(TypeError::UnderspecifiedParameter { pos, name: p.name.clone() });
            }
            (Some(declared), Some(default)) => {
                let resolved = self.resolve_type(scope, declared, pos);
                let default_ty = self.infer_expr(scope, default).unwrap_or(Type::Void);
                if default_ty != resolved && !default_ty.widens_to(&resolved) {
                    self.diagnostics.push(TypeError::Mismatch {
                        pos,
                        expected: resolved.describe(),
                        found: default_ty.describe(),
                    });
                }
            }
            _ => {}
        }
    }

    fn register_signature(&mut self, scope: &TypeScope, decl: &Node<Decl>) {
        match &**decl {
            Decl::Component(c) => scope.define(&c.name, Binding::Component(c.clone())),
            Decl::Enum(e) => scope.define(&e.name, Binding::Enum(e.clone())),
            Decl::System(s) => scope.define(&s.name, Binding::System(s.clone())),
            Decl::Aggregator(a) => scope.define(&a.name, Binding::Aggregator(a.clone())),
            Decl::Options(_) => {}
        }
    }

    /// Resolve a parser-produced `Type::Named` into a concrete `Type`
    /// against the root scope, reporting `UnresolvedType` for anything
    /// that names neither a primitive nor a registered declaration.
    fn resolve_type(&mut self, scope: &TypeScope, ty: &Type, pos: crate::error::Position) -> Type {
        match ty {
            Type::Named(name) => match scope.get(name) {
                Some(Binding::Component(c)) => Type::Component(c),
                Some(Binding::Enum(e)) => Type::Enum(e),
                _ => {
                    self.diagnostics.push(TypeError::UnresolvedType { pos, name: name.clone() });
                    Type::Void
                }
            },
            Type::List(inner) => Type::List(Rc::new(self.resolve_type(scope, inner, pos))),
            Type::Outcomes(inner) => Type::Outcomes(Rc::new(self.resolve_type(scope, inner, pos))),
            other => other.clone(),
        }
    }

    fn check_decl_body(&mut self, scope: &TypeScope, decl: &Node<Decl>) {
        match &**decl {
            Decl::Component(c) => self.check_component(scope, c),
            Decl::System(s) => self.check_system(scope, s),
            Decl::Aggregator(a) => self.check_aggregator(scope, a),
            Decl::Enum(_) | Decl::Options(_) => {}
        }
    }

    fn check_component(&mut self, scope: &TypeScope, component: &Node<ast::Component>) {
        for method in &component.methods {
            let method_scope = scope.for_method(component, method);
            if method.native {
                continue;
            }
            self.check_block(&method_scope, &method.body);
        }
    }

    fn check_aggregator(&mut self, scope: &TypeScope, agg: &Node<ast::Aggregator>) {
        let child = scope.child();
        for p in &agg.params {
            child.define(&p.name, Binding::Param(p.clone()));
        }
        self.check_block(&child, &agg.body);
    }

    fn check_system(&mut self, scope: &TypeScope, system: &Node<ast::System>) {
        let child = scope.child();
        // First pass: resolve every instance's component type and bind it,
        // so the override pass and the system body can reference any
        // instance regardless of declaration order.
        for instance in &system.instances {
            match child.get(&instance.component_name) {
                Some(Binding::Component(_)) => {
                    child.define(&instance.name, Binding::Instance(Rc::new(instance.clone())));
                }
                _ => self.diagnostics.push(TypeError::UnresolvedType {
                    pos: crate::error::Position { line: system.span.line, col: system.span.col },
                    name: instance.component_name.clone(),
                }),
            }
        }
        // Second pass: type-check every override assignment against the
        // declared parameter/dependency type.
        for instance in &system.instances {
            let c = match child.get(&instance.component_name) {
                Some(Binding::Component(c)) => c,
                _ => continue,
            };
            for (field, value) in &instance.overrides {
                let pos = self.pos_of(value);
                let value_ty = self.infer_expr(&child, value).unwrap_or(Type::Void);
                if let Some(p) = c.params.iter().find(|p| &p.name == field) {
                    if let Some(declared) = &p.declared_type {
                        let resolved = self.resolve_type(&child, declared, pos);
                        if value_ty != resolved && !value_ty.widens_to(&resolved) {
                            self.diagnostics.push(TypeError::Mismatch {
                                pos,
                                expected: resolved.describe(),
                                found: value_ty.describe(),
                            });
                        }
                    }
                } else if let Some(dep) = c.uses.iter().find(|d| &d.name == field) {
                    if let Some(Binding::Component(target)) = child.get(&dep.component_name) {
                        if value_ty != Type::Component(target) {
                            self.diagnostics.push(TypeError::Mismatch {
                                pos,
                                expected: format!("Component({})", dep.component_name),
                                found: value_ty.describe(),
                            });
                        }
                    }
                } else {
                    self.diagnostics.push(TypeError::BadMember {
                        pos,
                        receiver: c.name.clone(),
                        member: field.clone(),
                    });
                }
            }
        }
        self.check_block(&child, &system.statements);
    }

    fn check_block(&mut self, scope: &TypeScope, stmts: &[Node<Statement>]) {
        let block_scope = scope.child();
        for stmt in stmts {
            self.check_statement(&block_scope, stmt);
        }
    }

    fn check_statement(&mut self, scope: &TypeScope, stmt: &Node<Statement>) {
        match &**stmt {
            Statement::Let(names, value, span) => {
                let ty = self.infer_expr(scope, value).unwrap_or(Type::Void);
                if names.len() == 1 {
                    scope.define(&names[0], Binding::Local(value.clone()));
                } else {
                    match &ty {
                        Type::Tuple(items) if items.len() == names.len() => {
                            for name in names {
                                scope.define(name, Binding::Local(value.clone()));
                            }
                        }
                        _ => self.diagnostics.push(TypeError::Arity {
                            pos: crate::error::Position { line: span.line, col: span.col },
                            expected: names.len(),
                            found: if let Type::Tuple(items) = &ty { items.len() } else { 1 },
                        }),
                    }
                }
            }
            Statement::Set(target, value, span) => {
                let pos = crate::error::Position { line: span.line, col: span.col };
                let target_ty = self.infer_expr(scope, target);
                let value_ty = self.infer_expr(scope, value).unwrap_or(Type::Void);
                match target_ty {
                    Some(Type::Ref(_, inner)) => {
                        if value_ty != *inner && !value_ty.widens_to(&inner) {
                            self.diagnostics.push(TypeError::Mismatch {
                                pos,
                                expected: inner.describe(),
                                found: value_ty.describe(),
                            });
                        }
                    }
                    Some(other) => self.diagnostics.push(TypeError::Mismatch {
                        pos,
                        expected: "Ref".to_string(),
                        found: other.describe(),
                    }),
                    None => {}
                }
            }
            Statement::If(cond, then_body, else_body, _) => {
                let cond_ty = self.infer_expr(scope, cond);
                self.expect_bool(cond, cond_ty);
                self.check_block(scope, then_body);
                self.check_block(scope, else_body);
            }
            Statement::For(var, iter, body, _) => {
                let iter_ty = self.infer_expr(scope, iter).unwrap_or(Type::Void);
                let child = scope.child();
                let elem_ty = match iter_ty {
                    Type::List(inner) => (*inner).clone(),
                    Type::Outcomes(inner) => (*inner).clone(),
                    other => other,
                };
                child.define(var, Binding::Param(ast::Param {
                    name: var.clone(),
                    declared_type: Some(elem_ty),
                    default: None,
                    span: iter.span(),
                }));
                self.check_block(&child, body);
            }
            Statement::Block(body, _) => self.check_block(scope, body),
            Statement::Return(value, _) => {
                if let Some(v) = value {
                    let _ = self.infer_expr(scope, v);
                }
            }
            Statement::Expression(e, _) => {
                let _ = self.infer_expr(scope, e);
            }
        }
    }

    fn expect_bool(&mut self, expr: &Node<Expr>, ty: Option<Type>) {
        if let Some(t) = ty {
            if t != Type::Bool {
                self.diagnostics.push(TypeError::Mismatch {
                    pos: self.pos_of(expr),
                    expected: "Bool".to_string(),
                    found: t.describe(),
                });
            }
        }
    }

    fn pos_of(&self, expr: &Node<Expr>) -> crate::error::Position {
        let s = expr.span();
        crate::error::Position { line: s.line, col: s.col }
    }

    fn set_inferred(&self, expr: &Node<Expr>, ty: &Type) {
        if let Some(slot) = expr.type_slot() {
            slot.set_inferred(ty.clone());
        }
    }

    fn infer_expr(&mut self, scope: &TypeScope, expr: &Node<Expr>) -> Option<Type> {
        let result = self.infer_expr_inner(scope, expr);
        match result {
            Ok(ty) => {
                self.set_inferred(expr, &ty);
                Some(ty)
            }
            Err(e) => {
                self.diagnostics.push(e);
                None
            }
        }
    }

    fn infer_expr_inner(&mut self, scope: &TypeScope, expr: &Node<Expr>) -> TResult {
        match &**expr {
            Expr::IntLit(..) => Ok(Type::Int),
            Expr::FloatLit(..) => Ok(Type::Float),
            Expr::BoolLit(..) => Ok(Type::Bool),
            Expr::StrLit(..) => Ok(Type::Str),
            Expr::DurationLit(..) => Ok(Type::Duration),
            Expr::NilLit(..) => Ok(Type::Nil),
            Expr::Identifier(name, span, _) => self.infer_identifier(scope, name, *span),
            Expr::Binary(op, lhs, rhs, span, _) => self.infer_binary(scope, *op, lhs, rhs, *span),
            Expr::Unary(op, operand, span, _) => self.infer_unary(scope, *op, operand, *span),
            Expr::Member(obj, member, span, _) => self.infer_member(scope, obj, member, *span),
            Expr::Index(obj, idx, span, _) => self.infer_index(scope, obj, idx, *span),
            Expr::Call(callee, args, span, _) => self.infer_call(scope, callee, args, *span),
            Expr::Tuple(items, _, _) => {
                let mut types = Vec::with_capacity(items.len());
                for item in items {
                    types.push(self.infer_expr(scope, item).unwrap_or(Type::Void));
                }
                Ok(Type::Tuple(types))
            }
            Expr::Distribute(arms, span, _) => self.infer_distribute(scope, arms, *span),
            Expr::Sample(inner, span, _) => self.infer_sample(scope, inner, *span),
            Expr::Go(inner, loop_count, _, _) => {
                let result_ty = self.infer_expr(scope, inner).unwrap_or(Type::Void);
                let loop_ty = match loop_count {
                    Some(lc) => Some(Rc::new(self.infer_expr(scope, lc).unwrap_or(Type::Int))),
                    None => None,
                };
                Ok(Type::Future(Rc::new(result_ty), loop_ty))
            }
            Expr::Wait(futures, _, span, _) => self.infer_wait(scope, futures, *span),
        }
    }

    fn infer_identifier(&mut self, scope: &TypeScope, name: &str, span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        match scope.get(name) {
            Some(Binding::Param(p)) => Ok(p
                .declared_type
                .map(|t| self.resolve_type(scope, &t, pos))
                .unwrap_or(Type::Void)),
            Some(Binding::Component(c)) => Ok(Type::Component(c)),
            Some(Binding::Enum(e)) => Ok(Type::Enum(e)),
            Some(Binding::Instance(inst)) => match scope.get(&inst.component_name) {
                Some(Binding::Component(c)) => Ok(Type::Component(c)),
                _ => Err(TypeError::UnresolvedType { pos, name: inst.component_name.clone() }),
            },
            Some(Binding::Local(node)) => self.infer_expr_inner(scope, &node),
            Some(Binding::Method(owner, m)) => Ok(self.method_sig_type(scope, Some(owner), &m, pos)),
            Some(Binding::System(_)) | Some(Binding::Aggregator(_)) | None => {
                Err(TypeError::UnresolvedType { pos, name: name.to_string() })
            }
        }
    }

    /// Shared by `+`/`-`/`*`/`/`: both sides numeric-or-Duration, promoting
    /// Int to Float (or to Duration) on a mixed pair.
    fn combine_numeric(pos: crate::error::Position, lt: Type, rt: Type) -> TResult {
        if !lt.is_numeric() && lt != Type::Duration {
            return Err(TypeError::Mismatch { pos, expected: "Int, Float, or Duration".to_string(), found: lt.describe() });
        }
        if lt == rt {
            Ok(lt)
        } else if lt.widens_to(&rt) {
            Ok(rt)
        } else if rt.widens_to(&lt) {
            Ok(lt)
        } else {
            Err(TypeError::Mismatch { pos, expected: lt.describe(), found: rt.describe() })
        }
    }

    fn infer_binary(&mut self, scope: &TypeScope, op: BinOp, lhs: &Node<Expr>, rhs: &Node<Expr>, span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        let lt = self.infer_expr(scope, lhs).unwrap_or(Type::Void);
        let rt = self.infer_expr(scope, rhs).unwrap_or(Type::Void);
        match op {
            BinOp::Add if lt == Type::Str && rt == Type::Str => Ok(Type::Str),
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => Self::combine_numeric(pos, lt, rt),
            BinOp::Mod => {
                if lt != Type::Int || rt != Type::Int {
                    let found = if lt != Type::Int { lt.describe() } else { rt.describe() };
                    return Err(TypeError::Mismatch { pos, expected: "Int".to_string(), found });
                }
                Ok(Type::Int)
            }
            BinOp::And | BinOp::Or => {
                if lt != Type::Bool {
                    return Err(TypeError::Mismatch { pos, expected: "Bool".to_string(), found: lt.describe() });
                }
                if rt != Type::Bool {
                    return Err(TypeError::Mismatch { pos, expected: "Bool".to_string(), found: rt.describe() });
                }
                Ok(Type::Bool)
            }
            BinOp::Lt | BinOp::Gt | BinOp::Lte | BinOp::Gte => {
                if lt == rt || lt.widens_to(&rt) || rt.widens_to(&lt) {
                    Ok(Type::Bool)
                } else {
                    Err(TypeError::Mismatch { pos, expected: lt.describe(), found: rt.describe() })
                }
            }
            BinOp::Eq | BinOp::Neq => Ok(Type::Bool),
        }
    }

    fn infer_unary(&mut self, scope: &TypeScope, op: UnOp, operand: &Node<Expr>, span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        let ty = self.infer_expr(scope, operand).unwrap_or(Type::Void);
        match op {
            UnOp::Not => {
                if ty != Type::Bool {
                    return Err(TypeError::Mismatch { pos, expected: "Bool".to_string(), found: ty.describe() });
                }
                Ok(Type::Bool)
            }
            UnOp::Neg => {
                if !ty.is_numeric() && ty != Type::Duration {
                    return Err(TypeError::Mismatch { pos, expected: "Int, Float, or Duration".to_string(), found: ty.describe() });
                }
                Ok(ty)
            }
        }
    }

    fn infer_member(&mut self, scope: &TypeScope, obj: &Node<Expr>, member: &str, span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        let obj_ty = self.infer_expr(scope, obj).unwrap_or(Type::Void);
        let obj_ty = obj_ty.deref_ref().clone();
        match &obj_ty {
            Type::Component(c) => {
                if let Some(p) = c.params.iter().find(|p| p.name == member) {
                    let inner = p.declared_type.clone().map(|t| self.resolve_type(scope, &t, pos)).unwrap_or(Type::Void);
                    return Ok(Type::Ref(c.clone(), Rc::new(inner)));
                }
                if let Some(d) = c.uses.iter().find(|d| d.name == member) {
                    return match scope.get(&d.component_name) {
                        Some(Binding::Component(target)) => Ok(Type::Ref(c.clone(), Rc::new(Type::Component(target)))),
                        _ => Err(TypeError::UnresolvedType { pos, name: d.component_name.clone() }),
                    };
                }
                if let Some(m) = c.methods.iter().find(|m| m.name == member) {
                    return Ok(self.method_sig_type(scope, Some(c.clone()), m, pos));
                }
                Err(TypeError::BadMember { pos, receiver: c.name.clone(), member: member.to_string() })
            }
            other => Err(TypeError::BadMember { pos, receiver: other.describe(), member: member.to_string() }),
        }
    }

    fn method_sig_type(&mut self, scope: &TypeScope, owner: Option<Node<ast::Component>>, method: &Node<ast::Method>, pos: crate::error::Position) -> Type {
        let params = method
            .params
            .iter()
            .map(|p| p.declared_type.clone().map(|t| self.resolve_type(scope, &t, pos)).unwrap_or(Type::Void))
            .collect();
        let param_names = method.params.iter().map(|p| p.name.clone()).collect();
        let return_type = method.return_type.clone().map(|t| self.resolve_type(scope, &t, pos)).unwrap_or(Type::Void);
        Type::Method(Rc::new(MethodSig { owner, params, param_names, return_type: Rc::new(return_type) }))
    }

    fn infer_index(&mut self, scope: &TypeScope, obj: &Node<Expr>, idx: &Node<Expr>, span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        let obj_ty = self.infer_expr(scope, obj).unwrap_or(Type::Void);
        let idx_ty = self.infer_expr(scope, idx).unwrap_or(Type::Void);
        if idx_ty != Type::Int {
            self.diagnostics.push(TypeError::Mismatch { pos, expected: "Int".to_string(), found: idx_ty.describe() });
        }
        match obj_ty.deref_ref() {
            Type::List(inner) => Ok((**inner).clone()),
            Type::Str => Ok(Type::Str),
            Type::Tuple(items) => match &**idx {
                Expr::IntLit(i, _) if *i >= 0 && (*i as usize) < items.len() => Ok(items[*i as usize].clone()),
                Expr::IntLit(i, _) => Err(TypeError::NotIndexable {
                    pos,
                    ty: format!("Tuple[{}] index {i} out of range", items.len()),
                }),
                _ => Err(TypeError::NotIndexable {
                    pos,
                    ty: "Tuple[...] requires an integer literal index".to_string(),
                }),
            },
            other => Err(TypeError::NotIndexable { pos, ty: other.describe() }),
        }
    }

    fn infer_call(&mut self, scope: &TypeScope, callee: &Node<Expr>, args: &[ast::Arg], span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        let callee_ty = self.infer_expr(scope, callee).unwrap_or(Type::Void);
        match callee_ty {
            Type::Method(sig) => {
                if sig.params.len() != args.len() {
                    for arg in args {
                        let _ = self.infer_expr(scope, &arg.value);
                    }
                    return Err(TypeError::Arity { pos, expected: sig.params.len(), found: args.len() });
                }
                for (i, arg) in args.iter().enumerate() {
                    let arg_pos = self.pos_of(&arg.value);
                    let arg_ty = self.infer_expr(scope, &arg.value).unwrap_or(Type::Void);
                    let target = match &arg.name {
                        Some(name) => match sig.param_names.iter().position(|n| n == name) {
                            Some(idx) => idx,
                            None => {
                                self.diagnostics.push(TypeError::BadMember {
                                    pos: arg_pos,
                                    receiver: "call arguments".to_string(),
                                    member: name.clone(),
                                });
                                continue;
                            }
                        },
                        None => i,
                    };
                    let expected = &sig.params[target];
                    // Int/Float Ref auto-dereferences against a numeric param.
                    let arg_ty = if expected.is_numeric() { arg_ty.deref_ref().clone() } else { arg_ty };
                    if arg_ty != *expected && !arg_ty.widens_to(expected) {
                        self.diagnostics.push(TypeError::Mismatch {
                            pos: arg_pos,
                            expected: expected.describe(),
                            found: arg_ty.describe(),
                        });
                    }
                }
                Ok((*sig.return_type).clone())
            }
            other => {
                for arg in args {
                    let _ = self.infer_expr(scope, &arg.value);
                }
                Err(TypeError::Mismatch { pos, expected: "Method".to_string(), found: other.describe() })
            }
        }
    }

    fn infer_distribute(&mut self, scope: &TypeScope, arms: &[(Node<Expr>, Node<Expr>)], span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        let mut value_ty: Option<Type> = None;
        for (weight, value) in arms {
            let wty = self.infer_expr(scope, weight).unwrap_or(Type::Void);
            if !wty.is_numeric() {
                self.diagnostics.push(TypeError::Mismatch { pos, expected: "Int or Float".to_string(), found: wty.describe() });
            }
            let vty = self.infer_expr(scope, value).unwrap_or(Type::Void);
            value_ty = match value_ty {
                None => Some(vty),
                Some(existing) if existing == vty => Some(existing),
                Some(existing) => {
                    self.diagnostics.push(TypeError::Mismatch { pos, expected: existing.describe(), found: vty.describe() });
                    Some(existing)
                }
            };
        }
        Ok(Type::Outcomes(Rc::new(value_ty.unwrap_or(Type::Void))))
    }

    fn infer_sample(&mut self, scope: &TypeScope, inner: &Node<Expr>, span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        match self.infer_expr(scope, inner) {
            Some(ty) => match ty.deref_ref() {
                Type::Outcomes(t) => Ok((**t).clone()),
                other => Err(TypeError::Mismatch { pos, expected: "Outcomes[T]".to_string(), found: other.describe() }),
            },
            None => Ok(Type::Void),
        }
    }

    fn infer_wait(&mut self, scope: &TypeScope, futures: &[Node<Expr>], span: ast::Span) -> TResult {
        let pos = crate::error::Position { line: span.line, col: span.col };
        let mut results = Vec::with_capacity(futures.len());
        for f in futures {
            match self.infer_expr(scope, f) {
                Some(Type::Future(r, _)) => results.push((*r).clone()),
                Some(other) => {
                    self.diagnostics.push(TypeError::Mismatch { pos, expected: "Future[T]".to_string(), found: other.describe() });
                    results.push(Type::Void);
                }
                None => results.push(Type::Void),
            }
        }
        if results.len() == 1 {
            Ok(results.into_iter().next().unwrap())
        } else {
            Ok(Type::Tuple(results))
        }
    }
}

impl Default for Inference {
    fn default() -> Inference {
        Inference::new()
    }
}
