//! Lexical scoping. A stack of frames maps
//! identifiers to the AST node that declared them; lookups walk outward to
//! the root frame, which holds imports and top-level declarations. A single
//! `Env<T>` scope-chain design is generalized from a single
//! value type to the `Binding` enum the description language actually needs,
//! and paired with a `TypeScope` that additionally tracks which component
//! and method are "active" so `self`-relative member lookups resolve during
//! inference.

use crate::ast::{self, Node};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

/// What an identifier in scope names.
#[derive(Debug, Clone)]
pub enum Binding {
    Component(Node<ast::Component>),
    Enum(Node<ast::Enum>),
    System(Node<ast::System>),
    Aggregator(Node<ast::Aggregator>),
    Param(ast::Param),
    Instance(Node<ast::Instance>),
    /// A `let`-bound local; carries no declared type, only the node that
    /// introduced it, so inference can re-derive its type from the
    /// right-hand side.
    Local(Node<ast::Expr>),
    /// An own-component method referenced bare (without a `self.` or
    /// instance prefix) from inside one of that component's own methods.
    Method(Node<ast::Component>, Node<ast::Method>),
}

pub type EnvNode<T> = Rc<Env<T>>;

/// A single scope frame plus a link to its parent, a linear scope-chain
/// shape generalized over the value type.
pub struct Env<T> {
    scope: RefCell<HashMap<String, T>>,
    parent: Option<EnvNode<T>>,
}

impl<T> Env<T>
where
    T: Clone + Debug,
{
    fn new(parent: Option<EnvNode<T>>) -> Env<T> {
        Env {
            scope: RefCell::new(HashMap::new()),
            parent,
        }
    }

    pub fn root() -> EnvNode<T> {
        Rc::new(Self::new(None))
    }

    pub fn chain(parent: &EnvNode<T>) -> EnvNode<T> {
        Rc::new(Self::new(Some(parent.clone())))
    }

    /// Look up an identifier from anywhere in the scope chain, innermost
    /// frame first.
    pub fn get(&self, key: &str) -> Option<T> {
        if let Some(value) = self.scope.borrow().get(key) {
            Some(value.clone())
        } else if let Some(env) = &self.parent {
            env.get(key)
        } else {
            None
        }
    }

    /// True if `key` is bound in this exact frame, ignoring parents —
    /// used to detect shadowing-by-redefinition within one block.
    pub fn defined_locally(&self, key: &str) -> bool {
        self.scope.borrow().contains_key(key)
    }

    pub fn define(&self, key: &str, value: T) {
        self.scope.borrow_mut().insert(key.to_string(), value);
    }
}

/// The environment type used throughout the front end: identifiers bind to
/// `Binding`s.
pub type Environment = Env<Binding>;

/// Wraps an `Environment` with the component/method currently being
/// type-checked, so expressions like a bare `latency` inside a method body
/// resolve against `self`'s params and dependencies before falling back to
/// the lexical chain.
pub struct TypeScope {
    pub env: EnvNode<Binding>,
    pub self_component: Option<Node<ast::Component>>,
    pub current_method: Option<Node<ast::Method>>,
}

impl TypeScope {
    pub fn root() -> TypeScope {
        TypeScope {
            env: Env::root(),
            self_component: None,
            current_method: None,
        }
    }

    pub fn child(&self) -> TypeScope {
        TypeScope {
            env: Env::chain(&self.env),
            self_component: self.self_component.clone(),
            current_method: self.current_method.clone(),
        }
    }

    pub fn for_method(&self, component: &Node<ast::Component>, method: &Node<ast::Method>) -> TypeScope {
        let child = Env::chain(&self.env);
        for p in &method.params {
            child.define(&p.name, Binding::Param(p.clone()));
        }
        TypeScope {
            env: child,
            self_component: Some(component.clone()),
            current_method: Some(method.clone()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Binding> {
        if let Some(b) = self.env.get(key) {
            return Some(b);
        }
        if let Some(c) = &self.self_component {
            if let Some(p) = c.params.iter().find(|p| p.name == key) {
                return Some(Binding::Param(p.clone()));
            }
            if let Some(d) = c.uses.iter().find(|d| d.name == key) {
                // Dependencies resolve through the root env by component name.
                if let Some(Binding::Component(_)) = self.env.get(&d.component_name) {
                    return self.env.get(&d.component_name);
                }
            }
            if let Some(m) = c.methods.iter().find(|m| m.name == key) {
                return Some(Binding::Method(c.clone(), m.clone()));
            }
        }
        None
    }

    pub fn define(&self, key: &str, value: Binding) {
        self.env.define(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_param(name: &str) -> ast::Param {
        ast::Param {
            name: name.to_string(),
            declared_type: None,
            default: None,
            span: ast::Span { line: 1, col: 1 },
        }
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let root: EnvNode<i32> = Env::root();
        root.define("a", 1);
        let child = Env::chain(&root);
        child.define("b", 2);
        assert_eq!(child.get("a"), Some(1));
        assert_eq!(child.get("b"), Some(2));
        assert_eq!(root.get("b"), None);
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let root: EnvNode<i32> = Env::root();
        root.define("x", 1);
        let child = Env::chain(&root);
        child.define("x", 2);
        assert_eq!(child.get("x"), Some(2));
        assert_eq!(root.get("x"), Some(1));
    }

    #[test]
    fn type_scope_resolves_method_param_before_lexical() {
        let root = TypeScope::root();
        let comp = Rc::new(ast::Component {
            name: "Disk".to_string(),
            params: vec![dummy_param("latency")],
            uses: vec![],
            methods: vec![],
            span: ast::Span { line: 1, col: 1 },
        });
        let method = Rc::new(ast::Method {
            name: "read".to_string(),
            params: vec![],
            return_type: None,
            native: false,
            body: vec![],
            span: ast::Span { line: 1, col: 1 },
        });
        let scope = root.for_method(&comp, &method);
        assert!(matches!(scope.get("latency"), Some(Binding::Param(_))));
        assert!(scope.get("nonexistent").is_none());
    }
}
