//! The `Type` lattice. Two types are equal iff tags and
//! parameters match structurally; the only implicit widening is
//! `Int -> Float`. `Enum`/`Component`/`Method` wrap the declaration they
//! name and compare by pointer identity, since two distinct declarations
//! with the same shape are still different types.

use crate::ast::{self, Node};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    Duration,
    Nil,
    Void,
    List(Rc<Type>),
    Tuple(Vec<Type>),
    Outcomes(Rc<Type>),
    /// A type name as written in source, before inference resolves it
    /// against the environment into `Enum`/`Component`. Never survives
    /// past the resolution pass.
    Named(String),
    Enum(Node<ast::Enum>),
    Component(Node<ast::Component>),
    Method(Rc<MethodSig>),
    /// A first-class reference whose inner type is what member access or
    /// set/get ultimately names. `owner` is the component that declares
    /// the referenced parameter or dependency.
    Ref(Node<ast::Component>, Rc<Type>),
    /// Result type of an asynchronously-scheduled expression, with an
    /// optional loop-count type.
    Future(Rc<Type>, Option<Rc<Type>>),
}

/// The resolved signature of a method, used as `Type::Method`'s payload
/// since methods aren't declarations in the same sense components are —
/// two calls to the same method share one signature.
#[derive(Debug)]
pub struct MethodSig {
    pub owner: Option<Node<ast::Component>>,
    pub params: Vec<Type>,
    pub param_names: Vec<String>,
    pub return_type: Rc<Type>,
}

impl PartialEq for MethodSig {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && *self.return_type == *other.return_type
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        use Type::*;
        match (self, other) {
            (Int, Int) | (Float, Float) | (Bool, Bool) | (Str, Str) | (Duration, Duration) | (Nil, Nil) | (Void, Void) => true,
            (List(a), List(b)) => a == b,
            (Tuple(a), Tuple(b)) => a == b,
            (Outcomes(a), Outcomes(b)) => a == b,
            (Named(a), Named(b)) => a == b,
            (Enum(a), Enum(b)) => Rc::ptr_eq(a, b),
            (Component(a), Component(b)) => Rc::ptr_eq(a, b),
            (Method(a), Method(b)) => a == b,
            (Ref(oa, ia), Ref(ob, ib)) => Rc::ptr_eq(oa, ob) && ia == ib,
            (Future(ra, la), Future(rb, lb)) => ra == rb && la == lb,
            _ => false,
        }
    }
}

impl Type {
    /// The only implicit widening in the type system.
    pub fn widens_to(&self, target: &Type) -> bool {
        matches!((self, target), (Type::Int, Type::Float))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Drill through `Ref` wrappers to the underlying type, as member
    /// access, indexing, and calls must.
    pub fn deref_ref(&self) -> &Type {
        match self {
            Type::Ref(_, inner) => inner.deref_ref(),
            other => other,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Type::Int => "Int".to_string(),
            Type::Float => "Float".to_string(),
            Type::Bool => "Bool".to_string(),
            Type::Str => "Str".to_string(),
            Type::Duration => "Duration".to_string(),
            Type::Nil => "Nil".to_string(),
            Type::Void => "Void".to_string(),
            Type::List(t) => format!("List[{}]", t.describe()),
            Type::Tuple(ts) => format!("Tuple[{}]", ts.iter().map(Type::describe).collect::<Vec<_>>().join(", ")),
            Type::Outcomes(t) => format!("Outcomes[{}]", t.describe()),
            Type::Named(n) => n.clone(),
            Type::Enum(e) => format!("Enum({})", e.name),
            Type::Component(c) => format!("Component({})", c.name),
            Type::Method(m) => format!("Method(-> {})", m.return_type.describe()),
            Type::Ref(owner, inner) => format!("Ref({}, {})", owner.name, inner.describe()),
            Type::Future(r, l) => match l {
                Some(l) => format!("Future[{}, {}]", r.describe(), l.describe()),
                None => format!("Future[{}]", r.describe()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_equal_by_tag() {
        assert_eq!(Type::Int, Type::Int);
        assert_ne!(Type::Int, Type::Float);
    }

    #[test]
    fn only_int_widens_to_float() {
        assert!(Type::Int.widens_to(&Type::Float));
        assert!(!Type::Float.widens_to(&Type::Int));
        assert!(!Type::Bool.widens_to(&Type::Float));
    }

    #[test]
    fn list_equality_structural() {
        let a = Type::List(Rc::new(Type::Int));
        let b = Type::List(Rc::new(Type::Int));
        assert_eq!(a, b);
        let c = Type::List(Rc::new(Type::Float));
        assert_ne!(a, c);
    }

    #[test]
    fn ref_deref_drills_to_inner() {
        let comp = Rc::new(ast::Component {
            name: "Disk".to_string(),
            params: vec![],
            uses: vec![],
            methods: vec![],
            span: ast::Span { line: 1, col: 1 },
        });
        let r = Type::Ref(comp, Rc::new(Type::Int));
        assert_eq!(r.deref_ref(), &Type::Int);
    }
}
