//! Type registry: answers "has this resource been asserted as this kind?"
//! and checks a relationship's operands against the relation's signature.
//!
//! Membership is all that is tested. A resource typed as both Entity and
//! Agent satisfies either check; exclusivity is not enforced.

use std::fmt;

use crate::error::ProvResult;
use crate::graph::Object;
use crate::observe::{ProvEvent, ProvObserver};
use crate::vocab::{ProvKind, Range, Relation};

/// Lookup of asserted kinds.
pub trait TypeRegistry {
    fn has_kind(&self, uri: &str, kind: ProvKind) -> ProvResult<bool>;
}

impl<R: TypeRegistry + ?Sized> TypeRegistry for &R {
    fn has_kind(&self, uri: &str, kind: ProvKind) -> ProvResult<bool> {
        (**self).has_kind(uri, kind)
    }
}

/// Which side of a relationship failed its check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Subject,
    Object,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject => write!(f, "subject"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// A relationship operand that does not carry the kind its relation requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeViolation {
    pub relation: Relation,
    pub operand: Operand,
    /// The offending resource, or the rendered value for a literal operand.
    pub uri: String,
    pub expected: Range,
}

impl fmt::Display for TypeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {}: {} is not of type {}",
            self.operand, self.relation, self.uri, self.expected
        )
    }
}

fn check_kind(
    registry: &dyn TypeRegistry,
    observer: &dyn ProvObserver,
    uri: &str,
    kind: ProvKind,
) -> ProvResult<bool> {
    let satisfied = registry.has_kind(uri, kind)?;
    observer.on_event(&ProvEvent::TypeChecked {
        uri: uri.to_string(),
        kind,
        satisfied,
    });
    Ok(satisfied)
}

/// Check `subject relation object` against the relation's signature.
///
/// Returns the first violation found, subject before object. The object is
/// not consulted once the subject fails.
pub fn check_signature(
    registry: &dyn TypeRegistry,
    observer: &dyn ProvObserver,
    relation: Relation,
    subject: &str,
    object: Object<'_>,
) -> ProvResult<Option<TypeViolation>> {
    let signature = relation.signature();

    if !check_kind(registry, observer, subject, signature.subject)? {
        return Ok(Some(TypeViolation {
            relation,
            operand: Operand::Subject,
            uri: subject.to_string(),
            expected: Range::Kind(signature.subject),
        }));
    }

    let object_ok = match (signature.object, object) {
        (Range::Kind(kind), Object::Resource(uri)) => check_kind(registry, observer, uri, kind)?,
        (Range::Timestamp, Object::Timestamp(_)) => true,
        _ => false,
    };
    if object_ok {
        Ok(None)
    } else {
        Ok(Some(TypeViolation {
            relation,
            operand: Operand::Object,
            uri: object.to_string(),
            expected: signature.object,
        }))
    }
}
