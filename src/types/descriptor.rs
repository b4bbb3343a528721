//! Type descriptors: open or closed references to declared types.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::internal::FastMap;
use super::definition::{Constructor, TypeDefinition, TypeKind};

/// Identifies a type, possibly containing unbound generic parameters.
///
/// A descriptor is *closed* when no [`TypeDescriptor::Parameter`] occurs
/// anywhere inside it, and *open* otherwise. Equality and hashing are
/// structural: definition name plus arguments, or the parameter name.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{TypeDefinition, TypeDescriptor, GenericParameter};
///
/// let list = TypeDefinition::class("List").generic(GenericParameter::new("T")).build();
/// let order = TypeDefinition::class("Order").build();
///
/// let open = list.open();
/// let closed = list.make_generic([order.descriptor()]);
///
/// assert!(open.contains_generic_parameters());
/// assert!(!closed.contains_generic_parameters());
/// assert!(closed.generic_parameters().is_empty());
/// assert_eq!(closed.to_string(), "List<Order>");
/// ```
#[derive(Clone)]
pub enum TypeDescriptor {
    /// Reference to a generic parameter by name
    Parameter(Arc<str>),
    /// A definition applied to arguments (none for non-generic types)
    Named {
        definition: Arc<TypeDefinition>,
        arguments: Arc<[TypeDescriptor]>,
    },
}

/// Bindings from generic parameter names to descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    bindings: FastMap<Arc<str>, TypeDescriptor>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parameter: &str) -> Option<&TypeDescriptor> {
        self.bindings.get(parameter)
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.bindings.contains_key(parameter)
    }

    pub fn bind(&mut self, parameter: Arc<str>, value: TypeDescriptor) {
        self.bindings.insert(parameter, value);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(Arc<str>, TypeDescriptor)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Arc<str>, TypeDescriptor)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl TypeDescriptor {
    /// A reference to the generic parameter `name`.
    pub fn parameter(name: impl Into<Arc<str>>) -> Self {
        TypeDescriptor::Parameter(name.into())
    }

    pub(crate) fn named(definition: Arc<TypeDefinition>, arguments: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Named {
            definition,
            arguments: arguments.into(),
        }
    }

    pub fn definition(&self) -> Option<&Arc<TypeDefinition>> {
        match self {
            TypeDescriptor::Named { definition, .. } => Some(definition),
            TypeDescriptor::Parameter(_) => None,
        }
    }

    pub fn arguments(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Named { arguments, .. } => arguments,
            TypeDescriptor::Parameter(_) => &[],
        }
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, TypeDescriptor::Parameter(_))
    }

    /// True when the underlying definition declares generic parameters.
    pub fn is_generic(&self) -> bool {
        self.definition().is_some_and(|d| d.is_generic())
    }

    /// Definition name, or the parameter name for parameter references.
    pub fn definition_name(&self) -> &str {
        match self {
            TypeDescriptor::Named { definition, .. } => definition.name(),
            TypeDescriptor::Parameter(name) => &**name,
        }
    }

    /// True when both descriptors apply the same definition, whatever the arguments.
    pub fn has_same_definition(&self, other: &TypeDescriptor) -> bool {
        match (self.definition(), other.definition()) {
            (Some(a), Some(b)) => a.is_same_definition(b),
            _ => false,
        }
    }

    pub fn contains_generic_parameters(&self) -> bool {
        match self {
            TypeDescriptor::Parameter(_) => true,
            TypeDescriptor::Named { arguments, .. } => {
                arguments.iter().any(TypeDescriptor::contains_generic_parameters)
            }
        }
    }

    /// Distinct parameter names in first-occurrence order.
    pub fn generic_parameters(&self) -> Vec<Arc<str>> {
        let mut found = Vec::new();
        self.collect_parameters(&mut found);
        found
    }

    fn collect_parameters(&self, found: &mut Vec<Arc<str>>) {
        match self {
            TypeDescriptor::Parameter(name) => {
                if !found.iter().any(|f| f == name) {
                    found.push(name.clone());
                }
            }
            TypeDescriptor::Named { arguments, .. } => {
                for argument in arguments.iter() {
                    argument.collect_parameters(found);
                }
            }
        }
    }

    /// Replaces bound parameters; unbound ones are left in place.
    pub fn substitute(&self, substitution: &Substitution) -> TypeDescriptor {
        if substitution.is_empty() || !self.contains_generic_parameters() {
            return self.clone();
        }
        match self {
            TypeDescriptor::Parameter(name) => substitution
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeDescriptor::Named { definition, arguments } => TypeDescriptor::named(
                definition.clone(),
                arguments.iter().map(|a| a.substitute(substitution)).collect(),
            ),
        }
    }

    /// Maps the definition's declared parameter names to this descriptor's arguments.
    pub(crate) fn definition_substitution(&self) -> Substitution {
        match self {
            TypeDescriptor::Named { definition, arguments } => definition
                .parameters()
                .iter()
                .zip(arguments.iter())
                .map(|(p, a)| (p.name_arc().clone(), a.clone()))
                .collect(),
            TypeDescriptor::Parameter(_) => Substitution::new(),
        }
    }

    /// The base type with this descriptor's arguments applied.
    pub fn base_type(&self) -> Option<TypeDescriptor> {
        let definition = self.definition()?;
        let base = definition.base()?;
        Some(base.substitute(&self.definition_substitution()))
    }

    /// Directly implemented interfaces with this descriptor's arguments applied.
    pub fn interfaces(&self) -> Vec<TypeDescriptor> {
        let Some(definition) = self.definition() else {
            return Vec::new();
        };
        let substitution = self.definition_substitution();
        definition
            .interfaces()
            .iter()
            .map(|i| i.substitute(&substitution))
            .collect()
    }

    /// This type followed by every base type and interface it reaches.
    ///
    /// Breadth-first: base type before interfaces at each level, each type
    /// listed once. The order only depends on declarations.
    pub fn supertypes(&self) -> Vec<TypeDescriptor> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut queue = VecDeque::from([self.clone()]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(base) = current.base_type() {
                queue.push_back(base);
            }
            queue.extend(current.interfaces());
            ordered.push(current);
        }

        ordered
    }

    /// Supertypes that apply the same definition as `service`.
    pub fn supertypes_for(&self, service: &TypeDescriptor) -> Vec<TypeDescriptor> {
        self.supertypes()
            .into_iter()
            .filter(|s| s.has_same_definition(service))
            .collect()
    }

    /// True when a value of this type can be used where `target` is expected.
    pub fn is_assignable_to(&self, target: &TypeDescriptor) -> bool {
        self == target || self.supertypes().iter().any(|s| s == target)
    }

    pub fn is_reference_type(&self) -> bool {
        self.definition()
            .is_some_and(|d| matches!(d.kind(), TypeKind::Class | TypeKind::Interface))
    }

    pub fn is_value_type(&self) -> bool {
        self.definition().is_some_and(|d| d.kind() == TypeKind::Struct)
    }

    /// True for structs and for concrete classes with a public parameterless constructor.
    pub fn has_default_constructor(&self) -> bool {
        match self.definition() {
            Some(d) if d.kind() == TypeKind::Struct => true,
            Some(d) if d.kind() == TypeKind::Class && !d.is_abstract() => d
                .constructors()
                .iter()
                .any(|c| c.is_public() && c.arity() == 0),
            _ => false,
        }
    }

    /// Public constructors in declaration order, parameter types substituted.
    pub fn public_constructors(&self) -> Vec<Constructor> {
        let Some(definition) = self.definition() else {
            return Vec::new();
        };
        let substitution = self.definition_substitution();
        definition
            .constructors()
            .iter()
            .filter(|c| c.is_public())
            .map(|c| c.substitute(&substitution))
            .collect()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeDescriptor::Parameter(a), TypeDescriptor::Parameter(b)) => a == b,
            (
                TypeDescriptor::Named { definition: da, arguments: aa },
                TypeDescriptor::Named { definition: db, arguments: ab },
            ) => da.is_same_definition(db) && aa == ab,
            _ => false,
        }
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            TypeDescriptor::Parameter(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            TypeDescriptor::Named { definition, arguments } => {
                1u8.hash(state);
                definition.name().hash(state);
                definition.arity().hash(state);
                arguments.hash(state);
            }
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Parameter(name) => f.write_str(name),
            TypeDescriptor::Named { definition, arguments } => {
                f.write_str(definition.name())?;
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    for (i, argument) in arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", argument)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self)
    }
}
