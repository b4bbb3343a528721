//! Declarative type definitions.
//!
//! A [`TypeDefinition`] is computed once, when a component is declared, and
//! then shared by every descriptor that refers to it. Generic parameters carry
//! their constraint kinds up front so that closing never has to inspect a
//! live type system.

use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use super::descriptor::{Substitution, TypeDescriptor};

/// The category of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Reference type with optional base type and constructors
    Class,
    /// Value type; always default-constructible
    Struct,
    /// Reference type that only declares a contract
    Interface,
}

/// Constructor visibility. Only public constructors are candidates for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    NonPublic,
}

/// A constraint declared on a generic parameter.
///
/// `BaseType` and `Interface` bounds are descriptors that may mention other
/// parameters of the same definition (for example `T: IEnumerable<TItem>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericConstraint {
    /// The argument must be a class or interface
    ReferenceType,
    /// The argument must be a struct
    ValueType,
    /// The argument must have a public parameterless constructor
    DefaultConstructor,
    /// The argument must be, or derive from, the bound
    BaseType(TypeDescriptor),
    /// The argument must implement the bound
    Interface(TypeDescriptor),
}

impl GenericConstraint {
    /// The bound descriptor for `BaseType` and `Interface` constraints.
    pub fn bound(&self) -> Option<&TypeDescriptor> {
        match self {
            GenericConstraint::BaseType(bound) | GenericConstraint::Interface(bound) => Some(bound),
            _ => None,
        }
    }
}

impl fmt::Display for GenericConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericConstraint::ReferenceType => f.write_str("class"),
            GenericConstraint::ValueType => f.write_str("struct"),
            GenericConstraint::DefaultConstructor => f.write_str("new()"),
            GenericConstraint::BaseType(bound) | GenericConstraint::Interface(bound) => {
                write!(f, "{}", bound)
            }
        }
    }
}

/// A generic parameter and its constraints, in declaration order.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{GenericParameter, GenericConstraint};
///
/// let t = GenericParameter::new("T").reference_type().default_constructor();
/// assert_eq!(t.name(), "T");
/// assert_eq!(t.constraints(), &[GenericConstraint::ReferenceType, GenericConstraint::DefaultConstructor]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericParameter {
    name: Arc<str>,
    constraints: Vec<GenericConstraint>,
}

impl GenericParameter {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    /// Adds the reference-type (`class`) constraint.
    pub fn reference_type(self) -> Self {
        self.constraint(GenericConstraint::ReferenceType)
    }

    /// Adds the value-type (`struct`) constraint.
    pub fn value_type(self) -> Self {
        self.constraint(GenericConstraint::ValueType)
    }

    /// Adds the default-constructible (`new()`) constraint.
    pub fn default_constructor(self) -> Self {
        self.constraint(GenericConstraint::DefaultConstructor)
    }

    /// Adds a base-type bound.
    pub fn base_type(self, bound: TypeDescriptor) -> Self {
        self.constraint(GenericConstraint::BaseType(bound))
    }

    /// Adds an interface bound.
    pub fn implements(self, bound: TypeDescriptor) -> Self {
        self.constraint(GenericConstraint::Interface(bound))
    }

    pub fn constraint(mut self, constraint: GenericConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub fn constraints(&self) -> &[GenericConstraint] {
        &self.constraints
    }
}

/// A named constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: Arc<str>,
    parameter_type: TypeDescriptor,
}

impl Parameter {
    pub fn new(name: impl Into<Arc<str>>, parameter_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            parameter_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_type(&self) -> &TypeDescriptor {
        &self.parameter_type
    }

    fn substitute(&self, substitution: &Substitution) -> Self {
        Self {
            name: self.name.clone(),
            parameter_type: self.parameter_type.substitute(substitution),
        }
    }
}

/// A declared constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constructor {
    visibility: Visibility,
    parameters: Vec<Parameter>,
}

impl Constructor {
    /// A public constructor taking `parameters` in order.
    pub fn public(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            visibility: Visibility::Public,
            parameters: parameters.into_iter().collect(),
        }
    }

    /// A constructor that is never considered for selection.
    pub fn non_public(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            visibility: Visibility::NonPublic,
            parameters: parameters.into_iter().collect(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub(crate) fn substitute(&self, substitution: &Substitution) -> Self {
        Self {
            visibility: self.visibility,
            parameters: self.parameters.iter().map(|p| p.substitute(substitution)).collect(),
        }
    }
}

/// A declared type: its generic shape, supertypes and constructors.
///
/// Definitions are identified by name; two definitions with the same name
/// are treated as the same type.
///
/// # Examples
///
/// ```rust
/// use ferrous_generics::{TypeDefinition, TypeDescriptor, GenericParameter, Constructor};
///
/// let repo_service = TypeDefinition::interface("IRepo")
///     .generic(GenericParameter::new("T"))
///     .build();
///
/// let repo = TypeDefinition::class("Repo")
///     .generic(GenericParameter::new("T").reference_type())
///     .implements(repo_service.make_generic([TypeDescriptor::parameter("T")]))
///     .constructor(Constructor::public([]))
///     .build();
///
/// assert!(repo.open().contains_generic_parameters());
/// assert_eq!(repo.open().to_string(), "Repo<T>");
/// ```
#[derive(Debug)]
pub struct TypeDefinition {
    name: Arc<str>,
    kind: TypeKind,
    is_abstract: bool,
    parameters: Vec<GenericParameter>,
    base: Option<TypeDescriptor>,
    interfaces: Vec<TypeDescriptor>,
    constructors: Vec<Constructor>,
}

impl TypeDefinition {
    /// Starts a class definition.
    pub fn class(name: impl Into<Arc<str>>) -> TypeDefinitionBuilder {
        TypeDefinitionBuilder::new(name.into(), TypeKind::Class)
    }

    /// Starts a struct definition.
    pub fn structure(name: impl Into<Arc<str>>) -> TypeDefinitionBuilder {
        TypeDefinitionBuilder::new(name.into(), TypeKind::Struct)
    }

    /// Starts an interface definition.
    pub fn interface(name: impl Into<Arc<str>>) -> TypeDefinitionBuilder {
        TypeDefinitionBuilder::new(name.into(), TypeKind::Interface)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract || self.kind == TypeKind::Interface
    }

    pub fn parameters(&self) -> &[GenericParameter] {
        &self.parameters
    }

    pub fn is_generic(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Definitions are identified by name and arity.
    ///
    /// Descriptor equality, descriptor hashing and [`CollectionKey`](crate::CollectionKey)
    /// all follow this identity.
    pub fn is_same_definition(&self, other: &TypeDefinition) -> bool {
        std::ptr::eq(self, other) || (self.name == other.name && self.arity() == other.arity())
    }

    /// Declared base type, expressed in this definition's parameters.
    pub fn base(&self) -> Option<&TypeDescriptor> {
        self.base.as_ref()
    }

    /// Directly implemented interfaces, expressed in this definition's parameters.
    pub fn interfaces(&self) -> &[TypeDescriptor] {
        &self.interfaces
    }

    /// All declared constructors in declaration order.
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// The descriptor of this definition applied to its own parameters.
    ///
    /// For a non-generic definition this is the (closed) type itself.
    pub fn open(self: &Arc<Self>) -> TypeDescriptor {
        let arguments = self
            .parameters
            .iter()
            .map(|p| TypeDescriptor::Parameter(p.name_arc().clone()))
            .collect();
        TypeDescriptor::named(self.clone(), arguments)
    }

    /// Alias of [`open`](Self::open) that reads better for non-generic types.
    pub fn descriptor(self: &Arc<Self>) -> TypeDescriptor {
        self.open()
    }

    /// Applies type arguments to this definition, checking arity.
    pub fn try_make_generic(
        self: &Arc<Self>,
        arguments: impl IntoIterator<Item = TypeDescriptor>,
    ) -> DiResult<TypeDescriptor> {
        let arguments: Vec<TypeDescriptor> = arguments.into_iter().collect();
        if arguments.len() != self.parameters.len() {
            return Err(DiError::GenericArityMismatch {
                definition: self.name.to_string(),
                expected: self.parameters.len(),
                actual: arguments.len(),
            });
        }
        Ok(TypeDescriptor::named(self.clone(), arguments))
    }

    /// Applies type arguments to this definition.
    ///
    /// # Panics
    ///
    /// Panics if the number of arguments does not match the number of
    /// declared parameters. Use [`try_make_generic`](Self::try_make_generic)
    /// for a fallible version.
    pub fn make_generic(self: &Arc<Self>, arguments: impl IntoIterator<Item = TypeDescriptor>) -> TypeDescriptor {
        match self.try_make_generic(arguments) {
            Ok(descriptor) => descriptor,
            Err(err) => panic!("{}", err),
        }
    }
}

/// Builder for [`TypeDefinition`].
#[derive(Debug)]
pub struct TypeDefinitionBuilder {
    name: Arc<str>,
    kind: TypeKind,
    is_abstract: bool,
    parameters: Vec<GenericParameter>,
    base: Option<TypeDescriptor>,
    interfaces: Vec<TypeDescriptor>,
    constructors: Vec<Constructor>,
}

impl TypeDefinitionBuilder {
    fn new(name: Arc<str>, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            is_abstract: false,
            parameters: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Marks a class as abstract: it is never default-constructible.
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Declares the next generic parameter.
    pub fn generic(mut self, parameter: GenericParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the base type. Only meaningful for classes.
    pub fn extends(mut self, base: TypeDescriptor) -> Self {
        self.base = Some(base);
        self
    }

    /// Declares a directly implemented interface.
    pub fn implements(mut self, interface: TypeDescriptor) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Declares the next constructor.
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Declares a public parameterless constructor.
    pub fn default_constructor(self) -> Self {
        self.constructor(Constructor::public([]))
    }

    pub fn build(mut self) -> Arc<TypeDefinition> {
        match self.kind {
            // structs can always be created through their implicit constructor
            TypeKind::Struct if self.constructors.is_empty() => {
                self.constructors.push(Constructor::public([]));
            }
            TypeKind::Interface => {
                self.constructors.clear();
                self.base = None;
            }
            _ => {}
        }

        Arc::new(TypeDefinition {
            name: self.name,
            kind: self.kind,
            is_abstract: self.is_abstract,
            parameters: self.parameters,
            base: self.base,
            interfaces: self.interfaces,
            constructors: self.constructors,
        })
    }
}
