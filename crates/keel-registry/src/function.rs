//! Functions, variables and native implementations.
//!
//! Functions and variables come in two forms: a declaration (signature only)
//! and a definition (signature plus implementation or value). Declarations
//! are only accepted by declaration scopes, i.e. the member scopes of
//! abstract components.
//!
//! Implementations are host closures stored as [`NativeFn`]. When invoked they
//! receive a [`CallContext`] giving access to the arguments, the resolved
//! signature and the type system.

use std::fmt;
use std::sync::Arc;

use keel_core::{Bindings, Generic, Modifiers, RuntimeError, Type};

use crate::object::Object;
use crate::type_system::TypeSystem;

// ============================================================================
// Variables
// ============================================================================

/// A variable signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableDecl {
    pub name: String,
    pub ty: Type,
    pub mutable: bool,
}

impl VariableDecl {
    /// An immutable variable.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable: false,
        }
    }

    /// A mutable variable.
    pub fn mutable(name: impl Into<String>, ty: Type) -> Self {
        Self {
            mutable: true,
            ..Self::new(name, ty)
        }
    }

    fn bind(&self, bindings: &Bindings) -> Self {
        Self {
            name: self.name.clone(),
            ty: self.ty.bind(bindings),
            mutable: self.mutable,
        }
    }
}

/// A variable in a scope.
#[derive(Debug, Clone)]
pub enum Variable {
    Declaration(VariableDecl),
    Definition {
        declaration: VariableDecl,
        value: Object,
    },
}

impl Variable {
    pub fn declaration(&self) -> &VariableDecl {
        match self {
            Variable::Declaration(declaration) => declaration,
            Variable::Definition { declaration, .. } => declaration,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration().name
    }

    pub fn ty(&self) -> &Type {
        &self.declaration().ty
    }

    pub fn is_definition(&self) -> bool {
        matches!(self, Variable::Definition { .. })
    }

    /// The value, if this is a definition.
    pub fn value(&self) -> Option<&Object> {
        match self {
            Variable::Declaration(_) => None,
            Variable::Definition { value, .. } => Some(value),
        }
    }
}

// ============================================================================
// Signatures
// ============================================================================

/// A function signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDecl {
    pub name: String,
    pub modifiers: Modifiers,
    /// Function-level generic parameters, bound afresh on every call.
    pub generics: Vec<Generic>,
    pub parameters: Vec<VariableDecl>,
    pub returns: Type,
    pub throws: Vec<Type>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, parameters: Vec<VariableDecl>, returns: Type) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::DEFAULT,
            generics: Vec::new(),
            parameters,
            returns,
            throws: Vec::new(),
        }
    }

    pub fn with_generics(mut self, generics: Vec<Generic>) -> Self {
        self.generics = generics;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_throws(mut self, throws: Vec<Type>) -> Self {
        self.throws = throws;
        self
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Parameter types in order.
    pub fn parameter_types(&self) -> impl Iterator<Item = &Type> {
        self.parameters.iter().map(|p| &p.ty)
    }

    /// Substitute `bindings` throughout the signature.
    ///
    /// Generic parameters that receive a concrete binding are dropped from
    /// the generic list; rigid and unbound ones remain.
    pub fn bind(&self, bindings: &Bindings) -> Self {
        Self {
            name: self.name.clone(),
            modifiers: self.modifiers,
            generics: self
                .generics
                .iter()
                .filter(|g| {
                    !bindings.contains(&g.name) || bindings.is_rigid(&g.name)
                })
                .map(|g| Generic {
                    name: g.name.clone(),
                    bound: Box::new(g.bound.bind(bindings)),
                })
                .collect(),
            parameters: self.parameters.iter().map(|p| p.bind(bindings)).collect(),
            returns: self.returns.bind(bindings),
            throws: self.throws.iter().map(|t| t.bind(bindings)).collect(),
        }
    }

    /// The signature monomorphized over its own generics' bounds.
    pub fn erased(&self) -> Self {
        self.bind(&Bindings::erasing(&self.generics))
    }
}

// ============================================================================
// Native Implementations
// ============================================================================

type NativeCallable = dyn Fn(&CallContext<'_>) -> Result<Object, RuntimeError> + Send + Sync;

/// Type-erased host implementation of a function.
#[derive(Clone)]
pub struct NativeFn {
    inner: Arc<NativeCallable>,
}

impl NativeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Object, RuntimeError> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn call(&self, ctx: &CallContext<'_>) -> Result<Object, RuntimeError> {
        (self.inner)(ctx)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}

/// Everything a native implementation can see while it runs.
pub struct CallContext<'a> {
    types: &'a TypeSystem,
    declaration: &'a FunctionDecl,
    arguments: &'a [Object],
}

impl<'a> CallContext<'a> {
    pub fn types(&self) -> &'a TypeSystem {
        self.types
    }

    /// The signature the call was resolved to, with generics bound.
    pub fn declaration(&self) -> &'a FunctionDecl {
        self.declaration
    }

    /// The declared return type; natives use it to type their results.
    pub fn returns(&self) -> &'a Type {
        &self.declaration.returns
    }

    pub fn arguments(&self) -> &'a [Object] {
        self.arguments
    }

    pub fn argument(&self, index: usize) -> Result<&'a Object, RuntimeError> {
        self.arguments
            .get(index)
            .ok_or_else(|| RuntimeError::ArgumentCount {
                function: self.declaration.name.clone(),
                expected: index + 1,
                actual: self.arguments.len(),
            })
    }

    /// The receiver of a method call.
    pub fn this(&self) -> Result<&'a Object, RuntimeError> {
        self.argument(0)
    }
}

// ============================================================================
// Functions
// ============================================================================

/// A defined function: signature plus implementation.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub declaration: FunctionDecl,
    pub implementation: NativeFn,
}

/// A function in a scope.
#[derive(Debug, Clone)]
pub enum Function {
    Declaration(FunctionDecl),
    Definition(FunctionDef),
}

impl Function {
    /// A signature without an implementation.
    pub fn declare(declaration: FunctionDecl) -> Self {
        Function::Declaration(declaration)
    }

    /// A signature implemented by a host closure.
    pub fn native<F>(declaration: FunctionDecl, f: F) -> Self
    where
        F: Fn(&CallContext<'_>) -> Result<Object, RuntimeError> + Send + Sync + 'static,
    {
        Function::Definition(FunctionDef {
            declaration,
            implementation: NativeFn::new(f),
        })
    }

    pub fn declaration(&self) -> &FunctionDecl {
        match self {
            Function::Declaration(declaration) => declaration,
            Function::Definition(def) => &def.declaration,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration().name
    }

    pub fn arity(&self) -> usize {
        self.declaration().arity()
    }

    pub fn parameters(&self) -> &[VariableDecl] {
        &self.declaration().parameters
    }

    pub fn returns(&self) -> &Type {
        &self.declaration().returns
    }

    pub fn is_definition(&self) -> bool {
        matches!(self, Function::Definition(_))
    }

    pub fn implementation(&self) -> Option<&NativeFn> {
        match self {
            Function::Declaration(_) => None,
            Function::Definition(def) => Some(&def.implementation),
        }
    }

    /// Substitute `bindings` into the signature, keeping the implementation.
    pub fn bind(&self, bindings: &Bindings) -> Self {
        match self {
            Function::Declaration(decl) => Function::Declaration(decl.bind(bindings)),
            Function::Definition(def) => Function::Definition(FunctionDef {
                declaration: def.declaration.bind(bindings),
                implementation: def.implementation.clone(),
            }),
        }
    }

    /// Run the implementation with `arguments`.
    pub fn invoke(
        &self,
        types: &TypeSystem,
        arguments: &[Object],
    ) -> Result<Object, RuntimeError> {
        let Function::Definition(def) = self else {
            return Err(RuntimeError::Unimplemented {
                function: self.name().to_string(),
            });
        };
        if arguments.len() != def.declaration.arity() {
            return Err(RuntimeError::ArgumentCount {
                function: def.declaration.name.clone(),
                expected: def.declaration.arity(),
                actual: arguments.len(),
            });
        }
        let ctx = CallContext {
            types,
            declaration: &def.declaration,
            arguments,
        };
        def.implementation.call(&ctx)
    }
}
