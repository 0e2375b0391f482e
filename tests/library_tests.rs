//! Integration tests for the library/program lifecycle.
//!
//! These tests register components and functions through a `Program` built
//! on the default library and check subtyping and overload resolution
//! against the standard components.

use std::slice;

use keel::keel_registry::ScopeKind;
use keel::prelude::*;

fn named(program: &Program, name: &str) -> Type {
    program
        .lookup_type(name)
        .unwrap_or_else(|| panic!("{name} is not registered"))
        .clone()
}

fn signature(name: &str, parameters: &[Type], returns: Type) -> FunctionDecl {
    FunctionDecl::new(
        name,
        parameters
            .iter()
            .enumerate()
            .map(|(i, ty)| VariableDecl::new(format!("p{i}"), ty.clone()))
            .collect(),
        returns,
    )
}

fn constant(declaration: FunctionDecl, text: &'static str) -> Function {
    Function::native(declaration, move |ctx| {
        Ok(Object::new(ctx.returns().clone(), Value::string(text)))
    })
}

/// `describe(parameters...): returns`, answering `text`.
fn describe(parameters: &[Type], returns: &Type, text: &'static str) -> Function {
    constant(signature("describe", parameters, returns.clone()), text)
}

// =============================================================================
// Standard Components
// =============================================================================

#[test]
fn test_numeric_hierarchy() {
    let program = Library::with_default_modules().unwrap().program();
    let types = program.types();
    let number = named(&program, "Number");
    let integer = named(&program, "Integer");
    let decimal = named(&program, "Decimal");
    let comparable = named(&program, "Comparable").component().unwrap();

    assert!(types.is_subtype(&integer, &number));
    assert!(types.is_subtype(&decimal, &number));
    assert!(types.is_subtype(&integer, &Type::any()));
    let comparable_number = Type::reference(comparable, vec![number.clone()]);
    let comparable_integer = Type::reference(comparable, vec![integer.clone()]);
    assert!(types.is_subtype(&integer, &comparable_number));
    assert!(!types.is_subtype(&integer, &comparable_integer));
    assert!(!types.is_subtype(&number, &integer));
}

#[test]
fn test_list_generics_are_invariant_but_inferable() {
    let program = Library::with_default_modules().unwrap().program();
    let types = program.types();
    let list = named(&program, "List").component().unwrap();
    let integer = named(&program, "Integer");
    let number = named(&program, "Number");

    let integers = Type::reference(list, vec![integer]);
    let numbers = Type::reference(list, vec![number]);
    let any_list = Type::reference(list, vec![Type::generic("T", Type::any())]);

    assert!(types.is_subtype(&integers, &any_list));
    assert!(!types.is_subtype(&integers, &numbers));
    assert!(types.is_subtype(&integers, &Type::dynamic()));
    assert!(types.is_subtype(&Type::dynamic(), &integers));
}

#[test]
fn test_display_uses_component_names() {
    let program = Library::with_default_modules().unwrap().program();
    let list = named(&program, "List").component().unwrap();
    let integer = named(&program, "Integer");
    let ty = Type::reference(list, vec![integer.clone()]);
    assert_eq!(program.types().display(&ty).to_string(), "List<Integer>");

    let pair = Type::tuple(vec![integer.clone(), integer]);
    let shown = program.types().display(&pair).to_string();
    assert_eq!(shown, "(Integer, Integer)");
}

// =============================================================================
// Program Functions
// =============================================================================

#[test]
fn test_overloads_must_be_disjoint() {
    let mut program = Library::with_default_modules().unwrap().program();
    let integer = named(&program, "Integer");
    let number = named(&program, "Number");
    let string = named(&program, "String");

    program
        .define_function(describe(&[integer.clone()], &string, "int"))
        .unwrap();
    program
        .define_function(describe(&[string.clone()], &string, "str"))
        .unwrap();

    let err = program
        .define_function(describe(&[number], &string, "num"))
        .unwrap_err();
    assert_eq!(
        err,
        RegistrationError::NonDisjointOverload {
            existing: "describe(Integer): String".into(),
            new: "describe(Number): String".into(),
        }
    );

    // A different arity never conflicts.
    program
        .define_function(describe(&[integer.clone(), integer], &string, "two"))
        .unwrap();
}

#[test]
fn test_resolution_selects_matching_overload() {
    let mut program = Library::with_default_modules().unwrap().program();
    let integer = named(&program, "Integer");
    let decimal = named(&program, "Decimal");
    let string = named(&program, "String");

    program
        .define_function(describe(&[integer.clone()], &string, "int"))
        .unwrap();
    program
        .define_function(describe(&[string.clone()], &string, "str"))
        .unwrap();

    let types = program.types();
    let strings = slice::from_ref(&string);
    let resolved = program.resolve_function("describe", strings).unwrap();
    let result = resolved.invoke(types, &[Object::new(string.clone(), Value::string("x"))]);
    assert_eq!(result.unwrap().as_str().unwrap(), "str");

    assert!(program.resolve_function("describe", &[decimal]).is_none());
    assert!(program.resolve_function("describe", &[]).is_none());
    assert!(program.resolve_function("missing", &[integer]).is_none());
}

#[test]
fn test_generic_function_infers_return_type() {
    let mut program = Library::with_default_modules().unwrap().program();
    let list = named(&program, "List").component().unwrap();
    let integer = named(&program, "Integer");
    let decimal = named(&program, "Decimal");
    let number = named(&program, "Number");

    let t = Type::generic("T", Type::any());
    let list_of_t = Type::reference(list, vec![t.clone()]);
    let pair = signature("pair", &[t.clone(), t], list_of_t)
        .with_generics(vec![Generic::unbounded("T")]);
    program
        .define_function(Function::native(pair, |ctx| {
            let items = ctx.arguments().to_vec();
            Ok(Object::new(ctx.returns().clone(), Value::list(items)))
        }))
        .unwrap();

    let same = program
        .resolve_function("pair", &[integer.clone(), integer.clone()])
        .unwrap();
    let integers = Type::reference(list, vec![integer.clone()]);
    assert_eq!(same.returns(), &integers);

    let widened = program
        .resolve_function("pair", &[integer.clone(), number.clone()])
        .unwrap();
    assert_eq!(widened.returns(), &Type::reference(list, vec![number]));

    // Integer and Decimal share no ordering, so no binding for T exists.
    let incomparable = [integer, decimal];
    assert!(program.resolve_function("pair", &incomparable).is_none());
}

#[test]
fn test_nearest_scope_wins() {
    let mut program = Library::with_default_modules().unwrap().program();
    let integer = named(&program, "Integer");
    let number = named(&program, "Number");
    let string = named(&program, "String");

    program
        .define_function(describe(&[integer.clone()], &string, "outer"))
        .unwrap();
    let outer = program.scope();
    let inner = program
        .types_mut()
        .create_scope(ScopeKind::Definition, Some(outer));
    program
        .types_mut()
        .define_function(inner, describe(&[number], &string, "inner"))
        .unwrap();

    let types = program.types();
    let argument = Object::new(integer.clone(), Value::Integer(1));
    let (integers, arguments) = (slice::from_ref(&integer), slice::from_ref(&argument));
    let from_inner = types.resolve_function(inner, "describe", integers).unwrap();
    let result = from_inner.invoke(types, arguments).unwrap();
    assert_eq!(result.as_str().unwrap(), "inner");

    let from_program = program.resolve_function("describe", integers).unwrap();
    let result = from_program.invoke(types, arguments).unwrap();
    assert_eq!(result.as_str().unwrap(), "outer");

    let candidates = types.applicable_functions(inner, "describe", &[integer]);
    assert_eq!(candidates.len(), 2);
}

// =============================================================================
// Program Components
// =============================================================================

#[test]
fn test_concrete_class_must_implement_protocols() {
    let mut program = Library::with_default_modules().unwrap().program();
    let scope = program.scope();
    let equatable = named(&program, "Equatable").component().unwrap();

    let point = program
        .types_mut()
        .create_class("Point", Modifiers::DEFAULT, vec![], scope)
        .unwrap();
    let err = program
        .inherit(point, Type::reference(equatable, vec![Type::named(point)]))
        .unwrap_err();
    assert_eq!(
        err,
        RegistrationError::MissingImplementation {
            component: "Point".into(),
            function: "==(Equatable<Point>, Point): Boolean".into(),
        }
    );
}

#[test]
fn test_user_struct_inherits_protocol_members() {
    let mut program = Library::with_default_modules().unwrap().program();
    let scope = program.scope();
    let equatable = named(&program, "Equatable").component().unwrap();
    let boolean = named(&program, "Boolean");

    let token = program
        .types_mut()
        .create_struct("Token", vec![], scope)
        .unwrap();
    let ty = Type::named(token);
    let members = program.types().component(token).scope();
    program
        .types_mut()
        .define_function(
            members,
            Function::native(signature("==", &[ty.clone(), ty.clone()], boolean), |ctx| {
                let equal = ctx.this()?.as_str()? == ctx.argument(1)?.as_str()?;
                Ok(Object::new(ctx.returns().clone(), Value::Boolean(equal)))
            }),
        )
        .unwrap();
    let equatable_token = Type::reference(equatable, vec![ty.clone()]);
    program.inherit(token, equatable_token.clone()).unwrap();

    let types = program.types();
    assert!(types.is_subtype(&ty, &equatable_token));
    let not_equal = types.methods(&ty, "!=", slice::from_ref(&ty)).unwrap();
    assert_eq!(types.display(not_equal.returns()).to_string(), "Boolean");

    let a = Object::new(ty.clone(), Value::string("a"));
    let b = Object::new(ty, Value::string("b"));
    let result = not_equal.bind(a).invoke(types, &[b]).unwrap();
    assert!(result.as_boolean().unwrap());
}

#[test]
fn test_program_variables() {
    let mut program = Library::with_default_modules().unwrap().program();
    let integer = named(&program, "Integer");
    program
        .define_variable(Variable::Definition {
            declaration: VariableDecl::new("answer", integer.clone()),
            value: Object::new(integer.clone(), Value::Integer(42)),
        })
        .unwrap();

    let err = program
        .define_variable(Variable::Declaration(VariableDecl::new("pending", integer)))
        .unwrap_err();
    assert_eq!(
        err,
        RegistrationError::DeclarationInDefinitionScope {
            name: "pending".into()
        }
    );

    let answer = program.lookup_variable("answer").unwrap();
    assert_eq!(answer.value().unwrap().as_integer().unwrap(), 42);
}
