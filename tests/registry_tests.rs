use fnregistry::{global, CallError, Category, ErrorKind, Group, Registry, Value};
use rstest::rstest;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;

fn math_registry() -> Registry<Category> {
    let registry = Registry::new();
    registry.register(Category::Math, "add", |a: i32, b: i32| a + b);
    registry.register(Category::Math, "square", |x: i32| x * x);
    registry.register(Category::Math, "sqrt", |x: f64| x.sqrt());
    registry.register(Category::String, "upper", |s: &str| s.to_uppercase());
    registry.register(Category::String, "concat", |a: String, b: String| a + &b);
    registry.register(Category::Utility, "is_even", |n: i32| n % 2 == 0);
    registry
}

#[test]
fn test_call_matches_direct_invocation() -> Result<(), CallError> {
    let registry = math_registry();

    assert_eq!(registry.call_as::<i32>(Category::Math, "add", (15, 25))?, 40);
    assert_eq!(registry.call(Category::Math, "add", (15, 25))?, Value::Int(40));
    assert_eq!(registry.call_as::<i32>(Category::Math, "square", (9,))?, 81);
    assert_eq!(registry.call_as::<f64>(Category::Math, "sqrt", (2.25,))?, 1.5);
    assert_eq!(
        registry.call_as::<String>(Category::String, "upper", ("hello",))?,
        "HELLO"
    );
    assert_eq!(
        registry.call_as::<String>(Category::String, "concat", ("foo", "bar"))?,
        "foobar"
    );
    assert!(registry.call_as::<bool>(Category::Utility, "is_even", (10,))?);

    Ok(())
}

#[test]
fn test_reregistering_replaces_binding() {
    let registry = Registry::<Category>::new();
    registry.register(Category::Math, "square", |x: i32| x * x);
    assert_eq!(registry.call_as::<i32>(Category::Math, "square", (3,)), Ok(9));

    registry.register(Category::Math, "square", |x: i32| x * x * x);
    assert_eq!(registry.call_as::<i32>(Category::Math, "square", (3,)), Ok(27));
    assert_eq!(registry.list_names(Category::Math), vec!["square".to_string()]);
}

#[test]
fn test_replacement_may_change_signature() {
    let registry = Registry::<Category>::new();
    registry.register(Category::Math, "scale", |x: i32| x * 2);
    registry.register(Category::Math, "scale", |x: f64, by: f64| x * by);

    let err = registry.call(Category::Math, "scale", (4,)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    assert_eq!(
        registry.call_as::<f64>(Category::Math, "scale", (4.0, 0.5)),
        Ok(2.0)
    );
}

#[test]
fn test_has_before_and_after_registration() {
    let registry = Registry::<Category>::new();
    for name in ["a", "b", "c"] {
        assert!(!registry.has(Category::Custom1, name));
        registry.register(Category::Custom1, name, || ());
        assert!(registry.has(Category::Custom1, name));
    }
    assert!(!registry.has(Category::Custom2, "a"));
}

#[test]
fn test_list_names() {
    let registry = Registry::<Category>::new();
    registry.register(Category::Utility, "c", || 3);
    registry.register(Category::Utility, "a", || 1);
    registry.register(Category::Utility, "b", || 2);

    let names: HashSet<String> = registry.list_names(Category::Utility).into_iter().collect();
    let expected: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names, expected);

    assert!(registry.list_names(Category::Math).is_empty());
}

#[rstest]
#[case::math(Category::Math, "cube")]
#[case::string(Category::String, "add")]
#[case::utility(Category::Utility, "")]
#[case::custom(Category::Custom2, "anything")]
fn test_unregistered_names(#[case] group: Category, #[case] name: &str) {
    let registry = math_registry();

    let err = registry.call_as::<i32>(group, name, (1, 2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(registry.try_call::<i32>(group, name, (1, 2)), None);
    assert_eq!(registry.try_call::<()>(group, name, ()), None);
}

#[test]
fn test_string_arguments_to_integer_function() {
    let registry = math_registry();
    let err = registry
        .call_as::<i32>(Category::Math, "add", ("15", "25"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(
        registry.try_call::<i32>(Category::Math, "add", ("15", "25")),
        None
    );
}

#[rstest]
#[case::int_to_sqrt("sqrt", vec![Value::Int(16)], Value::Float(4.0))]
#[case::doubles_to_add("add", vec![Value::Float(1.5), Value::Float(2.5)], Value::Int(3))]
#[case::long_to_square("square", vec![Value::Long(7)], Value::Int(49))]
fn test_numeric_arguments_convert(
    #[case] name: &str,
    #[case] args: Vec<Value>,
    #[case] expected: Value,
) {
    let registry = math_registry();
    assert_eq!(registry.call(Category::Math, name, args), Ok(expected));
}

#[test]
fn test_sqrt_of_integer_literal() -> Result<(), CallError> {
    let registry = math_registry();
    assert_eq!(registry.call_as::<f64>(Category::Math, "sqrt", (16,))?, 4.0);
    assert_eq!(registry.call_as::<i32>(Category::Math, "add", (1.5, 2.5))?, 3);
    Ok(())
}

#[test]
fn test_empty_name_creates_no_group() {
    let registry = Registry::<Category>::new();
    registry.register(Category::Custom1, "", || 1);

    assert!(registry.group_ids().is_empty());
    assert!(registry.get_group(Category::Custom1).is_none());
    assert!(!registry.has(Category::Custom1, ""));
}

#[rstest]
#[case::one(vec![Value::Int(1)])]
#[case::two(vec![Value::Int(1), Value::Int(2)])]
fn test_nullary_binding_with_arguments(#[case] args: Vec<Value>) {
    let registry = Registry::<Category>::new();
    registry.register(Category::Utility, "answer", || 42);

    let err = registry.call(Category::Utility, "answer", args).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArityMismatch);
}

#[test]
fn test_unsupported_arity() {
    let registry = math_registry();
    assert_eq!(
        registry.call(Category::Math, "add", (1, 2, 3)),
        Err(CallError::UnsupportedArity { got: 3 })
    );
    assert_eq!(
        registry.try_call::<i32>(Category::Math, "add", (1, 2, 3, 4)),
        None
    );
}

#[test]
fn test_call_as_checks_result_type() {
    let registry = math_registry();
    let err = registry
        .call_as::<String>(Category::Math, "add", (1, 2))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    // unit discards whatever the function returned
    assert_eq!(registry.call_as::<()>(Category::Math, "add", (1, 2)), Ok(()));
}

#[test]
fn test_try_call_swallows_invocation_failures() {
    let registry = Registry::<Category>::new();
    registry.register(Category::Math, "divide", |a: i32, b: i32| {
        a.checked_div(b).ok_or("division by zero")
    });

    assert_eq!(registry.try_call::<i32>(Category::Math, "divide", (9, 3)), Some(3));
    assert_eq!(registry.try_call::<i32>(Category::Math, "divide", (9, 0)), None);
    assert_eq!(
        registry.call(Category::Math, "divide", (9, 0)),
        Err(CallError::InvocationFailed {
            name: "divide".to_string(),
            message: "division by zero".to_string(),
        })
    );
}

#[test]
fn test_pure_calls_are_repeatable() {
    let registry = math_registry();
    for _ in 0..3 {
        assert_eq!(registry.call_as::<i32>(Category::Math, "add", (2, 2)), Ok(4));
        assert_eq!(registry.call_as::<i32>(Category::Math, "square", (5,)), Ok(25));
    }
}

#[test]
fn test_stateful_bindings() {
    let registry = Registry::<Category>::new();
    let counter = Arc::new(AtomicI32::new(0));
    let tick = Arc::clone(&counter);
    registry.register(Category::Utility, "tick", move || {
        tick.fetch_add(1, Ordering::SeqCst) + 1
    });

    assert_eq!(registry.call_as::<i32>(Category::Utility, "tick", ()), Ok(1));
    assert_eq!(registry.call_as::<i32>(Category::Utility, "tick", ()), Ok(2));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_group_management() {
    let registry = Registry::<Category>::new();
    registry.register_group(
        Category::String,
        Group::new("strings")
            .with_description("text helpers")
            .with_version("1.2.0"),
    );
    registry.register(Category::String, "len", |s: &str| s.len() as i64);

    let group = registry.get_group(Category::String).unwrap();
    assert_eq!(group.name(), "strings");
    assert_eq!(group.description(), "text helpers");
    assert_eq!(group.names(), vec!["len".to_string()]);

    registry.register(Category::Math, "one", || 1);
    let mut ids = registry.group_ids();
    ids.sort();
    assert_eq!(ids, vec![Category::Math, Category::String]);

    assert!(registry.unregister_group(Category::String));
    assert!(!registry.has(Category::String, "len"));
    // detached groups stay usable through existing handles
    assert_eq!(group.call_as::<i64>("len", ("four",)), Ok(4));
}

#[test]
fn test_custom_group_identifier() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Plugin {
        Audio,
        Video,
    }

    let registry = Registry::<Plugin>::new();
    registry.register(Plugin::Audio, "gain", |db: f64| 10f64.powf(db / 20.0));
    registry.register(Plugin::Video, "gain", |x: i32| x * 2);

    assert_eq!(registry.call_as::<f64>(Plugin::Audio, "gain", (0.0,)), Ok(1.0));
    assert_eq!(registry.call_as::<i32>(Plugin::Video, "gain", (21,)), Ok(42));
}

#[test]
fn test_concurrent_readers() {
    let registry = Arc::new(math_registry());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for j in 0..100 {
                    let sum = registry.call_as::<i32>(Category::Math, "add", (i, j));
                    assert_eq!(sum, Ok(i + j));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_global_registry() {
    global().register(Category::Custom2, "registry_tests_answer", || 42);

    assert!(global().has(Category::Custom2, "registry_tests_answer"));
    assert_eq!(
        global().call_as::<i32>(Category::Custom2, "registry_tests_answer", ()),
        Ok(42)
    );
    assert!(std::ptr::eq(global(), global()));
}
