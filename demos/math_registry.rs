//! Registers a few math, string and utility functions in the global registry
//! and calls them through the erased interface.
//!
//! Run with: cargo run --example math_registry
//! Set RUST_LOG=fnregistry=trace to watch registration and dispatch.

use fnregistry::{global, CallError, Category, FunctionId, Group, Overloads};
use tracing_subscriber::EnvFilter;

const FIBONACCI: FunctionId = FunctionId::of("fibonacci");

fn fibonacci(n: i32) -> Result<i64, String> {
    if n < 0 {
        return Err(format!("negative index {}", n));
    }
    let (mut a, mut b) = (0i64, 1i64);
    for _ in 0..n {
        (a, b) = (b, a + b);
    }
    Ok(a)
}

fn register_all() {
    let registry = global();

    registry.register_group(
        Category::Math,
        Group::new("math").with_description("basic arithmetic"),
    );
    registry.register(
        Category::Math,
        "add",
        Overloads::new()
            .with(|a: i32, b: i32| a + b)
            .with(|a: f64, b: f64| a + b),
    );
    registry.register(Category::Math, "square", |x: i32| x * x);
    registry.register(Category::Math, "divide", |a: f64, b: f64| {
        if b == 0.0 {
            Err("division by zero")
        } else {
            Ok(a / b)
        }
    });

    registry.register(Category::String, "upper", |s: &str| s.to_uppercase());
    registry.register(Category::String, "concat", |a: &str, b: &str| {
        format!("{}{}", a, b)
    });

    registry.register(Category::Utility, "fibonacci", fibonacci);
    registry.register(Category::Utility, "is_even", |n: i32| n % 2 == 0);
}

fn main() -> Result<(), CallError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    register_all();
    let registry = global();

    let sum = registry.call_as::<i32>(Category::Math, "add", (15, 25))?;
    let fsum = registry.call_as::<f64>(Category::Math, "add", (1.5, 2.25))?;
    println!("add(15, 25) = {}", sum);
    println!("add(1.5, 2.25) = {}", fsum);
    println!(
        "square(12) = {}",
        registry.call_as::<i32>(Category::Math, "square", (12,))?
    );
    println!(
        "upper(\"hello\") = {}",
        registry.call_as::<String>(Category::String, "upper", ("hello",))?
    );
    println!(
        "fibonacci(40) = {}",
        registry.call_as::<i64>(Category::Utility, FIBONACCI, (40,))?
    );

    // Failures keep their kind
    for (label, result) in [
        ("divide(1, 0)", registry.call(Category::Math, "divide", (1.0, 0.0))),
        ("add(\"1\", \"2\")", registry.call(Category::Math, "add", ("1", "2"))),
        ("square()", registry.call(Category::Math, "square", ())),
        ("cube(3)", registry.call(Category::Math, "cube", (3,))),
    ] {
        match result {
            Ok(value) => println!("{} = {}", label, value),
            Err(e) => println!("{} failed ({}): {}", label, e.kind(), e),
        }
    }

    println!("\nRegistered functions:");
    let mut ids = registry.group_ids();
    ids.sort();
    for id in ids {
        let Some(group) = registry.get_group(id) else {
            continue;
        };
        println!("  {} ({})", id, group.name());
        for name in group.names() {
            let signatures = group.signatures(name.as_str()).unwrap_or_default();
            for signature in signatures {
                println!("    {}{}", name, signature);
            }
        }
    }

    Ok(())
}
