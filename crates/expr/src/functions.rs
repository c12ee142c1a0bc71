//! Defines the function registry that call expressions dispatch into.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tether_types::Value;

/// A function callable from binding expressions.
///
/// Functions are opaque to dependency analysis: every path passed as an
/// argument is tracked as a deep dependency. Implementations must be pure
/// with respect to the engine; they receive already evaluated arguments in
/// call order.
pub trait Function: Send + Sync {
    fn get(&self, args: &[Value]) -> Value;
}

impl<F> Function for F
where
    F: Fn(&[Value]) -> Value + Send + Sync,
{
    fn get(&self, args: &[Value]) -> Value {
        self(args)
    }
}

/// A registry to hold all functions available to an evaluation session.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Function>>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, func: impl Function + 'static) {
        self.functions.insert(name.into(), Arc::new(func));
    }

    /// Finds a function by name (case-sensitive).
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Function>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

/// Session-wide settings shared by every context derived from one root.
///
/// Created once and borrowed by all contexts; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ContextMeta {
    functions: FunctionRegistry,
}

impl ContextMeta {
    pub fn new(functions: FunctionRegistry) -> Self {
        Self { functions }
    }

    pub fn builder() -> ContextMetaBuilder {
        ContextMetaBuilder::default()
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }
}

/// Builder for [`ContextMeta`].
#[derive(Debug, Default)]
pub struct ContextMetaBuilder {
    functions: FunctionRegistry,
}

impl ContextMetaBuilder {
    /// Starts from an existing registry. Functions added afterwards are merged in.
    pub fn registry(mut self, registry: FunctionRegistry) -> Self {
        let mut merged = registry;
        merged.functions.extend(self.functions.functions.drain());
        self.functions = merged;
        self
    }

    pub fn function(mut self, name: impl Into<String>, func: impl Function + 'static) -> Self {
        self.functions.register(name, func);
        self
    }

    pub fn build(self) -> ContextMeta {
        ContextMeta::new(self.functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting(_: &[Value]) -> Value {
        Value::from("Hi.")
    }

    struct Count;

    impl Function for Count {
        fn get(&self, args: &[Value]) -> Value {
            Value::Number(args.len() as f64)
        }
    }

    #[test]
    fn test_register_closures_fns_and_structs() {
        let mut registry = FunctionRegistry::new();
        registry.register("greeting", greeting);
        registry.register("count", Count);
        registry.register("plus", |args: &[Value]| {
            Value::Number(args.iter().map(Value::to_number).sum())
        });

        assert_eq!(registry.len(), 3);
        let plus = registry.get("plus").unwrap();
        assert_eq!(
            plus.get(&[Value::Number(2.0), Value::Number(11.0)]),
            Value::Number(13.0)
        );
        assert_eq!(registry.get("greeting").unwrap().get(&[]), Value::from("Hi."));
        assert_eq!(
            registry.get("count").unwrap().get(&[Value::Null, Value::Null]),
            Value::Number(2.0)
        );
        assert!(registry.get("Greeting").is_none());
    }

    #[test]
    fn test_builder_merges_registry() {
        let mut base = FunctionRegistry::new();
        base.register("greeting", greeting);
        let meta = ContextMeta::builder()
            .function("count", Count)
            .registry(base)
            .build();
        assert!(meta.functions().contains("greeting"));
        assert!(meta.functions().contains("count"));
        assert_eq!(
            format!("{:?}", meta.functions()),
            "FunctionRegistry { functions: [\"count\", \"greeting\"] }"
        );
    }
}
