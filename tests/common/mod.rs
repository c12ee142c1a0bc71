//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use serde_json::{Value as Json, json};
use tether::{ContextMeta, LiveStore, ObjectModel, Value, path};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The `_page` document every suite binds against.
pub fn page_data() -> Json {
    json!({
        "colors": {
            "green": {
                "name": "Green",
                "hex": "#0f0",
                "rgb": [0, 255, 0],
                "light": { "hex": "#90ee90" },
                "dark": { "hex": "#006400" }
            }
        },
        "key": "green",
        "channel": 0,
        "variation": "light",
        "variationHex": "light.hex",
        "keys": ["red", "green"],
        "index": 1,

        "nums": [2, 11, 3, 7],
        "first": 2,
        "second": 3
    })
}

pub fn object_model() -> ObjectModel {
    ObjectModel::new(json!({ "_page": page_data() }))
}

/// A live store filled member by member, the way an application would.
pub fn live_store() -> LiveStore {
    let store = LiveStore::new();
    store
        .set_each(&path!["_page"], page_data())
        .expect("fixture data fits an empty store");
    store
}

fn number_args(args: &[Value]) -> (f64, f64) {
    let arg = |i: usize| args.get(i).map(Value::to_number).unwrap_or(f64::NAN);
    (arg(0), arg(1))
}

pub fn meta() -> ContextMeta {
    ContextMeta::builder()
        .function("plus", |args: &[Value]| {
            let (a, b) = number_args(args);
            Value::Number(a + b)
        })
        .function("minus", |args: &[Value]| {
            let (a, b) = number_args(args);
            Value::Number(a - b)
        })
        .function("greeting", |_: &[Value]| Value::from("Hi."))
        .build()
}

/// A path of literal keys from dotted source, e.g. `keys("_page.colors")`.
pub fn keys(dotted: &str) -> tether::PathExpression {
    tether::PathExpression::keys(dotted.split('.'))
}
