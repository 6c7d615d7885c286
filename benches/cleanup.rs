#[macro_use]
extern crate bencher;

use bencher::Bencher;
use graphql_introspection_pruner::{schema::TypeKind, Options, RemoveTypeOptions, SchemaEditor};
use serde_json::Value;

fn introspection_load_untouched(bench: &mut Bencher) {
    let response: Value = serde_json::from_str(INTROSPECTION).unwrap();
    bench.iter(|| {
        SchemaEditor::new(response.clone(), Options::untouched()).ok();
    });
}

fn introspection_load_and_clean(bench: &mut Bencher) {
    let response: Value = serde_json::from_str(INTROSPECTION).unwrap();
    bench.iter(|| {
        SchemaEditor::new(response.clone(), Options::default()).ok();
    });
}

fn introspection_remove_type_cascade(bench: &mut Bencher) {
    let response: Value = serde_json::from_str(INTROSPECTION).unwrap();
    let editor = SchemaEditor::new(response, Options::default()).unwrap();
    bench.iter(|| {
        let mut editor = editor.clone();
        editor
            .remove_type(TypeKind::Scalar, "SecretScalar", RemoveTypeOptions::default())
            .ok();
        editor.remove_query("myTypes", None).ok();
    });
}

fn introspection_get_response(bench: &mut Bencher) {
    let response: Value = serde_json::from_str(INTROSPECTION).unwrap();
    let editor = SchemaEditor::new(response, Options::default()).unwrap();
    bench.iter(|| {
        editor.get_response().ok();
    });
}

benchmark_group!(
    cleanup,
    introspection_load_untouched,
    introspection_load_and_clean,
    introspection_remove_type_cascade,
    introspection_get_response
);

benchmark_main!(cleanup);

static INTROSPECTION: &str = include_str!("../fixture/introspection_query.json");
