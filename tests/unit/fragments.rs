//! Value classification in slot and fragment position.

use html_stream::{Deferred, Engine, Fragment, RenderError, Sequence, Value, html};

fn render(template: html_stream::Template) -> html_stream::Result<String> {
    Engine::new().render_sync(template)
}

#[test]
fn test_direct_strings_escaped_list_strings_not() {
    let direct = html!("<div>", "</div>"; "<i>b</i>");
    let listed = html!("<div>", "</div>"; vec!["a", "<i>b</i>"]);
    assert_eq!(render(direct).unwrap(), "<div>&lt;i&gt;b&lt;/i&gt;</div>");
    assert_eq!(render(listed).unwrap(), "<div>a<i>b</i></div>");
}

#[test]
fn test_scalars_are_stringified_in_slots() {
    let page = html!("", " ", " ", " ", ""; 42, -1.25, false, 7u64);
    assert_eq!(render(page).unwrap(), "42 -1.25 false 7");
}

#[test]
fn test_numbers_inside_lists_are_rejected() {
    let err = render(html!("<p>", "</p>"; vec![1, 2, 3])).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedFragment { kind: "number" }));
    assert!(!err.is_contract_violation());

    let stringified = html!("<p>", "</p>"; vec![1.to_string(), 2.to_string()]);
    assert_eq!(render(stringified).unwrap(), "<p>12</p>");
}

#[test]
fn test_booleans_inside_lists_are_rejected() {
    let err = render(html!("", ""; vec![Value::from(true)])).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedFragment { kind: "boolean" }));
}

#[test]
fn test_none_renders_nothing() {
    let missing: Option<&str> = None;
    assert_eq!(render(html!("[", "]"; missing)).unwrap(), "[]");
    assert_eq!(render(html!("[", "]"; Some("<x>"))).unwrap(), "[&lt;x&gt;]");
}

#[test]
fn test_nested_lists_flatten_in_order() {
    let page = html!("", ""; vec![vec!["a", "b"], vec!["c"]]);
    assert_eq!(render(page).unwrap(), "abc");
}

#[test]
fn test_deferred_in_sync_render_is_a_contract_violation() {
    let err = render(html!("", ""; Deferred::ready("x"))).unwrap_err();
    assert!(matches!(err, RenderError::UnexpectedDeferred));
    assert!(err.is_contract_violation());
}

#[test]
fn test_literal_fragments_are_trusted() {
    let root = Fragment::from(Sequence::fragments(vec![
        Fragment::literal("<!doctype html>"),
        Fragment::from(html!("<title>", "</title>"; "a&b")),
    ]));
    assert_eq!(
        Engine::new().render_sync(root).unwrap(),
        "<!doctype html><title>a&amp;b</title>"
    );
}

#[test]
fn test_from_item_classification() {
    assert!(matches!(Fragment::from_item(Value::from("<b>")), Ok(Fragment::Literal(t)) if t == "<b>"));
    assert!(matches!(Fragment::from_item(Value::from(vec!["x"])), Ok(Fragment::Sequence(_))));
    assert!(matches!(Fragment::from_item(Value::from(Deferred::ready("x"))), Ok(Fragment::Deferred(_))));
    assert!(Fragment::from_item(Value::from(1.0)).is_err());
}
