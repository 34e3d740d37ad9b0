//! Shapes, plans and compiled producers.

use std::sync::Arc;

use html_stream::compiler::{Compiler, Producer, Step};
use html_stream::{Deferred, Fragment, RenderError, Shape, Template, Value, html};

fn describe(fragments: &[Fragment]) -> Vec<String> {
    fragments
        .iter()
        .map(|fragment| match fragment {
            Fragment::Literal(text) => text.to_string(),
            Fragment::Sequence(_) => "<seq>".to_string(),
            Fragment::Deferred(_) => "<deferred>".to_string(),
        })
        .collect()
}

#[test]
fn test_plan_mirrors_shape() {
    let shape = Shape::from_static(&["<p>", "", "</p>"]);
    let producer = Producer::compile(&shape);

    assert_eq!(producer.shape(), shape.id());
    assert_eq!(producer.plan().slots(), 2);
    assert!(matches!(
        producer.plan().steps(),
        [Step::Static(_), Step::Slot(0), Step::Slot(1), Step::Static(_)]
    ));
}

#[test]
fn test_producer_cuts_only_at_sequences_and_deferred() {
    let compiler = Compiler::new();
    let page = html!("<h1>", "</h1><ul>", "</ul><p>", "</p>"; "t", vec!["<li/>"], Deferred::ready("d"));
    let fragments = compiler.produce_fragments(page).unwrap();
    assert_eq!(describe(&fragments), ["<h1>t</h1><ul>", "<seq>", "</ul><p>", "<deferred>", "</p>"]);
}

#[test]
fn test_static_only_shape_is_one_literal() {
    let fragments = Compiler::new().produce_fragments(html!("<br>")).unwrap();
    assert_eq!(describe(&fragments), ["<br>"]);
}

#[test]
fn test_repeated_call_site_outputs_are_independent() {
    fn row(name: &str, score: i64) -> Template {
        html!("<tr><td>", "</td><td>", "</td></tr>"; name, score)
    }
    let compiler = Compiler::new();
    let a = compiler.produce_fragments(row("ann", 1)).unwrap();
    let b = compiler.produce_fragments(row("<bob>", 2)).unwrap();

    assert_eq!(describe(&a), ["<tr><td>ann</td><td>1</td></tr>"]);
    assert_eq!(describe(&b), ["<tr><td>&lt;bob&gt;</td><td>2</td></tr>"]);
    assert_eq!(compiler.stats().misses, 1);
    assert_eq!(compiler.stats().hits, 1);
}

#[test]
fn test_runtime_shape_reused_through_arc() {
    let shape = Shape::new(vec![String::from("<b>"), String::from("</b>")]);
    let compiler = Compiler::new();
    for i in 0..3 {
        let template = Template::new(Arc::clone(&shape), vec![Value::from(i)]);
        compiler.produce(template).unwrap();
    }
    assert_eq!(compiler.stats().entries, 1);
    assert!(compiler.cache().contains(shape.id()));
}

#[test]
fn test_arity_mismatch_reports_shape() {
    let shape = Shape::from_static(&["a", "b", "c"]);
    let err = Compiler::new()
        .produce(Template::new(Arc::clone(&shape), vec![Value::from(1), Value::from(2), Value::from(3)]))
        .unwrap_err();
    match err {
        RenderError::ArityMismatch {
            shape: id,
            expected,
            actual,
        } => {
            assert_eq!(id, shape.id());
            assert_eq!((expected, actual), (2, 3));
        }
        other => panic!("expected arity mismatch, got {other:?}"),
    }
}

#[test]
fn test_bounded_compiler_still_produces() {
    let compiler = Compiler::with_capacity(Some(0));
    let fragments = compiler.produce_fragments(html!("<i>", "</i>"; "x")).unwrap();
    assert_eq!(describe(&fragments), ["<i>x</i>"]);
    assert!(compiler.cache().is_empty());
}
