//! Large and deeply nested documents.

use std::time::Instant;

use html_stream::test_utils::init_test_logging;
use html_stream::{Deferred, Engine, RenderConfig, Template, Value, html};
use tracing::info;

fn nest(depth: usize) -> Template {
    if depth == 0 {
        html!("<span>", "</span>"; "leaf")
    } else {
        html!("<div>", "</div>"; nest(depth - 1))
    }
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    init_test_logging(None);
    let depth = 2_000;
    let unspecialized = Engine::with_config(RenderConfig {
        specialize: false,
        ..RenderConfig::default()
    });
    for engine in [Engine::new(), unspecialized] {
        let start = Instant::now();
        let out = engine.render_sync(nest(depth)).unwrap();
        info!("depth {} rendered in {:?}", depth, start.elapsed());

        assert_eq!(out.len(), depth * "<div></div>".len() + "<span>leaf</span>".len());
        assert!(out.starts_with("<div><div>"));
        assert!(out.ends_with("</div></div>"));
    }
}

#[test]
fn test_hundred_thousand_items_lazy() {
    init_test_logging(None);
    let items = Value::iter((0..100_000).map(|i| html!("<li>", "</li>"; i)));
    let start = Instant::now();
    let out = Engine::new().render_sync(html!("<ul>", "</ul>"; items)).unwrap();
    info!("100k items rendered in {:?}", start.elapsed());

    assert!(out.starts_with("<ul><li>0</li><li>1</li>"));
    assert!(out.ends_with("<li>99999</li></ul>"));
}

#[tokio::test]
async fn test_many_deferred_values_emit_one_chunk_each() {
    init_test_logging(None);
    let cells: Vec<Template> = (0..1_000)
        .map(|i| html!("<td>", "</td>"; Deferred::ready(i.to_string())))
        .collect();
    let mut sink = html_stream::BufferSink::new();
    let outcome = Engine::new().render(html!("<tr>", "</tr>"; cells), &mut sink).await.unwrap();

    assert_eq!(outcome.chunks(), 1_001);
    assert_eq!(sink.chunks().first().map(String::as_str), Some("<tr><td>"));
    assert_eq!(sink.chunks().last().map(String::as_str), Some("999</td></tr>"));
}
