//! Deferred values resolving in any order still render in declaration order.

use std::time::{Duration, Instant};

use futures::StreamExt;
use html_stream::test_utils::{delayed, gate};
use html_stream::{BufferSink, Deferred, Engine, html};

#[tokio::test]
async fn test_output_independent_of_resolution_order() {
    let engine = Engine::new();
    let mut outputs = Vec::new();
    for (first, second) in [(40, 1), (1, 40), (10, 10)] {
        let page = html!("<a>", "</a><b>", "</b>"; delayed(first, "one"), delayed(second, "two"));
        outputs.push(engine.render_to_string(page).await.unwrap());
    }
    assert!(outputs.iter().all(|out| out == "<a>one</a><b>two</b>"));
}

#[tokio::test]
async fn test_later_value_never_emitted_before_earlier() {
    let (first, p1) = gate();
    let (second, p2) = gate();
    let page = html!("[", "|", "]"; p1, p2);
    let mut stream = Box::pin(Engine::new().render_stream(page));

    assert_eq!(stream.next().await.unwrap().unwrap(), "[");

    // P2 is ready but P1 is not; nothing may come through yet.
    assert!(second.resolve("two"));
    let early = tokio::time::timeout(Duration::from_millis(30), stream.next()).await;
    assert!(early.is_err(), "chunk emitted before the earlier deferred value resolved");

    assert!(first.resolve("one"));
    let rest: Vec<String> = stream.map(|chunk| chunk.unwrap()).collect().await;
    assert_eq!(rest, ["one|", "two]"]);
}

#[tokio::test]
async fn test_spawned_values_resolve_concurrently() {
    let page = html!("", "", "", ""; delayed(100, "a"), delayed(100, "b"), delayed(100, "c"));
    let started = Instant::now();
    let out = Engine::new().render_to_string(page).await.unwrap();

    assert_eq!(out, "abc");
    // Three sequential waits would take at least 300ms.
    assert!(started.elapsed() < Duration::from_millis(290), "took {:?}", started.elapsed());
}

#[tokio::test]
async fn test_deferred_inside_list_items_keeps_order() {
    let items: Vec<_> = (0..5u64)
        .map(|i| html!("<li>", "</li>"; delayed(50 - i * 10, i.to_string())))
        .collect();
    let mut sink = BufferSink::new();
    let outcome = Engine::new().render(html!("<ol>", "</ol>"; items), &mut sink).await.unwrap();

    assert_eq!(sink.concat(), "<ol><li>0</li><li>1</li><li>2</li><li>3</li><li>4</li></ol>");
    assert_eq!(outcome.chunks(), 6);
}

#[tokio::test]
async fn test_deferred_resolving_to_list_with_deferred() {
    let nested = Deferred::ok(async {
        vec![html_stream::Value::from("<i>"), html_stream::Value::from(delayed(5, "x")), "</i>".into()]
    });
    let out = Engine::new().render_to_string(html!("(", ")"; nested)).await.unwrap();
    assert_eq!(out, "(<i>x</i>)");
}
