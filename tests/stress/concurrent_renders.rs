//! Concurrent renders sharing one compiler.

use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use html_stream::test_utils::{delayed, init_test_logging};
use html_stream::{Compiler, Engine, RenderConfig, Template, html};
use tracing::info;

fn row(id: usize, name: String) -> Template {
    let doubled = delayed((id % 7) as u64, (id * 2).to_string());
    html!("<tr data-id=\"", "\"><td>", "</td><td>", "</td></tr>"; id, name, doubled)
}

fn table(render: usize) -> Template {
    let rows: Vec<Template> = (0..50).map(|i| row(i, format!("<user {render}-{i}>"))).collect();
    html!("<table id=\"t", "\">", "</table>"; render, rows)
}

fn expected(render: usize) -> String {
    let mut out = format!("<table id=\"t{render}\">");
    for i in 0..50 {
        out.push_str(&format!(
            "<tr data-id=\"{i}\"><td>&lt;user {render}-{i}&gt;</td><td>{}</td></tr>",
            i * 2
        ));
    }
    out.push_str("</table>");
    out
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_200_concurrent_renders_share_producers() {
    init_test_logging(None);
    let compiler = Arc::new(Compiler::new());
    let engine = Engine::with_compiler(RenderConfig::default(), Arc::clone(&compiler));

    let start = Instant::now();
    let handles: Vec<_> = (0..200)
        .map(|n| {
            let engine = engine.clone();
            tokio::spawn(async move { (n, engine.render_to_string(table(n)).await) })
        })
        .collect();

    for handle in handles {
        let (n, result) = handle.await.unwrap();
        assert_eq!(result.unwrap(), expected(n), "render {n} corrupted");
    }
    info!("200 concurrent renders in {:?}", start.elapsed());

    let stats = compiler.stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.misses + stats.hits, 200 * 51);
    info!("cache hit rate {:.2}%", stats.hit_rate());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_streams_with_slow_consumers() {
    init_test_logging(None);
    let engine = Engine::with_config(RenderConfig {
        channel_capacity: 2,
        ..RenderConfig::default()
    });

    let start = Instant::now();
    let handles: Vec<_> = (0..50)
        .map(|n| {
            let stream = engine.render_stream(table(n));
            tokio::spawn(async move {
                let chunks: Vec<String> = stream
                    .then(|chunk| async move {
                        tokio::task::yield_now().await;
                        chunk.unwrap()
                    })
                    .collect()
                    .await;
                (n, chunks)
            })
        })
        .collect();

    for handle in handles {
        let (n, chunks) = handle.await.unwrap();
        assert_eq!(chunks.len(), 51, "one chunk per deferred value plus one");
        assert_eq!(chunks.concat(), expected(n));
    }
    info!("50 streamed renders in {:?}", start.elapsed());
}
