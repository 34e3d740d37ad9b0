//! Producer sharing and cache bounds across engines.

use std::sync::Arc;

use html_stream::{Compiler, Engine, RenderConfig, Template, html};

fn badge(label: &str) -> Template {
    html!("<span class=\"badge\">", "</span>"; label)
}

fn link(href: &str, text: &str) -> Template {
    html!("<a href=\"", "\">", "</a>"; href, text)
}

#[test]
fn test_same_call_site_different_values() {
    let engine = Engine::new();
    assert_eq!(engine.render_sync(badge("new")).unwrap(), "<span class=\"badge\">new</span>");
    assert_eq!(engine.render_sync(badge("<old>")).unwrap(), "<span class=\"badge\">&lt;old&gt;</span>");
    assert_eq!(engine.render_sync(badge("new")).unwrap(), "<span class=\"badge\">new</span>");

    let stats = engine.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}

#[test]
fn test_engines_sharing_a_compiler_share_producers() {
    let compiler = Arc::new(Compiler::new());
    let a = Engine::with_compiler(RenderConfig::default(), Arc::clone(&compiler));
    let b = Engine::with_compiler(RenderConfig::default(), Arc::clone(&compiler));

    a.render_sync(link("/a", "A")).unwrap();
    b.render_sync(link("/b", "B")).unwrap();

    assert_eq!(compiler.stats().misses, 1);
    assert_eq!(compiler.stats().hits, 1);
}

#[test]
fn test_separate_engines_do_not_share() {
    let a = Engine::new();
    let b = Engine::new();
    a.render_sync(badge("x")).unwrap();
    b.render_sync(badge("y")).unwrap();

    assert_eq!(a.stats().misses, 1);
    assert_eq!(b.stats().misses, 1);
}

#[test]
fn test_nested_templates_are_compiled_too() {
    let engine = Engine::new();
    let page = html!("<nav>", "</nav>"; vec![link("/", "home"), link("/about", "about")]);
    assert_eq!(
        engine.render_sync(page).unwrap(),
        "<nav><a href=\"/\">home</a><a href=\"/about\">about</a></nav>"
    );
    // One miss for the nav and one for the link; the second link hits.
    let stats = engine.stats();
    assert_eq!((stats.misses, stats.hits, stats.entries), (2, 1, 2));
}

#[test]
fn test_bounded_cache_keeps_rendering_correctly() {
    let engine = Engine::with_config(RenderConfig {
        max_cached_shapes: Some(1),
        ..RenderConfig::default()
    });

    for _ in 0..3 {
        assert_eq!(engine.render_sync(badge("b")).unwrap(), "<span class=\"badge\">b</span>");
        assert_eq!(engine.render_sync(link("/l", "l")).unwrap(), "<a href=\"/l\">l</a>");
    }
    let stats = engine.stats();
    assert_eq!(stats.entries, 1);
    assert!(stats.hit_rate() > 0.0);
}
