//! Smartmark — a real-time bookmark manager client with live cross-session sync.
//!
//! Entry point: runs an interactive console demo against the embedded
//! backend, or against the hosted backend when `SMARTMARK_BACKEND_URL`,
//! `SMARTMARK_API_KEY`, and `SMARTMARK_ACCESS_TOKEN` are set.

use std::sync::Arc;
use std::time::Duration;

use smartmark::app::App;
use smartmark::config::BackendConfig;
use smartmark::services::backend::AuthServiceTrait;
use smartmark::services::local_backend::LocalBackend;
use smartmark::services::remote_backend::RemoteBackend;
use smartmark::view;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("smartmark=info")),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            Smartmark v{} — Demo Mode                      ║", env!("CARGO_PKG_VERSION"));
    println!("║     Real-time bookmark sync across open sessions           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    match BackendConfig::from_env() {
        Some(config) => run_remote(config).await,
        None => run_local().await,
    }
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

/// Gives the feed pump a moment to deliver pending events.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

/// Full demo against the embedded backend: two concurrently-subscribed views
/// converging through the live feed.
async fn run_local() {
    let backend = Arc::new(LocalBackend::open_in_memory().expect("failed to open backend"));

    section("Sign-in");
    let mut auth_events = backend.auth_events();
    let user = backend.sign_in("demo@example.com").expect("sign-in failed");
    println!("  Signed in as {} ({})", user.email.as_deref().unwrap_or("-"), user.id);
    if let Ok(event) = auth_events.try_recv() {
        println!("  Auth transition observed: {:?}", event);
    }

    section("View activation");
    let mut view_a = App::with_backend(Arc::clone(&backend));
    let mut view_b = App::with_backend(Arc::clone(&backend));
    view_a.activate_view().await.expect("view A activation failed");
    view_b.activate_view().await.expect("view B activation failed");
    println!("  Two views active, both subscribed to the live feed");
    println!("  Initial state:\n");
    println!("{}", indent(&view::render(&view_a.bookmarks(), view_a.is_loading())));

    section("Submitting bookmarks (view A)");
    for (title, url) in [
        ("Rust Programming Language", "https://rust-lang.org"),
        ("Example Site", "https://example.com"),
    ] {
        match view_a.submit_bookmark(title, url).await {
            Ok(record) => println!("  Added \"{}\" ({})", record.title, record.id),
            Err(e) => println!("  Submit failed: {}", e),
        }
    }
    settle().await;
    println!("\n  View B converged through the feed:\n");
    println!("{}", indent(&view::render(&view_b.bookmarks(), view_b.is_loading())));

    section("Validation");
    for (title, url) in [("", "https://x.com"), ("Broken", "not a url")] {
        match view_a.submit_bookmark(title, url).await {
            Ok(_) => println!("  Unexpected success"),
            Err(e) => println!("  Rejected: {}", e),
        }
    }

    section("Optimistic delete (view B)");
    if let Some(first) = view_b.bookmarks().first().cloned() {
        view_b.delete_bookmark(&first.id).await;
        println!("  Deleted \"{}\" from view B", first.title);
    }
    settle().await;
    println!("  View A converged through the feed:\n");
    println!("{}", indent(&view::render(&view_a.bookmarks(), view_a.is_loading())));

    section("Teardown");
    view_a.deactivate_view().await;
    view_b.deactivate_view().await;
    backend.sign_out();
    if let Ok(event) = auth_events.try_recv() {
        println!("  Auth transition observed: {:?}", event);
    }
    println!("  Both views deactivated, subscriptions closed");

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo complete — both views stayed consistent in real time");
    println!("═══════════════════════════════════════════════════════════════");
}

/// Brief demo against the hosted backend: activate, render, deactivate.
async fn run_remote(config: BackendConfig) {
    let backend = Arc::new(RemoteBackend::new(config));

    section("Hosted backend");
    let mut app = App::with_backend(backend);
    if let Err(e) = app.activate_view().await {
        println!("  Activation failed: {}", e);
        return;
    }

    match app.session_user() {
        Some(user) => println!("  Signed in as {}", user.email.as_deref().unwrap_or(&user.id)),
        None => {
            println!("  No user for the configured access token");
            return;
        }
    }

    println!("\n{}", indent(&view::render(&app.bookmarks(), app.is_loading())));
    app.deactivate_view().await;
    println!("  View deactivated");
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
