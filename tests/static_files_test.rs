//! Tests for the static UI fallback service.

mod common;

use common::TestHarness;
use tc_server::router::build_router;

async fn serve_with_static_dir(dir: std::path::PathBuf) -> std::net::SocketAddr {
    let harness = TestHarness::new();
    let app = build_router(harness.ctx.clone(), Some(dir));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let addr = listener.local_addr().expect("failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    addr
}

#[tokio::test]
async fn static_dir_serves_index_and_assets() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>tubecast</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('ui');").unwrap();

    let addr = serve_with_static_dir(dir.path().to_path_buf()).await;

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "<html>tubecast</html>");

    let resp = reqwest::get(format!("http://{addr}/app.js")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "console.log('ui');");
}

#[tokio::test]
async fn unknown_paths_fall_back_to_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>tubecast</html>").unwrap();

    let addr = serve_with_static_dir(dir.path().to_path_buf()).await;

    // Client-side routes resolve to the SPA entry point.
    let resp = reqwest::get(format!("http://{addr}/settings")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "<html>tubecast</html>");

    // API routes are still handled by the API, not the fallback.
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
