//! End-to-end authentication gate behavior.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::mpsc;

use storefront_edge::config::GatewayConfig;
use storefront_edge::http::HttpServer;
use storefront_edge::lifecycle::Shutdown;

mod common;

fn gateway_config(
    proxy_addr: SocketAddr,
    upstream_addr: SocketAddr,
    auth_addr: SocketAddr,
) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = proxy_addr.to_string();
    config.routing.base_domain = "example.com".to_string();
    config.upstream.address = upstream_addr.to_string();
    config.auth.endpoint = format!("http://{}", auth_addr);
    config.auth.timeout_secs = 1;
    config.observability.metrics_enabled = false;
    config
}

async fn spawn_gateway(config: GatewayConfig, proxy_addr: SocketAddr) -> Shutdown {
    let shutdown = Shutdown::new();
    let (_config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind(proxy_addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_unauthenticated_protected_path_redirects_to_login() {
    let upstream_addr: SocketAddr = "127.0.0.1:28581".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28582".parse().unwrap();
    let auth_addr: SocketAddr = "127.0.0.1:28583".parse().unwrap();

    common::start_mock_upstream(upstream_addr).await;
    common::start_mock_auth(auth_addr, || async {
        (401, r#"{"error":"no session"}"#.to_string(), vec![])
    })
    .await;
    let shutdown = spawn_gateway(
        gateway_config(proxy_addr, upstream_addr, auth_addr),
        proxy_addr,
    )
    .await;

    let res = client()
        .get(format!("http://{}/en/dashboard", proxy_addr))
        .header(reqwest::header::HOST, "example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 307);
    assert_eq!(
        res.headers().get("location").unwrap(),
        "/en/login?redirect=%2Fen%2Fdashboard"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_locale_less_protected_path_costs_one_redirect() {
    let upstream_addr: SocketAddr = "127.0.0.1:28584".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28585".parse().unwrap();
    let auth_addr: SocketAddr = "127.0.0.1:28586".parse().unwrap();

    common::start_mock_upstream(upstream_addr).await;
    let shutdown = spawn_gateway(
        gateway_config(proxy_addr, upstream_addr, auth_addr),
        proxy_addr,
    )
    .await;

    // A host outside the base domain is primary traffic; no cookies means
    // the auth backend is never contacted.
    let res = client()
        .get(format!("http://{}/dashboard", proxy_addr))
        .header(reqwest::header::HOST, "app.other-platform.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 307);
    assert_eq!(
        res.headers().get("location").unwrap(),
        "/en/login?redirect=%2Fdashboard"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_authenticated_login_redirects_to_dashboard() {
    let upstream_addr: SocketAddr = "127.0.0.1:28587".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28588".parse().unwrap();
    let auth_addr: SocketAddr = "127.0.0.1:28589".parse().unwrap();

    common::start_mock_upstream(upstream_addr).await;
    common::start_mock_auth(auth_addr, || async {
        (200, r#"{"user_id":"user-1"}"#.to_string(), vec![])
    })
    .await;
    let shutdown = spawn_gateway(
        gateway_config(proxy_addr, upstream_addr, auth_addr),
        proxy_addr,
    )
    .await;

    let res = client()
        .get(format!("http://{}/en/login", proxy_addr))
        .header(reqwest::header::HOST, "example.com")
        .header(reqwest::header::COOKIE, "access_token=valid-token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 307);
    assert_eq!(res.headers().get("location").unwrap(), "/en/dashboard");

    shutdown.trigger();
}

#[tokio::test]
async fn test_rotated_cookies_are_relayed_on_pass_through() {
    let upstream_addr: SocketAddr = "127.0.0.1:28590".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28591".parse().unwrap();
    let auth_addr: SocketAddr = "127.0.0.1:28592".parse().unwrap();

    common::start_mock_upstream(upstream_addr).await;
    common::start_mock_auth(auth_addr, || async {
        (
            200,
            r#"{"user_id":"user-1"}"#.to_string(),
            vec!["access_token=rotated; Path=/; HttpOnly".to_string()],
        )
    })
    .await;
    let shutdown = spawn_gateway(
        gateway_config(proxy_addr, upstream_addr, auth_addr),
        proxy_addr,
    )
    .await;

    let res = client()
        .get(format!("http://{}/en/pricing", proxy_addr))
        .header(reqwest::header::HOST, "example.com")
        .header(reqwest::header::COOKIE, "access_token=stale-token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let cookies: Vec<_> = res
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(
        cookies.iter().any(|c| c.starts_with("access_token=rotated")),
        "got {:?}",
        cookies
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_auth_backend_failure_degrades_to_anonymous() {
    let upstream_addr: SocketAddr = "127.0.0.1:28593".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28594".parse().unwrap();
    // Nothing listens on the auth port.
    let auth_addr: SocketAddr = "127.0.0.1:28595".parse().unwrap();

    common::start_mock_upstream(upstream_addr).await;
    let shutdown = spawn_gateway(
        gateway_config(proxy_addr, upstream_addr, auth_addr),
        proxy_addr,
    )
    .await;

    // Public page with cookies: refresh fails, request still passes through.
    let res = client()
        .get(format!("http://{}/en/pricing", proxy_addr))
        .header(reqwest::header::HOST, "example.com")
        .header(reqwest::header::COOKIE, "access_token=whatever")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "path=/en/pricing; subdomain=-");

    // Protected page with cookies: degraded session means the login redirect.
    let res = client()
        .get(format!("http://{}/en/dashboard", proxy_addr))
        .header(reqwest::header::HOST, "example.com")
        .header(reqwest::header::COOKIE, "access_token=whatever")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 307);
    assert_eq!(
        res.headers().get("location").unwrap(),
        "/en/login?redirect=%2Fen%2Fdashboard"
    );

    shutdown.trigger();
}
