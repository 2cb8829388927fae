//! Customer API endpoint methods against a mock server.

use mockito::{Matcher, Server};
use stuffusell_client::context::basic_auth_token;
use stuffusell_client::types::{CustomerUpdateRequest, PackagingQuantities};
use stuffusell_client::{CallContext, Configuration, ErrorKind, SusClient};

fn client_for(server: &Server) -> SusClient {
    SusClient::new(
        Configuration::new()
            .with_endpoint(server.url())
            .with_access_token("access-key"),
    )
    .unwrap()
}

fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", basic_auth_token(user, pass))
}

fn signed_in(token: &str) -> CallContext {
    CallContext::new().with_auth_token(token)
}

#[tokio::test]
async fn test_username_available_is_anonymous() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/customer/username-available")
        .match_query(Matcher::UrlEncoded("username".into(), "alice".into()))
        .match_header("authorization", Matcher::Missing)
        .match_header("x-access-token", "access-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"available":true}"#)
        .create_async()
        .await;

    let response = client_for(&server)
        .is_username_available(&CallContext::new(), "alice")
        .await
        .unwrap()
        .unwrap();
    assert!(response.available);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_derives_auth_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/customer/login")
        .match_header("authorization", basic("alice@example.com", "secret").as_str())
        .match_header("user-agent", "shop-frontend/2.0")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"primaryEmail":"alice@example.com"}"#)
        .create_async()
        .await;

    let ctx = CallContext::new()
        .with_auth_token("stale")
        .with_user_agent("shop-frontend/2.0");
    let login = client_for(&server)
        .login(&ctx, "alice@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(login.auth_token, basic_auth_token("alice@example.com", "secret"));
    let customer = login.customer.unwrap();
    assert_eq!(customer.id, Some(1));
    assert_eq!(customer.primary_email, "alice@example.com");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/customer/login")
        .with_status(401)
        .create_async()
        .await;

    let err = client_for(&server)
        .login(&CallContext::new(), "alice@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.to_string(), "401: Unauthorized");
}

#[tokio::test]
async fn test_update_rederives_token_from_new_password() {
    let token = basic_auth_token("alice@example.com", "old");
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/customer/update")
        .match_header("authorization", format!("Basic {}", token).as_str())
        .match_body(Matcher::PartialJsonString(
            r#"{"currentPassword":"old","newPassword":"new"}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"primaryEmail":"alice@new.example.com"}"#)
        .create_async()
        .await;

    let request = CustomerUpdateRequest {
        current_password: "old".to_string(),
        new_password: Some("new".to_string()),
        ..Default::default()
    };
    let updated = client_for(&server)
        .update(&signed_in(&token), &request)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        updated.auth_token,
        basic_auth_token("alice@new.example.com", "new")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invoices_pass_pagination() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/customer/invoices")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("pageSize".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"content":[{"invoiceNumber":"INV-3"},{"invoiceNumber":"INV-4"}],
                "page":1,"pageSize":2,"total":9}"#,
        )
        .create_async()
        .await;

    let page = client_for(&server)
        .invoices(&signed_in("token"), 1, 2)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(page.total, 9);
    let numbers: Vec<&str> = page
        .content
        .iter()
        .map(|i| i.invoice_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["INV-3", "INV-4"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_new_order_forwards_ip_address() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/customer/new-order")
        .match_header("x-forwarded-for", "198.51.100.4")
        .match_body(Matcher::Json(serde_json::json!({"ipAddress": "198.51.100.4"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sku":"S-100","status":"NEW"}"#)
        .create_async()
        .await;

    let order = client_for(&server)
        .new_order(&signed_in("token"), true, "198.51.100.4")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(order.sku, "S-100");
    assert_eq!(order.status.as_deref(), Some("NEW"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_new_order_without_terms_withholds_ip_address() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/customer/new-order")
        .match_header("x-forwarded-for", Matcher::Missing)
        .match_body(Matcher::Json(serde_json::json!({"ipAddress": ""})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sku":"S-101","status":"NEW"}"#)
        .create_async()
        .await;

    // An address already on the caller's context is withheld too.
    let ctx = signed_in("token").with_ip_address("198.51.100.4");
    let order = client_for(&server)
        .new_order(&ctx, false, "198.51.100.4")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(order.sku, "S-101");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sku_is_percent_encoded_in_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/customer/order/A%20B/listing-history")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"sku":"A B","title":"Lamp"}]"#)
        .create_async()
        .await;

    let history = client_for(&server)
        .listing_history(&signed_in("token"), "A B")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title.as_deref(), Some("Lamp"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_packaging_requests_posts_quantities() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/customer/order/S-1/packaging-request")
        .match_body(Matcher::Json(serde_json::json!({"box": 2, "tape": 1})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let mut quantities = PackagingQuantities::new();
    quantities.insert("box".to_string(), 2);
    quantities.insert("tape".to_string(), 1);
    let response = client_for(&server)
        .update_packaging_requests(&signed_in("token"), "S-1", &quantities)
        .await
        .unwrap()
        .unwrap();

    assert!(response.success);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_command_without_body_is_absent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/customer/customer-payment-request")
        .match_body(Matcher::JsonString("{}".to_string()))
        .with_status(204)
        .create_async()
        .await;

    let result = client_for(&server)
        .request_payment(&signed_in("token"))
        .await
        .unwrap();
    assert!(result.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_bodies_are_absent_for_every_shape() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for (method, path) in [
        ("GET", "/api/customer/current"),
        ("GET", "/api/customer/orders"),
        ("POST", "/api/customer/pricing-changed"),
        ("POST", "/api/customer/order/S-1/book-courier"),
        ("POST", "/api/customer/update"),
    ] {
        mocks.push(
            server
                .mock(method, path)
                .with_status(200)
                .create_async()
                .await,
        );
    }

    let client = client_for(&server);
    let ctx = signed_in("token");
    assert!(client.current(&ctx).await.unwrap().is_none());
    assert!(client.orders(&ctx).await.unwrap().is_none());
    assert!(client.pricing_changed(&ctx).await.unwrap().is_none());
    assert!(client
        .book_courier(&ctx, "S-1", &Default::default())
        .await
        .unwrap()
        .is_none());
    assert!(client
        .update(&ctx, &CustomerUpdateRequest::default())
        .await
        .unwrap()
        .is_none());
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_concurrent_callers_keep_their_identity() {
    let mut server = Server::new_async().await;
    let alice = server
        .mock("GET", "/api/customer/current")
        .match_header("authorization", basic("alice", "a").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"primaryEmail":"alice@example.com"}"#)
        .expect(5)
        .create_async()
        .await;
    let bob = server
        .mock("GET", "/api/customer/current")
        .match_header("authorization", basic("bob", "b").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"primaryEmail":"bob@example.com"}"#)
        .expect(5)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut tasks = Vec::new();
    for i in 0..10 {
        let client = client.clone();
        let (user, pass, email) = if i % 2 == 0 {
            ("alice", "a", "alice@example.com")
        } else {
            ("bob", "b", "bob@example.com")
        };
        tasks.push(tokio::spawn(async move {
            let me = client
                .current(&CallContext::basic(user, pass))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(me.primary_email, email);
        }));
    }
    for result in futures::future::join_all(tasks).await {
        result.unwrap();
    }

    alice.assert_async().await;
    bob.assert_async().await;
}
