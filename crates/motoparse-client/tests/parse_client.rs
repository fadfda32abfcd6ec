//! Integration tests for `ParseClient` using wiremock HTTP mocks.

use motoparse_client::{ClientError, ParseClient};
use motoparse_core::{ParseResult, Product};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ParseClient {
    ParseClient::new(&format!("{}/api", server.uri()), 30, "motoparse-test")
        .expect("client construction should not fail")
}

fn product_json(link: &str) -> serde_json::Value {
    serde_json::json!({
        "brand": "Motoland",
        "model": "XR250",
        "year": "2024",
        "name": "Мотоцикл Motoland XR250",
        "link": link,
        "images": [format!("{link}/1.jpg"), format!("{link}/2.jpg")],
        "description": "Кроссовый мотоцикл",
        "price": "189 900 ₽",
        "old_price": "209 900 ₽",
        "discount": "-10%",
        "economy": "20 000 ₽",
        "site": "motoland",
        "characteristics": { "Объем двигателя": "250 см³" }
    })
}

#[tokio::test]
async fn parse_url_returns_catalog() {
    let server = MockServer::start().await;
    let url = "https://motoland-shop.ru/catalog/moto";

    Mock::given(method("POST"))
        .and(path("/api/parse_url"))
        .and(body_json(serde_json::json!({ "url": url })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "catalog",
            "products": [
                product_json("https://motoland-shop.ru/moto/xr250"),
                product_json("https://motoland-shop.ru/moto/xr300"),
            ],
            "totalItems": 42
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .parse_url(url)
        .await
        .expect("should parse catalog");

    let ParseResult::Catalog {
        products,
        total_items,
    } = result
    else {
        panic!("expected a catalog, got {result:?}");
    };
    assert_eq!(total_items, 42);
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].link, "https://motoland-shop.ru/moto/xr300");
    assert_eq!(products[0].discount.as_deref(), Some("-10%"));
}

#[tokio::test]
async fn parse_url_returns_single_product_with_nulls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/parse_url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "product",
            "details": {
                "brand": null,
                "model": null,
                "year": null,
                "name": "Питбайк RM 125",
                "link": "https://www.rollingmoto.ru/pitbike/rm125",
                "images": [],
                "description": null,
                "price": "99 000 ₽",
                "old_price": null,
                "site": "rollingmoto"
            }
        })))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .parse_url("https://www.rollingmoto.ru/pitbike/rm125")
        .await
        .expect("should parse product");

    assert!(!result.is_catalog());
    let details = &result.products()[0];
    assert_eq!(details.name, "Питбайк RM 125");
    assert_eq!(details.brand, "");
    assert_eq!(details.old_price, None);
    assert_eq!(details.characteristics, None);
}

#[tokio::test]
async fn parse_url_sends_json_and_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/parse_url"))
        .and(header("content-type", "application/json"))
        .and(header("user-agent", "motoparse-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "catalog",
            "products": [],
            "totalItems": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .parse_url("https://www.rollingmoto.ru/moto")
        .await
        .expect("request should match");
    assert!(result.products().is_empty());
}

#[tokio::test]
async fn parse_url_surfaces_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/parse_url"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Не удалось определить тип страницы"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .parse_url("https://www.rollingmoto.ru/about")
        .await
        .expect_err("400 should be an error");

    match err {
        ClientError::Remote { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(
                message.as_deref(),
                Some("Не удалось определить тип страницы")
            );
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn parse_url_error_without_json_body_has_no_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/parse_url"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .parse_url("https://www.rollingmoto.ru/moto")
        .await
        .expect_err("502 should be an error");

    assert!(
        matches!(err, ClientError::Remote { status: 502, message: None }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn parse_url_rejects_unexpected_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/parse_url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "type": "brochure"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .parse_url("https://www.rollingmoto.ru/moto")
        .await
        .expect_err("unknown type should fail");

    assert!(matches!(err, ClientError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn parse_url_against_closed_port_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let client = ParseClient::new(&format!("http://127.0.0.1:{port}/api"), 5, "motoparse-test")
        .expect("client construction should not fail");
    let err = client
        .parse_url("https://www.rollingmoto.ru/moto")
        .await
        .expect_err("nothing is listening");

    assert!(matches!(err, ClientError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn download_archive_returns_bytes() {
    let server = MockServer::start().await;
    let products: Vec<Product> = vec![
        serde_json::from_value(product_json("https://motoland-shop.ru/moto/xr250")).unwrap(),
    ];
    let archive = b"PK\x03\x04fake-zip".to_vec();

    Mock::given(method("POST"))
        .and(path("/api/download_archive"))
        .and(body_json(serde_json::json!({ "products_data": &products })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = test_client(&server)
        .download_archive(&products)
        .await
        .expect("should download archive");

    assert_eq!(bytes, archive);
}

#[tokio::test]
async fn download_archive_with_no_products_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .download_archive(&[])
        .await
        .expect_err("empty selection should fail");

    assert!(matches!(err, ClientError::EmptyArchive));
}

#[tokio::test]
async fn download_archive_surfaces_remote_error() {
    let server = MockServer::start().await;
    let products: Vec<Product> = vec![
        serde_json::from_value(product_json("https://motoland-shop.ru/moto/xr250")).unwrap(),
    ];

    Mock::given(method("POST"))
        .and(path("/api/download_archive"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Не удалось скачать изображения"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .download_archive(&products)
        .await
        .expect_err("500 should be an error");

    assert!(
        matches!(&err, ClientError::Remote { status: 500, message: Some(m) } if m == "Не удалось скачать изображения"),
        "got {err:?}"
    );
}
