use std::time::Duration;

use serde_json::Value;

use crate::common::{TestApp, routes};

/// The six keys every public item carries, no more, no fewer.
const PUBLIC_KEYS: [&str; 6] = [
    "id",
    "title",
    "alt_text",
    "display_order",
    "url",
    "created_at",
];

fn assert_public_shape(item: &Value) {
    let obj = item.as_object().expect("item should be a JSON object");
    assert_eq!(
        obj.len(),
        PUBLIC_KEYS.len(),
        "unexpected key set: {:?}",
        obj.keys().collect::<Vec<_>>()
    );
    for key in PUBLIC_KEYS {
        assert!(obj.contains_key(key), "missing key '{key}'");
    }
}

mod list_images {
    use super::*;

    #[tokio::test]
    async fn empty_store_returns_empty_array() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::PUBLIC_IMAGES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn unpublished_images_are_hidden() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        app.create_image(&token, "draft.png", &[("title", "Draft")])
            .await;

        let res = app.get(routes::PUBLIC_IMAGES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn published_images_are_listed_once() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        let id = app
            .create_published_image(&token, "pier.png", "Pier", 0)
            .await;

        let res = app.get(routes::PUBLIC_IMAGES).await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"].as_i64().unwrap() as i32, id);
        assert_eq!(items[0]["title"].as_str().unwrap(), "Pier");
    }

    #[tokio::test]
    async fn ordering_follows_display_order_then_recency() {
        let app = TestApp::spawn().await;
        let token = app.login().await;

        // A(order=2), B(order=1), C(order=1, created after B) -> [C, B, A].
        let a = app.create_published_image(&token, "a.png", "A", 2).await;
        let b = app.create_published_image(&token, "b.png", "B", 1).await;
        // Make sure C's created_at is strictly later than B's.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let c = app.create_published_image(&token, "c.png", "C", 1).await;

        let res = app.get(routes::PUBLIC_IMAGES).await;

        assert_eq!(res.status, 200);
        let ids: Vec<i32> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap() as i32)
            .collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[tokio::test]
    async fn items_have_exactly_the_public_keys() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        app.create_published_image(&token, "shape.png", "Shape", 0)
            .await;

        let res = app.get(routes::PUBLIC_IMAGES).await;

        assert_eq!(res.status, 200);
        for item in res.body.as_array().unwrap() {
            assert_public_shape(item);
        }
    }

    #[tokio::test]
    async fn url_is_absolute_and_serves_the_upload() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        app.create_published_image(&token, "sunrise.png", "Sunrise", 0)
            .await;

        let res = app.get(routes::PUBLIC_IMAGES).await;
        let url = res.body[0]["url"].as_str().unwrap().to_string();

        // Absolute URL resolved against this server's own origin.
        let expected_prefix = format!("http://{}/media/uploads/images/", app.addr);
        assert!(
            url.starts_with(&expected_prefix),
            "unexpected url: {url} (wanted prefix {expected_prefix})"
        );

        // And it actually serves the uploaded bytes.
        let media = app
            .client
            .get(&url)
            .send()
            .await
            .expect("Failed to fetch media URL");
        assert_eq!(media.status().as_u16(), 200);
        assert_eq!(
            media.headers()["content-type"].to_str().unwrap(),
            "image/png"
        );
        assert_eq!(media.bytes().await.unwrap().as_ref(), b"PNG_DATA");
    }

    #[tokio::test]
    async fn forwarded_proto_and_host_are_honored() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        app.create_published_image(&token, "proxy.png", "Proxied", 0)
            .await;

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, routes::PUBLIC_IMAGES))
            .header("X-Forwarded-Proto", "https")
            .header("X-Forwarded-Host", "gallery.example.com")
            .send()
            .await
            .expect("Failed to send GET request");
        let body: Value = res.json().await.unwrap();

        let url = body[0]["url"].as_str().unwrap();
        assert!(
            url.starts_with("https://gallery.example.com/media/uploads/images/"),
            "unexpected url: {url}"
        );
    }

    #[tokio::test]
    async fn non_get_methods_are_rejected() {
        let app = TestApp::spawn().await;

        for method in [
            reqwest::Method::POST,
            reqwest::Method::PUT,
            reqwest::Method::DELETE,
        ] {
            let res = app.request(method.clone(), routes::PUBLIC_IMAGES).await;
            assert_eq!(res.status, 405, "{method} should be rejected");
        }
    }
}

mod image_detail {
    use super::*;

    #[tokio::test]
    async fn published_image_is_retrievable() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        let id = app
            .create_published_image(&token, "mine.png", "My Image", 0)
            .await;

        let res = app.get(&routes::public_image(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"].as_i64().unwrap() as i32, id);
        assert_eq!(res.body["title"].as_str().unwrap(), "My Image");
        assert_public_shape(&res.body);
    }

    #[tokio::test]
    async fn unpublished_image_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        let id = app
            .create_image(&token, "secret.png", &[("title", "Secret")])
            .await;

        let res = app.get(&routes::public_image(id)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["detail"].as_str().unwrap(), "Not found.");
    }

    #[tokio::test]
    async fn missing_image_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::public_image(99999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["detail"].as_str().unwrap(), "Not found.");
    }

    #[tokio::test]
    async fn non_get_methods_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.login().await;
        let id = app
            .create_published_image(&token, "verb.png", "Verb", 0)
            .await;

        for method in [
            reqwest::Method::POST,
            reqwest::Method::PUT,
            reqwest::Method::DELETE,
        ] {
            let res = app.request(method.clone(), &routes::public_image(id)).await;
            assert_eq!(res.status, 405, "{method} should be rejected");
        }
    }
}
