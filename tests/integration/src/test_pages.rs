//! HTML page integration tests.

#[cfg(test)]
mod tests {
    use crate::{http_client, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_index_page() {
        let resp = http_client().get(url("/")).send().await.expect("GET /");

        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        let body = resp.text().await.expect("read body");
        assert!(body.contains("Welcome to the Web Framework!"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_greet_by_name() {
        let client = http_client();

        let body = client
            .get(url("/hello?name=Ada"))
            .send()
            .await
            .expect("GET /hello")
            .text()
            .await
            .expect("read body");
        assert!(body.contains("Hello, Ada!"));

        let body = client
            .get(url("/hello"))
            .send()
            .await
            .expect("GET /hello")
            .text()
            .await
            .expect("read body");
        assert!(body.contains("Hello, World!"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_exact_content_length() {
        let resp = http_client()
            .get(url("/hello?name=%D0%9C%D0%B8%D1%80"))
            .send()
            .await
            .expect("GET /hello");

        let declared: usize = resp.headers()["content-length"]
            .to_str()
            .expect("ascii header")
            .parse()
            .expect("numeric length");
        let body = resp.bytes().await.expect("read body");
        assert_eq!(declared, body.len());
    }
}
