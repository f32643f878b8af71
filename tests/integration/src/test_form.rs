//! HTML form integration tests.

#[cfg(test)]
mod tests {
    use crate::{http_client, unique_name, url};

    const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_show_form() {
        let body = http_client()
            .get(url("/form"))
            .send()
            .await
            .expect("GET /form")
            .text()
            .await
            .expect("read body");
        assert!(body.contains(r#"<form method="POST" action="/form">"#));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_complete_submission() {
        let name = unique_name("Ada");
        let resp = http_client()
            .post(url("/form"))
            .header("content-type", FORM_CONTENT_TYPE)
            .body(format!("name={name}&email=ada%40example.com"))
            .send()
            .await
            .expect("POST /form");

        assert_eq!(resp.status(), 200);
        let body = resp.text().await.expect("read body");
        assert!(body.contains(&format!("<p>Name: {name}</p>")));
        assert!(body.contains("<p>Email: ada@example.com</p>"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_missing_field() {
        let resp = http_client()
            .post(url("/form"))
            .header("content-type", FORM_CONTENT_TYPE)
            .body("name=Ada")
            .send()
            .await
            .expect("POST /form");

        assert_eq!(resp.status(), 400);
        let body = resp.text().await.expect("read body");
        assert!(body.contains("400 Bad Request"));
    }
}
