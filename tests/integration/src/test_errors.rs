//! Dispatch failure integration tests.

#[cfg(test)]
mod tests {
    use crate::{http_client, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_for_unknown_path() {
        let resp = http_client()
            .get(url("/nonexistent"))
            .send()
            .await
            .expect("GET /nonexistent");

        assert_eq!(resp.status(), 404);
        assert_eq!(resp.text().await.expect("read body"), "404 Not Found");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_for_unregistered_method() {
        let resp = http_client()
            .delete(url("/users"))
            .send()
            .await
            .expect("DELETE /users");

        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_not_normalize_trailing_slash() {
        let resp = http_client()
            .get(url("/users/"))
            .send()
            .await
            .expect("GET /users/");

        assert_eq!(resp.status(), 404);
    }
}
