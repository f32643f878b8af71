//! Users JSON API integration tests.

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{http_client, unique_name, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_seeded_users() {
        let resp = http_client().get(url("/users")).send().await.expect("GET /users");

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/json");
        let users: Value = resp.json().await.expect("json body");
        let names: Vec<_> = users
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|u| u["name"].as_str())
            .collect();
        assert!(names.contains(&"Alice"));
        assert!(names.contains(&"Bob"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_find_user() {
        let client = http_client();
        let name = unique_name("Zoe");

        let resp = client
            .post(url("/users"))
            .json(&json!({ "name": name, "email": "zoe@example.com" }))
            .send()
            .await
            .expect("POST /users");
        assert_eq!(resp.status(), 201);
        let created: Value = resp.json().await.expect("json body");
        assert_eq!(created["message"], "User created");
        assert_eq!(created["user"]["name"], name.as_str());
        assert!(created["user"]["id"].as_u64().is_some_and(|id| id > 3));

        let found: Value = client
            .get(url(&format!("/users?search={}", name.to_lowercase())))
            .send()
            .await
            .expect("GET /users")
            .json()
            .await
            .expect("json body");
        assert_eq!(found.as_array().map(Vec::len), Some(1));
        assert_eq!(found[0]["email"], "zoe@example.com");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_malformed_json() {
        let resp = http_client()
            .post(url("/users"))
            .header("content-type", "application/json")
            .body("not valid json")
            .send()
            .await
            .expect("POST /users");

        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.expect("json body");
        assert!(body["error"].is_string());
    }
}
