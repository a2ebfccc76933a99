//! Settings routes.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{api_client, base_url, configure_credentials, send_json};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_ping() {
        let client = api_client();
        let (status, body) = send_json(client.get(format!("{}/ping", base_url())))
            .await
            .expect("ping");
        assert_eq!(status, 200);
        assert_eq!(body["message"], "pong");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_store_and_read_region() {
        let client = api_client();
        let url = format!("{}/settings/aws/region", base_url());

        let (status, body) = send_json(client.post(&url).json(&json!({ "region": "eu-west-1" })))
            .await
            .expect("set region");
        assert_eq!(status, 201);
        assert_eq!(body["region"], "eu-west-1");

        let (status, body) = send_json(client.get(&url)).await.expect("get region");
        assert_eq!(status, 200);
        assert_eq!(body["region"], "eu-west-1");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_configured_credentials_without_secret() {
        let client = api_client();
        configure_credentials(&client).await.expect("credentials");

        let (status, body) = send_json(client.get(format!("{}/settings", base_url())))
            .await
            .expect("settings");
        assert_eq!(status, 200);
        assert_eq!(body["aws"]["key_configured"], true);
        assert_eq!(body["aws"]["secret_configured"], true);
        assert_eq!(body["aws"]["initialized"], true);
        assert!(!body.to_string().contains("\"secret\":\"test\""));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_key_without_body() {
        let client = api_client();
        let (status, body) = send_json(client.post(format!("{}/settings/aws/key", base_url())))
            .await
            .expect("post key");
        assert_eq!(status, 400);
        assert_eq!(body["message"], "key is required");
    }
}
