//! Bucket listing, creation and deletion through the API.

#[cfg(test)]
mod tests {
    use crate::{
        api_client, base_url, configure_credentials, create_bucket, s3_client, seed_objects,
        send_json,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_created_bucket_with_region() {
        let client = api_client();
        configure_credentials(&client).await.expect("credentials");
        let bucket = create_bucket(&client, "list").await.expect("create");

        let (status, body) = send_json(client.get(format!("{}/buckets", base_url())))
            .await
            .expect("list");
        assert_eq!(status, 200);
        let entry = body["buckets"]
            .as_array()
            .and_then(|buckets| buckets.iter().find(|b| b["name"] == bucket.as_str()))
            .unwrap_or_else(|| panic!("{bucket} missing from {body}"));
        assert_eq!(entry["region"], "us-east-1");

        let _ = client
            .delete(format!("{}/buckets", base_url()))
            .query(&[("name", bucket.as_str())])
            .send()
            .await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_drain_and_delete_non_empty_bucket() {
        let client = api_client();
        let s3 = s3_client();
        configure_credentials(&client).await.expect("credentials");
        let bucket = create_bucket(&client, "drain").await.expect("create");
        seed_objects(&s3, &bucket, 45).await;

        let (status, body) = send_json(
            client
                .delete(format!("{}/buckets", base_url()))
                .query(&[("name", bucket.as_str())]),
        )
        .await
        .expect("delete");
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["deleted"], true);

        let head = s3.head_bucket().bucket(&bucket).send().await;
        assert!(head.is_err(), "bucket should be gone");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_create_without_region() {
        let client = api_client();
        let (status, body) = send_json(
            client
                .post(format!("{}/buckets", base_url()))
                .json(&serde_json::json!({ "name": "no-region" })),
        )
        .await
        .expect("create");
        assert_eq!(status, 400);
        assert_eq!(body["message"], "region is required");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_unknown_route_with_404() {
        let client = api_client();
        let (status, body) = send_json(client.get(format!("{}/nope", base_url())))
            .await
            .expect("request");
        assert_eq!(status, 404);
        assert!(body["error"].is_string());
    }
}
