//! Document paging, deletion and upload URLs through the API.

#[cfg(test)]
mod tests {
    use crate::{
        api_client, base_url, configure_credentials, create_bucket, s3_client, seed_objects,
        send_json,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_page_documents_twenty_at_a_time() {
        let client = api_client();
        let s3 = s3_client();
        configure_credentials(&client).await.expect("credentials");
        let bucket = create_bucket(&client, "docs").await.expect("create");
        seed_objects(&s3, &bucket, 25).await;

        let url = format!("{}/buckets/documents", base_url());
        let (status, first) = send_json(client.get(&url).query(&[("bucket", bucket.as_str())]))
            .await
            .expect("first page");
        assert_eq!(status, 200);
        assert_eq!(first["documents"].as_array().map(Vec::len), Some(20));
        let token = first["continuation-token"]
            .as_str()
            .expect("continuation token")
            .to_owned();

        let (_, second) = send_json(client.get(&url).query(&[
            ("bucket", bucket.as_str()),
            ("continuationToken", token.as_str()),
        ]))
        .await
        .expect("second page");
        assert_eq!(second["documents"].as_array().map(Vec::len), Some(5));
        assert!(second["continuation-token"].is_null());

        let _ = client
            .delete(format!("{}/buckets", base_url()))
            .query(&[("name", bucket.as_str())])
            .send()
            .await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_selected_documents() {
        let client = api_client();
        let s3 = s3_client();
        configure_credentials(&client).await.expect("credentials");
        let bucket = create_bucket(&client, "deldocs").await.expect("create");
        seed_objects(&s3, &bucket, 3).await;

        let (status, body) = send_json(
            client
                .delete(format!("{}/buckets/documents", base_url()))
                .query(&[
                    ("bucket", bucket.as_str()),
                    ("filenames[]", "doc-000.txt"),
                    ("filenames[]", "doc-001.txt"),
                ]),
        )
        .await
        .expect("delete documents");
        assert_eq!(status, 200);
        assert_eq!(body["deleted"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(body["failed"], 0);

        let _ = client
            .delete(format!("{}/buckets", base_url()))
            .query(&[("name", bucket.as_str())])
            .send()
            .await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_hand_out_usable_upload_url() {
        let client = api_client();
        let s3 = s3_client();
        configure_credentials(&client).await.expect("credentials");
        let bucket = create_bucket(&client, "upload").await.expect("create");

        let (status, body) = send_json(client.get(format!("{}/buckets/upload-url", base_url())).query(&[
            ("bucket", bucket.as_str()),
            ("filename", "hello.txt"),
        ]))
        .await
        .expect("upload url");
        assert_eq!(status, 200);
        let url = body["url"].as_str().expect("url");
        assert!(url.contains("X-Amz-Expires=3600"));

        let put = client.put(url).body("hello").send().await.expect("put");
        assert!(put.status().is_success(), "presigned put failed: {}", put.status());

        let head = s3.head_object().bucket(&bucket).key("hello.txt").send().await;
        assert!(head.is_ok(), "uploaded object should exist");

        let _ = client
            .delete(format!("{}/buckets", base_url()))
            .query(&[("name", bucket.as_str())])
            .send()
            .await;
    }
}
