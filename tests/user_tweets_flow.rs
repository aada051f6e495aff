use chrono::NaiveDate;
use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use user_tweets::commands::user_tweets::execute;
use user_tweets::datetime_utils::FixedClock;
use user_tweets::output::{load_output, print_sorted};
use user_tweets::twitter::TwitterClient;

fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap(),
    )
}

#[tokio::test]
async fn test_resolve_fetch_and_save() {
    let mut server = mockito::Server::new_async().await;

    let lookup = server
        .mock("GET", "/users/by/username/EFAparty")
        .match_header("authorization", "Bearer secret")
        .match_query(Matcher::UrlEncoded(
            "tweet.fields".into(),
            "created_at".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"id":"42"}}"#)
        .expect(1)
        .create_async()
        .await;

    let tweets_body = r#"{"data":[{"id":"1","text":"hi"}],"meta":{"result_count":1}}"#;
    let tweets = server
        .mock("GET", "/users/42/tweets")
        .match_header("authorization", "Bearer secret")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "tweet.fields".into(),
                "created_at,public_metrics,entities,geo".into(),
            ),
            Matcher::UrlEncoded("max_results".into(), "50".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tweets_body)
        .expect(1)
        .create_async()
        .await;

    let temp_dir = TempDir::new().unwrap();
    let client = TwitterClient::new("secret", &server.url()).unwrap();
    let mut out = Vec::new();

    let saved_path = execute(&client, "EFAparty", temp_dir.path(), &clock(), &mut out)
        .await
        .unwrap();

    lookup.assert_async().await;
    tweets.assert_async().await;

    // File holds exactly the tweets response
    assert_eq!(
        saved_path,
        temp_dir.path().join("user_tweets_output_20240601_090507.json")
    );
    let expected: serde_json::Value = serde_json::from_str(tweets_body).unwrap();
    assert_eq!(load_output(&saved_path).unwrap(), expected);
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);

    // Stdout holds both status codes, the sorted rendering and the save message
    let mut sorted = Vec::new();
    print_sorted(&expected, &mut sorted).unwrap();
    let expected_stdout = format!(
        "200\n200\n{}Saved output to user_tweets_output_20240601_090507.json\n",
        String::from_utf8(sorted).unwrap()
    );
    assert_eq!(String::from_utf8(out).unwrap(), expected_stdout);
}

#[tokio::test]
async fn test_unsorted_response_is_printed_sorted_but_saved_verbatim() {
    let mut server = mockito::Server::new_async().await;

    let _lookup = server
        .mock("GET", "/users/by/username/someone")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data":{"id":"7","username":"someone"}}"#)
        .create_async()
        .await;

    let document = json!({
        "meta": {"result_count": 1, "newest_id": "9", "next_token": "next"},
        "data": [{
            "text": "Grüße aus Köln",
            "id": "9",
            "public_metrics": {"retweet_count": 0, "like_count": 5},
            "created_at": "2024-05-31T12:00:00.000Z"
        }]
    });
    let _tweets = server
        .mock("GET", "/users/7/tweets")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(document.to_string())
        .expect(1)
        .create_async()
        .await;

    let temp_dir = TempDir::new().unwrap();
    let client = TwitterClient::new("secret", &server.url()).unwrap();
    let mut out = Vec::new();

    let saved_path = execute(&client, "someone", temp_dir.path(), &clock(), &mut out)
        .await
        .unwrap();

    let stdout = String::from_utf8(out).unwrap();
    let data_pos = stdout.find("\"data\"").unwrap();
    let meta_pos = stdout.find("\"meta\"").unwrap();
    assert!(data_pos < meta_pos);
    assert!(stdout.find("\"created_at\"").unwrap() < stdout.find("\"text\"").unwrap());
    assert!(stdout.contains("Grüße aus Köln"));

    let saved = fs::read_to_string(&saved_path).unwrap();
    assert!(saved.contains("Grüße aus Köln"));
    assert!(saved.find("\"meta\"").unwrap() < saved.find("\"data\"").unwrap());
    assert!(saved.find("\"text\"").unwrap() < saved.find("\"created_at\"").unwrap());
    assert_eq!(load_output(&saved_path).unwrap(), document);
}
