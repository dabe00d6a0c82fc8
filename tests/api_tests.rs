//! API integration tests
//!
//! These run against a live server with a migrated database:
//!
//!   DATABASE_URL=... cargo run &
//!   DATABASE_URL=... cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

async fn create_user(client: &Client, name: &str) -> Uuid {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": name, "role": "STUDENT" }))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse user");
    body["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("No user id in response")
}

async fn create_book(client: &Client, title: &str, total_copies: i32) -> Uuid {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "total_copies": total_copies
        }))
        .send()
        .await
        .expect("Failed to create book");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book");
    body["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("No book id in response")
}

async fn checkout(client: &Client, book_id: Uuid, user_id: Uuid) -> (u16, Value) {
    let response = client
        .post(format!("{}/books/{}/checkout", BASE_URL, book_id))
        .json(&json!({ "user_id": user_id }))
        .send()
        .await
        .expect("Failed to send checkout request");

    let status = response.status().as_u16();
    let body: Value = response.json().await.expect("Failed to parse checkout");
    (status, body)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_and_list_books() {
    let client = Client::new();
    let book_id = create_book(&client, "The Trial", 3).await;

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to list books");

    assert!(response.status().is_success());
    let books: Value = response.json().await.expect("Failed to parse books");
    let found = books
        .as_array()
        .expect("Books response is not an array")
        .iter()
        .any(|b| b["id"] == json!(book_id) && b["total_copies"] == 3);
    assert!(found, "Created book missing from listing");
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_empty_title() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": "", "author": "A", "total_copies": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_add_copy_to_unknown_book() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_checkout_unknown_user() {
    let client = Client::new();
    let book_id = create_book(&client, "Molloy", 1).await;

    let (status, body) = checkout(&client, book_id, Uuid::new_v4()).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
#[ignore]
async fn test_checkout_queue_and_promotion() {
    let client = Client::new();
    let book_id = create_book(&client, "Pale Fire", 1).await;
    let user_a = create_user(&client, "Ada").await;
    let user_b = create_user(&client, "Ben").await;

    // A takes the only copy.
    let (status, body) = checkout(&client, book_id, user_a).await;
    assert_eq!(status, 201);
    assert_eq!(body["type"], "checkout");
    let checkout_id = body["checkout"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("No checkout id");

    // B falls to the queue at position 1.
    let (status, body) = checkout(&client, book_id, user_b).await;
    assert_eq!(status, 201);
    assert_eq!(body["type"], "reservation");
    assert_eq!(body["reservation"]["queue_position"], 1);

    // B asking again is a duplicate, not a second entry.
    let (status, body) = checkout(&client, book_id, user_b).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "DuplicateReservation");

    // A returns; B must be promoted within the same operation.
    let response = client
        .post(format!("{}/checkouts/{}/return", BASE_URL, checkout_id))
        .send()
        .await
        .expect("Failed to return");
    assert_eq!(response.status(), 200);
    let returned: Value = response.json().await.expect("Failed to parse return");
    assert!(returned["returned_at"].is_string());
    assert_eq!(returned["fine_amount"], 0);

    // Queue is drained.
    let response = client
        .get(format!("{}/books/{}/reservations", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to list reservations");
    let queue: Value = response.json().await.expect("Failed to parse queue");
    assert_eq!(queue.as_array().map(Vec::len), Some(0));

    // B now holds an open checkout on the same copy.
    let response = client
        .get(format!("{}/users/{}/checkouts", BASE_URL, user_b))
        .send()
        .await
        .expect("Failed to list checkouts");
    let checkouts: Value = response.json().await.expect("Failed to parse checkouts");
    let open: Vec<&Value> = checkouts
        .as_array()
        .expect("Checkouts response is not an array")
        .iter()
        .filter(|c| c["returned_at"].is_null())
        .collect();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["book_copy_id"], returned["book_copy_id"]);
}

#[tokio::test]
#[ignore]
async fn test_return_is_idempotent() {
    let client = Client::new();
    let book_id = create_book(&client, "Watt", 1).await;
    let user = create_user(&client, "Cora").await;

    let (_, body) = checkout(&client, book_id, user).await;
    let checkout_id = body["checkout"]["id"].as_str().expect("No checkout id").to_string();

    let response = client
        .post(format!("{}/checkouts/{}/return", BASE_URL, checkout_id))
        .send()
        .await
        .expect("Failed to return");
    assert_eq!(response.status(), 200);

    // Second return of the same loan is a conflict, not a second completion.
    let response = client
        .post(format!("{}/checkouts/{}/return", BASE_URL, checkout_id))
        .send()
        .await
        .expect("Failed to send second return");
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "AlreadyReturned");
}

#[tokio::test]
#[ignore]
async fn test_return_unknown_checkout() {
    let client = Client::new();

    let response = client
        .post(format!("{}/checkouts/{}/return", BASE_URL, Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

/// Concurrency stress scenario: N users race for a book with fewer copies.
/// At most `copies` requests may win a checkout; everyone else must land in
/// the queue with strictly distinct positions. Verified both through the API
/// and directly against the database.
#[tokio::test]
#[ignore]
async fn test_concurrent_checkouts_never_double_allocate() {
    const USERS: usize = 6;
    const COPIES: i32 = 2;

    let client = Client::new();
    let book_id = create_book(&client, "The Castle", COPIES).await;

    let mut user_ids = Vec::new();
    for i in 0..USERS {
        user_ids.push(create_user(&client, &format!("racer-{}", i)).await);
    }

    let mut handles = Vec::new();
    for user_id in user_ids {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            checkout(&client, book_id, user_id).await
        }));
    }

    let mut checkouts = 0;
    let mut positions = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.expect("checkout task panicked");
        assert_eq!(status, 201);
        match body["type"].as_str() {
            Some("checkout") => checkouts += 1,
            Some("reservation") => {
                positions.push(body["reservation"]["queue_position"].as_i64().unwrap())
            }
            other => panic!("unexpected outcome type: {:?}", other),
        }
    }

    assert_eq!(checkouts, COPIES as usize);
    assert_eq!(positions.len(), USERS - COPIES as usize);
    positions.sort_unstable();
    let expected: Vec<i64> = (1..=positions.len() as i64).collect();
    assert_eq!(positions, expected, "queue positions must be gap-free and collision-free");

    // Last line of defense check, straight against the store: no copy may
    // carry more than one open checkout.
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for the concurrency test");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let duplicates: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM (
            SELECT book_copy_id FROM checkouts
            WHERE returned_at IS NULL
            GROUP BY book_copy_id
            HAVING COUNT(*) > 1
        ) d
        "#,
    )
    .fetch_one(&pool)
    .await
    .expect("Failed to query duplicate open checkouts");

    assert_eq!(duplicates, 0, "found copies with more than one open checkout");
}
