//! API Integration Tests
//!
//! These tests require a running PostgreSQL instance and `DATABASE_URL`;
//! they skip themselves otherwise. Migrations run at server start.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use integration_tests::{
    assert_json, assert_status, check_test_env, error_code, fixtures::*, TestServer,
};
use reqwest::StatusCode;

/// Give fire-and-forget writes time to land
async fn settle_writes() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

async fn create_poll(server: &TestServer, owner: &str, request: &CreatePollRequest) -> PollBody {
    let token = server.token_for(owner).unwrap();
    let response = server.post_auth("/api/polls", &token, request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Poll Tests
// ============================================================================

#[tokio::test]
async fn test_create_poll_requires_auth() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server
        .post("/api/polls", &CreatePollRequest::unique())
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_create_and_fetch_poll() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let owner = unique_user();
    let poll = create_poll(&server, &owner, &CreatePollRequest::unique()).await;

    assert_eq!(poll.owner_id, owner);
    assert!(poll.slug.starts_with("integration-poll-"));
    let share_url = poll.share_url.unwrap();
    assert!(share_url.ends_with(&format!("/polls/{}", poll.slug)));

    let fetched: PollBody = assert_json(
        server.get(&format!("/api/polls/{}", poll.slug)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(fetched.id, poll.id);

    let statements: Vec<StatementBody> = assert_json(
        server
            .get(&format!("/api/polls/{}/statements", poll.slug))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let texts: Vec<_> = statements.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, ["First statement", "Second statement", "Third statement"]);
    assert_eq!(statements[0].author_id.as_deref(), Some(owner.as_str()));
}

#[tokio::test]
async fn test_unknown_slug() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/polls/does-not-exist-anywhere").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(response).await.unwrap(), "UNKNOWN_POLL");
}

#[tokio::test]
async fn test_list_public_polls() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let owner = unique_user();
    let public = create_poll(&server, &owner, &CreatePollRequest::unique()).await;
    let private = create_poll(&server, &owner, &CreatePollRequest::private()).await;

    let listed: Vec<serde_json::Value> =
        assert_json(server.get("/api/polls").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    let slugs: Vec<_> = listed.iter().filter_map(|p| p["slug"].as_str()).collect();

    assert!(slugs.contains(&public.slug.as_str()));
    assert!(!slugs.contains(&private.slug.as_str()));

    let entry = listed.iter().find(|p| p["slug"] == public.slug.as_str()).unwrap();
    assert_eq!(entry["statement_count"], 3);
}

#[tokio::test]
async fn test_private_poll_is_admin_only() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let owner = unique_user();
    let poll = create_poll(&server, &owner, &CreatePollRequest::private()).await;
    let path = format!("/api/polls/{}", poll.slug);

    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let stranger = server.token_for(&unique_user()).unwrap();
    let response = server.get_auth(&path, &stranger).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let token = server.token_for(&owner).unwrap();
    let response = server.get_auth(&path, &token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_embed_lookup() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let polis_id = format!("embed-{}", unique_suffix());
    let request = CreatePollRequest {
        polis_id: Some(polis_id.clone()),
        ..CreatePollRequest::unique()
    };
    let poll = create_poll(&server, &unique_user(), &request).await;

    let embed: serde_json::Value = assert_json(
        server.get(&format!("/api/embed/{polis_id}")).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(embed["poll"]["id"], poll.id);
    assert_eq!(embed["statements"].as_array().map(Vec::len), Some(3));
}

// ============================================================================
// Voting Session Tests
// ============================================================================

#[tokio::test]
async fn test_swipe_through_poll() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let poll = create_poll(&server, &unique_user(), &CreatePollRequest::unique()).await;
    let session_path = format!("/api/polls/{}/session", poll.slug);
    let react_path = format!("{session_path}/react");

    let session: SessionBody = assert_json(
        server.post_empty(&session_path).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(session.poll_id, poll.id);
    assert_eq!(session.remaining, 3);
    assert!(!session.exhausted);

    // Newest statement on top
    let mut active = session.active.unwrap();
    assert_eq!(active.text, "Third statement");

    let mut valences = ["agree", "disagree", "skip"].into_iter();
    loop {
        let valence = valences.next().unwrap();
        let step: ReactBody = assert_json(
            server.post(&react_path, &react(active.id, valence)).await.unwrap(),
            StatusCode::OK,
        )
        .await
        .unwrap();

        match step.next {
            Some(next) => {
                assert!(!step.exhausted);
                active = next;
            }
            None => {
                assert!(step.exhausted);
                assert_eq!(step.remaining, 0);
                break;
            }
        }
    }

    settle_writes().await;

    let responses: Vec<ResponseBody> = assert_json(
        server
            .get(&format!("/api/polls/{}/responses", poll.id))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|r| r.user_id.is_none()));

    // A restarted session only holds unanswered statements
    let session: SessionBody = assert_json(
        server.post_empty(&session_path).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert!(session.exhausted);
    assert!(session.active.is_none());
}

#[tokio::test]
async fn test_react_to_wrong_statement() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let poll = create_poll(&server, &unique_user(), &CreatePollRequest::unique()).await;
    let session_path = format!("/api/polls/{}/session", poll.slug);

    let session: SessionBody = assert_json(
        server.post_empty(&session_path).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let top = session.active.unwrap().id;

    let response = server
        .post(&format!("{session_path}/react"), &react(top - 1, "agree"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(response).await.unwrap(), "NOT_ACTIVE_STATEMENT");

    let current: SessionBody = assert_json(server.get(&session_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(current.remaining, 3);
}

#[tokio::test]
async fn test_session_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let poll = create_poll(&server, &unique_user(), &CreatePollRequest::unique()).await;
    let session_path = format!("/api/polls/{}/session", poll.slug);

    let response = server.get(&session_path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    server.post_empty(&session_path).await.unwrap();

    let failures: Vec<serde_json::Value> = assert_json(
        server.get(&format!("{session_path}/failures")).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(failures.is_empty());

    let resurfaced: SessionBody = assert_json(
        server
            .post_empty(&format!("{session_path}/resurface"))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(resurfaced.remaining, 3);

    let response = server.delete(&session_path).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    let response = server.get(&session_path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_new_statement_joins_authors_session() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let poll = create_poll(&server, &unique_user(), &CreatePollRequest::unique()).await;
    let session_path = format!("/api/polls/{}/session", poll.slug);
    server.post_empty(&session_path).await.unwrap();

    let created: StatementBody = assert_json(
        server
            .post(
                &format!("/api/polls/{}/statements", poll.slug),
                &serde_json::json!({ "text": "My own take" }),
            )
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(created.poll_id, poll.id);
    assert!(created.author_id.is_none());

    let session: SessionBody = assert_json(server.get(&session_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(session.remaining, 4);
    assert_eq!(session.active.map(|s| s.id), Some(created.id));
}

// ============================================================================
// Responses & Results Tests
// ============================================================================

#[tokio::test]
async fn test_responses_are_scoped_per_voter() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let owner = unique_user();
    let poll = create_poll(&server, &owner, &CreatePollRequest::unique()).await;
    let session_path = server.url(&format!("/api/polls/{}/session", poll.slug));

    // Two anonymous voters, each agreeing with the top statement
    for _ in 0..2 {
        let client = server.anonymous_client().unwrap();
        let session: SessionBody = client
            .post(&session_path)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let top = session.active.unwrap().id;
        let response = client
            .post(format!("{session_path}/react"))
            .json(&react(top, "agree"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    settle_writes().await;

    let responses_path = format!("/api/polls/{}/responses", poll.id);
    let mine: Vec<ResponseBody> = assert_json(server.get(&responses_path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(mine.is_empty());

    let all: Vec<ResponseBody> = assert_json(
        server.get(&format!("{responses_path}?all")).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|r| r.valence == "agree"));

    let results: ResultsBody = assert_json(
        server
            .get(&format!("/api/polls/{}/results", poll.slug))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(results.respondent_count, 2);
    let third = results
        .statements
        .iter()
        .find(|s| s.text == "Third statement")
        .unwrap();
    assert_eq!((third.agree, third.disagree, third.skip, third.total), (2, 0, 0, 2));
}

// ============================================================================
// Moderation Tests
// ============================================================================

#[tokio::test]
async fn test_flag_and_delete_statement() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let owner = unique_user();
    let owner_token = server.token_for(&owner).unwrap();
    let poll = create_poll(&server, &owner, &CreatePollRequest::unique()).await;

    let statements: Vec<StatementBody> = assert_json(
        server
            .get(&format!("/api/polls/{}/statements", poll.slug))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let target = statements[0].id;
    let flags_path = format!("/api/statements/{target}/flags");

    let response = server
        .post(&flags_path, &serde_json::json!({ "reason": "spam" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.get(&flags_path).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let flags: Vec<serde_json::Value> =
        assert_json(server.get_auth(&flags_path, &owner_token).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(flags.len(), 1);

    let cleared: serde_json::Value = assert_json(
        server.delete_auth(&flags_path, &owner_token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(cleared["deleted"], 1);

    let stranger = server.token_for(&unique_user()).unwrap();
    let statement_path = format!("/api/statements/{target}");
    let response = server.delete_auth(&statement_path, &stranger).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.delete_auth(&statement_path, &owner_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

// ============================================================================
// Author Tests
// ============================================================================

#[tokio::test]
async fn test_author_card() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.unwrap();
    let user = unique_user();
    let token = server.token_for(&user).unwrap();

    let card: serde_json::Value = assert_json(
        server
            .put_auth(
                "/api/authors/@me",
                &token,
                &serde_json::json!({ "name": "Ada", "avatar_url": "https://img.example/ada.png" }),
            )
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(card["name"], "Ada");

    let fetched: serde_json::Value = assert_json(
        server.get(&format!("/api/authors/{user}")).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(fetched["avatar_url"], "https://img.example/ada.png");
}
