//! 评测机客户端、轮询器和单用例流程的集成测试
//!
//! 使用 wiremock 模拟评测机 HTTP 接口。

use std::time::Duration;

use oa_code_runner::models::{JudgeStatus, SubmissionToken};
use oa_code_runner::{
    CancelHandle, CancelSignal, CaseFlow, Config, ExecutionError, JudgeClient, JudgeError,
    Language, Outcome, PollPolicy, Poller,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    Config {
        judge_api_base_url: server.uri(),
        judge_api_key: "test-key".to_string(),
        request_timeout_secs: 5,
        poll_interval_ms: 10,
        max_poll_attempts: 5,
        evaluation_timeout_secs: 10,
        ..Config::default()
    }
}

fn status_body(status_id: u32, stdout: Option<&str>) -> serde_json::Value {
    json!({
        "status": {"id": status_id, "description": "status"},
        "stdout": stdout,
        "stderr": null
    })
}

#[tokio::test]
async fn submit_sends_fixed_language_ids() {
    let server = MockServer::start().await;

    for language in Language::ALL {
        Mock::given(method("POST"))
            .and(path("/submissions"))
            .and(body_partial_json(json!({"language_id": language.judge_id()})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"token": format!("tok-{}", language)})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = JudgeClient::new(&test_config(&server)).unwrap();
    for (key, id) in [("cpp", 54), ("python", 71), ("java", 62), ("javascript", 63)] {
        let token = client.submit(key, "source", "").await.unwrap();
        assert_eq!(token.as_str(), format!("tok-{}", key));
        assert_eq!(key.parse::<Language>().unwrap().judge_id(), id);
    }
}

#[tokio::test]
async fn submit_rejects_unknown_language_without_request() {
    let server = MockServer::start().await;
    let client = JudgeClient::new(&test_config(&server)).unwrap();

    let err = client.submit("brainfuck", "+", "").await.unwrap_err();

    assert!(matches!(err, JudgeError::UnsupportedLanguage { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn submit_injects_configured_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .and(header("x-rapidapi-key", "test-key"))
        .and(header("x-rapidapi-host", "judge0-ce.p.rapidapi.com"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = JudgeClient::new(&test_config(&server)).unwrap();
    let token = client.submit("cpp", "int main(){}", "").await.unwrap();
    assert_eq!(token, SubmissionToken::new("abc"));
}

#[tokio::test]
async fn submit_maps_server_error_to_bad_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = JudgeClient::new(&test_config(&server)).unwrap();
    let err = client.submit("python", "print(1)", "").await.unwrap_err();

    assert!(matches!(err, JudgeError::BadStatus { status: 503, .. }));
}

#[tokio::test]
async fn submit_maps_unreachable_judge_to_unavailable() {
    // 先占用一个端口再释放，保证没有服务在监听
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        judge_api_base_url: format!("http://{}", addr),
        request_timeout_secs: 2,
        ..Config::default()
    };
    let client = JudgeClient::new(&config).unwrap();

    let err = client.submit("python", "print(1)", "").await;
    let err = tokio_test::assert_err!(err);

    assert!(matches!(err, JudgeError::Unavailable { .. }), "got {:?}", err);
}

#[tokio::test]
async fn submit_maps_request_timeout_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"token": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = Config {
        request_timeout_secs: 1,
        ..test_config(&server)
    };
    let client = JudgeClient::new(&config).unwrap();

    let err = client.submit("python", "print(1)", "").await.unwrap_err();

    match err {
        JudgeError::Unavailable { source, .. } => assert!(source.is_timeout()),
        other => panic!("expected Unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_submit_reply_fails_sample_evaluation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(ResponseTemplate::new(201).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let flow = CaseFlow::new(JudgeClient::new(&config).unwrap(), &config);

    let err = flow
        .evaluate("python", "print(5)", "", Some("5"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error executing code");
    assert!(matches!(err.cause(), JudgeError::InvalidResponse { .. }));
}

#[tokio::test]
async fn evaluate_stops_when_cancelled_during_submit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"token": "never-used"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = test_config(&server);
    let flow = CaseFlow::new(JudgeClient::new(&config).unwrap(), &config);
    let handle = CancelHandle::new();
    let signal = handle.signal();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(2),
        flow.evaluate_with_cancel("python", "print(5)", "", Some("5"), &signal),
    )
    .await
    .expect("evaluation should stop after cancellation")
    .unwrap_err();

    canceller.await.unwrap();
    assert_eq!(err.to_string(), "Error executing code");
    assert!(matches!(err.cause(), JudgeError::Cancelled));
    assert!(server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .all(|request| request.method.as_str() == "POST"));
}

#[tokio::test]
async fn poller_waits_until_terminal_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/submissions/tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(1, None)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/submissions/tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(2, None)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/submissions/tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(3, Some("42\n"))))
        .mount(&server)
        .await;

    let client = JudgeClient::new(&test_config(&server)).unwrap();
    let poller = Poller::new(client, PollPolicy::new(Duration::from_millis(5), 10));

    let result = poller
        .await_result(&SubmissionToken::new("tok"), &CancelSignal::never())
        .await;
    let result = tokio_test::assert_ok!(result);

    assert_eq!(result.status(), JudgeStatus::Accepted);
    assert_eq!(result.stdout.as_deref(), Some("42\n"));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn poller_gives_up_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/submissions/stuck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(2, None)))
        .expect(3)
        .mount(&server)
        .await;

    let client = JudgeClient::new(&test_config(&server)).unwrap();
    let poller = Poller::new(client, PollPolicy::new(Duration::from_millis(5), 3));

    let err = poller
        .await_result(&SubmissionToken::new("stuck"), &CancelSignal::never())
        .await;
    let err = tokio_test::assert_err!(err);

    match err {
        JudgeError::PollTimeout { token, attempts } => {
            assert_eq!(token.as_str(), "stuck");
            assert_eq!(attempts, 3);
        }
        other => panic!("expected PollTimeout, got {:?}", other),
    }
}

#[tokio::test]
async fn poller_stops_when_cancelled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/submissions/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(1, None)))
        .mount(&server)
        .await;

    let client = JudgeClient::new(&test_config(&server)).unwrap();
    let poller = Poller::new(client, PollPolicy::new(Duration::from_millis(10), 10_000));
    let handle = CancelHandle::new();
    let signal = handle.signal();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        poller.await_result(&SubmissionToken::new("slow"), &signal),
    )
    .await
    .expect("poller should stop after cancellation")
    .unwrap_err();

    canceller.await.unwrap();
    assert!(matches!(err, JudgeError::Cancelled));
}

#[tokio::test]
async fn evaluate_print_five_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .and(body_partial_json(json!({
            "source_code": "print(5)",
            "language_id": 71,
            "stdin": ""
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "e2e"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/submissions/e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(3, Some("5\n"))))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let flow = CaseFlow::new(JudgeClient::new(&config).unwrap(), &config);

    let verdict = flow.evaluate("python", "print(5)", "", Some("5")).await.unwrap();

    assert_eq!(verdict.stdout, "5");
    assert_eq!(verdict.expected_output, "5");
    assert!(verdict.passed);
    assert_eq!(verdict.outcome, Outcome::Passed);
}

#[tokio::test]
async fn evaluate_reports_wrong_answer_as_verdict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "wa"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/submissions/wa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(3, Some("5 "))))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let flow = CaseFlow::new(JudgeClient::new(&config).unwrap(), &config);

    let verdict = flow.evaluate("cpp", "int main(){}", "", Some("6")).await.unwrap();

    assert!(!verdict.passed);
    assert_eq!(verdict.outcome, Outcome::WrongAnswer);
}

#[tokio::test]
async fn evaluate_surfaces_judge_failure_as_execution_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let flow = CaseFlow::new(JudgeClient::new(&config).unwrap(), &config);

    let err: ExecutionError = flow
        .evaluate("python", "print(5)", "", Some("5"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error executing code");
    assert!(matches!(err.cause(), JudgeError::BadStatus { status: 500, .. }));
}

#[tokio::test]
async fn evaluate_respects_deadline() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submissions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "forever"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/submissions/forever"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(2, None)))
        .mount(&server)
        .await;

    let client = JudgeClient::new(&test_config(&server)).unwrap();
    let poller = Poller::new(client.clone(), PollPolicy::new(Duration::from_millis(10), 10_000));
    let flow = CaseFlow::with_parts(client, poller, Duration::from_millis(150));

    let err = flow
        .evaluate("java", "class Main {}", "", Some(""))
        .await
        .unwrap_err();

    assert!(matches!(err.cause(), JudgeError::DeadlineExceeded { .. }));
}
