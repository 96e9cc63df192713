use super::*;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn test_production_runner_streams_stdout() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sh")
        .args(["-c", "echo first; echo second"])
        .build();

    let mut session = runner.spawn(command).await.unwrap();
    drop(session.stdin.take());

    let lines: Vec<String> = session
        .stdout
        .map(|line| line.unwrap())
        .collect()
        .await;
    assert_eq!(lines, vec!["first", "second"]);
    assert!(session.status.await.unwrap().success());
}

#[tokio::test]
async fn test_production_runner_round_trips_stdin() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("cat").build();

    let mut session = runner.spawn(command).await.unwrap();
    let mut stdin = session.stdin.take().unwrap();
    stdin.write_all(b"hello\n").await.unwrap();
    stdin.shutdown().await.unwrap();
    drop(stdin);

    let line = session.stdout.next().await.unwrap().unwrap();
    assert_eq!(line, "hello");
    assert!(session.status.await.unwrap().success());
}

#[tokio::test]
async fn test_production_runner_reports_exit_code() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sh")
        .args(["-c", "echo oops >&2; exit 3"])
        .build();

    let mut session = runner.spawn(command).await.unwrap();
    let err_line = session.stderr.next().await.unwrap().unwrap();
    assert_eq!(err_line, "oops");

    let status = session.status.await.unwrap();
    assert_eq!(status, ExitStatus::Error(3));
    assert_eq!(status.code(), Some(3));
}

#[tokio::test]
async fn test_production_runner_passes_env() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sh")
        .args(["-c", "echo $FLOWRUN_TEST_VAR"])
        .env("FLOWRUN_TEST_VAR", "from-env")
        .build();

    let mut session = runner.spawn(command).await.unwrap();
    assert_eq!(session.stdout.next().await.unwrap().unwrap(), "from-env");
}

#[tokio::test]
async fn test_production_runner_command_not_found() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("nonexistent-command-12345").build();

    let result = runner.spawn(command).await;
    assert!(matches!(result, Err(ProcessError::CommandNotFound(_))));
}

#[tokio::test]
async fn test_mock_runner_scripted_session() {
    let (manager, mut mock) = SubprocessManager::mock();

    mock.expect_command("python3")
        .returns_stdout_line("one")
        .returns_stdout_line("two")
        .returns_stderr_line("warn")
        .returns_exit_code(2)
        .finish();

    let mut session = manager
        .runner()
        .spawn(ProcessCommandBuilder::new("python3").arg("-c").build())
        .await
        .unwrap();

    let mut stdin = session.stdin.take().unwrap();
    stdin.write_all(b"request\n").await.unwrap();

    let lines: Vec<String> = session.stdout.map(|l| l.unwrap()).collect().await;
    assert_eq!(lines, vec!["one", "two"]);
    assert_eq!(session.stderr.next().await.unwrap().unwrap(), "warn");
    assert_eq!(session.status.await.unwrap(), ExitStatus::Error(2));

    assert!(mock.verify_called("python3", 1));
    assert_eq!(mock.stdin_written(), "request\n");
    assert_eq!(mock.get_call_history()[0].args, vec!["-c"]);
}

#[tokio::test]
async fn test_mock_runner_not_found() {
    let mut mock = MockProcessRunner::new();
    mock.expect_command("node").not_found().finish();

    let result = mock.spawn(ProcessCommandBuilder::new("node").build()).await;
    assert!(matches!(result, Err(ProcessError::CommandNotFound(p)) if p == "node"));
}

#[tokio::test]
async fn test_mock_runner_without_expectation() {
    let mock = MockProcessRunner::new();
    let result = mock.spawn(ProcessCommandBuilder::new("ruby").build()).await;
    assert!(matches!(result, Err(ProcessError::MockExpectationNotMet(_))));
}
