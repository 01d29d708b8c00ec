//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Binary with an isolated HOME so no user config leaks into tests.
fn civiquiz(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("civiquiz").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("CIVIQUIZ_API_URL")
        .env_remove("CIVIQUIZ_CHAT_URL")
        .env_remove("CIVIQUIZ_USER");
    cmd
}

#[test]
fn validate_deck_directory() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .arg("validate")
        .arg("--decks")
        .arg("../../decks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Political System (scenario, 5 items)"))
        .stdout(predicate::str::contains("Leaders of Nepal (flashcard, 7 items)"))
        .stdout(predicate::str::contains("Rights and Duties (sorting, 6 items)"))
        .stdout(predicate::str::contains("All decks valid"));
}

#[test]
fn validate_reports_warnings() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let deck = dir.path().join("broken.toml");
    std::fs::write(
        &deck,
        r#"
[deck]
name = "Broken"

[[questions]]
id = 1
prompt = "Pick one"
options = ["Only"]
answer = 2
"#,
    )
    .unwrap();

    civiquiz(&home)
        .arg("validate")
        .arg("--decks")
        .arg(&deck)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] WARNING"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .arg("validate")
        .arg("--decks")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    civiquiz(&home)
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created civiquiz.toml"))
        .stdout(predicate::str::contains("Created decks/example.toml"));

    assert!(dir.path().join("civiquiz.toml").exists());
    assert!(dir.path().join("decks/example.toml").exists());

    // The generated deck is playable.
    civiquiz(&home)
        .current_dir(dir.path())
        .args(["play", "--deck", "decks", "--category", "Nepal Basics", "--no-shuffle"])
        .write_stdin("2\n2\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3/3 (100%)"));

    // Without --deck the configured decks_dir is used.
    civiquiz(&home)
        .current_dir(dir.path())
        .args(["play", "--category", "Nepal Basics", "--no-shuffle"])
        .write_stdin("1\n2\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 2/3 (67%)"));
}

#[test]
fn init_skips_existing() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    // First init
    civiquiz(&home)
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    civiquiz(&home)
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn play_scenario_deck() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .args([
            "play",
            "--deck",
            "../../decks/political-system.toml",
            "--category",
            "Political System",
            "--no-shuffle",
        ])
        .write_stdin("1\n2\n1\n1\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/5 [medium]"))
        .stdout(predicate::str::contains("Wrong. The answer is: Invite them for public dialogue"))
        .stdout(predicate::str::contains("Note: Constitutional bodies protect"))
        .stdout(predicate::str::contains("Score: 4/5 (80%)"))
        .stdout(predicate::str::contains("Excellent!"));
}

#[test]
fn play_again_replays_the_deck() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .args([
            "play",
            "--deck",
            "../../decks/political-system.toml",
            "--category",
            "Political System",
            "--no-shuffle",
        ])
        .write_stdin("2\n2\n2\n2\n2\ny\n1\n1\n1\n1\n1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0/5 (0%)"))
        .stdout(predicate::str::contains("Score: 5/5 (100%)"))
        .stdout(predicate::str::contains("Play again? [y/N]"));
}

#[test]
fn play_flashcards_with_seed() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .args([
            "play",
            "--deck",
            "../../decks",
            "--category",
            "leaders of nepal",
            "--seed",
            "7",
        ])
        .write_stdin("1\n1\n1\n1\n1\n1\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 7/7"))
        .stdout(predicate::str::contains("Score: "));
}

#[test]
fn play_unknown_category() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .args(["play", "--deck", "../../decks", "--category", "Geography"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category: Geography"));
}

#[test]
fn play_stops_when_input_ends() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .args([
            "play",
            "--deck",
            "../../decks/political-system.toml",
            "--category",
            "Political System",
        ])
        .write_stdin("1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input ended"));
}

#[test]
fn sort_deck() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .args([
            "sort",
            "--deck",
            "../../decks/rights-and-duties.toml",
            "--seed",
            "1",
        ])
        .write_stdin("1\n1\n1\n1\n1\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sorted correctly: 3/6 (50%)"))
        .stdout(predicate::str::contains("belongs in Citizen Duty"));
}

#[test]
fn sort_rejects_question_decks() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .args(["sort", "--deck", "../../decks/leaders.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a sorting deck"));
}

#[test]
fn categories_from_decks() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .args(["categories", "--deck", "../../decks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Political System"))
        .stdout(predicate::str::contains("Leaders of Nepal"));
}

#[tokio::test(flavor = "multi_thread")]
async fn play_remote_and_submit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/quize/categories/Constitution/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 3,
            "name": "Constitution",
            "questions": [{
                "id": 21,
                "question_text": "In which year was the current constitution promulgated?",
                "options": [
                    {"id": 1, "option_text": "2015"},
                    {"id": 2, "option_text": "2007"}
                ],
                "correct_answer": "2015"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/quize/quiz/submit/"))
        .and(body_partial_json(serde_json::json!({
            "user_name": "Sita",
            "category": 3,
            "answers": [{"question_id": 21, "selected_answer": "2015"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "quiz_id": 5, "score": 1, "total_questions": 1, "percentage": 100.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .env("CIVIQUIZ_API_URL", format!("{}/api/quize/", server.uri()))
        .args([
            "play",
            "--category",
            "Constitution",
            "--no-shuffle",
            "--submit",
            "--name",
            "Sita",
        ])
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1/1 (100%)"))
        .stdout(predicate::str::contains("Results submitted (quiz #5)."));
}

#[tokio::test(flavor = "multi_thread")]
async fn chat_prints_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .and(body_partial_json(serde_json::json!({"question": "What is Article 16?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "answer": "Every person has the right to live with dignity.",
            "sources": [{"source": "docs\\constitution.pdf", "content": "Article 16: Right to live with dignity"}],
            "model_info": {"llm": "llama3", "sources_found": 1},
            "similar_documents": []
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .env("CIVIQUIZ_CHAT_URL", format!("{}/api", server.uri()))
        .args(["chat", "What is Article 16?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("right to live with dignity"))
        .stdout(predicate::str::contains("Sources (1):"))
        .stdout(predicate::str::contains("constitution.pdf: Article 16"))
        .stdout(predicate::str::contains("Model: llama3 (sources: 1)"));
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Civic education quizzes"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    civiquiz(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("civiquiz"));
}
