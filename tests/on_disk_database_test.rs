//! Agent flow against an on-disk SQLite file
//!
//! Same pipeline as the in-memory tests, but the database lives in a
//! temporary file opened through the same path the CLI uses.

use sqlscout::db::seed;
use sqlscout::{Config, Database, Orchestrator, ScriptedProvider, SessionOutcome};
use tempfile::TempDir;

fn seeded_file_db(dir: &TempDir) -> Database {
    let path = dir.path().join("shop.db");
    let mut db = Database::open(&path).unwrap();
    seed::create_schema(db.connection()).unwrap();
    seed::populate(db.connection()).unwrap();
    db
}

#[tokio::test]
async fn test_answer_from_file_database() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = seeded_file_db(&dir);

    let provider = ScriptedProvider::new(vec![
        "Thought: Count campaigns.\nAction: sql_query\nAction Input: how many campaigns ran?"
            .to_string(),
        "SELECT COUNT(*) FROM campaigns".to_string(),
        "Thought: I now know the final answer\nFinal Answer: Five campaigns ran.".to_string(),
    ]);

    let mut agent = Orchestrator::bootstrap(&Config::default(), db)?;
    let answer = agent.answer(&provider, "how many campaigns ran?").await?;

    let session = answer.session.expect("sql_query ran");
    match session.outcome {
        Some(SessionOutcome::Answered { ref rows, .. }) => {
            assert_eq!(rows.rows[0][0], serde_json::json!(5));
        }
        ref other => panic!("expected Answered, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_failed_attempt_leaves_file_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let db = seeded_file_db(&dir);

    // A write that violates a primary key fails mid-statement; the rollback
    // must leave the persisted file exactly as seeded.
    let provider = ScriptedProvider::new(vec![
        "Thought: Insert it.\nAction: sql_query\nAction Input: register member 1 again".to_string(),
        "INSERT INTO members (member_id, member_name, email, join_date, member_level, gender, birth_year, country, is_active) \
         VALUES (1, 'Dup', 'dup@example.com', '2023-01-01', 'Bronze', 'Unknown', 1990, 'USA', 1)"
            .to_string(),
        "SELECT COUNT(*) FROM members".to_string(),
        "Thought: The insert failed but the count worked.\nFinal Answer: Still 40 members."
            .to_string(),
    ]);

    let mut agent = Orchestrator::bootstrap(&Config::default(), db)?;
    let answer = agent.answer(&provider, "register member 1 again").await?;

    let session = answer.session.expect("sql_query ran");
    assert_eq!(session.attempts.len(), 2);
    match session.outcome {
        Some(SessionOutcome::Answered { ref rows, .. }) => {
            assert_eq!(rows.rows[0][0], serde_json::json!(40));
        }
        ref other => panic!("expected Answered, got {:?}", other),
    }

    // Reopen the file independently and confirm nothing stuck
    let mut reopened = Database::open(dir.path().join("shop.db"))?;
    let count = reopened.execute_query("SELECT COUNT(*) FROM members")?;
    assert_eq!(count.rows[0][0], serde_json::json!(40));
    Ok(())
}
