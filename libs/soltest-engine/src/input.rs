// Input source selection for a test session

use soltest_common::types::Question;
use std::path::Path;
use tracing::debug;

/// Local override file, read verbatim as stdin when present
pub const IN_TXT: &str = "in.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Contents of `in.txt`
    FileInput(String),
    /// Forward the terminal; `interactive` when the question asks for it
    Stdin { interactive: bool },
    /// Drive the fetched question's sample tests
    Samples,
}

impl InputMode {
    pub fn describe(&self) -> &'static str {
        match self {
            InputMode::FileInput(_) => "'in.txt'",
            InputMode::Stdin { interactive: true } => "Stdin (Interactive Question)",
            InputMode::Stdin { interactive: false } => "Stdin",
            InputMode::Samples => "Sample Test Cases",
        }
    }
}

/// Priority: `in.txt` > interactive question > sample tests > bare stdin
pub fn select_input_mode(in_txt: Option<String>, question: Option<&Question>) -> InputMode {
    match (in_txt, question) {
        (Some(contents), _) => InputMode::FileInput(contents),
        (None, Some(question)) if question.interactive => InputMode::Stdin { interactive: true },
        (None, Some(_)) => InputMode::Samples,
        (None, None) => InputMode::Stdin { interactive: false },
    }
}

/// Read `in.txt` from `dir`, `None` when it is missing or unreadable
pub async fn read_in_txt(dir: &Path) -> Option<String> {
    let path = dir.join(IN_TXT);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No input override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(interactive: bool) -> Question {
        serde_json::from_value(serde_json::json!({
            "name": "A",
            "interactive": interactive,
            "tests": [{"input": "1", "output": "1"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_file_beats_samples() {
        let q = question(false);
        assert_eq!(
            select_input_mode(Some("5\n".to_string()), Some(&q)),
            InputMode::FileInput("5\n".to_string())
        );
    }

    #[test]
    fn test_file_beats_interactive() {
        let q = question(true);
        assert_eq!(
            select_input_mode(Some(String::new()), Some(&q)),
            InputMode::FileInput(String::new())
        );
    }

    #[test]
    fn test_file_without_question() {
        assert_eq!(
            select_input_mode(Some("x".to_string()), None),
            InputMode::FileInput("x".to_string())
        );
    }

    #[test]
    fn test_interactive_question_uses_stdin() {
        let q = question(true);
        assert_eq!(
            select_input_mode(None, Some(&q)),
            InputMode::Stdin { interactive: true }
        );
    }

    #[test]
    fn test_question_uses_samples() {
        let q = question(false);
        assert_eq!(select_input_mode(None, Some(&q)), InputMode::Samples);
    }

    #[test]
    fn test_nothing_uses_stdin() {
        assert_eq!(
            select_input_mode(None, None),
            InputMode::Stdin { interactive: false }
        );
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(InputMode::FileInput(String::new()).describe(), "'in.txt'");
        assert_eq!(InputMode::Samples.describe(), "Sample Test Cases");
        assert_eq!(
            InputMode::Stdin { interactive: true }.describe(),
            "Stdin (Interactive Question)"
        );
    }

    #[tokio::test]
    async fn test_read_in_txt() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_in_txt(dir.path()).await, None);

        std::fs::write(dir.path().join(IN_TXT), "3\n1 2 3\n").unwrap();
        assert_eq!(read_in_txt(dir.path()).await.as_deref(), Some("3\n1 2 3\n"));
    }
}
