//! Terminal prompts: command lines, the masked PIN, and s/n confirmations.
//!
//! All three go through `inquire`. Esc and Ctrl-C come back as `None`, the
//! same as end of input: the shell closes, the PIN is "não informado", a
//! confirmation is declined. Without a terminal the prompts fail; `--pin`
//! and `--yes` cover that case.

use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};

use crate::error::ApiError;

/// Answers read as "yes" (case-insensitive).
const YES: [&str; 4] = ["s", "sim", "y", "yes"];

/// Answers read as "no" (case-insensitive).
const NO: [&str; 4] = ["n", "nao", "não", "no"];

/// Reads one command line. `None` when the operator cancels.
pub fn read_line(message: &str) -> Result<Option<String>, ApiError> {
    answered(Text::new(message).prompt())
}

/// Reads the PIN with every digit masked. `None` when the operator cancels.
pub fn read_pin(message: &str) -> Result<Option<String>, ApiError> {
    answered(
        Password::new(message)
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt(),
    )
}

/// Asks a s/n question. Enter, Esc and Ctrl-C all mean no.
pub fn confirm(question: &str) -> Result<bool, ApiError> {
    let answer = Confirm::new(question)
        .with_default(false)
        .with_parser(&parse_answer)
        .with_default_value_formatter(&|default| (if default { "S/n" } else { "s/N" }).to_string())
        .with_formatter(&|yes| (if yes { "sim" } else { "não" }).to_string())
        .with_error_message("Responda s ou n")
        .prompt();

    Ok(answered(answer)?.unwrap_or(false))
}

fn parse_answer(input: &str) -> Result<bool, ()> {
    let input = input.trim().to_lowercase();
    if YES.contains(&input.as_str()) {
        Ok(true)
    } else if NO.contains(&input.as_str()) {
        Ok(false)
    } else {
        Err(())
    }
}

/// Cancel and interrupt become `None`; anything else is an error.
fn answered<T>(result: Result<T, InquireError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_answer() {
        for (answer, expected) in [("s", true), ("SIM", true), (" y ", true), ("n", false), ("Não", false)] {
            assert_eq!(parse_answer(answer), Ok(expected), "{:?}", answer);
        }
        assert_eq!(parse_answer("talvez"), Err(()));
        assert_eq!(parse_answer(""), Err(()));
    }

    #[test]
    fn test_cancel_and_interrupt_are_no_answer() {
        assert_eq!(answered(Ok("1540".to_string())).unwrap().as_deref(), Some("1540"));
        assert_eq!(answered::<String>(Err(InquireError::OperationCanceled)).unwrap(), None);
        assert_eq!(answered::<bool>(Err(InquireError::OperationInterrupted)).unwrap(), None);
    }

    #[test]
    fn test_missing_terminal_is_an_error() {
        let err = answered::<String>(Err(InquireError::NotTTY)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Io);
        assert!(err.message.contains("--pin"));
    }
}
