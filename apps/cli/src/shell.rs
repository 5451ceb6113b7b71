//! Interactive shell.
//!
//! ```text
//! ┌──────────────┐  PIN ok   ┌──────────────┐
//! │   Locked     │ ────────► │   fiado>     │ ──► router::execute
//! │  PIN (****)  │ ◄──────── │   prompt     │
//! └──────────────┘   sair    └──────────────┘
//!        │ Esc / Ctrl-C             │ fechar / Esc / Ctrl-C
//!        ▼                          ▼
//!       exit                       exit
//! ```
//!
//! Each line is split like a shell would (double or single quotes group
//! words) and parsed with the same clap definitions as the one-shot
//! commands.

use clap::Parser;
use tracing::{debug, info};

use crate::cli::{Command, ShellCommand, ShellLine};
use crate::commands::auth;
use crate::error::ApiError;
use crate::prompt;
use crate::router::{self, Flags};
use crate::state::AppState;

const PROMPT: &str = "fiado>";

/// Runs until `fechar`, Esc, or Ctrl-C.
pub async fn run(app: &AppState, defaults: Flags) -> Result<(), ApiError> {
    println!("{}", app.config.store_name);
    println!("Digite `help` para ver os comandos.");

    loop {
        if !app.session.is_authenticated() && !unlock(app)? {
            break;
        }

        let Some(line) = prompt::read_line(PROMPT)? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let words = match split_words(line) {
            Ok(words) => words,
            Err(e) => {
                router::report_error(&e, defaults.json);
                continue;
            }
        };

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Help and usage errors both go through clap's own printer
                let _ = e.print();
                continue;
            }
        };

        let flags = Flags {
            yes: defaults.yes || parsed.yes,
            json: defaults.json || parsed.json,
        };

        match parsed.command {
            ShellCommand::Fechar => break,
            ShellCommand::Sair => {
                auth::logout(&app.session);
                println!("Sessão encerrada.");
            }
            ShellCommand::App(Command::Shell) => println!("Você já está no shell."),
            ShellCommand::App(command) => {
                debug!(?command, "shell command");
                if let Err(e) = router::execute(app, command, flags).await {
                    router::report_error(&e, flags.json);
                }
            }
        }
    }

    auth::logout(&app.session);
    info!("Shell closed");
    Ok(())
}

/// Asks for the PIN until it matches. `false` when the operator cancels.
fn unlock(app: &AppState) -> Result<bool, ApiError> {
    loop {
        let Some(entered) = prompt::read_pin("PIN:")? else {
            return Ok(false);
        };
        match auth::login(&app.config, &app.session, entered.trim()) {
            Ok(()) => {
                println!("Acesso liberado.");
                return Ok(true);
            }
            Err(e) => eprintln!("{}", e.message),
        }
    }
}

/// Splits a line into words. Quotes group words and are removed; a
/// quote left open is an error.
pub fn split_words(line: &str) -> Result<Vec<String>, ApiError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ApiError::validation("Aspas não fechadas"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_words() {
        assert_eq!(
            split_words("clientes pagar c1 12,50").unwrap(),
            ["clientes", "pagar", "c1", "12,50"]
        );
        assert!(split_words("   ").unwrap().is_empty());
    }

    #[test]
    fn test_split_quoted_words() {
        assert_eq!(
            split_words(r#"clientes novo "Ana Paula" -t '+55 11 9999'"#).unwrap(),
            ["clientes", "novo", "Ana Paula", "-t", "+55 11 9999"]
        );
        assert_eq!(split_words(r#"estoque listar --busca """#).unwrap(), ["estoque", "listar", "--busca", ""]);
        assert_eq!(split_words(r#"nome"Doce de Leite""#).unwrap(), ["nomeDoce de Leite"]);
    }

    #[test]
    fn test_split_unclosed_quote() {
        let err = split_words(r#"clientes novo "Ana"#).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[test]
    fn test_split_words_parse_as_shell_line() {
        let words = split_words(r#"estoque novo --nome "Café 500g" --preco 18,90"#).unwrap();
        let line = ShellLine::try_parse_from(words).unwrap();
        assert!(matches!(line.command, ShellCommand::App(Command::Estoque { .. })));
    }
}
