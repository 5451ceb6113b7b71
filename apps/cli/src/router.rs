//! Routes a parsed [`Command`] to its command function and prints the
//! result.
//!
//! Shared by one-shot invocations and the shell. The session must already
//! be open; destructive commands ask for confirmation unless `--yes`.

use std::future::Future;

use chrono::Local;
use serde::Serialize;

use crate::cli::{CatalogAction, Command, CustomerAction, SettingsAction, StockAction};
use crate::commands::{auth, customer, dashboard, insight, product, settings};
use crate::error::ApiError;
use crate::prompt;
use crate::state::AppState;
use crate::view;

/// Output and confirmation flags for one command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub yes: bool,
    pub json: bool,
}

/// Runs one command.
pub async fn execute(app: &AppState, command: Command, flags: Flags) -> Result<(), ApiError> {
    auth::require_session(&app.session)?;

    let (db, shop, config) = (&app.db, &app.shop, &app.config);

    match command {
        Command::Painel => {
            let report = dashboard::dashboard(shop, config).await?;
            emit(flags, &report, view::dashboard)
        }

        Command::Catalogo { action } => match action {
            CatalogAction::Listar { busca, categoria } => {
                let list = product::list_catalog(shop, &busca, &categoria).await?;
                emit(flags, &list, |l| view::catalog(l))
            }
            CatalogAction::Categorias => {
                let list = product::list_categories(shop).await;
                emit(flags, &list, |l| view::categories(l))
            }
            CatalogAction::Vender { id } => {
                let sale = product::sell_product(db, shop, &id).await?;
                emit(flags, &sale, view::sale)
            }
        },

        Command::Estoque { action } => match action {
            StockAction::Listar { busca } => {
                let list = product::search_inventory(shop, &busca).await?;
                emit(flags, &list, |l| view::inventory(l))
            }
            StockAction::Novo(fields) => {
                let created = product::add_product(db, shop, fields.into()).await?;
                emit(flags, &created, view::product_detail)
            }
            StockAction::Editar { id, fields } => {
                let updated = product::update_product(db, shop, &id, fields.into()).await?;
                emit(flags, &updated, view::product_detail)
            }
            StockAction::Excluir { id } => {
                let id = id.as_str();
                let removed =
                    with_confirmation(flags, move |ok| product::delete_product(db, shop, id, ok))
                        .await?;
                match removed {
                    Some(p) => emit(flags, &p, |p| format!("Produto excluído: {}", p.name)),
                    None => cancelled(),
                }
            }
        },

        Command::Clientes { action } => match action {
            CustomerAction::Listar { busca } => {
                let list = customer::list_customers(shop, &busca).await?;
                emit(flags, &list, |l| view::customers(l))
            }
            CustomerAction::Novo { nome, telefone } => {
                let created = customer::register_customer(db, shop, &nome, &telefone).await?;
                emit(flags, &created, view::customer_created)
            }
            CustomerAction::Pagar { id, valor } => {
                let response = customer::record_payment(db, shop, &id, &valor).await?;
                emit(flags, &response, view::ledger)
            }
            CustomerAction::Fiar { id, valor } => {
                let response = customer::record_debt(db, shop, &id, &valor).await?;
                emit(flags, &response, view::ledger)
            }
            CustomerAction::Historico { id, limite } => {
                let response = customer::customer_history(shop, &id, limite).await?;
                emit(flags, &response, view::history)
            }
            CustomerAction::Mensagem { id, itens } => {
                let today = Local::now().date_naive();
                let response = customer::compose_message(shop, config, &id, &itens, today).await?;
                emit(flags, &response, view::message)
            }
        },

        Command::Insights { ultimos } => {
            let response = if ultimos {
                insight::latest_insights(&app.insights).await
            } else {
                Some(insight::refresh_insights(shop, &app.insights, config).await)
            };
            match response {
                Some(r) => emit(flags, &r, view::insights),
                None => {
                    println!("Nenhuma sugestão gerada ainda. Use `insights`.");
                    Ok(())
                }
            }
        }

        Command::Config { action } => match action {
            SettingsAction::Backup { pasta } => {
                let dir = pasta.unwrap_or_else(|| config.backup_dir.clone());
                let today = Local::now().date_naive();
                let response = settings::export_backup(shop, &dir, today).await?;
                emit(flags, &response, view::backup)
            }
            SettingsAction::Resetar => {
                let reset =
                    with_confirmation(flags, move |ok| settings::reset_shop(db, shop, ok)).await?;
                match reset {
                    Some(r) => emit(flags, &r, view::reset),
                    None => cancelled(),
                }
            }
            SettingsAction::Status => {
                let response = settings::status(db, shop, config, &app.insights).await?;
                emit(flags, &response, view::status)
            }
        },

        Command::Shell => Err(ApiError::validation("Você já está no shell.")),
    }
}

/// Runs `action` unconfirmed first (or confirmed with `--yes`); when it
/// asks for confirmation, asks the operator and runs it again.
///
/// `Ok(None)` means the operator declined.
async fn with_confirmation<T, F, Fut>(flags: Flags, action: F) -> Result<Option<T>, ApiError>
where
    F: Fn(bool) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match action(flags.yes).await {
        Err(e) if e.is_confirmation_required() => {
            if prompt::confirm(&e.message)? {
                action(true).await.map(Some)
            } else {
                Ok(None)
            }
        }
        other => other.map(Some),
    }
}

fn cancelled() -> Result<(), ApiError> {
    println!("Cancelado.");
    Ok(())
}

/// Prints `value` as JSON or through its text renderer.
fn emit<T, F>(flags: Flags, value: &T, render: F) -> Result<(), ApiError>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if flags.json {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| ApiError::internal(format!("JSON: {}", e)))?;
        println!("{}", json);
    } else {
        println!("{}", render(value));
    }
    Ok(())
}

/// Prints a failed command to stderr, in JSON when asked.
pub fn report_error(err: &ApiError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(text) => eprintln!("{}", text),
            Err(_) => eprintln!("Erro: {}", err.message),
        }
    } else {
        eprintln!("Erro: {}", err.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_locked_session_is_refused() {
        let app = AppState::for_tests().await;
        let err = execute(&app, Command::Painel, Flags::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_open_session_runs_commands() {
        let app = AppState::for_tests().await;
        auth::login(&app.config, &app.session, "1540").unwrap();

        execute(&app, Command::Painel, Flags::default()).await.unwrap();

        let pay = Command::Clientes {
            action: CustomerAction::Fiar {
                id: "c3".to_string(),
                valor: "7,25".to_string(),
            },
        };
        execute(&app, pay, Flags { yes: false, json: true }).await.unwrap();
        let balance = app
            .shop
            .with_shop(|s| s.customers.iter().find(|c| c.id == "c3").map(|c| c.balance_cents))
            .await;
        assert_eq!(balance, Some(725));
    }

    #[tokio::test]
    async fn test_yes_skips_the_prompt() {
        let app = AppState::for_tests().await;
        auth::login(&app.config, &app.session, "1540").unwrap();

        let delete = Command::Estoque {
            action: StockAction::Excluir { id: "4".to_string() },
        };
        execute(&app, delete, Flags { yes: true, json: false }).await.unwrap();
        assert_eq!(app.shop.with_shop(|s| s.products.len()).await, 4);
    }
}
