//! Text rendering of command responses.
//!
//! Everything here returns a `String`; the router decides whether to print
//! it or the JSON form instead. Amounts use pt-BR formatting (`R$ 1.234,50`).

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};

use fiado_core::report::DashboardReport;
use fiado_core::{Money, TransactionKind};

use crate::commands::customer::{CustomerDto, HistoryResponse, LedgerResponse, MessageResponse};
use crate::commands::insight::InsightsResponse;
use crate::commands::product::{ProductDto, SaleResponse};
use crate::commands::settings::{BackupResponse, ResetResponse, StatusResponse};

fn brl(cents: i64) -> String {
    Money::from_cents(cents).to_string()
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}

// =============================================================================
// Dashboard
// =============================================================================

pub fn dashboard(report: &DashboardReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "A receber:        {} ({} clientes)", report.total_receivable, report.debtor_count);
    let _ = writeln!(out, "Recebido:         {}", report.payments_received);
    let _ = writeln!(out, "Estoque baixo:    {} produtos", report.low_stock_count);
    let _ = writeln!(
        out,
        "Estoque:          {} produtos, custo {}, venda {}",
        report.product_count, report.inventory_cost, report.inventory_value
    );

    if report.top_debtors.is_empty() {
        out.push_str("\nNenhum cliente devendo.");
    } else {
        out.push_str("\nMaiores devedores:");
        for debtor in &report.top_debtors {
            let _ = write!(out, "\n  {:<16} {}", debtor.first_name, debtor.balance);
        }
    }
    out
}

// =============================================================================
// Products
// =============================================================================

/// Catalog listing; flags products on their last units.
pub fn catalog(products: &[ProductDto]) -> String {
    if products.is_empty() {
        return "Nenhum produto encontrado.".to_string();
    }

    let mut out = String::new();
    for p in products {
        let badge = if p.stock == 0 {
            "  [sem estoque]"
        } else if p.last_units {
            "  [últimas unidades]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<36}  {:<28} {:>12} / {:<6} {:>4} un{}",
            p.id,
            p.name,
            brl(p.price_cents),
            p.unit,
            p.stock,
            badge
        );
    }
    out.trim_end().to_string()
}

/// Inventory listing with cost and the low-stock flag.
pub fn inventory(products: &[ProductDto]) -> String {
    if products.is_empty() {
        return "Nenhum produto encontrado.".to_string();
    }

    let mut out = String::new();
    for p in products {
        let _ = writeln!(
            out,
            "{:<36}  {:<28} {:<18} custo {:>12}  venda {:>12}  {:>4} un{}",
            p.id,
            p.name,
            p.category,
            brl(p.cost_cents),
            brl(p.price_cents),
            p.stock,
            if p.low_stock { "  [estoque baixo]" } else { "" }
        );
    }
    out.trim_end().to_string()
}

pub fn product_detail(p: &ProductDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", p.name, p.id);
    let _ = writeln!(out, "  Categoria: {}", p.category);
    let _ = writeln!(out, "  Preço:     {} / {}", brl(p.price_cents), p.unit);
    let _ = writeln!(out, "  Custo:     {}", brl(p.cost_cents));
    let _ = write!(out, "  Estoque:   {}", p.stock);
    if let Some(description) = &p.description {
        let _ = write!(out, "\n  {}", description);
    }
    out
}

pub fn categories(list: &[String]) -> String {
    list.join("\n")
}

pub fn sale(s: &SaleResponse) -> String {
    match s.remaining {
        Some(remaining) if s.sold => format!("Vendido: {} (restam {})", s.product_name, remaining),
        _ => format!("{} está sem estoque; nada foi vendido.", s.product_name),
    }
}

// =============================================================================
// Customers
// =============================================================================

pub fn customers(list: &[CustomerDto]) -> String {
    if list.is_empty() {
        return "Nenhum cliente encontrado.".to_string();
    }

    let mut out = String::new();
    for c in list {
        let last = c
            .last_activity
            .map(local_time)
            .unwrap_or_else(|| "sem lançamentos".to_string());
        let _ = writeln!(
            out,
            "{:<36}  {:<24} {:<16} {:>12}  {}",
            c.id,
            c.name,
            c.phone,
            brl(c.balance_cents),
            last
        );
    }
    out.trim_end().to_string()
}

pub fn customer_created(c: &CustomerDto) -> String {
    format!("Cliente cadastrado: {} ({})", c.name, c.id)
}

pub fn ledger(r: &LedgerResponse) -> String {
    let verb = match r.kind {
        TransactionKind::Payment => "Pagamento",
        TransactionKind::Credit => "Fiado",
    };
    let mut out = format!(
        "{} de {} registrado para {}. Saldo: {} -> {}",
        verb,
        brl(r.amount_cents),
        r.customer_name,
        brl(r.previous_balance_cents),
        brl(r.new_balance_cents)
    );
    if r.overpayment_cents > 0 {
        let _ = write!(
            out,
            "\nAtenção: pagamento excedeu o saldo em {}; o saldo ficou zerado.",
            brl(r.overpayment_cents)
        );
    }
    out
}

pub fn history(h: &HistoryResponse) -> String {
    let mut out = format!("{} - saldo {}", h.customer.name, brl(h.customer.balance_cents));

    if h.entries.is_empty() {
        out.push_str("\n  Sem lançamentos.");
    }
    for tx in &h.entries {
        let (label, sign) = match tx.kind {
            TransactionKind::Payment => ("VISTA", "-"),
            TransactionKind::Credit => ("FIADO", "+"),
        };
        let _ = write!(
            out,
            "\n  {}  {:<5} {}{}",
            local_time(tx.timestamp),
            label,
            sign,
            brl(tx.total_cents)
        );
        if tx.overpayment_cents > 0 {
            let _ = write!(out, "  (excedente {})", brl(tx.overpayment_cents));
        }
    }
    out
}

pub fn message(m: &MessageResponse) -> String {
    format!("{}\n\n{}", m.text, m.link)
}

// =============================================================================
// Insights
// =============================================================================

pub fn insights(r: &InsightsResponse) -> String {
    let mut out = String::new();
    for insight in &r.insights {
        let _ = write!(
            out,
            "[{}/{}] {}",
            insight.kind.label(),
            insight.priority.label(),
            insight.message
        );
        if let Some(impact) = &insight.impact {
            let _ = write!(out, "\n    Impacto: {}", impact);
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

// =============================================================================
// Settings
// =============================================================================

pub fn backup(b: &BackupResponse) -> String {
    format!(
        "Backup salvo em {} ({} produtos, {} clientes)",
        b.path.display(),
        b.products,
        b.customers
    )
}

pub fn reset(r: &ResetResponse) -> String {
    format!(
        "Sistema resetado: {} produtos e {} clientes iniciais.",
        r.products, r.customers
    )
}

pub fn status(s: &StatusResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Loja:          {}", s.store_name);
    let _ = writeln!(
        out,
        "Banco:         {} ({})",
        s.database_path.display(),
        if s.database_ok { "ok" } else { "FALHA" }
    );
    let _ = writeln!(out, "Migrações:     {}/{}", s.migrations_applied, s.migrations_total);

    if s.documents.is_empty() {
        let _ = writeln!(out, "Documentos:    nenhum salvo (dados iniciais)");
    }
    for doc in &s.documents {
        let _ = writeln!(out, "Documento:     {} ({} bytes, {})", doc.key, doc.bytes, doc.updated_at);
    }

    let _ = writeln!(out, "Produtos:      {}", s.products);
    let _ = writeln!(
        out,
        "Clientes:      {} ({} com saldo sem histórico correspondente)",
        s.customers, s.unreconciled_customers
    );
    let _ = writeln!(out, "Estoque baixo: menos de {} un", s.low_stock_threshold);
    let _ = write!(
        out,
        "IA:            {}",
        if s.insights_enabled {
            s.insight_model.as_str()
        } else {
            "desativada (sem chave)"
        }
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiado_core::{seed, LOW_STOCK_THRESHOLD};

    #[test]
    fn test_dashboard_text() {
        let report =
            DashboardReport::build(&seed::products(), &seed::customers(), LOW_STOCK_THRESHOLD)
                .unwrap();
        let text = dashboard(&report);

        assert!(text.contains("A receber:        R$ 57,50 (2 clientes)"));
        assert!(text.contains("João"));
        assert!(text.contains("Maria"));
        assert!(!text.contains("Ricardo"));
    }

    #[test]
    fn test_ledger_text_mentions_overpayment() {
        let response = LedgerResponse {
            customer_id: "c1".to_string(),
            customer_name: "João Silva".to_string(),
            transaction_id: "t1".to_string(),
            kind: TransactionKind::Payment,
            amount_cents: 5000,
            previous_balance_cents: 4550,
            new_balance_cents: 0,
            overpayment_cents: 450,
        };
        let text = ledger(&response);

        assert!(text.starts_with("Pagamento de R$ 50,00 registrado para João Silva"));
        assert!(text.contains("R$ 45,50 -> R$ 0,00"));
        assert!(text.contains("excedeu o saldo em R$ 4,50"));
    }

    #[test]
    fn test_sale_text() {
        let sold = SaleResponse {
            product_id: "1".to_string(),
            product_name: "Arroz Tipo 1".to_string(),
            sold: true,
            remaining: Some(44),
        };
        assert_eq!(sale(&sold), "Vendido: Arroz Tipo 1 (restam 44)");

        let empty = SaleResponse {
            sold: false,
            remaining: None,
            ..sold
        };
        assert!(sale(&empty).contains("sem estoque"));
    }
}
