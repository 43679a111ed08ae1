//! Reconcile a small statement and print the export

use reconciliation_core::utils::{is_valid_cnpj, MemoryConfigSource};
use reconciliation_core::{RawRow, ReconcileOptions, Reconciler, TaxId};
use tracing_subscriber::EnvFilter;

const CHART_OF_ACCOUNTS: &str = r#"{
    "fornecedores": {"ACME Distribuidora": 2101, "Laboratorio Sul": 2102},
    "clientes": {"PIX RECEBIDO - OUTRA IF": 1120},
    "contas_pagamento": {"Banco do Brasil": 1012},
    "multas_juros": 4410,
    "descontos": 3310,
    "tarifas": 316
}"#;

fn bank(date: &str, description: &str, value: &str) -> RawRow {
    RawRow::new()
        .with("Data", date)
        .with("Histórico", description)
        .with("Valor", value)
}

fn ledger(date: &str, supplier: &str, invoice: &str, to_pay: &str, fine: &str) -> RawRow {
    RawRow::new()
        .with("Data pagamento", date)
        .with("Nome do fornecedor", supplier)
        .with("Nota fiscal", invoice)
        .with("Valor", to_pay)
        .with("Descontos", "")
        .with("Multa e juros", fine)
        .with("Valor a pagar", to_pay)
        .with("Tarifas de Boleto", "")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let tax_id = TaxId::parse("11.222.333/0001-81")?;
    println!("Entity {} (valid CNPJ: {})\n", tax_id, is_valid_cnpj(&tax_id));

    let source = MemoryConfigSource::new();
    source.insert_json(tax_id.clone(), CHART_OF_ACCOUNTS)?;

    let bank_rows = vec![
        bank("04/03/2024", "PAG BOLETO", "1.250,00D"),
        bank("05/03/2024", "PIX RECEBIDO - OUTRA IF", "830,40C"),
        bank("06/03/2024", "SAQUE", "300,00D"),
    ];
    let ledger_rows = vec![
        ledger("04/03/2024", "ACME Distribuidora", "5512", "1.250,00", "12,50"),
        ledger("07/03/2024", "Laboratorio Sul", "889", "410,00", ""),
    ];

    let reconciler = Reconciler::new(ReconcileOptions::from_env()?);
    let result = reconciler
        .run_for_entity(&source, &tax_id, &bank_rows, &ledger_rows)
        .await?;

    let summary = result.summary;
    println!(
        "Matched: {}  Cash: {}  Deposits: {}  Withdrawals: {}\n",
        summary.matched, summary.cash_paid, summary.deposits, summary.withdrawals
    );
    print!("{}", result.csv);

    Ok(())
}
