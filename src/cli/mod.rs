use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::agenda::AgendaStore;
use crate::gateway::{AdminGateway, Gateway, GatewayError};
use crate::server::AppState;

#[derive(Parser)]
#[command(name = "agenda-admin")]
#[command(about = "Agenda backoffice - admin API server and gateway utilities")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the admin API server (default)")]
    Serve {
        #[arg(long, help = "Port to bind (also AGENDA_API_PORT or PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Probe a relation and print its column names")]
    Probe {
        #[arg(long, default_value = "agendamento", help = "Relation to probe")]
        relation: String,
    },

    #[command(about = "Print the week of appointments around a reference date")]
    Agenda {
        #[arg(long, help = "Reference date, YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(port).await,
        Commands::Probe { relation } => probe(&relation).await,
        Commands::Agenda { date } => agenda(date).await,
    }
}

async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let config = crate::config::config();
    let gateway = Gateway::new(&config.gateway)?;

    let admin = match AdminGateway::from_config(&config.gateway) {
        Ok(admin) => Some(admin),
        Err(GatewayError::NotConfigured) => {
            tracing::warn!("service role credential not set; /api/admin/* will answer 501");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let app = crate::server::app(AppState { gateway, admin });

    let port = port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("Agenda admin API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

async fn probe(relation: &str) -> anyhow::Result<()> {
    let gateway = Gateway::from_env()?;
    let rows = gateway.table(relation).select("*").limit(1).fetch_all().await?;

    match rows.first().and_then(|row| row.as_object()) {
        Some(row) => {
            println!("Columns in {}:", relation);
            for coluna in row.keys() {
                println!("  {}", coluna);
            }
        }
        None => println!("No rows in {}; cannot infer columns", relation),
    }
    Ok(())
}

async fn agenda(date: Option<String>) -> anyhow::Result<()> {
    let gateway = Gateway::from_env()?;
    let referencia = match date {
        Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", d))?,
        None => Local::now().date_naive(),
    };

    let store = AgendaStore::with_data_referencia(gateway, referencia);
    store.fetch_agendamentos().await;

    let dias = store.dias_da_semana().await;
    println!("Semana de {} a {}", dias[0], dias[6]);

    let agendamentos = store.agendamentos().await;
    if agendamentos.is_empty() {
        println!("  (sem agendamentos)");
    }
    for a in agendamentos {
        let horario = a
            .data_hora
            .map(|d| d.to_string())
            .unwrap_or_else(|| "sem horario".to_string());
        println!("  #{} {} {} {}", a.id, horario, a.status.as_str(), a.cliente.nome);
    }
    Ok(())
}
