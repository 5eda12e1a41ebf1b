use clap::Parser;
use repair_desk::adapters::file_store::next_ticket_id;
use repair_desk::config::toml_config::AppConfig;
use repair_desk::config::{BackupCommand, Command, CompanyCommand, TicketCommand};
use repair_desk::core::{Ticket, WorkshopStore};
use repair_desk::utils::error::{ErrorSeverity, Result};
use repair_desk::utils::validation::{validate_non_empty_string, validate_range, Validate};
use repair_desk::utils::logger;
use repair_desk::{
    AdvisoryClient, CliConfig, GeminiClient, JsonFileStore, LocalStorage, SettingsPanel,
};

const MAX_PRICE: f64 = 1_000_000.0;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::debug!("Command: {:?}", cli.command);

    let outcome = match cli.app_config() {
        Ok(config) => match config.validate() {
            Ok(()) => run(cli.command.clone(), config).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: Command, config: AppConfig) -> Result<()> {
    let store = JsonFileStore::new(&config.storage.data_file);
    tracing::debug!("Using data file {}", store.path().display());

    match command {
        Command::Ticket { action } => run_ticket(action, &store).await,
        Command::Backup { action } => {
            let panel = SettingsPanel::new(LocalStorage::new(&config.storage.backup_dir), &store);
            match action {
                BackupCommand::Export => {
                    let filename = panel.export_backup().await?;
                    let saved = LocalStorage::new(&config.storage.backup_dir).resolve(&filename);
                    println!("✅ Backup exported to {}", saved.display());
                }
                BackupCommand::Import { file } => {
                    // 使用者選擇的檔案以目前目錄為準
                    let path = std::env::current_dir()?.join(&file);
                    let count = panel.import_backup(&path.to_string_lossy()).await?;
                    println!("✅ Restored {} tickets from {}", count, file);
                }
            }
            Ok(())
        }
        Command::Company { action } => {
            let panel = SettingsPanel::new(LocalStorage::new(&config.storage.backup_dir), &store);
            let company = match action {
                CompanyCommand::Show => panel.company().await?,
                CompanyCommand::Set { field, value } => {
                    panel.update_company_field(field, &value).await?
                }
            };
            println!("Nombre:    {}", company.name);
            println!("Teléfono:  {}", company.phone);
            println!("Dirección: {}", company.address);
            println!("Términos:  {}", company.terms);
            Ok(())
        }
        Command::Reset { yes } => {
            let panel = SettingsPanel::new(LocalStorage::new(&config.storage.backup_dir), &store);
            panel.clear_all(yes).await?;
            println!("✅ All data was reset");
            Ok(())
        }
        Command::Analyze { model, issue } => {
            let client = AdvisoryClient::new(GeminiClient::new(&config.ai)?, &config.ai.model);
            match client.analyze_issue(&model, &issue).await {
                Ok(result) => {
                    println!("Categoría:        {}", result.category);
                    println!("Precio estimado:  ${:.2}", result.estimated_price);
                    println!("Tiempo estimado:  {}", result.estimated_time);
                    println!("Acciones sugeridas:");
                    for (i, action) in result.suggested_actions.iter().enumerate() {
                        println!("  {}. {}", i + 1, action);
                    }
                }
                Err(e) => {
                    tracing::debug!("Analysis unavailable: {}", e);
                    println!("No analysis available right now.");
                }
            }
            Ok(())
        }
        Command::Report => {
            let client = AdvisoryClient::new(GeminiClient::new(&config.ai)?, &config.ai.model);
            let state = store.load().await?;
            println!("{}", client.summarize_report(&state.tickets).await);
            Ok(())
        }
    }
}

async fn run_ticket(action: TicketCommand, store: &JsonFileStore) -> Result<()> {
    match action {
        TicketCommand::Add {
            model,
            issue,
            customer,
            phone,
            price,
            notes,
        } => {
            validate_non_empty_string("model", &model)?;
            validate_non_empty_string("issue", &issue)?;
            validate_range("price", price, 0.0, MAX_PRICE)?;

            let state = store.load().await?;
            let mut ticket = Ticket::new(next_ticket_id(&state.tickets), &model, &issue);
            ticket.set_customer(&customer, &phone);
            ticket.set_price_quote(price);
            if let Some(notes) = &notes {
                ticket.set_notes(notes);
            }

            let id = ticket.id();
            store.add_ticket(ticket).await?;
            println!("✅ Ticket #{} created", id);
        }
        TicketCommand::List => {
            let state = store.load().await?;
            if state.tickets.is_empty() {
                println!("No tickets yet.");
            }
            for ticket in &state.tickets {
                let received = ticket
                    .created_at()
                    .map(|at| at.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "#{:<5} {:<10} {:<14} {:<20} {:>10.2}  {}",
                    ticket.id(),
                    received,
                    ticket.status_label(),
                    ticket.device_model(),
                    ticket.price_quote(),
                    ticket.issue_description()
                );
            }
        }
        TicketCommand::Status { id, status } => {
            let ticket = store.set_status(&id, status).await?;
            println!("✅ Ticket #{} is now {}", ticket.id(), ticket.status_label());
        }
    }
    Ok(())
}
