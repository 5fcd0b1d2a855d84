//! Document CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_document_list;
use crate::error::RubikResult;
use crate::gateway::DataGateway;

/// Document subcommands
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// List the documents attached to a property
    List {
        /// Property CEP
        property: String,
    },
}

/// Handle a document command
pub async fn handle_document_command(
    gateway: &DataGateway,
    settings: &Settings,
    cmd: DocumentCommands,
) -> RubikResult<()> {
    match cmd {
        DocumentCommands::List { property } => {
            let documents = gateway.documents(&property).await?;
            println!("{}", format_document_list(&documents, settings));
        }
    }
    Ok(())
}
