use clap::Subcommand;

use crate::cli::utils::{output_json, output_tree};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::RecordStore;
use crate::services::{AffiliationService, MenuService};
use crate::types::PageRequest;

#[derive(Subcommand)]
pub enum TreeCommands {
    #[command(about = "Paginated menu tree")]
    Menus {
        #[arg(long, default_value_t = 0, help = "Parent menu id, 0 for the top level")]
        node_id: i64,
        #[arg(long, default_value = "", help = "Match menu name, route name or route path")]
        keyword: String,
        #[arg(long, default_value_t = 1)]
        page: i32,
        #[arg(long, help = "Page size (defaults to TREE_DEFAULT_PAGE_SIZE)")]
        size: Option<i32>,
    },

    #[command(about = "Affiliation tree")]
    Affiliations {
        #[arg(long, default_value_t = 0, help = "Parent affiliation id, 0 for the top level")]
        node_id: i64,
        #[arg(long, default_value = "", help = "Match affiliation name")]
        keyword: String,
    },
}

pub async fn handle<S: RecordStore>(cmd: TreeCommands, store: S, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TreeCommands::Menus { node_id, keyword, page, size } => {
            let page = PageRequest::new(page, size.unwrap_or(config().tree.default_page_size));
            let result = MenuService::new(store).menu_tree(node_id, &keyword, page).await?;
            match output_format {
                OutputFormat::Json => output_json(&result),
                OutputFormat::Text => {
                    println!("Page {} ({} per page, {} total)", result.page, result.page_size, result.total);
                    output_tree(&output_format, &result.records)
                }
            }
        }
        TreeCommands::Affiliations { node_id, keyword } => {
            let tree = AffiliationService::new(store).affiliation_tree(node_id, &keyword).await?;
            output_tree(&output_format, &tree)
        }
    }
}
