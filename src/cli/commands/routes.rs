use anyhow::anyhow;
use clap::Subcommand;

use crate::cli::utils::output_routes;
use crate::cli::OutputFormat;
use crate::database::RecordStore;
use crate::services::{RouteService, UserService};

#[derive(Subcommand)]
pub enum RouteCommands {
    #[command(about = "Routes every visitor receives")]
    Constant,

    #[command(about = "Routes visible to one user")]
    User {
        #[arg(help = "User id")]
        id: i64,
    },
}

pub async fn handle<S: RecordStore + Clone>(cmd: RouteCommands, store: S, output_format: OutputFormat) -> anyhow::Result<()> {
    let routes = match cmd {
        RouteCommands::Constant => RouteService::new(store).constant_route_tree().await?,
        RouteCommands::User { id } => {
            let (user, role) = UserService::new(store.clone())
                .find_user_with_role(id)
                .await?
                .ok_or_else(|| anyhow!("User {} not found", id))?;
            RouteService::new(store).user_route_tree(&user, role.as_ref()).await?
        }
    };
    output_routes(&output_format, &routes)
}
