use clap::Args;

use crate::cli::utils::{output_json, output_permissions};
use crate::cli::OutputFormat;
use crate::database::models::PermissionKind;
use crate::database::RecordStore;
use crate::services::MenuService;

#[derive(Args)]
pub struct PermissionArgs {
    #[arg(help = "buttons or interfaces")]
    pub kind: PermissionKind,

    #[arg(long, help = "Print the flat code list instead of the tree")]
    pub list: bool,

    #[arg(long, requires = "list", help = "Skip this menu's codes in the flat list")]
    pub exclude_menu: Option<i64>,
}

pub async fn handle<S: RecordStore>(args: PermissionArgs, store: S, output_format: OutputFormat) -> anyhow::Result<()> {
    let service = MenuService::new(store);

    if !args.list {
        let tree = service.menu_permission_tree(args.kind).await?;
        return output_permissions(&output_format, &tree);
    }

    let codes = service.menu_permission_list(args.kind, args.exclude_menu).await?;
    match output_format {
        OutputFormat::Json => output_json(&codes),
        OutputFormat::Text => {
            for entry in &codes {
                println!("{}\t{}", entry.code, entry.description);
            }
            Ok(())
        }
    }
}
