use crate::cli::utils::output_json;
use crate::cli::OutputFormat;
use crate::database::RecordStore;
use crate::services::MenuService;

pub async fn handle<S: RecordStore>(store: S, output_format: OutputFormat) -> anyhow::Result<()> {
    let pages = MenuService::new(store).page_list().await?;
    match output_format {
        OutputFormat::Json => output_json(&pages),
        OutputFormat::Text => {
            for page in &pages {
                println!("{}", page);
            }
            Ok(())
        }
    }
}
