use clap::Args;
use dukkan_app::domain::catalog::{CatalogService, PgCatalogService, models::CatalogKind};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct DeleteArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// `category`, `subcategory`, `sub_subcategory` or `product`
    #[arg(long)]
    kind: CatalogKind,

    /// Node to delete along with everything below it
    #[arg(long)]
    uuid: Uuid,
}

pub(crate) async fn run(args: DeleteArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let summary = PgCatalogService::new(db)
        .cascade_delete(args.kind, args.uuid)
        .await
        .map_err(|error| format!("failed to delete {} {}: {error}", args.kind, args.uuid))?;

    println!("categories: {}", summary.categories);
    println!("subcategories: {}", summary.subcategories);
    println!("sub_subcategories: {}", summary.sub_subcategories);
    println!("products: {}", summary.products);

    Ok(())
}
