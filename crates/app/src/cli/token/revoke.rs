use clap::Args;
use dukkan_app::auth::{AuthServiceError, PgAuthService};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Token UUID to revoke
    #[arg(long)]
    token_uuid: Uuid,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let service = PgAuthService::new(db);

    match service.revoke_api_token(args.token_uuid).await {
        Ok(()) => println!("revoked token {}", args.token_uuid),
        Err(AuthServiceError::NotFound) => println!("token {} was not active", args.token_uuid),
        Err(error) => return Err(format!("failed to revoke token: {error}")),
    }

    Ok(())
}
