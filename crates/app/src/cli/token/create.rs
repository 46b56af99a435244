use clap::Args;
use dukkan_app::auth::{PgAuthService, Role, UserUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User the token authenticates as; created when unknown
    #[arg(long)]
    user_uuid: Uuid,

    /// `customer` or `admin`
    #[arg(long, default_value = "customer")]
    role: Role,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let service = PgAuthService::new(db);

    let issued = service
        .issue_api_token(UserUuid::from_uuid(args.user_uuid), args.role)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("role: {}", issued.role);
    println!("token_created_at: {}", issued.metadata.created_at);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
