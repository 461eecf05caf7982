use civica_cli::seeder::{self, TerritoryConfig};
use civica_config::DatabaseConfig;
use civica_db::{PgPool, PgStore, init_db_pool, run_migrations};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "civica-cli")]
#[command(about = "Civica CLI - Administrative tools for Civica", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the role and permission catalog
    Seed {
        /// Wipe the catalog and seed it again
        #[arg(long)]
        reset: bool,
    },
    /// Create an administrator account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed a fake organizational tree
    SeedTerritory {
        /// Number of localidades to create
        #[arg(long, default_value = "3")]
        localidades: usize,

        /// Number of circuitos per localidad
        #[arg(long, default_value = "4")]
        circuitos: usize,

        /// Number of escuelas per circuito
        #[arg(long, default_value = "5")]
        escuelas: usize,

        /// Number of mesas per escuela
        #[arg(long, default_value = "8")]
        mesas: usize,
    },
    /// Delete every organizational entity (and the grants pointing at them)
    ClearTerritory,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let pool = connect().await;
    let store = PgStore::new(pool.clone());

    match cli.command {
        Commands::Seed { reset } => {
            if let Err(e) = seeder::seed_catalog(&store, reset).await {
                fail("seeding catalog", e);
            }
        }
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_admin(&store, first_name, last_name, email, password).await,
        Commands::SeedTerritory {
            localidades,
            circuitos,
            escuelas,
            mesas,
        } => {
            let config = TerritoryConfig::new(localidades)
                .with_circuitos(circuitos)
                .with_escuelas(escuelas)
                .with_mesas(mesas);
            if let Err(e) = seeder::seed_territory(&pool, &config).await {
                fail("seeding territory", e);
            }
        }
        Commands::ClearTerritory => {
            if let Err(e) = seeder::clear_territory(&store).await {
                fail("clearing territory", e);
            }
        }
    }
}

async fn connect() -> PgPool {
    let config = DatabaseConfig::from_env();
    let Some(url) = config.url else {
        eprintln!("❌ DATABASE_URL must be set");
        std::process::exit(1);
    };

    let pool = match init_db_pool(&url, config.max_connections).await {
        Ok(pool) => pool,
        Err(e) => fail("connecting to database", e),
    };
    if let Err(e) = run_migrations(&pool).await {
        fail("running migrations", e);
    }
    pool
}

fn fail(action: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ Error {}: {}", action, err);
    std::process::exit(1);
}

fn prompt(label: &str) -> String {
    match Input::new().with_prompt(label).interact_text() {
        Ok(value) => value,
        Err(e) => fail("reading input", e),
    }
}

async fn handle_create_admin(
    store: &PgStore,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let first_name = first_name.unwrap_or_else(|| prompt("First name"));
    let last_name = last_name.unwrap_or_else(|| prompt("Last name"));
    let email = email.unwrap_or_else(|| prompt("Email address"));
    let password = password.unwrap_or_else(|| {
        match Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
        {
            Ok(password) => password,
            Err(e) => fail("reading password", e),
        }
    });

    match seeder::create_admin(store, &first_name, &last_name, &email, &password).await {
        Ok(_) => {
            println!("\n✅ Admin created successfully!");
            println!("   Email: {}", email);
            println!("   Name: {} {}", first_name, last_name);
        }
        Err(e) => fail("creating admin", e),
    }
}
