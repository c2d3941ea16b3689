use clap::Parser;
use passvault::cli::commands::{self, generate::Exclusions, update::UpdateArgs};
use passvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Add {
            ref service,
            ref username,
            ref url,
            ref notes,
            generate,
            length,
        } => commands::add::execute(
            &cli,
            service,
            username,
            url.as_deref(),
            notes.as_deref(),
            generate,
            length,
        ),
        Commands::Get { id, copy, show } => commands::get::execute(&cli, id, copy, show),
        Commands::List {
            ref filter,
            sort,
        } => commands::list::execute(&cli, filter.as_deref(), sort),
        Commands::Update {
            id,
            ref service,
            ref username,
            ref url,
            ref notes,
            password,
            generate,
            length,
        } => {
            let args = UpdateArgs {
                service: service.as_deref(),
                username: username.as_deref(),
                url: url.as_deref(),
                notes: notes.as_deref(),
                password,
                generate,
                length,
            };
            commands::update::execute(&cli, id, &args)
        }
        Commands::Remove { id, force } => commands::remove::execute(&cli, id, force),
        Commands::Generate {
            length,
            no_upper,
            no_lower,
            no_digits,
            no_symbols,
        } => commands::generate::execute(
            length,
            Exclusions {
                upper: no_upper,
                lower: no_lower,
                digits: no_digits,
                symbols: no_symbols,
            },
        ),
        Commands::ChangePassword => commands::change_password::execute(&cli),
        Commands::Strength { ref password } => commands::strength::execute(password.as_deref()),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the `-v` level.
fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
