use clap::Parser;
use shecrets::cli::commands::{auto, browse, completions, create, edit, get, init, keychain, list, remove};
use shecrets::cli::{with_terminal, Cli, Commands};

fn main() {
    shecrets::logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        None | Some(Commands::Browse) => with_terminal(&cli, browse::execute),
        Some(Commands::Init) => with_terminal(&cli, init::execute),
        Some(Commands::Keychain { delete }) => {
            with_terminal(&cli, |ctx| keychain::execute(ctx, delete))
        }
        Some(Commands::Create { ref name }) => with_terminal(&cli, |ctx| create::execute(ctx, name)),
        Some(Commands::List) => with_terminal(&cli, list::execute),
        Some(Commands::Get {
            ref name,
            field,
            output,
            ..
        }) => {
            let destination = if output {
                get::Destination::Stdout
            } else {
                get::Destination::Clipboard
            };
            with_terminal(&cli, |ctx| get::execute(ctx, name, field.into(), destination))
        }
        Some(Commands::Edit { ref name, field }) => {
            with_terminal(&cli, |ctx| edit::execute(ctx, name, field.into()))
        }
        Some(Commands::Remove { ref name }) => with_terminal(&cli, |ctx| remove::execute(ctx, name)),
        Some(Commands::Auto { ref name, enable, .. }) => {
            with_terminal(&cli, |ctx| auto::execute(ctx, name, enable))
        }
        Some(Commands::Completions { shell }) => completions::execute(shell),
        Some(Commands::ClearClipboard) => {
            shecrets::clipboard::run_clear_helper(std::io::stdin(), std::io::stdout())
        },
    };

    if let Err(e) = result {
        shecrets::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
