use anyhow::Context;
use colored::Colorize;

use hn_core::{ClassMap, CodeStore};
use hn_repo::RepoEntry;
use hn_types::{ContentAddress, FragmentKind};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Install(args) => cmd_install(&cli.cache_dir, &cli.format, args),
        Command::Resolve(args) => cmd_resolve(&cli.cache_dir, &cli.format, args),
        Command::Show(args) => cmd_show(&cli.cache_dir, &cli.format, args),
        Command::Remote(args) => cmd_remote(&cli.cache_dir, args),
        Command::Classmap(args) => cmd_classmap(&cli.format, args),
    }
}

/// Open the store on the cache dir and register the configured remotes.
fn open_store(cache_dir: &str) -> anyhow::Result<CodeStore> {
    let mut store = CodeStore::open(cache_dir)
        .with_context(|| format!("opening local repository {cache_dir}"))?;
    let config = CliConfig::load(cache_dir)?;
    store.add_repositories(config.remotes.into_iter().map(RepoEntry::Location));
    Ok(store)
}

impl From<KindArg> for FragmentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Function => FragmentKind::Function,
            KindArg::Class => FragmentKind::ClassLike,
        }
    }
}

fn cmd_install(cache_dir: &str, format: &OutputFormat, args: InstallArgs) -> anyhow::Result<()> {
    let code = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file))?;
    let mut store = open_store(cache_dir)?;
    let object = store.install(&code, args.kind.into(), args.hashnamed)?;

    match format {
        OutputFormat::Json => print_json(&object)?,
        OutputFormat::Text => {
            println!("{} Installed {}", "✓".green().bold(), object.name.bold());
            println!("  Address: {}", object.hashnamed_name.yellow());
            println!("  Call as: {}", object.call_name.cyan());
            println!("  Stored:  {}", object.local_path.display());
        }
    }
    Ok(())
}

fn cmd_resolve(cache_dir: &str, format: &OutputFormat, args: ResolveArgs) -> anyhow::Result<()> {
    let mut store = open_store(cache_dir)?;
    let object = if args.original {
        let parsed = ContentAddress::parse(&args.address)?;
        store.resolve(&parsed.hash, false, parsed.kind)?
    } else {
        store.resolve_address(&args.address)?
    };

    let Some(object) = object else {
        println!("{} {} not found in any repository", "✗".red(), args.address.yellow());
        std::process::exit(1);
    };
    match format {
        OutputFormat::Json => print_json(&object)?,
        OutputFormat::Text => {
            println!("{} Resolved {}", "✓".green().bold(), args.address.yellow());
            println!("  Name:    {}", object.name.bold());
            println!("  Call as: {}", object.call_name.cyan());
            println!("  Stored:  {}", object.local_path.display());
        }
    }
    Ok(())
}

fn cmd_show(cache_dir: &str, format: &OutputFormat, args: ShowArgs) -> anyhow::Result<()> {
    let mut store = open_store(cache_dir)?;
    let Some(object) = store.resolve_address(&args.address)? else {
        println!("{} {} not found in any repository", "✗".red(), args.address.yellow());
        std::process::exit(1);
    };
    match format {
        OutputFormat::Json => print_json(&object)?,
        OutputFormat::Text => {
            println!("Object {}", object.hashnamed_name.yellow().bold());
            println!("  Kind:      {}", object.kind);
            println!("  Name:      {}", object.name);
            if let Some(namespace) = &object.namespace {
                println!("  Namespace: {namespace}");
            }
            println!("  Path:      {}", object.local_path.display());
            println!("  Header:");
            for (name, _) in object.header.iter() {
                for value in object.header.values(name) {
                    println!("    {}: {}", name.bold(), value);
                }
            }
        }
    }
    Ok(())
}

fn cmd_remote(cache_dir: &str, args: RemoteArgs) -> anyhow::Result<()> {
    let mut config = CliConfig::load(cache_dir)?;
    match args.action {
        Some(RemoteAction::Add { location }) => {
            if config.add_remote(location.clone()) {
                config.save(cache_dir)?;
                println!("{} Added remote {}", "✓".green(), location.blue());
            } else {
                println!("Remote {} already configured", location.blue());
            }
        }
        Some(RemoteAction::Remove { location }) => {
            if config.remove_remote(&location) {
                config.save(cache_dir)?;
                println!("{} Removed remote {}", "✓".green(), location.blue());
            } else {
                println!("No such remote: {}", location.blue());
            }
        }
        None => {
            if config.remotes.is_empty() {
                println!("No remotes configured.");
            }
            for remote in &config.remotes {
                println!("{remote}");
            }
        }
    }
    Ok(())
}

fn cmd_classmap(format: &OutputFormat, args: ClassmapArgs) -> anyhow::Result<()> {
    let map = ClassMap::scan(&args.root);
    map.save(&args.output)?;
    match format {
        OutputFormat::Json => print_json(&map)?,
        OutputFormat::Text => {
            println!(
                "{} Mapped {} classes from {} into {}",
                "✓".green().bold(),
                map.len().to_string().bold(),
                args.root,
                args.output.bold()
            );
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
