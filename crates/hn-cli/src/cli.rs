use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hashnamed",
    about = "hashnamed — content-addressed code object store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Local repository directory (created on first use)
    #[arg(long, global = true, default_value = ".hashnamed")]
    pub cache_dir: String,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum KindArg {
    Function,
    Class,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install a source file into the local repository
    Install(InstallArgs),
    /// Resolve a content address across configured repositories
    Resolve(ResolveArgs),
    /// Show the stored descriptor for a content address
    Show(ShowArgs),
    /// Manage remote repositories
    Remote(RemoteArgs),
    /// Build a class map from a source tree
    Classmap(ClassmapArgs),
}

#[derive(Args)]
pub struct InstallArgs {
    pub file: String,
    /// Fragment kind to parse the file as
    #[arg(short = 't', long = "type", value_enum)]
    pub kind: KindArg,
    /// Store the body under its content-address name
    #[arg(long)]
    pub hashnamed: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Content address: fn_<hash>, C_<hash>, or obj_<hash>
    pub address: String,
    /// Store with the original declared name instead of the hash name
    #[arg(long)]
    pub original: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub address: String,
}

#[derive(Args)]
pub struct RemoteArgs {
    #[command(subcommand)]
    pub action: Option<RemoteAction>,
}

#[derive(Subcommand)]
pub enum RemoteAction {
    Add { location: String },
    Remove { location: String },
}

#[derive(Args)]
pub struct ClassmapArgs {
    /// Source tree to scan
    pub root: String,
    /// Where to write the JSON map
    #[arg(short, long, default_value = "classmap.json")]
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_install() {
        let cli =
            Cli::try_parse_from(["hashnamed", "install", "-t", "function", "f.php"]).unwrap();
        if let Command::Install(args) = cli.command {
            assert_eq!(args.file, "f.php");
            assert!(matches!(args.kind, KindArg::Function));
            assert!(!args.hashnamed);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_install_hashnamed_class() {
        let cli = Cli::try_parse_from([
            "hashnamed", "install", "--type", "class", "--hashnamed", "c.php",
        ])
        .unwrap();
        if let Command::Install(args) = cli.command {
            assert!(matches!(args.kind, KindArg::Class));
            assert!(args.hashnamed);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn install_requires_type() {
        assert!(Cli::try_parse_from(["hashnamed", "install", "f.php"]).is_err());
    }

    #[test]
    fn parse_resolve() {
        let address = format!("fn_{}", "ab".repeat(20));
        let cli = Cli::try_parse_from(["hashnamed", "resolve", &address]).unwrap();
        if let Command::Resolve(args) = cli.command {
            assert_eq!(args.address, address);
            assert!(!args.original);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_resolve_original() {
        let cli = Cli::try_parse_from(["hashnamed", "resolve", "--original", "x"]).unwrap();
        if let Command::Resolve(args) = cli.command {
            assert!(args.original);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_remote_add() {
        let cli =
            Cli::try_parse_from(["hashnamed", "remote", "add", "https://repo.example/"]).unwrap();
        if let Command::Remote(args) = cli.command {
            assert!(matches!(args.action, Some(RemoteAction::Add { .. })));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_remote_list_is_default() {
        let cli = Cli::try_parse_from(["hashnamed", "remote"]).unwrap();
        if let Command::Remote(args) = cli.command {
            assert!(args.action.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_classmap_with_output() {
        let cli =
            Cli::try_parse_from(["hashnamed", "classmap", "src", "-o", "map.json"]).unwrap();
        if let Command::Classmap(args) = cli.command {
            assert_eq!(args.root, "src");
            assert_eq!(args.output, "map.json");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_cache_dir_global() {
        let cli =
            Cli::try_parse_from(["hashnamed", "--cache-dir", "/tmp/hn", "remote"]).unwrap();
        assert_eq!(cli.cache_dir, "/tmp/hn");
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["hashnamed", "--format", "json", "remote"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
