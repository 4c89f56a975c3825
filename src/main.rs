//! Command-line interface for xmlbind

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use serde::Serialize;

#[cfg(feature = "cli")]
use xmlbind::loaders::{Loader, Source};
#[cfg(feature = "cli")]
use xmlbind::{is_well_formed, ErrorResponse, XmlService};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xmlbind")]
#[command(author, version, about = "Generic XML-to-JSON conversion and typed XML binding", long_about = None)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a document is well-formed XML
    Check {
        /// Path to the XML file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Convert a document to generic JSON with root metadata
    Parse {
        /// Path to the XML file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Bind a document to a registered type and print it as JSON
    Bind {
        /// Path to the XML file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Identifier of the target type (see `types`)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        type_id: String,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Bind a document to a registered type and write it back as XML
    Marshal {
        /// Path to the XML file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Identifier of the target type (see `types`)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        type_id: String,
    },

    /// List the registered type identifiers
    Types,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let service = XmlService::new();
    let loader = Loader::new();

    let result = match cli.command {
        Commands::Check { file } => cmd_check(&loader, &file),
        Commands::Parse { file, pretty } => cmd_parse(&service, &loader, &file, pretty),
        Commands::Bind {
            file,
            type_id,
            pretty,
        } => cmd_bind(&service, &loader, &file, &type_id, pretty),
        Commands::Marshal { file, type_id } => cmd_marshal(&service, &loader, &file, &type_id),
        Commands::Types => cmd_types(&service),
    };

    if let Err(response) = result {
        match serde_json::to_string(&response) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("Error: {}", response.error),
        }
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
type CmdResult = Result<(), ErrorResponse>;

#[cfg(feature = "cli")]
fn load(loader: &Loader, file: &str) -> Result<String, ErrorResponse> {
    loader
        .load(&Source::from_arg(file))
        .map_err(ErrorResponse::from)
}

#[cfg(feature = "cli")]
fn print_json<T: Serialize>(value: &T, pretty: bool) -> CmdResult {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    let json = json.map_err(|e| ErrorResponse::from(xmlbind::Error::from(e)))?;
    println!("{}", json);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_check(loader: &Loader, file: &str) -> CmdResult {
    let xml = load(loader, file)?;

    if is_well_formed(&xml) {
        println!("✓ Document is well-formed");
        Ok(())
    } else {
        println!("✗ Document is not well-formed");
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_parse(service: &XmlService, loader: &Loader, file: &str, pretty: bool) -> CmdResult {
    let xml = load(loader, file)?;
    let response = service.handle_parse(&xml)?;
    print_json(&response, pretty)
}

#[cfg(feature = "cli")]
fn cmd_bind(
    service: &XmlService,
    loader: &Loader,
    file: &str,
    type_id: &str,
    pretty: bool,
) -> CmdResult {
    let xml = load(loader, file)?;
    let response = service.handle_bind(&xml, type_id)?;
    print_json(&response, pretty)
}

#[cfg(feature = "cli")]
fn cmd_marshal(service: &XmlService, loader: &Loader, file: &str, type_id: &str) -> CmdResult {
    let xml = load(loader, file)?;
    let marshaller = service.marshaller();

    let object = marshaller
        .unmarshal(&xml, type_id)
        .map_err(ErrorResponse::from)?;
    let output = marshaller
        .marshal(&*object)
        .map_err(ErrorResponse::from)?;

    println!("{}", output);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_types(service: &XmlService) -> CmdResult {
    for descriptor in service.marshaller().registry().descriptors() {
        println!("{} <{}>", descriptor.identifier(), descriptor.root_element());
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
