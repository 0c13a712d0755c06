// Mon Aug 24 2026 - Alex

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use sigresolve::{CppAbi, Signature, SymbolResolver};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sigresolve")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Resolve C++ exports in ELF/PE binaries by signature", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[arg(long, global = true)]
    json: bool,

    /// Name-decoration scheme of the target library (defaults to the
    /// host's)
    #[arg(long, global = true)]
    abi: Option<AbiArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AbiArg {
    Itanium,
    Msvc,
}

impl From<AbiArg> for CppAbi {
    fn from(value: AbiArg) -> Self {
        match value {
            AbiArg::Itanium => CppAbi::Itanium,
            AbiArg::Msvc => CppAbi::Msvc,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the image's sections
    Sections { binary: PathBuf },
    /// List exported symbols, optionally scoped to one section
    Symbols {
        binary: PathBuf,
        #[arg(short, long)]
        section: Option<String>,
        #[arg(short, long)]
        demangle: bool,
        #[arg(long)]
        stats: bool,
    },
    /// Resolve a function or member function by signature
    Find {
        binary: PathBuf,
        name: String,
        #[arg(short, long)]
        class: Option<String>,
        #[arg(short, long = "param")]
        params: Vec<String>,
        #[arg(long = "const")]
        is_const: bool,
        #[arg(long = "volatile")]
        is_volatile: bool,
    },
    /// Resolve a class's constructor entry points
    Ctor {
        binary: PathBuf,
        class: String,
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
    /// Resolve a class's destructor entry points
    Dtor { binary: PathBuf, class: String },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    match &args.command {
        Command::Sections { binary } => {
            let resolver = load(binary, args.abi)?;
            let sections = resolver.image().sections.clone();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&sections)?);
            } else {
                for s in &sections {
                    println!(
                        "{:3}  {:<20} addr={:#010x} size={:#8x} {:?}",
                        s.index,
                        s.name.cyan(),
                        s.addr,
                        s.size,
                        s.flags
                    );
                }
            }
        }
        Command::Symbols {
            binary,
            section,
            demangle,
            stats,
        } => {
            let resolver = load(binary, args.abi)?;
            let names = match section {
                Some(section) => resolver
                    .symbols_in(section)
                    .with_context(|| format!("no section named {}", section))?,
                None => resolver.symbols(),
            };

            if *stats {
                println!(
                    "{} {} symbols, {} demangled",
                    "[*]".blue(),
                    resolver.catalog().len(),
                    resolver.catalog().demangled_count()
                );
            }

            if args.json {
                if *demangle {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(resolver.catalog().entries())?
                    );
                } else {
                    println!("{}", serde_json::to_string_pretty(&names)?);
                }
            } else {
                for name in &names {
                    if *demangle {
                        println!(
                            "{}  {}",
                            name,
                            sigresolve::catalog::demangle::demangle_or_raw(name).green()
                        );
                    } else {
                        println!("{}", name);
                    }
                }
            }
        }
        Command::Find {
            binary,
            name,
            class,
            params,
            is_const,
            is_volatile,
        } => {
            let resolver = load(binary, args.abi)?;
            let mut signature = Signature::new()
                .const_qualified(*is_const)
                .volatile_qualified(*is_volatile);
            for param in params {
                signature = signature.arg_name(param);
            }

            let found = match class {
                Some(class) => resolver.get_mem_fn(class, name, &signature),
                None => resolver.get_function(name, &signature),
            };
            match found {
                Some(mangled) if args.json => println!("{}", serde_json::to_string(&mangled)?),
                Some(mangled) => println!("{} {}", "[+]".green(), mangled),
                None => {
                    eprintln!("{} no matching export for {}", "[!]".red(), name);
                    std::process::exit(1);
                }
            }
        }
        Command::Ctor {
            binary,
            class,
            params,
        } => {
            let resolver = load(binary, args.abi)?;
            let mut signature = Signature::new();
            for param in params {
                signature = signature.arg_name(param);
            }
            let ctors = resolver.get_constructor(class, &signature);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&ctors)?);
            } else {
                println!("standard:   {}", ctors.standard.as_deref().unwrap_or("-"));
                println!("allocating: {}", ctors.allocating.as_deref().unwrap_or("-"));
            }
        }
        Command::Dtor { binary, class } => {
            let resolver = load(binary, args.abi)?;
            let dtors = resolver.get_destructor(class);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&dtors)?);
            } else {
                println!("standard: {}", dtors.standard.as_deref().unwrap_or("-"));
                println!("deleting: {}", dtors.deleting.as_deref().unwrap_or("-"));
            }
        }
    }

    Ok(())
}

fn load(path: &PathBuf, abi: Option<AbiArg>) -> anyhow::Result<SymbolResolver> {
    let resolver = SymbolResolver::load(path)
        .with_context(|| format!("{} is not a loadable module", path.display()))?;
    Ok(match abi {
        Some(abi) => resolver.with_abi(abi.into()),
        None => resolver,
    })
}
