use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use printfmt::api::{CmdMessage, MessageLevel, PrintApi, TemplateSource, STANDARD_FORMAT};
use printfmt::config::PrintConfig;
use printfmt::context::RequestContext;
use printfmt::engine::StencilEngine;
use printfmt::error::{PrintError, Result};
use printfmt::model::{PrintFormatRecord, PrintParams};
use printfmt::permissions::RolePermissions;
use printfmt::store::fs::FileStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands, FormatCommands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("printfmt=debug,stencil=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

struct AppContext {
    api: PrintApi<FileStore, StencilEngine, RolePermissions>,
    request: RequestContext,
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Print {
            doctype,
            name,
            format,
            style,
            json,
            css_out,
        } => {
            let params = PrintParams {
                doctype,
                name,
                format,
                style,
            };
            handle_print(&mut ctx, params, json, css_out)
        }
        Commands::Resolve { doctype, format } => handle_resolve(&ctx, &doctype, &format),
        Commands::Style { name } => handle_style(&ctx, name.as_deref()),
        Commands::Format(FormatCommands::List) => handle_format_list(&ctx),
        Commands::Format(FormatCommands::Save { file }) => handle_format_save(&mut ctx, &file),
        Commands::Format(FormatCommands::Delete { name }) => handle_format_delete(&mut ctx, &name),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = match &cli.home {
        Some(home) => home.clone(),
        None => ProjectDirs::from("com", "printfmt", "printfmt")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| PrintError::Store("Could not determine data directory".into()))?,
    };

    let config = PrintConfig::load(&home)?.resolve_paths(&home);
    let permissions = RolePermissions::load(&home)?;
    let user = permissions.user(&cli.user);

    let engine = StencilEngine::with_search_paths(config.template_dirs.clone());
    let store = FileStore::new(home);

    Ok(AppContext {
        api: PrintApi::new(store, engine, permissions),
        request: RequestContext::new(user, config),
    })
}

fn handle_print(
    ctx: &mut AppContext,
    params: PrintParams,
    json: bool,
    css_out: Option<PathBuf>,
) -> Result<()> {
    let request = ctx.request.clone().with_params(params);
    let response = ctx.api.print(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if let (Some(path), Some(css)) = (css_out, response.css.as_deref()) {
        fs::write(&path, css)?;
        eprintln!("{}", format!("Stylesheet written to {}", path.display()).dimmed());
    }
    println!("{}", response.body);
    Ok(())
}

fn handle_resolve(ctx: &AppContext, doctype: &str, format: &str) -> Result<()> {
    match ctx.api.print_format(&ctx.request, doctype, format)? {
        TemplateSource::Standard => {
            eprintln!("{}", "standard layout (built-in)".dimmed());
            println!("{}", stencil::builtin(STANDARD_FORMAT).unwrap_or_default());
        }
        TemplateSource::File { path, source } => {
            eprintln!("{}", format!("file: {}", path.display()).dimmed());
            println!("{}", source);
        }
        TemplateSource::Stored(source) => {
            eprintln!("{}", "stored on record".dimmed());
            println!("{}", source);
        }
    }
    Ok(())
}

fn handle_style(ctx: &AppContext, name: Option<&str>) -> Result<()> {
    let css = ctx.api.print_style(&ctx.request, name)?;
    println!("{}", css);
    Ok(())
}

fn handle_format_list(ctx: &AppContext) -> Result<()> {
    let formats = ctx.api.list_formats()?;
    if formats.is_empty() {
        println!("{}", "No print formats.".dimmed());
        return Ok(());
    }

    for record in formats {
        let mut flags = Vec::new();
        if record.is_standard() {
            flags.push("standard".cyan().to_string());
        }
        if record.disabled {
            flags.push("disabled".red().to_string());
        }
        println!(
            "{}  {}  {}",
            record.name.bold(),
            record.doc_type.as_deref().unwrap_or("-").dimmed(),
            flags.join(" ")
        );
    }
    Ok(())
}

fn read_record(file: &Path) -> Result<PrintFormatRecord> {
    let content = fs::read_to_string(file)?;
    Ok(serde_json::from_str(&content)?)
}

fn handle_format_save(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let record = read_record(file)?;
    let result = ctx.api.save_format(&ctx.request, record)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_format_delete(ctx: &mut AppContext, name: &str) -> Result<()> {
    let result = ctx.api.delete_format(&ctx.request, name)?;
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
        }
    }
}
