//! # tgchat CLI
//!
//! Command-line interface for the tgchat library.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use clap::Parser as ClapParser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tgchat::cli::{Args, OutputFormat};
use tgchat::config::DecodeConfig;
use tgchat::parser::ExportParser;
use tgchat::{Conversation, Message, TgchatError};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "tgchat=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), TgchatError> {
    let config = DecodeConfig::new().with_keep_service_events(args.keep_service);
    let parser = ExportParser::with_config(config);

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if args.streaming {
        info!(input = %args.input, "streaming export");
        let mut count = 0usize;
        for result in parser.stream(&args.input)? {
            write_line(&mut out, &result?)?;
            count += 1;
        }
        debug!(count, "streamed messages");
    } else {
        info!(input = %args.input, format = %args.format, "decoding export");
        let conv = parser.parse(&args.input)?;
        match args.format {
            OutputFormat::Summary => write_summary(&mut out, &conv)?,
            OutputFormat::Text => {
                for msg in conv.messages() {
                    write_line(&mut out, msg)?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &conv).map_err(io::Error::from)?;
                writeln!(out)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn write_summary(out: &mut impl Write, conv: &Conversation) -> io::Result<()> {
    let media = conv.messages().iter().filter(|m| m.is_media()).count();
    let first_person = if conv.first_person_id().is_empty() {
        "(unknown)".to_string()
    } else {
        format!("{} ({})", conv.first_person_name(), conv.first_person_id())
    };

    writeln!(out, "📦 tgchat v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    writeln!(out, "👤 Partner:      {} ({})", conv.partner_name(), conv.partner_id())?;
    writeln!(out, "👤 First person: {}", first_person)?;
    writeln!(out, "💬 Chat type:    {}", conv.chat_type())?;
    writeln!(out, "📊 Messages:     {}", conv.len())?;
    writeln!(out, "🖼  With media:   {}", media)?;
    Ok(())
}

fn write_line(out: &mut impl Write, msg: &Message) -> io::Result<()> {
    let date = msg
        .date()
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| msg.general_info().date.clone());

    write!(out, "[{}] {}: {}", date, msg.sender(), msg.text())?;
    if msg.is_media() {
        write!(out, " [{}]", msg.media_type())?;
    }
    writeln!(out)
}
