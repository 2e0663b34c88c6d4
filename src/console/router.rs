//! Two-tier command dispatch
//!
//! An application hook registered at construction gets first refusal;
//! only then is the library table scanned. Exact, case-sensitive match
//! on the first token, second token passed as the single argument.

use core::fmt::Write;

use super::error::ConsoleError;
use super::format::{parse_hex_address, write_binary_table, write_hex_word};
use super::tokenizer::TokenSet;
use crate::platform::Platform;

/// Application command tier, consulted before the library table
///
/// Resolution in this tier always wins over a library entry of the same
/// name. Handlers run synchronously on the foreground loop and must not
/// block indefinitely.
pub trait ApplicationHook {
    /// Try to handle the token set; `true` means it was resolved here.
    fn resolve(&mut self, tokens: &TokenSet, platform: &dyn Platform, out: &mut dyn Write)
        -> bool;

    /// Application section of the `help` output.
    fn print_help(&self, out: &mut dyn Write);
}

/// Everything a library handler may touch
pub struct CommandContext<'a> {
    pub out: &'a mut dyn Write,
    pub platform: &'a dyn Platform,
    /// Present when an application tier is registered; used by `help`.
    pub app_help: Option<&'a dyn ApplicationHook>,
}

/// Library command descriptor
pub struct CommandEntry {
    pub name: &'static str,
    pub brief: &'static str,
    pub handler: fn(&mut CommandContext<'_>, Option<&str>) -> Result<(), ConsoleError>,
}

/// Library command table, scanned in order, first exact match wins
pub static LIBRARY_COMMANDS: &[CommandEntry] = &[
    CommandEntry { name: "rs", brief: "Restarts the program", handler: cmd_restart },
    CommandEntry { name: "help", brief: "Prints this help", handler: cmd_help },
    CommandEntry { name: "memdump", brief: "Prints the word at an address (hex)", handler: cmd_memdump_hex },
    CommandEntry { name: "memdumphex", brief: "Alias of memdump", handler: cmd_memdump_hex },
    CommandEntry { name: "mdh", brief: "Alias of memdump", handler: cmd_memdump_hex },
    CommandEntry { name: "memdumpbin", brief: "Prints the word at an address (binary)", handler: cmd_memdump_bin },
    CommandEntry { name: "mdb", brief: "Alias of memdumpbin", handler: cmd_memdump_bin },
];

/// Dispatch against the library table.
///
/// The caller has already given the application tier its chance.
pub fn dispatch_library(
    tokens: &TokenSet,
    ctx: &mut CommandContext<'_>,
) -> Result<(), ConsoleError> {
    if tokens.count() < 1 {
        return Ok(());
    }

    let entry = LIBRARY_COMMANDS
        .iter()
        .find(|c| c.name == tokens.command())
        .ok_or(ConsoleError::UnknownCommand)?;

    let _ = write!(ctx.out, "\r\n");
    (entry.handler)(ctx, tokens.arg())
}

// --- Library handlers ---

fn cmd_restart(ctx: &mut CommandContext<'_>, _arg: Option<&str>) -> Result<(), ConsoleError> {
    ctx.platform.restart();
    Ok(())
}

fn cmd_help(ctx: &mut CommandContext<'_>, _arg: Option<&str>) -> Result<(), ConsoleError> {
    let _ = write!(ctx.out, "\r\n**********************\r\n");
    let _ = write!(ctx.out, "** Default commands **\r\n");
    let _ = write!(ctx.out, "**********************\r\n\r\n");

    for c in LIBRARY_COMMANDS {
        let _ = write!(ctx.out, "{:<14}- {}\r\n", c.name, c.brief);
    }
    let _ = write!(ctx.out, "{:<14}  Example: memdump 0x50000000\r\n", "");
    let _ = write!(ctx.out, "-------------------------------------------\r\n");

    if let Some(app) = ctx.app_help {
        app.print_help(ctx.out);
    }
    Ok(())
}

fn cmd_memdump_hex(ctx: &mut CommandContext<'_>, arg: Option<&str>) -> Result<(), ConsoleError> {
    let addr = parse_hex_address(arg.ok_or(ConsoleError::BadAddressFormat)?)?;
    let _ = write_hex_word(ctx.out, ctx.platform.read_word(addr));
    Ok(())
}

fn cmd_memdump_bin(ctx: &mut CommandContext<'_>, arg: Option<&str>) -> Result<(), ConsoleError> {
    let addr = parse_hex_address(arg.ok_or(ConsoleError::BadAddressFormat)?)?;
    let _ = write_binary_table(ctx.out, ctx.platform.read_word(addr));
    Ok(())
}
