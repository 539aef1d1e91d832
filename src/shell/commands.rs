//! Built-in shell commands
//!
//! One struct per command behind the [`Command`] trait. Every command that
//! accepts a path argument canonicalizes it with [`resolve_path`] before
//! touching the namespace.

use crate::fs::EntryKind;
use crate::shell::{resolve_path, Command, CommandRegistry, ShellContext, ShellError};

/// Default number of bytes printed by `head` and `tail`.
const DEFAULT_BYTE_COUNT: usize = 10;

/// Registry holding the full built-in set.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Box::new(Exit));
    registry.register(Box::new(Pwd));
    registry.register(Box::new(Cd));
    registry.register(Box::new(Ls));
    registry.register(Box::new(Help));
    registry.register(Box::new(Mkdir));
    registry.register(Box::new(Rmdir));
    registry.register(Box::new(Head));
    registry.register(Box::new(Tail));
    registry.register(Box::new(Wc));
    registry.register(Box::new(Mv));
    registry
}

/// Resolve a path argument against the session's current directory.
fn full_path(ctx: &ShellContext<'_>, arg: &str) -> Result<String, ShellError> {
    Ok(resolve_path(&ctx.cwd, arg)?)
}

/// Parse a byte-count argument.
fn parse_count(arg: &str) -> Result<usize, ShellError> {
    arg.parse()
        .map_err(|_| ShellError::InvalidCount(arg.to_string()))
}

/// Last path segment, for display.
fn base_name(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("/")
}

/// The sole raiser of the loop-termination signal.
pub struct Exit;

impl Command for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn help_text(&self) -> &'static str {
        "Exits the shell"
    }

    fn usage(&self) -> &'static str {
        "usage: exit"
    }

    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        ctx.terminal.write_line("Bye!");
        ctx.request_exit();
        Ok(())
    }
}

pub struct Pwd;

impl Command for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn help_text(&self) -> &'static str {
        "Prints the current working directory"
    }

    fn usage(&self) -> &'static str {
        "usage: pwd"
    }

    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        ctx.terminal.write_line(&ctx.cwd);
        Ok(())
    }
}

/// The only writer of the session's current directory.
pub struct Cd;

impl Command for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn help_text(&self) -> &'static str {
        "Changes the current working directory"
    }

    fn usage(&self) -> &'static str {
        "usage: cd <directory>"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        if args.len() != 2 {
            return Err(ShellError::ExpectOneArg);
        }

        let path = full_path(ctx, args[1])?;
        match ctx.namespace.find(&path) {
            None => Err(ShellError::DirectoryNotFound(args[1].to_string())),
            Some(EntryKind::File) => Err(ShellError::NotADirectory(args[1].to_string())),
            Some(EntryKind::Directory) => {
                ctx.cwd = path;
                Ok(())
            }
        }
    }
}

pub struct Ls;

impl Command for Ls {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn help_text(&self) -> &'static str {
        "Lists the contents of a directory"
    }

    fn usage(&self) -> &'static str {
        "usage: ls <directory>"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        let path = match args.len() {
            1 => ctx.cwd.clone(),
            2 => full_path(ctx, args[1])?,
            _ => return Err(ShellError::ExpectOneArg),
        };

        let (dirs, files) = ctx
            .namespace
            .list(&path)
            .map_err(|_| ShellError::DirectoryNotFound(path.clone()))?;

        ctx.terminal.write_line("");
        for dir in dirs {
            ctx.terminal.write_line(&format!("\t/{dir}/"));
        }
        ctx.terminal.write_line("");
        for file in files {
            ctx.terminal.write_line(&format!("\t{file}"));
        }
        ctx.terminal.write_line("");
        Ok(())
    }
}

pub struct Help;

impl Command for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn help_text(&self) -> &'static str {
        "Prints a list of the available shell commands"
    }

    fn usage(&self) -> &'static str {
        "usage: help <cmd name>"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        match args.len() {
            1 => {
                let listing: Vec<String> = ctx
                    .registry
                    .iter()
                    .map(|c| format!("{} - {}", c.name(), c.help_text()))
                    .collect();
                for line in listing {
                    ctx.terminal.write_line(&line);
                }
                Ok(())
            }
            2 => {
                let line = match ctx.registry.get(args[1]) {
                    Some(command) => format!("{} - {}", command.name(), command.help_text()),
                    None => format!("Unknown command: {}", args[1]),
                };
                ctx.terminal.write_line(&line);
                Ok(())
            }
            _ => Err(ShellError::ExpectOneArg),
        }
    }
}

pub struct Mkdir;

impl Command for Mkdir {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn help_text(&self) -> &'static str {
        "Creates a new directory"
    }

    fn usage(&self) -> &'static str {
        "usage: mkdir <directory>"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        if args.len() != 2 {
            return Err(ShellError::ExpectOneArg);
        }

        let path = full_path(ctx, args[1])?;
        if ctx.namespace.find(&path).is_some() {
            return Err(ShellError::DirectoryExists(args[1].to_string()));
        }

        ctx.namespace.create_dir(&path)?;
        Ok(())
    }
}

pub struct Rmdir;

impl Command for Rmdir {
    fn name(&self) -> &'static str {
        "rmdir"
    }

    fn help_text(&self) -> &'static str {
        "Removes a directory"
    }

    fn usage(&self) -> &'static str {
        "usage: rmdir <directory>"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        if args.len() != 2 {
            return Err(ShellError::ExpectOneArg);
        }

        let path = full_path(ctx, args[1])?;
        match ctx.namespace.find(&path) {
            None => Err(ShellError::DirectoryNotFound(args[1].to_string())),
            Some(EntryKind::File) => Err(ShellError::NotADirectory(args[1].to_string())),
            Some(EntryKind::Directory) => {
                ctx.namespace.remove_dir(&path)?;
                Ok(())
            }
        }
    }
}

/// Shared body of `head` and `tail`.
fn read_slice(
    ctx: &ShellContext<'_>,
    args: &[&str],
    from_end: bool,
) -> Result<(), ShellError> {
    if args.len() < 2 {
        return Err(ShellError::ExpectAtLeastOneArg);
    }

    let mut count = DEFAULT_BYTE_COUNT;
    if args.len() == 3 {
        count = parse_count(args[2])?;
    }

    let path = full_path(ctx, args[1])?;
    if ctx.namespace.find(&path) != Some(EntryKind::File) {
        return Err(ShellError::FileNotFound(args[1].to_string()));
    }

    let stream = ctx.namespace.open(&path)?;
    let len = ctx.namespace.file_len(&path)?;
    let count = count.min(len as usize);
    let offset = if from_end { len - count as u64 } else { 0 };

    let bytes = stream.read(offset, count)?;
    ctx.terminal.write_line(&String::from_utf8_lossy(&bytes));
    Ok(())
}

pub struct Head;

impl Command for Head {
    fn name(&self) -> &'static str {
        "head"
    }

    fn help_text(&self) -> &'static str {
        "Prints the first bytes of a file"
    }

    fn usage(&self) -> &'static str {
        "usage: head <file> [count]"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        read_slice(ctx, args, false)
    }
}

pub struct Tail;

impl Command for Tail {
    fn name(&self) -> &'static str {
        "tail"
    }

    fn help_text(&self) -> &'static str {
        "Prints the last bytes of a file"
    }

    fn usage(&self) -> &'static str {
        "usage: tail <file> [count]"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        read_slice(ctx, args, true)
    }
}

pub struct Wc;

impl Command for Wc {
    fn name(&self) -> &'static str {
        "wc"
    }

    fn help_text(&self) -> &'static str {
        "Counts the lines, words, and characters in a file"
    }

    fn usage(&self) -> &'static str {
        "usage: wc <file>"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        if args.len() != 2 {
            return Err(ShellError::ExpectOneArg);
        }

        let path = full_path(ctx, args[1])?;
        if ctx.namespace.find(&path) != Some(EntryKind::File) {
            return Err(ShellError::FileNotFound(args[1].to_string()));
        }

        let stream = ctx.namespace.open(&path)?;
        let len = ctx.namespace.file_len(&path)? as usize;
        let text = String::from_utf8_lossy(&stream.read(0, len)?).into_owned();

        let mut lines = 0usize;
        let mut words = 0usize;
        let mut chars = 0usize;
        let mut in_word = false;
        for c in text.chars() {
            if c == ' ' || c == '\n' || c == '\r' || c == '\t' {
                if in_word {
                    words += 1;
                    in_word = false;
                }
                if c == '\n' {
                    lines += 1;
                }
            } else {
                in_word = true;
            }
            chars += 1;
        }
        if in_word {
            words += 1;
        }

        let report = format!(
            "{lines} lines  {words} words  {chars} characters\t{}",
            base_name(&path)
        );
        ctx.terminal.write_line(&report);
        Ok(())
    }
}

pub struct Mv;

impl Command for Mv {
    fn name(&self) -> &'static str {
        "mv"
    }

    fn help_text(&self) -> &'static str {
        "Moves an entry into another directory"
    }

    fn usage(&self) -> &'static str {
        "usage: mv <entry> <directory>"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError> {
        if args.len() != 3 {
            return Err(ShellError::ExpectTwoArgs);
        }

        let source = full_path(ctx, args[1])?;
        let dest = full_path(ctx, args[2])?;

        if ctx.namespace.find(&source).is_none() {
            return Err(ShellError::SourceNotFound(args[1].to_string()));
        }
        match ctx.namespace.find(&dest) {
            None => return Err(ShellError::DestinationNotFound(args[2].to_string())),
            Some(EntryKind::File) => {
                return Err(ShellError::NotADirectory(args[2].to_string()))
            }
            Some(EntryKind::Directory) => {}
        }

        ctx.namespace.move_entry(&source, &dest)?;
        Ok(())
    }
}
