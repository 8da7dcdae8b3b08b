use crate::cli::{ApplyArgs, Cli, Command, DiffArgs, OutputFormat, PatchArgs, StatArgs};
use crate::config::Config;
use anyhow::Context;
use seqdiff_core::{
    apply_patch, changes_to_html, changes_to_tuples, create_patch, diff_with, line_stats,
    ChangeKind, Component,
};
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub fn run_command(cli: Cli, config: &Config) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args, config),
        Command::Patch(args) => cmd_patch(args),
        Command::Apply(args) => cmd_apply(args),
        Command::Stat(args) => cmd_stat(args),
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn cmd_diff(args: DiffArgs, config: &Config) -> anyhow::Result<()> {
    let mode = args.mode.unwrap_or(config.mode);
    let format = args.format.unwrap_or(config.format);
    let old = read_input(&args.old)?;
    let new = read_input(&args.new)?;

    debug!(?mode, ?format, "diffing");
    let script = diff_with(mode.strategy(), &old, &new);
    let output = match format {
        OutputFormat::Plain => render_plain(&script),
        OutputFormat::Html => changes_to_html(&script) + "\n",
        OutputFormat::Tuples => serde_json::to_string_pretty(&changes_to_tuples(&script))? + "\n",
        OutputFormat::Json => serde_json::to_string_pretty(&script)? + "\n",
    };
    print!("{output}");
    Ok(())
}

/// One output line per line of each component, prefixed `+`, `-` or ` `
fn render_plain(script: &[Component]) -> String {
    let mut out = String::new();
    for component in script {
        let prefix = match component.kind {
            ChangeKind::Insert => '+',
            ChangeKind::Delete => '-',
            ChangeKind::Equal => ' ',
        };
        for line in component.value.split_inclusive('\n') {
            out.push(prefix);
            out.push_str(line);
            if !line.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

fn cmd_patch(args: PatchArgs) -> anyhow::Result<()> {
    let old = read_input(&args.old)?;
    let new = read_input(&args.new)?;
    let label = args.label.unwrap_or_else(|| args.new.display().to_string());

    let patch = create_patch(
        &label,
        &old,
        &new,
        args.old_header.as_deref(),
        args.new_header.as_deref(),
    );
    print!("{patch}");
    Ok(())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let base = read_input(&args.base)?;
    let patch = read_input(&args.patch)?;

    let patched = apply_patch(&base, &patch).with_context(|| {
        format!(
            "{} does not apply to {}",
            args.patch.display(),
            args.base.display()
        )
    })?;
    print!("{patched}");
    Ok(())
}

fn cmd_stat(args: StatArgs) -> anyhow::Result<()> {
    let old = read_input(&args.old)?;
    let new = read_input(&args.new)?;
    let stats = line_stats(&old, &new);
    println!(
        "{} insertion(s)(+), {} deletion(s)(-)",
        stats.insertions, stats.deletions
    );
    Ok(())
}
