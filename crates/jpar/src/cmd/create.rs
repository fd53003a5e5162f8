use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::{Component, Path, PathBuf};

use jpar_archive::{ArchiveConfig, ArchiveWriter};
use tracing::{info, warn};

use crate::cmd::CreateArgs;
use crate::exit::{archive_error, io_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: CreateArgs) -> CliResult<i32> {
    if args.files.is_empty() {
        return Err(CliError::new(
            USAGE,
            "no input files (usage: jpar FILE... or jpar dump ARCHIVE)",
        ));
    }
    // Nothing is written until every input is known to exist.
    let inputs = collect_inputs(&args.files)?;
    let config = ArchiveConfig::with_level(args.level);

    match &args.output {
        Some(path) => {
            write_to_path(path, &inputs, config)?;
            info!(output = %path.display(), files = inputs.len(), "archive written");
        }
        None => {
            let stdout = std::io::stdout();
            if stdout.is_terminal() {
                return Err(CliError::new(
                    USAGE,
                    "refusing to write an archive to a terminal; redirect stdout or pass --output",
                ));
            }
            write_archive(stdout.lock(), &inputs, config)?;
        }
    }

    Ok(SUCCESS)
}

/// A file named on the command line and the name it is stored under.
struct Input<'a> {
    path: &'a Path,
    name: PathBuf,
}

fn collect_inputs(files: &[PathBuf]) -> CliResult<Vec<Input<'_>>> {
    files
        .iter()
        .map(|path| {
            let name = archive_name(path)?;
            std::fs::symlink_metadata(path)
                .map_err(|err| io_error(&format!("stat {}", path.display()), err))?;
            Ok(Input { path, name })
        })
        .collect()
}

/// Write the archive to `path`, removing the file again if writing fails.
fn write_to_path(path: &Path, inputs: &[Input<'_>], config: ArchiveConfig) -> CliResult<()> {
    let file = File::create(path)
        .map_err(|err| io_error(&format!("failed creating {}", path.display()), err))?;

    let result = write_archive(BufWriter::new(file), inputs, config);
    if result.is_err() {
        if let Err(err) = std::fs::remove_file(path) {
            warn!(output = %path.display(), %err, "partial archive left behind");
        }
    }
    result
}

fn write_archive<W: Write>(sink: W, inputs: &[Input<'_>], config: ArchiveConfig) -> CliResult<()> {
    let mut writer = ArchiveWriter::with_config(sink, config)
        .map_err(|err| archive_error("write header", err))?;

    for input in inputs {
        append(&mut writer, input)?;
    }

    let mut sink = writer
        .finish()
        .map_err(|err| archive_error("close archive", err))?;
    sink.flush().map_err(|err| io_error("flush output", err))
}

fn append<W: Write>(writer: &mut ArchiveWriter<W>, input: &Input<'_>) -> CliResult<()> {
    let path = input.path;
    let mut file = File::open(path)
        .map_err(|err| io_error(&format!("open {}", path.display()), err))?;
    let metadata = file
        .metadata()
        .map_err(|err| io_error(&format!("stat {}", path.display()), err))?;

    let result = if metadata.is_file() {
        writer.append_file(&input.name, &mut file)
    } else {
        writer.append_path_with_name(path, &input.name)
    };
    result.map_err(|err| archive_error(&format!("add {}", path.display()), err))?;

    info!(path = %input.name.display(), size = metadata.len(), "archived");
    Ok(())
}

/// Entry name for `path`: tar records only relative names without `..`.
fn archive_name(path: &Path) -> CliResult<PathBuf> {
    let name: PathBuf = path
        .components()
        .filter(|component| matches!(component, Component::Normal(_)))
        .collect();
    if name.as_os_str().is_empty() {
        return Err(CliError::new(
            USAGE,
            format!("cannot archive {}: no file name", path.display()),
        ));
    }
    if name != path {
        warn!(
            path = %path.display(),
            name = %name.display(),
            "stripped leading or parent components"
        );
    }
    Ok(name)
}
