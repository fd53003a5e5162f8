use std::fs::File;
use std::io::BufReader;

use jpar_archive::{ArchiveError, ArchiveReader, EntryInfo};
use tracing::debug;

use crate::cmd::DumpArgs;
use crate::exit::{archive_error, io_error, CliResult, SUCCESS};
use crate::output::{EntryPrinter, OutputFormat};

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let context = format!("dump {}", args.archive.display());
    let file = File::open(&args.archive).map_err(|err| io_error(&context, err))?;

    let mut reader =
        ArchiveReader::new(BufReader::new(file)).map_err(|err| archive_error(&context, err))?;
    let entries = reader
        .entries()
        .map_err(|err| archive_error(&context, err))?;

    let mut printer = EntryPrinter::new(format);
    let mut count = 0usize;
    for entry in entries {
        let entry = entry.map_err(|err| archive_error(&context, ArchiveError::from(err)))?;
        let info = EntryInfo::from_entry(&entry)
            .map_err(|err| archive_error(&context, ArchiveError::from(err)))?;
        printer.print(&info);
        count += 1;
    }
    printer.finish();

    debug!(entries = count, "dump complete");
    Ok(SUCCESS)
}
