use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use jpar_archive::{EntryInfo, EntryKind};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Pretty
        }
    }
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    name: String,
    kind: &'static str,
    mode: String,
    uname: &'a str,
    gname: &'a str,
    size: u64,
    mtime: u64,
}

impl<'a> From<&'a EntryInfo> for EntryOutput<'a> {
    fn from(info: &'a EntryInfo) -> Self {
        Self {
            name: info.path.display().to_string(),
            kind: kind_name(info.kind),
            mode: format!("{:04o}", info.mode),
            uname: info.uname.as_deref().unwrap_or(""),
            gname: info.gname.as_deref().unwrap_or(""),
            size: info.size,
            mtime: info.mtime,
        }
    }
}

/// Prints dumped entries as they are decoded. Tables are held until [`finish`](Self::finish).
pub struct EntryPrinter {
    format: OutputFormat,
    table: Option<Table>,
}

impl EntryPrinter {
    pub fn new(format: OutputFormat) -> Self {
        let table = matches!(format, OutputFormat::Table).then(|| {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["MODE", "OWNER", "GROUP", "SIZE", "MTIME", "NAME"]);
            table
        });
        Self { format, table }
    }

    pub fn print(&mut self, info: &EntryInfo) {
        match self.format {
            OutputFormat::Json => println!("{}", entry_json(info)),
            OutputFormat::Pretty => println!("{}", entry_line(info)),
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    let out = EntryOutput::from(info);
                    table.add_row(vec![
                        info.mode_string(),
                        out.uname.to_string(),
                        out.gname.to_string(),
                        out.size.to_string(),
                        out.mtime.to_string(),
                        out.name,
                    ]);
                }
            }
        }
    }

    pub fn finish(self) {
        if let Some(table) = self.table {
            println!("{table}");
        }
    }
}

/// Tab-separated listing line: mode, links, owner, group, size, mtime, name.
pub fn entry_line(info: &EntryInfo) -> String {
    let out = EntryOutput::from(info);
    format!(
        "{}\t0\t{}\t{}\t{}\t{}\t{}",
        info.mode_string(),
        out.uname,
        out.gname,
        out.size,
        out.mtime,
        out.name
    )
}

pub fn entry_json(info: &EntryInfo) -> String {
    serde_json::to_string(&EntryOutput::from(info)).unwrap_or_else(|_| "{}".to_string())
}

fn kind_name(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "file",
        EntryKind::Directory => "directory",
        EntryKind::Symlink => "symlink",
        EntryKind::Other(_) => "other",
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn info() -> EntryInfo {
        EntryInfo {
            path: PathBuf::from("docs/readme.txt"),
            kind: EntryKind::File,
            size: 70_000,
            mode: 0o644,
            uname: Some("alice".to_string()),
            gname: None,
            mtime: 1_700_000_000,
        }
    }

    #[test]
    fn pretty_line_layout() {
        assert_eq!(
            entry_line(&info()),
            "-rw-r--r--\t0\talice\t\t70000\t1700000000\tdocs/readme.txt"
        );
    }

    #[test]
    fn json_fields() {
        let value: serde_json::Value = serde_json::from_str(&entry_json(&info())).unwrap();
        assert_eq!(value["name"], "docs/readme.txt");
        assert_eq!(value["kind"], "file");
        assert_eq!(value["mode"], "0644");
        assert_eq!(value["uname"], "alice");
        assert_eq!(value["gname"], "");
        assert_eq!(value["size"], 70_000);
        assert_eq!(value["mtime"], 1_700_000_000u64);
    }
}
