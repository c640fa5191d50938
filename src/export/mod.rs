//! Spreadsheet export: CSV documents for video metadata and collected comments.
//!
//! - [`videos`] - video metadata sheet
//! - [`comments`] - comment sheet
//! - [`sink`] - where exported sheets (and downloaded media) end up
//!
//! Documents are UTF-8 with a leading byte-order mark so spreadsheet tools pick the right
//! encoding. A field is quoted only when it contains a delimiter, a quote or a line break;
//! embedded quotes are doubled.

pub mod comments;
pub mod sink;
pub mod videos;

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::types::ExportKind;

pub use comments::CommentSheet;
pub use sink::{ArtifactKind, ArtifactSink, DirectorySink};
pub use videos::VideoSheet;

/// Byte-order mark prepended to every document
pub const BOM: &str = "\u{feff}";

/// A sheet layout: fixed ordered headers plus a row builder per record
pub trait SheetSpec {
    /// Record type one row is built from
    type Record;

    /// Which sheet this is (drives the filename prefix)
    const KIND: ExportKind;

    /// Column headers, in order
    const HEADERS: &'static [&'static str];

    /// Build one row; must yield exactly `HEADERS.len()` fields
    fn row(record: &Self::Record) -> Vec<String>;
}

/// A sheet that was written through a sink
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedSheet {
    /// Which sheet
    pub kind: ExportKind,
    /// Filename it was saved under
    pub filename: String,
    /// Number of data rows (header excluded)
    pub rows: usize,
}

/// Encode rows under a header into a BOM-prefixed CSV document
pub fn encode_document<I>(headers: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    // Necessary also quotes a bare `\r`, so CRLF-splitting readers keep the field whole
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(BOM.as_bytes().to_vec());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(format!("CSV output is not UTF-8: {e}")))
}

/// Encode records with a sheet layout
pub fn encode_sheet<S: SheetSpec>(records: &[S::Record]) -> Result<String> {
    encode_document(S::HEADERS, records.iter().map(S::row))
}

/// Filename of an exported sheet: `<prefix>_<slug>_<YYYY-MM-DD>.csv`
pub fn export_filename(kind: ExportKind, slug: &str, date: NaiveDate) -> String {
    let slug: String = slug
        .trim()
        .trim_start_matches('@')
        .chars()
        .map(|c| match c {
            '/' | '\\' | ' ' => '_',
            other => other,
        })
        .collect();
    format!("{}_{}_{}.csv", kind.prefix(), slug, date.format("%Y-%m-%d"))
}

/// Encode a sheet and save it through the sink
pub async fn write_sheet<S: SheetSpec>(
    sink: &dyn ArtifactSink,
    records: &[S::Record],
    slug: &str,
    date: NaiveDate,
) -> Result<ExportedSheet> {
    let document = encode_sheet::<S>(records)?;
    let filename = export_filename(S::KIND, slug, date);

    sink.save(ArtifactKind::Sheet, &filename, document.as_bytes())
        .await?;

    tracing::info!(
        kind = S::KIND.prefix(),
        filename = %filename,
        rows = records.len(),
        "sheet exported"
    );

    Ok(ExportedSheet {
        kind: S::KIND,
        filename,
        rows: records.len(),
    })
}
