use std::io::Write;

use eyre::Context;
use shelf::BookRecord;

/// How records are written out.
#[derive(Clone, Copy, Debug)]
pub struct Output {
    pub pretty: bool,
    pub raw: bool,
}

/// Writes `record` as a single JSON document followed by a newline.
///
/// This is the hand-off format for whatever publishes the record.
pub fn write_record<W: Write>(
    out: &mut W,
    mut record: BookRecord,
    output: Output,
) -> eyre::Result<()> {
    if !output.raw {
        record.raw_detail = None;
    }

    if output.pretty {
        serde_json::to_writer_pretty(&mut *out, &record)
    } else {
        serde_json::to_writer(&mut *out, &record)
    }
    .wrap_err("Cannot write record as JSON")?;

    writeln!(out).wrap_err("Cannot write record as JSON")
}

#[cfg(test)]
mod tests {
    use super::{write_record, Output};
    use shelf::BookRecord;

    #[test]
    fn compact_output_is_one_line() {
        let mut out = Vec::new();
        let record = BookRecord::unresolved("9780000000002".to_owned());

        write_record(
            &mut out,
            record,
            Output {
                pretty: false,
                raw: true,
            },
        )
        .unwrap();

        assert_eq!(
            "{\"title\":\"Unidentified Book with ISBN: 9780000000002\",\"isbn13\":\"9780000000002\"}\n",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn raw_payload_can_be_dropped() {
        let mut out = Vec::new();
        let mut record = BookRecord::unresolved("9780000000002".to_owned());
        record.raw_detail = Some(serde_json::json!({"key": "/works/OL1W"}));

        write_record(
            &mut out,
            record,
            Output {
                pretty: true,
                raw: false,
            },
        )
        .unwrap();

        assert!(!String::from_utf8(out).unwrap().contains("rawDetail"));
    }
}
