use crate::search::RankedDocument;
use std::io::{self, Write};

/// One line of a TREC run: `<qid> Q0 <docno> <rank> <score> <tag>`.
pub fn format_run_line(query_id: &str, hit: &RankedDocument, run_tag: &str) -> String {
    format!("{} Q0 {} {} {} {}", query_id, hit.external_id, hit.rank, hit.score, run_tag)
}

/// Write one query's ranked list as a contiguous block.
pub fn write_run<W: Write>(out: &mut W, query_id: &str, hits: &[RankedDocument], run_tag: &str) -> io::Result<()> {
    for hit in hits {
        writeln!(out, "{}", format_run_line(query_id, hit, run_tag))?;
    }
    Ok(())
}
