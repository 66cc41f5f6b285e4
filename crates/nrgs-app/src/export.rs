//! CSV export of dispatch tables and reactor trajectories.

use std::io::Write;

use nrgs_grid::DispatchResult;
use nrgs_reactor::TransientResult;

use crate::error::{AppError, AppResult};

/// Columns: `hour`, one per source, `unserved_mw`, then `outage_active` when given.
pub fn write_dispatch_csv<W: Write>(
    writer: W,
    dispatch: &DispatchResult,
    outage_active: Option<&[bool]>,
) -> AppResult<()> {
    if let Some(mask) = outage_active
        && mask.len() != dispatch.hours()
    {
        return Err(AppError::Export(format!(
            "outage mask has {} entries for {} hours",
            mask.len(),
            dispatch.hours()
        )));
    }

    let mut csv = csv::Writer::from_writer(writer);
    let mut header = vec!["hour".to_string()];
    header.extend(dispatch.columns().iter().map(|k| k.to_string()));
    header.push("unserved_mw".to_string());
    if outage_active.is_some() {
        header.push("outage_active".to_string());
    }
    csv.write_record(&header)?;

    for (h, row) in dispatch.rows().iter().enumerate() {
        let mut record = vec![h.to_string()];
        record.extend(row.dispatched_mw.iter().map(|mw| mw.to_string()));
        record.push(row.unserved_mw.to_string());
        if let Some(mask) = outage_active {
            record.push(mask[h].to_string());
        }
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

/// One row per sample, fields named after [`nrgs_reactor::TransientSample`].
pub fn write_transient_csv<W: Write>(writer: W, result: &TransientResult) -> AppResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for sample in result.samples() {
        csv.serialize(sample)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrgs_grid::{
        DispatchOptions, GenerationSource, SourceCatalog, SourceKind, merit_order_dispatch,
    };

    #[test]
    fn dispatch_table_layout() {
        let cat = SourceCatalog::new(vec![
            GenerationSource::new(SourceKind::Hydro, 100.0, 5.0),
            GenerationSource::new(SourceKind::Wind, 50.0, 2.0),
        ])
        .unwrap();
        let r = merit_order_dispatch(&cat, &[120.0, 200.0], &DispatchOptions::default()).unwrap();

        let mut buf = Vec::new();
        write_dispatch_csv(&mut buf, &r, Some(&[false, true])).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "hour,hydro,wind,unserved_mw,outage_active");
        assert_eq!(lines[1], "0,70,50,0,false");
        assert_eq!(lines[2], "1,100,50,50,true");
    }

    #[test]
    fn mismatched_mask_rejected() {
        let cat = SourceCatalog::kenya_baseline();
        let r = merit_order_dispatch(&cat, &[100.0], &DispatchOptions::default()).unwrap();
        let err = write_dispatch_csv(Vec::new(), &r, Some(&[])).unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
    }
}
