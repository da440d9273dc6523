use super::model::PostTable;

// ---------------------------------------------------------------------------
// Free-text row filter for the full data table
// ---------------------------------------------------------------------------

/// Return indices of posts whose string form matches the search term.
///
/// * Empty term → every row, in source order (identity, not "match nothing").
/// * Otherwise → rows where any column's text contains the term as a
///   case-insensitive substring. Missing cells stringify as empty and so
///   never match.
pub fn search_indices(table: &PostTable, term: &str) -> Vec<usize> {
    if term.is_empty() {
        return (0..table.len()).collect();
    }
    let needle = term.to_lowercase();
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            rec.cells()
                .iter()
                .any(|cell| cell.to_lowercase().contains(&needle))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader;

    #[test]
    fn empty_term_is_identity() {
        let table = loader::synthetic(Some(1));
        let hits = search_indices(&table, "");
        assert_eq!(hits, (0..table.len()).collect::<Vec<_>>());
    }

    #[test]
    fn search_is_case_insensitive_and_spans_all_columns() {
        let table = loader::synthetic(Some(1));
        let by_platform = search_indices(&table, "twitter");
        assert_eq!(by_platform.len(), 25); // every 4th of 100 rows
        assert!(by_platform.iter().all(|&i| table.records[i].platform == "Twitter"));

        // Matches the day_of_week column too.
        let by_day = search_indices(&table, "MONDAY");
        assert!(!by_day.is_empty());
        assert!(by_day.iter().all(|&i| table.records[i].day_of_week == "Monday"));
    }

    #[test]
    fn non_matching_term_yields_empty() {
        let table = loader::synthetic(Some(1));
        assert!(search_indices(&table, "zzz-no-such-value").is_empty());
    }
}
