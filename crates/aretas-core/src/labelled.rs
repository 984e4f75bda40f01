// ── Labelled data reshaping ──
//
// Turns the exported `{key, value: {type: reading}}` rows into a dense
// table with a fixed column order, ready for numeric tooling.

use std::collections::BTreeSet;

use aretas_api::models::LabelledRow;

/// Distinct sensor types present in `rows`, ascending.
pub fn labelled_columns(rows: &[LabelledRow]) -> Vec<i64> {
    rows.iter()
        .flat_map(|row| row.value.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One output row per input row: the epoch-millisecond timestamp and
/// `[v(columns[0]), v(columns[1]), ...]`. A column the row has no reading
/// for is `NaN`.
pub fn reshape_labelled(rows: &[LabelledRow], columns: &[i64]) -> Vec<(i64, Vec<f64>)> {
    rows.iter()
        .map(|row| {
            let values = columns
                .iter()
                .map(|col| row.value.get(col).copied().unwrap_or(f64::NAN))
                .collect();
            (row.key, values)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn row(key: i64, values: &[(i64, f64)]) -> LabelledRow {
        LabelledRow {
            key,
            value: values.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn columns_are_sorted_and_distinct() {
        let rows = [row(1, &[(248, 1.0), (96, 2.0)]), row(2, &[(2, 3.0), (248, 4.0)])];
        assert_eq!(labelled_columns(&rows), vec![2, 96, 248]);
    }

    #[test]
    fn missing_readings_become_nan() {
        let rows = [row(1000, &[(248, 21.0)]), row(2000, &[(96, 40.0), (248, 22.0)])];
        let columns = labelled_columns(&rows);
        let table = reshape_labelled(&rows, &columns);

        assert_eq!(table.len(), 2);
        let (ts, values) = &table[0];
        assert_eq!(*ts, 1000);
        assert!(values[0].is_nan());
        assert!((values[1] - 21.0).abs() < f64::EPSILON);
        assert_eq!(table[1], (2000, vec![40.0, 22.0]));
    }
}
