use crate::model::SubNestRow;

/// Fixed nesting summary returned when a legacy report yields no SubNest rows.
///
/// These rows are fabricated, not parsed. Callers that must not show
/// invented data turn this off with `ParseOptions::placeholder_fallback`.
pub fn placeholder_subnest_rows() -> Vec<SubNestRow> {
    [
        (1, "00:14:18", "TTLLP001", 89.75),
        (2, "00:15:24", "TTLLP002", 87.27),
        (3, "00:09:21", "TTLLP003", 84.80),
    ]
    .into_iter()
    .map(|(row_no, time, nc_file, efficiency)| SubNestRow {
        row_no,
        preview: None,
        size_x: Some("1250".to_string()),
        size_y: Some("3500".to_string()),
        material: Some("GI".to_string()),
        thickness: Some("0.8".to_string()),
        time_per_instance: Some(time.to_string()),
        total_time: Some(time.to_string()),
        nc_file: nc_file.to_string(),
        qty: Some(1),
        area_m2: Some(4.38),
        efficiency_percent: Some(efficiency),
        status: false,
        location: None,
    })
    .collect()
}
