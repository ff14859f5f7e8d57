use cutsheet_core::extraction::PositionFragment;
use cutsheet_core::model::{MaterialRow, PageLocation, ParsedSheets, PartRow, SubNestRow};

use crate::SectionArg;

pub fn print_parsed(parsed: &ParsedSheets, section: SectionArg) {
    let all = section == SectionArg::All;

    if all || section == SectionArg::Subnest {
        let suffix = if parsed.used_placeholder {
            " (placeholder)"
        } else {
            ""
        };
        println!("=== SubNest [{}]{} ===\n", parsed.family, suffix);
        print_subnest(&parsed.subnest);
    }
    if all || section == SectionArg::Parts {
        println!("=== Parts ===\n");
        print_parts(&parsed.parts);
    }
    if all || section == SectionArg::Material {
        println!("=== Material Data ===\n");
        print_materials(&parsed.materials);
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn location(loc: &Option<PageLocation>) -> String {
    match loc {
        Some(l) => format!("p{} y={:.1}", l.page, l.y_position),
        None => "-".to_string(),
    }
}

fn print_subnest(rows: &[SubNestRow]) {
    if rows.is_empty() {
        println!("  (none)\n");
        return;
    }

    println!(
        "  {:>3}  {:>11}  {:<6} {:>5}  {:>10}  {:<12} {:>4} {:>8} {:>7}  {}",
        "No", "Size", "Mat", "Thk", "Time", "NC file", "Qty", "Area m2", "Eff %", "Where"
    );
    for r in rows {
        let size = format!("{}x{}", opt(&r.size_x), opt(&r.size_y));
        println!(
            "  {:>3}  {:>11}  {:<6} {:>5}  {:>10}  {:<12} {:>4} {:>8} {:>7}  {}",
            r.row_no,
            size,
            opt(&r.material),
            opt(&r.thickness),
            opt(&r.total_time),
            r.nc_file,
            r.qty.map_or("-".to_string(), |q| q.to_string()),
            r.area_m2.map_or("-".to_string(), |a| format!("{a:.2}")),
            r.efficiency_percent
                .map_or("-".to_string(), |e| format!("{e:.2}")),
            location(&r.location),
        );
    }
    println!();
}

fn print_parts(rows: &[PartRow]) {
    if rows.is_empty() {
        println!("  (none)\n");
        return;
    }

    let max_name = rows
        .iter()
        .map(|r| r.part_name.len())
        .max()
        .unwrap_or(10)
        .max(4);

    println!(
        "  {:>3}  {:<width$}  {:<6} {:>5}  {:>4} {:>6}  {:>7}  {:>9}  {}",
        "No",
        "Name",
        "Mat",
        "Thk",
        "Req",
        "Placed",
        "Weight",
        "Cut len",
        "Where",
        width = max_name
    );
    for r in rows {
        println!(
            "  {:>3}  {:<width$}  {:<6} {:>5}  {:>4} {:>6}  {:>7.2}  {:>9.1}  {}",
            r.row_no,
            r.part_name,
            opt(&r.material),
            opt(&r.thickness),
            r.required_qty,
            r.placed_qty,
            r.weight_kg,
            r.cutting_length,
            location(&r.location),
            width = max_name
        );
    }
    println!();
}

fn print_materials(rows: &[MaterialRow]) {
    if rows.is_empty() {
        println!("  (none)\n");
        return;
    }

    println!("  {:<6} {:>5}  {:>11}  {:>6}", "Mat", "Thk", "Size", "Sheets");
    for r in rows {
        let size = format!("{}x{}", opt(&r.size_x), opt(&r.size_y));
        println!(
            "  {:<6} {:>5}  {:>11}  {:>6}",
            r.material, r.thickness, size, r.sheet_qty
        );
    }
}

pub fn print_fragments(fragments: &[PositionFragment]) {
    for f in fragments {
        println!(
            "{:>3} {:>8.2} / {:<8.2} {}",
            f.page, f.y_position, f.page_height, f.text
        );
    }
}
