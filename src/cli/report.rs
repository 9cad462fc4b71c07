//! Plain-text rendering of a comparison for the terminal

use std::io::{self, Write};

use routewise::{format_signed_duration, ComparisonSession, RouteView};

/// Write the four metrics and both Order/Address tables to `out`
pub fn print_comparison<W: Write>(out: &mut W, session: &ComparisonSession) -> io::Result<()> {
    let cmp = &session.comparison;

    writeln!(out, "▶️  Before: {:.1} km, {}", cmp.baseline.total_distance_km, cmp.baseline.total_duration)?;
    writeln!(out, "✨ After:  {:.1} km, {}", cmp.optimized.total_distance_km, cmp.optimized.total_duration)?;
    writeln!(
        out,
        "   Saved:  {:.1} km, {}",
        cmp.distance_delta_km,
        format_signed_duration(cmp.duration_delta_secs)
    )?;

    writeln!(out)?;
    writeln!(out, "📍 Input Route")?;
    print_table(out, &cmp.baseline)?;
    writeln!(out)?;
    writeln!(out, "✨ Optimized Route")?;
    print_table(out, &cmp.optimized)?;
    Ok(())
}

fn print_table<W: Write>(out: &mut W, view: &RouteView) -> io::Result<()> {
    writeln!(out, "{:>5}  Address", "Order")?;
    for (order, address) in view.numbered_addresses() {
        writeln!(out, "{order:>5}  {address}")?;
    }
    Ok(())
}
