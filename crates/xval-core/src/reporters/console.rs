// Dweve XVAL - Cross-Machine Benchmark Validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Console reporter.
//!
//! Ratios above 1 (the column's own machine wins) are blue, ratios below 1
//! are yellow and the identity is dimmed.

use crate::engine::RatioClass;
use crate::ranking::RoutineRanking;
use crate::report::Report;
use crate::reporters::{format_cycles, format_kcycles, format_ratio, NOT_AVAILABLE};
use crate::savings::CompilerSavings;
use crate::supercop::ScalarmultTable;
use colored::Colorize;
use std::fmt::Write;

const MIN_CELL_WIDTH: usize = 8;

fn paint(cell: String, ratio: Option<f64>, color: bool) -> String {
    if !color {
        return cell;
    }
    match ratio.map(RatioClass::of) {
        Some(RatioClass::Slower) => cell.blue().to_string(),
        Some(RatioClass::Faster) => cell.yellow().to_string(),
        Some(RatioClass::Identity) => cell.dimmed().to_string(),
        None => cell,
    }
}

fn rule(width: usize) -> String {
    "-".repeat(width)
}

/// Renders the ratio table and champions of one routine.
pub fn render_ranking(ranking: &RoutineRanking, color: bool) -> String {
    let label_width = ranking
        .rows
        .iter()
        .map(|r| r.origin.name().len())
        .chain(["opt on \\ ran on".len()])
        .max()
        .unwrap_or(MIN_CELL_WIDTH);
    let widths: Vec<usize> = ranking
        .columns
        .iter()
        .map(|c| (c.len() + 1).max(MIN_CELL_WIDTH))
        .collect();
    let total = label_width + widths.iter().sum::<usize>() + MIN_CELL_WIDTH + 1;

    let mut out = String::new();
    let title = format!("{} ({})", ranking.symbol, ranking.caption);
    let _ = writeln!(out, "{}", if color { title.bold().to_string() } else { title });
    let _ = writeln!(out, "{}", rule(total));

    let mut header = format!("{:<width$}", "opt on \\ ran on", width = label_width);
    for (column, width) in ranking.columns.iter().zip(&widths) {
        let _ = write!(header, "{:>width$}", column, width = *width);
    }
    let _ = write!(header, " {:>width$}", "G.M.", width = MIN_CELL_WIDTH);
    let _ = writeln!(out, "{}", header);

    for row in &ranking.rows {
        let mut line = format!("{:<width$}", row.origin.name(), width = label_width);
        for (cell, width) in row.cells.iter().zip(&widths) {
            let text = format!("{:>width$}", format_ratio(*cell), width = *width);
            line.push_str(&paint(text, *cell, color));
        }
        let _ = write!(
            line,
            " {:>width$}",
            format_ratio(row.geometric_mean),
            width = MIN_CELL_WIDTH
        );
        let _ = writeln!(out, "{}", line);
    }

    let mut line = format!("{:<width$}", "Final", width = label_width);
    for (value, width) in ranking.finals.iter().zip(&widths) {
        let _ = write!(line, "{:>width$}", format_ratio(*value), width = *width);
    }
    let _ = write!(
        line,
        " {:>width$}",
        format_ratio(ranking.final_geometric_mean),
        width = MIN_CELL_WIDTH
    );
    let _ = writeln!(out, "{}", rule(total));
    let _ = writeln!(out, "{}", line);

    out.push_str(&render_champions(ranking));

    if !ranking.diagnostics.is_empty() {
        let _ = writeln!(out, "Diagnostics:");
        for diagnostic in &ranking.diagnostics {
            let text = format!("  - {}", diagnostic);
            let _ = writeln!(out, "{}", if color { text.dimmed().to_string() } else { text });
        }
    }
    out
}

/// Renders the champion shortlist of one routine.
pub fn render_champions(ranking: &RoutineRanking) -> String {
    let mut out = String::new();
    if ranking.champions.is_empty() {
        let _ = writeln!(out, "Champions: none");
        return out;
    }
    let _ = writeln!(out, "Champions:");
    for (i, champion) in ranking.champions.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {} / {}  G.M. {:.2} cycles ({}/{} machines)",
            i + 1,
            champion.origin,
            champion.filename,
            champion.geometric_mean,
            champion.machines_covered,
            champion.per_machine.len()
        );
    }
    out
}

/// Renders the compiler savings summary.
pub fn render_savings(savings: &CompilerSavings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "COMPILER SAVINGS (geometric mean of ratios)");

    let compilers: Vec<&str> = savings.overall.iter().map(|c| c.compiler.as_str()).collect();
    let label_width = savings
        .curves
        .iter()
        .map(|c| c.caption.len())
        .chain(["Curve".len()])
        .max()
        .unwrap_or(MIN_CELL_WIDTH)
        + 2;

    let mut header = format!("{:<width$}", "Curve", width = label_width);
    for method in crate::savings::Method::ALL {
        for compiler in &compilers {
            let heading = format!("{} {}", method.label(), compiler);
            let _ = write!(header, "{:>width$}", heading, width = heading.len().max(MIN_CELL_WIDTH) + 2);
        }
    }
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "{}", rule(header.len()));

    for curve in &savings.curves {
        let mut line = format!("{:<width$}", curve.caption, width = label_width);
        for method in &curve.methods {
            for mean in &method.compilers {
                let heading_len = method.method.label().len() + 1 + mean.compiler.len();
                let _ = write!(
                    line,
                    "{:>width$}",
                    format_ratio(mean.geometric_mean),
                    width = heading_len.max(MIN_CELL_WIDTH) + 2
                );
            }
        }
        let _ = writeln!(out, "{}", line);
    }

    let _ = writeln!(out, "{}", rule(header.len()));
    for mean in &savings.overall {
        let _ = writeln!(
            out,
            "Overall speedup over {}: {} ({} curve/method pairs)",
            mean.compiler,
            format_ratio(mean.geometric_mean),
            mean.samples
        );
    }
    if !savings.skipped.is_empty() {
        let _ = writeln!(out, "Skipped symbols: {}", savings.skipped.join(", "));
    }
    out
}

/// Renders the SUPERCOP scalar-multiplication tables.
pub fn render_scalarmult(tables: &[ScalarmultTable]) -> String {
    let mut out = String::new();
    for table in tables {
        let name_width = table
            .rows
            .iter()
            .map(|r| r.name.len())
            .chain(["Implementation".len()])
            .max()
            .unwrap_or(MIN_CELL_WIDTH)
            + 2;
        let cell_width = 16;

        let _ = writeln!(out, "{}", table.heading);
        let mut header = format!("{:<name$}{:<6}", "Implementation", "Lang.", name = name_width);
        for column in &table.columns {
            let _ = write!(header, "{:>width$}", column, width = cell_width);
        }
        let _ = write!(header, "{:>width$}", "G.M.", width = cell_width);
        let _ = writeln!(out, "{}", header);
        let _ = writeln!(out, "{}", rule(header.len()));

        for row in &table.rows {
            let mut line = format!("{:<name$}{:<6}", row.name, row.language, name = name_width);
            for (cycles, ratio) in row.cycles.iter().zip(&row.ratios) {
                let _ = write!(
                    line,
                    "{:>width$}",
                    format_kcycles(*cycles, *ratio),
                    width = cell_width
                );
            }
            let mean = match (row.geometric_mean, row.mean_ratio) {
                (Some(gm), Some(r)) => format!("{:.0}k ({:.2}x)", gm / 1000.0, r),
                _ => NOT_AVAILABLE.to_string(),
            };
            let _ = write!(line, "{:>width$}", mean, width = cell_width);
            let _ = writeln!(out, "{}", line);
        }
        out.push('\n');
    }
    out
}

/// Renders the full report.
pub fn render_report(report: &Report, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(80));
    let _ = writeln!(out, "CROSS-MACHINE VALIDATION REPORT");
    let _ = writeln!(out, "{}", "=".repeat(80));
    let _ = writeln!(out, "Machines: {}", report.machines.join(", "));
    let _ = writeln!(out, "Compilers: {}", report.compilers.join(", "));
    let _ = writeln!(out, "Routines: {}", report.rankings.len());
    out.push('\n');

    for ranking in &report.rankings {
        out.push_str(&render_ranking(ranking, color));
        out.push('\n');
    }
    out.push_str(&render_savings(&report.savings));
    out
}

/// Renders each routine's shortlist, ending with a `tar` line that bundles
/// the listed solutions.
pub fn render_champion_summary(rankings: &[RoutineRanking]) -> String {
    let mut out = String::new();
    for ranking in rankings {
        let _ = writeln!(out, "{} ({})", ranking.symbol, ranking.caption);
        for (i, champion) in ranking.champions.iter().enumerate() {
            let per_machine: Vec<String> =
                champion.per_machine.iter().map(|c| format_cycles(*c)).collect();
            let _ = writeln!(
                out,
                "  {:>2}. {} / {}  G.M. {:.2}  [{}]",
                i + 1,
                champion.origin,
                champion.filename,
                champion.geometric_mean,
                per_machine.join(" ")
            );
        }
        if !ranking.champions.is_empty() {
            let files: Vec<&str> = ranking
                .champions
                .iter()
                .map(|c| c.filename.as_str())
                .collect();
            let _ = writeln!(out, "  tar czf {}.tar.gz {}", ranking.symbol, files.join(" "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Diagnostic, RatioRow};
    use crate::ranking::Champion;
    use crate::record::Origin;

    fn ranking() -> RoutineRanking {
        RoutineRanking {
            symbol: "x_mul".into(),
            caption: "X".into(),
            columns: vec!["M1".into(), "M2".into()],
            rows: vec![RatioRow {
                origin: Origin::MachineTuned("M1".into()),
                cells: vec![Some(1.0), None],
                geometric_mean: Some(1.0),
            }],
            finals: vec![None, None],
            final_geometric_mean: None,
            champions: vec![Champion {
                origin: Origin::MachineTuned("M1".into()),
                filename: "f1".into(),
                per_machine: vec![Some(100.0), Some(150.0)],
                geometric_mean: 122.47,
                machines_covered: 2,
            }],
            diagnostics: vec![Diagnostic::DegenerateGeometricMean {
                row: "Final".into(),
            }],
        }
    }

    #[test]
    fn test_render_ranking_plain() {
        let text = render_ranking(&ranking(), false);
        assert!(text.contains("x_mul (X)"));
        assert!(text.contains("1.00"));
        assert!(text.contains("N/A"));
        assert!(text.contains("Final"));
        assert!(text.contains("M1 / f1"));
        assert!(text.contains("cannot calculate 'Final' mean"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_champion_summary_lists_per_machine_cycles() {
        let text = render_champion_summary(&[ranking()]);
        assert!(text.contains("[100 150]"));
        assert!(text.contains("G.M. 122.47"));
        assert!(text.trim_end().ends_with("tar czf x_mul.tar.gz f1"));
    }

    #[test]
    fn test_champion_summary_without_champions_has_no_tar_line() {
        let mut empty = ranking();
        empty.champions.clear();
        assert!(!render_champion_summary(&[empty]).contains("tar czf"));
    }

    #[test]
    fn test_render_savings_empty() {
        let text = render_savings(&CompilerSavings::default());
        assert!(text.contains("COMPILER SAVINGS"));
    }
}
